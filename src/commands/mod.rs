//! Application command handlers for voicejot.
//!
//! One submodule per CLI command.
//!
//! # Commands
//! - `record`: the single-screen memo pad (default)
//! - `config`: open the configuration file in the user's preferred editor
//! - `list_devices`: list available audio input devices
//! - `logs`: display recent log entries

pub mod config;
pub mod list_devices;
pub mod logs;
pub mod record;

pub use config::handle_config;
pub use list_devices::handle_list_devices;
pub use logs::handle_logs;
pub use record::handle_record;
