//! voicejot entrypoint.

mod app;
mod clipboard;
mod commands;
mod config;
mod feedback;
mod logging;
mod recording;
mod session;
mod transcription;
mod ui;

use std::process;

#[tokio::main]
async fn main() {
    if let Err(e) = app::run().await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
