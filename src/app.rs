//! Application orchestration and command routing.
//!
//! Handles command-line argument parsing and delegates to appropriate command handlers.

use crate::commands;
use crate::logging;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::process;

/// A single-screen terminal voice memo pad with waveform display and remote transcription
#[derive(Parser)]
#[command(name = "voicejot")]
#[command(version)]
#[command(about = "\n ◉ voicejot")]
#[command(
    long_about = "\n ◉ voicejot\n\nA single-screen terminal voice memo pad. Record audio with a live waveform\ndisplay, have it transcribed by the configured remote service, then edit the\ntext in place and copy it to the clipboard.\n\nDEFAULT COMMAND:\n    If no command is specified, the memo screen opens.\n\nKEYS:\n    ctrl+r   start / stop recording (60 second cap)\n    ctrl+y   copy transcript to clipboard\n    esc      quit"
)]
#[command(
    after_help = "CONFIGURATION:\n    Config file:        ~/.config/voicejot/voicejot.toml\n    Logs:               ~/.local/state/voicejot/voicejot.log.*"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the memo screen (default)
    ///
    /// Press Ctrl+R to start or stop recording, Ctrl+Y to copy the
    /// transcript, Escape to quit.
    #[command(visible_alias = "r")]
    Record,

    /// Open configuration file in your preferred editor
    ///
    /// Edit the audio device and the transcription endpoint.
    /// Uses $EDITOR environment variable or falls back to nano/vi.
    #[command(visible_alias = "c")]
    Config,

    /// List available audio input devices
    ///
    /// Shows device IDs, names, and configurations to help configure
    /// the correct input device in voicejot.toml.
    #[command(name = "list-devices")]
    ListDevices,

    /// Show recent log entries from the application
    ///
    /// Display the last 50 lines of the most recent log file.
    /// Useful for troubleshooting issues.
    Logs,

    /// Generate shell completion script
    ///
    /// Generate completion script for your shell. Save the output to your
    /// shell's completion directory or source it directly.
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Runs the main application based on command-line arguments.
///
/// # Exit Codes
/// - 0: Success
/// - 1: General error
/// - 2: Usage error (invalid arguments)
///
/// # Errors
/// - If logging initialization fails
/// - If command execution fails
pub async fn run() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Handle commands that don't need logging setup
    match &cli.command {
        Some(Commands::Completions { shell }) => {
            generate(*shell, &mut Cli::command(), "voicejot", &mut io::stdout());
            return Ok(());
        }
        Some(Commands::ListDevices) => {
            return match commands::handle_list_devices() {
                Ok(()) => Ok(()),
                Err(e) => {
                    eprintln!("Error: {e}");
                    process::exit(1);
                }
            };
        }
        Some(Commands::Logs) => {
            return match commands::handle_logs() {
                Ok(()) => Ok(()),
                Err(e) => {
                    eprintln!("Error: {e}");
                    process::exit(1);
                }
            };
        }
        _ => {}
    }

    // Initialize logging for all other commands
    logging::init_logging()?;

    match cli.command {
        None | Some(Commands::Record) => {
            commands::handle_record().await?;
        }
        Some(Commands::Config) => {
            commands::handle_config()?;
        }
        Some(Commands::Completions { .. }) | Some(Commands::ListDevices) | Some(Commands::Logs) => {
            unreachable!("These commands are handled earlier")
        }
    }

    Ok(())
}
