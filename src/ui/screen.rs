//! The single memo screen.
//!
//! Renders the waveform, record indicator, editable transcript, and error
//! line, and turns key presses into screen commands. The transcript field is
//! owned here as a tui-input widget so it stays editable independent of the
//! session lifecycle.

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Sparkline},
};
use std::io::{self, Stdout};
use std::time::Duration;
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

use crate::session::waveform::MAX_MAGNITUDE;
use crate::session::SessionStatus;
use crate::ui::onboarding;

/// Common colors/styles.
const BG: Color = Color::Rgb(0, 0, 0);
const FG: Color = Color::Rgb(206, 224, 220);
const HELP_FG: Color = Color::Rgb(100, 100, 100);
const RECORD_FG: Color = Color::Red;
const ERROR_FG: Color = Color::Red;

/// Fixed error line for a session that failed to start.
pub const FAILED_TO_START: &str = "Failed to start recording";
/// Fixed error line for a transcription that failed.
pub const FAILED_TO_TRANSCRIBE: &str = "Failed to transcribe audio";

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// User input command on the memo screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenCommand {
    /// Keep going (no key, editing key, or onboarding dismissal)
    Continue,
    /// Start or stop the recording session (Ctrl+R)
    ToggleRecording,
    /// Copy the transcript to the clipboard (Ctrl+Y)
    CopyTranscript,
    /// Exit the application (Escape or Ctrl+C)
    Quit,
}

/// Everything the screen needs from the record loop to draw one frame.
pub struct ScreenView<'a> {
    pub status: SessionStatus,
    pub magnitudes: &'a [u64],
    pub elapsed: Duration,
    pub error: Option<&'a str>,
}

/// The memo screen: terminal handle, transcript editor, onboarding state.
pub struct MemoScreen {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    input: Input,
    onboarding_visible: bool,
    spinner_frame: usize,
    cleaned_up: bool,
}

impl MemoScreen {
    /// Creates the screen and enters alternate screen mode.
    ///
    /// # Errors
    /// - If raw mode cannot be enabled
    /// - If the terminal cannot be initialized
    pub fn new() -> anyhow::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            input: Input::default(),
            onboarding_visible: true,
            spinner_frame: 0,
            cleaned_up: false,
        })
    }

    /// Current transcript text.
    pub fn transcript(&self) -> &str {
        self.input.value()
    }

    /// Replaces the transcript, e.g. with a fresh transcription result.
    pub fn set_transcript(&mut self, text: String) {
        self.input = Input::new(text);
    }

    /// Polls for input (50 ms) and maps it to a screen command.
    ///
    /// While the onboarding overlay is visible, the first key press only
    /// dismisses it. Keys that are not screen commands feed the transcript
    /// editor.
    ///
    /// # Errors
    /// - If event polling fails
    pub fn handle_input(&mut self) -> anyhow::Result<ScreenCommand> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if self.onboarding_visible {
                    tracing::debug!("Onboarding dismissed");
                    self.onboarding_visible = false;
                    return Ok(ScreenCommand::Continue);
                }

                if let Some(command) = command_for_key(&key) {
                    return Ok(command);
                }

                self.input.handle_event(&Event::Key(key));
            }
        }
        Ok(ScreenCommand::Continue)
    }

    /// Renders one frame.
    ///
    /// # Errors
    /// - If terminal rendering fails
    pub fn render(&mut self, view: &ScreenView) -> anyhow::Result<()> {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();

        // Extract data before the draw closure to avoid borrow issues
        let spinner = SPINNER_FRAMES[self.spinner_frame];
        let onboarding_visible = self.onboarding_visible;
        let input_value = self.input.value().to_string();
        let input_cursor = self.input.cursor();
        let editing = view.status == SessionStatus::Idle && !onboarding_visible;

        self.terminal.draw(|frame| {
            let area = frame.area();

            frame.render_widget(Block::default().style(Style::default().bg(BG)), area);

            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(1), // title
                    Constraint::Length(6), // waveform
                    Constraint::Length(1), // status
                    Constraint::Min(3),    // transcript
                    Constraint::Length(1), // error
                    Constraint::Length(1), // help
                ])
                .split(area);

            let title = Paragraph::new(" ◉ voicejot").style(Style::default().fg(FG).bg(BG));
            frame.render_widget(title, layout[0]);

            let sparkline = Sparkline::default()
                .data(view.magnitudes)
                .max(MAX_MAGNITUDE)
                .style(Style::default().fg(FG).bg(BG));
            frame.render_widget(sparkline, layout[1]);

            let status_line = match view.status {
                SessionStatus::Idle => {
                    Line::from(Span::styled("  idle", Style::default().fg(HELP_FG)))
                }
                SessionStatus::Recording => {
                    let secs = view.elapsed.as_secs();
                    Line::from(vec![
                        Span::styled("● ", Style::default().fg(RECORD_FG)),
                        Span::raw(format!("{}:{:02}", secs / 60, secs % 60)),
                    ])
                }
                SessionStatus::Transcribing => Line::from(vec![
                    Span::styled(spinner, Style::default().fg(FG)),
                    Span::raw(" transcribing…"),
                ]),
            };
            frame.render_widget(
                Paragraph::new(status_line).style(Style::default().fg(FG).bg(BG)),
                layout[2],
            );

            let transcript_block = Block::default()
                .borders(Borders::ALL)
                .title(" transcript ")
                .style(Style::default().fg(FG).bg(BG));
            let transcript_area = transcript_block.inner(layout[3]);
            frame.render_widget(transcript_block, layout[3]);

            // Keep the cursor in view when the text outgrows the field
            let scroll = input_cursor
                .saturating_sub(transcript_area.width.saturating_sub(1) as usize);
            let transcript = Paragraph::new(input_value.as_str())
                .scroll((0, scroll as u16))
                .style(Style::default().fg(FG).bg(BG));
            frame.render_widget(transcript, transcript_area);

            if editing {
                frame.set_cursor_position((
                    transcript_area.x + (input_cursor - scroll) as u16,
                    transcript_area.y,
                ));
            }

            if let Some(error) = view.error {
                let error_line =
                    Paragraph::new(error).style(Style::default().fg(ERROR_FG).bg(BG));
                frame.render_widget(error_line, layout[4]);
            }

            let help = Paragraph::new(" ctrl+r record · ctrl+y copy · esc quit")
                .style(Style::default().fg(HELP_FG).bg(BG));
            frame.render_widget(help, layout[5]);

            if onboarding_visible {
                onboarding::render_overlay(frame, area);
            }
        })?;

        Ok(())
    }

    /// Cleans up terminal state and exits alternate screen mode.
    ///
    /// # Errors
    /// - If terminal mode cannot be disabled
    pub fn cleanup(&mut self) -> anyhow::Result<()> {
        if self.cleaned_up {
            return Ok(());
        }
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        self.cleaned_up = true;
        Ok(())
    }
}

impl Drop for MemoScreen {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// Maps a key press to a screen command; `None` means the key belongs to the
/// transcript editor.
fn command_for_key(key: &KeyEvent) -> Option<ScreenCommand> {
    match key.code {
        KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(ScreenCommand::ToggleRecording)
        }
        KeyCode::Char('y') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(ScreenCommand::CopyTranscript)
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(ScreenCommand::Quit)
        }
        KeyCode::Esc => Some(ScreenCommand::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn control_keys_map_to_commands() {
        assert_eq!(
            command_for_key(&key(KeyCode::Char('r'), KeyModifiers::CONTROL)),
            Some(ScreenCommand::ToggleRecording)
        );
        assert_eq!(
            command_for_key(&key(KeyCode::Char('y'), KeyModifiers::CONTROL)),
            Some(ScreenCommand::CopyTranscript)
        );
        assert_eq!(
            command_for_key(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(ScreenCommand::Quit)
        );
        assert_eq!(
            command_for_key(&key(KeyCode::Esc, KeyModifiers::NONE)),
            Some(ScreenCommand::Quit)
        );
    }

    #[test]
    fn plain_characters_belong_to_the_editor() {
        assert_eq!(command_for_key(&key(KeyCode::Char('r'), KeyModifiers::NONE)), None);
        assert_eq!(command_for_key(&key(KeyCode::Char(' '), KeyModifiers::NONE)), None);
        assert_eq!(command_for_key(&key(KeyCode::Backspace, KeyModifiers::NONE)), None);
    }
}
