//! Once-per-launch onboarding overlay.
//!
//! Shown on top of the memo screen until the user presses any key; never
//! shown again for the rest of the launch.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap},
};

const OVERLAY_FG: Color = Color::Rgb(206, 224, 220);
const OVERLAY_BG: Color = Color::Rgb(20, 20, 20);

/// Overlay body. Key hints mirror the help line of the memo screen.
const ONBOARDING_TEXT: &str = "Record a voice memo and it is transcribed for you.\n\
    \n\
    ctrl+r   start / stop recording (60s max)\n\
    ctrl+y   copy transcript to clipboard\n\
    esc      quit\n\
    \n\
    Press any key to begin.";

/// Renders the onboarding overlay centered in `area`.
pub fn render_overlay(frame: &mut Frame, area: Rect) {
    let overlay = centered_rect(area, 56, 11);

    frame.render_widget(Clear, overlay);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" voicejot ")
        .padding(Padding::uniform(1))
        .style(Style::default().fg(OVERLAY_FG).bg(OVERLAY_BG));

    let paragraph = Paragraph::new(ONBOARDING_TEXT)
        .wrap(Wrap { trim: false })
        .block(block);

    frame.render_widget(paragraph, overlay);
}

/// Centers a `width` x `height` rect in `area`, clamped to fit.
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_stays_inside_area() {
        let area = Rect::new(0, 0, 80, 24);
        let rect = centered_rect(area, 56, 11);
        assert!(rect.x + rect.width <= area.width);
        assert!(rect.y + rect.height <= area.height);
        assert_eq!(rect.width, 56);
        assert_eq!(rect.height, 11);
    }

    #[test]
    fn centered_rect_clamps_to_small_terminals() {
        let area = Rect::new(0, 0, 40, 8);
        let rect = centered_rect(area, 56, 11);
        assert_eq!(rect.width, 40);
        assert_eq!(rect.height, 8);
    }
}
