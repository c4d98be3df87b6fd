//! Terminal User Interface
//!
//! Renders the mainframe screens with ratatui and plays the session's
//! commands against the stage, the audio sink and the effects.

pub mod app;
pub mod audio;
pub mod effects;
pub mod stage;
pub mod widgets;

pub use app::App;

use crate::data::SlotState;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders},
};

/// Color scheme for the mainframe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub accent: Color,
    pub alert: Color,
    pub success: Color,
    pub dim: Color,
    pub border: Color,
    pub highlight: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bg: Color::Black,
            fg: Color::Rgb(0, 255, 65),
            accent: Color::Cyan,
            alert: Color::Rgb(255, 0, 64),
            success: Color::Rgb(0, 255, 65),
            dim: Color::Rgb(0, 110, 30),
            border: Color::Rgb(0, 140, 40),
            highlight: Color::Magenta,
        }
    }
}

/// Get color for a firewall slot
pub fn slot_color(state: &SlotState, theme: &Theme) -> Color {
    match state {
        SlotState::Breached => theme.accent,
        SlotState::Active => theme.fg,
        SlotState::Locked => theme.dim,
    }
}

/// Create a styled border block
pub fn styled_block<'a>(title: &str, theme: &Theme) -> Block<'a> {
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
}

/// ASCII art logo for the intro
pub const LOGO: &str = r#"
███╗   ███╗ █████╗ ██╗███╗   ██╗███████╗██████╗  █████╗ ███╗   ███╗███████╗
████╗ ████║██╔══██╗██║████╗  ██║██╔════╝██╔══██╗██╔══██╗████╗ ████║██╔════╝
██╔████╔██║███████║██║██╔██╗ ██║█████╗  ██████╔╝███████║██╔████╔██║█████╗
██║╚██╔╝██║██╔══██║██║██║╚██╗██║██╔══╝  ██╔══██╗██╔══██║██║╚██╔╝██║██╔══╝
██║ ╚═╝ ██║██║  ██║██║██║ ╚████║██║     ██║  ██║██║  ██║██║ ╚═╝ ██║███████╗
╚═╝     ╚═╝╚═╝  ╚═╝╚═╝╚═╝  ╚═══╝╚═╝     ╚═╝  ╚═╝╚═╝  ╚═╝╚═╝     ╚═╝╚══════╝
"#;

/// Smaller logo for headers
pub const SMALL_LOGO: &str = " SHINZO MAINFRAME ";

/// Key hints per screen
pub const BOOT_HINT: &str = "any key: continue | Esc: quit";
pub const INTRO_HINT: &str = "Enter: begin biometric scan | Esc: quit";
pub const QUESTION_HINT: &str = "type your answer | Enter: submit | Esc: quit";

/// Header, content, status bar
pub fn create_main_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),   // Header
            Constraint::Min(10),     // Main content
            Constraint::Length(3),   // Status bar
        ])
        .split(area)
        .to_vec()
}

/// Question screen content: firewall column + question area
pub fn create_content_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),  // Firewalls + system log
            Constraint::Percentage(70),  // Question
        ])
        .split(area)
        .to_vec()
}

/// Centered rectangle of at most `width` x `height`
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_clamps_to_area() {
        let area = Rect::new(0, 0, 20, 10);
        assert_eq!(centered_rect(area, 10, 4), Rect::new(5, 3, 10, 4));
        assert_eq!(centered_rect(area, 50, 50), area);
    }
}
