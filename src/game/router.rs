//! Screen switching

use super::{Command, LogLevel, QuizState, Screen};
use tracing::{info, warn};

/// Hide every screen but `screen` and record it as current
pub fn show(state: &mut QuizState, screen: Screen) -> Vec<Command> {
    info!(from = %state.screen, to = %screen, "screen transition");
    state.screen = screen;
    vec![
        Command::ShowScreen(screen),
        Command::log("SCREEN", format!("Transition to {}", screen), LogLevel::Success),
    ]
}

/// Like [`show`], by name. Unknown names are logged and change nothing.
pub fn show_named(state: &mut QuizState, name: &str) -> Vec<Command> {
    match name.parse::<Screen>() {
        Ok(screen) => show(state, screen),
        Err(err) => {
            warn!(%err, "ignoring screen change");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_records_the_screen() {
        let mut state = QuizState::default();
        let commands = show(&mut state, Screen::Intro);
        assert_eq!(state.screen, Screen::Intro);
        assert_eq!(commands[0], Command::ShowScreen(Screen::Intro));
    }

    #[test]
    fn unknown_name_is_a_no_op() {
        let mut state = QuizState::default();
        assert!(show_named(&mut state, "vault").is_empty());
        assert_eq!(state, QuizState::default());
    }

    #[test]
    fn known_name_switches() {
        let mut state = QuizState::default();
        show_named(&mut state, "scan");
        assert_eq!(state.screen, Screen::Scan);
    }
}
