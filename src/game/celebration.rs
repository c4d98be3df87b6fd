//! Hand-off to the finale

use super::{router, Command, LogLevel, QuizState, Screen, Step};
use tracing::{info, warn};

/// Fires the celebration exactly once per session
#[derive(Debug, Clone, Default)]
pub struct CelebrationTrigger {
    fired: bool,
}

impl CelebrationTrigger {
    pub fn has_fired(&self) -> bool {
        self.fired
    }

    pub fn fire(&mut self, state: &mut QuizState) -> Step {
        if self.fired {
            warn!("celebration already running");
            return Step::none();
        }
        self.fired = true;
        info!("celebration initiated");

        let mut commands = router::show(state, Screen::Celebration);
        commands.push(Command::StartCelebrationAmbient);
        commands.push(Command::log(
            "MAINFRAME",
            "All firewalls breached! Celebration initiated!",
            LogLevel::Success,
        ));
        commands.push(Command::StartCelebration);
        Step::idle(commands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once() {
        let mut state = QuizState::default();
        let mut trigger = CelebrationTrigger::default();
        let step = trigger.fire(&mut state);
        assert!(step.commands.contains(&Command::StartCelebration));
        assert!(step.commands.contains(&Command::StartCelebrationAmbient));
        assert_eq!(state.screen, Screen::Celebration);
        assert!(trigger.fire(&mut state).is_empty());
        assert!(trigger.has_fired());
    }
}
