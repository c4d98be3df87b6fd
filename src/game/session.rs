//! One run of the presentation, from boot to celebration

use super::boot::BootSequencer;
use super::celebration::CelebrationTrigger;
use super::quiz::QuizController;
use super::scan::ScanSequence;
use super::{Command, QuizState, Screen, Step, Timings, Tone};
use crate::data::QuestionBank;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Inputs the session reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The wake requested by the previous step is due
    Timer,
    /// Any key; ends the boot wait
    Continue,
    /// Start the biometric scan from the intro
    Start,
    /// A character typed into the answer field
    Keystroke,
    Submit(String),
}

/// Owns the state and every phase, and routes events to the active one
#[derive(Debug, Clone)]
pub struct Session {
    state: QuizState,
    boot: BootSequencer,
    scan: ScanSequence,
    quiz: QuizController,
    celebration: CelebrationTrigger,
}

impl Session {
    pub fn new(bank: QuestionBank, timings: Timings) -> Self {
        Self::with_rng(bank, timings, StdRng::from_entropy())
    }

    pub fn with_rng(bank: QuestionBank, timings: Timings, mut rng: StdRng) -> Self {
        let scan_rng = StdRng::seed_from_u64(rng.gen());
        let quiz_rng = StdRng::seed_from_u64(rng.gen());
        Self {
            state: QuizState::default(),
            boot: BootSequencer::new(timings.clone()),
            scan: ScanSequence::new(timings.clone(), scan_rng),
            quiz: QuizController::new(bank, timings, quiz_rng),
            celebration: CelebrationTrigger::default(),
        }
    }

    pub fn state(&self) -> &QuizState {
        &self.state
    }

    pub fn screen(&self) -> Screen {
        self.state.screen
    }

    pub fn quiz(&self) -> &QuizController {
        &self.quiz
    }

    pub fn celebration(&self) -> &CelebrationTrigger {
        &self.celebration
    }

    /// Whether typed characters should reach the answer field
    pub fn accepts_answer_input(&self) -> bool {
        self.state.screen == Screen::Question && self.quiz.accepts_input()
    }

    /// Kick off the boot sequence
    pub fn start(&mut self) -> Step {
        self.boot.start()
    }

    pub fn handle(&mut self, event: Event) -> Step {
        debug!(screen = %self.state.screen, ?event, "event");
        match (self.state.screen, event) {
            (Screen::Boot, Event::Timer) | (Screen::Intro, Event::Timer) => self.boot.on_timer(),
            (Screen::Boot, Event::Continue) => self.boot.on_continue(&mut self.state),
            (Screen::Intro, Event::Start) => self.scan.start(&mut self.state),
            (Screen::Scan, Event::Timer) => {
                let step = self.scan.on_timer();
                if self.scan.is_done() {
                    step.then(self.quiz.begin(&mut self.state))
                } else {
                    step
                }
            }
            (Screen::Question, Event::Timer) => {
                let step = self.quiz.on_timer(&mut self.state);
                if self.quiz.is_finished() && !self.celebration.has_fired() {
                    step.then(self.celebration.fire(&mut self.state))
                } else {
                    step
                }
            }
            (Screen::Question, Event::Submit(answer)) => self.quiz.submit(&mut self.state, &answer),
            (Screen::Question, Event::Keystroke) if self.quiz.accepts_input() => {
                Step::idle(vec![Command::PlayTone(Tone::Type)])
            }
            _ => Step::none(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(QuestionBank::default(), Timings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Session {
        Session::with_rng(
            QuestionBank::default(),
            Timings::default(),
            StdRng::seed_from_u64(619),
        )
    }

    fn settle(session: &mut Session, mut step: Step) -> Vec<Command> {
        let mut all = std::mem::take(&mut step.commands);
        while step.wake.is_some() {
            step = session.handle(Event::Timer);
            all.append(&mut step.commands);
        }
        all
    }

    #[test]
    fn walks_from_boot_to_the_first_question() {
        let mut session = seeded();
        let step = session.start();
        settle(&mut session, step);
        assert_eq!(session.screen(), Screen::Boot);

        let step = session.handle(Event::Continue);
        settle(&mut session, step);
        assert_eq!(session.screen(), Screen::Intro);

        let step = session.handle(Event::Start);
        let commands = settle(&mut session, step);
        assert_eq!(session.screen(), Screen::Question);
        assert!(commands.contains(&Command::ShowScreen(Screen::Question)));
        assert!(session.accepts_answer_input());
    }

    #[test]
    fn events_for_other_screens_are_ignored() {
        let mut session = seeded();
        session.start();
        assert!(session.handle(Event::Start).is_empty());
        assert!(session.handle(Event::Submit("bamboo".into())).is_empty());
        assert!(session.handle(Event::Keystroke).is_empty());
        assert_eq!(session.state(), &QuizState::default());
    }

    #[test]
    fn start_during_intro_typing_moves_on_to_scan() {
        let mut session = seeded();
        let step = session.start();
        settle(&mut session, step);
        let step = session.handle(Event::Continue);
        assert!(step.wake.is_some(), "intro still typing");

        let step = session.handle(Event::Start);
        assert_eq!(session.screen(), Screen::Scan);
        assert!(step.commands.contains(&Command::PlayTone(Tone::Scan)));
    }
}
