//! End-to-end runs through a seeded session

use mainframe::game::quiz::QuizPhase;
use mainframe::game::{Command, Event, Screen, Step, Timings};
use mainframe::tui::stage::Stage;
use mainframe::{QuestionBank, Session, SlotState};
use rand::rngs::StdRng;
use rand::SeedableRng;

struct Harness {
    session: Session,
    stage: Stage,
    log: Vec<Command>,
}

impl Harness {
    fn new() -> Self {
        let session = Session::with_rng(
            QuestionBank::default(),
            Timings::default(),
            StdRng::seed_from_u64(2007),
        );
        let mut harness = Self {
            session,
            stage: Stage::default(),
            log: Vec::new(),
        };
        let step = harness.session.start();
        harness.settle(step);
        harness
    }

    /// Apply a step and keep firing timers until nothing is pending
    fn settle(&mut self, mut step: Step) {
        loop {
            for command in step.commands.drain(..) {
                self.stage.apply(&command).unwrap();
                self.log.push(command);
            }
            if step.wake.is_none() {
                break;
            }
            step = self.session.handle(Event::Timer);
        }
    }

    fn send(&mut self, event: Event) {
        self.log.clear();
        let step = self.session.handle(event);
        self.settle(step);
    }

    fn reach_questions(&mut self) {
        self.send(Event::Continue);
        self.send(Event::Start);
        assert_eq!(self.session.screen(), Screen::Question);
    }

    fn answer(&mut self, text: &str) {
        self.send(Event::Submit(text.to_string()));
    }

    fn index(&self) -> usize {
        self.session.state().current_question_index
    }

    fn shown_result(&self) -> Option<(String, String, bool)> {
        self.log.iter().find_map(|command| match command {
            Command::ShowResult {
                message,
                icon,
                denied,
            } => Some((message.clone(), icon.clone(), *denied)),
            _ => None,
        })
    }
}

#[test]
fn boot_waits_for_a_key() {
    let mut harness = Harness::new();
    assert_eq!(harness.session.screen(), Screen::Boot);
    assert_eq!(harness.stage.boot_progress, 100);
    assert!(!harness.stage.boot_status.is_empty());

    harness.send(Event::Continue);
    assert_eq!(harness.session.screen(), Screen::Intro);
    assert!(!harness.stage.intro_text.is_empty());
}

#[test]
fn scan_hands_over_to_the_first_question() {
    let mut harness = Harness::new();
    harness.reach_questions();
    assert_eq!(harness.stage.scan_progress, 100);
    assert_eq!(harness.stage.question_id, "Q.01");
    assert_eq!(
        harness.stage.firewall,
        vec![SlotState::Active, SlotState::Locked, SlotState::Locked, SlotState::Locked]
    );
    assert!(harness.session.accepts_answer_input());
}

#[test]
fn correct_answers_advance() {
    let mut harness = Harness::new();
    harness.reach_questions();

    harness.answer("19 june 2007");
    let (_, icon, denied) = harness.shown_result().unwrap();
    assert_eq!(icon, "🔓");
    assert!(!denied);
    assert_eq!(harness.index(), 1);

    harness.answer("BAMBOO");
    assert_eq!(harness.index(), 2);
    assert_eq!(harness.stage.question_id, "Q.03");
    assert_eq!(harness.stage.firewall[0], SlotState::Breached);
    assert_eq!(harness.stage.firewall[2], SlotState::Active);
}

#[test]
fn wrong_answer_retries_the_same_question() {
    let mut harness = Harness::new();
    harness.reach_questions();
    harness.answer("19 june 2007");
    harness.answer("bamboo");

    harness.answer("74");
    let (message, _, denied) = harness.shown_result().unwrap();
    assert!(denied);
    assert!(message.contains("DENIED"));
    assert_eq!(harness.index(), 2);
    assert_eq!(harness.session.quiz().phase(), &QuizPhase::Presenting(2));
    assert_eq!(harness.stage.input.value, "");
    assert!(harness.stage.input.enabled);

    harness.answer("73");
    assert_eq!(harness.index(), 3);
}

#[test]
fn special_wrong_answer_has_its_own_message() {
    let mut harness = Harness::new();
    harness.reach_questions();
    for answer in ["19/6/2007", "bamboo", "73"] {
        harness.answer(answer);
    }

    harness.answer("Kashaf ");
    let (message, icon, denied) = harness.shown_result().unwrap();
    assert_eq!(message, "The most invalid answer");
    assert_eq!(icon, "❌");
    assert!(denied);
    assert!(harness.log.contains(&Command::Shake));
    assert_eq!(harness.index(), 3);
    assert_eq!(harness.session.screen(), Screen::Question);
}

#[test]
fn last_answer_starts_the_celebration_once() {
    let mut harness = Harness::new();
    harness.reach_questions();
    for answer in ["19 june 2007", "bamboo", "seventy three", "ayan"] {
        harness.answer(answer);
    }

    assert_eq!(harness.session.screen(), Screen::Celebration);
    assert!(harness.session.quiz().is_finished());
    assert!(harness.session.celebration().has_fired());
    let starts = harness
        .log
        .iter()
        .filter(|c| **c == Command::StartCelebration)
        .count();
    assert_eq!(starts, 1);

    harness.answer("ayan");
    assert!(harness.log.is_empty());
}

#[test]
fn blank_submissions_do_nothing() {
    let mut harness = Harness::new();
    harness.reach_questions();
    for blank in ["", "   ", "\t"] {
        harness.answer(blank);
        assert!(harness.log.is_empty());
    }
    assert_eq!(harness.session.quiz().attempts(), 0);
    assert_eq!(harness.session.quiz().phase(), &QuizPhase::Presenting(0));
}

#[test]
fn submissions_while_resolving_are_ignored() {
    let mut harness = Harness::new();
    harness.reach_questions();

    let step = harness.session.handle(Event::Submit("bamboo".into()));
    assert!(step.wake.is_some());
    let ignored = harness.session.handle(Event::Submit("19 june 2007".into()));
    assert!(ignored.is_empty());
    assert_eq!(harness.session.quiz().attempts(), 1);
}
