//! Firewall quiz flow
//!
//! `Presenting(i)` waits for a non-empty submission. The answer is matched
//! once, then the outcome is held back behind the brute-force animation
//! and the result overlay before the controller advances, retries or
//! finishes. Submissions while resolving are ignored.

use super::matcher::{self, MatchResult};
use super::{router, Command, LogLevel, QuizState, Screen, Step, Timings, Tone, Verdict};
use crate::data::{
    firewall_label, random_hex, QuestionBank, SlotState, ACCESS_DENIED, ACCESS_GRANTED,
    BREACH_FAILED, BREACH_SUCCESSFUL, DENIED_ICON,
};
use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, info};

const ATTEMPT_CODES: usize = 20;
const CODE_DIGITS: usize = 32;

/// Where the brute-force/result sequence is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStage {
    BruteForce { progress: u8 },
    Settling,
    ShowingResult,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizPhase {
    Idle,
    Presenting(usize),
    Resolving {
        index: usize,
        outcome: MatchResult,
        stage: ResolveStage,
    },
    Finished,
}

/// Drives the question loop over a [`QuestionBank`]
#[derive(Debug, Clone)]
pub struct QuizController {
    bank: QuestionBank,
    phase: QuizPhase,
    codes: Vec<String>,
    attempts: usize,
    timings: Timings,
    rng: StdRng,
}

impl QuizController {
    pub fn new(bank: QuestionBank, timings: Timings, rng: StdRng) -> Self {
        Self {
            bank,
            phase: QuizPhase::Idle,
            codes: Vec::new(),
            attempts: 0,
            timings,
            rng,
        }
    }

    pub fn phase(&self) -> &QuizPhase {
        &self.phase
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn is_finished(&self) -> bool {
        self.phase == QuizPhase::Finished
    }

    /// Answers run through the matcher so far
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    pub fn accepts_input(&self) -> bool {
        matches!(self.phase, QuizPhase::Presenting(_))
    }

    /// Show the question screen and the first question
    pub fn begin(&mut self, state: &mut QuizState) -> Step {
        if self.phase != QuizPhase::Idle {
            return Step::none();
        }
        let mut commands = router::show(state, Screen::Question);
        commands.extend(self.present(state, 0));
        Step::idle(commands)
    }

    /// A submitted answer. Blank input and submissions outside
    /// `Presenting` change nothing.
    pub fn submit(&mut self, state: &mut QuizState, raw: &str) -> Step {
        let QuizPhase::Presenting(index) = self.phase else {
            debug!(phase = ?self.phase, "submission ignored");
            return Step::none();
        };
        if matcher::normalize(raw).is_none() {
            return Step::none();
        }
        let Some(question) = self.bank.get(index) else {
            return Step::none();
        };

        let outcome = matcher::matches(question, raw);
        self.attempts += 1;
        info!(question = %question.id, ?outcome, "answer submitted");

        self.codes = (0..ATTEMPT_CODES)
            .map(|_| random_hex(&mut self.rng, CODE_DIGITS))
            .collect();
        self.phase = QuizPhase::Resolving {
            index,
            outcome,
            stage: ResolveStage::BruteForce { progress: 0 },
        };
        state.breach_overlay_visible = true;

        Step::after(
            vec![
                Command::SetInputEnabled(false),
                Command::ShowBruteOverlay,
                Command::SetBruteProgress(0),
                Command::PlayTone(Tone::Brute),
            ],
            self.timings.brute_tick,
        )
    }

    pub fn on_timer(&mut self, state: &mut QuizState) -> Step {
        let QuizPhase::Resolving {
            index,
            outcome,
            stage,
        } = self.phase.clone()
        else {
            return Step::none();
        };

        match stage {
            ResolveStage::BruteForce { progress } => self.brute_tick(index, outcome, progress),
            ResolveStage::Settling => self.reveal_result(state, index, outcome),
            ResolveStage::ShowingResult => self.conclude(state, index, outcome),
        }
    }

    fn brute_tick(&mut self, index: usize, outcome: MatchResult, progress: u8) -> Step {
        let progress = progress.saturating_add(self.timings.brute_step).min(100);
        let denied = !outcome.is_correct();
        let complete = progress >= 100;
        let verdict = match (denied, complete) {
            (true, _) => Verdict::Fail,
            (false, false) => Verdict::Checking,
            (false, true) => Verdict::Match,
        };

        let code = &self.codes[self.rng.gen_range(0..self.codes.len())];
        let attempt = self.rng.gen_range(0..9999);
        let mut commands = vec![
            Command::SetBruteProgress(progress),
            Command::AppendBruteLine {
                text: format!("> ATTEMPT_{}: {}... {}", attempt, code, verdict),
                verdict,
            },
        ];

        if complete {
            let status = if denied { BREACH_FAILED } else { BREACH_SUCCESSFUL };
            commands.push(Command::SetBruteStatus(status.to_string()));
            self.phase = QuizPhase::Resolving {
                index,
                outcome,
                stage: ResolveStage::Settling,
            };
            Step::after(commands, self.timings.brute_settle)
        } else {
            self.phase = QuizPhase::Resolving {
                index,
                outcome,
                stage: ResolveStage::BruteForce { progress },
            };
            Step::after(commands, self.timings.brute_tick)
        }
    }

    fn reveal_result(&mut self, state: &mut QuizState, index: usize, outcome: MatchResult) -> Step {
        let (message, icon) = match &outcome {
            MatchResult::Correct => (
                ACCESS_GRANTED.to_string(),
                self.bank
                    .get(index)
                    .map(|q| q.icon.clone())
                    .unwrap_or_default(),
            ),
            MatchResult::WrongSpecial { message, icon } => (message.clone(), icon.clone()),
            MatchResult::WrongGeneric => (ACCESS_DENIED.to_string(), DENIED_ICON.to_string()),
        };
        let denied = !outcome.is_correct();

        state.breach_overlay_visible = false;
        state.result_overlay_visible = true;

        let mut commands = vec![
            Command::HideBruteOverlay,
            Command::ShowResult {
                message: message.clone(),
                icon,
                denied,
            },
        ];
        if denied {
            commands.push(Command::PlayTone(Tone::Denied));
            commands.push(Command::log("SECURITY", message, LogLevel::Error));
            commands.push(Command::Shake);
        } else {
            commands.push(Command::PlayTone(Tone::Success));
            commands.push(Command::log(
                "FIREWALL",
                format!("Level {} breached", index + 1),
                LogLevel::Success,
            ));
        }

        self.phase = QuizPhase::Resolving {
            index,
            outcome,
            stage: ResolveStage::ShowingResult,
        };
        Step::after(commands, self.timings.result_display)
    }

    fn conclude(&mut self, state: &mut QuizState, index: usize, outcome: MatchResult) -> Step {
        state.result_overlay_visible = false;
        let mut commands = vec![Command::HideResult];

        if !outcome.is_correct() {
            info!(question = index + 1, "retrying");
            self.phase = QuizPhase::Presenting(index);
            commands.push(Command::ResetInput);
            commands.push(Command::SetInputEnabled(true));
            return Step::idle(commands);
        }

        if self.bank.is_last(index) {
            info!("all firewalls breached");
            self.phase = QuizPhase::Finished;
            return Step::idle(commands);
        }

        commands.push(Command::PlayTone(Tone::Unlock));
        commands.extend(self.present(state, index + 1));
        Step::idle(commands)
    }

    fn present(&mut self, state: &mut QuizState, index: usize) -> Vec<Command> {
        let Some(question) = self.bank.get(index) else {
            return Vec::new();
        };
        self.phase = QuizPhase::Presenting(index);
        state.current_question_index = index;

        let slots = (0..self.bank.len())
            .map(|slot| SlotState::for_slot(slot, index))
            .collect();
        vec![
            Command::SetFirewall(slots),
            Command::SetQuestion {
                id: question.id.clone(),
                text: question.text.clone(),
            },
            Command::ResetInput,
            Command::SetInputEnabled(true),
            Command::ClearFeedback,
            Command::log(
                "FIREWALL",
                format!("Question {} loaded", index + 1),
                LogLevel::Success,
            ),
        ]
    }
}

/// Labels for a firewall command, e.g. for logs
pub fn firewall_labels(slots: &[SlotState]) -> Vec<String> {
    slots
        .iter()
        .enumerate()
        .map(|(slot, state)| firewall_label(slot, *state))
        .collect()
}
