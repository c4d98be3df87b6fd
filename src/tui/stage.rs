//! Named render targets
//!
//! The stage holds what each screen element currently shows. Commands
//! addressed to an element that is not registered fail with
//! [`MainframeError::MissingRenderTarget`]; the caller logs and moves on.

use crate::data::SlotState;
use crate::game::{Command, LogLevel, Screen, Verdict};
use crate::MainframeError;
use chrono::Local;
use std::collections::{HashSet, VecDeque};

const SYSTEM_LOG_CAPACITY: usize = 20;
const SHAKE_FRAMES: u8 = 14;

/// Every element a command can address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    Screens,
    BootLog,
    BootProgress,
    BootStatus,
    IntroMessage,
    ScanRing,
    ScanHash,
    FirewallSlots,
    QuestionId,
    QuestionText,
    QuestionBox,
    AnswerInput,
    Feedback,
    BruteOverlay,
    ResultOverlay,
    SystemLog,
}

impl Element {
    pub const ALL: [Element; 16] = [
        Element::Screens,
        Element::BootLog,
        Element::BootProgress,
        Element::BootStatus,
        Element::IntroMessage,
        Element::ScanRing,
        Element::ScanHash,
        Element::FirewallSlots,
        Element::QuestionId,
        Element::QuestionText,
        Element::QuestionBox,
        Element::AnswerInput,
        Element::Feedback,
        Element::BruteOverlay,
        Element::ResultOverlay,
        Element::SystemLog,
    ];
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Element::Screens => "screens",
            Element::BootLog => "boot-text",
            Element::BootProgress => "boot-bar",
            Element::BootStatus => "boot-status",
            Element::IntroMessage => "intro-message",
            Element::ScanRing => "ring-fill",
            Element::ScanHash => "hash-text",
            Element::FirewallSlots => "firewall",
            Element::QuestionId => "q-id",
            Element::QuestionText => "q-text",
            Element::QuestionBox => "question-box",
            Element::AnswerInput => "answer-input",
            Element::Feedback => "feedback",
            Element::BruteOverlay => "brute-overlay",
            Element::ResultOverlay => "result-overlay",
            Element::SystemLog => "log-content",
        };
        f.write_str(name)
    }
}

/// The answer field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputField {
    pub value: String,
    pub enabled: bool,
    pub focused: bool,
}

impl InputField {
    pub fn push(&mut self, c: char) -> bool {
        if !self.enabled {
            return false;
        }
        self.value.push(c);
        true
    }

    pub fn pop(&mut self) {
        if self.enabled {
            self.value.pop();
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BruteOverlay {
    pub progress: u8,
    pub lines: Vec<(String, Verdict)>,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultOverlay {
    pub message: String,
    pub icon: String,
    pub denied: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub text: String,
    pub level: LogLevel,
}

/// Current content of every render target
#[derive(Debug, Clone)]
pub struct Stage {
    targets: HashSet<Element>,

    pub screen: Screen,
    pub boot_lines: Vec<String>,
    pub boot_progress: u8,
    pub boot_status: String,
    pub intro_text: String,
    pub scan_progress: u8,
    pub scan_hash: String,
    pub firewall: Vec<SlotState>,
    pub question_id: String,
    pub question_text: String,
    pub input: InputField,
    pub feedback: String,
    pub brute: Option<BruteOverlay>,
    pub result: Option<ResultOverlay>,
    pub shake: u8,
    pub system_log: VecDeque<LogEntry>,
}

impl Stage {
    /// A stage where only `targets` exist
    pub fn with_targets(targets: impl IntoIterator<Item = Element>) -> Self {
        Self {
            targets: targets.into_iter().collect(),
            screen: Screen::Boot,
            boot_lines: Vec::new(),
            boot_progress: 0,
            boot_status: String::new(),
            intro_text: String::new(),
            scan_progress: 0,
            scan_hash: String::new(),
            firewall: Vec::new(),
            question_id: String::new(),
            question_text: String::new(),
            input: InputField::default(),
            feedback: String::new(),
            brute: None,
            result: None,
            shake: 0,
            system_log: VecDeque::with_capacity(SYSTEM_LOG_CAPACITY),
        }
    }

    pub fn has(&self, element: Element) -> bool {
        self.targets.contains(&element)
    }

    fn require(&self, element: Element) -> Result<(), MainframeError> {
        if self.has(element) {
            Ok(())
        } else {
            Err(MainframeError::MissingRenderTarget(element))
        }
    }

    /// Apply one render command. Audio and effect commands are not
    /// addressed to the stage and pass through untouched.
    pub fn apply(&mut self, command: &Command) -> Result<(), MainframeError> {
        match command {
            Command::ShowScreen(screen) => {
                self.require(Element::Screens)?;
                self.screen = *screen;
            }
            Command::AppendBootLine(line) => {
                self.require(Element::BootLog)?;
                self.boot_lines.push(line.clone());
            }
            Command::SetBootProgress(progress) => {
                self.require(Element::BootProgress)?;
                self.boot_progress = (*progress).min(100);
            }
            Command::SetBootStatus(status) => {
                self.require(Element::BootStatus)?;
                self.boot_status = status.clone();
            }
            Command::SetIntroText(text) => {
                self.require(Element::IntroMessage)?;
                self.intro_text = text.clone();
            }
            Command::SetScanProgress(progress) => {
                self.require(Element::ScanRing)?;
                self.scan_progress = (*progress).min(100);
            }
            Command::SetScanHash(hash) => {
                self.require(Element::ScanHash)?;
                self.scan_hash = hash.clone();
            }
            Command::SetFirewall(slots) => {
                self.require(Element::FirewallSlots)?;
                self.firewall = slots.clone();
            }
            Command::SetQuestion { id, text } => {
                self.require(Element::QuestionId)?;
                self.require(Element::QuestionText)?;
                self.question_id = id.clone();
                self.question_text = text.clone();
            }
            Command::ResetInput => {
                self.require(Element::AnswerInput)?;
                self.input.value.clear();
                self.input.focused = true;
            }
            Command::SetInputEnabled(enabled) => {
                self.require(Element::AnswerInput)?;
                self.input.enabled = *enabled;
            }
            Command::ClearFeedback => {
                self.require(Element::Feedback)?;
                self.feedback.clear();
            }
            Command::ShowBruteOverlay => {
                self.require(Element::BruteOverlay)?;
                self.brute = Some(BruteOverlay::default());
            }
            Command::SetBruteProgress(progress) => {
                self.require(Element::BruteOverlay)?;
                if let Some(brute) = self.brute.as_mut() {
                    brute.progress = (*progress).min(100);
                }
            }
            Command::AppendBruteLine { text, verdict } => {
                self.require(Element::BruteOverlay)?;
                if let Some(brute) = self.brute.as_mut() {
                    brute.lines.push((text.clone(), *verdict));
                }
            }
            Command::SetBruteStatus(status) => {
                self.require(Element::BruteOverlay)?;
                if let Some(brute) = self.brute.as_mut() {
                    brute.status = status.clone();
                }
            }
            Command::HideBruteOverlay => {
                self.require(Element::BruteOverlay)?;
                self.brute = None;
            }
            Command::ShowResult {
                message,
                icon,
                denied,
            } => {
                self.require(Element::ResultOverlay)?;
                self.result = Some(ResultOverlay {
                    message: message.clone(),
                    icon: icon.clone(),
                    denied: *denied,
                });
            }
            Command::HideResult => {
                self.require(Element::ResultOverlay)?;
                self.result = None;
            }
            Command::Shake => {
                self.require(Element::QuestionBox)?;
                self.shake = SHAKE_FRAMES;
            }
            Command::Log {
                kind,
                message,
                level,
            } => {
                self.require(Element::SystemLog)?;
                let time = Local::now().format("%H:%M:%S");
                self.system_log.push_front(LogEntry {
                    text: format!("[{}] [{}] {}", time, kind, message),
                    level: *level,
                });
                self.system_log.truncate(SYSTEM_LOG_CAPACITY);
            }
            Command::PlayTone(_)
            | Command::StartAmbient
            | Command::StartCelebrationAmbient
            | Command::StartCelebration => {}
        }
        Ok(())
    }

    /// Horizontal offset of the question box for the current shake frame
    pub fn shake_offset(&self) -> i16 {
        match self.shake {
            0 => 0,
            n if n % 2 == 0 => 1,
            _ => -1,
        }
    }

    /// Advance per-frame decorations
    pub fn on_frame(&mut self) {
        self.shake = self.shake.saturating_sub(1);
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::with_targets(Element::ALL)
    }
}
