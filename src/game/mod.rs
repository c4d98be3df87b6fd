//! Core sequencing logic
//!
//! Every phase is a small state machine. Transitions take the shared
//! [`QuizState`] by `&mut`, never touch the terminal, and return a
//! [`Step`]: the commands for the render and audio collaborators plus the
//! delay until the phase wants to be woken again.

pub mod boot;
pub mod celebration;
pub mod matcher;
pub mod quiz;
pub mod router;
pub mod scan;
pub mod session;

pub use matcher::MatchResult;
pub use session::{Event, Session};

use crate::data::SlotState;
use crate::MainframeError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Named full-terminal views. Exactly one is visible at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Screen {
    Boot,
    Intro,
    Scan,
    Question,
    Celebration,
}

impl Screen {
    pub const ALL: [Screen; 5] = [
        Screen::Boot,
        Screen::Intro,
        Screen::Scan,
        Screen::Question,
        Screen::Celebration,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Screen::Boot => "boot",
            Screen::Intro => "intro",
            Screen::Scan => "scan",
            Screen::Question => "question",
            Screen::Celebration => "celebration",
        }
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Screen {
    type Err = MainframeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Screen::ALL
            .iter()
            .copied()
            .find(|screen| screen.name() == s)
            .ok_or_else(|| MainframeError::UnknownScreen(s.to_string()))
    }
}

/// Sound cues understood by the audio collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tone {
    Hover,
    Click,
    Type,
    Scan,
    Brute,
    Success,
    Denied,
    Unlock,
}

/// Level of an on-screen system log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Normal,
    Success,
    Error,
}

/// Trailing verdict on a brute-force stream line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Checking,
    Fail,
    Match,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Checking => write!(f, "CHECKING"),
            Verdict::Fail => write!(f, "FAIL"),
            Verdict::Match => write!(f, "MATCH"),
        }
    }
}

/// Side effects requested by a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ShowScreen(Screen),

    AppendBootLine(String),
    SetBootProgress(u8),
    SetBootStatus(String),
    SetIntroText(String),

    SetScanProgress(u8),
    SetScanHash(String),

    SetFirewall(Vec<SlotState>),
    SetQuestion { id: String, text: String },
    ResetInput,
    SetInputEnabled(bool),
    ClearFeedback,

    ShowBruteOverlay,
    SetBruteProgress(u8),
    AppendBruteLine { text: String, verdict: Verdict },
    SetBruteStatus(String),
    HideBruteOverlay,

    ShowResult { message: String, icon: String, denied: bool },
    HideResult,
    Shake,

    PlayTone(Tone),
    StartAmbient,
    StartCelebrationAmbient,
    StartCelebration,

    Log { kind: &'static str, message: String, level: LogLevel },
}

impl Command {
    pub fn log(kind: &'static str, message: impl Into<String>, level: LogLevel) -> Self {
        Command::Log {
            kind,
            message: message.into(),
            level,
        }
    }
}

/// Output of one transition
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Step {
    pub commands: Vec<Command>,

    /// Delay until the next timer event; `None` means wait for input
    pub wake: Option<Duration>,
}

impl Step {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn idle(commands: Vec<Command>) -> Self {
        Self {
            commands,
            wake: None,
        }
    }

    pub fn after(commands: Vec<Command>, delay: Duration) -> Self {
        Self {
            commands,
            wake: Some(delay),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() && self.wake.is_none()
    }

    /// Append `next`; its wake replaces ours
    pub fn then(mut self, next: Step) -> Self {
        self.commands.extend(next.commands);
        self.wake = next.wake;
        self
    }
}

/// Mutable session state. Created at index 0 on the boot screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizState {
    pub current_question_index: usize,
    pub screen: Screen,
    pub breach_overlay_visible: bool,
    pub result_overlay_visible: bool,
}

impl Default for QuizState {
    fn default() -> Self {
        Self {
            current_question_index: 0,
            screen: Screen::Boot,
            breach_overlay_visible: false,
            result_overlay_visible: false,
        }
    }
}

/// Fixed delays of every timed sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timings {
    pub boot_line: Duration,
    pub intro_char: Duration,

    pub scan_tick: Duration,
    pub scan_step: u8,
    pub scan_scrambles: u32,
    pub scan_settle: Duration,

    pub brute_tick: Duration,
    pub brute_step: u8,
    pub brute_settle: Duration,
    pub result_display: Duration,

    pub frame: Duration,
    pub blessing_rotation: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            boot_line: Duration::from_millis(100),
            intro_char: Duration::from_millis(30),
            scan_tick: Duration::from_millis(40),
            scan_step: 2,
            scan_scrambles: 30,
            scan_settle: Duration::from_millis(500),
            brute_tick: Duration::from_millis(100),
            brute_step: 5,
            brute_settle: Duration::from_millis(800),
            result_display: Duration::from_millis(2500),
            frame: Duration::from_millis(35),
            blessing_rotation: Duration::from_secs(4),
        }
    }
}
