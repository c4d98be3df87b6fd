//! Data structures for the mainframe
//!
//! Defines questions, the question bank, and the scripted text the
//! sequences reveal.

pub mod questions;
pub mod script;

pub use questions::*;
pub use script::*;

use serde::{Deserialize, Serialize};

/// One firewall question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Display id, e.g. `Q.01`
    pub id: String,

    /// Prompt shown to the player
    pub text: String,

    /// Accepted answers as literally written. Matching normalizes both
    /// sides, so entries differing only by case or padding are redundant.
    pub answers: Vec<String>,

    /// Icon shown on the result overlay when this question is breached
    pub icon: String,

    /// A distinguished wrong answer with its own denial
    pub special_wrong: Option<SpecialWrong>,
}

/// A wrong answer that earns a custom denial instead of `ACCESS_DENIED`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialWrong {
    pub triggers: Vec<String>,
    pub message: String,
    pub icon: String,
}

impl Question {
    pub fn new(id: &str, text: &str, answers: &[&str], icon: &str) -> Self {
        Self {
            id: id.to_string(),
            text: text.to_string(),
            answers: answers.iter().map(|a| a.to_string()).collect(),
            icon: icon.to_string(),
            special_wrong: None,
        }
    }

    pub fn with_special_wrong(mut self, triggers: &[&str], message: &str, icon: &str) -> Self {
        self.special_wrong = Some(SpecialWrong {
            triggers: triggers.iter().map(|t| t.to_string()).collect(),
            message: message.to_string(),
            icon: icon.to_string(),
        });
        self
    }
}

/// State of one firewall slot in the breach-progress indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotState {
    Breached,
    Active,
    Locked,
}

impl SlotState {
    /// Slot state for `slot` while question `current` is being presented
    pub fn for_slot(slot: usize, current: usize) -> Self {
        match slot {
            s if s < current => SlotState::Breached,
            s if s == current => SlotState::Active,
            _ => SlotState::Locked,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            SlotState::Breached => "◆",
            SlotState::Active => "▶",
            SlotState::Locked => "■",
        }
    }
}

impl std::fmt::Display for SlotState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotState::Breached => write!(f, "BREACHED"),
            SlotState::Active => write!(f, "ACTIVE"),
            SlotState::Locked => write!(f, "LOCKED"),
        }
    }
}

/// Label of firewall slot `slot` (zero-based), e.g. `FW_01 [ACTIVE]`
pub fn firewall_label(slot: usize, state: SlotState) -> String {
    format!("FW_0{} [{}]", slot + 1, state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_before_current_are_breached() {
        let states: Vec<_> = (0..4).map(|s| SlotState::for_slot(s, 2)).collect();
        assert_eq!(
            states,
            vec![SlotState::Breached, SlotState::Breached, SlotState::Active, SlotState::Locked]
        );
    }

    #[test]
    fn firewall_labels_are_one_based() {
        assert_eq!(firewall_label(0, SlotState::Active), "FW_01 [ACTIVE]");
        assert_eq!(firewall_label(3, SlotState::Locked), "FW_04 [LOCKED]");
    }
}
