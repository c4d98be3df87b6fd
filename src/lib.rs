//! Mainframe Protocol: a birthday quiz dressed up as a mainframe breach
//!
//! The recipient boots a fake mainframe, passes a biometric scan, and
//! breaks through four firewalls by answering questions. Breaching the
//! last one starts the celebration.
//!
//! # Flow
//!
//! boot → intro → scan → four questions (brute-force, result) → celebration
//!
//! # Architecture
//!
//! - `data` - Question bank and scripted text
//! - `game` - Pure state machines: matcher, router, boot, scan, quiz, session
//! - `tui` - Terminal rendering, audio and decorative effects with ratatui

pub mod data;
pub mod game;
pub mod tui;

pub use data::*;
pub use game::Session;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type for the application
pub type Result<T> = anyhow::Result<T>;

/// Recoverable faults. Every one of these is logged and the operation
/// that raised it becomes a no-op.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MainframeError {
    #[error("Render target missing: {0}")]
    MissingRenderTarget(tui::stage::Element),

    #[error("Unknown screen: {0}")]
    UnknownScreen(String),
}
