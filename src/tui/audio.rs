//! Sound collaborator
//!
//! A terminal cannot synthesize pads and arpeggios, so the
//! bell stands in for the cues that matter and everything else is a
//! silent no-op. Nothing plays until [`Audio::init`] runs on the first
//! key press.

use crate::game::Tone;
use std::io::Write;
use tracing::{debug, warn};

/// Which background loop is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ambient {
    Off,
    Cyber,
    Peace,
}

pub trait Audio {
    fn init(&mut self);
    fn is_initialized(&self) -> bool;
    fn play_tone(&mut self, tone: Tone);
    fn start_ambient(&mut self);
    fn start_celebration_ambient(&mut self);
}

/// Rings the terminal bell on results and unlocks
pub struct TerminalBell<W: Write> {
    out: W,
    initialized: bool,
    ambient: Ambient,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            initialized: false,
            ambient: Ambient::Off,
        }
    }

    pub fn ambient(&self) -> Ambient {
        self.ambient
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn bell(&mut self, times: usize) {
        let rung = (0..times).try_for_each(|_| self.out.write_all(b"\x07"));
        if let Err(err) = rung.and_then(|_| self.out.flush()) {
            warn!(%err, "terminal bell failed");
        }
    }
}

impl<W: Write> Audio for TerminalBell<W> {
    fn init(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;
        debug!("audio subsystems online");
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn play_tone(&mut self, tone: Tone) {
        if !self.initialized {
            return;
        }
        match tone {
            Tone::Success | Tone::Unlock => self.bell(1),
            Tone::Denied => self.bell(2),
            Tone::Hover | Tone::Click | Tone::Type | Tone::Scan | Tone::Brute => {}
        }
    }

    fn start_ambient(&mut self) {
        if self.initialized {
            self.ambient = Ambient::Cyber;
        }
    }

    fn start_celebration_ambient(&mut self) {
        if self.initialized {
            self.ambient = Ambient::Peace;
        }
    }
}

/// Discards everything
#[derive(Debug, Default)]
pub struct Silent {
    initialized: bool,
}

impl Audio for Silent {
    fn init(&mut self) {
        self.initialized = true;
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn play_tone(&mut self, _tone: Tone) {}

    fn start_ambient(&mut self) {}

    fn start_celebration_ambient(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_until_initialized() {
        let mut audio = TerminalBell::new(Vec::new());
        audio.play_tone(Tone::Success);
        audio.start_ambient();
        assert_eq!(audio.ambient(), Ambient::Off);
        assert!(audio.into_inner().is_empty());
    }

    #[test]
    fn bells_on_results_only() {
        let mut audio = TerminalBell::new(Vec::new());
        audio.init();
        audio.play_tone(Tone::Type);
        audio.play_tone(Tone::Brute);
        audio.play_tone(Tone::Success);
        audio.play_tone(Tone::Denied);
        assert_eq!(audio.into_inner(), b"\x07\x07\x07".to_vec());
    }

    #[test]
    fn celebration_switches_ambient() {
        let mut audio = TerminalBell::new(Vec::new());
        audio.init();
        audio.start_ambient();
        assert_eq!(audio.ambient(), Ambient::Cyber);
        audio.start_celebration_ambient();
        assert_eq!(audio.ambient(), Ambient::Peace);
    }
}
