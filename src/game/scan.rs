//! Biometric scan between the intro and the first firewall

use super::{router, Command, QuizState, Screen, Step, Timings, Tone};
use crate::data::random_hex;
use rand::rngs::StdRng;
use tracing::info;

const HASH_DIGITS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    Idle,
    Scanning { progress: u8, scrambles: u32 },
    Settling,
    Done,
}

/// Ring fills 0 to 100 while the hash scrambles, then settles
#[derive(Debug, Clone)]
pub struct ScanSequence {
    phase: ScanPhase,
    final_hash: String,
    timings: Timings,
    rng: StdRng,
}

impl ScanSequence {
    pub fn new(timings: Timings, mut rng: StdRng) -> Self {
        let final_hash = random_hex(&mut rng, HASH_DIGITS);
        Self {
            phase: ScanPhase::Idle,
            final_hash,
            timings,
            rng,
        }
    }

    pub fn phase(&self) -> ScanPhase {
        self.phase
    }

    pub fn is_done(&self) -> bool {
        self.phase == ScanPhase::Done
    }

    pub fn final_hash(&self) -> &str {
        &self.final_hash
    }

    /// The start action on the intro screen. Honored once.
    pub fn start(&mut self, state: &mut QuizState) -> Step {
        if self.phase != ScanPhase::Idle {
            return Step::none();
        }
        info!("biometric scan started");
        self.phase = ScanPhase::Scanning {
            progress: 0,
            scrambles: 0,
        };

        let mut commands = vec![Command::PlayTone(Tone::Click)];
        commands.extend(router::show(state, Screen::Scan));
        commands.push(Command::PlayTone(Tone::Scan));
        commands.push(Command::SetScanProgress(0));
        commands.push(Command::SetScanHash(random_hex(&mut self.rng, HASH_DIGITS)));
        Step::after(commands, self.timings.scan_tick)
    }

    pub fn on_timer(&mut self) -> Step {
        match self.phase {
            ScanPhase::Scanning {
                progress,
                scrambles,
            } => {
                let progress = progress.saturating_add(self.timings.scan_step).min(100);
                let scrambles = scrambles + 1;
                let mut commands = vec![Command::SetScanProgress(progress)];
                if scrambles < self.timings.scan_scrambles {
                    commands.push(Command::SetScanHash(random_hex(&mut self.rng, HASH_DIGITS)));
                } else if scrambles == self.timings.scan_scrambles {
                    commands.push(Command::SetScanHash(self.final_hash.clone()));
                }

                if progress >= 100 {
                    if scrambles < self.timings.scan_scrambles {
                        commands.push(Command::SetScanHash(self.final_hash.clone()));
                    }
                    self.phase = ScanPhase::Settling;
                    Step::after(commands, self.timings.scan_settle)
                } else {
                    self.phase = ScanPhase::Scanning {
                        progress,
                        scrambles,
                    };
                    Step::after(commands, self.timings.scan_tick)
                }
            }
            ScanPhase::Settling => {
                info!("biometric scan complete");
                self.phase = ScanPhase::Done;
                Step::none()
            }
            ScanPhase::Idle | ScanPhase::Done => Step::none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn scan() -> ScanSequence {
        ScanSequence::new(Timings::default(), StdRng::seed_from_u64(19))
    }

    #[test]
    fn runs_to_done_and_lands_on_final_hash() {
        let mut state = QuizState::default();
        let mut scan = scan();
        let mut step = scan.start(&mut state);
        assert_eq!(state.screen, Screen::Scan);
        assert_eq!(step.commands[0], Command::PlayTone(Tone::Click));

        let mut hashes = Vec::new();
        let mut progress = Vec::new();
        while step.wake.is_some() {
            step = scan.on_timer();
            for command in &step.commands {
                match command {
                    Command::SetScanHash(hash) => hashes.push(hash.clone()),
                    Command::SetScanProgress(p) => progress.push(*p),
                    _ => {}
                }
            }
        }

        assert!(scan.is_done());
        assert_eq!(progress.len(), 50);
        assert_eq!(progress.last(), Some(&100));
        assert_eq!(hashes.last().map(String::as_str), Some(scan.final_hash()));
        assert_eq!(scan.final_hash().len(), HASH_DIGITS + 2);
    }

    #[test]
    fn start_is_honored_once() {
        let mut state = QuizState::default();
        let mut scan = scan();
        scan.start(&mut state);
        assert!(scan.start(&mut state).is_empty());
    }
}
