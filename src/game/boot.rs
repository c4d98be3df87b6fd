//! Boot sequence and intro typewriter

use super::{router, Command, LogLevel, QuizState, Screen, Step, Timings, Tone};
use crate::data::{BOOT_CONTINUE_PROMPT, BOOT_LINES, INTRO_MESSAGE};
use chrono::Local;
use tracing::{debug, info};

/// Where the boot sequence is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootPhase {
    Idle,
    /// Index of the next line to reveal
    Revealing(usize),
    AwaitingContinue,
    Done,
}

/// Reveals a text one character per tick
#[derive(Debug, Clone)]
pub struct Typewriter {
    chars: Vec<char>,
    shown: usize,
}

impl Typewriter {
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            shown: 0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.shown >= self.chars.len()
    }

    pub fn text(&self) -> String {
        self.chars[..self.shown].iter().collect()
    }

    /// Reveal one more character
    pub fn tick(&mut self, delay: std::time::Duration) -> Step {
        if self.is_finished() {
            return Step::none();
        }
        let typed = self.chars[self.shown];
        self.shown += 1;

        let mut commands = vec![Command::SetIntroText(self.text())];
        if typed != '\n' {
            commands.push(Command::PlayTone(Tone::Type));
        }
        if self.is_finished() {
            Step::idle(commands)
        } else {
            Step::after(commands, delay)
        }
    }
}

/// Plays the boot log, waits for a key, then types out the intro
#[derive(Debug, Clone)]
pub struct BootSequencer {
    phase: BootPhase,
    lines: Vec<String>,
    intro: Typewriter,
    timings: Timings,
}

impl BootSequencer {
    pub fn new(timings: Timings) -> Self {
        Self::with_script(&BOOT_LINES, INTRO_MESSAGE, timings)
    }

    pub fn with_script(lines: &[&str], intro: &str, timings: Timings) -> Self {
        Self {
            phase: BootPhase::Idle,
            lines: lines.iter().map(|l| l.to_string()).collect(),
            intro: Typewriter::new(intro),
            timings,
        }
    }

    pub fn phase(&self) -> BootPhase {
        self.phase
    }

    pub fn intro(&self) -> &Typewriter {
        &self.intro
    }

    /// Begin revealing. Only the first call does anything.
    pub fn start(&mut self) -> Step {
        if self.phase != BootPhase::Idle {
            return Step::none();
        }
        info!(lines = self.lines.len(), "boot sequence started");
        self.phase = BootPhase::Revealing(0);
        let opening = Step::idle(vec![Command::log(
            "BOOT",
            "Initializing system...",
            LogLevel::Success,
        )]);
        opening.then(self.reveal_next())
    }

    /// Timer wake: next boot line, or next intro character once done
    pub fn on_timer(&mut self) -> Step {
        match self.phase {
            BootPhase::Revealing(_) => self.reveal_next(),
            BootPhase::Done => self.intro.tick(self.timings.intro_char),
            BootPhase::Idle | BootPhase::AwaitingContinue => Step::none(),
        }
    }

    /// Any user action. Honored only while waiting for it.
    pub fn on_continue(&mut self, state: &mut QuizState) -> Step {
        if self.phase != BootPhase::AwaitingContinue {
            debug!(phase = ?self.phase, "continue ignored");
            return Step::none();
        }
        self.phase = BootPhase::Done;
        info!("boot complete");

        let mut commands = router::show(state, Screen::Intro);
        commands.push(Command::SetIntroText(String::new()));
        commands.push(Command::StartAmbient);
        Step::idle(commands).then(self.intro.tick(self.timings.intro_char))
    }

    fn reveal_next(&mut self) -> Step {
        let BootPhase::Revealing(index) = self.phase else {
            return Step::none();
        };

        if index >= self.lines.len() {
            self.phase = BootPhase::AwaitingContinue;
            return Step::idle(vec![Command::SetBootStatus(BOOT_CONTINUE_PROMPT.to_string())]);
        }

        let stamp = Local::now().format("%H:%M:%S");
        let progress = ((index + 1) * 100 / self.lines.len()) as u8;
        self.phase = BootPhase::Revealing(index + 1);
        Step::after(
            vec![
                Command::AppendBootLine(format!("[{}] {}", stamp, self.lines[index])),
                Command::SetBootProgress(progress),
                Command::PlayTone(Tone::Type),
            ],
            self.timings.boot_line,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(boot: &mut BootSequencer, first: Step) -> Vec<Command> {
        let mut all = first.commands;
        let mut wake = first.wake;
        while wake.is_some() {
            let step = boot.on_timer();
            all.extend(step.commands);
            wake = step.wake;
        }
        all
    }

    #[test]
    fn reveals_every_line_then_waits() {
        let mut boot = BootSequencer::new(Timings::default());
        let first = boot.start();
        let commands = drain(&mut boot, first);

        let lines: Vec<_> = commands
            .iter()
            .filter_map(|c| match c {
                Command::AppendBootLine(line) => Some(line.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(lines.len(), BOOT_LINES.len());
        assert!(lines[0].ends_with("] BIOS_DATE: 06/19/2007 00:00:00"));
        assert!(commands.contains(&Command::SetBootProgress(100)));
        assert_eq!(
            commands.last(),
            Some(&Command::SetBootStatus(BOOT_CONTINUE_PROMPT.to_string()))
        );
        assert_eq!(boot.phase(), BootPhase::AwaitingContinue);
    }

    #[test]
    fn progress_is_proportional_to_lines_shown() {
        let mut boot = BootSequencer::with_script(&["a", "b", "c", "d"], "", Timings::default());
        let first = boot.start();
        let progress: Vec<_> = drain(&mut boot, first)
            .into_iter()
            .filter_map(|c| match c {
                Command::SetBootProgress(p) => Some(p),
                _ => None,
            })
            .collect();
        assert_eq!(progress, vec![25, 50, 75, 100]);
    }

    #[test]
    fn continue_before_ready_is_ignored() {
        let mut state = QuizState::default();
        let mut boot = BootSequencer::new(Timings::default());
        assert!(boot.on_continue(&mut state).is_empty());
        boot.start();
        assert!(boot.on_continue(&mut state).is_empty());
        assert_eq!(state.screen, Screen::Boot);
    }

    #[test]
    fn continue_shows_intro_and_types_it_out() {
        let mut state = QuizState::default();
        let mut boot = BootSequencer::with_script(&["x"], "HI\nX", Timings::default());
        let first = boot.start();
        drain(&mut boot, first);

        let step = boot.on_continue(&mut state);
        assert_eq!(state.screen, Screen::Intro);
        assert!(step.commands.contains(&Command::StartAmbient));
        assert!(step.commands.contains(&Command::SetIntroText("H".to_string())));

        let typed = drain(&mut boot, Step::after(Vec::new(), Timings::default().intro_char));
        let tones = typed
            .iter()
            .filter(|c| **c == Command::PlayTone(Tone::Type))
            .count();
        assert_eq!(tones, 2, "newline is typed silently");
        assert_eq!(boot.intro().text(), "HI\nX");
        assert!(boot.intro().is_finished());

        assert!(boot.on_continue(&mut state).is_empty());
    }
}
