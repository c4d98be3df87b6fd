//! Main application state and rendering

use crate::data::QuestionBank;
use crate::game::{Command, Event, LogLevel, Screen, Session, Step, Timings, Verdict};
use crate::tui::audio::{Audio, TerminalBell};
use crate::tui::effects::{Backdrop, CelebrationScene};
use crate::tui::stage::Stage;
use crate::tui::widgets::{DramaticBox, FirewallNode, ProgressBar};
use crate::tui::{centered_rect, create_content_layout, create_main_layout, slot_color, styled_block, Theme};
use crate::tui::{BOOT_HINT, INTRO_HINT, LOGO, QUESTION_HINT, SMALL_LOGO};
use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Points},
        Block, Borders, Clear, Paragraph, Wrap,
    },
    Frame,
};
use std::f64::consts::{FRAC_PI_2, TAU};
use std::time::Instant;
use tracing::{info, warn};

const RING_POINTS: usize = 120;
const BLINK_FRAMES: u64 = 14;

/// Application state
pub struct App {
    pub session: Session,
    pub stage: Stage,
    pub theme: Theme,
    pub running: bool,
    audio: Box<dyn Audio>,
    backdrop: Backdrop,
    celebration: Option<CelebrationScene>,
    timings: Timings,
    wake_at: Option<Instant>,
    last_frame: Instant,
    frames: u64,
}

impl App {
    pub fn new() -> Self {
        let timings = Timings::default();
        Self::with_parts(
            Session::new(QuestionBank::default(), timings.clone()),
            Box::new(TerminalBell::new(std::io::stdout())),
            timings,
        )
    }

    pub fn with_parts(session: Session, audio: Box<dyn Audio>, timings: Timings) -> Self {
        Self {
            session,
            stage: Stage::default(),
            theme: Theme::default(),
            running: true,
            audio,
            backdrop: Backdrop::new(timings.frame),
            celebration: None,
            timings,
            wake_at: None,
            last_frame: Instant::now(),
            frames: 0,
        }
    }

    /// Begin the boot sequence
    pub fn start(&mut self) {
        info!("mainframe v{} starting", crate::VERSION);
        let step = self.session.start();
        self.apply(step, Instant::now());
    }

    /// When the session next wants a timer event
    pub fn wake_at(&self) -> Option<Instant> {
        self.wake_at
    }

    pub fn is_celebrating(&self) -> bool {
        self.celebration.is_some()
    }

    /// Wait for a key or the next deadline, whichever comes first
    pub fn handle_input(&mut self) -> std::io::Result<bool> {
        let now = Instant::now();
        let mut timeout = self.timings.frame;
        if let Some(at) = self.wake_at {
            timeout = timeout.min(at.saturating_duration_since(now));
        }

        if event::poll(timeout)? {
            if let TermEvent::Key(key) = event::read()? {
                self.handle_key(key);
            }
        }

        self.fire_due_timer(Instant::now());
        Ok(self.running)
    }

    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        let ctrl_c = key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
        if key.code == KeyCode::Esc || ctrl_c {
            info!("quit requested");
            self.running = false;
            return;
        }

        // The first interaction unlocks audio
        self.audio.init();

        match self.session.screen() {
            Screen::Boot => self.dispatch(Event::Continue),
            Screen::Intro => {
                if key.code == KeyCode::Enter {
                    self.dispatch(Event::Start);
                }
            }
            Screen::Question if self.session.accepts_answer_input() => match key.code {
                KeyCode::Enter => {
                    let answer = self.stage.input.value.clone();
                    self.dispatch(Event::Submit(answer));
                }
                KeyCode::Backspace => self.stage.input.pop(),
                KeyCode::Char(c) => {
                    if self.stage.input.push(c) {
                        self.dispatch(Event::Keystroke);
                    }
                }
                _ => {}
            },
            Screen::Scan | Screen::Question | Screen::Celebration => {}
        }
    }

    pub fn dispatch(&mut self, event: Event) {
        let step = self.session.handle(event);
        self.apply(step, Instant::now());
    }

    /// Deliver the pending timer event if its deadline has passed
    pub fn fire_due_timer(&mut self, now: Instant) {
        let Some(at) = self.wake_at else {
            return;
        };
        if now < at {
            return;
        }
        self.wake_at = None;
        let step = self.session.handle(Event::Timer);
        // Chain from the deadline so long frames do not stretch sequences
        self.apply(step, at);
    }

    fn apply(&mut self, step: Step, base: Instant) {
        for command in &step.commands {
            match command {
                Command::PlayTone(tone) => self.audio.play_tone(*tone),
                Command::StartAmbient => self.audio.start_ambient(),
                Command::StartCelebrationAmbient => self.audio.start_celebration_ambient(),
                Command::StartCelebration => {
                    if self.celebration.is_none() {
                        self.celebration = Some(CelebrationScene::new(
                            self.timings.frame,
                            self.timings.blessing_rotation,
                        ));
                    }
                }
                Command::Log { kind, message, .. } => info!(kind, "{}", message),
                _ => {}
            }
            if let Err(err) = self.stage.apply(command) {
                warn!(%err, "render command dropped");
            }
        }
        if let Some(delay) = step.wake {
            self.wake_at = Some(base + delay);
        }
    }

    fn advance_effects(&mut self, area: Rect) {
        let now = Instant::now();
        let dt = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        self.frames += 1;

        self.stage.on_frame();
        match self.celebration.as_mut() {
            Some(scene) => scene.update(dt),
            None => self.backdrop.update(area, dt),
        }
    }

    fn blink_on(&self) -> bool {
        (self.frames / BLINK_FRAMES) % 2 == 0
    }

    /// Render the UI
    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        self.advance_effects(area);

        frame.render_widget(Clear, area);
        frame.render_widget(Block::default().style(Style::default().bg(self.theme.bg)), area);
        if self.stage.screen != Screen::Celebration {
            frame.render_widget(&self.backdrop, area);
        }

        match self.stage.screen {
            Screen::Boot => self.render_boot(frame),
            Screen::Intro => self.render_intro(frame),
            Screen::Scan => self.render_scan(frame),
            Screen::Question => self.render_question(frame),
            Screen::Celebration => self.render_celebration(frame),
        }

        if self.stage.brute.is_some() {
            self.render_brute_overlay(frame);
        }
        if self.stage.result.is_some() {
            self.render_result_overlay(frame);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, subtitle: &str) {
        let header = Paragraph::new(Line::from(vec![
            Span::styled(SMALL_LOGO, Style::default().fg(self.theme.bg).bg(self.theme.fg).add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(subtitle.to_string(), Style::default().fg(self.theme.accent)),
        ]))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(self.theme.border)));
        frame.render_widget(header, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect, hint: &str) {
        let status = Paragraph::new(hint.to_string())
            .style(Style::default().fg(self.theme.dim))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::TOP).border_style(Style::default().fg(self.theme.border)));
        frame.render_widget(status, area);
    }

    fn render_boot(&self, frame: &mut Frame) {
        let chunks = create_main_layout(frame.area());
        self.render_header(frame, chunks[0], "BOOT SEQUENCE");

        let body = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Min(3),      // Boot log
                Constraint::Length(2),   // Progress
                Constraint::Length(1),   // Status
            ])
            .split(chunks[1]);

        let visible = body[0].height.saturating_sub(2) as usize;
        let skip = self.stage.boot_lines.len().saturating_sub(visible);
        let lines: Vec<Line> = self.stage.boot_lines[skip..]
            .iter()
            .map(|line| Line::styled(line.clone(), Style::default().fg(self.theme.fg)))
            .collect();
        let log = Paragraph::new(lines).block(styled_block("mainframe://boot", &self.theme));
        frame.render_widget(Clear, body[0]);
        frame.render_widget(log, body[0]);

        frame.render_widget(
            ProgressBar::new("LOADING", self.stage.boot_progress)
                .color(self.theme.fg)
                .track(self.theme.dim),
            body[1],
        );

        if !self.stage.boot_status.is_empty() && self.blink_on() {
            let status = Paragraph::new(self.stage.boot_status.clone())
                .style(Style::default().fg(self.theme.accent).add_modifier(Modifier::BOLD))
                .alignment(Alignment::Center);
            frame.render_widget(status, body[2]);
        }

        self.render_status_bar(frame, chunks[2], BOOT_HINT);
    }

    fn render_intro(&self, frame: &mut Frame) {
        let area = frame.area();
        let logo_height = LOGO.lines().count() as u16;
        let logo_width = LOGO.lines().map(|l| l.chars().count()).max().unwrap_or(0) as u16;
        let text_height = self.stage.intro_text.lines().count().max(5) as u16 + 2;
        let show_logo = area.height >= logo_height + text_height + 4 && area.width >= logo_width;

        let mut constraints = Vec::new();
        if show_logo {
            constraints.push(Constraint::Length(logo_height));
        }
        constraints.push(Constraint::Length(text_height));
        constraints.push(Constraint::Length(2));
        let total: u16 = (if show_logo { logo_height } else { 0 }) + text_height + 2;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(centered_rect(area, area.width, total));

        let mut index = 0;
        if show_logo {
            let logo = Paragraph::new(LOGO)
                .style(Style::default().fg(self.theme.fg))
                .alignment(Alignment::Center);
            frame.render_widget(logo, chunks[0]);
            index = 1;
        }

        let box_area = centered_rect(chunks[index], 56, text_height);
        let message = Paragraph::new(self.stage.intro_text.clone())
            .style(Style::default().fg(self.theme.fg))
            .wrap(Wrap { trim: false })
            .block(styled_block("INCOMING TRANSMISSION", &self.theme));
        frame.render_widget(Clear, box_area);
        frame.render_widget(message, box_area);

        if self.blink_on() {
            let prompt = Paragraph::new("[ PRESS ENTER TO INITIATE SCAN ]")
                .style(Style::default().fg(self.theme.accent).add_modifier(Modifier::BOLD))
                .alignment(Alignment::Center);
            frame.render_widget(prompt, chunks[index + 1]);
        }

        let hint = Paragraph::new(INTRO_HINT)
            .style(Style::default().fg(self.theme.dim))
            .alignment(Alignment::Center);
        frame.render_widget(hint, Rect::new(area.x, area.bottom().saturating_sub(1), area.width, 1));
    }

    fn render_scan(&self, frame: &mut Frame) {
        let area = centered_rect(frame.area(), 72, 22);
        frame.render_widget(Clear, area);
        let block = styled_block("BIOMETRIC SCAN", &self.theme);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(8),      // Ring
                Constraint::Length(1),   // Percent
                Constraint::Length(3),   // Hash
            ])
            .split(inner);

        // Ring fills clockwise from the top
        let lit = RING_POINTS * self.stage.scan_progress as usize / 100;
        let ring: Vec<(f64, f64)> = (0..RING_POINTS)
            .map(|i| {
                let angle = FRAC_PI_2 - TAU * i as f64 / RING_POINTS as f64;
                (angle.cos() * 10.0, angle.sin() * 10.0)
            })
            .collect();
        let (filled, empty) = ring.split_at(lit);
        let ring_area = centered_rect(chunks[0], chunks[0].height.saturating_mul(2).max(8), chunks[0].height);
        let canvas = Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([-12.0, 12.0])
            .y_bounds([-12.0, 12.0])
            .paint(|ctx| {
                ctx.draw(&Points { coords: empty, color: self.theme.dim });
                ctx.draw(&Points { coords: filled, color: self.theme.accent });
            });
        frame.render_widget(canvas, ring_area);

        let percent = Paragraph::new(format!("{}%", self.stage.scan_progress))
            .style(Style::default().fg(self.theme.fg).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center);
        frame.render_widget(percent, chunks[1]);

        let hash = Paragraph::new(self.stage.scan_hash.clone())
            .style(Style::default().fg(self.theme.dim))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(hash, chunks[2]);
    }

    fn render_question(&self, frame: &mut Frame) {
        let chunks = create_main_layout(frame.area());
        self.render_header(frame, chunks[0], "FIREWALL BREACH IN PROGRESS");

        let content = create_content_layout(chunks[1]);
        self.render_side_panel(frame, content[0]);
        self.render_question_box(frame, content[1]);

        self.render_status_bar(frame, chunks[2], QUESTION_HINT);
    }

    fn render_side_panel(&self, frame: &mut Frame, area: Rect) {
        let slots_height = self.stage.firewall.len() as u16 + 2;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(slots_height), Constraint::Min(3)])
            .split(area);

        let block = styled_block("Firewalls", &self.theme);
        let inner = block.inner(chunks[0]);
        frame.render_widget(Clear, chunks[0]);
        frame.render_widget(block, chunks[0]);
        for (slot, state) in self.stage.firewall.iter().enumerate() {
            let row = Rect::new(inner.x, inner.y + slot as u16, inner.width, 1);
            if row.bottom() > inner.bottom() {
                break;
            }
            frame.render_widget(
                FirewallNode::new(slot, *state).color(slot_color(state, &self.theme)),
                row,
            );
        }

        self.render_system_log(frame, chunks[1]);
    }

    fn render_system_log(&self, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = self
            .stage
            .system_log
            .iter()
            .map(|entry| {
                let color = match entry.level {
                    LogLevel::Success => self.theme.success,
                    LogLevel::Error => self.theme.alert,
                    LogLevel::Normal => self.theme.dim,
                };
                Line::styled(entry.text.clone(), Style::default().fg(color))
            })
            .collect();
        let log = Paragraph::new(lines).block(styled_block("System Log", &self.theme));
        frame.render_widget(Clear, area);
        frame.render_widget(log, area);
    }

    fn render_question_box(&self, frame: &mut Frame, area: Rect) {
        let offset = self.stage.shake_offset();
        let shifted = Rect {
            x: area.x.saturating_add_signed(offset),
            ..area
        }
        .intersection(frame.area());

        let border = if offset != 0 { self.theme.alert } else { self.theme.border };
        let block = Block::default()
            .title(format!(" {} ", self.stage.question_id))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title_style(Style::default().fg(self.theme.accent).add_modifier(Modifier::BOLD));
        let inner = block.inner(shifted);
        frame.render_widget(Clear, shifted);
        frame.render_widget(block, shifted);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Min(3),      // Question text
                Constraint::Length(3),   // Input
                Constraint::Length(1),   // Feedback
            ])
            .split(inner);

        let question = Paragraph::new(self.stage.question_text.clone())
            .style(Style::default().fg(self.theme.fg).add_modifier(Modifier::BOLD))
            .wrap(Wrap { trim: true });
        frame.render_widget(question, chunks[0]);

        let input_style = if self.stage.input.enabled {
            Style::default().fg(self.theme.accent)
        } else {
            Style::default().fg(self.theme.dim)
        };
        let input = Paragraph::new(format!("> {}", self.stage.input.value))
            .style(input_style)
            .block(Block::default().borders(Borders::ALL).border_style(input_style).title(" ANSWER "));
        frame.render_widget(input, chunks[1]);

        if self.stage.input.enabled && self.stage.input.focused {
            let typed = self.stage.input.value.chars().count() as u16;
            let x = (chunks[1].x + 3 + typed).min(chunks[1].right().saturating_sub(2));
            frame.set_cursor_position((x, chunks[1].y + 1));
        }

        if !self.stage.feedback.is_empty() {
            let feedback = Paragraph::new(self.stage.feedback.clone())
                .style(Style::default().fg(self.theme.alert));
            frame.render_widget(feedback, chunks[2]);
        }
    }

    fn render_brute_overlay(&self, frame: &mut Frame) {
        let Some(brute) = &self.stage.brute else {
            return;
        };
        let area = centered_rect(frame.area(), 70, 18);
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(" BRUTE_FORCE.EXE ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.fg));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),      // Stream
                Constraint::Length(2),   // Progress
                Constraint::Length(1),   // Status
            ])
            .split(inner);

        let visible = chunks[0].height as usize;
        let skip = brute.lines.len().saturating_sub(visible);
        let lines: Vec<Line> = brute.lines[skip..]
            .iter()
            .map(|(text, verdict)| {
                let color = match verdict {
                    Verdict::Fail => self.theme.alert,
                    Verdict::Checking => self.theme.fg,
                    Verdict::Match => self.theme.accent,
                };
                Line::styled(text.clone(), Style::default().fg(color))
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), chunks[0]);

        frame.render_widget(
            ProgressBar::new("DECRYPTING", brute.progress)
                .color(self.theme.fg)
                .track(self.theme.dim),
            chunks[1],
        );

        let status_color = if brute.status.contains("FAIL") { self.theme.alert } else { self.theme.accent };
        let status = Paragraph::new(brute.status.clone())
            .style(Style::default().fg(status_color).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center);
        frame.render_widget(status, chunks[2]);
    }

    fn render_result_overlay(&self, frame: &mut Frame) {
        let Some(result) = &self.stage.result else {
            return;
        };
        let area = centered_rect(frame.area(), 44, 9);
        frame.render_widget(Clear, area);

        let color = if result.denied { self.theme.alert } else { self.theme.accent };
        let title = if result.denied { "INTRUSION BLOCKED" } else { "FIREWALL DOWN" };
        frame.render_widget(
            DramaticBox::new(title)
                .border_color(color)
                .text_color(color)
                .content(vec![
                    String::new(),
                    result.icon.clone(),
                    String::new(),
                    result.message.clone(),
                ]),
            area,
        );
    }

    fn render_celebration(&self, frame: &mut Frame) {
        let area = frame.area();
        if let Some(scene) = &self.celebration {
            frame.render_widget(scene, area);
        }

        let banner = centered_rect(area, 60, 7);
        let blessing = self
            .celebration
            .as_ref()
            .map(|scene| scene.blessing())
            .unwrap_or_default();
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "ALL FIREWALLS BREACHED",
                Style::default().fg(self.theme.accent).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "HAPPY BIRTHDAY, SHINZO!",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(blessing, Style::default().fg(self.theme.highlight))),
        ];
        let card = Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(self.theme.highlight)));
        frame.render_widget(Clear, banner);
        frame.render_widget(card, banner);
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::audio::Silent;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use ratatui::{backend::TestBackend, Terminal};

    fn app() -> App {
        let timings = Timings::default();
        let session = Session::with_rng(QuestionBank::default(), timings.clone(), StdRng::seed_from_u64(3));
        let mut app = App::with_parts(session, Box::new(Silent::default()), timings);
        app.start();
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn run_timers(app: &mut App) {
        while let Some(at) = app.wake_at() {
            app.fire_due_timer(at);
        }
    }

    fn draw(app: &mut App) {
        let mut terminal = Terminal::new(TestBackend::new(100, 36)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
    }

    fn to_question(app: &mut App) {
        run_timers(app);
        press(app, KeyCode::Char('x'));
        run_timers(app);
        press(app, KeyCode::Enter);
        run_timers(app);
    }

    #[test]
    fn keys_drive_the_session_to_the_quiz() {
        let mut app = app();
        draw(&mut app);
        to_question(&mut app);
        assert_eq!(app.stage.screen, Screen::Question);
        assert_eq!(app.stage.question_id, "Q.01");
        assert!(app.stage.input.enabled);
        draw(&mut app);
    }

    #[test]
    fn typed_answer_is_submitted_and_cleared() {
        let mut app = app();
        to_question(&mut app);
        type_text(&mut app, "19 june 2007");
        assert_eq!(app.stage.input.value, "19 june 2007");
        press(&mut app, KeyCode::Enter);
        assert!(app.stage.brute.is_some());
        assert!(!app.stage.input.enabled);
        draw(&mut app);

        run_timers(&mut app);
        assert_eq!(app.stage.question_id, "Q.02");
        assert_eq!(app.stage.input.value, "");
    }

    #[test]
    fn backspace_edits_the_answer() {
        let mut app = app();
        to_question(&mut app);
        type_text(&mut app, "bamboq");
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.stage.input.value, "bambo");
    }

    #[test]
    fn blank_enter_does_nothing() {
        let mut app = app();
        to_question(&mut app);
        press(&mut app, KeyCode::Enter);
        assert!(app.stage.brute.is_none());
        assert!(app.wake_at().is_none());
    }

    #[test]
    fn full_run_reaches_the_celebration() {
        let mut app = app();
        to_question(&mut app);
        for answer in ["19/6/2007", "Bamboo Shoots", "seventy-three", " AYAN "] {
            type_text(&mut app, answer);
            press(&mut app, KeyCode::Enter);
            run_timers(&mut app);
        }
        assert_eq!(app.stage.screen, Screen::Celebration);
        assert!(app.is_celebrating());
        draw(&mut app);
    }

    #[test]
    fn escape_stops_the_app() {
        let mut app = app();
        press(&mut app, KeyCode::Esc);
        assert!(!app.running);
    }
}
