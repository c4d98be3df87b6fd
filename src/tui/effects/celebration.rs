//! Finale particle systems: stars, balloons, fireworks, confetti, plus
//! the emoji rain and rotating blessings drawn as text on top

use super::{Ticker, PARTY_COLORS};
use crate::data::{BLESSINGS, CELEBRATION_EMOJIS};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Circle, Line, Points, Rectangle},
        Widget,
    },
};
use std::f64::consts::TAU;
use std::time::Duration;

pub const WORLD_WIDTH: f64 = 100.0;
pub const WORLD_HEIGHT: f64 = 60.0;

const STARS: usize = 50;
const BALLOONS: usize = 25;
const FIREWORK_SPARKS: usize = 50;
const GRAVITY: f64 = 0.01;
const FIREWORK_CHANCE: f64 = 0.05;
const CONFETTI_CHANCE: f64 = 0.1;
const EMOJI_INTERVAL: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
struct Star {
    x: f64,
    y: f64,
    speed: f64,
    brightness: f64,
}

#[derive(Debug, Clone)]
struct Balloon {
    x: f64,
    y: f64,
    size: f64,
    speed: f64,
    wobble: f64,
    color: Color,
}

impl Balloon {
    fn center_x(&self) -> f64 {
        self.x + self.wobble.sin() * 2.0
    }
}

#[derive(Debug, Clone)]
struct Spark {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    life: f64,
    decay: f64,
    color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfettiShape {
    Square,
    Round,
}

#[derive(Debug, Clone)]
struct Confetti {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    size: f64,
    color: Color,
    shape: ConfettiShape,
}

/// One falling emoji, positioned in fractions of the render area
#[derive(Debug, Clone)]
pub struct FallingEmoji {
    pub glyph: &'static str,
    pub column: f64,
    pub age: Duration,
    pub lifetime: Duration,
}

impl FallingEmoji {
    /// Fraction of the fall completed
    pub fn progress(&self) -> f64 {
        (self.age.as_secs_f64() / self.lifetime.as_secs_f64()).min(1.0)
    }
}

pub struct CelebrationScene {
    stars: Vec<Star>,
    balloons: Vec<Balloon>,
    sparks: Vec<Spark>,
    confetti: Vec<Confetti>,
    emojis: Vec<FallingEmoji>,
    since_emoji: Duration,
    elapsed: Duration,
    blessing_rotation: Duration,
    ticker: Ticker,
    rng: StdRng,
}

impl CelebrationScene {
    pub fn new(frame: Duration, blessing_rotation: Duration) -> Self {
        Self::with_rng(frame, blessing_rotation, StdRng::from_entropy())
    }

    pub fn with_rng(frame: Duration, blessing_rotation: Duration, mut rng: StdRng) -> Self {
        let stars = (0..STARS)
            .map(|_| Star {
                x: rng.gen::<f64>() * WORLD_WIDTH,
                y: rng.gen::<f64>() * WORLD_HEIGHT,
                speed: 0.01 + rng.gen::<f64>() * 0.05,
                brightness: rng.gen(),
            })
            .collect();
        let balloons = (0..BALLOONS)
            .map(|_| Balloon {
                x: rng.gen::<f64>() * WORLD_WIDTH,
                y: -rng.gen::<f64>() * 30.0,
                size: 2.0 + rng.gen::<f64>() * 3.0,
                speed: 0.1 + rng.gen::<f64>() * 0.2,
                wobble: rng.gen::<f64>() * TAU,
                color: PARTY_COLORS[rng.gen_range(0..PARTY_COLORS.len())],
            })
            .collect();

        Self {
            stars,
            balloons,
            sparks: Vec::new(),
            confetti: Vec::new(),
            emojis: Vec::new(),
            since_emoji: Duration::ZERO,
            elapsed: Duration::ZERO,
            blessing_rotation,
            ticker: Ticker::new(frame),
            rng,
        }
    }

    /// Blessing currently on screen
    pub fn blessing(&self) -> &'static str {
        if self.blessing_rotation.is_zero() {
            return BLESSINGS[0];
        }
        let turns = self.elapsed.as_millis() / self.blessing_rotation.as_millis();
        BLESSINGS[(turns % BLESSINGS.len() as u128) as usize]
    }

    pub fn emojis(&self) -> &[FallingEmoji] {
        &self.emojis
    }

    pub fn spark_count(&self) -> usize {
        self.sparks.len()
    }

    pub fn update(&mut self, dt: Duration) {
        self.elapsed += dt;
        self.update_emojis(dt);
        for _ in 0..self.ticker.steps(dt) {
            self.step();
        }
    }

    fn update_emojis(&mut self, dt: Duration) {
        for emoji in self.emojis.iter_mut() {
            emoji.age += dt;
        }
        self.emojis.retain(|emoji| emoji.age < emoji.lifetime);

        self.since_emoji += dt;
        while self.since_emoji >= EMOJI_INTERVAL {
            self.since_emoji -= EMOJI_INTERVAL;
            let glyph = CELEBRATION_EMOJIS
                .choose(&mut self.rng)
                .copied()
                .unwrap_or("🎉");
            self.emojis.push(FallingEmoji {
                glyph,
                column: self.rng.gen(),
                age: Duration::ZERO,
                lifetime: Duration::from_millis(self.rng.gen_range(3000..6000)),
            });
        }
    }

    fn step(&mut self) {
        for star in self.stars.iter_mut() {
            star.y += star.speed;
            if star.y > WORLD_HEIGHT {
                star.y = 0.0;
            }
            star.brightness += (self.rng.gen::<f64>() - 0.5) * 0.1;
            star.brightness = star.brightness.clamp(0.3, 1.0);
        }

        for balloon in self.balloons.iter_mut() {
            balloon.y += balloon.speed;
            balloon.wobble += 0.05;
            if balloon.y > WORLD_HEIGHT + 10.0 {
                balloon.y = -10.0;
                balloon.x = self.rng.gen::<f64>() * WORLD_WIDTH;
            }
        }

        if self.rng.gen_bool(FIREWORK_CHANCE) {
            self.launch_firework();
        }
        for spark in self.sparks.iter_mut() {
            spark.x += spark.vx;
            spark.y += spark.vy;
            spark.vy -= GRAVITY;
            spark.life -= spark.decay;
        }
        self.sparks.retain(|spark| spark.life > 0.0);

        if self.rng.gen_bool(CONFETTI_CHANCE) {
            let rng = &mut self.rng;
            self.confetti.push(Confetti {
                x: rng.gen::<f64>() * WORLD_WIDTH,
                y: WORLD_HEIGHT + 1.0,
                vx: (rng.gen::<f64>() - 0.5) * 0.5,
                vy: -(rng.gen::<f64>() * 0.5 + 0.2),
                size: rng.gen::<f64>() * 1.0 + 0.2,
                color: PARTY_COLORS[rng.gen_range(0..PARTY_COLORS.len())],
                shape: if rng.gen_bool(0.5) {
                    ConfettiShape::Square
                } else {
                    ConfettiShape::Round
                },
            });
        }
        for piece in self.confetti.iter_mut() {
            piece.x += piece.vx;
            piece.y += piece.vy;
            piece.vy -= GRAVITY;
        }
        self.confetti.retain(|piece| piece.y > 0.0);
    }

    fn launch_firework(&mut self) {
        let rng = &mut self.rng;
        let x = rng.gen::<f64>() * WORLD_WIDTH;
        let y = WORLD_HEIGHT / 2.0 - rng.gen::<f64>() * WORLD_HEIGHT / 3.0;
        let color = PARTY_COLORS[rng.gen_range(0..PARTY_COLORS.len())];
        for i in 0..FIREWORK_SPARKS {
            let angle = TAU / FIREWORK_SPARKS as f64 * i as f64;
            let velocity = 0.3 + rng.gen::<f64>() * 0.5;
            self.sparks.push(Spark {
                x,
                y,
                vx: angle.cos() * velocity,
                vy: angle.sin() * velocity,
                life: 1.0,
                decay: 0.01 + rng.gen::<f64>() * 0.02,
                color,
            });
        }
    }

    fn render_text(&self, area: Rect, buf: &mut Buffer) {
        for emoji in &self.emojis {
            let x = area.x + (emoji.column * area.width.saturating_sub(2) as f64) as u16;
            let y = area.y + (emoji.progress() * area.height.saturating_sub(1) as f64) as u16;
            buf.set_string(x, y, emoji.glyph, Style::default());
        }
    }
}

impl Widget for &CelebrationScene {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([0.0, WORLD_WIDTH])
            .y_bounds([0.0, WORLD_HEIGHT])
            .paint(|ctx| {
                for star in &self.stars {
                    let level = (star.brightness * 255.0) as u8;
                    ctx.draw(&Points {
                        coords: &[(star.x, star.y)],
                        color: Color::Rgb(level, level, level),
                    });
                }

                for balloon in &self.balloons {
                    let cx = balloon.center_x();
                    ctx.draw(&Circle {
                        x: cx,
                        y: balloon.y,
                        radius: balloon.size,
                        color: balloon.color,
                    });
                    ctx.draw(&Line::new(
                        cx,
                        balloon.y - balloon.size,
                        cx + balloon.wobble.sin(),
                        balloon.y - balloon.size - 6.0,
                        Color::Gray,
                    ));
                }

                ctx.layer();
                for spark in &self.sparks {
                    let color = if spark.life > 0.3 { spark.color } else { Color::DarkGray };
                    ctx.draw(&Points {
                        coords: &[(spark.x, spark.y)],
                        color,
                    });
                }

                for piece in &self.confetti {
                    match piece.shape {
                        ConfettiShape::Square => ctx.draw(&Rectangle {
                            x: piece.x,
                            y: piece.y,
                            width: piece.size,
                            height: piece.size,
                            color: piece.color,
                        }),
                        ConfettiShape::Round => ctx.draw(&Circle {
                            x: piece.x,
                            y: piece.y,
                            radius: piece.size / 2.0,
                            color: piece.color,
                        }),
                    }
                }
            })
            .render(area, buf);

        self.render_text(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(35);

    fn scene() -> CelebrationScene {
        CelebrationScene::with_rng(FRAME, Duration::from_secs(4), StdRng::seed_from_u64(42))
    }

    #[test]
    fn blessings_rotate_every_interval() {
        let mut scene = scene();
        assert_eq!(scene.blessing(), BLESSINGS[0]);
        scene.update(Duration::from_secs(4));
        assert_eq!(scene.blessing(), BLESSINGS[1]);
        for _ in 0..7 {
            scene.update(Duration::from_secs(4));
        }
        assert_eq!(scene.blessing(), BLESSINGS[0]);
    }

    #[test]
    fn emojis_spawn_and_expire() {
        let mut scene = scene();
        scene.update(Duration::from_millis(900));
        assert_eq!(scene.emojis().len(), 3);
        for _ in 0..200 {
            scene.update(FRAME);
        }
        assert!(scene.emojis().iter().all(|e| e.age < e.lifetime));
    }

    #[test]
    fn fireworks_eventually_burn_out() {
        let mut scene = scene();
        for _ in 0..2000 {
            scene.update(FRAME);
        }
        // Each spark lives at most 100 steps, launched at ~5% of steps
        assert!(scene.spark_count() < FIREWORK_SPARKS * 20);
    }

    #[test]
    fn renders_without_panicking() {
        let mut scene = scene();
        for _ in 0..100 {
            scene.update(FRAME);
        }
        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);
        (&scene).render(area, &mut buf);
    }
}
