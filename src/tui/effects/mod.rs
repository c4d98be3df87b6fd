//! Decorative animation loops
//!
//! None of these read or write session state. They are started once and
//! advanced every frame until the program exits.

pub mod celebration;
pub mod matrix;
pub mod polygons;

pub use celebration::CelebrationScene;
pub use matrix::MatrixRain;
pub use polygons::PolygonField;

use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};
use std::time::Duration;

/// Firework and balloon colors
pub const PARTY_COLORS: [Color; 7] = [
    Color::Rgb(255, 0, 64),
    Color::Rgb(0, 255, 65),
    Color::Rgb(0, 255, 255),
    Color::Rgb(255, 0, 255),
    Color::Rgb(255, 255, 0),
    Color::Rgb(255, 105, 180),
    Color::Rgb(255, 215, 0),
];

/// Green scaled by `intensity` in `0.0..=1.0`
pub fn green(intensity: f64) -> Color {
    let i = intensity.clamp(0.0, 1.0);
    Color::Rgb(0, (40.0 + 215.0 * i) as u8, (65.0 * i) as u8)
}

/// Wrap `v` into `[-margin, size + margin]`
pub fn wrap(v: f64, size: f64, margin: f64) -> f64 {
    if v < -margin {
        size + margin
    } else if v > size + margin {
        -margin
    } else {
        v
    }
}

/// Converts elapsed time into whole animation steps
#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    pending: Duration,
}

impl Ticker {
    const MAX_STEPS: u32 = 5;

    pub fn new(period: Duration) -> Self {
        Self {
            period,
            pending: Duration::ZERO,
        }
    }

    /// Steps due after `dt`. A long stall yields at most a few steps.
    pub fn steps(&mut self, dt: Duration) -> u32 {
        if self.period.is_zero() {
            return 1;
        }
        self.pending += dt;
        let mut steps = 0;
        while self.pending >= self.period {
            self.pending -= self.period;
            steps += 1;
        }
        if steps > Self::MAX_STEPS {
            self.pending = Duration::ZERO;
            steps = Self::MAX_STEPS;
        }
        steps
    }
}

/// The matrix rain with the polygon field drawn over it
pub struct Backdrop {
    pub matrix: MatrixRain,
    pub polygons: PolygonField,
}

impl Backdrop {
    pub fn new(frame: Duration) -> Self {
        Self {
            matrix: MatrixRain::new(frame),
            polygons: PolygonField::new(frame),
        }
    }

    pub fn update(&mut self, area: Rect, dt: Duration) {
        self.matrix.update(area, dt);
        self.polygons.update(dt);
    }
}

impl Default for Backdrop {
    fn default() -> Self {
        Self::new(crate::game::Timings::default().frame)
    }
}

impl Widget for &Backdrop {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.matrix.render(area, buf);
        self.polygons.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_moves_to_the_opposite_edge() {
        assert_eq!(wrap(-11.0, 100.0, 10.0), 110.0);
        assert_eq!(wrap(111.0, 100.0, 10.0), -10.0);
        assert_eq!(wrap(50.0, 100.0, 10.0), 50.0);
    }

    #[test]
    fn ticker_accumulates_partial_frames() {
        let mut ticker = Ticker::new(Duration::from_millis(35));
        assert_eq!(ticker.steps(Duration::from_millis(20)), 0);
        assert_eq!(ticker.steps(Duration::from_millis(20)), 1);
        assert_eq!(ticker.steps(Duration::from_secs(10)), 5);
        assert_eq!(ticker.steps(Duration::from_millis(1)), 0);
    }

    #[test]
    fn green_is_clamped() {
        assert_eq!(green(2.0), green(1.0));
        assert_eq!(green(-1.0), Color::Rgb(0, 40, 0));
    }
}
