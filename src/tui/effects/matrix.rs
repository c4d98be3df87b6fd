//! Falling-glyph rain

use super::{green, Ticker};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};
use std::time::Duration;

/// Half-width glyphs only, so every glyph fills exactly one cell
const GLYPHS: &[char] = &[
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
    'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
    '@', '#', '$', '%', '^', '&', '*', '(', ')', 'ｶ', 'ｷ', 'ｸ', 'ｹ', 'ｺ', 'ﾃ', 'ﾅ', 'ﾗ',
];

/// Per-step brightness kept by a trail cell
const FADE: f64 = 0.9;
const VISIBLE: f64 = 0.12;
const RESET_CHANCE: f64 = 0.025;

#[derive(Debug, Clone, Copy)]
struct Trail {
    glyph: char,
    intensity: f64,
}

pub struct MatrixRain {
    width: u16,
    height: u16,
    drops: Vec<u16>,
    cells: Vec<Option<Trail>>,
    ticker: Ticker,
    rng: StdRng,
}

impl MatrixRain {
    pub fn new(frame: Duration) -> Self {
        Self::with_rng(frame, StdRng::from_entropy())
    }

    pub fn with_rng(frame: Duration, rng: StdRng) -> Self {
        Self {
            width: 0,
            height: 0,
            drops: Vec::new(),
            cells: Vec::new(),
            ticker: Ticker::new(frame),
            rng,
        }
    }

    fn resize(&mut self, area: Rect) {
        self.width = area.width;
        self.height = area.height;
        self.drops = vec![1; area.width as usize];
        self.cells = vec![None; area.width as usize * area.height as usize];
    }

    pub fn update(&mut self, area: Rect, dt: Duration) {
        if area.width != self.width || area.height != self.height {
            self.resize(area);
        }
        for _ in 0..self.ticker.steps(dt) {
            self.step();
        }
    }

    fn step(&mut self) {
        for cell in self.cells.iter_mut() {
            if let Some(trail) = cell.as_mut() {
                trail.intensity *= FADE;
            }
            if cell.map_or(false, |trail| trail.intensity < VISIBLE) {
                *cell = None;
            }
        }

        for column in 0..self.drops.len() {
            let row = self.drops[column];
            if row < self.height {
                let glyph = GLYPHS[self.rng.gen_range(0..GLYPHS.len())];
                let index = row as usize * self.width as usize + column;
                self.cells[index] = Some(Trail {
                    glyph,
                    intensity: 1.0,
                });
            } else if self.rng.gen_bool(RESET_CHANCE) {
                self.drops[column] = 0;
            }
            self.drops[column] = self.drops[column].saturating_add(1);
        }
    }

    /// Lit cells, for inspection
    pub fn lit(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

impl Widget for &MatrixRain {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for y in 0..self.height.min(area.height) {
            for x in 0..self.width.min(area.width) {
                let Some(trail) = self.cells[y as usize * self.width as usize + x as usize] else {
                    continue;
                };
                // Dimmed so foreground text stays readable
                let color = green(trail.intensity * 0.5);
                if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
                    cell.set_char(trail.glyph).set_fg(color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heads_light_one_cell_per_column() {
        let frame = Duration::from_millis(35);
        let mut rain = MatrixRain::with_rng(frame, StdRng::seed_from_u64(1));
        rain.update(Rect::new(0, 0, 8, 5), frame);
        assert_eq!(rain.lit(), 8);
    }

    #[test]
    fn trails_fade_out() {
        let frame = Duration::from_millis(35);
        let mut rain = MatrixRain::with_rng(frame, StdRng::seed_from_u64(1));
        let area = Rect::new(0, 0, 4, 3);
        for _ in 0..40 {
            rain.update(area, frame);
        }
        assert!(rain.lit() <= 4 * 3);
        let mut buf = Buffer::empty(area);
        (&rain).render(area, &mut buf);
    }

    #[test]
    fn resize_resets_the_grid() {
        let frame = Duration::from_millis(35);
        let mut rain = MatrixRain::with_rng(frame, StdRng::seed_from_u64(1));
        rain.update(Rect::new(0, 0, 8, 5), frame);
        rain.update(Rect::new(0, 0, 3, 2), Duration::ZERO);
        assert_eq!(rain.lit(), 0);
    }
}
