//! Drifting wireframe polygons linked by proximity lines
//!
//! Two populations share one world: small rotating shapes with three to
//! six sides, and larger pulsing pentagons with an inner pentagon and a
//! bright core. Coordinates live in a fixed world that is stretched over
//! whatever area the field is rendered into.

use super::{green, wrap, Ticker};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Context, Line, Points},
        Widget,
    },
};
use std::f64::consts::{PI, TAU};
use std::time::Duration;

pub const WORLD_WIDTH: f64 = 160.0;
pub const WORLD_HEIGHT: f64 = 90.0;

const SHAPES: usize = 10;
const PENTAGONS: usize = 8;
const SHAPE_LINK: f64 = 20.0;
const PENTAGON_LINK: f64 = 25.0;

#[derive(Debug, Clone)]
pub struct Polygon {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub sides: u8,
    pub rotation: f64,
    pub rotation_speed: f64,
    pub vx: f64,
    pub vy: f64,
    /// Pulse phase; `None` for shapes that do not pulse
    pub pulse: Option<f64>,
    pub color: Color,
}

impl Polygon {
    fn shape(rng: &mut StdRng) -> Self {
        Self {
            x: rng.gen::<f64>() * WORLD_WIDTH,
            y: rng.gen::<f64>() * WORLD_HEIGHT,
            size: 3.0 + rng.gen::<f64>() * 5.0,
            sides: rng.gen_range(3..=6),
            rotation: rng.gen::<f64>() * TAU,
            rotation_speed: (rng.gen::<f64>() - 0.5) * 0.02,
            vx: (rng.gen::<f64>() - 0.5) * 0.05,
            vy: (rng.gen::<f64>() - 0.5) * 0.05,
            pulse: None,
            color: green(0.3),
        }
    }

    fn pentagon(rng: &mut StdRng) -> Self {
        // Hue 120..180: green through cyan
        let blend = rng.gen::<f64>();
        Self {
            x: rng.gen::<f64>() * WORLD_WIDTH,
            y: rng.gen::<f64>() * WORLD_HEIGHT,
            size: 4.0 + rng.gen::<f64>() * 8.0,
            sides: 5,
            rotation: rng.gen::<f64>() * TAU,
            rotation_speed: (rng.gen::<f64>() - 0.5) * 0.03,
            vx: (rng.gen::<f64>() - 0.5) * 0.03,
            vy: (rng.gen::<f64>() - 0.5) * 0.03,
            pulse: Some(0.0),
            color: Color::Rgb(0, 200, (65.0 + 190.0 * blend) as u8),
        }
    }

    fn step(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
        self.rotation += self.rotation_speed;
        if let Some(pulse) = self.pulse.as_mut() {
            *pulse += 0.05;
        }
        let margin = self.size * 1.5;
        self.x = wrap(self.x, WORLD_WIDTH, margin);
        self.y = wrap(self.y, WORLD_HEIGHT, margin);
    }

    /// Radius including the current pulse
    pub fn radius(&self) -> f64 {
        match self.pulse {
            Some(phase) => self.size + phase.sin(),
            None => self.size,
        }
    }

    /// Corner points at `radius`, first corner pointing up
    pub fn vertices(&self, radius: f64) -> Vec<(f64, f64)> {
        let sides = self.sides.max(3) as usize;
        (0..sides)
            .map(|i| {
                let angle = (i as f64 * TAU) / sides as f64 + PI / 2.0 + self.rotation;
                (self.x + radius * angle.cos(), self.y + radius * angle.sin())
            })
            .collect()
    }

    fn distance(&self, other: &Polygon) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

fn draw_outline(ctx: &mut Context, corners: &[(f64, f64)], color: Color) {
    for (i, &(x1, y1)) in corners.iter().enumerate() {
        let (x2, y2) = corners[(i + 1) % corners.len()];
        ctx.draw(&Line::new(x1, y1, x2, y2, color));
    }
}

pub struct PolygonField {
    shapes: Vec<Polygon>,
    pentagons: Vec<Polygon>,
    /// Midpoints of links flashing this frame
    sparks: Vec<(f64, f64)>,
    ticker: Ticker,
    rng: StdRng,
}

impl PolygonField {
    pub fn new(frame: Duration) -> Self {
        Self::with_rng(frame, StdRng::from_entropy())
    }

    pub fn with_rng(frame: Duration, mut rng: StdRng) -> Self {
        let shapes = (0..SHAPES).map(|_| Polygon::shape(&mut rng)).collect();
        let pentagons = (0..PENTAGONS).map(|_| Polygon::pentagon(&mut rng)).collect();
        Self {
            shapes,
            pentagons,
            sparks: Vec::new(),
            ticker: Ticker::new(frame),
            rng,
        }
    }

    pub fn shapes(&self) -> &[Polygon] {
        &self.shapes
    }

    pub fn pentagons(&self) -> &[Polygon] {
        &self.pentagons
    }

    pub fn update(&mut self, dt: Duration) {
        for _ in 0..self.ticker.steps(dt) {
            self.shapes.iter_mut().for_each(Polygon::step);
            self.pentagons.iter_mut().for_each(Polygon::step);

            self.sparks.clear();
            for (i, a) in self.pentagons.iter().enumerate() {
                for b in &self.pentagons[i + 1..] {
                    if a.distance(b) < PENTAGON_LINK && self.rng.gen_bool(0.05) {
                        self.sparks.push(((a.x + b.x) / 2.0, (a.y + b.y) / 2.0));
                    }
                }
            }
        }
    }

    fn draw_links(ctx: &mut Context, group: &[Polygon], reach: f64) {
        for (i, a) in group.iter().enumerate() {
            for b in &group[i + 1..] {
                let distance = a.distance(b);
                if distance < reach {
                    let color = green(0.4 * (1.0 - distance / reach));
                    ctx.draw(&Line::new(a.x, a.y, b.x, b.y, color));
                }
            }
        }
    }
}

impl Widget for &PolygonField {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([0.0, WORLD_WIDTH])
            .y_bounds([0.0, WORLD_HEIGHT])
            .paint(|ctx| {
                PolygonField::draw_links(ctx, &self.shapes, SHAPE_LINK);
                PolygonField::draw_links(ctx, &self.pentagons, PENTAGON_LINK);

                for shape in &self.shapes {
                    draw_outline(ctx, &shape.vertices(shape.radius()), shape.color);
                }
                for pentagon in &self.pentagons {
                    let radius = pentagon.radius();
                    draw_outline(ctx, &pentagon.vertices(radius), pentagon.color);
                    draw_outline(ctx, &pentagon.vertices(radius * 0.5), Color::Rgb(0, 200, 220));
                }

                let cores: Vec<_> = self.pentagons.iter().map(|p| (p.x, p.y)).collect();
                ctx.draw(&Points {
                    coords: &cores,
                    color: Color::Cyan,
                });
                ctx.draw(&Points {
                    coords: &self.sparks,
                    color: Color::Cyan,
                });
            })
            .render(area, buf);
    }
}
