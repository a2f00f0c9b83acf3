//! Particle field: circles and squares that gather around the pointer.
//!
//! World coordinates use one unit per column and two units per row, so shapes
//! keep their proportions on a terminal whose cells are twice as tall as wide.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_8, TAU};
use std::time::{Duration, Instant};

use rand::{Rng, rngs::StdRng};
use ratatui::{Frame, layout::Rect};
use sketchbook_config::ParticlesConfig;
use sketchbook_core::{Animator, FrameClock, FrameOutcome, FrameToken, Shape, ShapeCollection};
use tracing::debug;

use crate::FrameContext;
use crate::canvas::{Canvas, Cell};
use crate::chars::{CIRCLE, DIAMOND, FULL, SQUARE};
use crate::color::theme_shade;

/// Vertical world units per terminal row.
const ROW_UNITS: f64 = 2.0;

/// Shapes smaller than this are drawn as a single glyph.
const GLYPH_SIZE: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    Circle,
    Square,
}

/// One shape of the field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub shape: Shape,
    pub kind: ParticleKind,
    /// Diameter (circle) or side length (square) in world units.
    pub size: f64,
}

impl AsRef<Shape> for Particle {
    fn as_ref(&self) -> &Shape {
        &self.shape
    }
}

impl AsMut<Shape> for Particle {
    fn as_mut(&mut self) -> &mut Shape {
        &mut self.shape
    }
}

impl Particle {
    /// Whether the world point lies inside this particle.
    fn contains(&self, px: f64, py: f64) -> bool {
        let half = self.size / 2.0;
        let dx = px - self.shape.x;
        let dy = py - self.shape.y;
        match self.kind {
            ParticleKind::Circle => dx * dx + dy * dy <= half * half,
            ParticleKind::Square => {
                let (sin, cos) = self.shape.rotation.sin_cos();
                let u = dx * cos + dy * sin;
                let v = -dx * sin + dy * cos;
                u.abs() <= half && v.abs() <= half
            }
        }
    }

    fn glyph(&self) -> char {
        match self.kind {
            ParticleKind::Circle => CIRCLE,
            ParticleKind::Square => {
                // Squares look the same every quarter turn.
                let phase = self.shape.rotation.rem_euclid(FRAC_PI_2);
                if phase < FRAC_PI_8 || phase > FRAC_PI_2 - FRAC_PI_8 {
                    SQUARE
                } else {
                    DIAMOND
                }
            }
        }
    }
}

/// Generate a field of `config.density` particles inside `width` x `height`.
///
/// Largest first, so smaller shapes are drawn on top.
pub fn generate(
    config: &ParticlesConfig,
    width: f64,
    height: f64,
    rng: &mut StdRng,
) -> Vec<Particle> {
    let mut particles: Vec<Particle> = (0..config.density)
        .map(|_| {
            let kind = if rng.gen_bool(0.5) {
                ParticleKind::Circle
            } else {
                ParticleKind::Square
            };
            let scale = if rng.gen_bool(config.large_chance) {
                2.0
            } else {
                1.0
            };
            let size = rng.gen_range(config.min_size..config.max_size) * scale;
            let half = size * 0.5;
            let x = rng.gen_range(-half..=width + half);
            let y = rng.gen_range(-half..=height + half);
            let rotation = rng.gen_range(0.0..TAU);
            Particle {
                shape: Shape::new(x, y, rotation),
                kind,
                size,
            }
        })
        .collect();

    particles.sort_by(|a, b| b.size.total_cmp(&a.size));
    particles
}

/// Assign spiral targets around `(cx, cy)` to every particle.
///
/// Radii grow from each particle's own size to `max_radius` along the list,
/// with a random angular step and a small jitter proportional to size.
pub fn assign_targets(
    particles: &mut [Particle],
    cx: f64,
    cy: f64,
    max_radius: f64,
    config: &ParticlesConfig,
    rng: &mut StdRng,
) {
    let last = particles.len().saturating_sub(1).max(1) as f64;
    let mut angle = rng.gen_range(0.0..TAU);

    for (i, p) in particles.iter_mut().enumerate() {
        let t = i as f64 / last;
        let inner = p.size * 0.2;
        let radius = inner + (max_radius - inner) * t;
        angle += rng.gen_range(0.1..0.6);

        let jitter = p.size * 0.3;
        let tx = cx + angle.cos() * radius + rng.gen_range(-jitter..=jitter);
        let ty = cy + angle.sin() * radius + rng.gen_range(-jitter..=jitter);

        p.shape.set_target(tx, ty);
        p.shape.set_target_rotation(rng.gen_range(0.0..TAU));
        p.shape.ease = Some(rng.gen_range(config.ease_min..config.ease_max));
    }
}

/// The particle field sketch.
#[derive(Debug)]
pub struct ParticleField {
    particles: ShapeCollection<Particle>,
    animator: Animator<FrameClock>,
    config: ParticlesConfig,
    rng: StdRng,
    /// Last rendered area.
    area: Rect,
}

impl ParticleField {
    pub fn new(config: ParticlesConfig, fps: u32, rng: StdRng) -> Self {
        Self {
            particles: ShapeCollection::new(),
            animator: Animator::new(FrameClock::new(fps)),
            config,
            rng,
            area: Rect::default(),
        }
    }

    fn world_size(&self) -> (f64, f64) {
        (
            self.area.width as f64,
            self.area.height as f64 * ROW_UNITS,
        )
    }

    /// Adopt a new area, regenerating the field when it changed.
    pub fn fit(&mut self, area: Rect) {
        if area != self.area {
            self.area = area;
            self.regenerate();
        }
    }

    /// Throw away the current field and scatter a new one.
    pub fn regenerate(&mut self) {
        self.animator.stop(&self.particles);
        let (width, height) = self.world_size();
        let particles = if width > 0.0 && height > 0.0 {
            generate(&self.config, width, height, &mut self.rng)
        } else {
            Vec::new()
        };
        debug!(count = particles.len(), width, height, "generated particle field");
        self.particles.replace(particles);
    }

    /// Gather the field around a terminal position. Ignored outside the area.
    pub fn on_click(&mut self, column: u16, row: u16) -> Option<FrameToken> {
        let local_x = column.checked_sub(self.area.x)?;
        let local_y = row.checked_sub(self.area.y)?;
        if local_x >= self.area.width || local_y >= self.area.height {
            return None;
        }
        let cx = local_x as f64 + 0.5;
        let cy = (local_y as f64 + 0.5) * ROW_UNITS;
        self.gather(cx, cy)
    }

    /// Send every particle toward a spiral around the world point `(cx, cy)`.
    pub fn gather(&mut self, cx: f64, cy: f64) -> Option<FrameToken> {
        self.animator.stop(&self.particles);

        let (width, height) = self.world_size();
        let max_radius = width.min(height) * self.config.spread;
        assign_targets(
            self.particles.as_mut_slice(),
            cx,
            cy,
            max_radius,
            &self.config,
            &mut self.rng,
        );

        self.animator.start(&self.particles)
    }

    /// Run any animation frames that are due.
    pub fn tick(&mut self, now: Instant) {
        for token in self.animator.scheduler_mut().due(now) {
            if let FrameOutcome::Converged = self.animator.run_frame(token, &mut self.particles) {
                debug!("particles settled");
            }
        }
    }

    /// Time until the next animation frame, if one is pending.
    pub fn until_next(&self, now: Instant) -> Option<Duration> {
        self.animator.scheduler().until_next(now)
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_running(self.particles.id())
    }

    pub fn particles(&self) -> &[Particle] {
        self.particles.as_slice()
    }

    /// Render the field.
    pub fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &FrameContext) {
        self.fit(area);

        let mut canvas = Canvas::new(area.width, area.height);
        let max_size = self.config.max_size * 2.0;

        for p in self.particles.iter() {
            // Bigger shapes are darker, like paper cut-outs stacked on each other.
            let lightness = 0.65 - 0.35 * (p.size / max_size).min(1.0) as f32;
            let color = theme_shade(ctx.theme, lightness);

            if p.size < GLYPH_SIZE {
                let cx = p.shape.x.floor() as i32;
                let cy = (p.shape.y / ROW_UNITS).floor() as i32;
                canvas.set(cx, cy, Cell::new(p.glyph(), color));
                continue;
            }

            // Bounding box of the shape at any rotation.
            let reach = p.size / 2.0 * std::f64::consts::SQRT_2;
            let x0 = (p.shape.x - reach).floor() as i32;
            let x1 = (p.shape.x + reach).ceil() as i32;
            let y0 = ((p.shape.y - reach) / ROW_UNITS).floor() as i32;
            let y1 = ((p.shape.y + reach) / ROW_UNITS).ceil() as i32;

            for cy in y0.max(0)..=y1.min(area.height as i32 - 1) {
                for cx in x0.max(0)..=x1.min(area.width as i32 - 1) {
                    let px = cx as f64 + 0.5;
                    let py = (cy as f64 + 0.5) * ROW_UNITS;
                    if p.contains(px, py) {
                        canvas.set(cx, cy, Cell::new(FULL, color));
                    }
                }
            }
        }

        canvas.render(frame, area);
    }
}
