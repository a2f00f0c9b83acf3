//! State of every sketch, kept alive while the user switches between them.

use std::time::{Duration, Instant};

use rand::{SeedableRng, rngs::StdRng};
use ratatui::{Frame, layout::Rect};
use sketchbook_config::Config;
use sketchbook_core::SketchKind;

use crate::FrameContext;
use crate::sketches::{
    flee::FleeButtons, particles::ParticleField, raster::RasterReveal, reveal::ScrollReveal,
};

/// All sketches.
#[derive(Debug)]
pub struct Sketchbook {
    pub particles: ParticleField,
    pub flee: FleeButtons,
    pub raster: RasterReveal,
    pub reveal: ScrollReveal,
}

impl Sketchbook {
    /// Create every sketch with a random seed.
    pub fn new(config: &Config) -> Self {
        Self::with_seed(config, rand::random())
    }

    /// Create every sketch from a fixed seed.
    pub fn with_seed(config: &Config, seed: u64) -> Self {
        Self {
            particles: ParticleField::new(
                config.particles.clone(),
                config.frame_rate,
                StdRng::seed_from_u64(seed),
            ),
            flee: FleeButtons::new(
                config.flee.clone(),
                StdRng::seed_from_u64(seed.wrapping_add(1)),
            ),
            raster: RasterReveal::new(&config.raster),
            reveal: ScrollReveal::new(&config.reveal, config.frame_rate),
        }
    }

    /// Render the selected sketch into `area`.
    pub fn render(&mut self, frame: &mut Frame, area: Rect, kind: SketchKind, ctx: &FrameContext) {
        match kind {
            SketchKind::Particles => self.particles.render(frame, area, ctx),
            SketchKind::Flee => self.flee.render(frame, area, ctx),
            SketchKind::Raster => self.raster.render(frame, area, ctx),
            SketchKind::Reveal => self.reveal.render(frame, area, ctx),
        }
    }

    /// Run whatever frames and timers are due.
    pub fn tick(&mut self, now: Instant) {
        self.particles.tick(now);
        self.raster.tick(now);
        self.reveal.tick(now);
    }

    /// Time until the earliest pending frame or timer.
    pub fn until_next(&self, now: Instant) -> Option<Duration> {
        [
            self.particles.until_next(now),
            self.raster.until_next(now),
            self.reveal.until_next(now),
        ]
        .into_iter()
        .flatten()
        .min()
    }
}
