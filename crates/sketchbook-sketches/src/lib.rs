//! Terminal sketches for the sketchbook.
//!
//! Each sketch owns its own state and draws into a [`Canvas`] before handing
//! the result to ratatui. Animated sketches are driven through
//! [`Sketchbook::tick`] by the host.

mod canvas;
mod chars;
mod color;
mod sketches;
mod state;

use std::time::Instant;

use sketchbook_core::ColorTheme;

pub use canvas::{Canvas, Cell};
pub use color::{hsl_to_rgb, hsl_to_rgb8, theme_shade};
pub use sketches::flee::{Button, FleeButtons, Hover};
pub use sketches::particles::{Particle, ParticleField, ParticleKind};
pub use sketches::raster::{RasterReveal, RasterStatus, cover_crop, rasterize};
pub use sketches::reveal::{ScrollReveal, Section};
pub use state::Sketchbook;

/// Per-frame values shared by every sketch.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    pub theme: ColorTheme,
    pub now: Instant,
}
