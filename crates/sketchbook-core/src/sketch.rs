//! The available sketches.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which sketch is on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SketchKind {
    /// Shapes easing around the pointer on click.
    #[default]
    Particles,
    /// A button that runs away and multiplies.
    Flee,
    /// An image revealed tile by tile.
    Raster,
    /// Image placeholders revealed while scrolling.
    Reveal,
}

impl SketchKind {
    pub const ALL: [SketchKind; 4] = [
        SketchKind::Particles,
        SketchKind::Flee,
        SketchKind::Raster,
        SketchKind::Reveal,
    ];

    /// Cycle to the next sketch.
    pub fn next(self) -> Self {
        match self {
            SketchKind::Particles => SketchKind::Flee,
            SketchKind::Flee => SketchKind::Raster,
            SketchKind::Raster => SketchKind::Reveal,
            SketchKind::Reveal => SketchKind::Particles,
        }
    }

    /// Human readable name.
    pub fn label(self) -> &'static str {
        match self {
            SketchKind::Particles => "particles",
            SketchKind::Flee => "flee",
            SketchKind::Raster => "raster",
            SketchKind::Reveal => "reveal",
        }
    }

    /// Sketch bound to a number key (`1`-based).
    pub fn from_index(index: usize) -> Option<Self> {
        index
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i).copied())
    }
}

impl fmt::Display for SketchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when parsing an unknown sketch name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSketch(pub String);

impl fmt::Display for UnknownSketch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown sketch `{}`", self.0)
    }
}

impl std::error::Error for UnknownSketch {}

impl FromStr for SketchKind {
    type Err = UnknownSketch;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownSketch(s.to_string()))
    }
}
