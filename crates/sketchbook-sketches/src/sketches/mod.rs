//! The individual sketches.

pub mod flee;
pub mod particles;
pub mod raster;
pub mod reveal;
