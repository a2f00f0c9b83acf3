//! Core of the sketchbook: shapes, the easing animator and the frame
//! scheduling it runs on, plus the small shared types every sketch uses.
//!
//! ```
//! use sketchbook_core::{Animator, FrameQueue, Shape, ShapeCollection};
//!
//! let mut shapes: ShapeCollection =
//!     ShapeCollection::from_items(vec![Shape::new(0.0, 0.0, 0.0).with_target(4.0, 0.0)]);
//! let mut animator = Animator::new(FrameQueue::new());
//! animator.start(&shapes);
//!
//! loop {
//!     let fired = animator.scheduler_mut().fire();
//!     if fired.is_empty() {
//!         break;
//!     }
//!     for token in fired {
//!         animator.run_frame(token, &mut shapes);
//!     }
//! }
//! assert_eq!(shapes.as_slice()[0].x, 4.0);
//! ```

mod angle;
mod animator;
mod scheduler;
mod shape;
mod sketch;
mod theme;

pub use angle::normalize_angle;
pub use animator::{AnimationState, Animator, FrameOutcome};
pub use scheduler::{FrameClock, FrameQueue, FrameScheduler, FrameToken};
pub use shape::{
    ARRIVE_ANGLE, ARRIVE_DISTANCE_SQ, CollectionId, DEFAULT_EASE, Shape, ShapeCollection,
};
pub use sketch::{SketchKind, UnknownSketch};
pub use theme::ColorTheme;
