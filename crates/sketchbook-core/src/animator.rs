//! Frame-driven easing of shape collections.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::scheduler::{FrameScheduler, FrameToken};
use crate::shape::{CollectionId, Shape, ShapeCollection};

/// Per-collection animation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    Idle,
    Running,
}

/// What happened when a fired frame was handed to [`Animator::run_frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The token no longer belongs to this collection; nothing was touched.
    Stale,
    /// Shapes moved and another frame was requested.
    Pending(FrameToken),
    /// Every shape arrived; the collection is idle again.
    Converged,
}

/// Drives shape collections toward their targets, one frame at a time.
///
/// At most one frame is in flight per collection. Starting a collection that
/// is already running cancels its pending frame before requesting a new one.
#[derive(Debug)]
pub struct Animator<S> {
    scheduler: S,
    running: HashMap<CollectionId, FrameToken>,
}

impl<S: FrameScheduler + Default> Default for Animator<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S: FrameScheduler> Animator<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            running: HashMap::new(),
        }
    }

    /// Start easing `shapes`, replacing any run already in flight for it.
    ///
    /// Returns `None` and registers nothing when the collection is empty.
    pub fn start<T>(&mut self, shapes: &ShapeCollection<T>) -> Option<FrameToken> {
        if shapes.is_empty() {
            debug!(collection = ?shapes.id(), "ignoring start on empty collection");
            return None;
        }

        let id = shapes.id();
        if let Some(previous) = self.running.remove(&id) {
            self.scheduler.cancel_frame(previous);
            trace!(collection = ?id, ?previous, "superseded running animation");
        }

        let token = self.scheduler.request_frame();
        self.running.insert(id, token);
        debug!(collection = ?id, ?token, shapes = shapes.len(), "animation started");
        Some(token)
    }

    /// Stop easing `shapes`. Returns `false` if it was not running.
    pub fn stop<T>(&mut self, shapes: &ShapeCollection<T>) -> bool {
        let id = shapes.id();
        match self.running.remove(&id) {
            Some(token) => {
                self.scheduler.cancel_frame(token);
                debug!(collection = ?id, "animation stopped");
                true
            }
            None => false,
        }
    }

    /// Handle a fired frame for `shapes`.
    pub fn run_frame<T: AsMut<Shape>>(
        &mut self,
        token: FrameToken,
        shapes: &mut ShapeCollection<T>,
    ) -> FrameOutcome {
        let id = shapes.id();
        if self.running.get(&id) != Some(&token) {
            trace!(collection = ?id, ?token, "dropping stale frame");
            return FrameOutcome::Stale;
        }

        if shapes.step_all() {
            self.running.remove(&id);
            debug!(collection = ?id, "animation converged");
            return FrameOutcome::Converged;
        }

        let next = self.scheduler.request_frame();
        self.running.insert(id, next);
        FrameOutcome::Pending(next)
    }

    pub fn state(&self, id: CollectionId) -> AnimationState {
        if self.running.contains_key(&id) {
            AnimationState::Running
        } else {
            AnimationState::Idle
        }
    }

    pub fn is_running(&self, id: CollectionId) -> bool {
        self.running.contains_key(&id)
    }

    /// The frame currently registered for a collection.
    pub fn token(&self, id: CollectionId) -> Option<FrameToken> {
        self.running.get(&id).copied()
    }

    /// Number of collections currently animating.
    pub fn active(&self) -> usize {
        self.running.len()
    }

    /// Cancel every running animation.
    pub fn reset(&mut self) {
        for (_, token) in self.running.drain() {
            self.scheduler.cancel_frame(token);
        }
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}
