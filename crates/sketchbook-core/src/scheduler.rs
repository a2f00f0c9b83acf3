//! Next-frame scheduling.
//!
//! The animator never talks to a display clock directly. Hosts hand it a
//! [`FrameScheduler`], fire the frames themselves and pass each fired token
//! back to whoever requested it.

use std::time::{Duration, Instant};

/// Opaque identifier of one requested frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameToken(u64);

/// Something that can run a callback on the next frame.
pub trait FrameScheduler {
    /// Request a frame. The returned token is unique for this scheduler.
    fn request_frame(&mut self) -> FrameToken;

    /// Cancel a requested frame. Unknown or already fired tokens are ignored.
    fn cancel_frame(&mut self, token: FrameToken);
}

/// A scheduler whose frames fire only when the host says so.
#[derive(Debug, Default)]
pub struct FrameQueue {
    next: u64,
    pending: Vec<FrameToken>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire every pending frame, oldest first.
    ///
    /// Frames requested while the returned tokens are being handled belong
    /// to the next call.
    pub fn fire(&mut self) -> Vec<FrameToken> {
        std::mem::take(&mut self.pending)
    }

    /// Number of frames waiting to fire.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, token: FrameToken) -> bool {
        self.pending.contains(&token)
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self) -> FrameToken {
        self.next += 1;
        let token = FrameToken(self.next);
        self.pending.push(token);
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.pending.retain(|t| *t != token);
    }
}

/// A frame queue paced to a target frame rate.
#[derive(Debug)]
pub struct FrameClock {
    queue: FrameQueue,
    interval: Duration,
    last_frame: Option<Instant>,
}

impl FrameClock {
    /// Create a clock firing at most `fps` times per second (`0` is treated as `1`).
    pub fn new(fps: u32) -> Self {
        Self::with_interval(Duration::from_secs(1) / fps.max(1))
    }

    /// Create a clock with an explicit frame interval.
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            queue: FrameQueue::new(),
            interval,
            last_frame: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Fire pending frames if a frame interval has passed since the last firing.
    pub fn due(&mut self, now: Instant) -> Vec<FrameToken> {
        if self.queue.pending() == 0 {
            return Vec::new();
        }
        if let Some(last) = self.last_frame
            && now.saturating_duration_since(last) < self.interval
        {
            return Vec::new();
        }
        self.last_frame = Some(now);
        self.queue.fire()
    }

    /// How long the host may wait before the next frame is due.
    ///
    /// `None` when nothing is pending.
    pub fn until_next(&self, now: Instant) -> Option<Duration> {
        if self.queue.pending() == 0 {
            return None;
        }
        Some(match self.last_frame {
            Some(last) => self
                .interval
                .saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        })
    }

    pub fn pending(&self) -> usize {
        self.queue.pending()
    }

    pub fn is_pending(&self, token: FrameToken) -> bool {
        self.queue.is_pending(token)
    }
}

impl FrameScheduler for FrameClock {
    fn request_frame(&mut self) -> FrameToken {
        self.queue.request_frame()
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.queue.cancel_frame(token);
    }
}
