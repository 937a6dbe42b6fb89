//! Frame pacing
//!
//! The host's "wait for the next display refresh" facility. The animation
//! loop calls [`FrameScheduler::wait_for_frame`] before every tick.

use std::time::{Duration, Instant};

/// Blocks until the next frame may start
pub trait FrameScheduler {
    /// Yield until the next frame
    fn wait_for_frame(&mut self);
}

impl<S: FrameScheduler + ?Sized> FrameScheduler for Box<S> {
    fn wait_for_frame(&mut self) {
        (**self).wait_for_frame();
    }
}

/// Sleeps so frames start at a fixed rate
///
/// Deadlines advance by a whole frame period each call. When a frame overruns
/// by more than one period the schedule restarts from now instead of
/// bursting to catch up.
#[derive(Debug)]
pub struct FixedRateScheduler {
    frame_period: Duration,
    next_frame: Option<Instant>,
}

impl FixedRateScheduler {
    /// Scheduler targeting `target_fps` frames per second
    ///
    /// Non-positive or non-finite rates fall back to 60.
    pub fn new(target_fps: f32) -> Self {
        let fps = if target_fps.is_finite() && target_fps > 0.0 {
            target_fps
        } else {
            log::warn!("Invalid target fps {target_fps}, using 60");
            60.0
        };
        Self {
            frame_period: Duration::from_secs_f32(1.0 / fps),
            next_frame: None,
        }
    }

    /// Time between frame starts
    pub fn frame_period(&self) -> Duration {
        self.frame_period
    }
}

impl FrameScheduler for FixedRateScheduler {
    fn wait_for_frame(&mut self) {
        let now = Instant::now();
        let deadline = match self.next_frame {
            None => now,
            Some(deadline) if deadline + self.frame_period < now => {
                log::trace!("Frame overran by {:?}, resetting schedule", now - deadline);
                now
            }
            Some(deadline) => deadline,
        };
        if deadline > now {
            std::thread::sleep(deadline - now);
        }
        self.next_frame = Some(deadline + self.frame_period);
    }
}

/// Never waits; for tests and headless batch runs
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateScheduler;

impl FrameScheduler for ImmediateScheduler {
    fn wait_for_frame(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_rate_spaces_frames() {
        let mut scheduler = FixedRateScheduler::new(200.0);
        let start = Instant::now();
        for _ in 0..4 {
            scheduler.wait_for_frame();
        }
        // First frame is immediate, three more periods follow
        assert!(start.elapsed() >= scheduler.frame_period() * 3);
    }

    #[test]
    fn test_invalid_rate_falls_back() {
        let scheduler = FixedRateScheduler::new(0.0);
        assert_eq!(scheduler.frame_period(), Duration::from_secs_f32(1.0 / 60.0));
    }
}
