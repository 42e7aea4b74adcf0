//! Periodic stepper: the counter/interval timer behind every discrete motion
//!
//! Each tick the stepper re-derives its interval from the current progress,
//! bumps its counter and reports a step once the counter reaches the interval.

use serde::{Deserialize, Serialize};

use super::timing::{FrameTimer, StepKind};

/// A tick counter paired with the frame interval it was last compared against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodicStepper {
    /// Which interval function drives this stepper
    pub kind: StepKind,
    /// Ticks elapsed since the last step
    pub counter: u32,
    /// Interval derived on the most recent advance
    pub interval: u32,
}

impl PeriodicStepper {
    pub fn new(kind: StepKind) -> Self {
        Self {
            kind,
            counter: 0,
            interval: 0,
        }
    }

    /// Advance by one tick. Returns true when a discrete step is due.
    pub fn advance<T: FrameTimer + ?Sized>(&mut self, timer: &T, progress: f32) -> bool {
        self.interval = timer.frame_time(self.kind, progress).max(1);
        self.counter += 1;
        if self.counter >= self.interval {
            self.counter = 0;
            true
        } else {
            false
        }
    }

    /// Keep the counter pinned at zero (the motion is frozen this tick)
    #[inline]
    pub fn hold(&mut self) {
        self.counter = 0;
    }

    pub fn reset(&mut self) {
        self.counter = 0;
        self.interval = 0;
    }
}
