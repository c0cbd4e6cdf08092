//! Per-move countdown driven by cooperative 100ms ticks.
//!
//! The countdown owns no thread or clock. The caller ticks it (the CLI turns
//! wall-clock time between inputs into ticks), and the game arms it when a
//! turn starts and cancels it on every transition out of the active phase.

use serde::{Deserialize, Serialize};

use super::constants::TICKS_PER_SECOND;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    /// Ticks allowed per move; 0 means untimed
    limit_ticks: u32,
    remaining_ticks: u32,
    armed: bool,
}

impl Countdown {
    /// Limits too large to count in ticks saturate at `u32::MAX` ticks.
    pub fn from_seconds(seconds: u32) -> Self {
        let limit_ticks = seconds.saturating_mul(TICKS_PER_SECOND);
        Self {
            limit_ticks,
            remaining_ticks: limit_ticks,
            armed: false,
        }
    }

    pub fn untimed() -> Self {
        Self::from_seconds(0)
    }

    pub fn is_timed(&self) -> bool {
        self.limit_ticks > 0
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Restart the full per-move allowance.
    pub fn arm(&mut self) {
        self.remaining_ticks = self.limit_ticks;
        self.armed = self.is_timed();
    }

    pub fn cancel(&mut self) {
        self.armed = false;
    }

    pub fn remaining_ticks(&self) -> u32 {
        self.remaining_ticks
    }

    /// Whole seconds left, rounded up.
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_ticks.div_ceil(TICKS_PER_SECOND)
    }

    /// Advance one tick. Returns true exactly once, on the tick that expires
    /// the countdown; the countdown disarms itself at that point.
    pub fn tick(&mut self) -> bool {
        if !self.armed {
            return false;
        }
        self.remaining_ticks = self.remaining_ticks.saturating_sub(1);
        if self.remaining_ticks == 0 {
            self.armed = false;
            return true;
        }
        false
    }
}
