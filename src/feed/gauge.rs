//! Decorative "activity" gauge.
//!
//! Purely cosmetic: it wanders inside `[70, 99]` on a timer and never reads
//! or writes feed state.

use crate::normalize::Jitter;
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};

const FLOOR: f64 = 70.0;
const CEILING: f64 = 99.0;
const STEP: f64 = 5.0;
/// Shortest timer period; `interval` rejects zero.
const MIN_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct ActivityGauge {
    value: f64,
    jitter: Jitter,
}

impl ActivityGauge {
    pub fn new(jitter: Jitter) -> Self {
        Self {
            value: 85.0,
            jitter,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Percentage as displayed, e.g. `"87%"`.
    pub fn label(&self) -> String {
        format!("{}%", self.value.round() as i64)
    }

    /// Jump to somewhere in `[85, 100)` after a fresh feed arrives.
    pub fn surge(&mut self) {
        self.value = 85.0 + self.jitter.sample() * 15.0;
    }

    /// One timer step: move by up to ±2.5 and clamp to `[70, 99]`.
    pub fn nudge(&mut self) -> f64 {
        let delta = (self.jitter.sample() - 0.5) * STEP;
        self.value = (self.value + delta).clamp(FLOOR, CEILING);
        self.value
    }

    /// Nudge every `period` for `ticks` steps, reporting each new value.
    ///
    /// Periods under one second are raised to one second.
    pub async fn run(&mut self, period: Duration, ticks: usize, mut on_tick: impl FnMut(&Self)) {
        let mut timer = interval(period.max(MIN_PERIOD));
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        timer.tick().await;
        for _ in 0..ticks {
            timer.tick().await;
            self.nudge();
            on_tick(self);
        }
    }
}
