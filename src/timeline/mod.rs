//! Simulated playback timeline
//!
//! A looping clock advanced by a fixed step, the caption fixture it is
//! matched against, keyword emphasis for caption text, and a player that
//! drives the clock from a scoped repeating timer.

pub mod captions;
pub mod highlight;
pub mod player;

use crate::config::TimelineConfig;
use serde::Serialize;

pub use captions::{active_caption, caption_fixture, to_srt, CaptionEntry};
pub use highlight::{HighlightSegment, KeywordSet};
pub use player::TimelinePlayer;

/// Bounded, looping playback clock.
///
/// Position is kept as a whole number of steps so repeated ticks never
/// accumulate floating-point drift; a wrap happens exactly when the step
/// count reaches the duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineClock {
    ticks: u64,
    step_ms: u64,
    duration_ticks: u64,
    loops: u64,
}

impl TimelineClock {
    pub fn new(step_ms: u64, duration_seconds: u64) -> Self {
        let step_ms = step_ms.max(1);
        let duration_ms = duration_seconds.max(1) * 1000;
        Self {
            ticks: 0,
            step_ms,
            duration_ticks: duration_ms.div_ceil(step_ms),
            loops: 0,
        }
    }

    pub fn from_config(config: &TimelineConfig) -> Self {
        Self::new(config.step_ms, config.duration_seconds)
    }

    /// Current position in seconds, always in `[0, duration)`.
    pub fn current_time(&self) -> f64 {
        (self.ticks * self.step_ms) as f64 / 1000.0
    }

    pub fn duration(&self) -> f64 {
        (self.duration_ticks * self.step_ms) as f64 / 1000.0
    }

    pub fn playhead_percent(&self) -> f64 {
        self.ticks as f64 / self.duration_ticks as f64 * 100.0
    }

    /// Number of times the clock has wrapped back to zero since the last reset.
    pub fn loops(&self) -> u64 {
        self.loops
    }

    /// Advance one step. Returns true when this step wrapped to zero.
    pub fn tick(&mut self) -> bool {
        self.ticks += 1;
        if self.ticks >= self.duration_ticks {
            self.ticks = 0;
            self.loops += 1;
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.ticks = 0;
        self.loops = 0;
    }
}

impl Default for TimelineClock {
    fn default() -> Self {
        Self::from_config(&TimelineConfig::default())
    }
}
