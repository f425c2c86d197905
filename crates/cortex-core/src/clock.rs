//! Simulation clock and time tracking.
//!
//! The clock is the single source of truth for simulated time. It holds
//! the current embryonic day, the timeline bounds, and whether playback is
//! running. The developmental stage is derived from the day and never
//! stored independently.
//!
//! # Stepping policy
//!
//! [`SimulationClock::advance`] never moves past `total_day`: a step that
//! would overshoot lands exactly on the end of the timeline. The clock
//! therefore upholds `start_day <= day <= total_day` at all times.

use cortex_types::Stage;

use crate::config::TimelineConfig;

/// First simulated embryonic day.
pub const START_DAY: f64 = 10.0;

/// Last simulated embryonic day.
pub const TOTAL_DAY: f64 = 18.0;

/// Simulated days advanced per playback tick.
pub const TICK_STEP: f64 = 0.05;

/// Wall-clock milliseconds between playback ticks.
pub const TICK_INTERVAL_MS: u64 = 50;

/// Quiet period before a scrub commits, in milliseconds.
pub const DEBOUNCE_MS: u64 = 50;

/// Day at which deep layer formation begins.
const DEEP_LAYER_DAY: f64 = 11.5;

/// Day at which superficial layer formation begins.
const SUPERFICIAL_LAYER_DAY: f64 = 13.5;

/// Day at which migration gives way to maturation.
const MATURATION_DAY: f64 = 16.0;

/// Errors that can occur during clock construction.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// The timeline bounds or step are unusable.
    #[error("invalid timeline: {reason}")]
    InvalidBounds {
        /// Explanation of what is wrong with the timeline.
        reason: String,
    },
}

/// Simulated clock with playback state.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationClock {
    /// Current simulated day.
    day: f64,

    /// Lower bound of the timeline.
    start_day: f64,

    /// Upper bound of the timeline.
    total_day: f64,

    /// Simulated days per playback tick.
    step: f64,

    /// Whether playback is running.
    playing: bool,
}

impl SimulationClock {
    /// Create a paused clock at the start of the configured timeline.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidBounds`] if the bounds are inverted or
    /// non-finite, or the step is not positive.
    pub fn new(config: &TimelineConfig) -> Result<Self, ClockError> {
        Self::from_parts(config.start_day, config.total_day, config.tick_step)
    }

    /// Create a paused clock from explicit bounds and step.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidBounds`] under the same conditions as
    /// [`SimulationClock::new`].
    pub fn from_parts(start_day: f64, total_day: f64, step: f64) -> Result<Self, ClockError> {
        if !(start_day.is_finite() && total_day.is_finite() && step.is_finite()) {
            return Err(ClockError::InvalidBounds {
                reason: "bounds and step must be finite".to_owned(),
            });
        }
        if start_day > total_day {
            return Err(ClockError::InvalidBounds {
                reason: format!("start day {start_day} is after total day {total_day}"),
            });
        }
        if step <= 0.0 {
            return Err(ClockError::InvalidBounds {
                reason: format!("step {step} must be positive"),
            });
        }
        Ok(Self {
            day: start_day,
            start_day,
            total_day,
            step,
            playing: false,
        })
    }

    /// Return the current simulated day.
    pub const fn day(&self) -> f64 {
        self.day
    }

    /// Return the first day of the timeline.
    pub const fn start_day(&self) -> f64 {
        self.start_day
    }

    /// Return the last day of the timeline.
    pub const fn total_day(&self) -> f64 {
        self.total_day
    }

    /// Return the playback step in simulated days.
    pub const fn step(&self) -> f64 {
        self.step
    }

    /// Whether playback is running.
    pub const fn is_playing(&self) -> bool {
        self.playing
    }

    /// Start or stop playback.
    pub const fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    /// Whether the clock has reached the end of the timeline.
    pub fn is_at_end(&self) -> bool {
        self.day >= self.total_day
    }

    /// Advance by one step, clamped to `total_day`.
    ///
    /// Returns `(previous_day, new_day)`, the half-open interval the step
    /// covered.
    pub fn advance(&mut self) -> (f64, f64) {
        let previous = self.day;
        self.day = (previous + self.step).min(self.total_day);
        (previous, self.day)
    }

    /// Jump to `day`, clamped into the timeline bounds. Returns the day
    /// actually set.
    pub fn jump_to(&mut self, day: f64) -> f64 {
        self.day = self.clamp(day);
        self.day
    }

    /// Move back to the start of the timeline and pause.
    pub const fn rewind(&mut self) {
        self.day = self.start_day;
        self.playing = false;
    }

    /// Clamp `day` into `[start_day, total_day]`. NaN maps to `start_day`.
    pub fn clamp(&self, day: f64) -> f64 {
        if day.is_nan() {
            return self.start_day;
        }
        day.clamp(self.start_day, self.total_day)
    }

    /// Fraction of the timeline elapsed, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        let span = self.total_day - self.start_day;
        if span <= 0.0 {
            return 1.0;
        }
        ((self.day - self.start_day) / span).clamp(0.0, 1.0)
    }

    /// Developmental stage at the current day.
    pub fn stage(&self) -> Stage {
        stage_at(self.day)
    }
}

/// Developmental stage at `day`.
pub fn stage_at(day: f64) -> Stage {
    if day < DEEP_LAYER_DAY {
        Stage::Preplate
    } else if day < SUPERFICIAL_LAYER_DAY {
        Stage::DeepLayers
    } else if day < MATURATION_DAY {
        Stage::SuperficialLayers
    } else {
        Stage::Maturation
    }
}

/// Literal stage label at `day`.
pub fn stage_label(day: f64) -> &'static str {
    stage_at(day).label()
}
