//! Configuration loading and typed config structures for the simulation.
//!
//! The optional configuration file is `cortex-config.yaml`. Every field has
//! a default matching the built-in timeline, so an empty file (or no file
//! at all) yields the canonical E10 to E18 simulation.

use std::path::Path;

use serde::Deserialize;

use crate::clock::{DEBOUNCE_MS, START_DAY, TICK_INTERVAL_MS, TICK_STEP, TOTAL_DAY};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but describes an unusable simulation.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Simulated timeline and playback cadence.
    #[serde(default)]
    pub timeline: TimelineConfig,

    /// Initial population sizes and RNG seed.
    #[serde(default)]
    pub population: PopulationConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load and validate configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // serde_yml reads an empty or comment-only document as null, not an
        // empty map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: serde_yml::Value = serde_yml::from_str(yaml)?;
        if raw.is_null() {
            return Ok(Self::default());
        }
        let config: Self = serde_yml::from_value(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the timeline is well-formed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.timeline;
        let invalid = |reason: &str| {
            Err(ConfigError::Invalid {
                reason: reason.to_owned(),
            })
        };

        if !(t.start_day.is_finite() && t.total_day.is_finite() && t.tick_step.is_finite()) {
            return invalid("timeline values must be finite");
        }
        if t.start_day > t.total_day {
            return invalid("timeline.start_day must not exceed timeline.total_day");
        }
        if t.tick_step <= 0.0 {
            return invalid("timeline.tick_step must be positive");
        }
        if t.tick_interval_ms == 0 {
            return invalid("timeline.tick_interval_ms must be at least 1");
        }
        if t.debounce_ms == 0 {
            return invalid("timeline.debounce_ms must be at least 1");
        }
        Ok(())
    }
}

/// Simulated timeline and playback cadence.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimelineConfig {
    /// First simulated embryonic day.
    #[serde(default = "default_start_day")]
    pub start_day: f64,

    /// Last simulated embryonic day.
    #[serde(default = "default_total_day")]
    pub total_day: f64,

    /// Simulated days advanced per playback tick.
    #[serde(default = "default_tick_step")]
    pub tick_step: f64,

    /// Wall-clock milliseconds between playback ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Quiet period before a scrub commits, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            start_day: default_start_day(),
            total_day: default_total_day(),
            tick_step: default_tick_step(),
            tick_interval_ms: default_tick_interval_ms(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// Initial population configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PopulationConfig {
    /// Number of radial glial progenitors present at the start.
    #[serde(default = "default_progenitor_count")]
    pub progenitor_count: usize,

    /// Number of preplate (early Layer I) neurons present at the start.
    #[serde(default = "default_early_neuron_count")]
    pub early_neuron_count: usize,

    /// Seed for placement jitter. `None` draws one from OS entropy per run.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            progenitor_count: default_progenitor_count(),
            early_neuron_count: default_early_neuron_count(),
            seed: None,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Single-line human readable output.
    #[default]
    Compact,
    /// One JSON object per event.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins if set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

const fn default_start_day() -> f64 {
    START_DAY
}

const fn default_total_day() -> f64 {
    TOTAL_DAY
}

const fn default_tick_step() -> f64 {
    TICK_STEP
}

const fn default_tick_interval_ms() -> u64 {
    TICK_INTERVAL_MS
}

const fn default_debounce_ms() -> u64 {
    DEBOUNCE_MS
}

const fn default_progenitor_count() -> usize {
    15
}

const fn default_early_neuron_count() -> usize {
    8
}

fn default_log_level() -> String {
    "info".to_owned()
}
