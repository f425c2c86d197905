//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure mode of startup and the headless
//! run so that `main` can propagate with `?`.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: cortex_core::config::ConfigError,
    },

    /// Simulation clock initialization failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: cortex_core::clock::ClockError,
    },

    /// Final census could not be serialized.
    #[error("serialization error: {source}")]
    Json {
        /// The underlying serde error.
        #[from]
        source: serde_json::Error,
    },

    /// The snapshot channel closed before playback finished.
    #[error("snapshot channel closed at day {day}")]
    ChannelClosed {
        /// Last day observed before the channel closed.
        day: f64,
    },
}
