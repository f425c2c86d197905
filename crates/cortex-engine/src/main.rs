//! Headless engine binary for the corticogenesis simulation.
//!
//! Drives the core end to end without a presentation layer: it plays the
//! full timeline on the configured cadence, reports each developmental
//! stage as it is entered, and logs the final population census.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `CORTEX_CONFIG` or `cortex-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Create the simulation driver and reset it
//! 4. Start playback and follow snapshots until it stops
//! 5. Log the final census

mod error;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use cortex_core::config::{LogFormat, LoggingConfig, SimulationConfig};
use cortex_core::driver::SimulationDriver;
use cortex_core::state::SimulationSnapshot;
use cortex_types::Stage;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Default configuration file, relative to the working directory.
const CONFIG_FILE: &str = "cortex-config.yaml";

/// Environment variable that overrides [`CONFIG_FILE`].
const CONFIG_ENV: &str = "CORTEX_CONFIG";

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the run cannot finish.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    run().await?;
    Ok(())
}

/// Load configuration, play the full timeline, and log the result.
async fn run() -> Result<(), EngineError> {
    let config_path =
        std::env::var_os(CONFIG_ENV).map_or_else(|| PathBuf::from(CONFIG_FILE), PathBuf::from);
    let (config, from_file) = load_config(&config_path)?;

    init_tracing(&config.logging);
    info!("cortex-engine starting");
    info!(
        path = %config_path.display(),
        from_file,
        start_day = config.timeline.start_day,
        total_day = config.timeline.total_day,
        tick_step = config.timeline.tick_step,
        tick_interval_ms = config.timeline.tick_interval_ms,
        "Configuration loaded"
    );

    let driver = start_driver(&config)?;
    let last = run_to_end(&driver).await?;

    info!(
        day = last.day,
        cells = last.cells.len(),
        revision = last.revision,
        census = %census_json(&last)?,
        "cortex-engine shutdown complete"
    );

    Ok(())
}

/// Install the global subscriber. `RUST_LOG` wins over the configured
/// level when set.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    match logging.format {
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .json()
                .with_current_span(true)
                .init();
        }
        LogFormat::Compact => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .compact()
                .init();
        }
    }
}

/// Load the configuration at `path`, or defaults when the file is absent.
///
/// The returned flag tells whether the file was read.
fn load_config(path: &Path) -> Result<(SimulationConfig, bool), EngineError> {
    if path.exists() {
        Ok((SimulationConfig::from_file(path)?, true))
    } else {
        Ok((SimulationConfig::default(), false))
    }
}

/// Build a driver for `config` and reset it to the first day.
fn start_driver(config: &SimulationConfig) -> Result<SimulationDriver, EngineError> {
    let driver = SimulationDriver::new(config)?;
    driver.reset();
    Ok(driver)
}

/// Start playback and follow published snapshots until playback stops.
///
/// Returns the last snapshot seen.
async fn run_to_end(driver: &SimulationDriver) -> Result<SimulationSnapshot, EngineError> {
    let mut updates = driver.subscribe();
    let mut stage = updates.borrow_and_update().stage;
    info!(stage = stage.label(), day = driver.day(), "entering stage");

    if !driver.is_playing() {
        let _ = driver.play_pause();
    }

    loop {
        if updates.changed().await.is_err() {
            return Err(EngineError::ChannelClosed { day: driver.day() });
        }
        let snapshot = updates.borrow_and_update().clone();
        report_stage(&mut stage, &snapshot);
        if !snapshot.playing {
            return Ok(snapshot);
        }
    }
}

fn report_stage(current: &mut Stage, snapshot: &SimulationSnapshot) {
    if snapshot.stage != *current {
        *current = snapshot.stage;
        info!(
            stage = snapshot.stage_label,
            day = snapshot.day,
            cells = snapshot.cells.len(),
            "entering stage"
        );
    }
}

/// Render the census of `snapshot` as a JSON object.
fn census_json(snapshot: &SimulationSnapshot) -> Result<String, EngineError> {
    Ok(serde_json::to_string(&census_by_label(snapshot))?)
}

/// Count the snapshot's cells by display label.
fn census_by_label(snapshot: &SimulationSnapshot) -> BTreeMap<&'static str, usize> {
    let mut census = BTreeMap::new();
    for cell in &snapshot.cells {
        let count: &mut usize = census.entry(cell.cell_type.label()).or_insert(0);
        *count = count.saturating_add(1);
    }
    census
}
