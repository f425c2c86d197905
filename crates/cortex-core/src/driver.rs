//! Playback and scrubbing driver.
//!
//! [`SimulationDriver`] is the command/query surface a presentation layer
//! talks to. It owns the [`SimulationState`] and the two asynchronous
//! sources of change:
//!
//! - **Playback** -- a Tokio task that calls [`SimulationState::tick`] on a
//!   fixed wall-clock interval. It exits by itself when the timeline ends
//!   and is aborted on pause and reset.
//! - **Scrubbing** -- [`SimulationDriver::set_day`] goes through a
//!   [`Debouncer`], so a burst of slider values commits one rebuild.
//!
//! # Architecture
//!
//! The state sits behind a single mutex. Every transition (tick, scrub
//! commit, reset) runs inside one lock scope without awaiting, so
//! observers never see a half-rebuilt population and no two rebuilds
//! interleave. After each transition a [`SimulationSnapshot`] is published
//! on a [`watch`] channel from inside the same lock scope, so publication
//! order is transition order.
//!
//! Commands that start background work (`play_pause`, `set_day`) must be
//! called from within a Tokio runtime.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use cortex_types::{Cell, LayerSpec, Position};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::clock::ClockError;
use crate::config::SimulationConfig;
use crate::debounce::Debouncer;
use crate::layers;
use crate::motion;
use crate::state::{Census, SimulationSnapshot, SimulationState, TickOutcome};

/// Shared handle to the simulation state.
type SharedState = Arc<Mutex<SimulationState>>;

/// Owns the simulation state and drives playback and scrubbing.
#[derive(Debug)]
pub struct SimulationDriver {
    /// The simulation state, mutated only through this driver.
    state: SharedState,

    /// Wall-clock time between playback ticks.
    tick_interval: Duration,

    /// Running playback task, if any.
    playback: Mutex<Option<JoinHandle<()>>>,

    /// Debouncer for scrub commits.
    scrub: Debouncer,

    /// Latest snapshot, republished after every transition.
    updates: Arc<watch::Sender<SimulationSnapshot>>,
}

impl SimulationDriver {
    /// Create a paused driver at the start of the configured timeline.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidBounds`] if the timeline is unusable.
    pub fn new(config: &SimulationConfig) -> Result<Self, ClockError> {
        let state = SimulationState::new(config)?;
        let (updates, _initial_rx) = watch::channel(state.snapshot());
        info!(
            seed = state.seed(),
            tick_interval_ms = config.timeline.tick_interval_ms,
            debounce_ms = config.timeline.debounce_ms,
            "simulation driver initialized"
        );
        Ok(Self {
            state: Arc::new(Mutex::new(state)),
            tick_interval: Duration::from_millis(config.timeline.tick_interval_ms),
            playback: Mutex::new(None),
            scrub: Debouncer::new(Duration::from_millis(config.timeline.debounce_ms)),
            updates: Arc::new(updates),
        })
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Toggle playback. Returns the new playing state.
    ///
    /// Starting playback spawns the tick task; pausing aborts it.
    pub fn play_pause(&self) -> bool {
        let (playing, day) = {
            let mut state = lock(&self.state);
            let playing = state.toggle_playing();
            self.updates.send_replace(state.snapshot());
            (playing, state.day())
        };

        if playing {
            self.start_playback();
            info!(day, "playback started");
        } else {
            self.abort_playback();
            info!(day, "playback paused");
        }
        playing
    }

    /// Scrub to `day`. The rebuild commits after the debounce period
    /// unless another scrub or a reset supersedes it.
    pub fn set_day(&self, day: f64) {
        let state = Arc::clone(&self.state);
        let updates = Arc::clone(&self.updates);
        debug!(day, "scrub scheduled");
        self.scrub.schedule(move || {
            let mut state = lock(&state);
            state.scrub_to(day);
            updates.send_replace(state.snapshot());
        });
    }

    /// Cancel any pending scrub, stop playback, and rebuild the population
    /// at the first day.
    pub fn reset(&self) {
        if self.scrub.cancel() {
            debug!("pending scrub cancelled by reset");
        }
        self.abort_playback();
        let mut state = lock(&self.state);
        state.reset();
        self.updates.send_replace(state.snapshot());
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Current simulated day.
    pub fn day(&self) -> f64 {
        lock(&self.state).day()
    }

    /// Whether playback is running.
    pub fn is_playing(&self) -> bool {
        lock(&self.state).is_playing()
    }

    /// Literal label of the current developmental stage.
    pub fn stage_label(&self) -> &'static str {
        lock(&self.state).stage_label()
    }

    /// Copy of all current cells, in creation order.
    pub fn cells(&self) -> Vec<Cell> {
        lock(&self.state).cells().to_vec()
    }

    /// Count the current cells by kind.
    pub fn census(&self) -> Census {
        lock(&self.state).census()
    }

    /// Number of wholesale rebuilds performed so far.
    pub fn revision(&self) -> u64 {
        lock(&self.state).revision()
    }

    /// Capture a snapshot of the current state.
    pub fn snapshot(&self) -> SimulationSnapshot {
        lock(&self.state).snapshot()
    }

    /// Subscribe to snapshots published after every transition.
    pub fn subscribe(&self) -> watch::Receiver<SimulationSnapshot> {
        self.updates.subscribe()
    }

    /// The static layer table.
    pub const fn layer_specs() -> &'static [LayerSpec] {
        layers::layer_specs()
    }

    /// Position of `cell` at `day`.
    pub fn position(cell: &Cell, day: f64) -> Position {
        motion::position(cell, day)
    }

    /// Whether a scrub is waiting to commit.
    pub fn scrub_pending(&self) -> bool {
        self.scrub.is_pending()
    }

    /// Whether the playback task is alive.
    pub fn playback_running(&self) -> bool {
        lock(&self.playback)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    // -----------------------------------------------------------------------
    // Playback task
    // -----------------------------------------------------------------------

    fn start_playback(&self) {
        let task = tokio::spawn(playback_loop(
            Arc::clone(&self.state),
            Arc::clone(&self.updates),
            self.tick_interval,
        ));
        if let Some(previous) = lock(&self.playback).replace(task) {
            previous.abort();
        }
    }

    /// Abort the playback task. A step already past its last await still
    /// finds the state paused and publishes nothing.
    fn abort_playback(&self) {
        if let Some(task) = lock(&self.playback).take() {
            task.abort();
        }
    }
}

impl Drop for SimulationDriver {
    fn drop(&mut self) {
        let playback = self
            .playback
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(task) = playback.take() {
            task.abort();
        }
    }
}

/// Tick the state every `interval` until playback stops.
async fn playback_loop(
    state: SharedState,
    updates: Arc<watch::Sender<SimulationSnapshot>>,
    interval: Duration,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; playback steps one interval later.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let outcome = {
            let mut state = lock(&state);
            let outcome = state.tick();
            if !matches!(outcome, TickOutcome::Idle) {
                updates.send_replace(state.snapshot());
            }
            outcome
        };
        match outcome {
            TickOutcome::Advanced { .. } => {}
            TickOutcome::Finished { day, .. } => {
                info!(day, "playback finished");
                break;
            }
            TickOutcome::Idle => break,
        }
    }
}

/// Lock a mutex, recovering the data if a previous holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
