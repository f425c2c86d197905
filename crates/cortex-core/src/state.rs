//! The owned simulation state and its transitions.
//!
//! [`SimulationState`] bundles the clock, the cell population, the derived
//! stage, and the RNG that places cells. It is mutated in exactly three
//! ways:
//!
//! 1. **Tick** -- advance one step and append the cohorts whose formation
//!    threshold the step crossed ([`SimulationState::tick`]).
//! 2. **Scrub** -- jump to a day and rebuild the population from scratch
//!    ([`SimulationState::scrub_to`]).
//! 3. **Reset** -- rewind to the first day and rebuild the population
//!    that exists there ([`SimulationState::reset`]).
//!
//! Rebuilds reseed the RNG from the session seed first, so the population
//! after a scrub or reset depends only on the target day.

use std::collections::BTreeMap;

use cortex_types::{Cell, CellType, Stage};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::Serialize;
use tracing::{debug, info};

use crate::clock::{ClockError, SimulationClock};
use crate::config::{PopulationConfig, SimulationConfig};
use crate::generator;

/// What a single [`SimulationState::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Playback is paused; nothing happened.
    Idle,
    /// The clock advanced and playback continues.
    Advanced {
        /// Day after the step.
        day: f64,
        /// Number of cells the step added.
        cells_added: usize,
    },
    /// Playback reached the end of the timeline and stopped.
    Finished {
        /// Final day (always the end of the timeline).
        day: f64,
        /// Number of cells the final step added.
        cells_added: usize,
    },
}

/// Number of cells of each kind currently present.
pub type Census = BTreeMap<CellType, usize>;

/// Point-in-time view of the simulation, published after every transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationSnapshot {
    /// Current simulated day.
    pub day: f64,
    /// Whether playback is running.
    pub playing: bool,
    /// Developmental stage at `day`.
    pub stage: Stage,
    /// Literal label of `stage`.
    pub stage_label: &'static str,
    /// Fraction of the timeline elapsed, in `[0, 1]`.
    pub progress: f64,
    /// Number of wholesale rebuilds so far.
    pub revision: u64,
    /// Every cell, in creation order.
    pub cells: Vec<Cell>,
}

/// The mutable simulation state owned by the driver.
#[derive(Debug)]
pub struct SimulationState {
    /// The simulation clock.
    clock: SimulationClock,
    /// Population sizes used by rebuilds.
    population: PopulationConfig,
    /// Session seed; every rebuild restarts the RNG from it.
    seed: u64,
    /// Placement RNG.
    rng: SmallRng,
    /// All current cells, in creation order.
    cells: Vec<Cell>,
    /// Stage at the current day.
    stage: Stage,
    /// Number of wholesale rebuilds performed.
    revision: u64,
}

impl SimulationState {
    /// Create a state at the start of the timeline with its initial
    /// population in place.
    ///
    /// When the configuration carries no seed one is drawn from OS entropy
    /// and kept for the lifetime of the state.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidBounds`] if the timeline is unusable.
    pub fn new(config: &SimulationConfig) -> Result<Self, ClockError> {
        let clock = SimulationClock::new(&config.timeline)?;
        let seed = config
            .population
            .seed
            .unwrap_or_else(rand::random::<u64>);
        let stage = clock.stage();
        let mut state = Self {
            clock,
            population: config.population.clone(),
            seed,
            rng: SmallRng::seed_from_u64(seed),
            cells: Vec::new(),
            stage,
            revision: 0,
        };
        state.reset();
        Ok(state)
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// Rewind to the first day, pause, and rebuild the population that
    /// exists there.
    ///
    /// This is the same rebuild a scrub to the first day performs, so a
    /// timeline that starts after some layers have formed holds their
    /// cohorts from the outset.
    pub fn reset(&mut self) {
        self.clock.rewind();
        self.full_regenerate(self.clock.start_day());
        self.refresh_stage();
        info!(
            day = self.clock.day(),
            cells = self.cells.len(),
            revision = self.revision,
            "simulation reset"
        );
    }

    /// Jump to `day` (clamped) and rebuild the population that exists
    /// there. Playback state is left as is.
    pub fn scrub_to(&mut self, day: f64) {
        let day = self.clock.jump_to(day);
        self.full_regenerate(day);
        self.refresh_stage();
        info!(
            day,
            cells = self.cells.len(),
            revision = self.revision,
            "scrub committed"
        );
    }

    /// Replace the population with the one that exists at `upto_day`.
    ///
    /// Does not move the clock.
    pub fn full_regenerate(&mut self, upto_day: f64) {
        self.reseed();
        self.cells = generator::population_at(
            upto_day,
            &self.population,
            self.clock.start_day(),
            &mut self.rng,
        );
        self.bump_revision();
    }

    /// Append the cohorts of layers whose formation start lies in
    /// `[previous_day, day)`. Returns the number of cells added.
    pub fn incremental_cohort_trigger(&mut self, previous_day: f64, day: f64) -> usize {
        let before = self.cells.len();
        for layer in generator::layers_crossed(previous_day, day) {
            let cohort = generator::layer_cohort(layer, &mut self.rng);
            info!(layer = layer.name, count = cohort.len(), day, "cohort born");
            self.cells.extend(cohort);
        }
        self.cells.len().saturating_sub(before)
    }

    /// Run one playback step.
    ///
    /// If the clock is already at the end, playback stops without
    /// advancing. Otherwise the clock advances (never past the end), newly
    /// crossed cohorts are appended, and the stage is refreshed. Playback
    /// stops in the same step that lands on the end of the timeline.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.clock.is_playing() {
            return TickOutcome::Idle;
        }
        if self.clock.is_at_end() {
            self.clock.set_playing(false);
            info!(day = self.clock.day(), "playback reached end of timeline");
            return TickOutcome::Finished {
                day: self.clock.day(),
                cells_added: 0,
            };
        }

        let (previous, day) = self.clock.advance();
        let cells_added = self.incremental_cohort_trigger(previous, day);
        self.refresh_stage();
        debug!(day, cells_added, "tick");

        if self.clock.is_at_end() {
            self.clock.set_playing(false);
            info!(day, "playback reached end of timeline");
            return TickOutcome::Finished { day, cells_added };
        }
        TickOutcome::Advanced { day, cells_added }
    }

    /// Flip playback. Returns the new playing state.
    pub fn toggle_playing(&mut self) -> bool {
        let playing = !self.clock.is_playing();
        self.clock.set_playing(playing);
        playing
    }

    /// Stop playback without touching the day.
    pub const fn pause(&mut self) {
        self.clock.set_playing(false);
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// The simulation clock.
    pub const fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    /// Current simulated day.
    pub const fn day(&self) -> f64 {
        self.clock.day()
    }

    /// Whether playback is running.
    pub const fn is_playing(&self) -> bool {
        self.clock.is_playing()
    }

    /// Developmental stage at the current day.
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// Literal label of the current stage.
    pub const fn stage_label(&self) -> &'static str {
        self.stage.label()
    }

    /// All current cells, in creation order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of wholesale rebuilds performed so far.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Session seed.
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Count the current cells by kind. Kinds with no cells are omitted.
    pub fn census(&self) -> Census {
        let mut census = Census::new();
        for cell in &self.cells {
            let entry = census.entry(cell.cell_type).or_insert(0);
            *entry = entry.saturating_add(1);
        }
        census
    }

    /// Capture a snapshot of the current state.
    pub fn snapshot(&self) -> SimulationSnapshot {
        SimulationSnapshot {
            day: self.clock.day(),
            playing: self.clock.is_playing(),
            stage: self.stage,
            stage_label: self.stage.label(),
            progress: self.clock.progress(),
            revision: self.revision,
            cells: self.cells.clone(),
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn reseed(&mut self) {
        self.rng = SmallRng::seed_from_u64(self.seed);
    }

    const fn bump_revision(&mut self) {
        self.revision = self.revision.saturating_add(1);
    }

    fn refresh_stage(&mut self) {
        let stage = self.clock.stage();
        if stage != self.stage {
            info!(from = %self.stage, to = %stage, day = self.clock.day(), "stage changed");
            self.stage = stage;
        }
    }
}
