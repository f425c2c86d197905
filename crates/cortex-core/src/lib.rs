//! Simulation clock, population generator, and playback driver for the
//! corticogenesis simulation.
//!
//! The core models cortical layer formation as a set of cells whose
//! positions are a pure function of simulated time. Everything that exists
//! at a given day can be rebuilt from the day alone; playback only adds the
//! cohorts whose formation threshold the clock just crossed.
//!
//! # Modules
//!
//! - [`clock`] -- Simulated day, bounds, stepping, and stage derivation.
//! - [`config`] -- Configuration loading from `cortex-config.yaml` into
//!   strongly-typed structs.
//! - [`debounce`] -- Cancellable delayed-action utility for scrubbing.
//! - [`driver`] -- [`SimulationDriver`], the command/query surface with
//!   playback and debounced scrubbing.
//! - [`generator`] -- Initial population and cohort generation.
//! - [`layers`] -- The static cortical layer table and type-to-layer mapping.
//! - [`motion`] -- Position interpolation along migration windows.
//! - [`state`] -- [`SimulationState`], the owned state mutated by the driver.
//!
//! [`SimulationDriver`]: driver::SimulationDriver
//! [`SimulationState`]: state::SimulationState

pub mod clock;
pub mod config;
pub mod debounce;
pub mod driver;
pub mod generator;
pub mod layers;
pub mod motion;
pub mod state;
