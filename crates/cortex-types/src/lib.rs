//! Shared type definitions for the corticogenesis simulation.
//!
//! This crate holds the value types that flow between the simulation core
//! and whatever presentation layer consumes it. Nothing here owns time or
//! randomness; see `cortex-core` for the clock and the population generator.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrapper for cell identifiers
//! - [`enums`] -- Cell kinds, cortical layers, developmental stages, migration phases
//! - [`structs`] -- Positions, cells, and static layer descriptors

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{CellType, LayerId, MigrationPhase, Stage};
pub use ids::CellId;
pub use structs::{Cell, LayerSpec, Position};
