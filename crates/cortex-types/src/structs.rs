//! Core value structs: positions, cells, and layer descriptors.
//!
//! Coordinates are normalized to the unit square. `y = 0.0` is the pial
//! surface (top of the cortical wall) and `y = 1.0` is the ventricular
//! boundary (bottom), where every migrating neuron is born.

use serde::{Deserialize, Serialize};

use crate::enums::{CellType, LayerId};
use crate::ids::CellId;

/// A point in the normalized cortical section.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate in `[0, 1]`.
    pub x: f64,
    /// Vertical coordinate in `[0, 1]`, pial surface at 0.
    pub y: f64,
}

impl Position {
    /// Create a position from its coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Linear interpolation towards `target`; `t = 0` is `self`, `t = 1`
    /// is `target`. `t` is not clamped.
    pub fn lerp(self, target: Self, t: f64) -> Self {
        Self {
            x: (target.x - self.x).mul_add(t, self.x),
            y: (target.y - self.y).mul_add(t, self.y),
        }
    }
}

/// A simulated cell with a fixed migration trajectory.
///
/// Cells are immutable once created. The population is regenerated
/// wholesale rather than patched, so there are no setters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Unique identifier.
    pub id: CellId,
    /// Kind of cell.
    pub cell_type: CellType,
    /// Where the cell sits before its migration window opens.
    pub origin: Position,
    /// Where the cell sits once its migration window has closed.
    pub destination: Position,
    /// Simulated day the migration begins.
    pub migration_start: f64,
    /// Simulated day the migration ends (`>= migration_start`).
    pub migration_end: f64,
}

/// Static descriptor of one cortical layer.
///
/// The layer table is fixed at compile time; see `cortex_core::layers`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayerSpec {
    /// Which layer this describes.
    pub id: LayerId,
    /// Display name, e.g. `"Layer IV (Internal Granular)"`.
    pub name: &'static str,
    /// Simulated day the layer's cohort is born.
    pub formation_start: f64,
    /// Simulated day the layer is considered formed.
    pub formation_end: f64,
    /// Resting vertical offset of the layer's neurons, in `[0, 1]`.
    pub offset: f64,
    /// Display color as a `#RRGGBB` string. Opaque to the simulation.
    pub color: &'static str,
    /// Number of neurons in the layer's cohort.
    pub cohort_size: usize,
}
