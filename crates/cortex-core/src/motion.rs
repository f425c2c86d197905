//! Position interpolation along migration windows.
//!
//! A cell's position is a pure function of the simulated day: it sits at
//! its origin until the window opens, moves linearly to its destination
//! while the window is open, and stays there once the window closes.

use cortex_types::{Cell, MigrationPhase, Position};

/// Fraction of `cell`'s migration completed at `day`, in `[0, 1]`.
///
/// A zero-length window counts as complete as soon as it opens.
pub fn migration_progress(cell: &Cell, day: f64) -> f64 {
    if day < cell.migration_start {
        return 0.0;
    }
    let span = cell.migration_end - cell.migration_start;
    if span <= 0.0 {
        return 1.0;
    }
    ((day - cell.migration_start) / span).clamp(0.0, 1.0)
}

/// Position of `cell` at `day`.
pub fn position(cell: &Cell, day: f64) -> Position {
    if day < cell.migration_start {
        return cell.origin;
    }
    if day >= cell.migration_end {
        return cell.destination;
    }
    cell.origin.lerp(cell.destination, migration_progress(cell, day))
}

/// Migration phase of `cell` at `day`.
pub fn phase(cell: &Cell, day: f64) -> MigrationPhase {
    if day < cell.migration_start {
        MigrationPhase::Pending
    } else if day < cell.migration_end {
        MigrationPhase::Migrating
    } else {
        MigrationPhase::Settled
    }
}
