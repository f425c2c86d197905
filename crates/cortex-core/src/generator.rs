//! Population generation: the initial cortical wall and per-layer cohorts.
//!
//! The generator decides *which* cells exist purely from the simulated
//! day. Randomness only touches placement: horizontal origin, horizontal
//! drift, and how long each neuron takes to migrate. Given the same RNG
//! state the output is identical, cell IDs included.
//!
//! A layer's cohort exists at `day` once `day` has moved past the layer's
//! formation start. During playback [`layers_crossed`] reports the layers
//! whose thresholds fall inside one tick's interval; concatenating those
//! intervals from the start of the timeline yields exactly
//! [`layers_formed_by`] at the end.

use std::ops::RangeInclusive;

use cortex_types::{Cell, CellId, CellType, LayerSpec, Position};
use rand::Rng;
use tracing::debug;

use crate::config::PopulationConfig;
use crate::layers::{self, LAYERS};

/// Horizontal range births are spread across.
const ORIGIN_X: RangeInclusive<f64> = 0.1..=0.9;

/// Vertical coordinate of the ventricular boundary, where neurons are born.
const VENTRICULAR_Y: f64 = 1.0;

/// How close to the pial surface progenitor fibres reach.
const PIAL_REACH_Y: f64 = 0.05;

/// Maximum horizontal drift during migration, either direction.
const DRIFT: f64 = 0.05;

/// Migration duration range for cohort neurons, in simulated days.
const MIGRATION_DAYS: RangeInclusive<f64> = 2.0..=3.0;

/// Length of the fixed migration window of the initial population.
const INITIAL_MIGRATION_DAYS: f64 = 0.5;

/// Build the population present at the first simulated day.
///
/// Progenitors stretch from the ventricular boundary to just below the
/// pial surface. Preplate neurons (Layer I kind) head for Layer I. Both
/// groups share the fixed window `[start_day, start_day + 0.5]`.
pub fn initial_population(
    config: &PopulationConfig,
    start_day: f64,
    rng: &mut impl Rng,
) -> Vec<Cell> {
    let window = (start_day, start_day + INITIAL_MIGRATION_DAYS);
    let mut cells = Vec::with_capacity(
        config
            .progenitor_count
            .saturating_add(config.early_neuron_count),
    );

    for _ in 0..config.progenitor_count {
        let x = rng.random_range(ORIGIN_X);
        cells.push(make_cell(
            rng,
            CellType::Progenitor,
            Position::new(x, VENTRICULAR_Y),
            Position::new(x, PIAL_REACH_Y),
            window,
        ));
    }

    if let Some(layer_one) = layers::layer_for(CellType::LayerI) {
        for _ in 0..config.early_neuron_count {
            let origin = random_origin(rng);
            let destination = drifted(rng, origin, layer_one.offset);
            cells.push(make_cell(rng, CellType::LayerI, origin, destination, window));
        }
    }

    debug!(
        progenitors = config.progenitor_count,
        early_neurons = config.early_neuron_count,
        "initial population generated"
    );
    cells
}

/// Generate `count` neurons of `cell_type` born on `day`.
///
/// The destination height comes from the layer the kind settles in. Kinds
/// without a layer (progenitors) produce no cells.
pub fn generate_cohort(
    cell_type: CellType,
    count: usize,
    day: f64,
    rng: &mut impl Rng,
) -> Vec<Cell> {
    let Some(layer) = layers::layer_for(cell_type) else {
        debug!(%cell_type, "no layer for cell type, cohort skipped");
        return Vec::new();
    };

    let cells: Vec<Cell> = (0..count)
        .map(|_| {
            let origin = random_origin(rng);
            let destination = drifted(rng, origin, layer.offset);
            let end = day + rng.random_range(MIGRATION_DAYS);
            make_cell(rng, cell_type, origin, destination, (day, end))
        })
        .collect();

    debug!(
        layer = layer.name,
        count = cells.len(),
        day,
        "cohort generated"
    );
    cells
}

/// Generate the full cohort of `layer`, born on its formation start.
pub fn layer_cohort(layer: &LayerSpec, rng: &mut impl Rng) -> Vec<Cell> {
    layers::cell_type_for(layer.id).map_or_else(Vec::new, |cell_type| {
        generate_cohort(cell_type, layer.cohort_size, layer.formation_start, rng)
    })
}

/// Layers whose cohort exists at `day`, ascending by formation start.
pub fn layers_formed_by(day: f64) -> impl Iterator<Item = &'static LayerSpec> {
    LAYERS.iter().filter(move |l| day > l.formation_start)
}

/// Layers whose cohort appears while time moves from `previous` to `day`.
///
/// The interval is `[previous, day)` on formation start, so that stepping
/// through adjacent intervals fires every layer exactly once and agrees
/// with [`layers_formed_by`] at every step boundary.
///
/// This is deliberately not the `(day - step, day]` window. A threshold
/// that falls exactly on a step boundary fires on the step that *leaves*
/// it, not the step that lands on it: [`layers_formed_by`] uses a strict
/// `day > formation_start`, so a rebuild at that boundary does not hold
/// the cohort yet either.
pub fn layers_crossed(previous: f64, day: f64) -> impl Iterator<Item = &'static LayerSpec> {
    LAYERS
        .iter()
        .filter(move |l| previous <= l.formation_start && l.formation_start < day)
}

/// Build the complete population that exists at `day`: the initial
/// population followed by every formed layer's cohort.
pub fn population_at(
    day: f64,
    config: &PopulationConfig,
    start_day: f64,
    rng: &mut impl Rng,
) -> Vec<Cell> {
    let mut cells = initial_population(config, start_day, rng);
    for layer in layers_formed_by(day) {
        cells.extend(layer_cohort(layer, rng));
    }
    cells
}

fn random_origin(rng: &mut impl Rng) -> Position {
    Position::new(rng.random_range(ORIGIN_X), VENTRICULAR_Y)
}

fn drifted(rng: &mut impl Rng, origin: Position, offset: f64) -> Position {
    Position::new(origin.x + rng.random_range(-DRIFT..=DRIFT), offset)
}

fn make_cell(
    rng: &mut impl Rng,
    cell_type: CellType,
    origin: Position,
    destination: Position,
    (migration_start, migration_end): (f64, f64),
) -> Cell {
    Cell {
        id: CellId::from_random_bytes(rng.random()),
        cell_type,
        origin,
        destination,
        migration_start,
        migration_end,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::clock::{START_DAY, TICK_STEP, TOTAL_DAY};

    fn count_of(cells: &[Cell], cell_type: CellType) -> usize {
        cells.iter().filter(|c| c.cell_type == cell_type).count()
    }

    fn kinds(cells: &[Cell]) -> BTreeSet<CellType> {
        cells.iter().map(|c| c.cell_type).collect()
    }

    #[test]
    fn initial_population_counts_and_window() {
        let mut rng = SmallRng::seed_from_u64(42);
        let cells = initial_population(&PopulationConfig::default(), START_DAY, &mut rng);

        assert_eq!(count_of(&cells, CellType::Progenitor), 15);
        assert_eq!(count_of(&cells, CellType::LayerI), 8);
        assert_eq!(cells.len(), 23);
        for cell in &cells {
            assert!((cell.migration_start - 10.0).abs() < 1e-12);
            assert!((cell.migration_end - 10.5).abs() < 1e-12);
            assert!(ORIGIN_X.contains(&cell.origin.x));
            assert!((cell.origin.y - VENTRICULAR_Y).abs() < 1e-12);
        }
    }

    #[test]
    fn progenitors_span_the_wall_vertically() {
        let mut rng = SmallRng::seed_from_u64(1);
        let cells = initial_population(&PopulationConfig::default(), START_DAY, &mut rng);
        for cell in cells.iter().filter(|c| c.cell_type == CellType::Progenitor) {
            assert!((cell.origin.x - cell.destination.x).abs() < 1e-12);
            assert!((cell.destination.y - PIAL_REACH_Y).abs() < 1e-12);
        }
    }

    #[test]
    fn cohort_placement_rules() {
        let mut rng = SmallRng::seed_from_u64(7);
        let cells = generate_cohort(CellType::LayerIV, 500, 12.5, &mut rng);
        assert_eq!(cells.len(), 500);

        for cell in &cells {
            assert_eq!(cell.cell_type, CellType::LayerIV);
            assert!(ORIGIN_X.contains(&cell.origin.x));
            assert!((cell.origin.y - 1.0).abs() < 1e-12);
            assert!((cell.destination.x - cell.origin.x).abs() <= DRIFT + 1e-12);
            assert!((cell.destination.y - 0.50).abs() < 1e-12);
            assert!((cell.migration_start - 12.5).abs() < 1e-12);
            let duration = cell.migration_end - cell.migration_start;
            assert!((2.0..=3.0).contains(&duration), "duration {duration}");
        }
    }

    #[test]
    fn progenitor_cohort_is_empty() {
        let mut rng = SmallRng::seed_from_u64(7);
        assert!(generate_cohort(CellType::Progenitor, 12, 12.0, &mut rng).is_empty());
    }

    #[test]
    fn cohort_ids_are_unique() {
        let mut rng = SmallRng::seed_from_u64(11);
        let cells = population_at(TOTAL_DAY, &PopulationConfig::default(), START_DAY, &mut rng);
        let ids: BTreeSet<CellId> = cells.iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), cells.len());
    }

    #[test]
    fn same_seed_same_population() {
        for day in [10.0, 10.6, 12.2, 13.6, 15.0, 18.0] {
            let a = population_at(
                day,
                &PopulationConfig::default(),
                START_DAY,
                &mut SmallRng::seed_from_u64(5),
            );
            let b = population_at(
                day,
                &PopulationConfig::default(),
                START_DAY,
                &mut SmallRng::seed_from_u64(5),
            );
            assert_eq!(a, b, "day {day}");
        }
    }

    #[test]
    fn membership_does_not_depend_on_seed() {
        for day in [10.0, 10.6, 12.2, 13.6, 15.0, 18.0] {
            let a = population_at(
                day,
                &PopulationConfig::default(),
                START_DAY,
                &mut SmallRng::seed_from_u64(1),
            );
            let b = population_at(
                day,
                &PopulationConfig::default(),
                START_DAY,
                &mut SmallRng::seed_from_u64(2),
            );
            assert_eq!(kinds(&a), kinds(&b), "day {day}");
            assert_eq!(a.len(), b.len(), "day {day}");
        }
    }

    #[test]
    fn layers_formed_by_thresholds() {
        assert_eq!(layers_formed_by(10.5).count(), 0);
        assert_eq!(layers_formed_by(10.51).count(), 1);
        assert_eq!(layers_formed_by(12.0).count(), 2);
        assert_eq!(layers_formed_by(12.01).count(), 3);
        assert_eq!(layers_formed_by(TOTAL_DAY).count(), 6);
    }

    #[test]
    fn stepping_crosses_each_layer_once() {
        let mut fired = Vec::new();
        let mut previous = START_DAY;
        while previous < TOTAL_DAY {
            let day = (previous + TICK_STEP).min(TOTAL_DAY);
            fired.extend(layers_crossed(previous, day).map(|l| l.id));
            previous = day;
        }
        let expected: Vec<_> = layers_formed_by(TOTAL_DAY).map(|l| l.id).collect();
        assert_eq!(fired, expected);
    }

    #[test]
    fn threshold_on_step_boundary_fires_on_leaving_step() {
        // Layer V forms at exactly 12.0.
        let landing: Vec<_> = layers_crossed(11.95, 12.0).map(|l| l.id).collect();
        let leaving: Vec<_> = layers_crossed(12.0, 12.05).map(|l| l.id).collect();
        assert!(!landing.contains(&cortex_types::LayerId::V));
        assert_eq!(leaving, vec![cortex_types::LayerId::V]);
        assert!(layers_formed_by(12.0).all(|l| l.id != cortex_types::LayerId::V));
    }

    #[test]
    fn full_population_at_end() {
        let mut rng = SmallRng::seed_from_u64(3);
        let cells = population_at(TOTAL_DAY, &PopulationConfig::default(), START_DAY, &mut rng);
        assert_eq!(cells.len(), 15 + 8 + 8 + 5 * 12);
        assert_eq!(count_of(&cells, CellType::LayerI), 16);
        assert_eq!(count_of(&cells, CellType::LayerII), 12);
        assert_eq!(count_of(&cells, CellType::LayerVI), 12);
    }
}
