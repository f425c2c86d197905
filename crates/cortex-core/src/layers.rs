//! The static cortical layer table.
//!
//! Layers are declared in ascending formation-start order, which is the
//! order cohorts are generated in. Each neuron kind settles in exactly one
//! layer; the pairing is an explicit table rather than a lookup by name.
//!
//! | Layer | Forms at | Cohort | Offset |
//! |-------|----------|--------|--------|
//! | I     | E10.5    | 8      | 0.10   |
//! | VI    | E11.5    | 12     | 0.80   |
//! | V     | E12.0    | 12     | 0.65   |
//! | IV    | E12.5    | 12     | 0.50   |
//! | III   | E13.5    | 12     | 0.35   |
//! | II    | E14.0    | 12     | 0.22   |

use cortex_types::{CellType, LayerId, LayerSpec};

/// All cortical layers, ascending by formation start.
pub const LAYERS: [LayerSpec; 6] = [
    LayerSpec {
        id: LayerId::I,
        name: "Layer I (Molecular)",
        formation_start: 10.5,
        formation_end: 11.5,
        offset: 0.10,
        color: "#E9C46A",
        cohort_size: 8,
    },
    LayerSpec {
        id: LayerId::VI,
        name: "Layer VI (Multiform)",
        formation_start: 11.5,
        formation_end: 12.5,
        offset: 0.80,
        color: "#264653",
        cohort_size: 12,
    },
    LayerSpec {
        id: LayerId::V,
        name: "Layer V (Internal Pyramidal)",
        formation_start: 12.0,
        formation_end: 13.0,
        offset: 0.65,
        color: "#2A9D8F",
        cohort_size: 12,
    },
    LayerSpec {
        id: LayerId::IV,
        name: "Layer IV (Internal Granular)",
        formation_start: 12.5,
        formation_end: 13.5,
        offset: 0.50,
        color: "#8AB17D",
        cohort_size: 12,
    },
    LayerSpec {
        id: LayerId::III,
        name: "Layer III (External Pyramidal)",
        formation_start: 13.5,
        formation_end: 14.5,
        offset: 0.35,
        color: "#F4A261",
        cohort_size: 12,
    },
    LayerSpec {
        id: LayerId::II,
        name: "Layer II (External Granular)",
        formation_start: 14.0,
        formation_end: 15.0,
        offset: 0.22,
        color: "#E76F51",
        cohort_size: 12,
    },
];

/// Which layer each neuron kind settles in. Progenitors have no entry.
const SETTLES_IN: [(CellType, LayerId); 6] = [
    (CellType::LayerI, LayerId::I),
    (CellType::LayerII, LayerId::II),
    (CellType::LayerIII, LayerId::III),
    (CellType::LayerIV, LayerId::IV),
    (CellType::LayerV, LayerId::V),
    (CellType::LayerVI, LayerId::VI),
];

/// The static layer table, ascending by formation start.
pub const fn layer_specs() -> &'static [LayerSpec] {
    &LAYERS
}

/// Look up a layer by id.
pub fn layer(id: LayerId) -> Option<&'static LayerSpec> {
    LAYERS.iter().find(|l| l.id == id)
}

/// The layer a cell kind settles in, or `None` for progenitors.
pub fn layer_for(cell_type: CellType) -> Option<&'static LayerSpec> {
    SETTLES_IN
        .iter()
        .find(|(t, _)| *t == cell_type)
        .and_then(|(_, id)| layer(*id))
}

/// The neuron kind whose cohort populates `id`.
pub fn cell_type_for(id: LayerId) -> Option<CellType> {
    SETTLES_IN
        .iter()
        .find(|(_, layer_id)| *layer_id == id)
        .map(|(t, _)| *t)
}
