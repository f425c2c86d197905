//! Enumeration types for the corticogenesis simulation.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Cell kinds
// ---------------------------------------------------------------------------

/// The kind of a simulated cell.
///
/// Progenitors (radial glia) exist from the first simulated day and span the
/// cortical wall. The six neuron kinds are born in cohorts and migrate from
/// the ventricular zone to their destination layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CellType {
    /// Radial glial progenitor.
    Progenitor,
    /// Layer I (molecular layer) neuron, including the preplate neurons.
    LayerI,
    /// Layer II neuron.
    LayerII,
    /// Layer III neuron.
    LayerIII,
    /// Layer IV neuron.
    LayerIV,
    /// Layer V neuron.
    LayerV,
    /// Layer VI neuron.
    LayerVI,
}

impl CellType {
    /// Every cell kind, progenitor first, then neurons in layer order.
    pub const ALL: [Self; 7] = [
        Self::Progenitor,
        Self::LayerI,
        Self::LayerII,
        Self::LayerIII,
        Self::LayerIV,
        Self::LayerV,
        Self::LayerVI,
    ];

    /// Canonical display label. The first word-group (`"Layer IV"`) names
    /// the layer the neuron kind settles in.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Progenitor => "Radial Glia",
            Self::LayerI => "Layer I Neuron",
            Self::LayerII => "Layer II Neuron",
            Self::LayerIII => "Layer III Neuron",
            Self::LayerIV => "Layer IV Neuron",
            Self::LayerV => "Layer V Neuron",
            Self::LayerVI => "Layer VI Neuron",
        }
    }

    /// Whether this kind is a neuron (anything but a progenitor).
    pub const fn is_neuron(self) -> bool {
        !matches!(self, Self::Progenitor)
    }
}

impl core::fmt::Display for CellType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Cortical layers
// ---------------------------------------------------------------------------

/// Identifier of one of the six cortical layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LayerId {
    /// Molecular layer.
    I,
    /// External granular layer.
    II,
    /// External pyramidal layer.
    III,
    /// Internal granular layer.
    IV,
    /// Internal pyramidal layer.
    V,
    /// Multiform layer.
    VI,
}

impl LayerId {
    /// Roman numeral of the layer.
    pub const fn numeral(self) -> &'static str {
        match self {
            Self::I => "I",
            Self::II => "II",
            Self::III => "III",
            Self::IV => "IV",
            Self::V => "V",
            Self::VI => "VI",
        }
    }
}

// ---------------------------------------------------------------------------
// Developmental stages
// ---------------------------------------------------------------------------

/// Developmental stage shown alongside the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Preplate splits and Layer I forms.
    Preplate,
    /// Deep layers VI, V and IV are populated.
    DeepLayers,
    /// Superficial layers III and II are populated.
    SuperficialLayers,
    /// Migration is over; circuits mature.
    Maturation,
}

impl Stage {
    /// Literal stage name.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Preplate => "Preplate & Layer I Formation",
            Self::DeepLayers => "Deep Layer Formation (VI, V, IV)",
            Self::SuperficialLayers => "Superficial Layer Formation (III, II)",
            Self::Maturation => "Synaptic Refinement & Maturation",
        }
    }
}

impl core::fmt::Display for Stage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Migration phases
// ---------------------------------------------------------------------------

/// Where a cell is in its migration window at a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MigrationPhase {
    /// The window has not opened; the cell sits at its origin.
    Pending,
    /// The cell is moving between origin and destination.
    Migrating,
    /// The window has closed; the cell sits at its destination.
    Settled,
}
