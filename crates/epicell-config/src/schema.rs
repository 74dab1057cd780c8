//! Typed mirror of the scenario document's fixed structure.
//!
//! Cell blocks stay as [`serde_json::Value`] so that the `default` block
//! can be merged under them before they are interpreted.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use epicell_core::{CellId, ConfigError};
use epicell_space::{EdgeBehavior, Neighbourhood, Offset};

/// The whole scenario document.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct RawScenario {
    /// `"continuous"` (default) or `"discrete"`.
    #[serde(default)]
    pub numeric: Option<String>,
    /// Fallback output delay.
    #[serde(default)]
    pub default_delay: Option<f64>,
    /// Evaluation worker threads.
    #[serde(default)]
    pub workers: Option<usize>,
    /// Topology; an explicit graph if absent.
    #[serde(default)]
    pub topology: TopologySpec,
    /// Cell blocks keyed by id, in document order.
    pub cells: IndexMap<String, Value>,
}

/// How the cells are connected.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TopologySpec {
    /// Cells are the keys of `cells`; edges come from each block's
    /// `neighborhood` map.
    #[default]
    Graph,
    /// A regular grid with ids `"(row,col)"`.
    Grid {
        /// Number of rows.
        rows: u32,
        /// Number of columns.
        cols: u32,
        /// Treatment of offsets that leave the grid.
        #[serde(default)]
        edge: EdgeSpec,
        /// Neighbourhood shape; Moore radius 1 if absent.
        #[serde(default, alias = "neighborhood")]
        neighbourhood: NeighbourhoodSpec,
    },
}

/// Serialized form of [`EdgeBehavior`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeSpec {
    /// See [`EdgeBehavior::Absorb`].
    #[default]
    Absorb,
    /// See [`EdgeBehavior::Clamp`].
    Clamp,
    /// See [`EdgeBehavior::Wrap`].
    Wrap,
}

impl From<EdgeSpec> for EdgeBehavior {
    fn from(spec: EdgeSpec) -> Self {
        match spec {
            EdgeSpec::Absorb => Self::Absorb,
            EdgeSpec::Clamp => Self::Clamp,
            EdgeSpec::Wrap => Self::Wrap,
        }
    }
}

/// Serialized form of [`Neighbourhood`].
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NeighbourhoodSpec {
    /// See [`Neighbourhood::VonNeumann`].
    VonNeumann {
        /// Manhattan radius, default 1.
        #[serde(default = "default_radius")]
        radius: u32,
        /// Uniform edge weight, default 1.
        #[serde(default = "default_weight")]
        weight: f64,
    },
    /// See [`Neighbourhood::Moore`].
    Moore {
        /// Chebyshev radius, default 1.
        #[serde(default = "default_radius")]
        radius: u32,
        /// Uniform edge weight, default 1.
        #[serde(default = "default_weight")]
        weight: f64,
    },
    /// See [`Neighbourhood::Offsets`].
    Offsets {
        /// The weighted offsets.
        offsets: Vec<OffsetSpec>,
    },
}

impl Default for NeighbourhoodSpec {
    fn default() -> Self {
        Self::Moore {
            radius: default_radius(),
            weight: default_weight(),
        }
    }
}

/// One entry of an explicit offset list.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct OffsetSpec {
    /// Row offset.
    pub dr: i32,
    /// Column offset.
    pub dc: i32,
    /// Edge weight, default 1.
    #[serde(default = "default_weight")]
    pub weight: f64,
}

impl From<NeighbourhoodSpec> for Neighbourhood {
    fn from(spec: NeighbourhoodSpec) -> Self {
        match spec {
            NeighbourhoodSpec::VonNeumann { radius, weight } => Self::VonNeumann { radius, weight },
            NeighbourhoodSpec::Moore { radius, weight } => Self::Moore { radius, weight },
            NeighbourhoodSpec::Offsets { offsets } => Self::Offsets(
                offsets
                    .into_iter()
                    .map(|o| Offset::new(o.dr, o.dc, o.weight))
                    .collect(),
            ),
        }
    }
}

/// The recognised fields of one cell block.
///
/// Every field is optional so partial blocks (overrides, `default`) parse
/// too. Leaf values stay as [`Value`] so each is checked under its own
/// name; keys outside the schema are collected in `unknown`.
#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct RawCellBlock {
    /// Registered model name.
    pub model: Option<String>,
    /// Compartment counts keyed `S`, `E`, `I`, `R`.
    pub state: Option<IndexMap<String, Value>>,
    /// Model parameters.
    pub config: Option<IndexMap<String, Value>>,
    /// In-neighbour weights keyed by cell id.
    #[serde(alias = "neighbourhood")]
    pub neighborhood: Option<IndexMap<String, Value>>,
    /// Everything else.
    #[serde(flatten)]
    pub unknown: IndexMap<String, Value>,
}

impl RawCellBlock {
    pub fn from_value(id: &CellId, block: &Value) -> Result<Self, ConfigError> {
        Self::deserialize(block).map_err(|e| ConfigError::invalid(id, "block", e.to_string()))
    }
}

fn default_radius() -> u32 {
    1
}

fn default_weight() -> f64 {
    1.0
}
