//! Error types for topology construction and queries.

use epicell_core::CellId;
use std::fmt;

/// Errors arising from topology construction, validation, or lookup.
///
/// Every variant is fatal at build time.
#[derive(Debug, Clone, PartialEq)]
pub enum TopologyError {
    /// A cell id does not exist in the topology.
    UnknownCell {
        /// The unresolved id.
        cell: CellId,
    },
    /// A neighbour id references a cell that does not exist.
    DanglingNeighbour {
        /// The cell whose neighbour list is broken.
        cell: CellId,
        /// The neighbour id that does not resolve.
        neighbour: CellId,
    },
    /// The same cell id was added twice.
    DuplicateCell {
        /// The repeated id.
        cell: CellId,
    },
    /// The same neighbour id appears twice in one cell's neighbour set.
    DuplicateNeighbour {
        /// The cell whose neighbour set repeats an id.
        cell: CellId,
        /// The repeated neighbour id.
        neighbour: CellId,
    },
    /// An influence weight is negative or non-finite.
    InvalidWeight {
        /// The cell receiving the influence.
        cell: CellId,
        /// The neighbour exerting it.
        neighbour: CellId,
        /// The rejected weight.
        weight: f64,
    },
    /// A neighbourhood offset weight is negative or non-finite.
    InvalidOffsetWeight {
        /// Row offset.
        dr: i32,
        /// Column offset.
        dc: i32,
        /// The rejected weight.
        weight: f64,
    },
    /// A grid cell id is not of the form `(row,col)` or lies outside the grid.
    MalformedGridId {
        /// The offending id.
        id: String,
        /// Human-readable description of the valid range.
        bounds: String,
    },
    /// Attempted to construct a topology with zero cells.
    EmptySpace,
    /// A grid dimension exceeds the representable range.
    DimensionTooLarge {
        /// Which dimension.
        name: &'static str,
        /// The requested value.
        value: u32,
        /// The maximum allowed value.
        max: u32,
    },
}

impl fmt::Display for TopologyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCell { cell } => write!(f, "unknown cell '{cell}'"),
            Self::DanglingNeighbour { cell, neighbour } => {
                write!(f, "cell '{cell}' lists neighbour '{neighbour}', which does not exist")
            }
            Self::DuplicateCell { cell } => write!(f, "cell '{cell}' defined more than once"),
            Self::DuplicateNeighbour { cell, neighbour } => {
                write!(f, "cell '{cell}' lists neighbour '{neighbour}' more than once")
            }
            Self::InvalidWeight {
                cell,
                neighbour,
                weight,
            } => write!(
                f,
                "weight {weight} from '{neighbour}' to '{cell}' must be finite and non-negative"
            ),
            Self::InvalidOffsetWeight { dr, dc, weight } => write!(
                f,
                "weight {weight} of neighbourhood offset ({dr},{dc}) must be finite and non-negative"
            ),
            Self::MalformedGridId { id, bounds } => {
                write!(f, "'{id}' is not a grid cell id in {bounds}")
            }
            Self::EmptySpace => write!(f, "topology must have at least one cell"),
            Self::DimensionTooLarge { name, value, max } => {
                write!(f, "{name} {value} exceeds maximum {max}")
            }
        }
    }
}

impl std::error::Error for TopologyError {}

pub(crate) fn check_weight(cell: &CellId, neighbour: &CellId, weight: f64) -> Result<(), TopologyError> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(TopologyError::InvalidWeight {
            cell: cell.clone(),
            neighbour: neighbour.clone(),
            weight,
        })
    }
}
