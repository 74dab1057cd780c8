//! The core `Topology` trait and `dyn Topology` downcast support.

use crate::error::TopologyError;
use epicell_core::CellId;
use smallvec::SmallVec;
use std::any::Any;

/// One weighted entry of a cell's neighbour set.
///
/// The weight is a property of the edge, owned by the topology. It is
/// the coupling strength with which `neighbour`'s infectious population
/// contributes to the receiving cell's force of infection.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    /// The neighbouring cell.
    pub neighbour: CellId,
    /// Non-negative influence weight.
    pub weight: f64,
}

impl Edge {
    /// Build an edge entry.
    pub fn new(neighbour: impl Into<CellId>, weight: f64) -> Self {
        Self {
            neighbour: neighbour.into(),
            weight,
        }
    }
}

/// A cell's neighbour set.
///
/// `SmallVec<[Edge; 8]>` avoids heap allocation for the common grid
/// neighbourhoods (von Neumann and Moore radius 1).
pub type Neighbours = SmallVec<[Edge; 8]>;

/// The weighted neighbour relation connecting cells.
///
/// Concrete backends ([`WeightedGraph`](crate::WeightedGraph),
/// [`Grid2D`](crate::Grid2D)) implement it so that cell models and the
/// registry stay topology-agnostic.
///
/// # Contract
///
/// - Neighbour ids within one cell's set are unique.
/// - Every neighbour id resolves to a cell of the same topology once
///   [`validate`](Topology::validate) has succeeded.
/// - Weights are finite and non-negative.
///
/// # Thread Safety
///
/// Topologies are immutable once built and may be shared freely across
/// threads.
pub trait Topology: Any + Send + Sync + 'static {
    /// Total number of cells.
    fn cell_count(&self) -> usize;

    /// All cell ids in deterministic canonical order.
    ///
    /// Two calls on the same topology must return the same sequence.
    /// The engine uses this order for dense indexing and log output.
    fn cell_ids(&self) -> Vec<CellId>;

    /// `true` if `cell` is part of this topology.
    fn contains(&self, cell: &CellId) -> bool;

    /// The weighted neighbour set of `cell`.
    ///
    /// Returns [`TopologyError::UnknownCell`] if `cell` is not part of
    /// the topology.
    fn neighbours(&self, cell: &CellId) -> Result<Neighbours, TopologyError>;

    /// Position of `cell` in the canonical ordering.
    ///
    /// Default implementation performs a linear search; backends should
    /// override with O(1) lookups.
    fn canonical_rank(&self, cell: &CellId) -> Option<usize> {
        self.cell_ids().iter().position(|c| c == cell)
    }

    /// Check the topology's structural invariants.
    ///
    /// Default implementation checks that every neighbour resolves and
    /// every weight is valid by walking all neighbour sets.
    fn validate(&self) -> Result<(), TopologyError> {
        if self.cell_count() == 0 {
            return Err(TopologyError::EmptySpace);
        }
        for cell in self.cell_ids() {
            for edge in self.neighbours(&cell)? {
                crate::error::check_weight(&cell, &edge.neighbour, edge.weight)?;
                if !self.contains(&edge.neighbour) {
                    return Err(TopologyError::DanglingNeighbour {
                        cell: cell.clone(),
                        neighbour: edge.neighbour,
                    });
                }
            }
        }
        Ok(())
    }
}

impl dyn Topology {
    /// Attempt to downcast a trait object to a concrete topology type.
    ///
    /// Lets code holding `&dyn Topology` opt into backend-specific paths
    /// (e.g. grid coordinates for reporting).
    pub fn downcast_ref<T: Topology>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }
}
