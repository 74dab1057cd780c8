//! Arbitrary weighted graph topology.

use crate::error::{check_weight, TopologyError};
use crate::topology::{Edge, Neighbours, Topology};
use epicell_core::CellId;
use indexmap::IndexMap;

/// A topology of named cells joined by explicitly weighted edges.
///
/// Edges are directed: [`add_edge(cell, neighbour, w)`](WeightedGraph::add_edge)
/// makes `neighbour` part of `cell`'s neighbour set with weight `w`, so
/// influence flows *from* `neighbour` *to* `cell`. Weights may encode
/// adjacency, inverse distance, or migration flux.
///
/// Cells keep insertion order, which is the canonical order. Edges may
/// reference cells that are added later; [`validate`](Topology::validate)
/// reports any that never appear.
///
/// # Examples
///
/// ```
/// use epicell_space::{Topology, WeightedGraph};
///
/// let mut g = WeightedGraph::new();
/// g.add_cell("A").unwrap();
/// g.add_cell("B").unwrap();
/// g.add_edge("B", "A", 1.0).unwrap(); // A influences B
/// g.validate().unwrap();
///
/// assert_eq!(g.neighbours(&"B".into()).unwrap().len(), 1);
/// assert!(g.neighbours(&"A".into()).unwrap().is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct WeightedGraph {
    cells: IndexMap<CellId, IndexMap<CellId, f64>>,
}

impl WeightedGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cell with an empty neighbour set.
    pub fn add_cell(&mut self, cell: impl Into<CellId>) -> Result<(), TopologyError> {
        let cell = cell.into();
        if self.cells.contains_key(&cell) {
            return Err(TopologyError::DuplicateCell { cell });
        }
        self.cells.insert(cell, IndexMap::new());
        Ok(())
    }

    /// Make `neighbour` influence `cell` with the given weight.
    ///
    /// `cell` must already exist; `neighbour` is resolved at validation.
    pub fn add_edge(
        &mut self,
        cell: impl Into<CellId>,
        neighbour: impl Into<CellId>,
        weight: f64,
    ) -> Result<(), TopologyError> {
        let cell = cell.into();
        let neighbour = neighbour.into();
        check_weight(&cell, &neighbour, weight)?;
        let set = self
            .cells
            .get_mut(&cell)
            .ok_or_else(|| TopologyError::UnknownCell { cell: cell.clone() })?;
        if set.contains_key(&neighbour) {
            return Err(TopologyError::DuplicateNeighbour { cell, neighbour });
        }
        set.insert(neighbour, weight);
        Ok(())
    }

    /// Number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.cells.values().map(IndexMap::len).sum()
    }
}

impl Topology for WeightedGraph {
    fn cell_count(&self) -> usize {
        self.cells.len()
    }

    fn cell_ids(&self) -> Vec<CellId> {
        self.cells.keys().cloned().collect()
    }

    fn contains(&self, cell: &CellId) -> bool {
        self.cells.contains_key(cell)
    }

    fn neighbours(&self, cell: &CellId) -> Result<Neighbours, TopologyError> {
        let set = self
            .cells
            .get(cell)
            .ok_or_else(|| TopologyError::UnknownCell { cell: cell.clone() })?;
        Ok(set
            .iter()
            .map(|(id, &weight)| Edge {
                neighbour: id.clone(),
                weight,
            })
            .collect())
    }

    fn canonical_rank(&self, cell: &CellId) -> Option<usize> {
        self.cells.get_index_of(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance;

    fn two_cells() -> WeightedGraph {
        let mut g = WeightedGraph::new();
        g.add_cell("A").unwrap();
        g.add_cell("B").unwrap();
        g
    }

    #[test]
    fn edges_are_directed() {
        let mut g = two_cells();
        g.add_edge("B", "A", 0.25).unwrap();
        let nb = g.neighbours(&"B".into()).unwrap();
        assert_eq!(nb.as_slice(), &[Edge::new("A", 0.25)]);
        assert!(g.neighbours(&"A".into()).unwrap().is_empty());
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn duplicate_cell_rejected() {
        let mut g = two_cells();
        assert_eq!(
            g.add_cell("A"),
            Err(TopologyError::DuplicateCell { cell: "A".into() })
        );
    }

    #[test]
    fn duplicate_neighbour_rejected() {
        let mut g = two_cells();
        g.add_edge("B", "A", 1.0).unwrap();
        assert!(matches!(
            g.add_edge("B", "A", 2.0),
            Err(TopologyError::DuplicateNeighbour { .. })
        ));
    }

    #[test]
    fn edge_from_unknown_cell_rejected() {
        let mut g = two_cells();
        assert_eq!(
            g.add_edge("Z", "A", 1.0),
            Err(TopologyError::UnknownCell { cell: "Z".into() })
        );
    }

    #[test]
    fn invalid_weights_rejected() {
        let mut g = two_cells();
        assert!(matches!(
            g.add_edge("B", "A", -1.0),
            Err(TopologyError::InvalidWeight { .. })
        ));
        assert!(matches!(
            g.add_edge("B", "A", f64::NAN),
            Err(TopologyError::InvalidWeight { .. })
        ));
    }

    #[test]
    fn dangling_neighbour_fails_validation() {
        let mut g = two_cells();
        g.add_edge("A", "Ghost", 1.0).unwrap();
        assert_eq!(
            g.validate(),
            Err(TopologyError::DanglingNeighbour {
                cell: "A".into(),
                neighbour: "Ghost".into(),
            })
        );
    }

    #[test]
    fn neighbour_added_later_resolves() {
        let mut g = WeightedGraph::new();
        g.add_cell("A").unwrap();
        g.add_edge("A", "B", 1.0).unwrap();
        g.add_cell("B").unwrap();
        assert!(g.validate().is_ok());
    }

    #[test]
    fn empty_graph_fails_validation() {
        assert_eq!(WeightedGraph::new().validate(), Err(TopologyError::EmptySpace));
    }

    #[test]
    fn unknown_cell_lookup_errors() {
        let g = two_cells();
        assert!(g.neighbours(&"Q".into()).is_err());
        assert_eq!(g.canonical_rank(&"B".into()), Some(1));
        assert_eq!(g.canonical_rank(&"Q".into()), None);
    }

    #[test]
    fn compliance_ring_of_five() {
        let mut g = WeightedGraph::new();
        let ids: Vec<String> = (0..5).map(|i| format!("z{i}")).collect();
        for id in &ids {
            g.add_cell(id.as_str()).unwrap();
        }
        for i in 0..5 {
            let next = &ids[(i + 1) % 5];
            g.add_edge(ids[i].as_str(), next.as_str(), 0.5).unwrap();
        }
        compliance::run_full_compliance(&g);
    }
}
