//! Topology trait compliance test helpers.
//!
//! These functions verify that a Topology implementation satisfies the
//! invariants required by the trait contract. Reused across backend test
//! modules (WeightedGraph, Grid2D).

use crate::topology::Topology;
use epicell_core::CellId;
use indexmap::IndexSet;

/// Assert that two calls to `cell_ids` return the same result.
pub fn assert_cell_ids_deterministic(topology: &dyn Topology) {
    let a = topology.cell_ids();
    let b = topology.cell_ids();
    assert_eq!(a, b, "cell_ids is non-deterministic");
}

/// Assert that `cell_ids` returns exactly `cell_count` unique ids.
pub fn assert_cell_ids_complete(topology: &dyn Topology) {
    let ids = topology.cell_ids();
    assert_eq!(
        ids.len(),
        topology.cell_count(),
        "cell_ids length ({}) != cell_count ({})",
        ids.len(),
        topology.cell_count()
    );
    let unique: IndexSet<&CellId> = ids.iter().collect();
    assert_eq!(unique.len(), topology.cell_count(), "cell_ids has duplicates");
}

/// Assert that `canonical_rank` agrees with the position in `cell_ids`.
pub fn assert_rank_matches_order(topology: &dyn Topology) {
    for (i, id) in topology.cell_ids().iter().enumerate() {
        assert_eq!(
            topology.canonical_rank(id),
            Some(i),
            "canonical_rank({id}) disagrees with cell_ids order"
        );
        assert!(topology.contains(id), "contains({id}) is false for a listed cell");
    }
}

/// Assert every neighbour resolves, ids are unique, and weights are valid.
pub fn assert_neighbour_sets_well_formed(topology: &dyn Topology) {
    for id in topology.cell_ids() {
        let nb = topology
            .neighbours(&id)
            .expect("neighbours() should succeed for a listed cell");
        let unique: IndexSet<&CellId> = nb.iter().map(|e| &e.neighbour).collect();
        assert_eq!(unique.len(), nb.len(), "duplicate neighbour ids for {id}");
        for e in &nb {
            assert!(
                topology.contains(&e.neighbour),
                "neighbour {} of {id} does not resolve",
                e.neighbour
            );
            assert!(
                e.weight.is_finite() && e.weight >= 0.0,
                "invalid weight {} on edge {} -> {id}",
                e.weight,
                e.neighbour
            );
        }
    }
}

/// Assert that `validate` accepts the topology.
pub fn assert_validates(topology: &dyn Topology) {
    topology
        .validate()
        .expect("validate() should accept a well-formed topology");
}

/// Run all compliance checks on a topology.
pub fn run_full_compliance(topology: &dyn Topology) {
    assert_cell_ids_deterministic(topology);
    assert_cell_ids_complete(topology);
    assert_rank_matches_order(topology);
    assert_neighbour_sets_well_formed(topology);
    assert_validates(topology);
}
