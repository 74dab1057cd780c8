//! Read-only neighbour views handed to cell models.
//!
//! [`NeighbourView`] borrows a point-in-time snapshot of neighbour states
//! plus the cell's resolved edge list. The engine builds views over its
//! frozen previous-step buffer; tests build them from an owned
//! [`NeighbourSet`].

use epicell_core::{CellId, CompartmentState, Population};
use indexmap::map::Entry;
use indexmap::IndexMap;

use crate::force::stable_sum;

/// One neighbour as seen by the evaluating cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NeighbourObservation<'a, P> {
    /// The neighbour's id.
    pub id: &'a CellId,
    /// Influence weight of the edge from this neighbour.
    pub weight: f64,
    /// The neighbour's state in the snapshot being read.
    pub state: &'a CompartmentState<P>,
}

/// A read-only view of one cell's neighbours.
///
/// `edges` holds `(snapshot index, weight)` pairs with unique indices;
/// `states` and `ids` are indexed by the same dense cell index. Iteration
/// order carries no meaning: every aggregate exposed here is
/// order-independent.
#[derive(Clone, Copy, Debug)]
pub struct NeighbourView<'a, P> {
    edges: &'a [(usize, f64)],
    states: &'a [CompartmentState<P>],
    ids: &'a [CellId],
}

impl<'a, P: Population> NeighbourView<'a, P> {
    /// Construct a view over a snapshot.
    ///
    /// Typically called by the engine, not by cell models directly. Every
    /// edge index must be in bounds for both `states` and `ids`.
    pub fn new(
        edges: &'a [(usize, f64)],
        states: &'a [CompartmentState<P>],
        ids: &'a [CellId],
    ) -> Self {
        debug_assert_eq!(states.len(), ids.len());
        debug_assert!(edges.iter().all(|&(i, _)| i < states.len()));
        Self { edges, states, ids }
    }

    /// A view with no neighbours.
    pub fn empty() -> Self {
        Self {
            edges: &[],
            states: &[],
            ids: &[],
        }
    }

    /// Number of neighbours.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// `true` if the cell has no neighbours.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Iterate over the neighbours.
    pub fn iter(&self) -> impl Iterator<Item = NeighbourObservation<'a, P>> + 'a {
        let states = self.states;
        let ids = self.ids;
        self.edges.iter().map(move |&(i, weight)| NeighbourObservation {
            id: &ids[i],
            weight,
            state: &states[i],
        })
    }

    /// Look up a neighbour by id.
    pub fn get(&self, id: &str) -> Option<NeighbourObservation<'a, P>> {
        self.iter().find(|o| o.id.as_str() == id)
    }

    /// `Σ neighbour.infectious × neighbour.weight`.
    ///
    /// Order-independent and compensated; zero-weight or zero-infectious
    /// neighbours contribute nothing.
    pub fn force_of_infection(&self) -> f64 {
        stable_sum(self.iter().map(|o| o.state.infectious.to_f64() * o.weight))
    }
}

/// An owned neighbour collection keyed by unique neighbour id.
///
/// # Examples
///
/// ```
/// use epicell_cell::NeighbourSet;
/// use epicell_core::CompartmentState;
///
/// let mut set = NeighbourSet::new();
/// set.insert("A", 1.0, CompartmentState::new(99.0, 0.0, 1.0, 0.0));
/// set.insert("C", 0.5, CompartmentState::new(50.0, 0.0, 4.0, 0.0));
/// assert_eq!(set.view().force_of_infection(), 3.0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct NeighbourSet<P> {
    ids: Vec<CellId>,
    states: Vec<CompartmentState<P>>,
    edges: Vec<(usize, f64)>,
    index: IndexMap<CellId, usize>,
}

impl<P: Population> NeighbourSet<P> {
    /// An empty set.
    pub fn new() -> Self {
        Self {
            ids: Vec::new(),
            states: Vec::new(),
            edges: Vec::new(),
            index: IndexMap::new(),
        }
    }

    /// Insert or replace the observation for `id`.
    ///
    /// Returns the previous `(weight, state)` if `id` was already present.
    pub fn insert(
        &mut self,
        id: impl Into<CellId>,
        weight: f64,
        state: CompartmentState<P>,
    ) -> Option<(f64, CompartmentState<P>)> {
        match self.index.entry(id.into()) {
            Entry::Occupied(e) => {
                let slot = *e.get();
                let old = (self.edges[slot].1, self.states[slot]);
                self.edges[slot].1 = weight;
                self.states[slot] = state;
                Some(old)
            }
            Entry::Vacant(e) => {
                let slot = self.ids.len();
                self.ids.push(e.key().clone());
                e.insert(slot);
                self.states.push(state);
                self.edges.push((slot, weight));
                None
            }
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, id: impl Into<CellId>, weight: f64, state: CompartmentState<P>) -> Self {
        self.insert(id, weight, state);
        self
    }

    /// Number of neighbours.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// `true` if empty.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Borrow as a [`NeighbourView`].
    pub fn view(&self) -> NeighbourView<'_, P> {
        NeighbourView::new(&self.edges, &self.states, &self.ids)
    }
}
