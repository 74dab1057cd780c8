//! Reusable cell model and topology fixtures.
//!
//! Three standard models for scheduler and registry testing:
//!
//! - [`IdentityCell`] returns its input state unchanged.
//! - [`ConstCell`] always returns a fixed state.
//! - [`TickCell`] moves one individual from `S` to `R` per evaluation,
//!   with a configurable (possibly invalid) output delay.

use std::sync::atomic::{AtomicUsize, Ordering};

use epicell_cell::{CellModel, NeighbourView};
use epicell_core::{CompartmentState, Population};
use epicell_models::ModelRegistry;
use epicell_space::WeightedGraph;

/// Returns its input unchanged.
pub struct IdentityCell;

impl<P: Population> CellModel<P> for IdentityCell {
    fn name(&self) -> &str {
        "identity"
    }

    fn local_computation(
        &self,
        state: CompartmentState<P>,
        _neighbours: &NeighbourView<'_, P>,
    ) -> CompartmentState<P> {
        state
    }
}

/// Always returns `state`.
pub struct ConstCell<P> {
    pub state: CompartmentState<P>,
}

impl<P: Population> ConstCell<P> {
    pub fn new(state: CompartmentState<P>) -> Self {
        Self { state }
    }
}

impl<P: Population> CellModel<P> for ConstCell<P> {
    fn name(&self) -> &str {
        "const"
    }

    fn local_computation(
        &self,
        _state: CompartmentState<P>,
        _neighbours: &NeighbourView<'_, P>,
    ) -> CompartmentState<P> {
        self.state
    }
}

/// Moves one individual from `S` to `R` per evaluation while `S > 0`.
///
/// Counts its own evaluations, which makes scheduling observable.
pub struct TickCell {
    pub delay: f64,
    calls: AtomicUsize,
}

impl TickCell {
    pub fn new(delay: f64) -> Self {
        Self {
            delay,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `local_computation` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl<P: Population> CellModel<P> for TickCell {
    fn name(&self) -> &str {
        "tick"
    }

    fn local_computation(
        &self,
        state: CompartmentState<P>,
        _neighbours: &NeighbourView<'_, P>,
    ) -> CompartmentState<P> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let one = P::from_rate_product(1.0);
        if state.susceptible < one {
            return state;
        }
        CompartmentState {
            susceptible: state.susceptible - one,
            recovered: state.recovered + one,
            ..state
        }
    }

    fn output_delay(&self, _state: &CompartmentState<P>) -> f64 {
        self.delay
    }
}

/// The default registry plus `identity` and `tick`.
///
/// `tick` reads an optional `delay` parameter (default `1.0`) without
/// validating it.
pub fn fixture_registry<P: Population>() -> ModelRegistry<P> {
    let mut registry = ModelRegistry::with_defaults();
    registry.register("identity", |_, _| {
        Ok(Box::new(IdentityCell) as Box<dyn CellModel<P>>)
    });
    registry.register("tick", |_, params| {
        let delay = params.get("delay").unwrap_or(1.0);
        Ok(Box::new(TickCell::new(delay)) as Box<dyn CellModel<P>>)
    });
    registry
}

/// Cells `c0..c{n-1}` where each `c{k}` influences `c{k+1}` with `weight`.
pub fn line_graph(n: usize, weight: f64) -> WeightedGraph {
    let mut g = WeightedGraph::new();
    for k in 0..n {
        g.add_cell(format!("c{k}")).unwrap();
    }
    for k in 1..n {
        g.add_edge(format!("c{k}"), format!("c{}", k - 1), weight)
            .unwrap();
    }
    g
}
