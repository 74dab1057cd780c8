//! Output abstraction for published cell states.

use crate::id::CellId;
use crate::population::Population;
use crate::state::CompartmentState;

/// Receives cell states as they become visible.
///
/// The engine calls [`record`](StateSink::record) once per initial state
/// and once per state *change*, stamped with the time at which the new
/// state becomes visible to neighbours (evaluation time plus output
/// delay). This decouples the scheduler from the concrete log format.
pub trait StateSink<P: Population> {
    /// Record `state` for the cell at dense `index` with id `cell`.
    fn record(&mut self, time: f64, index: usize, cell: &CellId, state: &CompartmentState<P>);
}

impl<P: Population> StateSink<P> for Vec<(f64, CellId, CompartmentState<P>)> {
    fn record(&mut self, time: f64, _index: usize, cell: &CellId, state: &CompartmentState<P>) {
        self.push((time, cell.clone(), *state));
    }
}
