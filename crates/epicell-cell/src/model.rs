//! The [`CellModel`] trait.
//!
//! A cell model is the per-cell transition rule. Models are stateless
//! operators: the mutable state of a cell lives in the engine's buffers
//! and is passed in by value at each evaluation.

use epicell_core::{CompartmentState, Population};

use crate::view::NeighbourView;

/// Time between consecutive evaluations of a cell unless a model
/// overrides [`CellModel::output_delay`].
pub const DEFAULT_OUTPUT_DELAY: f64 = 1.0;

/// A per-cell SEIR transition rule.
///
/// # Contract
///
/// - `local_computation()` MUST be deterministic and side-effect free:
///   the same state and neighbour multiset produce identical outputs.
/// - It reads only the supplied state and the neighbour view. The view is
///   a frozen snapshot; it never reflects updates made in the same step.
/// - Iteration order of the neighbour view must not affect the result.
///
/// # Object safety
///
/// This trait is object-safe; the engine stores one
/// `Box<dyn CellModel<P>>` per cell.
///
/// # Examples
///
/// A model that moves every exposed individual to infectious in one step:
///
/// ```
/// use epicell_cell::{CellModel, NeighbourView};
/// use epicell_core::CompartmentState;
///
/// struct Rush;
///
/// impl CellModel<f64> for Rush {
///     fn name(&self) -> &str { "rush" }
///
///     fn local_computation(
///         &self,
///         s: CompartmentState<f64>,
///         _nb: &NeighbourView<'_, f64>,
///     ) -> CompartmentState<f64> {
///         CompartmentState::new(s.susceptible, 0.0, s.infectious + s.exposed, s.recovered)
///     }
/// }
///
/// let next = Rush.local_computation(
///     CompartmentState::new(1.0, 2.0, 3.0, 4.0),
///     &NeighbourView::empty(),
/// );
/// assert_eq!(next, CompartmentState::new(1.0, 0.0, 5.0, 4.0));
/// assert_eq!(Rush.output_delay(&next), 1.0);
/// ```
pub trait CellModel<P: Population>: Send + Sync + 'static {
    /// Model name, used in logs and error messages.
    fn name(&self) -> &str;

    /// Compute the next state from the current state and a neighbour
    /// snapshot.
    fn local_computation(
        &self,
        state: CompartmentState<P>,
        neighbours: &NeighbourView<'_, P>,
    ) -> CompartmentState<P>;

    /// Time until this cell is evaluated again.
    ///
    /// The scheduler replaces non-finite or non-positive values with its
    /// configured default delay.
    fn output_delay(&self, _state: &CompartmentState<P>) -> f64 {
        DEFAULT_OUTPUT_DELAY
    }
}
