//! Cell model trait and neighbour view for Epicell simulations.
//!
//! The [`CellModel`] trait defines the pure `&self` local computation
//! (the τ-function) and the output delay. Each evaluation receives a
//! read-only [`NeighbourView`] over a point-in-time snapshot of its
//! neighbours' states.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod force;
pub mod model;
pub mod view;

pub use force::stable_sum;
pub use model::{CellModel, DEFAULT_OUTPUT_DELAY};
pub use view::{NeighbourObservation, NeighbourSet, NeighbourView};
