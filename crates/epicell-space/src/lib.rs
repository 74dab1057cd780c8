//! Weighted topologies for Epicell simulations.
//!
//! This crate defines the [`Topology`] trait, the neighbour relation
//! through which every cell evaluation gathers its inputs, along with
//! the two concrete backends.
//!
//! # Backends
//!
//! - [`WeightedGraph`]: arbitrary cells and explicitly weighted edges
//! - [`Grid2D`]: regular grid with offset-based [`Neighbourhood`]s and
//!   configurable [`EdgeBehavior`] (absorb, clamp, wrap)
//!
//! Cell models never see which backend produced a neighbour list; grid
//! offset resolution happens entirely here.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod edge;
pub mod error;
pub mod graph;
pub mod grid2d;
pub mod neighbourhood;
pub mod topology;

#[cfg(test)]
pub(crate) mod compliance;

pub use edge::EdgeBehavior;
pub use error::TopologyError;
pub use graph::WeightedGraph;
pub use grid2d::Grid2D;
pub use neighbourhood::{Neighbourhood, Offset};
pub use topology::{Edge, Neighbours, Topology};
