//! Cell models for the Epicell simulation framework.
//!
//! Provides the reference SEIR transition rule and the registry that turns
//! a model name from a configuration file into a concrete cell.
//!
//! # Build flow
//!
//! 1. The loader produces one [`ModelDescriptor`](epicell_core::ModelDescriptor) per cell.
//! 2. [`ModelRegistry::build`] looks up the descriptor's model name and
//!    runs the registered factory against the descriptor's parameters.
//! 3. The resulting `Box<dyn CellModel<P>>` is owned by the engine for the
//!    lifetime of the run.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod registry;
pub mod seir;

pub use registry::{ModelFactory, ModelRegistry, DENGUE_CELL};
pub use seir::SeirCell;
