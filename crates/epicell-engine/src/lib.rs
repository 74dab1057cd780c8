//! Simulation engine for Epicell cell networks.
//!
//! Provides [`CellNetwork`], a lockstep discrete-time scheduler with
//! snapshot semantics: every cell due at a step reads the states published
//! before that step, and all new states are published together once the
//! output delay has elapsed.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod metrics;
pub mod network;

pub use config::{CellSpec, NetworkConfig, NetworkError};
pub use metrics::{RunSummary, StepMetrics, StepReport};
pub use network::CellNetwork;
