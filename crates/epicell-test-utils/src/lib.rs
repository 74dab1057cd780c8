//! Test utilities and fixture types for Epicell development.
//!
//! Provides fixture cell models, a [`RecordingSink`] that captures every
//! published state, small topology builders, and JSON scenario builders
//! for loader and CLI tests.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
pub mod scenario;
pub mod sink;

pub use fixtures::{fixture_registry, line_graph, ConstCell, IdentityCell, TickCell};
pub use scenario::{scenario_a, scenario_b, ScenarioBuilder};
pub use sink::{Record, RecordingSink};
