//! JSON scenario loader for Epicell.
//!
//! A scenario file names the numeric mode, the topology, and a block per
//! cell. A `default` block is deep-merged under every other block, so
//! shared rates and models are written once.
//!
//! ```json
//! {
//!   "numeric": "continuous",
//!   "topology": { "kind": "graph" },
//!   "cells": {
//!     "default": { "model": "seir", "config": { "beta": 0.5, "sigma": 0.2, "gamma": 0.1 } },
//!     "A": { "state": { "S": 99, "E": 0, "I": 1, "R": 0 } },
//!     "B": { "state": { "S": 100, "E": 0, "I": 0, "R": 0 }, "neighborhood": { "A": 1.0 } }
//!   }
//! }
//! ```
//!
//! [`Scenario::from_file`] / [`Scenario::parse`] read and check the
//! document; [`Scenario::network_config`] and [`Scenario::build_network`]
//! turn it into an engine configuration or a ready network.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod merge;
pub mod scenario;
pub mod schema;

pub use error::LoadError;
pub use merge::deep_merge;
pub use scenario::Scenario;
pub use schema::{EdgeSpec, NeighbourhoodSpec, OffsetSpec, TopologySpec};
