//! Epicell: per-cell SEIR compartmental simulation over graphs and grids.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Epicell sub-crates, and hosts the `epicell` command-line runner.
//!
//! # Quick start
//!
//! ```rust
//! use epicell::prelude::*;
//!
//! let mut graph = WeightedGraph::new();
//! graph.add_cell("A").unwrap();
//! graph.add_cell("B").unwrap();
//! graph.add_edge("B", "A", 1.0).unwrap();
//!
//! let seir = ModelDescriptor::new(
//!     "seir",
//!     ParamBlock::new().with("beta", 0.5).with("sigma", 0.2).with("gamma", 0.1),
//! );
//! let config = NetworkConfig::<f64>::new(Box::new(graph))
//!     .with_cell("A", seir.clone(), CompartmentState::new(99.0, 0.0, 1.0, 0.0))
//!     .with_cell("B", seir, CompartmentState::new(100.0, 0.0, 0.0, 0.0));
//! let mut network = CellNetwork::new(config, &ModelRegistry::with_defaults()).unwrap();
//!
//! let mut log = CsvStateLogger::new(Vec::new()).unwrap();
//! network.emit_initial(&mut log);
//! network.run_until(1.0, &mut log);
//! assert_eq!(
//!     network.state("B"),
//!     Some(&CompartmentState::new(99.5, 0.5, 0.0, 0.0))
//! );
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `epicell-core` | Ids, populations, states, parameters, errors |
//! | [`space`] | `epicell-space` | Weighted graphs and grids |
//! | [`cell`] | `epicell-cell` | The cell model trait and neighbour views |
//! | [`models`] | `epicell-models` | The SEIR model and the model registry |
//! | [`engine`] | `epicell-engine` | The snapshot scheduler |
//! | [`config`] | `epicell-config` | Scenario file loading |
//! | [`log`] | `epicell-log` | Delimited state logs |
//! | [`cli`] | this crate | The command-line runner |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cli;

/// Core types, traits, and ids (`epicell-core`).
pub use epicell_core as types;

/// Topologies (`epicell-space`).
///
/// [`space::WeightedGraph`] for explicit networks, [`space::Grid2D`] for
/// regular grids.
pub use epicell_space as space;

/// The [`cell::CellModel`] extension point (`epicell-cell`).
pub use epicell_cell as cell;

/// Built-in models and the registry (`epicell-models`).
pub use epicell_models as models;

/// The snapshot scheduler (`epicell-engine`).
pub use epicell_engine as engine;

/// Scenario loading (`epicell-config`).
pub use epicell_config as config;

/// State logging (`epicell-log`).
pub use epicell_log as log;

/// Common imports for typical Epicell usage.
///
/// ```rust
/// use epicell::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use epicell_core::{
        CellId, CompartmentState, ModelDescriptor, NumericMode, ParamBlock, Population,
        RateParameters, StateSink,
    };

    // Errors
    pub use epicell_core::ConfigError;
    pub use epicell_engine::NetworkError;
    pub use epicell_config::LoadError;
    pub use epicell_log::LogError;

    // Space
    pub use epicell_space::{EdgeBehavior, Grid2D, Neighbourhood, Topology, WeightedGraph};

    // Cells and models
    pub use epicell_cell::{CellModel, NeighbourView};
    pub use epicell_models::{ModelRegistry, SeirCell};

    // Engine
    pub use epicell_engine::{CellNetwork, NetworkConfig, RunSummary, StepMetrics};

    // Configuration and output
    pub use epicell_config::Scenario;
    pub use epicell_log::CsvStateLogger;
}
