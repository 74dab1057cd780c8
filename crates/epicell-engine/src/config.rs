//! Network configuration and build errors.

use std::error::Error;
use std::fmt;

use epicell_core::{CellId, CompartmentState, ConfigError, ModelDescriptor, Population};
use epicell_space::{Topology, TopologyError};
use indexmap::IndexMap;

use epicell_cell::DEFAULT_OUTPUT_DELAY;

/// Upper bound on evaluation worker threads.
pub const MAX_WORKERS: usize = 64;

// ── NetworkError ───────────────────────────────────────────────────

/// Errors detected while building a [`CellNetwork`](crate::CellNetwork).
#[derive(Debug, PartialEq)]
pub enum NetworkError {
    /// The topology is malformed.
    Topology(TopologyError),
    /// A cell's configuration is missing, malformed, or names an unknown model.
    Config(ConfigError),
    /// The topology contains a cell with no configuration.
    UnconfiguredCell {
        /// The cell lacking a configuration entry.
        cell: CellId,
    },
    /// A configuration entry names a cell the topology does not contain.
    UnknownCell {
        /// The stray configuration key.
        cell: CellId,
    },
    /// `default_delay` is NaN, infinite, zero, or negative.
    InvalidDefaultDelay {
        /// The invalid value.
        value: f64,
    },
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Topology(e) => write!(f, "topology: {e}"),
            Self::Config(e) => write!(f, "{e}"),
            Self::UnconfiguredCell { cell } => {
                write!(f, "cell '{cell}' exists in the topology but has no configuration")
            }
            Self::UnknownCell { cell } => {
                write!(f, "cell '{cell}' is configured but not part of the topology")
            }
            Self::InvalidDefaultDelay { value } => {
                write!(f, "default_delay must be finite and positive, got {value}")
            }
        }
    }
}

impl Error for NetworkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Topology(e) => Some(e),
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TopologyError> for NetworkError {
    fn from(e: TopologyError) -> Self {
        Self::Topology(e)
    }
}

impl From<ConfigError> for NetworkError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ── NetworkConfig ──────────────────────────────────────────────────

/// One cell's model descriptor and initial state.
#[derive(Clone, Debug, PartialEq)]
pub struct CellSpec<P> {
    /// Model name and parameters, resolved through the registry.
    pub descriptor: ModelDescriptor,
    /// State at time zero.
    pub initial: CompartmentState<P>,
}

impl<P> CellSpec<P> {
    /// Pair a descriptor with an initial state.
    pub fn new(descriptor: ModelDescriptor, initial: CompartmentState<P>) -> Self {
        Self {
            descriptor,
            initial,
        }
    }
}

/// Complete configuration for constructing a cell network.
///
/// Every cell in `topology` needs exactly one entry in `cells`.
pub struct NetworkConfig<P: Population> {
    /// Neighbour relation between cells.
    pub topology: Box<dyn Topology>,
    /// Per-cell model descriptors and initial states.
    pub cells: IndexMap<CellId, CellSpec<P>>,
    /// Delay used when a model returns a non-finite or non-positive delay.
    /// Default: `1.0`.
    pub default_delay: f64,
    /// Worker threads used to evaluate due cells. Default: 1.
    pub workers: usize,
}

impl<P: Population> NetworkConfig<P> {
    /// A configuration with no cells over `topology`.
    pub fn new(topology: Box<dyn Topology>) -> Self {
        Self {
            topology,
            cells: IndexMap::new(),
            default_delay: DEFAULT_OUTPUT_DELAY,
            workers: 1,
        }
    }

    /// Builder-style cell registration. Replaces any earlier entry for `id`.
    pub fn with_cell(
        mut self,
        id: impl Into<CellId>,
        descriptor: ModelDescriptor,
        initial: CompartmentState<P>,
    ) -> Self {
        self.cells
            .insert(id.into(), CellSpec::new(descriptor, initial));
        self
    }

    /// Builder-style worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Builder-style default delay.
    pub fn with_default_delay(mut self, delay: f64) -> Self {
        self.default_delay = delay;
        self
    }

    /// Worker count clamped to `[1, MAX_WORKERS]`.
    pub fn resolved_workers(&self) -> usize {
        self.workers.clamp(1, MAX_WORKERS)
    }

    /// Check structural invariants that do not require building cells.
    ///
    /// Per-cell model and state errors are reported later, by
    /// [`CellNetwork::new`](crate::CellNetwork::new).
    pub fn validate(&self) -> Result<(), NetworkError> {
        if !self.default_delay.is_finite() || self.default_delay <= 0.0 {
            return Err(NetworkError::InvalidDefaultDelay {
                value: self.default_delay,
            });
        }
        self.topology.validate()?;
        for id in self.topology.cell_ids() {
            if !self.cells.contains_key(&id) {
                return Err(NetworkError::UnconfiguredCell { cell: id });
            }
        }
        if let Some(stray) = self.cells.keys().find(|id| !self.topology.contains(id)) {
            return Err(NetworkError::UnknownCell {
                cell: stray.clone(),
            });
        }
        Ok(())
    }
}

impl<P: Population> fmt::Debug for NetworkConfig<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkConfig")
            .field("topology_cells", &self.topology.cell_count())
            .field("cells", &self.cells.len())
            .field("default_delay", &self.default_delay)
            .field("workers", &self.workers)
            .finish()
    }
}
