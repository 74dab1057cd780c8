//! Interpreting a scenario document.

use std::path::Path;

use epicell_core::{
    CellId, CompartmentState, ConfigError, ModelDescriptor, NumericMode, ParamBlock, Population,
};
use epicell_engine::{CellNetwork, CellSpec, NetworkConfig};
use epicell_models::ModelRegistry;
use epicell_space::{Grid2D, Topology, TopologyError, WeightedGraph};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::error::LoadError;
use crate::merge::deep_merge;
use crate::schema::{RawCellBlock, RawScenario, TopologySpec};

type CellSpecs<P> = IndexMap<CellId, CellSpec<P>>;

/// A checked scenario document.
///
/// Holds the top-level settings and the raw cell blocks. Cell blocks are
/// interpreted, with the `default` block merged underneath, when a network
/// configuration is requested for a concrete population type.
#[derive(Clone, Debug)]
pub struct Scenario {
    numeric: NumericMode,
    default_delay: Option<f64>,
    workers: usize,
    topology: TopologySpec,
    default_block: Value,
    cells: IndexMap<String, Value>,
    ignored: Vec<(String, String)>,
}

impl Scenario {
    /// Key of the block merged under every other cell block.
    pub const DEFAULT_KEY: &'static str = "default";

    /// Load a scenario from a JSON file.
    ///
    /// # Errors
    ///
    /// [`LoadError::Io`] if the file cannot be read, otherwise as
    /// [`parse`](Self::parse).
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Parse a scenario from a JSON string.
    ///
    /// # Errors
    ///
    /// [`LoadError::Json`] for syntax or schema errors,
    /// [`LoadError::Setting`] for an unknown numeric mode, and
    /// [`LoadError::Config`] for a cell block that is not an object or whose
    /// `model`, `state`, `config` or `neighborhood` has the wrong shape.
    pub fn parse(json: &str) -> Result<Self, LoadError> {
        let raw: RawScenario = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawScenario) -> Result<Self, LoadError> {
        let numeric = parse_numeric(raw.numeric.as_deref())?;
        let mut cells = raw.cells;
        let default_block = cells
            .shift_remove(Self::DEFAULT_KEY)
            .unwrap_or_else(|| Value::Object(Map::new()));
        let mut ignored = Vec::new();
        let blocks = std::iter::once((Self::DEFAULT_KEY, &default_block))
            .chain(cells.iter().map(|(key, block)| (key.as_str(), block)));
        for (key, block) in blocks {
            let id = CellId::from(key);
            expect_object(&id, block)?;
            for unknown in RawCellBlock::from_value(&id, block)?.unknown.into_keys() {
                warn!(cell = key, key = %unknown, "unrecognised cell block key ignored");
                ignored.push((key.to_owned(), unknown));
            }
        }

        info!(
            cells = cells.len(),
            numeric = %numeric,
            topology = topology_kind(&raw.topology),
            "scenario loaded"
        );

        Ok(Self {
            numeric,
            default_delay: raw.default_delay,
            workers: raw.workers.unwrap_or(1),
            topology: raw.topology,
            default_block,
            cells,
            ignored,
        })
    }

    /// The scenario's numeric representation.
    pub fn numeric(&self) -> NumericMode {
        self.numeric
    }

    /// The configured fallback delay, if any.
    pub fn default_delay(&self) -> Option<f64> {
        self.default_delay
    }

    /// Requested evaluation worker threads.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Override the worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// The topology section.
    pub fn topology(&self) -> &TopologySpec {
        &self.topology
    }

    /// Cell block keys (excluding `default`) in document order.
    pub fn cell_keys(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    /// `(cell key, block key)` pairs for block keys the loader does not
    /// recognise, in document order.
    pub fn ignored_keys(&self) -> impl Iterator<Item = (&str, &str)> {
        self.ignored.iter().map(|(cell, key)| (cell.as_str(), key.as_str()))
    }

    /// Interpret every cell block and assemble an engine configuration.
    ///
    /// `P` must match [`numeric`](Self::numeric).
    pub fn network_config<P: Population>(&self) -> Result<NetworkConfig<P>, LoadError> {
        if P::MODE != self.numeric {
            return Err(LoadError::Setting {
                key: "numeric".into(),
                reason: format!(
                    "scenario uses {} populations but a {} network was requested",
                    self.numeric,
                    P::MODE
                ),
            });
        }

        let (topology, cells): (Box<dyn Topology>, CellSpecs<P>) = match &self.topology {
            TopologySpec::Graph => {
                let (graph, cells) = self.graph_cells()?;
                (Box::new(graph), cells)
            }
            TopologySpec::Grid {
                rows,
                cols,
                edge,
                neighbourhood,
            } => {
                let grid = Grid2D::new(*rows, *cols, (*edge).into(), neighbourhood.clone().into())?;
                let cells = self.grid_cells(&grid)?;
                (Box::new(grid), cells)
            }
        };

        let mut config = NetworkConfig::new(topology).with_workers(self.workers);
        config.cells = cells;
        if let Some(delay) = self.default_delay {
            config = config.with_default_delay(delay);
        }
        Ok(config)
    }

    /// Assemble the configuration and build the network through `registry`.
    pub fn build_network<P: Population>(
        &self,
        registry: &ModelRegistry<P>,
    ) -> Result<CellNetwork<P>, LoadError> {
        let config = self.network_config::<P>()?;
        Ok(CellNetwork::new(config, registry)?)
    }

    fn graph_cells<P: Population>(&self) -> Result<(WeightedGraph, CellSpecs<P>), LoadError> {
        let mut graph = WeightedGraph::new();
        for key in self.cells.keys() {
            graph.add_cell(key.as_str())?;
        }

        let mut specs = IndexMap::with_capacity(self.cells.len());
        for (key, block) in &self.cells {
            let id = CellId::from(key.as_str());
            let cell = CellBlock::<P>::parse(&id, &deep_merge(&self.default_block, block))?;
            for (neighbour, weight) in cell.neighbours {
                graph.add_edge(id.clone(), neighbour, weight)?;
            }
            specs.insert(id, CellSpec::new(cell.descriptor, cell.initial));
        }
        Ok((graph, specs))
    }

    fn grid_cells<P: Population>(&self, grid: &Grid2D) -> Result<CellSpecs<P>, LoadError> {
        if has_neighbours(&self.default_block) {
            warn!(
                cell = Self::DEFAULT_KEY,
                "neighborhood entries are ignored on grid topologies"
            );
        }

        let mut overrides: IndexMap<CellId, &Value> = IndexMap::with_capacity(self.cells.len());
        for (key, block) in &self.cells {
            let (row, col) = grid.coord_of(key)?;
            let id = Grid2D::cell_id(row, col);
            if has_neighbours(block) {
                warn!(cell = %id, "neighborhood entries are ignored on grid topologies");
            }
            if overrides.insert(id.clone(), block).is_some() {
                return Err(TopologyError::DuplicateCell { cell: id }.into());
            }
        }

        let mut specs = IndexMap::with_capacity(grid.cell_count());
        for id in grid.cell_ids() {
            let merged = match overrides.get(&id) {
                Some(block) => deep_merge(&self.default_block, block),
                None => self.default_block.clone(),
            };
            let cell = CellBlock::<P>::parse(&id, &merged)?;
            specs.insert(id, CellSpec::new(cell.descriptor, cell.initial));
        }
        Ok(specs)
    }
}

// ── Cell blocks ────────────────────────────────────────────────────

/// One merged cell block, interpreted.
struct CellBlock<P> {
    descriptor: ModelDescriptor,
    initial: CompartmentState<P>,
    neighbours: Vec<(String, f64)>,
}

impl<P: Population> CellBlock<P> {
    fn parse(id: &CellId, block: &Value) -> Result<Self, ConfigError> {
        expect_object(id, block)?;
        let raw = RawCellBlock::from_value(id, block)?;

        let model = raw.model.ok_or_else(|| ConfigError::missing(id, "model"))?;

        let state = raw.state.ok_or_else(|| ConfigError::missing(id, "state"))?;
        let initial = CompartmentState::new(
            compartment(id, &state, "S")?,
            compartment(id, &state, "E")?,
            compartment(id, &state, "I")?,
            compartment(id, &state, "R")?,
        );
        initial.validate(id)?;

        let params = raw
            .config
            .unwrap_or_default()
            .iter()
            .map(|(key, value)| number(id, key, value).map(|v| (key.clone(), v)))
            .collect::<Result<ParamBlock, _>>()?;

        let neighbours = raw
            .neighborhood
            .unwrap_or_default()
            .iter()
            .map(|(key, value)| {
                number(id, &format!("neighborhood.{key}"), value).map(|w| (key.clone(), w))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            descriptor: ModelDescriptor::new(model, params),
            initial,
            neighbours,
        })
    }
}

fn parse_numeric(value: Option<&str>) -> Result<NumericMode, LoadError> {
    match value {
        None => Ok(NumericMode::default()),
        Some("continuous") => Ok(NumericMode::Continuous),
        Some("discrete") => Ok(NumericMode::Discrete),
        Some(other) => Err(LoadError::Setting {
            key: "numeric".into(),
            reason: format!("expected \"continuous\" or \"discrete\", got \"{other}\""),
        }),
    }
}

fn topology_kind(spec: &TopologySpec) -> &'static str {
    match spec {
        TopologySpec::Graph => "graph",
        TopologySpec::Grid { .. } => "grid",
    }
}

fn expect_object<'v>(id: &CellId, block: &'v Value) -> Result<&'v Map<String, Value>, ConfigError> {
    block
        .as_object()
        .ok_or_else(|| ConfigError::invalid(id, "block", "cell block must be a JSON object"))
}

fn has_neighbours(block: &Value) -> bool {
    ["neighborhood", "neighbourhood"].iter().any(|key| {
        block
            .get(key)
            .and_then(Value::as_object)
            .is_some_and(|map| !map.is_empty())
    })
}

fn number(id: &CellId, field: &str, value: &Value) -> Result<f64, ConfigError> {
    value
        .as_f64()
        .ok_or_else(|| ConfigError::invalid(id, field, format!("expected a number, got {value}")))
}

fn compartment<P: Population>(
    id: &CellId,
    state: &IndexMap<String, Value>,
    label: &str,
) -> Result<P, ConfigError> {
    let value = state.get(label).ok_or_else(|| ConfigError::missing(id, label))?;
    let raw = number(id, label, value)?;
    P::from_config(raw).ok_or_else(|| {
        let reason = match P::MODE {
            NumericMode::Discrete => format!("expected a whole number in discrete mode, got {raw}"),
            NumericMode::Continuous => format!("expected a finite number, got {raw}"),
        };
        ConfigError::invalid(id, label, reason)
    })
}
