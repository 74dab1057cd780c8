//! The snapshot scheduler.
//!
//! [`CellNetwork`] owns every cell's model, its published state, and the
//! resolved neighbour edges. Each [`step()`](CellNetwork::step) runs at the
//! earliest due time `t`:
//!
//! 1. Cells due at `t` publish the state they computed at their previous
//!    evaluation (output delay elapsed). Changed states go to the sink.
//! 2. Every due cell is evaluated against the published snapshot. Results
//!    are held back and become visible at `t + output_delay`.
//!
//! Because evaluation only reads the published buffer, the order in which
//! due cells are evaluated (or the number of worker threads) never changes
//! the outcome.

use std::time::Instant;

use epicell_cell::{CellModel, NeighbourView};
use epicell_core::{CellId, CompartmentState, Population, StateSink};
use epicell_models::ModelRegistry;
use epicell_space::TopologyError;
use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::config::{NetworkConfig, NetworkError};
use crate::metrics::{RunSummary, StepMetrics, StepReport};

// Compile-time assertion: CellNetwork can move to and be shared with
// worker threads.
const _: () = {
    #[allow(dead_code)]
    fn assert_send_sync<T: Send + Sync>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send_sync::<CellNetwork<f64>>();
        assert_send_sync::<CellNetwork<i64>>();
    }
};

/// A built network of cells ready to be stepped.
///
/// Created from a [`NetworkConfig`] via [`new()`](CellNetwork::new). All
/// configuration errors surface there; stepping is infallible.
///
/// # Example
///
/// ```
/// use epicell_core::{CellId, CompartmentState, ModelDescriptor, ParamBlock};
/// use epicell_engine::{CellNetwork, NetworkConfig};
/// use epicell_models::ModelRegistry;
/// use epicell_space::WeightedGraph;
///
/// let mut g = WeightedGraph::new();
/// g.add_cell("A").unwrap();
/// g.add_cell("B").unwrap();
/// g.add_edge("B", "A", 1.0).unwrap();
///
/// let params = ParamBlock::new().with("beta", 0.5).with("sigma", 0.2).with("gamma", 0.1);
/// let seir = ModelDescriptor::new("seir", params);
/// let config = NetworkConfig::new(Box::new(g))
///     .with_cell("A", seir.clone(), CompartmentState::new(99.0, 0.0, 1.0, 0.0))
///     .with_cell("B", seir, CompartmentState::new(100.0, 0.0, 0.0, 0.0));
///
/// let mut net = CellNetwork::new(config, &ModelRegistry::with_defaults()).unwrap();
/// let mut log: Vec<(f64, CellId, CompartmentState<f64>)> = Vec::new();
/// net.run_until(1.0, &mut log);
/// assert_eq!(log.len(), 2);
/// assert_eq!(net.state("B"), Some(&CompartmentState::new(99.5, 0.5, 0.0, 0.0)));
/// ```
pub struct CellNetwork<P: Population> {
    ids: Vec<CellId>,
    index: IndexMap<CellId, usize>,
    models: Vec<Box<dyn CellModel<P>>>,
    /// CSR layout: the edges of cell `i` are `edges[edge_offsets[i]..edge_offsets[i + 1]]`.
    edge_offsets: Vec<usize>,
    edges: Vec<(usize, f64)>,
    published: Vec<CompartmentState<P>>,
    pending: Vec<Option<CompartmentState<P>>>,
    next_due: Vec<f64>,
    time: f64,
    steps: u64,
    default_delay: f64,
    workers: usize,
    last_metrics: StepMetrics,
}

impl<P: Population> CellNetwork<P> {
    /// Build a network from `config`, resolving each cell's model through
    /// `registry`.
    ///
    /// Validates the topology, checks that every cell is configured, builds
    /// each model, and resolves neighbour ids to dense indices. Errors are
    /// reported for the first offending cell in canonical order.
    pub fn new(config: NetworkConfig<P>, registry: &ModelRegistry<P>) -> Result<Self, NetworkError> {
        config.validate()?;
        let workers = config.resolved_workers();
        let NetworkConfig {
            topology,
            mut cells,
            default_delay,
            ..
        } = config;

        let ids = topology.cell_ids();
        let index: IndexMap<CellId, usize> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();

        let n = ids.len();
        let mut models = Vec::with_capacity(n);
        let mut published = Vec::with_capacity(n);
        let mut edge_offsets = Vec::with_capacity(n + 1);
        let mut edges = Vec::new();
        edge_offsets.push(0);

        for id in &ids {
            let spec = cells
                .swap_remove(id)
                .ok_or_else(|| NetworkError::UnconfiguredCell { cell: id.clone() })?;
            spec.initial.validate(id)?;
            models.push(registry.build(id, &spec.descriptor)?);
            published.push(spec.initial);

            for edge in topology.neighbours(id)? {
                let j = *index.get(&edge.neighbour).ok_or_else(|| {
                    TopologyError::DanglingNeighbour {
                        cell: id.clone(),
                        neighbour: edge.neighbour.clone(),
                    }
                })?;
                edges.push((j, edge.weight));
            }
            edge_offsets.push(edges.len());
        }

        info!(
            cells = n,
            edges = edges.len(),
            workers,
            mode = %P::MODE,
            "cell network built"
        );

        Ok(Self {
            ids,
            index,
            models,
            edge_offsets,
            edges,
            published,
            pending: vec![None; n],
            next_due: vec![0.0; n],
            time: 0.0,
            steps: 0,
            default_delay,
            workers,
            last_metrics: StepMetrics::default(),
        })
    }

    /// Record every cell's current published state at the current time.
    ///
    /// Call once before the first step to log the initial conditions.
    pub fn emit_initial<S: StateSink<P> + ?Sized>(&self, sink: &mut S) {
        for (i, (id, state)) in self.ids.iter().zip(&self.published).enumerate() {
            sink.record(self.time, i, id, state);
        }
    }

    /// The earliest time at which some cell is due, if any.
    pub fn next_due_time(&self) -> Option<f64> {
        self.next_due.iter().copied().min_by(f64::total_cmp)
    }

    /// Execute one step at the earliest due time.
    ///
    /// Returns `None` if no cell is due.
    pub fn step<S: StateSink<P> + ?Sized>(&mut self, sink: &mut S) -> Option<StepReport> {
        let step_start = Instant::now();
        let t = self.next_due_time()?;
        let due: Vec<usize> = (0..self.ids.len())
            .filter(|&i| self.next_due[i] == t)
            .collect();

        // 1. Publish states whose output delay has elapsed.
        let publish_start = Instant::now();
        let mut changed = 0;
        for &i in &due {
            if let Some(next) = self.pending[i].take() {
                if next != self.published[i] {
                    self.published[i] = next;
                    sink.record(t, i, &self.ids[i], &next);
                    changed += 1;
                }
            }
        }
        let publish_us = publish_start.elapsed().as_micros() as u64;

        // 2. Evaluate against the published snapshot.
        let evaluate_start = Instant::now();
        let results = self.evaluate(&due);
        for (&i, (next, delay)) in due.iter().zip(results) {
            let delay = self.checked_delay(i, delay);
            self.pending[i] = Some(next);
            self.next_due[i] = t + delay;
        }
        let evaluate_us = evaluate_start.elapsed().as_micros() as u64;

        self.time = t;
        self.steps += 1;
        self.last_metrics = StepMetrics {
            total_us: step_start.elapsed().as_micros() as u64,
            evaluate_us,
            publish_us,
            cells_evaluated: due.len(),
            cells_changed: changed,
        };
        debug!(
            time = t,
            evaluated = due.len(),
            changed,
            "step complete"
        );

        Some(StepReport {
            time: t,
            metrics: self.last_metrics.clone(),
        })
    }

    /// Step while the next due time is at most `duration`.
    ///
    /// A NaN `duration` runs nothing.
    pub fn run_until<S: StateSink<P> + ?Sized>(&mut self, duration: f64, sink: &mut S) -> RunSummary {
        let mut summary = RunSummary {
            final_time: self.time,
            ..RunSummary::default()
        };
        while let Some(t) = self.next_due_time() {
            if duration.is_nan() || t > duration {
                break;
            }
            match self.step(sink) {
                Some(report) => summary.absorb(&report),
                None => break,
            }
        }
        info!(
            steps = summary.steps,
            final_time = summary.final_time,
            evaluations = summary.evaluations,
            changes = summary.changes,
            "run complete"
        );
        summary
    }

    fn evaluate(&self, due: &[usize]) -> Vec<(CompartmentState<P>, f64)> {
        if self.workers <= 1 || due.len() <= 1 {
            return due.iter().map(|&i| self.evaluate_cell(i)).collect();
        }
        let chunk = due.len().div_ceil(self.workers);
        std::thread::scope(|scope| {
            let handles: Vec<_> = due
                .chunks(chunk)
                .map(|part| {
                    scope.spawn(move || {
                        part.iter()
                            .map(|&i| self.evaluate_cell(i))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            let mut out = Vec::with_capacity(due.len());
            for handle in handles {
                match handle.join() {
                    Ok(part) => out.extend(part),
                    Err(payload) => std::panic::resume_unwind(payload),
                }
            }
            out
        })
    }

    fn evaluate_cell(&self, i: usize) -> (CompartmentState<P>, f64) {
        let edges = &self.edges[self.edge_offsets[i]..self.edge_offsets[i + 1]];
        let view = NeighbourView::new(edges, &self.published, &self.ids);
        let model = &self.models[i];
        let next = model.local_computation(self.published[i], &view);
        let delay = model.output_delay(&next);
        (next, delay)
    }

    fn checked_delay(&self, i: usize, delay: f64) -> f64 {
        if delay.is_finite() && delay > 0.0 {
            delay
        } else {
            warn!(
                cell = %self.ids[i],
                model = self.models[i].name(),
                delay,
                fallback = self.default_delay,
                "invalid output delay, using default"
            );
            self.default_delay
        }
    }

    /// Published state of `cell`.
    pub fn state(&self, cell: &str) -> Option<&CompartmentState<P>> {
        self.index.get(cell).map(|&i| &self.published[i])
    }

    /// Published states in canonical cell order.
    pub fn states(&self) -> impl Iterator<Item = (&CellId, &CompartmentState<P>)> {
        self.ids.iter().zip(&self.published)
    }

    /// Cell ids in canonical order.
    pub fn cell_ids(&self) -> &[CellId] {
        &self.ids
    }

    /// Number of cells.
    pub fn cell_count(&self) -> usize {
        self.ids.len()
    }

    /// Time of the most recent step (0 before the first).
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Steps executed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Resolved worker count.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Metrics from the most recent step.
    pub fn last_metrics(&self) -> &StepMetrics {
        &self.last_metrics
    }
}

impl<P: Population> std::fmt::Debug for CellNetwork<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CellNetwork")
            .field("cells", &self.ids.len())
            .field("edges", &self.edges.len())
            .field("time", &self.time)
            .field("steps", &self.steps)
            .field("workers", &self.workers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use epicell_core::{ConfigError, ModelDescriptor, ParamBlock};
    use epicell_space::WeightedGraph;
    use epicell_test_utils::{fixture_registry, line_graph, ConstCell, RecordingSink};

    fn seir(beta: f64, sigma: f64, gamma: f64) -> ModelDescriptor {
        ModelDescriptor::new(
            "seir",
            ParamBlock::new()
                .with("beta", beta)
                .with("sigma", sigma)
                .with("gamma", gamma),
        )
    }

    fn chain(n: usize) -> CellNetwork<f64> {
        let g = line_graph(n, 1.0);
        let mut cfg = NetworkConfig::new(Box::new(g));
        for k in 0..n {
            let initial = if k == 0 {
                CompartmentState::new(0.0, 0.0, 10.0, 0.0)
            } else {
                CompartmentState::new(10.0, 0.0, 0.0, 0.0)
            };
            cfg = cfg.with_cell(format!("c{k}"), seir(1.0, 1.0, 0.0), initial);
        }
        CellNetwork::new(cfg, &fixture_registry()).unwrap()
    }

    // ── Build ──────────────────────────────────────────────────

    #[test]
    fn unknown_model_fails_build() {
        let mut g = WeightedGraph::new();
        g.add_cell("A").unwrap();
        let cfg = NetworkConfig::<i64>::new(Box::new(g)).with_cell(
            "A",
            ModelDescriptor::new("ZikaCell", ParamBlock::new()),
            CompartmentState::empty(),
        );
        let err = CellNetwork::new(cfg, &ModelRegistry::with_defaults()).unwrap_err();
        assert_eq!(
            err,
            NetworkError::Config(ConfigError::UnknownModel {
                cell: "A".into(),
                model: "ZikaCell".into(),
            })
        );
    }

    #[test]
    fn negative_initial_state_fails_build() {
        let mut g = WeightedGraph::new();
        g.add_cell("A").unwrap();
        let cfg = NetworkConfig::<f64>::new(Box::new(g)).with_cell(
            "A",
            seir(0.1, 0.1, 0.1),
            CompartmentState::new(1.0, -1.0, 0.0, 0.0),
        );
        let err = CellNetwork::new(cfg, &ModelRegistry::with_defaults()).unwrap_err();
        assert!(matches!(
            err,
            NetworkError::Config(ConfigError::InvalidValue { ref field, .. }) if field == "E"
        ));
    }

    // ── Scheduling ─────────────────────────────────────────────

    #[test]
    fn infection_advances_one_hop_per_step() {
        let mut net = chain(4);
        let mut sink = RecordingSink::new();

        // t=0 computes; t=1 publishes c1 exposed.
        net.run_until(1.0, &mut sink);
        assert_eq!(net.state("c1").unwrap().exposed, 10.0);
        assert_eq!(net.state("c2").unwrap().exposed, 0.0);

        // t=2 publishes c1 infectious, c2 still untouched (c1 had I=0 at t=1).
        net.run_until(2.0, &mut sink);
        assert_eq!(net.state("c1").unwrap().infectious, 10.0);
        assert_eq!(net.state("c2").unwrap().exposed, 0.0);

        net.run_until(3.0, &mut sink);
        assert_eq!(net.state("c2").unwrap().exposed, 10.0);
        assert_eq!(net.state("c3").unwrap().exposed, 0.0);
    }

    #[test]
    fn only_changes_are_recorded() {
        let mut net = chain(3);
        let mut sink = RecordingSink::new();
        net.emit_initial(&mut sink);
        assert_eq!(sink.len(), 3);
        assert!(sink.records().iter().all(|r| r.time == 0.0));

        let summary = net.run_until(1.0, &mut sink);
        assert_eq!(summary.steps, 2);
        assert_eq!(summary.evaluations, 6);
        // At t=1 only c1 changes: c0 has no neighbours and γ=0, c2 sees c1's I=0.
        assert_eq!(summary.changes, 1);
        assert_eq!(sink.times_for("c1"), vec![0.0, 1.0]);
        assert_eq!(sink.times_for("c0"), vec![0.0]);
    }

    #[test]
    fn settled_cell_publishes_once() {
        let mut g = WeightedGraph::new();
        g.add_cell("x").unwrap();
        let target = CompartmentState::new(0, 0, 0, 5);
        let mut registry = ModelRegistry::<i64>::new();
        registry.register("const", move |_, _| {
            Ok(Box::new(ConstCell::new(target)) as Box<dyn CellModel<i64>>)
        });
        let cfg = NetworkConfig::<i64>::new(Box::new(g)).with_cell(
            "x",
            ModelDescriptor::new("const", ParamBlock::new()),
            CompartmentState::new(5, 0, 0, 0),
        );
        let mut net = CellNetwork::new(cfg, &registry).unwrap();
        let mut sink = RecordingSink::new();
        net.emit_initial(&mut sink);
        let summary = net.run_until(3.0, &mut sink);

        assert_eq!(summary.steps, 4);
        assert_eq!(summary.changes, 1);
        assert_eq!(sink.times_for("x"), vec![0.0, 1.0]);
        assert_eq!(net.state("x"), Some(&target));
    }

    #[test]
    fn invalid_delay_falls_back_to_default() {
        let mut g = WeightedGraph::new();
        g.add_cell("x").unwrap();
        let tick = ModelDescriptor::new("tick", ParamBlock::new().with("delay", -1.0));
        let cfg = NetworkConfig::<i64>::new(Box::new(g))
            .with_default_delay(0.5)
            .with_cell("x", tick, CompartmentState::new(3, 0, 0, 0));
        let mut net = CellNetwork::new(cfg, &fixture_registry()).unwrap();
        let mut sink = RecordingSink::new();
        net.run_until(1.0, &mut sink);
        assert_eq!(sink.times_for("x"), vec![0.5, 1.0]);
        assert_eq!(net.state("x"), Some(&CompartmentState::new(1, 0, 0, 2)));
    }

    #[test]
    fn heterogeneous_delays_interleave() {
        let mut g = WeightedGraph::new();
        g.add_cell("fast").unwrap();
        g.add_cell("slow").unwrap();
        let cfg = NetworkConfig::<i64>::new(Box::new(g))
            .with_cell(
                "fast",
                ModelDescriptor::new("tick", ParamBlock::new().with("delay", 1.0)),
                CompartmentState::new(10, 0, 0, 0),
            )
            .with_cell(
                "slow",
                ModelDescriptor::new("tick", ParamBlock::new().with("delay", 3.0)),
                CompartmentState::new(10, 0, 0, 0),
            );
        let mut net = CellNetwork::new(cfg, &fixture_registry()).unwrap();
        let mut sink = RecordingSink::new();
        let summary = net.run_until(6.0, &mut sink);
        // Steps at t = 0, 1, 2, 3, 4, 5, 6.
        assert_eq!(summary.steps, 7);
        assert_eq!(sink.times_for("slow"), vec![3.0, 6.0]);
        assert_eq!(sink.times_for("fast").len(), 6);
        assert_eq!(net.state("slow").unwrap().recovered, 2);
    }

    #[test]
    fn parallel_matches_serial() {
        let build = |workers| {
            let n = 9;
            let g = line_graph(n, 0.7);
            let mut cfg = NetworkConfig::new(Box::new(g)).with_workers(workers);
            for k in 0..n {
                let initial = CompartmentState::new(100.0 - k as f64, 0.0, k as f64, 0.0);
                cfg = cfg.with_cell(format!("c{k}"), seir(0.3, 0.2, 0.1), initial);
            }
            CellNetwork::new(cfg, &fixture_registry()).unwrap()
        };
        let mut serial = build(1);
        let mut parallel = build(4);
        assert_eq!(parallel.workers(), 4);
        let mut a = RecordingSink::new();
        let mut b = RecordingSink::new();
        serial.run_until(25.0, &mut a);
        parallel.run_until(25.0, &mut b);
        assert_eq!(a.records(), b.records());
        assert!(serial.states().eq(parallel.states()));
    }

    #[test]
    fn nan_duration_runs_nothing() {
        let mut net = chain(2);
        let summary = net.run_until(f64::NAN, &mut RecordingSink::new());
        assert_eq!(summary.steps, 0);
        assert_eq!(net.steps(), 0);
    }

    // ── Debug impl ─────────────────────────────────────────────

    #[test]
    fn debug_impl_doesnt_panic() {
        let net = chain(2);
        let s = format!("{net:?}");
        assert!(s.contains("CellNetwork"));
    }
}
