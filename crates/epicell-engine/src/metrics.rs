//! Per-step performance metrics for the cell network.
//!
//! [`StepMetrics`] captures timing and work counts for a single step;
//! [`StepReport`] pairs them with the step's simulation time. A full run
//! is summarised by [`RunSummary`].

/// Timing and work counts collected during a single step.
///
/// All durations are in microseconds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepMetrics {
    /// Wall-clock time for the entire step, in microseconds.
    pub total_us: u64,
    /// Time spent evaluating due cells, in microseconds.
    pub evaluate_us: u64,
    /// Time spent publishing states and notifying the sink, in microseconds.
    pub publish_us: u64,
    /// Number of cells evaluated in this step.
    pub cells_evaluated: usize,
    /// Number of published states that differ from the previous ones.
    pub cells_changed: usize,
}

/// Result of one [`CellNetwork::step`](crate::CellNetwork::step).
#[derive(Clone, Debug, PartialEq)]
pub struct StepReport {
    /// Simulation time at which the step ran.
    pub time: f64,
    /// Metrics for the step.
    pub metrics: StepMetrics,
}

/// Totals over a [`CellNetwork::run_until`](crate::CellNetwork::run_until) call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunSummary {
    /// Steps executed.
    pub steps: u64,
    /// Time of the last executed step, or the starting time if none ran.
    pub final_time: f64,
    /// Cell evaluations across all steps.
    pub evaluations: u64,
    /// State changes published across all steps.
    pub changes: u64,
}

impl RunSummary {
    pub(crate) fn absorb(&mut self, report: &StepReport) {
        self.steps += 1;
        self.final_time = report.time;
        self.evaluations += report.metrics.cells_evaluated as u64;
        self.changes += report.metrics.cells_changed as u64;
    }
}
