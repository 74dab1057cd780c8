//! A [`StateSink`] that keeps everything it is given.

use epicell_core::{CellId, CompartmentState, Population, StateSink};

/// One captured `record` call.
#[derive(Clone, Debug, PartialEq)]
pub struct Record<P> {
    pub time: f64,
    pub index: usize,
    pub cell: CellId,
    pub state: CompartmentState<P>,
}

/// Captures every record in call order.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink<P> {
    records: Vec<Record<P>>,
}

impl<P: Population> RecordingSink<P> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub fn records(&self) -> &[Record<P>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Times at which `cell` was recorded, in call order.
    pub fn times_for(&self, cell: &str) -> Vec<f64> {
        self.for_cell(cell).map(|r| r.time).collect()
    }

    /// States recorded for `cell`, in call order.
    pub fn states_for(&self, cell: &str) -> Vec<CompartmentState<P>> {
        self.for_cell(cell).map(|r| r.state).collect()
    }

    /// The most recent state recorded for `cell`.
    pub fn last_for(&self, cell: &str) -> Option<CompartmentState<P>> {
        self.for_cell(cell).last().map(|r| r.state)
    }

    fn for_cell<'a>(&'a self, cell: &'a str) -> impl Iterator<Item = &'a Record<P>> + 'a {
        self.records.iter().filter(move |r| r.cell.as_str() == cell)
    }
}

impl<P: Population> StateSink<P> for RecordingSink<P> {
    fn record(&mut self, time: f64, index: usize, cell: &CellId, state: &CompartmentState<P>) {
        self.records.push(Record {
            time,
            index,
            cell: cell.clone(),
            state: *state,
        });
    }
}
