//! State log writer.
//!
//! [`CsvStateLogger`] wraps any `Write` sink and emits one row per
//! published cell state.

use std::io::Write;

use epicell_core::{CellId, CompartmentState, Population, StateSink};

use crate::error::LogError;
use crate::format::{is_representable, HEADER, SEPARATOR, SEPARATOR_LINE};

/// Writes published cell states as a delimited text log.
///
/// Generic over `W: Write` so tests can use `Vec<u8>` and production
/// code can use `BufWriter<File>`.
///
/// As a [`StateSink`] the logger cannot return errors from
/// [`record`](StateSink::record), so the first failure is latched:
/// later rows are dropped and [`finish`](Self::finish) reports it.
///
/// # Example
///
/// ```
/// use epicell_core::{CellId, CompartmentState, StateSink};
/// use epicell_log::CsvStateLogger;
///
/// let mut log = CsvStateLogger::new(Vec::new()).unwrap();
/// log.record(0.0, 0, &CellId::from("A"), &CompartmentState::new(9, 0, 1, 0));
/// let bytes = log.finish().unwrap();
/// assert_eq!(
///     String::from_utf8(bytes).unwrap(),
///     "sep=;\ntime;model_id;model_name;port_name;data\n0;0;A;;<9,0,1,0>\n"
/// );
/// ```
pub struct CsvStateLogger<W: Write> {
    writer: W,
    rows_written: u64,
    error: Option<LogError>,
}

impl<W: Write> CsvStateLogger<W> {
    /// Create a logger, writing the two header lines immediately.
    pub fn new(mut writer: W) -> Result<Self, LogError> {
        writeln!(writer, "{SEPARATOR_LINE}")?;
        writeln!(writer, "{HEADER}")?;
        Ok(Self {
            writer,
            rows_written: 0,
            error: None,
        })
    }

    /// Write one row.
    ///
    /// Returns [`LogError::UnrepresentableId`] without writing anything
    /// if `cell` would break the row structure.
    pub fn write_row<P: Population>(
        &mut self,
        time: f64,
        index: usize,
        cell: &CellId,
        state: &CompartmentState<P>,
    ) -> Result<(), LogError> {
        if !is_representable(cell.as_str()) {
            return Err(LogError::UnrepresentableId { cell: cell.clone() });
        }
        let sep = SEPARATOR;
        writeln!(
            self.writer,
            "{time}{sep}{index}{sep}{cell}{sep}{sep}{state}"
        )?;
        self.rows_written += 1;
        Ok(())
    }

    /// Number of rows written so far, excluding the header.
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// The latched error, if a row has failed.
    pub fn error(&self) -> Option<&LogError> {
        self.error.as_ref()
    }

    /// Flush and return the underlying writer, or the first error
    /// encountered while recording.
    pub fn finish(mut self) -> Result<W, LogError> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write, P: Population> StateSink<P> for CsvStateLogger<W> {
    fn record(&mut self, time: f64, index: usize, cell: &CellId, state: &CompartmentState<P>) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.write_row(time, index, cell, state) {
            self.error = Some(e);
        }
    }
}

impl<W: Write> std::fmt::Debug for CsvStateLogger<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvStateLogger")
            .field("rows_written", &self.rows_written)
            .field("failed", &self.error.is_some())
            .finish()
    }
}
