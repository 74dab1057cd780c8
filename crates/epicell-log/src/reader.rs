//! State log reader.
//!
//! [`CsvStateReader`] parses a log written by
//! [`CsvStateLogger`](crate::CsvStateLogger). The header is validated on
//! construction.

use std::io::{BufRead, Lines};

use epicell_core::{CellId, CompartmentState};

use crate::error::LogError;
use crate::format::{FIELD_COUNT, HEADER, SEPARATOR, SEPARATOR_LINE};

/// One parsed data row.
///
/// Populations are read back as `f64`; discrete counts convert exactly.
#[derive(Clone, Debug, PartialEq)]
pub struct LogRow {
    /// Publish time.
    pub time: f64,
    /// Dense cell index.
    pub index: usize,
    /// Cell id.
    pub cell: CellId,
    /// Recorded state.
    pub state: CompartmentState<f64>,
}

/// Reads rows from a state log.
#[derive(Debug)]
pub struct CsvStateReader<R: BufRead> {
    lines: Lines<R>,
    line: usize,
    rows_read: u64,
}

impl<R: BufRead> CsvStateReader<R> {
    /// Open a log, reading and validating the two header lines.
    pub fn open(reader: R) -> Result<Self, LogError> {
        let mut this = Self {
            lines: reader.lines(),
            line: 0,
            rows_read: 0,
        };
        for expected in [SEPARATOR_LINE, HEADER] {
            let found = this.next_line()?.unwrap_or_default();
            if found != expected {
                return Err(LogError::MalformedHeader {
                    line: this.line,
                    found,
                });
            }
        }
        Ok(this)
    }

    /// Read the next row, or `None` at end of stream. Blank lines are
    /// skipped.
    pub fn next_row(&mut self) -> Result<Option<LogRow>, LogError> {
        loop {
            let Some(text) = self.next_line()? else {
                return Ok(None);
            };
            if text.trim().is_empty() {
                continue;
            }
            let row = parse_row(&text).map_err(|detail| LogError::MalformedRow {
                line: self.line,
                detail,
            })?;
            self.rows_read += 1;
            return Ok(Some(row));
        }
    }

    /// Number of rows read so far.
    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    /// Convert into a row iterator.
    pub fn rows(self) -> RowIter<R> {
        RowIter { reader: self }
    }

    fn next_line(&mut self) -> Result<Option<String>, LogError> {
        match self.lines.next() {
            Some(line) => {
                self.line += 1;
                Ok(Some(line?))
            }
            None => Ok(None),
        }
    }
}

/// Iterator over the rows of a [`CsvStateReader`].
pub struct RowIter<R: BufRead> {
    reader: CsvStateReader<R>,
}

impl<R: BufRead> Iterator for RowIter<R> {
    type Item = Result<LogRow, LogError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.next_row().transpose()
    }
}

fn parse_row(text: &str) -> Result<LogRow, String> {
    let fields: Vec<&str> = text.split(SEPARATOR).collect();
    if fields.len() != FIELD_COUNT {
        return Err(format!(
            "expected {FIELD_COUNT} fields, found {}",
            fields.len()
        ));
    }
    let time = fields[0]
        .parse::<f64>()
        .map_err(|_| format!("invalid time '{}'", fields[0]))?;
    let index = fields[1]
        .parse::<usize>()
        .map_err(|_| format!("invalid model_id '{}'", fields[1]))?;
    let state = parse_state(fields[4])?;
    Ok(LogRow {
        time,
        index,
        cell: CellId::from(fields[2]),
        state,
    })
}

fn parse_state(field: &str) -> Result<CompartmentState<f64>, String> {
    let inner = field
        .strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .ok_or_else(|| format!("state '{field}' is not of the form <S,E,I,R>"))?;
    let mut values = [0.0; 4];
    let mut parts = inner.split(',');
    for slot in &mut values {
        let part = parts
            .next()
            .ok_or_else(|| format!("state '{field}' has fewer than four values"))?;
        *slot = part
            .trim()
            .parse()
            .map_err(|_| format!("invalid population '{part}'"))?;
    }
    if parts.next().is_some() {
        return Err(format!("state '{field}' has more than four values"));
    }
    let [s, e, i, r] = values;
    Ok(CompartmentState::new(s, e, i, r))
}
