//! State logging for Epicell simulation runs.
//!
//! Every state a cell publishes is written as one row of a
//! semicolon-delimited text log, readable by spreadsheet tools and the
//! usual plotting scripts.
//!
//! # Architecture
//!
//! - [`CsvStateLogger`] writes rows to any `Write` sink and plugs into
//!   the scheduler as a [`StateSink`](epicell_core::StateSink)
//! - [`CsvStateReader`] parses a log back into [`LogRow`]s
//!
//! # Format
//!
//! ```text
//! sep=;
//! time;model_id;model_name;port_name;data
//! 0;0;A;;<99,0,1,0>
//! 1;1;B;;<99.5,0.5,0,0>
//! ```
//!
//! `model_id` is the cell's dense index, `model_name` its id, and
//! `port_name` is always empty.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod format;
pub mod reader;
pub mod writer;

pub use error::LogError;
pub use format::{check_ids, HEADER, SEPARATOR, SEPARATOR_LINE};
pub use reader::{CsvStateReader, LogRow, RowIter};
pub use writer::CsvStateLogger;
