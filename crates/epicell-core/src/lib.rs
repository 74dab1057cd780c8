//! Core types and traits for the Epicell simulation framework.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the Epicell workspace:
//! cell identifiers, the numeric [`Population`] representation, the
//! [`CompartmentState`] record, per-cell [`RateParameters`], error types,
//! and the [`StateSink`] output trait.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod params;
pub mod population;
pub mod state;
pub mod traits;

pub use error::ConfigError;
pub use id::CellId;
pub use params::{ModelDescriptor, NumericMode, ParamBlock, RateParameters};
pub use population::Population;
pub use state::CompartmentState;
pub use traits::StateSink;
