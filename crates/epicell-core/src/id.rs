//! Strongly-typed cell identifiers.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Identifies a cell within a simulation network.
///
/// Cell identifiers come from configuration (graph topologies use
/// free-form names, grid topologies use `"(row,col)"`). The string is
/// reference-counted so neighbour lists can hold ids without copying.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(Arc<str>);

impl CellId {
    /// Create a cell id from any string-like value.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CellId {
    fn from(v: &str) -> Self {
        Self::new(v)
    }
}

impl From<String> for CellId {
    fn from(v: String) -> Self {
        Self(Arc::from(v))
    }
}

impl Borrow<str> for CellId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CellId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
