//! Configuration error type shared by every build-time component.
//!
//! Errors are reported against the cell whose configuration block is at
//! fault, together with the offending field, so a single message is
//! enough to locate the problem in the input file.

use std::error::Error;
use std::fmt;

use crate::id::CellId;

/// Errors detected while turning a cell's configuration into a cell.
///
/// All variants are fatal at build time; none are produced while a
/// simulation is running.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// A required field is absent from the cell's configuration block.
    MissingField {
        /// The cell whose block is incomplete.
        cell: CellId,
        /// Name of the missing field.
        field: String,
    },
    /// A field is present but its value is unusable.
    InvalidValue {
        /// The cell whose block is malformed.
        cell: CellId,
        /// Name of the offending field.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },
    /// The model name does not match any registered cell model.
    UnknownModel {
        /// The cell that named the model.
        cell: CellId,
        /// The unrecognized model name.
        model: String,
    },
}

impl ConfigError {
    /// Shorthand for [`ConfigError::MissingField`].
    pub fn missing(cell: &CellId, field: impl Into<String>) -> Self {
        Self::MissingField {
            cell: cell.clone(),
            field: field.into(),
        }
    }

    /// Shorthand for [`ConfigError::InvalidValue`].
    pub fn invalid(cell: &CellId, field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            cell: cell.clone(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// The cell the error refers to.
    pub fn cell(&self) -> &CellId {
        match self {
            Self::MissingField { cell, .. }
            | Self::InvalidValue { cell, .. }
            | Self::UnknownModel { cell, .. } => cell,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { cell, field } => {
                write!(f, "cell '{cell}': missing required field '{field}'")
            }
            Self::InvalidValue {
                cell,
                field,
                reason,
            } => write!(f, "cell '{cell}': invalid value for '{field}': {reason}"),
            Self::UnknownModel { cell, model } => {
                write!(f, "cell '{cell}': unknown cell model '{model}'")
            }
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_cell_and_field() {
        let cell = CellId::from("Tampines");
        let msg = ConfigError::missing(&cell, "recovery_rate").to_string();
        assert!(msg.contains("Tampines"));
        assert!(msg.contains("recovery_rate"));

        let msg = ConfigError::UnknownModel {
            cell: cell.clone(),
            model: "sirs".into(),
        }
        .to_string();
        assert!(msg.contains("Tampines"));
        assert!(msg.contains("sirs"));
    }

    #[test]
    fn cell_accessor_covers_all_variants() {
        let cell = CellId::from("x");
        assert_eq!(ConfigError::invalid(&cell, "S", "negative").cell(), &cell);
        assert_eq!(ConfigError::missing(&cell, "S").cell(), &cell);
    }
}
