//! The four-compartment SEIR state record.

use std::fmt;

use crate::error::ConfigError;
use crate::id::CellId;
use crate::population::Population;

/// Susceptible, exposed, infectious, and recovered populations of one cell.
///
/// Used both as a cell's own state and as the value observed from
/// neighbours. Equality is field-wise; [`Display`](fmt::Display) renders
/// `<S,E,I,R>`, the format consumed by the time-series log.
///
/// # Examples
///
/// ```
/// use epicell_core::CompartmentState;
///
/// let s = CompartmentState::new(990i64, 0, 10, 0);
/// assert_eq!(s.to_string(), "<990,0,10,0>");
/// assert_eq!(s.total(), 1000);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompartmentState<P = f64> {
    /// Susceptible population (`S`).
    pub susceptible: P,
    /// Exposed, not yet infectious, population (`E`).
    pub exposed: P,
    /// Infectious population (`I`).
    pub infectious: P,
    /// Recovered population (`R`).
    pub recovered: P,
}

impl<P: Population> CompartmentState<P> {
    /// Build a state from `S, E, I, R`.
    pub fn new(susceptible: P, exposed: P, infectious: P, recovered: P) -> Self {
        Self {
            susceptible,
            exposed,
            infectious,
            recovered,
        }
    }

    /// A state with every compartment empty.
    pub fn empty() -> Self {
        Self::new(P::ZERO, P::ZERO, P::ZERO, P::ZERO)
    }

    /// `S + E + I + R`.
    pub fn total(&self) -> P {
        self.susceptible + self.exposed + self.infectious + self.recovered
    }

    /// Field-wise `self - earlier`.
    ///
    /// The result may hold negative values; it is a change record, not
    /// a valid population.
    pub fn difference(&self, earlier: &Self) -> Self {
        Self {
            susceptible: self.susceptible - earlier.susceptible,
            exposed: self.exposed - earlier.exposed,
            infectious: self.infectious - earlier.infectious,
            recovered: self.recovered - earlier.recovered,
        }
    }

    /// Compartments paired with their single-letter labels, in `S,E,I,R` order.
    pub fn labelled(&self) -> [(&'static str, P); 4] {
        [
            ("S", self.susceptible),
            ("E", self.exposed),
            ("I", self.infectious),
            ("R", self.recovered),
        ]
    }

    /// Check every compartment is a valid (non-negative, finite) population.
    pub fn validate(&self, cell: &CellId) -> Result<(), ConfigError> {
        for (label, value) in self.labelled() {
            if !value.is_valid() {
                return Err(ConfigError::invalid(
                    cell,
                    label,
                    format!("compartment must be non-negative and finite, got {value}"),
                ));
            }
        }
        Ok(())
    }
}

impl<P: Population> Default for CompartmentState<P> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<P: fmt::Display> fmt::Display for CompartmentState<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<{},{},{},{}>",
            self.susceptible, self.exposed, self.infectious, self.recovered
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_log_format() {
        let s = CompartmentState::new(99.5, 0.5, 0.0, 0.0);
        assert_eq!(s.to_string(), "<99.5,0.5,0,0>");
    }

    #[test]
    fn equality_is_field_wise() {
        let a = CompartmentState::new(1i64, 2, 3, 4);
        assert_eq!(a, CompartmentState::new(1, 2, 3, 4));
        assert_ne!(a, CompartmentState::new(1, 2, 3, 5));
        assert_ne!(a, CompartmentState::new(0, 2, 3, 4));
    }

    #[test]
    fn difference_is_field_wise() {
        let before = CompartmentState::new(990i64, 0, 10, 0);
        let after = CompartmentState::new(990i64, 0, 9, 1);
        assert_eq!(after.difference(&before), CompartmentState::new(0, 0, -1, 1));
    }

    #[test]
    fn validate_reports_offending_compartment() {
        let cell = CellId::from("A");
        let bad = CompartmentState::new(1.0, -2.0, 0.0, 0.0);
        match bad.validate(&cell) {
            Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, "E"),
            other => panic!("expected InvalidValue, got {other:?}"),
        }
        assert!(CompartmentState::<f64>::empty().validate(&cell).is_ok());
    }

    #[test]
    fn default_is_empty() {
        assert_eq!(CompartmentState::<i64>::default().total(), 0);
    }
}
