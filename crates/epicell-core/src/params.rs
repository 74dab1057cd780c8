//! Per-cell parameters: the raw [`ParamBlock`], validated
//! [`RateParameters`], and the [`ModelDescriptor`] handed to the registry.

use std::fmt;

use indexmap::IndexMap;

use crate::error::ConfigError;
use crate::id::CellId;

/// Which numeric representation a simulation run uses for populations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NumericMode {
    /// Real-valued compartments; no rounding is applied.
    #[default]
    Continuous,
    /// Integral counts; every `rate * count` delta is truncated toward zero.
    Discrete,
}

impl NumericMode {
    /// Configuration spelling of the mode.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Continuous => "continuous",
            Self::Discrete => "discrete",
        }
    }
}

impl fmt::Display for NumericMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named numeric parameters from one cell's configuration block.
///
/// Insertion-ordered so error messages and debug output follow the
/// order of the input file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParamBlock {
    values: IndexMap<String, f64>,
}

impl ParamBlock {
    /// An empty block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: f64) {
        self.values.insert(key.into(), value);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        self.insert(key, value);
        self
    }

    /// Look up a parameter by exact name.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` if no parameters are set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Fetch a required parameter under its canonical name or any alias.
    ///
    /// Errors name the canonical field, never the alias.
    pub fn require(&self, cell: &CellId, name: &str, aliases: &[&str]) -> Result<f64, ConfigError> {
        std::iter::once(name)
            .chain(aliases.iter().copied())
            .find_map(|key| self.get(key))
            .ok_or_else(|| ConfigError::missing(cell, name))
    }
}

impl FromIterator<(String, f64)> for ParamBlock {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Per-cell SEIR rate constants.
///
/// All rates are per output-delay quantum. `incubation_rate` and
/// `recovery_rate` are fractions of a compartment that move in one step
/// and must lie in `[0, 1]`; `transmission_rate` only has to be
/// non-negative because new exposures are clamped to `S`.
///
/// Immutable once constructed: the only constructors validate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RateParameters {
    transmission_rate: f64,
    incubation_rate: f64,
    recovery_rate: f64,
}

impl RateParameters {
    /// Canonical name of β.
    pub const TRANSMISSION: &'static str = "transmission_rate";
    /// Canonical name of σ.
    pub const INCUBATION: &'static str = "incubation_rate";
    /// Canonical name of γ.
    pub const RECOVERY: &'static str = "recovery_rate";

    /// Validate and build rate parameters for `cell`.
    pub fn validated(
        cell: &CellId,
        transmission_rate: f64,
        incubation_rate: f64,
        recovery_rate: f64,
    ) -> Result<Self, ConfigError> {
        check_rate(cell, Self::TRANSMISSION, transmission_rate, None)?;
        check_rate(cell, Self::INCUBATION, incubation_rate, Some(1.0))?;
        check_rate(cell, Self::RECOVERY, recovery_rate, Some(1.0))?;
        Ok(Self {
            transmission_rate,
            incubation_rate,
            recovery_rate,
        })
    }

    /// Extract rates from a parameter block.
    ///
    /// Accepts the canonical names and the short aliases `beta`, `sigma`
    /// and `gamma`.
    pub fn from_params(cell: &CellId, params: &ParamBlock) -> Result<Self, ConfigError> {
        let beta = params.require(cell, Self::TRANSMISSION, &["beta"])?;
        let sigma = params.require(cell, Self::INCUBATION, &["sigma"])?;
        let gamma = params.require(cell, Self::RECOVERY, &["gamma"])?;
        Self::validated(cell, beta, sigma, gamma)
    }

    /// β: exposures per unit of force of infection.
    pub fn transmission_rate(&self) -> f64 {
        self.transmission_rate
    }

    /// σ: fraction of `E` becoming infectious per step.
    pub fn incubation_rate(&self) -> f64 {
        self.incubation_rate
    }

    /// γ: fraction of `I` recovering per step.
    pub fn recovery_rate(&self) -> f64 {
        self.recovery_rate
    }
}

fn check_rate(cell: &CellId, field: &str, value: f64, max: Option<f64>) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::invalid(
            cell,
            field,
            format!("rate must be finite and non-negative, got {value}"),
        ));
    }
    if let Some(max) = max {
        if value > max {
            return Err(ConfigError::invalid(
                cell,
                field,
                format!("rate is a per-step fraction and must not exceed {max}, got {value}"),
            ));
        }
    }
    Ok(())
}

/// A model-name tag plus its parameter block.
///
/// Resolved exactly once, at build time, into a concrete cell model.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelDescriptor {
    /// Registry key naming the cell model variant.
    pub model: String,
    /// Parameters handed to the variant's factory.
    pub params: ParamBlock,
}

impl ModelDescriptor {
    /// Build a descriptor.
    pub fn new(model: impl Into<String>, params: ParamBlock) -> Self {
        Self {
            model: model.into(),
            params,
        }
    }
}
