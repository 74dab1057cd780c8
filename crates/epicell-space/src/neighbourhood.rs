//! Offset-based neighbourhood shapes for grid topologies.

use crate::error::TopologyError;

/// A relative grid position with the weight of the edge it produces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Offset {
    /// Row offset.
    pub dr: i32,
    /// Column offset.
    pub dc: i32,
    /// Influence weight of the resulting edge.
    pub weight: f64,
}

impl Offset {
    /// Build an offset.
    pub fn new(dr: i32, dc: i32, weight: f64) -> Self {
        Self { dr, dc, weight }
    }
}

/// Which relative positions count as neighbours on a grid.
///
/// The named shapes exclude the `(0, 0)` offset; an explicit
/// [`Offsets`](Neighbourhood::Offsets) list may include it to model
/// self-influence.
#[derive(Clone, Debug, PartialEq)]
pub enum Neighbourhood {
    /// Cells within Manhattan distance `radius`, all with the same weight.
    VonNeumann {
        /// Maximum `|dr| + |dc|`.
        radius: u32,
        /// Weight of every edge.
        weight: f64,
    },
    /// Cells within Chebyshev distance `radius`, all with the same weight.
    Moore {
        /// Maximum `max(|dr|, |dc|)`.
        radius: u32,
        /// Weight of every edge.
        weight: f64,
    },
    /// An explicit list of weighted offsets.
    Offsets(Vec<Offset>),
}

impl Neighbourhood {
    /// Von Neumann neighbourhood with unit weights.
    pub fn von_neumann(radius: u32) -> Self {
        Self::VonNeumann {
            radius,
            weight: 1.0,
        }
    }

    /// Moore neighbourhood with unit weights.
    pub fn moore(radius: u32) -> Self {
        Self::Moore {
            radius,
            weight: 1.0,
        }
    }

    /// Expand the shape into its offset list, in row-major offset order.
    pub fn offsets(&self) -> Vec<Offset> {
        match self {
            Self::VonNeumann { radius, weight } => {
                square_offsets(*radius, *weight, |dr, dc| dr.unsigned_abs() + dc.unsigned_abs())
            }
            Self::Moore { radius, weight } => {
                square_offsets(*radius, *weight, |dr, dc| dr.unsigned_abs().max(dc.unsigned_abs()))
            }
            Self::Offsets(list) => list.clone(),
        }
    }

    /// Check every offset weight is finite and non-negative.
    pub fn validate(&self) -> Result<(), TopologyError> {
        for o in self.offsets() {
            if !o.weight.is_finite() || o.weight < 0.0 {
                return Err(TopologyError::InvalidOffsetWeight {
                    dr: o.dr,
                    dc: o.dc,
                    weight: o.weight,
                });
            }
        }
        Ok(())
    }
}

fn square_offsets(radius: u32, weight: f64, norm: impl Fn(i32, i32) -> u32) -> Vec<Offset> {
    let r = radius.min(i32::MAX as u32) as i32;
    let mut out = Vec::new();
    for dr in -r..=r {
        for dc in -r..=r {
            if (dr, dc) != (0, 0) && norm(dr, dc) <= radius {
                out.push(Offset::new(dr, dc, weight));
            }
        }
    }
    out
}
