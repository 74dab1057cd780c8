//! Spatial edge (boundary) behavior for grid backends.

/// How a grid resolves neighbourhood offsets that fall outside its bounds.
///
/// # Examples
///
/// ```
/// use epicell_space::{EdgeBehavior, Grid2D, Neighbourhood, Topology};
///
/// // Absorb: corner has 2 von Neumann neighbours, interior has 4.
/// let absorb = Grid2D::new(4, 4, EdgeBehavior::Absorb, Neighbourhood::von_neumann(1)).unwrap();
/// assert_eq!(absorb.neighbours(&Grid2D::cell_id(0, 0)).unwrap().len(), 2);
/// assert_eq!(absorb.neighbours(&Grid2D::cell_id(1, 1)).unwrap().len(), 4);
///
/// // Wrap: every cell has exactly 4 neighbours (torus).
/// let wrap = Grid2D::new(4, 4, EdgeBehavior::Wrap, Neighbourhood::von_neumann(1)).unwrap();
/// assert_eq!(wrap.neighbours(&Grid2D::cell_id(0, 0)).unwrap().len(), 4);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EdgeBehavior {
    /// Out-of-bounds neighbour maps to the boundary cell.
    Clamp,
    /// Out-of-bounds neighbour wraps to the opposite side (periodic).
    Wrap,
    /// Out-of-bounds neighbour is omitted (fewer neighbours at edges).
    #[default]
    Absorb,
}

impl EdgeBehavior {
    /// Resolve a single axis value under this edge behavior.
    ///
    /// Returns `Some(in_bounds_value)` or `None` for an absorbed
    /// out-of-bounds value. `len` must be non-zero.
    pub fn resolve_axis(self, val: i32, len: u32) -> Option<i32> {
        let n = len as i64;
        let v = val as i64;
        if v >= 0 && v < n {
            return Some(val);
        }
        match self {
            Self::Absorb => None,
            Self::Clamp => Some(v.clamp(0, n - 1) as i32),
            Self::Wrap => Some(v.rem_euclid(n) as i32),
        }
    }
}
