//! Regular 2D grid with offset-based neighbourhoods.

use crate::edge::EdgeBehavior;
use crate::error::TopologyError;
use crate::neighbourhood::{Neighbourhood, Offset};
use crate::topology::{Edge, Neighbours, Topology};
use epicell_core::CellId;
use indexmap::IndexMap;

/// A two-dimensional grid of `rows * cols` cells.
///
/// Each cell has id `"(row,col)"` where `0 <= row < rows` and
/// `0 <= col < cols`; canonical order is row-major. A cell's neighbour
/// set is its [`Neighbourhood`] offsets resolved under the grid's
/// [`EdgeBehavior`]:
/// - **Absorb**: out-of-bounds offsets are dropped
/// - **Clamp**: out-of-bounds offsets map onto the boundary cell
/// - **Wrap**: periodic boundary (torus topology)
///
/// When several offsets resolve to the same cell (clamping, or wrapping
/// on a grid narrower than the neighbourhood) their weights are summed,
/// keeping neighbour ids unique.
///
/// # Examples
///
/// ```
/// use epicell_space::{EdgeBehavior, Grid2D, Neighbourhood, Topology};
///
/// let grid = Grid2D::new(16, 16, EdgeBehavior::Absorb, Neighbourhood::moore(1)).unwrap();
/// assert_eq!(grid.cell_count(), 256);
///
/// // Corner cell (0,0) under Absorb has only 3 Moore neighbours.
/// assert_eq!(grid.neighbours(&Grid2D::cell_id(0, 0)).unwrap().len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct Grid2D {
    rows: u32,
    cols: u32,
    edge: EdgeBehavior,
    neighbourhood: Neighbourhood,
    offsets: Vec<Offset>,
}

impl Grid2D {
    /// Maximum dimension size: coordinates use `i32`, so each axis must fit.
    pub const MAX_DIM: u32 = i32::MAX as u32;

    /// Create a grid with the given dimensions, edge behavior, and neighbourhood.
    ///
    /// Returns `Err(TopologyError::EmptySpace)` if either dimension is 0,
    /// `Err(TopologyError::DimensionTooLarge)` if either exceeds `i32::MAX`,
    /// or `Err(TopologyError::InvalidOffsetWeight)` for a bad offset weight.
    pub fn new(
        rows: u32,
        cols: u32,
        edge: EdgeBehavior,
        neighbourhood: Neighbourhood,
    ) -> Result<Self, TopologyError> {
        if rows == 0 || cols == 0 {
            return Err(TopologyError::EmptySpace);
        }
        if rows > Self::MAX_DIM {
            return Err(TopologyError::DimensionTooLarge {
                name: "rows",
                value: rows,
                max: Self::MAX_DIM,
            });
        }
        if cols > Self::MAX_DIM {
            return Err(TopologyError::DimensionTooLarge {
                name: "cols",
                value: cols,
                max: Self::MAX_DIM,
            });
        }
        neighbourhood.validate()?;
        let offsets = neighbourhood.offsets();
        Ok(Self {
            rows,
            cols,
            edge,
            neighbourhood,
            offsets,
        })
    }

    /// Number of rows.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Edge behavior.
    pub fn edge_behavior(&self) -> EdgeBehavior {
        self.edge
    }

    /// The neighbourhood shape this grid was built with.
    pub fn neighbourhood(&self) -> &Neighbourhood {
        &self.neighbourhood
    }

    /// Id of the cell at `(row, col)`.
    pub fn cell_id(row: i32, col: i32) -> CellId {
        CellId::from(format!("({row},{col})"))
    }

    /// Parse a `"(row,col)"` id and check it lies inside this grid.
    pub fn coord_of(&self, cell: &str) -> Result<(i32, i32), TopologyError> {
        let malformed = || TopologyError::MalformedGridId {
            id: cell.to_string(),
            bounds: format!("[0, {}) x [0, {})", self.rows, self.cols),
        };
        let (r, c) = parse_pair(cell).ok_or_else(malformed)?;
        if r < 0 || r as i64 >= self.rows as i64 || c < 0 || c as i64 >= self.cols as i64 {
            return Err(malformed());
        }
        Ok((r, c))
    }

    /// Row-major index of `(row, col)`.
    pub fn index(&self, row: i32, col: i32) -> usize {
        (row as usize) * (self.cols as usize) + (col as usize)
    }

    /// Resolve the neighbourhood of `(r, c)` as `((row, col), weight)` pairs.
    fn neighbours_rc(&self, r: i32, c: i32) -> IndexMap<(i32, i32), f64> {
        let mut result: IndexMap<(i32, i32), f64> = IndexMap::with_capacity(self.offsets.len());
        for o in &self.offsets {
            let nr = self.edge.resolve_axis(r.saturating_add(o.dr), self.rows);
            let nc = self.edge.resolve_axis(c.saturating_add(o.dc), self.cols);
            if let (Some(nr), Some(nc)) = (nr, nc) {
                *result.entry((nr, nc)).or_insert(0.0) += o.weight;
            }
        }
        result
    }
}

fn parse_pair(id: &str) -> Option<(i32, i32)> {
    let inner = id.trim().strip_prefix('(')?.strip_suffix(')')?;
    let (r, c) = inner.split_once(',')?;
    Some((r.trim().parse().ok()?, c.trim().parse().ok()?))
}

impl Topology for Grid2D {
    fn cell_count(&self) -> usize {
        (self.rows as usize) * (self.cols as usize)
    }

    fn cell_ids(&self) -> Vec<CellId> {
        let mut out = Vec::with_capacity(self.cell_count());
        for r in 0..self.rows as i32 {
            for c in 0..self.cols as i32 {
                out.push(Self::cell_id(r, c));
            }
        }
        out
    }

    fn contains(&self, cell: &CellId) -> bool {
        self.coord_of(cell.as_str()).is_ok()
    }

    fn neighbours(&self, cell: &CellId) -> Result<Neighbours, TopologyError> {
        let (r, c) = self
            .coord_of(cell.as_str())
            .map_err(|_| TopologyError::UnknownCell { cell: cell.clone() })?;
        Ok(self
            .neighbours_rc(r, c)
            .into_iter()
            .map(|((nr, nc), weight)| Edge {
                neighbour: Self::cell_id(nr, nc),
                weight,
            })
            .collect())
    }

    fn canonical_rank(&self, cell: &CellId) -> Option<usize> {
        let (r, c) = self.coord_of(cell.as_str()).ok()?;
        Some(self.index(r, c))
    }

    fn validate(&self) -> Result<(), TopologyError> {
        // Construction already rejected empty grids and bad weights, and
        // offset resolution never leaves the grid.
        Ok(())
    }
}
