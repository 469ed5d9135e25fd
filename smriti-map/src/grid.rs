//! Grid topology shared by the radar map and the planners.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};
use crate::point::Point2;

/// Immutable mapping between world coordinates and flat cell indices.
///
/// Cells are laid out row-major, row 0 at the south edge. The grid is
/// centered on `center` so the robot usually starts near the middle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridTopology {
    center: Point2,
    width: usize,
    height: usize,
    grid_size: f64,
}

impl GridTopology {
    /// Create a topology, validating the dimensions.
    pub fn new(center: Point2, width: usize, height: usize, grid_size: f64) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(MapError::Config(format!(
                "grid dimensions must be positive ({}x{})",
                width, height
            )));
        }
        if grid_size <= 0.0 {
            return Err(MapError::Config(format!(
                "grid size must be positive ({})",
                grid_size
            )));
        }
        Ok(Self {
            center,
            width,
            height,
            grid_size,
        })
    }

    pub fn center(&self) -> Point2 {
        self.center
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn grid_size(&self) -> f64 {
        self.grid_size
    }

    /// Number of cells in the grid.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The flat index of the cell containing `point`, or `None` when the
    /// point falls outside the grid.
    pub fn index_of(&self, point: &Point2) -> Option<usize> {
        let col = ((point.x - self.center.x) / self.grid_size
            + (self.width as f64 - 1.0) / 2.0)
            .round();
        let row = ((point.y - self.center.y) / self.grid_size
            + (self.height as f64 - 1.0) / 2.0)
            .round();
        if col < 0.0 || row < 0.0 {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.width || row >= self.height {
            return None;
        }
        Some(row * self.width + col)
    }

    /// The world location of a cell center.
    ///
    /// Index must be within `0..len()`.
    pub fn location(&self, index: usize) -> Point2 {
        let col = (index % self.width) as f64;
        let row = (index / self.width) as f64;
        Point2::new(
            self.center.x + (col - (self.width as f64 - 1.0) / 2.0) * self.grid_size,
            self.center.y + (row - (self.height as f64 - 1.0) / 2.0) * self.grid_size,
        )
    }

    /// Snap a point to the nearest cell-center lattice position.
    ///
    /// Unlike [`index_of`](Self::index_of) this never fails: points beyond
    /// the grid edge snap to the lattice extended past it. A snapped
    /// in-bounds point compares bitwise equal to the corresponding
    /// [`location`](Self::location), so snapped points can be used as exact
    /// set keys.
    pub fn snap(&self, point: &Point2) -> Point2 {
        let half_w = (self.width as f64 - 1.0) / 2.0;
        let half_h = (self.height as f64 - 1.0) / 2.0;
        let col = ((point.x - self.center.x) / self.grid_size + half_w).round();
        let row = ((point.y - self.center.y) / self.grid_size + half_h).round();
        Point2::new(
            self.center.x + (col - half_w) * self.grid_size,
            self.center.y + (row - half_h) * self.grid_size,
        )
    }

    /// Iterate all cell indices.
    pub fn indices(&self) -> impl Iterator<Item = usize> {
        0..self.len()
    }

    /// The 8-connected contour of a cell set: cells adjacent to the set but
    /// not in it. This is the frontier-extraction primitive.
    pub fn contour(&self, set: &HashSet<usize>) -> Vec<usize> {
        let mut result = HashSet::new();
        for &index in set {
            let col = (index % self.width) as isize;
            let row = (index / self.width) as isize;
            for dr in -1..=1isize {
                for dc in -1..=1isize {
                    if dr == 0 && dc == 0 {
                        continue;
                    }
                    let (nc, nr) = (col + dc, row + dr);
                    if nc < 0 || nr < 0 || nc >= self.width as isize || nr >= self.height as isize {
                        continue;
                    }
                    let neighbor = nr as usize * self.width + nc as usize;
                    if !set.contains(&neighbor) {
                        result.insert(neighbor);
                    }
                }
            }
        }
        let mut result: Vec<usize> = result.into_iter().collect();
        result.sort_unstable();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn topology() -> GridTopology {
        GridTopology::new(Point2::ZERO, 11, 11, 0.2).unwrap()
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        assert!(GridTopology::new(Point2::ZERO, 0, 5, 0.2).is_err());
        assert!(GridTopology::new(Point2::ZERO, 5, 5, 0.0).is_err());
    }

    #[test]
    fn test_center_cell() {
        let topo = topology();
        let index = topo.index_of(&Point2::ZERO).unwrap();
        assert_eq!(index, 60);
        let loc = topo.location(index);
        assert_relative_eq!(loc.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(loc.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_index_round_trip() {
        let topo = topology();
        for index in topo.indices() {
            let loc = topo.location(index);
            assert_eq!(topo.index_of(&loc), Some(index));
        }
    }

    #[test]
    fn test_out_of_bounds_is_none() {
        let topo = topology();
        assert_eq!(topo.index_of(&Point2::new(2.0, 0.0)), None);
        assert_eq!(topo.index_of(&Point2::new(0.0, -2.0)), None);
    }

    #[test]
    fn test_snap() {
        let topo = topology();
        let snapped = topo.snap(&Point2::new(0.29, -0.11));
        assert_relative_eq!(snapped.x, 0.2, epsilon = 1e-12);
        assert_relative_eq!(snapped.y, -0.2, epsilon = 1e-12);
        // Snapping is defined even outside the grid
        let snapped = topo.snap(&Point2::new(5.03, 0.0));
        assert_relative_eq!(snapped.x, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_snap_matches_location_on_even_grids() {
        let topo = GridTopology::new(Point2::new(0.3, -0.1), 10, 8, 0.25).unwrap();
        for index in topo.indices() {
            let loc = topo.location(index);
            assert_eq!(topo.snap(&loc), loc);
        }
    }

    #[test]
    fn test_contour() {
        let topo = GridTopology::new(Point2::ZERO, 5, 5, 1.0).unwrap();
        // Single cell at the grid center (index 12)
        let set: HashSet<usize> = [12].into_iter().collect();
        let contour = topo.contour(&set);
        assert_eq!(contour, vec![6, 7, 8, 11, 13, 16, 17, 18]);
    }

    #[test]
    fn test_contour_at_edge_is_clipped() {
        let topo = GridTopology::new(Point2::ZERO, 3, 3, 1.0).unwrap();
        let set: HashSet<usize> = [0].into_iter().collect();
        let contour = topo.contour(&set);
        assert_eq!(contour, vec![1, 3, 4]);
    }
}
