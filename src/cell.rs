//! Board Cell Structure
//!
//! Represents one numbered piece of the board: its outline, its centroid and
//! the label the player has to click it by.

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::generation::RegionKind;
use crate::geometry::{polygon_area, signed_area};

/// A single cell of the board
///
/// Cells are produced once, at the end of generation, and never change
/// afterwards. A board of `N` pieces holds exactly `N` cells whose labels are
/// a permutation of `1..=N`.
///
/// # Design Notes
///
/// Like the configuration, cells are cheap to regenerate: a stored seed and
/// piece count reproduce the exact same cells, so save files only need the
/// configuration.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// Convex outline, clipped to the cell's region, without a closing vertex
    pub polygon: Vec<DVec2>,

    /// Area centroid of the outline, where the label is drawn
    pub centroid: DVec2,

    /// Display label in `1..=N`
    pub label: usize,

    /// Region the cell was generated in
    pub region: RegionKind,
}

impl Cell {
    /// Create a new cell
    ///
    /// This is typically called during board generation, not by user code.
    pub fn new(polygon: Vec<DVec2>, centroid: DVec2, label: usize, region: RegionKind) -> Self {
        Self {
            polygon,
            centroid,
            label,
            region,
        }
    }

    /// Get the vertex count (polygon complexity)
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.polygon.len()
    }

    /// Area of the cell outline
    pub fn area(&self) -> f64 {
        polygon_area(&self.polygon)
    }

    /// Check whether a point lies inside (or on the edge of) the cell
    ///
    /// Works for either winding order since cells are convex.
    pub fn contains(&self, point: DVec2) -> bool {
        let n = self.polygon.len();
        if n < 3 {
            return false;
        }
        let orientation = signed_area(&self.polygon).signum();
        let tolerance = 1e-9 * (1.0 + self.area());
        (0..n).all(|i| {
            let a = self.polygon[i];
            let b = self.polygon[(i + 1) % n];
            (b - a).perp_dot(point - a) * orientation >= -tolerance
        })
    }
}
