//! Spatial indexing for fast point-to-cell lookups
//!
//! This module is only available with the `spatial-index` feature.

#[cfg(feature = "spatial-index")]
use glam::DVec2;
#[cfg(feature = "spatial-index")]
use kiddo::immutable::float::kdtree::ImmutableKdTree;
#[cfg(feature = "spatial-index")]
use kiddo::SquaredEuclidean;

/// Wrapper around a 2D KD-tree of cell centroids
///
/// Turns a click position into a candidate cell index in O(log n). The
/// nearest centroid is usually, but not always, the cell under the point;
/// [`crate::Board::find_cell_at`] verifies the candidate.
#[cfg(feature = "spatial-index")]
#[derive(Clone)]
pub struct SpatialIndex {
    tree: ImmutableKdTree<f64, usize, 2, 32>,
}

#[cfg(feature = "spatial-index")]
impl SpatialIndex {
    /// Build spatial index from cell centroids
    ///
    /// # Example
    ///
    /// ```
    /// use numbered_tiles::*;
    /// use glam::DVec2;
    ///
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// let centers = vec![DVec2::new(10.0, 10.0), DVec2::new(90.0, 10.0)];
    /// let index = SpatialIndex::new(&centers);
    /// assert_eq!(index.find_nearest(DVec2::new(80.0, 20.0)), 1);
    /// # }
    /// ```
    pub fn new(centers: &[DVec2]) -> Self {
        let points: Vec<[f64; 2]> = centers.iter().map(|c| [c.x, c.y]).collect();

        Self {
            tree: ImmutableKdTree::new_from_slice(&points),
        }
    }

    /// Index of the centroid nearest to `position`
    pub fn find_nearest(&self, position: DVec2) -> usize {
        let query = [position.x, position.y];
        let result = self.tree.nearest_one::<SquaredEuclidean>(&query);
        result.item as usize
    }
}

#[cfg(test)]
#[cfg(feature = "spatial-index")]
mod tests {
    use super::*;

    #[test]
    fn test_spatial_index_basic() {
        let centers = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(10.0, 0.0),
            DVec2::new(0.0, 10.0),
            DVec2::new(10.0, 10.0),
        ];

        let index = SpatialIndex::new(&centers);

        assert_eq!(index.find_nearest(DVec2::new(1.0, 2.0)), 0);
        assert_eq!(index.find_nearest(DVec2::new(9.0, 1.0)), 1);
        assert_eq!(index.find_nearest(DVec2::new(2.0, 8.0)), 2);
        assert_eq!(index.find_nearest(DVec2::new(7.0, 7.0)), 3);
    }

    #[test]
    fn test_spatial_index_exact_match() {
        let centers = vec![DVec2::new(250.0, 500.0), DVec2::new(750.0, 500.0)];

        let index = SpatialIndex::new(&centers);

        assert_eq!(index.find_nearest(centers[0]), 0);
        assert_eq!(index.find_nearest(centers[1]), 1);
    }
}
