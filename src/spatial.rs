//! Spatial indexing for fast position-to-site lookups
//!
//! This module is only available with the `spatial-index` feature.

#[cfg(feature = "spatial-index")]
use kiddo::immutable::float::kdtree::ImmutableKdTree;
#[cfg(feature = "spatial-index")]
use kiddo::SquaredEuclidean;
#[cfg(feature = "spatial-index")]
use glam::Vec2;

/// Wrapper around a 2D KD-tree over diagram sites
///
/// Provides O(log n) nearest-site lookups, i.e. "which cell contains this
/// point", since a point lies in the cell of its nearest site.
#[cfg(feature = "spatial-index")]
#[derive(Clone)]
pub struct SpatialIndex {
    tree: ImmutableKdTree<f32, usize, 2, 32>,
}

#[cfg(feature = "spatial-index")]
impl SpatialIndex {
    /// Build spatial index from site positions
    ///
    /// # Example
    ///
    /// ```
    /// use voronoi_level_layout::*;
    /// use glam::Vec2;
    ///
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// let sites = vec![
    ///     Vec2::new(0.0, 0.0),
    ///     Vec2::new(10.0, 0.0),
    ///     Vec2::new(0.0, 10.0),
    /// ];
    ///
    /// let index = SpatialIndex::new(&sites);
    /// assert_eq!(index.find_nearest(Vec2::new(9.0, 1.0)), 1);
    /// # }
    /// ```
    pub fn new(sites: &[Vec2]) -> Self {
        let points: Vec<[f32; 2]> = sites.iter().map(|s| [s.x, s.y]).collect();

        Self {
            tree: ImmutableKdTree::new_from_slice(&points),
        }
    }

    /// Index of the site nearest to `position`
    pub fn find_nearest(&self, position: Vec2) -> usize {
        let query = [position.x, position.y];
        let result = self.tree.nearest_one::<SquaredEuclidean>(&query);
        result.item as usize
    }
}
