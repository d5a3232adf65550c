//! VoronoiDiagram main structure

use glam::Vec2;
use log::{debug, warn};
use std::collections::HashMap;
use union_find::{QuickUnionUf, UnionBySize, UnionFind};

use crate::cell::VoronoiCell;
use crate::error::{LayoutError, Result};
use crate::generation::{generate_cells, lloyd_relaxation_with_options, CellEdge, LloydOptions};
use crate::geometry::Rect;

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// A line segment between two points
pub type Segment = (Vec2, Vec2);

/// Exact lookup key for a site; folds -0.0 into 0.0
fn site_key(site: Vec2) -> [u32; 2] {
    [(site.x + 0.0).to_bits(), (site.y + 0.0).to_bits()]
}

/// A planar Voronoi diagram over a site set, clipped to a bounding rectangle
///
/// Immutable once built. Every query is read-only and returns the same answer
/// for the same diagram. Relaxation returns a new diagram.
///
/// # Examples
///
/// ```
/// use voronoi_level_layout::*;
///
/// let bounds = Rect::from_size(1000.0, 1000.0);
/// let sites = generation::generate_sites_seeded(150, bounds, "lelele");
/// let diagram = VoronoiDiagram::build(&sites, bounds).unwrap();
/// assert_eq!(diagram.site_count(), 150);
///
/// let relaxed = diagram.relax().unwrap();
/// assert_eq!(relaxed.site_count(), 150);
/// ```
#[derive(Clone)]
pub struct VoronoiDiagram {
    /// Rectangle every cell is clipped to
    bounds: Rect,

    /// Distinct sites, indexed like `cells`
    sites: Vec<Vec2>,

    /// One cell per site
    cells: Vec<VoronoiCell>,

    /// Dual Delaunay edges as `(low, high)` site index pairs
    delaunay_edges: Vec<(usize, usize)>,

    /// Exact coordinate to site index
    site_lookup: HashMap<[u32; 2], usize>,

    /// Nearest-site index for arbitrary positions (requires spatial-index feature)
    #[cfg(feature = "spatial-index")]
    spatial_index: SpatialIndex,
}

impl VoronoiDiagram {
    /// Build a diagram from `sites` inside `bounds`
    ///
    /// Sites outside the bounds are clamped onto them. Exact duplicates are
    /// collapsed onto their first occurrence.
    ///
    /// # Errors
    ///
    /// - `EmptySiteSet` if `sites` is empty
    /// - `InvalidBounds` if the bounds have non-positive extent
    /// - `TriangulationFailed` if a site coordinate is NaN
    pub fn build(sites: &[Vec2], bounds: Rect) -> Result<Self> {
        bounds.validate()?;
        if sites.is_empty() {
            return Err(LayoutError::EmptySiteSet);
        }

        let mut site_lookup: HashMap<[u32; 2], usize> = HashMap::with_capacity(sites.len());
        let mut unique: Vec<Vec2> = Vec::with_capacity(sites.len());
        for &site in sites {
            let site = bounds.clamp(site);
            let key = site_key(site);
            if site_lookup.contains_key(&key) {
                continue;
            }
            site_lookup.insert(key, unique.len());
            unique.push(site);
        }

        if unique.len() < sites.len() {
            warn!(
                "diagram: dropped {} duplicate sites of {}",
                sites.len() - unique.len(),
                sites.len()
            );
        }

        let cell_set = generate_cells(&unique, bounds)?;
        let cells: Vec<VoronoiCell> = cell_set.cells.into_iter().map(VoronoiCell::from).collect();

        debug!("diagram: built {} cells in {:?}", cells.len(), bounds);

        Ok(Self {
            bounds,
            #[cfg(feature = "spatial-index")]
            spatial_index: SpatialIndex::new(&unique),
            sites: unique,
            cells,
            delaunay_edges: cell_set.delaunay_edges,
            site_lookup,
        })
    }

    /// One round of Lloyd's relaxation
    ///
    /// Every site moves to the centroid of its boundary vertices and the
    /// diagram is rebuilt over the same bounds. `self` is untouched.
    pub fn relax(&self) -> Result<Self> {
        let sites: Vec<Vec2> = self
            .cells
            .iter()
            .map(|cell| {
                if cell.vertices.is_empty() {
                    cell.site
                } else {
                    cell.centroid()
                }
            })
            .collect();
        Self::build(&sites, self.bounds)
    }

    /// `iterations` rounds of [`relax`](Self::relax); zero returns a copy
    pub fn relax_n(&self, iterations: usize) -> Result<Self> {
        let mut diagram = self.clone();
        for _ in 0..iterations {
            diagram = diagram.relax()?;
        }
        Ok(diagram)
    }

    /// Relaxation with early exit on convergence
    pub fn relax_with_options(&self, options: LloydOptions) -> Result<Self> {
        let sites = lloyd_relaxation_with_options(self.sites.clone(), self.bounds, options)?;
        Self::build(&sites, self.bounds)
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    #[inline]
    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    /// All sites, indexed like the cells
    #[inline]
    pub fn sites(&self) -> &[Vec2] {
        &self.sites
    }

    #[inline]
    pub fn site(&self, id: usize) -> Option<Vec2> {
        self.sites.get(id).copied()
    }

    #[inline]
    pub fn cells(&self) -> &[VoronoiCell] {
        &self.cells
    }

    /// Returns `None` if the cell ID is out of bounds.
    #[inline]
    pub fn cell(&self, id: usize) -> Option<&VoronoiCell> {
        self.cells.get(id)
    }

    /// Clockwise boundary loop of a cell, empty for an invalid ID
    pub fn boundary(&self, id: usize) -> &[Vec2] {
        self.cells
            .get(id)
            .map(|c| c.vertices.as_slice())
            .unwrap_or(&[])
    }

    /// Boundary edges of a cell, empty for an invalid ID
    pub fn boundary_edges(&self, id: usize) -> &[CellEdge] {
        self.cells
            .get(id)
            .map(|c| c.edges.as_slice())
            .unwrap_or(&[])
    }

    /// Neighbor IDs of a cell, empty for an invalid ID
    pub fn neighbors(&self, id: usize) -> &[usize] {
        self.cells
            .get(id)
            .map(|c| c.neighbors.as_slice())
            .unwrap_or(&[])
    }

    /// Index of the site exactly at `point`
    ///
    /// Sites outside the bounds were clamped on construction, so look them
    /// up by their clamped position.
    pub fn site_index(&self, point: Vec2) -> Option<usize> {
        self.site_lookup.get(&site_key(point)).copied()
    }

    /// Boundary loop of the site exactly at `site`
    pub fn boundary_for_site(&self, site: Vec2) -> Result<&[Vec2]> {
        let id = self.site_index(site).ok_or(LayoutError::SiteNotFound(site))?;
        Ok(self.boundary(id))
    }

    /// Neighboring site coordinates of the site exactly at `site`
    pub fn neighbor_sites_for_site(&self, site: Vec2) -> Result<Vec<Vec2>> {
        let id = self.site_index(site).ok_or(LayoutError::SiteNotFound(site))?;
        Ok(self.neighbors(id).iter().map(|&n| self.sites[n]).collect())
    }

    /// Index of the cell containing `position` (its nearest site)
    #[cfg(feature = "spatial-index")]
    pub fn find_site_at(&self, position: Vec2) -> usize {
        self.spatial_index.find_nearest(position)
    }

    /// Index of the cell containing `position` (its nearest site)
    #[cfg(not(feature = "spatial-index"))]
    pub fn find_site_at(&self, position: Vec2) -> usize {
        let mut best = 0;
        let mut best_distance = f32::MAX;
        for (idx, site) in self.sites.iter().enumerate() {
            let distance = site.distance_squared(position);
            if distance < best_distance {
                best = idx;
                best_distance = distance;
            }
        }
        best
    }

    /// Every edge shared by two cells, listed once
    pub fn voronoi_edges(&self) -> Vec<Segment> {
        self.cells
            .iter()
            .flat_map(|cell| {
                cell.edges
                    .iter()
                    .filter(move |e| matches!(e.neighbor, Some(n) if n > cell.id))
                    .map(|e| (e.start, e.end))
            })
            .collect()
    }

    /// Delaunay edges as `(low, high)` site index pairs
    #[inline]
    pub fn delaunay_edge_indices(&self) -> &[(usize, usize)] {
        &self.delaunay_edges
    }

    /// Delaunay edges as site-to-site segments
    pub fn delaunay_edges(&self) -> Vec<Segment> {
        self.delaunay_edges
            .iter()
            .map(|&(a, b)| (self.sites[a], self.sites[b]))
            .collect()
    }

    /// Euclidean minimum spanning tree over the sites
    ///
    /// Kruskal over the Delaunay edges, which always contain the EMST.
    pub fn spanning_tree(&self) -> Vec<Segment> {
        let mut edges: Vec<(f32, usize, usize)> = self
            .delaunay_edges
            .iter()
            .map(|&(a, b)| (self.sites[a].distance(self.sites[b]), a, b))
            .collect();
        edges.sort_by(|x, y| x.0.partial_cmp(&y.0).unwrap_or(std::cmp::Ordering::Equal));

        let mut forest = QuickUnionUf::<UnionBySize>::new(self.sites.len());
        let mut tree = Vec::with_capacity(self.sites.len().saturating_sub(1));
        for (_, a, b) in edges {
            if forest.union(a, b) {
                tree.push((self.sites[a], self.sites[b]));
            }
        }
        tree
    }

    /// Sites within `radius` of `center`, ascending by index
    pub fn sites_in_radius(&self, center: Vec2, radius: f32) -> Vec<usize> {
        let radius_sq = radius * radius;
        (0..self.sites.len())
            .filter(|&i| self.sites[i].distance_squared(center) <= radius_sq)
            .collect()
    }

    /// Sites inside the square of half-width `half_width` around `center`
    pub fn sites_in_square(&self, center: Vec2, half_width: f32) -> Vec<usize> {
        (0..self.sites.len())
            .filter(|&i| {
                let d = (self.sites[i] - center).abs();
                d.x <= half_width && d.y <= half_width
            })
            .collect()
    }
}

impl std::fmt::Debug for VoronoiDiagram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoronoiDiagram")
            .field("bounds", &self.bounds)
            .field("sites", &self.sites.len())
            .field("delaunay_edges", &self.delaunay_edges.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::generate_sites_seeded;

    fn lelele_diagram() -> VoronoiDiagram {
        let bounds = Rect::from_size(1000.0, 1000.0);
        let sites = generate_sites_seeded(150, bounds, "lelele");
        VoronoiDiagram::build(&sites, bounds).unwrap()
    }

    #[test]
    fn test_lelele_site_count() {
        let diagram = lelele_diagram();
        assert_eq!(diagram.site_count(), 150);
        assert_eq!(diagram.cells().len(), 150);
    }

    #[test]
    fn test_build_errors() {
        let bounds = Rect::from_size(10.0, 10.0);
        assert!(matches!(
            VoronoiDiagram::build(&[], bounds),
            Err(LayoutError::EmptySiteSet)
        ));
        assert!(matches!(
            VoronoiDiagram::build(&[Vec2::ONE], Rect::from_size(0.0, 10.0)),
            Err(LayoutError::InvalidBounds(_))
        ));
    }

    #[test]
    fn test_duplicates_collapse() {
        let bounds = Rect::from_size(10.0, 10.0);
        let sites = vec![Vec2::new(1.0, 1.0), Vec2::new(5.0, 5.0), Vec2::new(1.0, 1.0)];
        let diagram = VoronoiDiagram::build(&sites, bounds).unwrap();
        assert_eq!(diagram.site_count(), 2);
    }

    #[test]
    fn test_sites_outside_bounds_are_clamped() {
        let bounds = Rect::from_size(10.0, 10.0);
        let diagram = VoronoiDiagram::build(&[Vec2::new(-5.0, 3.0), Vec2::new(5.0, 5.0)], bounds).unwrap();
        assert_eq!(diagram.site(0), Some(Vec2::new(0.0, 3.0)));
        assert_eq!(diagram.site_index(Vec2::new(0.0, 3.0)), Some(0));
    }

    #[test]
    fn test_relax_preserves_cardinality() {
        let diagram = lelele_diagram();
        for k in 0..3 {
            let relaxed = diagram.relax_n(k).unwrap();
            assert_eq!(relaxed.site_count(), diagram.site_count());
            assert_eq!(relaxed.bounds(), diagram.bounds());
        }
    }

    #[test]
    fn test_relax_zero_is_identity() {
        let diagram = lelele_diagram();
        let same = diagram.relax_n(0).unwrap();
        assert_eq!(same.sites(), diagram.sites());
    }

    #[test]
    fn test_relax_does_not_mutate_input() {
        let diagram = lelele_diagram();
        let before = diagram.sites().to_vec();
        let relaxed = diagram.relax().unwrap();
        assert_eq!(diagram.sites(), before.as_slice());
        assert_ne!(relaxed.sites(), before.as_slice());
    }

    #[test]
    fn test_relax_is_deterministic() {
        let a = lelele_diagram().relax_n(2).unwrap();
        let b = lelele_diagram().relax_n(2).unwrap();
        assert_eq!(a.sites(), b.sites());
    }

    #[test]
    fn test_relax_with_options_keeps_count() {
        let diagram = lelele_diagram();
        let relaxed = diagram
            .relax_with_options(LloydOptions {
                max_iterations: 4,
                convergence_threshold: 0.001,
            })
            .unwrap();
        assert_eq!(relaxed.site_count(), 150);
    }

    #[test]
    fn test_queries_are_stable() {
        let diagram = lelele_diagram();
        let site = diagram.site(17).unwrap();
        let first = diagram.boundary_for_site(site).unwrap().to_vec();
        let second = diagram.boundary_for_site(site).unwrap().to_vec();
        assert_eq!(first, second);
        assert_eq!(
            diagram.neighbor_sites_for_site(site).unwrap(),
            diagram.neighbor_sites_for_site(site).unwrap()
        );
    }

    #[test]
    fn test_unknown_site() {
        let diagram = lelele_diagram();
        let missing = Vec2::new(-1.0, -1.0);
        assert!(matches!(
            diagram.boundary_for_site(missing),
            Err(LayoutError::SiteNotFound(_))
        ));
        assert!(diagram.boundary(9999).is_empty());
        assert!(diagram.neighbors(9999).is_empty());
    }

    #[test]
    fn test_find_site_at() {
        let diagram = lelele_diagram();
        for id in [0, 42, 149] {
            let site = diagram.site(id).unwrap();
            assert_eq!(diagram.find_site_at(site), id);
        }
    }

    #[test]
    fn test_spanning_tree_spans() {
        let diagram = lelele_diagram();
        let tree = diagram.spanning_tree();
        assert_eq!(tree.len(), diagram.site_count() - 1);
        assert!(tree.len() <= diagram.delaunay_edges().len());
    }

    #[test]
    fn test_voronoi_edges_are_interior() {
        let diagram = lelele_diagram();
        let edges = diagram.voronoi_edges();
        assert!(!edges.is_empty());
        for (start, end) in edges {
            assert!(start.distance(end) > 0.0);
        }
    }

    #[test]
    fn test_sites_in_radius_and_square() {
        let bounds = Rect::from_size(100.0, 100.0);
        let sites = vec![
            Vec2::new(10.0, 10.0),
            Vec2::new(12.0, 10.0),
            Vec2::new(50.0, 50.0),
            Vec2::new(14.0, 14.0),
        ];
        let diagram = VoronoiDiagram::build(&sites, bounds).unwrap();

        assert_eq!(diagram.sites_in_radius(Vec2::new(10.0, 10.0), 3.0), vec![0, 1]);
        assert_eq!(diagram.sites_in_square(Vec2::new(10.0, 10.0), 4.0), vec![0, 1, 3]);
    }
}
