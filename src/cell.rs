//! Voronoi Cell Structure
//!
//! Represents an individual cell of a planar Voronoi diagram with its
//! neighbors and boundary geometry.

use glam::Vec2;

use crate::generation::{CellEdge, RawCell};
use crate::geometry::{signed_area, vertex_centroid};

/// A single cell of a [`VoronoiDiagram`](crate::VoronoiDiagram)
///
/// Each cell carries:
/// - the index of its site in the diagram, stable for an unmodified diagram
/// - the site itself
/// - the sites whose cells share an edge with it
/// - its boundary, as clockwise vertices and matching edges
#[derive(Debug, Clone, PartialEq)]
pub struct VoronoiCell {
    /// Index of this cell's site (0 to site_count-1)
    pub id: usize,

    /// The site that seeds this cell
    pub site: Vec2,

    /// Indices of adjacent cells, ascending
    ///
    /// Cells are neighbors if they share an edge of positive length inside
    /// the diagram bounds. Delaunay neighbors whose shared edge falls outside
    /// the bounds are not listed.
    pub neighbors: Vec<usize>,

    /// Boundary vertices, clockwise
    pub vertices: Vec<Vec2>,

    /// Boundary edges, `edges[i]` runs from `vertices[i]` to `vertices[i + 1]`
    pub edges: Vec<CellEdge>,
}

impl VoronoiCell {
    /// Create a new Voronoi cell
    ///
    /// This is typically called during diagram construction, not by user code.
    pub fn new(id: usize, site: Vec2, neighbors: Vec<usize>, vertices: Vec<Vec2>, edges: Vec<CellEdge>) -> Self {
        Self {
            id,
            site,
            neighbors,
            vertices,
            edges,
        }
    }

    #[inline]
    pub fn neighbor_count(&self) -> usize {
        self.neighbors.len()
    }

    #[inline]
    pub fn is_neighbor_of(&self, other_cell_id: usize) -> bool {
        self.neighbors.contains(&other_cell_id)
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Area enclosed by the boundary
    pub fn area(&self) -> f32 {
        signed_area(&self.vertices).abs()
    }

    /// Average of the boundary vertices; where Lloyd's relaxation moves the site
    pub fn centroid(&self) -> Vec2 {
        vertex_centroid(&self.vertices)
    }

    /// True if any edge lies on the diagram bounds
    pub fn touches_bounds(&self) -> bool {
        self.edges.iter().any(|e| e.neighbor.is_none())
    }

    /// Euclidean distance between the two sites
    #[inline]
    pub fn distance_to(&self, other: &VoronoiCell) -> f32 {
        self.site.distance(other.site)
    }
}

impl From<RawCell> for VoronoiCell {
    fn from(raw: RawCell) -> Self {
        VoronoiCell::new(raw.id, raw.site, raw.neighbors, raw.vertices, raw.edges)
    }
}
