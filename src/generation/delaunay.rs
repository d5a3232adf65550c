//! Delaunay triangulation of planar sites
//!
//! Thin wrapper around spade's incremental Delaunay triangulation. The result
//! is expressed in site indices so the rest of the crate never touches spade
//! handles.

use glam::Vec2;
use spade::handles::FixedVertexHandle;
use spade::{DelaunayTriangulation, Point2, Triangulation};
use std::collections::HashMap;

use crate::error::{LayoutError, Result};

/// Result of Delaunay triangulation, indexed like the input sites
#[derive(Debug, Clone)]
pub struct DelaunayResult {
    /// Delaunay neighbors of every site, ascending
    pub neighbors: Vec<Vec<usize>>,
    /// Undirected Delaunay edges as `(low, high)` index pairs, sorted
    pub edges: Vec<(usize, usize)>,
}

/// Triangulate `sites`
///
/// Sites must be pairwise distinct; duplicates would collapse onto one spade
/// vertex and leave an index without neighbors.
///
/// # Errors
///
/// Returns `TriangulationFailed` if spade rejects a coordinate (NaN or out of range).
pub fn compute_delaunay(sites: &[Vec2]) -> Result<DelaunayResult> {
    let mut triangulation: DelaunayTriangulation<Point2<f64>> = DelaunayTriangulation::new();
    let mut index_of: HashMap<FixedVertexHandle, usize> = HashMap::with_capacity(sites.len());

    for (idx, site) in sites.iter().enumerate() {
        let handle = triangulation
            .insert(Point2::new(site.x as f64, site.y as f64))
            .map_err(|e| LayoutError::TriangulationFailed(format!("site {} at {}: {:?}", idx, site, e)))?;
        index_of.insert(handle, idx);
    }

    let mut neighbors = vec![Vec::new(); sites.len()];
    for vertex in triangulation.vertices() {
        let idx = index_of[&vertex.fix()];
        let mut list: Vec<usize> = vertex
            .out_edges()
            .map(|edge| index_of[&edge.to().fix()])
            .collect();
        list.sort_unstable();
        list.dedup();
        neighbors[idx] = list;
    }

    let mut edges: Vec<(usize, usize)> = triangulation
        .undirected_edges()
        .map(|edge| {
            let [a, b] = edge.vertices();
            let (a, b) = (index_of[&a.fix()], index_of[&b.fix()]);
            (a.min(b), a.max(b))
        })
        .collect();
    edges.sort_unstable();

    Ok(DelaunayResult { neighbors, edges })
}
