//! Voronoi cell construction from Delaunay neighbors
//!
//! Each cell starts as the bounding rectangle and is clipped by the
//! perpendicular-bisector half-plane of every Delaunay neighbor. The clipping
//! remembers which neighbor produced each boundary edge, which gives both the
//! per-cell edge list and the true (in-bounds) neighbor relation.

use glam::{DVec2, Vec2};

use crate::error::Result;
use crate::geometry::Rect;
use super::delaunay::compute_delaunay;

/// Edges shorter than this fraction of the bounds diagonal are dropped
const DEGENERATE_EDGE_FRACTION: f64 = 1e-6;

/// One boundary edge of a cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellEdge {
    pub start: Vec2,
    pub end: Vec2,
    /// Site on the other side, `None` for edges on the bounding rectangle
    pub neighbor: Option<usize>,
}

impl CellEdge {
    #[inline]
    pub fn length(&self) -> f32 {
        (self.end - self.start).length()
    }
}

/// A Voronoi cell before it is wrapped for public queries
#[derive(Debug, Clone)]
pub struct RawCell {
    /// Index of the site in the diagram's site list
    pub id: usize,
    /// The seeding site
    pub site: Vec2,
    /// Sites whose cells share an edge with this one, ascending
    pub neighbors: Vec<usize>,
    /// Boundary vertices, clockwise, no duplicates
    pub vertices: Vec<Vec2>,
    /// Boundary edges in the same clockwise order as `vertices`
    pub edges: Vec<CellEdge>,
}

/// Output of cell construction
#[derive(Debug, Clone)]
pub struct CellSet {
    pub cells: Vec<RawCell>,
    /// Delaunay edges as `(low, high)` site index pairs
    pub delaunay_edges: Vec<(usize, usize)>,
}

/// Build the Voronoi cells of pairwise distinct `sites` clipped to `bounds`
///
/// Sites are expected inside `bounds`; the caller clamps them.
pub fn generate_cells(sites: &[Vec2], bounds: Rect) -> Result<CellSet> {
    let delaunay = compute_delaunay(sites)?;
    let epsilon = (bounds.diagonal() as f64 * DEGENERATE_EDGE_FRACTION).max(1e-9);

    let mut cells: Vec<RawCell> = sites
        .iter()
        .enumerate()
        .map(|(idx, &site)| build_cell(idx, site, &delaunay.neighbors[idx], sites, bounds, epsilon))
        .collect();

    symmetrize_neighbors(&mut cells);

    Ok(CellSet {
        cells,
        delaunay_edges: delaunay.edges,
    })
}

/// Clip the bounds down to the cell of `sites[idx]`
fn build_cell(
    idx: usize,
    site: Vec2,
    candidates: &[usize],
    sites: &[Vec2],
    bounds: Rect,
    epsilon: f64,
) -> RawCell {
    // Vertex i carries the source of the edge i -> i+1
    let mut polygon: Vec<(DVec2, Option<usize>)> = bounds
        .corners()
        .iter()
        .map(|c| (c.as_dvec2(), None))
        .collect();

    let origin = site.as_dvec2();
    for &other in candidates {
        polygon = clip_by_bisector(&polygon, origin, sites[other].as_dvec2(), other);
        if polygon.is_empty() {
            break;
        }
    }

    let polygon = remove_degenerate_edges(polygon, epsilon);

    let vertices: Vec<Vec2> = polygon.iter().map(|(v, _)| v.as_vec2()).collect();
    let edges: Vec<CellEdge> = (0..polygon.len())
        .map(|i| {
            let (start, neighbor) = polygon[i];
            let (end, _) = polygon[(i + 1) % polygon.len()];
            CellEdge {
                start: start.as_vec2(),
                end: end.as_vec2(),
                neighbor,
            }
        })
        .collect();

    let mut neighbors: Vec<usize> = edges.iter().filter_map(|e| e.neighbor).collect();
    neighbors.sort_unstable();
    neighbors.dedup();

    RawCell {
        id: idx,
        site,
        neighbors,
        vertices,
        edges,
    }
}

/// Sutherland-Hodgman step against the half-plane closer to `origin` than to `other`
fn clip_by_bisector(
    polygon: &[(DVec2, Option<usize>)],
    origin: DVec2,
    other: DVec2,
    other_idx: usize,
) -> Vec<(DVec2, Option<usize>)> {
    let direction = other - origin;
    let midpoint = (origin + other) * 0.5;
    let side = |p: DVec2| (p - midpoint).dot(direction);

    let mut clipped = Vec::with_capacity(polygon.len() + 1);
    for i in 0..polygon.len() {
        let (current, tag) = polygon[i];
        let (next, _) = polygon[(i + 1) % polygon.len()];
        let d_current = side(current);
        let d_next = side(next);

        match (d_current <= 0.0, d_next <= 0.0) {
            (true, true) => clipped.push((current, tag)),
            (true, false) => {
                clipped.push((current, tag));
                let t = d_current / (d_current - d_next);
                // The clip line runs from the exit point to the next entry point
                clipped.push((current + (next - current) * t, Some(other_idx)));
            }
            (false, true) => {
                let t = d_current / (d_current - d_next);
                clipped.push((current + (next - current) * t, tag));
            }
            (false, false) => {}
        }
    }
    clipped
}

/// Collapse vertices closer than `epsilon`, keeping the tag of the surviving edge
fn remove_degenerate_edges(
    polygon: Vec<(DVec2, Option<usize>)>,
    epsilon: f64,
) -> Vec<(DVec2, Option<usize>)> {
    let mut result: Vec<(DVec2, Option<usize>)> = Vec::with_capacity(polygon.len());
    for (vertex, tag) in polygon {
        match result.last_mut() {
            Some(last) if last.0.distance(vertex) <= epsilon => last.1 = tag,
            _ => result.push((vertex, tag)),
        }
    }

    while result.len() > 1 {
        let first = result[0].0;
        let last = result[result.len() - 1].0;
        if first.distance(last) <= epsilon {
            result.pop();
        } else {
            break;
        }
    }

    result
}

/// Floating point can leave an edge on one side of a pair only
fn symmetrize_neighbors(cells: &mut [RawCell]) {
    let pairs: Vec<(usize, usize)> = cells
        .iter()
        .flat_map(|cell| cell.neighbors.iter().map(move |&n| (n, cell.id)))
        .collect();

    for (cell, neighbor) in pairs {
        if !cells[cell].neighbors.contains(&neighbor) {
            cells[cell].neighbors.push(neighbor);
            cells[cell].neighbors.sort_unstable();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::points::generate_sites_seeded;
    use crate::geometry::signed_area;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_generate_cells() {
        let bounds = Rect::from_size(1000.0, 1000.0);
        let sites = generate_sites_seeded(100, bounds, "cells");
        let set = generate_cells(&sites, bounds).unwrap();

        assert_eq!(set.cells.len(), 100);

        for cell in &set.cells {
            assert!(cell.vertices.len() >= 3, "Cell should have at least 3 vertices");
            assert!(!cell.neighbors.is_empty(), "Cell should have neighbors");
            assert!(signed_area(&cell.vertices) < 0.0, "Cell should be clockwise");
            for vertex in &cell.vertices {
                assert!(vertex.x >= -0.01 && vertex.x <= 1000.01);
                assert!(vertex.y >= -0.01 && vertex.y <= 1000.01);
            }
        }
    }

    #[test]
    fn test_cells_tile_the_bounds() {
        let bounds = Rect::from_size(200.0, 100.0);
        let sites = generate_sites_seeded(40, bounds, "tiling");
        let set = generate_cells(&sites, bounds).unwrap();

        let total: f32 = set.cells.iter().map(|c| -signed_area(&c.vertices)).sum();
        assert_approx_eq!(total, 20_000.0, 1.0);
    }

    #[test]
    fn test_two_sites_split_in_half() {
        let bounds = Rect::from_size(10.0, 10.0);
        let sites = vec![Vec2::new(2.5, 5.0), Vec2::new(7.5, 5.0)];
        let set = generate_cells(&sites, bounds).unwrap();

        assert_approx_eq!(-signed_area(&set.cells[0].vertices), 50.0, 1e-3);
        assert_eq!(set.cells[0].neighbors, vec![1]);
        assert_eq!(set.cells[1].neighbors, vec![0]);

        let shared: Vec<&CellEdge> = set.cells[0]
            .edges
            .iter()
            .filter(|e| e.neighbor == Some(1))
            .collect();
        assert_eq!(shared.len(), 1);
        assert_approx_eq!(shared[0].length(), 10.0, 1e-4);
        assert_approx_eq!(shared[0].start.x, 5.0, 1e-4);
    }

    #[test]
    fn test_single_site_owns_bounds() {
        let bounds = Rect::from_size(10.0, 20.0);
        let set = generate_cells(&[Vec2::new(3.0, 3.0)], bounds).unwrap();
        assert_eq!(set.cells[0].vertices.len(), 4);
        assert!(set.cells[0].neighbors.is_empty());
        assert!(set.cells[0].edges.iter().all(|e| e.neighbor.is_none()));
    }

    #[test]
    fn test_neighbor_symmetry() {
        let bounds = Rect::from_size(500.0, 500.0);
        let sites = generate_sites_seeded(60, bounds, "symmetry");
        let set = generate_cells(&sites, bounds).unwrap();

        for cell in &set.cells {
            for &neighbor_id in &cell.neighbors {
                assert!(
                    set.cells[neighbor_id].neighbors.contains(&cell.id),
                    "Neighbor relationship should be symmetric"
                );
            }
        }
    }

    #[test]
    fn test_edges_follow_vertices() {
        let bounds = Rect::from_size(100.0, 100.0);
        let sites = generate_sites_seeded(12, bounds, "edges");
        let set = generate_cells(&sites, bounds).unwrap();

        for cell in &set.cells {
            assert_eq!(cell.edges.len(), cell.vertices.len());
            for (i, edge) in cell.edges.iter().enumerate() {
                assert_eq!(edge.start, cell.vertices[i]);
                assert_eq!(edge.end, cell.vertices[(i + 1) % cell.vertices.len()]);
            }
        }
    }
}
