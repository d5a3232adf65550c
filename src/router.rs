//! Greedy corridor routing over cell adjacency
//!
//! From the start cell the router repeatedly steps to the neighbor closest to
//! the target until it reaches a cell that borders the target. It never
//! revisits a cell and gives up after a fixed number of steps, so a dead end
//! ends in an error rather than a loop.

use glam::Vec2;

use crate::diagram::VoronoiDiagram;
use crate::error::{LayoutError, Result};
use crate::geometry::{clean_loop, Polygon};

/// Intermediate cells between `start` and `target`, excluding both
///
/// Empty when the two cells are the same or already neighbors.
///
/// # Errors
///
/// `PathUnreachable` when every unvisited neighbor is exhausted or the path
/// would exceed `max_steps` cells.
pub fn route_cells(diagram: &VoronoiDiagram, start: usize, target: usize, max_steps: usize) -> Result<Vec<usize>> {
    let site = |id: usize| {
        diagram
            .site(id)
            .ok_or_else(|| LayoutError::InvalidConfig(format!("cell {} is not in the diagram", id)))
    };
    let start_site = site(start)?;
    let target_site = site(target)?;

    let unreachable = |steps: usize| LayoutError::PathUnreachable {
        start: start_site,
        target: target_site,
        steps,
    };
    greedy_walk(|cell| diagram.neighbors(cell), diagram.sites(), start, target, max_steps).map_err(unreachable)
}

/// Greedy walk over an arbitrary adjacency; `Err` carries the steps taken
/// before the walk was cornered or ran out of steps
fn greedy_walk<'n>(
    neighbors: impl Fn(usize) -> &'n [usize],
    positions: &[Vec2],
    start: usize,
    target: usize,
    max_steps: usize,
) -> std::result::Result<Vec<usize>, usize> {
    if start == target {
        return Ok(Vec::new());
    }

    let target_site = positions[target];
    let mut path: Vec<usize> = Vec::new();
    let mut current = start;

    loop {
        let candidates = neighbors(current);
        if candidates.contains(&target) {
            return Ok(path);
        }
        if path.len() >= max_steps {
            return Err(path.len());
        }

        let next = candidates
            .iter()
            .copied()
            .filter(|&n| n != start && !path.contains(&n))
            .min_by(|&a, &b| {
                let da = positions[a].distance_squared(target_site);
                let db = positions[b].distance_squared(target_site);
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
            .ok_or(path.len())?;

        path.push(next);
        current = next;
    }
}

/// Intermediate site positions between two sites of `diagram`
///
/// `max_steps` caps the path length; `diagram.site_count()` is always enough
/// for a path that exists.
///
/// # Errors
///
/// - `SiteNotFound` if `start` or `target` is not a site of the diagram
/// - `PathUnreachable` if the greedy walk dead-ends or runs out of steps
pub fn route(diagram: &VoronoiDiagram, start: Vec2, target: Vec2, max_steps: usize) -> Result<Vec<Vec2>> {
    let start_id = diagram.site_index(start).ok_or(LayoutError::SiteNotFound(start))?;
    let target_id = diagram.site_index(target).ok_or(LayoutError::SiteNotFound(target))?;

    Ok(route_cells(diagram, start_id, target_id, max_steps)?
        .into_iter()
        .map(|cell| diagram.sites()[cell])
        .collect())
}

/// Route like [`route`] and return one clockwise polygon per intermediate cell
pub fn route_polygons(diagram: &VoronoiDiagram, start: Vec2, target: Vec2, max_steps: usize) -> Result<Vec<Polygon>> {
    let sites = route(diagram, start, target, max_steps)?;
    sites
        .into_iter()
        .map(|site| diagram.boundary_for_site(site).map(clean_loop))
        .collect()
}
