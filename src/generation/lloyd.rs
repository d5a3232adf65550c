//! Lloyd's Relaxation for uniform site distribution
//!
//! Lloyd's Relaxation iteratively evens out the site distribution by moving
//! each site to the centroid of its Voronoi cell and rebuilding the cells.

use glam::Vec2;
use log::{debug, info};
use std::time::Instant;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geometry::{vertex_centroid, Rect};
use super::voronoi::{generate_cells, RawCell};

/// Options for Lloyd's relaxation algorithm
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LloydOptions {
    /// Maximum number of iterations to run
    pub max_iterations: usize,
    /// Stop when max displacement < this fraction of the bounds diagonal.
    /// Set to 0.0 to disable early termination.
    pub convergence_threshold: f32,
}

impl Default for LloydOptions {
    fn default() -> Self {
        Self {
            max_iterations: 5,
            convergence_threshold: 0.0,
        }
    }
}

/// Apply `iterations` rounds of Lloyd's Relaxation to `sites`
///
/// Every round runs; use [`lloyd_relaxation_with_options`] for early exit.
pub fn lloyd_relaxation(sites: Vec<Vec2>, bounds: Rect, iterations: usize) -> Result<Vec<Vec2>> {
    let options = LloydOptions {
        max_iterations: iterations,
        convergence_threshold: 0.0,
    };
    lloyd_relaxation_with_options(sites, bounds, options)
}

/// Apply Lloyd's Relaxation with custom options
///
/// Sites are expected pairwise distinct and inside `bounds`. The number of
/// sites never changes.
pub fn lloyd_relaxation_with_options(
    mut sites: Vec<Vec2>,
    bounds: Rect,
    options: LloydOptions,
) -> Result<Vec<Vec2>> {
    let convergence_threshold = options.convergence_threshold * bounds.diagonal();
    let total_start = Instant::now();

    debug!(
        "lloyd: {} sites, max {} iterations, threshold {:.4} (abs {:.4})",
        sites.len(),
        options.max_iterations,
        options.convergence_threshold,
        convergence_threshold
    );

    let mut iterations_run = 0;
    let mut converged = false;

    for iteration in 0..options.max_iterations {
        let iter_start = Instant::now();

        let cells = generate_cells(&sites, bounds)?.cells;
        let (new_sites, max_displacement) = centroid_sites(&cells);

        sites = new_sites;
        iterations_run = iteration + 1;

        debug!(
            "lloyd: iteration {} took {:?}, max displacement {:.4}",
            iteration + 1,
            iter_start.elapsed(),
            max_displacement
        );

        if convergence_threshold > 0.0 && max_displacement < convergence_threshold {
            converged = true;
            info!(
                "lloyd: converged at iteration {} (max displacement {:.4} < {:.4})",
                iteration + 1,
                max_displacement,
                convergence_threshold
            );
            break;
        }
    }

    debug!(
        "lloyd: finished {} of {} iterations, converged={}, total {:?}",
        iterations_run,
        options.max_iterations,
        converged,
        total_start.elapsed()
    );

    Ok(sites)
}

/// Move each site to the vertex centroid of its cell, tracking the largest move
fn centroid_sites(cells: &[RawCell]) -> (Vec<Vec2>, f32) {
    let mut max_displacement: f32 = 0.0;

    let sites = cells
        .iter()
        .map(|cell| {
            // A cell clipped away entirely keeps its site
            let centroid = if cell.vertices.is_empty() {
                cell.site
            } else {
                vertex_centroid(&cell.vertices)
            };
            max_displacement = max_displacement.max(centroid.distance(cell.site));
            centroid
        })
        .collect();

    (sites, max_displacement)
}
