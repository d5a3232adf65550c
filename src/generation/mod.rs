//! Core Voronoi generation algorithm
//!
//! Generates planar Voronoi cells clipped to a rectangle from a Delaunay
//! triangulation, with optional Lloyd's relaxation.

mod points;
mod delaunay;
mod lloyd;
mod voronoi;

pub use points::{generate_sites, generate_sites_seeded};
pub use delaunay::{compute_delaunay, DelaunayResult};
pub use lloyd::{lloyd_relaxation, lloyd_relaxation_with_options, LloydOptions};
pub use voronoi::{generate_cells, CellEdge, CellSet, RawCell};
