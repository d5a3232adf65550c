//! Grid placement of mission graphs
//!
//! Every mission node gets its own tile, next to the tile of the node it was
//! reached from. Tiles are filled with random sites, padded with filler tiles
//! and turned into a single Voronoi diagram.

mod grid;
mod normalize;
mod engine;

pub use grid::{tile_bounds, Neighborhood, Room, TileCoord};
pub use normalize::normalize;
pub use engine::{place, Placement, PlacementParams, PlacementStep, PlacementSteps};
