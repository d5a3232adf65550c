//! Voronoi-based level layout generation
//!
//! A standalone library that partitions a plane into Voronoi cells, threads a
//! key/lock mission graph through a tile grid and returns the level as
//! clockwise polygon loops, ready for any game engine's mesh or physics layer.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use voronoi_level_layout::*;
//!
//! // Generate a level
//! let config = LevelConfigBuilder::new()
//!     .seed(42)
//!     .challenge_count(3)
//!     .exploration_count(2)
//!     .lloyd_iterations(2).unwrap()
//!     .build().unwrap();
//!
//! let level = LevelGenerator::new(config).unwrap().generate().unwrap();
//! println!("{}", level.graph());
//!
//! // Generate mesh for rendering
//! let mesh = generate_mesh(level.layout(), &FanTriangulator, &BasicColorMapper).unwrap();
//! println!("Generated {} triangles", mesh.triangle_count());
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): Enables O(log n) position-to-cell lookups using KD-tree
//! - `serde`: Enables serialization support for configuration

// Modules
pub mod error;
pub mod geometry;
pub mod rng;
pub mod config;
pub mod cell;
pub mod generation;
pub mod diagram;
pub mod room;
pub mod mission;
pub mod placement;
pub mod router;
pub mod layout;
pub mod level;
pub mod mesh;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{LayoutError, Result};
pub use geometry::{Polygon, Rect};
pub use rng::LevelRng;
pub use config::{LevelConfig, LevelConfigBuilder, RoomLayoutConfig};
pub use cell::VoronoiCell;
pub use diagram::VoronoiDiagram;
pub use room::grow_room;
pub use mission::{Connectivity, Mechanic, MissionGraph, MissionGraphGenerator, MissionNode, MissionParams, NodeKind};
pub use placement::{place, Neighborhood, Placement, PlacementParams, PlacementStep, PlacementSteps};
pub use router::{route, route_polygons};
pub use layout::{Layout, LayoutPiece, PieceSource};
pub use level::{generate_room_layout, Level, LevelGenerator};
pub use mesh::{generate_mesh, BasicColorMapper, ColorMapper, CustomColorMapper, FanTriangulator, MeshData, Triangulation, Triangulator};
pub use generation::{LloydOptions, RawCell};

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam types for convenience
pub use glam::{IVec2, Vec2, Vec3};
