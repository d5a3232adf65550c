//! Error types for level layout generation

use glam::Vec2;
use thiserror::Error;

/// Errors that can occur while building diagrams, graphs, or layouts
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A diagram was requested over zero sites
    #[error("cannot build a diagram without sites")]
    EmptySiteSet,

    /// Diagram bounds have non-positive extent or non-finite coordinates
    #[error("invalid bounds: {0}")]
    InvalidBounds(String),

    /// The Delaunay triangulation rejected a site
    #[error("triangulation failed: {0}")]
    TriangulationFailed(String),

    /// A room must contain at least one cell
    #[error("invalid room size {0}, rooms need at least one cell")]
    InvalidRoomSize(i32),

    /// Room growth or grid placement ran out of eligible cells/tiles
    #[error("no available neighbor: {0}")]
    NoAvailableNeighbor(String),

    /// Every remaining lock still waits for its key
    #[error("no lock can be placed, remaining locks {remaining:?} have no placed key")]
    UnsatisfiableLockOrdering {
        /// Pairing numbers of the locks left in the pool
        remaining: Vec<usize>,
    },

    /// The greedy router could not reach its target
    #[error("no path from {start} to {target} after {steps} steps")]
    PathUnreachable {
        start: Vec2,
        target: Vec2,
        steps: usize,
    },

    /// Bounded-degree graph construction found no node to attach to
    #[error("every graph node already has degree {max_degree}")]
    DegreeLimitExceeded {
        /// Configured maximum degree
        max_degree: usize,
    },

    /// A site coordinate is not part of the diagram
    #[error("site not found in diagram: {0}")]
    SiteNotFound(Vec2),

    /// The retry driver used up its attempt budget
    #[error("generation failed after {attempts} attempts, last error: {last}")]
    AttemptsExhausted {
        attempts: usize,
        last: Box<LayoutError>,
    },
}

/// Result type alias for layout operations
pub type Result<T> = std::result::Result<T, LayoutError>;
