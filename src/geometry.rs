//! Planar geometry helpers
//!
//! Bounds, polygon loops, and the vertex clean-up every boundary goes through
//! before it leaves the crate: duplicates removed, then sorted clockwise.

use glam::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};

/// A closed vertex loop. The last vertex links back to the first.
pub type Polygon = Vec<Vec2>;

/// Axis-aligned bounding rectangle
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Rectangle anchored at the origin
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(Vec2::ZERO, Vec2::new(width, height))
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Length of the diagonal, used to scale relative thresholds
    #[inline]
    pub fn diagonal(&self) -> f32 {
        (self.max - self.min).length()
    }

    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    #[inline]
    pub fn clamp(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }

    /// Shrink every side by `fraction` of the respective extent.
    ///
    /// A fraction of 0.1 leaves the middle 80% of each axis.
    pub fn inset(&self, fraction: f32) -> Rect {
        let pad = Vec2::new(self.width(), self.height()) * fraction;
        Rect::new(self.min + pad, self.max - pad)
    }

    /// Corners in clockwise order starting bottom-left (y up)
    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.min.x, self.max.y),
            self.max,
            Vec2::new(self.max.x, self.min.y),
        ]
    }

    /// Fails with `InvalidBounds` unless both extents are positive and finite
    pub fn validate(&self) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(LayoutError::InvalidBounds(format!(
                "non-finite bounds {} .. {}",
                self.min, self.max
            )));
        }
        if self.width() <= 0.0 || self.height() <= 0.0 {
            return Err(LayoutError::InvalidBounds(format!(
                "bounds {} .. {} have non-positive extent",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Average of the vertices (not the area centroid)
pub fn vertex_centroid(vertices: &[Vec2]) -> Vec2 {
    if vertices.is_empty() {
        return Vec2::ZERO;
    }
    let sum: Vec2 = vertices.iter().copied().sum();
    sum / vertices.len() as f32
}

/// Remove exact duplicate points, keeping first occurrences in order
pub fn dedup_vertices(vertices: &[Vec2]) -> Vec<Vec2> {
    let mut unique: Vec<Vec2> = Vec::with_capacity(vertices.len());
    for &v in vertices {
        if !unique.contains(&v) {
            unique.push(v);
        }
    }
    unique
}

/// Sort vertices clockwise around their vertex centroid (y axis up)
pub fn sort_clockwise(vertices: &[Vec2]) -> Vec<Vec2> {
    let center = vertex_centroid(vertices);

    let mut with_angles: Vec<(Vec2, f32)> = vertices
        .iter()
        .map(|&v| {
            let d = v - center;
            (v, d.y.atan2(d.x))
        })
        .collect();

    // Descending angle walks clockwise
    with_angles.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    with_angles.into_iter().map(|(v, _)| v).collect()
}

/// Deduplicate then sort clockwise; the form every outgoing loop takes
pub fn clean_loop(vertices: &[Vec2]) -> Polygon {
    sort_clockwise(&dedup_vertices(vertices))
}

/// Shoelace signed area. Negative for clockwise loops.
pub fn signed_area(vertices: &[Vec2]) -> f32 {
    if vertices.len() < 3 {
        return 0.0;
    }
    let mut twice_area = 0.0;
    for i in 0..vertices.len() {
        let a = vertices[i];
        let b = vertices[(i + 1) % vertices.len()];
        twice_area += a.perp_dot(b);
    }
    twice_area * 0.5
}
