//! Mesh generation for layouts
//!
//! Generates engine-agnostic mesh data from layout polygons. Polygons lie in
//! the XZ plane (`(x, y)` maps to `(x, 0, y)`), facing +Y.

mod colors;

pub use colors::{BasicColorMapper, ColorMapper, CustomColorMapper, PieceColor};

use glam::{Vec2, Vec3};

use crate::error::{LayoutError, Result};
use crate::layout::Layout;

/// Triangle list over a deduplicated vertex set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Triangulation {
    /// Three indices per triangle, into `vertices`
    pub indices: Vec<u32>,
    pub vertices: Vec<Vec3>,
}

/// Turns a closed polygon loop into triangles
pub trait Triangulator {
    /// Triangulate `outline`, minus any `holes`
    ///
    /// The loop is closed implicitly; a repeated first vertex at the end is
    /// ignored. Vertices are deduplicated by exact coordinates.
    fn triangulate(&self, outline: &[Vec2], holes: &[Vec<Vec2>]) -> Result<Triangulation>;
}

/// Fan from the first vertex; exact for convex loops such as Voronoi cells
#[derive(Debug, Clone, Copy, Default)]
pub struct FanTriangulator;

impl Triangulator for FanTriangulator {
    fn triangulate(&self, outline: &[Vec2], holes: &[Vec<Vec2>]) -> Result<Triangulation> {
        if !holes.is_empty() {
            return Err(LayoutError::TriangulationFailed(
                "fan triangulation does not support holes".to_string(),
            ));
        }

        let mut points: Vec<Vec2> = Vec::with_capacity(outline.len());
        for &p in outline {
            if !points.contains(&p) {
                points.push(p);
            }
        }
        if points.len() < 3 {
            return Err(LayoutError::TriangulationFailed(format!(
                "loop has {} distinct vertices, need 3",
                points.len()
            )));
        }

        let indices = (1..points.len() as u32 - 1)
            .flat_map(|i| [0, i, i + 1])
            .collect();

        Ok(Triangulation {
            indices,
            vertices: points.iter().map(|p| Vec3::new(p.x, 0.0, p.y)).collect(),
        })
    }
}

/// Engine-agnostic mesh data output
///
/// Contains raw vertex data suitable for any rendering engine:
/// - Bevy: Convert to `Mesh` with attributes
/// - Godot: Convert to `ArrayMesh`
/// - wgpu: Use directly as vertex buffers
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// Vertex positions (3D coordinates)
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals, all +Y
    pub normals: Vec<[f32; 3]>,
    /// Vertex colors (RGBA)
    pub colors: Vec<[f32; 4]>,
    /// Triangle indices
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Append one triangulated loop, offsetting its indices past the existing vertices
    fn append(&mut self, triangulation: &Triangulation, color: PieceColor) {
        let base_idx = self.positions.len() as u32;

        for v in &triangulation.vertices {
            self.positions.push([v.x, v.y, v.z]);
            self.normals.push([0.0, 1.0, 0.0]);
            self.colors.push(color);
        }
        self.indices
            .extend(triangulation.indices.iter().map(|&i| base_idx + i));
    }
}

/// Generate mesh from a layout with color mapping
///
/// Every piece is triangulated on its own; all vertices of a piece share the
/// color its mapper returns.
///
/// # Errors
///
/// The first triangulation error, if any
pub fn generate_mesh<T, C>(layout: &Layout, triangulator: &T, color_mapper: &C) -> Result<MeshData>
where
    T: Triangulator,
    C: ColorMapper,
{
    let mut mesh = MeshData::default();

    for piece in layout.pieces() {
        let triangulation = triangulator.triangulate(&piece.polygon, &[])?;
        mesh.append(&triangulation, color_mapper.map_color(piece));
    }

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoomLayoutConfig;
    use crate::level::generate_room_layout;

    fn square() -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 0.0),
        ]
    }

    #[test]
    fn test_fan_triangulation() {
        let tri = FanTriangulator.triangulate(&square(), &[]).unwrap();
        assert_eq!(tri.vertices.len(), 4);
        assert_eq!(tri.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(tri.vertices[1], Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_closed_and_duplicated_loops() {
        let mut closed = square();
        closed.push(Vec2::ZERO);
        closed.insert(2, Vec2::new(0.0, 1.0));
        let tri = FanTriangulator.triangulate(&closed, &[]).unwrap();
        assert_eq!(tri.vertices.len(), 4);
        assert_eq!(tri.indices.len(), 6);
    }

    #[test]
    fn test_degenerate_and_holes_rejected() {
        let line = [Vec2::ZERO, Vec2::ONE, Vec2::ZERO];
        assert!(FanTriangulator.triangulate(&line, &[]).is_err());
        assert!(FanTriangulator.triangulate(&square(), &[square()]).is_err());
    }

    #[test]
    fn test_generate_mesh() {
        let layout = generate_room_layout(&RoomLayoutConfig::default()).unwrap();
        let mesh = generate_mesh(&layout, &FanTriangulator, &BasicColorMapper).unwrap();

        assert!(!mesh.is_empty());
        assert!(mesh.triangle_count() > 0);
        assert_eq!(mesh.positions.len(), mesh.normals.len());
        assert_eq!(mesh.positions.len(), mesh.colors.len());
        assert_eq!(mesh.indices.len() % 3, 0);

        let expected: usize = layout.polygons().map(|p| p.len()).sum();
        assert_eq!(mesh.vertex_count(), expected);
    }

    #[test]
    fn test_index_offsets_accumulate() {
        let mut layout = Layout::new();
        layout.push_room(0, None, square());
        layout.push_room(1, None, square().into_iter().map(|v| v + Vec2::X * 2.0).collect());

        let mesh = generate_mesh(&layout, &FanTriangulator, &BasicColorMapper).unwrap();
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(&mesh.indices[6..], &[4, 5, 6, 4, 6, 7]);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()));
    }

    #[test]
    fn test_mesh_consistency() {
        let layout = generate_room_layout(&RoomLayoutConfig::default()).unwrap();

        // Generate twice with same input
        let mesh1 = generate_mesh(&layout, &FanTriangulator, &BasicColorMapper).unwrap();
        let mesh2 = generate_mesh(&layout, &FanTriangulator, &BasicColorMapper).unwrap();

        assert_eq!(mesh1.vertex_count(), mesh2.vertex_count());
        assert_eq!(mesh1.indices, mesh2.indices);
    }
}
