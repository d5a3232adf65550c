//! Finished layout: clockwise polygon loops tagged with where they came from

use crate::geometry::Polygon;
use crate::mission::{NodeId, NodeKind};

/// What produced a layout piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceSource {
    /// A cell of a room. Mission layouts use the node ID, room layouts the room index.
    Room { room: usize },
    /// A cell routed between two connected rooms
    Corridor { from: NodeId, to: NodeId },
}

/// One polygon of the layout
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPiece {
    pub polygon: Polygon,
    pub source: PieceSource,
    /// Kind of the mission node a room piece belongs to
    pub kind: Option<NodeKind>,
}

impl LayoutPiece {
    #[inline]
    pub fn is_corridor(&self) -> bool {
        matches!(self.source, PieceSource::Corridor { .. })
    }
}

/// Ordered list of layout pieces
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    pieces: Vec<LayoutPiece>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a room cell. Loops with fewer than 3 vertices are skipped.
    pub fn push_room(&mut self, room: usize, kind: Option<NodeKind>, polygon: Polygon) {
        self.push(LayoutPiece {
            polygon,
            source: PieceSource::Room { room },
            kind,
        });
    }

    /// Append a corridor cell. Loops with fewer than 3 vertices are skipped.
    pub fn push_corridor(&mut self, from: NodeId, to: NodeId, polygon: Polygon) {
        self.push(LayoutPiece {
            polygon,
            source: PieceSource::Corridor { from, to },
            kind: None,
        });
    }

    fn push(&mut self, piece: LayoutPiece) {
        if piece.polygon.len() >= 3 {
            self.pieces.push(piece);
        }
    }

    #[inline]
    pub fn pieces(&self) -> &[LayoutPiece] {
        &self.pieces
    }

    /// Just the loops, in layout order
    pub fn polygons(&self) -> impl Iterator<Item = &Polygon> {
        self.pieces.iter().map(|p| &p.polygon)
    }

    /// Pieces of one room
    pub fn room_pieces(&self, room: usize) -> impl Iterator<Item = &LayoutPiece> {
        self.pieces
            .iter()
            .filter(move |p| p.source == PieceSource::Room { room })
    }

    pub fn corridor_count(&self) -> usize {
        self.pieces.iter().filter(|p| p.is_corridor()).count()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }
}
