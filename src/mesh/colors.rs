//! Color mapping for layout pieces

use crate::layout::LayoutPiece;
use crate::mission::NodeKind;

/// RGBA color type
pub type PieceColor = [f32; 4];

/// Trait for mapping layout pieces to colors
pub trait ColorMapper {
    /// Map a piece to an RGBA color
    fn map_color(&self, piece: &LayoutPiece) -> PieceColor;
}

/// Default color mapper keyed on the room's mission node kind
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicColorMapper;

impl ColorMapper for BasicColorMapper {
    fn map_color(&self, piece: &LayoutPiece) -> PieceColor {
        if piece.is_corridor() {
            return [0.35, 0.3, 0.25, 1.0]; // Dark brown
        }
        match piece.kind {
            Some(NodeKind::Entrance) => [0.2, 0.7, 0.3, 1.0],    // Green
            Some(NodeKind::Key) => [0.2, 0.4, 0.9, 1.0],         // Blue
            Some(NodeKind::Lock) => [0.8, 0.2, 0.2, 1.0],        // Red
            Some(NodeKind::Exploration) => [0.6, 0.6, 0.6, 1.0], // Gray
            Some(NodeKind::Goal) => [0.95, 0.8, 0.2, 1.0],       // Gold
            None => [0.9, 0.8, 0.5, 1.0],                        // Sand
        }
    }
}

/// Custom color mapper that allows setting colors for each piece kind
#[derive(Debug, Clone)]
pub struct CustomColorMapper {
    pub entrance: PieceColor,
    pub key: PieceColor,
    pub lock: PieceColor,
    pub exploration: PieceColor,
    pub goal: PieceColor,
    /// Rooms without a mission node
    pub room: PieceColor,
    pub corridor: PieceColor,
}

impl Default for CustomColorMapper {
    fn default() -> Self {
        Self {
            entrance: [0.2, 0.7, 0.3, 1.0],
            key: [0.2, 0.4, 0.9, 1.0],
            lock: [0.8, 0.2, 0.2, 1.0],
            exploration: [0.6, 0.6, 0.6, 1.0],
            goal: [0.95, 0.8, 0.2, 1.0],
            room: [0.9, 0.8, 0.5, 1.0],
            corridor: [0.35, 0.3, 0.25, 1.0],
        }
    }
}

impl ColorMapper for CustomColorMapper {
    fn map_color(&self, piece: &LayoutPiece) -> PieceColor {
        if piece.is_corridor() {
            return self.corridor;
        }
        match piece.kind {
            Some(NodeKind::Entrance) => self.entrance,
            Some(NodeKind::Key) => self.key,
            Some(NodeKind::Lock) => self.lock,
            Some(NodeKind::Exploration) => self.exploration,
            Some(NodeKind::Goal) => self.goal,
            None => self.room,
        }
    }
}
