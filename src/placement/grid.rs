//! Tile grid bookkeeping

use std::collections::HashMap;

use glam::{IVec2, Vec2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::mission::{MissionNode, NodeId};

/// Integer grid coordinate of a tile
pub type TileCoord = IVec2;

const FOUR: [IVec2; 4] = [IVec2::new(1, 0), IVec2::new(0, 1), IVec2::new(-1, 0), IVec2::new(0, -1)];

const EIGHT: [IVec2; 8] = [
    IVec2::new(1, 0),
    IVec2::new(1, 1),
    IVec2::new(0, 1),
    IVec2::new(-1, 1),
    IVec2::new(-1, 0),
    IVec2::new(-1, -1),
    IVec2::new(0, -1),
    IVec2::new(1, -1),
];

/// Which tiles count as adjacent when placing a node next to its parent
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Neighborhood {
    /// Edge-sharing tiles only
    #[default]
    Four,
    /// Edge- and corner-sharing tiles
    Eight,
}

impl Neighborhood {
    /// Offsets to the adjacent tiles, in a fixed order
    pub fn offsets(self) -> &'static [IVec2] {
        match self {
            Neighborhood::Four => &FOUR,
            Neighborhood::Eight => &EIGHT,
        }
    }
}

/// World-space rectangle covered by a tile
pub fn tile_bounds(tile: TileCoord, tile_size: f32) -> Rect {
    let min = tile.as_vec2() * tile_size;
    Rect::new(min, min + Vec2::splat(tile_size))
}

/// A tile with its sites
///
/// Mission rooms carry the node they host; filler rooms carry `None` and only
/// exist to give the diagram cells around the mission rooms.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub tile: TileCoord,
    pub sites: Vec<Vec2>,
    pub mission: Option<(NodeId, MissionNode)>,
}

impl Room {
    #[inline]
    pub fn is_filler(&self) -> bool {
        self.mission.is_none()
    }

    /// Node hosted by this room
    #[inline]
    pub fn node_id(&self) -> Option<NodeId> {
        self.mission.as_ref().map(|(id, _)| *id)
    }
}

/// Tile occupancy: at most one room per tile
#[derive(Debug, Clone, Default)]
pub(crate) struct TileGrid {
    occupied: HashMap<TileCoord, usize>,
}

impl TileGrid {
    #[inline]
    pub fn is_free(&self, tile: TileCoord) -> bool {
        !self.occupied.contains_key(&tile)
    }

    /// Free tiles adjacent to `tile`, in neighborhood order
    pub fn free_neighbors(&self, tile: TileCoord, neighborhood: Neighborhood) -> Vec<TileCoord> {
        neighborhood
            .offsets()
            .iter()
            .map(|&offset| tile + offset)
            .filter(|&t| self.is_free(t))
            .collect()
    }

    /// Mark `tile` as holding room `room`. Returns `false` if already taken.
    pub fn occupy(&mut self, tile: TileCoord, room: usize) -> bool {
        if !self.is_free(tile) {
            return false;
        }
        self.occupied.insert(tile, room);
        true
    }

    pub fn release(&mut self, tile: TileCoord) {
        self.occupied.remove(&tile);
    }
}
