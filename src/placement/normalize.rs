//! Shift placed rooms into the non-negative quadrant

use glam::IVec2;

use super::grid::Room;

/// Translate rooms so the smallest tile coordinate on each axis is 0
///
/// Sites move by the same offset scaled by `tile_size`. Mission tags are
/// carried over unchanged and the input is left untouched.
pub fn normalize(rooms: &[Room], tile_size: f32) -> Vec<Room> {
    let Some(min) = rooms.iter().map(|r| r.tile).reduce(|a, b| a.min(b)) else {
        return Vec::new();
    };

    let shift: IVec2 = -min;
    let site_shift = shift.as_vec2() * tile_size;

    rooms
        .iter()
        .map(|room| Room {
            tile: room.tile + shift,
            sites: room.sites.iter().map(|&s| s + site_shift).collect(),
            mission: room.mission.clone(),
        })
        .collect()
}
