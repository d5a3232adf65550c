//! Room growing over cell adjacency
//!
//! A room is an origin cell plus neighboring cells until it reaches the
//! requested size. Cells stay separate polygons: the triangulator handles each
//! loop on its own, so shared edges between cells of one room are kept twice.

use log::debug;

use crate::diagram::VoronoiDiagram;
use crate::error::{LayoutError, Result};
use crate::geometry::{clean_loop, Polygon};
use crate::rng::LevelRng;

/// Cell indices making up a grown room, origin first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrownRoom {
    pub origin: usize,
    pub cells: Vec<usize>,
}

/// Pick the cells of a room of `size` cells
///
/// The origin is drawn uniformly from the diagram's sites with a generator
/// seeded from `origin_seed`. The origin's own neighbors are taken in order;
/// once they run out the search widens to the neighbors of every cell already
/// in the room.
///
/// # Errors
///
/// - `InvalidRoomSize` if `size < 1`
/// - `NoAvailableNeighbor` if the reachable cells run out before `size`
pub fn grow_room_cells(diagram: &VoronoiDiagram, origin_seed: &str, size: i32) -> Result<GrownRoom> {
    if size < 1 {
        return Err(LayoutError::InvalidRoomSize(size));
    }

    let mut rng = LevelRng::from_seed_str(origin_seed);
    let origin = rng
        .uniform_index(diagram.site_count())
        .ok_or(LayoutError::EmptySiteSet)?;

    let mut included = vec![origin];
    // Neighbors considered in order; widened as breadth expansion finds new cells
    let mut pool: Vec<usize> = diagram.neighbors(origin).to_vec();

    for i in 1..size as usize {
        let next = match pool.get(i - 1) {
            Some(&candidate) if !included.contains(&candidate) => candidate,
            _ => {
                let found = included
                    .iter()
                    .flat_map(|&cell| diagram.neighbors(cell).iter().copied())
                    .find(|n| *n != origin && !included.contains(n))
                    .ok_or_else(|| {
                        LayoutError::NoAvailableNeighbor(format!(
                            "room around site {} stuck at {} of {} cells",
                            origin,
                            included.len(),
                            size
                        ))
                    })?;
                pool.push(found);
                found
            }
        };
        included.push(next);
    }

    debug!("room: grew {} cells around site {}", included.len(), origin);

    Ok(GrownRoom {
        origin,
        cells: included,
    })
}

/// Grow a room and return one clockwise polygon per cell
///
/// # Example
///
/// ```
/// use voronoi_level_layout::*;
///
/// let bounds = Rect::from_size(1000.0, 1000.0);
/// let sites = generation::generate_sites_seeded(150, bounds, "lelele");
/// let diagram = VoronoiDiagram::build(&sites, bounds).unwrap();
///
/// let room = grow_room(&diagram, "lelele0", 3).unwrap();
/// assert_eq!(room.len(), 3);
/// ```
pub fn grow_room(diagram: &VoronoiDiagram, origin_seed: &str, size: i32) -> Result<Vec<Polygon>> {
    let grown = grow_room_cells(diagram, origin_seed, size)?;
    Ok(grown
        .cells
        .iter()
        .map(|&cell| clean_loop(diagram.boundary(cell)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::generate_sites_seeded;
    use crate::geometry::Rect;
    use glam::Vec2;

    fn lelele_diagram() -> VoronoiDiagram {
        let bounds = Rect::from_size(1000.0, 1000.0);
        let sites = generate_sites_seeded(150, bounds, "lelele");
        VoronoiDiagram::build(&sites, bounds).unwrap()
    }

    #[test]
    fn test_invalid_size() {
        let diagram = lelele_diagram();
        assert_eq!(grow_room(&diagram, "x", 0), Err(LayoutError::InvalidRoomSize(0)));
        assert_eq!(grow_room(&diagram, "x", -4), Err(LayoutError::InvalidRoomSize(-4)));
    }

    #[test]
    fn test_single_cell_room_is_origin_boundary() {
        let diagram = lelele_diagram();
        let grown = grow_room_cells(&diagram, "lelele0", 1).unwrap();
        let room = grow_room(&diagram, "lelele0", 1).unwrap();

        assert_eq!(room.len(), 1);
        let boundary = diagram.boundary(grown.origin);
        assert_eq!(room[0].len(), boundary.len());
        for v in boundary {
            assert!(room[0].contains(v));
        }
    }

    #[test]
    fn test_three_cell_room() {
        let diagram = lelele_diagram();
        let grown = grow_room_cells(&diagram, "lelele0", 3).unwrap();
        assert!(diagram.neighbors(grown.origin).len() >= 2);

        let room = grow_room(&diagram, "lelele0", 3).unwrap();
        assert_eq!(room.len(), 3);
        for polygon in &room {
            assert!(polygon.len() >= 3);
        }
    }

    #[test]
    fn test_cells_are_distinct_and_connected() {
        let diagram = lelele_diagram();
        let grown = grow_room_cells(&diagram, "big", 20).unwrap();

        assert_eq!(grown.cells.len(), 20);
        for (i, &cell) in grown.cells.iter().enumerate() {
            assert!(!grown.cells[..i].contains(&cell));
            if i > 0 {
                let touches = grown.cells[..i]
                    .iter()
                    .any(|&earlier| diagram.neighbors(earlier).contains(&cell));
                assert!(touches, "cell {} is not adjacent to the room", cell);
            }
        }
    }

    #[test]
    fn test_same_seed_same_room() {
        let diagram = lelele_diagram();
        assert_eq!(
            grow_room_cells(&diagram, "repeat", 5).unwrap(),
            grow_room_cells(&diagram, "repeat", 5).unwrap()
        );
    }

    #[test]
    fn test_room_larger_than_diagram() {
        let bounds = Rect::from_size(10.0, 10.0);
        let diagram = VoronoiDiagram::build(&[Vec2::new(2.0, 2.0), Vec2::new(8.0, 8.0)], bounds).unwrap();
        assert!(matches!(
            grow_room(&diagram, "tiny", 3),
            Err(LayoutError::NoAvailableNeighbor(_))
        ));
        assert_eq!(grow_room(&diagram, "tiny", 2).unwrap().len(), 2);
    }
}
