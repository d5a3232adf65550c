//! Depth-first tile placement of a mission graph
//!
//! The entrance takes tile (0, 0). Placement then walks the graph depth-first
//! with an explicit frontier stack. Expanding the node on top of the stack
//! claims a random free tile next to it for every unplaced neighbor at once,
//! so a deep branch can never take the tiles its siblings need. When the
//! neighbors do not all fit, the most recent expansions are undone and
//! retried. Repeated backtracks without progress undo twice as much each
//! time, up to a restart from the entrance; the retry budget is finite so a
//! hopeless graph fails.

use std::collections::VecDeque;

use glam::{IVec2, Vec2};
use log::{debug, info};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::grid::{tile_bounds, Neighborhood, Room, TileCoord, TileGrid};
use super::normalize::normalize;
use crate::diagram::VoronoiDiagram;
use crate::error::{LayoutError, Result};
use crate::generation::generate_sites;
use crate::geometry::{clean_loop, Polygon, Rect};
use crate::mission::{MissionGraph, NodeId};
use crate::rng::LevelRng;

/// Tuning for grid placement
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementParams {
    /// World-space edge length of one tile
    pub tile_size: f32,
    /// Sites scattered in every tile, mission or filler
    pub sites_per_tile: usize,
    /// Fraction of the tile kept free of sites on each side, in `[0, 0.5)`
    pub border_fraction: f32,
    pub neighborhood: Neighborhood,
    /// Placements undone by the first backtrack at a dead end
    pub backtrack_depth: usize,
    /// Backtracks allowed before the attempt fails
    pub backtrack_budget: usize,
    /// Relaxation rounds applied to the finished diagram
    pub lloyd_iterations: usize,
}

impl Default for PlacementParams {
    fn default() -> Self {
        Self {
            tile_size: 100.0,
            sites_per_tile: 4,
            border_fraction: 0.1,
            neighborhood: Neighborhood::Four,
            backtrack_depth: 3,
            backtrack_budget: 64,
            lloyd_iterations: 0,
        }
    }
}

impl PlacementParams {
    /// Returns `InvalidConfig` for values placement cannot work with
    pub fn validate(&self) -> Result<()> {
        if !self.tile_size.is_finite() || self.tile_size <= 0.0 {
            return Err(LayoutError::InvalidConfig(format!(
                "tile size must be positive (got {})",
                self.tile_size
            )));
        }
        if self.sites_per_tile == 0 {
            return Err(LayoutError::InvalidConfig(
                "sites per tile must be >= 1".to_string(),
            ));
        }
        if !(0.0..0.5).contains(&self.border_fraction) {
            return Err(LayoutError::InvalidConfig(format!(
                "border fraction must be in [0, 0.5) (got {})",
                self.border_fraction
            )));
        }
        Ok(())
    }
}

/// One unit of placement progress
#[derive(Debug, Clone, PartialEq)]
pub enum PlacementStep {
    /// A node took a tile
    Placed { node: NodeId, tile: TileCoord },
    /// Recent placements were undone, most recent last
    Backtracked { undone: Vec<NodeId> },
}

type Frontier = Vec<(NodeId, TileCoord)>;

/// Single-stepping placement
///
/// Every call to `next()` reports one placed room or one backtrack. Rooms of
/// siblings are claimed together, so [`PlacementSteps::rooms`] can run ahead
/// of the reported steps. Use [`PlacementSteps::finish`] to run the rest and
/// build the [`Placement`].
///
/// ```
/// use voronoi_level_layout::*;
///
/// let graph = MissionGraphGenerator::new(MissionParams::default())
///     .generate(&mut LevelRng::from_seed(5))
///     .unwrap();
/// let params = PlacementParams::default();
/// let mut rng = LevelRng::from_seed(5);
///
/// let mut steps = PlacementSteps::new(&graph, &params, &mut rng).unwrap();
/// let first = steps.next().unwrap().unwrap();
/// assert_eq!(first, PlacementStep::Placed { node: 0, tile: glam::IVec2::ZERO });
///
/// let placement = steps.finish().unwrap();
/// assert_eq!(placement.mission_rooms().len(), graph.node_count());
/// ```
pub struct PlacementSteps<'a> {
    graph: &'a MissionGraph,
    params: PlacementParams,
    rng: &'a mut LevelRng,
    entrance: NodeId,
    grid: TileGrid,
    /// Mission rooms in placement order
    rooms: Vec<Room>,
    node_room: Vec<Option<usize>>,
    frontier: Frontier,
    /// Frontier as it was before the expansion that placed each room
    history: Vec<Frontier>,
    /// Index of the first room placed by the same expansion, per room
    group_start: Vec<usize>,
    /// Placements claimed but not yet reported
    pending: VecDeque<PlacementStep>,
    backtracks: usize,
    /// Backtracks since the placed count last reached a new maximum
    streak: u32,
    high_water: usize,
    started: bool,
    finished: bool,
    failure: Option<LayoutError>,
}

impl<'a> PlacementSteps<'a> {
    /// # Errors
    ///
    /// `InvalidConfig` if the parameters are invalid or the graph has no entrance
    pub fn new(graph: &'a MissionGraph, params: &PlacementParams, rng: &'a mut LevelRng) -> Result<Self> {
        params.validate()?;
        let entrance = graph
            .entrance()
            .ok_or_else(|| LayoutError::InvalidConfig("mission graph has no entrance".to_string()))?;

        Ok(Self {
            graph,
            params: *params,
            rng,
            entrance,
            grid: TileGrid::default(),
            rooms: Vec::with_capacity(graph.node_count()),
            node_room: vec![None; graph.node_count()],
            frontier: Vec::new(),
            history: Vec::with_capacity(graph.node_count()),
            group_start: Vec::with_capacity(graph.node_count()),
            pending: VecDeque::new(),
            backtracks: 0,
            streak: 0,
            high_water: 0,
            started: false,
            finished: false,
            failure: None,
        })
    }

    /// Mission rooms placed so far, in placement order, before normalization
    #[inline]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    #[inline]
    pub fn backtracks(&self) -> usize {
        self.backtracks
    }

    fn next_step(&mut self) -> Result<Option<PlacementStep>> {
        if let Some(step) = self.pending.pop_front() {
            return Ok(Some(step));
        }

        if !self.started {
            self.started = true;
            self.place_room(self.entrance, IVec2::ZERO, &Vec::new(), 0);
            self.frontier.push((self.entrance, IVec2::ZERO));
            return Ok(Some(PlacementStep::Placed {
                node: self.entrance,
                tile: IVec2::ZERO,
            }));
        }

        loop {
            let Some(&(node, tile)) = self.frontier.last() else {
                if self.rooms.len() < self.graph.node_count() {
                    return Err(LayoutError::NoAvailableNeighbor(format!(
                        "only {} of {} nodes are reachable from the entrance",
                        self.rooms.len(),
                        self.graph.node_count()
                    )));
                }
                return Ok(None);
            };

            let children: Vec<NodeId> = self
                .graph
                .neighbors(node)
                .iter()
                .copied()
                .filter(|&n| self.node_room[n].is_none())
                .collect();

            if children.is_empty() {
                self.frontier.pop();
                continue;
            }

            let mut free = self.grid.free_neighbors(tile, self.params.neighborhood);
            let mut claims = Vec::with_capacity(children.len());
            for &child in &children {
                let Some(index) = self.rng.uniform_index(free.len()) else {
                    return self.backtrack(child).map(Some);
                };
                claims.push((child, free.remove(index)));
            }

            let snapshot = self.frontier.clone();
            let group = self.rooms.len();
            self.frontier.pop();
            for &(child, target) in &claims {
                self.place_room(child, target, &snapshot, group);
            }
            // First child on top, so it is expanded first
            self.frontier.extend(claims.iter().rev().copied());

            self.pending
                .extend(claims.into_iter().map(|(node, tile)| PlacementStep::Placed { node, tile }));
            return Ok(self.pending.pop_front());
        }
    }

    /// `snapshot` is the frontier before the expansion placing this room,
    /// `group` the index of that expansion's first room
    fn place_room(&mut self, node: NodeId, tile: TileCoord, snapshot: &Frontier, group: usize) {
        let bounds = tile_bounds(tile, self.params.tile_size).inset(self.params.border_fraction);
        let sites = generate_sites(self.params.sites_per_tile, bounds, self.rng);
        let mission = self.graph.node(node).cloned().map(|n| (node, n));

        self.grid.occupy(tile, self.rooms.len());
        self.history.push(snapshot.clone());
        self.group_start.push(group);
        self.node_room[node] = Some(self.rooms.len());
        self.rooms.push(Room { tile, sites, mission });

        if self.rooms.len() > self.high_water {
            self.high_water = self.rooms.len();
            self.streak = 0;
        }
    }

    /// Undo recent expansions and restore the frontier from before them
    ///
    /// Rooms placed by one expansion are undone together.
    fn backtrack(&mut self, stuck: NodeId) -> Result<PlacementStep> {
        let undoable = self.rooms.len().saturating_sub(1);
        if self.backtracks >= self.params.backtrack_budget || self.params.backtrack_depth == 0 || undoable == 0 {
            return Err(LayoutError::NoAvailableNeighbor(format!(
                "no free tile for node {} after {} backtracks",
                stuck, self.backtracks
            )));
        }

        let depth = self.params.backtrack_depth.saturating_mul(1 << self.streak.min(16));
        let keep = self.group_start[self.rooms.len() - depth.min(undoable)];
        let mut undone = Vec::with_capacity(self.rooms.len() - keep);
        for room in self.rooms.drain(keep..) {
            self.grid.release(room.tile);
            if let Some(id) = room.node_id() {
                self.node_room[id] = None;
                undone.push(id);
            }
        }
        self.frontier = self.history[keep].clone();
        self.history.truncate(keep);
        self.group_start.truncate(keep);
        self.backtracks += 1;
        self.streak += 1;

        debug!(
            "placement: node {} stuck, undid {:?} (backtrack {}/{})",
            stuck, undone, self.backtracks, self.params.backtrack_budget
        );

        Ok(PlacementStep::Backtracked { undone })
    }

    /// Run the remaining steps, add filler rooms, normalize and build the diagram
    ///
    /// # Errors
    ///
    /// Any placement failure, or a diagram construction error
    pub fn finish(mut self) -> Result<Placement> {
        while let Some(step) = self.next() {
            step?;
        }
        if let Some(err) = self.failure.take() {
            return Err(err);
        }

        let mission_room_count = self.rooms.len();
        let mut rooms = std::mem::take(&mut self.rooms);
        self.add_fillers(&mut rooms);

        let rooms = normalize(&rooms, self.params.tile_size);
        let max_tile = rooms
            .iter()
            .map(|r| r.tile)
            .reduce(|a, b| a.max(b))
            .unwrap_or(IVec2::ZERO);
        let extent = (max_tile + IVec2::ONE).as_vec2() * self.params.tile_size;
        let bounds = Rect::from_size(extent.x, extent.y);

        let sites: Vec<Vec2> = rooms.iter().flat_map(|r| r.sites.iter().copied()).collect();
        let base = VoronoiDiagram::build(&sites, bounds)?;

        let mut cell_owner = vec![None; base.site_count()];
        for (room_idx, room) in rooms.iter().enumerate() {
            for &site in &room.sites {
                if let Some(cell) = base.site_index(site) {
                    cell_owner[cell].get_or_insert(room_idx);
                }
            }
        }

        let diagram = if self.params.lloyd_iterations > 0 {
            let relaxed = base.relax_n(self.params.lloyd_iterations)?;
            // Relaxed site i is the centroid of cell i unless two centroids merged
            if relaxed.site_count() != base.site_count() {
                cell_owner = relaxed
                    .sites()
                    .iter()
                    .map(|&site| cell_owner[base.find_site_at(site)])
                    .collect();
            }
            relaxed
        } else {
            base
        };

        if let Some(room) = (0..mission_room_count).find(|&room| !cell_owner.contains(&Some(room))) {
            return Err(LayoutError::NoAvailableNeighbor(format!(
                "mission room {} owns no cells",
                room
            )));
        }

        info!(
            "placement: {} mission rooms, {} filler rooms, {} cells, {} backtracks",
            mission_room_count,
            rooms.len() - mission_room_count,
            diagram.site_count(),
            self.backtracks
        );

        Ok(Placement {
            rooms,
            mission_room_count,
            diagram,
            cell_owner,
            backtracks: self.backtracks,
        })
    }

    /// Filler room on every free tile edge-adjacent to a mission room
    fn add_fillers(&mut self, rooms: &mut Vec<Room>) {
        let mission_tiles: Vec<TileCoord> = rooms.iter().map(|r| r.tile).collect();
        for tile in mission_tiles {
            for &offset in Neighborhood::Four.offsets() {
                let candidate = tile + offset;
                if !self.grid.occupy(candidate, rooms.len()) {
                    continue;
                }
                let bounds = tile_bounds(candidate, self.params.tile_size).inset(self.params.border_fraction);
                rooms.push(Room {
                    tile: candidate,
                    sites: generate_sites(self.params.sites_per_tile, bounds, self.rng),
                    mission: None,
                });
            }
        }
    }
}

impl Iterator for PlacementSteps<'_> {
    type Item = Result<PlacementStep>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_step() {
            Ok(Some(step)) => Some(Ok(step)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(err) => {
                self.finished = true;
                self.failure = Some(err.clone());
                Some(Err(err))
            }
        }
    }
}

/// Place every node of `graph` on the tile grid and build the diagram over it
///
/// # Errors
///
/// - `InvalidConfig` for invalid parameters
/// - `NoAvailableNeighbor` when the backtrack budget runs out
pub fn place(graph: &MissionGraph, params: &PlacementParams, rng: &mut LevelRng) -> Result<Placement> {
    PlacementSteps::new(graph, params, rng)?.finish()
}

/// Result of grid placement
///
/// Rooms are normalized so every tile and site coordinate is non-negative.
/// Mission rooms come first in placement order, filler rooms after them.
#[derive(Debug, Clone)]
pub struct Placement {
    rooms: Vec<Room>,
    mission_room_count: usize,
    diagram: VoronoiDiagram,
    cell_owner: Vec<Option<usize>>,
    backtracks: usize,
}

impl Placement {
    #[inline]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    #[inline]
    pub fn mission_rooms(&self) -> &[Room] {
        &self.rooms[..self.mission_room_count]
    }

    #[inline]
    pub fn filler_rooms(&self) -> &[Room] {
        &self.rooms[self.mission_room_count..]
    }

    #[inline]
    pub fn diagram(&self) -> &VoronoiDiagram {
        &self.diagram
    }

    #[inline]
    pub fn backtracks(&self) -> usize {
        self.backtracks
    }

    /// Index into `rooms()` of the room hosting `node`
    pub fn room_index_for_node(&self, node: NodeId) -> Option<usize> {
        self.mission_rooms().iter().position(|r| r.node_id() == Some(node))
    }

    /// Room index owning a diagram cell
    pub fn cell_owner(&self, cell: usize) -> Option<usize> {
        self.cell_owner.get(cell).copied().flatten()
    }

    /// Whether a cell belongs to a mission room
    pub fn is_mission_cell(&self, cell: usize) -> bool {
        self.cell_owner(cell).is_some_and(|room| room < self.mission_room_count)
    }

    /// Diagram cells owned by a room, ascending
    pub fn room_cells(&self, room: usize) -> Vec<usize> {
        (0..self.cell_owner.len())
            .filter(|&cell| self.cell_owner[cell] == Some(room))
            .collect()
    }

    /// One clockwise polygon per cell of a room
    pub fn room_polygons(&self, room: usize) -> Vec<Polygon> {
        self.room_cells(room)
            .into_iter()
            .map(|cell| clean_loop(self.diagram.boundary(cell)))
            .filter(|polygon| polygon.len() >= 3)
            .collect()
    }
}
