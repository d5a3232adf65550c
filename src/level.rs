//! Level generation pipeline
//!
//! mission graph -> grid placement -> diagram -> room cells + corridors.
//! A failed attempt is thrown away whole and the pipeline reruns with the next
//! seed; nothing from a failed attempt leaks into the result.

use std::collections::HashSet;

use log::{info, warn};

use crate::config::{LevelConfig, RoomLayoutConfig};
use crate::diagram::VoronoiDiagram;
use crate::error::{LayoutError, Result};
use crate::generation::generate_sites_seeded;
use crate::geometry::{clean_loop, Rect};
use crate::layout::Layout;
use crate::mission::{MissionGraph, MissionGraphGenerator};
use crate::placement::{place, Placement};
use crate::rng::LevelRng;
use crate::room::grow_room;
use crate::router::route_cells;

/// A generated level
#[derive(Debug, Clone)]
pub struct Level {
    seed: u64,
    attempt: usize,
    graph: MissionGraph,
    placement: Placement,
    layout: Layout,
}

impl Level {
    /// Seed of the attempt that succeeded
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Zero-based index of the attempt that succeeded
    #[inline]
    pub fn attempt(&self) -> usize {
        self.attempt
    }

    #[inline]
    pub fn graph(&self) -> &MissionGraph {
        &self.graph
    }

    #[inline]
    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    #[inline]
    pub fn diagram(&self) -> &VoronoiDiagram {
        self.placement.diagram()
    }

    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn into_layout(self) -> Layout {
        self.layout
    }
}

/// Runs the full pipeline with retries
///
/// # Example
///
/// ```rust
/// use voronoi_level_layout::*;
///
/// let config = LevelConfigBuilder::new()
///     .seed(7)
///     .challenge_count(2)
///     .exploration_count(1)
///     .build()
///     .unwrap();
///
/// let level = LevelGenerator::new(config).unwrap().generate().unwrap();
/// assert_eq!(level.graph().node_count(), 7);
/// assert!(!level.layout().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct LevelGenerator {
    config: LevelConfig,
}

impl LevelGenerator {
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the configuration does not validate
    pub fn new(config: LevelConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[inline]
    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    /// Generate a level, retrying with `seed + attempt` until one succeeds
    ///
    /// # Errors
    ///
    /// `AttemptsExhausted` carrying the error of the final attempt
    pub fn generate(&self) -> Result<Level> {
        let mut last = None;

        for attempt in 0..self.config.max_attempts {
            let seed = self.config.seed.wrapping_add(attempt as u64);
            match self.generate_attempt(seed) {
                Ok(mut level) => {
                    level.attempt = attempt;
                    info!(
                        "level: seed {} succeeded on attempt {}, {} pieces ({} corridor)",
                        seed,
                        attempt + 1,
                        level.layout.len(),
                        level.layout.corridor_count()
                    );
                    return Ok(level);
                }
                Err(err) => {
                    warn!("level: attempt {} with seed {} failed: {}", attempt + 1, seed, err);
                    last = Some(err);
                }
            }
        }

        Err(LayoutError::AttemptsExhausted {
            attempts: self.config.max_attempts,
            last: Box::new(last.unwrap_or_else(|| LayoutError::InvalidConfig("no attempts made".to_string()))),
        })
    }

    /// Run the pipeline once with `seed`, without retrying
    pub fn generate_attempt(&self, seed: u64) -> Result<Level> {
        let mut rng = if self.config.entropy_tie_break {
            LevelRng::with_entropy_tie_break(seed)
        } else {
            LevelRng::from_seed(seed)
        };

        let graph = MissionGraphGenerator::new(self.config.mission.clone()).generate(&mut rng)?;
        let placement = place(&graph, &self.config.placement, &mut rng)?;

        let mut layout = room_layout(&placement);
        if self.config.corridors {
            add_corridors(&graph, &placement, &mut layout)?;
        }

        Ok(Level {
            seed,
            attempt: 0,
            graph,
            placement,
            layout,
        })
    }
}

/// Cells of every mission room in placement order, tagged with their node
fn room_layout(placement: &Placement) -> Layout {
    let mut layout = Layout::new();
    for (room_idx, room) in placement.mission_rooms().iter().enumerate() {
        let Some((node, mission)) = &room.mission else {
            continue;
        };
        for polygon in placement.room_polygons(room_idx) {
            layout.push_room(*node, Some(mission.kind()), polygon);
        }
    }
    layout
}

/// Route between every pair of connected rooms whose cells do not touch
///
/// Only cells outside mission rooms become corridor pieces, each at most once.
fn add_corridors(graph: &MissionGraph, placement: &Placement, layout: &mut Layout) -> Result<()> {
    let diagram = placement.diagram();
    let mut used: HashSet<usize> = HashSet::new();

    for edge in graph.edges() {
        let (Some(room_a), Some(room_b)) = (
            placement.room_index_for_node(edge.a),
            placement.room_index_for_node(edge.b),
        ) else {
            continue;
        };
        let cells_a = placement.room_cells(room_a);
        let cells_b = placement.room_cells(room_b);

        let touching = cells_a
            .iter()
            .any(|&c| diagram.neighbors(c).iter().any(|n| cells_b.contains(n)));
        if touching {
            continue;
        }

        let Some((start, target)) = facing_cells(diagram, &cells_a, &cells_b) else {
            continue;
        };
        for cell in route_cells(diagram, start, target, diagram.site_count())? {
            if placement.is_mission_cell(cell) || !used.insert(cell) {
                continue;
            }
            layout.push_corridor(edge.a, edge.b, clean_loop(diagram.boundary(cell)));
        }
    }

    Ok(())
}

/// Closest pair of cells between two rooms
fn facing_cells(diagram: &VoronoiDiagram, a: &[usize], b: &[usize]) -> Option<(usize, usize)> {
    let sites = diagram.sites();
    a.iter()
        .flat_map(|&ca| b.iter().map(move |&cb| (ca, cb)))
        .min_by(|&(a1, b1), &(a2, b2)| {
            let d1 = sites[a1].distance_squared(sites[b1]);
            let d2 = sites[a2].distance_squared(sites[b2]);
            d1.partial_cmp(&d2).unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// Grow rooms on a single random diagram
///
/// Room `i` grows from origin seed `"{seed}{i}"`. Rooms are independent and
/// may share cells.
///
/// # Example
///
/// ```rust
/// use voronoi_level_layout::*;
///
/// let layout = generate_room_layout(&RoomLayoutConfig::default()).unwrap();
/// assert_eq!(layout.len(), 3);
/// ```
pub fn generate_room_layout(config: &RoomLayoutConfig) -> Result<Layout> {
    config.validate()?;

    let bounds = Rect::from_size(config.width, config.height);
    let sites = generate_sites_seeded(config.site_count, bounds, &config.seed);
    let mut diagram = VoronoiDiagram::build(&sites, bounds)?;
    if let Some(options) = config.relaxation {
        diagram = diagram.relax_with_options(options)?;
    }

    let mut layout = Layout::new();
    for room in 0..config.room_count {
        let origin_seed = format!("{}{}", config.seed, room);
        for polygon in grow_room(&diagram, &origin_seed, config.room_size)? {
            layout.push_room(room, None, polygon);
        }
    }

    info!(
        "room layout: {} rooms, {} pieces over {} sites",
        config.room_count,
        layout.len(),
        diagram.site_count()
    );

    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LevelConfigBuilder;
    use crate::generation::LloydOptions;
    use crate::geometry::signed_area;
    use crate::layout::PieceSource;
    use crate::mission::Connectivity;
    use crate::placement::Neighborhood;

    fn small_config(seed: u64) -> LevelConfig {
        LevelConfigBuilder::new()
            .seed(seed)
            .challenge_count(2)
            .exploration_count(1)
            .build()
            .unwrap()
    }

    #[test]
    fn test_every_node_has_room_pieces() {
        let config = small_config(1);
        let per_tile = config.placement.sites_per_tile;
        let level = LevelGenerator::new(config).unwrap().generate().unwrap();

        assert_eq!(level.graph().node_count(), 7);
        for node in 0..7 {
            assert_eq!(level.layout().room_pieces(node).count(), per_tile);
        }
        for piece in level.layout().pieces() {
            if let PieceSource::Room { room } = piece.source {
                assert_eq!(piece.kind, level.graph().node(room).map(|n| n.kind()));
            }
        }
    }

    #[test]
    fn test_polygons_are_clockwise() {
        let level = LevelGenerator::new(small_config(2)).unwrap().generate().unwrap();
        for polygon in level.layout().polygons() {
            assert!(polygon.len() >= 3);
            assert!(signed_area(polygon) < 0.0);
        }
    }

    #[test]
    fn test_same_seed_same_level() {
        let a = LevelGenerator::new(small_config(3)).unwrap().generate().unwrap();
        let b = LevelGenerator::new(small_config(3)).unwrap().generate().unwrap();
        assert_eq!(a.layout(), b.layout());
        assert_eq!(a.graph(), b.graph());
        assert_eq!(a.seed(), b.seed());
    }

    #[test]
    fn test_seed_advances_per_attempt() {
        let config = small_config(100);
        let generator = LevelGenerator::new(config).unwrap();
        let level = generator.generate().unwrap();
        assert_eq!(level.seed(), 100 + level.attempt() as u64);
    }

    #[test]
    fn test_attempts_exhausted() {
        let config = LevelConfigBuilder::new()
            .seed(0)
            .challenge_count(1)
            .connectivity(Connectivity::BoundedDegree { max_degree: 1 })
            .unwrap()
            .max_attempts(3)
            .unwrap()
            .build()
            .unwrap();

        let err = LevelGenerator::new(config).unwrap().generate().unwrap_err();
        assert_eq!(
            err,
            LayoutError::AttemptsExhausted {
                attempts: 3,
                last: Box::new(LayoutError::DegreeLimitExceeded { max_degree: 1 }),
            }
        );
    }

    #[test]
    fn test_corridors_avoid_mission_cells() {
        let config = LevelConfigBuilder::new()
            .seed(11)
            .challenge_count(3)
            .exploration_count(3)
            .neighborhood(Neighborhood::Eight)
            .build()
            .unwrap();
        let level = LevelGenerator::new(config).unwrap().generate().unwrap();

        let room_loops: Vec<_> = level
            .layout()
            .pieces()
            .iter()
            .filter(|p| !p.is_corridor())
            .map(|p| p.polygon.clone())
            .collect();
        for piece in level.layout().pieces().iter().filter(|p| p.is_corridor()) {
            assert!(piece.kind.is_none());
            assert!(!room_loops.contains(&piece.polygon));
            if let PieceSource::Corridor { from, to } = piece.source {
                assert!(level.graph().edge_between(from, to).is_some());
            }
        }
    }

    #[test]
    fn test_corridors_disabled() {
        let config = LevelConfigBuilder::new()
            .seed(11)
            .neighborhood(Neighborhood::Eight)
            .corridors(false)
            .build()
            .unwrap();
        let level = LevelGenerator::new(config).unwrap().generate().unwrap();
        assert_eq!(level.layout().corridor_count(), 0);
    }

    #[test]
    fn test_relaxed_level() {
        let config = LevelConfigBuilder::new()
            .seed(5)
            .lloyd_iterations(2)
            .unwrap()
            .build()
            .unwrap();
        let level = LevelGenerator::new(config).unwrap().generate().unwrap();
        let sites: usize = level.placement().rooms().iter().map(|r| r.sites.len()).sum();
        assert_eq!(level.diagram().site_count(), sites);
        assert!(!level.layout().is_empty());
    }

    #[test]
    fn test_heavily_relaxed_levels_keep_every_node() {
        for seed in 0..20 {
            let config = LevelConfigBuilder::new()
                .seed(seed)
                .sites_per_tile(1)
                .unwrap()
                .lloyd_iterations(20)
                .unwrap()
                .build()
                .unwrap();
            let Ok(level) = LevelGenerator::new(config).unwrap().generate() else {
                continue;
            };
            for node in 0..level.graph().node_count() {
                assert_eq!(level.layout().room_pieces(node).count(), 1, "seed {} node {}", seed, node);
            }
        }
    }

    #[test]
    fn test_room_layout_default() {
        let layout = generate_room_layout(&RoomLayoutConfig::default()).unwrap();
        assert_eq!(layout.len(), 3);
        assert_eq!(layout.room_pieces(0).count(), 3);
    }

    #[test]
    fn test_room_layout_multiple_rooms() {
        let config = RoomLayoutConfig {
            room_count: 4,
            room_size: 2,
            relaxation: Some(LloydOptions::default()),
            ..RoomLayoutConfig::default()
        };
        let layout = generate_room_layout(&config).unwrap();
        for room in 0..4 {
            assert_eq!(layout.room_pieces(room).count(), 2);
        }
    }

    #[test]
    fn test_room_layout_invalid() {
        let config = RoomLayoutConfig {
            room_size: 0,
            ..RoomLayoutConfig::default()
        };
        assert_eq!(generate_room_layout(&config), Err(LayoutError::InvalidRoomSize(0)));
    }
}
