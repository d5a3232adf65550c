//! Mission graph construction under the key-before-lock constraint
//!
//! All nodes are created up front as unplaced pools. They are then drawn one
//! at a time with a fixed priority (exploration, key, unlocked lock) and wired
//! into the graph as they are drawn, so construction order is node ID order.

use log::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::graph::{ConnectorType, MissionGraph, NodeId};
use super::node::{Mechanic, MissionNode};
use crate::error::{LayoutError, Result};
use crate::rng::LevelRng;

/// Default maximum degree for [`Connectivity::BoundedDegree`]
pub const DEFAULT_MAX_DEGREE: usize = 3;

/// Largest accepted [`MissionParams::max_mechanics_per_challenge`]
pub const MAX_MECHANICS_PER_CHALLENGE: usize = 64;

/// How drawn nodes are attached to the graph
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connectivity {
    /// Every node follows the previous one; the graph is a single chain
    #[default]
    Linear,
    /// Every node hangs off a random existing node with spare degree
    BoundedDegree { max_degree: usize },
}

/// Parameters for mission graph generation
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct MissionParams {
    /// Number of key/lock pairs
    pub challenge_count: usize,
    /// Number of exploration nodes
    pub exploration_count: usize,
    pub connectivity: Connectivity,
    /// Mechanics challenges are assembled from
    pub mechanics: Vec<Mechanic>,
    /// Upper bound on mechanics per key, in `1..=MAX_MECHANICS_PER_CHALLENGE`
    pub max_mechanics_per_challenge: usize,
}

impl Default for MissionParams {
    fn default() -> Self {
        Self {
            challenge_count: 3,
            exploration_count: 3,
            connectivity: Connectivity::Linear,
            mechanics: vec![Mechanic::new("jump"), Mechanic::new("combat"), Mechanic::new("stealth")],
            max_mechanics_per_challenge: 1,
        }
    }
}

impl MissionParams {
    /// Total node count including entrance and goal
    pub fn node_count(&self) -> usize {
        2 * self.challenge_count + self.exploration_count + 2
    }

    /// Returns `InvalidConfig` for settings that cannot produce a graph
    pub fn validate(&self) -> Result<()> {
        if self.challenge_count > 0 && self.mechanics.is_empty() {
            return Err(LayoutError::InvalidConfig(
                "challenges need at least one mechanic".to_string(),
            ));
        }
        if !(1..=MAX_MECHANICS_PER_CHALLENGE).contains(&self.max_mechanics_per_challenge) {
            return Err(LayoutError::InvalidConfig(format!(
                "max mechanics per challenge must be in 1..={} (got {})",
                MAX_MECHANICS_PER_CHALLENGE, self.max_mechanics_per_challenge
            )));
        }
        if let Connectivity::BoundedDegree { max_degree } = self.connectivity {
            if max_degree < 1 {
                return Err(LayoutError::InvalidConfig(format!(
                    "max degree must be >= 1 (got {})",
                    max_degree
                )));
            }
        }
        Ok(())
    }
}

/// Builds mission graphs from [`MissionParams`]
#[derive(Debug, Clone)]
pub struct MissionGraphGenerator {
    params: MissionParams,
}

/// Nodes created but not yet drawn into the graph
struct Pools {
    keys: Vec<MissionNode>,
    locks: Vec<MissionNode>,
    explorations: Vec<MissionNode>,
    unlocked: Vec<usize>,
}

impl Pools {
    fn remaining(&self) -> usize {
        self.keys.len() + self.locks.len() + self.explorations.len()
    }

    /// Draw the next node by priority: exploration, key, then an unlocked lock
    fn draw(&mut self, rng: &mut LevelRng) -> Result<MissionNode> {
        if self.explorations.len() > self.keys.len() {
            let idx = rng.uniform_index(self.explorations.len()).unwrap_or(0);
            return Ok(self.explorations.remove(idx));
        }

        if !self.keys.is_empty() && self.keys.len() >= self.locks.len() {
            let idx = rng.uniform_index(self.keys.len()).unwrap_or(0);
            let key = self.keys.remove(idx);
            if let Some(n) = key.pairing() {
                self.unlocked.push(n);
            }
            return Ok(key);
        }

        // Cosmetic order only, so it comes from the tie-break stream
        rng.shuffle(&mut self.locks);
        let position = self
            .locks
            .iter()
            .position(|lock| lock.pairing().is_some_and(|n| self.unlocked.contains(&n)));

        match position {
            Some(idx) => Ok(self.locks.remove(idx)),
            None => {
                let mut remaining: Vec<usize> = self.locks.iter().filter_map(MissionNode::pairing).collect();
                remaining.sort_unstable();
                Err(LayoutError::UnsatisfiableLockOrdering { remaining })
            }
        }
    }
}

impl MissionGraphGenerator {
    pub fn new(params: MissionParams) -> Self {
        Self { params }
    }

    #[inline]
    pub fn params(&self) -> &MissionParams {
        &self.params
    }

    /// Build one mission graph
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` if the parameters fail validation
    /// - `UnsatisfiableLockOrdering` if only locks without placed keys remain
    /// - `DegreeLimitExceeded` if bounded-degree mode finds no attachment point
    pub fn generate(&self, rng: &mut LevelRng) -> Result<MissionGraph> {
        self.params.validate()?;

        let mut pools = self.create_pools(rng);
        let mut graph = MissionGraph::new();
        let entrance = graph.add_node(MissionNode::Entrance);
        let mut previous = entrance;

        while pools.remaining() > 0 {
            let node = pools.draw(rng)?;
            let id = graph.add_node(node);
            self.attach(&mut graph, id, previous, rng)?;
            previous = id;
        }

        let goal = graph.add_node(MissionNode::Goal);
        self.attach(&mut graph, goal, previous, rng)?;

        debug!(
            "mission: {} nodes, {} edges\n{}",
            graph.node_count(),
            graph.edge_count(),
            graph
        );

        Ok(graph)
    }

    /// Create every key, lock, and exploration node
    fn create_pools(&self, rng: &mut LevelRng) -> Pools {
        let mut keys = Vec::with_capacity(self.params.challenge_count);
        let mut locks = Vec::with_capacity(self.params.challenge_count);

        for n in 0..self.params.challenge_count {
            keys.push(MissionNode::Key {
                key: n,
                mechanics: self.random_mechanics(rng),
            });
            locks.push(MissionNode::Lock { key: n });
        }

        Pools {
            keys,
            locks,
            explorations: vec![MissionNode::Exploration; self.params.exploration_count],
            unlocked: Vec::new(),
        }
    }

    /// Between 1 and the configured maximum mechanics, repeats allowed
    fn random_mechanics(&self, rng: &mut LevelRng) -> Vec<Mechanic> {
        let max = self.params.max_mechanics_per_challenge.clamp(1, MAX_MECHANICS_PER_CHALLENGE) as i32;
        let count = rng.next_int(1, max + 1) as usize;
        (0..count)
            .filter_map(|_| rng.uniform_choice(&self.params.mechanics).cloned())
            .collect()
    }

    /// Wire a freshly added node into the graph
    fn attach(&self, graph: &mut MissionGraph, id: NodeId, previous: NodeId, rng: &mut LevelRng) -> Result<()> {
        let connector = ConnectorType::random(rng);

        match self.params.connectivity {
            Connectivity::Linear => {
                graph.add_edge(previous, id, connector);
            }
            Connectivity::BoundedDegree { max_degree } => {
                let eligible: Vec<NodeId> = (0..id).filter(|&n| graph.degree(n) < max_degree).collect();
                let Some(&parent) = rng.uniform_choice(&eligible) else {
                    warn!("mission: no node below degree {} for node {}", max_degree, id);
                    return Err(LayoutError::DegreeLimitExceeded { max_degree });
                };
                graph.add_edge(parent, id, connector);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mission::node::NodeKind;

    fn params(challenges: usize, explorations: usize, connectivity: Connectivity) -> MissionParams {
        MissionParams {
            challenge_count: challenges,
            exploration_count: explorations,
            connectivity,
            mechanics: vec![Mechanic::new("jump"), Mechanic::new("swim")],
            max_mechanics_per_challenge: 3,
        }
    }

    #[test]
    fn test_linear_two_challenges_one_exploration() {
        let generator = MissionGraphGenerator::new(params(2, 1, Connectivity::Linear));
        let graph = generator.generate(&mut LevelRng::from_seed(1)).unwrap();

        assert_eq!(graph.node_count(), 7);
        assert_eq!(graph.edge_count(), 6);

        let count = |kind| graph.nodes().iter().filter(|n| n.kind() == kind).count();
        assert_eq!(count(NodeKind::Entrance), 1);
        assert_eq!(count(NodeKind::Key), 2);
        assert_eq!(count(NodeKind::Lock), 2);
        assert_eq!(count(NodeKind::Exploration), 1);
        assert_eq!(count(NodeKind::Goal), 1);

        // A single chain: entrance and goal are the only leaves
        let walk = graph.walk_from_entrance();
        assert_eq!(walk, (0..7).collect::<Vec<_>>());
        assert_eq!(graph.degree(0), 1);
        assert_eq!(graph.degree(6), 1);
        for id in 1..6 {
            assert_eq!(graph.degree(id), 2);
        }
        assert_eq!(graph.node(6), Some(&MissionNode::Goal));
    }

    #[test]
    fn test_keys_before_locks_across_seeds() {
        for seed in 0..200 {
            for connectivity in [
                Connectivity::Linear,
                Connectivity::BoundedDegree {
                    max_degree: DEFAULT_MAX_DEGREE,
                },
            ] {
                let generator = MissionGraphGenerator::new(params(4, 3, connectivity));
                let graph = generator.generate(&mut LevelRng::from_seed(seed)).unwrap();
                assert!(graph.keys_precede_locks(), "seed {} broke key order", seed);
                assert!(graph.is_connected());
                assert_eq!(graph.node_count(), 13);
            }
        }
    }

    #[test]
    fn test_key_mechanics_non_empty() {
        let generator = MissionGraphGenerator::new(params(5, 0, Connectivity::Linear));
        let graph = generator.generate(&mut LevelRng::from_seed(3)).unwrap();
        for node in graph.nodes() {
            if let MissionNode::Key { mechanics, .. } = node {
                assert!(!mechanics.is_empty());
                assert!(mechanics.len() <= 3);
            }
        }
    }

    #[test]
    fn test_bounded_degree_respects_limit() {
        let generator = MissionGraphGenerator::new(params(3, 4, Connectivity::BoundedDegree { max_degree: 3 }));
        let graph = generator.generate(&mut LevelRng::from_seed(11)).unwrap();
        assert_eq!(graph.edge_count(), graph.node_count() - 1);
        for id in 0..graph.node_count() {
            assert!(graph.degree(id) <= 3);
        }
    }

    #[test]
    fn test_degree_one_fails() {
        let generator = MissionGraphGenerator::new(params(1, 1, Connectivity::BoundedDegree { max_degree: 1 }));
        assert_eq!(
            generator.generate(&mut LevelRng::from_seed(0)),
            Err(LayoutError::DegreeLimitExceeded { max_degree: 1 })
        );
    }

    #[test]
    fn test_empty_mission() {
        let generator = MissionGraphGenerator::new(params(0, 0, Connectivity::Linear));
        let graph = generator.generate(&mut LevelRng::from_seed(0)).unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_same_seed_same_graph() {
        let generator = MissionGraphGenerator::new(params(3, 2, Connectivity::Linear));
        let a = generator.generate(&mut LevelRng::from_seed(42)).unwrap();
        let b = generator.generate(&mut LevelRng::from_seed(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_params() {
        let mut p = params(2, 0, Connectivity::Linear);
        p.mechanics.clear();
        assert!(matches!(p.validate(), Err(LayoutError::InvalidConfig(_))));

        let mut p = params(2, 0, Connectivity::Linear);
        p.max_mechanics_per_challenge = 0;
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_mechanics_cap() {
        let mut p = params(2, 0, Connectivity::Linear);
        p.max_mechanics_per_challenge = MAX_MECHANICS_PER_CHALLENGE;
        assert!(p.validate().is_ok());

        p.max_mechanics_per_challenge = usize::MAX;
        assert!(matches!(p.validate(), Err(LayoutError::InvalidConfig(_))));
        assert!(matches!(
            MissionGraphGenerator::new(p).generate(&mut LevelRng::from_seed(0)),
            Err(LayoutError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_connectivity_defaults_to_linear() {
        assert_eq!(Connectivity::default(), Connectivity::Linear);
        assert_eq!(MissionParams::default().connectivity, Connectivity::default());
    }

    #[test]
    fn test_lock_without_drawn_key_is_unsatisfiable() {
        let mut pools = Pools {
            keys: vec![],
            locks: vec![MissionNode::Lock { key: 0 }],
            explorations: vec![],
            unlocked: vec![],
        };
        assert_eq!(
            pools.draw(&mut LevelRng::from_seed(0)),
            Err(LayoutError::UnsatisfiableLockOrdering { remaining: vec![0] })
        );
        assert_eq!(pools.remaining(), 1);
    }

    #[test]
    fn test_node_count_formula() {
        assert_eq!(params(2, 1, Connectivity::Linear).node_count(), 7);
    }
}
