//! Undirected mission graph
//!
//! Nodes are stored in the order they were added, so a node's ID is also its
//! position in construction order. The key-before-lock check relies on that.

use std::fmt;

use super::node::{MissionNode, NodeKind};
use crate::rng::LevelRng;

/// Index of a node in its [`MissionGraph`]
pub type NodeId = usize;

/// How two connected nodes are joined in the level
///
/// Carried as the edge weight; the numeric weight is `1..=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectorType {
    /// Open walkway
    Passage,
    /// Closable doorway
    Door,
    /// One-way drop or vent
    Shortcut,
}

impl ConnectorType {
    const ALL: [ConnectorType; 3] = [ConnectorType::Passage, ConnectorType::Door, ConnectorType::Shortcut];

    #[inline]
    pub fn weight(self) -> u8 {
        match self {
            ConnectorType::Passage => 1,
            ConnectorType::Door => 2,
            ConnectorType::Shortcut => 3,
        }
    }

    /// Uniform connector drawn from the main stream
    pub fn random(rng: &mut LevelRng) -> Self {
        let idx = rng.next_int(0, Self::ALL.len() as i32) as usize;
        Self::ALL[idx]
    }
}

/// Undirected weighted edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissionEdge {
    pub a: NodeId,
    pub b: NodeId,
    pub connector: ConnectorType,
}

impl MissionEdge {
    /// The endpoint that is not `node`
    pub fn other(&self, node: NodeId) -> NodeId {
        if self.a == node {
            self.b
        } else {
            self.a
        }
    }
}

/// Progression graph built incrementally by the generator
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MissionGraph {
    nodes: Vec<MissionNode>,
    edges: Vec<MissionEdge>,
    adjacency: Vec<Vec<NodeId>>,
}

impl MissionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node; the returned ID is its construction index
    pub fn add_node(&mut self, node: MissionNode) -> NodeId {
        self.nodes.push(node);
        self.adjacency.push(Vec::new());
        self.nodes.len() - 1
    }

    /// Connect two existing nodes
    ///
    /// Self-loops, duplicate edges and unknown IDs are ignored and return `false`.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId, connector: ConnectorType) -> bool {
        if a == b || a >= self.nodes.len() || b >= self.nodes.len() || self.adjacency[a].contains(&b) {
            return false;
        }
        self.edges.push(MissionEdge { a, b, connector });
        self.adjacency[a].push(b);
        self.adjacency[b].push(a);
        true
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&MissionNode> {
        self.nodes.get(id)
    }

    #[inline]
    pub fn nodes(&self) -> &[MissionNode] {
        &self.nodes
    }

    #[inline]
    pub fn edges(&self) -> &[MissionEdge] {
        &self.edges
    }

    /// Neighbors in the order their edges were added
    pub fn neighbors(&self, id: NodeId) -> &[NodeId] {
        self.adjacency.get(id).map(|n| n.as_slice()).unwrap_or(&[])
    }

    #[inline]
    pub fn degree(&self, id: NodeId) -> usize {
        self.neighbors(id).len()
    }

    /// Edge between `a` and `b`, if any
    pub fn edge_between(&self, a: NodeId, b: NodeId) -> Option<&MissionEdge> {
        self.edges
            .iter()
            .find(|e| (e.a == a && e.b == b) || (e.a == b && e.b == a))
    }

    /// First node of the given kind
    pub fn find_kind(&self, kind: NodeKind) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.kind() == kind)
    }

    #[inline]
    pub fn entrance(&self) -> Option<NodeId> {
        self.find_kind(NodeKind::Entrance)
    }

    #[inline]
    pub fn goal(&self) -> Option<NodeId> {
        self.find_kind(NodeKind::Goal)
    }

    /// Depth-first preorder from the entrance, following edges in insertion order
    ///
    /// For a linear graph this is the chain from entrance to goal.
    pub fn walk_from_entrance(&self) -> Vec<NodeId> {
        let Some(start) = self.entrance() else {
            return Vec::new();
        };

        let mut visited = vec![false; self.nodes.len()];
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![start];

        while let Some(node) = stack.pop() {
            if visited[node] {
                continue;
            }
            visited[node] = true;
            order.push(node);
            // Reverse so the first-added neighbor is visited first
            for &next in self.neighbors(node).iter().rev() {
                if !visited[next] {
                    stack.push(next);
                }
            }
        }

        order
    }

    /// Every node reachable from the entrance
    pub fn is_connected(&self) -> bool {
        !self.nodes.is_empty() && self.walk_from_entrance().len() == self.nodes.len()
    }

    /// Every lock has its key, added strictly earlier
    pub fn keys_precede_locks(&self) -> bool {
        self.nodes.iter().enumerate().all(|(lock_idx, node)| match node {
            MissionNode::Lock { key } => self.nodes[..lock_idx]
                .iter()
                .any(|n| matches!(n, MissionNode::Key { key: k, .. } if k == key)),
            _ => true,
        })
    }
}

impl fmt::Display for MissionGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (step, id) in self.walk_from_entrance().into_iter().enumerate() {
            if step > 0 {
                writeln!(f)?;
            }
            write!(f, "{:>2}: {}", id, self.nodes[id])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mission::node::Mechanic;

    fn chain() -> MissionGraph {
        let mut graph = MissionGraph::new();
        let entrance = graph.add_node(MissionNode::Entrance);
        let key = graph.add_node(MissionNode::Key {
            key: 0,
            mechanics: vec![Mechanic::new("jump")],
        });
        let lock = graph.add_node(MissionNode::Lock { key: 0 });
        let goal = graph.add_node(MissionNode::Goal);
        graph.add_edge(entrance, key, ConnectorType::Passage);
        graph.add_edge(key, lock, ConnectorType::Door);
        graph.add_edge(lock, goal, ConnectorType::Passage);
        graph
    }

    #[test]
    fn test_add_edge_rules() {
        let mut graph = chain();
        assert!(!graph.add_edge(0, 0, ConnectorType::Passage));
        assert!(!graph.add_edge(0, 1, ConnectorType::Passage));
        assert!(!graph.add_edge(1, 0, ConnectorType::Passage));
        assert!(!graph.add_edge(0, 99, ConnectorType::Passage));
        assert_eq!(graph.edge_count(), 3);
        assert!(graph.add_edge(0, 3, ConnectorType::Shortcut));
        assert_eq!(graph.degree(0), 2);
    }

    #[test]
    fn test_walk_and_connectivity() {
        let graph = chain();
        assert_eq!(graph.walk_from_entrance(), vec![0, 1, 2, 3]);
        assert!(graph.is_connected());

        let mut split = chain();
        split.add_node(MissionNode::Exploration);
        assert!(!split.is_connected());
    }

    #[test]
    fn test_keys_precede_locks() {
        assert!(chain().keys_precede_locks());

        let mut bad = MissionGraph::new();
        bad.add_node(MissionNode::Entrance);
        bad.add_node(MissionNode::Lock { key: 0 });
        bad.add_node(MissionNode::Key {
            key: 0,
            mechanics: vec![Mechanic::new("jump")],
        });
        assert!(!bad.keys_precede_locks());
    }

    #[test]
    fn test_display_prints_each_node_once() {
        let printed = chain().to_string();
        assert_eq!(printed.lines().count(), 4);
        assert_eq!(printed.matches("Goal").count(), 1);
    }

    #[test]
    fn test_edge_lookup() {
        let graph = chain();
        let edge = graph.edge_between(2, 1).unwrap();
        assert_eq!(edge.connector, ConnectorType::Door);
        assert_eq!(edge.other(1), 2);
        assert!(graph.edge_between(0, 3).is_none());
        assert_eq!(ConnectorType::Shortcut.weight(), 3);
    }
}
