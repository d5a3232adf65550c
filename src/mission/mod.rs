//! Mission graphs: what the player must do, in what order
//!
//! A mission graph is built from an entrance, a goal, key/lock challenge
//! pairs and exploration nodes. Keys always enter the graph before their locks.

mod node;
mod graph;
mod generator;

pub use node::{Mechanic, MissionNode, NodeKind};
pub use graph::{ConnectorType, MissionEdge, MissionGraph, NodeId};
pub use generator::{Connectivity, MissionGraphGenerator, MissionParams, DEFAULT_MAX_DEGREE, MAX_MECHANICS_PER_CHALLENGE};
