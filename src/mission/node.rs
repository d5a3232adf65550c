//! Mission node types

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A gameplay mechanic a challenge is built from, e.g. `"jump"` or `"stealth"`
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Mechanic(pub String);

impl Mechanic {
    pub fn new(name: impl Into<String>) -> Self {
        Mechanic(name.into())
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Mechanic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One step of level progression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissionNode {
    /// Where the player starts
    Entrance,
    /// A challenge whose reward opens `Lock { key }` with the same number
    Key {
        key: usize,
        /// Never empty; repeats allowed
        mechanics: Vec<Mechanic>,
    },
    /// Passable once `Key { key }` has been collected
    Lock { key: usize },
    /// Optional space with no progression role
    Exploration,
    /// Where the level ends
    Goal,
}

/// Discriminant of a [`MissionNode`] without its payload
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Entrance,
    Key,
    Lock,
    Exploration,
    Goal,
}

impl MissionNode {
    pub fn kind(&self) -> NodeKind {
        match self {
            MissionNode::Entrance => NodeKind::Entrance,
            MissionNode::Key { .. } => NodeKind::Key,
            MissionNode::Lock { .. } => NodeKind::Lock,
            MissionNode::Exploration => NodeKind::Exploration,
            MissionNode::Goal => NodeKind::Goal,
        }
    }

    /// Pairing number of a key or lock
    pub fn pairing(&self) -> Option<usize> {
        match self {
            MissionNode::Key { key, .. } | MissionNode::Lock { key } => Some(*key),
            _ => None,
        }
    }
}

impl fmt::Display for MissionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissionNode::Entrance => write!(f, "Entrance"),
            MissionNode::Key { key, mechanics } => {
                let names: Vec<&str> = mechanics.iter().map(Mechanic::name).collect();
                write!(f, "Key {} | challenge: {}", key, names.join(", "))
            }
            MissionNode::Lock { key } => write!(f, "Lock {}", key),
            MissionNode::Exploration => write!(f, "Exploration"),
            MissionNode::Goal => write!(f, "Goal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_pairing() {
        let key = MissionNode::Key {
            key: 2,
            mechanics: vec![Mechanic::new("jump")],
        };
        assert_eq!(key.kind(), NodeKind::Key);
        assert_eq!(key.pairing(), Some(2));
        assert_eq!(MissionNode::Lock { key: 2 }.pairing(), Some(2));
        assert_eq!(MissionNode::Goal.pairing(), None);
        assert_eq!(MissionNode::Exploration.kind(), NodeKind::Exploration);
    }

    #[test]
    fn test_display() {
        let key = MissionNode::Key {
            key: 0,
            mechanics: vec![Mechanic::new("jump"), Mechanic::new("swim")],
        };
        assert_eq!(key.to_string(), "Key 0 | challenge: jump, swim");
        assert_eq!(MissionNode::Lock { key: 0 }.to_string(), "Lock 0");
        assert_eq!(MissionNode::Entrance.to_string(), "Entrance");
    }
}
