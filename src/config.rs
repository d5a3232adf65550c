//! Level Configuration and Builder
//!
//! This module provides configuration types for deterministic level generation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};
use crate::generation::LloydOptions;
use crate::mission::{Connectivity, Mechanic, MissionParams, MAX_MECHANICS_PER_CHALLENGE};
use crate::placement::{Neighborhood, PlacementParams};
use crate::rng::seed_from_str;

/// Upper bound on relaxation rounds accepted by the builders
pub const MAX_LLOYD_ITERATIONS: usize = 20;

/// Configuration for mission-driven level generation
///
/// The same configuration always produces the identical level, unless
/// `entropy_tie_break` is set.
///
/// # Example
///
/// ```rust
/// use voronoi_level_layout::*;
///
/// let config = LevelConfigBuilder::new()
///     .seed(42)
///     .challenge_count(2)
///     .exploration_count(1)
///     .build()
///     .unwrap();
///
/// # #[cfg(feature = "serde")]
/// # {
/// let json = serde_json::to_string(&config).unwrap();
/// let restored: LevelConfig = serde_json::from_str(&json).unwrap();
/// assert_eq!(config, restored);
/// # }
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct LevelConfig {
    /// Seed of the first attempt; attempt `i` uses `seed + i`
    pub seed: u64,

    /// Mission graph shape
    pub mission: MissionParams,

    /// Tile grid and diagram settings
    pub placement: PlacementParams,

    /// Full pipeline runs before giving up
    pub max_attempts: usize,

    /// Route corridor cells between connected rooms that do not touch
    pub corridors: bool,

    /// Seed the cosmetic tie-break stream from OS entropy
    pub entropy_tie_break: bool,
}

impl LevelConfig {
    /// Check the combined settings
    pub fn validate(&self) -> Result<()> {
        self.mission.validate()?;
        self.placement.validate()?;
        if self.max_attempts == 0 {
            return Err(LayoutError::InvalidConfig(
                "max attempts must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            mission: MissionParams::default(),
            placement: PlacementParams::default(),
            max_attempts: 10,
            corridors: true,
            entropy_tie_break: false,
        }
    }
}

/// Builder for creating LevelConfig with validation
///
/// # Example
///
/// ```rust
/// use voronoi_level_layout::*;
///
/// let config = LevelConfigBuilder::new()
///     .seed_str("lelele")
///     .challenge_count(3)
///     .connectivity(Connectivity::BoundedDegree { max_degree: 3 })
///     .unwrap()
///     .sites_per_tile(6)
///     .unwrap()
///     .build()
///     .unwrap();
/// assert_eq!(config.placement.sites_per_tile, 6);
/// ```
#[derive(Debug, Clone)]
pub struct LevelConfigBuilder {
    seed: Option<u64>,
    mission: MissionParams,
    placement: PlacementParams,
    max_attempts: usize,
    corridors: bool,
    entropy_tie_break: bool,
}

impl LevelConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: Random (generated from thread_rng)
    /// - 3 challenges, 3 explorations, linear connectivity
    /// - 100-unit tiles with 4 sites each, four-neighborhood
    /// - no relaxation, 10 attempts, corridors on
    pub fn new() -> Self {
        let defaults = LevelConfig::default();
        Self {
            seed: None,
            mission: defaults.mission,
            placement: defaults.placement,
            max_attempts: defaults.max_attempts,
            corridors: defaults.corridors,
            entropy_tie_break: defaults.entropy_tie_break,
        }
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Seed from text, hashed the same way as every other string seed
    pub fn seed_str(mut self, seed: &str) -> Self {
        self.seed = Some(seed_from_str(seed));
        self
    }

    pub fn challenge_count(mut self, count: usize) -> Self {
        self.mission.challenge_count = count;
        self
    }

    pub fn exploration_count(mut self, count: usize) -> Self {
        self.mission.exploration_count = count;
        self
    }

    /// # Errors
    ///
    /// Returns `InvalidConfig` for a bounded degree of 0
    pub fn connectivity(mut self, connectivity: Connectivity) -> Result<Self> {
        if let Connectivity::BoundedDegree { max_degree: 0 } = connectivity {
            return Err(LayoutError::InvalidConfig(
                "max degree must be >= 1 (got 0)".to_string(),
            ));
        }
        self.mission.connectivity = connectivity;
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns `InvalidConfig` if `mechanics` is empty
    pub fn mechanics(mut self, mechanics: Vec<Mechanic>) -> Result<Self> {
        if mechanics.is_empty() {
            return Err(LayoutError::InvalidConfig(
                "mechanics must not be empty".to_string(),
            ));
        }
        self.mission.mechanics = mechanics;
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns `InvalidConfig` unless `max` is in `1..=MAX_MECHANICS_PER_CHALLENGE`
    pub fn max_mechanics_per_challenge(mut self, max: usize) -> Result<Self> {
        if !(1..=MAX_MECHANICS_PER_CHALLENGE).contains(&max) {
            return Err(LayoutError::InvalidConfig(format!(
                "max mechanics per challenge must be in 1..={} (got {})",
                MAX_MECHANICS_PER_CHALLENGE, max
            )));
        }
        self.mission.max_mechanics_per_challenge = max;
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns `InvalidConfig` unless `size` is positive and finite
    pub fn tile_size(mut self, size: f32) -> Result<Self> {
        if !size.is_finite() || size <= 0.0 {
            return Err(LayoutError::InvalidConfig(format!(
                "tile size must be positive (got {})",
                size
            )));
        }
        self.placement.tile_size = size;
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns `InvalidConfig` if `count` is 0
    pub fn sites_per_tile(mut self, count: usize) -> Result<Self> {
        if count == 0 {
            return Err(LayoutError::InvalidConfig(
                "sites per tile must be >= 1 (got 0)".to_string(),
            ));
        }
        self.placement.sites_per_tile = count;
        Ok(self)
    }

    /// Fraction of each tile side kept free of sites
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` unless `fraction` is in `[0, 0.5)`
    pub fn border_fraction(mut self, fraction: f32) -> Result<Self> {
        if !(0.0..0.5).contains(&fraction) {
            return Err(LayoutError::InvalidConfig(format!(
                "border fraction must be in [0, 0.5) (got {})",
                fraction
            )));
        }
        self.placement.border_fraction = fraction;
        Ok(self)
    }

    pub fn neighborhood(mut self, neighborhood: Neighborhood) -> Self {
        self.placement.neighborhood = neighborhood;
        self
    }

    /// Placements undone by the first backtrack at a dead end; 0 disables backtracking
    pub fn backtrack_depth(mut self, depth: usize) -> Self {
        self.placement.backtrack_depth = depth;
        self
    }

    pub fn backtrack_budget(mut self, budget: usize) -> Self {
        self.placement.backtrack_budget = budget;
        self
    }

    /// Set the number of Lloyd's Relaxation rounds applied to the level diagram
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if iterations > 20 (excessive and impractical)
    pub fn lloyd_iterations(mut self, iterations: usize) -> Result<Self> {
        if iterations > MAX_LLOYD_ITERATIONS {
            return Err(LayoutError::InvalidConfig(format!(
                "Lloyd iterations must be <= {} (got {})",
                MAX_LLOYD_ITERATIONS, iterations
            )));
        }
        self.placement.lloyd_iterations = iterations;
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns `InvalidConfig` if `attempts` is 0
    pub fn max_attempts(mut self, attempts: usize) -> Result<Self> {
        if attempts == 0 {
            return Err(LayoutError::InvalidConfig(
                "max attempts must be >= 1 (got 0)".to_string(),
            ));
        }
        self.max_attempts = attempts;
        Ok(self)
    }

    pub fn corridors(mut self, enabled: bool) -> Self {
        self.corridors = enabled;
        self
    }

    pub fn entropy_tie_break(mut self, enabled: bool) -> Self {
        self.entropy_tie_break = enabled;
        self
    }

    /// Build the configuration
    ///
    /// If no seed was provided, generates a random seed using thread_rng.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if challenges are requested without mechanics
    pub fn build(self) -> Result<LevelConfig> {
        let config = LevelConfig {
            seed: self.seed.unwrap_or_else(rand::random),
            mission: self.mission,
            placement: self.placement,
            max_attempts: self.max_attempts,
            corridors: self.corridors,
            entropy_tie_break: self.entropy_tie_break,
        };
        config.validate()?;
        Ok(config)
    }
}

impl Default for LevelConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for a single-diagram room layout
///
/// Sites are scattered over one `width` x `height` rectangle and `room_count`
/// rooms of `room_size` cells are grown on the result.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RoomLayoutConfig {
    pub width: f32,
    pub height: f32,
    pub site_count: usize,
    /// Text seed for sites; room `i` grows from seed `"{seed}{i}"`
    pub seed: String,
    /// Relaxation applied before growing rooms
    pub relaxation: Option<LloydOptions>,
    pub room_count: usize,
    pub room_size: i32,
}

impl Default for RoomLayoutConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 1000.0,
            site_count: 150,
            seed: "lelele".to_string(),
            relaxation: None,
            room_count: 1,
            room_size: 3,
        }
    }
}

impl RoomLayoutConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.width.is_finite() && self.height.is_finite()) || self.width <= 0.0 || self.height <= 0.0 {
            return Err(LayoutError::InvalidConfig(format!(
                "layout size must be positive (got {} x {})",
                self.width, self.height
            )));
        }
        if self.site_count == 0 {
            return Err(LayoutError::EmptySiteSet);
        }
        if self.room_size < 1 {
            return Err(LayoutError::InvalidRoomSize(self.room_size));
        }
        if let Some(options) = self.relaxation {
            if options.max_iterations > MAX_LLOYD_ITERATIONS {
                return Err(LayoutError::InvalidConfig(format!(
                    "Lloyd iterations must be <= {} (got {})",
                    MAX_LLOYD_ITERATIONS, options.max_iterations
                )));
            }
        }
        Ok(())
    }
}
