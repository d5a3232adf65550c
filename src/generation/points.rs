//! Random site distribution
//!
//! Sites are drawn uniformly inside a rectangle from the level's main random
//! stream. Each draw consumes exactly two values (x then y), so the same seed
//! and call sequence always lands on the same coordinates.

use glam::Vec2;

use crate::geometry::Rect;
use crate::rng::LevelRng;

/// Draw `count` uniformly distributed sites inside `bounds`
///
/// # Example
///
/// ```rust
/// use voronoi_level_layout::generation::generate_sites;
/// use voronoi_level_layout::{LevelRng, Rect};
///
/// let mut rng = LevelRng::from_seed_str("lelele");
/// let sites = generate_sites(150, Rect::from_size(1000.0, 1000.0), &mut rng);
/// assert_eq!(sites.len(), 150);
/// ```
pub fn generate_sites(count: usize, bounds: Rect, rng: &mut LevelRng) -> Vec<Vec2> {
    (0..count)
        .map(|_| {
            let x = rng.next_float(bounds.min.x, bounds.max.x);
            let y = rng.next_float(bounds.min.y, bounds.max.y);
            Vec2::new(x, y)
        })
        .collect()
}

/// Same as [`generate_sites`] with a fresh generator seeded from text
pub fn generate_sites_seeded(count: usize, bounds: Rect, seed: &str) -> Vec<Vec2> {
    let mut rng = LevelRng::from_seed_str(seed);
    generate_sites(count, bounds, &mut rng)
}
