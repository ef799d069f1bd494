//! # Generation Module
//!
//! Procedural cave synthesis for a single level.
//!
//! The module exposes one entry point, [`generate`], which runs the staged
//! cave pipeline in [`cave`] for a seed and a start position. Configuration
//! and randomness plumbing follow the same shape as the rest of the
//! codebase: a serializable config struct, an [`StdRng`] owned by the call,
//! and a [`Generator`] trait at the seam so alternative level styles can be
//! slotted in later.

pub mod cave;

pub use cave::*;

use crate::game::{flood_fill, positions, Level, Pos, TileKind};
use crate::{HexcavernError, HexcavernResult};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// Configuration for cave generation.
///
/// Controls the pruning thresholds and the vegetation tuning. Everything
/// here is deterministic given `seed`; two configs with equal fields always
/// generate identical levels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Upper bound on carve attempts before generation gives up
    pub max_attempts: u32,
    /// Minimum fraction of the grid area the main cave must cover
    pub min_cave_fraction: f64,
    /// Wall groups smaller than this are dissolved into floor
    pub min_wall_group: usize,
    /// Zoom factor applied to grid coordinates before noise sampling
    pub noise_zoom: f64,
    /// Noise-scaled visibility threshold below which tall grass grows
    pub tall_grass_visibility: f64,
    /// Noise-scaled visibility threshold below which short grass grows
    pub short_grass_visibility: f64,
}

impl GenerationConfig {
    /// Creates the default generation configuration for a seed.
    ///
    /// # Examples
    ///
    /// ```
    /// use hexcavern::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(12345);
    /// assert_eq!(config.seed, 12345);
    /// assert!(config.min_cave_fraction > 0.0);
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            max_attempts: 64,
            min_cave_fraction: 0.25,
            min_wall_group: 6,
            noise_zoom: 0.15,
            tall_grass_visibility: 15.0,
            short_grass_visibility: 40.0,
        }
    }

    /// Creates a configuration for tests: identical pruning semantics, but
    /// a tight attempt budget so a broken rejection loop fails fast.
    pub fn for_testing(seed: u64) -> Self {
        Self { max_attempts: 8, ..Self::new(seed) }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Trait for procedural generators.
///
/// Level-producing algorithms implement this so callers can swap generation
/// styles behind one interface and reuse the same validation.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number
    /// generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> HexcavernResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> HexcavernResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Generates the cave level for `seed` with the player starting at
/// `player_pos`.
///
/// Pure and deterministic: the same arguments always produce an identical
/// [`Level`], internal retries included.
///
/// # Examples
///
/// ```
/// use hexcavern::{generate, Pos, TileKind};
///
/// let start = Pos::new(24, 12);
/// let level = generate(7, start).unwrap();
/// assert_eq!(level.tiles[&start], TileKind::Floor);
/// ```
pub fn generate(seed: u64, player_pos: Pos) -> HexcavernResult<Level> {
    let config = GenerationConfig::new(seed);
    let mut rng = utils::create_rng(&config);
    CaveGenerator::new(player_pos).generate(&config, &mut rng)
}

/// Utility functions shared by generation algorithms.
pub mod utils {
    use super::*;
    use rand::SeedableRng;

    /// Creates a seeded random number generator from the config.
    pub fn create_rng(config: &GenerationConfig) -> StdRng {
        StdRng::seed_from_u64(config.seed)
    }

    /// Validates that a level meets the structural requirements every
    /// finished cave must satisfy.
    ///
    /// Checks that the tile mapping is total over the outline, that the
    /// player stands on floor, and that every passable tile is reachable
    /// from the player (no disconnected islands).
    pub fn validate_level(level: &Level) -> HexcavernResult<()> {
        let mut total = 0usize;
        for pos in positions() {
            if !level.tiles.contains_key(&pos) {
                return Err(HexcavernError::InvalidState(format!(
                    "missing tile entry at {pos:?}"
                )));
            }
            total += 1;
        }
        if level.tiles.len() != total {
            return Err(HexcavernError::InvalidState(format!(
                "tile mapping has {} entries for {} in-bounds positions",
                level.tiles.len(),
                total
            )));
        }

        if level.tile(level.player_pos) != TileKind::Floor {
            return Err(HexcavernError::InvalidState(format!(
                "player position {:?} holds {:?}, not floor",
                level.player_pos,
                level.tile(level.player_pos)
            )));
        }

        let reachable = flood_fill(level.player_pos, |p| level.is_passable(p));
        let passable = positions().filter(|&p| level.is_passable(p)).count();
        if reachable.len() != passable {
            return Err(HexcavernError::InvalidState(format!(
                "{} passable tiles but only {} reachable from the player",
                passable,
                reachable.len()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::grid;

    #[test]
    fn test_generation_config_creation() {
        let config = GenerationConfig::new(12345);
        assert_eq!(config.seed, 12345);
        assert!(config.max_attempts > 0);
        assert!(config.min_cave_fraction > 0.0 && config.min_cave_fraction < 1.0);
        assert!(config.tall_grass_visibility < config.short_grass_visibility);
    }

    #[test]
    fn test_validate_level_accepts_fresh_grid() {
        // A fresh grid is all wall plus the player's floor tile: total
        // mapping, player on floor, one reachable passable tile.
        let level = Level::new(Pos::new(24, 12));
        assert!(utils::validate_level(&level).is_ok());
    }

    #[test]
    fn test_validate_level_rejects_player_on_wall() {
        let mut level = Level::new(Pos::new(24, 12));
        level.set_tile(level.player_pos, TileKind::Wall);
        assert!(utils::validate_level(&level).is_err());
    }

    #[test]
    fn test_validate_level_rejects_disconnected_floor() {
        let mut level = Level::new(Pos::new(24, 12));
        // An island with no path to the player.
        level.set_tile(Pos::new(30, 5), TileKind::Floor);
        assert!(utils::validate_level(&level).is_err());
    }

    #[test]
    fn test_validate_level_rejects_missing_entry() {
        let mut level = Level::new(Pos::new(24, 12));
        let victim = grid::positions().find(|&p| p != level.player_pos).unwrap();
        level.tiles.remove(&victim);
        assert!(utils::validate_level(&level).is_err());
    }

    #[test]
    fn test_create_rng_is_deterministic() {
        use rand::Rng;

        let config = GenerationConfig::new(999);
        let a: u64 = utils::create_rng(&config).gen();
        let b: u64 = utils::create_rng(&config).gen();
        assert_eq!(a, b);
    }
}
