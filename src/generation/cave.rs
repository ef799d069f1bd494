//! # Cave Generation
//!
//! The staged pipeline that turns a seed and a start position into a
//! connected cave level.
//!
//! Stages run strictly in sequence over one owned grid; each stage sees the
//! fully mutated output of the one before it:
//!
//! 1. Initialize: all wall, floor under the player
//! 2. Carve: randomized single-pass cellular mutation
//! 3. Remove small walls: dissolve wall pockets below a size threshold
//! 4. Isolate the main cave: keep only what the player can reach, or
//!    discard the attempt when too little survives
//! 5. Fill small caves and dead ends: cascading cul-de-sac removal,
//!    walling anything a chamber fill severs from the player
//! 6. Compute visibility: per-floor shadowcast sampling
//! 7. Place vegetation: noise-thresholded grass in enclosed areas
//!
//! The carve pass deliberately re-evaluates its neighborhood metric against
//! the grid as it is being mutated, in one shuffled pass rather than to a
//! fixed point; that order dependency is what gives the caves their
//! branching, organic shape, so it must not be "cleaned up" into an
//! iterate-until-stable automaton.

use crate::game::grid::{self, inner_positions, Pos};
use crate::game::level::{Level, TileKind};
use crate::game::{flood_fill, flood_fill_with, group_count, is_surrounded_except, shadowcast};
use crate::generation::{utils, GenerationConfig, Generator};
use crate::{HexcavernError, HexcavernResult};
use log::{debug, info};
use noise::{NoiseFn, Perlin};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, HashSet};

/// Attached cave chambers of exactly these sizes are filled back in.
const SMALL_CAVE_SIZES: [usize; 2] = [2, 3];

/// Cave generator: carve, prune, decorate.
///
/// Carries only the player's start position; all randomness comes from the
/// seeded generator handed to [`Generator::generate`], and every retry seed
/// is drawn from that same stream, so a fixed top-level seed reproduces the
/// whole run including rejected attempts.
///
/// # Examples
///
/// ```
/// use hexcavern::{CaveGenerator, GenerationConfig, Generator, Pos};
/// use hexcavern::generation::utils;
///
/// let config = GenerationConfig::new(12345);
/// let mut rng = utils::create_rng(&config);
/// let generator = CaveGenerator::new(Pos::new(24, 12));
/// let level = generator.generate(&config, &mut rng).unwrap();
/// assert!(generator.validate(&level, &config).is_ok());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CaveGenerator {
    /// Where the player starts; generation guarantees floor here
    pub player_start: Pos,
}

impl CaveGenerator {
    /// Creates a generator for a level starting at `player_start`.
    pub fn new(player_start: Pos) -> Self {
        Self { player_start }
    }

    /// Runs one full carve attempt from `attempt_seed`.
    ///
    /// Returns `None` when the main cave comes out below the configured
    /// fraction of the grid area; the attempt's grid is discarded whole and
    /// nothing of it leaks into the next attempt.
    fn carve_attempt(&self, attempt_seed: u64, config: &GenerationConfig) -> Option<Level> {
        let mut rng = StdRng::seed_from_u64(attempt_seed);
        let noise_seed: u32 = rng.gen();

        let mut level = Level::new(self.player_start);
        carve(&mut level, &mut rng);
        remove_small_walls(&mut level, config.min_wall_group);

        let main_cave = isolate_main_cave(&mut level);
        let required = (grid::area() as f64 * config.min_cave_fraction).ceil() as usize;
        if main_cave.len() < required {
            debug!(
                "main cave covers {} of {} required tiles, discarding attempt",
                main_cave.len(),
                required
            );
            return None;
        }

        fill_small_caves(&mut level);
        let visibility = compute_visibility(&level);
        place_vegetation(&mut level, &visibility, noise_seed, config);
        Some(level)
    }
}

impl Generator<Level> for CaveGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> HexcavernResult<Level> {
        for attempt in 0..config.max_attempts {
            // Each attempt runs from its own derived seed; the derivation is
            // a pure function of the caller's rng state, so retries stay
            // reproducible.
            let attempt_seed: u64 = rng.gen();
            if let Some(level) = self.carve_attempt(attempt_seed, config) {
                debug!("cave generated on attempt {}", attempt + 1);
                return Ok(level);
            }
            info!("undersized main cave on attempt {}, reseeding", attempt + 1);
        }
        Err(HexcavernError::GenerationFailed(format!(
            "no attempt out of {} produced a main cave covering {:.0}% of the grid",
            config.max_attempts,
            config.min_cave_fraction * 100.0
        )))
    }

    fn validate(&self, level: &Level, _config: &GenerationConfig) -> HexcavernResult<()> {
        utils::validate_level(level)
    }

    fn generator_type(&self) -> &'static str {
        "CaveGenerator"
    }
}

/// Stage 2: the cellular carve.
///
/// Visits every inner position once, in an order shuffled by the seeded
/// generator, converting wall tiles whose passable neighborhood does not
/// form exactly one contiguous run. The group count is evaluated against
/// the grid mid-mutation, not a snapshot.
fn carve(level: &mut Level, rng: &mut StdRng) {
    let mut order: Vec<Pos> = inner_positions().collect();
    order.shuffle(rng);

    for pos in order {
        if level.tile(pos) == TileKind::Wall
            && group_count(pos, |p| level.is_passable(p)) != 1
        {
            level.set_tile(pos, TileKind::Floor);
        }
    }
    debug!(
        "carve pass left {} floor tiles",
        inner_positions().filter(|&p| level.is_passable(p)).count()
    );
}

/// Stage 3: dissolve small wall groups.
///
/// Partitions the inner wall tiles into connected groups with one persistent
/// visited set, so each wall belongs to exactly one group, and floors any
/// group smaller than `min_wall_group`.
fn remove_small_walls(level: &mut Level, min_wall_group: usize) {
    let mut visited = HashSet::new();
    for pos in inner_positions() {
        let mut group = Vec::new();
        flood_fill_with(
            pos,
            |p| p.in_inner_bounds() && level.tile(p) == TileKind::Wall,
            &mut visited,
            |p| group.push(p),
        );
        if !group.is_empty() && group.len() < min_wall_group {
            for p in group {
                level.set_tile(p, TileKind::Floor);
            }
        }
    }
}

/// Stage 4: wall off everything the player cannot reach.
///
/// Returns the main cave so the caller can apply the size rejection rule.
fn isolate_main_cave(level: &mut Level) -> HashSet<Pos> {
    let main_cave = flood_fill(level.player_pos, |p| level.is_passable(p));
    for pos in inner_positions() {
        if level.is_passable(pos) && !main_cave.contains(&pos) {
            level.set_tile(pos, TileKind::Wall);
        }
    }
    main_cave
}

/// A cave tile: passable with a single contiguous passable neighborhood.
/// Junction tiles (several runs) connect caves but belong to none.
fn is_cave(level: &Level, pos: Pos) -> bool {
    level.is_passable(pos) && group_count(pos, |p| level.is_passable(p)) == 1
}

/// A dead end: a single-group passable tile with at most one cave neighbor.
fn is_dead_end(level: &Level, pos: Pos) -> bool {
    level.is_passable(pos)
        && group_count(pos, |p| level.is_passable(p)) == 1
        && is_surrounded_except(pos, |p| !is_cave(level, p))
}

/// Walls up the dead end at `start`, if it is one, and cascades: removing a
/// tile can turn its neighbors into new dead ends, so they are re-checked
/// until the work list drains.
///
/// If a removal would swallow the tile the player stands on, the player is
/// relocated to the first remaining passable neighbor first; the start
/// position must never end up on a wall.
fn fill_dead_ends(level: &mut Level, start: Pos) {
    let mut pending = vec![start];
    while let Some(pos) = pending.pop() {
        if !is_dead_end(level, pos) {
            continue;
        }
        if pos == level.player_pos {
            let refuge = pos.neighbors().into_iter().find(|&n| level.is_passable(n));
            match refuge {
                Some(next) => level.player_pos = next,
                // A lone floor tile holding the player stays.
                None => continue,
            }
        }
        level.set_tile(pos, TileKind::Wall);
        pending.extend(pos.neighbors());
    }
}

/// Walls every passable tile no longer reachable from the player.
///
/// A filled chamber may have been the only path to other passable tiles.
/// Such severed tiles are not dead ends (an isolated tile has no passable
/// neighbors at all, and a severed pocket can be arbitrarily large), so
/// dead-end cleanup never reclaims them. Returns the walled tiles so the
/// caller can re-check their surroundings.
fn wall_unreachable(level: &mut Level) -> Vec<Pos> {
    let reachable = flood_fill(level.player_pos, |p| level.is_passable(p));
    let severed: Vec<Pos> = inner_positions()
        .filter(|&p| level.is_passable(p) && !reachable.contains(&p))
        .collect();
    for &p in &severed {
        level.set_tile(p, TileKind::Wall);
    }
    severed
}

/// Stage 5: fill small caves and dead ends.
///
/// One scan over the inner positions, no visited set: a later fix can
/// invalidate an earlier one, so every position gets a fresh look. Each
/// visit first drains dead ends reachable from the position, then fills the
/// position's cave chamber outright if only 2 or 3 tiles of it remain,
/// walling whatever that fill severs from the player and re-running
/// dead-end cleanup around the holes.
fn fill_small_caves(level: &mut Level) {
    for pos in inner_positions() {
        fill_dead_ends(level, pos);
        if !is_cave(level, pos) {
            continue;
        }

        let region = flood_fill(pos, |p| is_cave(level, p));
        if !SMALL_CAVE_SIZES.contains(&region.len()) {
            continue;
        }
        // Deterministic processing order; HashSet iteration is not.
        let mut tiles: Vec<Pos> = region.iter().copied().collect();
        tiles.sort();

        if region.contains(&level.player_pos) {
            let exit = tiles
                .iter()
                .flat_map(|&p| p.neighbors())
                .find(|&n| !region.contains(&n) && level.is_passable(n));
            match exit {
                Some(next) => level.player_pos = next,
                None => continue,
            }
        }
        for &p in &tiles {
            level.set_tile(p, TileKind::Wall);
        }
        // The chamber may have been the sole bridge to other tiles.
        let severed = wall_unreachable(level);
        for p in tiles.iter().chain(severed.iter()).copied() {
            for neighbor in p.neighbors() {
                fill_dead_ends(level, neighbor);
            }
        }
    }
}

/// Stage 6: per-tile visibility sampling.
///
/// For every inner floor tile, counts the floor tiles its shadowcast
/// reveals. Consumed by vegetation placement and then discarded.
fn compute_visibility(level: &Level) -> HashMap<Pos, u32> {
    let mut visibility = HashMap::new();
    for pos in inner_positions() {
        if level.tile(pos) != TileKind::Floor {
            continue;
        }
        let mut floors_seen = 0u32;
        shadowcast(
            pos,
            |p| level.tile(p) == TileKind::Floor,
            |p| {
                if level.tile(p) == TileKind::Floor {
                    floors_seen += 1;
                }
            },
        );
        visibility.insert(pos, floors_seen);
    }
    visibility
}

/// Stage 7: vegetation.
///
/// Samples a seeded 3-D Perlin field per tile, with the third axis skewed to
/// `-(x + y)` so the noise stays isotropic across the sheared grid, and
/// shifts the sample into `[0, 2]`. Tiles whose visibility falls below the
/// noise-scaled lower threshold get tall grass, below the upper threshold
/// short grass; everything else keeps its floor. Purely additive: grass is
/// placed on open tiles only, so connectivity cannot change. The player's
/// tile is skipped to keep its floor guarantee.
fn place_vegetation(
    level: &mut Level,
    visibility: &HashMap<Pos, u32>,
    noise_seed: u32,
    config: &GenerationConfig,
) {
    let perlin = Perlin::new(noise_seed);
    for pos in inner_positions() {
        if level.tile(pos) == TileKind::Wall || pos == level.player_pos {
            continue;
        }
        let Some(&seen) = visibility.get(&pos) else {
            continue;
        };
        let (x, y) = pos.coords();
        let sample = perlin.get([
            f64::from(x) * config.noise_zoom,
            f64::from(y) * config.noise_zoom,
            f64::from(-(x + y)) * config.noise_zoom,
        ]) + 1.0;

        let seen = f64::from(seen);
        if seen < sample * config.tall_grass_visibility {
            level.set_tile(pos, TileKind::TallGrass);
        } else if seen < sample * config.short_grass_visibility {
            level.set_tile(pos, TileKind::ShortGrass);
        }
    }
}
