//! # Level Representation
//!
//! Tile kinds and the finished level aggregate handed to the game layers.

use crate::game::grid::{self, Pos};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The terrain kinds a tile can hold.
///
/// Grass kinds are decorative variants of floor assigned only after
/// connectivity is finalized, so pruning decisions never see them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Impassable rock
    Wall,
    /// Plain open ground
    Floor,
    /// Dense vegetation placed in enclosed, low-visibility areas
    TallGrass,
    /// Sparse vegetation placed in moderately enclosed areas
    ShortGrass,
    /// Reserved for the lake pass; never placed by cave generation
    ShallowWater,
}

impl TileKind {
    /// Whether this kind counts as open terrain.
    ///
    /// The generator treats every non-wall kind as passable; the movement
    /// layer's terrain table owns the final passability decision for
    /// decorative kinds.
    pub fn is_passable(self) -> bool {
        self != TileKind::Wall
    }
}

/// A finished, immutable cave level.
///
/// `tiles` is a total mapping: its key set is exactly the set of in-bounds
/// positions of the fixed outline, and the tile at `player_pos` is always
/// [`TileKind::Floor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    /// Terrain for every in-bounds position
    pub tiles: HashMap<Pos, TileKind>,
    /// The player's starting position
    pub player_pos: Pos,
}

impl Level {
    /// Creates the initial grid state for generation: every in-bounds
    /// position is wall except the player start, which is floor.
    pub fn new(player_pos: Pos) -> Level {
        let mut tiles: HashMap<Pos, TileKind> =
            grid::positions().map(|pos| (pos, TileKind::Wall)).collect();
        tiles.insert(player_pos, TileKind::Floor);
        Level { tiles, player_pos }
    }

    /// The tile at `pos`.
    ///
    /// Total over all constructible positions, so no `Option`: a missing
    /// entry would mean the level invariant is already broken.
    pub fn tile(&self, pos: Pos) -> TileKind {
        self.tiles[&pos]
    }

    /// Replaces the tile at `pos`.
    pub fn set_tile(&mut self, pos: Pos, kind: TileKind) {
        self.tiles.insert(pos, kind);
    }

    /// Whether the tile at `pos` is open terrain.
    pub fn is_passable(&self, pos: Pos) -> bool {
        self.tile(pos).is_passable()
    }
}
