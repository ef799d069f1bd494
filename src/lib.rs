//! # Hexcavern
//!
//! Deterministic cave-level generation on a hex-projected grid.
//!
//! ## Architecture Overview
//!
//! Hexcavern is the map-synthesis core of a grid-based exploration game. It
//! is organized around three layers, leaf to root:
//!
//! - **Coordinate System**: an opaque [`Pos`] id that bijects to `(x, y)`
//!   coordinates inside a fixed trapezoidal outline (a rectangle sheared to
//!   approximate a hexagonal layout)
//! - **Grid Topology**: neighbor enumeration, flood fill, connectivity-group
//!   counting, and symmetric shadowcasting over that outline
//! - **Cave Generation Pipeline**: the staged algorithm that carves, prunes,
//!   and decorates a [`Level`] from an integer seed and a start position
//!
//! Everything downstream of the finished level (movement, rendering, input,
//! persistence) lives in other crates. The generator only promises that
//! [`generate`] is a pure function of its seed and start position.
//!
//! ## Determinism
//!
//! Generation, including its internal rejection-and-retry loop, is driven
//! entirely by a seeded [`rand::rngs::StdRng`] and a seeded Perlin field, so
//! two calls with the same arguments produce identical levels.

pub mod game;
pub mod generation;

pub use game::{
    flood_fill, flood_fill_with, group_count, inner_positions, is_surrounded_except, positions,
    shadowcast, Direction, Level, Pos, TileKind,
};
pub use generation::{generate, CaveGenerator, GenerationConfig, Generator};

/// Core error type for the hexcavern crate.
#[derive(thiserror::Error, Debug)]
pub enum HexcavernError {
    /// A generated or supplied level violates a structural invariant
    #[error("invalid level state: {0}")]
    InvalidState(String),

    /// Generation failed
    #[error("generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type used throughout the hexcavern codebase.
pub type HexcavernResult<T> = Result<T, HexcavernError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fixed grid-shape constants.
///
/// The level outline is a single fixed shape: every generated level shares
/// these dimensions, and [`Pos`] ids are only meaningful with respect to
/// them.
pub mod config {
    /// Level width in tiles (upper bound on `x`)
    pub const MAP_WIDTH: i32 = 48;

    /// Level height in tiles (number of rows)
    pub const MAP_HEIGHT: i32 = 24;
}
