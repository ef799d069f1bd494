//! # Game Module
//!
//! World representation for generated cave levels.
//!
//! This module contains the pieces the generation pipeline is built from:
//! - Coordinate system for the fixed hex-projected level outline
//! - Tile kinds and the [`Level`] output aggregate
//! - Topology primitives: flood fill, group counting, surround predicates
//! - Field-of-view via symmetric shadowcasting

pub mod fov;
pub mod grid;
pub mod level;
pub mod topology;

pub use fov::*;
pub use grid::*;
pub use level::*;
pub use topology::*;
