//! # Coordinate System
//!
//! Positions on the fixed hex-projected level outline.
//!
//! The playable area is a rectangular grid sheared into a parallelogram:
//! row `y` admits `x` in `[xmin(y), xmax(y))` where `xmin(y)` shrinks and
//! `xmax(y)` grows tighter as `y` advances. Treating `(x, y)` as axial hex
//! coordinates, the six [`Direction`]s below are the unit steps of a
//! hexagonal neighborhood, which is why the outline approximates a hex map
//! when rendered with alternate rows offset by half a tile.

use crate::config::{MAP_HEIGHT, MAP_WIDTH};
use serde::{Deserialize, Serialize};

/// Smallest valid `x` for the given row.
pub fn row_min_x(y: i32) -> i32 {
    (MAP_HEIGHT - y) / 2
}

/// One past the largest valid `x` for the given row.
pub fn row_max_x(y: i32) -> i32 {
    MAP_WIDTH - y / 2
}

fn coords_in_bounds(x: i32, y: i32) -> bool {
    (0..MAP_HEIGHT).contains(&y) && x >= row_min_x(y) && x < row_max_x(y)
}

/// An opaque identifier for one tile of the level outline.
///
/// A `Pos` bijects to a coordinate pair within the outline; it can only be
/// constructed for in-bounds coordinates, so every `Pos` in circulation is a
/// valid tile and topology primitives never need bounds `Result`s.
///
/// # Examples
///
/// ```
/// use hexcavern::Pos;
///
/// let pos = Pos::new(20, 3);
/// assert_eq!(pos.coords(), (20, 3));
/// assert_eq!(Pos::new(pos.x(), pos.y()), pos);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Pos(i32);

impl Pos {
    /// Creates the position at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates fall outside the level outline. Handing an
    /// out-of-bounds coordinate to the grid is an internal-consistency
    /// failure, not a recoverable condition; use [`Pos::try_new`] for
    /// coordinates produced by blind arithmetic.
    pub fn new(x: i32, y: i32) -> Pos {
        assert!(
            coords_in_bounds(x, y),
            "coordinates ({x}, {y}) are outside the level outline"
        );
        Pos(y * MAP_WIDTH + x)
    }

    /// Creates the position at `(x, y)`, or `None` if it is out of bounds.
    pub fn try_new(x: i32, y: i32) -> Option<Pos> {
        coords_in_bounds(x, y).then(|| Pos(y * MAP_WIDTH + x))
    }

    /// The x coordinate of this position.
    pub fn x(self) -> i32 {
        self.0 % MAP_WIDTH
    }

    /// The y coordinate (row) of this position.
    pub fn y(self) -> i32 {
        self.0 / MAP_WIDTH
    }

    /// Both coordinates of this position.
    pub fn coords(self) -> (i32, i32) {
        (self.x(), self.y())
    }

    /// Whether this position lies strictly inside the outline, off the
    /// one-tile border.
    ///
    /// ```
    /// use hexcavern::Pos;
    ///
    /// assert!(!Pos::new(20, 0).in_inner_bounds());
    /// assert!(Pos::new(20, 3).in_inner_bounds());
    /// ```
    pub fn in_inner_bounds(self) -> bool {
        let (x, y) = self.coords();
        y > 0 && y < MAP_HEIGHT - 1 && x > row_min_x(y) && x < row_max_x(y) - 1
    }

    /// The neighbor one step in `dir`, or `None` at the edge of the outline.
    pub fn step(self, dir: Direction) -> Option<Pos> {
        let (dx, dy) = dir.to_delta();
        Pos::try_new(self.x() + dx, self.y() + dy)
    }

    /// All in-bounds neighbors in ring order.
    ///
    /// Positions outside the outline are simply absent, so tiles on the
    /// border return fewer than six neighbors.
    pub fn neighbors(self) -> Vec<Pos> {
        Direction::all().iter().filter_map(|&dir| self.step(dir)).collect()
    }

    /// The full six-slot neighbor ring in circular order.
    ///
    /// Unlike [`Pos::neighbors`] this keeps out-of-bounds slots as `None`,
    /// which run-counting over the ring relies on.
    pub fn neighbor_ring(self) -> [Option<Pos>; 6] {
        Direction::all().map(|dir| self.step(dir))
    }
}

/// The six hex directions of the sheared grid, in circular ring order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    East,
    Northeast,
    Northwest,
    West,
    Southwest,
    Southeast,
}

impl Direction {
    /// Converts a direction to an axial coordinate delta.
    ///
    /// # Examples
    ///
    /// ```
    /// use hexcavern::Direction;
    ///
    /// assert_eq!(Direction::East.to_delta(), (1, 0));
    /// assert_eq!(Direction::Northeast.to_delta(), (1, -1));
    /// ```
    pub fn to_delta(self) -> (i32, i32) {
        match self {
            Direction::East => (1, 0),
            Direction::Northeast => (1, -1),
            Direction::Northwest => (0, -1),
            Direction::West => (-1, 0),
            Direction::Southwest => (-1, 1),
            Direction::Southeast => (0, 1),
        }
    }

    /// All six directions, ordered so that consecutive entries (wrapping
    /// around) are adjacent on the hex ring.
    pub fn all() -> [Direction; 6] {
        [
            Direction::East,
            Direction::Northeast,
            Direction::Northwest,
            Direction::West,
            Direction::Southwest,
            Direction::Southeast,
        ]
    }
}

/// Lazily enumerates every in-bounds position in row-major order
/// (`y` ascending, then `x` ascending).
///
/// Several pipeline passes mutate the grid while scanning this enumeration,
/// so the order is part of the generator's contract, not a convenience.
pub fn positions() -> impl Iterator<Item = Pos> {
    (0..MAP_HEIGHT).flat_map(|y| (row_min_x(y)..row_max_x(y)).map(move |x| Pos::new(x, y)))
}

/// Like [`positions`], restricted to inner positions.
pub fn inner_positions() -> impl Iterator<Item = Pos> {
    (1..MAP_HEIGHT - 1)
        .flat_map(|y| (row_min_x(y) + 1..row_max_x(y) - 1).map(move |x| Pos::new(x, y)))
}

/// Total number of in-bounds positions.
pub fn area() -> usize {
    (0..MAP_HEIGHT).map(|y| (row_max_x(y) - row_min_x(y)) as usize).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_coordinate_roundtrip() {
        for pos in positions() {
            let (x, y) = pos.coords();
            assert_eq!(Pos::new(x, y), pos);
            assert_eq!(Pos::try_new(x, y), Some(pos));
        }
    }

    #[test]
    fn test_row_bounds_shear() {
        // Row 0 starts half the height in; the last row ends half the
        // width early.
        assert_eq!(row_min_x(0), MAP_HEIGHT / 2);
        assert_eq!(row_max_x(0), MAP_WIDTH);
        assert_eq!(row_min_x(MAP_HEIGHT - 1), 0);
        assert_eq!(row_max_x(MAP_HEIGHT - 1), MAP_WIDTH - (MAP_HEIGHT - 1) / 2);
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        assert_eq!(Pos::try_new(row_min_x(0) - 1, 0), None);
        assert_eq!(Pos::try_new(row_max_x(5), 5), None);
        assert_eq!(Pos::try_new(20, -1), None);
        assert_eq!(Pos::try_new(20, MAP_HEIGHT), None);
    }

    #[test]
    #[should_panic(expected = "outside the level outline")]
    fn test_new_panics_out_of_bounds() {
        let _ = Pos::new(-1, 0);
    }

    #[test]
    fn test_positions_row_major_and_unique() {
        let all: Vec<Pos> = positions().collect();
        assert_eq!(all.len(), area());

        let unique: HashSet<Pos> = all.iter().copied().collect();
        assert_eq!(unique.len(), all.len());

        for pair in all.windows(2) {
            let (ax, ay) = pair[0].coords();
            let (bx, by) = pair[1].coords();
            assert!(by > ay || (by == ay && bx > ax), "enumeration must be row-major");
        }
    }

    #[test]
    fn test_positions_restartable() {
        let first: Vec<Pos> = positions().collect();
        let second: Vec<Pos> = positions().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_inner_positions_are_inner() {
        let inner: HashSet<Pos> = inner_positions().collect();
        for pos in positions() {
            assert_eq!(inner.contains(&pos), pos.in_inner_bounds());
        }
    }

    #[test]
    fn test_inner_position_has_six_neighbors() {
        for pos in inner_positions() {
            assert_eq!(pos.neighbors().len(), 6, "inner position {pos:?}");
            assert!(pos.neighbor_ring().iter().all(Option::is_some));
        }
    }

    #[test]
    fn test_neighbor_steps_are_involutive() {
        let pos = Pos::new(20, 10);
        assert_eq!(pos.step(Direction::East).and_then(|p| p.step(Direction::West)), Some(pos));
        assert_eq!(
            pos.step(Direction::Northeast).and_then(|p| p.step(Direction::Southwest)),
            Some(pos)
        );
        assert_eq!(
            pos.step(Direction::Northwest).and_then(|p| p.step(Direction::Southeast)),
            Some(pos)
        );
    }

    #[test]
    fn test_border_positions_lose_neighbors() {
        let corner = Pos::new(row_min_x(0), 0);
        assert!(corner.neighbors().len() < 6);
    }
}
