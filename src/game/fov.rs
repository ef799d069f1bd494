//! # Field of View
//!
//! Symmetric shadowcasting over the hex-projected grid.
//!
//! The sweep divides the plane into six sextants, one per pair of adjacent
//! ring directions, and scans each sextant ring by ring while narrowing a
//! pair of slope bounds around opaque tiles. Slopes are exact rationals
//! compared by cross-multiplication, so visibility is symmetric: if A sees
//! B then B sees A for the same transparency predicate. Tiles outside the
//! outline are treated as opaque, which also bounds the sweep.

use crate::config::{MAP_HEIGHT, MAP_WIDTH};
use crate::game::grid::{Direction, Pos};
use std::collections::HashSet;

/// Rings beyond this are entirely outside the outline for any origin.
const MAX_DEPTH: i32 = MAP_WIDTH + MAP_HEIGHT;

/// Calls `on_reveal` exactly once for every position visible from `origin`
/// through `is_transparent` tiles, the origin itself included.
///
/// Opaque tiles on the edge of a shadow are revealed (walls bounding a cave
/// are visible), but nothing behind them is.
pub fn shadowcast<T, R>(origin: Pos, is_transparent: T, mut on_reveal: R)
where
    T: Fn(Pos) -> bool,
    R: FnMut(Pos),
{
    let mut revealed = HashSet::new();
    revealed.insert(origin);
    on_reveal(origin);

    let dirs = Direction::all();
    for sextant in 0..6 {
        let mut scan = SextantScan {
            origin,
            ring_dir: dirs[sextant].to_delta(),
            sweep_dir: dirs[(sextant + 1) % 6].to_delta(),
            is_transparent: &is_transparent,
            revealed: &mut revealed,
            on_reveal: &mut on_reveal,
        };
        scan.run(1, Slope::new(0, 1), Slope::new(1, 1));
    }
}

/// A slope `num / den` with `den > 0`, compared without floating point.
#[derive(Debug, Clone, Copy)]
struct Slope {
    num: i32,
    den: i32,
}

impl Slope {
    fn new(num: i32, den: i32) -> Self {
        Self { num, den }
    }
}

/// One sextant of the sweep: ring `depth` spans the cells
/// `origin + ring_dir * (depth - col) + sweep_dir * col` for `col` in
/// `0..=depth`, and `col / depth` is the slope of a cell's center.
struct SextantScan<'a, T, R> {
    origin: Pos,
    ring_dir: (i32, i32),
    sweep_dir: (i32, i32),
    is_transparent: &'a T,
    revealed: &'a mut HashSet<Pos>,
    on_reveal: &'a mut R,
}

impl<T, R> SextantScan<'_, T, R>
where
    T: Fn(Pos) -> bool,
    R: FnMut(Pos),
{
    fn cell(&self, depth: i32, col: i32) -> Option<Pos> {
        let (ox, oy) = self.origin.coords();
        let x = ox + self.ring_dir.0 * (depth - col) + self.sweep_dir.0 * col;
        let y = oy + self.ring_dir.1 * (depth - col) + self.sweep_dir.1 * col;
        Pos::try_new(x, y)
    }

    fn reveal(&mut self, pos: Pos) {
        // Sextants overlap on their shared axis; reveal each tile once.
        if self.revealed.insert(pos) {
            (self.on_reveal)(pos);
        }
    }

    /// A transparent cell is revealed only if its center lies within the
    /// slope window. Revealing by center (rather than by any overlap) is
    /// what makes the sweep symmetric.
    fn center_in_window(depth: i32, col: i32, start: Slope, end: Slope) -> bool {
        col * start.den >= start.num * depth && col * end.den <= end.num * depth
    }

    fn run(&mut self, depth: i32, start: Slope, end: Slope) {
        if depth > MAX_DEPTH {
            return;
        }
        let min_col = round_half_up(start.num * depth, start.den);
        let max_col = round_half_down(end.num * depth, end.den);

        let mut start = start;
        let mut prev_opaque: Option<bool> = None;
        for col in min_col..=max_col {
            let pos = self.cell(depth, col);
            let opaque = pos.map_or(true, |p| !(self.is_transparent)(p));

            if let Some(p) = pos {
                if opaque || Self::center_in_window(depth, col, start, end) {
                    self.reveal(p);
                }
            }
            // The near edge of a cell at `col` has slope (2col - 1) / (2depth).
            if prev_opaque == Some(true) && !opaque {
                start = Slope::new(2 * col - 1, 2 * depth);
            }
            if prev_opaque == Some(false) && opaque {
                self.run(depth + 1, start, Slope::new(2 * col - 1, 2 * depth));
            }
            prev_opaque = Some(opaque);
        }
        if prev_opaque == Some(false) {
            self.run(depth + 1, start, end);
        }
    }
}

/// `round(num / den)` with ties rounding up.
fn round_half_up(num: i32, den: i32) -> i32 {
    (2 * num + den).div_euclid(2 * den)
}

/// `round(num / den)` with ties rounding down.
fn round_half_down(num: i32, den: i32) -> i32 {
    -((den - 2 * num).div_euclid(2 * den))
}
