//! # Grid Topology
//!
//! Connectivity primitives over the level outline: flood fill in two
//! presentations, the circular-run group count the carving heuristic is
//! built on, and the surround predicate that identifies dead ends.
//!
//! All predicates are plain closures over positions. The callers decide what
//! "member" or "passable" means against whatever grid snapshot they hold;
//! nothing here touches tile storage directly.

use crate::game::grid::Pos;
use std::collections::{HashSet, VecDeque};

/// Flood fill threading a caller-supplied visited set.
///
/// Walks the region of positions connected to `start` through
/// `is_member`-satisfying neighbors, calling `on_visit` exactly once per
/// discovered position. Starts only if `is_member(start)` holds and `start`
/// has not been visited already, so repeated calls over an enumeration
/// partition the members into disjoint regions.
pub fn flood_fill_with<M, V>(start: Pos, is_member: M, visited: &mut HashSet<Pos>, mut on_visit: V)
where
    M: Fn(Pos) -> bool,
    V: FnMut(Pos),
{
    if !is_member(start) || !visited.insert(start) {
        return;
    }
    let mut queue = VecDeque::new();
    queue.push_back(start);
    on_visit(start);
    while let Some(pos) = queue.pop_front() {
        for neighbor in pos.neighbors() {
            if is_member(neighbor) && visited.insert(neighbor) {
                queue.push_back(neighbor);
                on_visit(neighbor);
            }
        }
    }
}

/// Flood fill returning the connected region as a fresh set.
///
/// Returns the empty set when `is_member(start)` does not hold.
pub fn flood_fill<M>(start: Pos, is_member: M) -> HashSet<Pos>
where
    M: Fn(Pos) -> bool,
{
    // The visited set of a fresh scan is exactly the region, so a no-op
    // visitor keeps a single traversal implementation for both variants.
    let mut region = HashSet::new();
    flood_fill_with(start, is_member, &mut region, |_| {});
    region
}

/// Counts the maximal contiguous runs of `passable` neighbors around `pos`,
/// treating the six-slot ring as circular.
///
/// This approximates how many separate open regions touch the tile: `1` is
/// a cave-interior or single-corridor tile, `0` a fully enclosed one, and
/// anything else a junction. Ring slots outside the outline count as
/// impassable.
///
/// # Examples
///
/// ```
/// use hexcavern::{group_count, Pos};
///
/// // No passable neighbors at all.
/// assert_eq!(group_count(Pos::new(20, 10), |_| false), 0);
/// // Every neighbor passable: one unbroken ring.
/// assert_eq!(group_count(Pos::new(20, 10), |_| true), 1);
/// ```
pub fn group_count<P>(pos: Pos, passable: P) -> usize
where
    P: Fn(Pos) -> bool,
{
    let ring = pos.neighbor_ring();
    let open: Vec<bool> =
        ring.iter().map(|slot| slot.is_some_and(|p| passable(p))).collect();

    let runs = (0..6).filter(|&i| open[i] && !open[(i + 5) % 6]).count();
    if runs == 0 && open.iter().any(|&o| o) {
        // Unbroken ring: a single run with no start transition.
        1
    } else {
        runs
    }
}

/// Whether at most one of `pos`'s neighbors fails `is_boundary`.
///
/// A tile satisfying this has at most one open exit, which is what makes it
/// a dead-end candidate. Neighbors outside the outline are absent and never
/// count as open.
pub fn is_surrounded_except<B>(pos: Pos, is_boundary: B) -> bool
where
    B: Fn(Pos) -> bool,
{
    pos.neighbors().into_iter().filter(|&p| !is_boundary(p)).count() <= 1
}
