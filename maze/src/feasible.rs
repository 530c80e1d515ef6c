use std::collections::HashSet;

use crate::grid::{Cursor, Direction, Point};
use crate::history::{Move, MoveHistory};
use crate::search::MazeMap;

/// Returns the cell reached by moving in `direction` if that step is legal.
///
/// A step is legal when the neighbor is inside the map, is not the cell the
/// cursor just left, can be entered, is not already part of the committed
/// path and has never been retracted past (`dead`).
pub fn feasible_step<M: MazeMap>(
    map: &M,
    cursor: &Cursor,
    committed: &MoveHistory,
    dead: &HashSet<Point>,
    direction: Direction,
) -> Option<Point> {
    let next = map.neighbor(cursor.current, direction)?;

    if cursor.previous == Some(next) {
        return None;
    }
    if !map.is_enterable(next) {
        return None;
    }
    if committed.contains_position(next) {
        return None;
    }
    if dead.contains(&next) {
        return None;
    }

    Some(next)
}

/// Refill `buffer` with every legal move from the cursor, in search order.
///
/// Returns the number of feasible moves found.
pub fn feasible_moves<M: MazeMap>(
    map: &M,
    cursor: &Cursor,
    committed: &MoveHistory,
    dead: &HashSet<Point>,
    buffer: &mut MoveHistory,
) -> usize {
    buffer.clear();

    for direction in Direction::SEARCH_ORDER {
        if let Some(next) = feasible_step(map, cursor, committed, dead, direction) {
            buffer.push(Move::new(direction, cursor.current, next));
        }
    }

    buffer.len()
}
