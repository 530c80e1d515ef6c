use crate::grid::{Direction, Point};

/// Index of a move inside the [`MoveHistory`] that currently holds it
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct MoveId(usize);

/// A single step between two neighboring cells
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Move {
    pub direction: Direction,
    /// the cell the move leaves
    pub from: Point,
    /// the cell the move ends on
    pub position: Point,
    /// set once the move has been retracted from the path
    pub backtrack: bool,
    /// the move that was on top of the owning history when this one was pushed
    pub previous: Option<MoveId>,
}

impl Move {
    pub fn new(direction: Direction, from: Point, position: Point) -> Self {
        Self {
            direction,
            from,
            position,
            backtrack: false,
            previous: None,
        }
    }

    pub fn mark_backtrack(&mut self) {
        self.backtrack = true;
    }
}

/// A last-in-first-out record of moves.
///
/// The history owns every move it holds in a single arena, moves refer to
/// each other only through [`MoveId`]s into that arena. Since moves are only
/// ever removed from the top, the ids of the remaining moves stay valid.
#[derive(Clone, Debug, Default)]
pub struct MoveHistory {
    moves: Vec<Move>,
}

impl MoveHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a move, linking it to the current top
    pub fn push(&mut self, mut mv: Move) -> MoveId {
        mv.previous = self.top_id();
        self.moves.push(mv);
        MoveId(self.moves.len() - 1)
    }

    pub fn pop(&mut self) -> Option<Move> {
        self.moves.pop()
    }

    pub fn top(&self) -> Option<&Move> {
        self.moves.last()
    }

    pub fn top_id(&self) -> Option<MoveId> {
        self.moves.len().checked_sub(1).map(MoveId)
    }

    /// The oldest move still in the history
    pub fn bottom(&self) -> Option<&Move> {
        self.moves.first()
    }

    pub fn get(&self, id: MoveId) -> Option<&Move> {
        self.moves.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }

    /// Walk the chain of moves from the top back to the first one
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            history: self,
            next: self.top_id(),
        }
    }

    pub fn contains_position(&self, point: Point) -> bool {
        self.iter().any(|mv| mv.position == point)
    }

    /// Directions in the order they were pushed (oldest first)
    pub fn directions(&self) -> Vec<Direction> {
        let mut directions: Vec<Direction> = self.iter().map(|mv| mv.direction).collect();
        directions.reverse();
        directions
    }

    /// Resulting positions in the order they were pushed (oldest first)
    pub fn positions(&self) -> Vec<Point> {
        let mut positions: Vec<Point> = self.iter().map(|mv| mv.position).collect();
        positions.reverse();
        positions
    }
}

pub struct Iter<'a> {
    history: &'a MoveHistory,
    next: Option<MoveId>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Move;

    fn next(&mut self) -> Option<Self::Item> {
        let mv = self.history.get(self.next?)?;
        self.next = mv.previous;
        Some(mv)
    }
}
