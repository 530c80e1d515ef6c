use std::collections::HashSet;

use serde::Serialize;

use crate::error::{LoadError, SearchError};
use crate::feasible::feasible_moves;
use crate::grid::{Cursor, Direction, GridMap, Point};
use crate::history::MoveHistory;

/// The view of a maze that the search needs
pub trait MazeMap {
    /// Check if the provided point lies inside the map
    fn is_valid(&self, node: Point) -> bool;

    /// Check if the cell at the (valid) point can be moved onto
    fn is_enterable(&self, node: Point) -> bool;

    /// Check if the cell at the (valid) point ends the search
    fn is_target(&self, node: Point) -> bool;

    /// Return the neighbor in the given direction, if it lies inside the map
    fn neighbor(&self, node: Point, direction: Direction) -> Option<Point>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum SearchState {
    Exploring,
    Solved,
    Unsolvable,
}

impl SearchState {
    pub fn is_done(&self) -> bool {
        !matches!(self, SearchState::Exploring)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    pub steps: u64,
    pub commits: u64,
    pub retractions: u64,
}

/// Everything the search leaves behind once it has stopped
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    pub state: SearchState,
    pub entrance: Point,
    pub committed: MoveHistory,
    pub backtracked: MoveHistory,
    pub stats: SearchStats,
}

impl SearchOutcome {
    pub fn is_solved(&self) -> bool {
        self.state == SearchState::Solved
    }

    /// The entrance followed by every committed position, entrance first
    pub fn path(&self) -> Vec<Point> {
        let mut path = vec![self.entrance];
        path.extend(self.committed.positions());
        path
    }

    pub fn directions(&self) -> Vec<Direction> {
        self.committed.directions()
    }
}

/// Depth-first maze search with explicit backtracking.
///
/// Every call to [`MazeSolver::step`] either finds the target, commits one
/// move, or retracts moves until a new one can be committed.
#[derive(Debug)]
pub struct MazeSolver<M: MazeMap> {
    entrance: Point,
    cursor: Cursor,
    committed: MoveHistory,
    feasible: MoveHistory,
    backtracked: MoveHistory,
    // cells that were retracted past, never entered again
    dead: HashSet<Point>,
    state: SearchState,
    stats: SearchStats,
    _map: std::marker::PhantomData<M>,
}

impl<M: MazeMap> MazeSolver<M> {
    pub fn new(entrance: Point) -> Self {
        Self {
            entrance,
            cursor: Cursor::new(entrance),
            committed: MoveHistory::new(),
            feasible: MoveHistory::new(),
            backtracked: MoveHistory::new(),
            dead: HashSet::new(),
            state: SearchState::Exploring,
            stats: SearchStats::default(),
            _map: std::marker::PhantomData,
        }
    }

    pub fn finish(mut self, map: &M) -> SearchOutcome {
        loop {
            match self.step(map) {
                SearchState::Exploring => {}
                _ => return self.into_outcome(),
            }
        }
    }

    /// Like [`MazeSolver::finish`] but gives up after `limit` steps
    pub fn finish_within(mut self, map: &M, limit: u64) -> Result<SearchOutcome, SearchError> {
        while !self.state.is_done() {
            if self.stats.steps >= limit {
                return Err(SearchError::StepLimit { limit });
            }
            self.step(map);
        }

        Ok(self.into_outcome())
    }

    pub fn step(&mut self, map: &M) -> SearchState {
        if self.state.is_done() {
            return self.state;
        }
        self.stats.steps += 1;

        if map.is_target(self.cursor.current) {
            log::debug!(
                "target found at {} after {} commits and {} retractions",
                self.cursor.current,
                self.stats.commits,
                self.stats.retractions
            );
            self.state = SearchState::Solved;
            return self.state;
        }

        if self.evaluate(map) > 0 {
            self.commit();
            return self.state;
        }

        // dead end: walk back until some cell on the path has an untried way out
        loop {
            if self.committed.is_empty() {
                log::debug!(
                    "no path from entrance {} after {} retractions",
                    self.entrance,
                    self.stats.retractions
                );
                self.state = SearchState::Unsolvable;
                return self.state;
            }

            self.retract();

            if self.evaluate(map) > 0 {
                self.commit();
                return self.state;
            }
        }
    }

    fn evaluate(&mut self, map: &M) -> usize {
        feasible_moves(
            map,
            &self.cursor,
            &self.committed,
            &self.dead,
            &mut self.feasible,
        )
    }

    fn commit(&mut self) {
        let mv = *self
            .feasible
            .bottom()
            .expect("commit called without a feasible move");
        self.feasible.clear();

        log::trace!("commit {} from {} to {}", mv.direction, mv.from, mv.position);

        self.committed.push(mv);
        self.cursor.advance(mv.position);
        self.stats.commits += 1;
    }

    fn retract(&mut self) {
        let mut mv = self
            .committed
            .pop()
            .expect("retract called with an empty committed history");

        log::trace!("retract {} from {} to {}", mv.direction, mv.from, mv.position);

        // everything reachable from here has been explored already
        self.dead.insert(mv.position);

        mv.mark_backtrack();
        self.backtracked.push(mv);

        self.cursor = Cursor {
            current: mv.from,
            previous: self.committed.top().map(|top| top.from),
        };
        self.stats.retractions += 1;
    }

    fn into_outcome(self) -> SearchOutcome {
        SearchOutcome {
            state: self.state,
            entrance: self.entrance,
            committed: self.committed,
            backtracked: self.backtracked,
            stats: self.stats,
        }
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn entrance(&self) -> Point {
        self.entrance
    }

    pub fn committed(&self) -> &MoveHistory {
        &self.committed
    }

    pub fn feasible(&self) -> &MoveHistory {
        &self.feasible
    }

    pub fn backtracked(&self) -> &MoveHistory {
        &self.backtracked
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }
}

/// Locate the entrance of `map` and run the search to completion
pub fn solve(map: &GridMap) -> Result<SearchOutcome, LoadError> {
    let entrance = map.locate_entrance().ok_or(LoadError::NoEntrance)?;
    Ok(MazeSolver::new(entrance).finish(map))
}

#[cfg(test)]
mod test {

    use std::collections::{HashSet, VecDeque};

    use proptest::prelude::*;

    use super::*;
    use crate::grid::Cell;

    fn create_basic_map() -> GridMap {
        "3 3\ne  \n** \n  d\n".parse().unwrap()
    }

    fn solver_for(map: &GridMap) -> MazeSolver<GridMap> {
        MazeSolver::new(map.locate_entrance().unwrap())
    }

    #[test]
    fn test_basic_route() {
        let map = create_basic_map();

        let outcome = solver_for(&map).finish(&map);

        assert!(outcome.is_solved());
        assert_eq!(
            outcome.directions(),
            vec![
                Direction::East,
                Direction::East,
                Direction::South,
                Direction::South
            ]
        );
        assert_eq!(outcome.path().last(), Some(&Point::new(2, 2)));
        assert!(outcome.backtracked.is_empty());
        assert_eq!(
            outcome.stats,
            SearchStats {
                steps: 5,
                commits: 4,
                retractions: 0
            }
        );
    }

    #[test]
    fn test_enclosed_entrance_is_unsolvable() {
        let map: GridMap = "3 3\n***\n*e*\n***\n".parse().unwrap();

        let outcome = solver_for(&map).finish(&map);

        assert_eq!(outcome.state, SearchState::Unsolvable);
        assert_eq!(outcome.stats.commits, 0);
        assert_eq!(outcome.stats.retractions, 0);
        assert!(outcome.committed.is_empty());
        assert!(outcome.backtracked.is_empty());
    }

    #[test]
    fn test_adjacent_target() {
        let map: GridMap = "1 2\neD\n".parse().unwrap();

        let outcome = solver_for(&map).finish(&map);

        assert!(outcome.is_solved());
        assert_eq!(outcome.stats.commits, 1);
        assert_eq!(outcome.directions(), vec![Direction::East]);
    }

    #[test]
    fn test_missing_entrance() {
        let map: GridMap = "2 2\n  \n d\n".parse().unwrap();

        assert!(matches!(solve(&map), Err(LoadError::NoEntrance)));
    }

    #[test]
    fn test_single_backtrack() {
        let map: GridMap = "2 3\ne d\n **\n".parse().unwrap();
        let mut solver = solver_for(&map);

        // south is tried first
        assert_eq!(solver.step(&map), SearchState::Exploring);
        assert_eq!(solver.cursor().current, Point::new(1, 0));
        assert_eq!(solver.committed().len(), 1);

        // dead end, back to the entrance and east instead
        assert_eq!(solver.step(&map), SearchState::Exploring);
        assert_eq!(
            *solver.cursor(),
            Cursor {
                current: Point::new(0, 1),
                previous: Some(Point::new(0, 0))
            }
        );
        assert_eq!(solver.backtracked().len(), 1);
        assert!(solver.backtracked().top().unwrap().backtrack);
        assert!(solver.feasible().is_empty());

        let outcome = solver.finish(&map);
        assert!(outcome.is_solved());
        assert_eq!(
            outcome.directions(),
            vec![Direction::East, Direction::East]
        );
        assert_eq!(outcome.backtracked.positions(), vec![Point::new(1, 0)]);
        assert!(!outcome.committed.iter().any(|mv| mv.backtrack));
    }

    #[test]
    fn test_retraction_continues_through_dead_corridor() {
        let map: GridMap = "3 3\ne d\n **\n **\n".parse().unwrap();

        let outcome = solver_for(&map).finish(&map);

        assert!(outcome.is_solved());
        assert_eq!(
            outcome.backtracked.positions(),
            vec![Point::new(2, 0), Point::new(1, 0)]
        );
        assert_eq!(
            outcome.stats,
            SearchStats {
                steps: 5,
                commits: 4,
                retractions: 2
            }
        );
    }

    #[test]
    fn test_dead_end_siblings_terminate() {
        let map: GridMap = "3 3\n***\n e \n***\n".parse().unwrap();

        let outcome = solver_for(&map).finish(&map);

        assert_eq!(outcome.state, SearchState::Unsolvable);
        assert_eq!(
            outcome.stats,
            SearchStats {
                steps: 3,
                commits: 2,
                retractions: 2
            }
        );
        assert_eq!(
            outcome.backtracked.directions(),
            vec![Direction::West, Direction::East]
        );
    }

    #[test]
    fn test_unsolvable_after_backtracking() {
        let map: GridMap = "2 3\ne *\n *d\n".parse().unwrap();

        let outcome = solver_for(&map).finish(&map);

        assert_eq!(outcome.state, SearchState::Unsolvable);
        assert_eq!(outcome.stats.retractions, 2);
        assert!(outcome.committed.is_empty());
    }

    #[test]
    fn test_loop_in_maze() {
        // the open square forms a cycle around the wall at (1, 1)
        let map: GridMap = "4 3\ne  \n * \n   \n**d\n".parse().unwrap();

        let outcome = solver_for(&map).finish(&map);

        assert!(outcome.is_solved());
        let path = outcome.path();
        let unique: HashSet<Point> = path.iter().copied().collect();
        assert_eq!(unique.len(), path.len());
        assert_eq!(path.last(), Some(&Point::new(3, 2)));
    }

    #[test]
    fn test_sample_maps() {
        let data = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../data");

        let castle = GridMap::load(data.join("castle.maze")).unwrap();
        let outcome = solve(&castle).unwrap();
        assert!(outcome.is_solved());
        assert_eq!(outcome.path().last(), Some(&Point::new(5, 13)));
        assert!(!outcome.backtracked.is_empty());

        let enclosed = GridMap::load(data.join("enclosed.maze")).unwrap();
        assert_eq!(solve(&enclosed).unwrap().state, SearchState::Unsolvable);
    }

    #[test]
    fn test_terminal_state_is_sticky() {
        let map: GridMap = "1 2\ned\n".parse().unwrap();
        let mut solver = solver_for(&map);

        assert_eq!(solver.step(&map), SearchState::Exploring);
        assert_eq!(solver.step(&map), SearchState::Solved);
        assert_eq!(solver.step(&map), SearchState::Solved);
        assert_eq!(solver.stats().steps, 2);
    }

    #[test]
    fn test_step_limit() {
        let map = create_basic_map();

        let res = solver_for(&map).finish_within(&map, 2);
        assert_eq!(res.unwrap_err(), SearchError::StepLimit { limit: 2 });

        let res = solver_for(&map).finish_within(&map, 5);
        assert!(res.unwrap().is_solved());
    }

    /// An open n x n room, the target sealed off behind a wall column
    fn create_sealed_room(n: usize) -> GridMap {
        let mut map = GridMap::new(n, n + 2);
        for row in 0..n {
            map.cells[row][n] = Cell::Wall;
        }
        map.cells[0][0] = Cell::Entrance;
        map.cells[0][n + 1] = Cell::Target('d');
        map
    }

    #[test]
    fn test_open_room_work_is_bounded_by_its_size() {
        for n in [3, 5, 8, 16] {
            let map = create_sealed_room(n);

            let outcome = solver_for(&map).finish_within(&map, 10_000).unwrap();

            assert_eq!(outcome.state, SearchState::Unsolvable);
            // every open cell but the entrance is entered once and left once
            let cells = (n * n) as u64;
            assert_eq!(outcome.stats.commits, cells - 1);
            assert_eq!(outcome.stats.retractions, cells - 1);
            assert_eq!(outcome.stats.steps, cells);
        }
    }

    #[test]
    fn test_retracted_cells_are_not_entered_again() {
        // the loop around (1, 1) lets the search reach (0, 1) a second way
        let map: GridMap = "3 3\ne  \n * \n   \n".parse().unwrap();

        let outcome = solver_for(&map).finish(&map);

        assert_eq!(outcome.state, SearchState::Unsolvable);
        let backtracked = outcome.backtracked.positions();
        let unique: HashSet<Point> = backtracked.iter().copied().collect();
        assert_eq!(unique.len(), backtracked.len());
        assert_eq!(unique.len(), 7);
    }

    fn target_reachable(map: &GridMap, entrance: Point) -> bool {
        let mut seen = HashSet::from([entrance]);
        let mut queue = VecDeque::from([entrance]);

        while let Some(point) = queue.pop_front() {
            if map.is_target(point) {
                return true;
            }
            for direction in Direction::SEARCH_ORDER {
                if let Some(next) = map.neighbor(point, direction) {
                    if map.is_enterable(next) && seen.insert(next) {
                        queue.push_back(next);
                    }
                }
            }
        }

        false
    }

    fn arb_map() -> impl Strategy<Value = GridMap> {
        (1usize..=8, 1usize..=8)
            .prop_flat_map(|(rows, columns)| {
                let glyph = prop_oneof![
                    5 => Just(Cell::Open),
                    3 => Just(Cell::Wall),
                    1 => Just(Cell::Target('d')),
                ];
                (
                    Just(rows),
                    Just(columns),
                    prop::collection::vec(glyph, rows * columns),
                    0..rows * columns,
                )
            })
            .prop_map(|(rows, columns, cells, entrance)| {
                let mut map = GridMap::new(rows, columns);
                for (i, cell) in cells.into_iter().enumerate() {
                    map.cells[i / columns][i % columns] = cell;
                }
                map.cells[entrance / columns][entrance % columns] = Cell::Entrance;
                map
            })
    }

    proptest! {
        #[test]
        fn search_terminates_and_finds_reachable_targets(map in arb_map()) {
            let entrance = map.locate_entrance().unwrap();
            let limit = (map.rows * map.columns) as u64;
            let outcome = MazeSolver::new(entrance).finish_within(&map, limit).unwrap();

            prop_assert_eq!(outcome.is_solved(), target_reachable(&map, entrance));
            prop_assert!(outcome.stats.commits < limit);
        }

        #[test]
        fn solved_paths_are_valid(map in arb_map()) {
            let outcome = solve(&map).unwrap();
            if !outcome.is_solved() {
                return Ok(());
            }

            let path = outcome.path();
            for pair in path.windows(2) {
                prop_assert!(pair[0].is_adjacent(&pair[1]));
                prop_assert!(map.is_enterable(pair[1]));
            }
            prop_assert!(map.is_target(*path.last().unwrap()));

            for pair in outcome.directions().windows(2) {
                prop_assert_ne!(pair[1], pair[0].opposite());
            }
        }

        #[test]
        fn committed_path_never_repeats_a_position(map in arb_map()) {
            let mut solver = MazeSolver::new(map.locate_entrance().unwrap());

            while !solver.step(&map).is_done() {
                let positions = solver.committed().positions();
                let unique: HashSet<Point> = positions.iter().copied().collect();
                prop_assert_eq!(unique.len(), positions.len());
                prop_assert_eq!(
                    solver.committed().top().map(|mv| mv.position),
                    Some(solver.cursor().current)
                );

                let backtracked = solver.backtracked().positions();
                let retracted: HashSet<Point> = backtracked.iter().copied().collect();
                prop_assert_eq!(retracted.len(), backtracked.len());
                prop_assert!(unique.is_disjoint(&retracted));
            }
        }

        #[test]
        fn exploration_is_deterministic(map in arb_map()) {
            let first = solve(&map).unwrap();
            let second = solve(&map).unwrap();

            prop_assert_eq!(first.state, second.state);
            prop_assert_eq!(first.directions(), second.directions());
            prop_assert_eq!(first.backtracked.positions(), second.backtracked.positions());
            prop_assert_eq!(first.stats, second.stats);
        }
    }
}
