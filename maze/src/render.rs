use std::collections::HashSet;

use serde::Serialize;

use crate::config::Markers;
use crate::grid::{Direction, GridMap, Point};
use crate::history::MoveHistory;
use crate::search::{MazeMap, SearchOutcome, SearchState, SearchStats};

/// Join directions in the given order, e.g. `S-E-E`
pub fn format_directions(directions: &[Direction], separator: &str) -> String {
    directions
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Draw the maze with the solution and the backtracked cells marked.
///
/// Targets win over solution cells, which win over backtracked cells, every
/// other cell keeps its original glyph.
pub fn render_solution(
    map: &GridMap,
    committed: &MoveHistory,
    backtracked: &MoveHistory,
    markers: &Markers,
) -> Vec<String> {
    let solution: HashSet<Point> = committed.iter().map(|mv| mv.position).collect();
    let backtrack: HashSet<Point> = backtracked.iter().map(|mv| mv.position).collect();

    (0..map.rows)
        .map(|row| {
            (0..map.columns)
                .map(|col| {
                    let point = Point { row, col };
                    if map.is_target(point) {
                        markers.target
                    } else if solution.contains(&point) {
                        markers.solution
                    } else if backtrack.contains(&point) {
                        markers.backtrack
                    } else {
                        map.cell_at(point).glyph()
                    }
                })
                .collect::<String>()
        })
        .collect()
}

/// Everything worth reporting about a finished search
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SolutionReport {
    pub state: SearchState,
    pub directions: String,
    pub path: Vec<Point>,
    pub backtracked: Vec<Point>,
    pub grid: Vec<String>,
    pub stats: SearchStats,
}

impl SolutionReport {
    pub fn new(map: &GridMap, outcome: &SearchOutcome, markers: &Markers) -> Self {
        Self {
            state: outcome.state,
            directions: format_directions(&outcome.directions(), &markers.separator),
            path: outcome.path(),
            backtracked: outcome.backtracked.positions(),
            grid: render_solution(map, &outcome.committed, &outcome.backtracked, markers),
            stats: outcome.stats,
        }
    }
}
