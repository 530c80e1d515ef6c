//! Depth-first maze solving with explicit backtracking.
//!
//! A maze is loaded into a [`GridMap`], searched by a [`MazeSolver`] and the
//! outcome drawn by [`render_solution`].

pub mod config;
pub mod error;
pub mod feasible;
pub mod grid;
pub mod history;
pub mod render;
pub mod search;

pub use config::{Markers, MazeConfig};
pub use error::{LoadError, SearchError};
pub use grid::{Cell, Cursor, Direction, GridMap, Point};
pub use history::{Move, MoveHistory, MoveId};
pub use render::{format_directions, render_solution, SolutionReport};
pub use search::{solve, MazeMap, MazeSolver, SearchOutcome, SearchState, SearchStats};
