use crate::error::LoadError;
use crate::search::MazeMap;
use std::path::Path;
use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

pub const WALL: char = '*';
pub const OPEN: char = ' ';
pub const ENTRANCE: char = 'e';
pub const TARGET: char = 'd';

/// Largest number of cells a maze file may declare
pub const MAX_CELLS: usize = 1 << 24;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Wall,
    Open,
    Entrance,
    // keeps the glyph so that `D` renders back as `D`
    Target(char),
    // any glyph outside of the maze alphabet, never enterable
    Other(char),
}

impl Default for Cell {
    fn default() -> Self {
        Self::Open
    }
}

impl Cell {
    pub fn from_glyph(glyph: char) -> Self {
        match glyph {
            WALL => Cell::Wall,
            OPEN => Cell::Open,
            ENTRANCE => Cell::Entrance,
            g if g.to_ascii_lowercase() == TARGET => Cell::Target(g),
            g => Cell::Other(g),
        }
    }

    pub fn glyph(&self) -> char {
        match self {
            Cell::Wall => WALL,
            Cell::Open => OPEN,
            Cell::Entrance => ENTRANCE,
            Cell::Target(g) | Cell::Other(g) => *g,
        }
    }

    /// Walls, the entrance and unknown glyphs can never be moved onto
    pub fn is_enterable(&self) -> bool {
        matches!(self, Cell::Open | Cell::Target(_))
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Direction {
    South,
    West,
    North,
    East,
}

impl Direction {
    /// The order in which directions are explored, first one wins
    pub const SEARCH_ORDER: [Direction; 4] = [
        Direction::South,
        Direction::West,
        Direction::North,
        Direction::East,
    ];

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::North => Direction::South,
            Direction::East => Direction::West,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Direction::South => 'S',
            Direction::West => 'W',
            Direction::North => 'N',
            Direction::East => 'E',
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Direction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "s" | "south" => Ok(Direction::South),
            "w" | "west" => Ok(Direction::West),
            "n" | "north" => Ok(Direction::North),
            "e" | "east" => Ok(Direction::East),
            _ => Err(anyhow::anyhow!("Invalid direction: {}", s)),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl Point {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// True if `other` is exactly one step north, south, east or west of `self`
    pub fn is_adjacent(&self, other: &Point) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Where the search currently stands and where it came from
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Cursor {
    pub current: Point,
    pub previous: Option<Point>,
}

impl Cursor {
    pub fn new(start: Point) -> Self {
        Self {
            current: start,
            previous: None,
        }
    }

    pub fn advance(&mut self, to: Point) {
        self.previous = Some(self.current);
        self.current = to;
    }
}

/// A rectangular maze grid, read-only once loaded
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GridMap {
    pub rows: usize,
    pub columns: usize,
    pub cells: Vec<Vec<Cell>>,
}

impl GridMap {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            cells: vec![vec![Cell::Open; columns]; rows],
        }
    }

    /// Read and parse a maze file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        text.parse()
    }

    /// Only defined for points inside the grid, see [`GridMap::is_valid`]
    pub fn cell_at(&self, point: Point) -> Cell {
        self.cells[point.row][point.col]
    }

    /// Row-major scan for the first entrance cell
    pub fn locate_entrance(&self) -> Option<Point> {
        self.cells.iter().enumerate().find_map(|(row, cells)| {
            cells
                .iter()
                .position(|c| *c == Cell::Entrance)
                .map(|col| Point { row, col })
        })
    }
}

impl FromStr for GridMap {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = s.lines();

        let header = lines.next().ok_or(LoadError::MissingHeader)?;
        let mut dims = header.split_whitespace().map(str::parse::<usize>);
        let (rows, columns) = match (dims.next(), dims.next()) {
            (Some(Ok(rows)), Some(Ok(columns))) => (rows, columns),
            _ => {
                return Err(LoadError::InvalidHeader {
                    line: header.to_string(),
                })
            }
        };

        if rows.checked_mul(columns).map_or(true, |cells| cells > MAX_CELLS) {
            return Err(LoadError::TooLarge {
                rows,
                columns,
                limit: MAX_CELLS,
            });
        }

        // missing rows and short rows stay open
        let mut map = GridMap::new(rows, columns);

        for (row, line) in lines.take(rows).enumerate() {
            let glyphs: Vec<char> = line.chars().collect();
            if glyphs.len() > columns {
                return Err(LoadError::RowTooLong {
                    row,
                    len: glyphs.len(),
                    columns,
                });
            }
            for (col, glyph) in glyphs.into_iter().enumerate() {
                map.cells[row][col] = Cell::from_glyph(glyph);
            }
        }

        log::debug!("loaded maze with {} rows and {} columns", rows, columns);

        Ok(map)
    }
}

impl Display for GridMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.cells {
            for cell in row {
                write!(f, "{}", cell)?;
            }
            write!(f, "\n")?;
        }

        Ok(())
    }
}

impl MazeMap for GridMap {
    fn is_valid(&self, node: Point) -> bool {
        node.row < self.rows && node.col < self.columns
    }

    fn is_enterable(&self, node: Point) -> bool {
        self.cell_at(node).is_enterable()
    }

    fn is_target(&self, node: Point) -> bool {
        self.cell_at(node).glyph().to_ascii_lowercase() == TARGET
    }

    fn neighbor(&self, node: Point, direction: Direction) -> Option<Point> {
        let Point { row, col } = node;
        let next = match direction {
            Direction::South => Point { row: row + 1, col },
            Direction::West => Point {
                row,
                col: col.checked_sub(1)?,
            },
            Direction::North => Point {
                row: row.checked_sub(1)?,
                col,
            },
            Direction::East => Point { row, col: col + 1 },
        };

        if self.is_valid(next) {
            Some(next)
        } else {
            None
        }
    }
}
