use std::path::PathBuf;

use thiserror::Error;

/// Failures that prevent a search from ever starting
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read maze file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("maze file is empty, expected a `rows cols` header line")]
    MissingHeader,
    #[error("invalid header line {line:?}, expected `rows cols`")]
    InvalidHeader { line: String },
    #[error("a {rows}x{columns} maze is larger than the {limit} cells supported")]
    TooLarge {
        rows: usize,
        columns: usize,
        limit: usize,
    },
    #[error("row {row} has {len} cells but the maze is only {columns} columns wide")]
    RowTooLong {
        row: usize,
        len: usize,
        columns: usize,
    },
    #[error("no entrance ('e') has been located on the map")]
    NoEntrance,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("search did not finish within {limit} steps")]
    StepLimit { limit: u64 },
}
