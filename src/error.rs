use std::{io, process::ExitStatus};

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// An edge references an id that is not in the vertex table.
    #[error("edge on line {line} references unknown node {id}")]
    UnknownNode { id: u32, line: u64 },

    #[error("node {id} appears more than once in the vertex table")]
    DuplicateNode { id: u32 },

    #[error("node {id} has department {dept}, expected a value in 1..=42")]
    DepartmentOutOfRange { id: u32, dept: u32 },

    #[error("graph has no nodes")]
    EmptyGraph,

    #[error("`{program}` exited with {status}")]
    Render { program: String, status: ExitStatus },
}
