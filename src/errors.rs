use std::path::PathBuf;
use thiserror::Error;

/// Which of the two spreadsheet tables a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Levels,
    Worlds,
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Table::Levels => write!(f, "levels"),
            Table::Worlds => write!(f, "worlds"),
        }
    }
}

/// A numbering fault found by the sequence validator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceGap {
    /// Worlds are not numbered `1..N` in order.
    #[error("world numbering gap: expected world {expected}, got {actual}")]
    World { expected: u32, actual: u32 },

    /// A level number inside a world skipped or repeated a value.
    #[error("level numbering gap at {unique_id}: expected level {expected}, got {actual}")]
    Level {
        unique_id: String,
        expected: u32,
        actual: u32,
    },

    /// A declared world has no levels.
    #[error("world {world_number} has no levels")]
    EmptyWorld { world_number: u32 },
}

/// Every way a compilation run can fail. All of them abort before the
/// output directory is touched.
#[derive(Debug, Error)]
pub enum CompileError {
    /// A required input file is absent.
    #[error("missing {table} source: {}", .path.display())]
    MissingSource { table: Table, path: PathBuf },

    /// A source parsed but yielded zero usable rows.
    #[error("{table} source {} has no usable rows", .path.display())]
    EmptyInput { table: Table, path: PathBuf },

    /// A queue or coordinate field could not be decoded.
    #[error("malformed {field} for {}: {reason} (raw: {raw})", .unique_id.as_deref().unwrap_or("<unnumbered row>"))]
    MalformedField {
        unique_id: Option<String>,
        field: &'static str,
        reason: String,
        raw: String,
    },

    /// Numbering is not sequential.
    #[error(transparent)]
    SequenceGap(#[from] SequenceGap),

    /// A level points at a world the worlds table does not declare.
    #[error("level {unique_id} references undeclared world {world_number}")]
    UnknownWorld { unique_id: String, world_number: u32 },

    /// The worlds table lists the same world number twice.
    #[error("world {world_number} is declared more than once")]
    DuplicateWorld { world_number: u32 },

    /// Strict vocabulary mode found a queue entry with no geometry.
    #[error("level {unique_id} queues unknown piece '{piece}'")]
    UnknownPiece { unique_id: String, piece: String },

    /// Another run holds the output lock.
    #[error("output directory {} is locked by another run", .path.display())]
    Locked { path: PathBuf },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CompileResult<T> = Result<T, CompileError>;
