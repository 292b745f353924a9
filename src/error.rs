//! Error types for the duelist crate

use thiserror::Error;

/// Main error type for the duelist crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid move: position {position} is occupied or off the board")]
    InvalidMove { position: usize },

    #[error("no valid moves available")]
    NoValidMoves,

    #[error("board string has {got} cells in '{context}', which is not a square board")]
    InvalidBoardLength { got: usize, context: String },

    #[error("invalid character '{character}' at position {position} in '{context}'")]
    InvalidCellCharacter {
        character: char,
        position: usize,
        context: String,
    },

    #[error("invalid piece counts: X={x_count}, O={o_count} (must be equal or X ahead by 1)")]
    InvalidPieceCounts { x_count: usize, o_count: usize },

    #[error("grid of size {size} needs {expected} cells, got {got}")]
    InvalidGrid {
        size: usize,
        expected: usize,
        got: usize,
    },

    #[error("opponent '{name}' proposed {attempts} illegal moves in a row")]
    OpponentRejected { name: String, attempts: usize },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },

    #[error("unsupported save format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("saved agent is a {found} player, expected a {expected} player")]
    AgentKindMismatch { expected: String, found: String },

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
