//! Error types for board generation

use thiserror::Error;

/// Errors that can occur during board generation or queries
///
/// Degenerate geometry is never reported here: the pipeline falls back to
/// small placeholder cells instead, so a valid configuration always yields a
/// complete board.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoardError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Requested label is not on the board
    #[error("label not found: {0}")]
    LabelNotFound(usize),
}

/// Result type alias for board operations
pub type Result<T> = std::result::Result<T, BoardError>;
