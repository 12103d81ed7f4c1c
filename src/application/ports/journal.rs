//! Journal storage port interface

use std::path::Path;

use thiserror::Error;

use crate::domain::journal::Turn;

/// Journal storage errors
#[derive(Debug, Clone, Error)]
pub enum JournalError {
    #[error("Failed to read journal: {0}")]
    ReadError(String),

    #[error("Failed to write journal: {0}")]
    WriteError(String),
}

/// Port for append-only turn storage.
///
/// Calls are synchronous: a turn is either fully recorded or not at all,
/// even if the request that produced it is abandoned.
pub trait JournalStore: Send + Sync {
    /// Load every stored turn in insertion order
    fn load(&self) -> Result<Vec<Turn>, JournalError>;

    /// Append one turn
    fn append(&self, turn: &Turn) -> Result<(), JournalError>;

    /// Backing location, for display
    fn location(&self) -> &Path;
}
