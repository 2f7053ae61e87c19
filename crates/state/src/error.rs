//! Workspace state error types

use thiserror::Error;

/// Errors from the state layer
///
/// Deliberately small: persistence reads and writes are best-effort and
/// swallow their own failures, so only setup paths surface errors.
#[derive(Debug, Error)]
pub enum StateError {
    /// Storage backend could not be initialized
    #[error("storage unavailable: {0}")]
    Storage(#[from] std::io::Error),
}

/// Result type for state operations
pub type Result<T> = std::result::Result<T, StateError>;
