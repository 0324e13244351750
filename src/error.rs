// Error taxonomy for store mutations and the backup codec

use crate::task::{TEXT_MAX, TEXT_MIN};
use thiserror::Error;

/// Rejected add/edit text; the collection is left unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("task text too short: {len} characters (min {min})", min = TEXT_MIN)]
    TooShort { len: usize },

    #[error("task text too long: {len} characters (max {max})", max = TEXT_MAX)]
    TooLong { len: usize },
}

/// Rejected reorder; the collection order is left unchanged
///
/// A reorder must list every current task id exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReorderError {
    #[error("reorder must list every task exactly once: expected {expected} ids, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    #[error("reorder references unknown task id: {0}")]
    UnknownId(String),

    #[error("reorder lists task id more than once: {0}")]
    DuplicateId(String),
}

/// Rejected import; the collection is left unchanged
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read backup file")]
    Io(#[from] std::io::Error),

    #[error("backup file is not valid JSON")]
    Parse(#[from] serde_json::Error),

    #[error("backup file must contain a top-level JSON array")]
    NotAnArray,
}
