use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid owner id: {0}")]
    InvalidOwnerId(String),

    #[error("invalid record id: {0}")]
    InvalidRecordId(String),
}
