//! # Error Types Module
//!
//! Failure modes of the store and of command processing. Every
//! `CommandError` is turned into a reply for the user; none of them stops
//! the bot.

use thiserror::Error;

/// Failures raised by a store implementation
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A document could not be decoded, or would not encode as valid JSON
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// The store cannot serve requests right now
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Malformed command arguments
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArgError {
    #[error("expected {expected} comma-separated fields, got {found}")]
    WrongArity { expected: usize, found: usize },

    #[error("field '{0}' must not be empty")]
    EmptyField(&'static str),

    #[error("invalid price '{0}'")]
    InvalidPrice(String),
}

/// Outcome of a command that did not succeed
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("validation error: {0}")]
    Validation(#[from] ArgError),

    #[error("product not found: {0}")]
    NotFound(String),

    #[error("product already exists: {0}")]
    AlreadyExists(String),

    #[error("permission denied")]
    PermissionDenied,

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
