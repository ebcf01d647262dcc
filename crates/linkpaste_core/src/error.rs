//! Application error types for paste lifecycle and storage.
use thiserror::Error;

/// Top-level application error type.
///
/// The first group of variants are caller-facing outcomes of the paste
/// lifecycle; the remaining variants are storage failures that the HTTP
/// layer collapses into a generic internal error.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Paste not found")]
    NotFound,

    #[error("Paste has expired")]
    Gone,

    #[error("Secret token required")]
    Unauthorized,

    #[error("Invalid secret token")]
    Forbidden,

    /// Insert rejected because the slug is already taken.
    #[error("Slug '{0}' already exists")]
    SlugTaken(String),

    #[error("Database error: {0}")]
    Database(#[from] redb::Error),

    #[error("Storage error: {0}")]
    StorageMessage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("Internal server error")]
    Internal,
}

impl AppError {
    /// Whether this error describes a storage or internal failure rather
    /// than a lifecycle outcome the caller can act on.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::SlugTaken(_)
                | Self::Database(_)
                | Self::StorageMessage(_)
                | Self::Serialization(_)
                | Self::Internal
        )
    }
}

impl From<redb::DatabaseError> for AppError {
    fn from(value: redb::DatabaseError) -> Self {
        Self::Database(value.into())
    }
}

impl From<redb::TransactionError> for AppError {
    fn from(value: redb::TransactionError) -> Self {
        Self::Database(value.into())
    }
}

impl From<redb::TableError> for AppError {
    fn from(value: redb::TableError) -> Self {
        Self::Database(value.into())
    }
}

impl From<redb::StorageError> for AppError {
    fn from(value: redb::StorageError) -> Self {
        Self::Database(value.into())
    }
}

impl From<redb::CommitError> for AppError {
    fn from(value: redb::CommitError) -> Self {
        Self::Database(value.into())
    }
}
