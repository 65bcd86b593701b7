//! Error types for storage operations.
//!
//! Every operation on the storage service either applies completely or
//! returns one of these variants and leaves state untouched.

use thiserror::Error;

/// Errors returned by the storage service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Referenced path or user does not exist (or was merged away)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Path or user id already exists
    #[error("Already exists: {0}")]
    Duplicate(String),

    /// Operation would push a user past its capacity
    #[error("Capacity exceeded for user {user}: requested {requested} bytes, {available} available")]
    Capacity {
        user: String,
        requested: u64,
        available: u64,
    },

    /// Malformed input, e.g. merging a user into itself
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Restore attempted without a prior backup
    #[error("No backup found for: {0}")]
    NoBackup(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn duplicate(what: impl Into<String>) -> Self {
        Self::Duplicate(what.into())
    }

    pub fn capacity(user: impl Into<String>, requested: u64, available: u64) -> Self {
        Self::Capacity {
            user: user.into(),
            requested,
            available,
        }
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn no_backup(owner: impl Into<String>) -> Self {
        Self::NoBackup(owner.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, StorageError::Duplicate(_))
    }

    pub fn is_capacity(&self) -> bool {
        matches!(self, StorageError::Capacity { .. })
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, StorageError::InvalidArgument(_))
    }

    pub fn is_no_backup(&self) -> bool {
        matches!(self, StorageError::NoBackup(_))
    }
}
