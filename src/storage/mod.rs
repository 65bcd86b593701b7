//! File Index
//!
//! This module holds every file known to the service, owned or not, keyed by
//! path. Only sizes are tracked; there is no file content.

pub mod file_index;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use file_index::FileIndex;

/// User identifier type
pub type UserId = String;

/// Who a file is billed to
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Owner {
    /// Unowned system file, not counted against any capacity
    System,
    /// File counted against a user's capacity
    User(UserId),
}

impl Owner {
    pub fn user(id: &str) -> Self {
        Owner::User(id.to_string())
    }

    pub fn user_id(&self) -> Option<&str> {
        match self {
            Owner::System => None,
            Owner::User(id) => Some(id),
        }
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Owner::System => write!(f, "<system>"),
            Owner::User(id) => write!(f, "{}", id),
        }
    }
}

/// Stored attributes of a single file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Size in bytes, fixed at creation
    pub size: u64,
    pub owner: Owner,
}

/// A path together with its size, as returned by size-ordered queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: String,
    pub size: u64,
}

impl FileEntry {
    pub fn new(path: impl Into<String>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }
}

/// Renders as `path(size)`
impl fmt::Display for FileEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.path, self.size)
    }
}
