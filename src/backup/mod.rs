//! Point-in-time Backups
//!
//! One snapshot per owner. Taking a new backup replaces the previous one, and
//! restoring never consumes it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::storage::Owner;

/// Immutable copy of one owner's `path -> size` mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backup {
    pub owner: Owner,
    files: BTreeMap<String, u64>,
    /// When the snapshot was taken
    pub taken_at: DateTime<Utc>,
}

impl Backup {
    pub fn new(owner: Owner, files: BTreeMap<String, u64>) -> Self {
        Self {
            owner,
            files,
            taken_at: Utc::now(),
        }
    }

    pub fn files(&self) -> &BTreeMap<String, u64> {
        &self.files
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn total_bytes(&self) -> u64 {
        self.files.values().sum()
    }
}

/// Latest backup per owner
#[derive(Debug, Default, Clone)]
pub struct BackupStore {
    backups: HashMap<Owner, Backup>,
}

impl BackupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `backup`, returning the one it replaced
    pub fn put(&mut self, backup: Backup) -> Option<Backup> {
        self.backups.insert(backup.owner.clone(), backup)
    }

    pub fn get(&self, owner: &Owner) -> Option<&Backup> {
        self.backups.get(owner)
    }

    pub fn remove(&mut self, owner: &Owner) -> Option<Backup> {
        self.backups.remove(owner)
    }

    pub fn len(&self) -> usize {
        self.backups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backups.is_empty()
    }
}
