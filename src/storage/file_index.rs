//! Path-ordered index of all files

use crate::error::{Result, StorageError};
use crate::storage::{FileEntry, FileRecord, Owner};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::ops::Bound;

/// All files in the service, ordered by path so prefix queries are range scans
#[derive(Debug, Default, Clone)]
pub struct FileIndex {
    files: BTreeMap<String, FileRecord>,
}

impl FileIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn get(&self, path: &str) -> Option<&FileRecord> {
        self.files.get(path)
    }

    /// Insert a new file. Fails if the path is already taken by any owner.
    pub fn insert(&mut self, path: &str, size: u64, owner: Owner) -> Result<()> {
        if self.files.contains_key(path) {
            return Err(StorageError::duplicate(path));
        }
        self.files.insert(path.to_string(), FileRecord { size, owner });
        Ok(())
    }

    pub fn remove(&mut self, path: &str) -> Result<FileRecord> {
        self.files
            .remove(path)
            .ok_or_else(|| StorageError::not_found(path))
    }

    /// Snapshot of the `path -> size` mapping for one owner
    pub fn owned_by(&self, owner: &Owner) -> BTreeMap<String, u64> {
        self.files
            .iter()
            .filter(|(_, record)| &record.owner == owner)
            .map(|(path, record)| (path.clone(), record.size))
            .collect()
    }

    /// Move every file of `from` to `to`, keeping paths. Returns bytes moved.
    pub fn reassign(&mut self, from: &Owner, to: &Owner) -> u64 {
        let mut moved = 0;
        for record in self.files.values_mut().filter(|r| &r.owner == from) {
            record.owner = to.clone();
            moved += record.size;
        }
        moved
    }

    /// Up to `n` files under `prefix`, largest first; equal sizes order by
    /// path descending.
    pub fn largest(&self, prefix: &str, n: usize) -> Vec<FileEntry> {
        if n == 0 {
            return Vec::new();
        }

        let mut matches: Vec<FileEntry> = self
            .files
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(|(path, _)| path.starts_with(prefix))
            .map(|(path, record)| FileEntry::new(path.as_str(), record.size))
            .collect();

        matches.sort_by(|a, b| match b.size.cmp(&a.size) {
            Ordering::Equal => b.path.cmp(&a.path),
            other => other,
        });
        matches.truncate(n);
        matches
    }
}
