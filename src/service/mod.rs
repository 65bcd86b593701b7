//! Storage service
//!
//! [`StorageService`] owns the file index, the user registry and the backup
//! store, and keeps them consistent: every user's usage equals the bytes it
//! owns and never exceeds its capacity, and a path is held by at most one
//! owner. Each operation applies completely or returns an error with no
//! change.


use log::{debug, info, warn};
use std::collections::BTreeMap;

use crate::backup::{Backup, BackupStore};
use crate::config::ServiceConfig;
use crate::error::{Result, StorageError};
use crate::quota::{UserQuota, UserRegistry};
use crate::storage::{FileEntry, FileIndex, Owner};

/// Operation set of a multi-tenant file store
pub trait CloudStorage {
    /// Add an unowned file. Returns the total number of files afterwards.
    fn add_file(&mut self, path: &str, size: u64) -> Result<usize>;

    /// Add a file billed to `user_id`. Returns the user's remaining capacity.
    fn add_file_by(&mut self, user_id: &str, path: &str, size: u64) -> Result<u64>;

    fn get_file_size(&self, path: &str) -> Result<u64>;

    /// Delete a file and return its size
    fn delete_file(&mut self, path: &str) -> Result<u64>;

    /// Up to `n` paths starting with `prefix`, by size then path, both descending
    fn get_n_largest(&self, prefix: &str, n: usize) -> Vec<String>;

    fn add_user(&mut self, user_id: &str, capacity: u64) -> Result<()>;

    /// Move all of `source_id`'s files and capacity to `target_id`.
    /// Returns the target's new usage.
    fn merge_user(&mut self, source_id: &str, target_id: &str) -> Result<u64>;

    /// Current usage in bytes
    fn calculate_storage(&self, user_id: &str) -> Result<u64>;

    /// Snapshot the user's files. Returns the number of files backed up.
    fn backup_user(&mut self, user_id: &str) -> Result<usize>;

    /// Reset the user's files to the last backup. Returns the number of
    /// files the user owns afterwards.
    ///
    /// Fails with `Duplicate` and changes nothing when a backed-up path that
    /// has to be recreated is now held by another owner.
    fn restore_user(&mut self, user_id: &str) -> Result<usize>;
}

/// In-memory storage service
#[derive(Debug, Clone)]
pub struct StorageService {
    files: FileIndex,
    users: UserRegistry,
    backups: BackupStore,
    system_owner: String,
}

impl Default for StorageService {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageService {
    /// Create an empty service with the default system owner id
    pub fn new() -> Self {
        Self::with_system_owner(ServiceConfig::default().system_owner)
    }

    pub fn with_system_owner(system_owner: impl Into<String>) -> Self {
        Self {
            files: FileIndex::new(),
            users: UserRegistry::new(),
            backups: BackupStore::new(),
            system_owner: system_owner.into(),
        }
    }

    /// Create a service and provision the configured seed users
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let mut service = Self::with_system_owner(config.system_owner.clone());
        for seed in &config.seed_users {
            service.add_user(&seed.id, seed.capacity)?;
        }
        info!(
            "Storage service initialised with {} seed users, system owner: {}",
            config.seed_users.len(),
            config.system_owner
        );
        Ok(service)
    }

    pub fn system_owner(&self) -> &str {
        &self.system_owner
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains(path)
    }

    /// Same selection as [`CloudStorage::get_n_largest`], with sizes
    pub fn largest_entries(&self, prefix: &str, n: usize) -> Vec<FileEntry> {
        self.files.largest(prefix, n)
    }

    pub fn remaining_capacity(&self, user_id: &str) -> Result<u64> {
        Ok(self.users.active(user_id)?.remaining())
    }

    pub fn user_quota(&self, user_id: &str) -> Result<UserQuota> {
        self.users.active(user_id).cloned()
    }

    /// Number of files currently owned by an active user
    pub fn user_file_count(&self, user_id: &str) -> Result<usize> {
        let owner = self.active_owner(user_id)?;
        Ok(self.files.owned_by(&owner).len())
    }

    /// Current backup of a user or of the system owner
    pub fn backup_info(&self, user_id: &str) -> Result<&Backup> {
        let owner = self.backup_owner(user_id)?;
        self.backups
            .get(&owner)
            .ok_or_else(|| StorageError::no_backup(user_id))
    }

    fn active_owner(&self, user_id: &str) -> Result<Owner> {
        self.users.active(user_id)?;
        Ok(Owner::user(user_id))
    }

    /// Backups also accept the system owner id, standing for unowned files
    fn backup_owner(&self, user_id: &str) -> Result<Owner> {
        if user_id == self.system_owner {
            return Ok(Owner::System);
        }
        self.active_owner(user_id)
    }
}

impl CloudStorage for StorageService {
    fn add_file(&mut self, path: &str, size: u64) -> Result<usize> {
        self.files.insert(path, size, Owner::System)?;
        debug!("Added system file {} ({} bytes)", path, size);
        Ok(self.files.len())
    }

    fn add_file_by(&mut self, user_id: &str, path: &str, size: u64) -> Result<u64> {
        let _mdc = log_mdc::insert_scoped("user", user_id);

        let quota = self.users.active(user_id)?;
        if self.files.contains(path) {
            return Err(StorageError::duplicate(path));
        }
        if quota.would_exceed(size) {
            warn!(
                "Rejected {} ({} bytes): only {} bytes left",
                path,
                size,
                quota.remaining()
            );
            return Err(StorageError::capacity(user_id, size, quota.remaining()));
        }

        self.files.insert(path, size, Owner::user(user_id))?;
        let remaining = self.users.active_mut(user_id)?.charge(size)?;
        debug!("Added {} ({} bytes), {} bytes remaining", path, size, remaining);
        Ok(remaining)
    }

    fn get_file_size(&self, path: &str) -> Result<u64> {
        self.files
            .get(path)
            .map(|record| record.size)
            .ok_or_else(|| StorageError::not_found(path))
    }

    fn delete_file(&mut self, path: &str) -> Result<u64> {
        let record = self.files.remove(path)?;
        if let Owner::User(user_id) = &record.owner {
            self.users.active_mut(user_id)?.release(record.size);
        }
        debug!("Deleted {} ({} bytes) owned by {}", path, record.size, record.owner);
        Ok(record.size)
    }

    fn get_n_largest(&self, prefix: &str, n: usize) -> Vec<String> {
        self.files
            .largest(prefix, n)
            .into_iter()
            .map(|entry| entry.path)
            .collect()
    }

    fn add_user(&mut self, user_id: &str, capacity: u64) -> Result<()> {
        if user_id == self.system_owner {
            return Err(StorageError::duplicate(format!("reserved user {}", user_id)));
        }
        self.users.register(user_id, capacity)?;
        info!("Registered user {} with capacity {}", user_id, capacity);
        Ok(())
    }

    fn merge_user(&mut self, source_id: &str, target_id: &str) -> Result<u64> {
        let source = self.users.active(source_id)?;
        let target = self.users.active(target_id)?;
        if source_id == target_id {
            return Err(StorageError::invalid_argument(format!(
                "cannot merge user {} into itself",
                source_id
            )));
        }
        let (capacity, usage) = target.combined_with(source)?;

        let source_owner = Owner::user(source_id);
        let moved = self.files.reassign(&source_owner, &Owner::user(target_id));
        let retired = self.users.retire(source_id, target_id)?;
        debug_assert_eq!(moved, retired.usage);
        if self.backups.remove(&source_owner).is_some() {
            debug!("Discarded backup of merged user {}", source_id);
        }

        let target = self.users.active_mut(target_id)?;
        target.capacity = capacity;
        target.usage = usage;

        info!(
            "Merged user {} into {} ({} bytes, {} capacity moved), usage now {}/{}",
            source_id, target_id, retired.usage, retired.capacity, usage, capacity
        );
        Ok(usage)
    }

    fn calculate_storage(&self, user_id: &str) -> Result<u64> {
        Ok(self.users.active(user_id)?.usage)
    }

    fn backup_user(&mut self, user_id: &str) -> Result<usize> {
        let _mdc = log_mdc::insert_scoped("user", user_id);

        let owner = self.backup_owner(user_id)?;
        let backup = Backup::new(owner.clone(), self.files.owned_by(&owner));
        let count = backup.file_count();
        if self.backups.put(backup).is_some() {
            debug!("Replaced previous backup of {}", owner);
        }
        info!("Backed up {} files of {}", count, owner);
        Ok(count)
    }

    fn restore_user(&mut self, user_id: &str) -> Result<usize> {
        let _mdc = log_mdc::insert_scoped("user", user_id);

        let owner = self.backup_owner(user_id)?;
        let backup = self
            .backups
            .get(&owner)
            .ok_or_else(|| StorageError::no_backup(user_id))?;
        let wanted = backup.files().clone();
        let restored_usage = backup.total_bytes();
        let taken_at = backup.taken_at;
        let current = self.files.owned_by(&owner);

        // Validate everything before touching state
        let mut to_remove = Vec::new();
        for (path, size) in &current {
            if wanted.get(path) != Some(size) {
                to_remove.push(path.clone());
            }
        }
        let mut to_create = BTreeMap::new();
        for (path, size) in &wanted {
            if current.get(path) == Some(size) {
                continue;
            }
            if self.files.contains(path) && !current.contains_key(path) {
                return Err(StorageError::duplicate(path.as_str()));
            }
            to_create.insert(path.clone(), *size);
        }
        if let Owner::User(id) = &owner {
            let quota = self.users.active(id)?;
            if restored_usage > quota.capacity {
                return Err(StorageError::capacity(
                    id.as_str(),
                    restored_usage,
                    quota.capacity,
                ));
            }
        }

        for path in &to_remove {
            self.files.remove(path)?;
        }
        for (path, size) in &to_create {
            self.files.insert(path, *size, owner.clone())?;
        }
        if let Owner::User(id) = &owner {
            self.users.active_mut(id)?.usage = restored_usage;
        }

        info!(
            "Restored {} from backup taken at {}: {} removed, {} recreated",
            owner,
            taken_at.to_rfc3339(),
            to_remove.len(),
            to_create.len()
        );
        Ok(wanted.len())
    }
}
