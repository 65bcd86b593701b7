//! Registry of user ids and their quotas

use crate::error::{Result, StorageError};
use crate::quota::{UserQuota, UserState};
use crate::storage::UserId;
use std::collections::HashMap;

/// All user ids ever registered. Merged ids stay reserved.
#[derive(Debug, Default, Clone)]
pub struct UserRegistry {
    users: HashMap<UserId, UserState>,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new active user with zero usage. Merged ids are not
    /// found, like every other operation on them.
    pub fn register(&mut self, user_id: &str, capacity: u64) -> Result<()> {
        match self.users.get(user_id) {
            Some(UserState::Active(_)) => {
                return Err(StorageError::duplicate(format!("user {}", user_id)));
            }
            Some(UserState::Merged { .. }) => return Err(self.missing(user_id)),
            None => {}
        }
        self.users.insert(
            user_id.to_string(),
            UserState::Active(UserQuota::new(user_id, capacity)),
        );
        Ok(())
    }

    /// Quota of an active user; unknown and merged ids are not found
    pub fn active(&self, user_id: &str) -> Result<&UserQuota> {
        match self.users.get(user_id) {
            Some(UserState::Active(quota)) => Ok(quota),
            _ => Err(self.missing(user_id)),
        }
    }

    pub fn active_mut(&mut self, user_id: &str) -> Result<&mut UserQuota> {
        self.active(user_id)?;
        match self.users.get_mut(user_id) {
            Some(UserState::Active(quota)) => Ok(quota),
            _ => Err(StorageError::not_found(format!("user {}", user_id))),
        }
    }

    /// Where a merged id went, if it was merged
    pub fn merged_into(&self, user_id: &str) -> Option<&str> {
        match self.users.get(user_id) {
            Some(UserState::Merged { into }) => Some(into),
            _ => None,
        }
    }

    fn missing(&self, user_id: &str) -> StorageError {
        match self.merged_into(user_id) {
            Some(into) => StorageError::not_found(format!("user {} (merged into {})", user_id, into)),
            None => StorageError::not_found(format!("user {}", user_id)),
        }
    }

    /// Mark `user_id` as merged into `into`, returning its final quota
    pub fn retire(&mut self, user_id: &str, into: &str) -> Result<UserQuota> {
        let previous = self.active(user_id)?.clone();
        self.users.insert(
            user_id.to_string(),
            UserState::Merged {
                into: into.to_string(),
            },
        );
        Ok(previous)
    }

    pub fn active_quotas(&self) -> impl Iterator<Item = &UserQuota> {
        self.users.values().filter_map(|state| match state {
            UserState::Active(quota) => Some(quota),
            UserState::Merged { .. } => None,
        })
    }
}
