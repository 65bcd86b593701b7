//! User Quotas
//!
//! Tracks every registered user's capacity and current usage, and the
//! lifecycle of user ids (active, or merged into another user).

pub mod registry;

use crate::error::{Result, StorageError};
use crate::storage::UserId;
use serde::{Deserialize, Serialize};

pub use registry::UserRegistry;

/// Per-user storage quota.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserQuota {
    /// User ID
    pub user_id: UserId,

    /// Maximum allowed bytes
    pub capacity: u64,

    /// Bytes currently owned
    pub usage: u64,
}

impl UserQuota {
    pub fn new(user_id: impl Into<UserId>, capacity: u64) -> Self {
        Self {
            user_id: user_id.into(),
            capacity,
            usage: 0,
        }
    }

    /// Check if adding `additional_bytes` would exceed capacity.
    pub fn would_exceed(&self, additional_bytes: u64) -> bool {
        match self.usage.checked_add(additional_bytes) {
            Some(total) => total > self.capacity,
            None => true,
        }
    }

    /// Remaining bytes available.
    pub fn remaining(&self) -> u64 {
        self.capacity.saturating_sub(self.usage)
    }

    /// Bill `size` bytes to this user, returning the remaining capacity.
    pub fn charge(&mut self, size: u64) -> Result<u64> {
        if self.would_exceed(size) {
            return Err(StorageError::capacity(&self.user_id, size, self.remaining()));
        }
        self.usage += size;
        Ok(self.remaining())
    }

    /// Return `size` bytes to this user.
    pub fn release(&mut self, size: u64) {
        self.usage = self.usage.saturating_sub(size);
    }

    /// Capacity and usage this quota would have after absorbing `other`.
    /// Fails only on arithmetic overflow.
    pub fn combined_with(&self, other: &UserQuota) -> Result<(u64, u64)> {
        let overflow = || StorageError::capacity(&self.user_id, other.usage, self.remaining());
        let capacity = self.capacity.checked_add(other.capacity).ok_or_else(overflow)?;
        let usage = self.usage.checked_add(other.usage).ok_or_else(overflow)?;
        Ok((capacity, usage))
    }
}

/// Lifecycle of a user id
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserState {
    Active(UserQuota),
    /// Terminal: the user was merged into another one
    Merged { into: UserId },
}
