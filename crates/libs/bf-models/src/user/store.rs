//! The account store contract and its in-memory backend.

use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::Utc;

use crate::prelude::*;
use crate::user::bfuser::{BfUser, BfUserCreate, BfUserUpdate};

/// Where accounts live.
///
/// Lookups are by username, which is also the subject carried in tokens.
pub trait CredentialStore: Send + Sync {
    /// Fetches an account. Fails with [`Error::NotFound`].
    fn find_by_subject(&self, username: &str) -> Result<BfUser>;

    /// Stores a new account. Fails with [`Error::Conflict`] if the username is taken.
    fn create(&self, user: BfUserCreate) -> Result<BfUser>;

    /// All accounts, ordered by username.
    fn list(&self) -> Result<Vec<BfUser>>;

    /// Applies a partial update. Fails with [`Error::EmptyUpdate`] when
    /// `changes` sets nothing and [`Error::NotFound`] for unknown accounts.
    fn update(&self, username: &str, changes: BfUserUpdate) -> Result<BfUser>;
}

/// Accounts kept in process memory. Lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<BTreeMap<String, BfUser>>,
}

impl CredentialStore for MemoryStore {
    fn find_by_subject(&self, username: &str) -> Result<BfUser> {
        let users = self.users.read().map_err(|_| Error::Poisoned)?;
        users.get(username).cloned().ok_or(Error::NotFound)
    }

    fn create(&self, user: BfUserCreate) -> Result<BfUser> {
        let mut users = self.users.write().map_err(|_| Error::Poisoned)?;
        if users.contains_key(&user.username) {
            return Err(Error::Conflict);
        }
        let user = user.into_user(Utc::now());
        users.insert(user.username.clone(), user.clone());
        Ok(user)
    }

    fn list(&self) -> Result<Vec<BfUser>> {
        let users = self.users.read().map_err(|_| Error::Poisoned)?;
        Ok(users.values().cloned().collect())
    }

    fn update(&self, username: &str, changes: BfUserUpdate) -> Result<BfUser> {
        if changes.is_empty() {
            return Err(Error::EmptyUpdate);
        }
        let mut users = self.users.write().map_err(|_| Error::Poisoned)?;
        let user = users.get_mut(username).ok_or(Error::NotFound)?;
        user.apply(changes);
        Ok(user.clone())
    }
}
