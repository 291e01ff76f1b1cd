// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User repository.
//!
//! Users are keyed by id, with a unique email index maintained in the same
//! write transaction as the user document.

use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::database::{
    Database, DbError, DbResult, POSTS, PROFILES, USERS, USERS_BY_EMAIL,
};
use super::posts::Post;

/// User record as stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredUser {
    /// Unique user identifier (UUID)
    pub id: String,
    pub name: String,
    /// Normalized (trimmed, lowercase) email
    pub email: String,
    /// Gravatar URL
    pub avatar: String,
    /// Argon2id PHC string; never leaves the server
    pub password_hash: String,
    pub date: DateTime<Utc>,
}

/// Public view of a user (no password hash).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: String,
    pub date: DateTime<Utc>,
}

impl From<StoredUser> for UserResponse {
    fn from(user: StoredUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            avatar: user.avatar,
            date: user.date,
        }
    }
}

/// Outcome of creating a user.
#[derive(Debug, thiserror::Error)]
pub enum CreateUserError {
    #[error("a user with this email already exists")]
    EmailTaken,

    #[error(transparent)]
    Db(#[from] DbError),
}

/// What an account deletion removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccountRemoval {
    pub user: bool,
    pub profile: bool,
    pub posts: usize,
}

/// Trim and lowercase an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Repository for user records.
pub struct UserRepository<'a> {
    db: &'a Database,
}

impl<'a> UserRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Get a user by ID.
    pub fn get(&self, user_id: &str) -> DbResult<Option<StoredUser>> {
        self.db.get(USERS, user_id)
    }

    /// Look up a user by email (normalized before lookup).
    pub fn find_by_email(&self, email: &str) -> DbResult<Option<StoredUser>> {
        let email = normalize_email(email);
        let user_id = {
            let read_txn = self.db.raw().begin_read()?;
            let index = read_txn.open_table(USERS_BY_EMAIL)?;
            let found = index.get(email.as_str())?.map(|v| v.value().to_string());
            found
        };

        match user_id {
            Some(id) => self.get(&id),
            None => Ok(None),
        }
    }

    /// Create a new user, enforcing email uniqueness.
    pub fn create(&self, user: &StoredUser) -> Result<(), CreateUserError> {
        let json = serde_json::to_vec(user).map_err(DbError::from)?;

        let write_txn = self.db.raw().begin_write().map_err(DbError::from)?;
        {
            let mut index = write_txn
                .open_table(USERS_BY_EMAIL)
                .map_err(DbError::from)?;
            let taken = index
                .get(user.email.as_str())
                .map_err(DbError::from)?
                .is_some();
            if taken {
                return Err(CreateUserError::EmailTaken);
            }
            index
                .insert(user.email.as_str(), user.id.as_str())
                .map_err(DbError::from)?;

            let mut users = write_txn.open_table(USERS).map_err(DbError::from)?;
            users
                .insert(user.id.as_str(), json.as_slice())
                .map_err(DbError::from)?;
        }
        write_txn.commit().map_err(DbError::from)?;
        Ok(())
    }

    /// Delete a user together with its email index entry, profile and posts.
    ///
    /// Everything goes in one write transaction: either the whole account is
    /// removed or nothing is.
    pub fn delete_account(&self, user_id: &str) -> DbResult<AccountRemoval> {
        let write_txn = self.db.raw().begin_write()?;
        let removal = {
            let mut users = write_txn.open_table(USERS)?;
            let stored = users.remove(user_id)?.map(|value| value.value().to_vec());
            let user = match stored {
                Some(bytes) => Some(serde_json::from_slice::<StoredUser>(&bytes)?),
                None => None,
            };
            if let Some(user) = &user {
                let mut index = write_txn.open_table(USERS_BY_EMAIL)?;
                index.remove(user.email.as_str())?;
            }

            let mut profiles = write_txn.open_table(PROFILES)?;
            let profile = profiles.remove(user_id)?.is_some();

            let mut posts = write_txn.open_table(POSTS)?;
            let mut authored = Vec::new();
            for entry in posts.iter()? {
                let (key, value) = entry?;
                let post: Post = serde_json::from_slice(value.value())?;
                if post.user == user_id {
                    authored.push(key.value().to_string());
                }
            }
            for post_id in &authored {
                posts.remove(post_id.as_str())?;
            }

            AccountRemoval {
                user: user.is_some(),
                profile,
                posts: authored.len(),
            }
        };
        write_txn.commit()?;
        Ok(removal)
    }
}
