// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded document database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `users`: user_id → serialized StoredUser
//! - `users_by_email`: normalized email → user_id
//! - `profiles`: owner user_id → serialized Profile
//! - `posts`: post_id → serialized Post
//!
//! Documents are stored as JSON bytes. Read-modify-write of a single document
//! happens inside one write transaction.

use std::path::Path;

use redb::{ReadableDatabase, ReadableTable, TableDefinition};
use serde::{de::DeserializeOwned, Serialize};

// =============================================================================
// Table Definitions
// =============================================================================

/// A table of JSON documents keyed by string id.
pub type Collection = TableDefinition<'static, &'static str, &'static [u8]>;

pub const USERS: Collection = TableDefinition::new("users");

/// Unique index: normalized email → user_id.
pub const USERS_BY_EMAIL: TableDefinition<&str, &str> = TableDefinition::new("users_by_email");

pub const PROFILES: Collection = TableDefinition::new("profiles");

pub const POSTS: Collection = TableDefinition::new("posts");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Database
// =============================================================================

/// Embedded document store.
pub struct Database {
    db: redb::Database,
}

impl Database {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> DbResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let db = redb::Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(USERS_BY_EMAIL)?;
            let _ = write_txn.open_table(PROFILES)?;
            let _ = write_txn.open_table(POSTS)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Underlying redb handle, for repositories that span several tables.
    pub(crate) fn raw(&self) -> &redb::Database {
        &self.db
    }

    /// Check that a read transaction can be opened.
    pub fn ping(&self) -> DbResult<()> {
        let read_txn = self.db.begin_read()?;
        let _ = read_txn.open_table(USERS)?;
        Ok(())
    }

    /// Fetch one document.
    pub fn get<T: DeserializeOwned>(&self, collection: Collection, key: &str) -> DbResult<Option<T>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(collection)?;
        match table.get(key)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Insert or replace one document.
    pub fn put<T: Serialize>(&self, collection: Collection, key: &str, doc: &T) -> DbResult<()> {
        let json = serde_json::to_vec(doc)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(collection)?;
            table.insert(key, json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Remove one document. Returns whether it existed.
    pub fn remove(&self, collection: Collection, key: &str) -> DbResult<bool> {
        let write_txn = self.db.begin_write()?;
        let existed = {
            let mut table = write_txn.open_table(collection)?;
            let removed = table.remove(key)?.is_some();
            removed
        };
        write_txn.commit()?;
        Ok(existed)
    }

    /// Read every document in a collection.
    pub fn scan<T: DeserializeOwned>(&self, collection: Collection) -> DbResult<Vec<T>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(collection)?;

        let mut docs = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            docs.push(serde_json::from_slice(value.value())?);
        }
        Ok(docs)
    }

    /// Create or replace one document from its current value, atomically.
    ///
    /// `f` receives the stored document, or `None` if there is none, and
    /// returns the document to write.
    pub fn upsert<T, F>(&self, collection: Collection, key: &str, f: F) -> DbResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(Option<T>) -> T,
    {
        let write_txn = self.db.begin_write()?;
        let doc = {
            let mut table = write_txn.open_table(collection)?;
            let existing = table.get(key)?.map(|value| value.value().to_vec());
            let existing: Option<T> = existing
                .map(|bytes| serde_json::from_slice(&bytes))
                .transpose()?;

            let doc = f(existing);
            let json = serde_json::to_vec(&doc)?;
            table.insert(key, json.as_slice())?;
            doc
        };
        write_txn.commit()?;
        Ok(doc)
    }

    /// Read-modify-write one document atomically.
    ///
    /// Returns `Ok(None)` if the document does not exist. If `f` fails, the
    /// transaction is dropped and nothing is written.
    pub fn update<T, R, E, F>(&self, collection: Collection, key: &str, f: F) -> Result<Option<R>, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<DbError>,
        F: FnOnce(&mut T) -> Result<R, E>,
    {
        let write_txn = self.db.begin_write().map_err(DbError::from)?;
        let result = {
            let mut table = write_txn.open_table(collection).map_err(DbError::from)?;

            let existing = table
                .get(key)
                .map_err(DbError::from)?
                .map(|value| value.value().to_vec());
            let Some(existing) = existing else {
                return Ok(None);
            };

            let mut doc: T = serde_json::from_slice(&existing).map_err(DbError::from)?;
            let result = f(&mut doc)?;

            let json = serde_json::to_vec(&doc).map_err(DbError::from)?;
            table.insert(key, json.as_slice()).map_err(DbError::from)?;
            result
        };
        write_txn.commit().map_err(DbError::from)?;
        Ok(Some(result))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde::Deserialize;

    pub(crate) fn temp_db() -> (Database, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("test.redb")).unwrap();
        (db, dir)
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Doc {
        name: String,
        count: u32,
    }

    #[test]
    fn put_get_and_remove() {
        let (db, _dir) = temp_db();
        let doc = Doc {
            name: "a".into(),
            count: 1,
        };
        db.put(POSTS, "k1", &doc).unwrap();

        assert_eq!(db.get::<Doc>(POSTS, "k1").unwrap(), Some(doc));
        assert!(db.remove(POSTS, "k1").unwrap());
        assert!(!db.remove(POSTS, "k1").unwrap());
        assert_eq!(db.get::<Doc>(POSTS, "k1").unwrap(), None);
    }

    #[test]
    fn scan_returns_all_documents() {
        let (db, _dir) = temp_db();
        for i in 0..3 {
            let doc = Doc {
                name: format!("d{i}"),
                count: i,
            };
            db.put(POSTS, &format!("k{i}"), &doc).unwrap();
        }
        let docs: Vec<Doc> = db.scan(POSTS).unwrap();
        assert_eq!(docs.len(), 3);
    }

    #[test]
    fn update_modifies_in_place() {
        let (db, _dir) = temp_db();
        db.put(
            POSTS,
            "k1",
            &Doc {
                name: "a".into(),
                count: 1,
            },
        )
        .unwrap();

        let result: Result<Option<u32>, DbError> = db.update(POSTS, "k1", |doc: &mut Doc| {
            doc.count += 1;
            Ok(doc.count)
        });
        assert_eq!(result.unwrap(), Some(2));
        assert_eq!(db.get::<Doc>(POSTS, "k1").unwrap().unwrap().count, 2);
    }

    #[test]
    fn update_of_missing_document_is_none() {
        let (db, _dir) = temp_db();
        let result: Result<Option<()>, DbError> = db.update(POSTS, "nope", |_: &mut Doc| Ok(()));
        assert!(result.unwrap().is_none());
    }

    #[derive(Debug)]
    enum TestError {
        Rejected,
        Db,
    }

    impl From<DbError> for TestError {
        fn from(_: DbError) -> Self {
            TestError::Db
        }
    }

    #[test]
    fn failed_update_writes_nothing() {
        let (db, _dir) = temp_db();
        db.put(
            POSTS,
            "k1",
            &Doc {
                name: "a".into(),
                count: 1,
            },
        )
        .unwrap();

        let result: Result<Option<()>, TestError> = db.update(POSTS, "k1", |doc: &mut Doc| {
            doc.count = 99;
            Err(TestError::Rejected)
        });
        assert!(matches!(result, Err(TestError::Rejected)));
        assert_eq!(db.get::<Doc>(POSTS, "k1").unwrap().unwrap().count, 1);
    }

    #[test]
    fn upsert_creates_then_sees_existing() {
        let (db, _dir) = temp_db();
        let created: Doc = db
            .upsert(POSTS, "k1", |existing: Option<Doc>| {
                assert!(existing.is_none());
                Doc {
                    name: "a".into(),
                    count: 1,
                }
            })
            .unwrap();
        assert_eq!(created.count, 1);

        let updated: Doc = db
            .upsert(POSTS, "k1", |existing: Option<Doc>| {
                let mut doc = existing.unwrap();
                doc.count += 1;
                doc
            })
            .unwrap();
        assert_eq!(updated.count, 2);
        assert_eq!(db.get::<Doc>(POSTS, "k1").unwrap(), Some(updated));
    }

    #[test]
    fn ping_succeeds_on_open_database() {
        let (db, _dir) = temp_db();
        db.ping().unwrap();
    }
}
