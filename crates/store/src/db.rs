//! Database initialization and table definitions.

use cinegrok_core::error::{DbErrorCode, Error, Result};
use redb::{Database, ReadableDatabase, TableDefinition};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use tracing::info;

use crate::config::StoreConfig;

/// Profiles by ID.
///
/// Key: profile UUID as string
/// Value: JSON-serialized FilmmakerProfile
pub(crate) const TABLE_PROFILES: TableDefinition<&str, &str> =
    TableDefinition::new("profiles_v1");

/// Slug index for public lookups.
///
/// Key: slug, Value: profile UUID as string
pub(crate) const TABLE_SLUGS: TableDefinition<&str, &str> = TableDefinition::new("slugs_v1");

/// Accounts by ID.
pub(crate) const TABLE_ACCOUNTS: TableDefinition<&str, &str> =
    TableDefinition::new("accounts_v1");

/// API key index.
///
/// Key: raw API key, Value: account UUID as string
pub(crate) const TABLE_ACCOUNT_KEYS: TableDefinition<&str, &str> =
    TableDefinition::new("account_keys_v1");

/// Email uniqueness index.
///
/// Key: lowercased email, Value: account UUID as string
pub(crate) const TABLE_ACCOUNT_EMAILS: TableDefinition<&str, &str> =
    TableDefinition::new("account_emails_v1");

/// Daily analytics rollups.
///
/// Key: composite `{profile_uuid}:{YYYY-MM-DD}`. The date formatting keeps
/// keys lexicographically ordered within a profile, so day ranges are
/// plain key ranges.
/// Value: JSON-serialized DailyRollup
pub(crate) const TABLE_ROLLUPS: TableDefinition<&str, &str> =
    TableDefinition::new("rollups_v1");

/// Collaboration-interest bookmarks.
///
/// Key: composite `{account_uuid}:{profile_uuid}`
/// Value: JSON-serialized Bookmark
pub(crate) const TABLE_BOOKMARKS: TableDefinition<&str, &str> =
    TableDefinition::new("bookmarks_v1");

/// Map a redb or serialization failure into the coded store error.
pub(crate) fn store_err(context: &str, err: impl std::fmt::Display) -> Error {
    Error::database(DbErrorCode::StoreFailed, format!("{}: {}", context, err))
}

/// The embedded store.
///
/// Cheap to clone behind an `Arc` at the application level; redb handles
/// its own locking (many readers, single writer).
pub struct Store {
    db: Database,
}

impl Store {
    /// Open (or create) the database and ensure all tables exist.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        if let Some(parent) = Path::new(&config.path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| store_err("create data directory", e))?;
            }
        }

        let db = Database::create(&config.path).map_err(|e| store_err("open database", e))?;

        let write_txn = db.begin_write().map_err(|e| store_err("begin write", e))?;
        {
            write_txn
                .open_table(TABLE_PROFILES)
                .map_err(|e| store_err("open profiles table", e))?;
            write_txn
                .open_table(TABLE_SLUGS)
                .map_err(|e| store_err("open slugs table", e))?;
            write_txn
                .open_table(TABLE_ACCOUNTS)
                .map_err(|e| store_err("open accounts table", e))?;
            write_txn
                .open_table(TABLE_ACCOUNT_KEYS)
                .map_err(|e| store_err("open account keys table", e))?;
            write_txn
                .open_table(TABLE_ACCOUNT_EMAILS)
                .map_err(|e| store_err("open account emails table", e))?;
            write_txn
                .open_table(TABLE_ROLLUPS)
                .map_err(|e| store_err("open rollups table", e))?;
            write_txn
                .open_table(TABLE_BOOKMARKS)
                .map_err(|e| store_err("open bookmarks table", e))?;
        }
        write_txn
            .commit()
            .map_err(|e| store_err("commit table init", e))?;

        info!(path = %config.path, "Opened embedded store");

        Ok(Self { db })
    }

    pub(crate) fn db(&self) -> &Database {
        &self.db
    }

    /// Fetch and deserialize one value from a table.
    pub(crate) fn get_json<T: DeserializeOwned>(
        &self,
        table: TableDefinition<&str, &str>,
        key: &str,
    ) -> Result<Option<T>> {
        let read_txn = self.db.begin_read().map_err(|e| store_err("begin read", e))?;
        let table = read_txn
            .open_table(table)
            .map_err(|e| store_err("open table", e))?;

        match table.get(key).map_err(|e| store_err("get", e))? {
            Some(guard) => {
                let value = serde_json::from_str(guard.value())
                    .map_err(|e| store_err("deserialize record", e))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Fetch one raw string value from an index table.
    pub(crate) fn get_string(
        &self,
        table: TableDefinition<&str, &str>,
        key: &str,
    ) -> Result<Option<String>> {
        let read_txn = self.db.begin_read().map_err(|e| store_err("begin read", e))?;
        let table = read_txn
            .open_table(table)
            .map_err(|e| store_err("open table", e))?;

        Ok(table
            .get(key)
            .map_err(|e| store_err("get", e))?
            .map(|guard| guard.value().to_string()))
    }

    /// Serialize and store one value in a table.
    pub(crate) fn put_json<T: Serialize>(
        &self,
        table: TableDefinition<&str, &str>,
        key: &str,
        value: &T,
    ) -> Result<()> {
        let json = serde_json::to_string(value).map_err(|e| store_err("serialize record", e))?;

        let write_txn = self.db.begin_write().map_err(|e| store_err("begin write", e))?;
        {
            let mut table = write_txn
                .open_table(table)
                .map_err(|e| store_err("open table", e))?;
            table
                .insert(key, json.as_str())
                .map_err(|e| store_err("insert", e))?;
        }
        write_txn.commit().map_err(|e| store_err("commit", e))?;
        Ok(())
    }
}
