//! Collaboration-interest bookmarks.
//!
//! Bookmarks are keyed `{account_uuid}:{profile_uuid}` so one account's
//! bookmarks form a contiguous key range and listing is a prefix scan.

use chrono::{DateTime, Utc};
use cinegrok_core::Result;
use redb::ReadableDatabase;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{store_err, Store, TABLE_BOOKMARKS};

/// One saved filmmaker on an account's shortlist.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub account_id: Uuid,
    pub filmmaker_id: Uuid,
    pub created_at: DateTime<Utc>,
}

fn bookmark_key(account_id: Uuid, filmmaker_id: Uuid) -> String {
    format!("{}:{}", account_id, filmmaker_id)
}

impl Store {
    /// Bookmark a filmmaker. Re-bookmarking is a no-op that keeps the
    /// original timestamp.
    pub fn add_bookmark(&self, account_id: Uuid, filmmaker_id: Uuid) -> Result<Bookmark> {
        let key = bookmark_key(account_id, filmmaker_id);
        if let Some(existing) = self.get_json::<Bookmark>(TABLE_BOOKMARKS, &key)? {
            return Ok(existing);
        }

        let bookmark = Bookmark {
            account_id,
            filmmaker_id,
            created_at: Utc::now(),
        };
        self.put_json(TABLE_BOOKMARKS, &key, &bookmark)?;
        Ok(bookmark)
    }

    /// Remove a bookmark. Returns false when it did not exist.
    pub fn remove_bookmark(&self, account_id: Uuid, filmmaker_id: Uuid) -> Result<bool> {
        let key = bookmark_key(account_id, filmmaker_id);

        let write_txn = self
            .db()
            .begin_write()
            .map_err(|e| store_err("begin write", e))?;
        let removed;
        {
            let mut table = write_txn
                .open_table(TABLE_BOOKMARKS)
                .map_err(|e| store_err("open bookmarks table", e))?;
            removed = table
                .remove(key.as_str())
                .map_err(|e| store_err("remove bookmark", e))?
                .is_some();
        }
        write_txn.commit().map_err(|e| store_err("commit", e))?;

        Ok(removed)
    }

    /// List an account's bookmarks, newest first.
    pub fn list_bookmarks(&self, account_id: Uuid) -> Result<Vec<Bookmark>> {
        // ':' sorts just below ';', so this range covers exactly the
        // account's key prefix.
        let start = format!("{}:", account_id);
        let end = format!("{};", account_id);

        let read_txn = self
            .db()
            .begin_read()
            .map_err(|e| store_err("begin read", e))?;
        let table = read_txn
            .open_table(TABLE_BOOKMARKS)
            .map_err(|e| store_err("open bookmarks table", e))?;

        let mut out: Vec<Bookmark> = Vec::new();
        for entry in table
            .range(start.as_str()..end.as_str())
            .map_err(|e| store_err("range bookmarks", e))?
        {
            let (_, value) = entry.map_err(|e| store_err("read bookmark row", e))?;
            let bookmark = serde_json::from_str(value.value())
                .map_err(|e| store_err("deserialize bookmark", e))?;
            out.push(bookmark);
        }
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }
}
