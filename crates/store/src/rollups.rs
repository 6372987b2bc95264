//! Daily analytics rollups with atomic increments.
//!
//! One row per (profile, day). Counters only ever grow within a day, and
//! every increment runs inside a single write transaction: redb's
//! single-writer model is the upsert-with-increment primitive, so two
//! concurrent hits on a popular profile cannot lose updates.

use chrono::NaiveDate;
use cinegrok_core::analytics::{ClickType, DeviceCategory, ReferrerCategory};
use cinegrok_core::Result;
use redb::{ReadableDatabase, ReadableTable};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::db::{store_err, Store, TABLE_ROLLUPS};

/// Pre-aggregated counters for one profile-day.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRollup {
    pub profile_id: Uuid,
    pub date: NaiveDate,
    pub views: u64,
    pub clicks: u64,
    /// View counts by referrer category.
    #[serde(default)]
    pub referrers: HashMap<ReferrerCategory, u64>,
    /// View counts by device category.
    #[serde(default)]
    pub devices: HashMap<DeviceCategory, u64>,
    /// Click counts by target kind.
    #[serde(default)]
    pub click_types: HashMap<ClickType, u64>,
}

impl DailyRollup {
    fn new(profile_id: Uuid, date: NaiveDate) -> Self {
        Self {
            profile_id,
            date,
            views: 0,
            clicks: 0,
            referrers: HashMap::new(),
            devices: HashMap::new(),
            click_types: HashMap::new(),
        }
    }
}

/// Composite rollup key. The `%Y-%m-%d` date keeps keys lexicographically
/// ordered within a profile, which makes day ranges plain key ranges.
fn rollup_key(profile_id: Uuid, date: NaiveDate) -> String {
    format!("{}:{}", profile_id, date.format("%Y-%m-%d"))
}

impl Store {
    /// Record one profile view: bump the day's total and its referrer and
    /// device breakdowns in a single transaction.
    pub fn record_view(
        &self,
        profile_id: Uuid,
        date: NaiveDate,
        referrer: ReferrerCategory,
        device: DeviceCategory,
    ) -> Result<()> {
        self.bump_rollup(profile_id, date, |rollup| {
            rollup.views += 1;
            *rollup.referrers.entry(referrer).or_insert(0) += 1;
            *rollup.devices.entry(device).or_insert(0) += 1;
        })
    }

    /// Record one outbound click against the day's rollup.
    pub fn record_click(
        &self,
        profile_id: Uuid,
        date: NaiveDate,
        click_type: ClickType,
    ) -> Result<()> {
        self.bump_rollup(profile_id, date, |rollup| {
            rollup.clicks += 1;
            *rollup.click_types.entry(click_type).or_insert(0) += 1;
        })
    }

    /// Load rollups for a profile over an inclusive day range, oldest first.
    ///
    /// Days with no traffic have no row and are simply absent.
    pub fn rollups_in_range(
        &self,
        profile_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyRollup>> {
        let start = rollup_key(profile_id, from);
        let end = rollup_key(profile_id, to);

        let read_txn = self
            .db()
            .begin_read()
            .map_err(|e| store_err("begin read", e))?;
        let table = read_txn
            .open_table(TABLE_ROLLUPS)
            .map_err(|e| store_err("open rollups table", e))?;

        let mut out = Vec::new();
        for entry in table
            .range(start.as_str()..=end.as_str())
            .map_err(|e| store_err("range rollups", e))?
        {
            let (_, value) = entry.map_err(|e| store_err("read rollup row", e))?;
            let rollup: DailyRollup = serde_json::from_str(value.value())
                .map_err(|e| store_err("deserialize rollup", e))?;
            out.push(rollup);
        }
        Ok(out)
    }

    /// Apply one increment to a rollup row inside a single write transaction.
    fn bump_rollup(
        &self,
        profile_id: Uuid,
        date: NaiveDate,
        apply: impl FnOnce(&mut DailyRollup),
    ) -> Result<()> {
        let key = rollup_key(profile_id, date);

        let write_txn = self
            .db()
            .begin_write()
            .map_err(|e| store_err("begin write", e))?;
        {
            let mut table = write_txn
                .open_table(TABLE_ROLLUPS)
                .map_err(|e| store_err("open rollups table", e))?;

            let mut rollup = match table.get(key.as_str()).map_err(|e| store_err("get rollup", e))? {
                Some(guard) => serde_json::from_str(guard.value())
                    .map_err(|e| store_err("deserialize rollup", e))?,
                None => DailyRollup::new(profile_id, date),
            };

            apply(&mut rollup);

            let json =
                serde_json::to_string(&rollup).map_err(|e| store_err("serialize rollup", e))?;
            table
                .insert(key.as_str(), json.as_str())
                .map_err(|e| store_err("insert rollup", e))?;
        }
        write_txn.commit().map_err(|e| store_err("commit", e))?;
        Ok(())
    }
}
