//! Profile CRUD and public listing.

use cinegrok_core::profile::{FilmmakerProfile, ProfileFields};
use cinegrok_core::{Error, Result};
use chrono::Utc;
use redb::{ReadableDatabase, ReadableTable};
use uuid::Uuid;

use crate::db::{store_err, Store, TABLE_PROFILES, TABLE_SLUGS};

/// A page of public profiles.
#[derive(Debug, Clone)]
pub struct ProfilePage {
    pub profiles: Vec<FilmmakerProfile>,
    pub total: usize,
}

impl Store {
    /// Create a profile, claiming a unique slug.
    ///
    /// Slug collisions get a numeric suffix (`jane-roe-2`). The slug claim
    /// and the profile insert share one write transaction.
    pub fn create_profile(
        &self,
        owner_id: Uuid,
        fields: ProfileFields,
        published: bool,
    ) -> Result<FilmmakerProfile> {
        let mut profile = FilmmakerProfile::new(owner_id, fields);
        profile.published = published;
        let id_key = profile.id.to_string();

        let write_txn = self
            .db()
            .begin_write()
            .map_err(|e| store_err("begin write", e))?;
        {
            let mut slugs = write_txn
                .open_table(TABLE_SLUGS)
                .map_err(|e| store_err("open slugs table", e))?;

            let base = profile.slug.clone();
            let mut candidate = base.clone();
            let mut suffix = 2;
            while slugs
                .get(candidate.as_str())
                .map_err(|e| store_err("get slug", e))?
                .is_some()
            {
                candidate = format!("{}-{}", base, suffix);
                suffix += 1;
            }
            profile.slug = candidate;

            slugs
                .insert(profile.slug.as_str(), id_key.as_str())
                .map_err(|e| store_err("insert slug", e))?;

            let mut profiles = write_txn
                .open_table(TABLE_PROFILES)
                .map_err(|e| store_err("open profiles table", e))?;
            let json =
                serde_json::to_string(&profile).map_err(|e| store_err("serialize profile", e))?;
            profiles
                .insert(id_key.as_str(), json.as_str())
                .map_err(|e| store_err("insert profile", e))?;
        }
        write_txn.commit().map_err(|e| store_err("commit", e))?;

        Ok(profile)
    }

    /// Fetch a profile by ID.
    pub fn get_profile(&self, id: Uuid) -> Result<Option<FilmmakerProfile>> {
        self.get_json(TABLE_PROFILES, &id.to_string())
    }

    /// Fetch a profile by ID, erroring when absent.
    pub fn require_profile(&self, id: Uuid) -> Result<FilmmakerProfile> {
        self.get_profile(id)?
            .ok_or_else(|| Error::not_found(format!("profile {}", id)))
    }

    /// Fetch a public profile by slug.
    pub fn get_profile_by_slug(&self, slug: &str) -> Result<Option<FilmmakerProfile>> {
        let Some(id) = self.get_string(TABLE_SLUGS, slug)? else {
            return Ok(None);
        };
        let id = Uuid::parse_str(&id).map_err(|e| store_err("parse profile id", e))?;
        self.get_profile(id)
    }

    /// Replace a profile's fields (and optionally its published state).
    ///
    /// The slug is claimed at creation and stays stable across edits so
    /// public links keep working. The slug index is untouched.
    pub fn update_profile(
        &self,
        id: Uuid,
        fields: ProfileFields,
        published: Option<bool>,
    ) -> Result<FilmmakerProfile> {
        let mut profile = self.require_profile(id)?;
        profile.fields = fields;
        if let Some(published) = published {
            profile.published = published;
        }
        profile.updated_at = Utc::now();
        self.put_json(TABLE_PROFILES, &id.to_string(), &profile)?;
        Ok(profile)
    }

    /// Store a generated biography on a profile.
    pub fn set_profile_bio(&self, id: Uuid, bio: String) -> Result<FilmmakerProfile> {
        let mut profile = self.require_profile(id)?;
        profile.bio = Some(bio);
        profile.updated_at = Utc::now();
        self.put_json(TABLE_PROFILES, &id.to_string(), &profile)?;
        Ok(profile)
    }

    /// Delete a profile and release its slug. Returns false when absent.
    pub fn delete_profile(&self, id: Uuid) -> Result<bool> {
        let Some(profile) = self.get_profile(id)? else {
            return Ok(false);
        };
        let id_key = id.to_string();

        let write_txn = self
            .db()
            .begin_write()
            .map_err(|e| store_err("begin write", e))?;
        {
            let mut profiles = write_txn
                .open_table(TABLE_PROFILES)
                .map_err(|e| store_err("open profiles table", e))?;
            profiles
                .remove(id_key.as_str())
                .map_err(|e| store_err("remove profile", e))?;

            let mut slugs = write_txn
                .open_table(TABLE_SLUGS)
                .map_err(|e| store_err("open slugs table", e))?;
            slugs
                .remove(profile.slug.as_str())
                .map_err(|e| store_err("remove slug", e))?;
        }
        write_txn.commit().map_err(|e| store_err("commit", e))?;

        Ok(true)
    }

    /// List published profiles, newest first, with offset pagination.
    pub fn list_published(&self, offset: usize, limit: usize) -> Result<ProfilePage> {
        let mut all = self.scan_profiles(|p| p.published)?;
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = all.len();
        let profiles = all.into_iter().skip(offset).take(limit).collect();
        Ok(ProfilePage { profiles, total })
    }

    /// List profiles owned by an account, newest first.
    pub fn list_profiles_by_owner(&self, owner_id: Uuid) -> Result<Vec<FilmmakerProfile>> {
        let mut owned = self.scan_profiles(|p| p.owner_id == owner_id)?;
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    /// Count profiles owned by an account.
    pub fn count_profiles_by_owner(&self, owner_id: Uuid) -> Result<usize> {
        Ok(self.scan_profiles(|p| p.owner_id == owner_id)?.len())
    }

    fn scan_profiles(
        &self,
        mut keep: impl FnMut(&FilmmakerProfile) -> bool,
    ) -> Result<Vec<FilmmakerProfile>> {
        let read_txn = self
            .db()
            .begin_read()
            .map_err(|e| store_err("begin read", e))?;
        let table = read_txn
            .open_table(TABLE_PROFILES)
            .map_err(|e| store_err("open profiles table", e))?;

        let mut out = Vec::new();
        for entry in table.iter().map_err(|e| store_err("iterate profiles", e))? {
            let (_, value) = entry.map_err(|e| store_err("read profile row", e))?;
            let profile: FilmmakerProfile = serde_json::from_str(value.value())
                .map_err(|e| store_err("deserialize profile", e))?;
            if keep(&profile) {
                out.push(profile);
            }
        }
        Ok(out)
    }
}
