//! Filmmaker profile types, validation, and import parsing.
//!
//! This module handles:
//! - The flat profile field bag shared by scoring and bio generation
//! - Submission validation (form wizard and spreadsheet import paths)
//! - Supporting 3 import payload formats (array, object with profiles, single)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use crate::error::{Error, Result};
use crate::limits::MAX_IMPORT_PROFILES;

/// A notable film credit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Film {
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    /// Release year, kept as text ("2020", "in production").
    #[validate(length(max = 32))]
    pub year: Option<String>,
}

/// Flat field bag for a filmmaker profile.
///
/// Strings count as populated when non-empty after trim; lists when
/// non-empty. Completeness scoring and the bio template both consume
/// this shape directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileFields {
    #[validate(length(max = 120))]
    pub display_name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 8))]
    pub roles: Vec<String>,
    #[validate(length(max = 160))]
    pub location: Option<String>,
    #[serde(default)]
    #[validate(length(max = 10))]
    pub genres: Vec<String>,
    /// Era or movement the filmmaker identifies with ("new wave", "mumblecore").
    #[validate(length(max = 120))]
    pub era: Option<String>,
    #[validate(length(max = 1000))]
    pub style: Option<String>,
    #[validate(length(max = 1000))]
    pub philosophy: Option<String>,
    #[serde(default)]
    #[validate(length(max = 15))]
    pub influences: Vec<String>,
    #[serde(default)]
    #[validate(length(max = 25), nested)]
    pub films: Vec<Film>,
    #[serde(default)]
    #[validate(length(max = 15))]
    pub awards: Vec<String>,
    #[validate(length(max = 2048))]
    pub website: Option<String>,
    #[validate(length(max = 120))]
    pub instagram: Option<String>,
    #[validate(length(max = 2048))]
    pub showreel_url: Option<String>,
    #[validate(length(max = 1000))]
    pub closing_message: Option<String>,
}

/// True when an optional text field holds non-whitespace content.
pub fn text_present(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|s| !s.trim().is_empty())
}

/// True when a list field has at least one entry.
pub fn list_present<T>(field: &[T]) -> bool {
    !field.is_empty()
}

impl ProfileFields {
    /// Films with a non-empty title, in submission order.
    pub fn credited_films(&self) -> Vec<&Film> {
        self.films
            .iter()
            .filter(|f| !f.title.trim().is_empty())
            .collect()
    }
}

/// A stored filmmaker profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilmmakerProfile {
    /// Unique profile ID
    pub id: Uuid,
    /// Owning account
    pub owner_id: Uuid,
    /// URL slug derived from the display name
    pub slug: String,
    /// Whether the profile is publicly browsable
    pub published: bool,
    /// Profile field bag
    pub fields: ProfileFields,
    /// Generated biography, if any
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FilmmakerProfile {
    /// Creates a new profile from a validated submission.
    pub fn new(owner_id: Uuid, fields: ProfileFields) -> Self {
        let now = Utc::now();
        let slug = slugify(fields.display_name.as_deref().unwrap_or_default());
        Self {
            id: Uuid::new_v4(),
            owner_id,
            slug,
            published: false,
            fields,
            bio: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Profile submission payload (create and update).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSubmission {
    #[serde(flatten)]
    pub fields: ProfileFields,
    /// Publish immediately (defaults to keeping the current state).
    #[serde(default)]
    pub published: Option<bool>,
}

/// Parsed bulk import payload (supports 3 formats).
#[derive(Debug, Clone)]
pub struct ImportPayload {
    pub profiles: Vec<ProfileSubmission>,
}

impl ImportPayload {
    /// Parse an import payload from JSON bytes.
    /// Supports:
    /// 1. Array: `[profile, profile, ...]`
    /// 2. Object with profiles: `{ "profiles": [...] }`
    /// 3. Single profile object
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| Error::validation(format!("invalid JSON: {}", e)))?;

        match &value {
            Value::Array(_) => {
                let profiles: Vec<ProfileSubmission> = serde_json::from_value(value)
                    .map_err(|e| Error::validation(format!("invalid profile array: {}", e)))?;
                Ok(Self { profiles })
            }

            Value::Object(obj) => {
                if obj.contains_key("profiles") {
                    #[derive(Deserialize)]
                    struct Wrapper {
                        profiles: Vec<ProfileSubmission>,
                    }
                    let wrapper: Wrapper = serde_json::from_value(value)
                        .map_err(|e| Error::validation(format!("invalid import object: {}", e)))?;
                    Ok(Self {
                        profiles: wrapper.profiles,
                    })
                } else {
                    let profile: ProfileSubmission = serde_json::from_value(value)
                        .map_err(|e| Error::validation(format!("invalid profile object: {}", e)))?;
                    Ok(Self {
                        profiles: vec![profile],
                    })
                }
            }

            _ => Err(Error::validation(
                "request body must be a profile object, an array of profiles, or { \"profiles\": [...] }",
            )),
        }
    }
}

/// Validate a profile submission.
pub fn validate_submission(submission: &ProfileSubmission) -> Result<()> {
    submission
        .fields
        .validate()
        .map_err(|e| Error::validation(format!("{}", e)))?;

    if !text_present(&submission.fields.display_name) {
        return Err(Error::missing_field("displayName"));
    }
    if !list_present(&submission.fields.roles) {
        return Err(Error::missing_field("roles"));
    }

    Ok(())
}

/// Validate a batch of submissions, keeping the valid ones.
///
/// Returns the accepted submissions and per-entry errors (partial success).
pub fn validate_batch(
    submissions: Vec<ProfileSubmission>,
) -> Result<(Vec<ProfileSubmission>, Vec<Error>)> {
    if submissions.len() > MAX_IMPORT_PROFILES {
        return Err(Error::validation_code(
            crate::error::ValidationErrorCode::ImportTooLarge,
            format!(
                "import has {} profiles, exceeds {} limit",
                submissions.len(),
                MAX_IMPORT_PROFILES
            ),
        ));
    }

    let mut accepted = Vec::with_capacity(submissions.len());
    let mut errors = Vec::new();

    for (i, submission) in submissions.into_iter().enumerate() {
        match validate_submission(&submission) {
            Ok(()) => accepted.push(submission),
            Err(e) => errors.push(Error::validation(format!("profile[{}]: {}", i, e))),
        }
    }

    Ok((accepted, errors))
}

/// Derive a URL slug from a display name.
///
/// Lowercase alphanumerics with single hyphens; empty input yields "filmmaker".
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_hyphen = true;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_hyphen = false;
        } else if !last_hyphen {
            slug.push('-');
            last_hyphen = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    if slug.is_empty() {
        "filmmaker".to_string()
    } else {
        slug
    }
}
