//! Size and field limits for the directory service.
//!
//! # Usage Note
//!
//! The `#[validate]` derive macro requires literal values in attributes,
//! so field limits are duplicated there. Keep both in sync when modifying.

// === Import Limits ===

/// Maximum import payload size in bytes (1MB).
pub const MAX_IMPORT_SIZE_BYTES: usize = 1024 * 1024;

/// Maximum profiles per bulk import request.
///
/// Spreadsheet exports rarely exceed a few hundred rows; this bounds
/// worst-case memory per request.
pub const MAX_IMPORT_PROFILES: usize = 200;

// === String Field Limits (chars) ===

/// Display name max length.
pub const MAX_NAME_LEN: usize = 120;

/// Location max length ("Los Angeles, CA" style strings).
pub const MAX_LOCATION_LEN: usize = 160;

/// Free-text statement fields (style, philosophy, closing message).
pub const MAX_STATEMENT_LEN: usize = 1000;

/// Generated or submitted biography max length.
pub const MAX_BIO_LEN: usize = 4000;

/// URL fields (website, showreel).
pub const MAX_URL_LEN: usize = 2048;

/// Email max length.
pub const MAX_EMAIL_LEN: usize = 254;

/// Referrer header max length, matches the HTTP Referer limit.
pub const MAX_REFERRER_LEN: usize = 2048;

/// User agent max length. Browser UAs: 100-300 typical, 500+ with extensions.
pub const MAX_USER_AGENT_LEN: usize = 512;

// === List Field Limits ===

/// Maximum roles per profile.
pub const MAX_ROLES: usize = 8;

/// Maximum genres per profile.
pub const MAX_GENRES: usize = 10;

/// Maximum influences per profile.
pub const MAX_INFLUENCES: usize = 15;

/// Maximum notable films per profile.
pub const MAX_FILMS: usize = 25;

/// Maximum awards per profile.
pub const MAX_AWARDS: usize = 15;

// === Analytics Limits ===

/// Maximum day range for a stats query.
pub const MAX_STATS_DAYS: u32 = 365;

/// Improvement tips returned per completeness check.
pub const MAX_IMPROVEMENT_TIPS: usize = 3;

// === Auth ===

/// API key pattern: `cgk_(live|test)_` followed by 32 alphanumerics.
pub const API_KEY_PATTERN: &str = r"^cgk_(live|test)_[a-zA-Z0-9]{32}$";
