//! Embedded storage for the directory: profiles, accounts, bookmarks, and
//! daily analytics rollups.
//!
//! All writes go through single-writer redb transactions, which is what
//! gives rollup increments their upsert-with-increment atomicity.

pub mod accounts;
pub mod bookmarks;
pub mod config;
pub mod db;
pub mod profiles;
pub mod rollups;

pub use bookmarks::Bookmark;
pub use config::StoreConfig;
pub use db::Store;
pub use rollups::DailyRollup;
