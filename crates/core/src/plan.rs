//! Accounts and subscription plans.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Subscription tier for accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    #[default]
    Free,
    Pro,
}

impl SubscriptionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Pro => "pro",
        }
    }

    /// Profiles an account may own.
    pub fn max_profiles(&self) -> usize {
        match self {
            Self::Free => 1,
            Self::Pro => 10,
        }
    }

    /// Stats lookback window in days.
    pub fn stats_window_days(&self) -> u32 {
        match self {
            Self::Free => 30,
            Self::Pro => 365,
        }
    }
}

/// Subscription state as reported by the billing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    #[default]
    None,
    Active,
    Canceled,
    PastDue,
}

/// An account in the directory.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Unique account ID
    pub id: Uuid,
    /// Contact email
    #[validate(email, length(max = 254))]
    pub email: String,
    /// API key issued at signup
    pub api_key: String,
    /// Subscription tier
    pub tier: SubscriptionTier,
    /// Subscription status
    pub status: SubscriptionStatus,
    /// Whether the account is active (false once revoked)
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Creates a new free-tier account with the given key.
    pub fn new(email: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            api_key: api_key.into(),
            tier: SubscriptionTier::Free,
            status: SubscriptionStatus::None,
            active: true,
            created_at: Utc::now(),
        }
    }

    /// Whether the account is entitled to paid features.
    ///
    /// During the free beta every active account is entitled regardless of
    /// tier or payment state; once the bypass flag is off, entitlement
    /// requires an active subscription.
    pub fn is_entitled(&self, beta_bypass: bool) -> bool {
        if !self.active {
            return false;
        }
        beta_bypass || self.status == SubscriptionStatus::Active
    }
}

/// Subscription summary returned by the billing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionSummary {
    pub tier: SubscriptionTier,
    pub status: SubscriptionStatus,
    pub entitled: bool,
    /// True while the promotional beta short-circuits payment checks.
    pub beta_bypass: bool,
}
