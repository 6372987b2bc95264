//! Analytics classification and rollup arithmetic.
//!
//! Pure functions only: raw header values in, categorized values and
//! percentages out. Persistence belongs to the store crate.

use serde::{Deserialize, Serialize};

/// Referrer traffic category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferrerCategory {
    Direct,
    Instagram,
    Youtube,
    Twitter,
    Other,
}

impl ReferrerCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Instagram => "instagram",
            Self::Youtube => "youtube",
            Self::Twitter => "twitter",
            Self::Other => "other",
        }
    }
}

/// Device category derived from the user agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceCategory {
    Mobile,
    Desktop,
    Tablet,
}

impl DeviceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Desktop => "desktop",
            Self::Tablet => "tablet",
        }
    }
}

/// Click target kind for click events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickType {
    Website,
    Instagram,
    Showreel,
    Contact,
    Bookmark,
}

impl ClickType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Website => "website",
            Self::Instagram => "instagram",
            Self::Showreel => "showreel",
            Self::Contact => "contact",
            Self::Bookmark => "bookmark",
        }
    }
}

/// Classify a raw `Referer` header value.
///
/// `None`, empty, and same-site referrers are direct. Known platforms are
/// matched by host substring so subdomains (`m.youtube.com`, `l.instagram.com`)
/// classify correctly. Everything else is `Other`.
pub fn classify_referrer(referrer: Option<&str>, own_domain: &str) -> ReferrerCategory {
    let Some(raw) = referrer else {
        return ReferrerCategory::Direct;
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return ReferrerCategory::Direct;
    }

    // Prefer the parsed host; fall back to the raw string for bare domains.
    let host = url::Url::parse(raw)
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
        .unwrap_or_else(|| raw.to_lowercase());

    if !own_domain.is_empty() && host.contains(&own_domain.to_lowercase()) {
        return ReferrerCategory::Direct;
    }

    if host.contains("instagram.com") {
        ReferrerCategory::Instagram
    } else if host.contains("youtube.com") || host.contains("youtu.be") {
        ReferrerCategory::Youtube
    } else if host.contains("twitter.com") || host.contains("x.com") {
        ReferrerCategory::Twitter
    } else {
        ReferrerCategory::Other
    }
}

/// Classify a user agent into a device category.
///
/// Tablet substrings are checked before mobile ones: Android tablets carry
/// "Android" without "Mobile" and would otherwise misclassify as mobile.
pub fn classify_device(user_agent: &str) -> DeviceCategory {
    let ua = user_agent.to_lowercase();

    let is_android = ua.contains("android");
    let has_mobile_token = ua.contains("mobile");

    if ua.contains("ipad")
        || ua.contains("tablet")
        || ua.contains("kindle")
        || ua.contains("silk")
        || (is_android && !has_mobile_token)
    {
        return DeviceCategory::Tablet;
    }

    if has_mobile_token || ua.contains("iphone") || ua.contains("ipod") || is_android {
        return DeviceCategory::Mobile;
    }

    DeviceCategory::Desktop
}

/// Click-through rate as a percentage, rounded to one decimal.
///
/// Zero views yields 0.0 rather than a division by zero.
pub fn calculate_ctr(views: u64, clicks: u64) -> f64 {
    if views == 0 {
        return 0.0;
    }
    (clicks as f64 / views as f64 * 1000.0).round() / 10.0
}

/// Integer percentage change between two period totals.
///
/// When the previous period is zero the result is capped at 100 for any
/// growth (conflating "infinite growth" with 100%), and 0 when both are zero.
pub fn calculate_trend_change(current: u64, previous: u64) -> i64 {
    if previous == 0 {
        return if current > 0 { 100 } else { 0 };
    }
    let change = (current as f64 - previous as f64) / previous as f64 * 100.0;
    change.round() as i64
}
