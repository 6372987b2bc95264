//! Profile completeness scoring and improvement tips.
//!
//! The score is derived on demand from the field bag, never stored.

use crate::limits::MAX_IMPROVEMENT_TIPS;
use crate::profile::{list_present, text_present, ProfileFields};

/// Weight applied to required fields.
const REQUIRED_WEIGHT: f64 = 2.0;
/// Weight applied to important fields.
const IMPORTANT_WEIGHT: f64 = 1.5;
/// Weight applied to optional fields.
const OPTIONAL_WEIGHT: f64 = 1.0;

/// Field presence checks per tier, in display order.
///
/// Tips below index into the same field set; keep the two lists consistent
/// when adding fields.
fn tiered_checks(fields: &ProfileFields) -> [(f64, Vec<bool>); 3] {
    [
        (
            REQUIRED_WEIGHT,
            vec![
                text_present(&fields.display_name),
                list_present(&fields.roles),
                text_present(&fields.location),
            ],
        ),
        (
            IMPORTANT_WEIGHT,
            vec![
                list_present(&fields.films),
                list_present(&fields.genres),
                text_present(&fields.style),
                list_present(&fields.influences),
            ],
        ),
        (
            OPTIONAL_WEIGHT,
            vec![
                text_present(&fields.era),
                text_present(&fields.philosophy),
                list_present(&fields.awards),
                text_present(&fields.website),
                text_present(&fields.instagram),
                text_present(&fields.showreel_url),
                text_present(&fields.closing_message),
            ],
        ),
    ]
}

/// Weighted completeness score in `0..=100`.
///
/// Strictly monotonic in the number of populated weighted fields: each
/// newly populated field adds its tier weight to the numerator against a
/// fixed denominator.
pub fn calculate_completeness(fields: &ProfileFields) -> u8 {
    let mut earned = 0.0;
    let mut possible = 0.0;

    for (weight, checks) in tiered_checks(fields) {
        possible += weight * checks.len() as f64;
        earned += weight * checks.iter().filter(|&&present| present).count() as f64;
    }

    if possible == 0.0 {
        return 0;
    }

    (earned / possible * 100.0).round() as u8
}

/// Up to 3 improvement tips for missing fields, in fixed priority order.
pub fn improvement_tips(fields: &ProfileFields) -> Vec<String> {
    let candidates: [(bool, &str); 9] = [
        (
            text_present(&fields.display_name),
            "Add your name so collaborators can find you",
        ),
        (
            list_present(&fields.roles),
            "List at least one role (director, writer, editor...)",
        ),
        (
            text_present(&fields.location),
            "Add your location to appear in regional searches",
        ),
        (
            list_present(&fields.films),
            "Add a notable film credit to anchor your profile",
        ),
        (
            list_present(&fields.genres),
            "Tag the genres you work in",
        ),
        (
            text_present(&fields.style),
            "Describe your visual or narrative style",
        ),
        (
            text_present(&fields.showreel_url),
            "Link a showreel so visitors can watch your work",
        ),
        (
            text_present(&fields.website),
            "Link your website or portfolio",
        ),
        (
            list_present(&fields.awards),
            "Mention festival selections or awards",
        ),
    ];

    candidates
        .into_iter()
        .filter(|(present, _)| !present)
        .map(|(_, tip)| tip.to_string())
        .take(MAX_IMPROVEMENT_TIPS)
        .collect()
}
