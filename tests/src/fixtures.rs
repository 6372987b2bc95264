//! Test fixtures and profile generators.

/// Minimal valid profile submission.
pub fn submission(name: &str) -> serde_json::Value {
    serde_json::json!({
        "displayName": name,
        "roles": ["Director"]
    })
}

/// A fully populated profile submission.
pub fn full_submission(name: &str) -> serde_json::Value {
    serde_json::json!({
        "displayName": name,
        "roles": ["Director", "Writer"],
        "location": "Los Angeles, CA",
        "genres": ["Drama", "Thriller"],
        "era": "contemporary",
        "style": "naturalistic handheld camerawork",
        "philosophy": "character before plot",
        "influences": ["Agnès Varda", "Wong Kar-wai"],
        "films": [
            { "title": "Night Currents", "year": "2020" },
            { "title": "The Long Field", "year": "2023" }
        ],
        "awards": ["Jury Prize, Riverside Film Festival"],
        "website": "https://example.com",
        "instagram": "@filmmaker",
        "showreelUrl": "https://example.com/reel",
        "closingMessage": "Always open to bold collaborations."
    })
}

/// Array import payload.
pub fn array_payload(profiles: Vec<serde_json::Value>) -> String {
    serde_json::to_string(&profiles).unwrap()
}

/// Wrapper object import payload.
pub fn wrapper_payload(profiles: Vec<serde_json::Value>) -> String {
    serde_json::json!({ "profiles": profiles }).to_string()
}

/// Single profile import payload.
pub fn single_payload(profile: serde_json::Value) -> String {
    profile.to_string()
}

/// A syntactically valid API key that no account owns.
pub fn unknown_api_key() -> String {
    "cgk_test_ABC123xyz789DEF456ghi012JKL345mn".to_string()
}
