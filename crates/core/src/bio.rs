//! Deterministic biography generation from profile fields.
//!
//! String templating only: no external generative service, so the output is
//! always available and reproducible. Calling twice with the same field bag
//! yields byte-identical text.

use crate::profile::{text_present, Film, ProfileFields};

/// Join list items in Oxford style: `a`, `a and b`, `a, b, and c`.
fn join_oxford(items: &[&str]) -> String {
    match items {
        [] => String::new(),
        [only] => (*only).to_string(),
        [first, last] => format!("{} and {}", first, last),
        [head @ .., last] => format!("{}, and {}", head.join(", "), last),
    }
}

/// Format a film credit as `"Title" (Year)` or `"Title"`.
fn format_film(film: &Film) -> String {
    match film.year.as_deref().map(str::trim) {
        Some(year) if !year.is_empty() => format!("\"{}\" ({})", film.title.trim(), year),
        _ => format!("\"{}\"", film.title.trim()),
    }
}

/// Join film credits with a comma before the final "and", even for pairs:
/// `"A" (2020), and "B" (2021)`. The comma keeps quoted titles with years
/// visually separated.
fn join_films(films: &[&Film]) -> String {
    match films {
        [] => String::new(),
        [only] => format_film(only),
        [head @ .., last] => {
            let head: Vec<String> = head.iter().map(|f| format_film(f)).collect();
            format!("{}, and {}", head.join(", "), format_film(last))
        }
    }
}

fn trimmed<'a>(field: &'a Option<String>) -> Option<&'a str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn trimmed_list(list: &[String]) -> Vec<&str> {
    list.iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Ensure a sentence ends with terminal punctuation.
fn close_sentence(mut s: String) -> String {
    if !s.ends_with('.') && !s.ends_with('!') && !s.ends_with('?') {
        s.push('.');
    }
    s
}

/// Render a multi-sentence biography from the profile field bag.
///
/// Each sentence is emitted only when its fields are populated; an empty
/// field bag produces an empty string. Never panics and never performs I/O.
pub fn generate_bio(fields: &ProfileFields) -> String {
    let mut sentences: Vec<String> = Vec::new();

    // Opening: name, roles, location.
    if let Some(name) = trimmed(&fields.display_name) {
        let roles = trimmed_list(&fields.roles);
        let mut opening = if roles.is_empty() {
            format!("{} is a filmmaker", name)
        } else {
            format!("{} is a {}", name, join_oxford(&roles))
        };
        if let Some(location) = trimmed(&fields.location) {
            opening.push_str(&format!(" based in {}", location));
        }
        sentences.push(close_sentence(opening));
    }

    // Genre and era.
    let genres = trimmed_list(&fields.genres);
    let era = trimmed(&fields.era);
    if !genres.is_empty() || era.is_some() {
        let mut clause = if genres.is_empty() {
            String::from("Their work is")
        } else {
            format!("Their work spans {}", join_oxford(&genres))
        };
        if let Some(era) = era {
            if genres.is_empty() {
                clause.push_str(&format!(" rooted in {}", era));
            } else {
                clause.push_str(&format!(", rooted in {}", era));
            }
        }
        sentences.push(close_sentence(clause));
    }

    // Style, philosophy, influences.
    let style = trimmed(&fields.style);
    let philosophy = trimmed(&fields.philosophy);
    let influences = trimmed_list(&fields.influences);
    if style.is_some() || philosophy.is_some() || !influences.is_empty() {
        let mut parts: Vec<String> = Vec::new();
        if let Some(style) = style {
            parts.push(format!("Known for {}", style));
        }
        if let Some(philosophy) = philosophy {
            if parts.is_empty() {
                parts.push(format!("Guided by the belief that {}", philosophy));
            } else {
                parts.push(format!("they are guided by the belief that {}", philosophy));
            }
        }
        if !influences.is_empty() {
            if parts.is_empty() {
                parts.push(format!(
                    "Their approach draws influence from {}",
                    join_oxford(&influences)
                ));
            } else {
                parts.push(format!("drawing influence from {}", join_oxford(&influences)));
            }
        }
        sentences.push(close_sentence(parts.join(", ")));
    }

    // Notable works.
    let films = fields.credited_films();
    if !films.is_empty() {
        sentences.push(close_sentence(format!(
            "Notable works include {}",
            join_films(&films)
        )));
    }

    // Awards.
    let awards = trimmed_list(&fields.awards);
    if !awards.is_empty() {
        sentences.push(close_sentence(format!(
            "Their work has been recognized with {}",
            join_oxford(&awards)
        )));
    }

    // Closing message, verbatim.
    if text_present(&fields.closing_message) {
        if let Some(msg) = trimmed(&fields.closing_message) {
            sentences.push(close_sentence(msg.to_string()));
        }
    }

    sentences.join(" ")
}
