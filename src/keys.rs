//! Key derivation for persisted settings documents
//!
//! Every source name maps to two independent keys: the *enable key* storing
//! its on/off flag in the flat settings document, and the *lookup key* used
//! inside the ordered `priorityOrder` sequence. The two key spaces are not
//! interchangeable: legacy documents were written with both, and several
//! names carry hard-mapped historical keys that the slug fallback would not
//! produce.

use regex_lite::Regex;
use std::sync::OnceLock;

/// Literal prefix prepended to every enable key.
pub const ENABLE_KEY_PREFIX: &str = "enable_";

/// Historical enable keys that take precedence over the slug fallback.
const ENABLE_KEY_OVERRIDES: &[(&str, &str)] = &[
    ("Rotten Tomatoes Critics", "enable_rt_critics"),
    ("Rotten Tomatoes Audience", "enable_rt_audience"),
    ("HDR10+", "enable_hdr10plus"),
];

/// Historical lookup keys that take precedence over the slug fallback.
///
/// Note the asymmetry with the enable table: `TMDb` orders under its legacy
/// `themoviedb` key while its enable key is the plain `enable_tmdb`.
const LOOKUP_KEY_OVERRIDES: &[(&str, &str)] = &[
    ("Rotten Tomatoes Critics", "rt_critics"),
    ("Rotten Tomatoes Audience", "rt_audience"),
    ("HDR10+", "hdr10plus"),
    ("TMDb", "themoviedb"),
];

/// Derive the enable key for a source name.
///
/// Total and deterministic: override table first, then the slug fallback
/// with the `enable_` prefix.
pub fn enable_key(name: &str) -> String {
    if let Some((_, key)) = ENABLE_KEY_OVERRIDES.iter().find(|(n, _)| *n == name) {
        return (*key).to_string();
    }
    format!("{}{}", ENABLE_KEY_PREFIX, slug(name))
}

/// Derive the lookup key for a source name (ordering key space only).
pub fn lookup_key(name: &str) -> String {
    if let Some((_, key)) = LOOKUP_KEY_OVERRIDES.iter().find(|(n, _)| *n == name) {
        return (*key).to_string();
    }
    slug(name)
}

fn whitespace_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static pattern"))
}

/// Lowercase, collapse whitespace runs to a single underscore, strip
/// everything outside `[a-z0-9_]`.
fn slug(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let underscored = whitespace_run().replace_all(&lowered, "_");
    underscored
        .chars()
        .filter(|c| matches!(c, 'a'..='z' | '0'..='9' | '_'))
        .collect()
}
