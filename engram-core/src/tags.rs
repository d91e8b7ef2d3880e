//! Tag normalization: trim, lowercase, split on commas, drop empties.
//! The canonical form is a comma-joined string; normalization is idempotent.

use serde::Deserialize;

/// Tags arrive either as a comma-separated string or as a list.
/// Both forms normalize to the same canonical string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagsInput {
    One(String),
    Many(Vec<String>),
}

/// Normalize tags to the canonical comma-joined lowercase form.
/// Returns `None` when no non-empty tags remain.
pub fn normalize_tags(input: &TagsInput) -> Option<String> {
    let joined = match input {
        TagsInput::One(s) => s.clone(),
        TagsInput::Many(v) => v.join(","),
    };
    normalize_tag_str(&joined)
}

/// Normalize a comma-separated tag string.
pub fn normalize_tag_str(s: &str) -> Option<String> {
    let normalized: Vec<String> = s
        .split(',')
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();
    if normalized.is_empty() {
        None
    } else {
        Some(normalized.join(","))
    }
}
