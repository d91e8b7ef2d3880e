//! Explicit-save preprocessing: the `critical:` prefix, the `[tags]:`
//! prefix, and keyword type inference.

use regex::Regex;
use std::sync::OnceLock;

use engram_core::constants::EXPLICIT_IMPORTANCE;
use engram_core::errors::{EngramError, EngramResult, IngestError};
use engram_core::memory::MemoryType;
use engram_core::tags::normalize_tag_str;

/// The interpreted form of an explicit save input.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedExplicit {
    pub content: String,
    pub importance: f64,
    pub pinned: bool,
    pub why: &'static str,
    pub tags: Option<String>,
    pub memory_type: MemoryType,
}

fn tag_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // DOTALL so multi-line content after the prefix is kept whole.
    RE.get_or_init(|| Regex::new(r"(?s)^\[([^\]]+)\]:\s*(.+)$").expect("valid regex"))
}

/// Split a `[tags]: content` prefix into (normalized tags, owned content).
fn match_tag_prefix(content: &str) -> Option<(Option<String>, String)> {
    let caps = tag_prefix_re().captures(content)?;
    Some((normalize_tag_str(&caps[1]), caps[2].trim().to_string()))
}

/// Interpret an explicit save input. Order matters: the `critical:` prefix
/// is stripped before the tag prefix is matched.
pub fn parse_explicit(input: &str) -> EngramResult<ParsedExplicit> {
    let mut content = input.trim().to_string();
    if content.is_empty() {
        return Err(EngramError::Ingest(IngestError::InvalidInput {
            reason: "no content provided".to_string(),
        }));
    }

    let mut importance = EXPLICIT_IMPORTANCE;
    let mut pinned = false;
    let mut why = "explicit";
    let mut tags = None;

    if let Some(rest) = content.strip_prefix("critical:") {
        content = rest.trim().to_string();
        importance = 1.0;
        pinned = true;
        why = "explicit-critical";
    }

    if let Some((parsed_tags, rest)) = match_tag_prefix(&content) {
        tags = parsed_tags;
        content = rest;
    }

    if content.is_empty() {
        return Err(EngramError::Ingest(IngestError::InvalidInput {
            reason: "no content after prefix".to_string(),
        }));
    }

    let memory_type = MemoryType::infer(&content);

    Ok(ParsedExplicit {
        content,
        importance,
        pinned,
        why,
        tags,
        memory_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_content_gets_defaults() {
        let p = parse_explicit("the build needs protoc installed").unwrap();
        assert_eq!(p.content, "the build needs protoc installed");
        assert_eq!(p.importance, 0.8);
        assert!(!p.pinned);
        assert_eq!(p.why, "explicit");
        assert_eq!(p.tags, None);
        assert_eq!(p.memory_type, MemoryType::Fact);
    }

    #[test]
    fn critical_prefix_pins_at_full_importance() {
        let p = parse_explicit("critical: always use lowercase commit messages").unwrap();
        assert_eq!(p.content, "always use lowercase commit messages");
        assert_eq!(p.importance, 1.0);
        assert!(p.pinned);
        assert_eq!(p.why, "explicit-critical");
        assert_eq!(p.memory_type, MemoryType::Fact);
    }

    #[test]
    fn tag_prefix_is_extracted_and_normalized() {
        let p = parse_explicit("[Rust, ASYNC]: prefer tokio over async-std").unwrap();
        assert_eq!(p.tags.as_deref(), Some("rust,async"));
        assert_eq!(p.content, "prefer tokio over async-std");
        assert_eq!(p.memory_type, MemoryType::Preference);
    }

    #[test]
    fn critical_and_tags_compose() {
        let p = parse_explicit("critical: [git]: never force-push to main").unwrap();
        assert!(p.pinned);
        assert_eq!(p.tags.as_deref(), Some("git"));
        assert_eq!(p.content, "never force-push to main");
    }

    #[test]
    fn tag_prefix_spans_multiline_content() {
        let p = parse_explicit("[notes]: first line\nsecond line").unwrap();
        assert_eq!(p.content, "first line\nsecond line");
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(parse_explicit("   ").is_err());
        assert!(parse_explicit("critical:   ").is_err());
    }
}
