//! One-shot import of legacy markdown memory files.
//!
//! Dated files (`2026-01-20.md`) are session logs: section headings become
//! tags and bullets become facts. Everything else is a topical list
//! (`package-preferences.md`): bullets and numbered items become facts
//! tagged from the filename.

use regex::Regex;
use std::sync::OnceLock;

/// A fact parsed out of a markdown file, before persistence.
#[derive(Debug, Clone)]
pub struct ParsedFact {
    pub content: String,
    pub type_hint: String,
    pub importance: f64,
    pub tags: Option<String>,
}

/// Facts shorter than this are markdown noise.
const MIN_FACT_LEN: usize = 10;

fn dated_stem_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"))
}

fn list_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[\d.\-*]+\s*").expect("valid regex"))
}

/// Whether a file stem names a dated session log.
pub fn is_dated_stem(stem: &str) -> bool {
    dated_stem_re().is_match(stem)
}

/// Parse a dated session log. Section headings (## or underline style)
/// become a tag on the facts below them.
pub fn parse_dated(content: &str) -> Vec<ParsedFact> {
    let lines: Vec<&str> = content.lines().collect();
    let mut facts = Vec::new();
    let mut current_section: Option<String> = None;

    for (i, line) in lines.iter().enumerate() {
        let stripped = line.trim();
        if stripped.is_empty() || stripped.starts_with('=') {
            continue;
        }

        // Underline-style headings: a dash run under a plain text line.
        if stripped.ends_with("---------") || (stripped == "---" && i > 0) {
            if let Some(prev) = lines.get(i.wrapping_sub(1)).map(|l| l.trim()) {
                if !prev.is_empty() && !prev.starts_with('-') {
                    current_section = Some(prev.to_string());
                }
            }
            continue;
        }

        if let Some(heading) = stripped.strip_prefix("##") {
            current_section = Some(heading.trim_start_matches('#').trim().to_string());
            continue;
        }

        if stripped.starts_with('-') && !stripped.ends_with("---") {
            let fact = stripped.trim_start_matches(['-', ' ']).trim();
            if fact.chars().count() <= MIN_FACT_LEN {
                continue;
            }
            let lower = fact.to_lowercase();

            let (type_hint, importance) = if lower.contains("prefer") {
                ("preference", 0.8)
            } else if lower.contains("decided") || lower.contains("chose") {
                ("decision", 0.7)
            } else if lower.contains("issue") || lower.contains("bug") || lower.contains("error") {
                ("issue", 0.6)
            } else if lower.contains("learned") || lower.contains("takeaway") {
                ("learning", 0.6)
            } else {
                ("fact", 0.6)
            };

            let tags = current_section
                .as_ref()
                .map(|s| s.to_lowercase().replace(' ', "-"));

            facts.push(ParsedFact {
                content: fact.to_string(),
                type_hint: type_hint.to_string(),
                importance,
                tags,
            });
        }
    }
    facts
}

/// Parse a topical list file. The topic (file stem) supplies type and tags.
pub fn parse_topical(content: &str, topic: &str) -> Vec<ParsedFact> {
    let topic_lower = topic.to_lowercase();
    let type_hint = if topic_lower.contains("prefer") {
        "preference"
    } else {
        "fact"
    };
    let tags = topic_lower.replace(['-', '_'], ",");

    let mut facts = Vec::new();
    for line in content.lines() {
        let stripped = line.trim();
        if stripped.is_empty() || stripped.starts_with('=') || stripped.starts_with("---------") {
            continue;
        }
        let is_item = stripped.starts_with('-')
            || stripped.starts_with('*')
            || stripped.chars().next().is_some_and(|c| c.is_ascii_digit());
        if !is_item {
            continue;
        }
        let fact = list_prefix_re().replace(stripped, "").trim().to_string();
        if fact.chars().count() <= MIN_FACT_LEN {
            continue;
        }
        facts.push(ParsedFact {
            content: fact,
            type_hint: type_hint.to_string(),
            importance: 0.7,
            tags: Some(tags.clone()),
        });
    }
    facts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dated_stems_are_recognized() {
        assert!(is_dated_stem("2026-01-20"));
        assert!(!is_dated_stem("package-preferences"));
        assert!(!is_dated_stem("2026-1-2"));
    }

    #[test]
    fn dated_parse_tags_facts_with_their_section() {
        let md = "## Build Notes\n- the release build needs mold installed\n\n## Decisions\n- decided to keep sqlite over postgres\n";
        let facts = parse_dated(md);
        assert_eq!(facts.len(), 2);
        assert_eq!(facts[0].tags.as_deref(), Some("build-notes"));
        assert_eq!(facts[0].type_hint, "fact");
        assert_eq!(facts[1].tags.as_deref(), Some("decisions"));
        assert_eq!(facts[1].type_hint, "decision");
        assert_eq!(facts[1].importance, 0.7);
    }

    #[test]
    fn dated_parse_skips_short_bullets() {
        let facts = parse_dated("- too short\n- this one is long enough to keep\n");
        assert_eq!(facts.len(), 1);
    }

    #[test]
    fn topical_parse_handles_bullets_and_numbers() {
        let md = "1. always pin dependency versions in ci\n- use workspace dependency tables\nnot a list line\n";
        let facts = parse_topical(md, "package-preferences");
        assert_eq!(facts.len(), 2);
        assert_eq!(facts[0].type_hint, "preference");
        assert_eq!(facts[0].tags.as_deref(), Some("package,preferences"));
        assert_eq!(facts[0].importance, 0.7);
    }
}
