use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification of a memory. Closed set; unknown inputs degrade to `Fact`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryType {
    Fact,
    Preference,
    Decision,
    Learning,
    Issue,
}

impl MemoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryType::Fact => "fact",
            MemoryType::Preference => "preference",
            MemoryType::Decision => "decision",
            MemoryType::Learning => "learning",
            MemoryType::Issue => "issue",
        }
    }

    /// Parse a stored type string. Unknown values fall back to `Fact` so rows
    /// written by older or foreign tooling stay readable.
    pub fn parse(s: &str) -> Self {
        match s {
            "preference" => MemoryType::Preference,
            "decision" => MemoryType::Decision,
            "learning" => MemoryType::Learning,
            "issue" => MemoryType::Issue,
            _ => MemoryType::Fact,
        }
    }

    /// Infer a type from content by first keyword match, else `Fact`.
    pub fn infer(content: &str) -> Self {
        let lower = content.to_lowercase();
        for (hint, t) in [
            ("prefer", MemoryType::Preference),
            ("decided", MemoryType::Decision),
            ("learned", MemoryType::Learning),
            ("issue", MemoryType::Issue),
            ("bug", MemoryType::Issue),
        ] {
            if lower.contains(hint) {
                return t;
            }
        }
        MemoryType::Fact
    }
}

impl std::fmt::Display for MemoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for MemoryType {
    fn default() -> Self {
        MemoryType::Fact
    }
}

/// A single persisted fact. Immutable by convention once written; only
/// `last_accessed` / `access_count` are mutated by retrieval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memory {
    /// UUID v4 identifier.
    pub id: String,
    /// Non-empty, trimmed UTF-8 content.
    pub content: String,
    /// Agent or user responsible (e.g. "claude-code", "migration").
    pub who: String,
    /// Provenance marker: "explicit", "explicit-critical", "auto-<type>", "migrated".
    pub why: Option<String>,
    /// Workspace path; `None` or the literal "global" means cross-project.
    pub project: Option<String>,
    /// Originating session, when known.
    pub session_id: Option<String>,
    /// Relevance weight in [0.0, 1.0].
    pub importance: f64,
    #[serde(rename = "type")]
    pub memory_type: MemoryType,
    /// Normalized comma-separated lowercase tags.
    pub tags: Option<String>,
    /// Pinned memories override decay and always score 1.0.
    pub pinned: bool,
    pub created_at: DateTime<Utc>,
    pub last_accessed: Option<DateTime<Utc>>,
    pub access_count: i64,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
}

impl Memory {
    /// Build a memory with defaults: importance 0.5, type fact, unpinned.
    /// The caller supplies the clock so insertion time is testable.
    pub fn new(content: impl Into<String>, who: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content: content.into(),
            who: who.into(),
            why: None,
            project: None,
            session_id: None,
            importance: 0.5,
            memory_type: MemoryType::Fact,
            tags: None,
            pinned: false,
            created_at: now,
            last_accessed: None,
            access_count: 0,
            updated_at: None,
            updated_by: None,
        }
    }
}

impl PartialEq for Memory {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_round_trips_through_as_str() {
        for t in [
            MemoryType::Fact,
            MemoryType::Preference,
            MemoryType::Decision,
            MemoryType::Learning,
            MemoryType::Issue,
        ] {
            assert_eq!(MemoryType::parse(t.as_str()), t);
        }
    }

    #[test]
    fn unknown_type_degrades_to_fact() {
        assert_eq!(MemoryType::parse("tribal"), MemoryType::Fact);
        assert_eq!(MemoryType::parse(""), MemoryType::Fact);
    }

    #[test]
    fn infer_matches_first_keyword() {
        assert_eq!(
            MemoryType::infer("I prefer tabs over spaces"),
            MemoryType::Preference
        );
        assert_eq!(
            MemoryType::infer("Decided to use sqlite"),
            MemoryType::Decision
        );
        assert_eq!(
            MemoryType::infer("learned that WAL needs a checkpoint"),
            MemoryType::Learning
        );
        assert_eq!(MemoryType::infer("found a bug in the parser"), MemoryType::Issue);
        assert_eq!(MemoryType::infer("the sky is blue"), MemoryType::Fact);
    }

    #[test]
    fn infer_prefers_earlier_hints() {
        // "prefer" wins even when "bug" also appears.
        assert_eq!(
            MemoryType::infer("prefer filing a bug upstream"),
            MemoryType::Preference
        );
    }
}
