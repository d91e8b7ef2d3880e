//! Per-prompt context: keyword tokens from the prompt, OR-fused FTS query,
//! effective-score filter, 500-character budget. Emits nothing at all when
//! there is nothing worth injecting.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, warn};

use engram_core::constants::{PROMPT_BUDGET, PROMPT_FTS_LIMIT, PROMPT_MIN_EFFECTIVE};
use engram_core::errors::EngramResult;
use engram_core::memory::Memory;
use engram_decay::effective_score_of;
use engram_storage::MemoryStore;

use crate::budget::select_with_budget;

/// Header preceding the per-prompt bullet list.
const HEADER: &str = "[relevant memories]";

/// Tokens shorter than this are noise.
const MIN_TOKEN_LEN: usize = 3;

/// At most this many tokens feed the FTS expression.
const MAX_TOKENS: usize = 10;

#[derive(Deserialize)]
struct PromptEnvelope {
    #[serde(default)]
    user_prompt: String,
}

/// Assembles the per-prompt context block.
pub struct PromptContextLoader<'a> {
    store: &'a MemoryStore,
}

impl<'a> PromptContextLoader<'a> {
    pub fn new(store: &'a MemoryStore) -> Self {
        Self { store }
    }

    /// Build the block from the hook's JSON input. `None` means emit
    /// nothing — no header, no blank line.
    pub fn load(
        &self,
        input: &str,
        project: Option<&str>,
        now: DateTime<Utc>,
    ) -> EngramResult<Option<String>> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        // The hook sends JSON; bare text still works as a keyword source.
        let keywords = match serde_json::from_str::<PromptEnvelope>(trimmed) {
            Ok(envelope) => envelope.user_prompt,
            Err(_) => trimmed.to_string(),
        };
        if keywords.chars().count() < MIN_TOKEN_LEN {
            return Ok(None);
        }

        let tokens = tokenize(&keywords);
        if tokens.is_empty() {
            return Ok(None);
        }
        let fts_query = tokens.join(" OR ");

        let rows = match self
            .store
            .fts_search_scoped(&fts_query, project, PROMPT_FTS_LIMIT)
        {
            Ok(rows) => rows,
            Err(e) => {
                debug!(error = %e, "prompt FTS query failed, emitting nothing");
                return Ok(None);
            }
        };

        let mut scored: Vec<(Memory, f64)> = rows
            .into_iter()
            .map(|m| {
                let eff = effective_score_of(&m, now);
                (m, eff)
            })
            .filter(|(m, eff)| *eff > PROMPT_MIN_EFFECTIVE || m.pinned)
            .collect();
        scored.sort_by(|(a, ea), (b, eb)| {
            eb.partial_cmp(ea)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });

        let rows: Vec<Memory> = scored.into_iter().map(|(m, _)| m).collect();
        let selected = select_with_budget(rows, PROMPT_BUDGET, |m| m.content.chars().count());
        if selected.is_empty() {
            return Ok(None);
        }

        let ids: Vec<String> = selected.iter().map(|m| m.id.clone()).collect();
        if let Err(e) = self.store.update_access(&ids, now) {
            warn!(error = %e, "failed to update access counters");
        }

        let mut output = vec![HEADER.to_string()];
        for row in &selected {
            output.push(format!("- {}", row.content));
        }
        Ok(Some(output.join("\n")))
    }
}

/// Lowercase word-character tokens of length ≥ 3, first 10.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|t| t.chars().count() >= MIN_TOKEN_LEN)
        .take(MAX_TOKENS)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::tokenize;

    #[test]
    fn drops_short_tokens() {
        assert_eq!(tokenize("fix a db io bug now"), vec!["fix", "bug", "now"]);
    }

    #[test]
    fn lowercases_and_splits_on_punctuation() {
        assert_eq!(
            tokenize("Why does Tokio::spawn panic?"),
            vec!["why", "does", "tokio", "spawn", "panic"]
        );
    }

    #[test]
    fn caps_at_ten_tokens() {
        let text = "one two three four five six seven eight nine ten eleven twelve";
        assert_eq!(tokenize(text).len(), 10);
    }

    #[test]
    fn no_usable_tokens_yields_empty() {
        assert!(tokenize("a b c ? !").is_empty());
    }
}
