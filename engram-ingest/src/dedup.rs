//! Near-duplicate detection for auto-extracted candidates.
//!
//! A cheap FTS probe narrows to a handful of plausible matches; a candidate
//! is a duplicate when one content string contains the other, or when the
//! word-set overlap exceeds 70% of the new content's word count.

use tracing::debug;

use engram_storage::MemoryStore;

/// Probe query: first few substantial tokens, AND-fused.
const PROBE_TOKENS: usize = 5;
const PROBE_MIN_TOKEN_LEN: usize = 4;
const PROBE_LIMIT: usize = 5;

/// Overlap ratio above which two contents count as the same fact.
const OVERLAP_THRESHOLD: f64 = 0.7;

/// Whether `content` duplicates an existing memory. Index failures mean
/// "not a duplicate" — a redundant row beats a lost one.
pub fn is_duplicate(store: &MemoryStore, content: &str) -> bool {
    let lower = content.to_lowercase();
    let tokens: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|t| t.chars().count() >= PROBE_MIN_TOKEN_LEN)
        .take(PROBE_TOKENS)
        .collect();
    if tokens.is_empty() {
        return false;
    }
    let fts_query = tokens.join(" AND ");

    let hits = match store.fts_search(&fts_query, PROBE_LIMIT) {
        Ok(hits) => hits,
        Err(e) => {
            debug!(error = %e, "dedup probe failed, treating as non-duplicate");
            return false;
        }
    };

    let new_words: std::collections::HashSet<&str> = lower.split_whitespace().collect();
    let new_word_count = lower.split_whitespace().count();

    for (id, _) in hits {
        let Ok(Some(existing)) = store.find_by_id(&id) else {
            continue;
        };
        let existing_lower = existing.content.to_lowercase();

        if lower.contains(&existing_lower) || existing_lower.contains(&lower) {
            return true;
        }

        let existing_words: std::collections::HashSet<&str> =
            existing_lower.split_whitespace().collect();
        let overlap = new_words.intersection(&existing_words).count();
        if new_word_count > 0 && (overlap as f64) > (new_word_count as f64) * OVERLAP_THRESHOLD {
            return true;
        }
    }
    false
}
