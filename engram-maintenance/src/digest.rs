//! MEMORY.md regeneration: gather high-value memories, hand them to a
//! synthesizer, write the result with a generation timestamp.
//!
//! The synthesizer is a pluggable collaborator (an LLM in full deployments);
//! the rule-based default makes the command work offline.

use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use engram_core::constants::DIGEST_MAX_CHARS;
use engram_core::errors::EngramResult;
use engram_core::memory::MemoryType;
use engram_core::traits::{DigestInput, DigestSynthesizer};
use engram_storage::MemoryStore;

/// How many high-value rows feed the digest.
const HIGH_VALUE_LIMIT: usize = 50;

/// Regenerate the working-memory document. Returns the number of characters
/// written, or `None` when the synthesizer declined and the existing
/// document was kept.
pub fn regenerate_digest(
    store: &MemoryStore,
    synthesizer: &dyn DigestSynthesizer,
    memory_md_path: &Path,
    now: DateTime<Utc>,
) -> EngramResult<Option<usize>> {
    let high_value = store.high_value(HIGH_VALUE_LIMIT)?;
    if high_value.is_empty() {
        debug!("no high-value memories, keeping existing MEMORY.md");
        return Ok(None);
    }

    let existing = std::fs::read_to_string(memory_md_path).ok();
    let input = DigestInput {
        high_value,
        existing,
    };

    let Some(body) = synthesizer.synthesize(&input)? else {
        debug!("synthesizer declined, keeping existing MEMORY.md");
        return Ok(None);
    };

    let body = truncate_at_line_boundary(&body, DIGEST_MAX_CHARS);
    let stamped = format!(
        "<!-- generated {} -->\n\n{}",
        now.format("%Y-%m-%d %H:%M"),
        body
    );

    if let Some(parent) = memory_md_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(memory_md_path, &stamped)?;
    info!(chars = stamped.chars().count(), "regenerated MEMORY.md");
    Ok(Some(stamped.chars().count()))
}

/// Cap the digest, cutting at the last complete line and marking the cut.
fn truncate_at_line_boundary(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let head: String = text.chars().take(max_chars).collect();
    let cut = head.rfind('\n').unwrap_or(head.len());
    format!("{}\n\n[truncated]", &head[..cut])
}

/// Offline default: groups high-value memories by type under a working-
/// memory skeleton. An LLM-backed synthesizer can replace this wholesale.
#[derive(Debug, Default)]
pub struct RuleBasedSynthesizer;

impl DigestSynthesizer for RuleBasedSynthesizer {
    fn synthesize(&self, input: &DigestInput) -> EngramResult<Option<String>> {
        if input.high_value.is_empty() {
            return Ok(None);
        }

        let mut out = String::from("# Current Context\n");

        let pinned: Vec<_> = input.high_value.iter().filter(|m| m.pinned).collect();
        if !pinned.is_empty() {
            out.push_str("\n## Rules & Warnings\n");
            for m in pinned {
                out.push_str(&format!("- {}\n", m.content));
            }
        }

        for (memory_type, heading) in [
            (MemoryType::Decision, "Decisions"),
            (MemoryType::Preference, "Preferences"),
            (MemoryType::Learning, "Learnings"),
            (MemoryType::Issue, "Known Issues"),
            (MemoryType::Fact, "Facts"),
        ] {
            let rows: Vec<_> = input
                .high_value
                .iter()
                .filter(|m| !m.pinned && m.memory_type == memory_type)
                .collect();
            if rows.is_empty() {
                continue;
            }
            out.push_str(&format!("\n## {heading}\n"));
            for m in rows {
                match &m.tags {
                    Some(tags) => out.push_str(&format!("- {} [{}]\n", m.content, tags)),
                    None => out.push_str(&format!("- {}\n", m.content)),
                }
            }
        }

        Ok(Some(out))
    }
}
