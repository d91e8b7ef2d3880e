//! Session-start context: fixed prelude, working-memory document, then
//! project-scoped rows by effective score under a character budget.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::warn;

use engram_core::constants::{
    MEMORY_MD_BUDGET, SESSION_CANDIDATE_LIMIT, SESSION_DB_BUDGET, SESSION_MIN_EFFECTIVE,
};
use engram_core::errors::EngramResult;
use engram_core::memory::Memory;
use engram_decay::effective_score_of;
use engram_storage::MemoryStore;

use crate::budget::select_with_budget;

/// Fixed first line of every session-start emission.
const PRELUDE: &str = "[memory active | /remember | /recall]";

/// How many rows to pull before effective-score filtering. Generously above
/// the final limit so the SQL-side ordering cannot starve high-score rows.
const CANDIDATE_FETCH_CAP: usize = SESSION_CANDIDATE_LIMIT * 8;

/// Assembles the session-start context block.
pub struct SessionStartLoader<'a> {
    store: &'a MemoryStore,
    memory_md_path: PathBuf,
}

impl<'a> SessionStartLoader<'a> {
    pub fn new(store: &'a MemoryStore, memory_md_path: &Path) -> Self {
        Self {
            store,
            memory_md_path: memory_md_path.to_path_buf(),
        }
    }

    /// Build the context block. Always begins with the prelude line; the
    /// working-memory document and row sections appear only when non-empty.
    pub fn load(&self, project: Option<&str>, now: DateTime<Utc>) -> EngramResult<String> {
        let mut output = vec![PRELUDE.to_string()];

        if let Some(doc) = self.working_memory_doc() {
            output.push(String::new());
            output.push(doc);
        }

        let selected = self.select_rows(project, now)?;
        if !selected.is_empty() {
            let ids: Vec<String> = selected.iter().map(|m| m.id.clone()).collect();
            if let Err(e) = self.store.update_access(&ids, now) {
                warn!(error = %e, "failed to update access counters");
            }

            output.push(String::new());
            for row in &selected {
                output.push(format_bullet(row));
            }
        }

        Ok(output.join("\n"))
    }

    /// Read MEMORY.md, truncating to the 10 000-character budget with a
    /// trailing marker when exceeded. Missing or empty file yields nothing.
    fn working_memory_doc(&self) -> Option<String> {
        let raw = std::fs::read_to_string(&self.memory_md_path).ok()?;
        let doc = raw.trim();
        if doc.is_empty() {
            return None;
        }
        if doc.chars().count() > MEMORY_MD_BUDGET {
            let truncated: String = doc.chars().take(MEMORY_MD_BUDGET).collect();
            Some(format!("{truncated}\n[truncated]"))
        } else {
            Some(doc.to_string())
        }
    }

    /// Project-scoped rows with effective score above threshold (or pinned),
    /// current project first, then effective score descending, capped at 30
    /// rows and the 2 000-character budget.
    fn select_rows(&self, project: Option<&str>, now: DateTime<Utc>) -> EngramResult<Vec<Memory>> {
        let candidates = self.store.session_candidates(project, CANDIDATE_FETCH_CAP)?;

        let mut scored: Vec<(Memory, f64)> = candidates
            .into_iter()
            .map(|m| {
                let eff = effective_score_of(&m, now);
                (m, eff)
            })
            .filter(|(m, eff)| *eff > SESSION_MIN_EFFECTIVE || m.pinned)
            .collect();

        scored.sort_by(|(a, ea), (b, eb)| {
            let a_here = a.project.as_deref() == project && project.is_some();
            let b_here = b.project.as_deref() == project && project.is_some();
            b_here
                .cmp(&a_here)
                .then_with(|| eb.partial_cmp(ea).unwrap_or(std::cmp::Ordering::Equal))
                .then_with(|| a.id.cmp(&b.id))
        });
        scored.truncate(SESSION_CANDIDATE_LIMIT);

        let rows: Vec<Memory> = scored.into_iter().map(|(m, _)| m).collect();
        Ok(select_with_budget(rows, SESSION_DB_BUDGET, |m| {
            m.content.chars().count()
        }))
    }
}

/// `- <content>[ [tags]]`
fn format_bullet(memory: &Memory) -> String {
    match &memory.tags {
        Some(tags) => format!("- {} [{}]", memory.content, tags),
        None => format!("- {}", memory.content),
    }
}
