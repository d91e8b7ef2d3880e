/// Engram system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Character budget for the MEMORY.md working-memory document at session start.
pub const MEMORY_MD_BUDGET: usize = 10_000;

/// Character budget for database memories injected at session start.
pub const SESSION_DB_BUDGET: usize = 2_000;

/// Character budget for per-prompt memory injection.
pub const PROMPT_BUDGET: usize = 500;

/// Row limit for the session-start candidate query.
pub const SESSION_CANDIDATE_LIMIT: usize = 30;

/// Row limit for the per-prompt FTS query.
pub const PROMPT_FTS_LIMIT: usize = 15;

/// Minimum effective score for session-start inclusion (pinned bypasses).
pub const SESSION_MIN_EFFECTIVE: f64 = 0.2;

/// Minimum effective score for per-prompt inclusion (pinned bypasses).
pub const PROMPT_MIN_EFFECTIVE: f64 = 0.3;

/// Per-day decay base for the effective score.
pub const DECAY_BASE: f64 = 0.95;

/// Floor on the decay factor, preserving long-tail relevance.
pub const DECAY_FLOOR: f64 = 0.1;

/// Importance ceiling for auto-extracted memories.
pub const AUTO_IMPORTANCE_CAP: f64 = 0.4;

/// Default importance for explicit saves.
pub const EXPLICIT_IMPORTANCE: f64 = 0.8;

/// Importance threshold for high-value memory queries.
pub const HIGH_VALUE_IMPORTANCE: f64 = 0.7;

/// Prune: only rows below this importance are candidates.
pub const PRUNE_MAX_IMPORTANCE: f64 = 0.3;

/// Prune: only rows older than this many days are candidates.
pub const PRUNE_MIN_AGE_DAYS: i64 = 60;

/// Minimum transcript length for auto-extraction.
pub const MIN_TRANSCRIPT_CHARS: usize = 500;

/// Timeout for a single embedding request.
pub const EMBED_TIMEOUT_SECS: u64 = 30;

/// Timeout contract for transcript extraction collaborators.
pub const EXTRACT_TIMEOUT_SECS: u64 = 45;

/// Timeout contract for digest synthesis collaborators.
pub const DIGEST_TIMEOUT_SECS: u64 = 180;

/// Character ceiling for a regenerated MEMORY.md digest.
pub const DIGEST_MAX_CHARS: usize = 8_000;

/// SQLite busy timeout, in milliseconds.
pub const BUSY_TIMEOUT_MS: u64 = 5_000;
