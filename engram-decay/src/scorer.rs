use chrono::{DateTime, Utc};

use engram_core::constants::{DECAY_BASE, DECAY_FLOOR};
use engram_core::memory::Memory;
use engram_core::time::age_days;

/// Effective score:
///
/// ```text
/// effective = 1.0                                      if pinned
///           = importance × max(0.1, 0.95^⌊age_days⌋)   otherwise
/// ```
///
/// `age_days` is the floored julian-day difference between `now` and
/// `created_at`. Result is clamped to [0.0, 1.0].
pub fn effective_score(
    importance: f64,
    pinned: bool,
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> f64 {
    if pinned {
        return 1.0;
    }
    let age = age_days(created_at, now);
    let decay = DECAY_BASE.powi(age as i32).max(DECAY_FLOOR);
    (importance * decay).clamp(0.0, 1.0)
}

/// Effective score of a memory row.
pub fn effective_score_of(memory: &Memory, now: DateTime<Utc>) -> f64 {
    effective_score(memory.importance, memory.pinned, memory.created_at, now)
}
