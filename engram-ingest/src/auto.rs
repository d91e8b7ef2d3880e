//! The auto-save envelope: hook JSON describing a finished session whose
//! transcript may yield memories.

use serde::Deserialize;

/// Hook payload for `save auto`.
#[derive(Debug, Clone, Deserialize)]
pub struct AutoEnvelope {
    #[serde(default)]
    pub transcript_path: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub cwd: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}
