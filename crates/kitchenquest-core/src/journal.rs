//! Narration log port.
//!
//! Every narration with non-empty text produces exactly one entry here,
//! whether or not it is spoken.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One logged line of CDM narration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrationEntry {
    /// Trimmed narration text.
    pub text: String,
    /// Whether the caller asked for the line to be spoken.
    pub speak_aloud: bool,
    /// When the line was logged.
    pub logged_at: DateTime<Utc>,
}

/// Sink for narration log entries.
pub trait NarrationLog: Send + Sync {
    /// Records one entry.
    fn record(&self, entry: NarrationEntry);
}
