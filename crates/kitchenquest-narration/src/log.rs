//! Narration log backed by `tracing`.

use kitchenquest_core::journal::{NarrationEntry, NarrationLog};
use tracing::info;

/// Writes every narration line to the `cdm` tracing target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNarrationLog;

impl NarrationLog for TracingNarrationLog {
    fn record(&self, entry: NarrationEntry) {
        info!(
            target: "cdm",
            speak_aloud = entry.speak_aloud,
            logged_at = %entry.logged_at,
            "{}",
            entry.text
        );
    }
}
