//! Recording narration log.

use std::sync::Mutex;

use kitchenquest_core::journal::{NarrationEntry, NarrationLog};

/// A narration log that keeps every entry in memory.
#[derive(Debug, Default)]
pub struct RecordingNarrationLog {
    entries: Mutex<Vec<NarrationEntry>>,
}

impl RecordingNarrationLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all entries.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn entries(&self) -> Vec<NarrationEntry> {
        self.entries.lock().unwrap().clone()
    }

    /// Returns the logged texts in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn texts(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .map(|entry| entry.text.clone())
            .collect()
    }
}

impl NarrationLog for RecordingNarrationLog {
    fn record(&self, entry: NarrationEntry) {
        self.entries.lock().unwrap().push(entry);
    }
}
