use chrono::Utc;
use serde::{Deserialize, Serialize};

pub const MAX_HISTORY_ITEMS: usize = 5;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub city: String,

    /// Epoch milliseconds.
    pub timestamp: i64,
}

impl HistoryEntry {
    pub fn now(city: &str) -> Self {
        Self {
            city: city.to_string(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

/// Moves `city` to the front of the history, dropping any earlier entry with
/// the exact same name, and caps the list at [`MAX_HISTORY_ITEMS`].
pub fn record_search(history: &[HistoryEntry], city: &str) -> Vec<HistoryEntry> {
    record_search_at(history, HistoryEntry::now(city))
}

pub fn record_search_at(history: &[HistoryEntry], entry: HistoryEntry) -> Vec<HistoryEntry> {
    std::iter::once(entry.clone())
        .chain(history.iter().filter(|e| e.city != entry.city).cloned())
        .take(MAX_HISTORY_ITEMS)
        .collect()
}
