use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storage::repository::ProgressRecord;

use crate::tracker::ProgressTracker;

/// Version tag written into every export for forward compatibility.
pub const EXPORT_VERSION: &str = "1.0";

/// Aggregate totals bundled into an export alongside the raw progress.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    pub total_attempts: u64,
    pub total_correct: u64,
    pub overall_accuracy: f64,
}

/// The export document: full progress plus aggregates and provenance.
///
/// `version` and `progress` are the fields an import requires; the rest
/// are informational and tolerated when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub version: String,
    #[serde(rename = "exportDate")]
    pub export_date: Option<DateTime<Utc>>,
    pub progress: ProgressRecord,
    #[serde(default)]
    pub stats: AggregateStats,
}

impl ProgressTracker {
    /// Serialize the full progress store as a pretty-printed JSON document.
    #[must_use]
    pub fn export_progress(&self) -> String {
        let overall = self.overall_stats();
        let document = ExportDocument {
            version: EXPORT_VERSION.to_owned(),
            export_date: Some(self.clock().now()),
            progress: ProgressRecord::from_book(self.progress()),
            stats: AggregateStats {
                total_attempts: overall.total_attempts,
                total_correct: overall.total_correct,
                overall_accuracy: overall.overall_accuracy,
            },
        };

        serde_json::to_string_pretty(&document).unwrap_or_else(|e| {
            log::error!("failed to serialize export document: {e}");
            String::new()
        })
    }

    /// Replace the progress store from an exported document.
    ///
    /// Fails closed: if the document cannot be parsed or lacks the expected
    /// top-level fields, `false` is returned and the store is left exactly
    /// as it was. On success the imported entries are adopted wholesale,
    /// missing bank words are zero-filled, and the result is persisted.
    pub fn import_progress(&mut self, document: &str) -> bool {
        let document: ExportDocument = match serde_json::from_str(document) {
            Ok(document) => document,
            Err(e) => {
                log::warn!("rejecting progress import: {e}");
                return false;
            }
        };
        if document.version.is_empty() {
            log::warn!("rejecting progress import: empty version tag");
            return false;
        }

        let mut book = document.progress.into_book();
        book.ensure_words(self.word_bank());
        self.replace_book(book);
        self.persist();
        true
    }
}
