use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use sight_core::model::{
    GameKind, ProgressBook, SessionSummary, SessionSummaryError, StatsError, WordStat,
};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

//
// ─── PERSISTED RECORDS ─────────────────────────────────────────────────────────
//

/// Persisted shape for one word's statistics.
///
/// This mirrors the domain `WordStat` so repositories can serialize without
/// leaking storage concerns into the domain layer. The `accuracy` field is
/// written for compatibility with historical exports but is ignored on read;
/// the domain recomputes accuracy from counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordStatRecord {
    pub attempts: u32,
    pub correct: u32,
    pub last_attempted: Option<DateTime<Utc>>,
    #[serde(default)]
    pub accuracy: f64,
}

impl WordStatRecord {
    #[must_use]
    pub fn from_stat(stat: &WordStat) -> Self {
        Self {
            attempts: stat.attempts(),
            correct: stat.correct(),
            last_attempted: stat.last_attempted(),
            accuracy: stat.accuracy(),
        }
    }

    /// Convert the record back into a domain `WordStat`.
    ///
    /// # Errors
    ///
    /// Returns `StatsError::CountMismatch` if the persisted counts are
    /// inconsistent; callers recover by substituting a zero-state stat.
    pub fn into_stat(self) -> Result<WordStat, StatsError> {
        WordStat::from_persisted(self.attempts, self.correct, self.last_attempted)
    }
}

/// The full progress blob: one entry per word, persisted under a single key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressRecord {
    pub words: BTreeMap<String, WordStatRecord>,
}

impl ProgressRecord {
    #[must_use]
    pub fn from_book(book: &ProgressBook) -> Self {
        let words = book
            .iter()
            .map(|(word, stat)| (word.to_owned(), WordStatRecord::from_stat(stat)))
            .collect();
        Self { words }
    }

    /// Rehydrate a progress book, substituting zero-state for entries whose
    /// persisted counts are inconsistent.
    #[must_use]
    pub fn into_book(self) -> ProgressBook {
        let mut book = ProgressBook::default();
        for (word, record) in self.words {
            let stat = record.into_stat().unwrap_or_else(|e| {
                log::warn!("discarding inconsistent stats for {word:?}: {e}");
                WordStat::new()
            });
            book.insert(word, stat);
        }
        book
    }
}

/// Persisted shape for one completed session, appended to the history log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub date: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub game_type: GameKind,
    pub total_attempts: u32,
    pub correct_attempts: u32,
    pub accuracy: f64,
    pub duration_minutes: i64,
    pub words_attempted: Vec<String>,
}

impl SessionRecord {
    #[must_use]
    pub fn from_summary(summary: &SessionSummary) -> Self {
        Self {
            date: summary.started_at(),
            completed_at: summary.completed_at(),
            game_type: summary.game(),
            total_attempts: summary.total_attempts(),
            correct_attempts: summary.correct_attempts(),
            accuracy: summary.accuracy(),
            duration_minutes: summary.duration_minutes(),
            words_attempted: summary.words_attempted().to_vec(),
        }
    }

    /// Convert the record back into a domain `SessionSummary`.
    ///
    /// # Errors
    ///
    /// Returns `SessionSummaryError` if the persisted fields are inconsistent.
    pub fn into_summary(self) -> Result<SessionSummary, SessionSummaryError> {
        SessionSummary::from_counts(
            self.date,
            self.completed_at,
            self.game_type,
            self.total_attempts,
            self.correct_attempts,
            self.words_attempted,
        )
    }
}

//
// ─── REPOSITORY TRAITS ─────────────────────────────────────────────────────────
//

/// Repository contract for the progress blob.
///
/// Operations are synchronous: the engine treats persistence as a
/// fire-and-forget write at the call site and never blocks on anything
/// beyond the write itself.
pub trait ProgressRepository: Send + Sync {
    /// Load the persisted progress blob, `None` if nothing was ever saved.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the blob exists but cannot be read.
    fn load(&self) -> Result<Option<ProgressRecord>, StorageError>;

    /// Persist the full progress blob, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the blob cannot be stored.
    fn save(&self, record: &ProgressRecord) -> Result<(), StorageError>;
}

/// Repository contract for the append-only session history log.
///
/// The raw log is uncapped; capping to the most recent N happens at the
/// read layer.
pub trait SessionHistoryRepository: Send + Sync {
    /// Append one completed session to the log.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    fn append(&self, record: &SessionRecord) -> Result<(), StorageError>;

    /// The most recent `limit` sessions, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the log cannot be read.
    fn recent(&self, limit: usize) -> Result<Vec<SessionRecord>, StorageError>;
}

//
// ─── IN-MEMORY STORE ───────────────────────────────────────────────────────────
//

/// Simple in-memory store implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    progress: Arc<Mutex<Option<ProgressRecord>>>,
    sessions: Arc<Mutex<Vec<SessionRecord>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressRepository for InMemoryStore {
    fn load(&self) -> Result<Option<ProgressRecord>, StorageError> {
        let guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, record: &ProgressRecord) -> Result<(), StorageError> {
        let mut guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(record.clone());
        Ok(())
    }
}

impl SessionHistoryRepository for InMemoryStore {
    fn append(&self, record: &SessionRecord) -> Result<(), StorageError> {
        let mut guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.push(record.clone());
        Ok(())
    }

    fn recent(&self, limit: usize) -> Result<Vec<SessionRecord>, StorageError> {
        let guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let skip = guard.len().saturating_sub(limit);
        Ok(guard[skip..].to_vec())
    }
}

//
// ─── STORAGE AGGREGATE ─────────────────────────────────────────────────────────
//

/// Aggregates the progress and history repositories behind trait objects
/// for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
    pub sessions: Arc<dyn SessionHistoryRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let store = InMemoryStore::new();
        let progress: Arc<dyn ProgressRepository> = Arc::new(store.clone());
        let sessions: Arc<dyn SessionHistoryRepository> = Arc::new(store);
        Self { progress, sessions }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use sight_core::model::{GameKind, SessionStats, WordBank};
    use sight_core::time::fixed_now;

    fn sample_book() -> ProgressBook {
        let bank = WordBank::new(["said", "each"]).unwrap();
        let mut book = ProgressBook::for_bank(&bank);
        book.record("said", true, fixed_now());
        book.record("said", false, fixed_now());
        book
    }

    #[test]
    fn progress_record_round_trips() {
        let book = sample_book();
        let record = ProgressRecord::from_book(&book);
        assert!((record.words["said"].accuracy - 0.5).abs() < f64::EPSILON);

        let back = record.into_book();
        assert_eq!(back, book);
    }

    #[test]
    fn inconsistent_record_falls_back_to_zero_state() {
        let mut record = ProgressRecord::default();
        record.words.insert(
            "said".into(),
            WordStatRecord {
                attempts: 1,
                correct: 5,
                last_attempted: None,
                accuracy: 5.0,
            },
        );

        let book = record.into_book();
        assert_eq!(book.stat("said"), WordStat::new());
    }

    #[test]
    fn session_record_round_trips() {
        let mut session = SessionStats::begin(GameKind::Scramble, fixed_now());
        session.record_attempt("said", true);
        let summary = session.finish(fixed_now()).unwrap();

        let record = SessionRecord::from_summary(&summary);
        assert_eq!(record.into_summary().unwrap(), summary);
    }

    #[test]
    fn in_memory_store_round_trips_progress() {
        let store = InMemoryStore::new();
        assert!(store.load().unwrap().is_none());

        let record = ProgressRecord::from_book(&sample_book());
        store.save(&record).unwrap();
        assert_eq!(store.load().unwrap(), Some(record));
    }

    #[test]
    fn recent_returns_last_n_oldest_first() {
        let store = InMemoryStore::new();
        for i in 0..5_u32 {
            let mut session = SessionStats::begin(GameKind::Spelling, fixed_now());
            for _ in 0..=i {
                session.record_attempt("said", true);
            }
            let summary = session.finish(fixed_now()).unwrap();
            store.append(&SessionRecord::from_summary(&summary)).unwrap();
        }

        let recent = store.recent(3).unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(
            recent.iter().map(|r| r.total_attempts).collect::<Vec<_>>(),
            [3, 4, 5]
        );
    }

    #[test]
    fn store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<InMemoryStore>();
        assert_send_sync::<Storage>();
    }
}
