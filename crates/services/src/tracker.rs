use rand::Rng;

use sight_core::Clock;
use sight_core::model::{
    GameKind, ProgressBook, SessionStats, SessionSummary, WordBank, WordStat,
};
use storage::repository::{
    ProgressRecord, ProgressRepository, SessionHistoryRepository, SessionRecord, Storage,
};

use crate::error::SessionError;
use crate::selector::WordListBuilder;

/// Words below this accuracy count as weak for display and practice hints.
pub const WEAK_ACCURACY_THRESHOLD: f64 = 0.7;
/// Words at or above this accuracy count as strong.
pub const STRONG_ACCURACY_THRESHOLD: f64 = 0.8;
/// A word with fewer attempts than this always needs more practice.
pub const MIN_PRACTICE_ATTEMPTS: u32 = 3;

//
// ─── AGGREGATE VIEWS ───────────────────────────────────────────────────────────
//

/// Totals across the whole word bank.
#[derive(Debug, Clone, PartialEq)]
pub struct OverallStats {
    pub total_attempts: u64,
    pub total_correct: u64,
    pub overall_accuracy: f64,
}

/// Summary numbers for the welcome/dashboard screen.
///
/// Accuracy is a fraction in `[0, 1]`; the UI decides how to format it.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayStats {
    pub total_attempts: u64,
    pub overall_accuracy: f64,
    pub weak_words: Vec<String>,
    pub needs_practice: usize,
}

//
// ─── PROGRESS TRACKER ──────────────────────────────────────────────────────────
//

/// The engine's statistics store and session tracker.
///
/// Owns the per-word progress book and the live session; all mutation goes
/// through these methods. Constructed once at application start and handed
/// to whatever owns the game loop; there are no hidden globals.
///
/// Persistence is deliberately forgiving: loading recovers from missing or
/// corrupt blobs by starting from zero state, and write failures are logged
/// without interrupting play; the in-memory store stays authoritative.
pub struct ProgressTracker {
    bank: WordBank,
    book: ProgressBook,
    session: Option<SessionStats>,
    storage: Storage,
    clock: Clock,
}

impl ProgressTracker {
    /// Load the tracker from storage.
    ///
    /// Never fails: a missing, unreadable, or partial progress blob yields a
    /// complete zero-state book. Entries for words no longer in the bank are
    /// dropped; missing bank words are zero-filled.
    #[must_use]
    pub fn load(bank: WordBank, storage: Storage) -> Self {
        let book = match storage.progress.load() {
            Ok(Some(record)) => {
                let mut book = record.into_book();
                book.retain_bank_words(&bank);
                book.ensure_words(&bank);
                book
            }
            Ok(None) => ProgressBook::for_bank(&bank),
            Err(e) => {
                log::error!("failed to load progress, starting from zero state: {e}");
                ProgressBook::for_bank(&bank)
            }
        };

        Self {
            bank,
            book,
            session: None,
            storage,
            clock: Clock::default(),
        }
    }

    /// Replace the clock, mainly to pin time in tests.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn word_bank(&self) -> &WordBank {
        &self.bank
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressBook {
        &self.book
    }

    #[must_use]
    pub fn current_session(&self) -> Option<&SessionStats> {
        self.session.as_ref()
    }

    pub(crate) fn clock(&self) -> Clock {
        self.clock
    }

    pub(crate) fn replace_book(&mut self, book: ProgressBook) {
        self.book = book;
    }

    //
    // ─── SESSION LIFECYCLE ────────────────────────────────────────────────
    //

    /// Begin a new play session, discarding any live one.
    ///
    /// The discarded session's attempts were already persisted per answer,
    /// so nothing is lost beyond its summary.
    pub fn start_session(&mut self, game: GameKind) {
        if self.session.is_some() {
            log::debug!("starting a new session while one is live; replacing it");
        }
        self.session = Some(SessionStats::begin(game, self.clock.now()));
    }

    /// Close the live session, append its summary to the history log, and
    /// persist progress.
    ///
    /// A history-append failure is logged and absorbed; the summary is
    /// still returned.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted` if no session is in progress.
    pub fn end_session(&mut self) -> Result<SessionSummary, SessionError> {
        let session = self.session.take().ok_or(SessionError::NotStarted)?;
        let summary = session.finish(self.clock.now())?;

        if let Err(e) = self
            .storage
            .sessions
            .append(&SessionRecord::from_summary(&summary))
        {
            log::error!("failed to append session to history: {e}");
        }
        self.persist();

        Ok(summary)
    }

    //
    // ─── RECORDING ────────────────────────────────────────────────────────
    //

    /// Record one answer against a word and persist.
    ///
    /// Words outside the bank are tolerated: a zero entry is initialized
    /// and a warning logged, so an evolved word bank never rejects old
    /// callers.
    pub fn record_attempt(&mut self, word: &str, is_correct: bool) {
        if self.book.get(word).is_none() {
            log::warn!("word {word:?} not found in progress tracking, initializing");
        }
        self.book.record(word, is_correct, self.clock.now());

        if let Some(session) = self.session.as_mut() {
            session.record_attempt(word, is_correct);
        }

        self.persist();
    }

    /// Write the full progress blob to storage.
    ///
    /// Failures (e.g. storage quota) are logged, not propagated; the next
    /// successful write reconciles.
    pub fn persist(&self) {
        let record = ProgressRecord::from_book(&self.book);
        if let Err(e) = self.storage.progress.save(&record) {
            log::error!("failed to persist progress, keeping in-memory state: {e}");
        }
    }

    /// Zero every word's statistics and persist.
    pub fn reset_all(&mut self) {
        self.book.reset_all();
        self.persist();
    }

    //
    // ─── QUERIES ──────────────────────────────────────────────────────────
    //

    /// Snapshot of one word's statistics; zero-state for unknown words.
    #[must_use]
    pub fn get_word_stat(&self, word: &str) -> WordStat {
        if self.book.get(word).is_none() {
            log::warn!("word {word:?} not found in progress tracking, returning zero stats");
        }
        self.book.stat(word)
    }

    #[must_use]
    pub fn overall_stats(&self) -> OverallStats {
        OverallStats {
            total_attempts: self.book.total_attempts(),
            total_correct: self.book.total_correct(),
            overall_accuracy: self.book.overall_accuracy(),
        }
    }

    #[must_use]
    pub fn display_stats(&self) -> DisplayStats {
        DisplayStats {
            total_attempts: self.book.total_attempts(),
            overall_accuracy: self.book.overall_accuracy(),
            weak_words: self.weak_words(),
            needs_practice: self.words_needing_practice().len(),
        }
    }

    /// Practiced words below the weak threshold, in bank order.
    #[must_use]
    pub fn weak_words(&self) -> Vec<String> {
        self.bank
            .iter()
            .filter(|word| {
                let stat = self.book.stat(word);
                stat.is_practiced() && stat.accuracy() < WEAK_ACCURACY_THRESHOLD
            })
            .map(ToOwned::to_owned)
            .collect()
    }

    /// Practiced words at or above the strong threshold, in bank order.
    #[must_use]
    pub fn strong_words(&self) -> Vec<String> {
        self.bank
            .iter()
            .filter(|word| {
                let stat = self.book.stat(word);
                stat.is_practiced() && stat.accuracy() >= STRONG_ACCURACY_THRESHOLD
            })
            .map(ToOwned::to_owned)
            .collect()
    }

    /// Words that are thinly practiced or still inaccurate, in bank order.
    #[must_use]
    pub fn words_needing_practice(&self) -> Vec<String> {
        self.bank
            .iter()
            .filter(|word| {
                let stat = self.book.stat(word);
                stat.attempts() < MIN_PRACTICE_ATTEMPTS
                    || stat.accuracy() < WEAK_ACCURACY_THRESHOLD
            })
            .map(ToOwned::to_owned)
            .collect()
    }

    //
    // ─── SELECTION ────────────────────────────────────────────────────────
    //

    /// Build an adaptive practice list of `count` words.
    #[must_use]
    pub fn select_session_words(&self, count: usize) -> Vec<String> {
        WordListBuilder::new(&self.bank)
            .with_length(count)
            .build(&self.book)
            .words
    }

    /// Deterministic variant of [`Self::select_session_words`] for tests.
    #[must_use]
    pub fn select_session_words_with_rng<R: Rng + ?Sized>(
        &self,
        count: usize,
        rng: &mut R,
    ) -> Vec<String> {
        WordListBuilder::new(&self.bank)
            .with_length(count)
            .build_with_rng(&self.book, rng)
            .words
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
