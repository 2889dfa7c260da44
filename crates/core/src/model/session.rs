use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::game::GameKind;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionSummaryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("correct attempts ({correct}) exceed total attempts ({total})")]
    CountMismatch { total: u32, correct: u32 },
}

//
// ─── LIVE SESSION ─────────────────────────────────────────────────────────────
//

/// Accumulating state for the play session currently in progress.
///
/// Accuracy and duration are never stored here; they are derived when the
/// session is finished so they cannot disagree with their inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStats {
    started_at: DateTime<Utc>,
    game: GameKind,
    total_attempts: u32,
    correct_attempts: u32,
    words_attempted: BTreeSet<String>,
}

impl SessionStats {
    /// Open a fresh session of the given mode.
    #[must_use]
    pub fn begin(game: GameKind, started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            game,
            total_attempts: 0,
            correct_attempts: 0,
            words_attempted: BTreeSet::new(),
        }
    }

    /// Count one answer toward this session.
    pub fn record_attempt(&mut self, word: &str, is_correct: bool) {
        self.total_attempts = self.total_attempts.saturating_add(1);
        if is_correct {
            self.correct_attempts = self.correct_attempts.saturating_add(1);
        }
        self.words_attempted.insert(word.to_owned());
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn game(&self) -> GameKind {
        self.game
    }

    #[must_use]
    pub fn total_attempts(&self) -> u32 {
        self.total_attempts
    }

    #[must_use]
    pub fn correct_attempts(&self) -> u32 {
        self.correct_attempts
    }

    /// Distinct words seen this session, in sorted order.
    #[must_use]
    pub fn words_attempted(&self) -> &BTreeSet<String> {
        &self.words_attempted
    }

    /// Session accuracy so far, `0.0` before the first answer.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        if self.total_attempts == 0 {
            0.0
        } else {
            f64::from(self.correct_attempts) / f64::from(self.total_attempts)
        }
    }

    /// Close the session and derive its immutable summary.
    ///
    /// # Errors
    ///
    /// Returns `SessionSummaryError::InvalidTimeRange` if `completed_at`
    /// precedes the session start.
    pub fn finish(self, completed_at: DateTime<Utc>) -> Result<SessionSummary, SessionSummaryError> {
        SessionSummary::from_counts(
            self.started_at,
            completed_at,
            self.game,
            self.total_attempts,
            self.correct_attempts,
            self.words_attempted.into_iter().collect(),
        )
    }
}

//
// ─── SESSION SUMMARY ──────────────────────────────────────────────────────────
//

/// Immutable record of one completed play session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    game: GameKind,
    total_attempts: u32,
    correct_attempts: u32,
    words_attempted: Vec<String>,
    accuracy: f64,
    duration_minutes: i64,
}

impl SessionSummary {
    /// Build a summary from raw counts, deriving accuracy and duration.
    ///
    /// # Errors
    ///
    /// Returns `SessionSummaryError::InvalidTimeRange` if the time range is
    /// inverted and `SessionSummaryError::CountMismatch` if `correct > total`.
    pub fn from_counts(
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        game: GameKind,
        total_attempts: u32,
        correct_attempts: u32,
        words_attempted: Vec<String>,
    ) -> Result<Self, SessionSummaryError> {
        if completed_at < started_at {
            return Err(SessionSummaryError::InvalidTimeRange);
        }
        if correct_attempts > total_attempts {
            return Err(SessionSummaryError::CountMismatch {
                total: total_attempts,
                correct: correct_attempts,
            });
        }

        let accuracy = if total_attempts == 0 {
            0.0
        } else {
            f64::from(correct_attempts) / f64::from(total_attempts)
        };
        let elapsed_ms = (completed_at - started_at).num_milliseconds();
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
        let duration_minutes = (elapsed_ms as f64 / 60_000.0).round() as i64;

        Ok(Self {
            started_at,
            completed_at,
            game,
            total_attempts,
            correct_attempts,
            words_attempted,
            accuracy,
            duration_minutes,
        })
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn game(&self) -> GameKind {
        self.game
    }

    #[must_use]
    pub fn total_attempts(&self) -> u32 {
        self.total_attempts
    }

    #[must_use]
    pub fn correct_attempts(&self) -> u32 {
        self.correct_attempts
    }

    #[must_use]
    pub fn words_attempted(&self) -> &[String] {
        &self.words_attempted
    }

    #[must_use]
    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    #[must_use]
    pub fn duration_minutes(&self) -> i64 {
        self.duration_minutes
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use chrono::Duration;

    #[test]
    fn session_accumulates_and_derives_accuracy() {
        let mut session = SessionStats::begin(GameKind::Spelling, fixed_now());
        for i in 0..10 {
            // seven correct, three wrong, with one repeated word
            let word = if i < 9 { format!("w{i}") } else { "w0".to_owned() };
            session.record_attempt(&word, i < 7);
        }

        assert_eq!(session.total_attempts(), 10);
        assert_eq!(session.correct_attempts(), 7);
        assert!((session.accuracy() - 0.7).abs() < f64::EPSILON);
        assert!(session.words_attempted().len() <= 10);
        assert_eq!(session.words_attempted().len(), 9);
    }

    #[test]
    fn finish_derives_summary_fields() {
        let started = fixed_now();
        let mut session = SessionStats::begin(GameKind::Flashcards, started);
        session.record_attempt("who", true);
        session.record_attempt("her", false);

        let completed = started + Duration::seconds(150);
        let summary = session.finish(completed).unwrap();

        assert_eq!(summary.game(), GameKind::Flashcards);
        assert_eq!(summary.total_attempts(), 2);
        assert!((summary.accuracy() - 0.5).abs() < f64::EPSILON);
        // 150s rounds to 3 minutes
        assert_eq!(summary.duration_minutes(), 3);
        assert_eq!(summary.words_attempted(), ["her", "who"]);
    }

    #[test]
    fn summary_with_no_attempts_has_zero_accuracy() {
        let session = SessionStats::begin(GameKind::Scramble, fixed_now());
        let summary = session.finish(fixed_now()).unwrap();
        assert_eq!(summary.accuracy(), 0.0);
        assert_eq!(summary.duration_minutes(), 0);
    }

    #[test]
    fn rejects_inverted_time_range() {
        let session = SessionStats::begin(GameKind::Spelling, fixed_now());
        let err = session
            .finish(fixed_now() - Duration::seconds(1))
            .unwrap_err();
        assert_eq!(err, SessionSummaryError::InvalidTimeRange);
    }

    #[test]
    fn from_counts_rejects_correct_above_total() {
        let err = SessionSummary::from_counts(
            fixed_now(),
            fixed_now(),
            GameKind::Spelling,
            3,
            4,
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, SessionSummaryError::CountMismatch { .. }));
    }
}
