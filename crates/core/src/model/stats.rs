use chrono::{DateTime, Utc};
use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Errors that can occur while rehydrating word statistics.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StatsError {
    #[error("correct count ({correct}) exceeds attempts ({attempts})")]
    CountMismatch { attempts: u32, correct: u32 },
}

//
// ─── TIER ─────────────────────────────────────────────────────────────────────
//

/// Strength classification of a word for adaptive selection.
///
/// Classification is first-match-wins over the thresholds in
/// [`WordStat::tier`]; a word lands in exactly one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Struggling or barely practiced. Gets the largest session share.
    Weak,
    /// Partially learned.
    Medium,
    /// Reliably known.
    Strong,
}

//
// ─── WORD STAT ────────────────────────────────────────────────────────────────
//

/// Per-word attempt statistics.
///
/// Only attempts, correct count, and the last-attempt timestamp are stored;
/// accuracy is always recomputed from them so the two can never drift.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordStat {
    attempts: u32,
    correct: u32,
    last_attempted: Option<DateTime<Utc>>,
}

impl WordStat {
    /// A zero-state stat: no attempts, no history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate a stat from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `StatsError::CountMismatch` if `correct > attempts`.
    pub fn from_persisted(
        attempts: u32,
        correct: u32,
        last_attempted: Option<DateTime<Utc>>,
    ) -> Result<Self, StatsError> {
        if correct > attempts {
            return Err(StatsError::CountMismatch { attempts, correct });
        }
        Ok(Self {
            attempts,
            correct,
            last_attempted,
        })
    }

    /// Record one attempt at this word.
    pub fn record(&mut self, is_correct: bool, now: DateTime<Utc>) {
        self.attempts = self.attempts.saturating_add(1);
        if is_correct {
            self.correct = self.correct.saturating_add(1);
        }
        self.last_attempted = Some(now);
    }

    /// Zero the stat without removing it.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn last_attempted(&self) -> Option<DateTime<Utc>> {
        self.last_attempted
    }

    /// Fraction of attempts answered correctly, `0.0` when unpracticed.
    ///
    /// Always in `[0.0, 1.0]`.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            f64::from(self.correct) / f64::from(self.attempts)
        }
    }

    #[must_use]
    pub fn is_practiced(&self) -> bool {
        self.attempts > 0
    }

    /// Classify this word's strength. First matching rule wins:
    /// weak when `accuracy < 0.5` or `attempts < 2`,
    /// medium when `accuracy < 0.8` or `attempts < 4`,
    /// strong otherwise.
    #[must_use]
    pub fn tier(&self) -> Tier {
        let accuracy = self.accuracy();
        if accuracy < 0.5 || self.attempts < 2 {
            Tier::Weak
        } else if accuracy < 0.8 || self.attempts < 4 {
            Tier::Medium
        } else {
            Tier::Strong
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
