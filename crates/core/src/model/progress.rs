use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::model::stats::WordStat;
use crate::model::word::WordBank;

/// In-memory per-word statistics for the whole bank.
///
/// Reads and writes follow an explicit upsert policy: asking for a word
/// that has no entry yields a zero-state stat, and recording an attempt
/// against a missing word initializes it first. This favors availability
/// over strict validation so an evolved word bank never invalidates old
/// data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressBook {
    entries: BTreeMap<String, WordStat>,
}

impl ProgressBook {
    /// An empty book with a zero-state entry for every bank word.
    #[must_use]
    pub fn for_bank(bank: &WordBank) -> Self {
        let mut book = Self::default();
        book.ensure_words(bank);
        book
    }

    /// Zero-fill an entry for every bank word that is missing.
    pub fn ensure_words(&mut self, bank: &WordBank) {
        for word in bank.iter() {
            self.entries.entry(word.to_owned()).or_default();
        }
    }

    /// Drop entries for words no longer in the bank.
    pub fn retain_bank_words(&mut self, bank: &WordBank) {
        self.entries.retain(|word, _| bank.contains(word));
    }

    /// Snapshot of the stat for `word`; zero-state when absent.
    #[must_use]
    pub fn stat(&self, word: &str) -> WordStat {
        self.entries.get(word).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn get(&self, word: &str) -> Option<&WordStat> {
        self.entries.get(word)
    }

    /// Record an attempt, initializing the entry if the word is unknown.
    pub fn record(&mut self, word: &str, is_correct: bool, now: DateTime<Utc>) -> &WordStat {
        let stat = self.entries.entry(word.to_owned()).or_default();
        stat.record(is_correct, now);
        stat
    }

    /// Replace the entry for `word` wholesale (used when rehydrating).
    pub fn insert(&mut self, word: impl Into<String>, stat: WordStat) {
        self.entries.insert(word.into(), stat);
    }

    /// Zero every entry without removing any word.
    pub fn reset_all(&mut self) {
        for stat in self.entries.values_mut() {
            stat.reset();
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &WordStat)> {
        self.entries.iter().map(|(word, stat)| (word.as_str(), stat))
    }

    #[must_use]
    pub fn total_attempts(&self) -> u64 {
        self.entries
            .values()
            .map(|s| u64::from(s.attempts()))
            .sum()
    }

    #[must_use]
    pub fn total_correct(&self) -> u64 {
        self.entries.values().map(|s| u64::from(s.correct())).sum()
    }

    /// Overall accuracy across all words, `0.0` with no attempts.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn overall_accuracy(&self) -> f64 {
        let attempts = self.total_attempts();
        if attempts == 0 {
            0.0
        } else {
            self.total_correct() as f64 / attempts as f64
        }
    }

    /// True once any word has at least one recorded attempt.
    #[must_use]
    pub fn has_any_attempts(&self) -> bool {
        self.entries.values().any(WordStat::is_practiced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn small_bank() -> WordBank {
        WordBank::new(["said", "each", "asked"]).unwrap()
    }

    #[test]
    fn for_bank_covers_every_word() {
        let bank = small_bank();
        let book = ProgressBook::for_bank(&bank);
        assert_eq!(book.len(), bank.len());
        for word in bank.iter() {
            assert!(book.get(word).is_some());
        }
        assert!(!book.has_any_attempts());
    }

    #[test]
    fn record_upserts_unknown_words() {
        let bank = small_bank();
        let mut book = ProgressBook::for_bank(&bank);

        let stat = book.record("brand-new", true, fixed_now());
        assert_eq!(stat.attempts(), 1);
        assert_eq!(book.len(), bank.len() + 1);
    }

    #[test]
    fn retain_drops_strays_and_ensure_fills_gaps() {
        let bank = small_bank();
        let mut book = ProgressBook::default();
        book.record("stray", false, fixed_now());
        book.record("said", true, fixed_now());

        book.retain_bank_words(&bank);
        assert!(book.get("stray").is_none());

        book.ensure_words(&bank);
        assert_eq!(book.len(), bank.len());
        // healing must not clobber existing stats
        assert_eq!(book.stat("said").attempts(), 1);
    }

    #[test]
    fn totals_aggregate_across_words() {
        let bank = small_bank();
        let mut book = ProgressBook::for_bank(&bank);
        let now = fixed_now();
        book.record("said", true, now);
        book.record("said", false, now);
        book.record("each", true, now);

        assert_eq!(book.total_attempts(), 3);
        assert_eq!(book.total_correct(), 2);
        assert!((book.overall_accuracy() - 2.0 / 3.0).abs() < f64::EPSILON);
        assert!(book.has_any_attempts());
    }

    #[test]
    fn reset_all_zeroes_but_keeps_words() {
        let bank = small_bank();
        let mut book = ProgressBook::for_bank(&bank);
        book.record("said", true, fixed_now());

        book.reset_all();
        assert_eq!(book.len(), bank.len());
        assert_eq!(book.total_attempts(), 0);
        assert!(!book.has_any_attempts());
    }
}
