use std::collections::HashSet;
use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Errors that can occur while building a word bank.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WordBankError {
    #[error("word bank must contain at least one word")]
    Empty,
    #[error("duplicate word in bank: {0}")]
    DuplicateWord(String),
    #[error("blank word at position {0}")]
    BlankWord(usize),
}

//
// ─── WORD BANK ────────────────────────────────────────────────────────────────
//

/// The fixed, ordered set of sight words a learner practices.
///
/// Order is stable (it is the display order and the tie-break order for
/// accuracy rankings), words are unique, and the bank is immutable once
/// constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordBank {
    words: Vec<String>,
}

impl WordBank {
    /// Build a bank from an ordered word list.
    ///
    /// # Errors
    ///
    /// Returns `WordBankError::Empty` for an empty list,
    /// `WordBankError::BlankWord` if a word is empty or whitespace-only,
    /// and `WordBankError::DuplicateWord` on repeated entries.
    pub fn new<I, S>(words: I) -> Result<Self, WordBankError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: Vec<String> = words.into_iter().map(Into::into).collect();
        if words.is_empty() {
            return Err(WordBankError::Empty);
        }

        let mut seen = HashSet::new();
        for (index, word) in words.iter().enumerate() {
            if word.trim().is_empty() {
                return Err(WordBankError::BlankWord(index));
            }
            if !seen.insert(word.as_str()) {
                return Err(WordBankError::DuplicateWord(word.clone()));
            }
        }

        Ok(Self { words })
    }

    /// The default bank of 54 early-reader sight words.
    #[must_use]
    pub fn default_sight_words() -> Self {
        let words = [
            "her", "who", "some", "out", "about", "too", "two", "were", "what", "come", "comes",
            "coming", "become", "becomes", "becoming", "their", "no", "so", "also", "how", "now",
            "where", "here", "there", "any", "anywhere", "anyone", "anything", "many", "front",
            "very", "every", "everywhere", "everyone", "everything", "could", "would", "should",
            "when", "which", "been", "said", "each", "asked", "why", "by", "my", "try", "put",
            "putting", "only", "work", "word", "world",
        ];
        // The static list is known non-empty and duplicate-free.
        Self {
            words: words.iter().map(ToString::to_string).collect(),
        }
    }

    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    /// Position of a word in bank order, used for stable tie-breaking.
    #[must_use]
    pub fn position(&self, word: &str) -> Option<usize> {
        self.words.iter().position(|w| w == word)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bank_is_ordered_and_unique() {
        let bank = WordBank::default_sight_words();
        assert_eq!(bank.len(), 54);
        assert_eq!(bank.words()[0], "her");
        assert_eq!(bank.words()[53], "world");

        let unique: HashSet<&str> = bank.iter().collect();
        assert_eq!(unique.len(), bank.len());
    }

    #[test]
    fn rejects_empty_bank() {
        let err = WordBank::new(Vec::<String>::new()).unwrap_err();
        assert_eq!(err, WordBankError::Empty);
    }

    #[test]
    fn rejects_duplicates() {
        let err = WordBank::new(["the", "and", "the"]).unwrap_err();
        assert_eq!(err, WordBankError::DuplicateWord("the".into()));
    }

    #[test]
    fn rejects_blank_words() {
        let err = WordBank::new(["the", "  "]).unwrap_err();
        assert_eq!(err, WordBankError::BlankWord(1));
    }

    #[test]
    fn position_follows_insertion_order() {
        let bank = WordBank::new(["said", "each", "asked"]).unwrap();
        assert_eq!(bank.position("each"), Some(1));
        assert_eq!(bank.position("missing"), None);
        assert!(bank.contains("asked"));
    }
}
