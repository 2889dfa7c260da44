use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while parsing a game type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameKindError {
    #[error("unknown game type: {0}")]
    Unknown(String),
}

/// The five practice modes a session can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameKind {
    Spelling,
    Scramble,
    MultipleChoice,
    Flashcards,
    ReadingPractice,
}

impl GameKind {
    pub const ALL: [GameKind; 5] = [
        GameKind::Spelling,
        GameKind::Scramble,
        GameKind::MultipleChoice,
        GameKind::Flashcards,
        GameKind::ReadingPractice,
    ];

    /// Wire/display name, matching the persisted session log.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            GameKind::Spelling => "spelling",
            GameKind::Scramble => "scramble",
            GameKind::MultipleChoice => "multiple-choice",
            GameKind::Flashcards => "flashcards",
            GameKind::ReadingPractice => "reading-practice",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameKind {
    type Err = GameKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spelling" => Ok(GameKind::Spelling),
            "scramble" => Ok(GameKind::Scramble),
            "multiple-choice" => Ok(GameKind::MultipleChoice),
            "flashcards" => Ok(GameKind::Flashcards),
            "reading-practice" => Ok(GameKind::ReadingPractice),
            other => Err(GameKindError::Unknown(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_wire_names() {
        for kind in GameKind::ALL {
            assert_eq!(kind.as_str().parse::<GameKind>().unwrap(), kind);
        }
    }

    #[test]
    fn rejects_unknown_names() {
        let err = "karaoke".parse::<GameKind>().unwrap_err();
        assert_eq!(err, GameKindError::Unknown("karaoke".into()));
    }

    #[test]
    fn serde_uses_kebab_case() {
        let json = serde_json::to_string(&GameKind::MultipleChoice).unwrap();
        assert_eq!(json, "\"multiple-choice\"");
        let back: GameKind = serde_json::from_str("\"reading-practice\"").unwrap();
        assert_eq!(back, GameKind::ReadingPractice);
    }
}
