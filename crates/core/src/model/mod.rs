mod game;
mod progress;
mod session;
mod stats;
mod word;

pub use game::{GameKind, GameKindError};
pub use progress::ProgressBook;
pub use session::{SessionStats, SessionSummary, SessionSummaryError};
pub use stats::{StatsError, Tier, WordStat};
pub use word::{WordBank, WordBankError};
