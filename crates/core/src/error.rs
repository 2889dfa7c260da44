use thiserror::Error;

use crate::model::{GameKindError, SessionSummaryError, StatsError, WordBankError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    WordBank(#[from] WordBankError),
    #[error(transparent)]
    Stats(#[from] StatsError),
    #[error(transparent)]
    Summary(#[from] SessionSummaryError),
    #[error(transparent)]
    Game(#[from] GameKindError),
}
