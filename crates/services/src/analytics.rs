use std::sync::Arc;

use chrono::{DateTime, Utc};

use sight_core::model::{GameKind, ProgressBook, SessionSummary, WordBank};
use storage::repository::{SessionHistoryRepository, StorageError};

use crate::tracker::ProgressTracker;

/// Sessions per comparison window when computing a trend.
pub const TREND_WINDOW: usize = 3;
/// A mean-accuracy move must exceed this to leave `Stable`.
pub const TREND_THRESHOLD: f64 = 0.1;
/// How far back the dashboard looks into the session log.
pub const HISTORY_WINDOW: usize = 10;
/// How many words the strongest/weakest rankings surface by default.
pub const TOP_WORD_COUNT: usize = 3;

//
// ─── RANKINGS ──────────────────────────────────────────────────────────────────
//

/// The `n` most accurate words, best first; ties keep bank order.
#[must_use]
pub fn strongest_words(book: &ProgressBook, bank: &WordBank, n: usize) -> Vec<String> {
    let mut ranked: Vec<(&str, f64)> = bank
        .iter()
        .map(|word| (word, book.stat(word).accuracy()))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
        .into_iter()
        .take(n)
        .map(|(word, _)| word.to_owned())
        .collect()
}

/// The `n` least accurate words, worst first; ties keep bank order.
///
/// Unpracticed words rank as accuracy zero, so they surface here first,
/// pulling unseen words into focus.
#[must_use]
pub fn weakest_words(book: &ProgressBook, bank: &WordBank, n: usize) -> Vec<String> {
    let mut ranked: Vec<(&str, f64)> = bank
        .iter()
        .map(|word| (word, book.stat(word).accuracy()))
        .collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
    ranked
        .into_iter()
        .take(n)
        .map(|(word, _)| word.to_owned())
        .collect()
}

//
// ─── TREND ─────────────────────────────────────────────────────────────────────
//

/// Direction of the learner's accuracy across recent sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Improving,
    Declining,
    Stable,
    InsufficientData,
}

fn mean_accuracy(sessions: &[SessionSummary]) -> f64 {
    if sessions.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let len = sessions.len() as f64;
    sessions.iter().map(SessionSummary::accuracy).sum::<f64>() / len
}

/// Compare the most recent sessions against the ones before them.
///
/// `sessions` is oldest-first. The recent window is the last up-to-three
/// sessions (shrunk so the older window is never empty); the older window
/// is the up-to-three before those. Fewer than two sessions cannot be
/// compared. A move of exactly the threshold in either direction reads as
/// `Stable`.
#[must_use]
pub fn trend(sessions: &[SessionSummary]) -> Trend {
    if sessions.len() < 2 {
        return Trend::InsufficientData;
    }

    let recent_len = TREND_WINDOW.min(sessions.len() - 1);
    let (rest, recent) = sessions.split_at(sessions.len() - recent_len);
    let older_len = TREND_WINDOW.min(rest.len());
    let older = &rest[rest.len() - older_len..];

    let recent_mean = mean_accuracy(recent);
    let older_mean = mean_accuracy(older);

    if recent_mean > older_mean + TREND_THRESHOLD {
        Trend::Improving
    } else if recent_mean < older_mean - TREND_THRESHOLD {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

//
// ─── RECOMMENDATIONS ───────────────────────────────────────────────────────────
//

/// Advisory text for the dashboard, derived from the weakest words and the
/// trend. Informational only; nothing branches on these strings.
#[must_use]
pub fn recommended_actions(weakest: &[String], trend: Trend) -> Vec<String> {
    let mut actions = Vec::new();
    if !weakest.is_empty() {
        actions.push(format!("Focus on: {}", weakest.join(", ")));
    }
    if trend == Trend::Declining {
        actions.push("Take a short break and try again later".to_owned());
    }
    actions
}

/// Derived guidance about how the learner is doing and how long to practice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearningInsights {
    pub strongest_words: Vec<String>,
    pub weakest_words: Vec<String>,
    pub recommended_practice_minutes: u32,
    pub optimal_session_length: usize,
}

/// Build insights from current statistics.
///
/// The optimal session length grows with the learner's demonstrated
/// attention span: 8 words to start, 12 past twenty attempts, 15 past
/// fifty.
#[must_use]
pub fn learning_insights(book: &ProgressBook, bank: &WordBank) -> LearningInsights {
    let total_attempts = book.total_attempts();
    let optimal_session_length = if total_attempts > 50 {
        15
    } else if total_attempts > 20 {
        12
    } else {
        8
    };

    LearningInsights {
        strongest_words: strongest_words(book, bank, TOP_WORD_COUNT),
        weakest_words: weakest_words(book, bank, TOP_WORD_COUNT),
        recommended_practice_minutes: 15,
        optimal_session_length,
    }
}

//
// ─── DASHBOARD ─────────────────────────────────────────────────────────────────
//

/// Presentation-agnostic list item for one past session.
///
/// This is intentionally not a UI view-model: no pre-formatted strings, no
/// localization assumptions. The UI formats timestamps and percentages as
/// needed.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionHistoryItem {
    pub date: DateTime<Utc>,
    pub accuracy: f64,
    pub game: GameKind,
}

/// Everything the progress dashboard shows, composed in one call.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub total_attempts: u64,
    pub overall_accuracy: f64,
    pub insights: LearningInsights,
    pub trend: Trend,
    pub recommended_actions: Vec<String>,
    pub recent_sessions: Vec<SessionHistoryItem>,
}

/// Analytics over the session history log, hiding the repository from the UI.
#[derive(Clone)]
pub struct AnalyticsService {
    history: Arc<dyn SessionHistoryRepository>,
}

impl AnalyticsService {
    #[must_use]
    pub fn new(history: Arc<dyn SessionHistoryRepository>) -> Self {
        Self { history }
    }

    /// The most recent sessions (up to [`HISTORY_WINDOW`]), oldest first.
    ///
    /// Records that fail to rehydrate are skipped with a warning rather
    /// than failing the whole read.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the log cannot be read.
    pub fn recent_summaries(&self) -> Result<Vec<SessionSummary>, StorageError> {
        let records = self.history.recent(HISTORY_WINDOW)?;
        Ok(records
            .into_iter()
            .filter_map(|record| match record.into_summary() {
                Ok(summary) => Some(summary),
                Err(e) => {
                    log::warn!("skipping inconsistent session record: {e}");
                    None
                }
            })
            .collect())
    }

    /// Accuracy trend over the recent history.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the log cannot be read.
    pub fn trend(&self) -> Result<Trend, StorageError> {
        Ok(trend(&self.recent_summaries()?))
    }

    /// Compose the full dashboard view for the UI.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the session log cannot be read.
    pub fn dashboard(&self, tracker: &ProgressTracker) -> Result<DashboardView, StorageError> {
        let summaries = self.recent_summaries()?;
        let trend = trend(&summaries);
        let insights = learning_insights(tracker.progress(), tracker.word_bank());
        let overall = tracker.overall_stats();
        let recommended_actions = recommended_actions(&insights.weakest_words, trend);

        let recent_sessions = summaries
            .iter()
            .rev()
            .take(5)
            .map(|summary| SessionHistoryItem {
                date: summary.started_at(),
                accuracy: summary.accuracy(),
                game: summary.game(),
            })
            .collect();

        Ok(DashboardView {
            total_attempts: overall.total_attempts,
            overall_accuracy: overall.overall_accuracy,
            insights,
            trend,
            recommended_actions,
            recent_sessions,
        })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
