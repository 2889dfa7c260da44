#![forbid(unsafe_code)]

//! Orchestration layer of the sight-word practice engine: the progress
//! tracker, adaptive word selection, analytics, export/import, and
//! in-session scoring.

pub mod analytics;
pub mod error;
pub mod scoring;
pub mod selector;
pub mod tracker;
pub mod transfer;

pub use sight_core::Clock;

pub use analytics::{
    AnalyticsService, DashboardView, LearningInsights, SessionHistoryItem, Trend,
};
pub use error::SessionError;
pub use scoring::{Achievement, ScoreBoard};
pub use selector::{DEFAULT_SESSION_LENGTH, RecentWords, SelectionPlan, WordListBuilder};
pub use tracker::{DisplayStats, OverallStats, ProgressTracker};
pub use transfer::{AggregateStats, ExportDocument};
