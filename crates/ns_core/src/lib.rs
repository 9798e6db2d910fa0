pub mod config;
pub mod error;
pub mod feed;
pub mod history;
pub mod models;
pub mod storage;
pub mod types;

pub use config::ScanConfig;
pub use error::{Error, Result};
pub use feed::FeedSource;
pub use history::{HistorySummary, KeywordHistory, KeywordTrend};
pub use models::SentimentScorer;
pub use storage::ScanStorage;
pub use types::*;

/// Rounds a score to the three decimals every reported sentiment value uses.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
