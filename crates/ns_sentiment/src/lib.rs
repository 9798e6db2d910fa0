use ns_core::Result;
use std::sync::Arc;

pub mod analyzer;
pub mod keywords;
pub mod models;

pub use analyzer::HeadlineAnalyzer;
pub use keywords::KeywordExtractor;
pub use models::create_scorer;

#[derive(Debug, Clone)]
pub struct Config {
    pub scorer_name: String,
    pub keyword_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scorer_name: models::DEFAULT_SCORER.to_string(),
            keyword_limit: keywords::DEFAULT_KEYWORD_LIMIT,
        }
    }
}

/// Builds the analyzer and extractor a scan needs from one config.
pub fn build(config: &Config) -> Result<(HeadlineAnalyzer, KeywordExtractor)> {
    let scorer = create_scorer(&config.scorer_name)?;
    Ok((
        HeadlineAnalyzer::new(Arc::clone(&scorer)),
        KeywordExtractor::new(config.keyword_limit),
    ))
}

pub mod prelude {
    pub use super::Config;
    pub use super::models::create_scorer;
    pub use super::{HeadlineAnalyzer, KeywordExtractor};
    pub use ns_core::{Error, Result, SentimentScorer};
}
