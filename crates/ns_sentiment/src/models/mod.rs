use std::sync::Arc;
use ns_core::{Error, Result, SentimentScorer};

pub mod lexicon;
pub mod neutral;

pub use lexicon::LexiconScorer;
pub use neutral::NeutralScorer;

pub const DEFAULT_SCORER: &str = "lexicon";

/// Names accepted by [`create_scorer`].
pub const AVAILABLE_SCORERS: &[&str] = &["lexicon", "neutral"];

pub fn create_scorer(name: &str) -> Result<Arc<dyn SentimentScorer>> {
    match name.to_lowercase().as_str() {
        "lexicon" => Ok(Arc::new(LexiconScorer::new())),
        "neutral" => Ok(Arc::new(NeutralScorer)),
        other => Err(Error::Sentiment(format!(
            "Unknown scorer: {}. Available scorers: {}",
            other,
            AVAILABLE_SCORERS.join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_scorer_by_name() {
        assert_eq!(create_scorer("lexicon").unwrap().name(), "lexicon");
        assert_eq!(create_scorer("Neutral").unwrap().name(), "neutral");
        assert!(matches!(create_scorer("deepseek"), Err(Error::Sentiment(_))));
    }
}
