use ns_core::{Result, SentimentScorer};

/// Scores every text as 0. Useful offline and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeutralScorer;

#[async_trait::async_trait]
impl SentimentScorer for NeutralScorer {
    fn name(&self) -> &str {
        "neutral"
    }

    async fn score(&self, _text: &str) -> Result<f64> {
        Ok(0.0)
    }
}
