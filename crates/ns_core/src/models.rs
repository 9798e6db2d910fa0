use async_trait::async_trait;
use std::fmt;
use crate::Result;

#[async_trait]
pub trait SentimentScorer: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Polarity of `text` in [-1, 1]; negative is unfavorable.
    async fn score(&self, text: &str) -> Result<f64>;
}
