use ns_core::{round3, Result, SentimentLabel, SentimentScorer, SentimentScores};
use std::fmt;
use std::sync::Arc;

/// Turns a headline and its optional summary into one combined score and label.
#[derive(Clone)]
pub struct HeadlineAnalyzer {
    scorer: Arc<dyn SentimentScorer>,
}

impl fmt::Debug for HeadlineAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeadlineAnalyzer")
            .field("scorer", &self.scorer.name())
            .finish()
    }
}

impl HeadlineAnalyzer {
    pub fn new(scorer: Arc<dyn SentimentScorer>) -> Self {
        Self { scorer }
    }

    pub fn scorer_name(&self) -> &str {
        self.scorer.name()
    }

    pub async fn analyze(&self, title: &str, summary: Option<&str>) -> Result<SentimentScores> {
        let headline = round3(self.scorer.score(title).await?);

        let summary_score = match summary.map(str::trim).filter(|s| !s.is_empty()) {
            Some(text) => Some(round3(self.scorer.score(text).await?)),
            None => None,
        };

        // combined is derived from the reported (rounded) scores
        let combined = match summary_score {
            Some(s) => round3((headline + s) / 2.0),
            None => headline,
        };

        Ok(SentimentScores {
            headline,
            summary: summary_score,
            combined,
            label: SentimentLabel::from_score(combined),
        })
    }
}
