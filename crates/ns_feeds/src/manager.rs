use futures::future::join_all;
use ns_core::{AnalyzedArticle, Error, FeedSource, Result, ScanConfig, SearchTerm};
use ns_sentiment::HeadlineAnalyzer;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::time::timeout;

use crate::logging::Logger;

/// Drives one pass of fetch-and-analyze over every configured term.
pub struct ScanManager {
    source: Arc<dyn FeedSource>,
    analyzer: HeadlineAnalyzer,
    config: Arc<ScanConfig>,
    semaphore: Arc<Semaphore>,
}

impl ScanManager {
    pub fn new(source: Arc<dyn FeedSource>, analyzer: HeadlineAnalyzer, config: Arc<ScanConfig>) -> Self {
        let semaphore = Arc::new(Semaphore::new(config.max_concurrent_fetches.max(1)));
        Self {
            source,
            analyzer,
            config,
            semaphore,
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Articles of every term that succeeded, in term order then feed order.
    ///
    /// A term that fails for any reason is logged and contributes nothing.
    pub async fn collect(&self) -> Vec<AnalyzedArticle> {
        let futures = self.config.search_terms.iter().map(|term| async move {
            let logger = Logger::new().with_prefix(term.as_str());
            match self.scan_term(term).await {
                Ok(articles) => {
                    logger.info(&format!("📰 {} articles", articles.len()));
                    articles
                }
                Err(e) => {
                    logger.error(&format!("Skipping term: {}", e));
                    Vec::new()
                }
            }
        });

        join_all(futures).await.into_iter().flatten().collect()
    }

    /// Fetches and analyzes one term. Nothing is returned unless every entry succeeds.
    pub async fn scan_term(&self, term: &SearchTerm) -> Result<Vec<AnalyzedArticle>> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| Error::External(e.into()))?;

        let fetch_timeout = self.config.fetch_timeout();
        let entries = timeout(
            fetch_timeout,
            self.source.fetch_entries(term, self.config.entries_per_term),
        )
        .await
        .map_err(|_| {
            Error::Timeout(format!(
                "{} did not answer within {}s",
                self.source.name(),
                fetch_timeout.as_secs()
            ))
        })??;

        let mut articles = Vec::with_capacity(entries.len());
        for entry in entries.into_iter().take(self.config.entries_per_term) {
            if entry.title.trim().is_empty() {
                return Err(Error::Feed(format!("Entry without title: {}", entry.link)));
            }
            let scores = self
                .analyzer
                .analyze(&entry.title, entry.summary.as_deref())
                .await?;
            articles.push(AnalyzedArticle::from_entry(term, entry, scores));
        }
        Ok(articles)
    }
}
