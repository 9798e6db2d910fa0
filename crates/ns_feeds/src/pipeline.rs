use ns_core::{Result, ScanConfig, ScanRecord, ScanReport, ScanStorage};
use ns_sentiment::KeywordExtractor;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::aggregate::summarize;
use crate::manager::ScanManager;

/// One full scan cycle: collect, aggregate, extract keywords, persist.
pub struct ScanPipeline {
    manager: ScanManager,
    extractor: KeywordExtractor,
    storage: Arc<dyn ScanStorage>,
    // held for the whole cycle so overlapping requests run one after another
    running: Mutex<()>,
}

impl ScanPipeline {
    pub fn new(manager: ScanManager, extractor: KeywordExtractor, storage: Arc<dyn ScanStorage>) -> Self {
        Self {
            manager,
            extractor,
            storage,
            running: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &ScanConfig {
        self.manager.config()
    }

    pub fn storage(&self) -> Arc<dyn ScanStorage> {
        Arc::clone(&self.storage)
    }

    pub async fn run_scan(&self) -> Result<ScanReport> {
        let _guard = self.running.lock().await;
        info!(
            "🔎 Scanning {} terms via {}",
            self.config().search_terms.len(),
            self.manager.source_name()
        );

        let news = self.manager.collect().await;
        let summary = summarize(&news);
        let titles: Vec<String> = news.iter().map(|a| a.title.clone()).collect();
        let word_cloud = self.extractor.extract(&titles);

        let scan = ScanRecord::now();
        if let Err(e) = self.storage.save_scan(&scan, &summary, &news).await {
            error!("Failed to persist scan {}: {}", scan.id, e);
            return Err(e);
        }
        info!("✅ Scan {} stored: {} articles, {} terms", scan.id, news.len(), summary.len());

        Ok(ScanReport {
            scan_id: scan.id,
            scan_time: scan.scan_time,
            total_count: news.len(),
            news,
            summary,
            word_cloud,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::tests::{entry, KeywordScorer, StubSource};
    use async_trait::async_trait;
    use chrono::{DateTime, Duration, Utc};
    use ns_core::{
        AnalyzedArticle, Error, HistorySummary, ScanId, ScanSummary, SearchTerm, SummaryRow,
    };
    use ns_sentiment::HeadlineAnalyzer;
    use ns_storage::InMemoryStorage;

    fn pipeline(source: StubSource, terms: &[&str], storage: Arc<dyn ScanStorage>) -> ScanPipeline {
        let config = ScanConfig::default().with_terms(terms.iter().map(|t| SearchTerm::new(*t)).collect());
        let manager = ScanManager::new(
            Arc::new(source),
            HeadlineAnalyzer::new(Arc::new(KeywordScorer)),
            Arc::new(config),
        );
        ScanPipeline::new(manager, KeywordExtractor::default(), storage)
    }

    struct BrokenStorage;

    #[async_trait]
    impl ScanStorage for BrokenStorage {
        async fn save_scan(&self, _: &ScanRecord, _: &[ScanSummary], _: &[AnalyzedArticle]) -> Result<()> {
            Err(Error::Database("disk full".to_string()))
        }

        async fn query_history(&self, _: DateTime<Utc>) -> Result<Vec<SummaryRow>> {
            Ok(Vec::new())
        }

        async fn query_history_summary(&self) -> Result<HistorySummary> {
            Ok(HistorySummary::default())
        }

        async fn articles_for_scan(&self, _: ScanId) -> Result<Vec<AnalyzedArticle>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_run_scan_reports_and_persists() {
        let storage = Arc::new(InMemoryStorage::new());
        let source = StubSource::new(&[
            ("OPEC+", vec![entry("OPEC+ good output"), entry("OPEC+ bad output")]),
            ("Petrobras", vec![entry("Petrobras good output")]),
        ]);
        let pipeline = pipeline(source, &["OPEC+", "Petrobras"], storage.clone());

        let report = pipeline.run_scan().await.unwrap();
        assert_eq!(report.total_count, 3);
        assert_eq!(report.news.len(), 3);
        assert_eq!(report.summary.len(), 2);
        assert_eq!(report.summary[0].keyword, "OPEC+");
        assert_eq!(report.summary[0].avg_sentiment, 0.0);
        assert_eq!(report.summary[0].article_count, 2);
        assert_eq!(report.summary[1].avg_sentiment, 0.5);
        assert_eq!(report.word_cloud[0].word, "output");
        assert_eq!(report.word_cloud[0].count, 3);

        let rows = storage.query_history(report.scan_time).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.scan_id == report.scan_id));
        let stored = storage.articles_for_scan(report.scan_id).await.unwrap();
        assert_eq!(stored, report.news);
    }

    #[tokio::test]
    async fn test_empty_scan_still_records_a_scan() {
        let storage = Arc::new(InMemoryStorage::new());
        let pipeline = pipeline(StubSource::new(&[]), &["OPEC+"], storage.clone());

        let report = pipeline.run_scan().await.unwrap();
        assert_eq!(report.total_count, 0);
        assert!(report.summary.is_empty());
        assert!(report.word_cloud.is_empty());
        assert_eq!(storage.scan_count().await, 1);
        assert_eq!(storage.query_history_summary().await.unwrap().total_scans, 0);
    }

    #[tokio::test]
    async fn test_persistence_failure_fails_scan() {
        let source = StubSource::new(&[("OPEC+", vec![entry("good")])]);
        let pipeline = pipeline(source, &["OPEC+"], Arc::new(BrokenStorage));
        let result = pipeline.run_scan().await;
        assert!(matches!(result, Err(Error::Database(_))));
    }

    #[tokio::test]
    async fn test_overlapping_scans_get_distinct_ids() {
        let storage = Arc::new(InMemoryStorage::new());
        let source = StubSource::new(&[("OPEC+", vec![entry("good")])]);
        let pipeline = Arc::new(pipeline(source, &["OPEC+"], storage.clone()));

        let (a, b) = tokio::join!(pipeline.run_scan(), pipeline.run_scan());
        let (a, b) = (a.unwrap(), b.unwrap());
        assert_ne!(a.scan_id, b.scan_id);

        let rows = storage.query_history(Utc::now() - Duration::minutes(1)).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(storage.articles_for_scan(a.scan_id).await.unwrap().len(), 1);
        assert_eq!(storage.articles_for_scan(b.scan_id).await.unwrap().len(), 1);
    }
}
