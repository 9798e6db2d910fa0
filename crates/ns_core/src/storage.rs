use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crate::history::HistorySummary;
use crate::types::{AnalyzedArticle, ScanId, ScanRecord, ScanSummary, SummaryRow};
use crate::Result;

#[async_trait]
pub trait ScanStorage: Send + Sync {
    /// Store one scan's summaries and articles. Either every row becomes visible or none does.
    async fn save_scan(
        &self,
        scan: &ScanRecord,
        summaries: &[ScanSummary],
        articles: &[AnalyzedArticle],
    ) -> Result<()>;

    /// Summary rows with `scan_time >= since`, oldest first
    async fn query_history(&self, since: DateTime<Utc>) -> Result<Vec<SummaryRow>>;

    /// Per-keyword statistics across all stored scans
    async fn query_history_summary(&self) -> Result<HistorySummary>;

    /// Article rows of a single scan in the order they were saved
    async fn articles_for_scan(&self, scan_id: ScanId) -> Result<Vec<AnalyzedArticle>>;
}
