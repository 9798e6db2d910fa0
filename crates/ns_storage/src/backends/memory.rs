use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ns_core::{
    round3, AnalyzedArticle, HistorySummary, KeywordTrend, Result, ScanId, ScanRecord, ScanStorage,
    ScanSummary, SummaryRow,
};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use crate::StorageBackend;

#[derive(Debug, Default)]
struct MemoryStore {
    scans: Vec<ScanRecord>,
    summaries: Vec<SummaryRow>,
    articles: Vec<(ScanId, AnalyzedArticle)>,
}

impl MemoryStore {
    fn history_summary(&self) -> HistorySummary {
        struct Acc {
            scans: HashSet<ScanId>,
            total: f64,
            rows: usize,
            first: DateTime<Utc>,
            last: DateTime<Utc>,
        }

        let mut per_keyword: BTreeMap<&str, Acc> = BTreeMap::new();
        for row in &self.summaries {
            let acc = per_keyword.entry(row.keyword.as_str()).or_insert_with(|| Acc {
                scans: HashSet::new(),
                total: 0.0,
                rows: 0,
                first: row.scan_time,
                last: row.scan_time,
            });
            acc.scans.insert(row.scan_id);
            acc.total += row.avg_sentiment;
            acc.rows += 1;
            acc.first = acc.first.min(row.scan_time);
            acc.last = acc.last.max(row.scan_time);
        }

        let total_scans = self
            .summaries
            .iter()
            .map(|row| row.scan_id)
            .collect::<HashSet<_>>()
            .len();

        HistorySummary {
            summary: per_keyword
                .into_iter()
                .map(|(keyword, acc)| KeywordTrend {
                    keyword: keyword.to_string(),
                    scan_count: acc.scans.len(),
                    overall_avg: round3(acc.total / acc.rows as f64),
                    first_scan: acc.first,
                    last_scan: acc.last,
                })
                .collect(),
            total_scans,
        }
    }
}

/// Process-local storage. Contents are lost on exit.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    store: Arc<RwLock<MemoryStore>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn scan_count(&self) -> usize {
        self.store.read().await.scans.len()
    }
}

#[async_trait]
impl StorageBackend for InMemoryStorage {
    fn get_error_message() -> &'static str {
        "Memory storage should be available"
    }

    async fn new() -> Result<Self> where Self: Sized {
        Ok(InMemoryStorage::new())
    }
}

#[async_trait]
impl ScanStorage for InMemoryStorage {
    async fn save_scan(
        &self,
        scan: &ScanRecord,
        summaries: &[ScanSummary],
        articles: &[AnalyzedArticle],
    ) -> Result<()> {
        // one write guard for the whole scan, so readers never see part of it
        let mut store = self.store.write().await;
        store.scans.push(*scan);
        store.summaries.extend(summaries.iter().map(|s| SummaryRow {
            scan_id: scan.id,
            scan_time: scan.scan_time,
            keyword: s.keyword.clone(),
            avg_sentiment: s.avg_sentiment,
            article_count: s.article_count,
        }));
        store
            .articles
            .extend(articles.iter().map(|a| (scan.id, a.clone())));
        Ok(())
    }

    async fn query_history(&self, since: DateTime<Utc>) -> Result<Vec<SummaryRow>> {
        let store = self.store.read().await;
        let mut rows: Vec<SummaryRow> = store
            .summaries
            .iter()
            .filter(|row| row.scan_time >= since)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.scan_time.cmp(&b.scan_time).then_with(|| a.keyword.cmp(&b.keyword)));
        Ok(rows)
    }

    async fn query_history_summary(&self) -> Result<HistorySummary> {
        Ok(self.store.read().await.history_summary())
    }

    async fn articles_for_scan(&self, scan_id: ScanId) -> Result<Vec<AnalyzedArticle>> {
        let store = self.store.read().await;
        Ok(store
            .articles
            .iter()
            .filter(|(id, _)| *id == scan_id)
            .map(|(_, article)| article.clone())
            .collect())
    }
}
