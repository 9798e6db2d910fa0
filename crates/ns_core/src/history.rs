use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use crate::types::SummaryRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub scan_time: DateTime<Utc>,
    pub avg_sentiment: f64,
    pub article_count: usize,
}

/// Summary rows grouped by keyword, each series in scan order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct KeywordHistory(BTreeMap<String, Vec<HistoryPoint>>);

impl KeywordHistory {
    /// Groups rows by keyword. Rows are expected oldest first; that order is kept within a keyword.
    pub fn from_rows(rows: Vec<SummaryRow>) -> Self {
        let mut grouped: BTreeMap<String, Vec<HistoryPoint>> = BTreeMap::new();
        for row in rows {
            grouped.entry(row.keyword).or_default().push(HistoryPoint {
                scan_time: row.scan_time,
                avg_sentiment: row.avg_sentiment,
                article_count: row.article_count,
            });
        }
        Self(grouped)
    }

    pub fn keywords(&self) -> Vec<String> {
        self.0.keys().cloned().collect()
    }

    pub fn get(&self, keyword: &str) -> Option<&[HistoryPoint]> {
        self.0.get(keyword).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordTrend {
    pub keyword: String,
    pub scan_count: usize,
    pub overall_avg: f64,
    pub first_scan: DateTime<Utc>,
    pub last_scan: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub summary: Vec<KeywordTrend>,
    pub total_scans: usize,
}
