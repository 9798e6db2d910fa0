use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Source name used when a feed entry does not carry one.
pub const UNKNOWN_SOURCE: &str = "Unknown";

/// Combined scores strictly above this are positive, strictly below its negation negative.
pub const LABEL_THRESHOLD: f64 = 0.1;

/// A monitored topic, sent verbatim to the feed source as a search query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchTerm(String);

impl SearchTerm {
    pub fn new(term: impl Into<String>) -> Self {
        Self(term.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SearchTerm {
    fn from(term: &str) -> Self {
        Self::new(term)
    }
}

/// One entry as returned by a feed source, before any scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEntry {
    pub title: String,
    pub summary: Option<String>,
    pub source: String,
    pub published: String,
    pub link: String,
}

impl RawEntry {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            summary: None,
            source: UNKNOWN_SOURCE.to_string(),
            published: String::new(),
            link: link.into(),
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_published(mut self, published: impl Into<String>) -> Self {
        self.published = published.into();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn from_score(score: f64) -> Self {
        if score > LABEL_THRESHOLD {
            Self::Positive
        } else if score < -LABEL_THRESHOLD {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
            Self::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SentimentLabel {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "Positive" => Ok(Self::Positive),
            "Negative" => Ok(Self::Negative),
            "Neutral" => Ok(Self::Neutral),
            other => Err(crate::Error::Storage(format!("Unknown sentiment label: {}", other))),
        }
    }
}

/// Scores produced by the headline analyzer for one entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentScores {
    pub headline: f64,
    pub summary: Option<f64>,
    pub combined: f64,
    pub label: SentimentLabel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedArticle {
    pub keyword: String,
    pub title: String,
    pub summary: Option<String>,
    pub source: String,
    pub published: String,
    pub link: String,
    pub headline_sentiment: f64,
    pub summary_sentiment: Option<f64>,
    #[serde(rename = "sentiment_score")]
    pub combined_sentiment: f64,
    pub sentiment_label: SentimentLabel,
}

impl AnalyzedArticle {
    pub fn from_entry(term: &SearchTerm, entry: RawEntry, scores: SentimentScores) -> Self {
        Self {
            keyword: term.as_str().to_string(),
            title: entry.title,
            summary: entry.summary,
            source: entry.source,
            published: entry.published,
            link: entry.link,
            headline_sentiment: scores.headline,
            summary_sentiment: scores.summary,
            combined_sentiment: scores.combined,
            sentiment_label: scores.label,
        }
    }
}

/// Per-keyword aggregate for one scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub keyword: String,
    pub avg_sentiment: f64,
    pub article_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub word: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScanId(pub Uuid);

impl ScanId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ScanId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ScanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::str::FromStr for ScanId {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| crate::Error::Storage(format!("Invalid scan id {}: {}", s, e)))
    }
}

/// Identity of one scan cycle. Every persisted row of the scan references it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRecord {
    pub id: ScanId,
    pub scan_time: DateTime<Utc>,
}

impl ScanRecord {
    /// `scan_time` is truncated to microseconds, the precision every backend stores.
    pub fn new(scan_time: DateTime<Utc>) -> Self {
        Self {
            id: ScanId::new(),
            scan_time: scan_time.trunc_subsecs(6),
        }
    }

    pub fn now() -> Self {
        Self::new(Utc::now())
    }
}

/// A persisted `scan_results` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub scan_id: ScanId,
    pub scan_time: DateTime<Utc>,
    pub keyword: String,
    pub avg_sentiment: f64,
    pub article_count: usize,
}

/// Everything one scan cycle produced.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub scan_id: ScanId,
    pub scan_time: DateTime<Utc>,
    pub news: Vec<AnalyzedArticle>,
    pub summary: Vec<ScanSummary>,
    pub word_cloud: Vec<KeywordEntry>,
    pub total_count: usize,
}
