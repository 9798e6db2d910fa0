use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use ns_core::{
    round3, AnalyzedArticle, Error, HistorySummary, KeywordTrend, Result, ScanId, ScanRecord,
    ScanStorage, ScanSummary, SummaryRow,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use crate::StorageBackend;

pub const DEFAULT_DB_PATH: &str = "news_sentiment.db";

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS scans (
        id TEXT PRIMARY KEY,
        scan_time TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS scan_results (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        scan_id TEXT NOT NULL REFERENCES scans(id),
        scan_time TEXT NOT NULL,
        keyword TEXT NOT NULL,
        avg_sentiment REAL NOT NULL,
        article_count INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS news_articles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        scan_id TEXT NOT NULL REFERENCES scans(id),
        scan_time TEXT NOT NULL,
        keyword TEXT NOT NULL,
        title TEXT NOT NULL,
        summary TEXT,
        source TEXT NOT NULL,
        published TEXT NOT NULL,
        headline_sentiment REAL NOT NULL,
        summary_sentiment REAL,
        sentiment_score REAL NOT NULL,
        sentiment_label TEXT NOT NULL,
        link TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_scan_results_time ON scan_results (scan_time)",
    "CREATE INDEX IF NOT EXISTS idx_news_articles_scan ON news_articles (scan_id)",
    // Add future migrations here
];

/// Fixed-width UTC text, so comparing stored strings orders them by time.
fn encode_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_time(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| Error::Storage(format!("Failed to parse timestamp {}: {}", raw, e)))
}

fn db_error(context: &str) -> impl Fn(sqlx::Error) -> Error + '_ {
    move |e| Error::Database(format!("{}: {}", context, e))
}

pub struct SQLiteStorage {
    pool: Arc<SqlitePool>,
    db_path: PathBuf,
}

#[async_trait]
impl StorageBackend for SQLiteStorage {
    fn get_error_message() -> &'static str {
        "SQLite database should be writable at ./news_sentiment.db"
    }

    async fn new() -> Result<Self> {
        Self::new_with_path(DEFAULT_DB_PATH).await
    }
}

impl SQLiteStorage {
    pub async fn new_with_path(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(db_error("Failed to connect to database"))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::Database(format!("Failed to run migration {}: {}", i, e)))?;
        }
        debug!("SQLite storage ready at {}", db_path.display());

        Ok(Self {
            pool: Arc::new(pool),
            db_path,
        })
    }

    pub fn get_db_path(&self) -> &PathBuf {
        &self.db_path
    }

    fn article_from_row(row: &SqliteRow) -> Result<AnalyzedArticle> {
        let label: String = row.get("sentiment_label");
        Ok(AnalyzedArticle {
            keyword: row.get("keyword"),
            title: row.get("title"),
            summary: row.get::<Option<String>, _>("summary"),
            source: row.get("source"),
            published: row.get("published"),
            link: row.get("link"),
            headline_sentiment: row.get("headline_sentiment"),
            summary_sentiment: row.get::<Option<f64>, _>("summary_sentiment"),
            combined_sentiment: row.get("sentiment_score"),
            sentiment_label: label.parse()?,
        })
    }
}

#[async_trait]
impl ScanStorage for SQLiteStorage {
    async fn save_scan(
        &self,
        scan: &ScanRecord,
        summaries: &[ScanSummary],
        articles: &[AnalyzedArticle],
    ) -> Result<()> {
        let scan_id = scan.id.to_string();
        let scan_time = encode_time(&scan.scan_time);
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to start transaction"))?;

        sqlx::query("INSERT INTO scans (id, scan_time) VALUES (?, ?)")
            .bind(&scan_id)
            .bind(&scan_time)
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to store scan"))?;

        for summary in summaries {
            sqlx::query(
                r#"
                INSERT INTO scan_results (scan_id, scan_time, keyword, avg_sentiment, article_count)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(&scan_id)
            .bind(&scan_time)
            .bind(&summary.keyword)
            .bind(summary.avg_sentiment)
            .bind(summary.article_count as i64)
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to store scan summary"))?;
        }

        for article in articles {
            sqlx::query(
                r#"
                INSERT INTO news_articles
                (scan_id, scan_time, keyword, title, summary, source, published,
                 headline_sentiment, summary_sentiment, sentiment_score, sentiment_label, link)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&scan_id)
            .bind(&scan_time)
            .bind(&article.keyword)
            .bind(&article.title)
            .bind(article.summary.as_deref())
            .bind(&article.source)
            .bind(&article.published)
            .bind(article.headline_sentiment)
            .bind(article.summary_sentiment)
            .bind(article.combined_sentiment)
            .bind(article.sentiment_label.as_str())
            .bind(&article.link)
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to store article"))?;
        }

        tx.commit().await.map_err(db_error("Failed to commit scan"))?;
        debug!(
            "Stored scan {} with {} summaries and {} articles",
            scan.id,
            summaries.len(),
            articles.len()
        );
        Ok(())
    }

    async fn query_history(&self, since: DateTime<Utc>) -> Result<Vec<SummaryRow>> {
        let rows = sqlx::query(
            r#"
            SELECT scan_id, scan_time, keyword, avg_sentiment, article_count
            FROM scan_results
            WHERE scan_time >= ?
            ORDER BY scan_time ASC, keyword ASC
            "#,
        )
        .bind(encode_time(&since))
        .fetch_all(&*self.pool)
        .await
        .map_err(db_error("Failed to query history"))?;

        rows.iter()
            .map(|row| {
                Ok(SummaryRow {
                    scan_id: row.get::<String, _>("scan_id").parse()?,
                    scan_time: decode_time(&row.get::<String, _>("scan_time"))?,
                    keyword: row.get("keyword"),
                    avg_sentiment: row.get("avg_sentiment"),
                    article_count: row.get::<i64, _>("article_count") as usize,
                })
            })
            .collect()
    }

    async fn query_history_summary(&self) -> Result<HistorySummary> {
        let rows = sqlx::query(
            r#"
            SELECT keyword,
                   COUNT(DISTINCT scan_id) AS scan_count,
                   AVG(avg_sentiment) AS overall_avg,
                   MIN(scan_time) AS first_scan,
                   MAX(scan_time) AS last_scan
            FROM scan_results
            GROUP BY keyword
            ORDER BY keyword ASC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(db_error("Failed to summarize history"))?;

        let mut summary = Vec::with_capacity(rows.len());
        for row in rows {
            summary.push(KeywordTrend {
                keyword: row.get("keyword"),
                scan_count: row.get::<i64, _>("scan_count") as usize,
                overall_avg: round3(row.get::<f64, _>("overall_avg")),
                first_scan: decode_time(&row.get::<String, _>("first_scan"))?,
                last_scan: decode_time(&row.get::<String, _>("last_scan"))?,
            });
        }

        let total_scans: i64 = sqlx::query_scalar("SELECT COUNT(DISTINCT scan_id) FROM scan_results")
            .fetch_one(&*self.pool)
            .await
            .map_err(db_error("Failed to count scans"))?;

        Ok(HistorySummary {
            summary,
            total_scans: total_scans as usize,
        })
    }

    async fn articles_for_scan(&self, scan_id: ScanId) -> Result<Vec<AnalyzedArticle>> {
        let rows = sqlx::query("SELECT * FROM news_articles WHERE scan_id = ? ORDER BY id ASC")
            .bind(scan_id.to_string())
            .fetch_all(&*self.pool)
            .await
            .map_err(db_error("Failed to load articles"))?;

        rows.iter().map(Self::article_from_row).collect()
    }
}
