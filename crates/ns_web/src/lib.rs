use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod handlers;
pub mod state;

pub use state::AppState;

pub async fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/", get(handlers::index))
        .route("/favicon.ico", get(handlers::favicon))
        .route("/api/scan", get(handlers::scan))
        .route("/api/history", get(handlers::history))
        .route("/api/history/summary", get(handlers::history_summary))
        .route("/api/terms", get(handlers::terms))
        .layer(cors)
        .with_state(Arc::new(state))
}

/// Binds `addr` and serves the dashboard until the process exits.
pub async fn serve(state: AppState, addr: &str) -> ns_core::Result<()> {
    let app = create_app(state).await;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("🌐 Dashboard listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

pub mod prelude {
    pub use crate::{create_app, serve, AppState};
    pub use ns_core::{Error, Result};
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use chrono::{DateTime, Utc};
    use ns_core::{
        AnalyzedArticle, Error, FeedSource, HistorySummary, RawEntry, Result, ScanConfig, ScanId,
        ScanRecord, ScanStorage, ScanSummary, SearchTerm, SummaryRow,
    };
    use ns_feeds::{ScanManager, ScanPipeline};
    use ns_sentiment::{create_scorer, HeadlineAnalyzer, KeywordExtractor};
    use ns_storage::InMemoryStorage;
    use serde_json::Value;
    use tower::ServiceExt;

    struct StaticSource;

    #[async_trait]
    impl FeedSource for StaticSource {
        fn name(&self) -> &str {
            "static"
        }

        async fn fetch_entries(&self, term: &SearchTerm, _limit: usize) -> Result<Vec<RawEntry>> {
            if term.as_str() == "Broken" {
                return Err(Error::Feed("feed unavailable".to_string()));
            }
            Ok(vec![
                RawEntry::new(format!("{} output climbs", term), "https://example.com/1")
                    .with_source("Reuters"),
                RawEntry::new(format!("{} output steady", term), "https://example.com/2"),
            ])
        }
    }

    struct BrokenStorage;

    #[async_trait]
    impl ScanStorage for BrokenStorage {
        async fn save_scan(&self, _: &ScanRecord, _: &[ScanSummary], _: &[AnalyzedArticle]) -> Result<()> {
            Err(Error::Database("database is locked".to_string()))
        }

        async fn query_history(&self, _: DateTime<Utc>) -> Result<Vec<SummaryRow>> {
            Err(Error::Database("database is locked".to_string()))
        }

        async fn query_history_summary(&self) -> Result<HistorySummary> {
            Err(Error::Database("database is locked".to_string()))
        }

        async fn articles_for_scan(&self, _: ScanId) -> Result<Vec<AnalyzedArticle>> {
            Ok(Vec::new())
        }
    }

    fn state(terms: &[&str], storage: Arc<dyn ScanStorage>) -> AppState {
        let config = ScanConfig::default().with_terms(terms.iter().map(|t| SearchTerm::new(*t)).collect());
        let analyzer = HeadlineAnalyzer::new(create_scorer("neutral").unwrap());
        let manager = ScanManager::new(Arc::new(StaticSource), analyzer, Arc::new(config));
        let pipeline = ScanPipeline::new(manager, KeywordExtractor::default(), storage);
        AppState::new(Arc::new(pipeline))
    }

    async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
        let (status, body) = get(app, uri).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_scan_then_history() {
        let app = create_app(state(&["OPEC+", "Broken", "Petrobras"], Arc::new(InMemoryStorage::new()))).await;

        let (status, scan) = get_json(&app, "/api/scan").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(scan["total_count"], 4);
        assert_eq!(scan["news"].as_array().unwrap().len(), 4);
        assert_eq!(scan["news"][0]["keyword"], "OPEC+");
        assert_eq!(scan["news"][0]["source"], "Reuters");
        assert_eq!(scan["news"][0]["sentiment_label"], "Neutral");
        assert_eq!(scan["summary"].as_array().unwrap().len(), 2);
        assert_eq!(scan["word_cloud"][0]["word"], "output");
        assert_eq!(scan["word_cloud"][0]["count"], 4);
        assert!(scan["scan_id"].is_string());
        assert!(scan["scan_time"].is_string());

        let (status, history) = get_json(&app, "/api/history?days=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(history["days"], 1);
        assert_eq!(history["keywords"], serde_json::json!(["OPEC+", "Petrobras"]));
        assert_eq!(history["history"]["OPEC+"][0]["article_count"], 2);
        assert_eq!(history["history"]["OPEC+"][0]["scan_time"], scan["scan_time"]);

        let (status, summary) = get_json(&app, "/api/history/summary").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(summary["total_scans"], 1);
        assert_eq!(summary["summary"][0]["keyword"], "OPEC+");
        assert_eq!(summary["summary"][0]["scan_count"], 1);
    }

    #[tokio::test]
    async fn test_sqlite_history_reports_scan_time_of_the_scan() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = ns_storage::SQLiteStorage::new_with_path(temp_dir.path().join("web.db"))
            .await
            .unwrap();
        let app = create_app(state(&["OPEC+"], Arc::new(storage))).await;

        let (status, scan) = get_json(&app, "/api/scan").await;
        assert_eq!(status, StatusCode::OK);
        let (_, history) = get_json(&app, "/api/history").await;
        assert_eq!(history["history"]["OPEC+"][0]["scan_time"], scan["scan_time"]);

        let (_, summary) = get_json(&app, "/api/history/summary").await;
        assert_eq!(summary["summary"][0]["first_scan"], scan["scan_time"]);
    }

    #[tokio::test]
    async fn test_history_defaults_to_a_week() {
        let app = create_app(state(&["OPEC+"], Arc::new(InMemoryStorage::new()))).await;
        let (status, history) = get_json(&app, "/api/history").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(history["days"], 7);
        assert_eq!(history["keywords"], serde_json::json!([]));

        let (status, _) = get(&app, "/api/history?days=-3").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_persistence_failure_is_500() {
        let app = create_app(state(&["OPEC+"], Arc::new(BrokenStorage))).await;

        let (status, body) = get_json(&app, "/api/scan").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("database is locked"));

        let (status, _) = get_json(&app, "/api/history/summary").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_terms_index_and_favicon() {
        let app = create_app(state(&["OPEC+", "S&P Energy"], Arc::new(InMemoryStorage::new()))).await;

        let (status, terms) = get_json(&app, "/api/terms").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(terms["search_terms"], serde_json::json!(["OPEC+", "S&P Energy"]));

        let (status, page) = get(&app, "/").await;
        assert_eq!(status, StatusCode::OK);
        let page = String::from_utf8(page).unwrap();
        assert!(page.contains("<li>OPEC+</li>"));
        assert!(page.contains("<li>S&amp;P Energy</li>"));

        let (status, body) = get(&app, "/favicon.ico").await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_empty());
    }
}
