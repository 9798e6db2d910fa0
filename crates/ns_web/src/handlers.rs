use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
};
use chrono::{Duration, Utc};
use ns_core::KeywordHistory;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

use crate::AppState;

pub const DEFAULT_HISTORY_DAYS: u32 = 7;

#[derive(Deserialize)]
pub struct HistoryQuery {
    days: Option<u32>,
}

fn error_response(message: impl ToString) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message.to_string() })),
    )
        .into_response()
}

pub async fn scan(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.pipeline.run_scan().await {
        Ok(report) => Json(report).into_response(),
        Err(e) => {
            warn!(error = %e, "Scan failed");
            error_response(e)
        }
    }
}

pub async fn history(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistoryQuery>,
) -> impl IntoResponse {
    let days = params.days.unwrap_or(DEFAULT_HISTORY_DAYS);
    let since = Utc::now() - Duration::days(i64::from(days));

    match state.storage.query_history(since).await {
        Ok(rows) => {
            let history = KeywordHistory::from_rows(rows);
            Json(json!({
                "keywords": history.keywords(),
                "history": history,
                "days": days,
            }))
            .into_response()
        }
        Err(e) => {
            warn!(error = %e, "Failed to load history");
            error_response(e)
        }
    }
}

pub async fn history_summary(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.storage.query_history_summary().await {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => {
            warn!(error = %e, "Failed to load history summary");
            error_response(e)
        }
    }
}

pub async fn terms(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({ "search_terms": state.config().search_terms }))
}

pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let items: String = state
        .config()
        .search_terms
        .iter()
        .map(|term| format!("      <li>{}</li>\n", escape_html(term.as_str())))
        .collect();
    Html(INDEX_TEMPLATE.replace("{{terms}}", &items))
}

pub async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

const INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <title>Energy News Sentiment</title>
  </head>
  <body>
    <h1>Energy News Sentiment</h1>
    <p>Monitored terms:</p>
    <ul>
{{terms}}    </ul>
    <button id="scanBtn">Run Scan</button>
    <p id="status"></p>
    <pre id="summary"></pre>
    <script>
      document.getElementById('scanBtn').addEventListener('click', async () => {
        const status = document.getElementById('status');
        status.textContent = 'Scanning...';
        try {
          const response = await fetch('/api/scan');
          const data = await response.json();
          if (!response.ok) throw new Error(data.error);
          document.getElementById('summary').textContent = JSON.stringify(data.summary, null, 2);
          status.textContent = `${data.total_count} articles scanned at ${new Date(data.scan_time).toLocaleTimeString()}`;
        } catch (error) {
          status.textContent = 'Error scanning news. Please try again.';
        }
      });
    </script>
  </body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("S&P <500>"), "S&amp;P &lt;500&gt;");
        assert_eq!(escape_html("OPEC+"), "OPEC+");
    }
}
