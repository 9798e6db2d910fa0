use async_trait::async_trait;
use ns_core::{FeedSource, RawEntry, Result, SearchTerm};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::parse_entries;

/// Google News RSS search, one query per search term.
#[derive(Debug, Clone)]
pub struct GoogleNewsSource {
    client: Client,
    base_url: String,
}

impl GoogleNewsSource {
    const BASE_URL: &'static str = "https://news.google.com/rss/search";
    const USER_AGENT: &'static str = "Mozilla/5.0 (compatible; NewsSentimentScanner/0.1)";

    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(Self::USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: Self::BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn search_url(&self, term: &SearchTerm) -> Result<Url> {
        let url = Url::parse_with_params(
            &self.base_url,
            &[
                ("q", term.as_str()),
                ("hl", "en-US"),
                ("gl", "US"),
                ("ceid", "US:en"),
            ],
        )?;
        Ok(url)
    }
}

#[async_trait]
impl FeedSource for GoogleNewsSource {
    fn name(&self) -> &str {
        "Google News"
    }

    async fn fetch_entries(&self, term: &SearchTerm, limit: usize) -> Result<Vec<RawEntry>> {
        let url = self.search_url(term)?;
        debug!("Fetching {}", url);

        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        parse_entries(&body, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ns_core::Error;

    #[test]
    fn test_search_url_encodes_term() {
        let source = GoogleNewsSource::new(Duration::from_secs(5)).unwrap();
        let url = source.search_url(&SearchTerm::new("Crude Oil Price")).unwrap();
        assert_eq!(
            url.as_str(),
            "https://news.google.com/rss/search?q=Crude+Oil+Price&hl=en-US&gl=US&ceid=US%3Aen"
        );

        let url = source.search_url(&SearchTerm::new("OPEC+")).unwrap();
        assert!(url.as_str().contains("q=OPEC%2B"));
    }

    #[test]
    fn test_invalid_base_url() {
        let source = GoogleNewsSource::new(Duration::from_secs(5))
            .unwrap()
            .with_base_url("not a url");
        assert!(matches!(
            source.search_url(&SearchTerm::new("Petrobras")),
            Err(Error::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_an_error() {
        let source = GoogleNewsSource::new(Duration::from_secs(2))
            .unwrap()
            .with_base_url("http://127.0.0.1:9/rss/search");
        let result = source.fetch_entries(&SearchTerm::new("Petrobras"), 10).await;
        assert!(result.is_err());
    }
}
