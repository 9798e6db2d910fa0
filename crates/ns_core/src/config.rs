use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;
use crate::types::SearchTerm;
use crate::{Error, Result};

pub const DEFAULT_SEARCH_TERMS: &[&str] = &[
    "Crude Oil Price",
    "OPEC+",
    "Offshore Wind Energy",
    "Carbon Capture",
    "Geopolitics Energy Middle East",
    "Petrobras",
];

/// Process-wide scan settings, built once at startup and shared read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub search_terms: Vec<SearchTerm>,
    pub entries_per_term: usize,
    pub fetch_timeout_secs: u64,
    pub max_concurrent_fetches: usize,
    pub keyword_limit: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            search_terms: DEFAULT_SEARCH_TERMS.iter().map(|t| SearchTerm::new(*t)).collect(),
            entries_per_term: 10,
            fetch_timeout_secs: 15,
            max_concurrent_fetches: 4,
            keyword_limit: 50,
        }
    }
}

impl ScanConfig {
    /// Loads a JSON config file. Missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        debug!("Loaded scan config from {}", path.display());
        config.validate()?;
        Ok(config)
    }

    pub fn with_terms(mut self, terms: Vec<SearchTerm>) -> Self {
        self.search_terms = terms;
        self
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.search_terms.is_empty() {
            return Err(Error::Config("at least one search term is required".to_string()));
        }
        if self.search_terms.iter().any(|t| t.as_str().trim().is_empty()) {
            return Err(Error::Config("search terms must not be blank".to_string()));
        }
        if self.entries_per_term == 0 {
            return Err(Error::Config("entries_per_term must be positive".to_string()));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(Error::Config("fetch_timeout_secs must be positive".to_string()));
        }
        if self.max_concurrent_fetches == 0 {
            return Err(Error::Config("max_concurrent_fetches must be positive".to_string()));
        }
        if self.keyword_limit == 0 {
            return Err(Error::Config("keyword_limit must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ScanConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.search_terms.len(), 6);
        assert_eq!(config.search_terms[0].as_str(), "Crude Oil Price");
        assert_eq!(config.entries_per_term, 10);
        assert_eq!(config.keyword_limit, 50);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ScanConfig =
            serde_json::from_str(r#"{"search_terms": ["Lithium"], "fetch_timeout_secs": 5}"#).unwrap();
        assert_eq!(config.search_terms, vec![SearchTerm::new("Lithium")]);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(5));
        assert_eq!(config.entries_per_term, 10);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(ScanConfig::default().with_terms(vec![]).validate().is_err());
        assert!(ScanConfig::default().with_terms(vec![SearchTerm::new("  ")]).validate().is_err());

        let config = ScanConfig {
            entries_per_term: 0,
            ..ScanConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}
