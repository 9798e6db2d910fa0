use async_trait::async_trait;
use crate::types::{RawEntry, SearchTerm};
use crate::Result;

#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Returns the name of the feed provider
    fn name(&self) -> &str;

    /// Fetches at most `limit` entries matching `term`, in feed order
    async fn fetch_entries(&self, term: &SearchTerm, limit: usize) -> Result<Vec<RawEntry>>;
}
