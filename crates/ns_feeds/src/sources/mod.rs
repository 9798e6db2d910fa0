use ns_core::{Error, RawEntry, Result, UNKNOWN_SOURCE};
use regex::Regex;
use std::sync::LazyLock;

pub mod google_news;

pub use google_news::GoogleNewsSource;

static TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));
static SPACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("space pattern is valid"));

/// Removes markup and entity padding from a feed description and collapses whitespace.
pub fn strip_markup(text: &str) -> String {
    let without_tags = TAG_REGEX.replace_all(text, " ");
    let decoded = without_tags.replace("&nbsp;", " ").replace("\u{a0}", " ");
    SPACE_REGEX.replace_all(decoded.trim(), " ").to_string()
}

/// Publisher suffix of aggregator titles such as "Oil climbs - Reuters".
pub fn publisher_from_title(title: &str) -> Option<&str> {
    title
        .rsplit_once(" - ")
        .map(|(_, publisher)| publisher.trim())
        .filter(|p| !p.is_empty())
}

/// Text of each RSS item's `<source>` element, in document order. Empty for Atom.
fn item_sources(content: &[u8]) -> Vec<Option<String>> {
    match rss::Channel::read_from(content) {
        Ok(channel) => channel
            .items()
            .iter()
            .map(|item| {
                item.source()
                    .and_then(|s| s.title())
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
            })
            .collect(),
        Err(_) => Vec::new(),
    }
}

/// Parses an RSS or Atom document into at most `limit` entries.
///
/// An item's `<source>` names the publisher; without one the title suffix does.
/// Any of the first `limit` entries lacking a title or link fails the whole feed.
pub fn parse_entries(content: &[u8], limit: usize) -> Result<Vec<RawEntry>> {
    let feed = feed_rs::parser::parse(content)
        .map_err(|e| Error::Feed(format!("Failed to parse feed: {}", e)))?;
    let mut sources = item_sources(content);

    feed.entries
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, entry)| {
            let title = entry
                .title
                .map(|t| t.content.trim().to_string())
                .filter(|t| !t.is_empty())
                .ok_or_else(|| Error::Feed(format!("Entry {} has no title", i)))?;
            let link = entry
                .links
                .first()
                .map(|l| l.href.clone())
                .ok_or_else(|| Error::Feed(format!("Entry {} has no link", i)))?;
            let summary = entry
                .summary
                .map(|s| strip_markup(&s.content))
                .filter(|s| !s.is_empty());
            let source = sources
                .get_mut(i)
                .and_then(Option::take)
                .or_else(|| publisher_from_title(&title).map(str::to_string))
                .unwrap_or_else(|| UNKNOWN_SOURCE.to_string());
            let published = entry
                .published
                .or(entry.updated)
                .map(|d| d.to_rfc2822())
                .unwrap_or_default();

            Ok(RawEntry {
                title,
                summary,
                source,
                published,
                link,
            })
        })
        .collect()
}
