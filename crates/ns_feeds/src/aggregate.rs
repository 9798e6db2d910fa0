use ns_core::{round3, AnalyzedArticle, ScanSummary};
use std::collections::BTreeMap;

/// One summary per keyword present in `articles`, sorted by keyword.
pub fn summarize(articles: &[AnalyzedArticle]) -> Vec<ScanSummary> {
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for article in articles {
        let entry = groups.entry(article.keyword.as_str()).or_insert((0.0, 0));
        entry.0 += article.combined_sentiment;
        entry.1 += 1;
    }

    groups
        .into_iter()
        .map(|(keyword, (total, count))| ScanSummary {
            keyword: keyword.to_string(),
            avg_sentiment: round3(total / count as f64),
            article_count: count,
        })
        .collect()
}
