use ns_core::KeywordEntry;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

pub const DEFAULT_KEYWORD_LIMIT: usize = 50;

/// Tokens this short or shorter never count as keywords.
const MAX_IGNORED_LEN: usize = 2;

static TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+").expect("token pattern is valid"));

const STOP_WORDS: &[&str] = &[
    // function words
    "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "had", "her", "was",
    "one", "our", "out", "has", "have", "him", "his", "how", "its", "may", "new", "now", "old",
    "see", "two", "who", "did", "get", "let", "put", "say", "she", "too", "use", "with", "from",
    "this", "that", "these", "those", "they", "them", "their", "there", "then", "than", "what",
    "when", "where", "which", "while", "will", "would", "could", "should", "into", "onto",
    "over", "under", "about", "after", "before", "amid", "among", "against", "between",
    "through", "during", "without", "within", "also", "just", "more", "most", "much", "many",
    "some", "such", "only", "very", "been", "being", "were", "does", "here", "each", "other",
    "your", "yours", "ours", "why", "off", "via", "per", "upon", "again",
    // headline filler
    "says", "said", "report", "reports", "news", "update", "updates", "latest", "today",
    "week", "year", "rise", "amp", "https", "http", "www", "com",
];

/// Ranks the most frequent non-trivial words across a batch of headlines.
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    limit: usize,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORD_LIMIT)
    }
}

impl KeywordExtractor {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn is_stop_word(word: &str) -> bool {
        STOP_WORDS.contains(&word)
    }

    /// Counts are ordered descending; equal counts keep first-occurrence order.
    pub fn extract(&self, headlines: &[String]) -> Vec<KeywordEntry> {
        let text = headlines.join(" ").to_lowercase();

        // word -> (count, first position)
        let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
        for (position, token) in TOKEN_REGEX.find_iter(&text).map(|m| m.as_str()).enumerate() {
            if token.chars().count() <= MAX_IGNORED_LEN || Self::is_stop_word(token) {
                continue;
            }
            counts.entry(token).or_insert((0, position)).0 += 1;
        }

        let mut ranked: Vec<_> = counts.into_iter().collect();
        ranked.sort_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_b.cmp(count_a).then(first_a.cmp(first_b))
        });

        ranked
            .into_iter()
            .take(self.limit)
            .map(|(word, (count, _))| KeywordEntry {
                word: word.to_string(),
                count,
            })
            .collect()
    }
}
