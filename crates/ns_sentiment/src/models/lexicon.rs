//! Word-level polarity scoring tuned for business and energy headlines.
//!
//! Each known word carries a polarity in [-1, 1]. Intensifiers scale the next
//! scored word, negations flip and damp scored words inside a short window.
//! The text score is the mean over scored words, clamped to [-1, 1].

use async_trait::async_trait;
use ns_core::{Result, SentimentScorer};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static WORD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w']+").expect("word pattern is valid"));

const POSITIVE: &[(&str, f64)] = &[
    ("good", 0.7),
    ("great", 0.8),
    ("best", 1.0),
    ("better", 0.5),
    ("strong", 0.43),
    ("stronger", 0.5),
    ("robust", 0.5),
    ("gain", 0.4),
    ("gains", 0.4),
    ("surge", 0.5),
    ("surges", 0.5),
    ("soar", 0.6),
    ("soars", 0.6),
    ("jump", 0.35),
    ("jumps", 0.35),
    ("rally", 0.5),
    ("rallies", 0.5),
    ("boost", 0.45),
    ("boosts", 0.45),
    ("lifts", 0.3),
    ("record", 0.3),
    ("growth", 0.4),
    ("grow", 0.35),
    ("grows", 0.35),
    ("success", 0.6),
    ("successful", 0.75),
    ("win", 0.8),
    ("wins", 0.8),
    ("approve", 0.4),
    ("approves", 0.4),
    ("approval", 0.4),
    ("breakthrough", 0.6),
    ("profit", 0.4),
    ("profits", 0.4),
    ("optimism", 0.5),
    ("optimistic", 0.5),
    ("recover", 0.35),
    ("recovery", 0.35),
    ("rebound", 0.35),
    ("stable", 0.3),
    ("secure", 0.4),
    ("clean", 0.37),
    ("innovative", 0.5),
    ("promising", 0.5),
    ("positive", 0.23),
    ("deal", 0.2),
    ("agreement", 0.2),
    ("expand", 0.3),
    ("expands", 0.3),
    ("expansion", 0.3),
    ("high", 0.16),
    ("higher", 0.25),
    ("new", 0.14),
];

const NEGATIVE: &[(&str, f64)] = &[
    ("bad", -0.7),
    ("worst", -1.0),
    ("worse", -0.4),
    ("weak", -0.38),
    ("weaker", -0.4),
    ("fall", -0.3),
    ("falls", -0.3),
    ("drop", -0.3),
    ("drops", -0.3),
    ("plunge", -0.6),
    ("plunges", -0.6),
    ("slump", -0.5),
    ("slumps", -0.5),
    ("tumble", -0.5),
    ("tumbles", -0.5),
    ("crash", -0.7),
    ("crisis", -0.6),
    ("collapse", -0.7),
    ("loss", -0.4),
    ("losses", -0.4),
    ("decline", -0.35),
    ("declines", -0.35),
    ("cut", -0.2),
    ("cuts", -0.2),
    ("war", -0.6),
    ("attack", -0.6),
    ("attacks", -0.6),
    ("conflict", -0.5),
    ("tension", -0.4),
    ("tensions", -0.4),
    ("threat", -0.5),
    ("threatens", -0.5),
    ("risk", -0.35),
    ("risks", -0.35),
    ("fear", -0.5),
    ("fears", -0.5),
    ("concern", -0.3),
    ("concerns", -0.3),
    ("warn", -0.4),
    ("warns", -0.4),
    ("warning", -0.4),
    ("sanction", -0.4),
    ("sanctions", -0.4),
    ("delay", -0.3),
    ("delays", -0.3),
    ("spill", -0.6),
    ("leak", -0.5),
    ("halt", -0.4),
    ("halts", -0.4),
    ("shortage", -0.5),
    ("volatile", -0.4),
    ("uncertainty", -0.35),
    ("slow", -0.3),
    ("slowdown", -0.4),
    ("fail", -0.5),
    ("fails", -0.5),
    ("failure", -0.6),
    ("low", -0.16),
    ("lower", -0.25),
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("extremely", 1.5),
    ("sharply", 1.4),
    ("significantly", 1.3),
    ("highly", 1.3),
    ("slightly", 0.7),
    ("somewhat", 0.8),
    ("barely", 0.6),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "without", "nor", "don't", "doesn't", "didn't", "isn't", "aren't",
    "wasn't", "weren't", "won't", "can't", "cannot",
];

#[derive(Debug, Clone)]
pub struct LexiconScorer {
    polarity: HashMap<String, f64>,
    intensifiers: HashMap<String, f64>,
    negation_window: usize,
}

impl LexiconScorer {
    pub fn new() -> Self {
        let polarity = POSITIVE
            .iter()
            .chain(NEGATIVE.iter())
            .map(|(word, score)| (word.to_string(), *score))
            .collect();
        let intensifiers = INTENSIFIERS
            .iter()
            .map(|(word, factor)| (word.to_string(), *factor))
            .collect();

        Self {
            polarity,
            intensifiers,
            negation_window: 3,
        }
    }

    pub fn with_negation_window(mut self, window: usize) -> Self {
        self.negation_window = window;
        self
    }

    /// Adds or overrides a word's polarity. The score is clamped to [-1, 1].
    pub fn add_word(&mut self, word: &str, score: f64) {
        self.polarity.insert(word.to_lowercase(), score.clamp(-1.0, 1.0));
    }

    pub fn polarity(&self, text: &str) -> f64 {
        let lowered = text.to_lowercase();
        let mut total = 0.0;
        let mut scored = 0usize;
        let mut modifier = 1.0;
        let mut negation_left = 0usize;

        for token in WORD_REGEX.find_iter(&lowered).map(|m| m.as_str()) {
            if NEGATIONS.contains(&token) {
                negation_left = self.negation_window;
                continue;
            }
            if let Some(factor) = self.intensifiers.get(token) {
                modifier = *factor;
                continue;
            }
            if let Some(base) = self.polarity.get(token) {
                let mut score = base * modifier;
                if negation_left > 0 {
                    score *= -0.5;
                }
                total += score;
                scored += 1;
                modifier = 1.0;
            }
            negation_left = negation_left.saturating_sub(1);
        }

        if scored == 0 {
            0.0
        } else {
            (total / scored as f64).clamp(-1.0, 1.0)
        }
    }
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SentimentScorer for LexiconScorer {
    fn name(&self) -> &str {
        "lexicon"
    }

    async fn score(&self, text: &str) -> Result<f64> {
        Ok(self.polarity(text))
    }
}
