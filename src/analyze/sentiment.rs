// src/analyze/sentiment.rs
//! Sentiment Analyzer: lexicon valence with short-range negation, squashed to [0,1]
//! around a neutral 0.5. Informational; never gates a verdict.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::analyze::normalize::NormalizedText;

static LEXICON: Lazy<HashMap<String, i32>> = Lazy::new(|| {
    let raw = include_str!("../../lexicon/sentiment.json");
    serde_json::from_str::<HashMap<String, i32>>(raw).expect("valid sentiment lexicon")
});

pub(crate) fn load_lexicon() {
    Lazy::force(&LEXICON);
}

#[cfg(test)]
pub(crate) fn lexicon_loaded() -> bool {
    Lazy::get(&LEXICON).is_some()
}

/// Normalisation constant for `s / sqrt(s² + ALPHA)`.
const ALPHA: f32 = 15.0;
/// Tokens looked back for a negator.
const NEGATION_WINDOW: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct SentimentAnalyzer;

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self
    }

    #[inline]
    fn word_score(&self, w: &str) -> i32 {
        *LEXICON.get(w).unwrap_or(&0)
    }

    /// Raw valence sum. A negator within the previous three tokens of the same sentence
    /// flips the sign of a lexicon hit.
    pub fn raw_score(&self, text: &NormalizedText) -> i32 {
        let toks = &text.tokens;
        let mut score = 0i32;
        for i in 0..toks.len() {
            let base = self.word_score(&toks[i].lower);
            if base == 0 {
                continue;
            }
            let negated = (1..=NEGATION_WINDOW).any(|k| {
                i >= k && toks[i - k].sentence == toks[i].sentence && is_negator(&toks[i - k].lower)
            });
            score += if negated { -base } else { base };
        }
        score
    }

    /// Polarity in [0,1]; 0.5 is neutral.
    pub fn score(&self, text: &NormalizedText) -> f32 {
        let s = self.raw_score(text) as f32;
        let compound = s / (s * s + ALPHA).sqrt();
        ((compound + 1.0) / 2.0).clamp(0.0, 1.0)
    }
}

fn is_negator(tok: &str) -> bool {
    matches!(
        tok,
        "not"
            | "no"
            | "never"
            | "isn't"
            | "wasn't"
            | "aren't"
            | "won't"
            | "can't"
            | "cannot"
            | "didn't"
            | "doesn't"
            | "don't"
            | "without"
            | "hardly"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::normalize::normalize;

    fn score(s: &str) -> f32 {
        SentimentAnalyzer::new().score(&normalize(s).unwrap())
    }

    #[test]
    fn neutral_text_sits_at_midpoint() {
        assert_eq!(score("The committee met on Tuesday."), 0.5);
    }

    #[test]
    fn polarity_direction() {
        assert!(score("A great success and a strong recovery.") > 0.8);
        assert!(score("A deadly disaster and a terrible crisis.") < 0.2);
    }

    #[test]
    fn negation_flips_valence_within_sentence_only() {
        let a = SentimentAnalyzer::new();
        assert!(a.raw_score(&normalize("This is not good.").unwrap()) < 0);
        // negator in the previous sentence does not reach across the boundary
        assert!(a.raw_score(&normalize("Not again. Good news.").unwrap()) > 0);
    }
}
