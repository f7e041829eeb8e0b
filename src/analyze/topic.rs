// src/analyze/topic.rs
//! Topic Relevance Scorer: do the declared categories match what the text is about?
//!
//! The detected topical signal is the top-N content keywords by frequency. Each declared
//! category is split into terms; its lexical match is the fraction of terms a keyword covers.
//! The zero-shot classifier also scores the text against each category on its own
//! (multi-label), so a single off-topic category scores low. Both views are blended 50/50.
//! No declared categories → neutral score (absence is not irrelevance).

use std::collections::HashMap;

use crate::analyze::normalize::{is_stopword, NormalizedText};
use crate::analyze::zero_shot::{label_terms, term_matches, ZeroShotClassifier};
use crate::config::Calibration;
use crate::error::Result;

const LEXICAL_SHARE: f32 = 0.5;

/// Most frequent content words, ties broken alphabetically for determinism.
pub fn top_keywords(text: &NormalizedText, n: usize) -> Vec<String> {
    let mut freq: HashMap<&str, usize> = HashMap::new();
    for t in &text.tokens {
        let w = t.lower.as_str();
        if w.len() > 2 && !is_stopword(w) && !w.chars().all(|c| c.is_ascii_digit()) {
            *freq.entry(w).or_default() += 1;
        }
    }
    let mut v: Vec<(&str, usize)> = freq.into_iter().collect();
    v.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    v.into_iter().take(n).map(|(w, _)| w.to_string()).collect()
}

/// Fraction of the category's terms covered by at least one keyword.
fn lexical_match(category: &str, keywords: &[String]) -> f32 {
    let terms = label_terms(category);
    if terms.is_empty() {
        return 0.0;
    }
    let covered = terms
        .iter()
        .filter(|t| keywords.iter().any(|k| term_matches(k, t)))
        .count();
    covered as f32 / terms.len() as f32
}

pub fn topic_relevance(
    classifier: &dyn ZeroShotClassifier,
    text: &NormalizedText,
    categories: &[String],
    cal: &Calibration,
) -> Result<f32> {
    let categories: Vec<String> = categories
        .iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();
    if categories.is_empty() {
        return Ok(cal.topic_neutral_score);
    }

    let keywords = top_keywords(text, cal.topic_keyword_count);
    let lexical = categories
        .iter()
        .map(|c| lexical_match(c, &keywords))
        .fold(0.0f32, f32::max);

    let zero_shot = classifier
        .classify_multi_label(&text.text, &categories)?
        .iter()
        .map(|s| s.score)
        .fold(0.0f32, f32::max);

    Ok((LEXICAL_SHARE * lexical + (1.0 - LEXICAL_SHARE) * zero_shot).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::normalize::normalize;
    use crate::analyze::zero_shot::LexicalZeroShot;

    const TECH: &str = "Chipmakers unveiled new processors. The technology race between \
        chipmakers is accelerating, and technology investment keeps rising across processors.";

    fn cats(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_categories_is_neutral() {
        let n = normalize(TECH).unwrap();
        let s = topic_relevance(&LexicalZeroShot::new(), &n, &[], &Calibration::default()).unwrap();
        assert_eq!(s, 0.5);
        let blank = cats(&["  "]);
        let s = topic_relevance(&LexicalZeroShot::new(), &n, &blank, &Calibration::default()).unwrap();
        assert_eq!(s, 0.5);
    }

    #[test]
    fn matching_category_beats_unrelated_one() {
        let n = normalize(TECH).unwrap();
        let cal = Calibration::default();
        let hit = topic_relevance(&LexicalZeroShot::new(), &n, &cats(&["news/Technology"]), &cal).unwrap();
        let miss = topic_relevance(&LexicalZeroShot::new(), &n, &cats(&["news/Sports"]), &cal).unwrap();
        assert!(hit > 0.9, "hit={hit}");
        assert!(hit > miss, "hit={hit} miss={miss}");
    }

    #[test]
    fn single_off_topic_category_scores_low() {
        let sports = normalize(
            "The striker scored twice and the home club won the league final on Sunday. \
             Fans celebrated in the stadium as the coach praised the defence.",
        )
        .unwrap();
        let cal = Calibration::default();
        let declared = topic_relevance(&LexicalZeroShot::new(), &sports, &cats(&["news/Technology"]), &cal).unwrap();
        assert!(declared < 0.3, "declared={declared}");
        assert!(declared < cal.topic_neutral_score);
    }

    #[test]
    fn keywords_are_frequency_ordered() {
        let n = normalize(TECH).unwrap();
        let k = top_keywords(&n, 3);
        assert_eq!(k[0], "chipmakers");
        assert!(k.contains(&"technology".to_string()));
    }
}
