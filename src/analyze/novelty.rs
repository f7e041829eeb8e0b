// src/analyze/novelty.rs
//! Novelty Classifier: probability mass the zero-shot classifier puts on "novel" framings.
//!
//! novelty = Σ weight(label) × p(label), over the configured label set.

use crate::analyze::zero_shot::{score_of, ZeroShotClassifier};
use crate::config::NoveltyLabel;
use crate::error::Result;

/// Classify `text` against `labels` and fold the weighted probabilities into [0,1].
pub fn novelty_score(
    classifier: &dyn ZeroShotClassifier,
    text: &str,
    labels: &[NoveltyLabel],
) -> Result<f32> {
    let names: Vec<String> = labels.iter().map(|l| l.label.clone()).collect();
    let scores = classifier.classify(text, &names)?;

    let mass: f32 = labels
        .iter()
        .map(|l| l.weight * score_of(&scores, &l.label))
        .sum();
    Ok(mass.clamp(0.0, 1.0))
}
