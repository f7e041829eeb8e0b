// src/analyze/zero_shot.rs
//! Zero-shot text classification capability.
//!
//! Two modes, as in entailment-based zero-shot pipelines:
//! - single-label (`classify`): one probability per label, summing to 1. Novelty uses this.
//! - multi-label (`classify_multi_label`): each label scored on its own in [0,1], so a single
//!   unrelated label still scores low. Topic relevance uses this.
//!
//! `LexicalZeroShot` is the bundled, deterministic implementation: each label collects evidence
//! from cue words (`lexicon/zero_shot_cues.json` plus the label's own words), fuzzy matched
//! with Jaro-Winkler. Softmax turns evidence into single-label probabilities; a biased sigmoid
//! gives the multi-label scores.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::analyze::normalize::is_stopword;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f32,
}

pub trait ZeroShotClassifier: Send + Sync {
    /// One score per label, in the order given. Scores sum to 1 when `labels` is non-empty.
    fn classify(&self, text: &str, labels: &[String]) -> Result<Vec<LabelScore>>;

    /// One independent score per label, in the order given. Scores do not sum to 1.
    ///
    /// The default scores each label against an implicit `other` label with `classify`.
    fn classify_multi_label(&self, text: &str, labels: &[String]) -> Result<Vec<LabelScore>> {
        labels
            .iter()
            .map(|label| {
                let pair = [label.clone(), OTHER_LABEL.to_string()];
                let scores = self.classify(text, &pair)?;
                Ok(LabelScore {
                    label: label.clone(),
                    score: scores.first().map(|s| s.score).unwrap_or(0.0),
                })
            })
            .collect()
    }

    fn name(&self) -> &'static str;
}

/// Contrast label for per-label scoring.
pub const OTHER_LABEL: &str = "other";

/// Score for `label` (case-insensitive), or 0 if absent.
pub fn score_of(scores: &[LabelScore], label: &str) -> f32 {
    scores
        .iter()
        .find(|s| s.label.eq_ignore_ascii_case(label))
        .map(|s| s.score)
        .unwrap_or(0.0)
}

static CUES: Lazy<HashMap<String, Vec<String>>> = Lazy::new(|| {
    let raw = include_str!("../../lexicon/zero_shot_cues.json");
    serde_json::from_str::<HashMap<String, Vec<String>>>(raw).expect("valid zero-shot cue lexicon")
});

pub(crate) fn load_cues() {
    Lazy::force(&CUES);
}

#[cfg(test)]
pub(crate) fn cues_loaded() -> bool {
    Lazy::get(&CUES).is_some()
}

/// Softmax sharpness applied to per-label evidence.
const TEMPERATURE_INV: f32 = 6.0;
/// Multi-label: `sigmoid(SLOPE × (evidence − BIAS))`; no evidence → ~0.12.
const SIGMOID_SLOPE: f32 = 10.0;
const SIGMOID_BIAS: f32 = 0.2;
const FUZZY_MIN_LEN: usize = 5;
const FUZZY_THRESHOLD: f64 = 0.92;

#[derive(Debug, Clone, Default)]
pub struct LexicalZeroShot;

impl LexicalZeroShot {
    pub fn new() -> Self {
        Self
    }

    fn cues_for(label: &str) -> Vec<String> {
        let lower = label.trim().to_lowercase();
        let mut cues: Vec<String> = CUES.get(&lower).cloned().unwrap_or_default();
        cues.extend(label_terms(&lower));
        cues.sort();
        cues.dedup();
        cues
    }
}

/// Content words of a label: "dmoz/Business/Investing" → ["business", "investing"].
pub fn label_terms(label: &str) -> Vec<String> {
    label
        .split(|c: char| !c.is_alphanumeric())
        .map(|t| t.to_lowercase())
        .filter(|t| t.len() > 1 && !is_stopword(t) && t != "news" && t != "dmoz")
        .collect()
}

/// Exact match, shared stem (one is a prefix of the other, min 5 chars) or close spelling.
pub fn term_matches(word: &str, cue: &str) -> bool {
    if word == cue {
        return true;
    }
    if word.len() < FUZZY_MIN_LEN || cue.len() < FUZZY_MIN_LEN {
        return false;
    }
    word.starts_with(cue) || cue.starts_with(word) || strsim::jaro_winkler(word, cue) >= FUZZY_THRESHOLD
}

impl LexicalZeroShot {
    /// Cue hits per label, normalised by sqrt(text length).
    fn evidence(text: &str, labels: &[String]) -> Vec<f32> {
        let mut freq: HashMap<String, usize> = HashMap::new();
        let mut total = 0usize;
        for w in text
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .filter(|w| !w.is_empty())
        {
            total += 1;
            let lw = w.to_lowercase();
            if !is_stopword(&lw) {
                *freq.entry(lw).or_default() += 1;
            }
        }

        let norm = (total.max(1) as f32).sqrt();
        labels
            .iter()
            .map(|label| {
                let cues = Self::cues_for(label);
                let hits: usize = freq
                    .iter()
                    .filter(|(w, _)| cues.iter().any(|c| term_matches(w, c)))
                    .map(|(_, n)| *n)
                    .sum();
                hits as f32 / norm
            })
            .collect()
    }
}

fn with_labels(labels: &[String], scores: Vec<f32>) -> Vec<LabelScore> {
    labels
        .iter()
        .zip(scores)
        .map(|(l, p)| LabelScore {
            label: l.clone(),
            score: p,
        })
        .collect()
}

impl ZeroShotClassifier for LexicalZeroShot {
    fn classify(&self, text: &str, labels: &[String]) -> Result<Vec<LabelScore>> {
        if labels.is_empty() {
            return Ok(Vec::new());
        }
        let probs = softmax(&Self::evidence(text, labels), TEMPERATURE_INV);
        Ok(with_labels(labels, probs))
    }

    fn classify_multi_label(&self, text: &str, labels: &[String]) -> Result<Vec<LabelScore>> {
        let scores = Self::evidence(text, labels)
            .into_iter()
            .map(|x| sigmoid(SIGMOID_SLOPE * (x - SIGMOID_BIAS)))
            .collect();
        Ok(with_labels(labels, scores))
    }

    fn name(&self) -> &'static str {
        "lexical-zero-shot"
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

fn softmax(xs: &[f32], scale: f32) -> Vec<f32> {
    let max = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = xs.iter().map(|x| ((x - max) * scale).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}
