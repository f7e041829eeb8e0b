// tests/common/mod.rs
// Shared stubs and article builders for integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use news_worthiness::analyze::{LabelScore, NamedEntityRecognizer, NormalizedText, ZeroShotClassifier};
use news_worthiness::error::Result;
use news_worthiness::{Article, Entity, EntityKind, EvalError, Evaluator, EvaluatorConfig};

/// Causal + comparative markers, 10 words.
pub const SENTENCE_A: &str = "Technology investment grew because demand rose compared with last year.";
/// Explanatory + quantitative markers, 10 words.
pub const SENTENCE_B: &str = "Analysts said technology spending increased 12 percent according to filings.";

/// `words` must be a multiple of 10.
pub fn analytical_text(words: usize) -> String {
    (0..words / 10)
        .map(|i| if i % 2 == 0 { SENTENCE_A } else { SENTENCE_B })
        .collect::<Vec<_>>()
        .join(" ")
}

/// No analytical markers, 10 words.
pub const SENTENCE_C: &str = "The technology company opened a new office in the city.";
/// No analytical markers, 10 words.
pub const SENTENCE_D: &str = "Workers moved desks and screens into the technology building today.";

/// Plain reporting with zero analytical depth. `words` must be a multiple of 10.
pub fn descriptive_text(words: usize) -> String {
    (0..words / 10)
        .map(|i| if i % 2 == 0 { SENTENCE_C } else { SENTENCE_D })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn article(title: &str, content: &str) -> Article {
    Article::new(
        title,
        content,
        "Wire",
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
    )
}

/// Returns `n` distinct organisations regardless of the text.
pub struct FixedRecognizer(pub usize);

impl NamedEntityRecognizer for FixedRecognizer {
    fn recognize(&self, _text: &NormalizedText) -> Result<Vec<Entity>> {
        Ok((0..self.0)
            .map(|i| Entity::new(format!("Org {i}"), EntityKind::Organization))
            .collect())
    }

    fn name(&self) -> &'static str {
        "fixed-ner"
    }
}

/// Scores listed labels as given and every other label as `default`.
pub struct FixedZeroShot {
    pub scores: HashMap<String, f32>,
    pub default: f32,
}

impl FixedZeroShot {
    pub fn new(pairs: &[(&str, f32)], default: f32) -> Self {
        Self {
            scores: pairs.iter().map(|(l, s)| (l.to_string(), *s)).collect(),
            default,
        }
    }
}

impl ZeroShotClassifier for FixedZeroShot {
    fn classify(&self, _text: &str, labels: &[String]) -> Result<Vec<LabelScore>> {
        Ok(labels
            .iter()
            .map(|l| LabelScore {
                label: l.clone(),
                score: self.scores.get(l).copied().unwrap_or(self.default),
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "fixed-zero-shot"
    }
}

pub struct OfflineZeroShot;

impl ZeroShotClassifier for OfflineZeroShot {
    fn classify(&self, _text: &str, _labels: &[String]) -> Result<Vec<LabelScore>> {
        Err(EvalError::model("offline-zero-shot", "weights not loaded"))
    }

    fn name(&self) -> &'static str {
        "offline-zero-shot"
    }
}

pub struct OfflineRecognizer;

impl NamedEntityRecognizer for OfflineRecognizer {
    fn recognize(&self, _text: &NormalizedText) -> Result<Vec<Entity>> {
        Err(EvalError::model("offline-ner", "weights not loaded"))
    }

    fn name(&self) -> &'static str {
        "offline-ner"
    }
}

/// 15 entities, novelty 0.8 ("breaking news"), categories fully matched.
pub fn scenario_evaluator(entities: usize) -> Evaluator {
    Evaluator::new(
        EvaluatorConfig::default(),
        Arc::new(FixedRecognizer(entities)),
        Arc::new(FixedZeroShot::new(
            &[
                ("breaking news", 0.8),
                ("novel development", 0.0),
                ("in-depth analysis", 0.0),
                ("routine report", 0.1),
                ("common knowledge", 0.05),
                ("opinion", 0.05),
            ],
            1.0,
        )),
    )
    .unwrap()
}

pub fn builtin_evaluator() -> Evaluator {
    Evaluator::with_builtin_models(EvaluatorConfig::default()).unwrap()
}
