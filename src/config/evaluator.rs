// src/config/evaluator.rs
//! Engine configuration: gates, metric weights, novelty label set and calibration constants.
//!
//! TOML shape (every table optional, missing keys fall back to defaults):
//! ```toml
//! [gates]
//! min_entities = 5
//! min_words = 200
//! worthy_threshold = 0.7
//!
//! [metric_weights]
//! entity_richness = 0.14
//! fact_density = 0.25
//! novelty = 0.25
//! analytical_depth = 0.08
//! topic_relevance = 0.16
//! readability = 0.06
//! sentiment = 0.06
//!
//! [[novelty_labels]]
//! label = "breaking news"
//! weight = 1.0
//!
//! [calibration]
//! fact_density_words_per_entity = 30.0
//! ```
//!
//! Validation runs once at startup; a config that fails it never reaches call time.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::parse_unit_env;
use crate::error::{EvalError, Result};

pub const DEFAULT_EVALUATOR_CONFIG_PATH: &str = "config/evaluator.toml";
pub const ENV_EVALUATOR_CONFIG_PATH: &str = "EVALUATOR_CONFIG_PATH";
pub const ENV_WORTHY_THRESHOLD: &str = "EVALUATOR_WORTHY_THRESHOLD";

const WEIGHT_SUM_TOLERANCE: f32 = 1e-3;

/// Hard preconditions plus the verdict threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Gates {
    pub min_entities: usize,
    pub min_words: usize,
    pub worthy_threshold: f32,
}

impl Default for Gates {
    fn default() -> Self {
        Self {
            min_entities: 5,
            min_words: 200,
            worthy_threshold: 0.7,
        }
    }
}

/// Weights of the seven metrics in the overall score. Must sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricWeights {
    pub entity_richness: f32,
    pub fact_density: f32,
    pub novelty: f32,
    pub analytical_depth: f32,
    pub topic_relevance: f32,
    pub readability: f32,
    pub sentiment: f32,
}

impl Default for MetricWeights {
    fn default() -> Self {
        Self {
            entity_richness: 0.14,
            fact_density: 0.25,
            novelty: 0.25,
            analytical_depth: 0.08,
            topic_relevance: 0.16,
            readability: 0.06,
            sentiment: 0.06,
        }
    }
}

impl MetricWeights {
    fn named(&self) -> [(&'static str, f32); 7] {
        [
            ("entity_richness", self.entity_richness),
            ("fact_density", self.fact_density),
            ("novelty", self.novelty),
            ("analytical_depth", self.analytical_depth),
            ("topic_relevance", self.topic_relevance),
            ("readability", self.readability),
            ("sentiment", self.sentiment),
        ]
    }

    pub fn sum(&self) -> f32 {
        self.named().iter().map(|(_, w)| w).sum()
    }
}

/// Candidate label for the zero-shot novelty classifier and how much of its
/// probability mass counts as "novel".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoveltyLabel {
    pub label: String,
    pub weight: f32,
}

impl NoveltyLabel {
    pub fn new(label: impl Into<String>, weight: f32) -> Self {
        Self {
            label: label.into(),
            weight,
        }
    }
}

fn default_novelty_labels() -> Vec<NoveltyLabel> {
    vec![
        NoveltyLabel::new("breaking news", 1.0),
        NoveltyLabel::new("novel development", 1.0),
        NoveltyLabel::new("in-depth analysis", 0.5),
        NoveltyLabel::new("routine report", 0.0),
        NoveltyLabel::new("common knowledge", 0.0),
        NoveltyLabel::new("opinion", 0.0),
    ]
}

/// Tuning constants. None of these is a law; they are kept here so they can be tuned
/// without a rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Calibration {
    /// K in `entities / (words / K)`.
    pub fact_density_words_per_entity: f32,
    /// Entity count at which entity richness saturates at 1.0.
    pub entity_saturation: f32,
    pub depth_per_sentence_cap: usize,
    /// Capped marker hits per sentence that maps to full density.
    pub depth_target_density: f32,
    /// Topic score when the caller declared no categories.
    pub topic_neutral_score: f32,
    pub topic_keyword_count: usize,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            fact_density_words_per_entity: 30.0,
            entity_saturation: 20.0,
            depth_per_sentence_cap: 2,
            depth_target_density: 0.6,
            topic_neutral_score: 0.5,
            topic_keyword_count: 25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    pub gates: Gates,
    pub metric_weights: MetricWeights,
    pub novelty_labels: Vec<NoveltyLabel>,
    pub calibration: Calibration,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            gates: Gates::default(),
            metric_weights: MetricWeights::default(),
            novelty_labels: default_novelty_labels(),
            calibration: Calibration::default(),
        }
    }
}

impl EvaluatorConfig {
    /// Load using `EVALUATOR_CONFIG_PATH` or `config/evaluator.toml`.
    ///
    /// An explicitly configured path must exist; a missing default file means built-in defaults.
    /// `EVALUATOR_WORTHY_THRESHOLD` overrides the TOML threshold. The result is validated.
    pub fn load() -> anyhow::Result<Self> {
        let explicit = std::env::var(ENV_EVALUATOR_CONFIG_PATH).ok().map(PathBuf::from);

        let mut cfg = match explicit {
            Some(path) => Self::from_path(&path)?,
            None => {
                let path = PathBuf::from(DEFAULT_EVALUATOR_CONFIG_PATH);
                if path.exists() {
                    Self::from_path(&path)?
                } else {
                    info!(target: "evaluator", "no evaluator config found, using defaults");
                    Self::default()
                }
            }
        };

        if let Some(t) = parse_unit_env(std::env::var(ENV_WORTHY_THRESHOLD).ok()) {
            cfg.gates.worthy_threshold = t;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading evaluator config from {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("parsing evaluator config at {}", path.display()))
    }

    /// Parse only; call `validate` before use.
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let cfg: EvaluatorConfig = toml::from_str(toml_str)?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let g = &self.gates;
        if !(g.worthy_threshold.is_finite() && g.worthy_threshold > 0.0 && g.worthy_threshold < 1.0)
        {
            return Err(EvalError::Configuration(format!(
                "worthy_threshold must be in (0, 1), got {}",
                g.worthy_threshold
            )));
        }
        if g.min_words == 0 {
            return Err(EvalError::Configuration("min_words must be at least 1".into()));
        }

        for (name, w) in self.metric_weights.named() {
            if !(w.is_finite() && (0.0..=1.0).contains(&w)) {
                return Err(EvalError::Configuration(format!(
                    "metric weight `{name}` must be in [0, 1], got {w}"
                )));
            }
        }
        let sum = self.metric_weights.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(EvalError::Configuration(format!(
                "metric weights must sum to 1, got {sum:.4}"
            )));
        }

        if self.novelty_labels.is_empty() {
            return Err(EvalError::Configuration("novelty_labels must not be empty".into()));
        }
        for l in &self.novelty_labels {
            if l.label.trim().is_empty() {
                return Err(EvalError::Configuration("novelty label must not be blank".into()));
            }
            if !(l.weight.is_finite() && (0.0..=1.0).contains(&l.weight)) {
                return Err(EvalError::Configuration(format!(
                    "novelty label `{}` weight must be in [0, 1], got {}",
                    l.label, l.weight
                )));
            }
        }
        if !self.novelty_labels.iter().any(|l| l.weight > 0.0) {
            return Err(EvalError::Configuration(
                "at least one novelty label needs a positive weight".into(),
            ));
        }

        let c = &self.calibration;
        let positive = [
            ("fact_density_words_per_entity", c.fact_density_words_per_entity),
            ("entity_saturation", c.entity_saturation),
            ("depth_target_density", c.depth_target_density),
        ];
        for (name, v) in positive {
            if !(v.is_finite() && v > 0.0) {
                return Err(EvalError::Configuration(format!(
                    "calibration `{name}` must be positive, got {v}"
                )));
            }
        }
        if c.depth_per_sentence_cap == 0 {
            return Err(EvalError::Configuration(
                "depth_per_sentence_cap must be at least 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&c.topic_neutral_score) {
            return Err(EvalError::Configuration(format!(
                "topic_neutral_score must be in [0, 1], got {}",
                c.topic_neutral_score
            )));
        }
        if c.topic_keyword_count == 0 {
            return Err(EvalError::Configuration(
                "topic_keyword_count must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Label strings in configured order, as passed to the classifier.
    pub fn novelty_label_names(&self) -> Vec<String> {
        self.novelty_labels.iter().map(|l| l.label.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid_and_sum_to_one() {
        let cfg = EvaluatorConfig::default();
        cfg.validate().unwrap();
        assert!((cfg.metric_weights.sum() - 1.0).abs() < 1e-6);
        assert_eq!(cfg.gates.min_entities, 5);
        assert_eq!(cfg.gates.min_words, 200);
    }

    #[test]
    fn fact_density_and_novelty_weigh_most() {
        let w = MetricWeights::default();
        for other in [w.entity_richness, w.analytical_depth, w.topic_relevance] {
            assert!(w.fact_density > other && w.novelty > other);
            assert!(w.readability < other && w.sentiment < other);
        }
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = EvaluatorConfig::from_toml_str(
            r#"
[gates]
min_words = 300
"#,
        )
        .unwrap();
        assert_eq!(cfg.gates.min_words, 300);
        assert_eq!(cfg.gates.min_entities, 5);
        assert_eq!(cfg.novelty_labels.len(), 6);
        cfg.validate().unwrap();
    }

    #[test]
    fn weights_not_summing_to_one_are_rejected() {
        let cfg = EvaluatorConfig::from_toml_str(
            r#"
[metric_weights]
entity_richness = 0.5
fact_density = 0.5
novelty = 0.5
"#,
        )
        .unwrap();
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, EvalError::Configuration(_)), "{err}");
    }

    #[test]
    fn threshold_out_of_range_is_rejected() {
        let mut cfg = EvaluatorConfig::default();
        cfg.gates.worthy_threshold = 1.5;
        assert!(matches!(cfg.validate(), Err(EvalError::Configuration(_))));
    }

    #[test]
    fn novelty_labels_need_some_positive_weight() {
        let mut cfg = EvaluatorConfig::default();
        for l in cfg.novelty_labels.iter_mut() {
            l.weight = 0.0;
        }
        assert!(matches!(cfg.validate(), Err(EvalError::Configuration(_))));
    }

    #[test]
    fn shipped_config_file_parses_and_validates() {
        let raw = include_str!("../../config/evaluator.toml");
        let cfg = EvaluatorConfig::from_toml_str(raw).unwrap();
        cfg.validate().unwrap();
        let d = EvaluatorConfig::default();
        assert_eq!(cfg.gates.min_entities, d.gates.min_entities);
        assert_eq!(cfg.gates.min_words, d.gates.min_words);
        assert_eq!(cfg.novelty_label_names(), d.novelty_label_names());
        assert!((cfg.metric_weights.novelty - d.metric_weights.novelty).abs() < 1e-6);
    }
}
