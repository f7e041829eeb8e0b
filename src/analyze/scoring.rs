//! Fact density and the Score Aggregator.
//!
//! Gates are checked before weighting so a high weighted score can never rescue a gated
//! article:
//! - `words < min_words`       → not worthy
//! - `entities < min_entities` → not worthy
//!
//! overall = Σ weight_i × metric_i (weights sum to 1), `is_worthy = overall >= threshold`
//! and no gate fired. A gated article reports a low score (capped at half the threshold).

use crate::article::MetricSet;
use crate::config::{Calibration, EvaluatorConfig, Gates, MetricWeights};

/// `min(1, entities / (words / K))`; zero words → 0.
pub fn fact_density(entities: usize, words: usize, cal: &Calibration) -> f32 {
    if words == 0 {
        return 0.0;
    }
    let expected = words as f32 / cal.fact_density_words_per_entity;
    (entities as f32 / expected).min(1.0)
}

/// Entity count mapped to [0,1], saturating at `entity_saturation`.
pub fn entity_richness(entities: usize, cal: &Calibration) -> f32 {
    (entities as f32 / cal.entity_saturation).min(1.0)
}

/// Which hard gates fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateStatus {
    pub words: usize,
    pub entities: usize,
    pub short_content: bool,
    pub few_entities: bool,
}

impl GateStatus {
    pub fn check(words: usize, entities: usize, gates: &Gates) -> Self {
        Self {
            words,
            entities,
            short_content: words < gates.min_words,
            few_entities: entities < gates.min_entities,
        }
    }

    pub fn any(&self) -> bool {
        self.short_content || self.few_entities
    }
}

/// Plain weighted sum of the seven metrics, clamped to [0,1].
pub fn weighted_score(m: &MetricSet, w: &MetricWeights, cal: &Calibration) -> f32 {
    let raw = w.entity_richness * entity_richness(m.named_entities_count, cal)
        + w.fact_density * m.fact_density_score
        + w.novelty * m.novelty_score
        + w.analytical_depth * m.analytical_depth_score
        + w.topic_relevance * m.topic_relevance_score
        + w.readability * m.readability_score
        + w.sentiment * m.sentiment_score;
    raw.clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    pub overall_score: f32,
    pub is_worthy: bool,
    pub gates: GateStatus,
}

pub fn aggregate(m: &MetricSet, words: usize, cfg: &EvaluatorConfig) -> Verdict {
    let gates = GateStatus::check(words, m.named_entities_count, &cfg.gates);
    let weighted = weighted_score(m, &cfg.metric_weights, &cfg.calibration);

    if gates.any() {
        return Verdict {
            overall_score: weighted.min(cfg.gates.worthy_threshold * 0.5),
            is_worthy: false,
            gates,
        };
    }

    Verdict {
        overall_score: weighted,
        is_worthy: weighted >= cfg.gates.worthy_threshold,
        gates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(entities: usize, all: f32) -> MetricSet {
        MetricSet {
            named_entities_count: entities,
            fact_density_score: all,
            novelty_score: all,
            analytical_depth_score: all,
            readability_score: all,
            topic_relevance_score: all,
            sentiment_score: all,
        }
    }

    #[test]
    fn fact_density_calibration() {
        let cal = Calibration::default();
        // 24 entities in 800 words: expected 26.7 → 0.9
        assert!((fact_density(24, 800, &cal) - 0.9).abs() < 1e-3);
        assert_eq!(fact_density(100, 300, &cal), 1.0);
        assert_eq!(fact_density(3, 0, &cal), 0.0);
    }

    #[test]
    fn perfect_metrics_pass() {
        let cfg = EvaluatorConfig::default();
        let v = aggregate(&metrics(20, 1.0), 500, &cfg);
        assert!(v.is_worthy);
        assert!((v.overall_score - 1.0).abs() < 1e-5);
    }

    #[test]
    fn gates_override_a_high_weighted_score() {
        let cfg = EvaluatorConfig::default();

        let short = aggregate(&metrics(20, 1.0), 199, &cfg);
        assert!(!short.is_worthy && short.gates.short_content && !short.gates.few_entities);
        assert!(short.overall_score <= 0.35 + 1e-6);

        let sparse = aggregate(&metrics(4, 1.0), 800, &cfg);
        assert!(!sparse.is_worthy && sparse.gates.few_entities);
    }

    #[test]
    fn threshold_is_inclusive() {
        let mut cfg = EvaluatorConfig::default();
        cfg.gates.worthy_threshold = 0.5;
        // 10 of 20 saturation entities → richness 0.5 like every other metric
        let v = aggregate(&metrics(10, 0.5), 500, &cfg);
        assert!((v.overall_score - 0.5).abs() < 1e-5);
        assert_eq!(v.is_worthy, v.overall_score >= 0.5);
    }
}
