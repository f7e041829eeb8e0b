//! Confidence Estimator.
//!
//! confidence = 0.5 × sqrt(margin) + 0.25 × agreement + 0.25 × input_quality
//!
//! - margin: distance of the overall score from the threshold, normalised to [0,1]
//! - agreement: 1 − 2 × stddev of the core metrics (fact density, novelty, depth, topic)
//! - input_quality: how far word and entity counts sit from their gate minimums
//!
//! Strictly increasing in |overall − threshold| when the other inputs are fixed.

use crate::article::MetricSet;
use crate::config::Gates;

pub fn confidence(m: &MetricSet, overall: f32, words: usize, gates: &Gates) -> f32 {
    let t = gates.worthy_threshold;
    let margin = ((overall - t).abs() / t.max(1.0 - t)).clamp(0.0, 1.0);

    let core = [
        m.fact_density_score,
        m.novelty_score,
        m.analytical_depth_score,
        m.topic_relevance_score,
    ];
    let agreement = (1.0 - 2.0 * std_dev(&core)).clamp(0.0, 1.0);

    let input_quality = 0.5
        * (gate_distance(words, gates.min_words) + gate_distance(m.named_entities_count, gates.min_entities));

    (0.5 * margin.sqrt() + 0.25 * agreement + 0.25 * input_quality).clamp(0.0, 1.0)
}

/// 0 right at the gate minimum, rising to 1 one full minimum away on either side.
fn gate_distance(x: usize, min: usize) -> f32 {
    if min == 0 {
        return 1.0;
    }
    ((x as f32 - min as f32).abs() / min as f32).min(1.0)
}

fn std_dev(xs: &[f32]) -> f32 {
    let n = xs.len() as f32;
    let mean = xs.iter().sum::<f32>() / n;
    (xs.iter().map(|x| (x - mean).powi(2)).sum::<f32>() / n).sqrt()
}
