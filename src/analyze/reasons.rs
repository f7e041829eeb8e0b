//! Reason Generator: deterministic, human-readable justifications in fixed priority order.
//!
//! Order: entity count → fact density → novelty → analytical depth → topic relevance →
//! readability → tone → final verdict. Callers may show only the first N.

use crate::analyze::scoring::Verdict;
use crate::article::MetricSet;
use crate::config::Gates;

const HIGH: f32 = 0.7;
const LOW: f32 = 0.3;
/// |sentiment − 0.5| × 2 above which the tone is called out.
const STRONG_TONE: f32 = 0.6;

fn band(score: f32, high: &str, low: &str, out: &mut Vec<String>) {
    if score > HIGH {
        out.push(high.to_string());
    } else if score < LOW {
        out.push(low.to_string());
    }
}

pub fn generate_reasons(
    m: &MetricSet,
    verdict: &Verdict,
    gates: &Gates,
    has_categories: bool,
) -> Vec<String> {
    let mut reasons = Vec::new();

    if verdict.gates.few_entities {
        reasons.push(format!(
            "Low number of named entities ({} < {})",
            m.named_entities_count, gates.min_entities
        ));
    }

    band(m.fact_density_score, "High fact density", "Low fact density", &mut reasons);
    band(m.novelty_score, "High novelty content", "Low novelty content", &mut reasons);
    band(
        m.analytical_depth_score,
        "Strong analytical depth",
        "Lacks analytical depth",
        &mut reasons,
    );
    if has_categories {
        band(
            m.topic_relevance_score,
            "Content matches declared categories",
            "Content diverges from declared categories",
            &mut reasons,
        );
    }
    band(m.readability_score, "Highly readable", "Difficult to read", &mut reasons);

    let tone = (m.sentiment_score - 0.5) * 2.0;
    if tone > STRONG_TONE {
        reasons.push("Strongly positive tone".to_string());
    } else if tone < -STRONG_TONE {
        reasons.push("Strongly negative tone".to_string());
    }

    reasons.push(final_reason(verdict, gates));
    reasons
}

fn final_reason(v: &Verdict, gates: &Gates) -> String {
    if v.gates.any() {
        let mut failed = Vec::new();
        if v.gates.short_content {
            failed.push(format!(
                "insufficient content ({} < {} words)",
                v.gates.words, gates.min_words
            ));
        }
        if v.gates.few_entities {
            failed.push(format!(
                "too few named entities ({} < {})",
                v.gates.entities, gates.min_entities
            ));
        }
        return format!("Failed gate: {}", failed.join("; "));
    }

    if v.is_worthy {
        format!(
            "Meets overall quality threshold for further analysis ({:.2} >= {:.2})",
            v.overall_score, gates.worthy_threshold
        )
    } else {
        format!(
            "Below overall quality threshold ({:.2} < {:.2})",
            v.overall_score, gates.worthy_threshold
        )
    }
}
