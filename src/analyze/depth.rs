// src/analyze/depth.rs
//! Analytical Depth Analyzer.
//!
//! Counts analytical markers per sentence in four families (causal, comparative,
//! quantitative, explanatory). Hits per sentence are capped so a wall of connectors is not
//! rewarded, then:
//!   density   = Σ capped_hits / (sentences × target_density)
//!   diversity = families_hit / 4
//!   score     = 0.8 × min(1, density) + 0.2 × diversity

use once_cell::sync::Lazy;
use regex::Regex;

use crate::analyze::normalize::NormalizedText;
use crate::config::Calibration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerFamily {
    Causal,
    Comparative,
    Quantitative,
    Explanatory,
}

const FAMILIES: [MarkerFamily; 4] = [
    MarkerFamily::Causal,
    MarkerFamily::Comparative,
    MarkerFamily::Quantitative,
    MarkerFamily::Explanatory,
];

static MARKERS: Lazy<Vec<(MarkerFamily, Regex)>> = Lazy::new(|| {
    let raw: &[(MarkerFamily, &str)] = &[
        (
            MarkerFamily::Causal,
            r"(?i)\b(because|therefore|consequently|thus|hence|as a result|due to|owing to|leads? to|led to|caused by|results? in|resulted in|so that|driven by)\b",
        ),
        (
            MarkerFamily::Comparative,
            r"(?i)\b(however|whereas|although|though|in contrast|by contrast|compared (?:with|to)|relative to|on the other hand|more than|less than|fewer than|higher than|lower than|unlike|despite)\b",
        ),
        (
            MarkerFamily::Quantitative,
            r"(?i)(\d+(?:\.\d+)?\s?%|\b\d+(?:\.\d+)?\s?(?:percent|per cent|percentage points?|billion|million|trillion)\b|\b(average|median|ratio|rate of|doubled|tripled|halved)\b)",
        ),
        (
            MarkerFamily::Explanatory,
            r"(?i)\b(means that|suggests?|indicates?|implies|implication|according to|analysts?|explains?|explained|evidence|in other words|for example|for instance)\b",
        ),
    ];
    raw.iter()
        .map(|(f, p)| (*f, Regex::new(p).expect("analytical marker regex")))
        .collect()
});

pub(crate) fn load_markers() {
    Lazy::force(&MARKERS);
}

#[cfg(test)]
pub(crate) fn markers_loaded() -> bool {
    Lazy::get(&MARKERS).is_some()
}

/// Analytical depth in [0,1]. No sentences → 0.
pub fn analytical_depth(text: &NormalizedText, cal: &Calibration) -> f32 {
    let n = text.sentence_count();
    if n == 0 {
        return 0.0;
    }

    let mut capped_total = 0usize;
    let mut seen = [false; 4];

    for s in &text.sentences {
        let sentence = text.sentence_text(s);
        let mut hits = 0usize;
        for (family, re) in MARKERS.iter() {
            let k = re.find_iter(sentence).count();
            if k > 0 {
                hits += k;
                if let Some(idx) = FAMILIES.iter().position(|f| f == family) {
                    seen[idx] = true;
                }
            }
        }
        capped_total += hits.min(cal.depth_per_sentence_cap);
    }

    let density = capped_total as f32 / (n as f32 * cal.depth_target_density);
    let diversity = seen.iter().filter(|b| **b).count() as f32 / FAMILIES.len() as f32;
    (0.8 * density.min(1.0) + 0.2 * diversity).clamp(0.0, 1.0)
}
