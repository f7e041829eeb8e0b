// src/analyze/mod.rs
//! Metric extractors and the scoring pipeline behind the evaluation engine.
//!
//! Normalizer → {entities, novelty, depth, readability, topic, sentiment} → fact density
//! → aggregator → confidence → reasons.

pub mod confidence;
pub mod depth;
pub mod ner;
pub mod normalize;
pub mod novelty;
pub mod readability;
pub mod reasons;
pub mod scoring;
pub mod sentiment;
pub mod topic;
pub mod zero_shot;

/// Parse every embedded lexicon and pattern table now. They are built lazily on first use
/// and panic if malformed, so calling this at startup moves that failure out of request time.
pub fn load_lexicons() {
    ner::load_gazetteer();
    sentiment::load_lexicon();
    zero_shot::load_cues();
    depth::load_markers();
}

#[cfg(test)]
pub(crate) fn lexicons_loaded() -> bool {
    ner::gazetteer_loaded()
        && sentiment::lexicon_loaded()
        && zero_shot::cues_loaded()
        && depth::markers_loaded()
}

// Re-export convenient types.
pub use crate::analyze::ner::{dedup_entities, NamedEntityRecognizer, PatternRecognizer};
pub use crate::analyze::normalize::{normalize, NormalizedText};
pub use crate::analyze::scoring::{GateStatus, Verdict};
pub use crate::analyze::sentiment::SentimentAnalyzer;
pub use crate::analyze::zero_shot::{LabelScore, LexicalZeroShot, ZeroShotClassifier};
