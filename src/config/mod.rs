// src/config/mod.rs
pub mod evaluator;
pub mod news_api;

pub use evaluator::{Calibration, EvaluatorConfig, Gates, MetricWeights, NoveltyLabel};
pub use news_api::NewsApiSettings;

/// Parse an optional float env value and clamp it to [0.0, 1.0].
pub(crate) fn parse_unit_env(raw: Option<String>) -> Option<f32> {
    raw.and_then(|s| s.trim().parse::<f32>().ok())
        .filter(|v| v.is_finite())
        .map(|v| v.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_env_parses_and_clamps() {
        assert_eq!(parse_unit_env(Some(" 0.65 ".into())), Some(0.65));
        assert_eq!(parse_unit_env(Some("7".into())), Some(1.0));
        assert_eq!(parse_unit_env(Some("abc".into())), None);
        assert_eq!(parse_unit_env(None), None);
    }
}
