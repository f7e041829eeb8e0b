// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod analyze;
pub mod api;
pub mod article;
pub mod config;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod metrics;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::article::{Article, Entity, EntityKind, Evaluation, Location, MetricSet};
pub use crate::config::EvaluatorConfig;
pub use crate::engine::Evaluator;
pub use crate::error::EvalError;
pub use crate::ingest::{ArticleSource, FetchQuery, NewsApiClient};

use std::sync::Arc;
use tracing::info;

/// Build the service state from the environment: engine config (TOML + env overrides),
/// bundled models (warmed up once) and the NewsAPI source when a key is set.
pub fn app_state_from_env() -> anyhow::Result<AppState> {
    let cfg = EvaluatorConfig::load()?;
    let evaluator = Evaluator::with_builtin_models(cfg)?;
    evaluator.warm_up()?;

    let mut state = AppState::new(evaluator);
    match NewsApiClient::from_env() {
        Some(client) => {
            info!(
                target: "evaluator",
                endpoint = %client.settings().endpoint,
                "news source configured"
            );
            state = state.with_source(Arc::new(client));
        }
        None => info!(target: "evaluator", "NEWSAPI_KEY not set; /fetch-and-evaluate disabled"),
    }
    Ok(state)
}
