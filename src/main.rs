//! News Worthiness Service — Binary Entrypoint
//! Boots the Axum HTTP server: evaluator state, news source, routes and `/metrics`.

use news_worthiness::metrics::Metrics;
use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact local tracing. Shuttle installs its own subscriber when deployed, in which case
/// `try_init` is a no-op.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - EVALUATOR_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("EVALUATOR_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("news_worthiness=info,evaluator=info,warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    // Picks up NEWSAPI_KEY, EVALUATOR_CONFIG_PATH, EVALUATOR_WORTHY_THRESHOLD.
    let _ = dotenvy::dotenv();

    enable_dev_tracing();

    // Invalid config or a model that fails to warm up stops startup here.
    let state = news_worthiness::app_state_from_env()?;

    let mut app = news_worthiness::router(state);
    match Metrics::init() {
        Ok(m) => app = app.merge(m.router()),
        Err(e) => tracing::warn!(error = ?e, "prometheus recorder not installed; /metrics disabled"),
    }

    Ok(app.into())
}
