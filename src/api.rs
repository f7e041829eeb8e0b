//! HTTP surface over the evaluator.
//!
//! Evaluation is CPU-bound, so handlers hand it to `spawn_blocking` and the async workers
//! stay free for I/O.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::article::{Article, Evaluation};
use crate::engine::Evaluator;
use crate::error::EvalError;
use crate::ingest::{ArticleSource, FetchQuery};

#[derive(Clone)]
pub struct AppState {
    pub evaluator: Arc<Evaluator>,
    /// `None` when no news source is configured; `/fetch-and-evaluate` then answers 503.
    pub source: Option<Arc<dyn ArticleSource>>,
}

impl AppState {
    pub fn new(evaluator: Evaluator) -> Self {
        Self {
            evaluator: Arc::new(evaluator),
            source: None,
        }
    }

    pub fn with_source(mut self, source: Arc<dyn ArticleSource>) -> Self {
        self.source = Some(source);
        self
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/evaluate", post(evaluate))
        .route("/evaluate/batch", post(evaluate_batch))
        .route("/fetch-and-evaluate", post(fetch_and_evaluate))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Debug)]
pub enum ApiError {
    /// Body did not deserialize into the expected shape.
    BadRequest(String),
    Eval(EvalError),
    SourceNotConfigured,
    Source(anyhow::Error),
    Internal(String),
}

impl From<EvalError> for ApiError {
    fn from(e: EvalError) -> Self {
        Self::Eval(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(r: JsonRejection) -> Self {
        Self::BadRequest(r.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            Self::BadRequest(m) => (StatusCode::BAD_REQUEST, "invalid_input", m),
            Self::Eval(e) => {
                let status = match e {
                    EvalError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                    EvalError::ModelUnavailable { .. } | EvalError::Configuration(_) => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, e.kind(), e.to_string())
            }
            Self::SourceNotConfigured => (
                StatusCode::SERVICE_UNAVAILABLE,
                "source_not_configured",
                "news source is not configured (NEWSAPI_KEY)".to_string(),
            ),
            Self::Source(e) => (StatusCode::BAD_GATEWAY, "source_error", format!("{e:#}")),
            Self::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, "internal", m),
        };
        (status, Json(json!({ "error": message, "kind": kind }))).into_response()
    }
}

/// Run CPU-bound evaluation off the async workers.
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, EvalError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(format!("evaluation task failed: {e}")))?
        .map_err(ApiError::from)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}

async fn evaluate(
    State(state): State<AppState>,
    body: Result<Json<Article>, JsonRejection>,
) -> Result<Json<Evaluation>, ApiError> {
    let Json(article) = body?;
    let ev = state.evaluator.clone();
    let evaluation = blocking(move || ev.evaluate(&article)).await?;
    Ok(Json(evaluation))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScoredArticle {
    pub article: Article,
    pub evaluation: Evaluation,
}

async fn evaluate_batch(
    State(state): State<AppState>,
    body: Result<Json<Vec<Article>>, JsonRejection>,
) -> Result<Json<Vec<ScoredArticle>>, ApiError> {
    let Json(articles) = body?;
    let ev = state.evaluator.clone();
    let scored = blocking(move || ev.evaluate_many(articles)).await?;
    Ok(Json(
        scored
            .into_iter()
            .map(|(article, evaluation)| ScoredArticle { article, evaluation })
            .collect(),
    ))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FetchAndEvaluateResp {
    pub total_articles: usize,
    pub worthy_articles: usize,
    /// Worthy articles only, in source order.
    pub results: Vec<ScoredArticle>,
}

async fn fetch_and_evaluate(
    State(state): State<AppState>,
    body: Result<Json<FetchQuery>, JsonRejection>,
) -> Result<Json<FetchAndEvaluateResp>, ApiError> {
    let Json(query) = body?;
    let source = state.source.clone().ok_or(ApiError::SourceNotConfigured)?;

    let articles = source.fetch(&query).await.map_err(|e| {
        warn!(target: "evaluator", provider = source.name(), error = ?e, "fetch failed");
        ApiError::Source(e)
    })?;
    let total_articles = articles.len();

    let ev = state.evaluator.clone();
    let scored = blocking(move || ev.evaluate_many(articles)).await?;
    let results: Vec<ScoredArticle> = scored
        .into_iter()
        .filter(|(_, e)| e.is_worthy)
        .map(|(article, evaluation)| ScoredArticle { article, evaluation })
        .collect();

    info!(
        target: "evaluator",
        provider = source.name(),
        total_articles,
        worthy_articles = results.len(),
        "fetch-and-evaluate done"
    );
    Ok(Json(FetchAndEvaluateResp {
        total_articles,
        worthy_articles: results.len(),
        results,
    }))
}
