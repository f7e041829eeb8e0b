// src/ingest/mod.rs
//! Article sources feeding the evaluator. Sources only fetch and map; they never score.

pub mod news_api;

use anyhow::Result;
use chrono::{DateTime, Utc};
use metrics::{describe_counter, describe_histogram};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::article::Article;

pub use news_api::NewsApiClient;

/// One-time metrics registration (so series show up on /metrics).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "news_api_articles_total",
            "Articles mapped from news source responses."
        );
        describe_counter!(
            "news_api_skipped_total",
            "Raw results dropped during mapping (no body or no usable date)."
        );
        describe_counter!("news_api_errors_total", "News source request/decode errors.");
        describe_histogram!("news_api_fetch_ms", "News source page fetch time in milliseconds.");
    });
}

/// Search criteria for a fetch. Empty lists mean "no filter"; an empty `languages` list falls
/// back to the configured default language.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchQuery {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub from_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub to_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub source_locations: Vec<String>,
    /// Falls back to the configured articles limit.
    #[serde(default)]
    pub limit: Option<usize>,
}

#[async_trait::async_trait]
pub trait ArticleSource: Send + Sync {
    async fn fetch(&self, query: &FetchQuery) -> Result<Vec<Article>>;
    fn name(&self) -> &'static str;
}
