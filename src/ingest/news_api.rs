// src/ingest/news_api.rs
//! NewsAPI.ai `getArticles` client.
//!
//! Pages through results (`articlesPage`, at most 100 per page) until the requested limit is
//! reached or the service runs out of results, then maps raw results onto `Article`. Results
//! without a parseable date, or whose body has no words once markup is stripped, are dropped
//! here so one bad result cannot fail the whole batch.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use metrics::{counter, histogram};
use serde::Deserialize;
use serde_json::Value;
use std::future::Future;
use tracing::{debug, warn};

use crate::analyze::normalize::has_words;
use crate::article::{Article, Location};
use crate::config::NewsApiSettings;
use crate::ingest::{ensure_metrics_described, ArticleSource, FetchQuery};

/// Service-side cap on `articlesCount`.
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Default, Deserialize)]
pub struct RawResponse {
    #[serde(default)]
    articles: Option<RawArticles>,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawArticles {
    #[serde(default)]
    pub results: Vec<RawArticle>,
    /// Total number of pages available for the query, when reported.
    #[serde(default)]
    pub pages: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArticle {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    source: Option<RawSource>,
    #[serde(default)]
    date_time: Option<String>,
    #[serde(default)]
    date_time_pub: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    authors: Vec<RawAuthor>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    categories: Vec<RawCategory>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default, alias = "lang")]
    language: Option<String>,
    #[serde(default)]
    location: Option<RawLocation>,
}

#[derive(Debug, Default, Deserialize)]
struct RawSource {
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawAuthor {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawCategory {
    #[serde(default)]
    label: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawLocation {
    #[serde(default, rename = "type")]
    kind: Option<String>,
    /// Plain string or a `{lang: text}` map.
    #[serde(default)]
    label: Option<Value>,
    #[serde(default)]
    country: Option<RawCountry>,
}

#[derive(Debug, Default, Deserialize)]
struct RawCountry {
    #[serde(default)]
    label: Option<Value>,
}

fn label_text(v: &Value) -> Option<String> {
    let s = match v {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => map
            .get("eng")
            .and_then(Value::as_str)
            .or_else(|| map.values().find_map(Value::as_str)),
        _ => None,
    }?;
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS` (taken as UTC) or a bare date.
pub fn parse_date_time(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(ndt.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| ndt.and_utc())
}

impl RawArticle {
    fn published(&self) -> Option<DateTime<Utc>> {
        [&self.date_time, &self.date_time_pub, &self.date]
            .into_iter()
            .flatten()
            .find_map(|s| parse_date_time(s))
    }

    /// `None` when the result cannot be evaluated (no words in the body or no date).
    pub fn into_article(self) -> Option<Article> {
        let published_date = self.published()?;
        let content = non_empty(self.body).filter(|b| has_words(b))?;

        let author = non_empty(self.author).or_else(|| {
            let names: Vec<String> = self
                .authors
                .into_iter()
                .filter_map(|a| non_empty(a.name))
                .collect();
            (!names.is_empty()).then(|| names.join(", "))
        });

        let location = self.location.map(|l| Location {
            label: l.label.as_ref().and_then(label_text),
            country: l
                .country
                .and_then(|c| c.label)
                .as_ref()
                .and_then(label_text),
            kind: non_empty(l.kind),
        });

        let mut article = Article::new(
            self.title.unwrap_or_default().trim(),
            content,
            self.source
                .and_then(|s| s.title)
                .unwrap_or_default()
                .trim(),
            published_date,
        )
        .with_categories(self.categories.into_iter().filter_map(|c| non_empty(c.label)));
        article.author = author;
        article.url = non_empty(self.url);
        article.image_url = non_empty(self.image);
        if let Some(lang) = non_empty(self.language) {
            article.language = lang;
        }
        article.location = location;
        Some(article)
    }
}

/// Map raw results, dropping the ones that cannot be evaluated.
pub fn map_results(results: Vec<RawArticle>) -> Vec<Article> {
    ensure_metrics_described();
    let total = results.len();
    let out: Vec<Article> = results
        .into_iter()
        .filter_map(RawArticle::into_article)
        .collect();
    let skipped = total - out.len();
    if skipped > 0 {
        counter!("news_api_skipped_total").increment(skipped as u64);
        debug!(target: "evaluator", skipped, "dropped results without words in the body or a date");
    }
    counter!("news_api_articles_total").increment(out.len() as u64);
    out
}

/// Decode one response body. A service-level `error` field is an error even on HTTP 200.
pub fn parse_page(body: &str) -> Result<RawArticles> {
    let resp: RawResponse = serde_json::from_str(body).context("decoding newsapi response")?;
    if let Some(err) = resp.error {
        bail!("newsapi error: {err}");
    }
    Ok(resp.articles.unwrap_or_default())
}

/// Query parameters for one page, in the order the service documents them.
pub fn build_params(
    query: &FetchQuery,
    settings: &NewsApiSettings,
    page: usize,
    count: usize,
) -> Vec<(&'static str, String)> {
    let languages = if query.languages.is_empty() {
        settings.default_language.clone()
    } else {
        query.languages.join(",")
    };

    let mut params = vec![
        ("apiKey", settings.api_key.clone()),
        ("articlesSortBy", "date".to_string()),
        ("articlesCount", count.to_string()),
        ("articlesPage", page.to_string()),
        ("articlesSortByAsc", "false".to_string()),
        ("includeArticleCategories", "true".to_string()),
        ("includeArticleImage", "true".to_string()),
        ("includeArticleBasicInfo", "true".to_string()),
        ("includeArticleLocation", "true".to_string()),
        ("includeArticleEntities", "true".to_string()),
        ("language", languages),
    ];

    if let Some(q) = query.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        params.push(("q", q.to_string()));
    }
    if let Some(from) = query.from_date {
        params.push(("dateStart", from.format("%Y-%m-%d").to_string()));
    }
    if let Some(to) = query.to_date {
        params.push(("dateEnd", to.format("%Y-%m-%d").to_string()));
    }
    if !query.categories.is_empty() {
        params.push(("categoryUri", query.categories.join(",")));
    }
    if !query.source_locations.is_empty() {
        params.push(("sourceLocationUri", query.source_locations.join(",")));
    }
    params
}

/// Drive `fetch_page(page, count)` from page 1 until `limit` raw results were seen, a page
/// comes back short, or the reported page count is exhausted.
pub async fn collect_pages<F, Fut>(limit: usize, mut fetch_page: F) -> Result<Vec<RawArticle>>
where
    F: FnMut(usize, usize) -> Fut,
    Fut: Future<Output = Result<RawArticles>>,
{
    let mut out = Vec::new();
    let mut page = 1;
    while out.len() < limit {
        let count = (limit - out.len()).min(MAX_PAGE_SIZE);
        let batch = fetch_page(page, count).await?;
        let got = batch.results.len();
        out.extend(batch.results.into_iter().take(count));
        if got < count || batch.pages.is_some_and(|p| page >= p) {
            break;
        }
        page += 1;
    }
    Ok(out)
}

pub struct NewsApiClient {
    settings: NewsApiSettings,
    client: reqwest::Client,
}

impl NewsApiClient {
    pub fn new(settings: NewsApiSettings) -> Result<Self> {
        if !settings.is_configured() {
            bail!("NEWSAPI_KEY is not set");
        }
        ensure_metrics_described();
        let client = reqwest::Client::builder()
            .user_agent(concat!("news-worthiness/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building newsapi http client")?;
        Ok(Self { settings, client })
    }

    /// `None` when no API key is configured.
    pub fn from_env() -> Option<Self> {
        let settings = NewsApiSettings::from_env();
        if !settings.is_configured() {
            return None;
        }
        match Self::new(settings) {
            Ok(c) => Some(c),
            Err(e) => {
                warn!(target: "evaluator", error = ?e, "newsapi client unavailable");
                None
            }
        }
    }

    pub fn settings(&self) -> &NewsApiSettings {
        &self.settings
    }

    async fn fetch_page(&self, query: &FetchQuery, page: usize, count: usize) -> Result<RawArticles> {
        let t0 = std::time::Instant::now();
        let params = build_params(query, &self.settings, page, count);
        let resp = self
            .client
            .get(&self.settings.endpoint)
            .query(&params)
            .send()
            .await
            .context("newsapi http get()")?;

        let status = resp.status();
        let body = resp.text().await.context("newsapi http .text()")?;
        histogram!("news_api_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        if !status.is_success() {
            bail!("newsapi request failed ({status}): {}", truncate(&body, 200));
        }
        parse_page(&body)
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}

#[async_trait]
impl ArticleSource for NewsApiClient {
    async fn fetch(&self, query: &FetchQuery) -> Result<Vec<Article>> {
        let limit = query.limit.unwrap_or(self.settings.articles_limit);
        let raw = collect_pages(limit, |page, count| self.fetch_page(query, page, count))
            .await
            .inspect_err(|e| {
                counter!("news_api_errors_total").increment(1);
                warn!(target: "evaluator", error = ?e, provider = "newsapi", "provider http error");
            })?;
        let articles = map_results(raw);
        debug!(target: "evaluator", fetched = articles.len(), limit, "newsapi fetch done");
        Ok(articles)
    }

    fn name(&self) -> &'static str {
        "newsapi"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn settings() -> NewsApiSettings {
        NewsApiSettings {
            api_key: "k".into(),
            ..NewsApiSettings::default()
        }
    }

    fn page_of(n: usize, pages: Option<usize>) -> RawArticles {
        RawArticles {
            results: (0..n).map(|_| RawArticle::default()).collect(),
            pages,
        }
    }

    fn get<'a>(params: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        params.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str())
    }

    #[test]
    fn params_carry_filters_and_defaults() {
        let q = FetchQuery {
            query: Some(" tesla ".into()),
            from_date: Some(Utc.with_ymd_and_hms(2024, 3, 1, 15, 30, 0).unwrap()),
            categories: vec!["dmoz/Business".into(), "dmoz/Science".into()],
            ..FetchQuery::default()
        };
        let p = build_params(&q, &settings(), 2, 50);
        assert_eq!(get(&p, "apiKey"), Some("k"));
        assert_eq!(get(&p, "articlesCount"), Some("50"));
        assert_eq!(get(&p, "articlesPage"), Some("2"));
        assert_eq!(get(&p, "articlesSortByAsc"), Some("false"));
        assert_eq!(get(&p, "language"), Some("eng"));
        assert_eq!(get(&p, "q"), Some("tesla"));
        assert_eq!(get(&p, "dateStart"), Some("2024-03-01"));
        assert_eq!(get(&p, "dateEnd"), None);
        assert_eq!(get(&p, "categoryUri"), Some("dmoz/Business,dmoz/Science"));
        assert_eq!(get(&p, "sourceLocationUri"), None);
    }

    #[test]
    fn explicit_languages_are_joined() {
        let q = FetchQuery {
            languages: vec!["eng".into(), "deu".into()],
            ..FetchQuery::default()
        };
        assert_eq!(get(&build_params(&q, &settings(), 1, 10), "language"), Some("eng,deu"));
    }

    #[test]
    fn dates_accept_common_shapes() {
        let want = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(parse_date_time("2024-05-01T12:00:00Z"), Some(want));
        assert_eq!(parse_date_time("2024-05-01T14:00:00+02:00"), Some(want));
        assert_eq!(parse_date_time("2024-05-01T12:00:00"), Some(want));
        assert!(parse_date_time("2024-05-01").is_some());
        assert_eq!(parse_date_time("yesterday"), None);
    }

    #[test]
    fn service_error_field_is_an_error() {
        assert!(parse_page(r#"{"error":"Invalid API key"}"#).is_err());
        assert!(parse_page("not json").is_err());
        assert!(parse_page(r#"{}"#).unwrap().results.is_empty());
    }

    #[test]
    fn mapping_uses_fallbacks() {
        let raw: RawArticles = serde_json::from_str(
            r#"{"results":[
                {"title":"A","body":"Body text.","source":{"title":"Wire"},
                 "dateTimePub":"2024-05-01T12:00:00Z","authors":[{"name":"Jo"},{"name":"Sam"}],
                 "lang":"deu","location":{"type":"place","label":{"eng":"Berlin"},
                 "country":{"label":{"eng":"Germany"}}}},
                {"title":"no body","dateTime":"2024-05-01T12:00:00Z"},
                {"title":"no date","body":"x"}
            ]}"#,
        )
        .unwrap();
        let out = map_results(raw.results);
        assert_eq!(out.len(), 1);
        let a = &out[0];
        assert_eq!(a.source, "Wire");
        assert_eq!(a.author.as_deref(), Some("Jo, Sam"));
        assert_eq!(a.language, "deu");
        let loc = a.location.as_ref().unwrap();
        assert_eq!(loc.label.as_deref(), Some("Berlin"));
        assert_eq!(loc.country.as_deref(), Some("Germany"));
        assert_eq!(loc.kind.as_deref(), Some("place"));
    }

    #[test]
    fn markup_only_bodies_are_skipped() {
        let raw: RawArticles = serde_json::from_str(
            r#"{"results":[
                {"title":"photo","body":"<figure><img src=\"x.jpg\"></figure>","dateTime":"2024-05-01T12:00:00Z"},
                {"title":"dots","body":"...","dateTime":"2024-05-01T12:00:00Z"},
                {"title":"real","body":"<p>Talks resume in Geneva.</p>","dateTime":"2024-05-01T12:00:00Z"}
            ]}"#,
        )
        .unwrap();
        let out = map_results(raw.results);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "real");
    }

    #[tokio::test]
    async fn paginates_until_limit() {
        let mut calls = Vec::new();
        let out = collect_pages(250, |page, count| {
            calls.push((page, count));
            async move { Ok(page_of(count, None)) }
        })
        .await
        .unwrap();
        assert_eq!(out.len(), 250);
        assert_eq!(calls, vec![(1, 100), (2, 100), (3, 50)]);
    }

    #[tokio::test]
    async fn stops_on_short_page_or_last_page() {
        let mut calls = 0;
        let out = collect_pages(500, |_, _| {
            calls += 1;
            async move { Ok(page_of(30, None)) }
        })
        .await
        .unwrap();
        assert_eq!((out.len(), calls), (30, 1));

        let mut calls = 0;
        let out = collect_pages(500, |_, count| {
            calls += 1;
            async move { Ok(page_of(count, Some(2))) }
        })
        .await
        .unwrap();
        assert_eq!((out.len(), calls), (200, 2));
    }

    #[tokio::test]
    async fn page_error_propagates() {
        let res = collect_pages(10, |_, _| async { Err(anyhow::anyhow!("boom")) }).await;
        assert!(res.is_err());
    }

    #[test]
    fn client_requires_key() {
        assert!(NewsApiClient::new(NewsApiSettings::default()).is_err());
        let c = NewsApiClient::new(settings()).unwrap();
        assert_eq!(c.name(), "newsapi");
    }
}
