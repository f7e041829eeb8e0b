//! article.rs — Input article, metric set and the final evaluation record.
//!
//! `MetricSet` is a fixed-shape record: every score is computed or the evaluation fails as a
//! whole, so no partially filled metric set is ever published.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn default_language() -> String {
    "eng".to_string()
}

/// Coarse place reference attached by the article source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// e.g. "place", "country"
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Person,
    Organization,
    Location,
    Misc,
}

/// A named entity as (surface form, kind).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub kind: EntityKind,
}

impl Entity {
    pub fn new(text: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}

/// A news article as handed to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub content: String,
    pub source: String,
    pub published_date: DateTime<Utc>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    /// Filled by the engine; ignored on input.
    #[serde(default, skip_deserializing)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub location: Option<Location>,
}

impl Article {
    /// Minimal constructor; optional fields start empty and language defaults to "eng".
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        source: impl Into<String>,
        published_date: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            source: source.into(),
            published_date,
            author: None,
            url: None,
            categories: Vec::new(),
            entities: Vec::new(),
            image_url: None,
            language: default_language(),
            location: None,
        }
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
}

/// The seven evaluation dimensions. Scores are in [0,1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSet {
    pub named_entities_count: usize,
    pub fact_density_score: f32,
    pub novelty_score: f32,
    pub analytical_depth_score: f32,
    pub readability_score: f32,
    pub topic_relevance_score: f32,
    pub sentiment_score: f32,
}

/// Final verdict for one article. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub article_id: Uuid,
    pub overall_score: f32,
    pub is_worthy: bool,
    pub metrics: MetricSet,
    pub evaluation_timestamp: DateTime<Utc>,
    pub confidence_score: f32,
    /// Priority order: callers may show only the first N.
    #[serde(default)]
    pub reasons: Vec<String>,
}
