// src/config/news_api.rs
//! NewsAPI.ai connection settings, read from the environment (`.env` is loaded by `main`).

use serde::{Deserialize, Serialize};
use std::env;

pub const DEFAULT_NEWSAPI_ENDPOINT: &str = "https://api.newsapi.ai/api/v1/article/getArticles";
pub const DEFAULT_LANGUAGE: &str = "eng";
pub const DEFAULT_ARTICLES_LIMIT: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsApiSettings {
    /// Empty means "not configured".
    pub api_key: String,
    pub endpoint: String,
    pub default_language: String,
    pub articles_limit: usize,
}

impl Default for NewsApiSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: DEFAULT_NEWSAPI_ENDPOINT.to_string(),
            default_language: DEFAULT_LANGUAGE.to_string(),
            articles_limit: DEFAULT_ARTICLES_LIMIT,
        }
    }
}

impl NewsApiSettings {
    /// NEWSAPI_KEY, NEWSAPI_ENDPOINT, DEFAULT_LANGUAGE, ARTICLES_LIMIT.
    /// Unparseable or empty values fall back to defaults.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            api_key: env::var("NEWSAPI_KEY").unwrap_or_default().trim().to_string(),
            endpoint: non_empty_env("NEWSAPI_ENDPOINT").unwrap_or(d.endpoint),
            default_language: non_empty_env("DEFAULT_LANGUAGE").unwrap_or(d.default_language),
            articles_limit: non_empty_env("ARTICLES_LIMIT")
                .and_then(|s| s.parse::<usize>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(d.articles_limit),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[serial_test::serial]
    #[test]
    fn env_overrides_and_fallbacks() {
        env::set_var("NEWSAPI_KEY", " secret ");
        env::set_var("ARTICLES_LIMIT", "not-a-number");
        env::remove_var("NEWSAPI_ENDPOINT");
        env::set_var("DEFAULT_LANGUAGE", "deu");

        let s = NewsApiSettings::from_env();
        assert_eq!(s.api_key, "secret");
        assert!(s.is_configured());
        assert_eq!(s.articles_limit, DEFAULT_ARTICLES_LIMIT);
        assert_eq!(s.endpoint, DEFAULT_NEWSAPI_ENDPOINT);
        assert_eq!(s.default_language, "deu");

        env::remove_var("NEWSAPI_KEY");
        env::remove_var("ARTICLES_LIMIT");
        env::remove_var("DEFAULT_LANGUAGE");
        assert!(!NewsApiSettings::from_env().is_configured());
    }
}
