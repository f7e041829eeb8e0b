//! # Evaluation Engine
//! Maps one `Article` → one `Evaluation`. No I/O, no state kept between calls.
//!
//! The per-article extractors do not depend on each other and run concurrently on the rayon
//! pool; the join before aggregation is the only synchronisation point. Model-backed
//! extractors sit behind `NamedEntityRecognizer` / `ZeroShotClassifier`, shared read-only
//! through `Arc`. Any extractor error aborts the evaluation: a published `MetricSet` is always
//! complete.

use chrono::Utc;
use metrics::{counter, histogram};
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::analyze::confidence::confidence;
use crate::analyze::depth::analytical_depth;
use crate::analyze::ner::{dedup_entities, NamedEntityRecognizer, PatternRecognizer};
use crate::analyze::normalize::normalize;
use crate::analyze::novelty::novelty_score;
use crate::analyze::readability::readability;
use crate::analyze::reasons::generate_reasons;
use crate::analyze::scoring::{aggregate, fact_density};
use crate::analyze::sentiment::SentimentAnalyzer;
use crate::analyze::topic::topic_relevance;
use crate::analyze::zero_shot::{LexicalZeroShot, ZeroShotClassifier};
use crate::article::{Article, Entity, Evaluation, MetricSet};
use crate::config::EvaluatorConfig;
use crate::error::{EvalError, Result};

const WARM_UP_TEXT: &str = "The European Central Bank said on Thursday that inflation in \
    Germany and France eased because energy prices fell 3% compared with last year.";

/// Short anonymised id for logs; raw article text is never logged.
pub(crate) fn content_id(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(text.as_bytes());
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// The bundled rule/lexicon models.
pub fn builtin_models() -> (Arc<dyn NamedEntityRecognizer>, Arc<dyn ZeroShotClassifier>) {
    (Arc::new(PatternRecognizer::new()), Arc::new(LexicalZeroShot::new()))
}

pub struct Evaluator {
    cfg: Arc<EvaluatorConfig>,
    recognizer: Arc<dyn NamedEntityRecognizer>,
    classifier: Arc<dyn ZeroShotClassifier>,
    sentiment: SentimentAnalyzer,
}

impl std::fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluator")
            .field("recognizer", &self.recognizer.name())
            .field("classifier", &self.classifier.name())
            .field("gates", &self.cfg.gates)
            .finish()
    }
}

impl Evaluator {
    /// Validates `cfg`; an invalid configuration never produces an engine.
    pub fn new(
        cfg: EvaluatorConfig,
        recognizer: Arc<dyn NamedEntityRecognizer>,
        classifier: Arc<dyn ZeroShotClassifier>,
    ) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            cfg: Arc::new(cfg),
            recognizer,
            classifier,
            sentiment: SentimentAnalyzer::new(),
        })
    }

    pub fn with_builtin_models(cfg: EvaluatorConfig) -> Result<Self> {
        let (recognizer, classifier) = builtin_models();
        Self::new(cfg, recognizer, classifier)
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.cfg
    }

    /// Load the embedded lexicons and run both models once, so load failures surface at
    /// startup rather than on the first call. A malformed lexicon panics here.
    pub fn warm_up(&self) -> Result<()> {
        crate::analyze::load_lexicons();
        let text = normalize(WARM_UP_TEXT)?;
        let entities = self.recognizer.recognize(&text)?;
        let labels = self.cfg.novelty_label_names();
        let scores = self.classifier.classify(&text.text, &labels)?;
        if scores.len() != labels.len() {
            return Err(EvalError::model(
                self.classifier.name(),
                format!("returned {} scores for {} labels", scores.len(), labels.len()),
            ));
        }
        info!(
            target: "evaluator",
            recognizer = self.recognizer.name(),
            classifier = self.classifier.name(),
            warm_up_entities = entities.len(),
            "models ready"
        );
        Ok(())
    }

    pub fn evaluate(&self, article: &Article) -> Result<Evaluation> {
        self.run(article).map(|(_, evaluation)| evaluation)
    }

    /// Like `evaluate`, but hands the article back with its entities filled in.
    pub fn evaluate_owned(&self, mut article: Article) -> Result<(Article, Evaluation)> {
        let (entities, evaluation) = self.run(&article)?;
        article.entities = entities;
        Ok((article, evaluation))
    }

    /// One result per input, in input order. The first error fails the whole batch.
    pub fn evaluate_many(&self, articles: Vec<Article>) -> Result<Vec<(Article, Evaluation)>> {
        let n = articles.len();
        let t0 = Instant::now();
        let out = articles
            .into_par_iter()
            .map(|a| self.evaluate_owned(a))
            .collect::<Result<Vec<_>>>()?;
        info!(
            target: "evaluator",
            articles = n,
            worthy = out.iter().filter(|(_, e)| e.is_worthy).count(),
            ms = t0.elapsed().as_millis() as u64,
            "batch evaluated"
        );
        Ok(out)
    }

    fn run(&self, article: &Article) -> Result<(Vec<Entity>, Evaluation)> {
        let t0 = Instant::now();
        match self.compute(article) {
            Ok((entities, evaluation)) => {
                histogram!("evaluation_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
                counter!("evaluations_total").increment(1);
                if evaluation.is_worthy {
                    counter!("evaluations_worthy_total").increment(1);
                }
                Ok((entities, evaluation))
            }
            Err(e) => {
                counter!("evaluation_errors_total", "kind" => e.kind()).increment(1);
                warn!(
                    target: "evaluator",
                    id = %content_id(&article.content),
                    error = %e,
                    "evaluation failed"
                );
                Err(e)
            }
        }
    }

    fn compute(&self, article: &Article) -> Result<(Vec<Entity>, Evaluation)> {
        let cfg = &*self.cfg;
        let text = normalize(&article.content)?;
        let words = text.word_count();
        let classifier = self.classifier.as_ref();

        let ((entities, novelty), (topic, (depth, readable, sentiment))) = rayon::join(
            || {
                rayon::join(
                    || self.recognizer.recognize(&text).map(dedup_entities),
                    || novelty_score(classifier, &text.text, &cfg.novelty_labels),
                )
            },
            || {
                rayon::join(
                    || topic_relevance(classifier, &text, &article.categories, &cfg.calibration),
                    || {
                        (
                            analytical_depth(&text, &cfg.calibration),
                            readability(&text),
                            self.sentiment.score(&text),
                        )
                    },
                )
            },
        );
        let entities = entities?;
        let novelty = novelty?;
        let topic = topic?;

        let metrics = MetricSet {
            named_entities_count: entities.len(),
            fact_density_score: fact_density(entities.len(), words, &cfg.calibration),
            novelty_score: novelty,
            analytical_depth_score: depth,
            readability_score: readable,
            topic_relevance_score: topic,
            sentiment_score: sentiment,
        };

        let verdict = aggregate(&metrics, words, cfg);
        let confidence_score = confidence(&metrics, verdict.overall_score, words, &cfg.gates);
        let has_categories = article.categories.iter().any(|c| !c.trim().is_empty());
        let reasons = generate_reasons(&metrics, &verdict, &cfg.gates, has_categories);

        debug!(
            target: "evaluator",
            id = %content_id(&article.content),
            words,
            entities = metrics.named_entities_count,
            overall = verdict.overall_score,
            worthy = verdict.is_worthy,
            confidence = confidence_score,
            "article evaluated"
        );

        let evaluation = Evaluation {
            article_id: Uuid::new_v4(),
            overall_score: verdict.overall_score,
            is_worthy: verdict.is_worthy,
            metrics,
            evaluation_timestamp: Utc::now(),
            confidence_score,
            reasons,
        };
        Ok((entities, evaluation))
    }
}
