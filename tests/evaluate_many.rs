// tests/evaluate_many.rs
//
// Batch evaluation: same count, same order, same results as one-by-one, atomic on error.

mod common;

use common::*;
use news_worthiness::{Article, EvalError};
use rand::{rngs::StdRng, Rng, SeedableRng};

const POOL: &[&str] = &[
    "The European Central Bank raised rates because inflation stayed above target.",
    "Officials in Berlin said exports fell 4 percent compared with last year.",
    "Apple and Microsoft reported higher revenue, according to quarterly filings.",
    "Residents gathered downtown on Sunday for the annual parade.",
    "Analysts at Goldman Sachs suggest the slowdown means that hiring will cool.",
    "The weather was mild and the streets were quiet.",
    "However, Toyota said supply problems led to lower output in Japan.",
    "Senator Warren criticised the plan, whereas the Treasury defended it.",
];

fn synthetic_batch(n: usize, seed: u64) -> Vec<Article> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|i| {
            let sentences = rng.random_range(1..80);
            let body: Vec<&str> = (0..sentences)
                .map(|_| POOL[rng.random_range(0..POOL.len())])
                .collect();
            let mut a = article(&format!("article-{i}"), &body.join(" "));
            if rng.random_bool(0.5) {
                a = a.with_categories(["Business", "Economy"]);
            }
            a
        })
        .collect()
}

#[test]
fn fifty_articles_keep_order_and_count() {
    let ev = builtin_evaluator();
    let batch = synthetic_batch(50, 42);
    let out = ev.evaluate_many(batch.clone()).unwrap();

    assert_eq!(out.len(), 50);
    for (i, (a, e)) in out.iter().enumerate() {
        assert_eq!(a.title, format!("article-{i}"));
        assert_eq!(a.content, batch[i].content);
        assert_eq!(a.entities.len(), e.metrics.named_entities_count);
        for s in [
            e.overall_score,
            e.confidence_score,
            e.metrics.fact_density_score,
            e.metrics.novelty_score,
            e.metrics.analytical_depth_score,
            e.metrics.readability_score,
            e.metrics.topic_relevance_score,
            e.metrics.sentiment_score,
        ] {
            assert!((0.0..=1.0).contains(&s), "article-{i}: {s}");
        }
        assert!(!e.reasons.is_empty());
    }
}

#[test]
fn batch_matches_single_evaluations() {
    let ev = builtin_evaluator();
    let batch = synthetic_batch(20, 7);
    let many = ev.evaluate_many(batch.clone()).unwrap();
    for (a, (_, e)) in batch.iter().zip(&many) {
        let single = ev.evaluate(a).unwrap();
        assert_eq!(single.metrics, e.metrics);
        assert_eq!(single.is_worthy, e.is_worthy);
        assert_eq!(single.reasons, e.reasons);
    }
}

#[test]
fn one_bad_article_fails_the_batch() {
    let ev = builtin_evaluator();
    let mut batch = synthetic_batch(10, 3);
    batch[6].content = String::new();
    let err = ev.evaluate_many(batch).unwrap_err();
    assert!(matches!(err, EvalError::InvalidInput(_)));
}

#[test]
fn empty_batch_is_empty() {
    assert!(builtin_evaluator().evaluate_many(Vec::new()).unwrap().is_empty());
}
