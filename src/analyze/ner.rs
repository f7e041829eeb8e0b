// src/analyze/ner.rs
//! Entity Extractor.
//!
//! `NamedEntityRecognizer` is the capability the engine depends on; any model runtime can sit
//! behind it. The bundled `PatternRecognizer` finds capitalised spans and acronyms and types them
//! with a small gazetteer (`lexicon/gazetteer.json`): person titles, organisation suffixes,
//! well-known organisations and places.
//!
//! Whatever the recognizer returns, the engine deduplicates with `dedup_entities`
//! (case-insensitive surface form + kind), so `named_entities_count` never counts repeats.

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashSet;

use crate::analyze::normalize::{is_stopword, NormalizedText, Token};
use crate::article::{Entity, EntityKind};
use crate::error::Result;

pub trait NamedEntityRecognizer: Send + Sync {
    fn recognize(&self, text: &NormalizedText) -> Result<Vec<Entity>>;
    /// Model name for logs and error messages.
    fn name(&self) -> &'static str;
}

#[derive(Debug, Deserialize)]
struct GazetteerFile {
    locations: Vec<String>,
    organizations: Vec<String>,
    person_titles: Vec<String>,
    org_suffixes: Vec<String>,
    ignore: Vec<String>,
}

#[derive(Debug)]
struct Gazetteer {
    locations: HashSet<String>,
    organizations: HashSet<String>,
    person_titles: HashSet<String>,
    org_suffixes: HashSet<String>,
    ignore: HashSet<String>,
}

static GAZETTEER: Lazy<Gazetteer> = Lazy::new(|| {
    let raw = include_str!("../../lexicon/gazetteer.json");
    let f: GazetteerFile = serde_json::from_str(raw).expect("valid gazetteer");
    let set = |v: Vec<String>| v.into_iter().map(|s| s.to_lowercase()).collect::<HashSet<_>>();
    Gazetteer {
        locations: set(f.locations),
        organizations: set(f.organizations),
        person_titles: set(f.person_titles),
        org_suffixes: set(f.org_suffixes),
        ignore: set(f.ignore),
    }
});

pub(crate) fn load_gazetteer() {
    Lazy::force(&GAZETTEER);
}

#[cfg(test)]
pub(crate) fn gazetteer_loaded() -> bool {
    Lazy::get(&GAZETTEER).is_some()
}

/// Lower-case words allowed inside a capitalised span ("Bank of England").
const CONNECTORS: &[&str] = &["of", "the", "for", "de", "la", "du", "von", "van", "del", "der", "al"];

/// Keep the first surface form of each (lower-cased surface, kind) pair, in input order.
pub fn dedup_entities(entities: Vec<Entity>) -> Vec<Entity> {
    let mut seen = HashSet::new();
    entities
        .into_iter()
        .filter(|e| !e.text.trim().is_empty())
        .filter(|e| seen.insert((e.text.trim().to_lowercase(), e.kind)))
        .collect()
}

/// Rule-based recognizer over capitalised spans.
#[derive(Debug, Clone, Default)]
pub struct PatternRecognizer;

impl PatternRecognizer {
    pub fn new() -> Self {
        Self
    }
}

impl NamedEntityRecognizer for PatternRecognizer {
    fn recognize(&self, text: &NormalizedText) -> Result<Vec<Entity>> {
        let g = &*GAZETTEER;
        let mut out = Vec::new();

        for sentence in &text.sentences {
            let toks = text.sentence_tokens(sentence);
            let mut i = 0usize;
            while i < toks.len() {
                if !starts_upper(&toks[i]) {
                    i += 1;
                    continue;
                }
                let run_end = extend_run(&text.text, toks, i);
                if let Some(e) = classify_run(&text.text, toks, i, run_end, g) {
                    out.push(e);
                }
                i = run_end;
            }
        }

        Ok(out)
    }

    fn name(&self) -> &'static str {
        "pattern-ner"
    }
}

fn starts_upper(t: &Token) -> bool {
    t.text.chars().next().is_some_and(char::is_uppercase)
}

fn is_acronym(t: &Token) -> bool {
    let n = t.text.chars().count();
    (2..=6).contains(&n) && t.text.chars().all(|c| c.is_ascii_uppercase())
}

fn is_initial(t: &Token) -> bool {
    t.text.chars().count() == 1 && starts_upper(t)
}

/// Tokens `a` and `b` are adjacent if only whitespace (or `&`, or the dot of an initial)
/// separates them.
fn adjacent(text: &str, a: &Token, b: &Token) -> bool {
    let gap = text[a.end..b.start].trim();
    gap.is_empty() || gap == "&" || (gap == "." && is_initial(a))
}

/// Returns the exclusive end index of the capitalised run starting at `start`.
fn extend_run(text: &str, toks: &[Token], start: usize) -> usize {
    let mut end = start + 1;
    while end < toks.len() {
        let prev = &toks[end - 1];
        let cur = &toks[end];
        if !adjacent(text, prev, cur) {
            break;
        }
        if starts_upper(cur) {
            end += 1;
            continue;
        }
        // Connector only if a capitalised token follows it directly.
        let bridged = CONNECTORS.contains(&cur.lower.as_str())
            && toks
                .get(end + 1)
                .is_some_and(|next| starts_upper(next) && adjacent(text, cur, next));
        if bridged {
            end += 2;
        } else {
            break;
        }
    }
    end
}

fn classify_run(
    text: &str,
    toks: &[Token],
    start: usize,
    end: usize,
    g: &Gazetteer,
) -> Option<Entity> {
    let mut s = start;
    let mut e = end;

    // Leading function words ("The", "But") and titles are not part of the name.
    let mut titled = s > 0 && g.person_titles.contains(&toks[s - 1].lower);
    while s < e && !is_acronym(&toks[s]) {
        let lower = toks[s].lower.as_str();
        if g.person_titles.contains(lower) {
            titled = true;
            s += 1;
        } else if is_stopword(lower) || g.ignore.contains(lower) {
            s += 1;
        } else {
            break;
        }
    }
    while e > s && CONNECTORS.contains(&toks[e - 1].lower.as_str()) {
        e -= 1;
    }
    if s >= e {
        return None;
    }

    let span = &toks[s..e];
    let len = span.len();
    if len == 1 && (is_initial(&span[0]) || g.ignore.contains(&span[0].lower)) {
        return None;
    }

    let surface = text[span[0].start..span[len - 1].end]
        .trim_end_matches("'s")
        .to_string();
    let lower = surface.to_lowercase();

    let known_location = g.locations.contains(&lower);
    let known_org = g.organizations.contains(&lower);

    // A lone capitalised word opening a sentence is usually just a capitalised word.
    let sentence_initial = s == 0 && !titled;
    if len == 1 && sentence_initial && !is_acronym(&span[0]) && !known_location && !known_org {
        return None;
    }

    let has_org_suffix = span.iter().any(|t| g.org_suffixes.contains(&t.lower));
    let plain_words = span
        .iter()
        .all(|t| t.text.chars().all(char::is_alphabetic) && !is_acronym(t));

    let kind = if known_location {
        EntityKind::Location
    } else if known_org || has_org_suffix {
        EntityKind::Organization
    } else if titled {
        EntityKind::Person
    } else if len == 1 && is_acronym(&span[0]) {
        EntityKind::Organization
    } else if (2..=3).contains(&len) && plain_words {
        EntityKind::Person
    } else {
        EntityKind::Misc
    };

    Some(Entity::new(surface, kind))
}
