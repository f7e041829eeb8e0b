// src/analyze/normalize.rs
//! Text Normalizer: cleans raw article content and segments it into sentences and word tokens.
//! Every extractor reads the same `NormalizedText`.
//!
//! Cleaning: HTML entity decode → tag strip → typographic quotes to ASCII → whitespace collapse.
//! Paragraph breaks survive as a single `\n` and always end a sentence.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::ops::Range;

use crate::error::{EvalError, Result};

static RE_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)</?[a-z][^>]*>").expect("tag regex"));
static RE_PARAGRAPH: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").expect("paragraph regex"));
static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));
static RE_TERMINATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[.!?]+["')\]]*(?:\s+|$)"#).expect("terminator regex"));
static RE_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?u)\b\w+(?:'\w+)*\b").expect("word regex"));
static RE_INITIALISM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[a-z]\.)+[a-z]$").expect("initialism regex"));

/// Words ending in "." that do not close a sentence.
static ABBREVIATIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "mt", "gen", "gov", "sen", "rep",
        "sgt", "col", "lt", "capt", "rev", "inc", "corp", "ltd", "co", "plc", "bros", "vs",
        "etc", "approx", "no", "fig", "jan", "feb", "mar", "apr", "jun", "jul", "aug", "sep",
        "sept", "oct", "nov", "dec",
    ]
    .into_iter()
    .collect()
});

/// Function words ignored by keyword and entity heuristics.
static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and",
        "any", "are", "as", "at", "be", "because", "been", "before", "being", "below",
        "between", "both", "but", "by", "can", "could", "did", "do", "does", "doing", "down",
        "during", "each", "few", "for", "from", "further", "had", "has", "have", "having", "he",
        "her", "here", "hers", "herself", "him", "himself", "his", "how", "however", "i", "if",
        "in", "into", "is", "it", "its", "itself", "just", "last", "less", "may", "me",
        "meanwhile", "might", "more", "most", "much", "must", "my", "new", "no", "nor", "not",
        "now", "of", "off", "on", "once", "one", "only", "or", "other", "our", "ours", "out",
        "over", "own", "said", "same", "says", "she", "should", "since", "so", "some", "still",
        "such", "than", "that", "the", "their", "theirs", "them", "then", "there", "these",
        "they", "this", "those", "through", "to", "too", "two", "under", "until", "up", "upon",
        "us", "very", "was", "we", "were", "what", "when", "where", "whether", "which", "while",
        "who", "whom", "why", "will", "with", "would", "year", "years", "yet", "you", "your",
    ]
    .into_iter()
    .collect()
});

pub fn is_stopword(lower: &str) -> bool {
    STOPWORDS.contains(lower)
}

/// A word token with byte span into `NormalizedText::text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub lower: String,
    pub start: usize,
    pub end: usize,
    pub sentence: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    pub start: usize,
    pub end: usize,
    /// Indices into `NormalizedText::tokens`.
    pub tokens: Range<usize>,
}

#[derive(Debug, Clone)]
pub struct NormalizedText {
    pub text: String,
    pub sentences: Vec<Sentence>,
    pub tokens: Vec<Token>,
}

impl NormalizedText {
    pub fn word_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    pub fn sentence_text(&self, s: &Sentence) -> &str {
        &self.text[s.start..s.end]
    }

    pub fn sentence_tokens(&self, s: &Sentence) -> &[Token] {
        &self.tokens[s.tokens.clone()]
    }
}

/// Clean raw content: decode entities, strip tags, fold quotes, collapse whitespace.
pub fn clean_text(raw: &str) -> String {
    let decoded = html_escape::decode_html_entities(raw).to_string();
    let stripped = RE_TAGS.replace_all(&decoded, " ");
    let folded = stripped
        .replace("\r\n", "\n")
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    RE_PARAGRAPH
        .split(&folded)
        .map(|p| RE_WS.replace_all(p, " ").trim().to_string())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// True when the cleaned content holds at least one word token.
pub fn has_words(raw: &str) -> bool {
    RE_WORD.is_match(&clean_text(raw))
}

/// Normalize and segment. Empty content is an `InvalidInput` error; short content is not.
pub fn normalize(raw: &str) -> Result<NormalizedText> {
    let text = clean_text(raw);
    if text.is_empty() {
        return Err(EvalError::InvalidInput("article content is empty".into()));
    }

    let spans = sentence_spans(&text);
    let mut tokens = Vec::new();
    let mut sentences = Vec::with_capacity(spans.len());
    let mut si = 0usize;
    let mut first = 0usize;

    for m in RE_WORD.find_iter(&text) {
        // Advance to the sentence containing this token; gaps belong to the previous one.
        while si + 1 < spans.len() && m.start() >= spans[si + 1].start {
            sentences.push(Sentence {
                start: spans[si].start,
                end: spans[si].end,
                tokens: first..tokens.len(),
            });
            first = tokens.len();
            si += 1;
        }
        let word = m.as_str();
        tokens.push(Token {
            text: word.to_string(),
            lower: word.to_lowercase(),
            start: m.start(),
            end: m.end(),
            sentence: si,
        });
    }
    while si < spans.len() {
        sentences.push(Sentence {
            start: spans[si].start,
            end: spans[si].end,
            tokens: first..tokens.len(),
        });
        first = tokens.len();
        si += 1;
    }

    if tokens.is_empty() {
        return Err(EvalError::InvalidInput(
            "article content contains no words".into(),
        ));
    }

    Ok(NormalizedText {
        text,
        sentences,
        tokens,
    })
}

fn sentence_spans(text: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut base = 0usize;
    for para in text.split('\n') {
        split_paragraph(para, base, &mut spans);
        base += para.len() + 1;
    }
    spans
}

fn split_paragraph(para: &str, base: usize, out: &mut Vec<Range<usize>>) {
    let mut start = 0usize;
    for m in RE_TERMINATOR.find_iter(para) {
        if !is_boundary(para, start, m.start(), m.end()) {
            continue;
        }
        push_span(para, base, start..m.end(), out);
        start = m.end();
    }
    push_span(para, base, start..para.len(), out);
}

fn push_span(para: &str, base: usize, r: Range<usize>, out: &mut Vec<Range<usize>>) {
    let s = &para[r.clone()];
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return;
    }
    let lead = s.len() - s.trim_start().len();
    let start = base + r.start + lead;
    out.push(start..start + trimmed.len());
}

/// A terminator ends a sentence unless it follows an abbreviation/initial or the next
/// word starts lower-case.
fn is_boundary(para: &str, sent_start: usize, term_start: usize, after: usize) -> bool {
    if let Some(next) = para[after..].chars().next() {
        if next.is_lowercase() {
            return false;
        }
    }

    if !para[term_start..].starts_with('.') || para[term_start..].starts_with("..") {
        return true;
    }

    let last_word = para[sent_start..term_start]
        .split_whitespace()
        .last()
        .unwrap_or("")
        .trim_start_matches(['"', '\'', '(', '['])
        .to_lowercase();

    if last_word.chars().count() == 1 && last_word.chars().all(char::is_alphabetic) {
        return false;
    }
    !(ABBREVIATIONS.contains(last_word.as_str()) || RE_INITIALISM.is_match(&last_word))
}
