// src/analyze/readability.rs
//! Readability Scorer: Flesch Reading Ease rescaled to [0,1] (higher = easier).
//! Informational only; never gates a verdict.

use crate::analyze::normalize::NormalizedText;

pub fn readability(text: &NormalizedText) -> f32 {
    let words = text.word_count();
    let sentences = text.sentence_count().max(1);
    if words == 0 {
        return 0.0;
    }
    let syllables: usize = text.tokens.iter().map(|t| count_syllables(&t.lower)).sum();

    let fre = 206.835
        - 1.015 * (words as f32 / sentences as f32)
        - 84.6 * (syllables as f32 / words as f32);
    (fre.clamp(0.0, 100.0)) / 100.0
}

/// Vowel-group heuristic; silent trailing "e" dropped, minimum one per word.
pub fn count_syllables(word: &str) -> usize {
    let w: Vec<char> = word
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect();
    if w.is_empty() {
        // numbers and symbols read as one unit
        return 1;
    }

    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
    let mut groups = 0usize;
    let mut prev_vowel = false;
    for &c in &w {
        let v = is_vowel(c);
        if v && !prev_vowel {
            groups += 1;
        }
        prev_vowel = v;
    }

    let n = w.len();
    if n > 2 && w[n - 1] == 'e' && w[n - 2] != 'l' && !is_vowel(w[n - 2]) && groups > 1 {
        groups -= 1;
    }
    groups.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::normalize::normalize;

    #[test]
    fn syllable_heuristic() {
        assert_eq!(count_syllables("cat"), 1);
        assert_eq!(count_syllables("make"), 1);
        assert_eq!(count_syllables("table"), 2);
        assert_eq!(count_syllables("analysis"), 4);
        assert_eq!(count_syllables("2024"), 1);
    }

    #[test]
    fn simple_prose_beats_dense_prose() {
        let easy = readability(&normalize("The cat sat on the mat. It was a good day.").unwrap());
        let hard = readability(
            &normalize(
                "Macroeconomic considerations notwithstanding, institutional investors \
                 systematically reallocated considerable capital toward infrastructure securitization instruments.",
            )
            .unwrap(),
        );
        assert!(easy > 0.8, "easy={easy}");
        assert!(hard < 0.2, "hard={hard}");
        assert!((0.0..=1.0).contains(&easy) && (0.0..=1.0).contains(&hard));
    }
}
