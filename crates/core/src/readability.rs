use crate::normalize::statistics_text;
use crate::patterns::TextPatterns;
use crate::tokenizer::{estimate_syllables, extract_words, split_sentences};
use serde::{Deserialize, Serialize};

const FLESCH_BASE: f64 = 206.835;
const FLESCH_SENTENCE_WEIGHT: f64 = 1.015;
const FLESCH_SYLLABLE_WEIGHT: f64 = 84.6;
const GRADE_SENTENCE_WEIGHT: f64 = 0.39;
const GRADE_SYLLABLE_WEIGHT: f64 = 11.8;
const GRADE_OFFSET: f64 = 15.59;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Easy,
    Moderate,
    Difficult,
    VeryDifficult,
    Unknown,
}

impl Complexity {
    pub fn from_flesch(score: f64) -> Self {
        if score >= 70.0 {
            Complexity::Easy
        } else if score >= 50.0 {
            Complexity::Moderate
        } else if score >= 30.0 {
            Complexity::Difficult
        } else {
            Complexity::VeryDifficult
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReadabilityReport {
    pub flesch_score: f64,
    pub grade_level: f64,
    pub complexity: Complexity,
    pub avg_sentence_length: f64,
    pub avg_syllables_per_word: f64,
    pub total_sentences: usize,
    pub total_words: usize,
}

impl ReadabilityReport {
    /// Result for text with no sentences or no words.
    pub fn unknown() -> Self {
        Self {
            flesch_score: 0.0,
            grade_level: 0.0,
            complexity: Complexity::Unknown,
            avg_sentence_length: 0.0,
            avg_syllables_per_word: 0.0,
            total_sentences: 0,
            total_words: 0,
        }
    }
}

/// Flesch reading ease (clamped to 0..=100) and an estimated grade level.
/// Syllables come from [`estimate_syllables`], so scores are approximate.
pub fn analyze_readability(text: &str, patterns: &TextPatterns) -> ReadabilityReport {
    let cleaned = statistics_text(text, patterns);
    let sentence_count = split_sentences(&cleaned).len();
    let words = extract_words(&cleaned);
    if sentence_count == 0 || words.is_empty() {
        return ReadabilityReport::unknown();
    }

    let word_count = words.len();
    let syllable_count: usize = words.iter().map(|word| estimate_syllables(word)).sum();
    let avg_sentence_length = word_count as f64 / sentence_count as f64;
    let avg_syllables = syllable_count as f64 / word_count as f64;

    let flesch = (FLESCH_BASE
        - FLESCH_SENTENCE_WEIGHT * avg_sentence_length
        - FLESCH_SYLLABLE_WEIGHT * avg_syllables)
        .clamp(0.0, 100.0);
    let grade = (GRADE_SENTENCE_WEIGHT * avg_sentence_length + GRADE_SYLLABLE_WEIGHT * avg_syllables
        - GRADE_OFFSET)
        .max(1.0);

    ReadabilityReport {
        flesch_score: round_to(flesch, 1),
        grade_level: round_to(grade, 1),
        complexity: Complexity::from_flesch(flesch),
        avg_sentence_length: round_to(avg_sentence_length, 1),
        avg_syllables_per_word: round_to(avg_syllables, 2),
        total_sentences: sentence_count,
        total_words: word_count,
    }
}

fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns() -> TextPatterns {
        TextPatterns::compile().expect("patterns should compile")
    }

    #[test]
    fn simple_sentences_fixture() {
        let report = analyze_readability("The cat sat on the mat. The dog ran fast.", &patterns());
        assert_eq!(report.total_sentences, 2);
        assert_eq!(report.total_words, 6);
        assert_eq!(report.avg_sentence_length, 3.0);
        assert_eq!(report.avg_syllables_per_word, 1.0);
        assert_eq!(report.flesch_score, 100.0);
        assert_eq!(report.grade_level, 1.0);
        assert_eq!(report.complexity, Complexity::Easy);
    }

    #[test]
    fn dense_text_scores_low() {
        let text = "Comprehensive infrastructure virtualization necessitates sophisticated \
            orchestration methodologies alongside continuous organizational documentation \
            requirements and interoperability considerations.";
        let report = analyze_readability(text, &patterns());
        assert!(report.flesch_score >= 0.0 && report.flesch_score <= 100.0);
        assert_eq!(report.complexity, Complexity::VeryDifficult);
        assert!(report.grade_level > 12.0);
    }

    #[test]
    fn degenerate_input_is_unknown() {
        assert_eq!(analyze_readability("", &patterns()), ReadabilityReport::unknown());
        assert_eq!(analyze_readability("Hi. Yo.", &patterns()).complexity, Complexity::Unknown);
    }

    #[test]
    fn complexity_buckets() {
        assert_eq!(Complexity::from_flesch(70.0), Complexity::Easy);
        assert_eq!(Complexity::from_flesch(55.0), Complexity::Moderate);
        assert_eq!(Complexity::from_flesch(30.0), Complexity::Difficult);
        assert_eq!(Complexity::from_flesch(29.9), Complexity::VeryDifficult);
    }
}
