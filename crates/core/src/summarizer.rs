use crate::config::SummaryOptions;
use crate::normalize::statistics_text;
use crate::patterns::TextPatterns;
use crate::tokenizer::{extract_words, split_sentences, word_frequencies};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Short,
    #[default]
    Medium,
    Long,
}

impl Granularity {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "short" => Some(Granularity::Short),
            "medium" => Some(Granularity::Medium),
            "long" => Some(Granularity::Long),
            _ => None,
        }
    }

    /// Unknown names fall back to [`Granularity::Medium`]; the flag reports
    /// whether that happened.
    pub fn parse_or_default(raw: &str) -> (Self, bool) {
        match Self::parse(raw) {
            Some(granularity) => (granularity, false),
            None => (Self::default(), true),
        }
    }

    pub fn sentence_budget(&self, options: &SummaryOptions) -> usize {
        match self {
            Granularity::Short => options.short_sentences,
            Granularity::Medium => options.medium_sentences,
            Granularity::Long => options.long_sentences,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryResult {
    pub granularity: Granularity,
    pub sentences: Vec<String>,
    pub summary: String,
}

impl SummaryResult {
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

pub fn summarize_text(
    text: &str,
    granularity: Granularity,
    options: &SummaryOptions,
    patterns: &TextPatterns,
) -> SummaryResult {
    let cleaned = statistics_text(text, patterns);
    let sentences = split_sentences(&cleaned);
    if sentences.is_empty() {
        return SummaryResult {
            granularity,
            sentences: Vec::new(),
            summary: String::new(),
        };
    }

    let document_words = extract_words(&cleaned);
    let frequencies = word_frequencies(&document_words);

    let mut ranked: Vec<(usize, f64)> = sentences
        .iter()
        .enumerate()
        .map(|(index, sentence)| {
            (
                index,
                score_sentence(index, sentences.len(), sentence, &frequencies, options),
            )
        })
        .collect();
    ranked.sort_by(|left, right| right.1.total_cmp(&left.1));

    let budget = granularity.sentence_budget(options).min(sentences.len());
    let mut chosen: Vec<usize> = ranked.iter().take(budget).map(|(index, _)| *index).collect();
    chosen.sort_unstable();

    let selected: Vec<String> = chosen
        .into_iter()
        .map(|index| sentences[index].to_string())
        .collect();
    SummaryResult {
        granularity,
        summary: selected.join(" "),
        sentences: selected,
    }
}

pub fn score_sentence(
    index: usize,
    total: usize,
    sentence: &str,
    frequencies: &HashMap<&str, usize>,
    options: &SummaryOptions,
) -> f64 {
    let words = extract_words(sentence);
    let mut score: f64 = words
        .iter()
        .map(|word| frequencies.get(word.as_str()).copied().unwrap_or(0) as f64)
        .sum();

    if index < options.leading_sentences {
        score += options.leading_bonus;
    } else if index + options.trailing_sentences >= total {
        score += options.trailing_bonus;
    }

    let word_count = words.len();
    let (ideal_min, ideal_max) = options.ideal_length;
    let (acceptable_min, acceptable_max) = options.acceptable_length;
    if (ideal_min..=ideal_max).contains(&word_count) {
        score += options.ideal_length_bonus;
    } else if (acceptable_min..=acceptable_max).contains(&word_count) {
        score += options.acceptable_length_bonus;
    }

    let lowered = sentence.to_lowercase();
    let keyword_hits = options
        .importance_keywords
        .iter()
        .filter(|keyword| lowered.contains(keyword.as_str()))
        .count();
    score += keyword_hits as f64 * options.keyword_bonus;

    score / word_count.max(1) as f64
}
