use crate::config::SearchOptions;
use crate::models::Document;
use crate::snippet::{contains_chars, fold, fold_to_string, truncate_chars, FoldedText};
use crate::tokenizer::{extract_words, split_search_units, word_frequencies};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchType {
    ExactPhrase,
    WordOverlap { matched: usize, total: usize },
}

impl MatchType {
    pub fn label(&self) -> String {
        match self {
            MatchType::ExactPhrase => "exact_phrase".to_string(),
            MatchType::WordOverlap { matched, total } => format!("words_{matched}/{total}"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredMatch {
    pub document: String,
    pub snippet: String,
    pub score: f64,
    pub match_type: MatchType,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResults {
    pub query: String,
    pub total_analyzed: usize,
    pub matches: Vec<ScoredMatch>,
}

pub fn lexical_search(
    query: &str,
    documents: &[Document],
    limit: usize,
    options: &SearchOptions,
) -> Vec<ScoredMatch> {
    let phrase = fold_to_string(query);
    if phrase.trim().is_empty() {
        return Vec::new();
    }
    let phrase_chars: Vec<char> = phrase.chars().collect();
    let query_words: Vec<Vec<char>> = phrase
        .split_whitespace()
        .map(|word| word.chars().collect())
        .collect();

    let mut matches: Vec<ScoredMatch> = documents
        .par_iter()
        .map(|document| best_lexical_match(document, &phrase_chars, &query_words, options))
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect();

    sort_descending(&mut matches, |item| item.score);
    matches.truncate(limit);
    matches
}

fn best_lexical_match(
    document: &Document,
    phrase: &[char],
    query_words: &[Vec<char>],
    options: &SearchOptions,
) -> Option<ScoredMatch> {
    let text = FoldedText::new(&document.text);
    if let Some(position) = text.find(phrase, 0) {
        return Some(ScoredMatch {
            document: document.id.clone(),
            snippet: text.window(position, options.exact_snippet_radius),
            score: options.exact_phrase_score,
            match_type: MatchType::ExactPhrase,
        });
    }

    let total = query_words.len();
    let required = (total as f64 * options.min_word_overlap).max(1.0);
    let mut best: Option<ScoredMatch> = None;

    for unit in split_search_units(&document.text) {
        let folded_unit = fold(unit);
        let matched = query_words
            .iter()
            .filter(|word| contains_chars(&folded_unit, word))
            .count();
        if (matched as f64) < required {
            continue;
        }

        let trimmed = unit.trim();
        if trimmed.chars().count() <= options.min_unit_chars {
            continue;
        }

        let score = matched as f64 / total as f64 * options.partial_score_scale;
        let is_better = best.as_ref().map_or(true, |current| score > current.score);
        if is_better {
            best = Some(ScoredMatch {
                document: document.id.clone(),
                snippet: truncate_chars(trimmed, options.unit_snippet_max_chars),
                score,
                match_type: MatchType::WordOverlap { matched, total },
            });
        }
    }

    best
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeightedMatch {
    pub document: String,
    pub relevance_score: f64,
    pub context_snippets: Vec<String>,
    pub word_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeightedResults {
    pub query: String,
    pub total_analyzed: usize,
    pub results: Vec<WeightedMatch>,
}

pub fn weighted_search(
    query: &str,
    documents: &[Document],
    limit: usize,
    options: &SearchOptions,
) -> Vec<WeightedMatch> {
    let mut query_words: Vec<Vec<char>> = Vec::new();
    for word in fold_to_string(query).split_whitespace() {
        let chars: Vec<char> = word.chars().collect();
        if !query_words.contains(&chars) {
            query_words.push(chars);
        }
    }
    if query_words.is_empty() {
        return Vec::new();
    }

    let mut results: Vec<WeightedMatch> = documents
        .par_iter()
        .map(|document| weighted_match(document, &query_words, options))
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect();

    sort_descending(&mut results, |item| item.relevance_score);
    results.truncate(limit);
    results
}

fn weighted_match(
    document: &Document,
    query_words: &[Vec<char>],
    options: &SearchOptions,
) -> Option<WeightedMatch> {
    let text = FoldedText::new(&document.text);
    let mut score = 0usize;
    let mut snippets = Vec::new();

    for word in query_words {
        score += text.count(word) * word.len();
        for position in text.positions(word, options.semantic_snippets_per_word) {
            snippets.push(text.window(position, options.semantic_snippet_radius));
        }
    }

    if score == 0 {
        return None;
    }

    let word_count = document.stats().words;
    snippets.truncate(options.semantic_max_snippets);
    Some(WeightedMatch {
        document: document.id.clone(),
        relevance_score: score as f64 / word_count.max(1) as f64,
        context_snippets: snippets,
        word_count,
    })
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelatedDocument {
    pub document: String,
    pub relevance_score: f64,
    pub snippet: String,
    pub word_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelatedResults {
    pub query: String,
    pub total_analyzed: usize,
    pub related_documents: Vec<RelatedDocument>,
}

pub fn related_documents(
    query: &str,
    documents: &[Document],
    limit: usize,
    options: &SearchOptions,
) -> Vec<RelatedDocument> {
    let mut query_words = extract_words(query);
    query_words.sort_unstable();
    query_words.dedup();
    if query_words.is_empty() {
        return Vec::new();
    }

    let mut results: Vec<RelatedDocument> = documents
        .par_iter()
        .map(|document| related_match(document, &query_words, options))
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect();

    sort_descending(&mut results, |item| item.relevance_score);
    results.truncate(limit);
    results
}

fn related_match(
    document: &Document,
    query_words: &[String],
    options: &SearchOptions,
) -> Option<RelatedDocument> {
    let words = extract_words(&document.text);
    if words.is_empty() {
        return None;
    }

    let frequencies = word_frequencies(&words);
    let total = words.len() as f64;
    let score: f64 = query_words
        .iter()
        .filter_map(|word| {
            frequencies
                .get(word.as_str())
                .map(|count| *count as f64 / total * word.chars().count() as f64)
        })
        .sum();

    if score <= 0.0 {
        return None;
    }

    Some(RelatedDocument {
        document: document.id.clone(),
        relevance_score: score / (total + 1.0).ln(),
        snippet: first_occurrence_excerpt(&document.text, query_words, options.related_snippet_chars),
        word_count: words.len(),
    })
}

fn first_occurrence_excerpt(text: &str, query_words: &[String], length: usize) -> String {
    let folded = FoldedText::new(text);
    let first = query_words
        .iter()
        .filter_map(|word| folded.find(&fold(word), 0))
        .min();

    match first {
        Some(position) => folded.excerpt(position, length),
        None => truncate_chars(text, length).replace('\n', " "),
    }
}

fn sort_descending<T>(items: &mut [T], score: impl Fn(&T) -> f64) {
    items.sort_by(|left, right| score(right).total_cmp(&score(left)));
}
