use crate::models::{Document, TextStats};
use crate::structure::parse_headings;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const SAMPLE_UNIQUE_WORDS: usize = 10;
const WORD_EDGE_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':'];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComparisonStatistics {
    pub doc1: TextStats,
    pub doc2: TextStats,
    /// Word-count ratio of the first document to the second; absent when the
    /// second has no words.
    pub size_ratio: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentSimilarity {
    pub common_words_count: usize,
    pub unique_to_doc1_count: usize,
    pub unique_to_doc2_count: usize,
    pub similarity_ratio: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StructureComparison {
    pub doc1_headers: Vec<String>,
    pub doc2_headers: Vec<String>,
    pub common_headers: Vec<String>,
    pub unique_headers_doc1: Vec<String>,
    pub unique_headers_doc2: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UniqueWordSample {
    pub doc1: Vec<String>,
    pub doc2: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComparisonReport {
    pub document1: String,
    pub document2: String,
    pub statistics: ComparisonStatistics,
    pub content_similarity: ContentSimilarity,
    pub structure_comparison: StructureComparison,
    pub sample_unique_words: UniqueWordSample,
}

pub fn compare_documents(first: &Document, second: &Document) -> ComparisonReport {
    let first_stats = first.stats();
    let second_stats = second.stats();
    let size_ratio = (second_stats.words > 0)
        .then(|| first_stats.words as f64 / second_stats.words as f64);

    let first_words = word_set(&first.text);
    let second_words = word_set(&second.text);
    let common = first_words.intersection(&second_words).count();
    let union = first_words.union(&second_words).count();
    let unique_first: Vec<&String> = first_words.difference(&second_words).collect();
    let unique_second: Vec<&String> = second_words.difference(&first_words).collect();

    let first_headers = heading_titles(&first.text);
    let second_headers = heading_titles(&second.text);
    let first_header_set: BTreeSet<&String> = first_headers.iter().collect();
    let second_header_set: BTreeSet<&String> = second_headers.iter().collect();

    ComparisonReport {
        document1: first.id.clone(),
        document2: second.id.clone(),
        statistics: ComparisonStatistics {
            doc1: first_stats,
            doc2: second_stats,
            size_ratio,
        },
        content_similarity: ContentSimilarity {
            common_words_count: common,
            unique_to_doc1_count: unique_first.len(),
            unique_to_doc2_count: unique_second.len(),
            similarity_ratio: if union == 0 {
                0.0
            } else {
                common as f64 / union as f64
            },
        },
        structure_comparison: StructureComparison {
            common_headers: owned(first_header_set.intersection(&second_header_set).copied()),
            unique_headers_doc1: owned(first_header_set.difference(&second_header_set).copied()),
            unique_headers_doc2: owned(second_header_set.difference(&first_header_set).copied()),
            doc1_headers: first_headers,
            doc2_headers: second_headers,
        },
        sample_unique_words: UniqueWordSample {
            doc1: owned(unique_first.into_iter().take(SAMPLE_UNIQUE_WORDS)),
            doc2: owned(unique_second.into_iter().take(SAMPLE_UNIQUE_WORDS)),
        },
    }
}

/// Lowercased whitespace tokens with edge punctuation trimmed. A token made
/// only of punctuation becomes the empty word and still counts.
fn word_set(text: &str) -> BTreeSet<String> {
    text.split_whitespace()
        .map(|token| token.to_lowercase().trim_matches(WORD_EDGE_PUNCTUATION).to_string())
        .collect()
}

fn heading_titles(text: &str) -> Vec<String> {
    parse_headings(text).into_iter().map(|heading| heading.title).collect()
}

fn owned<'a>(items: impl Iterator<Item = &'a String>) -> Vec<String> {
    items.cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_documents_are_fully_similar() {
        let document = Document::new("same.md", "# Intro\nHello world.\n# Setup\nRun it.");
        let report = compare_documents(&document, &document);
        assert_eq!(report.statistics.size_ratio, Some(1.0));
        assert_eq!(report.content_similarity.similarity_ratio, 1.0);
        assert_eq!(report.content_similarity.unique_to_doc1_count, 0);
        assert_eq!(report.content_similarity.unique_to_doc2_count, 0);
        assert!(report.structure_comparison.unique_headers_doc1.is_empty());
        assert!(report.sample_unique_words.doc2.is_empty());
        assert_eq!(
            report.structure_comparison.common_headers,
            vec!["Intro".to_string(), "Setup".to_string()]
        );
    }

    #[test]
    fn differences_are_counted_and_sampled() {
        let first = Document::new("a.md", "# Setup\nAlpha, beta! Gamma.");
        let second = Document::new("b.md", "# Usage\nbeta delta");
        let report = compare_documents(&first, &second);

        // {#, setup, alpha, beta, gamma} vs {#, usage, beta, delta}
        assert_eq!(report.content_similarity.common_words_count, 2);
        assert_eq!(report.content_similarity.unique_to_doc1_count, 3);
        assert_eq!(report.content_similarity.unique_to_doc2_count, 2);
        assert!((report.content_similarity.similarity_ratio - 2.0 / 7.0).abs() < 1e-12);
        assert_eq!(
            report.sample_unique_words.doc1,
            vec!["alpha".to_string(), "gamma".to_string(), "setup".to_string()]
        );
        assert_eq!(report.structure_comparison.unique_headers_doc2, vec!["Usage".to_string()]);
        assert_eq!(report.statistics.size_ratio, Some(5.0 / 4.0));
    }

    #[test]
    fn punctuation_only_tokens_count_as_the_empty_word() {
        let first = Document::new("a.md", "Wait ... done");
        let second = Document::new("b.md", "done");
        let report = compare_documents(&first, &second);

        assert_eq!(report.content_similarity.common_words_count, 1);
        assert_eq!(report.content_similarity.unique_to_doc1_count, 2);
        assert!((report.content_similarity.similarity_ratio - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(report.sample_unique_words.doc1, vec![String::new(), "wait".to_string()]);
    }

    #[test]
    fn empty_second_document_has_no_ratio() {
        let report = compare_documents(&Document::new("a.md", "words here"), &Document::new("b.md", ""));
        assert_eq!(report.statistics.size_ratio, None);

        let empty = compare_documents(&Document::new("a.md", ""), &Document::new("b.md", ""));
        assert_eq!(empty.content_similarity.similarity_ratio, 0.0);
    }
}
