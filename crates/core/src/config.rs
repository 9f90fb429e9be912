use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub search: SearchOptions,
    pub summary: SummaryOptions,
    pub concepts: ConceptOptions,
    pub gaps: GapOptions,
    pub index: IndexOptions,
    pub io: IoOptions,
}

impl EngineConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|error| {
            EngineError::Config(format!("cannot read {}: {error}", path.display()))
        })?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.search.min_word_overlap > 0.0 && self.search.min_word_overlap <= 1.0) {
            return Err(EngineError::Config(format!(
                "search.min_word_overlap must be in (0, 1], got {}",
                self.search.min_word_overlap
            )));
        }
        if self.io.max_concurrent_reads == 0 {
            return Err(EngineError::Config(
                "io.max_concurrent_reads must be at least 1".to_string(),
            ));
        }
        if self.summary.short_sentences > self.summary.medium_sentences
            || self.summary.medium_sentences > self.summary.long_sentences
        {
            return Err(EngineError::Config(
                "summary sentence counts must satisfy short <= medium <= long".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchOptions {
    pub exact_phrase_score: f64,
    /// Score of a unit containing every query word.
    pub partial_score_scale: f64,
    /// Fraction of query words a unit must contain to qualify.
    pub min_word_overlap: f64,
    /// Units must be strictly longer than this many characters.
    pub min_unit_chars: usize,
    pub exact_snippet_radius: usize,
    pub unit_snippet_max_chars: usize,
    pub default_limit: usize,
    pub semantic_snippet_radius: usize,
    pub semantic_snippets_per_word: usize,
    pub semantic_max_snippets: usize,
    pub semantic_default_limit: usize,
    pub related_snippet_chars: usize,
    pub related_default_limit: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            exact_phrase_score: 100.0,
            partial_score_scale: 80.0,
            min_word_overlap: 0.6,
            min_unit_chars: 20,
            exact_snippet_radius: 80,
            unit_snippet_max_chars: 160,
            default_limit: 10,
            semantic_snippet_radius: 60,
            semantic_snippets_per_word: 2,
            semantic_max_snippets: 3,
            semantic_default_limit: 5,
            related_snippet_chars: 150,
            related_default_limit: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SummaryOptions {
    pub leading_sentences: usize,
    pub leading_bonus: f64,
    pub trailing_sentences: usize,
    pub trailing_bonus: f64,
    pub ideal_length: (usize, usize),
    pub ideal_length_bonus: f64,
    pub acceptable_length: (usize, usize),
    pub acceptable_length_bonus: f64,
    pub keyword_bonus: f64,
    pub importance_keywords: Vec<String>,
    pub short_sentences: usize,
    pub medium_sentences: usize,
    pub long_sentences: usize,
    /// Concepts attached to a smart summary.
    pub summary_concepts: usize,
    pub overview_section_words: usize,
    pub overview_max_sections: usize,
    pub overview_fallback_words: usize,
    pub max_key_points: usize,
    pub max_advisory_sentences: usize,
    pub advisory_keywords: Vec<String>,
    pub detailed_section_chars: usize,
    pub detailed_fallback_chars: usize,
    pub brief_max_words: usize,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            leading_sentences: 3,
            leading_bonus: 5.0,
            trailing_sentences: 2,
            trailing_bonus: 3.0,
            ideal_length: (10, 25),
            ideal_length_bonus: 3.0,
            acceptable_length: (5, 35),
            acceptable_length_bonus: 1.0,
            keyword_bonus: 2.0,
            importance_keywords: to_strings(&[
                "important",
                "key",
                "main",
                "primary",
                "essential",
                "note",
                "must",
                "should",
                "required",
                "configure",
                "setup",
                "install",
                "create",
                "build",
            ]),
            short_sentences: 3,
            medium_sentences: 6,
            long_sentences: 10,
            summary_concepts: 10,
            overview_section_words: 50,
            overview_max_sections: 5,
            overview_fallback_words: 100,
            max_key_points: 15,
            max_advisory_sentences: 8,
            advisory_keywords: to_strings(&[
                "important",
                "note",
                "warning",
                "key",
                "must",
                "should",
                "required",
                "avoid",
                "best",
                "practice",
            ]),
            detailed_section_chars: 400,
            detailed_fallback_chars: 1_500,
            brief_max_words: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConceptOptions {
    pub default_min_frequency: usize,
    /// Capitalized words must be longer than this.
    pub proper_noun_min_len: usize,
    pub max_concepts: usize,
    pub max_qa_pairs: usize,
    pub max_answer_chars: usize,
}

impl Default for ConceptOptions {
    fn default() -> Self {
        Self {
            default_min_frequency: 2,
            proper_noun_min_len: 3,
            max_concepts: 20,
            max_qa_pairs: 15,
            max_answer_chars: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GapOptions {
    pub short_document_words: usize,
    pub long_document_words: usize,
    pub low_readability_flesch: f64,
    pub expected_sections: Vec<String>,
    pub recommendation_sample: usize,
}

impl Default for GapOptions {
    fn default() -> Self {
        Self {
            short_document_words: 100,
            long_document_words: 3_000,
            low_readability_flesch: 30.0,
            expected_sections: to_strings(&[
                "introduction",
                "overview",
                "getting started",
                "configuration",
                "examples",
                "troubleshooting",
            ]),
            recommendation_sample: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IndexOptions {
    pub concept_min_frequency: usize,
    pub seed_concepts: usize,
    pub cross_reference_limit: usize,
    pub cluster_min_documents: usize,
    /// A single-document concept is kept when its frequency exceeds this.
    pub single_document_min_frequency: usize,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            concept_min_frequency: 1,
            seed_concepts: 5,
            cross_reference_limit: 3,
            cluster_min_documents: 2,
            single_document_min_frequency: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IoOptions {
    pub max_concurrent_reads: usize,
}

impl Default for IoOptions {
    fn default() -> Self {
        Self {
            max_concurrent_reads: 8,
        }
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}
