use crate::concepts::extract_concepts;
use crate::config::EngineConfig;
use crate::models::{Concept, ConceptCategory, Document};
use crate::patterns::TextPatterns;
use crate::ranking::related_documents;
use crate::readability::analyze_readability;
use crate::structure::parse_headings;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConceptOccurrence {
    pub document: String,
    pub frequency: usize,
    pub category: ConceptCategory,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentMetadata {
    pub word_count: usize,
    /// Heading count.
    pub sections: usize,
    pub readability_score: f64,
    pub main_topics: Vec<String>,
    pub checksum: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexStatistics {
    pub total_concepts: usize,
    pub total_topics: usize,
    pub total_documents: usize,
    pub avg_cross_references: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CorpusIndex {
    pub concepts: BTreeMap<String, Vec<ConceptOccurrence>>,
    pub topics: BTreeMap<String, Vec<String>>,
    pub cross_references: BTreeMap<String, Vec<String>>,
    pub metadata: BTreeMap<String, DocumentMetadata>,
    pub statistics: IndexStatistics,
}

struct IndexedDocument {
    concepts: Vec<Concept>,
    related: Vec<String>,
    metadata: DocumentMetadata,
}

fn index_document(
    document: &Document,
    corpus: &[Document],
    config: &EngineConfig,
    patterns: &TextPatterns,
) -> IndexedDocument {
    let options = &config.index;
    let concepts = extract_concepts(
        &document.text,
        options.concept_min_frequency,
        &config.concepts,
        patterns,
    );
    let main_topics: Vec<String> = concepts
        .iter()
        .take(options.seed_concepts)
        .map(|concept| concept.term.clone())
        .collect();

    let related = related_documents(
        &main_topics.join(" "),
        corpus,
        options.cross_reference_limit,
        &config.search,
    )
    .into_iter()
    .map(|related| related.document)
    .filter(|id| *id != document.id)
    .collect();

    IndexedDocument {
        metadata: DocumentMetadata {
            word_count: document.stats().words,
            sections: parse_headings(&document.text).len(),
            readability_score: analyze_readability(&document.text, patterns).flesch_score,
            main_topics,
            checksum: document.checksum.clone(),
        },
        concepts,
        related,
    }
}

pub fn build_index(documents: &[Document], config: &EngineConfig, patterns: &TextPatterns) -> CorpusIndex {
    let options = &config.index;
    let indexed: Vec<IndexedDocument> = documents
        .par_iter()
        .map(|document| index_document(document, documents, config, patterns))
        .collect();

    let mut occurrences: BTreeMap<String, Vec<ConceptOccurrence>> = BTreeMap::new();
    let mut cross_references = BTreeMap::new();
    let mut metadata = BTreeMap::new();
    for (document, entry) in documents.iter().zip(indexed) {
        for concept in entry.concepts {
            occurrences
                .entry(concept.term)
                .or_default()
                .push(ConceptOccurrence {
                    document: document.id.clone(),
                    frequency: concept.frequency,
                    category: concept.category,
                });
        }
        cross_references.insert(document.id.clone(), entry.related);
        metadata.insert(document.id.clone(), entry.metadata);
    }

    let mut concepts = BTreeMap::new();
    let mut topics = BTreeMap::new();
    for (term, found) in occurrences {
        let spanning = distinct_documents(&found);
        let frequent = found
            .iter()
            .any(|occurrence| occurrence.frequency > options.single_document_min_frequency);
        if spanning.len() < options.cluster_min_documents && !frequent {
            continue;
        }
        if spanning.len() >= options.cluster_min_documents {
            topics.insert(term.clone(), spanning);
        }
        concepts.insert(term, found);
    }
    debug!(
        documents = documents.len(),
        concepts = concepts.len(),
        topics = topics.len(),
        "corpus index built"
    );

    let reference_total: usize = cross_references.values().map(Vec::len).sum();
    let statistics = IndexStatistics {
        total_concepts: concepts.len(),
        total_topics: topics.len(),
        total_documents: documents.len(),
        avg_cross_references: if cross_references.is_empty() {
            0.0
        } else {
            reference_total as f64 / cross_references.len() as f64
        },
    };

    CorpusIndex {
        concepts,
        topics,
        cross_references,
        metadata,
        statistics,
    }
}

/// Document ids in first-occurrence order, without repeats.
fn distinct_documents(occurrences: &[ConceptOccurrence]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    occurrences
        .iter()
        .filter(|occurrence| seen.insert(occurrence.document.as_str()))
        .map(|occurrence| occurrence.document.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns() -> TextPatterns {
        TextPatterns::compile().expect("patterns should compile")
    }

    fn corpus() -> Vec<Document> {
        vec![
            Document::new("a.md", "Use `cargo` here. Then `cargo` again."),
            Document::new("b.md", "Just `cargo` once."),
            Document::new("c.md", "**Unique** and **Unique** and **Unique**."),
        ]
    }

    #[test]
    fn shared_and_frequent_concepts_are_kept() {
        let index = build_index(&corpus(), &EngineConfig::default(), &patterns());

        let cargo = &index.concepts["cargo"];
        assert_eq!(cargo.len(), 2);
        assert_eq!(cargo[0].document, "a.md");
        assert_eq!(cargo[0].frequency, 2);
        assert_eq!(
            index.topics.get("cargo"),
            Some(&vec!["a.md".to_string(), "b.md".to_string()])
        );

        let unique = &index.concepts["Unique"];
        assert!(unique.iter().all(|occurrence| occurrence.document == "c.md"));
        assert!(!index.topics.contains_key("Unique"));
        assert!(!index.concepts.contains_key("Then"));
    }

    #[test]
    fn cross_references_exclude_self() {
        let index = build_index(&corpus(), &EngineConfig::default(), &patterns());
        assert_eq!(index.cross_references["a.md"], vec!["b.md".to_string()]);
        assert_eq!(index.cross_references["b.md"], vec!["a.md".to_string()]);
        assert!(index.cross_references["c.md"].is_empty());
        assert!((index.statistics.avg_cross_references - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn metadata_carries_topics_and_checksum() {
        let documents = corpus();
        let index = build_index(&documents, &EngineConfig::default(), &patterns());
        let meta = &index.metadata["a.md"];
        assert_eq!(meta.main_topics[0], "cargo");
        assert_eq!(meta.checksum, documents[0].checksum);
        assert_eq!(meta.sections, 0);
        assert_eq!(index.statistics.total_documents, 3);
    }
}
