use crate::config::GapOptions;
use crate::models::Document;
use crate::patterns::TextPatterns;
use crate::readability::analyze_readability;
use crate::structure::parse_headings;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SectionCoverage {
    pub section: String,
    pub documents: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoverageAnalysis {
    pub average_words_per_doc: f64,
    pub short_documents: Vec<String>,
    pub long_documents: Vec<String>,
    /// Checklist entries in checklist order.
    pub section_coverage: Vec<SectionCoverage>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MissingSections {
    pub document: String,
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentQuality {
    pub low_readability: Vec<String>,
    pub missing_common_sections: Vec<MissingSections>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    ExpandShortDocuments,
    ImproveReadability,
    AddCommonSections,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub targets: Vec<String>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GapReport {
    pub total_documents: usize,
    pub coverage_analysis: CoverageAnalysis,
    pub content_quality: ContentQuality,
    pub recommendations: Vec<Recommendation>,
}

struct DocumentProfile<'a> {
    id: &'a str,
    words: usize,
    flesch: f64,
    /// One flag per checklist entry.
    covered: Vec<bool>,
}

fn profile<'a>(document: &'a Document, checklist: &[String], patterns: &TextPatterns) -> DocumentProfile<'a> {
    let titles: Vec<String> = parse_headings(&document.text)
        .into_iter()
        .map(|heading| heading.title.to_lowercase())
        .collect();
    DocumentProfile {
        id: &document.id,
        words: document.stats().words,
        flesch: analyze_readability(&document.text, patterns).flesch_score,
        covered: checklist
            .iter()
            .map(|entry| titles.iter().any(|title| title.contains(entry.as_str())))
            .collect(),
    }
}

pub fn analyze_gaps(documents: &[Document], options: &GapOptions, patterns: &TextPatterns) -> GapReport {
    let checklist: Vec<String> = options
        .expected_sections
        .iter()
        .map(|entry| entry.to_lowercase())
        .collect();

    let profiles: Vec<DocumentProfile<'_>> = documents
        .par_iter()
        .map(|document| profile(document, &checklist, patterns))
        .collect();

    let short_documents: Vec<String> = profiles
        .iter()
        .filter(|profile| profile.words < options.short_document_words)
        .map(|profile| profile.id.to_string())
        .collect();
    let long_documents: Vec<String> = profiles
        .iter()
        .filter(|profile| {
            profile.words >= options.short_document_words
                && profile.words > options.long_document_words
        })
        .map(|profile| profile.id.to_string())
        .collect();
    // Degenerate documents score 0 and are reported here too.
    let low_readability: Vec<String> = profiles
        .iter()
        .filter(|profile| profile.flesch < options.low_readability_flesch)
        .map(|profile| profile.id.to_string())
        .collect();

    let section_coverage: Vec<SectionCoverage> = checklist
        .iter()
        .enumerate()
        .map(|(slot, entry)| SectionCoverage {
            section: entry.clone(),
            documents: profiles.iter().filter(|profile| profile.covered[slot]).count(),
        })
        .collect();

    let missing_common_sections: Vec<MissingSections> = profiles
        .iter()
        .filter_map(|profile| {
            let missing: Vec<String> = checklist
                .iter()
                .zip(&profile.covered)
                .filter(|(_, covered)| !**covered)
                .map(|(entry, _)| entry.clone())
                .collect();
            (!missing.is_empty()).then(|| MissingSections {
                document: profile.id.to_string(),
                missing,
            })
        })
        .collect();

    let total_words: usize = profiles.iter().map(|profile| profile.words).sum();
    let recommendations = recommend(&short_documents, &low_readability, &section_coverage, options);

    GapReport {
        total_documents: documents.len(),
        coverage_analysis: CoverageAnalysis {
            average_words_per_doc: if documents.is_empty() {
                0.0
            } else {
                total_words as f64 / documents.len() as f64
            },
            short_documents,
            long_documents,
            section_coverage,
        },
        content_quality: ContentQuality {
            low_readability,
            missing_common_sections,
        },
        recommendations,
    }
}

fn recommend(
    short_documents: &[String],
    low_readability: &[String],
    coverage: &[SectionCoverage],
    options: &GapOptions,
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();
    let sample = options.recommendation_sample;

    if !short_documents.is_empty() {
        let targets: Vec<String> = short_documents.iter().take(sample).cloned().collect();
        recommendations.push(Recommendation {
            kind: RecommendationKind::ExpandShortDocuments,
            message: format!("Consider expanding these short documents: {}", targets.join(", ")),
            targets,
        });
    }

    if !low_readability.is_empty() {
        let targets: Vec<String> = low_readability.iter().take(sample).cloned().collect();
        recommendations.push(Recommendation {
            kind: RecommendationKind::ImproveReadability,
            message: format!("Improve readability of: {}", targets.join(", ")),
            targets,
        });
    }

    if let Some(least) = coverage.iter().map(|entry| entry.documents).min() {
        let targets: Vec<String> = coverage
            .iter()
            .filter(|entry| entry.documents <= least)
            .map(|entry| entry.section.clone())
            .collect();
        recommendations.push(Recommendation {
            kind: RecommendationKind::AddCommonSections,
            message: format!("Consider adding {} sections to more documents", targets.join(", ")),
            targets,
        });
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEARLY_COMPLETE: &str = "# Introduction\nThe tool reads docs.\n# Overview\nIt is small.\n\
        # Getting Started\nInstall it.\n# Configuration\nSet the root.\n# Examples\nRun a search.";

    fn patterns() -> TextPatterns {
        TextPatterns::compile().expect("patterns should compile")
    }

    #[test]
    fn missing_troubleshooting_is_flagged() {
        let documents = vec![
            Document::new("a.md", NEARLY_COMPLETE),
            Document::new("b.md", NEARLY_COMPLETE),
        ];
        let report = analyze_gaps(&documents, &GapOptions::default(), &patterns());

        assert_eq!(report.total_documents, 2);
        let troubleshooting = report
            .coverage_analysis
            .section_coverage
            .last()
            .expect("checklist is not empty");
        assert_eq!(troubleshooting.section, "troubleshooting");
        assert_eq!(troubleshooting.documents, 0);

        assert_eq!(
            report.content_quality.missing_common_sections[0].missing,
            vec!["troubleshooting".to_string()]
        );
        let add = report
            .recommendations
            .iter()
            .find(|recommendation| recommendation.kind == RecommendationKind::AddCommonSections)
            .expect("coverage recommendation");
        assert_eq!(add.targets, vec!["troubleshooting".to_string()]);
        assert_eq!(add.message, "Consider adding troubleshooting sections to more documents");
    }

    #[test]
    fn short_long_and_dense_documents_are_reported() {
        let dense = "Comprehensive infrastructure virtualization necessitates sophisticated \
            orchestration methodologies alongside continuous organizational documentation \
            requirements and interoperability considerations.";
        let documents = vec![
            Document::new("short.md", "Tiny page."),
            Document::new("long.md", "word ".repeat(3001)),
            Document::new("dense.md", dense),
        ];
        let report = analyze_gaps(&documents, &GapOptions::default(), &patterns());

        assert_eq!(
            report.coverage_analysis.short_documents,
            vec!["short.md".to_string(), "dense.md".to_string()]
        );
        assert_eq!(report.coverage_analysis.long_documents, vec!["long.md".to_string()]);
        assert!(report
            .content_quality
            .low_readability
            .contains(&"dense.md".to_string()));
        assert_eq!(
            report.recommendations[0].message,
            "Consider expanding these short documents: short.md, dense.md"
        );
        assert_eq!(report.recommendations[1].kind, RecommendationKind::ImproveReadability);
    }

    #[test]
    fn empty_corpus_has_zero_average() {
        let report = analyze_gaps(&[], &GapOptions::default(), &patterns());
        assert_eq!(report.total_documents, 0);
        assert_eq!(report.coverage_analysis.average_words_per_doc, 0.0);
    }
}
