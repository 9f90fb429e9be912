use crate::config::SummaryOptions;
use crate::models::{Document, SectionView, TextStats};
use crate::section_summary::brief_summary;
use crate::structure::{count_code_fences, sections};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct StructureTotals {
    pub sections: usize,
    pub code_blocks: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentBrief {
    pub path: String,
    pub words: usize,
    pub sections: usize,
    pub brief_summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CorpusOverview {
    pub total_documents: usize,
    /// Keyed by lowercase extension with the leading dot.
    pub documents_by_type: BTreeMap<String, usize>,
    pub total_content: TextStats,
    pub structure_analysis: StructureTotals,
    pub document_summaries: Vec<DocumentBrief>,
}

pub fn corpus_overview(documents: &[Document], options: &SummaryOptions) -> CorpusOverview {
    let mut documents_by_type: BTreeMap<String, usize> = BTreeMap::new();
    let mut total_content = TextStats::default();
    let mut structure_analysis = StructureTotals::default();
    let mut document_summaries = Vec::with_capacity(documents.len());

    for document in documents {
        *documents_by_type.entry(document.extension()).or_default() += 1;

        let stats = document.stats();
        total_content.words += stats.words;
        total_content.lines += stats.lines;
        total_content.characters += stats.characters;

        let section_count = sections(&document.text, SectionView::Flat).len();
        structure_analysis.sections += section_count;
        structure_analysis.code_blocks += count_code_fences(&document.text);

        document_summaries.push(DocumentBrief {
            path: document.id.clone(),
            words: stats.words,
            sections: section_count,
            brief_summary: brief_summary(&document.text, options),
        });
    }

    CorpusOverview {
        total_documents: documents.len(),
        documents_by_type,
        total_content,
        structure_analysis,
        document_summaries,
    }
}
