pub mod compare;
pub mod concepts;
pub mod config;
pub mod coordinator;
pub mod corpus;
pub mod definitions;
pub mod error;
pub mod gaps;
pub mod index;
pub mod models;
pub mod normalize;
pub mod overview;
pub mod patterns;
pub mod qa;
pub mod ranking;
pub mod readability;
pub mod section_summary;
pub mod snippet;
pub mod stores;
pub mod structure;
pub mod summarizer;
pub mod tokenizer;
pub mod traits;

pub use compare::{compare_documents, ComparisonReport};
pub use concepts::{extract_concepts, ConceptReport};
pub use config::{
    ConceptOptions, EngineConfig, GapOptions, IndexOptions, IoOptions, SearchOptions,
    SummaryOptions,
};
pub use coordinator::AnalysisCoordinator;
pub use corpus::{load_corpus, CancelFlag, CorpusSnapshot, ScanOutcome};
pub use definitions::{extract_definitions, Definition, DefinitionKind, DefinitionReport};
pub use error::{EngineError, Result, StoreError};
pub use gaps::{analyze_gaps, GapReport, Recommendation, RecommendationKind};
pub use index::{build_index, CorpusIndex};
pub use models::{
    Concept, ConceptCategory, Document, Heading, Section, SectionView, SkippedDocument, TextStats,
};
pub use overview::{corpus_overview, CorpusOverview};
pub use patterns::TextPatterns;
pub use qa::{extract_qa_pairs, CorpusQa, QaPair, QaReport, QaSource};
pub use ranking::{
    MatchType, RelatedDocument, RelatedResults, ScoredMatch, SearchResults, WeightedMatch,
    WeightedResults,
};
pub use readability::{analyze_readability, Complexity, ReadabilityReport};
pub use section_summary::{
    brief_summary, smart_summary, summarize_document, DocumentSummary, SmartSummary, SummaryStyle,
};
pub use stores::{FsDocumentStore, MemoryDocumentStore};
pub use structure::{
    SectionExtraction, SectionMatch, StructureReport, TableOfContents, TocListing,
};
pub use summarizer::{summarize_text, Granularity, SummaryResult};
pub use traits::DocumentStore;
