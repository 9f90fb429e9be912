use crate::compare::{compare_documents, ComparisonReport};
use crate::concepts::{extract_concepts, ConceptReport};
use crate::config::EngineConfig;
use crate::corpus::{load_corpus, CancelFlag, CorpusSnapshot, ScanOutcome};
use crate::definitions::{extract_definitions, DefinitionReport};
use crate::error::{EngineError, Result};
use crate::gaps::{analyze_gaps, GapReport};
use crate::index::{build_index, CorpusIndex};
use crate::models::{Document, SectionView};
use crate::overview::{corpus_overview, CorpusOverview};
use crate::patterns::TextPatterns;
use crate::qa::{extract_qa_pairs, CorpusQa};
use crate::ranking::{
    lexical_search, related_documents, weighted_search, RelatedResults, SearchResults,
    WeightedResults,
};
use crate::readability::{analyze_readability, ReadabilityReport};
use crate::section_summary::{smart_summary, summarize_document, DocumentSummary, SmartSummary};
use crate::structure::{
    analyze_structure, extract_section, toc_listing, SectionExtraction, StructureReport,
    TocListing,
};
use crate::traits::DocumentStore;
use std::sync::Arc;
use tracing::debug;

pub struct AnalysisCoordinator<S>
where
    S: DocumentStore + 'static,
{
    store: Arc<S>,
    config: Arc<EngineConfig>,
    patterns: Arc<TextPatterns>,
    cancel: CancelFlag,
}

impl<S> AnalysisCoordinator<S>
where
    S: DocumentStore + 'static,
{
    pub fn new(store: S, config: EngineConfig) -> Result<Self> {
        Self::from_shared(Arc::new(store), config)
    }

    pub fn from_shared(store: Arc<S>, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            config: Arc::new(config),
            patterns: Arc::new(TextPatterns::compile()?),
            cancel: CancelFlag::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Setting this flag makes in-flight and future corpus scans on this
    /// handle return [`EngineError::Cancelled`] until it is reset.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// A handle over the same store, config and patterns that answers to its
    /// own `cancel` flag. Cancelling it leaves other handles untouched.
    pub fn with_cancel_flag(&self, cancel: CancelFlag) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: Arc::clone(&self.config),
            patterns: Arc::clone(&self.patterns),
            cancel,
        }
    }

    /// Shorthand for a handle with a fresh, unset flag.
    pub fn session(&self) -> Self {
        self.with_cancel_flag(CancelFlag::new())
    }

    pub async fn list_documents(&self) -> Result<Vec<String>> {
        Ok(self.store.list().await?)
    }

    pub async fn read_document(&self, id: &str) -> Result<Document> {
        let text = self.store.read(id).await?;
        Ok(Document::new(id, text))
    }

    async fn snapshot(&self) -> Result<CorpusSnapshot> {
        load_corpus(
            Arc::clone(&self.store),
            self.config.io.max_concurrent_reads,
            &self.cancel,
        )
        .await
    }

    /// Runs `work` on the blocking pool with shared config and patterns.
    async fn compute<T, F>(&self, work: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&EngineConfig, &TextPatterns) -> T + Send + 'static,
    {
        let config = Arc::clone(&self.config);
        let patterns = Arc::clone(&self.patterns);
        Ok(tokio::task::spawn_blocking(move || work(&config, &patterns)).await?)
    }

    /// Loads the corpus, then runs `work` over it.
    async fn scan<T, F>(&self, operation: &'static str, work: F) -> Result<ScanOutcome<T>>
    where
        T: Send + 'static,
        F: FnOnce(&[Document], &EngineConfig, &TextPatterns) -> T + Send + 'static,
    {
        let CorpusSnapshot { documents, skipped } = self.snapshot().await?;
        debug!(
            operation,
            documents = documents.len(),
            skipped = skipped.len(),
            "corpus snapshot loaded"
        );
        let result = self
            .compute(move |config, patterns| work(&documents, config, patterns))
            .await?;
        Ok(ScanOutcome::new(result, skipped))
    }

    fn checked_limit(limit: Option<usize>, default: usize) -> Result<usize> {
        match limit {
            Some(0) => Err(EngineError::InvalidArgument(
                "result limit must be at least 1".to_string(),
            )),
            Some(limit) => Ok(limit),
            None => Ok(default),
        }
    }

    pub async fn search(&self, query: &str, limit: Option<usize>) -> Result<ScanOutcome<SearchResults>> {
        let limit = Self::checked_limit(limit, self.config.search.default_limit)?;
        let query = query.to_string();
        self.scan("search", move |documents, config, _| SearchResults {
            matches: lexical_search(&query, documents, limit, &config.search),
            total_analyzed: documents.len(),
            query,
        })
        .await
    }

    pub async fn semantic_search(
        &self,
        query: &str,
        limit: Option<usize>,
    ) -> Result<ScanOutcome<WeightedResults>> {
        let limit = Self::checked_limit(limit, self.config.search.semantic_default_limit)?;
        let query = query.to_string();
        self.scan("semantic_search", move |documents, config, _| WeightedResults {
            results: weighted_search(&query, documents, limit, &config.search),
            total_analyzed: documents.len(),
            query,
        })
        .await
    }

    pub async fn related_documents(
        &self,
        query: &str,
        limit: Option<usize>,
    ) -> Result<ScanOutcome<RelatedResults>> {
        let limit = Self::checked_limit(limit, self.config.search.related_default_limit)?;
        let query = query.to_string();
        self.scan("related_documents", move |documents, config, _| RelatedResults {
            related_documents: related_documents(&query, documents, limit, &config.search),
            total_analyzed: documents.len(),
            query,
        })
        .await
    }

    pub async fn extract_section(
        &self,
        id: &str,
        title: &str,
        view: SectionView,
    ) -> Result<SectionExtraction> {
        let document = self.read_document(id).await?;
        Ok(extract_section(&document, title, view))
    }

    /// Extractive summary at the requested granularity; unknown granularity
    /// names fall back to medium and set the `fallback` flag.
    pub async fn summarize(
        &self,
        id: &str,
        granularity: &str,
        focus_keywords: &[String],
    ) -> Result<SmartSummary> {
        let document = self.read_document(id).await?;
        let granularity = granularity.to_string();
        let focus = focus_keywords.to_vec();
        self.compute(move |config, patterns| {
            smart_summary(&document, &granularity, &focus, config, patterns)
        })
        .await
    }

    pub async fn summarize_document(&self, id: &str, style: &str) -> Result<DocumentSummary> {
        let document = self.read_document(id).await?;
        let style = style.to_string();
        self.compute(move |config, patterns| {
            summarize_document(&document, &style, &config.summary, patterns)
        })
        .await
    }

    pub async fn readability(&self, id: &str) -> Result<ReadabilityReport> {
        let document = self.read_document(id).await?;
        self.compute(move |_, patterns| analyze_readability(&document.text, patterns))
            .await
    }

    pub async fn analyze_structure(&self, id: &str) -> Result<StructureReport> {
        let document = self.read_document(id).await?;
        Ok(analyze_structure(&document, &self.patterns))
    }

    pub async fn compare(&self, first: &str, second: &str) -> Result<ComparisonReport> {
        let (first, second) = tokio::try_join!(self.read_document(first), self.read_document(second))?;
        self.compute(move |_, _| compare_documents(&first, &second)).await
    }

    pub async fn extract_concepts(&self, id: &str, min_frequency: Option<usize>) -> Result<ConceptReport> {
        let document = self.read_document(id).await?;
        let min_frequency = min_frequency.unwrap_or(self.config.concepts.default_min_frequency);
        self.compute(move |config, patterns| ConceptReport {
            concepts: extract_concepts(&document.text, min_frequency, &config.concepts, patterns),
            min_frequency,
            document: document.id,
        })
        .await
    }

    pub async fn extract_definitions(&self, id: &str) -> Result<DefinitionReport> {
        let document = self.read_document(id).await?;
        self.compute(move |_, patterns| extract_definitions(&document, patterns))
            .await
    }

    /// Q&A pairs for one document, or for every document when `id` is `None`.
    pub async fn extract_qa_pairs(&self, id: Option<&str>) -> Result<ScanOutcome<CorpusQa>> {
        match id {
            Some(id) => {
                let document = self.read_document(id).await?;
                let report = self
                    .compute(move |config, patterns| {
                        extract_qa_pairs(&document, &config.concepts, patterns)
                    })
                    .await?;
                Ok(ScanOutcome::new(CorpusQa::from_reports([report]), Vec::new()))
            }
            None => {
                self.scan("extract_qa_pairs", |documents, config, patterns| {
                    CorpusQa::from_reports(
                        documents
                            .iter()
                            .map(|document| extract_qa_pairs(document, &config.concepts, patterns)),
                    )
                })
                .await
            }
        }
    }

    /// Tables of contents for one document, or for every document when `id`
    /// is `None`.
    pub async fn generate_toc(&self, id: Option<&str>) -> Result<ScanOutcome<TocListing>> {
        match id {
            Some(id) => {
                let document = self.read_document(id).await?;
                Ok(ScanOutcome::new(toc_listing(&[document]), Vec::new()))
            }
            None => {
                self.scan("generate_toc", |documents, _, _| toc_listing(documents))
                    .await
            }
        }
    }

    pub async fn corpus_overview(&self) -> Result<ScanOutcome<CorpusOverview>> {
        self.scan("corpus_overview", |documents, config, _| {
            corpus_overview(documents, &config.summary)
        })
        .await
    }

    pub async fn analyze_gaps(&self) -> Result<ScanOutcome<GapReport>> {
        self.scan("analyze_gaps", |documents, config, patterns| {
            analyze_gaps(documents, &config.gaps, patterns)
        })
        .await
    }

    pub async fn build_index(&self) -> Result<ScanOutcome<CorpusIndex>> {
        self.scan("build_index", |documents, config, patterns| {
            build_index(documents, config, patterns)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::tests::FlakyStore;
    use crate::error::StoreError;
    use crate::gaps::RecommendationKind;
    use crate::ranking::MatchType;
    use crate::structure::SectionMatch;
    use crate::stores::MemoryDocumentStore;

    fn scenario_store() -> MemoryDocumentStore {
        MemoryDocumentStore::new()
            .with_document("A.md", "# Intro\nHello world.\n# Setup\nRun the installer.")
            .with_document(
                "B.md",
                "# Overview\nThe installer copies files. Configure the installer before use.",
            )
    }

    fn coordinator(store: MemoryDocumentStore) -> Result<AnalysisCoordinator<MemoryDocumentStore>> {
        AnalysisCoordinator::new(store, EngineConfig::default())
    }

    #[tokio::test]
    async fn scenario_section_and_search() -> Result<()> {
        let engine = coordinator(scenario_store())?;

        let extraction = engine.extract_section("A.md", "Setup", SectionView::Hierarchical).await?;
        match extraction.outcome {
            SectionMatch::Single { section } => assert_eq!(section.content, "Run the installer."),
            other => panic!("expected a single section, got {other:?}"),
        }

        let outcome = engine.search("installer", None).await?;
        assert_eq!(outcome.result.total_analyzed, 2);
        let first = &outcome.result.matches[0];
        assert_eq!(first.document, "A.md");
        assert_eq!(first.match_type, MatchType::ExactPhrase);
        assert_eq!(first.score, 100.0);
        assert!(outcome.skipped_documents.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn missing_documents_surface_not_found() -> Result<()> {
        let engine = coordinator(scenario_store())?;
        let error = engine
            .summarize_document("missing.md", "overview")
            .await
            .err()
            .ok_or_else(|| EngineError::InvalidArgument("expected an error".to_string()))?;
        assert!(error.is_not_found());
        Ok(())
    }

    #[tokio::test]
    async fn zero_limit_is_rejected() -> Result<()> {
        let engine = coordinator(scenario_store())?;
        let result = engine.semantic_search("installer", Some(0)).await;
        assert!(matches!(result, Err(EngineError::InvalidArgument(_))));
        Ok(())
    }

    #[tokio::test]
    async fn unreadable_documents_are_reported_alongside_results() -> Result<()> {
        let inner = scenario_store().with_document("broken.md", "unreachable");
        let engine = AnalysisCoordinator::new(FlakyStore { inner }, EngineConfig::default())?;

        let outcome = engine.related_documents("installer", None).await?;
        assert_eq!(outcome.result.total_analyzed, 2);
        assert_eq!(outcome.skipped_documents.len(), 1);
        assert_eq!(outcome.skipped_documents[0].id, "broken.md");
        assert!(!outcome.result.related_documents.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn cancelled_engine_refuses_corpus_scans() -> Result<()> {
        let engine = coordinator(scenario_store())?;
        engine.cancel_flag().cancel();
        assert!(matches!(engine.analyze_gaps().await, Err(EngineError::Cancelled)));
        assert!(matches!(engine.build_index().await, Err(EngineError::Cancelled)));

        // Single-document operations do not scan the corpus.
        assert!(engine.readability("A.md").await.is_ok());

        engine.cancel_flag().reset();
        assert!(engine.corpus_overview().await.is_ok());
        Ok(())
    }

    #[tokio::test]
    async fn cancelling_one_session_leaves_others_running() -> Result<()> {
        let engine = coordinator(scenario_store())?;
        let disconnected = engine.session();
        let other = engine.session();
        disconnected.cancel_flag().cancel();

        let (cancelled, still_running) =
            tokio::join!(disconnected.build_index(), other.build_index());
        assert!(matches!(cancelled, Err(EngineError::Cancelled)));
        assert_eq!(still_running?.result.statistics.total_documents, 2);

        assert!(engine.corpus_overview().await.is_ok());
        assert!(matches!(disconnected.analyze_gaps().await, Err(EngineError::Cancelled)));
        Ok(())
    }

    #[tokio::test]
    async fn gap_analysis_flags_missing_troubleshooting() -> Result<()> {
        let engine = coordinator(scenario_store())?;
        let outcome = engine.analyze_gaps().await?;
        let report = outcome.result;

        assert!(report
            .content_quality
            .missing_common_sections
            .iter()
            .all(|entry| entry.missing.contains(&"troubleshooting".to_string())));
        let add = report
            .recommendations
            .iter()
            .find(|recommendation| recommendation.kind == RecommendationKind::AddCommonSections)
            .ok_or_else(|| EngineError::InvalidArgument("missing recommendation".to_string()))?;
        assert!(add.targets.contains(&"troubleshooting".to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn compare_same_document_is_identical() -> Result<()> {
        let engine = coordinator(scenario_store())?;
        let report = engine.compare("A.md", "A.md").await?;
        assert_eq!(report.statistics.size_ratio, Some(1.0));
        assert_eq!(report.content_similarity.unique_to_doc1_count, 0);
        assert_eq!(report.content_similarity.unique_to_doc2_count, 0);
        Ok(())
    }

    #[tokio::test]
    async fn per_document_and_corpus_variants_agree() -> Result<()> {
        let engine = coordinator(scenario_store())?;

        let single = engine.generate_toc(Some("A.md")).await?;
        let all = engine.generate_toc(None).await?;
        assert_eq!(single.result.documents.len(), 1);
        assert_eq!(all.result.documents.len(), 2);
        assert_eq!(all.result.documents[0], single.result.documents[0]);

        let qa = engine.extract_qa_pairs(None).await?;
        assert_eq!(qa.result.total_pairs, 0);
        Ok(())
    }

    #[tokio::test]
    async fn summaries_report_fallbacks() -> Result<()> {
        let engine = coordinator(scenario_store())?;
        let smart = engine.summarize("B.md", "enormous", &["configure".to_string()]).await?;
        assert!(smart.fallback);
        assert_eq!(smart.focused_sections, Some(vec!["Overview".to_string()]));

        let styled = engine.summarize_document("A.md", "technical").await?;
        assert!(!styled.fallback);

        let concepts = engine.extract_concepts("A.md", Some(1)).await?;
        assert_eq!(concepts.min_frequency, 1);
        Ok(())
    }

    #[test]
    fn store_errors_convert_into_engine_errors() {
        let error: EngineError = StoreError::AccessDenied("../etc/passwd".to_string()).into();
        assert!(matches!(error, EngineError::Store(StoreError::AccessDenied(_))));
        assert!(!error.is_not_found());
    }
}
