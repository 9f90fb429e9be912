use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use docnav_core::{AnalysisCoordinator, EngineConfig, FsDocumentStore, SectionView};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "docnav", version, about = "Search, summarize and audit a folder of documentation")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Documentation root folder
    #[arg(long, env = "DOCNAV_ROOT", default_value = "docs")]
    root: PathBuf,

    /// JSON file overriding engine defaults
    #[arg(long, env = "DOCNAV_CONFIG")]
    config: Option<PathBuf>,

    /// Upper bound on concurrent document reads during corpus scans.
    #[arg(long)]
    max_concurrent_reads: Option<usize>,

    /// Print single-line JSON instead of pretty output.
    #[arg(long, default_value_t = false)]
    compact: bool,
}

#[derive(Subcommand)]
enum Command {
    /// List every document identifier under the root.
    List,
    /// Print one document with its checksum.
    Read {
        #[arg(long)]
        doc: String,
    },
    /// Exact-phrase and word-overlap search.
    Search {
        #[arg(long)]
        query: String,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Frequency-weighted search with context snippets.
    SemanticSearch {
        #[arg(long)]
        query: String,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Documents related to a query by term frequency.
    Related {
        #[arg(long)]
        query: String,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Extract a section by (partial) title.
    Section {
        #[arg(long)]
        doc: String,
        #[arg(long)]
        title: String,
        /// Exclude nested subsections.
        #[arg(long, default_value_t = false)]
        flat: bool,
    },
    /// Extractive summary with concepts and readability.
    Summarize {
        #[arg(long)]
        doc: String,
        /// short, medium or long
        #[arg(long, default_value = "medium")]
        granularity: String,
        /// Comma-separated keywords whose sections should be listed.
        #[arg(long, value_delimiter = ',')]
        focus: Vec<String>,
    },
    /// Section-driven summary.
    SummarizeDocument {
        #[arg(long)]
        doc: String,
        /// overview, key_points, detailed or technical
        #[arg(long, default_value = "overview")]
        style: String,
    },
    Readability {
        #[arg(long)]
        doc: String,
    },
    Structure {
        #[arg(long)]
        doc: String,
    },
    /// Compare two documents.
    Compare {
        #[arg(long)]
        first: String,
        #[arg(long)]
        second: String,
    },
    Concepts {
        #[arg(long)]
        doc: String,
        #[arg(long)]
        min_frequency: Option<usize>,
    },
    Definitions {
        #[arg(long)]
        doc: String,
    },
    /// Question/answer pairs for one document, or all when --doc is omitted.
    Qa {
        #[arg(long)]
        doc: Option<String>,
    },
    /// Table of contents for one document, or all when --doc is omitted.
    Toc {
        #[arg(long)]
        doc: Option<String>,
    },
    /// Corpus-wide statistics and brief summaries.
    Overview,
    /// Documentation gap analysis.
    Gaps,
    /// Concept index with topics and cross-references.
    Index,
}

fn load_config(cli: &Cli) -> anyhow::Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(limit) = cli.max_concurrent_reads {
        config.io.max_concurrent_reads = limit;
    }
    Ok(config)
}

fn emit<T: Serialize>(value: &T, compact: bool) -> anyhow::Result<()> {
    let rendered = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{rendered}");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let store = FsDocumentStore::new(&cli.root)
        .with_context(|| format!("opening documentation root {}", cli.root.display()))?;
    let coordinator = AnalysisCoordinator::new(store, config)?;

    info!(
        version = app_version,
        root = %cli.root.display(),
        started_at = %Utc::now().to_rfc3339(),
        "docnav boot"
    );

    let cancel = coordinator.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, cancelling corpus scan");
            cancel.cancel();
        }
    });

    let compact = cli.compact;
    match cli.command {
        Command::List => emit(&coordinator.list_documents().await?, compact)?,
        Command::Read { doc } => emit(&coordinator.read_document(&doc).await?, compact)?,
        Command::Search { query, limit } => {
            emit(&coordinator.search(&query, limit).await?, compact)?
        }
        Command::SemanticSearch { query, limit } => {
            emit(&coordinator.semantic_search(&query, limit).await?, compact)?
        }
        Command::Related { query, limit } => {
            emit(&coordinator.related_documents(&query, limit).await?, compact)?
        }
        Command::Section { doc, title, flat } => {
            let view = if flat {
                SectionView::Flat
            } else {
                SectionView::Hierarchical
            };
            emit(&coordinator.extract_section(&doc, &title, view).await?, compact)?
        }
        Command::Summarize {
            doc,
            granularity,
            focus,
        } => emit(
            &coordinator.summarize(&doc, &granularity, &focus).await?,
            compact,
        )?,
        Command::SummarizeDocument { doc, style } => {
            emit(&coordinator.summarize_document(&doc, &style).await?, compact)?
        }
        Command::Readability { doc } => emit(&coordinator.readability(&doc).await?, compact)?,
        Command::Structure { doc } => {
            emit(&coordinator.analyze_structure(&doc).await?, compact)?
        }
        Command::Compare { first, second } => {
            emit(&coordinator.compare(&first, &second).await?, compact)?
        }
        Command::Concepts { doc, min_frequency } => emit(
            &coordinator.extract_concepts(&doc, min_frequency).await?,
            compact,
        )?,
        Command::Definitions { doc } => {
            emit(&coordinator.extract_definitions(&doc).await?, compact)?
        }
        Command::Qa { doc } => {
            emit(&coordinator.extract_qa_pairs(doc.as_deref()).await?, compact)?
        }
        Command::Toc { doc } => emit(&coordinator.generate_toc(doc.as_deref()).await?, compact)?,
        Command::Overview => emit(&coordinator.corpus_overview().await?, compact)?,
        Command::Gaps => emit(&coordinator.analyze_gaps().await?, compact)?,
        Command::Index => emit(&coordinator.build_index().await?, compact)?,
    }

    Ok(())
}
