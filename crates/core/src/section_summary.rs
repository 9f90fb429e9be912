use crate::concepts::extract_concepts;
use crate::config::{EngineConfig, SummaryOptions};
use crate::models::{Concept, Document, Section, SectionView};
use crate::patterns::TextPatterns;
use crate::readability::{analyze_readability, ReadabilityReport};
use crate::structure::sections;
use crate::summarizer::{summarize_text, Granularity, SummaryResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const MAX_CODE_BLOCKS: usize = 3;
const CODE_PREVIEW_CHARS: usize = 100;
const MAX_TECHNICAL_TERMS: usize = 10;
const MAX_CONFIG_LINES: usize = 5;
const NO_KEY_POINTS: &str = "No specific key points identified.";
const NO_TECHNICAL_DETAILS: &str = "No specific technical details identified.";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStyle {
    #[default]
    Overview,
    KeyPoints,
    Detailed,
    Technical,
}

impl SummaryStyle {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "overview" => Some(SummaryStyle::Overview),
            "key_points" => Some(SummaryStyle::KeyPoints),
            "detailed" => Some(SummaryStyle::Detailed),
            "technical" => Some(SummaryStyle::Technical),
            _ => None,
        }
    }

    pub fn parse_or_default(raw: &str) -> (Self, bool) {
        match Self::parse(raw) {
            Some(style) => (style, false),
            None => (Self::default(), true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentSummary {
    pub document: String,
    pub word_count: usize,
    pub sections: usize,
    pub summary_type: SummaryStyle,
    /// Set when the requested style was not recognised.
    pub fallback: bool,
    pub summary: String,
}

pub fn summarize_document(
    document: &Document,
    requested_style: &str,
    options: &SummaryOptions,
    patterns: &TextPatterns,
) -> DocumentSummary {
    let (style, fallback) = SummaryStyle::parse_or_default(requested_style);
    let text = &document.text;
    let flat = sections(text, SectionView::Flat);

    let summary = match style {
        SummaryStyle::Overview => overview(text, &flat, options),
        SummaryStyle::KeyPoints => key_points(text, &flat, options),
        SummaryStyle::Detailed => detailed(text, &flat, options),
        SummaryStyle::Technical => technical(text, patterns),
    };

    DocumentSummary {
        document: document.id.clone(),
        word_count: document.stats().words,
        sections: flat.len(),
        summary_type: style,
        fallback,
        summary,
    }
}

fn overview(text: &str, sections: &[Section], options: &SummaryOptions) -> String {
    let parts: Vec<String> = sections
        .iter()
        .filter(|section| !section.content.is_empty())
        .take(options.overview_max_sections)
        .map(|section| {
            format!(
                "**{}**: {}",
                section.clean_title,
                leading_words(&section.content, options.overview_section_words)
            )
        })
        .collect();

    if parts.is_empty() {
        return leading_words(text, options.overview_fallback_words);
    }
    parts.join("\n\n")
}

fn key_points(text: &str, sections: &[Section], options: &SummaryOptions) -> String {
    let points: Vec<String> = sections
        .iter()
        .flat_map(|section| section.content.split('\n'))
        .map(str::trim)
        .filter(|line| is_list_item(line))
        .map(|line| line.trim_start_matches(|ch: char| "- *+0123456789.".contains(ch)).trim())
        .filter(|point| !point.is_empty())
        .take(options.max_key_points)
        .map(|point| format!("• {point}"))
        .collect();
    if !points.is_empty() {
        return points.join("\n");
    }

    let flattened = text.replace('\n', " ");
    let advisory: Vec<String> = flattened
        .split('.')
        .map(str::trim)
        .filter(|sentence| {
            let lowered = sentence.to_lowercase();
            !sentence.is_empty()
                && options
                    .advisory_keywords
                    .iter()
                    .any(|keyword| lowered.contains(keyword.as_str()))
        })
        .take(options.max_advisory_sentences)
        .map(|sentence| format!("• {sentence}."))
        .collect();

    if advisory.is_empty() {
        NO_KEY_POINTS.to_string()
    } else {
        advisory.join("\n")
    }
}

fn is_list_item(line: &str) -> bool {
    let numbered = line.chars().next().is_some_and(|ch| ch.is_ascii_digit()) && line.contains(". ");
    line.starts_with("- ") || line.starts_with("* ") || line.starts_with("+ ") || numbered
}

fn detailed(text: &str, sections: &[Section], options: &SummaryOptions) -> String {
    let parts: Vec<String> = sections
        .iter()
        .filter(|section| !section.content.is_empty())
        .map(|section| {
            format!(
                "## {}\n{}",
                section.clean_title,
                leading_chars(&section.content, options.detailed_section_chars)
            )
        })
        .collect();

    if parts.is_empty() {
        return leading_chars(text, options.detailed_fallback_chars);
    }
    parts.join("\n\n")
}

fn technical(text: &str, patterns: &TextPatterns) -> String {
    let mut parts: Vec<String> = Vec::new();

    let blocks: Vec<&str> = patterns
        .fenced_code
        .find_iter(text)
        .map(|block| block.as_str())
        .collect();
    if !blocks.is_empty() {
        parts.push("**Code Examples:**".to_string());
        for (number, block) in blocks.iter().take(MAX_CODE_BLOCKS).enumerate() {
            if block.chars().count() > CODE_PREVIEW_CHARS {
                let preview: String = block.chars().take(CODE_PREVIEW_CHARS).collect();
                parts.push(format!("Block {}: {preview}...", number + 1));
            } else {
                parts.push(block.to_string());
            }
        }
    }

    // Fence backticks would otherwise pair with inline ones.
    let prose = patterns.fenced_code.replace_all(text, "");
    let mut seen = HashSet::new();
    let terms: Vec<&str> = patterns
        .inline_code
        .captures_iter(&prose)
        .filter_map(|captures| captures.get(1).map(|term| term.as_str()))
        .filter(|term| seen.insert(*term))
        .take(MAX_TECHNICAL_TERMS)
        .collect();
    if !terms.is_empty() {
        parts.push(format!("**Technical Terms:** {}", terms.join(", ")));
    }

    let settings: Vec<&str> = text
        .split('\n')
        .filter(|line| is_setting_line(line))
        .map(str::trim)
        .take(MAX_CONFIG_LINES)
        .collect();
    if !settings.is_empty() {
        parts.push("**Configurations/Settings:**".to_string());
        parts.extend(settings.into_iter().map(str::to_string));
    }

    if parts.is_empty() {
        NO_TECHNICAL_DETAILS.to_string()
    } else {
        parts.join("\n\n")
    }
}

fn is_setting_line(line: &str) -> bool {
    let lowered = line.to_lowercase();
    lowered.contains("config")
        || lowered.contains("setting")
        || line.contains('=')
        || (line.contains(':') && !line.trim().starts_with('#'))
}

fn leading_words(text: &str, limit: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let joined = words.iter().take(limit).copied().collect::<Vec<_>>().join(" ");
    if words.len() > limit {
        format!("{joined}...")
    } else {
        joined
    }
}

fn leading_chars(text: &str, limit: usize) -> String {
    if text.chars().count() > limit {
        let head: String = text.chars().take(limit).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

/// One-line description: the whole text when short, else the first sentence
/// when that is short, else the leading words.
pub fn brief_summary(text: &str, options: &SummaryOptions) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= options.brief_max_words {
        return text.to_string();
    }

    let first_sentence = format!("{}.", text.split('.').next().unwrap_or_default().trim());
    if first_sentence.split_whitespace().count() <= options.brief_max_words {
        return first_sentence;
    }
    format!("{}...", words[..options.brief_max_words].join(" "))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SmartSummary {
    pub document: String,
    pub summary: SummaryResult,
    /// Set when the requested granularity was not recognised.
    pub fallback: bool,
    pub key_concepts: Vec<Concept>,
    pub readability: ReadabilityReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focused_sections: Option<Vec<String>>,
}

pub fn smart_summary(
    document: &Document,
    requested_granularity: &str,
    focus_keywords: &[String],
    config: &EngineConfig,
    patterns: &TextPatterns,
) -> SmartSummary {
    let (granularity, fallback) = Granularity::parse_or_default(requested_granularity);
    let text = &document.text;

    let mut key_concepts = extract_concepts(
        text,
        config.concepts.default_min_frequency,
        &config.concepts,
        patterns,
    );
    key_concepts.truncate(config.summary.summary_concepts);

    let keywords: Vec<String> = focus_keywords
        .iter()
        .map(|keyword| keyword.trim().to_lowercase())
        .filter(|keyword| !keyword.is_empty())
        .collect();
    let focused_sections = (!keywords.is_empty()).then(|| {
        sections(text, SectionView::Flat)
            .into_iter()
            .filter(|section| {
                let content = section.content.to_lowercase();
                !content.is_empty() && keywords.iter().any(|keyword| content.contains(keyword))
            })
            .map(|section| section.clean_title)
            .collect()
    });

    SmartSummary {
        document: document.id.clone(),
        summary: summarize_text(text, granularity, &config.summary, patterns),
        fallback,
        key_concepts,
        readability: analyze_readability(text, patterns),
        focused_sections,
    }
}
