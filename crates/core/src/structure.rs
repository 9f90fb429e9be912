use crate::models::{Document, Heading, Section, SectionView, TextStats};
use crate::patterns::TextPatterns;
use serde::{Deserialize, Serialize};

pub const DOCUMENT_CONTENT_TITLE: &str = "Document Content";
const MAX_LISTED_SECTIONS: usize = 10;

pub fn parse_headings(text: &str) -> Vec<Heading> {
    text.split('\n')
        .enumerate()
        .filter_map(|(line_index, line)| {
            let stripped = line.trim();
            if !stripped.starts_with('#') {
                return None;
            }
            let remainder = stripped.trim_start_matches('#');
            Some(Heading {
                level: stripped.len() - remainder.len(),
                title: remainder.trim().to_string(),
                raw: stripped.to_string(),
                line_index,
            })
        })
        .collect()
}

pub fn flat_sections(headings: &[Heading], text: &str) -> Vec<Section> {
    if headings.is_empty() {
        return vec![whole_document_section(text)];
    }

    let lines: Vec<&str> = text.split('\n').collect();
    headings
        .iter()
        .enumerate()
        .map(|(index, heading)| {
            let end = headings
                .get(index + 1)
                .map(|next| next.line_index)
                .unwrap_or(lines.len());
            Section {
                title: heading.raw.clone(),
                clean_title: heading.title.clone(),
                level: heading.level,
                content: join_lines(&lines, heading.line_index + 1, end),
                includes_subsections: None,
            }
        })
        .collect()
}

pub fn hierarchical_sections(headings: &[Heading], text: &str) -> Vec<Section> {
    if headings.is_empty() {
        return vec![whole_document_section(text)];
    }

    let lines: Vec<&str> = text.split('\n').collect();
    headings
        .iter()
        .enumerate()
        .map(|(index, heading)| {
            let end = headings[index + 1..]
                .iter()
                .find(|next| next.level <= heading.level)
                .map(|next| next.line_index)
                .unwrap_or(lines.len());
            let includes_subsections = headings[index + 1..]
                .iter()
                .any(|next| next.level > heading.level && next.line_index < end);
            Section {
                title: heading.raw.clone(),
                clean_title: heading.title.clone(),
                level: heading.level,
                content: join_lines(&lines, heading.line_index + 1, end),
                includes_subsections: Some(includes_subsections),
            }
        })
        .collect()
}

pub fn sections(text: &str, view: SectionView) -> Vec<Section> {
    let headings = parse_headings(text);
    match view {
        SectionView::Flat => flat_sections(&headings, text),
        SectionView::Hierarchical => hierarchical_sections(&headings, text),
    }
}

fn whole_document_section(text: &str) -> Section {
    Section {
        title: DOCUMENT_CONTENT_TITLE.to_string(),
        clean_title: DOCUMENT_CONTENT_TITLE.to_string(),
        level: 0,
        content: text.trim().to_string(),
        includes_subsections: None,
    }
}

fn join_lines(lines: &[&str], start: usize, end: usize) -> String {
    let end = end.min(lines.len());
    let start = start.min(end);
    lines[start..end].join("\n").trim().to_string()
}

/// Case-insensitive match where either title may contain the other.
pub fn find_sections<'a>(sections: &'a [Section], title: &str) -> Vec<&'a Section> {
    let wanted = title.to_lowercase();
    sections
        .iter()
        .filter(|section| {
            let candidate = section.clean_title.to_lowercase();
            candidate.contains(&wanted) || wanted.contains(&candidate)
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractedSection {
    pub section_title: String,
    pub content: String,
    pub word_count: usize,
    pub header_level: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub includes_subsections: Option<bool>,
}

impl From<&Section> for ExtractedSection {
    fn from(section: &Section) -> Self {
        Self {
            section_title: section.clean_title.clone(),
            content: section.content.clone(),
            word_count: section.word_count(),
            header_level: section.level,
            includes_subsections: section.includes_subsections,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "match_type", rename_all = "snake_case")]
pub enum SectionMatch {
    Single {
        section: ExtractedSection,
    },
    Multiple {
        matching_sections: Vec<ExtractedSection>,
        total_matches: usize,
    },
    NotFound {
        requested: String,
        available_sections: Vec<String>,
        total_sections: usize,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SectionExtraction {
    pub document: String,
    pub extraction_mode: SectionView,
    #[serde(flatten)]
    pub outcome: SectionMatch,
}

pub fn extract_section(document: &Document, title: &str, view: SectionView) -> SectionExtraction {
    let all_sections = sections(&document.text, view);
    let matches = find_sections(&all_sections, title);

    let outcome = match matches.as_slice() {
        [] => {
            let available: Vec<String> = all_sections
                .iter()
                .filter(|section| !section.content.is_empty())
                .map(|section| section.clean_title.clone())
                .collect();
            SectionMatch::NotFound {
                requested: title.to_string(),
                total_sections: available.len(),
                available_sections: available.into_iter().take(MAX_LISTED_SECTIONS).collect(),
            }
        }
        [single] => SectionMatch::Single {
            section: ExtractedSection::from(*single),
        },
        several => SectionMatch::Multiple {
            matching_sections: several.iter().map(|section| ExtractedSection::from(*section)).collect(),
            total_matches: several.len(),
        },
    };

    SectionExtraction {
        document: document.id.clone(),
        extraction_mode: view,
        outcome,
    }
}

/// One `- title` line per heading, indented two spaces per level below 1.
pub fn outline(headings: &[Heading]) -> Vec<String> {
    headings
        .iter()
        .map(|heading| {
            format!(
                "{}- {}",
                "  ".repeat(heading.level.saturating_sub(1)),
                heading.title
            )
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableOfContents {
    pub table_of_contents: Vec<String>,
    pub header_count: usize,
    pub max_depth: usize,
}

pub fn table_of_contents(text: &str) -> TableOfContents {
    let headings = parse_headings(text);
    TableOfContents {
        table_of_contents: outline(&headings),
        header_count: headings.len(),
        max_depth: headings.iter().map(|heading| heading.level).max().unwrap_or(0),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentToc {
    pub document: String,
    #[serde(flatten)]
    pub toc: TableOfContents,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TocListing {
    pub documents: Vec<DocumentToc>,
}

pub fn toc_listing(documents: &[Document]) -> TocListing {
    TocListing {
        documents: documents
            .iter()
            .map(|document| DocumentToc {
                document: document.id.clone(),
                toc: table_of_contents(&document.text),
            })
            .collect(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeadingEntry {
    pub level: usize,
    pub title: String,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StructureStatistics {
    #[serde(flatten)]
    pub text: TextStats,
    pub sections: usize,
    pub code_blocks: usize,
    pub links: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StructureOutline {
    pub headers: Vec<HeadingEntry>,
    pub outline: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentAnalysis {
    pub has_tables: bool,
    pub has_images: bool,
    pub has_code: bool,
    pub external_links: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StructureReport {
    pub document: String,
    pub statistics: StructureStatistics,
    pub structure: StructureOutline,
    pub content_analysis: ContentAnalysis,
}

pub fn analyze_structure(document: &Document, patterns: &TextPatterns) -> StructureReport {
    let text = &document.text;
    let headings = parse_headings(text);
    let section_count = flat_sections(&headings, text).len();
    let links = extract_links(text, patterns);

    StructureReport {
        document: document.id.clone(),
        statistics: StructureStatistics {
            text: document.stats(),
            sections: section_count,
            code_blocks: count_code_fences(text),
            links: links.len(),
        },
        structure: StructureOutline {
            headers: headings
                .iter()
                .map(|heading| HeadingEntry {
                    level: heading.level,
                    title: heading.title.clone(),
                    line: heading.line_number(),
                })
                .collect(),
            outline: outline(&headings),
        },
        content_analysis: ContentAnalysis {
            has_tables: text.contains("| "),
            has_images: text.contains("!["),
            has_code: text.contains("```") || text.contains("    "),
            external_links: links
                .into_iter()
                .filter(|link| link.starts_with("http"))
                .collect(),
        },
    }
}

/// Number of fence markers, so one fenced block counts twice.
pub fn count_code_fences(text: &str) -> usize {
    text.matches("```").count()
}

/// Markdown link targets and bare `http(s)://` URLs, in document order.
pub fn extract_links(text: &str, patterns: &TextPatterns) -> Vec<String> {
    patterns
        .link
        .captures_iter(text)
        .filter_map(|captures| {
            captures
                .get(2)
                .or_else(|| captures.get(0))
                .map(|target| target.as_str().to_string())
        })
        .collect()
}
