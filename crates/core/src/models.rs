use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Root-relative path, e.g. `guides/setup.md`.
    pub id: String,
    pub text: String,
    /// Hex SHA-256 of `text`.
    pub checksum: String,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let checksum = content_checksum(&text);
        Self {
            id: id.into(),
            text,
            checksum,
        }
    }

    pub fn stats(&self) -> TextStats {
        TextStats::of(&self.text)
    }

    pub fn extension(&self) -> String {
        std::path::Path::new(&self.id)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext.to_lowercase()))
            .unwrap_or_default()
    }
}

pub fn content_checksum(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TextStats {
    pub words: usize,
    pub lines: usize,
    pub characters: usize,
}

impl TextStats {
    pub fn of(text: &str) -> Self {
        Self {
            words: text.split_whitespace().count(),
            lines: text.split('\n').count(),
            characters: text.chars().count(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Heading {
    pub level: usize,
    /// Title with the marker run stripped.
    pub title: String,
    pub raw: String,
    /// 0-based line index into the source text.
    pub line_index: usize,
}

impl Heading {
    pub fn line_number(&self) -> usize {
        self.line_index + 1
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub clean_title: String,
    pub level: usize,
    pub content: String,
    /// Only set for hierarchical sections.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub includes_subsections: Option<bool>,
}

impl Section {
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum SectionView {
    Flat,
    #[default]
    Hierarchical,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ConceptCategory {
    TechnicalTerm,
    EmphasizedTerm,
    ProperNoun,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Concept {
    pub term: String,
    pub frequency: usize,
    pub category: ConceptCategory,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkippedDocument {
    pub id: String,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_count_words_lines_and_chars() {
        let stats = TextStats::of("one two\nthree");
        assert_eq!(stats.words, 3);
        assert_eq!(stats.lines, 2);
        assert_eq!(stats.characters, 13);
    }

    #[test]
    fn checksum_is_stable_for_same_text() {
        let first = Document::new("a.md", "same body");
        let second = Document::new("b.md", "same body");
        assert_eq!(first.checksum, second.checksum);
        assert_eq!(first.checksum.len(), 64);
    }

    #[test]
    fn extension_is_lowercased_with_dot() {
        assert_eq!(Document::new("guide/Setup.MD", "").extension(), ".md");
        assert_eq!(Document::new("README", "").extension(), "");
    }
}
