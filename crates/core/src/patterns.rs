use crate::error::EngineError;
use regex::Regex;

/// Every regular expression the kernels use, compiled once per coordinator.
#[derive(Debug, Clone)]
pub struct TextPatterns {
    pub extraction_marker: Regex,
    pub page_marker: Regex,
    pub page_error_marker: Regex,
    pub excess_line_breaks: Regex,
    pub hyphenated_line_break: Regex,
    pub lower_upper_join: Regex,
    pub space_runs: Regex,
    pub inline_code: Regex,
    pub bold: Regex,
    pub capitalized_word: Regex,
    pub fenced_code: Regex,
    pub link: Regex,
    pub definitions: Vec<Regex>,
    pub questions: Vec<Regex>,
}

impl TextPatterns {
    pub fn compile() -> Result<Self, EngineError> {
        Ok(Self {
            extraction_marker: Regex::new(r"(?m)^--- Page \d+(?: \(Error reading:.*?\))? ---$")?,
            page_marker: Regex::new(r"\n--- Page \d+ ---\n")?,
            page_error_marker: Regex::new(r"\n--- Page \d+ \(Error reading:.*?\) ---\n")?,
            excess_line_breaks: Regex::new(r"\n\s*\n\s*\n+")?,
            hyphenated_line_break: Regex::new(r"(\w)-\s*\n\s*(\w)")?,
            lower_upper_join: Regex::new(r"([a-z])([A-Z])")?,
            space_runs: Regex::new(r" +")?,
            inline_code: Regex::new(r"`([^`]+)`")?,
            bold: Regex::new(r"\*\*([^*]+)\*\*")?,
            capitalized_word: Regex::new(r"\b[A-Z][a-z]+\b")?,
            fenced_code: Regex::new(r"```[\s\S]*?```")?,
            link: Regex::new(r"\[([^\]]+)\]\(([^)]+)\)|https?://[^\s\])]+")?,
            definitions: vec![
                Regex::new(r"(?m)^([A-Z][^:\-\n]+):\s*(.+)$")?,
                Regex::new(r"(?m)^([A-Z][^:\-\n]+)\s*-\s*(.+)$")?,
                Regex::new(r"\*\*([^*]+)\*\*:\s*([^\n]+)")?,
                Regex::new(r"`([^`]+)`:\s*([^\n]+)")?,
            ],
            questions: vec![
                Regex::new(r"(?mi)(?:Q:|Question:|Q\d+:)\s*([^?]+\?)\s*(?:A:|Answer:)?\s*([^Q\n]+)")?,
                Regex::new(r"(?mi)(?:^|\n)([^.!?\n]*\?)\s*\n([^?\n]+)")?,
                Regex::new(r"(?mi)How (?:do|to|can) ([^?]+\?)\s*([^?\n]+)")?,
            ],
        })
    }
}
