use crate::models::{Document, SectionView};
use crate::patterns::TextPatterns;
use crate::structure::sections;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const GLOSSARY_TITLES: [&str; 4] = ["glossary", "definition", "terminology", "terms"];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DefinitionKind {
    Explicit,
    Glossary,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Definition {
    pub term: String,
    pub definition: String,
    pub kind: DefinitionKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DefinitionReport {
    pub document: String,
    pub definitions: Vec<Definition>,
    pub glossary_terms: Vec<Definition>,
    pub technical_terms: Vec<String>,
    pub total_definitions: usize,
    /// Definitions per whitespace-delimited word.
    pub definition_density: f64,
}

pub fn extract_definitions(document: &Document, patterns: &TextPatterns) -> DefinitionReport {
    let text = &document.text;

    let definitions: Vec<Definition> = patterns
        .definitions
        .iter()
        .flat_map(|pattern| pattern.captures_iter(text))
        .filter_map(|captures| {
            let term = captures.get(1)?.as_str().trim();
            let definition = captures.get(2)?.as_str().trim();
            Some(Definition {
                term: term.to_string(),
                definition: definition.to_string(),
                kind: DefinitionKind::Explicit,
            })
        })
        .collect();

    let glossary_terms: Vec<Definition> = sections(text, SectionView::Flat)
        .iter()
        .filter(|section| {
            let title = section.title.to_lowercase();
            GLOSSARY_TITLES.iter().any(|keyword| title.contains(keyword))
        })
        .flat_map(|section| {
            section
                .content
                .split('\n')
                .filter_map(glossary_entry)
                .collect::<Vec<_>>()
        })
        .collect();

    let technical_terms: BTreeSet<String> = patterns
        .inline_code
        .captures_iter(text)
        .filter_map(|captures| captures.get(1).map(|term| term.as_str().to_string()))
        .collect();

    let total = definitions.len() + glossary_terms.len();
    let word_count = document.stats().words;
    DefinitionReport {
        document: document.id.clone(),
        definitions,
        glossary_terms,
        technical_terms: technical_terms.into_iter().collect(),
        total_definitions: total,
        definition_density: if word_count == 0 {
            0.0
        } else {
            total as f64 / word_count as f64
        },
    }
}

/// `term: definition`, or `term - definition` when the line has no colon.
/// Lines that split into anything other than two parts are ignored.
fn glossary_entry(line: &str) -> Option<Definition> {
    let separator = if line.contains(':') {
        ':'
    } else if line.contains('-') {
        '-'
    } else {
        return None;
    };

    let parts: Vec<&str> = line.split(separator).collect();
    let [term, definition] = parts.as_slice() else {
        return None;
    };
    let term = term.trim();
    if term.is_empty() {
        return None;
    }

    Some(Definition {
        term: term.to_string(),
        definition: definition.trim().to_string(),
        kind: DefinitionKind::Glossary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns() -> TextPatterns {
        TextPatterns::compile().expect("patterns should compile")
    }

    #[test]
    fn explicit_patterns_are_found() {
        let text = "Corpus: the full set of documents\n\
            Snippet - a short excerpt\n\
            a **Section**: a heading subtree\n\
            use `max_results`: caps output";
        let report = extract_definitions(&Document::new("d.md", text), &patterns());
        let terms: Vec<&str> = report.definitions.iter().map(|d| d.term.as_str()).collect();
        assert_eq!(terms, vec!["Corpus", "Snippet", "Section", "max_results"]);
        assert_eq!(report.definitions[0].definition, "the full set of documents");
        assert_eq!(report.technical_terms, vec!["max_results".to_string()]);
    }

    #[test]
    fn glossary_sections_yield_entries() {
        let text = "# Intro\nplain text\n## Glossary\nflat view: headings only\nsection - a subtree\n- bullet only\nno separator";
        let report = extract_definitions(&Document::new("g.md", text), &patterns());
        assert_eq!(report.glossary_terms.len(), 2);
        assert_eq!(report.glossary_terms[0].term, "flat view");
        assert_eq!(report.glossary_terms[1].definition, "a subtree");
        assert!(report.glossary_terms.iter().all(|d| d.kind == DefinitionKind::Glossary));
    }

    #[test]
    fn density_is_zero_for_empty_text() {
        let report = extract_definitions(&Document::new("e.md", ""), &patterns());
        assert_eq!(report.total_definitions, 0);
        assert_eq!(report.definition_density, 0.0);
    }
}
