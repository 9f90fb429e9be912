use crate::config::ConceptOptions;
use crate::models::{Concept, ConceptCategory};
use crate::patterns::TextPatterns;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConceptReport {
    pub document: String,
    pub min_frequency: usize,
    pub concepts: Vec<Concept>,
}

pub fn extract_concepts(
    text: &str,
    min_frequency: usize,
    options: &ConceptOptions,
    patterns: &TextPatterns,
) -> Vec<Concept> {
    let technical = count_in_order(
        patterns
            .inline_code
            .captures_iter(text)
            .filter_map(|captures| captures.get(1).map(|term| term.as_str())),
    );
    let emphasized = count_in_order(
        patterns
            .bold
            .captures_iter(text)
            .filter_map(|captures| captures.get(1).map(|term| term.as_str())),
    );
    let proper_nouns = count_in_order(
        patterns
            .capitalized_word
            .find_iter(text)
            .map(|word| word.as_str())
            .filter(|word| word.chars().count() > options.proper_noun_min_len),
    );

    let passes = [
        (technical, ConceptCategory::TechnicalTerm),
        (emphasized, ConceptCategory::EmphasizedTerm),
        (proper_nouns, ConceptCategory::ProperNoun),
    ];

    let mut concepts: Vec<Concept> = passes
        .into_iter()
        .flat_map(|(counts, category)| {
            counts
                .into_iter()
                .filter(|(_, frequency)| *frequency >= min_frequency)
                .map(move |(term, frequency)| Concept {
                    term: term.to_string(),
                    frequency,
                    category,
                })
        })
        .collect();

    concepts.sort_by(|left, right| right.frequency.cmp(&left.frequency));
    concepts.truncate(options.max_concepts);
    concepts
}

fn count_in_order<'a>(items: impl Iterator<Item = &'a str>) -> Vec<(&'a str, usize)> {
    let mut positions: HashMap<&'a str, usize> = HashMap::new();
    let mut counts: Vec<(&'a str, usize)> = Vec::new();
    for item in items {
        match positions.get(item) {
            Some(&position) => counts[position].1 += 1,
            None => {
                positions.insert(item, counts.len());
                counts.push((item, 1));
            }
        }
    }
    counts
}
