use crate::config::ConceptOptions;
use crate::models::{Document, SectionView};
use crate::patterns::TextPatterns;
use crate::structure::sections;
use serde::{Deserialize, Serialize};

const FAQ_TITLES: [&str; 4] = ["faq", "question", "q&a", "troubleshoot"];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QaSource {
    Faq,
    Extracted,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
    pub source: QaSource,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QaReport {
    pub document: String,
    pub qa_pairs: Vec<QaPair>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CorpusQa {
    /// Only documents that yielded at least one pair.
    pub qa_by_document: Vec<QaReport>,
    pub total_pairs: usize,
}

impl CorpusQa {
    pub fn from_reports(reports: impl IntoIterator<Item = QaReport>) -> Self {
        let qa_by_document: Vec<QaReport> = reports
            .into_iter()
            .filter(|report| !report.qa_pairs.is_empty())
            .collect();
        Self {
            total_pairs: qa_by_document.iter().map(|report| report.qa_pairs.len()).sum(),
            qa_by_document,
        }
    }
}

pub fn extract_qa_pairs(
    document: &Document,
    options: &ConceptOptions,
    patterns: &TextPatterns,
) -> QaReport {
    let text = &document.text;

    let mut pairs: Vec<QaPair> = sections(text, SectionView::Flat)
        .iter()
        .filter(|section| {
            let title = section.title.to_lowercase();
            FAQ_TITLES.iter().any(|keyword| title.contains(keyword))
        })
        .flat_map(|section| faq_pairs(&section.content))
        .collect();

    pairs.extend(
        patterns
            .questions
            .iter()
            .flat_map(|pattern| pattern.captures_iter(text))
            .filter_map(|captures| {
                let question = captures.get(1)?.as_str().trim();
                let answer = captures.get(2)?.as_str().trim();
                Some(QaPair {
                    question: question.to_string(),
                    answer: answer.chars().take(options.max_answer_chars).collect(),
                    source: QaSource::Extracted,
                })
            }),
    );

    pairs.truncate(options.max_qa_pairs);
    QaReport {
        document: document.id.clone(),
        qa_pairs: pairs,
    }
}

/// Question lines (ending in `?`) followed by answer lines. A blank line or
/// the next question closes the current pair; questions with no answer
/// lines are dropped.
fn faq_pairs(content: &str) -> Vec<QaPair> {
    let mut pairs = Vec::new();
    let mut question: Option<&str> = None;
    let mut answer: Vec<&str> = Vec::new();

    for line in content.split('\n').map(str::trim) {
        let is_question = line.ends_with('?');
        match question {
            None if is_question => question = Some(line),
            None => {}
            Some(_) if !line.is_empty() && !is_question => answer.push(line),
            Some(current) => {
                if !answer.is_empty() {
                    pairs.push(faq_pair(current, &answer));
                }
                question = is_question.then_some(line);
                answer.clear();
            }
        }
    }

    if let Some(current) = question {
        if !answer.is_empty() {
            pairs.push(faq_pair(current, &answer));
        }
    }
    pairs
}

fn faq_pair(question: &str, answer: &[&str]) -> QaPair {
    QaPair {
        question: question.to_string(),
        answer: answer.join(" "),
        source: QaSource::Faq,
    }
}
