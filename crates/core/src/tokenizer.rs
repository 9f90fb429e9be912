use std::collections::HashMap;

pub const STOPWORDS: [&str; 42] = [
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is",
    "are", "was", "were", "be", "been", "have", "has", "had", "do", "does", "did", "will", "would",
    "could", "should", "may", "might", "can", "this", "that", "these", "those", "it", "its",
    "they", "them", "their",
];

const MIN_SENTENCE_CHARS: usize = 11;
const MIN_WORD_CHARS: usize = 3;

pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}

pub fn split_sentences(text: &str) -> Vec<&str> {
    split_on(text, false)
        .into_iter()
        .map(str::trim)
        .filter(|sentence| sentence.chars().count() >= MIN_SENTENCE_CHARS)
        .collect()
}

pub fn split_search_units(text: &str) -> Vec<&str> {
    split_on(text, true)
}

fn split_on(text: &str, paragraph_breaks: bool) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut cursor = 0;

    while cursor < bytes.len() {
        let is_mark = is_terminal(bytes[cursor]);
        let is_break = paragraph_breaks
            && bytes[cursor] == b'\n'
            && bytes.get(cursor + 1) == Some(&b'\n');

        if !is_mark && !is_break {
            cursor += 1;
            continue;
        }

        pieces.push(&text[start..cursor]);
        if is_mark {
            while cursor < bytes.len() && is_terminal(bytes[cursor]) {
                cursor += 1;
            }
        } else {
            while cursor < bytes.len() && bytes[cursor] == b'\n' {
                cursor += 1;
            }
        }
        start = cursor;
    }

    pieces.push(&text[start..]);
    pieces
}

fn is_terminal(byte: u8) -> bool {
    matches!(byte, b'.' | b'!' | b'?')
}

// `abc123` and `snake_case` are single runs and yield nothing.
pub fn extract_words(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    lowered
        .split(|ch: char| !(ch.is_alphanumeric() || ch == '_'))
        .filter(|run| run.len() >= MIN_WORD_CHARS)
        .filter(|run| run.bytes().all(|byte| byte.is_ascii_alphabetic()))
        .filter(|run| !is_stopword(run))
        .map(str::to_string)
        .collect()
}

pub fn word_frequencies(words: &[String]) -> HashMap<&str, usize> {
    let mut frequencies = HashMap::new();
    for word in words {
        *frequencies.entry(word.as_str()).or_insert(0) += 1;
    }
    frequencies
}

/// Heuristic syllable estimate: the number of vowel runs (`aeiouy`), minus one
/// for a trailing silent `e`. Not a dictionary lookup, so irregular words are
/// miscounted.
pub fn estimate_syllables(word: &str) -> usize {
    let lowered = word.to_lowercase();
    if lowered.chars().count() <= 3 {
        return 1;
    }

    let mut count = 0usize;
    let mut previous_was_vowel = false;
    for ch in lowered.chars() {
        let is_vowel = matches!(ch, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
        if is_vowel && !previous_was_vowel {
            count += 1;
        }
        previous_was_vowel = is_vowel;
    }

    if lowered.ends_with('e') && count > 1 {
        count -= 1;
    }

    count.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentences_drop_short_fragments() {
        let sentences = split_sentences("Hi. This is a full sentence!! And another one? ok");
        assert_eq!(sentences, vec!["This is a full sentence", "And another one"]);
    }

    #[test]
    fn search_units_break_on_blank_lines() {
        let units = split_search_units("first line\n\nsecond line. third");
        assert_eq!(units, vec!["first line", "second line", " third"]);
    }

    #[test]
    fn words_are_filtered_and_lowercased() {
        let words = extract_words("The Installer runs on Linux, abc123 and snake_case don't count.");
        assert_eq!(words, vec!["installer", "runs", "linux", "don", "count"]);
    }

    #[test]
    fn stopword_list_has_expected_size() {
        assert_eq!(STOPWORDS.len(), 42);
        assert!(is_stopword("should"));
        assert!(is_stopword("their"));
        assert_eq!(extract_words("their docs"), vec!["docs"]);
        assert!(!is_stopword("must"));
    }

    #[test]
    fn syllable_heuristic() {
        assert_eq!(estimate_syllables("cat"), 1);
        assert_eq!(estimate_syllables("fast"), 1);
        assert_eq!(estimate_syllables("configure"), 3);
        assert_eq!(estimate_syllables("readability"), 5);
        assert_eq!(estimate_syllables("rhythm"), 1);
        assert_eq!(estimate_syllables("make"), 1);
    }

    #[test]
    fn frequencies_count_repeats() {
        let words = extract_words("deploy the service, then deploy again");
        let frequencies = word_frequencies(&words);
        assert_eq!(frequencies.get("deploy"), Some(&2));
        assert_eq!(frequencies.get("service"), Some(&1));
    }
}
