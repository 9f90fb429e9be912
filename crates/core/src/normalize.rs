use crate::patterns::TextPatterns;
use std::borrow::Cow;

/// Drops page markers, collapses blank-line runs, rejoins words hyphenated
/// across a wrap, splits lowercase-uppercase joins and squeezes spaces.
pub fn normalize_extracted_text(text: &str, patterns: &TextPatterns) -> String {
    let text = patterns.page_marker.replace_all(text, "\n\n");
    let text = patterns.page_error_marker.replace_all(&text, "\n\n");
    let text = patterns.excess_line_breaks.replace_all(&text, "\n\n");
    let text = patterns.hyphenated_line_break.replace_all(&text, "${1}${2}");
    let text = patterns.lower_upper_join.replace_all(&text, "${1} ${2}");
    let text = patterns.space_runs.replace_all(&text, " ");
    text.trim().to_string()
}

/// True when the text carries `--- Page N ---` markers from PDF extraction.
pub fn has_extraction_artifacts(text: &str, patterns: &TextPatterns) -> bool {
    patterns.extraction_marker.is_match(text)
}

/// Text to compute sentence and word statistics on. Only extraction output is
/// rewritten; markdown and plain text pass through untouched.
pub fn statistics_text<'a>(text: &'a str, patterns: &TextPatterns) -> Cow<'a, str> {
    if has_extraction_artifacts(text, patterns) {
        Cow::Owned(normalize_extracted_text(text, patterns))
    } else {
        Cow::Borrowed(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns() -> TextPatterns {
        TextPatterns::compile().expect("patterns should compile")
    }

    #[test]
    fn page_markers_are_removed() {
        let raw = "Intro text\n--- Page 2 ---\nMore text\n--- Page 3 (Error reading: bad xref) ---\nEnd";
        let cleaned = normalize_extracted_text(raw, &patterns());
        assert_eq!(cleaned, "Intro text\n\nMore text\n\nEnd");
    }

    #[test]
    fn hyphenated_words_are_rejoined() {
        let cleaned = normalize_extracted_text("the config-\n  uration file", &patterns());
        assert_eq!(cleaned, "the configuration file");
    }

    #[test]
    fn glued_words_are_split_and_spaces_squeezed() {
        let cleaned = normalize_extracted_text("  endOf   line  ", &patterns());
        assert_eq!(cleaned, "end Of line");
    }

    #[test]
    fn markdown_without_page_markers_is_left_alone() {
        let patterns = patterns();
        let text = "Use GitHub Actions  daily.\n\n\n\nThe JavaScript bundle ships.";
        assert!(!has_extraction_artifacts(text, &patterns));
        assert!(matches!(statistics_text(text, &patterns), Cow::Borrowed(same) if same == text));
    }

    #[test]
    fn extracted_pages_are_detected_and_cleaned() {
        let patterns = patterns();
        let first_page = "--- Page 1 ---\nThe config-\nuration file";
        assert!(has_extraction_artifacts(first_page, &patterns));
        assert!(has_extraction_artifacts("a\n--- Page 4 (Error reading: bad xref) ---\nb", &patterns));
        assert_eq!(
            statistics_text("intro\n--- Page 2 ---\nendOf line", &patterns),
            "intro\n\nend Of line"
        );
    }

    #[test]
    fn blank_line_runs_collapse() {
        let cleaned = normalize_extracted_text("a\n\n\n\nb", &patterns());
        assert_eq!(cleaned, "a\n\nb");
    }
}
