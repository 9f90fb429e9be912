// One folded char per source char, so indices line up with the original.
pub fn fold_char(ch: char) -> char {
    ch.to_lowercase().next().unwrap_or(ch)
}

pub fn fold(text: &str) -> Vec<char> {
    text.chars().map(fold_char).collect()
}

pub fn fold_to_string(text: &str) -> String {
    text.chars().map(fold_char).collect()
}

pub fn find_chars(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    if from > haystack.len() {
        return None;
    }
    if needle.is_empty() {
        return Some(from);
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|offset| from + offset)
}

pub fn contains_chars(haystack: &[char], needle: &[char]) -> bool {
    find_chars(haystack, needle, 0).is_some()
}

#[derive(Debug, Clone)]
pub struct FoldedText {
    original: Vec<char>,
    folded: Vec<char>,
}

impl FoldedText {
    pub fn new(text: &str) -> Self {
        let original: Vec<char> = text.chars().collect();
        let folded = original.iter().copied().map(fold_char).collect();
        Self { original, folded }
    }

    pub fn len(&self) -> usize {
        self.original.len()
    }

    pub fn is_empty(&self) -> bool {
        self.original.is_empty()
    }

    pub fn find(&self, needle: &[char], from: usize) -> Option<usize> {
        find_chars(&self.folded, needle, from)
    }

    pub fn count(&self, needle: &[char]) -> usize {
        if needle.is_empty() {
            return 0;
        }
        let mut total = 0;
        let mut from = 0;
        while let Some(position) = self.find(needle, from) {
            total += 1;
            from = position + needle.len();
        }
        total
    }

    /// Start positions of the first `limit` occurrences, overlaps allowed.
    pub fn positions(&self, needle: &[char], limit: usize) -> Vec<usize> {
        let mut found = Vec::new();
        if needle.is_empty() {
            return found;
        }
        let mut from = 0;
        while found.len() < limit {
            match self.find(needle, from) {
                Some(position) => {
                    found.push(position);
                    from = position + 1;
                }
                None => break,
            }
        }
        found
    }

    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.original.len());
        let start = start.min(end);
        self.original[start..end].iter().collect()
    }

    /// `radius` characters either side of `center`, newlines flattened.
    pub fn window(&self, center: usize, radius: usize) -> String {
        let start = center.saturating_sub(radius);
        let end = center.saturating_add(radius);
        flatten_newlines(&self.slice(start, end))
    }

    /// A `length`-character excerpt starting `length / 2` characters before
    /// `position`, with `...` marking each truncated edge.
    pub fn excerpt(&self, position: usize, length: usize) -> String {
        let start = position.saturating_sub(length / 2);
        let end = (start + length).min(self.len());
        let mut excerpt = self.slice(start, end);
        if start > 0 {
            excerpt.insert_str(0, "...");
        }
        if end < self.len() {
            excerpt.push_str("...");
        }
        flatten_newlines(&excerpt)
    }
}

pub fn flatten_newlines(text: &str) -> String {
    text.replace('\n', " ")
}

pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_string(),
    }
}
