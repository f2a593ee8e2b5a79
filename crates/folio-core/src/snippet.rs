//! Densest-window excerpt extraction.
//!
//! A fixed 120-char window slides over the text in 20-char strides, plus one
//! window flush with the end so the tail is never skipped. The first window
//! with the most case-insensitive term occurrences wins.

/// Window width in chars.
pub const WINDOW_CHARS: usize = 120;
/// Distance between consecutive window starts.
pub const STRIDE_CHARS: usize = 20;

const ELLIPSIS: &str = "...";

/// Return the excerpt of `text` with the highest density of `terms`.
///
/// Texts that already fit in one window come back unchanged. Otherwise the
/// excerpt is prefixed with `...` when it starts after the first char and
/// suffixed with `...` when it ends before the last.
pub fn extract_snippet(text: &str, terms: &[String]) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= WINDOW_CHARS {
        return text.to_string();
    }

    // Full lowercase per char: some chars (e.g. 'İ') expand to several.
    let lowered: Vec<String> = chars.iter().map(|c| c.to_lowercase().collect()).collect();
    let needles: Vec<String> = terms
        .iter()
        .map(|t| t.to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();
    let density = |start: usize| -> usize {
        let window = lowered[start..start + WINDOW_CHARS].concat();
        needles.iter().map(|n| window.matches(n.as_str()).count()).sum()
    };

    let last_start = chars.len() - WINDOW_CHARS;
    let mut best_start = 0usize;
    let mut best_count = 0usize;
    let mut start = 0usize;
    while start <= last_start {
        let count = density(start);
        if count > best_count {
            best_count = count;
            best_start = start;
        }
        start += STRIDE_CHARS;
    }
    if last_start % STRIDE_CHARS != 0 && density(last_start) > best_count {
        best_start = last_start;
    }

    let end = best_start + WINDOW_CHARS;
    let mut out = String::with_capacity(WINDOW_CHARS + 2 * ELLIPSIS.len());
    if best_start > 0 {
        out.push_str(ELLIPSIS);
    }
    out.extend(&chars[best_start..end]);
    if end < chars.len() {
        out.push_str(ELLIPSIS);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_short_text_returned_unchanged() {
        let text = "Short body about Rust.";
        assert_eq!(extract_snippet(text, &terms(&["rust"])), text);
    }

    #[test]
    fn test_no_match_returns_leading_window() {
        let text = "x".repeat(300);
        let snippet = extract_snippet(&text, &terms(&["rust"]));
        assert!(!snippet.starts_with(ELLIPSIS));
        assert!(snippet.ends_with(ELLIPSIS));
        assert_eq!(snippet.chars().count(), WINDOW_CHARS + ELLIPSIS.len());
    }

    #[test]
    fn test_picks_densest_window() {
        // 500 chars: one hit near the start, three hits clustered at 300.
        let mut body = String::new();
        body.push_str("rust");
        body.push_str(&"a".repeat(296));
        body.push_str("rust rust rust");
        while body.chars().count() < 500 {
            body.push('b');
        }
        assert_eq!(body.chars().count(), 500);

        let snippet = extract_snippet(&body, &terms(&["rust"]));
        assert!(snippet.starts_with(ELLIPSIS));
        assert!(snippet.ends_with(ELLIPSIS));
        assert_eq!(snippet.matches("rust").count(), 3);
    }

    #[test]
    fn test_case_insensitive_counting() {
        let mut body = "z".repeat(200);
        body.push_str("RUST Rust rust");
        body.push_str(&"z".repeat(200));
        let snippet = extract_snippet(&body, &terms(&["rust"]));
        assert!(snippet.contains("RUST Rust rust"));
    }

    #[test]
    fn test_ties_keep_first_window() {
        let text: String = "abcdefghij".repeat(30);
        // every stride-aligned window holds the same twelve "cde" hits
        let snippet = extract_snippet(&text, &terms(&["cde"]));
        assert!(snippet.starts_with("abcdefghij"));
    }

    #[test]
    fn test_multibyte_text_is_safe() {
        let text = "é".repeat(200) + "rust" + &"ü".repeat(200);
        let snippet = extract_snippet(&text, &terms(&["rust"]));
        assert!(snippet.contains("rust"));
    }

    #[test]
    fn test_hit_in_unaligned_tail_is_found() {
        // 250 chars: the last stride-aligned window ends at 240
        let text = "a".repeat(240) + "rust" + &"b".repeat(6);
        let snippet = extract_snippet(&text, &terms(&["rust"]));
        assert!(snippet.contains("rust"));
        assert!(snippet.starts_with(ELLIPSIS));
        assert!(!snippet.ends_with(ELLIPSIS));
        assert!(snippet.ends_with("bbbbbb"));
    }

    #[test]
    fn test_expanding_lowercase_chars_match() {
        let text = "x".repeat(200) + "İstanbul" + &"y".repeat(200);
        let snippet = extract_snippet(&text, &terms(&["İstanbul"]));
        assert!(snippet.contains("İstanbul"));
    }

    #[test]
    fn test_occurrences_counted_without_overlap() {
        // "aaaa" holds two "aa", so the later window wins over "aaa" + "a"
        let text = "z".repeat(100) + "aaa" + &"z".repeat(140) + "aaaa" + &"z".repeat(100);
        let snippet = extract_snippet(&text, &terms(&["aa"]));
        assert!(snippet.contains("aaaa"));
    }
}
