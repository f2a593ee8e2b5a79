//! Edit-distance based string similarity.

/// Levenshtein distance between two strings, counted in chars.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Single rolling row.
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut prev_diag = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            let next = (row[j] + 1).min(row[j + 1] + 1).min(prev_diag + cost);
            prev_diag = row[j + 1];
            row[j + 1] = next;
        }
    }
    row[b.len()]
}

/// Normalized similarity in `[0, 1]`: `1 - distance / max_len`.
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / max_len as f64
}

/// Whether `term` is close to `target` as a whole or to any of its words.
///
/// Both sides are compared lower-cased.
pub fn is_fuzzy_match(term: &str, target: &str, threshold: f64) -> bool {
    let term = term.to_lowercase();
    let target = target.to_lowercase();

    if similarity(&term, &target) >= threshold {
        return true;
    }
    target
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .any(|w| similarity(&term, w) >= threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_basics() {
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("", "ab"), 2);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("rust", "rust"), 0);
    }

    #[test]
    fn test_levenshtein_counts_chars_not_bytes() {
        assert_eq!(levenshtein("café", "cafe"), 1);
    }

    #[test]
    fn test_similarity_range() {
        assert!((similarity("", "") - 1.0).abs() < 1e-9);
        assert!((similarity("abcd", "abcd") - 1.0).abs() < 1e-9);
        assert!((similarity("abcd", "wxyz") - 0.0).abs() < 1e-9);
        // one substitution in five chars
        assert!((similarity("react", "reakt") - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_fuzzy_match_against_title_word() {
        assert!(is_fuzzy_match("portfolo", "Portfolio Site", 0.8));
        assert!(is_fuzzy_match("reakt", "React Dashboard", 0.8));
        assert!(!is_fuzzy_match("python", "React Dashboard", 0.8));
    }
}
