//! Utility functions for string truncation and query encoding.
//!
//! This module provides helper functions used throughout the application:
//! - Character-safe truncation for article bodies and log previews
//! - Query encoding for the search endpoint's `s` parameter

/// Return the first `max` characters of `s`.
///
/// Counts Unicode scalar values, not bytes, so a multi-byte character is never
/// split.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_chars("héllo", 2), "hé");
/// assert_eq!(truncate_chars("short", 100), "short");
/// ```
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` characters with an ellipsis and
/// byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    let head = truncate_chars(s, max);
    if head.len() == s.len() {
        s.to_string()
    } else {
        format!("{}…(+{} bytes)", head, s.len() - head.len())
    }
}

/// Encode a free-text query for the `s` parameter.
///
/// Reserved characters are percent-encoded and spaces become `+`, the form the
/// site's own search box produces.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(encode_query("hotel expansion Egypt 2025"), "hotel+expansion+Egypt+2025");
/// ```
pub fn encode_query(query: &str) -> String {
    urlencoding::encode(query).replace("%20", "+")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_short_string() {
        assert_eq!(truncate_chars("Hello", 10), "Hello");
        assert_eq!(truncate_chars("Hello", 5), "Hello");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        let s = "مصر".repeat(10);
        let t = truncate_chars(&s, 4);
        assert_eq!(t.chars().count(), 4);
        assert_eq!(t, "مصرم");
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_encode_query() {
        assert_eq!(
            encode_query("hotel expansion Egypt 2025"),
            "hotel+expansion+Egypt+2025"
        );
        assert_eq!(encode_query("a&b"), "a%26b");
        assert_eq!(encode_query(""), "");
    }
}
