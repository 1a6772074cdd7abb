//! Input normalization applied to all free text before comparison.
//!
//! Every text block, whether typed into a JSON body or extracted from an
//! uploaded document, goes through [`clean_text`] before it is forwarded to
//! the Space.

/// Collapses whitespace runs to single spaces, trims, and truncates to
/// `max_chars` characters.
pub fn clean_text(input: &str, max_chars: usize) -> String {
    let mut collapsed = String::with_capacity(input.len());
    for (i, token) in input.split_whitespace().enumerate() {
        if i > 0 {
            collapsed.push(' ');
        }
        collapsed.push_str(token);
    }

    match collapsed.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => {
            collapsed.truncate(byte_idx);
            collapsed
        }
        None => collapsed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_whitespace_runs() {
        assert_eq!(clean_text("hello   world", 100), "hello world");
        assert_eq!(clean_text("a\t\tb\n\nc", 100), "a b c");
    }

    #[test]
    fn test_trims_leading_and_trailing() {
        assert_eq!(clean_text("  hello  ", 100), "hello");
        assert_eq!(clean_text("\n\nhello\n", 100), "hello");
    }

    #[test]
    fn test_empty_and_whitespace_only() {
        assert_eq!(clean_text("", 100), "");
        assert_eq!(clean_text("   \t\n  ", 100), "");
    }

    #[test]
    fn test_truncates_to_max_chars() {
        assert_eq!(clean_text("abcdef", 4), "abcd");
        assert_eq!(clean_text("abc", 4), "abc");
    }

    #[test]
    fn test_truncation_counts_chars_not_bytes() {
        // Kannada characters are multi-byte in UTF-8.
        let text = "ನಮಸ್ಕಾರ";
        let cleaned = clean_text(text, 3);
        assert_eq!(cleaned.chars().count(), 3);
    }
}
