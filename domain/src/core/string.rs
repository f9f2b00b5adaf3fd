//! String utilities for the domain layer.

/// Truncate a string to a maximum length with ellipsis (UTF-8 safe)
///
/// Uses byte length for max_len but ensures truncation occurs at valid
/// UTF-8 character boundaries. Used for one-line previews of message
/// content in logs and progress output.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let target = max_len.saturating_sub(3);
        let mut end = target.min(s.len());
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}

/// Collapse a multi-line string into a single line preview.
pub fn one_line(s: &str, max_len: usize) -> String {
    let joined = s.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate(&joined, max_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
    }

    #[test]
    fn test_truncate_multibyte() {
        // 'é' is 2 bytes
        assert_eq!(truncate("café au lait", 30), "café au lait");
        // target = 4 lands inside 'é' (bytes 3..5), backs up to 3
        assert_eq!(truncate("café au lait", 7), "caf...");
    }

    #[test]
    fn test_one_line_collapses_whitespace() {
        assert_eq!(one_line("STATUS: SUCCESS\n\n  done", 100), "STATUS: SUCCESS done");
        assert_eq!(one_line("a\nb\nc", 4), "a...");
    }
}
