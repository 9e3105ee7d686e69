//! Shared utility functions.

/// One-line preview of `s` for log fields: newlines become spaces and the
/// result is cut to at most `max_bytes` on a UTF-8 boundary.
pub fn log_preview(s: &str, max_bytes: usize) -> String {
    let flat = s.replace(['\r', '\n'], " ");
    if flat.len() <= max_bytes {
        return flat;
    }
    let mut end = max_bytes;
    while end > 0 && !flat.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &flat[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_flattens_newlines() {
        assert_eq!(log_preview("ls\n-la", 20), "ls -la");
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        // 'の' is 3 bytes; cutting at 4 backs up to 3
        assert_eq!(log_preview("あのね", 4), "あ...");
        assert_eq!(log_preview("hello world", 5), "hello...");
    }

    #[test]
    fn test_preview_short_is_unchanged() {
        assert_eq!(log_preview("", 10), "");
        assert_eq!(log_preview("hi", 10), "hi");
    }
}
