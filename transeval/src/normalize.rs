//! Text normalization applied to references and predictions before scoring

use unicode_normalization::UnicodeNormalization;

/// Trim surrounding whitespace and apply Unicode NFC.
pub fn normalize_text(text: &str) -> String {
    text.trim().nfc().collect()
}

/// Normalize every cell of a column.
pub fn normalize_column(values: &[String]) -> Vec<String> {
    values.iter().map(|v| normalize_text(v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_whitespace() {
        assert_eq!(normalize_text("  hello world \n"), "hello world");
        assert_eq!(normalize_text("\t\u{3000}text\u{3000}"), "text");
    }

    #[test]
    fn test_composes_combining_marks() {
        assert_eq!(normalize_text("cafe\u{301}"), "café");
        assert_eq!(normalize_text("cafe\u{301}"), normalize_text("café"));
    }

    #[test]
    fn test_empty_and_blank() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text("   "), "");
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(normalize_text("already clean"), "already clean");
    }

    #[test]
    fn test_inner_whitespace_kept() {
        assert_eq!(normalize_text(" a  b "), "a  b");
    }

    #[test]
    fn test_normalize_column() {
        let column = vec![" a ".to_string(), "e\u{301}".to_string(), String::new()];
        assert_eq!(normalize_column(&column), vec!["a", "é", ""]);
    }
}
