//! Property-based tests for text normalization and tokenization

use proptest::prelude::*;
use transeval::normalize::normalize_text;
use transeval_metrics::Tokenizer;

proptest! {
    #[test]
    fn normalize_is_idempotent(s in "\\PC{0,40}") {
        let once = normalize_text(&s);
        prop_assert_eq!(normalize_text(&once), once);
    }

    #[test]
    fn surrounding_whitespace_is_ignored(
        s in "\\PC{0,40}",
        left in "[ \t\n]{0,4}",
        right in "[ \t\n]{0,4}",
    ) {
        let padded = format!("{}{}{}", left, s, right);
        prop_assert_eq!(normalize_text(&padded), normalize_text(&s));
    }

    #[test]
    fn normalized_text_has_no_outer_whitespace(s in any::<String>()) {
        let out = normalize_text(&s);
        prop_assert_eq!(out.trim(), out.as_str());
    }

    #[test]
    fn tokenized_text_is_whitespace_collapsed(s in "[a-z0-9 .,!?()-]{0,40}") {
        let out = Tokenizer::Thirteen.tokenize(&s);
        prop_assert!(!out.contains("  "));
        prop_assert_eq!(out.trim(), out.as_str());
    }

    #[test]
    fn tokenizing_only_inserts_spaces(s in "[a-z0-9 .,!?()-]{0,40}") {
        let out = Tokenizer::Thirteen.tokenize(&s);
        prop_assert_eq!(out.replace(' ', ""), s.replace(' ', ""));
    }
}
