//! chrF and chrF++ (Popović, 2015)
//!
//! Character n-gram F-score, optionally extended with word n-grams.

use std::collections::HashMap;
use std::ops::AddAssign;

use crate::ngrams::{clipped_matches, count_ngrams};

const EPSILON: f64 = 1e-16;

/// chrF configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ChrfOptions {
    pub char_order: usize,
    /// 0 for chrF, 2 for chrF++
    pub word_order: usize,
    pub beta: f64,
    /// Keep whitespace inside character n-grams
    pub whitespace: bool,
    pub lowercase: bool,
}

impl Default for ChrfOptions {
    fn default() -> Self {
        Self {
            char_order: 6,
            word_order: 0,
            beta: 2.0,
            whitespace: false,
            lowercase: false,
        }
    }
}

impl ChrfOptions {
    pub fn total_order(&self) -> usize {
        self.char_order + self.word_order
    }
}

/// Counts for a single n-gram order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderStats {
    pub hyp: usize,
    pub reference: usize,
    pub matched: usize,
}

/// Per-order statistics, character orders first, then word orders
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChrfStats {
    pub orders: Vec<OrderStats>,
}

impl ChrfStats {
    pub fn empty(options: &ChrfOptions) -> Self {
        Self {
            orders: vec![OrderStats::default(); options.total_order()],
        }
    }

    /// F-beta over the averaged precision and recall, as a percentage
    pub fn f_score(&self, beta: f64) -> f64 {
        let factor = beta * beta;
        let mut avg_prec = 0.0;
        let mut avg_rec = 0.0;
        let mut effective_order = 0;

        for order in &self.orders {
            let prec = if order.hyp > 0 {
                order.matched as f64 / order.hyp as f64
            } else {
                EPSILON
            };
            let rec = if order.reference > 0 {
                order.matched as f64 / order.reference as f64
            } else {
                EPSILON
            };
            if order.hyp > 0 && order.reference > 0 {
                effective_order += 1;
            }
            avg_prec += prec;
            avg_rec += rec;
        }

        if effective_order == 0 {
            return 0.0;
        }
        avg_prec /= effective_order as f64;
        avg_rec /= effective_order as f64;

        if avg_prec + avg_rec == 0.0 {
            return 0.0;
        }
        100.0 * (1.0 + factor) * avg_prec * avg_rec / (factor * avg_prec + avg_rec)
    }
}

impl AddAssign<&ChrfStats> for ChrfStats {
    fn add_assign(&mut self, other: &ChrfStats) {
        if self.orders.len() < other.orders.len() {
            self.orders.resize(other.orders.len(), OrderStats::default());
        }
        for (mine, theirs) in self.orders.iter_mut().zip(&other.orders) {
            mine.hyp += theirs.hyp;
            mine.reference += theirs.reference;
            mine.matched += theirs.matched;
        }
    }
}

/// Statistics for one hypothesis, using whichever reference scores best.
pub fn segment_stats(hypothesis: &str, references: &[&str], options: &ChrfOptions) -> ChrfStats {
    let hyp = Ngrams::extract(hypothesis, options);

    let mut best: Option<(f64, ChrfStats)> = None;
    for reference in references {
        let stats = hyp.compare(&Ngrams::extract(reference, options));
        let f = stats.f_score(options.beta);
        if best.as_ref().map_or(true, |(best_f, _)| f > *best_f) {
            best = Some((f, stats));
        }
    }

    best.map(|(_, stats)| stats)
        .unwrap_or_else(|| ChrfStats::empty(options))
}

/// Character and word n-gram counts for one sentence
struct Ngrams {
    chars: Vec<char>,
    words: Vec<String>,
    char_order: usize,
    word_order: usize,
}

impl Ngrams {
    fn extract(sentence: &str, options: &ChrfOptions) -> Self {
        let sentence = if options.lowercase {
            sentence.to_lowercase()
        } else {
            sentence.to_string()
        };

        let chars = if options.whitespace {
            sentence.chars().collect()
        } else {
            sentence.chars().filter(|c| !c.is_whitespace()).collect()
        };

        let words = if options.word_order > 0 {
            split_punctuation(&sentence)
        } else {
            Vec::new()
        };

        Self {
            chars,
            words,
            char_order: options.char_order,
            word_order: options.word_order,
        }
    }

    fn compare(&self, reference: &Ngrams) -> ChrfStats {
        let mut orders = Vec::with_capacity(self.char_order + self.word_order);

        for n in 1..=self.char_order {
            orders.push(order_stats(
                &count_ngrams(&self.chars, n),
                &count_ngrams(&reference.chars, n),
            ));
        }
        for n in 1..=self.word_order {
            orders.push(order_stats(
                &count_ngrams(&self.words, n),
                &count_ngrams(&reference.words, n),
            ));
        }

        ChrfStats { orders }
    }
}

fn order_stats<K: Eq + std::hash::Hash>(hyp: &HashMap<K, usize>, reference: &HashMap<K, usize>) -> OrderStats {
    OrderStats {
        hyp: hyp.values().sum(),
        reference: reference.values().sum(),
        matched: clipped_matches(hyp, reference),
    }
}

/// Word splitting for chrF++: one leading or trailing ASCII punctuation
/// mark is split off each multi-character token.
fn split_punctuation(sentence: &str) -> Vec<String> {
    let mut words = Vec::new();
    for token in sentence.split_whitespace() {
        let first = token.chars().next();
        let last = token.chars().next_back();

        if token.chars().count() == 1 {
            words.push(token.to_string());
        } else if let Some(last) = last.filter(char::is_ascii_punctuation) {
            words.push(token[..token.len() - last.len_utf8()].to_string());
            words.push(last.to_string());
        } else if let Some(first) = first.filter(char::is_ascii_punctuation) {
            words.push(first.to_string());
            words.push(token[first.len_utf8()..].to_string());
        } else {
            words.push(token.to_string());
        }
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(hyp: &str, reference: &str) -> f64 {
        let options = ChrfOptions::default();
        segment_stats(hyp, &[reference], &options).f_score(options.beta)
    }

    #[test]
    fn test_identical_is_perfect() {
        assert!((score("the cat sat", "the cat sat") - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_whitespace_is_ignored() {
        assert!((score("thecat sat", "the cat sat") - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_disjoint_is_zero() {
        assert!(score("abc", "xyz") < 1e-9);
    }

    #[test]
    fn test_empty_hypothesis_is_zero() {
        assert_eq!(score("", "hello world"), 0.0);
    }

    #[test]
    fn test_partial_overlap() {
        let s = score("the cat sat", "the cat sat down");
        assert!(s > 50.0 && s < 100.0, "got {}", s);
    }

    #[test]
    fn test_best_reference_is_used() {
        let options = ChrfOptions::default();
        let stats = segment_stats("hello", &["world", "hello"], &options);
        assert!((stats.f_score(options.beta) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_split_punctuation() {
        assert_eq!(split_punctuation("hi, (there) !"), vec!["hi", ",", "(there", ")", "!"]);
    }

    #[test]
    fn test_word_orders_are_appended() {
        let options = ChrfOptions {
            word_order: 2,
            ..Default::default()
        };
        let stats = segment_stats("the cat", &["the cat"], &options);
        assert_eq!(stats.orders.len(), 8);
        assert_eq!(stats.orders[6], OrderStats { hyp: 2, reference: 2, matched: 2 });
    }
}
