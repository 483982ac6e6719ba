//! N-gram counting shared by BLEU and chrF

use std::collections::HashMap;
use std::hash::Hash;

/// Count the n-grams of order `n` in a sequence.
pub fn count_ngrams<T: Eq + Hash>(items: &[T], n: usize) -> HashMap<&[T], usize> {
    let mut counts = HashMap::new();
    if n > 0 && items.len() >= n {
        for window in items.windows(n) {
            *counts.entry(window).or_insert(0) += 1;
        }
    }
    counts
}

/// Sum of `min(hyp, ref)` over shared n-grams.
pub fn clipped_matches<K: Eq + Hash>(hyp: &HashMap<K, usize>, reference: &HashMap<K, usize>) -> usize {
    hyp.iter()
        .map(|(ngram, &count)| count.min(reference.get(ngram).copied().unwrap_or(0)))
        .sum()
}
