//! Translation Edit Rate (Snover et al., 2006)
//!
//! Word-level edit distance where a contiguous block of hypothesis words
//! may be moved at the cost of one edit. Shifts are searched greedily in
//! the manner of tercom: repeatedly apply the shift that lowers the edit
//! distance the most, until none helps.

use std::cmp::Reverse;
use std::ops::AddAssign;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::tokenizer::Tokenizer;

const MAX_SHIFT_SIZE: usize = 10;
const MAX_SHIFT_DIST: usize = 50;
const MAX_SHIFT_CANDIDATES: usize = 1000;

static POSSESSIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"'s(\s|$)").expect("valid possessive pattern"));
static TER_PUNCT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\.,\?:;!"\(\)]"#).expect("valid punctuation pattern"));

/// TER configuration
#[derive(Debug, Clone, PartialEq)]
pub struct TerOptions {
    pub tokenizer: Tokenizer,
    /// Apply tercom's extra normalization (possessive splitting) on top of
    /// the tokenizer
    pub normalize: bool,
    pub case_sensitive: bool,
    /// Strip sentence punctuation before scoring
    pub no_punct: bool,
}

impl Default for TerOptions {
    fn default() -> Self {
        Self {
            tokenizer: Tokenizer::Thirteen,
            normalize: false,
            case_sensitive: false,
            no_punct: false,
        }
    }
}

impl TerOptions {
    /// Prepare a sentence for word-level comparison
    pub fn preprocess(&self, sentence: &str) -> String {
        let mut sentence = if self.case_sensitive {
            sentence.to_string()
        } else {
            sentence.to_lowercase()
        };
        sentence = self.tokenizer.tokenize(&sentence);
        if self.normalize {
            sentence = POSSESSIVE.replace_all(&sentence, " 's${1}").into_owned();
        }
        if self.no_punct {
            sentence = TER_PUNCT.replace_all(&sentence, "").into_owned();
        }
        sentence
    }
}

/// Summable TER statistics
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TerStats {
    pub edits: usize,
    /// Average reference length for the segment
    pub ref_len: f64,
}

impl TerStats {
    /// TER as a percentage. May exceed 100.
    pub fn score(&self) -> f64 {
        if self.ref_len > 0.0 {
            100.0 * self.edits as f64 / self.ref_len
        } else if self.edits > 0 {
            100.0
        } else {
            0.0
        }
    }
}

impl AddAssign<&TerStats> for TerStats {
    fn add_assign(&mut self, other: &TerStats) {
        self.edits += other.edits;
        self.ref_len += other.ref_len;
    }
}

/// Statistics for one hypothesis: the fewest edits over all references,
/// normalized by their average length.
pub fn segment_stats(hypothesis: &str, references: &[&str], options: &TerOptions) -> TerStats {
    let hyp = options.preprocess(hypothesis);
    let hyp_words: Vec<&str> = hyp.split_whitespace().collect();

    let mut best_edits: Option<usize> = None;
    let mut total_ref_len = 0usize;
    for reference in references {
        let reference = options.preprocess(reference);
        let ref_words: Vec<&str> = reference.split_whitespace().collect();
        let edits = translation_edits(&hyp_words, &ref_words);
        best_edits = Some(best_edits.map_or(edits, |best| best.min(edits)));
        total_ref_len += ref_words.len();
    }

    match best_edits {
        Some(edits) => TerStats {
            edits,
            ref_len: total_ref_len as f64 / references.len() as f64,
        },
        None => TerStats {
            edits: hyp_words.len(),
            ref_len: 0.0,
        },
    }
}

/// Number of edits (shifts included) turning `hyp` into `reference`.
pub fn translation_edits(hyp: &[&str], reference: &[&str]) -> usize {
    if reference.is_empty() {
        return hyp.len();
    }

    let mut words = hyp.to_vec();
    let mut shifts = 0;
    let mut checked = 0;
    loop {
        let (gain, shifted) = best_shift(&words, reference, &mut checked);
        if checked >= MAX_SHIFT_CANDIDATES || gain <= 0 {
            break;
        }
        shifts += 1;
        words = shifted;
    }

    shifts + edit_distance(&words, reference).0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditOp {
    Match,
    Substitute,
    /// Hypothesis word with no reference counterpart
    HypOnly,
    /// Reference word with no hypothesis counterpart
    RefOnly,
}

/// Levenshtein distance over words, with the operation trace.
fn edit_distance(hyp: &[&str], reference: &[&str]) -> (usize, Vec<EditOp>) {
    let (n, m) = (hyp.len(), reference.len());
    let mut cost = vec![vec![0usize; m + 1]; n + 1];
    for (i, row) in cost.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=m {
        cost[0][j] = j;
    }

    for i in 1..=n {
        for j in 1..=m {
            let diagonal = cost[i - 1][j - 1] + usize::from(hyp[i - 1] != reference[j - 1]);
            cost[i][j] = diagonal.min(cost[i - 1][j] + 1).min(cost[i][j - 1] + 1);
        }
    }

    let mut trace = Vec::with_capacity(n.max(m));
    let (mut i, mut j) = (n, m);
    while i > 0 || j > 0 {
        if i > 0 && j > 0 {
            let same = hyp[i - 1] == reference[j - 1];
            if cost[i][j] == cost[i - 1][j - 1] + usize::from(!same) {
                trace.push(if same { EditOp::Match } else { EditOp::Substitute });
                i -= 1;
                j -= 1;
                continue;
            }
        }
        if i > 0 && cost[i][j] == cost[i - 1][j] + 1 {
            trace.push(EditOp::HypOnly);
            i -= 1;
        } else {
            trace.push(EditOp::RefOnly);
            j -= 1;
        }
    }
    trace.reverse();

    (cost[n][m], trace)
}

/// Word alignment derived from an edit trace
struct Alignment {
    /// Hypothesis position aligned to each reference position, -1 before the
    /// first hypothesis word
    ref_to_hyp: Vec<isize>,
    hyp_errors: Vec<bool>,
    ref_errors: Vec<bool>,
}

impl Alignment {
    fn from_trace(trace: &[EditOp]) -> Self {
        let mut alignment = Alignment {
            ref_to_hyp: Vec::new(),
            hyp_errors: Vec::new(),
            ref_errors: Vec::new(),
        };
        let mut pos_hyp: isize = -1;

        for op in trace {
            match op {
                EditOp::Match | EditOp::Substitute => {
                    let error = *op == EditOp::Substitute;
                    pos_hyp += 1;
                    alignment.ref_to_hyp.push(pos_hyp);
                    alignment.hyp_errors.push(error);
                    alignment.ref_errors.push(error);
                }
                EditOp::HypOnly => {
                    pos_hyp += 1;
                    alignment.hyp_errors.push(true);
                }
                EditOp::RefOnly => {
                    alignment.ref_to_hyp.push(pos_hyp);
                    alignment.ref_errors.push(true);
                }
            }
        }

        alignment
    }
}

/// Hypothesis spans matching a reference span: (start_hyp, start_ref, length)
fn shifted_pairs(hyp: &[&str], reference: &[&str]) -> Vec<(usize, usize, usize)> {
    let mut pairs = Vec::new();
    for start_h in 0..hyp.len() {
        for start_r in 0..reference.len() {
            if start_h.abs_diff(start_r) > MAX_SHIFT_DIST {
                continue;
            }
            let mut length = 0;
            while length < MAX_SHIFT_SIZE
                && start_h + length < hyp.len()
                && start_r + length < reference.len()
                && hyp[start_h + length] == reference[start_r + length]
            {
                length += 1;
                pairs.push((start_h, start_r, length));
            }
        }
    }
    pairs
}

/// Move `words[start..start + length]` so that it begins at `target`.
fn perform_shift<'a>(words: &[&'a str], start: usize, length: usize, target: usize) -> Vec<&'a str> {
    let block = &words[start..start + length];
    let mut out = Vec::with_capacity(words.len());

    if target < start {
        out.extend_from_slice(&words[..target]);
        out.extend_from_slice(block);
        out.extend_from_slice(&words[target..start]);
        out.extend_from_slice(&words[start + length..]);
    } else if target > start + length {
        out.extend_from_slice(&words[..start]);
        out.extend_from_slice(&words[start + length..target]);
        out.extend_from_slice(block);
        out.extend_from_slice(&words[target..]);
    } else {
        let split = (length + target).min(words.len());
        out.extend_from_slice(&words[..start]);
        out.extend_from_slice(&words[start + length..split]);
        out.extend_from_slice(block);
        out.extend_from_slice(&words[split..]);
    }

    out
}

type ShiftRank = (isize, usize, Reverse<usize>, Reverse<usize>);

/// Find the shift with the largest edit-distance gain. Ties prefer longer
/// blocks, then earlier blocks, then earlier targets.
fn best_shift<'a>(
    hyp: &[&'a str],
    reference: &[&str],
    checked: &mut usize,
) -> (isize, Vec<&'a str>) {
    let (pre_score, trace) = edit_distance(hyp, reference);
    let alignment = Alignment::from_trace(&trace);

    let mut best: Option<(ShiftRank, Vec<&'a str>)> = None;
    for (start_h, start_r, length) in shifted_pairs(hyp, reference) {
        // Only move words that are wrong to a place where the reference is unmatched
        if !alignment.hyp_errors[start_h..start_h + length].contains(&true) {
            continue;
        }
        if !alignment.ref_errors[start_r..start_r + length].contains(&true) {
            continue;
        }
        let aligned = alignment.ref_to_hyp[start_r];
        if aligned >= start_h as isize && aligned < (start_h + length) as isize {
            continue;
        }

        let mut prev_target = None;
        for offset in -1..length as isize {
            let pos = start_r as isize + offset;
            let target = if pos < 0 {
                0
            } else {
                match alignment.ref_to_hyp.get(pos as usize) {
                    Some(&h) => (h + 1) as usize,
                    None => break,
                }
            };
            if prev_target == Some(target) {
                continue;
            }
            prev_target = Some(target);

            let shifted = perform_shift(hyp, start_h, length, target);
            let gain = pre_score as isize - edit_distance(&shifted, reference).0 as isize;
            *checked += 1;

            let rank = (gain, length, Reverse(start_h), Reverse(target));
            if best.as_ref().map_or(true, |(best_rank, _)| rank > *best_rank) {
                best = Some((rank, shifted));
            }
        }

        if *checked >= MAX_SHIFT_CANDIDATES {
            break;
        }
    }

    match best {
        Some(((gain, ..), words)) => (gain, words),
        None => (0, hyp.to_vec()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(s: &str) -> Vec<&str> {
        s.split_whitespace().collect()
    }

    #[test]
    fn test_identical_has_no_edits() {
        assert_eq!(translation_edits(&words("a b c"), &words("a b c")), 0);
    }

    #[test]
    fn test_block_shift_counts_once() {
        let edits = translation_edits(&words("c d e a b"), &words("a b c d e"));
        assert_eq!(edits, 1);
        assert_eq!(edit_distance(&words("c d e a b"), &words("a b c d e")).0, 4);
    }

    #[test]
    fn test_substitution_and_deletion() {
        assert_eq!(translation_edits(&words("a x c"), &words("a b c")), 1);
        assert_eq!(translation_edits(&words("a b"), &words("a b c")), 1);
        assert_eq!(translation_edits(&words("a b c d"), &words("a b c")), 1);
    }

    #[test]
    fn test_empty_sides() {
        assert_eq!(translation_edits(&[], &words("hello world")), 2);
        assert_eq!(translation_edits(&words("hello world"), &[]), 2);
    }

    #[test]
    fn test_perform_shift() {
        let w = words("a b c d e");
        assert_eq!(perform_shift(&w, 3, 2, 0), words("d e a b c"));
        assert_eq!(perform_shift(&w, 0, 2, 4), words("c d a b e"));
    }

    #[test]
    fn test_trace_alignment() {
        let (distance, trace) = edit_distance(&words("a x c d"), &words("a b c"));
        assert_eq!(distance, 2);
        let alignment = Alignment::from_trace(&trace);
        assert_eq!(alignment.hyp_errors, vec![false, true, false, true]);
        assert_eq!(alignment.ref_errors, vec![false, true, false]);
        assert_eq!(alignment.ref_to_hyp, vec![0, 1, 2]);
    }

    #[test]
    fn test_segment_stats_case_insensitive_by_default() {
        let stats = segment_stats("Hello World", &["hello world"], &TerOptions::default());
        assert_eq!(stats.edits, 0);
        assert_eq!(stats.ref_len, 2.0);
    }

    #[test]
    fn test_segment_stats_uses_13a() {
        let stats = segment_stats("hello world.", &["hello world ."], &TerOptions::default());
        assert_eq!(stats.edits, 0);
        assert_eq!(stats.ref_len, 3.0);
    }

    #[test]
    fn test_multiple_references() {
        let stats = segment_stats("a b c", &["a b c", "a b c d e"], &TerOptions::default());
        assert_eq!(stats.edits, 0);
        assert_eq!(stats.ref_len, 4.0);
    }

    #[test]
    fn test_score_can_exceed_100() {
        let stats = segment_stats("w x y z", &["a"], &TerOptions::default());
        assert_eq!(stats.edits, 4);
        assert!(stats.score() > 100.0);
    }

    #[test]
    fn test_normalize_and_no_punct() {
        let options = TerOptions {
            normalize: true,
            no_punct: true,
            ..Default::default()
        };
        assert_eq!(options.preprocess("John's cat, (sat)."), "john 's cat   sat  ");
    }
}
