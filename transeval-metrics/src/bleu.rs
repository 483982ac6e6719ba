//! BLEU sufficient statistics and scoring
//!
//! Statistics are collected per segment and summed over the corpus; the
//! score is computed once from the totals (Papineni et al., 2002).

use std::collections::HashMap;
use std::ops::AddAssign;

use crate::ngrams::{clipped_matches, count_ngrams};
use crate::tokenizer::Tokenizer;

/// Highest n-gram order
pub const MAX_NGRAM_ORDER: usize = 4;

/// Which reference length counts toward the brevity penalty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefLength {
    /// Length closest to the hypothesis; ties go to the shorter reference
    #[default]
    Closest,
    /// Shortest reference
    Shortest,
}

/// Precision smoothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Smoothing {
    /// Unsmoothed; any zero precision zeroes the score
    None,
    /// Halve the pseudo-precision for every successive zero-match order
    #[default]
    Exp,
    /// Add one to matches and totals of every order
    AddOne,
}

impl Smoothing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Smoothing::None => "none",
            Smoothing::Exp => "exp",
            Smoothing::AddOne => "add-one",
        }
    }
}

/// Summable BLEU statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BleuStats {
    pub hyp_len: usize,
    pub ref_len: usize,
    pub matches: [usize; MAX_NGRAM_ORDER],
    pub totals: [usize; MAX_NGRAM_ORDER],
}

/// Score and the parts it was computed from
#[derive(Debug, Clone, PartialEq)]
pub struct BleuBreakdown {
    /// Percentage in [0, 100]
    pub score: f64,
    /// Per-order precisions as percentages
    pub precisions: Vec<f64>,
    pub brevity_penalty: f64,
    /// hyp_len / ref_len
    pub ratio: f64,
    pub hyp_len: usize,
    pub ref_len: usize,
    /// Orders that entered the geometric mean
    pub order: usize,
}

impl BleuStats {
    /// Collect statistics for one hypothesis against its references.
    pub fn from_segment(
        hypothesis: &str,
        references: &[&str],
        tokenizer: Tokenizer,
        lowercase: bool,
        ref_length: RefLength,
    ) -> Self {
        let prepare = |s: &str| {
            let s = if lowercase { s.to_lowercase() } else { s.to_string() };
            tokenizer.tokenize(&s)
        };

        let hyp = prepare(hypothesis);
        let hyp_tokens: Vec<&str> = hyp.split_whitespace().collect();

        let refs: Vec<String> = references.iter().map(|r| prepare(r)).collect();
        let ref_tokens: Vec<Vec<&str>> = refs
            .iter()
            .map(|r| r.split_whitespace().collect())
            .collect();

        let mut stats = BleuStats {
            hyp_len: hyp_tokens.len(),
            ref_len: select_ref_length(hyp_tokens.len(), &ref_tokens, ref_length),
            ..Default::default()
        };

        for n in 1..=MAX_NGRAM_ORDER {
            let hyp_ngrams = count_ngrams(&hyp_tokens, n);

            // Clip against the highest count seen in any single reference
            let mut max_ref: HashMap<&[&str], usize> = HashMap::new();
            for tokens in &ref_tokens {
                for (ngram, count) in count_ngrams(tokens, n) {
                    let entry = max_ref.entry(ngram).or_insert(0);
                    *entry = (*entry).max(count);
                }
            }

            stats.matches[n - 1] = clipped_matches(&hyp_ngrams, &max_ref);
            stats.totals[n - 1] = hyp_tokens.len().saturating_sub(n - 1);
        }

        stats
    }

    /// Compute the score from accumulated statistics.
    ///
    /// With `effective_order`, orders for which the hypothesis side has no
    /// n-grams at all are left out of the geometric mean.
    pub fn compute(&self, smoothing: Smoothing, effective_order: bool) -> BleuBreakdown {
        let order = if effective_order {
            self.totals.iter().take_while(|&&t| t > 0).count()
        } else {
            MAX_NGRAM_ORDER
        };

        let mut precisions = vec![0.0; MAX_NGRAM_ORDER];
        let mut exp_divisor = 1.0;
        for n in 0..MAX_NGRAM_ORDER {
            let (matches, total) = (self.matches[n] as f64, self.totals[n] as f64);
            precisions[n] = match smoothing {
                Smoothing::AddOne => 100.0 * (matches + 1.0) / (total + 1.0),
                _ if self.totals[n] == 0 => 0.0,
                Smoothing::Exp if self.matches[n] == 0 => {
                    exp_divisor *= 2.0;
                    100.0 / (exp_divisor * total)
                }
                _ => 100.0 * matches / total,
            };
        }

        let brevity_penalty = if self.hyp_len == 0 {
            0.0
        } else if self.hyp_len < self.ref_len {
            (1.0 - self.ref_len as f64 / self.hyp_len as f64).exp()
        } else {
            1.0
        };

        let ratio = if self.ref_len > 0 {
            self.hyp_len as f64 / self.ref_len as f64
        } else {
            0.0
        };

        let used = &precisions[..order];
        let score = if order == 0 || used.iter().any(|&p| p <= 0.0) {
            0.0
        } else {
            let log_mean = used.iter().map(|p| (p / 100.0).ln()).sum::<f64>() / order as f64;
            100.0 * brevity_penalty * log_mean.exp()
        };

        BleuBreakdown {
            score,
            precisions,
            brevity_penalty,
            ratio,
            hyp_len: self.hyp_len,
            ref_len: self.ref_len,
            order,
        }
    }
}

impl AddAssign<&BleuStats> for BleuStats {
    fn add_assign(&mut self, other: &BleuStats) {
        self.hyp_len += other.hyp_len;
        self.ref_len += other.ref_len;
        for n in 0..MAX_NGRAM_ORDER {
            self.matches[n] += other.matches[n];
            self.totals[n] += other.totals[n];
        }
    }
}

fn select_ref_length(hyp_len: usize, refs: &[Vec<&str>], convention: RefLength) -> usize {
    let lengths = refs.iter().map(Vec::len);
    match convention {
        RefLength::Closest => lengths
            .min_by_key(|&len| (len.abs_diff(hyp_len), len))
            .unwrap_or(0),
        RefLength::Shortest => lengths.min().unwrap_or(0),
    }
}
