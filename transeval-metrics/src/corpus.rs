//! Corpus-level metric functions
//!
//! Each function takes the hypothesis stream and a list of reference
//! streams; stream `k` holds the k-th reference of every segment.

use crate::bleu::{BleuStats, RefLength, Smoothing};
use crate::chrf::{self, ChrfOptions, ChrfStats};
use crate::error::{MetricError, MetricResult};
use crate::ter::{self, TerOptions, TerStats};
use crate::tokenizer::Tokenizer;

/// Corpus BLEU configuration
#[derive(Debug, Clone, PartialEq)]
pub struct BleuOptions {
    pub tokenizer: Tokenizer,
    pub lowercase: bool,
    pub smoothing: Smoothing,
    pub effective_order: bool,
}

impl Default for BleuOptions {
    fn default() -> Self {
        Self {
            tokenizer: Tokenizer::Thirteen,
            lowercase: false,
            smoothing: Smoothing::Exp,
            effective_order: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BleuScore {
    pub score: f64,
    pub precisions: Vec<f64>,
    pub brevity_penalty: f64,
    pub ratio: f64,
    pub hyp_len: usize,
    pub ref_len: usize,
    signature: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChrfScore {
    pub score: f64,
    pub char_order: usize,
    pub word_order: usize,
    pub beta: f64,
    signature: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TerScore {
    pub score: f64,
    pub num_edits: usize,
    pub ref_length: f64,
    signature: String,
}

macro_rules! impl_signature {
    ($($ty:ty),*) => {
        $(impl $ty {
            /// Settings the score was computed with
            pub fn signature(&self) -> &str {
                &self.signature
            }
        })*
    };
}

impl_signature!(BleuScore, ChrfScore, TerScore);

/// Corpus BLEU with closest-reference brevity penalty
pub fn corpus_bleu(
    hypotheses: &[String],
    references: &[Vec<String>],
    options: &BleuOptions,
) -> MetricResult<BleuScore> {
    check_streams(hypotheses, references)?;

    let mut stats = BleuStats::default();
    for (i, hyp) in hypotheses.iter().enumerate() {
        let refs = segment_references(references, i);
        stats += &BleuStats::from_segment(
            hyp,
            &refs,
            options.tokenizer,
            options.lowercase,
            RefLength::Closest,
        );
    }

    let breakdown = stats.compute(options.smoothing, options.effective_order);
    Ok(BleuScore {
        score: breakdown.score,
        precisions: breakdown.precisions,
        brevity_penalty: breakdown.brevity_penalty,
        ratio: breakdown.ratio,
        hyp_len: breakdown.hyp_len,
        ref_len: breakdown.ref_len,
        signature: format!(
            "nrefs:{}|case:{}|eff:{}|tok:{}|smooth:{}",
            references.len(),
            if options.lowercase { "lc" } else { "mixed" },
            if options.effective_order { "yes" } else { "no" },
            options.tokenizer,
            options.smoothing.as_str(),
        ),
    })
}

/// Corpus chrF (chrF++ when `word_order > 0`)
pub fn corpus_chrf(
    hypotheses: &[String],
    references: &[Vec<String>],
    options: &ChrfOptions,
) -> MetricResult<ChrfScore> {
    check_streams(hypotheses, references)?;

    let mut stats = ChrfStats::empty(options);
    for (i, hyp) in hypotheses.iter().enumerate() {
        let refs = segment_references(references, i);
        stats += &chrf::segment_stats(hyp, &refs, options);
    }

    Ok(ChrfScore {
        score: stats.f_score(options.beta),
        char_order: options.char_order,
        word_order: options.word_order,
        beta: options.beta,
        signature: format!(
            "nrefs:{}|case:{}|eff:yes|nc:{}|nw:{}|space:{}",
            references.len(),
            if options.lowercase { "lc" } else { "mixed" },
            options.char_order,
            options.word_order,
            if options.whitespace { "yes" } else { "no" },
        ),
    })
}

/// Corpus TER
pub fn corpus_ter(
    hypotheses: &[String],
    references: &[Vec<String>],
    options: &TerOptions,
) -> MetricResult<TerScore> {
    check_streams(hypotheses, references)?;

    let mut stats = TerStats::default();
    for (i, hyp) in hypotheses.iter().enumerate() {
        let refs = segment_references(references, i);
        stats += &ter::segment_stats(hyp, &refs, options);
    }

    Ok(TerScore {
        score: stats.score(),
        num_edits: stats.edits,
        ref_length: stats.ref_len,
        signature: format!(
            "nrefs:{}|case:{}|tok:{}|norm:{}|punct:{}",
            references.len(),
            if options.case_sensitive { "mixed" } else { "lc" },
            options.tokenizer,
            if options.normalize { "yes" } else { "no" },
            if options.no_punct { "no" } else { "yes" },
        ),
    })
}

fn check_streams(hypotheses: &[String], references: &[Vec<String>]) -> MetricResult<()> {
    if references.is_empty() {
        return Err(MetricError::NoReferences);
    }
    for (stream, refs) in references.iter().enumerate() {
        if refs.len() != hypotheses.len() {
            return Err(MetricError::StreamLength {
                stream,
                expected: hypotheses.len(),
                found: refs.len(),
            });
        }
    }
    Ok(())
}

fn segment_references(references: &[Vec<String>], index: usize) -> Vec<&str> {
    references.iter().map(|stream| stream[index].as_str()).collect()
}
