//! Load-by-name metric modules
//!
//! ```
//! use transeval_metrics::modular::{load, LoadOptions};
//! use transeval_metrics::Tokenizer;
//!
//! let bleu = load("bleu", &LoadOptions::new().with_tokenizer(Tokenizer::Thirteen)).unwrap();
//! let output = bleu
//!     .compute(&["a b c".to_string()], &[vec!["a b c".to_string()]])
//!     .unwrap();
//! assert!((output.score("bleu").unwrap() - 1.0).abs() < 1e-9);
//! ```

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::bleu::{BleuStats, RefLength, Smoothing};
use crate::chrf::{self, ChrfOptions, ChrfStats};
use crate::error::{MetricError, MetricResult};
use crate::ter::{self, TerOptions, TerStats};
use crate::tokenizer::Tokenizer;

/// Options accepted by [`load`]. Unset fields keep each metric's default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadOptions {
    pub tokenizer: Option<Tokenizer>,
    pub normalize: Option<bool>,
    pub case_sensitive: Option<bool>,
    pub lowercase: Option<bool>,
    pub smooth: Option<bool>,
    pub word_order: Option<usize>,
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokenizer(mut self, tokenizer: Tokenizer) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }

    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = Some(normalize);
        self
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = Some(case_sensitive);
        self
    }

    pub fn with_lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = Some(lowercase);
        self
    }

    pub fn with_smooth(mut self, smooth: bool) -> Self {
        self.smooth = Some(smooth);
        self
    }

    pub fn with_word_order(mut self, word_order: usize) -> Self {
        self.word_order = Some(word_order);
        self
    }
}

/// Named values returned by [`Metric::compute`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricOutput {
    values: IndexMap<String, Value>,
}

impl MetricOutput {
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Read a numeric field
    pub fn score(&self, key: &str) -> MetricResult<f64> {
        self.values
            .get(key)
            .and_then(Value::as_f64)
            .ok_or_else(|| MetricError::MissingField(key.to_string()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

/// A loaded metric
pub trait Metric {
    fn name(&self) -> &str;

    /// `references[i]` holds the acceptable references for `predictions[i]`.
    fn compute(&self, predictions: &[String], references: &[Vec<String>]) -> MetricResult<MetricOutput>;
}

/// Load a metric by name (`"bleu"`, `"chrf"`, `"ter"`).
pub fn load(name: &str, options: &LoadOptions) -> MetricResult<Box<dyn Metric>> {
    match name.to_lowercase().as_str() {
        "bleu" => Ok(Box::new(BleuModule {
            tokenizer: options.tokenizer.unwrap_or_default(),
            lowercase: options.lowercase.unwrap_or(false),
            smooth: options.smooth.unwrap_or(false),
        })),
        "chrf" => {
            let defaults = ChrfOptions::default();
            Ok(Box::new(ChrfModule {
                options: ChrfOptions {
                    word_order: options.word_order.unwrap_or(defaults.word_order),
                    lowercase: options.lowercase.unwrap_or(defaults.lowercase),
                    ..defaults
                },
            }))
        }
        "ter" => {
            let defaults = TerOptions::default();
            Ok(Box::new(TerModule {
                options: TerOptions {
                    tokenizer: options.tokenizer.unwrap_or(defaults.tokenizer),
                    normalize: options.normalize.unwrap_or(defaults.normalize),
                    case_sensitive: options.case_sensitive.unwrap_or(defaults.case_sensitive),
                    ..defaults
                },
            }))
        }
        other => Err(MetricError::UnknownMetric(other.to_string())),
    }
}

/// Validate shapes and return the number of references per position.
fn check_references(predictions: &[String], references: &[Vec<String>]) -> MetricResult<usize> {
    if predictions.len() != references.len() {
        return Err(MetricError::LengthMismatch {
            predictions: predictions.len(),
            references: references.len(),
        });
    }

    let expected = references.first().map_or(0, Vec::len);
    for (position, refs) in references.iter().enumerate() {
        if refs.len() != expected {
            return Err(MetricError::ReferenceCount {
                position,
                expected,
                found: refs.len(),
            });
        }
    }
    Ok(expected)
}

fn as_strs(refs: &[String]) -> Vec<&str> {
    refs.iter().map(String::as_str).collect()
}

/// BLEU with the shortest-reference brevity penalty and no smoothing
/// unless requested. `bleu` is reported as a fraction in [0, 1].
struct BleuModule {
    tokenizer: Tokenizer,
    lowercase: bool,
    smooth: bool,
}

impl Metric for BleuModule {
    fn name(&self) -> &str {
        "bleu"
    }

    fn compute(&self, predictions: &[String], references: &[Vec<String>]) -> MetricResult<MetricOutput> {
        check_references(predictions, references)?;

        let mut stats = BleuStats::default();
        for (prediction, refs) in predictions.iter().zip(references) {
            stats += &BleuStats::from_segment(
                prediction,
                &as_strs(refs),
                self.tokenizer,
                self.lowercase,
                RefLength::Shortest,
            );
        }

        let smoothing = if self.smooth { Smoothing::AddOne } else { Smoothing::None };
        let breakdown = stats.compute(smoothing, true);

        let mut output = MetricOutput::default();
        output.insert("bleu", breakdown.score / 100.0);
        output.insert(
            "precisions",
            breakdown.precisions.iter().map(|p| p / 100.0).collect::<Vec<_>>(),
        );
        output.insert("brevity_penalty", breakdown.brevity_penalty);
        output.insert("length_ratio", breakdown.ratio);
        output.insert("translation_length", breakdown.hyp_len);
        output.insert("reference_length", breakdown.ref_len);
        Ok(output)
    }
}

struct ChrfModule {
    options: ChrfOptions,
}

impl Metric for ChrfModule {
    fn name(&self) -> &str {
        "chrf"
    }

    fn compute(&self, predictions: &[String], references: &[Vec<String>]) -> MetricResult<MetricOutput> {
        check_references(predictions, references)?;

        let mut stats = ChrfStats::empty(&self.options);
        for (prediction, refs) in predictions.iter().zip(references) {
            stats += &chrf::segment_stats(prediction, &as_strs(refs), &self.options);
        }

        let mut output = MetricOutput::default();
        output.insert("score", stats.f_score(self.options.beta));
        output.insert("char_order", self.options.char_order);
        output.insert("word_order", self.options.word_order);
        output.insert("beta", self.options.beta);
        Ok(output)
    }
}

struct TerModule {
    options: TerOptions,
}

impl Metric for TerModule {
    fn name(&self) -> &str {
        "ter"
    }

    fn compute(&self, predictions: &[String], references: &[Vec<String>]) -> MetricResult<MetricOutput> {
        check_references(predictions, references)?;

        let mut stats = TerStats::default();
        for (prediction, refs) in predictions.iter().zip(references) {
            stats += &ter::segment_stats(prediction, &as_strs(refs), &self.options);
        }

        let mut output = MetricOutput::default();
        output.insert("score", stats.score());
        output.insert("num_edits", stats.edits);
        output.insert("ref_length", stats.ref_len);
        Ok(output)
    }
}
