//! Machine-translation metrics
//!
//! Corpus-level BLEU, chrF and TER over hypothesis/reference streams, with
//! the mteval 13a tokenizer for reproducible scores.
//!
//! Two front-ends expose the same algorithms with different call
//! conventions:
//!
//! - [`modular`]: metrics are loaded by name with options, then computed
//!   over predictions and a set of references per position.
//! - [`corpus`]: free functions taking a hypothesis stream and a list of
//!   reference streams.
//!
//! # Example
//!
//! ```
//! use transeval_metrics::corpus::{corpus_bleu, BleuOptions};
//!
//! let hyps = vec!["the cat sat".to_string()];
//! let refs = vec![vec!["the cat sat".to_string()]];
//! let options = BleuOptions { effective_order: true, ..Default::default() };
//! let bleu = corpus_bleu(&hyps, &refs, &options).unwrap();
//! assert!((bleu.score - 100.0).abs() < 1e-9);
//! ```

pub mod bleu;
pub mod chrf;
pub mod corpus;
pub mod error;
pub mod modular;
pub mod ngrams;
pub mod ter;
pub mod tokenizer;

pub use error::{MetricError, MetricResult};
pub use tokenizer::Tokenizer;
