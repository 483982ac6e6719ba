//! Tokenizers applied before BLEU and TER
//!
//! `13a` reproduces the mteval-v13a.pl rules so scores stay comparable
//! across tools.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::MetricError;

// ASCII symbols: { | } ~ [ \ ] ^ _ ` space ! " # $ % & ( ) * + : ; < = > ? @ /
static SYMBOLS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([\{-~\[-` -&\(-\+:-@/])").expect("valid 13a symbol pattern"));
static PERIOD_COMMA_UNLESS_PRECEDED_BY_DIGIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^0-9])([\.,])").expect("valid 13a period pattern"));
static PERIOD_COMMA_UNLESS_FOLLOWED_BY_DIGIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([\.,])([^0-9])").expect("valid 13a comma pattern"));
static DASH_AFTER_DIGIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9])(-)").expect("valid 13a dash pattern"));

/// Tokenization scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tokenizer {
    /// Leave the text untouched
    None,
    /// mteval-v13a
    #[default]
    Thirteen,
}

impl Tokenizer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tokenizer::None => "none",
            Tokenizer::Thirteen => "13a",
        }
    }

    /// Tokenize a line, returning tokens joined by single spaces
    pub fn tokenize(&self, line: &str) -> String {
        match self {
            Tokenizer::None => line.to_string(),
            Tokenizer::Thirteen => tokenize_13a(line),
        }
    }
}

impl fmt::Display for Tokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Tokenizer {
    type Err = MetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "13a" => Ok(Tokenizer::Thirteen),
            "none" => Ok(Tokenizer::None),
            other => Err(MetricError::UnknownTokenizer(other.to_string())),
        }
    }
}

fn tokenize_13a(line: &str) -> String {
    let mut line = line
        .replace("<skipped>", "")
        .replace("-\n", "")
        .replace('\n', " ");

    if line.contains('&') {
        line = line
            .replace("&quot;", "\"")
            .replace("&amp;", "&")
            .replace("&lt;", "<")
            .replace("&gt;", ">");
    }

    let padded = format!(" {} ", line);
    let step = SYMBOLS.replace_all(&padded, " ${1} ");
    let step = PERIOD_COMMA_UNLESS_PRECEDED_BY_DIGIT.replace_all(&step, "${1} ${2} ");
    let step = PERIOD_COMMA_UNLESS_FOLLOWED_BY_DIGIT.replace_all(&step, " ${1} ${2}");
    let step = DASH_AFTER_DIGIT.replace_all(&step, "${1} ${2} ");

    step.split_whitespace().collect::<Vec<_>>().join(" ")
}
