//! Type-Token Ratio.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::calculator::{Calculator, MetricKind};

/// Distinct and total word counts behind a TTR value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TypeTokenCounts {
    /// `types / tokens`, or 0.0 for an empty sequence.
    pub ratio: f64,
    /// Number of distinct words.
    pub types: usize,
    /// Length of the word sequence.
    pub tokens: usize,
}

/// Count distinct and total words in `words`.
pub fn type_token_counts(words: &[String]) -> TypeTokenCounts {
    if words.is_empty() {
        return TypeTokenCounts {
            ratio: 0.0,
            types: 0,
            tokens: 0,
        };
    }
    let types = words.iter().map(String::as_str).collect::<HashSet<_>>().len();
    let tokens = words.len();
    TypeTokenCounts {
        ratio: types as f64 / tokens as f64,
        types,
        tokens,
    }
}

/// Type-Token Ratio calculator.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeTokenRatio;

impl Calculator for TypeTokenRatio {
    type Output = f64;

    fn kind(&self) -> MetricKind {
        MetricKind::Ttr
    }

    fn measure(&self, words: &[String]) -> f64 {
        type_token_counts(words).ratio
    }
}
