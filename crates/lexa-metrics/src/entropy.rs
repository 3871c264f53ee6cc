//! Shannon entropy of a word-frequency distribution.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::calculator::{Calculator, MetricKind};

/// Entropy together with the counts it was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntropyProfile {
    /// `-Σ p·log2(p)` over distinct words.
    pub bits: f64,
    pub distinct: usize,
    pub tokens: usize,
}

/// Build the empirical distribution of `words` and compute its entropy.
pub fn entropy_profile(words: &[String]) -> EntropyProfile {
    if words.is_empty() {
        return EntropyProfile {
            bits: 0.0,
            distinct: 0,
            tokens: 0,
        };
    }

    // Ordered keys keep the summation order fixed across runs.
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for word in words {
        *counts.entry(word.as_str()).or_insert(0) += 1;
    }

    let total = words.len() as f64;
    let bits = counts.values().fold(0.0, |h, &count| {
        let p = count as f64 / total;
        h - p * p.log2()
    });

    EntropyProfile {
        bits,
        distinct: counts.len(),
        tokens: words.len(),
    }
}

/// Shannon entropy calculator (bits).
#[derive(Debug, Clone, Copy, Default)]
pub struct ShannonEntropy;

impl Calculator for ShannonEntropy {
    type Output = f64;

    fn kind(&self) -> MetricKind {
        MetricKind::Entropy
    }

    fn measure(&self, words: &[String]) -> f64 {
        entropy_profile(words).bits
    }
}
