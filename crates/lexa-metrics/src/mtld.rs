//! MTLD (Measure of Textual Lexical Diversity).
//!
//! A single left-to-right scan partitions the word sequence into *factors*.
//! A factor closes at the first word where the running type-token ratio of
//! the current segment falls below the threshold `θ`; the next factor starts
//! at the following word with an empty type set.
//!
//! An unterminated tail contributes a fractional factor of
//! `(1 - ttr_tail) / (1 - θ)`, i.e. how far its TTR travelled from 1.0
//! towards `θ`. MTLD for one pass is `tokens / factors`, or 0.0 when the
//! factor count is zero (the running TTR never dipped and the tail was
//! all-distinct).
//!
//! The scan runs once forward and once over the reversed sequence; the two
//! differ because boundary effects land at opposite ends. The reported
//! average is their mean, except that a degenerate 0.0 pass never halves a
//! valid one: if either pass is 0.0 the average is the larger of the two.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use lexa_core::{LexaError, Result};

use crate::calculator::{Aggregate, Calculator, MetricKind};

/// Default TTR threshold at which a factor closes.
pub const DEFAULT_THRESHOLD: f64 = 0.72;

// ---------------------------------------------------------------------------
// MtldScore
// ---------------------------------------------------------------------------

/// Forward, reverse and combined MTLD for one text.
///
/// 0.0 in any component means "undefined for this text".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MtldScore {
    pub forward: f64,
    pub reverse: f64,
    pub average: f64,
}

impl MtldScore {
    /// Combine the two directional passes.
    pub fn from_passes(forward: f64, reverse: f64) -> Self {
        let average = if forward == 0.0 || reverse == 0.0 {
            forward.max(reverse)
        } else {
            (forward + reverse) / 2.0
        };
        Self {
            forward,
            reverse,
            average,
        }
    }
}

impl Aggregate for MtldScore {
    fn plus(self, other: Self) -> Self {
        Self {
            forward: self.forward + other.forward,
            reverse: self.reverse + other.reverse,
            average: self.average + other.average,
        }
    }

    fn divided_by(self, count: f64) -> Self {
        Self {
            forward: self.forward / count,
            reverse: self.reverse / count,
            average: self.average / count,
        }
    }
}

// ---------------------------------------------------------------------------
// Mtld
// ---------------------------------------------------------------------------

/// Check that `threshold` lies in the open interval (0, 1).
///
/// At 1.0 the tail correction divides by zero; at or below 0.0 no factor
/// can ever close.
pub fn validate_threshold(threshold: f64) -> Result<()> {
    if threshold.is_finite() && threshold > 0.0 && threshold < 1.0 {
        Ok(())
    } else {
        Err(LexaError::InvalidConfig(format!(
            "MTLD threshold must be strictly between 0 and 1, got {}",
            threshold
        )))
    }
}

/// MTLD calculator with a fixed TTR threshold.
#[derive(Debug, Clone, Copy)]
pub struct Mtld {
    threshold: f64,
}

impl Mtld {
    /// Create a calculator, rejecting thresholds outside (0, 1).
    pub fn new(threshold: f64) -> Result<Self> {
        validate_threshold(threshold)?;
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// MTLD of the sequence read left to right.
    pub fn forward(&self, words: &[String]) -> f64 {
        self.pass(words.iter(), words.len())
    }

    /// MTLD of the sequence read right to left.
    pub fn reverse(&self, words: &[String]) -> f64 {
        self.pass(words.iter().rev(), words.len())
    }

    /// Number of factors (full plus fractional tail) in one scan.
    pub fn factor_count<'a, I>(&self, words: I) -> f64
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut factors = 0.0;
        let mut segment_len = 0usize;
        let mut types: HashSet<&str> = HashSet::new();

        for word in words {
            types.insert(word.as_str());
            segment_len += 1;
            let ttr = types.len() as f64 / segment_len as f64;
            if ttr < self.threshold {
                factors += 1.0;
                segment_len = 0;
                types.clear();
            }
        }

        if segment_len > 0 {
            let tail_ttr = types.len() as f64 / segment_len as f64;
            factors += (1.0 - tail_ttr) / (1.0 - self.threshold);
        }

        factors
    }

    fn pass<'a, I>(&self, words: I, tokens: usize) -> f64
    where
        I: IntoIterator<Item = &'a String>,
    {
        let factors = self.factor_count(words);
        if factors > 0.0 {
            tokens as f64 / factors
        } else {
            0.0
        }
    }
}

impl Default for Mtld {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl Calculator for Mtld {
    type Output = MtldScore;

    fn kind(&self) -> MetricKind {
        MetricKind::Mtld
    }

    fn measure(&self, words: &[String]) -> MtldScore {
        if words.is_empty() {
            return MtldScore::default();
        }
        MtldScore::from_passes(self.forward(words), self.reverse(words))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
