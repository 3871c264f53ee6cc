//! Word tokenizer for annotation text.
//!
//! Tokenization rules:
//! - A word is a maximal run of ASCII letters (`a-z`, `A-Z`).
//! - Every other character (digits, punctuation, whitespace, non-ASCII
//!   letters) is a separator and never appears inside a word.
//! - Words are case-folded to lowercase; order and duplicates are kept.
//!
//! Example:
//!   "Soft, hazy BLUES—and 3 greys" →
//!   [soft][hazy][blues][and][greys]

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Tokenize `text` into its ordered lowercase word sequence.
///
/// Empty or separator-only input yields an empty sequence.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|ch: char| !ch.is_ascii_alphabetic())
        .filter(|run| !run.is_empty())
        .map(normalize_token)
        .collect()
}

/// Normalize a single letter run for counting.
pub fn normalize_token(token: &str) -> String {
    token.to_ascii_lowercase()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
