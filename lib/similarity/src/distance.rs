//! String normalisation and similarity functions for name matching
//!
//! All similarity functions return a score in range [0.0, 1.0] where 1.0 means identical.

use ahash::AHashSet;

/// Normalize text for comparison
///
/// Lowercases, trims and collapses runs of whitespace into a single space.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.extend(word.chars().flat_map(char::to_lowercase));
    }
    out
}

/// Split text into lowercase tokens on whitespace and punctuation
pub fn tokenize(text: &str) -> AHashSet<String> {
    text.split(|c: char| c.is_whitespace() || !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Jaccard index of the token sets of two strings
pub fn jaccard_tokens(a: &str, b: &str) -> f64 {
    let tokens_a = tokenize(a);
    let tokens_b = tokenize(b);

    if tokens_a.is_empty() && tokens_b.is_empty() {
        return 1.0;
    }

    let intersection = tokens_a.intersection(&tokens_b).count();
    let union = tokens_a.union(&tokens_b).count();

    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// Levenshtein similarity normalised by the longer string
#[inline]
pub fn edit_similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b)
}

/// Whether two strings share at least one token
pub fn shares_token(a: &str, b: &str) -> bool {
    let tokens_a = tokenize(a);
    tokenize(b).iter().any(|t| tokens_a.contains(t))
}
