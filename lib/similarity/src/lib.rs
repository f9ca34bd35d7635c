//! # tabrecon Similarity
//!
//! The name matching engine behind reconciliation queries.
//!
//! A query is normalised (lowercased, trimmed, whitespace collapsed) and
//! compared with each candidate row's name:
//!
//! - identical normalised names score 100
//! - anything else scores `round(100 * (w_t * jaccard + w_e * levenshtein))`,
//!   capped at 99
//! - candidates below [`MatchConfig::min_score`] are dropped
//!
//! ## Example
//!
//! ```rust
//! use tabrecon_core::Row;
//! use tabrecon_similarity::Matcher;
//!
//! let matcher = Matcher::default();
//! let rows = vec![Row::new("3").with_value("name", "Fido")];
//! let candidates = matcher.rank("fido", "name", rows, 5);
//! assert_eq!(candidates[0].score, 100.0);
//! assert!(candidates[0].is_match);
//! ```

pub mod distance;
pub mod matcher;

pub use distance::{edit_similarity, jaccard_tokens, normalize, shares_token, tokenize};
pub use matcher::{MatchConfig, MatchConfigError, Matcher, EXACT_SCORE};
