//! Candidate ranking for reconciliation queries
//!
//! The matcher asks the data source for a bounded set of rows resembling the
//! query, scores each row's name against the query and returns the best
//! candidates.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tabrecon_core::{compare_ids, Candidate, DataSource, Error, Result, Row, TypeRef};
use thiserror::Error;
use tracing::debug;

use crate::distance::{edit_similarity, jaccard_tokens, normalize};

pub const EXACT_SCORE: f64 = 100.0;

/// Highest score a non-identical name can reach
const MAX_FUZZY_SCORE: f64 = 99.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchConfigError {
    #[error("Weight {0} must not be negative")]
    NegativeWeight(&'static str),

    #[error("Token and edit weights must not both be zero")]
    ZeroTotalWeight,

    #[error("Minimum score must be within [0, 100], got {0}")]
    InvalidScoreFloor(f64),

    #[error("max_limit must be at least 1")]
    ZeroMaxLimit,
}

impl From<MatchConfigError> for Error {
    fn from(e: MatchConfigError) -> Self {
        Error::InvalidConfig(e.to_string())
    }
}

/// Tuning of the name scorer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Weight of the token-set Jaccard overlap
    pub token_weight: f64,
    /// Weight of the normalised Levenshtein similarity
    pub edit_weight: f64,
    /// Candidates scoring below this are discarded
    pub min_score: f64,
    pub default_limit: usize,
    pub max_limit: usize,
    /// Rows requested from the data source per query
    pub candidate_pool: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            token_weight: 0.5,
            edit_weight: 0.5,
            min_score: 20.0,
            default_limit: 5,
            max_limit: 1000,
            candidate_pool: 100,
        }
    }
}

impl MatchConfig {
    /// Validate the config
    /// - Checks that weights are non-negative and not both zero
    /// - Normalizes weights to sum to 1.0 if they don't
    pub fn validate_and_normalize(&mut self) -> std::result::Result<(), MatchConfigError> {
        if self.token_weight < 0.0 {
            return Err(MatchConfigError::NegativeWeight("token_weight"));
        }
        if self.edit_weight < 0.0 {
            return Err(MatchConfigError::NegativeWeight("edit_weight"));
        }

        let weight_sum = self.token_weight + self.edit_weight;
        if weight_sum <= 0.0 {
            return Err(MatchConfigError::ZeroTotalWeight);
        }
        if (weight_sum - 1.0).abs() > 0.001 {
            self.token_weight /= weight_sum;
            self.edit_weight /= weight_sum;
        }

        if !(0.0..=EXACT_SCORE).contains(&self.min_score) {
            return Err(MatchConfigError::InvalidScoreFloor(self.min_score));
        }
        if self.max_limit == 0 {
            return Err(MatchConfigError::ZeroMaxLimit);
        }
        Ok(())
    }

    /// Effective result limit for a caller-requested one
    #[must_use]
    pub fn resolve_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_limit)
            .clamp(1, self.max_limit)
    }
}

/// Scores rows against query text
#[derive(Debug, Clone)]
pub struct Matcher {
    config: MatchConfig,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(MatchConfig::default())
    }
}

impl Matcher {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    /// Create a matcher after validating the config
    pub fn try_new(mut config: MatchConfig) -> std::result::Result<Self, MatchConfigError> {
        config.validate_and_normalize()?;
        Ok(Self { config })
    }

    /// Score of a normalised name against a normalised query, in [0, 100]
    pub fn score(&self, query: &str, name: &str) -> f64 {
        if query == name {
            return EXACT_SCORE;
        }
        let blended = self.config.token_weight * jaccard_tokens(query, name)
            + self.config.edit_weight * edit_similarity(query, name);
        (100.0 * blended).round().clamp(0.0, MAX_FUZZY_SCORE)
    }

    /// Rank `rows` by how well their `name_column` matches `text`
    pub fn rank(&self, text: &str, name_column: &str, rows: Vec<Row>, limit: usize) -> Vec<Candidate> {
        let query = normalize(text);

        let mut candidates: Vec<Candidate> = rows
            .into_iter()
            .filter_map(|row| {
                let name = row.text(name_column)?;
                let score = self.score(&query, &normalize(&name));
                (score >= self.config.min_score).then(|| Candidate {
                    id: row.id,
                    name,
                    score,
                    is_match: false,
                    types: vec![TypeRef::object()],
                })
            })
            .collect();

        candidates.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| compare_ids(&a.id, &b.id))
        });
        // Uniqueness of the exact scorer is judged before the limit cuts ties off
        let exact = candidates
            .iter()
            .take_while(|c| c.score >= EXACT_SCORE)
            .count();
        candidates.truncate(limit);
        if exact == 1 {
            candidates[0].is_match = true;
        }

        candidates
    }

    /// Find candidates for `text` in `source`
    ///
    /// Empty query text is a [`Error::BadRequest`]. Finding nothing is not an error.
    pub async fn find(
        &self,
        source: &dyn DataSource,
        name_column: &str,
        text: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Candidate>> {
        let query = normalize(text);
        if query.is_empty() {
            return Err(Error::BadRequest("query text is empty".to_string()));
        }

        let limit = self.config.resolve_limit(limit);
        let pool = limit.max(self.config.candidate_pool);
        let rows = source.search_by_name(name_column, &query, pool).await?;
        debug!(query = %query, pool = rows.len(), "scoring candidates");

        Ok(self.rank(&query, name_column, rows, limit))
    }
}
