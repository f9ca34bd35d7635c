//! Prefix autocomplete over entities, properties and types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tabrecon_core::{Column, DataSource, Error, Result, SuggestResponse, Suggestion};
use tabrecon_similarity::normalize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestKind {
    Entity,
    Property,
    Type,
}

impl SuggestKind {
    pub const ALL: [SuggestKind; 3] = [SuggestKind::Entity, SuggestKind::Property, SuggestKind::Type];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestKind::Entity => "entity",
            SuggestKind::Property => "property",
            SuggestKind::Type => "type",
        }
    }
}

impl fmt::Display for SuggestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SuggestKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "entity" => Ok(SuggestKind::Entity),
            "property" => Ok(SuggestKind::Property),
            "type" => Ok(SuggestKind::Type),
            other => Err(Error::BadRequest(format!("unknown suggest kind: {}", other))),
        }
    }
}

/// Entities whose name starts with `prefix`
pub async fn suggest_entities(
    source: &dyn DataSource,
    name_field: &str,
    prefix: &str,
    limit: usize,
) -> Result<SuggestResponse> {
    let prefix = normalize(prefix);
    if prefix.is_empty() {
        return Ok(SuggestResponse::default());
    }

    let rows = source.search_name_prefix(name_field, &prefix, limit).await?;
    let result = rows
        .into_iter()
        .take(limit)
        .map(|row| Suggestion {
            name: row.text(name_field).unwrap_or_default(),
            id: row.id,
        })
        .collect();
    Ok(SuggestResponse { result })
}

/// Columns whose id or name starts with `prefix`, in column order
pub fn suggest_properties(
    columns: &[Column],
    prefix: &str,
    limit: usize,
    exclude: Option<&str>,
) -> SuggestResponse {
    let prefix = normalize(prefix);
    let result = columns
        .iter()
        .filter(|c| exclude != Some(c.id.as_str()))
        .filter(|c| normalize(&c.id).starts_with(&prefix) || normalize(&c.name).starts_with(&prefix))
        .take(limit)
        .map(|c| Suggestion {
            id: c.id.clone(),
            name: c.name.clone(),
        })
        .collect();
    SuggestResponse { result }
}

/// Types are not enumerable: a table has only the default type
#[inline]
pub fn suggest_types(_prefix: &str) -> SuggestResponse {
    SuggestResponse::default()
}
