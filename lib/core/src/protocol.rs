//! Wire types of the reconciliation protocol
//!
//! Request types are lenient: unknown fields are ignored and optional fields
//! default. Response types serialize to the field names reconciliation
//! clients expect (`match`, `type`, `str`, ...).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_TYPE_ID: &str = "object";
pub const DEFAULT_TYPE_NAME: &str = "Object";

/// Reference to an entity type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRef {
    pub id: String,
    pub name: String,
}

impl TypeRef {
    /// The single type every row of a table belongs to
    #[must_use]
    pub fn object() -> Self {
        Self {
            id: DEFAULT_TYPE_ID.to_string(),
            name: DEFAULT_TYPE_NAME.to_string(),
        }
    }

    /// Whether a caller-supplied type id names the default type
    #[inline]
    pub fn is_default(type_id: &str) -> bool {
        type_id == DEFAULT_TYPE_ID
    }
}

/// Property constraint attached to a query. Accepted but not used for filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyConstraint {
    #[serde(alias = "id")]
    pub pid: String,
    #[serde(alias = "value", default)]
    pub v: serde_json::Value,
}

/// A single reconciliation query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub query: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_strict: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<PropertyConstraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

/// A scored row returned as a possible match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub score: f64,
    #[serde(rename = "match")]
    pub is_match: bool,
    #[serde(rename = "type")]
    pub types: Vec<TypeRef>,
}

/// Per-query result envelope
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryResult {
    pub result: Vec<Candidate>,
}

/// Result of a query batch keyed by the caller's query ids
pub type BatchResult = HashMap<String, QueryResult>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyRef {
    pub id: String,
}

/// Request to fetch column values for known row ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendRequest {
    pub ids: Vec<String>,
    pub properties: Vec<PropertyRef>,
}

/// Property id with its display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyMeta {
    pub id: String,
    pub name: String,
}

/// A typed value in an extend response, e.g. `{"str": "good dog"}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Date(String),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExtendResponse {
    pub meta: Vec<PropertyMeta>,
    pub rows: HashMap<String, HashMap<String, Vec<PropertyValue>>>,
}

/// Response of the property proposal endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposeResponse {
    #[serde(rename = "type")]
    pub type_id: String,
    pub properties: Vec<PropertyMeta>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SuggestResponse {
    pub result: Vec<Suggestion>,
}
