use serde::{Deserialize, Serialize};

pub const FREEBASE_TYPE_OBJECT_ID: &str = "http://rdf.freebase.com/ns/type.object.id";

/// Reconciliation settings of a single table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSettings {
    /// URL path of the table, e.g. `test/dogs`
    pub path: String,

    /// Column used for matching and display
    pub name_field: String,

    /// Entity view URL template with an `{{id}}` placeholder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,

    #[serde(default = "default_space")]
    pub identifier_space: String,

    #[serde(default = "default_space")]
    pub schema_space: String,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Leave the name column out of property suggestions
    #[serde(default)]
    pub suggest_exclude_name_field: bool,
}

fn default_space() -> String {
    FREEBASE_TYPE_OBJECT_ID.to_string()
}

fn default_enabled() -> bool {
    true
}

impl TableSettings {
    #[must_use]
    pub fn new(path: impl Into<String>, name_field: impl Into<String>) -> Self {
        Self {
            path: path.into().trim_matches('/').to_string(),
            name_field: name_field.into(),
            view_url: None,
            service_name: None,
            identifier_space: default_space(),
            schema_space: default_space(),
            enabled: true,
            suggest_exclude_name_field: false,
        }
    }

    #[must_use]
    pub fn with_view_url(mut self, view_url: impl Into<String>) -> Self {
        self.view_url = Some(view_url.into());
        self
    }

    #[must_use]
    pub fn service_name(&self) -> String {
        self.service_name
            .clone()
            .unwrap_or_else(|| format!("{} reconciliation", self.path.replace('/', " ")))
    }
}

/// Request limits shared by all tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceLimits {
    pub max_batch_size: usize,
    /// Upper bound of queries matched concurrently within one batch
    pub max_concurrency: usize,
    pub default_suggest_limit: usize,
}

impl Default for ServiceLimits {
    fn default() -> Self {
        Self {
            max_batch_size: 100,
            max_concurrency: 8,
            default_suggest_limit: 10,
        }
    }
}
