//! Service manifest construction
//!
//! The manifest embeds absolute URLs built from the request origin, so it is
//! rebuilt for every request.

use serde::Serialize;
use tabrecon_core::{Column, TableSettings, TypeRef};

use crate::suggest::SuggestKind;

pub const PROTOCOL_VERSIONS: [&str; 2] = ["0.1", "0.2"];
pub const ID_PLACEHOLDER: &str = "{{id}}";

/// Scheme and host the request arrived on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOrigin {
    pub scheme: String,
    pub host: String,
}

impl RequestOrigin {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
        }
    }

    /// Origin honouring an `X-Forwarded-Proto` header over the request scheme
    pub fn from_request(forwarded_proto: Option<&str>, scheme: &str, host: &str) -> Self {
        let scheme = forwarded_proto
            .and_then(|p| p.split(',').next())
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(scheme)
            .to_ascii_lowercase();
        Self::new(scheme, host)
    }

    fn url(&self, path: &str) -> String {
        format!("{}://{}/{}", self.scheme, self.host, path.trim_start_matches('/'))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Manifest {
    pub versions: Vec<String>,
    pub name: String,
    #[serde(rename = "identifierSpace")]
    pub identifier_space: String,
    #[serde(rename = "schemaSpace")]
    pub schema_space: String,
    #[serde(rename = "defaultTypes")]
    pub default_types: Vec<TypeRef>,
    pub view: ViewTemplate,
    pub extend: ExtendManifest,
    pub suggest: SuggestManifest,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewTemplate {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceEndpoint {
    pub service_url: String,
    pub service_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtendManifest {
    pub propose_properties: ServiceEndpoint,
    pub property_settings: Vec<PropertySetting>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertySetting {
    pub id: String,
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub setting_type: String,
    pub default: serde_json::Value,
    pub help_text: String,
}

impl PropertySetting {
    fn for_column(column: &Column) -> Self {
        let setting_type = column.column_type.setting_hint();
        let default = match setting_type {
            "number" => serde_json::json!(0),
            "checkbox" => serde_json::json!(false),
            _ => serde_json::json!(""),
        };
        Self {
            id: column.id.clone(),
            name: column.name.clone(),
            label: column.name.clone(),
            setting_type: setting_type.to_string(),
            default,
            help_text: format!("Value of the {} column ({})", column.name, column.column_type),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestManifest {
    pub entity: ServiceEndpoint,
    pub property: ServiceEndpoint,
    #[serde(rename = "type")]
    pub type_: ServiceEndpoint,
}

/// Path of the reconciliation endpoint of a table, relative to the host
pub fn service_path(settings: &TableSettings) -> String {
    format!("{}/-/reconcile", settings.path)
}

/// Build the manifest of a table as seen from `origin`
pub fn build_manifest(origin: &RequestOrigin, settings: &TableSettings, columns: &[Column]) -> Manifest {
    let service_url = origin.url(&service_path(settings));
    let endpoint = |path: String| ServiceEndpoint {
        service_url: service_url.clone(),
        service_path: path,
    };
    let suggest = |kind: SuggestKind| endpoint(format!("/suggest/{}", kind));

    let view_url = settings
        .view_url
        .clone()
        .unwrap_or_else(|| origin.url(&format!("{}/{}", settings.path, ID_PLACEHOLDER)));

    Manifest {
        versions: PROTOCOL_VERSIONS.iter().map(|v| v.to_string()).collect(),
        name: settings.service_name(),
        identifier_space: settings.identifier_space.clone(),
        schema_space: settings.schema_space.clone(),
        default_types: vec![TypeRef::object()],
        view: ViewTemplate { url: view_url },
        extend: ExtendManifest {
            propose_properties: endpoint("/extend/propose".to_string()),
            property_settings: columns.iter().map(PropertySetting::for_column).collect(),
        },
        suggest: SuggestManifest {
            entity: suggest(SuggestKind::Entity),
            property: suggest(SuggestKind::Property),
            type_: suggest(SuggestKind::Type),
        },
    }
}
