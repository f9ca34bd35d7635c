//! Property extension and property proposals

use std::collections::{HashMap, HashSet};
use tabrecon_core::{
    Column, ColumnType, DataSource, ExtendRequest, ExtendResponse, PropertyMeta, PropertyValue,
    ProposeResponse, Result, Scalar, TypeRef,
};
use tracing::debug;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse the `extend` parameter
pub fn parse_extend(raw: &str) -> Result<ExtendRequest> {
    Ok(serde_json::from_str(raw)?)
}

/// Fetch the requested properties for every requested row id
///
/// Unknown property ids are dropped. Unknown row ids are answered with an
/// empty value list for every property.
pub async fn extend(source: &dyn DataSource, request: &ExtendRequest) -> Result<ExtendResponse> {
    let columns = source.list_columns().await?;

    let mut seen = HashSet::new();
    let properties: Vec<&Column> = request
        .properties
        .iter()
        .filter_map(|p| {
            let column = columns.iter().find(|c| c.id == p.id);
            if column.is_none() {
                debug!(property = %p.id, "dropping unknown property");
            }
            column
        })
        .filter(|c| seen.insert(c.id.as_str()))
        .collect();

    let column_ids: Vec<String> = properties.iter().map(|c| c.id.clone()).collect();
    let found = source.get_rows(&request.ids, &column_ids).await?;

    let rows = request
        .ids
        .iter()
        .map(|id| {
            let row = found.get(id);
            let values = properties
                .iter()
                .map(|column| {
                    let value = row
                        .and_then(|r| r.get(&column.id))
                        .and_then(|v| wrap_value(column.column_type, v));
                    (column.id.clone(), value.into_iter().collect())
                })
                .collect::<HashMap<_, _>>();
            (id.clone(), values)
        })
        .collect();

    Ok(ExtendResponse {
        meta: properties
            .iter()
            .map(|c| PropertyMeta {
                id: c.id.clone(),
                name: c.name.clone(),
            })
            .collect(),
        rows,
    })
}

/// Wrap a cell by its column's declared type
///
/// Values that do not fit the declared type keep the wrapper of their own kind.
pub fn wrap_value(column_type: ColumnType, value: &Scalar) -> Option<PropertyValue> {
    let coerced = match (column_type, value) {
        (_, Scalar::Null) => return None,
        (ColumnType::String, v) => v.to_text().map(PropertyValue::Str),
        (ColumnType::Int, Scalar::Float(f)) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            Some(PropertyValue::Int(*f as i64))
        }
        (ColumnType::Int, Scalar::Str(s)) => s.trim().parse().ok().map(PropertyValue::Int),
        (ColumnType::Float, Scalar::Int(i)) => Some(PropertyValue::Float(*i as f64)),
        (ColumnType::Float, Scalar::Str(s)) => s.trim().parse().ok().map(PropertyValue::Float),
        (ColumnType::Bool, Scalar::Int(i)) if *i == 0 || *i == 1 => Some(PropertyValue::Bool(*i == 1)),
        (ColumnType::Bool, Scalar::Str(s)) => s.trim().parse().ok().map(PropertyValue::Bool),
        (ColumnType::Date, Scalar::Str(s)) => chrono::NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
            .ok()
            .map(|d| PropertyValue::Date(d.format(DATE_FORMAT).to_string())),
        _ => None,
    };
    coerced.or_else(|| own_kind(value))
}

fn own_kind(value: &Scalar) -> Option<PropertyValue> {
    match value {
        Scalar::Null => None,
        Scalar::Bool(b) => Some(PropertyValue::Bool(*b)),
        Scalar::Int(i) => Some(PropertyValue::Int(*i)),
        Scalar::Float(f) => Some(PropertyValue::Float(*f)),
        Scalar::Str(s) => Some(PropertyValue::Str(s.clone())),
        Scalar::Date(d) => Some(PropertyValue::Date(d.format(DATE_FORMAT).to_string())),
    }
}

/// Properties that can be extended for `type_id`
///
/// Every column is proposed for the default type (or no type); other types have none.
pub fn propose_properties(columns: &[Column], type_id: Option<&str>, limit: Option<usize>) -> ProposeResponse {
    let type_id = type_id.unwrap_or(tabrecon_core::protocol::DEFAULT_TYPE_ID);
    let properties = if TypeRef::is_default(type_id) {
        columns
            .iter()
            .take(limit.unwrap_or(usize::MAX))
            .map(|c| PropertyMeta {
                id: c.id.clone(),
                name: c.name.clone(),
            })
            .collect()
    } else {
        Vec::new()
    };

    ProposeResponse {
        type_id: type_id.to_string(),
        properties,
    }
}
