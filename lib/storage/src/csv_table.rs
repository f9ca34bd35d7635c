//! Load a [`MemoryTable`] from a CSV file
//!
//! The header row names the columns. Column types are taken from
//! [`CsvOptions::column_types`] when given, otherwise inferred from the
//! non-empty cells. Empty cells load as null.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tabrecon_core::{Column, ColumnType, Error, Result, Row, Scalar};
use tracing::debug;

use crate::memory::MemoryTable;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvOptions {
    /// Column holding the row ids
    #[serde(default = "default_id_field")]
    pub id_field: String,
    /// Explicit column types, keyed by header name
    #[serde(default)]
    pub column_types: HashMap<String, ColumnType>,
}

fn default_id_field() -> String {
    "id".to_string()
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            id_field: default_id_field(),
            column_types: HashMap::new(),
        }
    }
}

fn csv_error(e: csv::Error) -> Error {
    match e.into_kind() {
        csv::ErrorKind::Io(io) => Error::Io(io),
        other => Error::InvalidConfig(format!("malformed CSV: {:?}", other)),
    }
}

/// Load a table from a CSV file on disk
pub fn load_csv<P: AsRef<Path>>(path: P, options: &CsvOptions) -> Result<MemoryTable> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let table = read_csv(file, options)?;
    debug!(path = %path.display(), rows = table.len(), "loaded CSV table");
    Ok(table)
}

/// Read a table from any CSV source
pub fn read_csv<R: Read>(reader: R, options: &CsvOptions) -> Result<MemoryTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(str::to_string)
        .collect();

    let id_idx = headers
        .iter()
        .position(|h| *h == options.id_field)
        .ok_or_else(|| Error::InvalidConfig(format!("id column not found: {}", options.id_field)))?;

    let records: Vec<csv::StringRecord> = reader
        .records()
        .collect::<std::result::Result<_, _>>()
        .map_err(csv_error)?;

    let columns: Vec<Column> = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            let column_type = options
                .column_types
                .get(header)
                .copied()
                .unwrap_or_else(|| infer_type(records.iter().filter_map(|r| r.get(idx))));
            Column::new(header.clone(), column_type)
        })
        .collect();

    let mut rows = Vec::with_capacity(records.len());
    for (line, record) in records.iter().enumerate() {
        let id = record.get(id_idx).unwrap_or_default();
        if id.is_empty() {
            return Err(Error::InvalidConfig(format!("row {} has an empty id", line + 1)));
        }

        let mut row = Row::new(id);
        for (column, cell) in columns.iter().zip(record.iter()) {
            let value = parse_cell(cell, column.column_type).ok_or_else(|| {
                Error::InvalidConfig(format!(
                    "row {}: value {:?} is not a valid {} for column {}",
                    line + 1,
                    cell,
                    column.column_type,
                    column.id
                ))
            })?;
            row.values.insert(column.id.clone(), value);
        }
        rows.push(row);
    }

    MemoryTable::new(columns, rows)
}

/// Parse a cell as `column_type`; `None` when it does not fit
fn parse_cell(cell: &str, column_type: ColumnType) -> Option<Scalar> {
    if cell.is_empty() {
        return Some(Scalar::Null);
    }
    match column_type {
        ColumnType::String => Some(Scalar::Str(cell.to_string())),
        ColumnType::Int => cell.parse().ok().map(Scalar::Int),
        ColumnType::Float => cell.parse().ok().map(Scalar::Float),
        ColumnType::Bool => parse_bool(cell).map(Scalar::Bool),
        ColumnType::Date => NaiveDate::parse_from_str(cell, DATE_FORMAT).ok().map(Scalar::Date),
    }
}

fn parse_bool(cell: &str) -> Option<bool> {
    if cell.eq_ignore_ascii_case("true") {
        Some(true)
    } else if cell.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Narrowest type accepting every non-empty cell
fn infer_type<'a>(cells: impl Iterator<Item = &'a str>) -> ColumnType {
    let cells: Vec<&str> = cells.filter(|c| !c.is_empty()).collect();
    if cells.is_empty() {
        return ColumnType::String;
    }

    [ColumnType::Int, ColumnType::Float, ColumnType::Bool, ColumnType::Date]
        .into_iter()
        .find(|&candidate| cells.iter().all(|c| parse_cell(c, candidate).is_some()))
        .unwrap_or(ColumnType::String)
}
