use async_trait::async_trait;
use std::collections::HashMap;
use tabrecon_core::{Column, ColumnType, DataSource, Error, Result, Row};
use tabrecon_storage::MemoryTable;

/// The `dogs` table: id, name, age, status
pub fn dogs() -> MemoryTable {
    let columns = vec![
        Column::new("id", ColumnType::Int),
        Column::new("name", ColumnType::String),
        Column::new("age", ColumnType::Int),
        Column::new("status", ColumnType::String),
    ];
    let rows = [
        (1, "Cleo", 5, "good dog"),
        (2, "Pancakes", 4, "bad dog"),
        (3, "Fido", 3, "bad dog"),
        (4, "Scratchy", 3, "good dog"),
    ]
    .into_iter()
    .map(|(id, name, age, status)| {
        Row::new(id.to_string())
            .with_value("id", id)
            .with_value("name", name)
            .with_value("age", age)
            .with_value("status", status)
    })
    .collect();
    MemoryTable::new(columns, rows).unwrap()
}

/// Source whose every call fails
pub struct FailingSource;

fn unavailable() -> Error {
    Error::DataSourceUnavailable("connection refused".to_string())
}

#[async_trait]
impl DataSource for FailingSource {
    async fn list_columns(&self) -> Result<Vec<Column>> {
        Err(unavailable())
    }

    async fn row_count(&self) -> Result<usize> {
        Err(unavailable())
    }

    async fn get_row(&self, _: &str) -> Result<Option<Row>> {
        Err(unavailable())
    }

    async fn search_by_name(&self, _: &str, _: &str, _: usize) -> Result<Vec<Row>> {
        Err(unavailable())
    }

    async fn search_name_prefix(&self, _: &str, _: &str, _: usize) -> Result<Vec<Row>> {
        Err(unavailable())
    }

    async fn get_rows(&self, _: &[String], _: &[String]) -> Result<HashMap<String, Row>> {
        Err(unavailable())
    }
}
