//! The read-only tabular source consumed by the reconciliation services

use async_trait::async_trait;
use std::collections::HashMap;

use crate::column::Column;
use crate::error::Result;
use crate::row::Row;

/// Read-only access to one table.
///
/// Implementations report store failures as
/// [`Error::DataSourceUnavailable`](crate::Error::DataSourceUnavailable);
/// callers never retry.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Columns in declared order
    async fn list_columns(&self) -> Result<Vec<Column>>;

    async fn row_count(&self) -> Result<usize>;

    async fn get_row(&self, id: &str) -> Result<Option<Row>>;

    /// Best-effort pre-filter of rows whose `name_column` resembles `probe`.
    ///
    /// At most `limit` rows are returned. The result is not ranked.
    async fn search_by_name(&self, name_column: &str, probe: &str, limit: usize) -> Result<Vec<Row>>;

    /// Rows whose `name_column` starts with `prefix`, case-insensitively,
    /// ordered by name then id.
    async fn search_name_prefix(&self, name_column: &str, prefix: &str, limit: usize) -> Result<Vec<Row>>;

    /// Rows for `ids` holding only `columns`. Unknown ids are absent from the map.
    async fn get_rows(&self, ids: &[String], columns: &[String]) -> Result<HashMap<String, Row>>;
}
