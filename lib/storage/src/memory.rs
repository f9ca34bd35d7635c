use ahash::{AHashMap, AHashSet};
use async_trait::async_trait;
use std::collections::HashMap;
use tabrecon_core::{compare_ids, Column, DataSource, Error, Result, Row};
use tabrecon_similarity::{normalize, shares_token};

/// A read-only table held in memory
#[derive(Debug, Clone)]
pub struct MemoryTable {
    columns: Vec<Column>,
    rows: Vec<Row>,
    index: AHashMap<String, usize>,
}

impl MemoryTable {
    /// Build a table, rejecting duplicate column or row ids
    pub fn new(columns: Vec<Column>, rows: Vec<Row>) -> Result<Self> {
        let mut seen = AHashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.id.as_str()) {
                return Err(Error::InvalidConfig(format!("duplicate column id: {}", column.id)));
            }
        }

        let mut index = AHashMap::with_capacity(rows.len());
        for (pos, row) in rows.iter().enumerate() {
            if index.insert(row.id.clone(), pos).is_some() {
                return Err(Error::InvalidConfig(format!("duplicate row id: {}", row.id)));
            }
        }

        Ok(Self { columns, rows, index })
    }

    #[inline]
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[inline]
    #[must_use]
    pub fn has_column(&self, id: &str) -> bool {
        self.columns.iter().any(|c| c.id == id)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[inline]
    pub fn get(&self, id: &str) -> Option<&Row> {
        self.index.get(id).map(|&pos| &self.rows[pos])
    }

    fn normalized_names<'a>(&'a self, name_column: &'a str) -> impl Iterator<Item = (&'a Row, String)> + 'a {
        self.rows
            .iter()
            .filter_map(move |row| row.text(name_column).map(|name| (row, normalize(&name))))
    }
}

#[async_trait]
impl DataSource for MemoryTable {
    async fn list_columns(&self) -> Result<Vec<Column>> {
        Ok(self.columns.clone())
    }

    async fn row_count(&self) -> Result<usize> {
        Ok(self.rows.len())
    }

    async fn get_row(&self, id: &str) -> Result<Option<Row>> {
        Ok(self.get(id).cloned())
    }

    /// Exact names first, then substring hits, then rows sharing a token
    async fn search_by_name(&self, name_column: &str, probe: &str, limit: usize) -> Result<Vec<Row>> {
        let probe = normalize(probe);
        if probe.is_empty() {
            return Ok(Vec::new());
        }

        let mut exact = Vec::new();
        let mut contains = Vec::new();
        let mut overlap = Vec::new();
        for (row, name) in self.normalized_names(name_column) {
            if name == probe {
                exact.push(row);
            } else if name.contains(&probe) {
                contains.push(row);
            } else if shares_token(&name, &probe) {
                overlap.push(row);
            }
        }

        Ok(exact
            .into_iter()
            .chain(contains)
            .chain(overlap)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn search_name_prefix(&self, name_column: &str, prefix: &str, limit: usize) -> Result<Vec<Row>> {
        let prefix = normalize(prefix);

        let mut hits: Vec<(&Row, String)> = self
            .normalized_names(name_column)
            .filter(|(_, name)| name.starts_with(&prefix))
            .collect();
        hits.sort_by(|(a, name_a), (b, name_b)| name_a.cmp(name_b).then_with(|| compare_ids(&a.id, &b.id)));

        Ok(hits.into_iter().take(limit).map(|(row, _)| row.clone()).collect())
    }

    async fn get_rows(&self, ids: &[String], columns: &[String]) -> Result<HashMap<String, Row>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.get(id).map(|row| (id.clone(), row.project(columns))))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabrecon_core::{ColumnType, Scalar};

    fn dogs() -> MemoryTable {
        let columns = vec![
            Column::new("id", ColumnType::Int),
            Column::new("name", ColumnType::String),
            Column::new("age", ColumnType::Int),
        ];
        let rows = vec![
            Row::new("1").with_value("name", "Cleo").with_value("age", 5),
            Row::new("2").with_value("name", "Pancakes").with_value("age", 4),
            Row::new("3").with_value("name", "Fido").with_value("age", 3),
            Row::new("4").with_value("name", "Fido Junior").with_value("age", 1),
            Row::new("5").with_value("name", "Big Fidor"),
            Row::new("6").with_value("name", Scalar::Null),
        ];
        MemoryTable::new(columns, rows).unwrap()
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let columns = vec![Column::new("name", ColumnType::String)];
        let rows = vec![Row::new("1"), Row::new("1")];
        assert!(matches!(MemoryTable::new(columns, rows), Err(Error::InvalidConfig(_))));

        let columns = vec![
            Column::new("name", ColumnType::String),
            Column::new("name", ColumnType::Int),
        ];
        assert!(MemoryTable::new(columns, Vec::new()).is_err());
    }

    #[tokio::test]
    async fn test_search_by_name_orders_exact_first() {
        let table = dogs();
        let rows = table.search_by_name("name", " FIDO", 10).await.unwrap();
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "4", "5"]);

        let limited = table.search_by_name("name", "fido", 1).await.unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].id, "3");
    }

    #[tokio::test]
    async fn test_search_by_name_token_overlap() {
        let table = dogs();
        let rows = table.search_by_name("name", "junior dog", 10).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "4");
    }

    #[tokio::test]
    async fn test_search_name_prefix_sorted() {
        let table = dogs();
        let rows = table.search_name_prefix("name", "f", 10).await.unwrap();
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "4"]);
    }

    #[tokio::test]
    async fn test_get_rows_projects_and_skips_missing() {
        let table = dogs();
        let ids = vec!["1".to_string(), "99".to_string()];
        let rows = table.get_rows(&ids, &["age".to_string()]).await.unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows["1"];
        assert_eq!(row.get("age"), Some(&Scalar::Int(5)));
        assert!(row.get("name").is_none());
    }

    #[tokio::test]
    async fn test_row_lookup() {
        let table = dogs();
        assert_eq!(table.row_count().await.unwrap(), 6);
        assert!(table.get_row("3").await.unwrap().is_some());
        assert!(table.get_row("42").await.unwrap().is_none());
    }
}
