//! Service configuration file
//!
//! ```json
//! {
//!   "tables": [
//!     {"path": "test/dogs", "csv": "dogs.csv", "name_field": "name", "column_types": {"age": "int"}}
//!   ],
//!   "matching": {"min_score": 20},
//!   "limits": {"max_batch_size": 100}
//! }
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tabrecon_core::{Error, Result, ServiceLimits, TableSettings};
use tabrecon_reconcile::TableRegistry;
use tabrecon_similarity::{MatchConfig, Matcher};
use tabrecon_storage::{load_csv, CsvOptions};
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
pub struct TableConfig {
    #[serde(flatten)]
    pub settings: TableSettings,
    /// CSV file backing the table, relative to the config file
    pub csv: PathBuf,
    #[serde(flatten)]
    pub csv_options: CsvOptions,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub tables: Vec<TableConfig>,
    #[serde(default)]
    pub matching: MatchConfig,
    #[serde(default)]
    pub limits: ServiceLimits,
}

impl ServiceConfig {
    /// Parse a JSON config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: ServiceConfig =
            serde_json::from_str(text).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.limits.max_batch_size == 0 {
            return Err(Error::InvalidConfig("limits.max_batch_size must be at least 1".to_string()));
        }
        if self.limits.max_concurrency == 0 {
            return Err(Error::InvalidConfig("limits.max_concurrency must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Load every enabled table and register it
    ///
    /// Relative CSV paths resolve against `base_dir`.
    pub async fn build_registry(&self, base_dir: &Path) -> Result<TableRegistry> {
        let matcher = Matcher::try_new(self.matching.clone())?;
        let registry = TableRegistry::new(matcher, self.limits);

        for table in &self.tables {
            if !table.settings.enabled {
                info!(table = %table.settings.path, "skipping disabled table");
                continue;
            }
            let csv_path = if table.csv.is_absolute() {
                table.csv.clone()
            } else {
                base_dir.join(&table.csv)
            };
            let source = load_csv(&csv_path, &table.csv_options)?;
            registry
                .register_table(table.settings.clone(), Arc::new(source))
                .await?;
        }

        Ok(registry)
    }
}
