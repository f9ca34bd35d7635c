use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tabrecon_core::{DataSource, Error, Result, ServiceLimits, TableSettings};
use tabrecon_similarity::Matcher;
use tracing::info;

use crate::service::ReconcileService;

/// Tables registered for reconciliation, keyed by URL path
pub struct TableRegistry {
    tables: RwLock<HashMap<String, Arc<ReconcileService>>>,
    matcher: Arc<Matcher>,
    limits: ServiceLimits,
}

impl std::fmt::Debug for TableRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableRegistry")
            .field("matcher", &self.matcher)
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

impl TableRegistry {
    pub fn new(matcher: Matcher, limits: ServiceLimits) -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
            matcher: Arc::new(matcher),
            limits,
        }
    }

    #[inline]
    pub fn limits(&self) -> &ServiceLimits {
        &self.limits
    }

    /// Register a table and return its handler set
    ///
    /// Fails for disabled tables and when `name_field` is not a column of `source`.
    /// Registering a path again replaces the earlier service.
    pub async fn register_table(
        &self,
        mut settings: TableSettings,
        source: Arc<dyn DataSource>,
    ) -> Result<Arc<ReconcileService>> {
        settings.path = settings.path.trim_matches('/').to_string();
        if !settings.enabled {
            return Err(Error::NotConfigured(settings.path));
        }

        let columns = source.list_columns().await?;
        if !columns.iter().any(|c| c.id == settings.name_field) {
            return Err(Error::InvalidConfig(format!(
                "name_field {} is not a column of {}",
                settings.name_field, settings.path
            )));
        }

        let path = settings.path.clone();
        let service = Arc::new(ReconcileService::new(
            settings,
            source,
            self.matcher.clone(),
            self.limits,
        ));
        self.tables.write().insert(path.clone(), service.clone());
        info!(table = %path, columns = columns.len(), "registered table for reconciliation");

        Ok(service)
    }

    /// Service of a table path, [`Error::NotConfigured`] when absent
    pub fn get(&self, path: &str) -> Result<Arc<ReconcileService>> {
        let path = path.trim_matches('/');
        self.tables
            .read()
            .get(path)
            .cloned()
            .ok_or_else(|| Error::NotConfigured(path.to_string()))
    }

    pub fn deregister(&self, path: &str) -> bool {
        self.tables.write().remove(path.trim_matches('/')).is_some()
    }

    #[must_use]
    pub fn list_tables(&self) -> Vec<String> {
        let mut tables: Vec<String> = self.tables.read().keys().cloned().collect();
        tables.sort();
        tables
    }
}
