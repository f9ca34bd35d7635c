use std::sync::Arc;
use tabrecon_core::{
    BatchResult, Column, DataSource, Error, ExtendResponse, ProposeResponse, Result, ServiceLimits,
    SuggestResponse, TableSettings,
};
use tabrecon_similarity::Matcher;
use tracing::error;

use crate::batch::{parse_queries, process_batch};
use crate::extend::{extend, parse_extend, propose_properties};
use crate::manifest::{build_manifest, Manifest, RequestOrigin};
use crate::suggest::{suggest_entities, suggest_properties, suggest_types, SuggestKind};

/// The reconciliation handlers of one registered table
pub struct ReconcileService {
    settings: TableSettings,
    source: Arc<dyn DataSource>,
    matcher: Arc<Matcher>,
    limits: ServiceLimits,
}

impl ReconcileService {
    pub fn new(
        settings: TableSettings,
        source: Arc<dyn DataSource>,
        matcher: Arc<Matcher>,
        limits: ServiceLimits,
    ) -> Self {
        Self {
            settings,
            source,
            matcher,
            limits,
        }
    }

    #[inline]
    pub fn settings(&self) -> &TableSettings {
        &self.settings
    }

    async fn columns(&self) -> Result<Vec<Column>> {
        self.source.list_columns().await.map_err(|e| self.log_failure(e))
    }

    fn log_failure(&self, e: Error) -> Error {
        if let Error::DataSourceUnavailable(reason) = &e {
            error!(table = %self.settings.path, %reason, "data source call failed");
        }
        e
    }

    pub async fn manifest(&self, origin: &RequestOrigin) -> Result<Manifest> {
        let columns = self.columns().await?;
        Ok(build_manifest(origin, &self.settings, &columns))
    }

    /// Resolve the raw `queries` JSON
    pub async fn reconcile(&self, raw_queries: &str) -> Result<BatchResult> {
        let queries = parse_queries(raw_queries)?;
        process_batch(
            &self.matcher,
            self.source.as_ref(),
            &self.settings.name_field,
            &self.limits,
            queries,
        )
        .await
        .map_err(|e| self.log_failure(e))
    }

    /// Resolve the raw `extend` JSON
    pub async fn extend(&self, raw_extend: &str) -> Result<ExtendResponse> {
        let request = parse_extend(raw_extend)?;
        extend(self.source.as_ref(), &request)
            .await
            .map_err(|e| self.log_failure(e))
    }

    pub async fn propose_properties(&self, type_id: Option<&str>, limit: Option<usize>) -> Result<ProposeResponse> {
        let columns = self.columns().await?;
        Ok(propose_properties(&columns, type_id, limit))
    }

    pub async fn suggest(&self, kind: SuggestKind, prefix: &str, limit: Option<usize>) -> Result<SuggestResponse> {
        let limit = limit.unwrap_or(self.limits.default_suggest_limit).max(1);
        match kind {
            SuggestKind::Entity => suggest_entities(self.source.as_ref(), &self.settings.name_field, prefix, limit)
                .await
                .map_err(|e| self.log_failure(e)),
            SuggestKind::Property => {
                let columns = self.columns().await?;
                let exclude = self
                    .settings
                    .suggest_exclude_name_field
                    .then_some(self.settings.name_field.as_str());
                Ok(suggest_properties(&columns, prefix, limit, exclude))
            }
            SuggestKind::Type => Ok(suggest_types(prefix)),
        }
    }
}
