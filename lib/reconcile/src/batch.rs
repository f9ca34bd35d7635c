//! Query batch resolution
//!
//! Every query of a batch is matched independently. A query that cannot be
//! parsed or has blank text answers with an empty result; only a data source
//! failure fails the whole batch.

use futures_util::stream::{self, StreamExt, TryStreamExt};
use serde_json::{Map, Value};
use tabrecon_core::{BatchResult, DataSource, Error, Query, QueryResult, Result, ServiceLimits, TypeRef};
use tabrecon_similarity::Matcher;
use tracing::{debug, warn};

/// Parse the `queries` parameter into its id -> query spec mapping
pub fn parse_queries(raw: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Object(queries) => Ok(queries),
        _ => Err(Error::BadRequest("queries must be a JSON object".to_string())),
    }
}

/// Resolve a batch of queries against `source`
///
/// The result has exactly the keys of `queries`.
pub async fn process_batch(
    matcher: &Matcher,
    source: &dyn DataSource,
    name_field: &str,
    limits: &ServiceLimits,
    queries: Map<String, Value>,
) -> Result<BatchResult> {
    if queries.len() > limits.max_batch_size {
        return Err(Error::BatchTooLarge {
            size: queries.len(),
            max: limits.max_batch_size,
        });
    }

    let workers = queries.len().min(limits.max_concurrency).max(1);
    debug!(queries = queries.len(), workers, "processing query batch");

    stream::iter(queries)
        .map(|(id, spec)| async move {
            let candidates = match serde_json::from_value::<Query>(spec) {
                Ok(query) => {
                    if let Some(type_id) = query.type_id.as_deref().filter(|t| !TypeRef::is_default(t)) {
                        debug!(query_id = %id, type_id, "ignoring unsupported type");
                    }
                    match matcher.find(source, name_field, &query.query, query.limit).await {
                        Ok(candidates) => candidates,
                        Err(e @ Error::DataSourceUnavailable(_)) => return Err(e),
                        Err(e) => {
                            warn!(query_id = %id, error = %e, "query degraded to empty result");
                            Vec::new()
                        }
                    }
                }
                Err(e) => {
                    warn!(query_id = %id, error = %e, "malformed query degraded to empty result");
                    Vec::new()
                }
            };
            Ok((id, QueryResult { result: candidates }))
        })
        .buffer_unordered(workers)
        .try_collect()
        .await
}
