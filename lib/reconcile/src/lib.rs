//! # tabrecon Reconcile
//!
//! The request-shaping services of a reconciliation endpoint, independent of
//! any transport:
//!
//! - [`manifest`] - the per-table service manifest
//! - [`batch`] - resolution of query batches through the [`Matcher`](tabrecon_similarity::Matcher)
//! - [`extend`] - property extension and property proposals
//! - [`suggest`] - entity, property and type autocomplete
//!
//! Tables are registered explicitly with a [`TableRegistry`], which hands
//! back the [`ReconcileService`] answering for that table.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tabrecon_core::{DataSource, ServiceLimits, TableSettings};
//! use tabrecon_reconcile::TableRegistry;
//! use tabrecon_similarity::Matcher;
//!
//! # async fn run(source: Arc<dyn DataSource>) -> tabrecon_core::Result<()> {
//! let registry = TableRegistry::new(Matcher::default(), ServiceLimits::default());
//! let service = registry
//!     .register_table(TableSettings::new("test/dogs", "name"), source)
//!     .await?;
//! let result = service.reconcile(r#"{"q0": {"query": "fido"}}"#).await?;
//! assert!(result.contains_key("q0"));
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod extend;
pub mod manifest;
pub mod registry;
pub mod service;
pub mod suggest;

#[cfg(test)]
mod test_support;

pub use manifest::{build_manifest, Manifest, RequestOrigin};
pub use registry::TableRegistry;
pub use service::ReconcileService;
pub use suggest::SuggestKind;
