//! # tabrecon
//!
//! An OpenRefine-compatible reconciliation service for tabular data.
//!
//! Given a table with a stable id column and a designated name column,
//! tabrecon answers the reconciliation protocol:
//!
//! - **Manifest**: the service description of each table
//! - **Reconcile**: batches of free-text queries answered with ranked candidate rows
//! - **Extend**: column values for known row ids
//! - **Suggest**: prefix autocomplete over names, columns and types
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! tabrecon --config tables.json --http-port 8001
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tabrecon::prelude::*;
//!
//! # async fn run() -> tabrecon::Result<()> {
//! let table = load_csv("dogs.csv", &CsvOptions::default())?;
//! let registry = TableRegistry::new(Matcher::default(), ServiceLimits::default());
//! let service = registry
//!     .register_table(TableSettings::new("test/dogs", "name"), Arc::new(table))
//!     .await?;
//!
//! let result = service.reconcile(r#"{"q0": {"query": "fido"}}"#).await?;
//! println!("{:?}", result["q0"].result);
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Structure
//!
//! - [`tabrecon-core`](https://docs.rs/tabrecon-core) - data model, errors, the `DataSource` trait
//! - [`tabrecon-similarity`](https://docs.rs/tabrecon-similarity) - name scoring and candidate ranking
//! - [`tabrecon-storage`](https://docs.rs/tabrecon-storage) - in-memory and CSV tables
//! - [`tabrecon-reconcile`](https://docs.rs/tabrecon-reconcile) - manifest, batch, extend and suggest services
//! - [`tabrecon-api`](https://docs.rs/tabrecon-api) - REST API

pub mod config;

// Re-export core types
pub use tabrecon_core::{
    Candidate, Column, ColumnType, DataSource, Error, ExtendRequest, ExtendResponse, Query,
    Result, Row, Scalar, ServiceLimits, TableSettings,
};

pub use tabrecon_similarity::{MatchConfig, Matcher};
pub use tabrecon_storage::{load_csv, read_csv, CsvOptions, MemoryTable};
pub use tabrecon_reconcile::{ReconcileService, RequestOrigin, SuggestKind, TableRegistry};
pub use tabrecon_api::RestApi;

pub use config::ServiceConfig;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Candidate, Column, ColumnType, CsvOptions, DataSource, Error, MatchConfig, Matcher,
        MemoryTable, ReconcileService, RestApi, Result, Row, Scalar, ServiceConfig,
        ServiceLimits, TableRegistry, TableSettings, load_csv,
    };
}
