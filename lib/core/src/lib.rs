//! # tabrecon Core
//!
//! Core library for the tabrecon reconciliation service.
//!
//! This crate provides the shared data model and contracts:
//!
//! - [`Column`] and [`Row`] - the tabular data model
//! - [`DataSource`] - read-only access to one table
//! - [`protocol`] - request and response types of the reconciliation protocol
//! - [`TableSettings`] - per-table reconciliation settings
//! - [`Error`] - the error taxonomy shared by every crate

pub mod column;
pub mod datasource;
pub mod error;
pub mod protocol;
pub mod row;
pub mod settings;

pub use column::{Column, ColumnType};
pub use datasource::DataSource;
pub use error::{Error, Result};
pub use protocol::{
    BatchResult, Candidate, ExtendRequest, ExtendResponse, PropertyConstraint, PropertyMeta,
    PropertyRef, PropertyValue, ProposeResponse, Query, QueryResult, SuggestResponse, Suggestion,
    TypeRef,
};
pub use row::{compare_ids, Row, Scalar};
pub use settings::{ServiceLimits, TableSettings};
