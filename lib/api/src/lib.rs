//! # tabrecon API
//!
//! actix-web surface of the reconciliation service.
//!
//! | route | answer |
//! |---|---|
//! | `GET\|POST /{table}/-/reconcile` | manifest, query batch (`queries=`) or extend (`extend=`) |
//! | `GET /{table}/-/reconcile/extend/propose` | extendable properties |
//! | `GET /{table}/-/reconcile/suggest/{entity,property,type}` | prefix suggestions |
//!
//! Every response allows any origin.

pub mod rest;

pub use rest::{configure, error_response, RestApi};
