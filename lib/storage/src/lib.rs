//! # tabrecon Storage
//!
//! [`DataSource`](tabrecon_core::DataSource) implementations:
//!
//! - [`MemoryTable`] - an immutable in-memory table with an id index
//! - [`load_csv`] / [`read_csv`] - build a [`MemoryTable`] from CSV

pub mod csv_table;
pub mod memory;

pub use csv_table::{load_csv, read_csv, CsvOptions};
pub use memory::MemoryTable;
