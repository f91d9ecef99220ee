//! Source loading: read raw rows from where the books live.
//!
//! This module handles the first stage of the pipeline - getting a
//! [`RawTable`](crate::RawTable) out of a tabular source. It provides:
//!
//! - **TableSource**: the seam every source implements
//! - **CsvSource**: a delimited file on disk
//! - **RowSource**: rows handed over by an external collaborator, such as the
//!   result set of a database query
//!
//! ## Example
//!
//! ```rust,ignore
//! use bookdashlib::source::{load_table, CsvSource};
//!
//! let raw = load_table(&CsvSource::new("books.csv"))?;
//! ```

pub mod loader;

pub use loader::{load_table, CsvSource, RowSource, TableSource};
