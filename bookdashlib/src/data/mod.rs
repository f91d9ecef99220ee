//! Data preparation: canonical records and derived fields.
//!
//! This module handles the second stage of the pipeline - turning a raw
//! table into typed book records. It provides:
//!
//! - **Records**: `RawTable` (loader output) and `BookTable` (canonical rows)
//! - **Normalization**: header canonicalization and default filling
//! - **Age derivation**: `book_age` against an injected reference year
//!
//! ## Example
//!
//! ```rust,ignore
//! use bookdashlib::data::{normalize, derive_ages};
//!
//! let table = normalize(&raw)?;
//! let aged = derive_ages(&table, 2025);
//! ```

pub mod age;
pub mod normalize;
pub mod record;

pub use age::{book_age, current_year, derive_ages};
pub use normalize::{check_schema, normalize, normalize_header, normalize_headers};
pub use record::{
    BookRecord, BookTable, RawTable, AUTHOR_COLUMN, REQUIRED_COLUMNS, TITLE_COLUMN,
    UNKNOWN_AUTHOR, UNKNOWN_TITLE, YEAR_COLUMN,
};
