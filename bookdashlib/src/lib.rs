//! # bookdashlib
//!
//! The data pipeline behind a library book dashboard.
//!
//! ## Overview
//!
//! A dashboard over a small list of books needs very little logic of its own,
//! but the logic it does need has sharp edges: missing cells, publication years
//! in the future, year ranges that end before they start. This library owns
//! that logic and nothing else. Rendering is left to the caller.
//!
//! The pipeline runs once per render cycle and every stage returns a new value:
//!
//! 1. **Source**: load raw rows from a CSV file or from rows handed over by an
//!    external collaborator (`CsvSource`, `RowSource`)
//! 2. **Data**: normalize headers and fill defaults (`normalize`), then derive
//!    `book_age` against an explicit reference year (`derive_ages`)
//! 3. **Query**: filter (`filter_books`) and sort (`sort_books`), composed by
//!    `BookQuerySet`
//! 4. **Stats**: grouped counts and summary scalars (`aggregate`)
//! 5. **Output**: display strings (`BookTableOutput`)
//!
//! ## Example
//!
//! ```rust
//! use bookdashlib::{BookQuerySet, DashboardOptions, RowSource, TableSource};
//!
//! let source = RowSource::new(
//!     vec!["Title", "Author", "YearPublished"],
//!     vec![
//!         vec![Some("Dune"), Some("Herbert"), Some("1965")],
//!         vec![Some("Emma"), Some("Austen"), Some("1815")],
//!     ],
//! );
//! let raw = source.load().unwrap();
//!
//! let options = DashboardOptions::new(2025).year_range(1900, 2025);
//! let qs = BookQuerySet::build(&raw, &options).unwrap();
//!
//! assert_eq!(qs.table.len(), 2);
//! assert_eq!(qs.view.len(), 1);
//! assert_eq!(qs.view.records()[0].book_age, 60);
//! assert_eq!(qs.full_stats.summary.total_count, 2);
//! ```

pub mod data;
pub mod error;
pub mod output;
pub mod query;
pub mod source;
pub mod stats;

pub use data::{
    current_year, derive_ages, normalize, normalize_headers, BookRecord, BookTable, RawTable,
};
pub use error::BookdashError;
pub use output::{BookTableOutput, Kpi, TableRow};
pub use query::{
    filter_books, sort_books, BookQuerySet, DashboardOptions, FilterCriteria, Ordering,
    SortDirection, SortField,
};
pub use source::{load_table, CsvSource, RowSource, TableSource};
pub use stats::{
    age_series, aggregate, distinct_authors, AgeBar, AggregateSeries, Aggregates, Summary,
};

/// Result type for bookdashlib operations
pub type Result<T> = std::result::Result<T, BookdashError>;
