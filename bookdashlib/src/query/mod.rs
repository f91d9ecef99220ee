//! Query processing: filter, sort, and assemble a render cycle.
//!
//! This module handles the third stage of the pipeline - turning a derived
//! book table into the views a dashboard shows. It provides:
//!
//! - **Options**: Filter and sort configuration (`FilterCriteria`, `Ordering`,
//!   `DashboardOptions`)
//! - **Filter / Sort**: Pure stage functions (`filter_books`, `sort_books`)
//! - **QuerySet**: One complete render cycle (`BookQuerySet`)
//!
//! ## Example
//!
//! ```rust,ignore
//! use bookdashlib::query::{BookQuerySet, DashboardOptions};
//!
//! let options = DashboardOptions::new(2025)
//!     .author("Austen")
//!     .sort_by("year", true);
//! let queryset = BookQuerySet::build(&raw, &options)?;
//! ```

pub mod filter;
pub mod options;
pub mod queryset;
pub mod sort;

pub use filter::filter_books;
pub use options::{DashboardOptions, FilterCriteria, Ordering, SortDirection, SortField};
pub use queryset::BookQuerySet;
pub use sort::sort_books;
