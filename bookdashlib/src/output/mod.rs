//! Output formatting: present a query set as a table.
//!
//! This module handles the final stage of the pipeline - formatting query
//! results for display. It provides:
//!
//! - **BookTableOutput**: Table-ready structure with headers, rows, footer and
//!   KPI lines
//! - **TableRow**: Individual row with label and formatted values
//!
//! BookTableOutput is a pure presentation layer - it only formats data into
//! strings. All filtering, sorting and aggregation happens in the query stage.
//!
//! ## Example
//!
//! ```rust,ignore
//! use bookdashlib::output::BookTableOutput;
//!
//! let table = BookTableOutput::from_queryset(&queryset);
//! // table.headers: ["Title", "Author", "Year", "Age"]
//! // table.footer: TableRow { label: "Total (3 books)", ... }
//! ```

pub mod table;

pub use table::{format_mean_age, summary_kpis, BookTableOutput, Kpi, TableRow};
