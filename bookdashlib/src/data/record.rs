//! Core data structures for book records.
//!
//! Two table shapes exist in the pipeline:
//!
//! - [`RawTable`]: untyped cells exactly as a source supplied them. Column
//!   names may have any case or spacing and any cell may be missing.
//! - [`BookTable`]: canonical records produced by normalization. Every record
//!   has a title, an author and a publication year; `book_age` is filled in
//!   by the age deriver.

use serde::{Deserialize, Serialize};

/// Canonical name of the title column.
pub const TITLE_COLUMN: &str = "title";
/// Canonical name of the author column.
pub const AUTHOR_COLUMN: &str = "author";
/// Canonical name of the publication year column.
pub const YEAR_COLUMN: &str = "yearpublished";

/// Columns every source must provide, in canonical form.
pub const REQUIRED_COLUMNS: [&str; 3] = [TITLE_COLUMN, AUTHOR_COLUMN, YEAR_COLUMN];

/// Default for a missing title.
pub const UNKNOWN_TITLE: &str = "Unknown Title";
/// Default for a missing author.
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// Rows as loaded from a source, before normalization.
///
/// `None` marks a missing cell (an SQL `NULL`, or a CSV row shorter than the
/// header). Extra columns are carried along and ignored downstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTable {
    /// Column identifiers in source order
    pub headers: Vec<String>,
    /// Row cells, positionally aligned with `headers`
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    /// Create a raw table from headers and rows.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self { headers, rows }
    }

    /// Position of a column by exact identifier.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell at `(row, column)`, `None` if missing or out of range.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .and_then(|c| c.as_deref())
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if there are no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One book after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookRecord {
    /// Book title, never empty
    pub title: String,
    /// Author name, never empty
    pub author: String,
    /// Publication year, `0` when the source had none
    pub year_published: i64,
    /// `max(0, reference_year - year_published)`, `0` until derived
    pub book_age: i64,
}

impl BookRecord {
    /// Create a record with no derived age yet.
    pub fn new(title: impl Into<String>, author: impl Into<String>, year_published: i64) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            year_published,
            book_age: 0,
        }
    }

    /// Builder: set the derived age.
    pub fn with_age(mut self, book_age: i64) -> Self {
        self.book_age = book_age;
        self
    }
}

/// An ordered sequence of book records.
///
/// Order is source order until a sort reorders it. Duplicates are kept.
/// Tables are never mutated by pipeline stages; each stage returns a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookTable {
    records: Vec<BookRecord>,
}

impl BookTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap records as a table, keeping their order.
    pub fn from_records(records: Vec<BookRecord>) -> Self {
        Self { records }
    }

    /// Records in table order.
    pub fn records(&self) -> &[BookRecord] {
        &self.records
    }

    /// Iterate over records in table order.
    pub fn iter(&self) -> std::slice::Iter<'_, BookRecord> {
        self.records.iter()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if the table has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Smallest publication year, `None` for an empty table.
    pub fn min_year(&self) -> Option<i64> {
        self.records.iter().map(|r| r.year_published).min()
    }

    /// Largest publication year, `None` for an empty table.
    pub fn max_year(&self) -> Option<i64> {
        self.records.iter().map(|r| r.year_published).max()
    }

    /// Re-apply the normalization defaults to an already typed table.
    ///
    /// Text fields are trimmed and blank ones replaced by their defaults.
    /// A table produced by [`normalize`](crate::normalize) comes back unchanged.
    pub fn normalized(&self) -> Self {
        self.records
            .iter()
            .map(|r| BookRecord {
                title: text_or_default(&r.title, UNKNOWN_TITLE),
                author: text_or_default(&r.author, UNKNOWN_AUTHOR),
                year_published: r.year_published,
                book_age: r.book_age,
            })
            .collect()
    }
}

/// Trimmed text, or the default when nothing is left.
pub(crate) fn text_or_default(value: &str, default: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

impl FromIterator<BookRecord> for BookTable {
    fn from_iter<I: IntoIterator<Item = BookRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a BookTable {
    type Item = &'a BookRecord;
    type IntoIter = std::slice::Iter<'a, BookRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
