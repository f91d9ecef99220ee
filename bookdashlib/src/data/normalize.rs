//! Normalization: the single boundary between source schemas and records.
//!
//! Sources name their columns however they like (`Title`, ` AUTHOR `,
//! `Year Published`). Header identifiers are canonicalized here once, the
//! required columns are checked, and every row becomes a [`BookRecord`] with
//! defaults for missing values. Nothing downstream looks at column names.

use tracing::{debug, warn};

use crate::error::BookdashError;
use crate::Result;

use super::record::{
    text_or_default, BookRecord, BookTable, RawTable, AUTHOR_COLUMN, REQUIRED_COLUMNS,
    TITLE_COLUMN, UNKNOWN_AUTHOR, UNKNOWN_TITLE, YEAR_COLUMN,
};

/// Canonicalize a column identifier.
///
/// Trims, lower-cases, and drops a byte-order mark plus any whitespace,
/// `_` or `-`, so `Year Published`, `year_published` and `YearPublished`
/// all become `yearpublished`. Applying it twice changes nothing.
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .trim_matches('\u{feff}')
        .chars()
        .filter(|ch| !ch.is_whitespace() && *ch != '_' && *ch != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Return a copy of the table with canonical column identifiers.
pub fn normalize_headers(raw: &RawTable) -> RawTable {
    RawTable {
        headers: raw.headers.iter().map(|h| normalize_header(h)).collect(),
        rows: raw.rows.clone(),
    }
}

/// Fail with `SchemaMismatch` if a required column is absent.
///
/// Headers are compared in canonical form, so this accepts raw or
/// already-normalized tables.
pub fn check_schema(raw: &RawTable) -> Result<()> {
    let present: Vec<String> = raw.headers.iter().map(|h| normalize_header(h)).collect();
    for column in REQUIRED_COLUMNS {
        if !present.iter().any(|h| h == column) {
            return Err(BookdashError::SchemaMismatch {
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

/// Turn a raw table into canonical book records.
///
/// Missing or blank titles and authors become `"Unknown Title"` and
/// `"Unknown Author"`; a missing or unparseable year becomes `0`. The input
/// table is not modified.
pub fn normalize(raw: &RawTable) -> Result<BookTable> {
    let table = normalize_headers(raw);
    check_schema(&table)?;

    let column = |name: &str| {
        table
            .column_index(name)
            .ok_or_else(|| BookdashError::SchemaMismatch {
                column: name.to_string(),
            })
    };
    let title_idx = column(TITLE_COLUMN)?;
    let author_idx = column(AUTHOR_COLUMN)?;
    let year_idx = column(YEAR_COLUMN)?;

    let records: BookTable = (0..table.len())
        .map(|row| BookRecord {
            title: text_or_default(table.cell(row, title_idx).unwrap_or(""), UNKNOWN_TITLE),
            author: text_or_default(table.cell(row, author_idx).unwrap_or(""), UNKNOWN_AUTHOR),
            year_published: parse_year(table.cell(row, year_idx), row),
            book_age: 0,
        })
        .collect();

    debug!(rows = records.len(), "normalized book table");
    Ok(records)
}

/// Parse a year cell. Integral floats such as `1965.0` are accepted since
/// database drivers often hand numeric columns over that way.
fn parse_year(cell: Option<&str>, row: usize) -> i64 {
    let Some(value) = cell.map(str::trim).filter(|v| !v.is_empty()) else {
        return 0;
    };

    if let Ok(year) = value.parse::<i64>() {
        return year;
    }
    match value.parse::<f64>() {
        Ok(year) if year.is_finite() && year.fract() == 0.0 => year as i64,
        _ => {
            warn!(row, value, "unparseable publication year, using 0");
            0
        }
    }
}
