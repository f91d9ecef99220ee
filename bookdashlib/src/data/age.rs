//! Book age derivation.

use chrono::Datelike;

use super::record::{BookRecord, BookTable};

/// `max(0, reference_year - year_published)`.
pub fn book_age(year_published: i64, reference_year: i64) -> i64 {
    reference_year.saturating_sub(year_published).max(0)
}

/// Return a copy of the table with `book_age` set on every record.
///
/// The reference year is always supplied by the caller so the result only
/// depends on its inputs.
pub fn derive_ages(table: &BookTable, reference_year: i64) -> BookTable {
    table
        .iter()
        .map(|r| BookRecord {
            book_age: book_age(r.year_published, reference_year),
            ..r.clone()
        })
        .collect()
}

/// The current calendar year in local time.
///
/// Front ends use this as the default reference year.
pub fn current_year() -> i64 {
    i64::from(chrono::Local::now().year())
}
