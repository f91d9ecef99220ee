//! Sorter: stable ordering of a table view.

use std::cmp::Ordering as CmpOrdering;

use crate::data::record::{BookRecord, BookTable};

use super::options::{Ordering, SortDirection, SortField};

/// Return a copy of the table ordered by `ordering`.
///
/// Strings compare lexicographically, years and ages numerically. Records
/// that compare equal keep their input order in both directions.
pub fn sort_books(table: &BookTable, ordering: Ordering) -> BookTable {
    let mut records = table.records().to_vec();
    records.sort_by(|a, b| {
        let cmp = compare_by(a, b, ordering.by);
        match ordering.direction {
            SortDirection::Ascending => cmp,
            // Reversing the comparator (not the output) keeps ties stable
            SortDirection::Descending => cmp.reverse(),
        }
    });
    BookTable::from_records(records)
}

fn compare_by(a: &BookRecord, b: &BookRecord, field: SortField) -> CmpOrdering {
    match field {
        SortField::Title => a.title.cmp(&b.title),
        SortField::Author => a.author.cmp(&b.author),
        SortField::YearPublished => a.year_published.cmp(&b.year_published),
        SortField::BookAge => a.book_age.cmp(&b.book_age),
    }
}
