//! Filter engine: keep the records that satisfy every predicate.

use tracing::debug;

use crate::data::record::{BookRecord, BookTable};

use super::options::FilterCriteria;

/// Return the records matching all predicates in `criteria`, in input order.
///
/// An inverted year range (`min > max`) matches nothing rather than failing,
/// as does any filter over an empty table.
pub fn filter_books(table: &BookTable, criteria: &FilterCriteria) -> BookTable {
    let search = criteria
        .title_search
        .as_deref()
        .map(str::to_lowercase)
        .filter(|term| !term.is_empty());

    let view: BookTable = table
        .iter()
        .filter(|r| matches_author(r, criteria.author.as_deref()))
        .filter(|r| matches_years(r, criteria.year_range))
        .filter(|r| matches_title(r, search.as_deref()))
        .cloned()
        .collect();

    debug!(
        input = table.len(),
        output = view.len(),
        "filtered book table"
    );
    view
}

fn matches_author(record: &BookRecord, author: Option<&str>) -> bool {
    author.is_none_or(|a| record.author == a)
}

fn matches_years(record: &BookRecord, range: Option<(i64, i64)>) -> bool {
    range.is_none_or(|(min, max)| min <= record.year_published && record.year_published <= max)
}

/// `term` must already be lower-cased.
fn matches_title(record: &BookRecord, term: Option<&str>) -> bool {
    term.is_none_or(|t| record.title.to_lowercase().contains(t))
}
