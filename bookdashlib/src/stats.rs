//! Aggregation: grouped counts and summary statistics.
//!
//! Everything here is computed fresh from the table it is given, which is
//! either the full derived table or a filtered view. Nothing is cached.
//!
//! - **AggregateSeries**: grouping key to record count (books per author,
//!   books per year)
//! - **Summary**: total count, year bounds, mean age
//! - **AgeBar** / `distinct_authors`: per-record chart data and selector
//!   options for the presentation layer

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::data::record::BookTable;

/// Number of records per grouping key.
///
/// Keys carry no display order; use [`sorted_by_count_desc`] for bar charts.
///
/// [`sorted_by_count_desc`]: AggregateSeries::sorted_by_count_desc
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregateSeries<K: Ord> {
    counts: BTreeMap<K, usize>,
}

impl<K: Ord> Default for AggregateSeries<K> {
    fn default() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }
}

impl<K: Ord> AggregateSeries<K> {
    /// Count for `key`, `0` if absent.
    pub fn get(&self, key: &K) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True if no key has been counted.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts. Equals the number of records grouped.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Iterate over `(key, count)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&K, usize)> {
        self.counts.iter().map(|(k, v)| (k, *v))
    }

    /// Entries by descending count, ties broken by ascending key.
    pub fn sorted_by_count_desc(&self) -> Vec<(&K, usize)> {
        let mut entries: Vec<(&K, usize)> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }
}

impl<K: Ord> FromIterator<K> for AggregateSeries<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut counts = BTreeMap::new();
        for key in iter {
            *counts.entry(key).or_insert(0) += 1;
        }
        Self { counts }
    }
}

/// Summary scalars over a record set.
///
/// `min_year`, `max_year` and `mean_age` are `None` for an empty set, so a
/// caller cannot read an average that was never computed. Check
/// `total_count > 0` (or match on the option) before display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of records
    pub total_count: usize,
    /// Earliest publication year
    pub min_year: Option<i64>,
    /// Latest publication year
    pub max_year: Option<i64>,
    /// Arithmetic mean of `book_age`, unrounded
    pub mean_age: Option<f64>,
}

impl Summary {
    /// Compute the summary for a table.
    pub fn from_table(table: &BookTable) -> Self {
        let total_count = table.len();
        let mean_age = if total_count == 0 {
            None
        } else {
            let sum: f64 = table.iter().map(|r| r.book_age as f64).sum();
            Some(sum / total_count as f64)
        };

        Self {
            total_count,
            min_year: table.min_year(),
            max_year: table.max_year(),
            mean_age,
        }
    }
}

/// Both grouped series plus the summary for one record set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregates {
    /// Books per author
    pub count_by_author: AggregateSeries<String>,
    /// Books per publication year
    pub count_by_year: AggregateSeries<i64>,
    /// Summary scalars
    pub summary: Summary,
}

/// Aggregate a table.
pub fn aggregate(table: &BookTable) -> Aggregates {
    Aggregates {
        count_by_author: table.iter().map(|r| r.author.clone()).collect(),
        count_by_year: table.iter().map(|r| r.year_published).collect(),
        summary: Summary::from_table(table),
    }
}

/// One bar of the per-book age chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeBar {
    /// Bar label
    pub title: String,
    /// Bar length
    pub book_age: i64,
    /// Shown on hover in a chart, or as a column in text output
    pub year_published: i64,
}

/// Per-record age bars in table order.
pub fn age_series(table: &BookTable) -> Vec<AgeBar> {
    table
        .iter()
        .map(|r| AgeBar {
            title: r.title.clone(),
            book_age: r.book_age,
            year_published: r.year_published,
        })
        .collect()
}

/// Unique authors in order of first appearance.
pub fn distinct_authors(table: &BookTable) -> Vec<String> {
    let mut seen = HashSet::new();
    table
        .iter()
        .filter(|r| seen.insert(r.author.as_str()))
        .map(|r| r.author.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::age::derive_ages;
    use crate::data::record::{BookRecord, UNKNOWN_AUTHOR};

    fn sample_table() -> BookTable {
        derive_ages(
            &BookTable::from_records(vec![
                BookRecord::new("Dune", "Herbert", 1965),
                BookRecord::new("Emma", "Austen", 1815),
                BookRecord::new("Persuasion", "Austen", 1817),
                BookRecord::new("Dune Messiah", "Herbert", 1969),
                BookRecord::new("Frankenstein", "Shelley", 1818),
            ]),
            2025,
        )
    }

    #[test]
    fn test_counts_by_author_and_year() {
        let agg = aggregate(&sample_table());

        assert_eq!(agg.count_by_author.get(&"Austen".to_string()), 2);
        assert_eq!(agg.count_by_author.get(&"Herbert".to_string()), 2);
        assert_eq!(agg.count_by_author.get(&"Shelley".to_string()), 1);
        assert_eq!(agg.count_by_author.get(&"Tolkien".to_string()), 0);
        assert_eq!(agg.count_by_year.len(), 5);
        assert_eq!(agg.count_by_year.get(&1965), 1);
    }

    #[test]
    fn test_series_sum_equals_total_count() {
        let tables = [
            sample_table(),
            BookTable::new(),
            BookTable::from_records(vec![
                BookRecord::new("a", "x", 2000),
                BookRecord::new("a", "x", 2000),
            ]),
        ];
        for table in &tables {
            let agg = aggregate(table);
            assert_eq!(agg.count_by_author.total(), agg.summary.total_count);
            assert_eq!(agg.count_by_year.total(), agg.summary.total_count);
        }
    }

    #[test]
    fn test_summary_scalars() {
        let summary = aggregate(&sample_table()).summary;

        assert_eq!(summary.total_count, 5);
        assert_eq!(summary.min_year, Some(1815));
        assert_eq!(summary.max_year, Some(1969));
        // (60 + 210 + 208 + 56 + 207) / 5
        let mean = summary.mean_age.unwrap();
        assert!((mean - 148.2).abs() < 1e-9);
    }

    #[test]
    fn test_mean_age_is_not_rounded() {
        let table = derive_ages(
            &BookTable::from_records(vec![
                BookRecord::new("a", "x", 2024),
                BookRecord::new("b", "x", 2024),
                BookRecord::new("c", "x", 2025),
            ]),
            2025,
        );
        let mean = aggregate(&table).summary.mean_age.unwrap();
        assert!((mean - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_table_summary() {
        let agg = aggregate(&BookTable::new());

        assert_eq!(agg.summary.total_count, 0);
        assert!(agg.count_by_author.is_empty());
        assert!(agg.count_by_year.is_empty());
        assert_eq!(agg.summary.mean_age, None);
        assert_eq!(agg.summary.min_year, None);
        assert_eq!(agg.summary.max_year, None);
    }

    #[test]
    fn test_unknown_author_is_counted() {
        let table = BookTable::from_records(vec![
            BookRecord::new("Beowulf", UNKNOWN_AUTHOR, 1000),
            BookRecord::new("Dune", "Herbert", 1965),
        ]);
        let agg = aggregate(&table);
        assert_eq!(agg.count_by_author.get(&UNKNOWN_AUTHOR.to_string()), 1);
    }

    #[test]
    fn test_sorted_by_count_desc() {
        let series: AggregateSeries<String> = ["b", "a", "c", "a", "b", "b"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let sorted: Vec<(String, usize)> = series
            .sorted_by_count_desc()
            .into_iter()
            .map(|(k, v)| (k.clone(), v))
            .collect();

        assert_eq!(
            sorted,
            vec![
                ("b".to_string(), 3),
                ("a".to_string(), 2),
                ("c".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_age_series_in_table_order() {
        let bars = age_series(&sample_table());
        assert_eq!(bars.len(), 5);
        assert_eq!(bars[0].title, "Dune");
        assert_eq!(bars[0].book_age, 60);
        assert_eq!(bars[1].year_published, 1815);
    }

    #[test]
    fn test_distinct_authors_first_appearance() {
        assert_eq!(
            distinct_authors(&sample_table()),
            vec!["Herbert", "Austen", "Shelley"]
        );
        assert!(distinct_authors(&BookTable::new()).is_empty());
    }

    #[test]
    fn test_series_serializes_as_map() {
        let agg = aggregate(&sample_table());
        let json = serde_json::to_value(&agg).unwrap();
        assert_eq!(json["count_by_author"]["Austen"], 2);
        assert_eq!(json["count_by_year"]["1965"], 1);
        assert!(json["summary"]["mean_age"].is_number());

        let empty = serde_json::to_value(aggregate(&BookTable::new())).unwrap();
        assert!(empty["summary"]["mean_age"].is_null());
    }
}
