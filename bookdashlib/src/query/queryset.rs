//! Query set: one render cycle of the dashboard.
//!
//! A QuerySet sits between the raw source table and the presentation layer.
//! The data pipeline is:
//! 1. Raw Data (RawTable from a source)
//! 2. BookTable (normalized, ages derived)
//! 3. QuerySet (filtered view, sorted, aggregated)
//! 4. BookTableOutput (formatted strings for display)
//!
//! The full table and the view are aggregated separately so the presentation
//! layer can show overall charts next to the filtered KPIs.

use serde::{Deserialize, Serialize};
use tracing::{debug, info_span};

use crate::data::age::derive_ages;
use crate::data::normalize::normalize;
use crate::data::record::{BookTable, RawTable};
use crate::stats::{age_series, aggregate, distinct_authors, AgeBar, Aggregates};
use crate::Result;

use super::filter::filter_books;
use super::options::{DashboardOptions, FilterCriteria, Ordering};
use super::sort::sort_books;

/// Everything the presentation layer needs for one render cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookQuerySet {
    /// Reference year ages were derived against
    pub reference_year: i64,
    /// Criteria after resolving defaults against the full table
    pub criteria: FilterCriteria,
    /// Ordering applied to the view
    pub ordering: Ordering,
    /// Normalized table with ages, in source order
    pub table: BookTable,
    /// Filtered and sorted view
    pub view: BookTable,
    /// Aggregates over the full table
    pub full_stats: Aggregates,
    /// Aggregates over the view
    pub view_stats: Aggregates,
    /// Per-book age bars for the view
    pub ages: Vec<AgeBar>,
    /// Author selector options, from the full table
    pub authors: Vec<String>,
}

impl BookQuerySet {
    /// Run the pipeline over a raw table.
    ///
    /// The sort field is validated before any work is done, so an invalid
    /// field aborts the cycle with `InvalidSortField` and no partial output.
    pub fn build(raw: &RawTable, options: &DashboardOptions) -> Result<Self> {
        let span = info_span!("render_cycle", reference_year = options.reference_year);
        let _enter = span.enter();

        let ordering = options.ordering()?;
        let table = derive_ages(&normalize(raw)?, options.reference_year);
        let criteria = options.criteria(&table);
        Ok(Self::from_table(
            table,
            criteria,
            ordering,
            options.reference_year,
        ))
    }

    /// Run the filter, sort and aggregate stages over an already derived table.
    pub fn from_table(
        table: BookTable,
        criteria: FilterCriteria,
        ordering: Ordering,
        reference_year: i64,
    ) -> Self {
        let view = sort_books(&filter_books(&table, &criteria), ordering);

        debug!(
            total = table.len(),
            shown = view.len(),
            sort = ordering.by.as_str(),
            "built query set"
        );

        BookQuerySet {
            reference_year,
            full_stats: aggregate(&table),
            view_stats: aggregate(&view),
            ages: age_series(&view),
            authors: distinct_authors(&table),
            criteria,
            ordering,
            table,
            view,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::{RawTable, UNKNOWN_AUTHOR};
    use crate::error::BookdashError;

    fn raw(rows: &[(&str, &str, &str)]) -> RawTable {
        RawTable::new(
            vec![
                "Title".to_string(),
                "Author".to_string(),
                "YearPublished".to_string(),
            ],
            rows.iter()
                .map(|(t, a, y)| {
                    [t, a, y]
                        .iter()
                        .map(|c| (!c.is_empty()).then(|| c.to_string()))
                        .collect()
                })
                .collect(),
        )
    }

    fn sample_raw() -> RawTable {
        raw(&[
            ("Dune", "Herbert", "1965"),
            ("Emma", "Austen", "1815"),
            ("Dune Messiah", "Herbert", "1969"),
            ("Beowulf", "", ""),
            ("Persuasion", "Austen", "1817"),
        ])
    }

    fn titles(table: &BookTable) -> Vec<&str> {
        table.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn test_default_options_show_everything_sorted_by_title() {
        let qs = BookQuerySet::build(&sample_raw(), &DashboardOptions::new(2025)).unwrap();

        assert_eq!(qs.table.len(), 5);
        assert_eq!(
            titles(&qs.view),
            vec!["Beowulf", "Dune", "Dune Messiah", "Emma", "Persuasion"]
        );
        assert!(qs.criteria.is_unfiltered());
        assert_eq!(qs.full_stats, qs.view_stats);
    }

    #[test]
    fn test_table_keeps_source_order() {
        let qs = BookQuerySet::build(&sample_raw(), &DashboardOptions::new(2025)).unwrap();
        assert_eq!(
            titles(&qs.table),
            vec!["Dune", "Emma", "Dune Messiah", "Beowulf", "Persuasion"]
        );
    }

    #[test]
    fn test_ages_derived_against_reference_year() {
        let qs = BookQuerySet::build(
            &raw(&[("Dune", "Herbert", "1965"), ("Emma", "Austen", "1815")]),
            &DashboardOptions::new(2025),
        )
        .unwrap();
        let ages: Vec<i64> = qs.table.iter().map(|r| r.book_age).collect();
        assert_eq!(ages, vec![60, 210]);
    }

    #[test]
    fn test_filtered_view_and_separate_aggregates() {
        let options = DashboardOptions::new(2025)
            .author("Herbert")
            .sort_by("year", false);
        let qs = BookQuerySet::build(&sample_raw(), &options).unwrap();

        assert_eq!(titles(&qs.view), vec!["Dune Messiah", "Dune"]);
        assert_eq!(qs.view_stats.summary.total_count, 2);
        assert_eq!(qs.full_stats.summary.total_count, 5);
        assert_eq!(qs.full_stats.count_by_author.get(&UNKNOWN_AUTHOR.to_string()), 1);
        assert_eq!(qs.ages.len(), 2);
        assert_eq!(qs.ages[0].title, "Dune Messiah");
        assert_eq!(qs.authors, vec!["Herbert", "Austen", UNKNOWN_AUTHOR]);
    }

    #[test]
    fn test_year_bound_defaults_to_table_range() {
        let options = DashboardOptions::new(2025).min_year(1900);
        let qs = BookQuerySet::build(&sample_raw(), &options).unwrap();

        // Table spans 0 (missing year) to 1969
        assert_eq!(qs.criteria.year_range, Some((1900, 1969)));
        assert_eq!(titles(&qs.view), vec!["Dune", "Dune Messiah"]);
    }

    #[test]
    fn test_inverted_range_gives_empty_view() {
        let options = DashboardOptions::new(2025).year_range(1970, 1800);
        let qs = BookQuerySet::build(&sample_raw(), &options).unwrap();

        assert!(qs.view.is_empty());
        assert_eq!(qs.view_stats.summary.mean_age, None);
        assert!(qs.ages.is_empty());
    }

    #[test]
    fn test_invalid_sort_field_aborts_cycle() {
        let options = DashboardOptions::new(2025).sort_by("isbn", true);
        assert!(matches!(
            BookQuerySet::build(&sample_raw(), &options),
            Err(BookdashError::InvalidSortField(_))
        ));
    }

    #[test]
    fn test_schema_mismatch_aborts_cycle() {
        let broken = RawTable::new(vec!["Title".to_string()], vec![]);
        assert!(matches!(
            BookQuerySet::build(&broken, &DashboardOptions::new(2025)),
            Err(BookdashError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_empty_source() {
        let qs = BookQuerySet::build(&raw(&[]), &DashboardOptions::new(2025)).unwrap();

        assert!(qs.table.is_empty());
        assert!(qs.view.is_empty());
        assert_eq!(qs.full_stats.summary.total_count, 0);
        assert!(qs.authors.is_empty());
    }

    #[test]
    fn test_raw_table_reusable_after_build() {
        let source = sample_raw();
        let before = source.clone();
        let _ = BookQuerySet::build(&source, &DashboardOptions::new(2025).search("dune")).unwrap();
        assert_eq!(source, before);
    }
}
