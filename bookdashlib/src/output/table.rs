//! Table-ready data structures for dashboard output.
//!
//! The data flow is:
//! 1. Raw Data (RawTable)
//! 2. QuerySet (normalized, filtered, sorted, aggregated)
//! 3. BookTableOutput (formatted strings for display)
//!
//! BookTableOutput only formats. Rounding of the mean age happens here and
//! nowhere else.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::query::options::FilterCriteria;
use crate::query::queryset::BookQuerySet;
use crate::stats::{AggregateSeries, Summary};

/// A single row in the table (data row or footer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    /// Row label (book title, author, year, "Total (N books)")
    pub label: String,
    /// Values for each remaining column, ready for display
    pub values: Vec<String>,
}

/// A headline metric shown above the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kpi {
    /// Metric name ("Total Books", "Average Book Age", "Years")
    pub name: String,
    /// Formatted value
    pub value: String,
}

/// Table-ready dashboard data.
///
/// Renderers iterate over headers/rows/footer and print - no computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookTableOutput {
    /// Optional title describing the active filters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Column headers: [label_header, value1, value2, ...]
    pub headers: Vec<String>,
    /// Data rows
    pub rows: Vec<TableRow>,
    /// Summary/footer row
    pub footer: TableRow,
    /// Headline metrics
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub kpis: Vec<Kpi>,
}

impl BookTableOutput {
    /// Format the filtered view of a query set.
    pub fn from_queryset(qs: &BookQuerySet) -> Self {
        let rows = qs
            .view
            .iter()
            .map(|r| TableRow {
                label: r.title.clone(),
                values: vec![
                    r.author.clone(),
                    r.year_published.to_string(),
                    r.book_age.to_string(),
                ],
            })
            .collect();

        BookTableOutput {
            title: describe_criteria(&qs.criteria),
            headers: vec![
                "Title".to_string(),
                "Author".to_string(),
                "Year".to_string(),
                "Age".to_string(),
            ],
            rows,
            footer: TableRow {
                label: footer_label(qs.view.len()),
                values: vec![String::new(), String::new(), String::new()],
            },
            kpis: summary_kpis(&qs.view_stats.summary),
        }
    }

    /// Format a grouped count series, largest groups first.
    pub fn from_series<K>(label_header: &str, series: &AggregateSeries<K>) -> Self
    where
        K: Ord + Display,
    {
        let rows = series
            .sorted_by_count_desc()
            .into_iter()
            .map(|(key, count)| TableRow {
                label: key.to_string(),
                values: vec![count.to_string()],
            })
            .collect();

        BookTableOutput {
            title: None,
            headers: vec![label_header.to_string(), "Books".to_string()],
            rows,
            footer: TableRow {
                label: footer_label(series.total()),
                values: vec![series.total().to_string()],
            },
            kpis: Vec::new(),
        }
    }

    /// Builder: set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Headline metrics for a summary.
pub fn summary_kpis(summary: &Summary) -> Vec<Kpi> {
    let year_span = match (summary.min_year, summary.max_year) {
        (Some(min), Some(max)) => format!("{}-{}", min, max),
        _ => "n/a".to_string(),
    };

    vec![
        Kpi {
            name: "Total Books".to_string(),
            value: summary.total_count.to_string(),
        },
        Kpi {
            name: "Average Book Age".to_string(),
            value: format_mean_age(summary.mean_age),
        },
        Kpi {
            name: "Years".to_string(),
            value: year_span,
        },
    ]
}

/// Mean age rounded to one decimal, or `n/a` when there is nothing to average.
pub fn format_mean_age(mean_age: Option<f64>) -> String {
    match mean_age {
        Some(mean) => format!("{:.1}", mean),
        None => "n/a".to_string(),
    }
}

fn footer_label(count: usize) -> String {
    if count == 1 {
        "Total (1 book)".to_string()
    } else {
        format!("Total ({} books)", count)
    }
}

fn describe_criteria(criteria: &FilterCriteria) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(author) = &criteria.author {
        parts.push(format!("Author: {}", author));
    }
    if let Some((min, max)) = criteria.year_range {
        parts.push(format!("Years: {}-{}", min, max));
    }
    if let Some(term) = &criteria.title_search {
        parts.push(format!("Search: \"{}\"", term));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" | "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::RawTable;
    use crate::query::options::DashboardOptions;
    use crate::stats::aggregate;

    fn sample_queryset(options: &DashboardOptions) -> BookQuerySet {
        let raw = RawTable::new(
            vec!["title".into(), "author".into(), "yearpublished".into()],
            vec![
                vec![Some("Dune".into()), Some("Herbert".into()), Some("1965".into())],
                vec![Some("Emma".into()), Some("Austen".into()), Some("1815".into())],
                vec![Some("Persuasion".into()), Some("Austen".into()), Some("1817".into())],
            ],
        );
        BookQuerySet::build(&raw, options).unwrap()
    }

    #[test]
    fn test_from_queryset_rows_and_footer() {
        let table = BookTableOutput::from_queryset(&sample_queryset(&DashboardOptions::new(2025)));

        assert_eq!(table.headers, vec!["Title", "Author", "Year", "Age"]);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0].label, "Dune");
        assert_eq!(table.rows[0].values, vec!["Herbert", "1965", "60"]);
        assert_eq!(table.footer.label, "Total (3 books)");
        assert_eq!(table.title, None);
    }

    #[test]
    fn test_from_queryset_kpis() {
        let table = BookTableOutput::from_queryset(&sample_queryset(&DashboardOptions::new(2025)));

        // (60 + 210 + 208) / 3 = 159.33...
        assert_eq!(table.kpis[0].value, "3");
        assert_eq!(table.kpis[1].name, "Average Book Age");
        assert_eq!(table.kpis[1].value, "159.3");
        assert_eq!(table.kpis[2].value, "1815-1965");
    }

    #[test]
    fn test_from_queryset_title_describes_filters() {
        let options = DashboardOptions::new(2025)
            .author("Austen")
            .year_range(1800, 1816)
            .search("em");
        let table = BookTableOutput::from_queryset(&sample_queryset(&options));

        assert_eq!(
            table.title.as_deref(),
            Some("Author: Austen | Years: 1800-1816 | Search: \"em\"")
        );
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.footer.label, "Total (1 book)");
    }

    #[test]
    fn test_empty_view_kpis() {
        let options = DashboardOptions::new(2025).author("Tolkien");
        let table = BookTableOutput::from_queryset(&sample_queryset(&options));

        assert!(table.rows.is_empty());
        assert_eq!(table.footer.label, "Total (0 books)");
        assert_eq!(table.kpis[0].value, "0");
        assert_eq!(table.kpis[1].value, "n/a");
        assert_eq!(table.kpis[2].value, "n/a");
    }

    #[test]
    fn test_from_series_orders_by_count() {
        let qs = sample_queryset(&DashboardOptions::new(2025));
        let agg = aggregate(&qs.table);
        let table = BookTableOutput::from_series("Author", &agg.count_by_author);

        assert_eq!(table.headers, vec!["Author", "Books"]);
        assert_eq!(table.rows[0].label, "Austen");
        assert_eq!(table.rows[0].values, vec!["2"]);
        assert_eq!(table.rows[1].label, "Herbert");
        assert_eq!(table.footer.values, vec!["3"]);
    }

    #[test]
    fn test_series_json_reads_back() {
        let qs = sample_queryset(&DashboardOptions::new(2025));
        let table = BookTableOutput::from_series("Year", &qs.full_stats.count_by_year)
            .with_title("Books per year");
        let json = serde_json::to_string(&table).unwrap();
        assert!(!json.contains("kpis"));

        let back: BookTableOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
        assert_eq!(back.title.as_deref(), Some("Books per year"));
    }

    #[test]
    fn test_format_mean_age() {
        assert_eq!(format_mean_age(Some(60.0)), "60.0");
        assert_eq!(format_mean_age(Some(148.26)), "148.3");
        assert_eq!(format_mean_age(None), "n/a");
    }

    #[test]
    fn test_json_shape() {
        let table = BookTableOutput::from_queryset(&sample_queryset(&DashboardOptions::new(2025)));
        let json = serde_json::to_value(&table).unwrap();

        assert!(json.get("headers").is_some());
        assert!(json.get("rows").is_some());
        assert!(json["footer"].get("label").is_some());
        // No filters, so no title key
        assert!(json.get("title").is_none());
    }
}
