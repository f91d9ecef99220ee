//! Input options for filtering and sorting.
//!
//! This module contains the configuration types a presentation layer hands
//! to the pipeline: which books to keep, how to order them, and which year
//! to measure ages against.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::data::record::BookTable;
use crate::error::BookdashError;

/// Predicates applied by the filter engine. Every `None` matches all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Exact author name
    pub author: Option<String>,
    /// Inclusive `(min, max)` publication years
    pub year_range: Option<(i64, i64)>,
    /// Case-insensitive title substring
    pub title_search: Option<String>,
}

impl FilterCriteria {
    /// Criteria that match every record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: keep only books by this author.
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Builder: keep only books published in `min..=max`.
    pub fn year_range(mut self, min: i64, max: i64) -> Self {
        self.year_range = Some((min, max));
        self
    }

    /// Builder: keep only titles containing `term`, ignoring case.
    pub fn title_search(mut self, term: impl Into<String>) -> Self {
        self.title_search = Some(term.into());
        self
    }

    /// The range an unset year filter stands for: the table's min and max
    /// publication years. `None` for an empty table.
    pub fn default_year_range(table: &BookTable) -> Option<(i64, i64)> {
        Some((table.min_year()?, table.max_year()?))
    }

    /// True if no predicate is set.
    pub fn is_unfiltered(&self) -> bool {
        self.author.is_none() && self.year_range.is_none() && self.title_search.is_none()
    }
}

/// Field to sort the table view by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// Lexicographic by title
    #[default]
    Title,
    /// Lexicographic by author
    Author,
    /// Numeric by publication year
    YearPublished,
    /// Numeric by derived age
    BookAge,
}

impl SortField {
    /// Canonical field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Title => "title",
            SortField::Author => "author",
            SortField::YearPublished => "year_published",
            SortField::BookAge => "book_age",
        }
    }
}

impl FromStr for SortField {
    type Err = BookdashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "title" => Ok(SortField::Title),
            "author" => Ok(SortField::Author),
            "year_published" | "yearpublished" | "year" => Ok(SortField::YearPublished),
            "book_age" | "bookage" | "age" => Ok(SortField::BookAge),
            _ => Err(BookdashError::InvalidSortField(s.to_string())),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    /// Ascending (A-Z, oldest year first)
    #[default]
    Ascending,
    /// Descending (Z-A, newest year first)
    Descending,
}

/// Ordering configuration for the table view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ordering {
    /// Field to order by
    pub by: SortField,
    /// Sort direction
    pub direction: SortDirection,
}

impl Ordering {
    /// Order by `by`, ascending.
    pub fn new(by: SortField) -> Self {
        Self {
            by,
            direction: SortDirection::Ascending,
        }
    }

    /// Order by title ascending (default)
    pub fn by_title() -> Self {
        Self::default()
    }

    /// Order by age, oldest book first
    pub fn by_age() -> Self {
        Self {
            by: SortField::BookAge,
            direction: SortDirection::Descending,
        }
    }

    /// Set sort direction to ascending
    pub fn ascending(mut self) -> Self {
        self.direction = SortDirection::Ascending;
        self
    }

    /// Set sort direction to descending
    pub fn descending(mut self) -> Self {
        self.direction = SortDirection::Descending;
        self
    }
}

/// Configuration inputs for one render cycle.
///
/// Values arrive unvalidated from the presentation layer; `sort_field` is
/// checked when the cycle runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardOptions {
    /// Exact author to keep
    pub selected_author: Option<String>,
    /// Lower year bound (defaults to the table's minimum)
    pub year_range_min: Option<i64>,
    /// Upper year bound (defaults to the table's maximum)
    pub year_range_max: Option<i64>,
    /// Case-insensitive title substring
    pub title_search_term: Option<String>,
    /// Field name to sort by
    pub sort_field: String,
    /// Sort ascending when true
    pub sort_ascending: bool,
    /// Year ages are measured against
    pub reference_year: i64,
}

impl DashboardOptions {
    /// Default options measured against `reference_year`.
    pub fn new(reference_year: i64) -> Self {
        Self {
            selected_author: None,
            year_range_min: None,
            year_range_max: None,
            title_search_term: None,
            sort_field: SortField::default().as_str().to_string(),
            sort_ascending: true,
            reference_year,
        }
    }

    /// Keep only books by this author.
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.selected_author = Some(author.into());
        self
    }

    /// Set both year bounds.
    pub fn year_range(mut self, min: i64, max: i64) -> Self {
        self.year_range_min = Some(min);
        self.year_range_max = Some(max);
        self
    }

    /// Set the lower year bound.
    pub fn min_year(mut self, min: i64) -> Self {
        self.year_range_min = Some(min);
        self
    }

    /// Set the upper year bound.
    pub fn max_year(mut self, max: i64) -> Self {
        self.year_range_max = Some(max);
        self
    }

    /// Search titles for `term`.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.title_search_term = Some(term.into());
        self
    }

    /// Sort by the named field.
    pub fn sort_by(mut self, field: impl Into<String>, ascending: bool) -> Self {
        self.sort_field = field.into();
        self.sort_ascending = ascending;
        self
    }

    /// Validate the sort inputs.
    pub fn ordering(&self) -> Result<Ordering, BookdashError> {
        let by = self.sort_field.parse::<SortField>()?;
        let ordering = Ordering::new(by);
        Ok(if self.sort_ascending {
            ordering
        } else {
            ordering.descending()
        })
    }

    /// Resolve the filter inputs against the table they will be applied to.
    ///
    /// A missing bound falls back to the table's own min or max year. An
    /// empty search term means no search.
    pub fn criteria(&self, table: &BookTable) -> FilterCriteria {
        let year_range = match (self.year_range_min, self.year_range_max) {
            (None, None) => None,
            (min, max) => {
                let (table_min, table_max) =
                    FilterCriteria::default_year_range(table).unwrap_or((i64::MIN, i64::MAX));
                Some((min.unwrap_or(table_min), max.unwrap_or(table_max)))
            }
        };

        FilterCriteria {
            author: self.selected_author.clone(),
            year_range,
            title_search: self
                .title_search_term
                .clone()
                .filter(|term| !term.trim().is_empty()),
        }
    }
}
