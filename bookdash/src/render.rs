//! Template contexts for CLI output rendered by outstanding

use bookdashlib::{BookTableOutput, Kpi, TableRow};
use console::Style;
use outstanding::Theme;
use serde::Serialize;

/// Include templates at compile time
pub const DASHBOARD_TEMPLATE: &str = include_str!("../templates/dashboard.jinja");
pub const AUTHORS_TEMPLATE: &str = include_str!("../templates/authors.jinja");

/// Longest label printed before truncation
const MAX_LABEL_WIDTH: usize = 48;

/// Row data for template rendering (pre-formatted)
#[derive(Debug, Serialize)]
struct TemplateRow {
    /// Pre-padded label (left-aligned, padded to the label column width)
    label: String,
    /// Pre-padded cells (numbers right-aligned, text left-aligned)
    cells: Vec<String>,
}

/// One table for the dashboard template
#[derive(Debug, Serialize)]
pub struct TableContext {
    /// Dimmed line above the header
    title: Option<String>,
    /// Header row
    header: TemplateRow,
    /// Separator line (dashes)
    separator: String,
    /// Data rows
    rows: Vec<TemplateRow>,
    /// Total row
    total: TemplateRow,
    /// Metrics printed under the table
    kpis: Vec<Kpi>,
}

/// A headed group of tables
#[derive(Debug, Serialize)]
pub struct SectionContext {
    /// Section heading
    heading: Option<String>,
    /// Metrics printed under the heading, before the tables
    kpis: Vec<Kpi>,
    /// Tables in display order
    tables: Vec<TableContext>,
}

impl SectionContext {
    /// Section with a heading and leading metrics.
    pub fn new(heading: impl Into<String>, kpis: Vec<Kpi>) -> Self {
        Self {
            heading: Some(heading.into()),
            kpis,
            tables: Vec::new(),
        }
    }

    /// Builder: append a table.
    pub fn table(mut self, table: &BookTableOutput) -> Self {
        self.tables.push(table_context(table));
        self
    }
}

/// Data context for the dashboard template
#[derive(Debug, Serialize)]
pub struct DashboardContext {
    sections: Vec<SectionContext>,
}

impl DashboardContext {
    /// A single untitled table, as printed by `show`.
    pub fn single(table: &BookTableOutput) -> Self {
        Self {
            sections: vec![SectionContext {
                heading: None,
                kpis: Vec::new(),
                tables: vec![table_context(table)],
            }],
        }
    }

    /// Several headed sections, as printed by `stats`.
    pub fn sections(sections: Vec<SectionContext>) -> Self {
        Self { sections }
    }
}

/// Data context for the authors template
#[derive(Debug, Serialize)]
pub struct AuthorsContext {
    /// Author names in first-appearance order
    pub authors: Vec<String>,
}

/// Create the theme with styles
pub fn create_theme() -> Theme {
    Theme::new()
        .add("category", Style::new().bold())
        .add("muted", Style::new().dim())
}

/// Truncate a label to fit within max_len, adding a ".." suffix if needed
fn truncate_label(label: &str, max_len: usize) -> String {
    if label.chars().count() > max_len {
        let kept: String = label.chars().take(max_len.saturating_sub(2)).collect();
        format!("{}..", kept)
    } else {
        label.to_string()
    }
}

/// Lay out a table: the label column left-aligned, numeric-looking values
/// right-aligned, every column padded to its widest cell.
fn table_context(table: &BookTableOutput) -> TableContext {
    let header = TableRow {
        label: table.headers.first().cloned().unwrap_or_default(),
        values: table.headers.iter().skip(1).cloned().collect(),
    };
    let truncated = |row: &TableRow| TableRow {
        label: truncate_label(&row.label, MAX_LABEL_WIDTH),
        values: row.values.clone(),
    };
    let rows: Vec<TableRow> = table.rows.iter().map(truncated).collect();
    let total = truncated(&table.footer);

    let columns = table.headers.len().max(1);
    let mut widths = vec![0usize; columns];
    for row in std::iter::once(&header).chain(&rows).chain(std::iter::once(&total)) {
        widths[0] = widths[0].max(row.label.chars().count());
        for (i, value) in row.values.iter().enumerate().take(columns - 1) {
            widths[i + 1] = widths[i + 1].max(value.chars().count());
        }
    }

    let to_template_row = |row: &TableRow| TemplateRow {
        label: pad(&row.label, widths[0], false),
        cells: widths
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, width)| {
                let value = row.values.get(i - 1).map(String::as_str).unwrap_or("");
                pad(value, *width, is_numeric(value))
            })
            .collect(),
    };

    TableContext {
        title: table.title.clone(),
        header: to_template_row(&header),
        separator: "-".repeat(widths.iter().sum::<usize>() + 2 * (columns - 1)),
        rows: rows.iter().map(to_template_row).collect(),
        total: to_template_row(&total),
        kpis: table.kpis.clone(),
    }
}

fn pad(value: &str, width: usize, right: bool) -> String {
    if right {
        format!("{:>width$}", value, width = width)
    } else {
        format!("{:<width$}", value, width = width)
    }
}

fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.parse::<f64>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use outstanding::{render_with_output, OutputMode};

    fn sample_table() -> BookTableOutput {
        BookTableOutput {
            title: None,
            headers: vec!["Author".to_string(), "Books".to_string()],
            rows: vec![
                TableRow {
                    label: "Austen".to_string(),
                    values: vec!["2".to_string()],
                },
                TableRow {
                    label: "Herbert".to_string(),
                    values: vec!["12".to_string()],
                },
            ],
            footer: TableRow {
                label: "Total (14 books)".to_string(),
                values: vec!["14".to_string()],
            },
            kpis: vec![],
        }
    }

    fn render_text(context: &DashboardContext) -> String {
        render_with_output(DASHBOARD_TEMPLATE, context, &create_theme(), OutputMode::Text)
            .unwrap()
    }

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("Dune", 10), "Dune");
        assert_eq!(truncate_label("The Left Hand of Darkness", 10), "The Left..");
        assert_eq!(truncate_label("Ærøskøbing Ålborg", 6), "Ærøs..");
    }

    #[test]
    fn test_table_context_pads_cells() {
        let context = table_context(&sample_table());

        assert_eq!(context.header.label, "Author          ");
        assert_eq!(context.rows[0].label, "Austen          ");
        assert_eq!(context.rows[0].cells, vec!["    2"]);
        assert_eq!(context.total.cells, vec!["   14"]);
        assert_eq!(context.separator.len(), 16 + 2 + 5);
    }

    #[test]
    fn test_table_context_truncates_long_titles() {
        let mut table = sample_table();
        table.rows[0].label = "x".repeat(80);
        let context = table_context(&table);

        assert_eq!(context.rows[0].label.chars().count(), MAX_LABEL_WIDTH);
        assert!(context.rows[0].label.ends_with(".."));
    }

    #[test]
    fn test_render_table_aligns_columns() {
        let out = render_text(&DashboardContext::single(&sample_table()));
        let lines: Vec<&str> = out.lines().collect();

        assert!(lines[0].starts_with("Author"));
        assert!(lines[0].ends_with("Books"));
        assert!(lines[1].chars().all(|c| c == '-'));
        assert_eq!(lines[2], "Austen                2");
        assert_eq!(lines[3], "Herbert              12");
        assert_eq!(lines[5], "Total (14 books)     14");
    }

    #[test]
    fn test_render_table_with_title_and_kpis() {
        let mut table = sample_table();
        table.title = Some("Author: Austen".to_string());
        table.kpis = vec![Kpi {
            name: "Total Books".to_string(),
            value: "2".to_string(),
        }];
        let out = render_text(&DashboardContext::single(&table));

        assert!(out.starts_with("Author: Austen\n"));
        assert!(out.trim_end().ends_with("Total Books: 2"));
    }

    #[test]
    fn test_render_sections() {
        let kpis = vec![Kpi {
            name: "Total Books".to_string(),
            value: "14".to_string(),
        }];
        let context = DashboardContext::sections(vec![
            SectionContext::new("All books", kpis.clone())
                .table(&sample_table())
                .table(&sample_table()),
            SectionContext::new("Filtered books", kpis),
        ]);
        let out = render_text(&context);

        assert!(out.starts_with("All books\nTotal Books: 14\n"));
        assert_eq!(out.matches("Total (14 books)").count(), 2);
        let all = out.find("All books").unwrap();
        let filtered = out.find("Filtered books").unwrap();
        assert!(all < filtered);
    }

    #[test]
    fn test_render_authors() {
        let context = AuthorsContext {
            authors: vec!["Frank Herbert".to_string(), "Jane Austen".to_string()],
        };
        let out =
            render_with_output(AUTHORS_TEMPLATE, &context, &create_theme(), OutputMode::Text)
                .unwrap();

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines, vec!["Frank Herbert", "Jane Austen"]);
    }
}
