//! # bookdash
//!
//! A command-line dashboard over a list of library books.
//!
//! ## Overview
//!
//! bookdash is built on top of bookdashlib. Each invocation is one render
//! cycle: the book file is loaded, normalized and aged, the filters and sort
//! from the command line are applied, and the result is printed.
//!
//! ## Usage
//!
//! ```bash
//! # Show every book, sorted by title
//! bookdash books.csv
//!
//! # Books by one author, published 1800-1900, newest first
//! bookdash books.csv --author "Jane Austen" --min-year 1800 --max-year 1900 --sort year --desc
//!
//! # Search titles (case-insensitive)
//! bookdash books.csv --search dune
//!
//! # Books per author and per year, for the full set and the filtered set
//! bookdash stats books.csv --author Herbert
//!
//! # Author selector options
//! bookdash authors books.csv
//!
//! # Machine-readable output
//! bookdash books.csv --output json
//! ```

mod logging;
mod render;

use std::process::ExitCode;

use anyhow::Context;
use bookdashlib::{
    current_year, load_table, output::summary_kpis, BookQuerySet, BookTableOutput, CsvSource,
    DashboardOptions,
};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use outstanding::cli::{App, CommandContext, HandlerResult, Output, RunResult};
use render::{
    create_theme, AuthorsContext, DashboardContext, SectionContext, AUTHORS_TEMPLATE,
    DASHBOARD_TEMPLATE,
};
use serde::Serialize;
use tracing::info;

/// Arguments naming the input file
fn source_args() -> Vec<Arg> {
    vec![
        Arg::new("file")
            .help("Book list (delimited text with Title, Author, YearPublished columns)")
            .required(true),
        Arg::new("delimiter")
            .short('d')
            .long("delimiter")
            .default_value(",")
            .value_parser(value_parser!(char))
            .help("Field delimiter"),
    ]
}

/// Arguments configuring the filter, sort and reference year
fn filter_args() -> Vec<Arg> {
    vec![
        Arg::new("author")
            .short('a')
            .long("author")
            .help("Show only books by this author (exact match)"),
        Arg::new("min-year")
            .long("min-year")
            .allow_negative_numbers(true)
            .value_parser(value_parser!(i64))
            .help("Earliest publication year (defaults to the oldest book)"),
        Arg::new("max-year")
            .long("max-year")
            .allow_negative_numbers(true)
            .value_parser(value_parser!(i64))
            .help("Latest publication year (defaults to the newest book)"),
        Arg::new("search")
            .short('s')
            .long("search")
            .help("Show only titles containing this text (case-insensitive)"),
        Arg::new("sort")
            .long("sort")
            .default_value("title")
            .help("Sort field: title, author, year, age"),
        Arg::new("desc")
            .long("desc")
            .action(ArgAction::SetTrue)
            .help("Sort descending"),
        Arg::new("reference-year")
            .long("reference-year")
            .value_parser(value_parser!(i64))
            .help("Year book ages are measured against (defaults to the current year)"),
    ]
}

/// Build the clap Command structure
///
/// The `--output` flag is added by outstanding.
fn build_command() -> Command {
    Command::new("bookdash")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Dashboard over a library book list: filter, sort, and summarize")
        .subcommand_negates_reqs(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("Increase log verbosity (repeatable)"),
        )
        .args(source_args())
        .args(filter_args())
        .subcommand(
            Command::new("show")
                .about("Show the filtered and sorted book table (default command)")
                .args(source_args())
                .args(filter_args()),
        )
        .subcommand(
            Command::new("stats")
                .about("Show summary statistics and books per author and per year")
                .args(source_args())
                .args(filter_args()),
        )
        .subcommand(
            Command::new("authors")
                .about("List distinct authors in order of first appearance")
                .args(source_args()),
        )
}

/// Build a CSV source from matches
fn build_source(matches: &ArgMatches) -> anyhow::Result<CsvSource> {
    let file = matches
        .get_one::<String>("file")
        .context("missing input file")?;
    let delimiter = matches.get_one::<char>("delimiter").copied().unwrap_or(',');
    Ok(CsvSource::new(file).delimiter(delimiter))
}

/// Build dashboard options from matches
fn build_options(matches: &ArgMatches) -> DashboardOptions {
    let reference_year = matches
        .get_one::<i64>("reference-year")
        .copied()
        .unwrap_or_else(current_year);

    let mut options = DashboardOptions::new(reference_year);
    if let Some(author) = matches.get_one::<String>("author") {
        options = options.author(author);
    }
    if let Some(min) = matches.get_one::<i64>("min-year") {
        options = options.min_year(*min);
    }
    if let Some(max) = matches.get_one::<i64>("max-year") {
        options = options.max_year(*max);
    }
    if let Some(term) = matches.get_one::<String>("search") {
        options = options.search(term);
    }
    let sort = matches
        .get_one::<String>("sort")
        .map(String::as_str)
        .unwrap_or("title");
    options.sort_by(sort, !matches.get_flag("desc"))
}

/// Install logging from the `-v` count
fn start_logging(matches: &ArgMatches) {
    let verbosity = matches
        .try_get_one::<u8>("verbose")
        .ok()
        .flatten()
        .copied()
        .unwrap_or(0);
    logging::init_logging(verbosity);
}

/// Run one render cycle from matches
fn run_cycle(matches: &ArgMatches) -> anyhow::Result<BookQuerySet> {
    start_logging(matches);
    let source = build_source(matches)?;
    let raw = load_table(&source)?;
    let options = build_options(matches);
    let qs = BookQuerySet::build(&raw, &options)?;
    info!(
        books = qs.table.len(),
        shown = qs.view.len(),
        "render cycle complete"
    );
    Ok(qs)
}

/// Handler for show command
fn show_handler(matches: &ArgMatches, ctx: &CommandContext) -> HandlerResult<serde_json::Value> {
    let qs = run_cycle(matches)?;
    let table = BookTableOutput::from_queryset(&qs);

    // For JSON mode, return raw data
    if ctx.output_mode.is_structured() {
        return Ok(Output::Render(serde_json::to_value(&table)?));
    }

    let context = DashboardContext::single(&table);
    Ok(Output::Render(serde_json::to_value(&context)?))
}

/// Both aggregate sets, for JSON output
#[derive(Debug, Serialize)]
struct StatsOutput<'a> {
    reference_year: i64,
    full: &'a bookdashlib::Aggregates,
    filtered: &'a bookdashlib::Aggregates,
}

/// Summary metrics plus both series for one aggregate set
fn stats_section(heading: &str, stats: &bookdashlib::Aggregates) -> SectionContext {
    SectionContext::new(heading, summary_kpis(&stats.summary))
        .table(
            &BookTableOutput::from_series("Author", &stats.count_by_author)
                .with_title("Books per author"),
        )
        .table(
            &BookTableOutput::from_series("Year", &stats.count_by_year)
                .with_title("Books per year"),
        )
}

/// Handler for stats command
fn stats_handler(matches: &ArgMatches, ctx: &CommandContext) -> HandlerResult<serde_json::Value> {
    let qs = run_cycle(matches)?;

    if ctx.output_mode.is_structured() {
        let stats = StatsOutput {
            reference_year: qs.reference_year,
            full: &qs.full_stats,
            filtered: &qs.view_stats,
        };
        return Ok(Output::Render(serde_json::to_value(&stats)?));
    }

    let mut sections = vec![stats_section("All books", &qs.full_stats)];
    if !qs.criteria.is_unfiltered() {
        sections.push(stats_section("Filtered books", &qs.view_stats));
    }
    let context = DashboardContext::sections(sections);
    Ok(Output::Render(serde_json::to_value(&context)?))
}

/// Handler for authors command
fn authors_handler(
    matches: &ArgMatches,
    ctx: &CommandContext,
) -> HandlerResult<serde_json::Value> {
    start_logging(matches);
    let source = build_source(matches)?;
    let raw = load_table(&source)?;
    let table = bookdashlib::normalize(&raw)?;
    let authors = bookdashlib::distinct_authors(&table);

    if ctx.output_mode.is_structured() {
        return Ok(Output::Render(serde_json::to_value(&authors)?));
    }
    Ok(Output::Render(serde_json::to_value(&AuthorsContext {
        authors,
    })?))
}

/// Output mode outstanding parsed into the root matches
fn root_output_mode(matches: &ArgMatches) -> outstanding::OutputMode {
    matches
        .try_get_one::<String>("_output_mode")
        .ok()
        .flatten()
        .map(|s| match s.as_str() {
            "json" => outstanding::OutputMode::Json,
            "text" => outstanding::OutputMode::Text,
            "term-debug" => outstanding::OutputMode::TermDebug,
            "term" => outstanding::OutputMode::Term,
            _ => outstanding::OutputMode::Auto,
        })
        .unwrap_or(outstanding::OutputMode::Auto)
}

/// Root command (no subcommand) - treat as show
fn run_root(matches: &ArgMatches) -> ExitCode {
    let output_mode = root_output_mode(matches);
    let ctx = CommandContext {
        output_mode,
        command_path: vec![],
    };

    match show_handler(matches, &ctx) {
        Ok(Output::Render(value)) => {
            if output_mode.is_structured() {
                match serde_json::to_string_pretty(&value) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error: {e}");
                        return ExitCode::FAILURE;
                    }
                }
            } else {
                let theme = create_theme();
                match outstanding::render(DASHBOARD_TEMPLATE, &value, &theme) {
                    Ok(output) => print!("{}", output),
                    Err(e) => {
                        eprintln!("Error: {e}");
                        return ExitCode::FAILURE;
                    }
                }
            }
            ExitCode::SUCCESS
        }
        Ok(Output::Silent) => ExitCode::SUCCESS,
        Ok(Output::Binary { .. }) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    let result = App::builder()
        .theme(create_theme())
        .command("show", show_handler, DASHBOARD_TEMPLATE)
        .command("stats", stats_handler, DASHBOARD_TEMPLATE)
        .command("authors", authors_handler, AUTHORS_TEMPLATE)
        .run_to_string(build_command(), std::env::args());

    match result {
        RunResult::Handled(output) => {
            // Handler errors come back rendered as "Error: ..."
            if output.starts_with("Error:") {
                eprintln!("{}", output.trim_end());
                return ExitCode::FAILURE;
            }
            print!("{}", output);
            ExitCode::SUCCESS
        }
        RunResult::Binary(_, _) => ExitCode::SUCCESS,
        RunResult::NoMatch(matches) => run_root(&matches),
    }
}
