//! Record loaders for delimited files and in-memory result sets.

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use tracing::{debug, warn};

use crate::data::normalize::{check_schema, normalize_headers};
use crate::data::record::RawTable;
use crate::error::BookdashError;
use crate::Result;

/// A tabular source of raw book rows.
///
/// Implementations load once per call and hold no connection or file handle
/// afterwards.
pub trait TableSource {
    /// Human-readable name used in errors and logs.
    fn name(&self) -> String;

    /// Load every row with headers as the source names them.
    fn load(&self) -> Result<RawTable>;
}

/// Load a source and canonicalize its headers.
///
/// Fails with `SchemaMismatch` when `title`, `author` or `yearpublished` is
/// missing.
pub fn load_table(source: &dyn TableSource) -> Result<RawTable> {
    let raw = normalize_headers(&source.load()?);
    check_schema(&raw)?;
    debug!(
        source = %source.name(),
        rows = raw.len(),
        columns = raw.headers.len(),
        "loaded raw table"
    );
    Ok(raw)
}

/// A delimited text file with a header row.
#[derive(Debug, Clone)]
pub struct CsvSource {
    /// Path to the file
    pub path: PathBuf,
    /// Field delimiter (ASCII)
    pub delimiter: char,
}

impl CsvSource {
    /// Comma-delimited file at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            delimiter: ',',
        }
    }

    /// Builder: set the field delimiter.
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    fn delimiter_byte(&self) -> Result<u8> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(BookdashError::InvalidDelimiter(self.delimiter))
        }
    }

    /// I/O failures mid-read mean the source itself is unreadable, not malformed.
    fn read_error(&self, err: csv::Error) -> BookdashError {
        if matches!(err.kind(), csv::ErrorKind::Io(_)) {
            BookdashError::SourceUnavailable {
                source_name: self.name(),
                reason: err.to_string(),
            }
        } else {
            BookdashError::Csv(err)
        }
    }
}

/// Decode a cell as UTF-8, replacing invalid bytes.
fn decode_cell(cell: &[u8], row: usize) -> String {
    match std::str::from_utf8(cell) {
        Ok(text) => text.to_string(),
        Err(_) => {
            warn!(row, "cell is not valid UTF-8; invalid bytes replaced");
            String::from_utf8_lossy(cell).into_owned()
        }
    }
}

impl TableSource for CsvSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<RawTable> {
        let delimiter = self.delimiter_byte()?;
        let file = File::open(&self.path).map_err(|e| BookdashError::SourceUnavailable {
            source_name: self.name(),
            reason: e.to_string(),
        })?;

        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let headers: Vec<String> = reader
            .byte_headers()
            .map_err(|e| self.read_error(e))?
            .iter()
            .map(|cell| String::from_utf8_lossy(cell).into_owned())
            .collect();

        let mut rows = Vec::new();
        for record in reader.byte_records() {
            let record = record.map_err(|e| self.read_error(e))?;
            let row = rows.len();
            rows.push(
                record
                    .iter()
                    .map(|cell| Some(decode_cell(cell, row)))
                    .collect::<Vec<_>>(),
            );
        }

        Ok(RawTable::new(headers, rows))
    }
}

/// Rows supplied by an external collaborator.
///
/// This is the hand-over shape for a database query result: column names as
/// the query returned them, and `None` for `NULL` cells.
#[derive(Debug, Clone, Default)]
pub struct RowSource {
    /// Label used in errors and logs
    pub label: String,
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
    unavailable: Option<String>,
}

impl RowSource {
    /// Wrap headers and rows.
    pub fn new<H, V>(headers: Vec<H>, rows: Vec<Vec<Option<V>>>) -> Self
    where
        H: Into<String>,
        V: Into<String>,
    {
        Self {
            label: "rows".to_string(),
            headers: headers.into_iter().map(Into::into).collect(),
            rows: rows
                .into_iter()
                .map(|r| r.into_iter().map(|c| c.map(Into::into)).collect())
                .collect(),
            unavailable: None,
        }
    }

    /// A source whose collaborator could not supply rows (for example, the
    /// connection was refused). Loading it fails with `SourceUnavailable`.
    pub fn unavailable(label: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            unavailable: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Builder: set the label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

impl TableSource for RowSource {
    fn name(&self) -> String {
        self.label.clone()
    }

    fn load(&self) -> Result<RawTable> {
        if let Some(reason) = &self.unavailable {
            return Err(BookdashError::SourceUnavailable {
                source_name: self.name(),
                reason: reason.clone(),
            });
        }
        Ok(RawTable::new(self.headers.clone(), self.rows.clone()))
    }
}
