//! Sheet acquisition: remote spreadsheet CSV exports and local CSV files.
//!
//! Both variants resolve to a [`RawTable`] of untyped string cells. Any
//! network, I/O, or CSV failure surfaces as a [`LoadError`]; a table is
//! either fully parsed or not available at all.

use std::{fs, path::PathBuf, time::Duration};

use log::debug;

use crate::error::LoadError;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Locator for one tabular export: a sheet/tab pair on a remote spreadsheet,
/// or a local CSV file for offline use and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSource {
    Remote { sheet_id: String, gid: String },
    File(PathBuf),
}

impl SheetSource {
    pub fn export_url(sheet_id: &str, gid: &str) -> String {
        format!("https://docs.google.com/spreadsheets/d/{sheet_id}/export?format=csv&gid={gid}")
    }

    /// Acquire and parse the export. Scoped acquire-and-release: the caller
    /// never observes a partially read table.
    pub fn fetch(&self, sheet: &'static str) -> Result<RawTable, LoadError> {
        let bytes = match self {
            SheetSource::Remote { sheet_id, gid } => {
                let url = Self::export_url(sheet_id, gid);
                debug!("Fetching {sheet} sheet from {url}");
                fetch_remote(&url, sheet)?
            }
            SheetSource::File(path) => {
                debug!("Reading {sheet} sheet from {path:?}");
                fs::read(path).map_err(|cause| LoadError::Read {
                    sheet,
                    path: path.clone(),
                    cause,
                })?
            }
        };
        RawTable::parse(&bytes, sheet)
    }
}

fn fetch_remote(url: &str, sheet: &'static str) -> Result<Vec<u8>, LoadError> {
    let wrap = |cause: reqwest::Error| LoadError::Fetch {
        sheet,
        url: url.to_string(),
        cause,
    };
    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(wrap)?;
    let response = client.get(url).send().and_then(|r| r.error_for_status());
    let bytes = response.map_err(wrap)?.bytes().map_err(wrap)?;
    Ok(bytes.to_vec())
}

/// An untyped table: header row plus string cells. Typing and defaulting
/// happen later in the normalizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Parse CSV bytes. Ragged rows are tolerated (spreadsheet exports drop
    /// trailing empty cells); `get` pads with the empty string.
    pub fn parse(bytes: &[u8], sheet: &'static str) -> Result<Self, LoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);
        let wrap = |cause: csv::Error| LoadError::Parse { sheet, cause };
        let headers = reader
            .headers()
            .map_err(wrap)?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(wrap)?;
            rows.push(record.iter().map(|f| f.to_string()).collect());
        }
        Ok(Self { headers, rows })
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell contents for a row and named column; empty string when the
    /// column is absent or the row is short.
    pub fn get<'a>(&'a self, row: &'a [String], name: &str) -> &'a str {
        self.column_index(name)
            .and_then(|idx| row.get(idx))
            .map(|s| s.as_str())
            .unwrap_or("")
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
