use std::path::PathBuf;

use thiserror::Error;

/// Structural problems in a fetched sheet. Always fatal: the load aborts and
/// nothing is rendered rather than reporting against a partial dataset.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("{sheet} sheet is missing required column '{column}'")]
    MissingColumn { sheet: &'static str, column: String },
    #[error("{sheet} sheet contains duplicate identifier '{identifier}'")]
    DuplicateIdentifier {
        sheet: &'static str,
        identifier: String,
    },
}

/// Failures acquiring or parsing a sheet export. Fatal for the same reason
/// as [`SchemaError`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Fetching {sheet} export from {url}")]
    Fetch {
        sheet: &'static str,
        url: String,
        #[source]
        cause: reqwest::Error,
    },
    #[error("Reading {sheet} file {path:?}")]
    Read {
        sheet: &'static str,
        path: PathBuf,
        #[source]
        cause: std::io::Error,
    },
    #[error("Parsing {sheet} CSV export")]
    Parse {
        sheet: &'static str,
        #[source]
        cause: csv::Error,
    },
}
