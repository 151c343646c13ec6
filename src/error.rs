//! Error types for loading data, validating filters and reading view options.

use std::path::PathBuf;

use thiserror::Error;

use crate::data::model::NumericField;

/// The data source could not be turned into a [`DatasetStore`](crate::data::model::DatasetStore).
#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// The source does not have the expected layout (e.g. JSON that is not an array of objects).
    #[error("unexpected layout: {0}")]
    Layout(String),

    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("row {row}, column '{column}': {message}")]
    Malformed {
        row: usize,
        column: String,
        message: String,
    },

    #[error("column '{column}' has unsupported type {data_type}")]
    UnsupportedColumnType { column: String, data_type: String },
}

/// A [`FilterSpec`](crate::data::filter::FilterSpec) that cannot be applied to a store.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidFilterSpecError {
    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("field '{field}' is not {expected}")]
    WrongKind {
        field: String,
        expected: &'static str,
    },

    #[error("range for '{field}' is inverted: {lo} > {hi}")]
    InvertedRange { field: NumericField, lo: f64, hi: f64 },

    #[error("range for '{field}' has a non-finite bound")]
    NonFiniteBound { field: NumericField },

    #[error("range [{lo}, {hi}] for '{field}' lies outside its domain {}", describe_domain(.domain))]
    OutOfDomain {
        field: NumericField,
        lo: f64,
        hi: f64,
        domain: Option<(f64, f64)>,
    },
}

fn describe_domain(domain: &Option<(f64, f64)>) -> String {
    match domain {
        Some((min, max)) => format!("[{min}, {max}]"),
        None => "(no values)".to_string(),
    }
}

/// View options could not be read.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid view options: {0}")]
    Json(#[from] serde_json::Error),
}
