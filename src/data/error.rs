use std::path::PathBuf;

use thiserror::Error;

use super::model::NumericColumn;

/// Errors raised while turning a file into a [`DeliveryTable`](super::model::DeliveryTable).
///
/// All of these are fatal for a session: the dashboard reports them and
/// stops processing that source.
#[derive(Error, Debug)]
pub enum DataSourceError {
    #[error("data source not found: {0}")]
    NotFound(PathBuf),

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid JSON layout: {0}")]
    JsonLayout(String),

    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("row {row}, column {column}: cannot parse '{value}'")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },
}

/// Statistics were requested over a table with no rows.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("no data in column {column}")]
pub struct EmptyColumnError {
    pub column: NumericColumn,
}

/// A column name that is not part of the delivery schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown column: {0}")]
pub struct UnknownColumnError(pub String);
