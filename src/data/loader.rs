use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::DataSourceError;
use super::table::{Cell, RawTable};

/// Pandas' default NA tokens for text sources.
pub const DEFAULT_NULL_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub type Result<T> = std::result::Result<T, DataSourceError>;

// ---------------------------------------------------------------------------
// Load options
// ---------------------------------------------------------------------------

/// How text sources are read.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub delimiter: u8,
    /// Cell values treated as missing.
    pub null_values: HashSet<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            null_values: DEFAULT_NULL_VALUES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl LoadOptions {
    fn cell(&self, value: &str) -> Cell {
        if self.null_values.contains(value) {
            None
        } else {
            Some(value.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a raw table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` / no extension – delimited text with a header row
/// * `.tsv`     – tab-delimited text
/// * `.parquet` – Parquet file, one column per field
/// * `.json`    – `[{ "Area": "Urban", "Delivery_Time": 30, ... }, ...]`
pub fn load_file(path: &Path, options: &LoadOptions) -> Result<RawTable> {
    if !path.exists() {
        return Err(DataSourceError::NotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" | "txt" | "" => load_csv(path, options.delimiter, options)?,
        "tsv" => load_csv(path, b'\t', options)?,
        "parquet" | "pq" => load_parquet(path, options)?,
        "json" => load_json(path, options)?,
        other => return Err(DataSourceError::UnsupportedFormat(other.to_string())),
    };

    let (rows, cols) = table.shape();
    log::info!("Dataset loaded with shape: ({rows}, {cols})");
    log::info!("Columns: {:?}", table.columns);
    for info in table.info() {
        log::debug!("{info}");
    }
    if table.is_empty() {
        log::warn!("{} has a header but no data rows", path.display());
    }

    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Header row, then one record per line. A record whose field count differs
/// from the header is an error (the reader is not `flexible`).
fn load_csv(path: &Path, delimiter: u8, options: &LoadOptions) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .from_path(path)?;

    let columns: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(|v| options.cell(v)).collect());
    }

    Ok(RawTable::new(columns, rows))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (`df.to_json(orient='records')`).
///
/// Columns appear in order of first occurrence; a key absent from an
/// object, set to `null`, or a string equal to an NA token is a missing cell.
fn load_json(path: &Path, options: &LoadOptions) -> Result<RawTable> {
    let text = std::fs::read_to_string(path)?;
    let root: JsonValue = serde_json::from_str(&text)?;

    let records = root
        .as_array()
        .ok_or_else(|| DataSourceError::JsonLayout("expected top-level JSON array".into()))?;

    let mut columns: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| DataSourceError::JsonLayout(format!("row {i} is not a JSON object")))?;
        for key in obj.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(JsonValue::as_object)
        .map(|obj| {
            columns
                .iter()
                .map(|col| obj.get(col).and_then(|v| json_to_cell(v, options)))
                .collect()
        })
        .collect();

    Ok(RawTable::new(columns, rows))
}

fn json_to_cell(val: &JsonValue, options: &LoadOptions) -> Cell {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => options.cell(s),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file, one column per field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path, options: &LoadOptions) -> Result<RawTable> {
    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build()?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .map(|col| extract_cell(col, row, options))
                .collect::<Result<Vec<Cell>>>()?;
            rows.push(cells);
        }
    }

    Ok(RawTable::new(columns, rows))
}

/// Render a single Arrow value as text. Nulls, NaN and string NA tokens
/// become missing.
fn extract_cell(col: &Arc<dyn Array>, row: usize, options: &LoadOptions) -> Result<Cell> {
    if col.is_null(row) {
        return Ok(None);
    }
    let text = match col.data_type() {
        DataType::Utf8 => return Ok(options.cell(col.as_string::<i32>().value(row))),
        DataType::LargeUtf8 => return Ok(options.cell(col.as_string::<i64>().value(row))),
        DataType::Int32 => col.as_primitive::<Int32Type>().value(row).to_string(),
        DataType::Int64 => col.as_primitive::<Int64Type>().value(row).to_string(),
        DataType::Float32 => {
            let v = col.as_primitive::<Float32Type>().value(row);
            if v.is_nan() {
                return Ok(None);
            }
            v.to_string()
        }
        DataType::Float64 => {
            let v = col.as_primitive::<Float64Type>().value(row);
            if v.is_nan() {
                return Ok(None);
            }
            v.to_string()
        }
        _ => array_value_to_string(&**col, row)?,
    };
    Ok(Some(text))
}
