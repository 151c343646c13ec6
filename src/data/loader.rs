use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{required_columns, CategoricalField, DatasetStore, NumericField, Record};
use crate::error::DataSourceError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a stroke dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the source column names (recommended)
/// * `.json`    – `[{ "gender": "Male", "age": 67.0, ... }, ...]`
/// * `.parquet` – one column per field
pub fn load_file(path: &Path) -> Result<DatasetStore, DataSourceError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DataSourceError::UnsupportedFormat(other.to_string())),
    };

    let store = DatasetStore::from_records(records);
    log::info!(
        "Loaded {} records from {} ({} null bmi)",
        store.len(),
        path.display(),
        store.numeric_domain(NumericField::Bmi).null_count
    );
    Ok(store)
}

// ---------------------------------------------------------------------------
// Cell – a single untyped value as read from a source
// ---------------------------------------------------------------------------

/// A dynamically-typed cell, converted into typed record fields by [`build_record`].
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

/// Tokens read as a missing value (the pandas defaults seen in practice).
const NULL_TOKENS: [&str; 7] = ["", "N/A", "NA", "NaN", "nan", "null", "NULL"];

fn guess_cell(s: &str) -> Cell {
    let s = s.trim();
    if NULL_TOKENS.contains(&s) {
        return Cell::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Cell::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return Cell::Float(f);
    }
    if s == "true" || s == "false" {
        return Cell::Bool(s == "true");
    }
    Cell::Text(s.to_string())
}

/// Categorical cells keep their source text verbatim; only null tokens are interpreted.
fn text_or_null(s: &str) -> Cell {
    if NULL_TOKENS.contains(&s.trim()) {
        Cell::Null
    } else {
        Cell::Text(s.to_string())
    }
}

/// Interpret a source string for `column`.
fn read_cell(column: &str, s: &str) -> Cell {
    if CategoricalField::ALL.iter().any(|f| f.column() == column) {
        text_or_null(s)
    } else {
        guess_cell(s)
    }
}

fn malformed(row: usize, column: &str, message: impl Into<String>) -> DataSourceError {
    DataSourceError::Malformed {
        row,
        column: column.to_string(),
        message: message.into(),
    }
}

fn text_cell(cell: Cell, row: usize, column: &str) -> Result<String, DataSourceError> {
    match cell {
        Cell::Text(s) => Ok(s),
        Cell::Integer(i) => Ok(i.to_string()),
        Cell::Float(f) => Ok(f.to_string()),
        Cell::Bool(b) => Ok(b.to_string()),
        Cell::Null => Err(malformed(row, column, "missing value")),
    }
}

fn optional_f64(cell: Cell, row: usize, column: &str) -> Result<Option<f64>, DataSourceError> {
    let value = match cell {
        Cell::Null => return Ok(None),
        Cell::Integer(i) => i as f64,
        Cell::Float(f) => f,
        Cell::Text(s) => return Err(malformed(row, column, format!("'{s}' is not a number"))),
        Cell::Bool(b) => return Err(malformed(row, column, format!("'{b}' is not a number"))),
    };
    if value.is_finite() {
        Ok(Some(value))
    } else {
        Err(malformed(row, column, format!("{value} is not finite")))
    }
}

fn required_f64(cell: Cell, row: usize, column: &str) -> Result<f64, DataSourceError> {
    optional_f64(cell, row, column)?.ok_or_else(|| malformed(row, column, "missing value"))
}

/// A 0/1 flag column.
fn optional_flag(cell: Cell, row: usize, column: &str) -> Result<Option<u8>, DataSourceError> {
    match cell {
        Cell::Null => Ok(None),
        Cell::Bool(b) => Ok(Some(u8::from(b))),
        Cell::Integer(i @ (0 | 1)) => Ok(Some(i as u8)),
        Cell::Float(f) if f == 0.0 || f == 1.0 => Ok(Some(f as u8)),
        Cell::Text(s) => Err(malformed(row, column, format!("expected 0 or 1, got '{s}'"))),
        other => Err(malformed(row, column, format!("expected 0 or 1, got {other:?}"))),
    }
}

fn optional_id(cell: Cell, row: usize, column: &str) -> Result<Option<i64>, DataSourceError> {
    match cell {
        Cell::Null => Ok(None),
        Cell::Integer(i) => Ok(Some(i)),
        Cell::Float(f) if f.fract() == 0.0 && f.is_finite() => Ok(Some(f as i64)),
        other => Err(malformed(row, column, format!("expected an integer id, got {other:?}"))),
    }
}

/// Assemble one typed [`Record`] from a cell lookup keyed by column name.
fn build_record(
    row: usize,
    mut cell: impl FnMut(&'static str) -> Cell,
) -> Result<Record, DataSourceError> {
    let mut category = |field: CategoricalField| {
        let column = field.column();
        text_cell(cell(column), row, column)
    };
    let gender = category(CategoricalField::Gender)?;
    let ever_married = category(CategoricalField::EverMarried)?;
    let work_type = category(CategoricalField::WorkType)?;
    let residence_type = category(CategoricalField::ResidenceType)?;
    let smoking_status = category(CategoricalField::SmokingStatus)?;

    let mut numeric = |field: NumericField| (field.column(), cell(field.column()));
    let (col, c) = numeric(NumericField::Id);
    let id = optional_id(c, row, col)?;
    let (col, c) = numeric(NumericField::Age);
    let age = required_f64(c, row, col)?;
    let (col, c) = numeric(NumericField::Hypertension);
    let hypertension = optional_flag(c, row, col)?;
    let (col, c) = numeric(NumericField::HeartDisease);
    let heart_disease = optional_flag(c, row, col)?;
    let (col, c) = numeric(NumericField::AvgGlucoseLevel);
    let avg_glucose_level = required_f64(c, row, col)?;
    let (col, c) = numeric(NumericField::Bmi);
    let bmi = optional_f64(c, row, col)?;
    let (col, c) = numeric(NumericField::Stroke);
    let stroke = optional_flag(c, row, col)?.ok_or_else(|| malformed(row, col, "missing value"))?;

    Ok(Record {
        id,
        gender,
        age,
        hypertension,
        heart_disease,
        ever_married,
        work_type,
        residence_type,
        avg_glucose_level,
        bmi,
        smoking_status,
        stroke,
    })
}

/// Fail with every required column absent from `present`.
fn check_columns<'a>(present: impl IntoIterator<Item = &'a str>) -> Result<(), DataSourceError> {
    let present: BTreeSet<&str> = present.into_iter().collect();
    let missing: Vec<String> = required_columns()
        .into_iter()
        .filter(|c| !present.contains(c))
        .map(str::to_string)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(DataSourceError::MissingColumns(missing))
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with the source column names, one record per row.
/// Extra columns are ignored.
fn load_csv(path: &Path) -> Result<Vec<Record>, DataSourceError> {
    let file = std::fs::File::open(path).map_err(|source| DataSourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_csv(file)
}

fn read_csv<R: std::io::Read>(input: R) -> Result<Vec<Record>, DataSourceError> {
    let mut reader = csv::Reader::from_reader(input);
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    check_columns(headers.iter().map(String::as_str))?;

    let positions: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.as_str(), i))
        .collect();

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let row = result?;
        let record = build_record(row_no, |col| {
            positions
                .get(col)
                .and_then(|&i| row.get(i))
                .map_or(Cell::Null, |s| read_cell(col, s))
        })?;
        records.push(record);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "id": 9046, "gender": "Male", "age": 67.0, "bmi": 36.6, "stroke": 1, ... },
///   ...
/// ]
/// ```
///
/// The first object fixes the column set; keys missing from later rows read as null.
fn load_json(path: &Path) -> Result<Vec<Record>, DataSourceError> {
    let text = std::fs::read_to_string(path).map_err(|source| DataSourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_json(&text)
}

fn read_json(text: &str) -> Result<Vec<Record>, DataSourceError> {
    let root: JsonValue = serde_json::from_str(text)?;
    let rows = root
        .as_array()
        .ok_or_else(|| DataSourceError::Layout("expected top-level JSON array".into()))?;

    match rows.first().and_then(JsonValue::as_object) {
        Some(first) => check_columns(first.keys().map(String::as_str))?,
        None if rows.is_empty() => check_columns(std::iter::empty())?,
        None => return Err(DataSourceError::Layout("row 0 is not a JSON object".into())),
    }

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let obj = row
                .as_object()
                .ok_or_else(|| DataSourceError::Layout(format!("row {i} is not a JSON object")))?;
            build_record(i, |col| obj.get(col).map_or(Cell::Null, |v| json_to_cell(col, v)))
        })
        .collect()
}

fn json_to_cell(column: &str, val: &JsonValue) -> Cell {
    match val {
        // pandas writes "N/A" strings through unchanged
        JsonValue::String(s) => read_cell(column, s),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Cell::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Cell::Float(f)
            } else {
                Cell::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => Cell::Bool(*b),
        JsonValue::Null => Cell::Null,
        other => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per field.
///
/// Strings may be Utf8 or LargeUtf8; numerics Int32/Int64/Float32/Float64 or
/// Boolean for the 0/1 flags. Works with files written by both **Pandas**
/// (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Vec<Record>, DataSourceError> {
    let file = std::fs::File::open(path).map_err(|source| DataSourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    check_columns(
        builder
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().as_str()),
    )?;
    let reader = builder.build()?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();

        // Resolve every known column once per batch and reject unreadable types up front.
        let mut columns: HashMap<&'static str, &Arc<dyn Array>> = HashMap::new();
        let known = CategoricalField::ALL
            .into_iter()
            .map(CategoricalField::column)
            .chain(NumericField::ALL.into_iter().map(NumericField::column));
        for name in known {
            if let Ok(idx) = schema.index_of(name) {
                let col = batch.column(idx);
                if !is_supported(col.data_type()) {
                    return Err(DataSourceError::UnsupportedColumnType {
                        column: name.to_string(),
                        data_type: format!("{:?}", col.data_type()),
                    });
                }
                columns.insert(name, col);
            }
        }

        let offset = records.len();
        for row in 0..batch.num_rows() {
            let record = build_record(offset + row, |col| {
                columns
                    .get(col)
                    .map_or(Cell::Null, |array| extract_cell(col, array, row))
            })?;
            records.push(record);
        }
    }

    Ok(records)
}

// -- Parquet / Arrow helpers --

fn is_supported(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Utf8
            | DataType::LargeUtf8
            | DataType::Int32
            | DataType::Int64
            | DataType::Float32
            | DataType::Float64
            | DataType::Boolean
            | DataType::Null
    )
}

/// Extract a single cell from the Arrow column `name` at a given row.
fn extract_cell(name: &str, col: &Arc<dyn Array>, row: usize) -> Cell {
    if col.is_null(row) {
        return Cell::Null;
    }
    match col.data_type() {
        DataType::Utf8 => read_cell(name, col.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => read_cell(name, col.as_string::<i64>().value(row)),
        DataType::Int32 => Cell::Integer(i64::from(col.as_primitive::<Int32Type>().value(row))),
        DataType::Int64 => Cell::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => Cell::Float(f64::from(col.as_primitive::<Float32Type>().value(row))),
        DataType::Float64 => Cell::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => Cell::Bool(col.as_boolean().value(row)),
        _ => Cell::Null,
    }
}
