//! Arrow table codec for result files
//!
//! Raw and formatted tables live on disk as CSV and in memory as Arrow
//! `RecordBatch`es. This module owns both schemas and the conversions
//! between batches and [`TrialRecord`] / [`SummaryRecord`] rows.
//!
//! **Append-Only Write Pattern** for raw tables:
//! - The header is written once, when the file is created
//! - Later writes append rows and never rewrite the file
//! - Formatted tables are the exception: regenerated and overwritten in full

use crate::record::{SummaryRecord, TrialRecord};
use crate::{Error, Result};
use arrow::array::{Array, ArrayRef, Float64Array, RecordBatch, StringArray, UInt64Array};
use arrow::csv::{ReaderBuilder, WriterBuilder};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Arc;

/// Raw table column names, in file order.
pub const RAW_COLUMNS: [&str; 4] = ["method", "repeat", "metric", "value"];

/// Formatted table column names, in file order.
pub const FORMATTED_COLUMNS: [&str; 5] = ["method", "metric", "repeat_tol", "mean_val", "std_val"];

/// Schema of a per-dataset raw table.
#[must_use]
pub fn raw_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new(RAW_COLUMNS[0], DataType::Utf8, false),
        Field::new(RAW_COLUMNS[1], DataType::UInt64, false),
        Field::new(RAW_COLUMNS[2], DataType::Utf8, false),
        Field::new(RAW_COLUMNS[3], DataType::Float64, false),
    ]))
}

/// Schema of a per-dataset formatted table. `std_val` is nullable.
#[must_use]
pub fn formatted_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new(FORMATTED_COLUMNS[0], DataType::Utf8, false),
        Field::new(FORMATTED_COLUMNS[1], DataType::Utf8, false),
        Field::new(FORMATTED_COLUMNS[2], DataType::UInt64, false),
        Field::new(FORMATTED_COLUMNS[3], DataType::Float64, false),
        Field::new(FORMATTED_COLUMNS[4], DataType::Float64, true),
    ]))
}

/// Build a raw-table batch from trial records.
///
/// # Errors
/// Returns error if Arrow rejects the columns (should not happen for a
/// well-formed schema)
pub fn trials_to_batch(trials: &[TrialRecord]) -> Result<RecordBatch> {
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(trials.iter().map(TrialRecord::method))),
        Arc::new(UInt64Array::from_iter_values(trials.iter().map(TrialRecord::repeat))),
        Arc::new(StringArray::from_iter_values(trials.iter().map(TrialRecord::metric))),
        Arc::new(Float64Array::from_iter_values(trials.iter().map(TrialRecord::value))),
    ];
    Ok(RecordBatch::try_new(raw_schema(), columns)?)
}

/// Decode a raw-table batch into trial records.
///
/// # Errors
/// Returns error if a column is missing, has the wrong type, or holds nulls
pub fn batch_to_trials(batch: &RecordBatch) -> Result<Vec<TrialRecord>> {
    let methods = typed_column::<StringArray>(batch, RAW_COLUMNS[0])?;
    let repeats = typed_column::<UInt64Array>(batch, RAW_COLUMNS[1])?;
    let metrics = typed_column::<StringArray>(batch, RAW_COLUMNS[2])?;
    let values = typed_column::<Float64Array>(batch, RAW_COLUMNS[3])?;

    (0..batch.num_rows())
        .map(|i| {
            if methods.is_null(i) || repeats.is_null(i) || metrics.is_null(i) || values.is_null(i) {
                return Err(Error::StorageError(format!("Raw table row {i} has an empty field")));
            }
            Ok(TrialRecord::new(
                methods.value(i),
                repeats.value(i),
                metrics.value(i),
                values.value(i),
            ))
        })
        .collect()
}

/// Build a formatted-table batch from summary records.
///
/// # Errors
/// Returns error if Arrow rejects the columns
pub fn summaries_to_batch(summaries: &[SummaryRecord]) -> Result<RecordBatch> {
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(summaries.iter().map(SummaryRecord::method))),
        Arc::new(StringArray::from_iter_values(summaries.iter().map(SummaryRecord::metric))),
        Arc::new(UInt64Array::from_iter_values(
            summaries.iter().map(SummaryRecord::repeat_count),
        )),
        Arc::new(Float64Array::from_iter_values(summaries.iter().map(SummaryRecord::mean))),
        Arc::new(Float64Array::from(
            summaries.iter().map(SummaryRecord::std).collect::<Vec<_>>(),
        )),
    ];
    Ok(RecordBatch::try_new(formatted_schema(), columns)?)
}

/// Decode a formatted-table batch into summary records.
///
/// # Errors
/// Returns error if a column is missing or has the wrong type
pub fn batch_to_summaries(batch: &RecordBatch) -> Result<Vec<SummaryRecord>> {
    let methods = typed_column::<StringArray>(batch, FORMATTED_COLUMNS[0])?;
    let metrics = typed_column::<StringArray>(batch, FORMATTED_COLUMNS[1])?;
    let counts = typed_column::<UInt64Array>(batch, FORMATTED_COLUMNS[2])?;
    let means = typed_column::<Float64Array>(batch, FORMATTED_COLUMNS[3])?;
    let stds = typed_column::<Float64Array>(batch, FORMATTED_COLUMNS[4])?;

    (0..batch.num_rows())
        .map(|i| {
            if methods.is_null(i) || metrics.is_null(i) || means.is_null(i) {
                return Err(Error::StorageError(format!(
                    "Formatted table row {i} has no method, metric or mean"
                )));
            }
            let count = if counts.is_null(i) { 0 } else { counts.value(i) };
            let mean = means.value(i);
            let std = (!stds.is_null(i)).then(|| stds.value(i)).filter(|s| !s.is_nan());
            Ok(SummaryRecord::new(methods.value(i), metrics.value(i), count, mean, std))
        })
        .collect()
}

/// Read every batch of a CSV file with a header row.
///
/// # Errors
/// Returns `Error::Io` (kind `NotFound`) if the file does not exist, or an
/// Arrow error if a row does not match `schema`
pub fn read_csv(path: &Path, schema: SchemaRef) -> Result<Vec<RecordBatch>> {
    let file = File::open(path)?;
    let reader = ReaderBuilder::new(schema).with_header(true).build(file)?;

    let mut batches = Vec::new();
    for batch in reader {
        batches.push(batch?);
    }
    Ok(batches)
}

/// Append a batch to a CSV file, writing the header only if the file is new
/// or empty.
///
/// # Errors
/// Returns error if the file cannot be opened or written
pub fn append_csv(path: &Path, batch: &RecordBatch) -> Result<()> {
    let needs_header = std::fs::metadata(path).map_or(true, |m| m.len() == 0);
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let mut writer = WriterBuilder::new().with_header(needs_header).build(file);
    writer.write(batch)?;
    Ok(())
}

/// Write a batch to a CSV file, replacing any previous content.
///
/// # Errors
/// Returns error if the file cannot be created or written
pub fn write_csv(path: &Path, batch: &RecordBatch) -> Result<()> {
    let file = File::create(path)?;

    let mut writer = WriterBuilder::new().with_header(true).build(file);
    writer.write(batch)?;
    Ok(())
}

fn typed_column<'a, T: Array + 'static>(batch: &'a RecordBatch, name: &str) -> Result<&'a T> {
    batch
        .column_by_name(name)
        .ok_or_else(|| Error::StorageError(format!("Column not found: {name}")))?
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| Error::StorageError(format!("Column {name} has an unexpected type")))
}
