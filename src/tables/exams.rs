//! Exam table extraction
//!
//! Two input shapes are accepted: exam-level records with `age` and
//! `patient_source` columns, and pre-aggregated counts keyed by age-band
//! label. Records with null or negative ages are dropped with a warning,
//! matching the lenient handling of the source data.

use arrow::array::{Array, Int64Array, StringArray};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use log::{debug, warn};

use crate::error::Result;
use crate::models::{AgeBand, ExamRecord, BAND_COUNT};
use crate::tables::columns::{downcast_column, require_column};

/// Column holding the patient age at exam
pub const AGE_COLUMN: &str = "age";
/// Column holding the care-setting label
pub const PATIENT_SOURCE_COLUMN: &str = "patient_source";
/// Column holding the band label in pre-aggregated tables
pub const AGE_BAND_COLUMN: &str = "age_band";

/// Extract exam records from an exam-level batch
///
/// Requires `age` (integer) and `patient_source` (utf8) columns. Rows
/// with a null source, a null age, or an age below zero are skipped.
pub fn exam_records(batch: &RecordBatch) -> Result<Vec<ExamRecord>> {
    let age_col = require_column(batch, AGE_COLUMN, &DataType::Int64)?;
    let ages = downcast_column::<Int64Array>(&age_col, AGE_COLUMN, &DataType::Int64)?;
    let source_col = require_column(batch, PATIENT_SOURCE_COLUMN, &DataType::Utf8)?;
    let sources =
        downcast_column::<StringArray>(&source_col, PATIENT_SOURCE_COLUMN, &DataType::Utf8)?;

    let mut records = Vec::with_capacity(batch.num_rows());
    let mut dropped = 0usize;
    for row in 0..batch.num_rows() {
        if ages.is_null(row) || sources.is_null(row) {
            dropped += 1;
            continue;
        }
        let age = ages.value(row);
        if age < 0 {
            dropped += 1;
            continue;
        }
        records.push(ExamRecord {
            age,
            patient_source: sources.value(row).to_string(),
        });
    }

    if dropped > 0 {
        warn!("dropped {dropped} exam rows with null or negative age, or null source");
    }
    debug!("extracted {} exam records", records.len());
    Ok(records)
}

/// Extract per-band exam counts from a pre-aggregated batch
///
/// Requires an `age_band` label column and a caller-named count column.
/// Rows whose label is not one of the 18 canonical bands are skipped
/// with a warning; duplicate labels are summed.
pub fn band_count_table(batch: &RecordBatch, count_column: &str) -> Result<[u64; BAND_COUNT]> {
    let band_col = require_column(batch, AGE_BAND_COLUMN, &DataType::Utf8)?;
    let bands = downcast_column::<StringArray>(&band_col, AGE_BAND_COLUMN, &DataType::Utf8)?;
    let count_col = require_column(batch, count_column, &DataType::Int64)?;
    let counts = downcast_column::<Int64Array>(&count_col, count_column, &DataType::Int64)?;

    let mut table = [0u64; BAND_COUNT];
    for row in 0..batch.num_rows() {
        if bands.is_null(row) || counts.is_null(row) {
            continue;
        }
        let label = bands.value(row);
        let Some(band) = AgeBand::from_label(label) else {
            warn!("skipping count row with unrecognized age band '{label}'");
            continue;
        };
        let count = counts.value(row);
        if count < 0 {
            warn!("skipping negative exam count {count} for band {label}");
            continue;
        }
        table[band.index()] += count as u64;
    }
    Ok(table)
}
