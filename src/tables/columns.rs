//! Utilities for extracting typed columns from record batches
//!
//! Extraction is tolerant of integer width: a column stored as Int32 or
//! UInt16 is cast to the expected type with arrow's cast kernel. A column
//! that is absent, or cannot be cast, is a fatal table-shape error.

use arrow::array::{Array, ArrayRef};
use arrow::compute::kernels::cast::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;

use crate::error::{DemandError, Result};

/// Whether the batch has a column with this name
#[must_use]
pub fn has_column(batch: &RecordBatch, name: &str) -> bool {
    batch.schema().index_of(name).is_ok()
}

/// Get a required column, casting it to the expected type if necessary
pub fn require_column(batch: &RecordBatch, name: &str, expected: &DataType) -> Result<ArrayRef> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| DemandError::MissingColumn {
            column: name.to_string(),
        })?;

    let column = batch.column(idx);
    let actual = column.data_type();
    if actual == expected {
        return Ok(column.clone());
    }

    // numeric width differences are adapted; anything else is a schema error
    if actual.is_numeric() && expected.is_numeric() {
        if let Ok(converted) = cast(column, expected) {
            return Ok(converted);
        }
    }

    Err(DemandError::ColumnType {
        column: name.to_string(),
        expected: expected.clone(),
        actual: actual.clone(),
    })
}

/// Downcast an array to its concrete type
///
/// Only fails on a logic error, since [`require_column`] already
/// normalized the data type.
pub fn downcast_column<'a, T: Array + 'static>(
    array: &'a ArrayRef,
    name: &str,
    expected: &DataType,
) -> Result<&'a T> {
    array
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| DemandError::ColumnType {
            column: name.to_string(),
            expected: expected.clone(),
            actual: array.data_type().clone(),
        })
}
