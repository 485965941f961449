//! Output table assembly
//!
//! Builds the result batch: one row per small area, the area code, the
//! total-demand column, then the 18 per-band demand columns. Column names
//! carry a modality/pathway prefix so results from different estimator
//! instances can sit side by side without collision.

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;

use crate::error::Result;
use crate::models::{AgeBand, AreaDemand};
use crate::tables::SmallAreaSchema;

/// Name of the total-demand column for a prefix
#[must_use]
pub fn total_column(prefix: &str) -> String {
    format!("{prefix}_total_demand")
}

/// Name of the per-band demand column for a prefix
pub fn band_column(prefix: &str, band: AgeBand, schema: &SmallAreaSchema) -> Result<String> {
    Ok(format!("{prefix}_{}", schema.column(band)?))
}

/// Assemble demand results into the output batch
pub fn demand_batch(
    demands: &[AreaDemand],
    prefix: &str,
    area_code_column: &str,
    schema: &SmallAreaSchema,
) -> Result<RecordBatch> {
    let mut fields = Vec::with_capacity(AgeBand::ALL.len() + 2);
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(AgeBand::ALL.len() + 2);

    fields.push(Field::new(area_code_column, DataType::Utf8, false));
    arrays.push(Arc::new(StringArray::from_iter_values(
        demands.iter().map(|d| d.area_code.as_str()),
    )));

    fields.push(Field::new(total_column(prefix), DataType::Float64, false));
    arrays.push(Arc::new(Float64Array::from_iter_values(
        demands.iter().map(|d| d.total),
    )));

    for band in AgeBand::ALL {
        fields.push(Field::new(
            band_column(prefix, band, schema)?,
            DataType::Float64,
            false,
        ));
        arrays.push(Arc::new(Float64Array::from_iter_values(
            demands.iter().map(|d| d.by_band[band.index()]),
        )));
    }

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
}
