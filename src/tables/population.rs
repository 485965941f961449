//! National population table extraction
//!
//! The population source comes in two shapes: single-year-of-age rows
//! (`age` + `population`), which are binned into the 18 bands here, or
//! rows already keyed by band label (`age_band` + `population`).

use arrow::array::{Array, Int64Array, StringArray};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use log::warn;

use crate::error::Result;
use crate::models::AgeBand;
use crate::rates::PopulationTable;
use crate::tables::columns::{downcast_column, has_column, require_column};
use crate::tables::exams::{AGE_BAND_COLUMN, AGE_COLUMN};

/// Column holding the population count
pub const POPULATION_COLUMN: &str = "population";

/// Extract the national population table from a batch
///
/// Prefers an `age_band` label column when present, otherwise bins an
/// `age` column. Rows with negative ages, unknown labels, or null
/// populations are skipped with a warning.
pub fn population_table(batch: &RecordBatch) -> Result<PopulationTable> {
    let pop_col = require_column(batch, POPULATION_COLUMN, &DataType::Int64)?;
    let populations =
        downcast_column::<Int64Array>(&pop_col, POPULATION_COLUMN, &DataType::Int64)?;

    let mut table = PopulationTable::default();

    if has_column(batch, AGE_BAND_COLUMN) {
        let band_col = require_column(batch, AGE_BAND_COLUMN, &DataType::Utf8)?;
        let bands = downcast_column::<StringArray>(&band_col, AGE_BAND_COLUMN, &DataType::Utf8)?;
        for row in 0..batch.num_rows() {
            if bands.is_null(row) || populations.is_null(row) {
                continue;
            }
            let label = bands.value(row);
            let Some(band) = AgeBand::from_label(label) else {
                warn!("skipping population row with unrecognized age band '{label}'");
                continue;
            };
            add_population(&mut table, band, populations.value(row), label);
        }
    } else {
        let age_col = require_column(batch, AGE_COLUMN, &DataType::Int64)?;
        let ages = downcast_column::<Int64Array>(&age_col, AGE_COLUMN, &DataType::Int64)?;
        for row in 0..batch.num_rows() {
            if ages.is_null(row) || populations.is_null(row) {
                continue;
            }
            let age = ages.value(row);
            let Ok(band) = AgeBand::from_age(age) else {
                warn!("skipping population row with invalid age {age}");
                continue;
            };
            add_population(&mut table, band, populations.value(row), band.label());
        }
    }

    Ok(table)
}

fn add_population(table: &mut PopulationTable, band: AgeBand, population: i64, label: &str) {
    if population < 0 {
        warn!("skipping negative population {population} for band {label}");
        return;
    }
    table.add(band, population as u64);
}
