//! Small-area population table extraction
//!
//! The small-area source is wide: one row per area, one population column
//! per band. The band-to-column mapping is explicit configuration so a
//! mismatch between the fixed band scheme and the table schema fails
//! loudly instead of silently dropping a band.

use arrow::array::{Array, Int64Array, StringArray};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use log::{debug, warn};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{DemandError, Result};
use crate::models::{AgeBand, SmallAreaRecord, BAND_COUNT};
use crate::tables::columns::{downcast_column, require_column};

/// Default name of the area-code column (LSOA 2021 codes)
pub const DEFAULT_AREA_CODE_COLUMN: &str = "lsoa21cd";

/// Mapping from age band to wide population column name
///
/// Defaults to the canonical `age_0_4` .. `age_85_plus` naming; individual
/// bands can be remapped for tables with divergent schemas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmallAreaSchema {
    columns: FxHashMap<AgeBand, String>,
}

impl Default for SmallAreaSchema {
    fn default() -> Self {
        Self {
            columns: AgeBand::ALL
                .into_iter()
                .map(|band| (band, band.population_column().to_string()))
                .collect(),
        }
    }
}

impl SmallAreaSchema {
    /// Population column for a band
    ///
    /// A band with no mapping is a configuration mismatch and fails with
    /// [`DemandError::UnknownAgeBandColumn`].
    pub fn column(&self, band: AgeBand) -> Result<&str> {
        self.columns
            .get(&band)
            .map(String::as_str)
            .ok_or_else(|| DemandError::UnknownAgeBandColumn {
                band: band.label().to_string(),
            })
    }

    /// Remap one band to a different column name
    #[must_use]
    pub fn with_column(mut self, band: AgeBand, column: impl Into<String>) -> Self {
        self.columns.insert(band, column.into());
        self
    }

    /// Drop the mapping for a band (used in tests to simulate mismatch)
    #[must_use]
    pub fn without_band(mut self, band: AgeBand) -> Self {
        self.columns.remove(&band);
        self
    }
}

/// Extract small-area records from a wide population batch
///
/// Requires the area-code column and all 18 mapped band columns. Rows
/// with a null area code are skipped; null band populations count as
/// zero.
pub fn small_area_records(
    batch: &RecordBatch,
    area_code_column: &str,
    schema: &SmallAreaSchema,
) -> Result<Vec<SmallAreaRecord>> {
    let code_col = require_column(batch, area_code_column, &DataType::Utf8)?;
    let codes = downcast_column::<StringArray>(&code_col, area_code_column, &DataType::Utf8)?;

    let mut band_arrays = Vec::with_capacity(BAND_COUNT);
    for band in AgeBand::ALL {
        let name = schema.column(band)?;
        let column = require_column(batch, name, &DataType::Int64)?;
        band_arrays.push(column);
    }

    let mut records = Vec::with_capacity(batch.num_rows());
    for row in 0..batch.num_rows() {
        if codes.is_null(row) {
            warn!("skipping small-area row {row} with null area code");
            continue;
        }

        let mut populations = [0u64; BAND_COUNT];
        for band in AgeBand::ALL {
            let array = downcast_column::<Int64Array>(
                &band_arrays[band.index()],
                schema.column(band)?,
                &DataType::Int64,
            )?;
            if array.is_null(row) {
                continue;
            }
            let value = array.value(row);
            if value < 0 {
                warn!(
                    "treating negative population {value} as zero for area {} band {}",
                    codes.value(row),
                    band.label()
                );
                continue;
            }
            populations[band.index()] = value as u64;
        }

        records.push(SmallAreaRecord {
            area_code: codes.value(row).to_string(),
            populations,
        });
    }

    debug!("extracted {} small-area records", records.len());
    Ok(records)
}
