//! Domain models for demand estimation
//!
//! Plain-data types extracted from the Arrow input tables: exam-level
//! records, small-area population rows, and the per-area demand results
//! the pipeline produces.

pub mod age_band;

pub use age_band::{AgeBand, BAND_COUNT};

use serde::{Deserialize, Serialize};

/// One imaging exam performed nationally
///
/// Ephemeral input; only the patient's age and care-setting source are
/// relevant to rate derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamRecord {
    /// Patient age at exam, in whole years
    pub age: i64,
    /// Care setting the exam was requested from
    pub patient_source: String,
}

/// One small area with its population broken down by age band
///
/// Mirrors the wide LSOA age-segment table: one row per area, one
/// population figure per band, indexed by [`AgeBand::index`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmallAreaRecord {
    /// Unique area code, e.g. an LSOA 2021 code
    pub area_code: String,
    /// Population count per age band
    pub populations: [u64; BAND_COUNT],
}

/// Estimated demand for one small area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaDemand {
    /// Area code carried over from the input row
    pub area_code: String,
    /// Estimated exams per band
    pub by_band: [f64; BAND_COUNT],
    /// Sum of the per-band figures
    pub total: f64,
}
