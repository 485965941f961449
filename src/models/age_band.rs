//! The fixed 5-year age band scheme
//!
//! All four estimators share the same 18 contiguous bands: `[0,5)` through
//! `[80,85)` plus an open-ended `85+` band. Every non-negative age maps to
//! exactly one band.

use serde::{Deserialize, Serialize};

use crate::error::{DemandError, Result};

/// One of the 18 fixed 5-year age bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgeBand {
    /// Ages 0-4
    Age0To4,
    /// Ages 5-9
    Age5To9,
    /// Ages 10-14
    Age10To14,
    /// Ages 15-19
    Age15To19,
    /// Ages 20-24
    Age20To24,
    /// Ages 25-29
    Age25To29,
    /// Ages 30-34
    Age30To34,
    /// Ages 35-39
    Age35To39,
    /// Ages 40-44
    Age40To44,
    /// Ages 45-49
    Age45To49,
    /// Ages 50-54
    Age50To54,
    /// Ages 55-59
    Age55To59,
    /// Ages 60-64
    Age60To64,
    /// Ages 65-69
    Age65To69,
    /// Ages 70-74
    Age70To74,
    /// Ages 75-79
    Age75To79,
    /// Ages 80-84
    Age80To84,
    /// Ages 85 and over
    Age85Plus,
}

/// Number of bands in the scheme
pub const BAND_COUNT: usize = 18;

impl AgeBand {
    /// All bands in ascending age order
    pub const ALL: [Self; BAND_COUNT] = [
        Self::Age0To4,
        Self::Age5To9,
        Self::Age10To14,
        Self::Age15To19,
        Self::Age20To24,
        Self::Age25To29,
        Self::Age30To34,
        Self::Age35To39,
        Self::Age40To44,
        Self::Age45To49,
        Self::Age50To54,
        Self::Age55To59,
        Self::Age60To64,
        Self::Age65To69,
        Self::Age70To74,
        Self::Age75To79,
        Self::Age80To84,
        Self::Age85Plus,
    ];

    /// Map an integer age to its band
    ///
    /// Ages of 85 or more map to the open-ended top band. Negative ages are
    /// rejected with [`DemandError::InvalidAge`]; the batch extraction layer
    /// drops such records with a warning instead of failing the run.
    pub fn from_age(age: i64) -> Result<Self> {
        if age < 0 {
            return Err(DemandError::InvalidAge { age });
        }
        let idx = usize::try_from(age / 5).unwrap_or(BAND_COUNT - 1);
        Ok(Self::ALL[idx.min(BAND_COUNT - 1)])
    }

    /// Position of this band in [`AgeBand::ALL`]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Canonical label, e.g. `"0-4"` or `"85+"`
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Age0To4 => "0-4",
            Self::Age5To9 => "5-9",
            Self::Age10To14 => "10-14",
            Self::Age15To19 => "15-19",
            Self::Age20To24 => "20-24",
            Self::Age25To29 => "25-29",
            Self::Age30To34 => "30-34",
            Self::Age35To39 => "35-39",
            Self::Age40To44 => "40-44",
            Self::Age45To49 => "45-49",
            Self::Age50To54 => "50-54",
            Self::Age55To59 => "55-59",
            Self::Age60To64 => "60-64",
            Self::Age65To69 => "65-69",
            Self::Age70To74 => "70-74",
            Self::Age75To79 => "75-79",
            Self::Age80To84 => "80-84",
            Self::Age85Plus => "85+",
        }
    }

    /// Canonical wide-table population column for this band
    ///
    /// This is the column naming used by the LSOA age-segment master table
    /// (`age_0_4` through `age_85_plus`).
    #[must_use]
    pub const fn population_column(self) -> &'static str {
        match self {
            Self::Age0To4 => "age_0_4",
            Self::Age5To9 => "age_5_9",
            Self::Age10To14 => "age_10_14",
            Self::Age15To19 => "age_15_19",
            Self::Age20To24 => "age_20_24",
            Self::Age25To29 => "age_25_29",
            Self::Age30To34 => "age_30_34",
            Self::Age35To39 => "age_35_39",
            Self::Age40To44 => "age_40_44",
            Self::Age45To49 => "age_45_49",
            Self::Age50To54 => "age_50_54",
            Self::Age55To59 => "age_55_59",
            Self::Age60To64 => "age_60_64",
            Self::Age65To69 => "age_65_69",
            Self::Age70To74 => "age_70_74",
            Self::Age75To79 => "age_75_79",
            Self::Age80To84 => "age_80_84",
            Self::Age85Plus => "age_85_plus",
        }
    }

    /// Look up a band from its canonical label
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|band| band.label() == label.trim())
    }
}
