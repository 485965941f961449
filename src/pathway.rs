//! Care pathway classification
//!
//! An exam record belongs to a pathway when its `patient_source` label is in
//! the pathway's configured source set. Unmatched labels are "other" and are
//! filtered out of aggregation; they are never an error.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Imaging modality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modality {
    /// Computed tomography
    Ct,
    /// Magnetic resonance imaging
    Mri,
}

impl Modality {
    /// Lowercase name used in output column prefixes
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ct => "ct",
            Self::Mri => "mri",
        }
    }
}

/// Care pathway an exam was requested through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pathway {
    /// Planned care: outpatient, GP direct access, day case
    Elective,
    /// Unplanned care: A&E attendance, inpatient admission
    Emergency,
}

impl Pathway {
    /// Lowercase name used in output column prefixes
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Elective => "elective",
            Self::Emergency => "emergency",
        }
    }
}

/// `patient_source` labels that make up the emergency pathway
pub const EMERGENCY_SOURCES: [&str; 2] = [
    "Accident and Emergency Department (this Health Care Provider)",
    "Admitted Patient Care - Inpatient (this Health Care Provider)",
];

/// `patient_source` labels that make up the elective pathway
pub const ELECTIVE_SOURCES: [&str; 3] = [
    "Outpatient (this Health Care Provider)",
    "GP Direct Access",
    "Admitted Patient Care - Day case (this Health Care Provider)",
];

/// Membership rule classifying exam records into a pathway
///
/// The source set is the only thing that varies between estimator
/// instances, so it is configuration data rather than code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathwayRule {
    sources: FxHashSet<String>,
}

impl PathwayRule {
    /// Build a rule from an arbitrary set of `patient_source` labels
    pub fn new<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sources: sources.into_iter().map(Into::into).collect(),
        }
    }

    /// The standard emergency-pathway rule
    #[must_use]
    pub fn emergency() -> Self {
        Self::new(EMERGENCY_SOURCES)
    }

    /// The standard elective-pathway rule
    #[must_use]
    pub fn elective() -> Self {
        Self::new(ELECTIVE_SOURCES)
    }

    /// The preset rule for a pathway
    #[must_use]
    pub fn for_pathway(pathway: Pathway) -> Self {
        match pathway {
            Pathway::Elective => Self::elective(),
            Pathway::Emergency => Self::emergency(),
        }
    }

    /// Whether a `patient_source` label belongs to this pathway
    #[must_use]
    pub fn classify(&self, patient_source: &str) -> bool {
        self.sources.contains(patient_source)
    }

    /// The configured source labels
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(String::as_str)
    }
}
