//! The parameterized demand estimation pipeline
//!
//! One pipeline serves all four estimator instances: the pathway source
//! set, the count column for pre-aggregated inputs, and the output column
//! prefix are configuration. The national population table is always an
//! injected input, never baked into an instance.

use arrow::record_batch::RecordBatch;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::output;
use crate::pathway::{Modality, Pathway, PathwayRule};
use crate::projection;
use crate::rates::{self, RateTable};
use crate::tables::{self, SmallAreaSchema, DEFAULT_AREA_CODE_COLUMN};

/// Count column used by the pre-aggregated MRI totals table
pub const MRI_TOTAL_COUNT_COLUMN: &str = "MRI_Total";

/// Configuration for one estimator instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Imaging modality being estimated
    pub modality: Modality,
    /// Target pathway, or `None` for a pathway-agnostic total
    pub pathway: Option<Pathway>,
    /// Source-set rule; `None` counts every record
    pub rule: Option<PathwayRule>,
    /// Prefix applied to every output column
    pub output_prefix: String,
    /// Name of the area-code column in the small-area table
    pub area_code_column: String,
    /// Count column name for pre-aggregated inputs
    pub count_column: String,
    /// Band-to-column mapping for the wide small-area table
    pub area_schema: SmallAreaSchema,
}

impl EstimatorConfig {
    fn new(modality: Modality, pathway: Option<Pathway>) -> Self {
        let output_prefix = match pathway {
            Some(p) => format!("{}_{}", modality.as_str(), p.as_str()),
            None => modality.as_str().to_string(),
        };
        Self {
            modality,
            pathway,
            rule: pathway.map(PathwayRule::for_pathway),
            output_prefix,
            area_code_column: DEFAULT_AREA_CODE_COLUMN.to_string(),
            count_column: "count".to_string(),
            area_schema: SmallAreaSchema::default(),
        }
    }

    /// Emergency CT demand
    #[must_use]
    pub fn ct_emergency() -> Self {
        Self::new(Modality::Ct, Some(Pathway::Emergency))
    }

    /// Elective MRI demand
    #[must_use]
    pub fn mri_elective() -> Self {
        Self::new(Modality::Mri, Some(Pathway::Elective))
    }

    /// Emergency MRI demand
    #[must_use]
    pub fn mri_emergency() -> Self {
        Self::new(Modality::Mri, Some(Pathway::Emergency))
    }

    /// Total MRI demand, pathway-agnostic, fed by pre-aggregated counts
    #[must_use]
    pub fn mri_total() -> Self {
        let mut config = Self::new(Modality::Mri, None);
        config.count_column = MRI_TOTAL_COUNT_COLUMN.to_string();
        config
    }

    /// Override the area-code column name
    #[must_use]
    pub fn with_area_code_column(mut self, column: impl Into<String>) -> Self {
        self.area_code_column = column.into();
        self
    }

    /// Override the output column prefix
    #[must_use]
    pub fn with_output_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.output_prefix = prefix.into();
        self
    }

    /// Override the count column for pre-aggregated inputs
    #[must_use]
    pub fn with_count_column(mut self, column: impl Into<String>) -> Self {
        self.count_column = column.into();
        self
    }

    /// Override the pathway source-set rule
    #[must_use]
    pub fn with_rule(mut self, rule: PathwayRule) -> Self {
        self.rule = Some(rule);
        self
    }

    /// Override the small-area band-to-column mapping
    #[must_use]
    pub fn with_area_schema(mut self, schema: SmallAreaSchema) -> Self {
        self.area_schema = schema;
        self
    }
}

/// Runs the rate-derivation and projection pipeline for one configuration
#[derive(Debug, Clone)]
pub struct DemandEstimator {
    config: EstimatorConfig,
}

impl DemandEstimator {
    /// Create an estimator from a configuration
    #[must_use]
    pub fn new(config: EstimatorConfig) -> Self {
        Self { config }
    }

    /// The configuration this estimator runs with
    #[must_use]
    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Estimate small-area demand from exam-level records
    ///
    /// `exams` needs `age` and `patient_source` columns; `population` is
    /// the national table the rates are computed against; `small_areas`
    /// is the wide population-by-band table. Returns one output row per
    /// small area.
    pub fn estimate(
        &self,
        exams: &RecordBatch,
        population: &RecordBatch,
        small_areas: &RecordBatch,
    ) -> Result<RecordBatch> {
        debug!("estimating {} demand from exam records", self.config.output_prefix);
        let records = tables::exam_records(exams)?;
        let counts = rates::band_counts(&records, self.config.rule.as_ref());
        let population = tables::population_table(population)?;
        let rate_table = rates::compute_rates(&counts, &population);
        self.project(&rate_table, small_areas)
    }

    /// Estimate small-area demand from pre-aggregated per-band counts
    ///
    /// Used by the pathway-agnostic total variant, where the exam data
    /// arrives already keyed by band label with a count column.
    pub fn estimate_from_band_counts(
        &self,
        counts: &RecordBatch,
        population: &RecordBatch,
        small_areas: &RecordBatch,
    ) -> Result<RecordBatch> {
        debug!(
            "estimating {} demand from pre-aggregated counts",
            self.config.output_prefix
        );
        let counts = tables::band_count_table(counts, &self.config.count_column)?;
        let population = tables::population_table(population)?;
        let rate_table = rates::compute_rates(&counts, &population);
        self.project(&rate_table, small_areas)
    }

    fn project(&self, rate_table: &RateTable, small_areas: &RecordBatch) -> Result<RecordBatch> {
        let areas = tables::small_area_records(
            small_areas,
            &self.config.area_code_column,
            &self.config.area_schema,
        )?;
        let demands = projection::project(rate_table, &areas);
        output::demand_batch(
            &demands,
            &self.config.output_prefix,
            &self.config.area_code_column,
            &self.config.area_schema,
        )
    }
}
