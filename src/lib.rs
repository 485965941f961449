//! Small-area diagnostic imaging demand estimation.
//!
//! Combines national exam records (stratified by patient age and care
//! pathway), a national population table, and small-area population
//! breakdowns into an estimated number of imaging studies per small area:
//! exams are classified into a pathway and binned into fixed 5-year age
//! bands, a national per-1,000-population rate is derived per band, and
//! that rate is broadcast across each area's population-by-band figures.
//!
//! All four estimator instances (CT emergency, MRI elective, MRI
//! emergency, MRI total) run the same pipeline; only the pathway source
//! set, count column, and output naming differ, and those live in
//! [`EstimatorConfig`].

pub mod error;
pub mod estimator;
pub mod loader;
pub mod models;
pub mod output;
pub mod pathway;
pub mod projection;
pub mod rates;
pub mod tables;

// Re-export the most common types for easier use
pub use error::{DemandError, Result};
pub use estimator::{DemandEstimator, EstimatorConfig};
pub use models::{AgeBand, AreaDemand, ExamRecord, SmallAreaRecord, BAND_COUNT};
pub use pathway::{Modality, Pathway, PathwayRule};
pub use rates::{BandRate, PopulationTable, RateTable};
pub use tables::SmallAreaSchema;

// Arrow types
pub use arrow::record_batch::RecordBatch;
