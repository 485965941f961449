//! Record batch extraction for the three input tables
//!
//! The estimator consumes Arrow record batches; these modules pull typed
//! domain models out of them. Table-shape problems (missing columns,
//! unmapped bands) abort the run; per-row data problems are logged and
//! skipped.

pub mod columns;
pub mod exams;
pub mod population;
pub mod small_area;

pub use exams::{band_count_table, exam_records};
pub use population::population_table;
pub use small_area::{small_area_records, SmallAreaSchema, DEFAULT_AREA_CODE_COLUMN};
