//! Thin input loading wrappers
//!
//! The estimator itself never opens files; these helpers read parquet and
//! CSV sources into the record batches it consumes. Callers with their
//! own loading stack can skip this module entirely.

use std::fs::File;
use std::io::Seek;
use std::path::Path;
use std::sync::Arc;

use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::record_batch::RecordBatch;
use log::debug;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::error::Result;

/// Read a parquet file into record batches
pub fn read_parquet(path: &Path) -> Result<Vec<RecordBatch>> {
    debug!("reading parquet file {}", path.display());
    let file = File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut batches = Vec::new();
    for batch in reader {
        batches.push(batch?);
    }
    debug!("read {} batches from {}", batches.len(), path.display());
    Ok(batches)
}

/// Read a headered CSV file into record batches, inferring the schema
pub fn read_csv(path: &Path) -> Result<Vec<RecordBatch>> {
    debug!("reading csv file {}", path.display());
    let mut file = File::open(path)?;
    let format = Format::default().with_header(true);
    let (schema, _) = format.infer_schema(&mut file, None)?;
    file.rewind()?;

    let reader = ReaderBuilder::new(Arc::new(schema))
        .with_format(format)
        .build(file)?;

    let mut batches = Vec::new();
    for batch in reader {
        batches.push(batch?);
    }
    debug!("read {} batches from {}", batches.len(), path.display());
    Ok(batches)
}
