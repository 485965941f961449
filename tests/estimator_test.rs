//! End-to-end tests for the demand estimation pipeline.

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;

use imaging_demand::pathway::{ELECTIVE_SOURCES, EMERGENCY_SOURCES};
use imaging_demand::{AgeBand, DemandError, DemandEstimator, EstimatorConfig, BAND_COUNT};

/// The 2024 population projection used by the original MRI totals run.
const POPULATION_2024: [u64; BAND_COUNT] = [
    283_792, 322_018, 331_416, 324_765, 342_425, 342_688, 367_510, 355_513, 341_210, 362_553,
    413_048, 423_510, 376_552, 337_298, 357_074, 266_939, 181_501, 183_436,
];

fn exam_batch(rows: &[(i64, &str)]) -> RecordBatch {
    let schema = Schema::new(vec![
        Field::new("age", DataType::Int64, false),
        Field::new("patient_source", DataType::Utf8, false),
    ]);
    let ages: Int64Array = rows.iter().map(|(age, _)| Some(*age)).collect();
    let sources: StringArray = rows.iter().map(|(_, s)| Some(*s)).collect();
    RecordBatch::try_new(Arc::new(schema), vec![Arc::new(ages), Arc::new(sources)]).unwrap()
}

fn population_batch_by_band(rows: &[(&str, i64)]) -> RecordBatch {
    let schema = Schema::new(vec![
        Field::new("age_band", DataType::Utf8, false),
        Field::new("population", DataType::Int64, false),
    ]);
    let bands: StringArray = rows.iter().map(|(b, _)| Some(*b)).collect();
    let populations: Int64Array = rows.iter().map(|(_, p)| Some(*p)).collect();
    RecordBatch::try_new(Arc::new(schema), vec![Arc::new(bands), Arc::new(populations)]).unwrap()
}

fn population_batch_by_age(rows: &[(i64, i64)]) -> RecordBatch {
    let schema = Schema::new(vec![
        Field::new("age", DataType::Int64, false),
        Field::new("population", DataType::Int64, false),
    ]);
    let ages: Int64Array = rows.iter().map(|(a, _)| Some(*a)).collect();
    let populations: Int64Array = rows.iter().map(|(_, p)| Some(*p)).collect();
    RecordBatch::try_new(Arc::new(schema), vec![Arc::new(ages), Arc::new(populations)]).unwrap()
}

fn band_counts_batch(count_column: &str, rows: &[(&str, i64)]) -> RecordBatch {
    let schema = Schema::new(vec![
        Field::new("age_band", DataType::Utf8, false),
        Field::new(count_column, DataType::Int64, false),
    ]);
    let bands: StringArray = rows.iter().map(|(b, _)| Some(*b)).collect();
    let counts: Int64Array = rows.iter().map(|(_, c)| Some(*c)).collect();
    RecordBatch::try_new(Arc::new(schema), vec![Arc::new(bands), Arc::new(counts)]).unwrap()
}

fn small_area_batch(rows: &[(&str, [i64; BAND_COUNT])]) -> RecordBatch {
    let mut fields = vec![Field::new("lsoa21cd", DataType::Utf8, false)];
    let mut arrays: Vec<ArrayRef> = vec![Arc::new(
        rows.iter().map(|(code, _)| Some(*code)).collect::<StringArray>(),
    )];
    for band in AgeBand::ALL {
        fields.push(Field::new(band.population_column(), DataType::Int64, false));
        let values: Int64Array = rows
            .iter()
            .map(|(_, populations)| Some(populations[band.index()]))
            .collect();
        arrays.push(Arc::new(values));
    }
    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).unwrap()
}

fn one_band_area(code: &str, band: AgeBand, population: i64) -> (&str, [i64; BAND_COUNT]) {
    let mut populations = [0i64; BAND_COUNT];
    populations[band.index()] = population;
    (code, populations)
}

fn column_value(batch: &RecordBatch, column: &str, row: usize) -> f64 {
    let idx = batch
        .schema()
        .index_of(column)
        .unwrap_or_else(|_| panic!("output is missing column {column}"));
    batch
        .column(idx)
        .as_any()
        .downcast_ref::<Float64Array>()
        .unwrap()
        .value(row)
}

#[test]
fn rate_of_five_per_1000_gives_unit_demand_for_200_people() {
    let exams = exam_batch(&[(1, EMERGENCY_SOURCES[0]); 5]);
    let population = population_batch_by_band(&[("0-4", 1000)]);
    let areas = small_area_batch(&[one_band_area("E01000001", AgeBand::Age0To4, 200)]);

    let estimator = DemandEstimator::new(EstimatorConfig::ct_emergency());
    let result = estimator.estimate(&exams, &population, &areas).unwrap();

    assert_eq!(result.num_rows(), 1);
    let band_demand = column_value(&result, "ct_emergency_age_0_4", 0);
    let total = column_value(&result, "ct_emergency_total_demand", 0);
    assert!((band_demand - 1.0).abs() < 1e-12);
    assert!((total - 1.0).abs() < 1e-12);
}

#[test]
fn area_with_no_population_has_zero_total_demand() {
    let exams = exam_batch(&[(30, EMERGENCY_SOURCES[1]); 50]);
    let population = population_batch_by_band(&[("30-34", 10_000)]);
    let areas = small_area_batch(&[
        ("E01000001", [0i64; BAND_COUNT]),
        one_band_area("E01000002", AgeBand::Age30To34, 400),
    ]);

    let estimator = DemandEstimator::new(EstimatorConfig::ct_emergency());
    let result = estimator.estimate(&exams, &population, &areas).unwrap();

    assert_eq!(column_value(&result, "ct_emergency_total_demand", 0), 0.0);
    assert!(column_value(&result, "ct_emergency_total_demand", 1) > 0.0);
}

#[test]
fn elective_and_emergency_classification_exclude_each_other() {
    // outpatient exams only: emergency demand must be zero, elective nonzero
    let exams = exam_batch(&[(40, "Outpatient (this Health Care Provider)"); 10]);
    let population = population_batch_by_band(&[("40-44", 1000)]);
    let areas = small_area_batch(&[one_band_area("E01000001", AgeBand::Age40To44, 500)]);

    let emergency = DemandEstimator::new(EstimatorConfig::mri_emergency())
        .estimate(&exams, &population, &areas)
        .unwrap();
    let elective = DemandEstimator::new(EstimatorConfig::mri_elective())
        .estimate(&exams, &population, &areas)
        .unwrap();

    assert_eq!(column_value(&emergency, "mri_emergency_total_demand", 0), 0.0);
    assert!(column_value(&elective, "mri_elective_total_demand", 0) > 0.0);

    // and the other way around for A&E attendances
    let ae_exams =
        exam_batch(&[(40, "Accident and Emergency Department (this Health Care Provider)"); 10]);
    let emergency = DemandEstimator::new(EstimatorConfig::mri_emergency())
        .estimate(&ae_exams, &population, &areas)
        .unwrap();
    let elective = DemandEstimator::new(EstimatorConfig::mri_elective())
        .estimate(&ae_exams, &population, &areas)
        .unwrap();

    assert!(column_value(&emergency, "mri_emergency_total_demand", 0) > 0.0);
    assert_eq!(column_value(&elective, "mri_elective_total_demand", 0), 0.0);
}

#[test]
fn single_year_population_rows_are_binned_into_bands() {
    // ages 0..=4 sum to the 0-4 denominator
    let population = population_batch_by_age(&[(0, 200), (1, 200), (2, 200), (3, 200), (4, 200)]);
    let exams = exam_batch(&[(2, ELECTIVE_SOURCES[1]); 5]);
    let areas = small_area_batch(&[one_band_area("E01000001", AgeBand::Age0To4, 200)]);

    let estimator = DemandEstimator::new(EstimatorConfig::mri_elective());
    let result = estimator.estimate(&exams, &population, &areas).unwrap();

    // same denominator as the banded scenario: rate 5 per 1k, demand 1.0
    let total = column_value(&result, "mri_elective_total_demand", 0);
    assert!((total - 1.0).abs() < 1e-12);
}

#[test]
fn mri_total_runs_from_pre_aggregated_counts() {
    let counts = band_counts_batch("MRI_Total", &[("0-4", 2838), ("85+", 5503)]);
    let population_rows: Vec<(&str, i64)> = AgeBand::ALL
        .iter()
        .map(|band| (band.label(), POPULATION_2024[band.index()] as i64))
        .collect();
    let population = population_batch_by_band(&population_rows);
    let areas = small_area_batch(&[
        one_band_area("E01000001", AgeBand::Age0To4, 300),
        one_band_area("E01000002", AgeBand::Age85Plus, 120),
    ]);

    let estimator = DemandEstimator::new(EstimatorConfig::mri_total());
    let result = estimator
        .estimate_from_band_counts(&counts, &population, &areas)
        .unwrap();

    let expected_young = 300.0 * (2838.0 / POPULATION_2024[0] as f64 * 1000.0) / 1000.0;
    let expected_old = 120.0 * (5503.0 / POPULATION_2024[17] as f64 * 1000.0) / 1000.0;
    assert!((column_value(&result, "mri_age_0_4", 0) - expected_young).abs() < 1e-9);
    assert!((column_value(&result, "mri_total_demand", 1) - expected_old).abs() < 1e-9);
    // bands with zero counts but known population contribute exactly zero
    assert_eq!(column_value(&result, "mri_age_40_44", 0), 0.0);
}

#[test]
fn per_band_columns_sum_to_the_total_column() {
    let exams = exam_batch(&[
        (3, EMERGENCY_SOURCES[0]),
        (30, EMERGENCY_SOURCES[1]),
        (88, EMERGENCY_SOURCES[0]),
    ]);
    let population =
        population_batch_by_band(&[("0-4", 500), ("30-34", 700), ("85+", 300)]);
    let mut populations = [0i64; BAND_COUNT];
    populations[AgeBand::Age0To4.index()] = 100;
    populations[AgeBand::Age30To34.index()] = 250;
    populations[AgeBand::Age85Plus.index()] = 40;
    let areas = small_area_batch(&[("E01000001", populations)]);

    let estimator = DemandEstimator::new(EstimatorConfig::ct_emergency());
    let result = estimator.estimate(&exams, &population, &areas).unwrap();

    let band_sum: f64 = AgeBand::ALL
        .iter()
        .map(|band| {
            column_value(
                &result,
                &format!("ct_emergency_{}", band.population_column()),
                0,
            )
        })
        .sum();
    let total = column_value(&result, "ct_emergency_total_demand", 0);
    assert!((total - band_sum).abs() < 1e-12);
    assert!(total > 0.0);
}

#[test]
fn bands_without_population_are_excluded_without_aborting() {
    // population only covers 0-4; the 10-14 exams have no denominator
    let exams = exam_batch(&[(2, EMERGENCY_SOURCES[0]), (12, EMERGENCY_SOURCES[0])]);
    let population = population_batch_by_band(&[("0-4", 1000)]);
    let mut populations = [0i64; BAND_COUNT];
    populations[AgeBand::Age0To4.index()] = 1000;
    populations[AgeBand::Age10To14.index()] = 1000;
    let areas = small_area_batch(&[("E01000001", populations)]);

    let estimator = DemandEstimator::new(EstimatorConfig::ct_emergency());
    let result = estimator.estimate(&exams, &population, &areas).unwrap();

    // only the 0-4 band contributes: 1000 * (1/1000*1000) / 1000 = 1.0
    assert_eq!(column_value(&result, "ct_emergency_age_10_14", 0), 0.0);
    let total = column_value(&result, "ct_emergency_total_demand", 0);
    assert!((total - 1.0).abs() < 1e-12);
}

#[test]
fn missing_required_column_aborts_the_run() {
    let schema = Schema::new(vec![Field::new("age", DataType::Int64, false)]);
    let malformed = RecordBatch::try_new(
        Arc::new(schema),
        vec![Arc::new(Int64Array::from(vec![10, 20]))],
    )
    .unwrap();
    let population = population_batch_by_band(&[("0-4", 1000)]);
    let areas = small_area_batch(&[one_band_area("E01000001", AgeBand::Age0To4, 10)]);

    let estimator = DemandEstimator::new(EstimatorConfig::ct_emergency());
    let err = estimator
        .estimate(&malformed, &population, &areas)
        .unwrap_err();
    assert!(
        matches!(err, DemandError::MissingColumn { column } if column == "patient_source")
    );
}

#[test]
fn estimator_outputs_coexist_without_column_collisions() {
    let exams = exam_batch(&[
        (20, EMERGENCY_SOURCES[0]),
        (20, ELECTIVE_SOURCES[0]),
    ]);
    let population = population_batch_by_band(&[("20-24", 5000)]);
    let areas = small_area_batch(&[one_band_area("E01000001", AgeBand::Age20To24, 900)]);

    let emergency = DemandEstimator::new(EstimatorConfig::ct_emergency())
        .estimate(&exams, &population, &areas)
        .unwrap();
    let elective = DemandEstimator::new(EstimatorConfig::mri_elective())
        .estimate(&exams, &population, &areas)
        .unwrap();

    let emergency_schema = emergency.schema();
    let shared: Vec<_> = elective
        .schema()
        .fields()
        .iter()
        .filter(|field| emergency_schema.index_of(field.name()).is_ok())
        .map(|field| field.name().clone())
        .collect();
    assert_eq!(shared, vec!["lsoa21cd".to_string()]);
}
