//! National demand rate derivation
//!
//! The rate engine turns pathway-filtered exam counts and a national
//! population table into a per-1,000-population rate for each age band.
//! A band whose denominator is zero or unknown gets an explicitly
//! undefined rate; it is never folded into a numeric zero or infinity.

use itertools::Itertools;
use log::{debug, warn};

use crate::models::{AgeBand, ExamRecord, BAND_COUNT};
use crate::pathway::PathwayRule;

/// National population per age band, the rate denominator
///
/// Bands the source table does not cover stay `None`, which keeps a
/// missing denominator distinct from a population of zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopulationTable {
    by_band: [Option<u64>; BAND_COUNT],
}

impl PopulationTable {
    /// Build a table from `(band, population)` pairs, summing duplicates
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (AgeBand, u64)>,
    {
        let mut table = Self::default();
        for (band, population) in pairs {
            table.add(band, population);
        }
        table
    }

    /// Add population to a band
    pub fn add(&mut self, band: AgeBand, population: u64) {
        let slot = &mut self.by_band[band.index()];
        *slot = Some(slot.unwrap_or(0) + population);
    }

    /// Population for a band, if the table covers it
    #[must_use]
    pub fn get(&self, band: AgeBand) -> Option<u64> {
        self.by_band[band.index()]
    }
}

/// A per-1,000-population rate for one band
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BandRate {
    /// Rate computed from a known nonzero denominator
    Defined(f64),
    /// Denominator was zero or absent; rate cannot be computed
    Undefined,
}

impl BandRate {
    /// The rate value, treating an undefined rate as zero demand
    #[must_use]
    pub fn value_or_zero(self) -> f64 {
        match self {
            Self::Defined(rate) => rate,
            Self::Undefined => 0.0,
        }
    }

    /// Whether this rate could be computed
    #[must_use]
    pub const fn is_defined(self) -> bool {
        matches!(self, Self::Defined(_))
    }
}

/// Per-band rates for one modality and pathway
///
/// Every one of the 18 bands is present; bands with no exams but a known
/// population carry an explicit zero rate rather than being dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    rates: [BandRate; BAND_COUNT],
}

impl RateTable {
    /// Rate for a band
    #[must_use]
    pub fn get(&self, band: AgeBand) -> BandRate {
        self.rates[band.index()]
    }

    /// Bands whose rate could not be computed
    pub fn undefined_bands(&self) -> impl Iterator<Item = AgeBand> + '_ {
        AgeBand::ALL
            .into_iter()
            .filter(|band| !self.get(*band).is_defined())
    }
}

/// Count pathway exams per age band
///
/// Records outside the pathway are filtered out. Records whose age cannot
/// be banded are dropped with a warning; the extraction layer normally
/// removes these before they get here.
#[must_use]
pub fn band_counts(exams: &[ExamRecord], rule: Option<&PathwayRule>) -> [u64; BAND_COUNT] {
    let by_band = exams
        .iter()
        .filter(|exam| rule.map_or(true, |r| r.classify(&exam.patient_source)))
        .filter_map(|exam| match AgeBand::from_age(exam.age) {
            Ok(band) => Some(band),
            Err(_) => {
                warn!("dropping exam record with invalid age {}", exam.age);
                None
            }
        })
        .counts();

    let mut counts = [0u64; BAND_COUNT];
    for (band, n) in by_band {
        counts[band.index()] = n as u64;
    }
    counts
}

/// Compute per-1,000-population rates from band counts and population
///
/// rate = count / population x 1000. A zero exam count with a known
/// nonzero population yields an explicit zero rate; a zero or missing
/// population yields [`BandRate::Undefined`] and a warning.
#[must_use]
pub fn compute_rates(counts: &[u64; BAND_COUNT], population: &PopulationTable) -> RateTable {
    let mut rates = [BandRate::Undefined; BAND_COUNT];

    for band in AgeBand::ALL {
        let count = counts[band.index()];
        rates[band.index()] = match population.get(band) {
            Some(pop) if pop > 0 => BandRate::Defined(count as f64 / pop as f64 * 1000.0),
            Some(_) => {
                warn!(
                    "population for band {} is zero; rate is undefined ({count} exams excluded)",
                    band.label()
                );
                BandRate::Undefined
            }
            None => {
                warn!(
                    "no population for band {}; rate is undefined ({count} exams excluded)",
                    band.label()
                );
                BandRate::Undefined
            }
        };
    }

    let defined = rates.iter().filter(|r| r.is_defined()).count();
    debug!("computed rates for {defined}/{BAND_COUNT} bands");
    RateTable { rates }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pathway::EMERGENCY_SOURCES;

    fn exam(age: i64, source: &str) -> ExamRecord {
        ExamRecord {
            age,
            patient_source: source.to_string(),
        }
    }

    #[test]
    fn counts_conserve_pathway_records() {
        let rule = PathwayRule::emergency();
        let exams = vec![
            exam(3, EMERGENCY_SOURCES[0]),
            exam(4, EMERGENCY_SOURCES[1]),
            exam(87, EMERGENCY_SOURCES[0]),
            exam(40, "GP Direct Access"),
        ];

        let counts = band_counts(&exams, Some(&rule));
        let in_pathway = exams
            .iter()
            .filter(|e| rule.classify(&e.patient_source))
            .count() as u64;
        assert_eq!(counts.iter().sum::<u64>(), in_pathway);
        assert_eq!(counts[AgeBand::Age0To4.index()], 2);
        assert_eq!(counts[AgeBand::Age85Plus.index()], 1);
    }

    #[test]
    fn records_with_invalid_ages_are_dropped_from_counts() {
        // a record that bypassed extraction still cannot poison the counts
        let exams = vec![exam(-5, EMERGENCY_SOURCES[0]), exam(20, EMERGENCY_SOURCES[0])];
        let counts = band_counts(&exams, Some(&PathwayRule::emergency()));
        assert_eq!(counts.iter().sum::<u64>(), 1);
        assert_eq!(counts[AgeBand::Age20To24.index()], 1);
    }

    #[test]
    fn no_rule_counts_every_record() {
        let exams = vec![exam(10, "anything"), exam(12, "else")];
        let counts = band_counts(&exams, None);
        assert_eq!(counts[AgeBand::Age10To14.index()], 2);
    }

    #[test]
    fn rate_is_count_over_population_times_1000() {
        let mut counts = [0u64; BAND_COUNT];
        counts[AgeBand::Age0To4.index()] = 5;
        let population = PopulationTable::from_pairs([(AgeBand::Age0To4, 1000)]);

        let rates = compute_rates(&counts, &population);
        match rates.get(AgeBand::Age0To4) {
            BandRate::Defined(rate) => assert!((rate - 5.0).abs() < 1e-12),
            BandRate::Undefined => panic!("rate should be defined"),
        }
    }

    #[test]
    fn zero_count_with_known_population_is_explicit_zero() {
        let counts = [0u64; BAND_COUNT];
        let population = PopulationTable::from_pairs([(AgeBand::Age50To54, 2000)]);

        let rates = compute_rates(&counts, &population);
        assert_eq!(rates.get(AgeBand::Age50To54), BandRate::Defined(0.0));
    }

    #[test]
    fn zero_or_missing_population_is_undefined_not_infinite() {
        let mut counts = [0u64; BAND_COUNT];
        counts[AgeBand::Age0To4.index()] = 7;
        let population = PopulationTable::from_pairs([(AgeBand::Age0To4, 0)]);

        let rates = compute_rates(&counts, &population);
        assert_eq!(rates.get(AgeBand::Age0To4), BandRate::Undefined);
        // every other band has no population entry at all
        assert_eq!(rates.undefined_bands().count(), BAND_COUNT);
    }

    #[test]
    fn population_pairs_sum_duplicates() {
        let table =
            PopulationTable::from_pairs([(AgeBand::Age0To4, 100), (AgeBand::Age0To4, 50)]);
        assert_eq!(table.get(AgeBand::Age0To4), Some(150));
        assert_eq!(table.get(AgeBand::Age5To9), None);
    }
}
