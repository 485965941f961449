//! Small-area demand projection
//!
//! Broadcasts the national per-band rates across every small area's
//! population-by-band figures. Areas are independent, so the row loop
//! runs in parallel.

use log::debug;
use rayon::prelude::*;

use crate::models::{AgeBand, AreaDemand, SmallAreaRecord, BAND_COUNT};
use crate::rates::RateTable;

/// Project national rates onto small-area populations
///
/// For each area and band, demand = population x rate / 1000; the area
/// total is the sum over bands. Undefined rates contribute zero demand.
/// Purely multiplicative and deterministic.
#[must_use]
pub fn project(rates: &RateTable, areas: &[SmallAreaRecord]) -> Vec<AreaDemand> {
    debug!("projecting demand over {} small areas", areas.len());
    areas
        .par_iter()
        .map(|area| project_area(rates, area))
        .collect()
}

/// Demand estimate for one small area
#[must_use]
pub fn project_area(rates: &RateTable, area: &SmallAreaRecord) -> AreaDemand {
    let mut by_band = [0.0f64; BAND_COUNT];
    for band in AgeBand::ALL {
        let population = area.populations[band.index()] as f64;
        let rate = rates.get(band).value_or_zero();
        by_band[band.index()] = population * rate / 1000.0;
    }

    AreaDemand {
        area_code: area.area_code.clone(),
        total: by_band.iter().sum(),
        by_band,
    }
}
