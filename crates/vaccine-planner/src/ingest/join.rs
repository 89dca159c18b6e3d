use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

use super::parser::{CovidStats, GeneralStats};
use super::store::DemographicTables;
use super::{DataSource, IngestError};
use crate::planning::{DistrictId, DistrictRecord};

/// Keyed join of every source into one record per district, in district-name order.
/// A district known to any population, COVID, or general source but absent from
/// another is rejected before any scoring happens.
pub(crate) fn join_districts(
    demographics: &DemographicTables,
    covid: &BTreeMap<DistrictId, CovidStats>,
    general: &BTreeMap<DistrictId, GeneralStats>,
    completed: &BTreeSet<&DistrictId>,
) -> Result<Vec<DistrictRecord>, IngestError> {
    let known = demographics.districts();

    for district in covid.keys().chain(general.keys()) {
        if !known.contains(district) {
            return Err(IngestError::missing(district, DataSource::Demographics));
        }
    }

    for district in completed.iter().filter(|district| !known.contains(*district)) {
        warn!(%district, "prior campaign listed for unknown district");
    }

    known
        .into_iter()
        .map(|district| {
            let population_under15 = *demographics
                .under15
                .get(district)
                .ok_or_else(|| IngestError::missing(district, DataSource::AdminAreas))?;
            let estimated_total_population = *demographics
                .total_population
                .get(district)
                .ok_or_else(|| IngestError::missing(district, DataSource::Facilities))?;
            let covid = covid
                .get(district)
                .ok_or_else(|| IngestError::missing(district, DataSource::CovidStats))?;
            let general = general
                .get(district)
                .ok_or_else(|| IngestError::missing(district, DataSource::GeneralStats))?;

            Ok(DistrictRecord {
                id: district.clone(),
                population_under15,
                estimated_total_population,
                vaccinated_count: covid.vaccinated_count,
                case_count: covid.case_count,
                minutes_to_administer_one_dose: covid.minutes_to_administer_one_dose,
                staff_count: covid.staff_count,
                vaccine_site_count: general.vaccine_site_count,
                percent_population_60_plus: general.percent_population_60_plus,
                campaign_already_completed: completed.contains(district),
            })
        })
        .collect()
}
