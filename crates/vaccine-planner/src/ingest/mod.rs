//! Decoding of uploaded statistics files and the keyed join that assembles
//! [`DistrictRecord`]s for the planner.

mod join;
mod parser;
mod state;
mod store;

pub use parser::{CovidStats, GeneralStats};
pub use state::{CampaignState, PreviousCampaign};
pub use store::{
    Country, CsvDemographicStore, DemographicStore, DemographicTables, InMemoryDemographicStore,
    StoreError,
};

use std::fmt;
use std::io::Read;
use std::path::Path;
use tracing::info;

use crate::planning::{DistrictId, DistrictRecord};

/// Which input a district or row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Demographics,
    AdminAreas,
    Facilities,
    CovidStats,
    GeneralStats,
}

impl DataSource {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Demographics => "demographic aggregates",
            Self::AdminAreas => "under-15 population aggregates",
            Self::Facilities => "facility population aggregates",
            Self::CovidStats => "COVID statistics file",
            Self::GeneralStats => "general statistics file",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid {dataset}: {source}")]
    Csv {
        dataset: DataSource,
        #[source]
        source: csv::Error,
    },
    #[error("invalid state file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("dose count '{0}' is not a non-negative integer")]
    InvalidDoseCount(String),
    #[error("district {district} appears more than once in the {dataset}")]
    DuplicateRow {
        district: DistrictId,
        dataset: DataSource,
    },
    #[error("district {district} is missing from the {dataset}")]
    MissingDistrictData {
        district: DistrictId,
        dataset: DataSource,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IngestError {
    pub(crate) fn missing(district: &DistrictId, dataset: DataSource) -> Self {
        Self::MissingDistrictData {
            district: district.clone(),
            dataset,
        }
    }
}

/// Everything a planning run needs, assembled from the caller's inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignInputs {
    pub country: Country,
    pub total_doses: u64,
    pub districts: Vec<DistrictRecord>,
}

/// Builds [`CampaignInputs`] from uploaded statistics and a demographic store.
pub struct DistrictDatasetImporter<'s, S: ?Sized> {
    store: &'s S,
}

impl<'s, S> DistrictDatasetImporter<'s, S>
where
    S: DemographicStore + ?Sized,
{
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    pub fn from_paths<P: AsRef<Path>>(
        &self,
        covid_csv: P,
        general_csv: P,
        state_json: P,
    ) -> Result<CampaignInputs, IngestError> {
        let state = CampaignState::from_state_file(std::fs::File::open(state_json)?)?;
        self.from_readers(
            std::fs::File::open(covid_csv)?,
            std::fs::File::open(general_csv)?,
            &state,
        )
    }

    pub fn from_readers<C: Read, G: Read>(
        &self,
        covid_csv: C,
        general_csv: G,
        state: &CampaignState,
    ) -> Result<CampaignInputs, IngestError> {
        let country = Country::lookup(&state.country)?;
        let covid = parser::parse_covid_stats(covid_csv)?;
        let general = parser::parse_general_stats(general_csv)?;
        let demographics = self.store.tables(country)?;
        let completed = state.completed_districts();

        let districts = join::join_districts(&demographics, &covid, &general, &completed)?;
        info!(
            country = country.name,
            districts = districts.len(),
            completed = completed.len(),
            "district dataset assembled"
        );

        Ok(CampaignInputs {
            country,
            total_doses: state.total_doses,
            districts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const COVID: &str = "DISTRICTS,NUM_VACCINATED,NUM_CASES,MIN_TO_ADMIN_VACC,NUM_STAFF\n\
Gulu,2300,460,5,8\n\
Arua,0,391,5,2\n";
    const GENERAL: &str = "DISTRICTS,PERCENT_POP_60+,NUM_VACCINE_SITES\n\
Arua,0.35,1\n\
Gulu,0.10,2\n";

    fn uganda() -> Country {
        Country::lookup("Uganda").expect("uganda supported")
    }

    fn store() -> InMemoryDemographicStore {
        let mut tables = DemographicTables::default();
        for (district, under15, total) in [("Arua", 300, 869.57), ("Gulu", 5_000, 20_000.0)] {
            tables.under15.insert(DistrictId::new(district), under15);
            tables
                .total_population
                .insert(DistrictId::new(district), total);
        }
        InMemoryDemographicStore::default().with_country(uganda(), tables)
    }

    fn state(previous: Vec<PreviousCampaign>) -> CampaignState {
        CampaignState {
            country: "Uganda".to_string(),
            total_doses: 10_000,
            previous_campaigns: previous,
        }
    }

    #[test]
    fn importer_joins_every_source() {
        let store = store();
        let importer = DistrictDatasetImporter::new(&store);
        let previous = vec![PreviousCampaign {
            district: DistrictId::new("Gulu"),
            finished: true,
        }];

        let inputs = importer
            .from_readers(Cursor::new(COVID), Cursor::new(GENERAL), &state(previous))
            .expect("import succeeds");

        assert_eq!(inputs.country, uganda());
        assert_eq!(inputs.total_doses, 10_000);
        let ids: Vec<_> = inputs.districts.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["Arua", "Gulu"]);

        let gulu = &inputs.districts[1];
        assert!(gulu.campaign_already_completed);
        assert_eq!(gulu.population_under15, 5_000);
        assert_eq!(gulu.vaccine_site_count, 2);
        assert_eq!(gulu.staff_count, 8);
        assert!(!inputs.districts[0].campaign_already_completed);
    }

    #[test]
    fn unfinished_prior_campaigns_do_not_count() {
        let store = store();
        let importer = DistrictDatasetImporter::new(&store);
        let previous = vec![PreviousCampaign {
            district: DistrictId::new("Gulu"),
            finished: false,
        }];

        let inputs = importer
            .from_readers(Cursor::new(COVID), Cursor::new(GENERAL), &state(previous))
            .expect("import succeeds");

        assert!(inputs
            .districts
            .iter()
            .all(|district| !district.campaign_already_completed));
    }

    #[test]
    fn district_missing_from_upload_is_reported() {
        let store = store();
        let importer = DistrictDatasetImporter::new(&store);
        let general = "DISTRICTS,PERCENT_POP_60+,NUM_VACCINE_SITES\nArua,0.35,1\n";

        match importer.from_readers(Cursor::new(COVID), Cursor::new(general), &state(vec![])) {
            Err(IngestError::MissingDistrictData { district, dataset }) => {
                assert_eq!(district.as_str(), "Gulu");
                assert_eq!(dataset, DataSource::GeneralStats);
            }
            other => panic!("expected missing district, got {other:?}"),
        }
    }

    #[test]
    fn uploaded_district_without_demographics_is_reported() {
        let store = store();
        let importer = DistrictDatasetImporter::new(&store);
        let covid = format!("{COVID}Kitgum,10,1,5,1\n");

        match importer.from_readers(Cursor::new(covid), Cursor::new(GENERAL), &state(vec![])) {
            Err(IngestError::MissingDistrictData { district, dataset }) => {
                assert_eq!(district.as_str(), "Kitgum");
                assert_eq!(dataset, DataSource::Demographics);
            }
            other => panic!("expected missing district, got {other:?}"),
        }
    }

    #[test]
    fn unknown_country_is_rejected() {
        let store = store();
        let importer = DistrictDatasetImporter::new(&store);
        let mut request = state(vec![]);
        request.country = "Narnia".to_string();

        assert!(matches!(
            importer.from_readers(Cursor::new(COVID), Cursor::new(GENERAL), &request),
            Err(IngestError::Store(StoreError::UnknownCountry(_)))
        ));
    }

    #[test]
    fn from_paths_propagates_io_errors() {
        let store = store();
        let importer = DistrictDatasetImporter::new(&store);

        let error = importer
            .from_paths("./missing-covid.csv", "./missing-general.csv", "./missing.json")
            .expect_err("expected io error");

        match error {
            IngestError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
