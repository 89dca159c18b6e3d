use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::PathBuf;

use crate::planning::DistrictId;

/// Countries with demographic extracts, keyed by the code used in table names.
static SUPPORTED_COUNTRIES: [(&str, &str); 5] = [
    ("Benin", "BE"),
    ("Kenya", "KE"),
    ("Mali", "MAL"),
    ("Uganda", "UG"),
    ("Zimbabwe", "ZIM"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Country {
    pub name: &'static str,
    pub code: &'static str,
}

impl Country {
    pub fn supported() -> impl Iterator<Item = Country> {
        SUPPORTED_COUNTRIES
            .iter()
            .map(|&(name, code)| Country { name, code })
    }

    pub fn lookup(name: &str) -> Result<Self, StoreError> {
        let wanted = name.trim();
        Self::supported()
            .find(|country| country.name.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| StoreError::UnknownCountry(wanted.to_string()))
    }
}

/// Per-district population aggregates for one country.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DemographicTables {
    pub under15: BTreeMap<DistrictId, u64>,
    pub total_population: BTreeMap<DistrictId, f64>,
}

impl DemographicTables {
    pub fn districts(&self) -> BTreeSet<&DistrictId> {
        self.under15
            .keys()
            .chain(self.total_population.keys())
            .collect()
    }
}

/// Source of demographic aggregates; stands in for the country database.
pub trait DemographicStore: Send + Sync {
    fn countries(&self) -> Result<Vec<Country>, StoreError>;
    fn districts(&self, country: Country) -> Result<Vec<DistrictId>, StoreError>;
    fn tables(&self, country: Country) -> Result<DemographicTables, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("country {0} is not supported")]
    UnknownCountry(String),
    #[error("no demographic data for {country}: {detail}")]
    Unavailable { country: String, detail: String },
    #[error("failed to read demographic extract: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid demographic extract: {0}")]
    Csv(#[from] csv::Error),
}

/// Reads `{CODE}_ADMIN_AREAS.csv` and `{CODE}_FACILITIES.csv` extracts from a directory.
#[derive(Debug, Clone)]
pub struct CsvDemographicStore {
    root: PathBuf,
}

impl CsvDemographicStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn extract_path(&self, country: Country, table: &str) -> PathBuf {
        self.root.join(format!("{}_{}.csv", country.code, table))
    }

    fn open(&self, country: Country, table: &str) -> Result<std::fs::File, StoreError> {
        let path = self.extract_path(country, table);
        std::fs::File::open(&path).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => StoreError::Unavailable {
                country: country.name.to_string(),
                detail: format!("missing {}", path.display()),
            },
            _ => StoreError::Io(err),
        })
    }
}

impl DemographicStore for CsvDemographicStore {
    fn countries(&self) -> Result<Vec<Country>, StoreError> {
        Ok(Country::supported()
            .filter(|country| self.extract_path(*country, "FACILITIES").is_file())
            .collect())
    }

    fn districts(&self, country: Country) -> Result<Vec<DistrictId>, StoreError> {
        let totals = sum_facility_population(self.open(country, "FACILITIES")?)?;
        Ok(totals.into_keys().collect())
    }

    fn tables(&self, country: Country) -> Result<DemographicTables, StoreError> {
        Ok(DemographicTables {
            under15: sum_under15(self.open(country, "ADMIN_AREAS")?)?,
            total_population: sum_facility_population(self.open(country, "FACILITIES")?)?,
        })
    }
}

/// Fixed tables keyed by country name, for tests and demos.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDemographicStore {
    tables: BTreeMap<&'static str, DemographicTables>,
}

impl InMemoryDemographicStore {
    pub fn with_country(mut self, country: Country, tables: DemographicTables) -> Self {
        self.tables.insert(country.name, tables);
        self
    }
}

impl DemographicStore for InMemoryDemographicStore {
    fn countries(&self) -> Result<Vec<Country>, StoreError> {
        Ok(Country::supported()
            .filter(|country| self.tables.contains_key(country.name))
            .collect())
    }

    fn districts(&self, country: Country) -> Result<Vec<DistrictId>, StoreError> {
        let tables = self.tables(country)?;
        Ok(tables.total_population.into_keys().collect())
    }

    fn tables(&self, country: Country) -> Result<DemographicTables, StoreError> {
        self.tables
            .get(country.name)
            .cloned()
            .ok_or_else(|| StoreError::Unavailable {
                country: country.name.to_string(),
                detail: "no tables loaded".to_string(),
            })
    }
}

#[derive(Debug, Deserialize)]
struct AdminAreaRow {
    ft_level2: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    fi_pop_under15: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct FacilityRow {
    ft_level2: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    fi_tot_pop: Option<f64>,
}

// Blank cells contribute nothing, the way SQL SUM skips NULLs.
fn sum_under15<R: Read>(reader: R) -> Result<BTreeMap<DistrictId, u64>, StoreError> {
    let mut sums: BTreeMap<DistrictId, f64> = BTreeMap::new();
    for row in csv_reader(reader).deserialize::<AdminAreaRow>() {
        let row = row?;
        *sums.entry(DistrictId::new(row.ft_level2)).or_default() +=
            row.fi_pop_under15.unwrap_or(0.0);
    }

    Ok(sums
        .into_iter()
        .map(|(district, total)| (district, total.max(0.0).round() as u64))
        .collect())
}

fn sum_facility_population<R: Read>(reader: R) -> Result<BTreeMap<DistrictId, f64>, StoreError> {
    let mut sums: BTreeMap<DistrictId, f64> = BTreeMap::new();
    for row in csv_reader(reader).deserialize::<FacilityRow>() {
        let row = row?;
        *sums.entry(DistrictId::new(row.ft_level2)).or_default() += row.fi_tot_pop.unwrap_or(0.0);
    }

    Ok(sums)
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
