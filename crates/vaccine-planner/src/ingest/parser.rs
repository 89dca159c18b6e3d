use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::io::Read;

use super::{DataSource, IngestError};
use crate::planning::DistrictId;

/// Epidemiological and staffing facts from the uploaded COVID statistics file.
#[derive(Debug, Clone, PartialEq)]
pub struct CovidStats {
    pub vaccinated_count: u64,
    pub case_count: u64,
    pub minutes_to_administer_one_dose: f64,
    pub staff_count: u64,
}

/// Demographic and site facts from the uploaded general statistics file.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneralStats {
    pub percent_population_60_plus: f64,
    pub vaccine_site_count: u64,
}

#[derive(Debug, Deserialize)]
struct CovidRow {
    #[serde(rename = "DISTRICTS")]
    district: String,
    #[serde(rename = "NUM_VACCINATED", deserialize_with = "whole_count")]
    vaccinated: u64,
    #[serde(rename = "NUM_CASES", deserialize_with = "whole_count")]
    cases: u64,
    #[serde(rename = "MIN_TO_ADMIN_VACC")]
    minutes_per_dose: f64,
    #[serde(rename = "NUM_STAFF", deserialize_with = "whole_count")]
    staff: u64,
}

#[derive(Debug, Deserialize)]
struct GeneralRow {
    #[serde(rename = "DISTRICTS")]
    district: String,
    #[serde(rename = "PERCENT_POP_60+", deserialize_with = "fraction")]
    percent_60_plus: f64,
    #[serde(rename = "NUM_VACCINE_SITES", deserialize_with = "whole_count")]
    vaccine_sites: u64,
}

pub(crate) fn parse_covid_stats<R: Read>(
    reader: R,
) -> Result<BTreeMap<DistrictId, CovidStats>, IngestError> {
    let mut stats = BTreeMap::new();

    for row in csv_reader(reader).deserialize::<CovidRow>() {
        let row = row.map_err(|source| IngestError::Csv {
            dataset: DataSource::CovidStats,
            source,
        })?;
        let district = DistrictId::new(row.district);
        let entry = CovidStats {
            vaccinated_count: row.vaccinated,
            case_count: row.cases,
            minutes_to_administer_one_dose: row.minutes_per_dose,
            staff_count: row.staff,
        };

        insert_unique(&mut stats, district, entry, DataSource::CovidStats)?;
    }

    Ok(stats)
}

pub(crate) fn parse_general_stats<R: Read>(
    reader: R,
) -> Result<BTreeMap<DistrictId, GeneralStats>, IngestError> {
    let mut stats = BTreeMap::new();

    for row in csv_reader(reader).deserialize::<GeneralRow>() {
        let row = row.map_err(|source| IngestError::Csv {
            dataset: DataSource::GeneralStats,
            source,
        })?;
        let district = DistrictId::new(row.district);
        let entry = GeneralStats {
            percent_population_60_plus: row.percent_60_plus,
            vaccine_site_count: row.vaccine_sites,
        };

        insert_unique(&mut stats, district, entry, DataSource::GeneralStats)?;
    }

    Ok(stats)
}

fn insert_unique<T>(
    map: &mut BTreeMap<DistrictId, T>,
    district: DistrictId,
    value: T,
    dataset: DataSource,
) -> Result<(), IngestError> {
    if map.contains_key(&district) {
        return Err(IngestError::DuplicateRow { district, dataset });
    }
    map.insert(district, value);
    Ok(())
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// Spreadsheet exports often write counts as `1200.0`; accept those but reject
/// negative or fractional counts.
fn whole_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let value: f64 = raw.trim().parse().map_err(|_| {
        <D::Error as serde::de::Error>::custom(format!("'{raw}' is not a number"))
    })?;

    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
        return Err(serde::de::Error::custom(format!(
            "'{raw}' is not a non-negative whole count"
        )));
    }

    Ok(value as u64)
}

/// Shares are fractions; a percentage such as `35` or a `NaN` cell is rejected.
fn fraction<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let value: f64 = raw.trim().parse().map_err(|_| {
        <D::Error as serde::de::Error>::custom(format!("'{raw}' is not a number"))
    })?;

    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(serde::de::Error::custom(format!(
            "'{raw}' is not a fraction between 0 and 1"
        )));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const COVID: &str = "DISTRICTS,NUM_VACCINATED,NUM_CASES,MIN_TO_ADMIN_VACC,NUM_STAFF\n\
Gulu,2300,460,5,8\n\
Arua,0.0,391,4.5,2\n";

    #[test]
    fn covid_rows_are_keyed_by_district() {
        let stats = parse_covid_stats(Cursor::new(COVID)).expect("parses");

        assert_eq!(stats.len(), 2);
        let arua = &stats[&DistrictId::new("Arua")];
        assert_eq!(arua.vaccinated_count, 0);
        assert_eq!(arua.case_count, 391);
        assert_eq!(arua.minutes_to_administer_one_dose, 4.5);
        assert_eq!(arua.staff_count, 2);
    }

    #[test]
    fn general_rows_accept_plus_sign_header() {
        let csv = "DISTRICTS,PERCENT_POP_60+,NUM_VACCINE_SITES\nGulu,0.12,3\n";
        let stats = parse_general_stats(Cursor::new(csv)).expect("parses");

        let gulu = &stats[&DistrictId::new("Gulu")];
        assert_eq!(gulu.percent_population_60_plus, 0.12);
        assert_eq!(gulu.vaccine_site_count, 3);
    }

    #[test]
    fn duplicate_districts_are_rejected() {
        let csv = "DISTRICTS,PERCENT_POP_60+,NUM_VACCINE_SITES\nGulu,0.12,3\nGulu,0.2,1\n";

        match parse_general_stats(Cursor::new(csv)) {
            Err(IngestError::DuplicateRow { district, dataset }) => {
                assert_eq!(district.as_str(), "Gulu");
                assert_eq!(dataset, DataSource::GeneralStats);
            }
            other => panic!("expected duplicate row, got {other:?}"),
        }
    }

    #[test]
    fn fractional_counts_are_rejected() {
        let csv = "DISTRICTS,NUM_VACCINATED,NUM_CASES,MIN_TO_ADMIN_VACC,NUM_STAFF\nGulu,10.5,1,5,1\n";

        assert!(matches!(
            parse_covid_stats(Cursor::new(csv)),
            Err(IngestError::Csv {
                dataset: DataSource::CovidStats,
                ..
            })
        ));
    }

    #[test]
    fn elderly_share_must_be_a_fraction() {
        for share in ["NaN", "35", "-0.4", "inf"] {
            let csv = format!("DISTRICTS,PERCENT_POP_60+,NUM_VACCINE_SITES\nGulu,{share},3\n");

            assert!(
                matches!(
                    parse_general_stats(Cursor::new(csv)),
                    Err(IngestError::Csv {
                        dataset: DataSource::GeneralStats,
                        ..
                    })
                ),
                "share {share} should be rejected"
            );
        }
    }

    #[test]
    fn elderly_share_accepts_bounds() {
        let csv = "DISTRICTS,PERCENT_POP_60+,NUM_VACCINE_SITES\nGulu,0,3\nArua,1.0,1\n";
        let stats = parse_general_stats(Cursor::new(csv)).expect("parses");

        assert_eq!(stats[&DistrictId::new("Gulu")].percent_population_60_plus, 0.0);
        assert_eq!(stats[&DistrictId::new("Arua")].percent_population_60_plus, 1.0);
    }
}
