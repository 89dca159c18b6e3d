use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::Read;

use super::IngestError;
use crate::planning::DistrictId;

/// A district the caller flagged in the prior-campaign checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviousCampaign {
    pub district: DistrictId,
    pub finished: bool,
}

/// Caller-supplied run parameters: target country, dose budget, prior campaigns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignState {
    pub country: String,
    pub total_doses: u64,
    #[serde(default)]
    pub previous_campaigns: Vec<PreviousCampaign>,
}

/// Positional layout written by the web form: `[country, doses, [[district, finished]]]`.
#[derive(Debug, Deserialize)]
struct StateFile(String, DoseCount, Vec<(String, bool)>);

/// The form submits the dose count either as a number or as the raw input string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DoseCount {
    Number(u64),
    Text(String),
}

impl DoseCount {
    fn resolve(self) -> Result<u64, IngestError> {
        match self {
            DoseCount::Number(value) => Ok(value),
            DoseCount::Text(raw) => raw
                .trim()
                .parse()
                .map_err(|_| IngestError::InvalidDoseCount(raw)),
        }
    }
}

impl CampaignState {
    pub fn from_state_file<R: Read>(reader: R) -> Result<Self, IngestError> {
        let StateFile(country, doses, entries) = serde_json::from_reader(reader)?;

        Ok(Self {
            country,
            total_doses: doses.resolve()?,
            previous_campaigns: entries
                .into_iter()
                .map(|(district, finished)| PreviousCampaign {
                    district: DistrictId::new(district),
                    finished,
                })
                .collect(),
        })
    }

    /// Districts whose campaign is marked finished; unchecked entries do not count.
    pub fn completed_districts(&self) -> BTreeSet<&DistrictId> {
        self.previous_campaigns
            .iter()
            .filter(|campaign| campaign.finished)
            .map(|campaign| &campaign.district)
            .collect()
    }
}
