use super::config::PlanningConfig;
use super::domain::{CampaignEstimate, DistrictRecord, PriorityAssessment};
use super::error::{HazardQuantity, PlanningError};

/// Sizes the herd-immunity campaign a district would need and the staff gap it faces.
///
/// Each site runs `stations_per_site` administering stations for `site_hours_open`
/// hours a day and needs `staff_per_site` people (two administering, one recording,
/// one mobilizing).
pub struct CampaignEstimator<'a> {
    config: &'a PlanningConfig,
}

impl<'a> CampaignEstimator<'a> {
    pub fn new(config: &'a PlanningConfig) -> Self {
        Self { config }
    }

    pub fn estimate(
        &self,
        district: &DistrictRecord,
        assessment: &PriorityAssessment,
    ) -> Result<CampaignEstimate, PlanningError> {
        let minutes = district.minutes_to_administer_one_dose;
        if !minutes.is_finite() || minutes <= 0.0 {
            return Err(PlanningError::hazard(
                &district.id,
                HazardQuantity::MinutesPerDose,
                minutes,
            ));
        }

        let doses_per_day = self.config.site_hours_open
            * 60.0
            * (1.0 / minutes)
            * self.config.stations_per_site
            * district.vaccine_site_count as f64;
        if doses_per_day <= 0.0 {
            return Err(PlanningError::hazard(
                &district.id,
                HazardQuantity::DosesPerDay,
                doses_per_day,
            ));
        }

        let still_needed = assessment.true_population * self.config.herd_immunity_threshold
            - district.vaccinated_count as f64;
        let campaign_length_days = (still_needed / doses_per_day).floor().max(0.0) as u64;

        let staff_required = district.vaccine_site_count * self.config.staff_per_site;
        let additional_staff_needed = staff_required.saturating_sub(district.staff_count);

        Ok(CampaignEstimate {
            campaign_length_days,
            additional_staff_needed,
            doses_per_day,
        })
    }
}
