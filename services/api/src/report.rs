use std::fmt;
use vaccine_planner::ingest::Country;
use vaccine_planner::planning::AllocationPlan;

const HEADERS: [&str; 6] = [
    "District",
    "Priority",
    "Days",
    "Doses",
    "To vaccinate",
    "Extra staff",
];

/// Plain-text rendering of an allocation plan for the terminal.
pub(crate) struct AllocationTable<'a> {
    country: Country,
    plan: &'a AllocationPlan,
}

impl<'a> AllocationTable<'a> {
    pub(crate) fn new(country: Country, plan: &'a AllocationPlan) -> Self {
        Self { country, plan }
    }
}

impl fmt::Display for AllocationTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let district_width = self
            .plan
            .records
            .iter()
            .map(|record| record.district_id.as_str().len())
            .chain(std::iter::once(HEADERS[0].len()))
            .max()
            .unwrap_or(HEADERS[0].len());

        writeln!(f, "Vaccine allocation for {}", self.country.name)?;
        writeln!(
            f,
            "{:<district_width$}  {:>8}  {:>6}  {:>10}  {:>12}  {:>11}",
            HEADERS[0], HEADERS[1], HEADERS[2], HEADERS[3], HEADERS[4], HEADERS[5]
        )?;

        for record in &self.plan.records {
            writeln!(
                f,
                "{:<district_width$}  {:>8}  {:>6}  {:>10}  {:>12}  {:>11}",
                record.district_id.as_str(),
                record.priority.value(),
                record.campaign_length_days,
                record.doses_allocated,
                record.population_to_vaccinate,
                record.additional_staff_needed
            )?;
        }

        writeln!(
            f,
            "Allocated {} of {} doses, {} remaining",
            self.plan.allocated_doses(),
            self.plan.total_doses,
            self.plan.remaining_doses
        )
    }
}
