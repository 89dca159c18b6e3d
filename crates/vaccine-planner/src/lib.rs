//! Vaccine campaign planning: district risk scoring, campaign sizing, and
//! priority-ordered allocation of a finite dose budget.

pub mod config;
pub mod error;
pub mod ingest;
pub mod planning;
pub mod telemetry;

pub use planning::{compute_allocation, CampaignPlanner};
