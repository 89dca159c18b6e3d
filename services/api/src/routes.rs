use crate::infra::AppState;
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use vaccine_planner::error::AppError;
use vaccine_planner::ingest::{CampaignState, Country, DistrictDatasetImporter, PreviousCampaign};
use vaccine_planner::planning::{AllocationRecord, DistrictId};

/// Upload form payload: the state file fields plus both statistics files as CSV text.
#[derive(Debug, Deserialize)]
pub(crate) struct ResultsRequest {
    pub(crate) country: String,
    pub(crate) total_doses: u64,
    #[serde(default)]
    pub(crate) previous_campaigns: Vec<PreviousCampaign>,
    pub(crate) covid_csv: String,
    pub(crate) general_csv: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ResultsResponse {
    pub(crate) country: Country,
    pub(crate) generated_at: DateTime<Utc>,
    pub(crate) total_doses: u64,
    pub(crate) remaining_doses: u64,
    pub(crate) allocations: Vec<AllocationRecord>,
}

pub(crate) fn router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/countries", get(countries_endpoint))
        .route(
            "/api/v1/countries/:country/districts",
            get(districts_endpoint),
        )
        .route("/api/v1/results", post(results_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn countries_endpoint(
    Extension(state): Extension<AppState>,
) -> Result<Json<Vec<&'static str>>, AppError> {
    let countries = state.store.countries()?;
    Ok(Json(countries.into_iter().map(|country| country.name).collect()))
}

pub(crate) async fn districts_endpoint(
    Extension(state): Extension<AppState>,
    Path(country): Path<String>,
) -> Result<Json<Vec<DistrictId>>, AppError> {
    let country = Country::lookup(&country)?;
    Ok(Json(state.store.districts(country)?))
}

pub(crate) async fn results_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<ResultsRequest>,
) -> Result<Json<ResultsResponse>, AppError> {
    let ResultsRequest {
        country,
        total_doses,
        previous_campaigns,
        covid_csv,
        general_csv,
    } = payload;
    let campaign = CampaignState {
        country,
        total_doses,
        previous_campaigns,
    };

    let inputs = DistrictDatasetImporter::new(state.store.as_ref()).from_readers(
        covid_csv.as_bytes(),
        general_csv.as_bytes(),
        &campaign,
    )?;
    let plan = state.planner.plan(&inputs.districts, inputs.total_doses)?;

    info!(
        country = inputs.country.name,
        districts = plan.records.len(),
        allocated = plan.allocated_doses(),
        "allocation results served"
    );

    Ok(Json(ResultsResponse {
        country: inputs.country,
        generated_at: Utc::now(),
        total_doses: plan.total_doses,
        remaining_doses: plan.remaining_doses,
        allocations: plan.records,
    }))
}
