use axum::http::{header, HeaderValue, Method};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use vaccine_planner::config::ConfigError;
use vaccine_planner::ingest::DemographicStore;
use vaccine_planner::CampaignPlanner;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) store: Arc<dyn DemographicStore>,
    pub(crate) planner: Arc<CampaignPlanner>,
}

/// Browser access for the upload form; `*` opens the API to any origin.
pub(crate) fn cors_layer(origin: &str) -> Result<CorsLayer, ConfigError> {
    let allowed = if origin.trim() == "*" {
        AllowOrigin::from(Any)
    } else {
        let value =
            HeaderValue::from_str(origin.trim()).map_err(|_| ConfigError::InvalidCorsOrigin {
                value: origin.to_string(),
            })?;
        AllowOrigin::exact(value)
    };

    Ok(CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(allowed))
}
