use crate::cli::ServeArgs;
use crate::infra::{cors_layer, AppState};
use crate::routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use vaccine_planner::config::AppConfig;
use vaccine_planner::error::AppError;
use vaccine_planner::ingest::{CsvDemographicStore, DemographicStore};
use vaccine_planner::telemetry;
use vaccine_planner::CampaignPlanner;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let store = CsvDemographicStore::new(config.data.directory.clone());
    let available = store.countries()?;
    info!(
        data_dir = %config.data.directory.display(),
        countries = available.len(),
        "demographic extracts located"
    );

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        store: Arc::new(store),
        planner: Arc::new(CampaignPlanner::new(config.planning.clone())),
    };

    let app = routes::router()
        .layer(Extension(app_state))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.server.cors_origin)?)
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "vaccine campaign planner ready");

    axum::serve(listener, app).await?;
    Ok(())
}
