use crate::config::ConfigError;
use crate::ingest::{IngestError, StoreError};
use crate::planning::PlanningError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Ingest(IngestError),
    Planning(PlanningError),
    Store(StoreError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Store(StoreError::UnknownCountry(_))
            | AppError::Ingest(IngestError::Store(StoreError::UnknownCountry(_))) => {
                StatusCode::NOT_FOUND
            }
            AppError::Ingest(IngestError::Store(_)) | AppError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Ingest(_) | AppError::Planning(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_) | AppError::Telemetry(_) | AppError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Ingest(err) => write!(f, "input error: {}", err),
            AppError::Planning(err) => write!(f, "planning error: {}", err),
            AppError::Store(err) => write!(f, "demographic store error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Ingest(err) => Some(err),
            AppError::Planning(err) => Some(err),
            AppError::Store(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<IngestError> for AppError {
    fn from(value: IngestError) -> Self {
        Self::Ingest(value)
    }
}

impl From<PlanningError> for AppError {
    fn from(value: PlanningError) -> Self {
        Self::Planning(value)
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planning::DistrictId;

    #[test]
    fn unknown_country_maps_to_not_found() {
        let direct = AppError::from(StoreError::UnknownCountry("Narnia".to_string()));
        let nested = AppError::from(IngestError::Store(StoreError::UnknownCountry(
            "Narnia".to_string(),
        )));

        assert_eq!(direct.status(), StatusCode::NOT_FOUND);
        assert_eq!(nested.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn caller_mistakes_map_to_bad_request() {
        let planning = AppError::from(PlanningError::NoDistricts);
        let ingest = AppError::from(IngestError::InvalidDoseCount("many".to_string()));
        let duplicate = AppError::from(PlanningError::DuplicateDistrict(DistrictId::new("Gulu")));

        assert_eq!(planning.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ingest.status(), StatusCode::BAD_REQUEST);
        assert_eq!(duplicate.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_extracts_are_server_faults() {
        let error = AppError::from(StoreError::Unavailable {
            country: "Mali".to_string(),
            detail: "missing MAL_FACILITIES.csv".to_string(),
        });

        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn listener_failures_surface_as_io_errors() {
        let bind = std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken");
        let error = AppError::from(bind);

        assert!(matches!(error, AppError::Io(_)));
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.to_string(), "io error: port taken");
    }
}
