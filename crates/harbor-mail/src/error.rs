use crate::audience::CoverageImportError;
use crate::campaigns::{CampaignServiceError, DraftIncomplete, RepositoryError};
use crate::config::ConfigError;
use crate::fulfillment::FulfillmentError;
use crate::reports::ReportError;
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
    Server(axum::Error),
    Coverage(CoverageImportError),
    Fulfillment(FulfillmentError),
    Campaign(CampaignServiceError),
    Draft(DraftIncomplete),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Coverage(err) => write!(f, "coverage import error: {}", err),
            AppError::Fulfillment(err) => write!(f, "fulfillment error: {}", err),
            AppError::Campaign(err) => write!(f, "campaign error: {}", err),
            AppError::Draft(err) => write!(f, "incomplete campaign draft: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Coverage(err) => Some(err),
            AppError::Fulfillment(err) => Some(err),
            AppError::Campaign(err) => Some(err),
            AppError::Draft(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Coverage(_) => StatusCode::BAD_REQUEST,
            AppError::Fulfillment(FulfillmentError::UnknownJob(_)) => StatusCode::NOT_FOUND,
            AppError::Fulfillment(_) => StatusCode::BAD_GATEWAY,
            AppError::Campaign(ref err) => err.status_code(),
            AppError::Draft(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

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

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<CoverageImportError> for AppError {
    fn from(value: CoverageImportError) -> Self {
        Self::Coverage(value)
    }
}

impl From<FulfillmentError> for AppError {
    fn from(value: FulfillmentError) -> Self {
        Self::Fulfillment(value)
    }
}

impl From<CampaignServiceError> for AppError {
    fn from(value: CampaignServiceError) -> Self {
        Self::Campaign(value)
    }
}

impl From<RepositoryError> for AppError {
    fn from(value: RepositoryError) -> Self {
        Self::Campaign(CampaignServiceError::Repository(value))
    }
}

impl From<ReportError> for AppError {
    fn from(value: ReportError) -> Self {
        match value {
            ReportError::Forbidden(err) => Self::Campaign(err.into()),
            ReportError::Repository(err) => err.into(),
        }
    }
}

impl From<DraftIncomplete> for AppError {
    fn from(value: DraftIncomplete) -> Self {
        Self::Draft(value)
    }
}
