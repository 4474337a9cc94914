//! API Error Types

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use inference_engine::{ForecastError, InferenceError};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Shown to the user when the fault is on our side
const GENERIC_FAILURE: &str = "Prediction failed. Please check your input values.";

/// Errors surfaced by the server
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Model error: {0}")]
    Model(#[from] InferenceError),

    #[error(transparent)]
    Forecast(#[from] ForecastError),

    #[error("Unreadable request body: {0}")]
    Body(#[from] JsonRejection),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Forecast(ForecastError::Input(e)) => {
                warn!("Rejected record: {}", e);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorBody {
                        error: "invalid_input",
                        message: e.to_string(),
                        field: Some(e.field().to_string()),
                    },
                )
            }
            ApiError::Body(rejection) => {
                warn!("Rejected body: {}", rejection.body_text());
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorBody {
                        error: "invalid_input",
                        message: rejection.body_text(),
                        field: None,
                    },
                )
            }
            other => {
                error!("Request failed: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: "prediction_failed",
                        message: GENERIC_FAILURE.to_string(),
                        field: None,
                    },
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
