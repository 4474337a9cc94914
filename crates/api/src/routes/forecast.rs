//! Prediction Route

use axum::extract::rejection::JsonRejection;
use axum::{extract::State, Json};
use data_validator::RawRecord;
use inference_engine::{Forecast, RainLabel};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

use crate::error::ApiError;
use crate::AppState;

/// Rendering-ready forecast
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub label: RainLabel,
    /// Probability of `label`
    pub probability: f64,
    pub probabilities: BTreeMap<String, f64>,
    pub headline: &'static str,
    /// e.g. "Rain probability: 78.5%"
    pub summary: String,
}

impl From<Forecast> for PredictResponse {
    fn from(forecast: Forecast) -> Self {
        let prefix = match forecast.label {
            RainLabel::Yes => "Rain probability",
            RainLabel::No => "No-rain probability",
        };
        Self {
            label: forecast.label,
            probability: forecast.probability,
            summary: format!("{}: {:.1}%", prefix, forecast.probability * 100.0),
            headline: forecast.headline(),
            probabilities: forecast.probabilities,
        }
    }
}

/// Forecast rain for one submitted record
pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RawRecord>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(record) = payload.map_err(|e| {
        metrics::counter!("rain_forecast_rejected_total", "kind" => "body").increment(1);
        ApiError::from(e)
    })?;
    let forecast = match state.forecaster.forecast(&record) {
        Ok(forecast) => forecast,
        Err(e) => {
            let kind = if e.is_input_error() { "input" } else { "model" };
            metrics::counter!("rain_forecast_rejected_total", "kind" => kind).increment(1);
            return Err(e.into());
        }
    };

    metrics::counter!("rain_forecast_predictions_total", "label" => forecast.label.as_str()).increment(1);
    metrics::histogram!("rain_forecast_latency_seconds").record(forecast.latency_us as f64 / 1e6);
    info!(
        "Forecast {} with p={:.3} in {}us",
        forecast.label.as_str(),
        forecast.probability,
        forecast.latency_us
    );

    Ok(Json(forecast.into()))
}
