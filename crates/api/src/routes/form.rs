//! Form Description Route

use axum::{extract::State, Json};
use feature_engine::FieldDescriptor;
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;

/// Page title
pub const TITLE: &str = "Rain Forecast in Australia";

/// Usage notes shown above the form
pub const INSTRUCTIONS: &str = "Enter weather data for today, submit the form, \
and read the forecast together with its confidence.";

/// Response for the form endpoint
#[derive(Debug, Serialize)]
pub struct FormResponse {
    pub title: &'static str,
    pub instructions: &'static str,
    pub fields: Vec<FieldDescriptor>,
}

/// Describe the fields the form must collect, in display order
pub async fn get_form(State(state): State<Arc<AppState>>) -> Json<FormResponse> {
    Json(FormResponse {
        title: TITLE,
        instructions: INSTRUCTIONS,
        fields: state.forecaster.bundle().schema().fields().to_vec(),
    })
}
