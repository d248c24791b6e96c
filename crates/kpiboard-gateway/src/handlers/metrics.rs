//! `GET /api/metrics` and `POST /admin/metrics`.

use axum::{body::Bytes, extract::State, Json};

use kpiboard_core::MetricsRecord;

use super::blocking;
use crate::app_state::AppState;
use crate::error::ApiError;

pub async fn get(State(state): State<AppState>) -> Result<Json<MetricsRecord>, ApiError> {
    let store = state.metrics_store();
    let record = blocking(move || Ok(store.load())).await?;
    Ok(Json(record))
}

/// The body is decoded by the store itself so a malformed payload surfaces
/// as a validation error rather than an extractor rejection.
pub async fn save(State(state): State<AppState>, body: Bytes) -> Result<Json<MetricsRecord>, ApiError> {
    let store = state.metrics_store();
    let record = blocking(move || store.save_json(&body)).await?;
    state.obs().metrics_saves.inc(&[]);
    Ok(Json(record))
}
