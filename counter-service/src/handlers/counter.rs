use crate::dtos::CounterResponse;
use crate::startup::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;
use service_core::error::AppError;

pub async fn get_total(State(state): State<AppState>) -> Result<Json<CounterResponse>, AppError> {
    let total = state.counter.total().await?;
    Ok(Json(CounterResponse { total }))
}

pub async fn increment(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CounterResponse>, AppError> {
    let Json(body) = payload.map_err(|e| {
        tracing::debug!("Rejected counter body: {}", e);
        AppError::InvalidInput("incrementBy must be a positive integer".to_string())
    })?;

    let total = state.counter.increment(&body).await?;
    Ok(Json(CounterResponse { total }))
}
