use crate::dtos::{MessageQuery, MessageView, MessagesResponse, PostMessageResponse};
use crate::services::FetchMode;
use crate::startup::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};
use serde_json::Value;
use service_core::error::AppError;

pub async fn post_message(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<PostMessageResponse>), AppError> {
    let Json(body) = payload.map_err(|e| {
        tracing::debug!("Rejected message body: {}", e);
        AppError::InvalidInput("Message content is required.".to_string())
    })?;

    let id = state.messages.post(&body).await?;

    Ok((
        StatusCode::CREATED,
        Json(PostMessageResponse {
            success: true,
            message_id: id.to_hex(),
        }),
    ))
}

pub async fn list_messages(
    State(state): State<AppState>,
    query: Result<Query<MessageQuery>, QueryRejection>,
) -> Result<Json<MessagesResponse>, AppError> {
    // An undecodable query string behaves like an empty one.
    let query = query.map(|Query(q)| q).unwrap_or_default();
    let mode = FetchMode::from(&query);

    let records = state.messages.fetch(mode).await?;
    Ok(Json(MessagesResponse {
        messages: records.into_iter().map(MessageView::from).collect(),
    }))
}
