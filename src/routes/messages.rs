use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    routing::post,
};

use crate::{
    dto::messages::CreateMessageRequest, error::AppResult, models::Message,
    response::ApiResponse, services::message_service, state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(create_message))
}

#[utoipa::path(
    post,
    path = "/api/messages",
    request_body = CreateMessageRequest,
    responses(
        (status = 201, description = "Message stored", body = ApiResponse<Message>),
        (status = 400, description = "Name, email, and message are required", body = crate::error::ErrorBody),
    ),
    tag = "Messages"
)]
pub async fn create_message(
    State(state): State<AppState>,
    payload: Result<Json<CreateMessageRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<Message>>)> {
    let Json(payload) = payload?;
    let resp = message_service::create_message(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}
