use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::{JsonRejection, PathRejection, QueryRejection}},
    routing::{delete, get, patch, put},
};
use uuid::Uuid;

use crate::{
    dto::{menu::MenuList, messages::MessageList, settings::UpdateSettingRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Message, Setting},
    response::ApiResponse,
    routes::params::MessageListQuery,
    services::{menu_service, message_service, settings_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/menu", get(list_all_menu))
        .route("/settings/{key}", put(update_setting))
        .route("/messages", get(list_messages))
        .route("/messages/{id}/read", patch(mark_message_read))
        .route("/messages/{id}", delete(delete_message))
}

#[utoipa::path(
    get,
    path = "/api/admin/menu",
    responses(
        (status = 200, description = "All menu items, including hidden ones", body = ApiResponse<MenuList>),
        (status = 401, description = "Not logged in"),
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Admin"
)]
pub async fn list_all_menu(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<MenuList>>> {
    let resp = menu_service::list_all_menu(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/settings/{key}",
    params(("key" = String, Path, description = "Setting key, e.g. delivery_fee")),
    request_body = UpdateSettingRequest,
    responses(
        (status = 200, description = "Setting stored", body = ApiResponse<Setting>),
        (status = 400, description = "Invalid value"),
        (status = 403, description = "Admin only"),
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Admin"
)]
pub async fn update_setting(
    State(state): State<AppState>,
    user: AuthUser,
    key: Result<Path<String>, PathRejection>,
    payload: Result<Json<UpdateSettingRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<Setting>>> {
    let Path(key) = key?;
    let Json(payload) = payload?;
    let resp = settings_service::update_setting(&state, &user, key, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/messages",
    params(MessageListQuery),
    responses(
        (status = 200, description = "Contact messages, newest first", body = ApiResponse<MessageList>),
        (status = 401, description = "Not logged in"),
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Admin"
)]
pub async fn list_messages(
    State(state): State<AppState>,
    user: AuthUser,
    query: Result<Query<MessageListQuery>, QueryRejection>,
) -> AppResult<Json<ApiResponse<MessageList>>> {
    let Query(query) = query?;
    let resp = message_service::list_messages(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/messages/{id}/read",
    params(("id" = Uuid, Path, description = "Message ID")),
    responses(
        (status = 200, description = "Message marked as read", body = ApiResponse<Message>),
        (status = 404, description = "Message not found"),
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Admin"
)]
pub async fn mark_message_read(
    State(state): State<AppState>,
    user: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<ApiResponse<Message>>> {
    let Path(id) = id?;
    let resp = message_service::mark_read(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/messages/{id}",
    params(("id" = Uuid, Path, description = "Message ID")),
    responses(
        (status = 200, description = "Message deleted"),
        (status = 404, description = "Message not found"),
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Admin"
)]
pub async fn delete_message(
    State(state): State<AppState>,
    user: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let Path(id) = id?;
    let resp = message_service::delete_message(&state, &user, id).await?;
    Ok(Json(resp))
}
