use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::settings::SettingList, error::AppResult, response::ApiResponse,
    services::settings_service, state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_settings))
}

#[utoipa::path(
    get,
    path = "/api/settings",
    responses(
        (status = 200, description = "Public café settings", body = ApiResponse<SettingList>),
    ),
    tag = "Settings"
)]
pub async fn list_settings(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<SettingList>>> {
    let resp = settings_service::list_settings(&state).await?;
    Ok(Json(resp))
}
