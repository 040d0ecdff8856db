use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json as ResponseJson,
    routing::post,
};
use chrono::Utc;
use db::models::care_log::{CareLog, CreateCareLog};
use services::services::care::CareService;
use utils::response::ApiResponse;

use crate::{AppState, auth::CurrentUser, error::ApiError, extract::Json};

pub async fn create_care_log(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateCareLog>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<CareLog>>), ApiError> {
    let log = CareService::log_care(&state.db().pool, user.id, &payload, Utc::now()).await?;
    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(log))))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/care-logs", post(create_care_log))
}
