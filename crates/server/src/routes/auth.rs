use axum::{Router, response::Json as ResponseJson, routing::get};
use db::models::user::User;
use utils::response::ApiResponse;

use crate::{AppState, auth::CurrentUser};

pub async fn current_user(CurrentUser(user): CurrentUser) -> ResponseJson<ApiResponse<User>> {
    ResponseJson(ApiResponse::success(user))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/auth/me", get(current_user))
}
