use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::ai_recommendation::AiRecommendation;
use services::services::recommendation::{GenerateRecommendation, RecommendationService};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{
    AppState,
    auth::CurrentUser,
    error::ApiError,
    extract::{Json, Path},
};

pub async fn get_recommendations(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<ResponseJson<ApiResponse<Vec<AiRecommendation>>>, ApiError> {
    let recommendations = RecommendationService::list(&state.db().pool, user.id).await?;
    Ok(ResponseJson(ApiResponse::success(recommendations)))
}

pub async fn generate_recommendation(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<GenerateRecommendation>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<AiRecommendation>>), ApiError> {
    let recommendation =
        RecommendationService::generate(&state.db().pool, user.id, &payload).await?;
    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(recommendation))))
}

pub async fn mark_recommendation_read(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(recommendation_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<AiRecommendation>>, ApiError> {
    let recommendation =
        RecommendationService::mark_read(&state.db().pool, recommendation_id, user.id).await?;
    Ok(ResponseJson(ApiResponse::success(recommendation)))
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/ai-recommendations",
        Router::new()
            .route("/", get(get_recommendations))
            .route("/generate", post(generate_recommendation))
            .route("/{recommendation_id}/read", post(mark_recommendation_read)),
    )
}
