use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json as ResponseJson,
    routing::get,
};
use chrono::Utc;
use db::models::{
    care_log::CareLog,
    plant::{CreatePlant, Plant, UpdatePlant},
};
use serde::{Deserialize, Serialize};
use services::services::{
    care::CareService,
    care_guide,
    watering::{PlantWithStatus, suggest_water_frequency},
};
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{
    AppState,
    auth::CurrentUser,
    error::ApiError,
    extract::{Json, Path, Query},
};

#[derive(Debug, Deserialize)]
pub struct SuggestFrequencyQuery {
    pub name: String,
    pub species: Option<String>,
}

#[derive(Debug, Serialize, TS)]
pub struct FrequencySuggestion {
    pub water_frequency: i32,
}

#[derive(Debug, Serialize, TS)]
pub struct CareInstructions {
    pub plant_id: Uuid,
    pub instructions: String,
}

pub async fn get_plants(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<ResponseJson<ApiResponse<Vec<PlantWithStatus>>>, ApiError> {
    let plants = CareService::list_plants(&state.db().pool, user.id, Utc::now()).await?;
    Ok(ResponseJson(ApiResponse::success(plants)))
}

pub async fn create_plant(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreatePlant>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<Plant>>), ApiError> {
    let plant = CareService::create_plant(&state.db().pool, user.id, &payload, Utc::now()).await?;
    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(plant))))
}

pub async fn suggest_frequency(
    CurrentUser(_): CurrentUser,
    Query(query): Query<SuggestFrequencyQuery>,
) -> ResponseJson<ApiResponse<FrequencySuggestion>> {
    let water_frequency = suggest_water_frequency(&query.name, query.species.as_deref());
    ResponseJson(ApiResponse::success(FrequencySuggestion { water_frequency }))
}

pub async fn get_plant(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(plant_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<PlantWithStatus>>, ApiError> {
    let plant = CareService::get_plant(&state.db().pool, plant_id, user.id, Utc::now()).await?;
    Ok(ResponseJson(ApiResponse::success(plant)))
}

pub async fn update_plant(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(plant_id): Path<Uuid>,
    Json(payload): Json<UpdatePlant>,
) -> Result<ResponseJson<ApiResponse<Plant>>, ApiError> {
    let plant = CareService::update_plant(&state.db().pool, plant_id, user.id, payload).await?;
    Ok(ResponseJson(ApiResponse::success(plant)))
}

pub async fn delete_plant(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(plant_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    CareService::delete_plant(&state.db().pool, plant_id, user.id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn get_plant_care_logs(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(plant_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<CareLog>>>, ApiError> {
    let logs = CareService::care_logs_for_plant(&state.db().pool, plant_id, user.id).await?;
    Ok(ResponseJson(ApiResponse::success(logs)))
}

pub async fn get_care_instructions(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(plant_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<CareInstructions>>, ApiError> {
    let plant = CareService::owned_plant(&state.db().pool, plant_id, user.id).await?;
    let instructions = care_guide::basic_instructions(&plant.name, plant.species.as_deref())?;
    Ok(ResponseJson(ApiResponse::success(CareInstructions {
        plant_id: plant.id,
        instructions,
    })))
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/plants",
        Router::new()
            .route("/", get(get_plants).post(create_plant))
            .route("/suggest-frequency", get(suggest_frequency))
            .route(
                "/{plant_id}",
                get(get_plant).put(update_plant).delete(delete_plant),
            )
            .route("/{plant_id}/care-logs", get(get_plant_care_logs))
            .route("/{plant_id}/care-instructions", get(get_care_instructions)),
    )
}
