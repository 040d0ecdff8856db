use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json as ResponseJson,
    routing::{get, post},
};
use chrono::{NaiveDate, Utc};
use db::models::reminder::{CreateReminder, Reminder};
use serde::Deserialize;
use services::services::{
    calendar::{CalendarDay, CalendarWindow},
    care::CareService,
};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{
    AppState,
    auth::CurrentUser,
    error::ApiError,
    extract::{Json, Path, Query},
};

const DEFAULT_CALENDAR_DAYS: u32 = 7;

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    /// First day shown; defaults to the Sunday of the current week
    pub start: Option<NaiveDate>,
    pub days: Option<u32>,
}

pub async fn get_reminders(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<ResponseJson<ApiResponse<Vec<Reminder>>>, ApiError> {
    let reminders = Reminder::find_by_user_id(&state.db().pool, user.id).await?;
    Ok(ResponseJson(ApiResponse::success(reminders)))
}

pub async fn get_upcoming_reminders(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<ResponseJson<ApiResponse<Vec<Reminder>>>, ApiError> {
    let reminders =
        Reminder::find_upcoming_by_user_id(&state.db().pool, user.id, Utc::now()).await?;
    Ok(ResponseJson(ApiResponse::success(reminders)))
}

pub async fn get_calendar(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<CalendarQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<CalendarDay>>>, ApiError> {
    let days = query.days.unwrap_or(DEFAULT_CALENDAR_DAYS);
    let window = match query.start {
        Some(start) => CalendarWindow::new(start, days),
        None => CalendarWindow::for_week_of(Utc::now().date_naive(), days),
    };
    let calendar = CareService::calendar(&state.db().pool, user.id, window).await?;
    Ok(ResponseJson(ApiResponse::success(calendar)))
}

pub async fn create_reminder(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateReminder>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<Reminder>>), ApiError> {
    let reminder = CareService::create_reminder(&state.db().pool, user.id, &payload).await?;
    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(reminder))))
}

pub async fn complete_reminder(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(reminder_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Reminder>>, ApiError> {
    let reminder =
        CareService::complete_reminder(&state.db().pool, reminder_id, user.id, Utc::now()).await?;
    Ok(ResponseJson(ApiResponse::success(reminder)))
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/reminders",
        Router::new()
            .route("/", get(get_reminders).post(create_reminder))
            .route("/upcoming", get(get_upcoming_reminders))
            .route("/calendar", get(get_calendar))
            .route("/{reminder_id}/complete", post(complete_reminder)),
    )
}
