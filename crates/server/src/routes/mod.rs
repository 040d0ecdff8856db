use axum::Router;

use crate::AppState;

pub mod ai_recommendations;
pub mod auth;
pub mod care_logs;
pub mod health;
pub mod plants;
pub mod reminders;

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(plants::router())
        .merge(care_logs::router())
        .merge(reminders::router())
        .merge(ai_recommendations::router());

    Router::new().nest("/api", api).with_state(state)
}
