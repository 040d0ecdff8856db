use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::services::{
    care::CareError, care_guide::CareGuideError, identity::IdentityError,
    recommendation::RecommendationError,
};
use thiserror::Error;
use tracing::error;
use utils::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Care(#[from] CareError),
    #[error(transparent)]
    Recommendation(#[from] RecommendationError),
    #[error(transparent)]
    CareGuide(#[from] CareGuideError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

fn care_status(err: &CareError) -> StatusCode {
    match err {
        CareError::PlantNotFound | CareError::ReminderNotFound => StatusCode::NOT_FOUND,
        CareError::Forbidden => StatusCode::FORBIDDEN,
        CareError::Validation(_) => StatusCode::BAD_REQUEST,
        CareError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Care(err) => care_status(err),
            ApiError::Recommendation(err) => match err {
                RecommendationError::Care(inner) => care_status(inner),
                RecommendationError::NotFound => StatusCode::NOT_FOUND,
                RecommendationError::Forbidden => StatusCode::FORBIDDEN,
                RecommendationError::Validation(_) => StatusCode::BAD_REQUEST,
                RecommendationError::Database(_) | RecommendationError::CareGuide(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiError::Identity(IdentityError::Database(_) | IdentityError::ProvisioningConflict) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Identity(_) | ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Database(_) | ApiError::CareGuide(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        // Internal details stay in the logs
        let message = if status_code.is_server_error() {
            error!(error = %self, "Request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let response = ApiResponse::<()>::error(&message);
        (status_code, Json(response)).into_response()
    }
}
