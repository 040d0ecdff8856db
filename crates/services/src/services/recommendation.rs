use db::models::ai_recommendation::{AiRecommendation, CreateAiRecommendation};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;
use ts_rs::TS;
use uuid::Uuid;

use super::{
    care::{CareError, CareService},
    care_guide::{self, CareGuideError, GuideRequest},
};

#[derive(Debug, Error)]
pub enum RecommendationError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Care(#[from] CareError),
    #[error("care guide error: {0}")]
    CareGuide(#[from] CareGuideError),
    #[error("recommendation not found")]
    NotFound,
    #[error("resource belongs to another user")]
    Forbidden,
    #[error("{0}")]
    Validation(String),
}

/// Body of a generate request; `plant_id` links the result to a stored plant
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct GenerateRecommendation {
    pub plant_id: Option<Uuid>,
    pub plant_name: String,
    pub plant_species: Option<String>,
    pub care_issue: Option<String>,
    pub plant_description: Option<String>,
}

impl GenerateRecommendation {
    fn guide_request(&self) -> GuideRequest {
        GuideRequest {
            plant_name: self.plant_name.clone(),
            plant_species: self.plant_species.clone(),
            care_issue: self.care_issue.clone(),
            plant_description: self.plant_description.clone(),
        }
    }
}

pub struct RecommendationService;

impl RecommendationService {
    pub async fn list(
        pool: &SqlitePool,
        user_id: Uuid,
    ) -> Result<Vec<AiRecommendation>, RecommendationError> {
        Ok(AiRecommendation::find_by_user_id(pool, user_id).await?)
    }

    /// Build a care guide for the request and store it for `user_id`
    pub async fn generate(
        pool: &SqlitePool,
        user_id: Uuid,
        request: &GenerateRecommendation,
    ) -> Result<AiRecommendation, RecommendationError> {
        if request.plant_name.trim().is_empty() {
            return Err(RecommendationError::Validation(
                "Plant name must not be empty".to_string(),
            ));
        }
        if let Some(plant_id) = request.plant_id {
            CareService::owned_plant(pool, plant_id, user_id).await?;
        }

        let guide = care_guide::generate(&request.guide_request())?;
        let data = CreateAiRecommendation {
            plant_id: request.plant_id,
            title: care_guide::recommendation_title(
                &request.plant_name,
                request.care_issue.as_deref(),
            ),
            content: guide.content,
            tags: guide.tags,
        };

        let recommendation = AiRecommendation::create(pool, &data, Uuid::new_v4(), user_id).await?;
        info!(
            recommendation_id = %recommendation.id,
            user_id = %user_id,
            plant_id = ?recommendation.plant_id,
            "Care recommendation generated"
        );
        Ok(recommendation)
    }

    pub async fn mark_read(
        pool: &SqlitePool,
        recommendation_id: Uuid,
        user_id: Uuid,
    ) -> Result<AiRecommendation, RecommendationError> {
        let existing = AiRecommendation::find_by_id(pool, recommendation_id)
            .await?
            .ok_or(RecommendationError::NotFound)?;
        if existing.user_id != user_id {
            return Err(RecommendationError::Forbidden);
        }
        AiRecommendation::mark_read(pool, recommendation_id)
            .await?
            .ok_or(RecommendationError::NotFound)
    }
}
