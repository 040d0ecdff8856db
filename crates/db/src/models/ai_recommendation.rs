use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, types::Json};
use ts_rs::TS;
use uuid::Uuid;

/// Stored care guide produced by the recommendation generator
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct AiRecommendation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plant_id: Option<Uuid>, // Cleared when the plant is deleted
    pub title: String,
    pub content: String,
    #[sqlx(json)]
    pub tags: Vec<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateAiRecommendation {
    pub plant_id: Option<Uuid>,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

impl AiRecommendation {
    pub async fn create(
        pool: &SqlitePool,
        data: &CreateAiRecommendation,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, AiRecommendation>(
            r#"INSERT INTO ai_recommendations (id, user_id, plant_id, title, content, tags)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING id, user_id, plant_id, title, content, tags, read, created_at, updated_at"#,
        )
        .bind(id)
        .bind(user_id)
        .bind(data.plant_id)
        .bind(&data.title)
        .bind(&data.content)
        .bind(Json(data.tags.clone()))
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, AiRecommendation>(
            r#"SELECT id, user_id, plant_id, title, content, tags, read, created_at, updated_at
               FROM ai_recommendations
               WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_user_id(
        pool: &SqlitePool,
        user_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, AiRecommendation>(
            r#"SELECT id, user_id, plant_id, title, content, tags, read, created_at, updated_at
               FROM ai_recommendations
               WHERE user_id = $1
               ORDER BY created_at DESC, rowid DESC"#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_plant_id(
        pool: &SqlitePool,
        plant_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, AiRecommendation>(
            r#"SELECT id, user_id, plant_id, title, content, tags, read, created_at, updated_at
               FROM ai_recommendations
               WHERE plant_id = $1
               ORDER BY created_at DESC, rowid DESC"#,
        )
        .bind(plant_id)
        .fetch_all(pool)
        .await
    }

    pub async fn mark_read(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, AiRecommendation>(
            r#"UPDATE ai_recommendations
               SET read = 1,
                   updated_at = datetime('now', 'subsec')
               WHERE id = $1
               RETURNING id, user_id, plant_id, title, content, tags, read, created_at, updated_at"#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        DBService,
        models::plant::{
            Plant,
            tests::{monstera, seed_user},
        },
    };

    fn recommendation(plant_id: Option<Uuid>) -> CreateAiRecommendation {
        CreateAiRecommendation {
            plant_id,
            title: "Care tips for your Monstera".to_string(),
            content: "# Monstera Care Guide".to_string(),
            tags: vec!["watering".to_string(), "humidity".to_string()],
        }
    }

    #[tokio::test]
    async fn tags_survive_storage() {
        let db = DBService::new_in_memory().await.unwrap();
        let user = seed_user(&db.pool, "ann").await;
        let created = AiRecommendation::create(&db.pool, &recommendation(None), Uuid::new_v4(), user.id)
            .await
            .unwrap();

        let stored = AiRecommendation::find_by_id(&db.pool, created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.tags, vec!["watering", "humidity"]);
        assert!(!stored.read);
    }

    #[tokio::test]
    async fn mark_read_flips_flag() {
        let db = DBService::new_in_memory().await.unwrap();
        let user = seed_user(&db.pool, "ann").await;
        let created = AiRecommendation::create(&db.pool, &recommendation(None), Uuid::new_v4(), user.id)
            .await
            .unwrap();

        let read = AiRecommendation::mark_read(&db.pool, created.id).await.unwrap().unwrap();
        assert!(read.read);
        assert!(AiRecommendation::mark_read(&db.pool, Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn deleting_plant_detaches_recommendation() {
        let db = DBService::new_in_memory().await.unwrap();
        let user = seed_user(&db.pool, "ann").await;
        let plant = Plant::create(&db.pool, &monstera(), Uuid::new_v4(), user.id)
            .await
            .unwrap();
        let created = AiRecommendation::create(&db.pool, &recommendation(Some(plant.id)), Uuid::new_v4(), user.id)
            .await
            .unwrap();
        assert_eq!(AiRecommendation::find_by_plant_id(&db.pool, plant.id).await.unwrap().len(), 1);

        Plant::delete(&db.pool, plant.id).await.unwrap();

        let detached = AiRecommendation::find_by_id(&db.pool, created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(detached.plant_id, None);
        assert_eq!(AiRecommendation::find_by_user_id(&db.pool, user.id).await.unwrap().len(), 1);
    }
}
