use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

/// Kind of care performed on a plant
#[derive(Debug, Clone, Copy, Type, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display)]
#[sqlx(type_name = "activity_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ActivityType {
    Watering,
    Fertilizing,
    Pruning,
    Repotting,
    Misting,
}

/// A performed care activity. Rows are never updated after insert.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct CareLog {
    pub id: Uuid,
    pub plant_id: Uuid,
    pub user_id: Uuid,
    pub activity_type: ActivityType,
    pub notes: Option<String>,
    pub performed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateCareLog {
    pub plant_id: Uuid,
    pub activity_type: ActivityType,
    pub notes: Option<String>,
}

impl CareLog {
    pub async fn create<'e, E>(
        executor: E,
        data: &CreateCareLog,
        id: Uuid,
        user_id: Uuid,
        performed_at: DateTime<Utc>,
    ) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, CareLog>(
            r#"INSERT INTO care_logs (id, plant_id, user_id, activity_type, notes, performed_at)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING id, plant_id, user_id, activity_type, notes, performed_at"#,
        )
        .bind(id)
        .bind(data.plant_id)
        .bind(user_id)
        .bind(data.activity_type)
        .bind(&data.notes)
        .bind(performed_at)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_plant_id(
        pool: &SqlitePool,
        plant_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, CareLog>(
            r#"SELECT id, plant_id, user_id, activity_type, notes, performed_at
               FROM care_logs
               WHERE plant_id = $1
               ORDER BY julianday(performed_at) DESC, rowid DESC"#,
        )
        .bind(plant_id)
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_user_id(
        pool: &SqlitePool,
        user_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, CareLog>(
            r#"SELECT id, plant_id, user_id, activity_type, notes, performed_at
               FROM care_logs
               WHERE user_id = $1
               ORDER BY julianday(performed_at) DESC, rowid DESC"#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
