use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Type, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display)]
#[sqlx(type_name = "reminder_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReminderType {
    Watering,
    Fertilizing,
    Pruning,
    Repotting,
    Other,
}

/// A scheduled care task for one plant
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Reminder {
    pub id: Uuid,
    pub plant_id: Uuid,
    pub user_id: Uuid,
    pub reminder_type: ReminderType,
    pub due_date: DateTime<Utc>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateReminder {
    pub plant_id: Uuid,
    pub reminder_type: ReminderType,
    pub due_date: DateTime<Utc>,
}

impl Reminder {
    pub async fn create<'e, E>(
        executor: E,
        data: &CreateReminder,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Reminder>(
            r#"INSERT INTO reminders (id, plant_id, user_id, reminder_type, due_date)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, plant_id, user_id, reminder_type, due_date, completed,
                         created_at, completed_at"#,
        )
        .bind(id)
        .bind(data.plant_id)
        .bind(user_id)
        .bind(data.reminder_type)
        .bind(data.due_date)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Reminder>(
            r#"SELECT id, plant_id, user_id, reminder_type, due_date, completed,
                      created_at, completed_at
               FROM reminders
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
        sqlx::query_as::<_, Reminder>(
            r#"SELECT id, plant_id, user_id, reminder_type, due_date, completed,
                      created_at, completed_at
               FROM reminders
               WHERE user_id = $1
               ORDER BY julianday(due_date) ASC, rowid ASC"#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Open reminders due at or after `now`, soonest first
    pub async fn find_upcoming_by_user_id(
        pool: &SqlitePool,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Reminder>(
            r#"SELECT id, plant_id, user_id, reminder_type, due_date, completed,
                      created_at, completed_at
               FROM reminders
               WHERE user_id = $1
                 AND completed = 0
                 AND julianday(due_date) >= julianday($2)
               ORDER BY julianday(due_date) ASC, rowid ASC"#,
        )
        .bind(user_id)
        .bind(now)
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_plant_id(
        pool: &SqlitePool,
        plant_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Reminder>(
            r#"SELECT id, plant_id, user_id, reminder_type, due_date, completed,
                      created_at, completed_at
               FROM reminders
               WHERE plant_id = $1
               ORDER BY julianday(due_date) ASC, rowid ASC"#,
        )
        .bind(plant_id)
        .fetch_all(pool)
        .await
    }

    /// Reminders due in the half-open window `[start, end)`
    pub async fn find_in_range(
        pool: &SqlitePool,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Reminder>(
            r#"SELECT id, plant_id, user_id, reminder_type, due_date, completed,
                      created_at, completed_at
               FROM reminders
               WHERE user_id = $1
                 AND julianday(due_date) >= julianday($2)
                 AND julianday(due_date) < julianday($3)
               ORDER BY julianday(due_date) ASC, rowid ASC"#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await
    }

    /// Mark complete. A reminder that is already complete keeps its original
    /// `completed_at`.
    pub async fn mark_completed(
        pool: &SqlitePool,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Reminder>(
            r#"UPDATE reminders
               SET completed = 1,
                   completed_at = COALESCE(completed_at, $2)
               WHERE id = $1
               RETURNING id, plant_id, user_id, reminder_type, due_date, completed,
                         created_at, completed_at"#,
        )
        .bind(id)
        .bind(now)
        .fetch_optional(pool)
        .await
    }
}
