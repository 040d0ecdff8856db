use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// Application user, linked to an identity at the external auth provider
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct User {
    pub id: Uuid,
    pub auth_id: String, // Subject claim issued by the identity provider
    pub username: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateUser {
    pub auth_id: String,
    pub username: String,
    pub email: Option<String>,
}

impl User {
    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"SELECT id, auth_id, username, email, created_at
               FROM users
               WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_auth_id(
        pool: &SqlitePool,
        auth_id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"SELECT id, auth_id, username, email, created_at
               FROM users
               WHERE auth_id = $1"#,
        )
        .bind(auth_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_email(
        pool: &SqlitePool,
        email: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"SELECT id, auth_id, username, email, created_at
               FROM users
               WHERE email = $1"#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_username(
        pool: &SqlitePool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"SELECT id, auth_id, username, email, created_at
               FROM users
               WHERE username = $1"#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreateUser,
        id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"INSERT INTO users (id, auth_id, username, email)
               VALUES ($1, $2, $3, $4)
               RETURNING id, auth_id, username, email, created_at"#,
        )
        .bind(id)
        .bind(&data.auth_id)
        .bind(&data.username)
        .bind(&data.email)
        .fetch_one(pool)
        .await
    }

    /// Point an existing user at a new identity-provider subject
    pub async fn link_auth_id(
        pool: &SqlitePool,
        id: Uuid,
        auth_id: &str,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"UPDATE users
               SET auth_id = $2
               WHERE id = $1
               RETURNING id, auth_id, username, email, created_at"#,
        )
        .bind(id)
        .bind(auth_id)
        .fetch_one(pool)
        .await
    }
}
