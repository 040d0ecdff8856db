use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

/// How much light a plant wants
#[derive(Debug, Clone, Copy, Type, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display)]
#[sqlx(type_name = "light_needs", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum LightNeeds {
    Low,
    Medium,
    BrightIndirect,
    FullSun,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Plant {
    pub id: Uuid,
    pub user_id: Uuid, // Foreign key to User
    pub name: String,
    pub species: Option<String>,
    pub image_url: Option<String>,
    pub water_frequency: i32, // Days between waterings
    pub light_needs: LightNeeds,
    pub care_notes: Option<String>,
    pub last_watered: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreatePlant {
    pub name: String,
    pub species: Option<String>,
    pub image_url: Option<String>,
    pub water_frequency: i32,
    pub light_needs: LightNeeds,
    pub care_notes: Option<String>,
}

/// Partial update; absent fields keep their stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct UpdatePlant {
    pub name: Option<String>,
    pub species: Option<String>,
    pub image_url: Option<String>,
    pub water_frequency: Option<i32>,
    pub light_needs: Option<LightNeeds>,
    pub care_notes: Option<String>,
    pub last_watered: Option<DateTime<Utc>>,
}

impl Plant {
    /// Copy of this plant with the fields present in `update` applied
    pub fn merged_with(&self, update: UpdatePlant) -> Plant {
        Plant {
            name: update.name.unwrap_or_else(|| self.name.clone()),
            species: update.species.or_else(|| self.species.clone()),
            image_url: update.image_url.or_else(|| self.image_url.clone()),
            water_frequency: update.water_frequency.unwrap_or(self.water_frequency),
            light_needs: update.light_needs.unwrap_or(self.light_needs),
            care_notes: update.care_notes.or_else(|| self.care_notes.clone()),
            last_watered: update.last_watered.or(self.last_watered),
            ..self.clone()
        }
    }

    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Plant>(
            r#"SELECT id, user_id, name, species, image_url, water_frequency, light_needs,
                      care_notes, last_watered, created_at
               FROM plants
               WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    pub async fn find_by_user_id(
        pool: &SqlitePool,
        user_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Plant>(
            r#"SELECT id, user_id, name, species, image_url, water_frequency, light_needs,
                      care_notes, last_watered, created_at
               FROM plants
               WHERE user_id = $1
               ORDER BY created_at DESC, rowid DESC"#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn create<'e, E>(
        executor: E,
        data: &CreatePlant,
        plant_id: Uuid,
        user_id: Uuid,
    ) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Plant>(
            r#"INSERT INTO plants (id, user_id, name, species, image_url, water_frequency, light_needs, care_notes)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING id, user_id, name, species, image_url, water_frequency, light_needs,
                         care_notes, last_watered, created_at"#,
        )
        .bind(plant_id)
        .bind(user_id)
        .bind(&data.name)
        .bind(&data.species)
        .bind(&data.image_url)
        .bind(data.water_frequency)
        .bind(data.light_needs)
        .bind(&data.care_notes)
        .fetch_one(executor)
        .await
    }

    /// Write every mutable column of `plant` back to its row
    pub async fn update(pool: &SqlitePool, plant: &Plant) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Plant>(
            r#"UPDATE plants
               SET name = $2, species = $3, image_url = $4, water_frequency = $5,
                   light_needs = $6, care_notes = $7, last_watered = $8
               WHERE id = $1
               RETURNING id, user_id, name, species, image_url, water_frequency, light_needs,
                         care_notes, last_watered, created_at"#,
        )
        .bind(plant.id)
        .bind(&plant.name)
        .bind(&plant.species)
        .bind(&plant.image_url)
        .bind(plant.water_frequency)
        .bind(plant.light_needs)
        .bind(&plant.care_notes)
        .bind(plant.last_watered)
        .fetch_one(pool)
        .await
    }

    pub async fn set_last_watered<'e, E>(
        executor: E,
        id: Uuid,
        watered_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query("UPDATE plants SET last_watered = $2 WHERE id = $1")
            .bind(id)
            .bind(watered_at)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM plants WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
