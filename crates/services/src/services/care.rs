//! Plant, care-log and reminder operations scoped to a single user.
//!
//! Creating a plant schedules its first watering reminder; logging a watering
//! stamps `last_watered` and schedules the next one. Every plant-scoped call
//! checks ownership first: a missing row is [`CareError::PlantNotFound`], a
//! row owned by someone else is [`CareError::Forbidden`].

use chrono::{DateTime, Utc};
use db::models::{
    care_log::{ActivityType, CareLog, CreateCareLog},
    plant::{CreatePlant, Plant, UpdatePlant},
    reminder::{CreateReminder, Reminder, ReminderType},
};
use sqlx::{Executor, Sqlite, SqlitePool};
use thiserror::Error;
use tracing::{debug, info};
use utils::date::days_after;
use uuid::Uuid;

use super::{
    calendar::{CalendarDay, CalendarWindow, build_calendar},
    watering::PlantWithStatus,
};

pub const MIN_WATER_FREQUENCY: i32 = 1;
pub const MAX_WATER_FREQUENCY: i32 = 365;

#[derive(Debug, Error)]
pub enum CareError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("plant not found")]
    PlantNotFound,
    #[error("reminder not found")]
    ReminderNotFound,
    #[error("resource belongs to another user")]
    Forbidden,
    #[error("{0}")]
    Validation(String),
}

fn validate_name(name: &str) -> Result<(), CareError> {
    if name.trim().is_empty() {
        return Err(CareError::Validation("Plant name must not be empty".to_string()));
    }
    Ok(())
}

fn validate_water_frequency(days: i32) -> Result<(), CareError> {
    if !(MIN_WATER_FREQUENCY..=MAX_WATER_FREQUENCY).contains(&days) {
        return Err(CareError::Validation(format!(
            "Water frequency must be between {MIN_WATER_FREQUENCY} and {MAX_WATER_FREQUENCY} days"
        )));
    }
    Ok(())
}

pub struct CareService;

impl CareService {
    /// Load a plant and make sure `user_id` owns it
    pub async fn owned_plant<'e, E>(
        executor: E,
        plant_id: Uuid,
        user_id: Uuid,
    ) -> Result<Plant, CareError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let plant = Plant::find_by_id(executor, plant_id)
            .await?
            .ok_or(CareError::PlantNotFound)?;
        if plant.user_id != user_id {
            return Err(CareError::Forbidden);
        }
        Ok(plant)
    }

    async fn owned_reminder(
        pool: &SqlitePool,
        reminder_id: Uuid,
        user_id: Uuid,
    ) -> Result<Reminder, CareError> {
        let reminder = Reminder::find_by_id(pool, reminder_id)
            .await?
            .ok_or(CareError::ReminderNotFound)?;
        if reminder.user_id != user_id {
            return Err(CareError::Forbidden);
        }
        Ok(reminder)
    }

    pub async fn list_plants(
        pool: &SqlitePool,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<PlantWithStatus>, CareError> {
        let plants = Plant::find_by_user_id(pool, user_id).await?;
        Ok(plants
            .into_iter()
            .map(|plant| PlantWithStatus::at(plant, now))
            .collect())
    }

    pub async fn get_plant(
        pool: &SqlitePool,
        plant_id: Uuid,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<PlantWithStatus, CareError> {
        let plant = Self::owned_plant(pool, plant_id, user_id).await?;
        Ok(PlantWithStatus::at(plant, now))
    }

    /// Insert the plant and its first watering reminder together
    pub async fn create_plant(
        pool: &SqlitePool,
        user_id: Uuid,
        data: &CreatePlant,
        now: DateTime<Utc>,
    ) -> Result<Plant, CareError> {
        validate_name(&data.name)?;
        validate_water_frequency(data.water_frequency)?;

        let data = CreatePlant {
            name: data.name.trim().to_string(),
            ..data.clone()
        };

        let mut tx = pool.begin().await?;
        let plant = Plant::create(&mut *tx, &data, Uuid::new_v4(), user_id).await?;
        let reminder = Self::schedule_watering(&mut tx, &plant, user_id, now).await?;
        tx.commit().await?;

        info!(
            plant_id = %plant.id,
            user_id = %user_id,
            reminder_id = %reminder.id,
            due_date = %reminder.due_date,
            "Plant created with first watering reminder"
        );
        Ok(plant)
    }

    async fn schedule_watering(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        plant: &Plant,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Reminder, sqlx::Error> {
        let reminder = CreateReminder {
            plant_id: plant.id,
            reminder_type: ReminderType::Watering,
            due_date: days_after(now, i64::from(plant.water_frequency)),
        };
        Reminder::create(&mut **tx, &reminder, Uuid::new_v4(), user_id).await
    }

    pub async fn update_plant(
        pool: &SqlitePool,
        plant_id: Uuid,
        user_id: Uuid,
        update: UpdatePlant,
    ) -> Result<Plant, CareError> {
        if let Some(name) = update.name.as_deref() {
            validate_name(name)?;
        }
        if let Some(days) = update.water_frequency {
            validate_water_frequency(days)?;
        }

        let existing = Self::owned_plant(pool, plant_id, user_id).await?;
        let update = UpdatePlant {
            name: update.name.map(|name| name.trim().to_string()),
            ..update
        };
        let plant = Plant::update(pool, &existing.merged_with(update)).await?;
        debug!(plant_id = %plant.id, "Plant updated");
        Ok(plant)
    }

    pub async fn delete_plant(
        pool: &SqlitePool,
        plant_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), CareError> {
        Self::owned_plant(pool, plant_id, user_id).await?;
        let rows = Plant::delete(pool, plant_id).await?;
        if rows == 0 {
            return Err(CareError::PlantNotFound);
        }
        info!(plant_id = %plant_id, user_id = %user_id, "Plant deleted");
        Ok(())
    }

    pub async fn care_logs_for_plant(
        pool: &SqlitePool,
        plant_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<CareLog>, CareError> {
        Self::owned_plant(pool, plant_id, user_id).await?;
        Ok(CareLog::find_by_plant_id(pool, plant_id).await?)
    }

    /// Record a care activity performed at `now`. Watering also moves the
    /// plant's `last_watered` and books the next watering reminder.
    pub async fn log_care(
        pool: &SqlitePool,
        user_id: Uuid,
        data: &CreateCareLog,
        now: DateTime<Utc>,
    ) -> Result<CareLog, CareError> {
        let mut tx = pool.begin().await?;
        // Read inside the transaction so the next reminder uses the committed frequency
        let plant = Self::owned_plant(&mut *tx, data.plant_id, user_id).await?;
        let log = CareLog::create(&mut *tx, data, Uuid::new_v4(), user_id, now).await?;

        if log.activity_type == ActivityType::Watering {
            Plant::set_last_watered(&mut *tx, plant.id, log.performed_at).await?;
            let next = Self::schedule_watering(&mut tx, &plant, user_id, now).await?;
            debug!(
                plant_id = %plant.id,
                next_due = %next.due_date,
                "Next watering scheduled"
            );
        }
        tx.commit().await?;

        info!(
            plant_id = %plant.id,
            care_log_id = %log.id,
            activity = %log.activity_type,
            "Care activity logged"
        );
        Ok(log)
    }

    pub async fn create_reminder(
        pool: &SqlitePool,
        user_id: Uuid,
        data: &CreateReminder,
    ) -> Result<Reminder, CareError> {
        Self::owned_plant(pool, data.plant_id, user_id).await?;
        let reminder = Reminder::create(pool, data, Uuid::new_v4(), user_id).await?;
        debug!(reminder_id = %reminder.id, reminder_type = %reminder.reminder_type, "Reminder created");
        Ok(reminder)
    }

    pub async fn complete_reminder(
        pool: &SqlitePool,
        reminder_id: Uuid,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Reminder, CareError> {
        Self::owned_reminder(pool, reminder_id, user_id).await?;
        let reminder = Reminder::mark_completed(pool, reminder_id, now)
            .await?
            .ok_or(CareError::ReminderNotFound)?;
        info!(reminder_id = %reminder.id, "Reminder completed");
        Ok(reminder)
    }

    pub async fn calendar(
        pool: &SqlitePool,
        user_id: Uuid,
        window: CalendarWindow,
    ) -> Result<Vec<CalendarDay>, CareError> {
        let reminders =
            Reminder::find_in_range(pool, user_id, window.starts_at(), window.ends_at()).await?;
        Ok(build_calendar(window, reminders))
    }
}
