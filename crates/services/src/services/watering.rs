//! Watering status derivation and frequency suggestions.

use std::ops::Deref;

use chrono::{DateTime, Utc};
use db::models::plant::Plant;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use utils::date::{days_after, whole_days_between};

/// Frequency used when nothing about the plant is recognised
pub const DEFAULT_WATER_FREQUENCY: i32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, EnumString, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WateringStatus {
    Unknown,
    Overdue,
    Due,
    Soon,
    Ok,
}

/// Bucket a plant by whole days elapsed since it was last watered.
pub fn watering_status(
    last_watered: Option<DateTime<Utc>>,
    water_frequency: i32,
    now: DateTime<Utc>,
) -> WateringStatus {
    let Some(last_watered) = last_watered else {
        return WateringStatus::Unknown;
    };

    let elapsed = whole_days_between(last_watered, now);
    let frequency = i64::from(water_frequency);

    if elapsed >= frequency + 2 {
        WateringStatus::Overdue
    } else if elapsed >= frequency {
        WateringStatus::Due
    } else if elapsed >= frequency - 1 {
        WateringStatus::Soon
    } else {
        WateringStatus::Ok
    }
}

pub fn next_watering_due(
    last_watered: Option<DateTime<Utc>>,
    water_frequency: i32,
) -> Option<DateTime<Utc>> {
    last_watered.map(|at| days_after(at, i64::from(water_frequency)))
}

const FREQUENCY_HINTS: &[(&[&str], i32)] = &[
    (&["monstera", "deliciosa"], 7),
    (&["fiddle leaf", "ficus lyrata"], 7),
    (&["pothos", "epipremnum"], 10),
    (&["snake plant", "sansevieria"], 21),
    (&["zz plant", "zamioculcas"], 21),
    (&["peace lily", "spathiphyllum"], 5),
    (&["orchid", "phalaenopsis"], 7),
    (&["aloe", "cactus", "succulent", "haworthia"], 14),
    (&["fern", "calathea", "maranta", "prayer plant"], 3),
];

/// Suggested days between waterings, looked up from the plant's name and
/// species. First matching group wins.
pub fn suggest_water_frequency(name: &str, species: Option<&str>) -> i32 {
    let haystack = format!(
        "{} {}",
        name.trim().to_lowercase(),
        species.unwrap_or_default().trim().to_lowercase()
    );

    FREQUENCY_HINTS
        .iter()
        .find(|(needles, _)| needles.iter().any(|needle| haystack.contains(needle)))
        .map(|(_, days)| *days)
        .unwrap_or(DEFAULT_WATER_FREQUENCY)
}

/// Plant row plus its derived watering state, as served to clients
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct PlantWithStatus {
    #[serde(flatten)]
    #[ts(flatten)]
    pub plant: Plant,
    pub watering_status: WateringStatus,
    pub next_watering: Option<DateTime<Utc>>,
}

impl PlantWithStatus {
    pub fn at(plant: Plant, now: DateTime<Utc>) -> Self {
        Self {
            watering_status: watering_status(plant.last_watered, plant.water_frequency, now),
            next_watering: next_watering_due(plant.last_watered, plant.water_frequency),
            plant,
        }
    }
}

impl Deref for PlantWithStatus {
    type Target = Plant;

    fn deref(&self) -> &Self::Target {
        &self.plant
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn status_after(elapsed: Duration, frequency: i32) -> WateringStatus {
        watering_status(Some(now() - elapsed), frequency, now())
    }

    #[test]
    fn never_watered_is_unknown() {
        assert_eq!(watering_status(None, 7, now()), WateringStatus::Unknown);
    }

    #[test]
    fn buckets_follow_frequency_thresholds() {
        assert_eq!(status_after(Duration::days(9), 7), WateringStatus::Overdue);
        assert_eq!(status_after(Duration::days(8), 7), WateringStatus::Due);
        assert_eq!(status_after(Duration::days(7), 7), WateringStatus::Due);
        assert_eq!(status_after(Duration::days(6), 7), WateringStatus::Soon);
        assert_eq!(status_after(Duration::days(5), 7), WateringStatus::Ok);
        assert_eq!(status_after(Duration::zero(), 7), WateringStatus::Ok);
    }

    #[test]
    fn partial_days_round_down() {
        assert_eq!(
            status_after(Duration::days(7) - Duration::minutes(1), 7),
            WateringStatus::Soon
        );
        assert_eq!(
            status_after(Duration::days(9) - Duration::seconds(1), 7),
            WateringStatus::Due
        );
    }

    #[test]
    fn daily_plant_is_soon_right_after_watering() {
        assert_eq!(status_after(Duration::hours(2), 1), WateringStatus::Soon);
        assert_eq!(status_after(Duration::days(1), 1), WateringStatus::Due);
        assert_eq!(status_after(Duration::days(3), 1), WateringStatus::Overdue);
    }

    #[test]
    fn watering_in_the_future_is_ok() {
        assert_eq!(status_after(-Duration::hours(5), 2), WateringStatus::Ok);
    }

    #[test]
    fn next_watering_adds_frequency() {
        let watered = now() - Duration::days(2);
        assert_eq!(
            next_watering_due(Some(watered), 5),
            Some(watered + Duration::days(5))
        );
        assert_eq!(next_watering_due(None, 5), None);
    }

    #[test]
    fn suggestion_uses_name_then_species() {
        assert_eq!(suggest_water_frequency("My Pothos", None), 10);
        assert_eq!(suggest_water_frequency("Kitchen buddy", Some("Sansevieria trifasciata")), 21);
        assert_eq!(suggest_water_frequency("Boston Fern", None), 3);
        assert_eq!(suggest_water_frequency("Peace Lily", None), 5);
        assert_eq!(suggest_water_frequency("Aloe", Some("")), 14);
        assert_eq!(suggest_water_frequency("Mystery", None), DEFAULT_WATER_FREQUENCY);
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&WateringStatus::Overdue).unwrap(), "\"overdue\"");
        assert_eq!(WateringStatus::Soon.to_string(), "soon");
    }
}
