use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use db::models::reminder::{Reminder, ReminderType};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utils::date::utc_midnight;

/// Six weeks, enough for any month grid
pub const MAX_CALENDAR_DAYS: u32 = 42;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub reminders: Vec<Reminder>,
    pub has_watering: bool,
    pub has_fertilizing: bool,
    pub has_other: bool,
}

impl CalendarDay {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            reminders: Vec::new(),
            has_watering: false,
            has_fertilizing: false,
            has_other: false,
        }
    }

    fn push(&mut self, reminder: Reminder) {
        match reminder.reminder_type {
            ReminderType::Watering => self.has_watering = true,
            ReminderType::Fertilizing => self.has_fertilizing = true,
            _ => self.has_other = true,
        }
        self.reminders.push(reminder);
    }
}

/// Span covered by a calendar request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarWindow {
    pub start: NaiveDate,
    pub days: u32,
}

impl CalendarWindow {
    pub fn new(start: NaiveDate, days: u32) -> Self {
        Self {
            start,
            days: days.clamp(1, MAX_CALENDAR_DAYS),
        }
    }

    /// Window starting on the Sunday of the week that contains `today`
    pub fn for_week_of(today: NaiveDate, days: u32) -> Self {
        let back = Days::new(u64::from(today.weekday().num_days_from_sunday()));
        Self::new(today.checked_sub_days(back).unwrap_or(today), days)
    }

    pub fn starts_at(&self) -> DateTime<Utc> {
        utc_midnight(self.start)
    }

    /// Exclusive end instant
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.start
            .checked_add_days(Days::new(u64::from(self.days)))
            .map(utc_midnight)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take(self.days as usize)
    }
}

/// Group reminders into one entry per day of `window`. Reminders falling
/// outside the window are dropped.
pub fn build_calendar(window: CalendarWindow, reminders: Vec<Reminder>) -> Vec<CalendarDay> {
    let mut days: Vec<CalendarDay> = window.dates().map(CalendarDay::empty).collect();

    for reminder in reminders {
        let due = reminder.due_date.date_naive();
        let offset = (due - window.start).num_days();
        if offset < 0 {
            continue;
        }
        if let Some(day) = days.get_mut(offset as usize) {
            day.push(reminder);
        }
    }

    days
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use uuid::Uuid;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn reminder(reminder_type: ReminderType, due_date: DateTime<Utc>) -> Reminder {
        Reminder {
            id: Uuid::new_v4(),
            plant_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            reminder_type,
            due_date,
            completed: false,
            created_at: due_date - Duration::days(7),
            completed_at: None,
        }
    }

    #[test]
    fn day_count_is_clamped() {
        assert_eq!(CalendarWindow::new(date(2025, 1, 1), 0).days, 1);
        assert_eq!(CalendarWindow::new(date(2025, 1, 1), 500).days, MAX_CALENDAR_DAYS);
        assert_eq!(CalendarWindow::new(date(2025, 1, 1), 7).days, 7);
    }

    #[test]
    fn week_of_starts_on_sunday() {
        // 2025-06-18 is a Wednesday
        let window = CalendarWindow::for_week_of(date(2025, 6, 18), 7);
        assert_eq!(window.start, date(2025, 6, 15));
        assert_eq!(CalendarWindow::for_week_of(date(2025, 6, 15), 7).start, date(2025, 6, 15));
    }

    #[test]
    fn window_bounds_are_utc_midnights() {
        let window = CalendarWindow::new(date(2025, 2, 27), 3);
        assert_eq!(window.starts_at(), Utc.with_ymd_and_hms(2025, 2, 27, 0, 0, 0).unwrap());
        assert_eq!(window.ends_at(), Utc.with_ymd_and_hms(2025, 3, 2, 0, 0, 0).unwrap());
    }

    #[test]
    fn reminders_land_on_their_day_with_flags() {
        let window = CalendarWindow::new(date(2025, 6, 1), 3);
        let day_two = Utc.with_ymd_and_hms(2025, 6, 2, 9, 30, 0).unwrap();
        let reminders = vec![
            reminder(ReminderType::Watering, day_two),
            reminder(ReminderType::Pruning, day_two + Duration::hours(5)),
            reminder(ReminderType::Fertilizing, day_two + Duration::days(1)),
            reminder(ReminderType::Watering, day_two + Duration::days(10)),
        ];

        let days = build_calendar(window, reminders);
        assert_eq!(days.len(), 3);
        assert_eq!(days[0].date, date(2025, 6, 1));
        assert!(days[0].reminders.is_empty());
        assert!(!days[0].has_watering && !days[0].has_other);

        assert_eq!(days[1].reminders.len(), 2);
        assert!(days[1].has_watering && days[1].has_other && !days[1].has_fertilizing);

        assert!(days[2].has_fertilizing && !days[2].has_watering);
    }

    #[test]
    fn reminders_before_window_are_ignored() {
        let window = CalendarWindow::new(date(2025, 6, 10), 2);
        let early = Utc.with_ymd_and_hms(2025, 6, 9, 23, 59, 0).unwrap();
        let days = build_calendar(window, vec![reminder(ReminderType::Other, early)]);
        assert!(days.iter().all(|d| d.reminders.is_empty()));
    }
}
