//! UTC calendar helpers shared by the reminder and calendar code.

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Midnight (UTC) at the start of `date`.
pub fn utc_midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// `from` shifted forward by `days` whole days.
pub fn days_after(from: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    from + Duration::days(days)
}

/// Whole days elapsed between `earlier` and `later`, rounded down.
/// Negative when `earlier` lies in the future.
pub fn whole_days_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> i64 {
    (later - earlier).num_milliseconds().div_euclid(86_400_000)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn whole_days_rounds_down() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 3, 3, 7, 59, 59).unwrap();
        assert_eq!(whole_days_between(start, later), 1);
        assert_eq!(whole_days_between(start, start), 0);
    }

    #[test]
    fn whole_days_is_floor_for_future_start() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let future = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        assert_eq!(whole_days_between(future, now), -1);
    }

    #[test]
    fn midnight_of_date() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(
            utc_midnight(date),
            Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap()
        );
    }
}
