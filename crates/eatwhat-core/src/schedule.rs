//! Weekly opening schedules and "open now" evaluation.

use chrono::{Datelike, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// One opening window. `weekday` counts from Sunday = 0.
///
/// A window whose `close` is not after `open` runs past midnight and ends on
/// the following weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningPeriod {
    pub weekday: u8,
    pub open: NaiveTime,
    pub close: NaiveTime,
}

impl OpeningPeriod {
    /// Builds a period from `HH:MM` strings. Returns `None` for a weekday
    /// outside 0-6 or a time that does not parse.
    #[must_use]
    pub fn parse(weekday: u8, open: &str, close: &str) -> Option<Self> {
        if weekday > 6 {
            return None;
        }
        let open = NaiveTime::parse_from_str(open, "%H:%M").ok()?;
        let close = NaiveTime::parse_from_str(close, "%H:%M").ok()?;
        Some(Self {
            weekday,
            open,
            close,
        })
    }

    fn wraps_midnight(&self) -> bool {
        self.close <= self.open
    }

    fn contains(&self, weekday: u8, time: NaiveTime) -> bool {
        if self.wraps_midnight() {
            let next_day = (self.weekday + 1) % 7;
            (weekday == self.weekday && time >= self.open)
                || (weekday == next_day && time < self.close)
        } else {
            weekday == self.weekday && time >= self.open && time < self.close
        }
    }
}

/// Returns `true` when any period of `schedule` covers `at`.
///
/// An absent or empty schedule is never open.
#[must_use]
pub fn is_open_at(schedule: Option<&[OpeningPeriod]>, at: NaiveDateTime) -> bool {
    let Some(periods) = schedule else {
        return false;
    };
    #[allow(clippy::cast_possible_truncation)]
    let weekday = at.weekday().num_days_from_sunday() as u8;
    let time = at.time();
    periods.iter().any(|p| p.contains(weekday, time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    /// 2024-06-03 is a Monday (weekday 1).
    fn monday_at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn tuesday_at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 4)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn absent_schedule_is_closed() {
        assert!(!is_open_at(None, monday_at(12, 0)));
    }

    #[test]
    fn empty_schedule_is_closed() {
        assert!(!is_open_at(Some(&[]), monday_at(12, 0)));
    }

    #[test]
    fn open_inside_same_day_window() {
        let schedule = [OpeningPeriod::parse(1, "11:00", "22:00").unwrap()];
        assert!(is_open_at(Some(&schedule), monday_at(11, 0)));
        assert!(is_open_at(Some(&schedule), monday_at(21, 59)));
        assert!(!is_open_at(Some(&schedule), monday_at(22, 0)));
        assert!(!is_open_at(Some(&schedule), monday_at(10, 59)));
    }

    #[test]
    fn window_on_other_weekday_does_not_count() {
        let schedule = [OpeningPeriod::parse(2, "11:00", "22:00").unwrap()];
        assert!(!is_open_at(Some(&schedule), monday_at(12, 0)));
    }

    #[test]
    fn overnight_window_spills_into_next_day() {
        let schedule = [OpeningPeriod::parse(1, "18:00", "02:00").unwrap()];
        assert!(is_open_at(Some(&schedule), monday_at(23, 30)));
        assert!(is_open_at(Some(&schedule), tuesday_at(1, 30)));
        assert!(!is_open_at(Some(&schedule), tuesday_at(2, 0)));
        assert!(!is_open_at(Some(&schedule), monday_at(17, 0)));
    }

    #[test]
    fn saturday_overnight_wraps_to_sunday() {
        let schedule = [OpeningPeriod::parse(6, "20:00", "03:00").unwrap()];
        // 2024-06-09 is a Sunday.
        let sunday_early = NaiveDate::from_ymd_opt(2024, 6, 9)
            .unwrap()
            .and_hms_opt(1, 0, 0)
            .unwrap();
        assert!(is_open_at(Some(&schedule), sunday_early));
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(OpeningPeriod::parse(7, "11:00", "22:00").is_none());
        assert!(OpeningPeriod::parse(1, "11am", "22:00").is_none());
    }
}
