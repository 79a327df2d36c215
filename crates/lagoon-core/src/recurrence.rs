//! Expansion of recurrence rules into concrete calendar dates.
//!
//! All date arithmetic happens on plain `NaiveDate` values in one
//! operator-local calendar, so the result never depends on the timezone
//! of whatever machine happens to evaluate it. The calendar only comes
//! into play when an exception entry carries a time component and has
//! to be pinned to a local day first.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use std::collections::HashSet;

use crate::models::{RecurrenceType, Schedule, ScheduleDraft};

/// The operator-local calendar used for all date normalization.
/// Injected explicitly so the engine works for operators in any region;
/// the default matches the platform's home base in French Polynesia.
#[derive(Debug, Clone)]
pub struct CalendarConfig {
    pub timezone: Tz,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::Pacific::Tahiti,
        }
    }
}

/// A recurrence rule reduced to the fields date expansion needs.
#[derive(Debug, Clone)]
pub struct RecurrencePattern {
    pub recurrence_type: RecurrenceType,
    /// Weekday numbers, Monday=1 through Sunday=7. Only weekly rules
    /// consult this.
    pub days_of_week: Vec<u8>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Raw exception entries; plain dates or timestamps.
    pub exceptions: Vec<String>,
}

impl RecurrencePattern {
    pub fn from_draft(draft: &ScheduleDraft) -> Self {
        Self {
            recurrence_type: draft.recurrence_type,
            days_of_week: draft.days_of_week.clone().unwrap_or_default(),
            start_date: draft.start_date,
            end_date: draft.end_date,
            exceptions: draft.exceptions.clone(),
        }
    }

    pub fn from_schedule(schedule: &Schedule) -> Self {
        Self {
            recurrence_type: schedule.recurrence_type,
            days_of_week: schedule
                .days_of_week
                .as_ref()
                .map(|days| days.0.clone())
                .unwrap_or_default(),
            start_date: schedule.start_date,
            end_date: schedule.end_date,
            exceptions: schedule.exceptions.0.clone(),
        }
    }
}

/// Expands recurrence patterns into ordered, deduplicated date
/// sequences within a fixed local calendar.
#[derive(Debug, Clone)]
pub struct ScheduleCalendar {
    config: CalendarConfig,
}

impl ScheduleCalendar {
    pub fn new(config: CalendarConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(CalendarConfig::default())
    }

    pub fn timezone(&self) -> &Tz {
        &self.config.timezone
    }

    /// Expands a pattern into every date an instance should exist on.
    ///
    /// Pure: same input, same output. The result is ascending and
    /// deduplicated, excludes exception dates, and is empty when the
    /// pattern matches nothing inside its range.
    ///
    /// Per kind:
    /// - `once`: the start date, unless excepted.
    /// - `daily`: every day from start to end inclusive.
    /// - `weekly`: days whose weekday number is in `days_of_week`.
    /// - `monthly`: days whose day-of-month equals the start date's.
    ///   Months lacking that day (a rule anchored on the 31st, say)
    ///   produce nothing for that month rather than clamping.
    pub fn expand(&self, pattern: &RecurrencePattern) -> Vec<NaiveDate> {
        let exceptions: HashSet<NaiveDate> = pattern
            .exceptions
            .iter()
            .filter_map(|raw| self.normalize_exception(raw))
            .collect();

        let mut dates = Vec::new();

        match pattern.recurrence_type {
            RecurrenceType::Once => {
                if !exceptions.contains(&pattern.start_date) {
                    dates.push(pattern.start_date);
                }
            }
            RecurrenceType::Daily => {
                self.walk(pattern, |_| true, &exceptions, &mut dates);
            }
            RecurrenceType::Weekly => {
                let wanted: HashSet<u8> = pattern.days_of_week.iter().copied().collect();
                self.walk(
                    pattern,
                    |day| wanted.contains(&(day.weekday().number_from_monday() as u8)),
                    &exceptions,
                    &mut dates,
                );
            }
            RecurrenceType::Monthly => {
                let day_of_month = pattern.start_date.day();
                self.walk(
                    pattern,
                    |day| day.day() == day_of_month,
                    &exceptions,
                    &mut dates,
                );
            }
        }

        dates.sort_unstable();
        dates.dedup();
        dates
    }

    fn walk(
        &self,
        pattern: &RecurrencePattern,
        keep: impl Fn(NaiveDate) -> bool,
        exceptions: &HashSet<NaiveDate>,
        dates: &mut Vec<NaiveDate>,
    ) {
        let mut day = pattern.start_date;
        while day <= pattern.end_date {
            if keep(day) && !exceptions.contains(&day) {
                dates.push(day);
            }
            day = match day.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }
    }

    /// Reduces an exception entry to a plain local date. Entries that
    /// carry a time component are pinned to the configured calendar
    /// first, so a UTC timestamp near midnight lands on the operator's
    /// day, not the server's. Unparseable entries are ignored.
    pub fn normalize_exception(&self, raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(date);
        }
        if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
            return Some(timestamp.with_timezone(&self.config.timezone).date_naive());
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
            return Some(naive.date());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn pattern(
        recurrence_type: RecurrenceType,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RecurrencePattern {
        RecurrencePattern {
            recurrence_type,
            days_of_week: Vec::new(),
            start_date: start,
            end_date: end,
            exceptions: Vec::new(),
        }
    }

    #[test]
    fn once_emits_the_start_date() {
        let calendar = ScheduleCalendar::with_defaults();
        let p = pattern(RecurrenceType::Once, date(2025, 1, 10), date(2025, 1, 31));
        assert_eq!(calendar.expand(&p), vec![date(2025, 1, 10)]);
    }

    #[test]
    fn once_with_excepted_start_date_is_empty() {
        let calendar = ScheduleCalendar::with_defaults();
        let mut p = pattern(RecurrenceType::Once, date(2025, 1, 10), date(2025, 1, 31));
        p.exceptions = vec!["2025-01-10".to_string()];
        assert!(calendar.expand(&p).is_empty());
    }

    #[test]
    fn daily_covers_every_day_inclusive() {
        let calendar = ScheduleCalendar::with_defaults();
        let p = pattern(RecurrenceType::Daily, date(2025, 1, 1), date(2025, 1, 31));
        let dates = calendar.expand(&p);
        assert_eq!(dates.len(), 31);
        assert_eq!(dates.first(), Some(&date(2025, 1, 1)));
        assert_eq!(dates.last(), Some(&date(2025, 1, 31)));
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn weekly_mondays_and_wednesdays_in_january_2025() {
        let calendar = ScheduleCalendar::with_defaults();
        let mut p = pattern(RecurrenceType::Weekly, date(2025, 1, 1), date(2025, 1, 31));
        p.days_of_week = vec![1, 3];
        p.exceptions = vec!["2025-01-15".to_string()];

        let dates = calendar.expand(&p);
        let expected: Vec<NaiveDate> = [1, 6, 8, 13, 20, 22, 27, 29]
            .iter()
            .map(|&d| date(2025, 1, d))
            .collect();
        assert_eq!(dates, expected);
        assert!(dates
            .iter()
            .all(|d| matches!(d.weekday(), Weekday::Mon | Weekday::Wed)));
    }

    #[test]
    fn monthly_on_the_31st_skips_short_months() {
        let calendar = ScheduleCalendar::with_defaults();
        let p = pattern(RecurrenceType::Monthly, date(2025, 1, 31), date(2025, 4, 30));
        assert_eq!(
            calendar.expand(&p),
            vec![date(2025, 1, 31), date(2025, 3, 31)]
        );
    }

    #[test]
    fn monthly_mid_month_hits_every_month() {
        let calendar = ScheduleCalendar::with_defaults();
        let p = pattern(RecurrenceType::Monthly, date(2025, 1, 15), date(2025, 4, 30));
        assert_eq!(
            calendar.expand(&p),
            vec![
                date(2025, 1, 15),
                date(2025, 2, 15),
                date(2025, 3, 15),
                date(2025, 4, 15)
            ]
        );
    }

    #[test]
    fn expansion_is_idempotent() {
        let calendar = ScheduleCalendar::with_defaults();
        let mut p = pattern(RecurrenceType::Weekly, date(2025, 1, 1), date(2025, 3, 31));
        p.days_of_week = vec![6, 7];
        p.exceptions = vec!["2025-02-01".to_string()];
        assert_eq!(calendar.expand(&p), calendar.expand(&p));
    }

    #[test]
    fn timestamp_exceptions_normalize_in_the_operator_calendar() {
        let calendar = ScheduleCalendar::with_defaults();
        // 02:00 UTC is still the previous evening in Tahiti (UTC-10)
        assert_eq!(
            calendar.normalize_exception("2025-01-15T02:00:00Z"),
            Some(date(2025, 1, 14))
        );
        assert_eq!(
            calendar.normalize_exception("2025-01-15T18:00:00Z"),
            Some(date(2025, 1, 15))
        );
        assert_eq!(
            calendar.normalize_exception("2025-01-15T08:00:00"),
            Some(date(2025, 1, 15))
        );
        assert_eq!(calendar.normalize_exception("not-a-date"), None);
    }

    #[test]
    fn excepted_timestamp_removes_the_local_day() {
        let calendar = ScheduleCalendar::with_defaults();
        let mut p = pattern(RecurrenceType::Daily, date(2025, 1, 1), date(2025, 1, 3));
        p.exceptions = vec!["2025-01-02T18:00:00Z".to_string()];
        assert_eq!(calendar.expand(&p), vec![date(2025, 1, 1), date(2025, 1, 3)]);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn daily_count_matches_span(offset in 0i64..400, span in 0i64..60) {
                let start = date(2025, 1, 1) + chrono::Duration::days(offset);
                let end = start + chrono::Duration::days(span);
                let calendar = ScheduleCalendar::with_defaults();
                let dates = calendar.expand(&pattern(RecurrenceType::Daily, start, end));
                prop_assert_eq!(dates.len() as i64, span + 1);
                prop_assert!(dates.windows(2).all(|w| w[0] < w[1]));
            }

            #[test]
            fn weekly_only_emits_requested_weekdays(
                offset in 0i64..400,
                span in 0i64..90,
                days in proptest::collection::btree_set(1u8..=7, 1..=7),
            ) {
                let start = date(2025, 1, 1) + chrono::Duration::days(offset);
                let end = start + chrono::Duration::days(span);
                let mut p = pattern(RecurrenceType::Weekly, start, end);
                p.days_of_week = days.iter().copied().collect();
                let calendar = ScheduleCalendar::with_defaults();
                for d in calendar.expand(&p) {
                    prop_assert!(days.contains(&(d.weekday().number_from_monday() as u8)));
                }
            }
        }
    }
}
