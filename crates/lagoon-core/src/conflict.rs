//! Advisory conflict detection between a candidate schedule and the
//! existing schedules sharing its template and start time.

use serde::Serialize;
use uuid::Uuid;

use crate::models::{Schedule, ScheduleDraft};
use crate::recurrence::{RecurrencePattern, ScheduleCalendar};

/// How overlapping schedules are judged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Reference behavior: an overlapping date range only conflicts
    /// when both rules share the exact same recurrence kind. A daily
    /// rule and a weekly rule covering the same Tuesdays pass.
    #[default]
    SameKindOverlap,
    /// Strict mode: expand both rules to their concrete date sets and
    /// flag any shared date, regardless of kind.
    SharedDates,
}

/// Identity of the offending schedule plus a human-diagnosable marker
/// (start date and time of the candidate rule).
#[derive(Debug, Clone, Serialize)]
pub struct ConflictDetails {
    pub conflicting_schedule_id: Uuid,
    pub conflict_marker: String,
}

#[derive(Debug, Clone)]
pub struct ConflictDetector {
    policy: ConflictPolicy,
    calendar: ScheduleCalendar,
}

impl ConflictDetector {
    pub fn new(policy: ConflictPolicy, calendar: ScheduleCalendar) -> Self {
        Self { policy, calendar }
    }

    pub fn policy(&self) -> ConflictPolicy {
        self.policy
    }

    /// Checks the candidate against existing schedules for the same
    /// template, start time and operator. Side-effect free; stops at
    /// the first actual conflict.
    pub fn detect(&self, draft: &ScheduleDraft, existing: &[Schedule]) -> Option<ConflictDetails> {
        existing
            .iter()
            .find(|candidate| self.collides(draft, candidate))
            .map(|candidate| ConflictDetails {
                conflicting_schedule_id: candidate.id,
                conflict_marker: format!(
                    "{}_{}",
                    draft.start_date,
                    draft.start_time.format("%H:%M")
                ),
            })
    }

    fn collides(&self, draft: &ScheduleDraft, existing: &Schedule) -> bool {
        // A disjoint date range can never conflict, whatever the kind.
        if !ranges_overlap(
            draft.start_date,
            draft.end_date,
            existing.start_date,
            existing.end_date,
        ) {
            return false;
        }

        match self.policy {
            ConflictPolicy::SameKindOverlap => draft.recurrence_type == existing.recurrence_type,
            ConflictPolicy::SharedDates => {
                let new_dates = self.calendar.expand(&RecurrencePattern::from_draft(draft));
                let existing_dates: std::collections::HashSet<_> = self
                    .calendar
                    .expand(&RecurrencePattern::from_schedule(existing))
                    .into_iter()
                    .collect();
                new_dates.iter().any(|d| existing_dates.contains(d))
            }
        }
    }
}

/// Inclusive interval intersection on calendar dates.
pub fn ranges_overlap(
    new_start: chrono::NaiveDate,
    new_end: chrono::NaiveDate,
    existing_start: chrono::NaiveDate,
    existing_end: chrono::NaiveDate,
) -> bool {
    new_start <= existing_end && new_end >= existing_start
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecurrenceType;
    use chrono::{NaiveDate, NaiveTime, Utc};
    use sqlx::types::Json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn draft(kind: RecurrenceType, start: NaiveDate, end: NaiveDate) -> ScheduleDraft {
        ScheduleDraft {
            operator_id: Uuid::now_v7(),
            template_id: Uuid::now_v7(),
            recurrence_type: kind,
            days_of_week: None,
            start_time: NaiveTime::from_hms_opt(7, 30, 0).unwrap(),
            start_date: start,
            end_date: end,
            exceptions: Vec::new(),
        }
    }

    fn schedule(kind: RecurrenceType, start: NaiveDate, end: NaiveDate) -> Schedule {
        Schedule {
            id: Uuid::now_v7(),
            operator_id: Uuid::now_v7(),
            template_id: Uuid::now_v7(),
            recurrence_type: kind,
            days_of_week: None,
            start_time: NaiveTime::from_hms_opt(7, 30, 0).unwrap(),
            start_date: start,
            end_date: end,
            exceptions: Json(Vec::new()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn detector(policy: ConflictPolicy) -> ConflictDetector {
        ConflictDetector::new(policy, ScheduleCalendar::with_defaults())
    }

    #[test]
    fn disjoint_ranges_never_conflict() {
        let d = draft(
            RecurrenceType::Daily,
            date(2025, 3, 1),
            date(2025, 3, 31),
        );
        let existing = schedule(
            RecurrenceType::Daily,
            date(2025, 1, 1),
            date(2025, 1, 31),
        );
        assert!(detector(ConflictPolicy::SameKindOverlap)
            .detect(&d, &[existing])
            .is_none());
    }

    #[test]
    fn overlapping_same_kind_reports_first_conflict() {
        let d = draft(
            RecurrenceType::Daily,
            date(2025, 1, 15),
            date(2025, 2, 15),
        );
        let first = schedule(
            RecurrenceType::Daily,
            date(2025, 1, 1),
            date(2025, 1, 31),
        );
        let second = schedule(
            RecurrenceType::Daily,
            date(2025, 2, 1),
            date(2025, 2, 28),
        );
        let first_id = first.id;

        let details = detector(ConflictPolicy::SameKindOverlap)
            .detect(&d, &[first, second])
            .unwrap();
        assert_eq!(details.conflicting_schedule_id, first_id);
        assert_eq!(details.conflict_marker, "2025-01-15_07:30");
    }

    #[test]
    fn overlapping_different_kinds_pass_by_default() {
        let d = draft(
            RecurrenceType::Daily,
            date(2025, 1, 1),
            date(2025, 1, 31),
        );
        let existing = schedule(
            RecurrenceType::Weekly,
            date(2025, 1, 1),
            date(2025, 1, 31),
        );
        assert!(detector(ConflictPolicy::SameKindOverlap)
            .detect(&d, &[existing])
            .is_none());
    }

    #[test]
    fn shared_dates_policy_catches_cross_kind_overlap() {
        let d = draft(
            RecurrenceType::Daily,
            date(2025, 1, 1),
            date(2025, 1, 31),
        );
        let mut existing = schedule(
            RecurrenceType::Weekly,
            date(2025, 1, 1),
            date(2025, 1, 31),
        );
        existing.days_of_week = Some(Json(vec![2])); // every Tuesday
        assert!(detector(ConflictPolicy::SharedDates)
            .detect(&d, &[existing])
            .is_some());
    }

    #[test]
    fn shared_dates_policy_passes_when_no_concrete_date_is_shared() {
        // Overlapping ranges, but a once-rule on a Tuesday against a
        // Mondays-only weekly rule never materializes the same day.
        let d = draft(RecurrenceType::Once, date(2025, 1, 7), date(2025, 1, 31));
        let mut existing = schedule(
            RecurrenceType::Weekly,
            date(2025, 1, 1),
            date(2025, 1, 31),
        );
        existing.days_of_week = Some(Json(vec![1]));
        assert!(detector(ConflictPolicy::SharedDates)
            .detect(&d, &[existing])
            .is_none());
    }
}
