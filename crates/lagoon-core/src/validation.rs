//! Pure payload validation. Malformed input is never an error path in
//! the Rust sense: every problem is collected into a list of stable
//! machine-readable codes so the caller can report all of them at once.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{RecurrenceType, ScheduleDraft, ScheduleRequest, TemplateDraft, TemplatePayload};

/// A schedule may span at most two years, guarding against unbounded
/// instance generation.
pub const MAX_SCHEDULE_SPAN_DAYS: i64 = 730;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationCode {
    TemplateIdRequired,
    OperatorIdRequired,
    RecurrenceTypeRequired,
    StartTimeRequired,
    StartDateRequired,
    EndDateRequired,
    InvalidTemplateIdFormat,
    InvalidOperatorIdFormat,
    InvalidRecurrenceType,
    WeeklyRequiresDays,
    InvalidDayOfWeek,
    InvalidTimeFormat,
    InvalidStartDateFormat,
    InvalidEndDateFormat,
    EndDateBeforeStart,
    DateRangeTooLarge,
    TourNameRequired,
    TourTypeRequired,
    InvalidCapacity,
    InvalidAdultPrice,
    InvalidChildPrice,
    InvalidAutoCloseHours,
}

impl ValidationCode {
    pub fn as_code(&self) -> &'static str {
        match self {
            ValidationCode::TemplateIdRequired => "TEMPLATE_ID_REQUIRED",
            ValidationCode::OperatorIdRequired => "OPERATOR_ID_REQUIRED",
            ValidationCode::RecurrenceTypeRequired => "RECURRENCE_TYPE_REQUIRED",
            ValidationCode::StartTimeRequired => "START_TIME_REQUIRED",
            ValidationCode::StartDateRequired => "START_DATE_REQUIRED",
            ValidationCode::EndDateRequired => "END_DATE_REQUIRED",
            ValidationCode::InvalidTemplateIdFormat => "INVALID_TEMPLATE_ID_FORMAT",
            ValidationCode::InvalidOperatorIdFormat => "INVALID_OPERATOR_ID_FORMAT",
            ValidationCode::InvalidRecurrenceType => "INVALID_RECURRENCE_TYPE",
            ValidationCode::WeeklyRequiresDays => "WEEKLY_REQUIRES_DAYS",
            ValidationCode::InvalidDayOfWeek => "INVALID_DAY_OF_WEEK",
            ValidationCode::InvalidTimeFormat => "INVALID_TIME_FORMAT",
            ValidationCode::InvalidStartDateFormat => "INVALID_START_DATE_FORMAT",
            ValidationCode::InvalidEndDateFormat => "INVALID_END_DATE_FORMAT",
            ValidationCode::EndDateBeforeStart => "END_DATE_BEFORE_START",
            ValidationCode::DateRangeTooLarge => "DATE_RANGE_TOO_LARGE",
            ValidationCode::TourNameRequired => "TOUR_NAME_REQUIRED",
            ValidationCode::TourTypeRequired => "TOUR_TYPE_REQUIRED",
            ValidationCode::InvalidCapacity => "INVALID_CAPACITY",
            ValidationCode::InvalidAdultPrice => "INVALID_ADULT_PRICE",
            ValidationCode::InvalidChildPrice => "INVALID_CHILD_PRICE",
            ValidationCode::InvalidAutoCloseHours => "INVALID_AUTO_CLOSE_HOURS",
        }
    }
}

impl std::fmt::Display for ValidationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_code())
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn parse_uuid(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M").ok()
}

/// Validates a schedule-creation request, collecting every failing
/// check rather than stopping at the first. On success the payload is
/// returned fully typed.
pub fn validate_schedule_request(
    request: &ScheduleRequest,
) -> Result<ScheduleDraft, Vec<ValidationCode>> {
    let mut errors = Vec::new();

    // Presence first, mirroring the priority the caller sees the
    // fields in.
    let template_raw = present(&request.template_id);
    if template_raw.is_none() {
        errors.push(ValidationCode::TemplateIdRequired);
    }
    let operator_raw = present(&request.operator_id);
    if operator_raw.is_none() {
        errors.push(ValidationCode::OperatorIdRequired);
    }
    let recurrence_raw = present(&request.recurrence_type);
    if recurrence_raw.is_none() {
        errors.push(ValidationCode::RecurrenceTypeRequired);
    }
    let time_raw = present(&request.start_time);
    if time_raw.is_none() {
        errors.push(ValidationCode::StartTimeRequired);
    }
    let start_raw = present(&request.start_date);
    if start_raw.is_none() {
        errors.push(ValidationCode::StartDateRequired);
    }
    let end_raw = present(&request.end_date);
    if end_raw.is_none() {
        errors.push(ValidationCode::EndDateRequired);
    }

    let template_id = template_raw.and_then(|raw| {
        parse_uuid(raw).or_else(|| {
            errors.push(ValidationCode::InvalidTemplateIdFormat);
            None
        })
    });
    let operator_id = operator_raw.and_then(|raw| {
        parse_uuid(raw).or_else(|| {
            errors.push(ValidationCode::InvalidOperatorIdFormat);
            None
        })
    });

    let recurrence_type = recurrence_raw.and_then(|raw| {
        raw.parse::<RecurrenceType>().ok().or_else(|| {
            errors.push(ValidationCode::InvalidRecurrenceType);
            None
        })
    });

    if recurrence_type == Some(RecurrenceType::Weekly) {
        match &request.days_of_week {
            Some(days) if !days.is_empty() => {
                if days.iter().any(|day| !(1..=7).contains(day)) {
                    errors.push(ValidationCode::InvalidDayOfWeek);
                }
            }
            _ => errors.push(ValidationCode::WeeklyRequiresDays),
        }
    }

    let start_time = time_raw.and_then(|raw| {
        parse_time(raw).or_else(|| {
            errors.push(ValidationCode::InvalidTimeFormat);
            None
        })
    });
    let start_date = start_raw.and_then(|raw| {
        parse_date(raw).or_else(|| {
            errors.push(ValidationCode::InvalidStartDateFormat);
            None
        })
    });
    let end_date = end_raw.and_then(|raw| {
        parse_date(raw).or_else(|| {
            errors.push(ValidationCode::InvalidEndDateFormat);
            None
        })
    });

    if let (Some(start), Some(end)) = (start_date, end_date) {
        if end <= start {
            errors.push(ValidationCode::EndDateBeforeStart);
        } else if (end - start).num_days() > MAX_SCHEDULE_SPAN_DAYS {
            errors.push(ValidationCode::DateRangeTooLarge);
        }
    }

    match (
        template_id,
        operator_id,
        recurrence_type,
        start_time,
        start_date,
        end_date,
    ) {
        (Some(template_id), Some(operator_id), Some(recurrence_type), Some(start_time), Some(start_date), Some(end_date))
            if errors.is_empty() =>
        {
            Ok(ScheduleDraft {
                operator_id,
                template_id,
                recurrence_type,
                days_of_week: request.days_of_week.clone(),
                start_time,
                start_date,
                end_date,
                exceptions: request.exceptions.clone().unwrap_or_default(),
            })
        }
        _ => Err(errors),
    }
}

/// Validates a template-creation payload and applies the documented
/// defaults (capacity 1, meeting point "TBD", French-speaking guide,
/// weather-dependent, two-hour auto-close).
pub fn validate_template_payload(
    payload: &TemplatePayload,
) -> Result<TemplateDraft, Vec<ValidationCode>> {
    let mut errors = Vec::new();

    let operator_raw = present(&payload.operator_id);
    if operator_raw.is_none() {
        errors.push(ValidationCode::OperatorIdRequired);
    }
    let tour_name = present(&payload.tour_name);
    if tour_name.is_none() {
        errors.push(ValidationCode::TourNameRequired);
    }
    let tour_type = present(&payload.tour_type);
    if tour_type.is_none() {
        errors.push(ValidationCode::TourTypeRequired);
    }

    let operator_id = operator_raw.and_then(|raw| {
        parse_uuid(raw).or_else(|| {
            errors.push(ValidationCode::InvalidOperatorIdFormat);
            None
        })
    });

    if matches!(payload.max_capacity, Some(capacity) if capacity <= 0) {
        errors.push(ValidationCode::InvalidCapacity);
    }
    if matches!(payload.original_price_adult, Some(price) if price < 0.0)
        || matches!(payload.discount_price_adult, Some(price) if price < 0.0)
    {
        errors.push(ValidationCode::InvalidAdultPrice);
    }
    if matches!(payload.discount_price_child, Some(price) if price < 0.0) {
        errors.push(ValidationCode::InvalidChildPrice);
    }
    if matches!(payload.auto_close_hours, Some(hours) if hours < 0) {
        errors.push(ValidationCode::InvalidAutoCloseHours);
    }

    match (operator_id, tour_name, tour_type) {
        (Some(operator_id), Some(tour_name), Some(tour_type)) if errors.is_empty() => {
            let original_price_adult = payload.original_price_adult.unwrap_or(0.0);
            Ok(TemplateDraft {
                operator_id,
                tour_name: tour_name.to_string(),
                tour_type: tour_type.to_string(),
                description: payload.description.clone(),
                duration_hours: payload.duration_hours,
                max_capacity: payload.max_capacity.unwrap_or(1),
                original_price_adult,
                discount_price_adult: payload
                    .discount_price_adult
                    .unwrap_or(original_price_adult),
                discount_price_child: payload.discount_price_child.unwrap_or(0.0),
                meeting_point: payload
                    .meeting_point
                    .clone()
                    .unwrap_or_else(|| "TBD".to_string()),
                location: payload.location.clone(),
                pickup_available: payload.pickup_available.unwrap_or(false),
                equipment_included: payload.equipment_included.unwrap_or(false),
                food_included: payload.food_included.unwrap_or(false),
                drinks_included: payload.drinks_included.unwrap_or(false),
                languages: payload
                    .languages
                    .clone()
                    .unwrap_or_else(|| vec!["French".to_string()]),
                whale_regulation_compliant: payload.whale_regulation_compliant.unwrap_or(false),
                max_whale_group_size: payload.max_whale_group_size.unwrap_or(6),
                weather_dependent: payload.weather_dependent.unwrap_or(true),
                min_age: payload.min_age,
                max_age: payload.max_age,
                fitness_level: payload.fitness_level.clone(),
                requirements: payload.requirements.clone(),
                restrictions: payload.restrictions.clone(),
                auto_close_hours: payload.auto_close_hours.unwrap_or(2),
                backup_plan: payload.backup_plan.clone(),
                special_notes: payload.special_notes.clone(),
            })
        }
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn valid_request() -> ScheduleRequest {
        ScheduleRequest {
            operator_id: Some(Uuid::now_v7().to_string()),
            template_id: Some(Uuid::now_v7().to_string()),
            recurrence_type: Some("weekly".to_string()),
            days_of_week: Some(vec![1, 3]),
            start_time: Some("07:30".to_string()),
            start_date: Some("2025-01-01".to_string()),
            end_date: Some("2025-01-31".to_string()),
            exceptions: Some(vec!["2025-01-15".to_string()]),
        }
    }

    #[test]
    fn accepts_valid_weekly_request() {
        let draft = validate_schedule_request(&valid_request()).unwrap();
        assert_eq!(draft.recurrence_type, RecurrenceType::Weekly);
        assert_eq!(draft.days_of_week, Some(vec![1, 3]));
        assert_eq!(draft.start_time, NaiveTime::from_hms_opt(7, 30, 0).unwrap());
        assert_eq!(draft.exceptions, vec!["2025-01-15".to_string()]);
    }

    #[test]
    fn empty_request_reports_every_missing_field() {
        let errors = validate_schedule_request(&ScheduleRequest::default()).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationCode::TemplateIdRequired,
                ValidationCode::OperatorIdRequired,
                ValidationCode::RecurrenceTypeRequired,
                ValidationCode::StartTimeRequired,
                ValidationCode::StartDateRequired,
                ValidationCode::EndDateRequired,
            ]
        );
    }

    #[test]
    fn malformed_fields_are_all_collected() {
        let request = ScheduleRequest {
            operator_id: Some("not-a-uuid".to_string()),
            template_id: Some("also-not-a-uuid".to_string()),
            recurrence_type: Some("yearly".to_string()),
            start_time: Some("25:00".to_string()),
            start_date: Some("01/01/2025".to_string()),
            end_date: Some("2025-13-40".to_string()),
            ..Default::default()
        };
        let errors = validate_schedule_request(&request).unwrap_err();
        assert!(errors.contains(&ValidationCode::InvalidTemplateIdFormat));
        assert!(errors.contains(&ValidationCode::InvalidOperatorIdFormat));
        assert!(errors.contains(&ValidationCode::InvalidRecurrenceType));
        assert!(errors.contains(&ValidationCode::InvalidTimeFormat));
        assert!(errors.contains(&ValidationCode::InvalidStartDateFormat));
        assert!(errors.contains(&ValidationCode::InvalidEndDateFormat));
    }

    #[test]
    fn weekly_without_days_is_rejected() {
        let mut request = valid_request();
        request.days_of_week = None;
        let errors = validate_schedule_request(&request).unwrap_err();
        assert_eq!(errors, vec![ValidationCode::WeeklyRequiresDays]);

        request.days_of_week = Some(Vec::new());
        let errors = validate_schedule_request(&request).unwrap_err();
        assert_eq!(errors, vec![ValidationCode::WeeklyRequiresDays]);
    }

    #[test]
    fn weekday_numbers_outside_monday_to_sunday_are_rejected() {
        let mut request = valid_request();
        request.days_of_week = Some(vec![1, 8]);
        let errors = validate_schedule_request(&request).unwrap_err();
        assert_eq!(errors, vec![ValidationCode::InvalidDayOfWeek]);

        request.days_of_week = Some(vec![0, 3]);
        let errors = validate_schedule_request(&request).unwrap_err();
        assert_eq!(errors, vec![ValidationCode::InvalidDayOfWeek]);
    }

    #[rstest]
    #[case("2025-01-31", "2025-01-31")]
    #[case("2025-01-31", "2025-01-01")]
    fn end_date_must_be_strictly_after_start(#[case] start: &str, #[case] end: &str) {
        let mut request = valid_request();
        request.recurrence_type = Some("daily".to_string());
        request.start_date = Some(start.to_string());
        request.end_date = Some(end.to_string());
        let errors = validate_schedule_request(&request).unwrap_err();
        assert_eq!(errors, vec![ValidationCode::EndDateBeforeStart]);
    }

    #[test]
    fn spans_over_two_years_are_rejected() {
        let mut request = valid_request();
        request.recurrence_type = Some("daily".to_string());
        request.start_date = Some("2025-01-01".to_string());
        request.end_date = Some("2027-06-01".to_string());
        let errors = validate_schedule_request(&request).unwrap_err();
        assert_eq!(errors, vec![ValidationCode::DateRangeTooLarge]);
    }

    #[rstest]
    #[case("once")]
    #[case("daily")]
    #[case("monthly")]
    fn non_weekly_kinds_do_not_require_days(#[case] kind: &str) {
        let mut request = valid_request();
        request.recurrence_type = Some(kind.to_string());
        request.days_of_week = None;
        assert!(validate_schedule_request(&request).is_ok());
    }

    #[test]
    fn single_digit_hours_parse() {
        let mut request = valid_request();
        request.start_time = Some("7:05".to_string());
        let draft = validate_schedule_request(&request).unwrap();
        assert_eq!(draft.start_time, NaiveTime::from_hms_opt(7, 5, 0).unwrap());
    }

    #[test]
    fn template_payload_defaults_are_applied() {
        let payload = TemplatePayload {
            operator_id: Some(Uuid::now_v7().to_string()),
            tour_name: Some("Sunset Lagoon Tour".to_string()),
            tour_type: Some("Lagoon Tour".to_string()),
            original_price_adult: Some(15000.0),
            ..Default::default()
        };
        let draft = validate_template_payload(&payload).unwrap();
        assert_eq!(draft.max_capacity, 1);
        assert_eq!(draft.meeting_point, "TBD");
        assert_eq!(draft.discount_price_adult, 15000.0);
        assert_eq!(draft.languages, vec!["French".to_string()]);
        assert!(draft.weather_dependent);
        assert_eq!(draft.auto_close_hours, 2);
    }

    #[test]
    fn template_payload_rejects_bad_numbers() {
        let payload = TemplatePayload {
            operator_id: Some("nope".to_string()),
            max_capacity: Some(0),
            original_price_adult: Some(-1.0),
            auto_close_hours: Some(-2),
            ..Default::default()
        };
        let errors = validate_template_payload(&payload).unwrap_err();
        assert!(errors.contains(&ValidationCode::TourNameRequired));
        assert!(errors.contains(&ValidationCode::TourTypeRequired));
        assert!(errors.contains(&ValidationCode::InvalidOperatorIdFormat));
        assert!(errors.contains(&ValidationCode::InvalidCapacity));
        assert!(errors.contains(&ValidationCode::InvalidAdultPrice));
        assert!(errors.contains(&ValidationCode::InvalidAutoCloseHours));
    }
}
