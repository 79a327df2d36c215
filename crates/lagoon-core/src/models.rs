use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OperatorStatus {
    Active,
    Suspended,
    Pending,
}

impl std::fmt::Display for OperatorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperatorStatus::Active => write!(f, "active"),
            OperatorStatus::Suspended => write!(f, "suspended"),
            OperatorStatus::Pending => write!(f, "pending"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, FromRow)]
pub struct Operator {
    pub id: Uuid,
    pub company_name: String,
    pub status: OperatorStatus,
    pub commission_rate: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TourStatus {
    Active,
    SoldOut,
    Cancelled,
}

impl std::fmt::Display for TourStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TourStatus::Active => write!(f, "active"),
            TourStatus::SoldOut => write!(f, "sold_out"),
            TourStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Discriminates the two kinds of rows in the `tours` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Template,
    Scheduled,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceType {
    Once,
    Daily,
    Weekly,
    Monthly,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid recurrence type: {0}")]
pub struct ParseRecurrenceTypeError(String);

impl FromStr for RecurrenceType {
    type Err = ParseRecurrenceTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "once" => Ok(RecurrenceType::Once),
            "daily" => Ok(RecurrenceType::Daily),
            "weekly" => Ok(RecurrenceType::Weekly),
            "monthly" => Ok(RecurrenceType::Monthly),
            _ => Err(ParseRecurrenceTypeError(s.to_string())),
        }
    }
}

impl std::fmt::Display for RecurrenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecurrenceType::Once => write!(f, "once"),
            RecurrenceType::Daily => write!(f, "daily"),
            RecurrenceType::Weekly => write!(f, "weekly"),
            RecurrenceType::Monthly => write!(f, "monthly"),
        }
    }
}

/// Bookings are owned by the booking subsystem; this core only reads
/// their status to decide whether destructive operations are safe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Declined,
    Cancelled,
    Completed,
    NoShow,
}

impl BookingStatus {
    /// Active bookings block schedule and template deletion.
    pub fn is_active(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}

/// A row in the `tours` table: either a reusable activity template
/// (`is_template = true`, no date or time slot) or a dated, bookable
/// instance generated from one.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tour {
    pub id: Uuid,
    pub operator_id: Uuid,
    pub tour_name: String,
    pub tour_type: String,
    pub description: Option<String>,
    pub activity_type: ActivityType,
    pub is_template: bool,
    pub tour_date: Option<NaiveDate>,
    pub time_slot: Option<NaiveTime>,
    pub duration_hours: Option<f64>,
    pub max_capacity: i64,
    pub available_spots: i64,
    pub original_price_adult: f64,
    pub discount_price_adult: f64,
    pub discount_price_child: f64,
    pub meeting_point: String,
    pub location: Option<String>,
    pub pickup_available: bool,
    pub equipment_included: bool,
    pub food_included: bool,
    pub drinks_included: bool,
    pub languages: Json<Vec<String>>,
    pub whale_regulation_compliant: bool,
    pub max_whale_group_size: i64,
    pub weather_dependent: bool,
    pub backup_plan: Option<String>,
    pub special_notes: Option<String>,
    pub min_age: Option<i64>,
    pub max_age: Option<i64>,
    pub fitness_level: Option<String>,
    pub requirements: Option<String>,
    pub restrictions: Option<String>,
    pub auto_close_hours: i64,
    pub status: TourStatus,
    /// Instance provenance: both references are always set together,
    /// templates carry neither.
    pub parent_template_id: Option<Uuid>,
    pub parent_schedule_id: Option<Uuid>,
    pub is_customized: bool,
    pub frozen_fields: Json<Vec<String>>,
    pub overrides: Json<serde_json::Value>,
    pub customization_timestamp: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Tour {
    fn default() -> Self {
        Self {
            id: Uuid::now_v7(),
            operator_id: Uuid::now_v7(),
            tour_name: String::new(),
            tour_type: String::new(),
            description: None,
            activity_type: ActivityType::Template,
            is_template: true,
            tour_date: None,
            time_slot: None,
            duration_hours: None,
            max_capacity: 1,
            available_spots: 1,
            original_price_adult: 0.0,
            discount_price_adult: 0.0,
            discount_price_child: 0.0,
            meeting_point: "TBD".to_string(),
            location: None,
            pickup_available: false,
            equipment_included: false,
            food_included: false,
            drinks_included: false,
            languages: Json(vec!["French".to_string()]),
            whale_regulation_compliant: false,
            max_whale_group_size: 6,
            weather_dependent: true,
            backup_plan: None,
            special_notes: None,
            min_age: None,
            max_age: None,
            fitness_level: None,
            requirements: None,
            restrictions: None,
            auto_close_hours: 2,
            status: TourStatus::Active,
            parent_template_id: None,
            parent_schedule_id: None,
            is_customized: false,
            frozen_fields: Json(Vec::new()),
            overrides: Json(serde_json::Value::Object(serde_json::Map::new())),
            customization_timestamp: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

impl Tour {
    /// Builds a template row from a validated payload. Templates never
    /// carry a date or time slot; availability mirrors capacity so the
    /// value propagates verbatim into generated instances.
    pub fn new_template(draft: &TemplateDraft) -> Self {
        Self {
            id: Uuid::now_v7(),
            operator_id: draft.operator_id,
            tour_name: draft.tour_name.clone(),
            tour_type: draft.tour_type.clone(),
            description: draft.description.clone(),
            activity_type: ActivityType::Template,
            is_template: true,
            tour_date: None,
            time_slot: None,
            duration_hours: draft.duration_hours,
            max_capacity: draft.max_capacity,
            available_spots: draft.max_capacity,
            original_price_adult: draft.original_price_adult,
            discount_price_adult: draft.discount_price_adult,
            discount_price_child: draft.discount_price_child,
            meeting_point: draft.meeting_point.clone(),
            location: draft.location.clone(),
            pickup_available: draft.pickup_available,
            equipment_included: draft.equipment_included,
            food_included: draft.food_included,
            drinks_included: draft.drinks_included,
            languages: Json(draft.languages.clone()),
            whale_regulation_compliant: draft.whale_regulation_compliant,
            max_whale_group_size: draft.max_whale_group_size,
            weather_dependent: draft.weather_dependent,
            backup_plan: draft.backup_plan.clone(),
            special_notes: draft.special_notes.clone(),
            min_age: draft.min_age,
            max_age: draft.max_age,
            fitness_level: draft.fitness_level.clone(),
            requirements: draft.requirements.clone(),
            restrictions: draft.restrictions.clone(),
            auto_close_hours: draft.auto_close_hours,
            status: TourStatus::Active,
            parent_template_id: None,
            parent_schedule_id: None,
            is_customized: false,
            frozen_fields: Json(Vec::new()),
            overrides: Json(serde_json::Value::Object(serde_json::Map::new())),
            customization_timestamp: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// Materializes one bookable instance of `template` for `date` under
    /// `schedule`. Every template attribute is copied verbatim; capacity
    /// counters start at full availability; both provenance references
    /// are stamped; customization tracking starts clean so later manual
    /// edits are distinguishable from template-propagated values.
    pub fn instance_from_template(template: &Tour, schedule: &Schedule, date: NaiveDate) -> Self {
        Self {
            id: Uuid::now_v7(),
            operator_id: template.operator_id,
            tour_name: template.tour_name.clone(),
            tour_type: template.tour_type.clone(),
            description: template.description.clone(),
            activity_type: ActivityType::Scheduled,
            is_template: false,
            tour_date: Some(date),
            time_slot: Some(schedule.start_time),
            duration_hours: template.duration_hours,
            max_capacity: template.max_capacity,
            available_spots: template.max_capacity,
            original_price_adult: template.original_price_adult,
            discount_price_adult: template.discount_price_adult,
            discount_price_child: template.discount_price_child,
            meeting_point: template.meeting_point.clone(),
            location: template.location.clone(),
            pickup_available: template.pickup_available,
            equipment_included: template.equipment_included,
            food_included: template.food_included,
            drinks_included: template.drinks_included,
            languages: template.languages.clone(),
            whale_regulation_compliant: template.whale_regulation_compliant,
            max_whale_group_size: template.max_whale_group_size,
            weather_dependent: template.weather_dependent,
            backup_plan: template.backup_plan.clone(),
            special_notes: template.special_notes.clone(),
            min_age: template.min_age,
            max_age: template.max_age,
            fitness_level: template.fitness_level.clone(),
            requirements: template.requirements.clone(),
            restrictions: template.restrictions.clone(),
            auto_close_hours: template.auto_close_hours,
            status: template.status.clone(),
            parent_template_id: Some(template.id),
            parent_schedule_id: Some(schedule.id),
            is_customized: false,
            frozen_fields: Json(Vec::new()),
            overrides: Json(serde_json::Value::Object(serde_json::Map::new())),
            customization_timestamp: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

/// A recurrence rule that expands a template into dated instances.
/// The template reference is explicit and mandatory, never inferred.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Schedule {
    pub id: Uuid,
    pub operator_id: Uuid,
    pub template_id: Uuid,
    pub recurrence_type: RecurrenceType,
    /// Weekday numbers, Monday=1 through Sunday=7. Required for weekly.
    pub days_of_week: Option<Json<Vec<u8>>>,
    pub start_time: NaiveTime,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Raw exception entries as supplied by the operator; may be plain
    /// dates or timestamps, normalized at expansion time.
    pub exceptions: Json<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Data Transfer Objects
// ============================================================================

/// Raw schedule-creation input as received from the presentation layer.
/// Everything is optional and untyped on purpose: presence and format
/// checks are the validator's job, and malformed input must surface as
/// validation codes rather than deserialization panics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleRequest {
    #[serde(default)]
    pub operator_id: Option<String>,
    #[serde(default)]
    pub template_id: Option<String>,
    #[serde(default)]
    pub recurrence_type: Option<String>,
    #[serde(default)]
    pub days_of_week: Option<Vec<u8>>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub exceptions: Option<Vec<String>>,
}

/// Fully-typed schedule payload produced by a successful validation.
/// Downstream steps never re-parse.
#[derive(Debug, Clone)]
pub struct ScheduleDraft {
    pub operator_id: Uuid,
    pub template_id: Uuid,
    pub recurrence_type: RecurrenceType,
    pub days_of_week: Option<Vec<u8>>,
    pub start_time: NaiveTime,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub exceptions: Vec<String>,
}

/// Raw template-creation input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplatePayload {
    #[serde(default)]
    pub operator_id: Option<String>,
    #[serde(default)]
    pub tour_name: Option<String>,
    #[serde(default)]
    pub tour_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration_hours: Option<f64>,
    #[serde(default)]
    pub max_capacity: Option<i64>,
    #[serde(default)]
    pub original_price_adult: Option<f64>,
    #[serde(default)]
    pub discount_price_adult: Option<f64>,
    #[serde(default)]
    pub discount_price_child: Option<f64>,
    #[serde(default)]
    pub meeting_point: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub pickup_available: Option<bool>,
    #[serde(default)]
    pub equipment_included: Option<bool>,
    #[serde(default)]
    pub food_included: Option<bool>,
    #[serde(default)]
    pub drinks_included: Option<bool>,
    #[serde(default)]
    pub languages: Option<Vec<String>>,
    #[serde(default)]
    pub whale_regulation_compliant: Option<bool>,
    #[serde(default)]
    pub max_whale_group_size: Option<i64>,
    #[serde(default)]
    pub weather_dependent: Option<bool>,
    #[serde(default)]
    pub min_age: Option<i64>,
    #[serde(default)]
    pub max_age: Option<i64>,
    #[serde(default)]
    pub fitness_level: Option<String>,
    #[serde(default)]
    pub requirements: Option<String>,
    #[serde(default)]
    pub restrictions: Option<String>,
    #[serde(default)]
    pub auto_close_hours: Option<i64>,
    #[serde(default)]
    pub backup_plan: Option<String>,
    #[serde(default)]
    pub special_notes: Option<String>,
}

/// Validated template payload with defaults applied.
#[derive(Debug, Clone)]
pub struct TemplateDraft {
    pub operator_id: Uuid,
    pub tour_name: String,
    pub tour_type: String,
    pub description: Option<String>,
    pub duration_hours: Option<f64>,
    pub max_capacity: i64,
    pub original_price_adult: f64,
    pub discount_price_adult: f64,
    pub discount_price_child: f64,
    pub meeting_point: String,
    pub location: Option<String>,
    pub pickup_available: bool,
    pub equipment_included: bool,
    pub food_included: bool,
    pub drinks_included: bool,
    pub languages: Vec<String>,
    pub whale_regulation_compliant: bool,
    pub max_whale_group_size: i64,
    pub weather_dependent: bool,
    pub min_age: Option<i64>,
    pub max_age: Option<i64>,
    pub fitness_level: Option<String>,
    pub requirements: Option<String>,
    pub restrictions: Option<String>,
    pub auto_close_hours: i64,
    pub backup_plan: Option<String>,
    pub special_notes: Option<String>,
}

/// Partial template edit; `Some(None)` clears a nullable column.
#[derive(Debug, Clone, Default)]
pub struct TemplateUpdate {
    pub tour_name: Option<String>,
    pub description: Option<Option<String>>,
    pub duration_hours: Option<Option<f64>>,
    pub max_capacity: Option<i64>,
    pub original_price_adult: Option<f64>,
    pub discount_price_adult: Option<f64>,
    pub discount_price_child: Option<f64>,
    pub meeting_point: Option<String>,
    pub status: Option<TourStatus>,
}

// ============================================================================
// Operation results and dependency reports
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InstantiationStatus {
    Success,
    Partial,
    Failed,
}

impl std::fmt::Display for InstantiationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstantiationStatus::Success => write!(f, "success"),
            InstantiationStatus::Partial => write!(f, "partial"),
            InstantiationStatus::Failed => write!(f, "failed"),
        }
    }
}

/// One date the instantiator could not persist, with the store error.
#[derive(Debug, Clone, Serialize)]
pub struct InstantiationFailure {
    pub date: NaiveDate,
    pub error: String,
}

/// Result of a schedule-creation call: the persisted rule plus the
/// instances that were actually materialized. A partial instantiation
/// is reported, never rolled back.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleCreation {
    pub schedule: Schedule,
    pub generated_instances: Vec<Tour>,
    pub generated_instances_count: usize,
    pub instantiation_status: InstantiationStatus,
    pub instantiation_error: Option<String>,
    pub failed_dates: Vec<InstantiationFailure>,
}

/// Counted dependency details of one type.
#[derive(Debug, Clone, Serialize)]
pub struct DependencyGroup<T> {
    pub count: usize,
    pub details: Vec<T>,
}

impl<T> DependencyGroup<T> {
    pub fn new(details: Vec<T>) -> Self {
        Self {
            count: details.len(),
            details,
        }
    }
}

/// Instance summary carried inside dependency reports.
#[derive(Debug, Clone, Serialize)]
pub struct InstanceDependency {
    pub id: Uuid,
    pub tour_name: String,
    pub tour_date: Option<NaiveDate>,
    pub time_slot: Option<NaiveTime>,
    pub status: TourStatus,
    pub is_customized: bool,
}

impl From<&Tour> for InstanceDependency {
    fn from(tour: &Tour) -> Self {
        Self {
            id: tour.id,
            tour_name: tour.tour_name.clone(),
            tour_date: tour.tour_date,
            time_slot: tour.time_slot,
            status: tour.status.clone(),
            is_customized: tour.is_customized,
        }
    }
}

/// Active-booking summary carried inside dependency reports.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BookingDependency {
    pub id: Uuid,
    pub tour_id: Uuid,
    pub booking_status: BookingStatus,
    pub customer_email: String,
    pub total_amount: f64,
}

/// What stands in the way of deleting a schedule. Active bookings are a
/// hard block; generated instances merely cascade.
#[derive(Debug, Clone, Serialize)]
pub struct DependencyReport {
    pub can_delete: bool,
    pub has_scheduled_instances: bool,
    pub scheduled_instances: DependencyGroup<InstanceDependency>,
    pub active_bookings: DependencyGroup<BookingDependency>,
    pub warnings: Vec<String>,
}

impl DependencyReport {
    pub fn assemble(instances: &[Tour], bookings: Vec<BookingDependency>) -> Self {
        let mut warnings = Vec::new();
        if !instances.is_empty() {
            warnings.push(format!(
                "This schedule has generated {} tour instances",
                instances.len()
            ));
        }
        if !bookings.is_empty() {
            warnings.push(format!(
                "{} customers have active bookings for this schedule",
                bookings.len()
            ));
        }

        Self {
            can_delete: bookings.is_empty(),
            has_scheduled_instances: !instances.is_empty(),
            scheduled_instances: DependencyGroup::new(
                instances.iter().map(InstanceDependency::from).collect(),
            ),
            active_bookings: DependencyGroup::new(bookings),
            warnings,
        }
    }
}

/// Receipt for a completed schedule deletion.
#[derive(Debug, Clone, Serialize)]
pub struct DeletionReceipt {
    pub schedule_id: Uuid,
    pub deleted_instances: u64,
}

/// Everything that depends on a template, for impact analysis before
/// deactivation or cascading deletion.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateDependencyReport {
    pub can_delete: bool,
    pub has_impact: bool,
    pub schedules: DependencyGroup<Schedule>,
    pub scheduled_instances: DependencyGroup<InstanceDependency>,
    pub customized_instances: usize,
    pub active_bookings: DependencyGroup<BookingDependency>,
    pub warnings: Vec<String>,
}

impl TemplateDependencyReport {
    pub fn assemble(
        schedules: Vec<Schedule>,
        instances: &[Tour],
        bookings: Vec<BookingDependency>,
    ) -> Self {
        let customized = instances.iter().filter(|t| t.is_customized).count();

        let mut warnings = Vec::new();
        if !schedules.is_empty() {
            warnings.push(format!(
                "This template is used by {} schedule(s)",
                schedules.len()
            ));
        }
        if !instances.is_empty() {
            warnings.push(format!(
                "{} tour instances have been generated from this template",
                instances.len()
            ));
        }
        if customized > 0 {
            warnings.push(format!(
                "{} tour instances have custom modifications that will be lost",
                customized
            ));
        }
        if !bookings.is_empty() {
            warnings.push(format!(
                "{} customers have active bookings for tours from this template",
                bookings.len()
            ));
        }

        Self {
            can_delete: bookings.is_empty(),
            has_impact: !schedules.is_empty() || !instances.is_empty(),
            schedules: DependencyGroup::new(schedules),
            scheduled_instances: DependencyGroup::new(
                instances.iter().map(InstanceDependency::from).collect(),
            ),
            customized_instances: customized,
            active_bookings: DependencyGroup::new(bookings),
            warnings,
        }
    }
}

/// Receipt for a completed template deactivation.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateDeletionReceipt {
    pub template_id: Uuid,
    pub deleted_schedules: u64,
    pub deleted_instances: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_schedule(template_id: Uuid, operator_id: Uuid) -> Schedule {
        Schedule {
            id: Uuid::now_v7(),
            operator_id,
            template_id,
            recurrence_type: RecurrenceType::Daily,
            days_of_week: None,
            start_time: NaiveTime::from_hms_opt(7, 30, 0).unwrap(),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            exceptions: Json(Vec::new()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn instance_copies_template_and_stamps_provenance() {
        let template = Tour {
            tour_name: "Whale Watching".to_string(),
            tour_type: "Whale Watching".to_string(),
            max_capacity: 8,
            available_spots: 3, // stale availability must not propagate
            discount_price_adult: 12000.0,
            whale_regulation_compliant: true,
            ..Default::default()
        };
        let schedule = sample_schedule(template.id, template.operator_id);
        let date = NaiveDate::from_ymd_opt(2025, 1, 4).unwrap();

        let instance = Tour::instance_from_template(&template, &schedule, date);

        assert!(!instance.is_template);
        assert_eq!(instance.activity_type, ActivityType::Scheduled);
        assert_eq!(instance.tour_date, Some(date));
        assert_eq!(instance.time_slot, Some(schedule.start_time));
        assert_eq!(instance.parent_template_id, Some(template.id));
        assert_eq!(instance.parent_schedule_id, Some(schedule.id));
        assert_eq!(instance.max_capacity, 8);
        assert_eq!(instance.available_spots, 8);
        assert_eq!(instance.discount_price_adult, 12000.0);
        assert!(instance.whale_regulation_compliant);
        assert!(!instance.is_customized);
        assert!(instance.frozen_fields.0.is_empty());
        assert!(instance.customization_timestamp.is_none());
    }

    #[test]
    fn recurrence_type_round_trips() {
        for raw in ["once", "daily", "weekly", "monthly"] {
            let parsed: RecurrenceType = raw.parse().unwrap();
            assert_eq!(parsed.to_string(), raw);
        }
        assert!("yearly".parse::<RecurrenceType>().is_err());
    }

    #[test]
    fn dependency_report_blocks_on_active_bookings() {
        let template = Tour::default();
        let schedule = sample_schedule(template.id, template.operator_id);
        let instance = Tour::instance_from_template(
            &template,
            &schedule,
            NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
        );
        let booking = BookingDependency {
            id: Uuid::now_v7(),
            tour_id: instance.id,
            booking_status: BookingStatus::Confirmed,
            customer_email: "guest@example.com".to_string(),
            total_amount: 24000.0,
        };
        assert!(booking.booking_status.is_active());
        assert!(!BookingStatus::Completed.is_active());

        let report = DependencyReport::assemble(std::slice::from_ref(&instance), vec![booking]);
        assert!(!report.can_delete);
        assert!(report.has_scheduled_instances);
        assert_eq!(report.scheduled_instances.count, 1);
        assert_eq!(report.active_bookings.count, 1);
        assert_eq!(report.warnings.len(), 2);

        let report = DependencyReport::assemble(&[instance], Vec::new());
        assert!(report.can_delete);
        assert_eq!(report.warnings.len(), 1);
    }
}
