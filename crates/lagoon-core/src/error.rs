use thiserror::Error;
use uuid::Uuid;

use crate::conflict::ConflictDetails;
use crate::models::{DependencyReport, OperatorStatus, TemplateDependencyReport, TourStatus};
use crate::validation::ValidationCode;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("Payload failed validation: {0:?}")]
    Validation(Vec<ValidationCode>),

    #[error("Operator not found: {0}")]
    OperatorNotFound(Uuid),

    #[error("Operator {operator_id} is not active (status: {status})")]
    OperatorInactive {
        operator_id: Uuid,
        status: OperatorStatus,
    },

    #[error("Template not found or access denied: {0}")]
    TemplateNotFound(Uuid),

    #[error("Template {template_id} is not active (status: {status})")]
    TemplateInactive {
        template_id: Uuid,
        status: TourStatus,
    },

    #[error("Schedule conflicts with existing schedule {}", .0.conflicting_schedule_id)]
    ScheduleConflict(ConflictDetails),

    #[error("Schedule not found or access denied: {0}")]
    ScheduleNotFound(Uuid),

    #[error("Cannot delete schedule with active bookings")]
    ScheduleHasDependencies(Box<DependencyReport>),

    #[error("Cannot deactivate template with active bookings")]
    TemplateHasActiveBookings(Box<TemplateDependencyReport>),

    #[error("Template has dependent schedules and generated instances")]
    TemplateHasDependencies(Box<TemplateDependencyReport>),
}

impl CoreError {
    /// Stable machine-readable code for presentation layers. Human text
    /// comes from `Display`; structured detail from the variant payload.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::Database(_) | CoreError::Migration(_) | CoreError::Io(_) => {
                "UNEXPECTED_ERROR"
            }
            CoreError::Validation(_) => "VALIDATION_FAILED",
            CoreError::OperatorNotFound(_) => "OPERATOR_NOT_FOUND",
            CoreError::OperatorInactive { .. } => "OPERATOR_INACTIVE",
            CoreError::TemplateNotFound(_) => "TEMPLATE_NOT_FOUND",
            CoreError::TemplateInactive { .. } => "TEMPLATE_INACTIVE",
            CoreError::ScheduleConflict(_) => "SCHEDULE_CONFLICT",
            CoreError::ScheduleNotFound(_) => "SCHEDULE_NOT_FOUND",
            CoreError::ScheduleHasDependencies(_) => "SCHEDULE_HAS_DEPENDENCIES",
            CoreError::TemplateHasActiveBookings(_) => "TEMPLATE_HAS_ACTIVE_BOOKINGS",
            CoreError::TemplateHasDependencies(_) => "TEMPLATE_HAS_DEPENDENCIES",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(
            CoreError::Validation(vec![ValidationCode::StartDateRequired]).code(),
            "VALIDATION_FAILED"
        );
        assert_eq!(
            CoreError::OperatorNotFound(Uuid::nil()).code(),
            "OPERATOR_NOT_FOUND"
        );
        assert_eq!(
            CoreError::ScheduleNotFound(Uuid::nil()).code(),
            "SCHEDULE_NOT_FOUND"
        );
    }
}
