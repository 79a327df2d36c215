//! Schedule lifecycle orchestration: creation pipeline (validate,
//! guard, conflict-check, persist, expand, instantiate) and guarded
//! deletion with dependency resolution.
//!
//! Every step that touches the store is awaited before the next starts,
//! because later steps depend on identities committed by earlier writes
//! (instances reference the persisted rule). There is no background
//! work and no cross-call shared state beyond the store itself.

use chrono::NaiveDate;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::conflict::{ConflictDetector, ConflictPolicy};
use crate::error::CoreError;
use crate::models::{
    DeletionReceipt, DependencyReport, InstantiationFailure, InstantiationStatus,
    OperatorStatus, Schedule, ScheduleCreation, ScheduleRequest, Tour, TourStatus,
};
use crate::recurrence::{CalendarConfig, RecurrencePattern, ScheduleCalendar};
use crate::repository::{
    BookingDependencyReader, InstanceStore, OperatorStore, Repository, ScheduleStore,
    TemplateStore,
};
use crate::validation::validate_schedule_request;

/// Tuning knobs for the scheduling engine.
#[derive(Debug, Clone, Default)]
pub struct SchedulingConfig {
    pub calendar: CalendarConfig,
    pub conflict_policy: ConflictPolicy,
}

/// Orchestrates schedule creation and deletion over a repository.
pub struct ScheduleManager<R> {
    repository: R,
    calendar: ScheduleCalendar,
    detector: ConflictDetector,
}

impl<R: Repository> ScheduleManager<R> {
    pub fn new(repository: R, config: SchedulingConfig) -> Self {
        let calendar = ScheduleCalendar::new(config.calendar);
        let detector = ConflictDetector::new(config.conflict_policy, calendar.clone());
        Self {
            repository,
            calendar,
            detector,
        }
    }

    pub fn with_defaults(repository: R) -> Self {
        Self::new(repository, SchedulingConfig::default())
    }

    /// Creates a recurrence rule and materializes its instances.
    ///
    /// Pipeline: validate the payload, verify the operator is active,
    /// verify the template exists/belongs/is active, check for
    /// conflicting rules on the same slot, persist the rule, expand its
    /// dates, then create one instance per date. Instantiation failures
    /// after the rule is committed are reported in the result rather
    /// than rolled back.
    pub async fn create_schedule(
        &self,
        request: ScheduleRequest,
    ) -> Result<ScheduleCreation, CoreError> {
        let draft = validate_schedule_request(&request).map_err(CoreError::Validation)?;

        // An inactive operator may not schedule anything, whatever the
        // template's state, so this guard runs first.
        let operator = self
            .repository
            .find_operator(draft.operator_id)
            .await?
            .ok_or(CoreError::OperatorNotFound(draft.operator_id))?;
        if operator.status != OperatorStatus::Active {
            return Err(CoreError::OperatorInactive {
                operator_id: operator.id,
                status: operator.status,
            });
        }

        let template = self
            .repository
            .find_template(draft.template_id, draft.operator_id)
            .await?
            .ok_or(CoreError::TemplateNotFound(draft.template_id))?;
        if template.status != TourStatus::Active {
            return Err(CoreError::TemplateInactive {
                template_id: template.id,
                status: template.status,
            });
        }

        // Advisory check: a failing lookup must not block rule
        // creation, so it degrades to "no conflict" with a warning.
        match self
            .repository
            .find_schedules_for_slot(draft.template_id, draft.start_time, draft.operator_id)
            .await
        {
            Ok(existing) => {
                if let Some(conflict) = self.detector.detect(&draft, &existing) {
                    return Err(CoreError::ScheduleConflict(conflict));
                }
            }
            Err(err) => {
                warn!(error = %err, template_id = %draft.template_id, "conflict check skipped");
            }
        }

        let schedule = self.repository.insert_schedule(&draft).await?;
        let dates = self.calendar.expand(&RecurrencePattern::from_draft(&draft));
        debug!(schedule_id = %schedule.id, dates = dates.len(), "expanded schedule dates");

        let (instances, failures) = self.instantiate(&template, &schedule, &dates).await;
        let status = instantiation_status(dates.len(), instances.len());

        Ok(ScheduleCreation {
            generated_instances_count: instances.len(),
            instantiation_status: status,
            instantiation_error: failures.first().map(|f| f.error.clone()),
            failed_dates: failures,
            generated_instances: instances,
            schedule,
        })
    }

    /// Creates one instance per date, ascending, never rolling back the
    /// dates that already succeeded.
    async fn instantiate(
        &self,
        template: &Tour,
        schedule: &Schedule,
        dates: &[NaiveDate],
    ) -> (Vec<Tour>, Vec<InstantiationFailure>) {
        let mut created = Vec::with_capacity(dates.len());
        let mut failures = Vec::new();

        for &date in dates {
            let row = Tour::instance_from_template(template, schedule, date);
            match self.repository.insert_instance(&row).await {
                Ok(instance) => created.push(instance),
                Err(err) => {
                    warn!(schedule_id = %schedule.id, %date, error = %err, "failed to create scheduled instance");
                    failures.push(InstantiationFailure {
                        date,
                        error: err.to_string(),
                    });
                }
            }
        }

        (created, failures)
    }

    pub async fn get_schedule(&self, schedule_id: Uuid) -> Result<Schedule, CoreError> {
        self.repository
            .find_schedule(schedule_id)
            .await?
            .ok_or(CoreError::ScheduleNotFound(schedule_id))
    }

    pub async fn list_schedules(&self, operator_id: Uuid) -> Result<Vec<Schedule>, CoreError> {
        self.repository.find_schedules_for_operator(operator_id).await
    }

    /// Computes what currently depends on a rule: its generated
    /// instances, and the active bookings against those instances.
    pub async fn schedule_dependencies(
        &self,
        schedule_id: Uuid,
    ) -> Result<DependencyReport, CoreError> {
        let instances = self
            .repository
            .find_instances_for_schedule(schedule_id)
            .await?;
        let instance_ids: Vec<Uuid> = instances.iter().map(|t| t.id).collect();
        let bookings = self.repository.find_active_bookings(&instance_ids).await?;
        Ok(DependencyReport::assemble(&instances, bookings))
    }

    /// Deletes a rule and its generated instances, unless active
    /// bookings depend on them.
    ///
    /// Active bookings halt the operation with the full dependency
    /// breakdown and leave every row untouched. Otherwise ownership is
    /// re-verified immediately before the destructive steps (the
    /// dependency check is not an ownership check), instances are
    /// removed best-effort, and finally the rule itself is deleted.
    /// Instance and rule deletion are two separate commits; a leftover
    /// orphan instance is preferable to an undeletable rule.
    pub async fn delete_schedule(
        &self,
        schedule_id: Uuid,
        operator_id: Uuid,
    ) -> Result<DeletionReceipt, CoreError> {
        let report = self.schedule_dependencies(schedule_id).await?;
        if !report.can_delete {
            return Err(CoreError::ScheduleHasDependencies(Box::new(report)));
        }

        let schedule = self
            .repository
            .find_schedule_for_operator(schedule_id, operator_id)
            .await?
            .ok_or(CoreError::ScheduleNotFound(schedule_id))?;

        let deleted_instances = if report.has_scheduled_instances {
            match self
                .repository
                .delete_instances_for_schedule(schedule.id, operator_id)
                .await
            {
                Ok(count) => count,
                Err(err) => {
                    warn!(schedule_id = %schedule.id, error = %err, "could not delete all scheduled instances");
                    0
                }
            }
        } else {
            0
        };

        self.repository
            .delete_schedule_row(schedule.id, operator_id)
            .await?;
        debug!(schedule_id = %schedule.id, deleted_instances, "schedule deleted");

        Ok(DeletionReceipt {
            schedule_id: schedule.id,
            deleted_instances,
        })
    }
}

fn instantiation_status(requested: usize, created: usize) -> InstantiationStatus {
    if created == requested {
        InstantiationStatus::Success
    } else if created == 0 {
        InstantiationStatus::Failed
    } else {
        InstantiationStatus::Partial
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_reflects_created_versus_requested() {
        assert_eq!(instantiation_status(0, 0), InstantiationStatus::Success);
        assert_eq!(instantiation_status(5, 5), InstantiationStatus::Success);
        assert_eq!(instantiation_status(5, 3), InstantiationStatus::Partial);
        assert_eq!(instantiation_status(5, 0), InstantiationStatus::Failed);
    }
}
