//! Template lifecycle: creation, listing, edits, and dependency-aware
//! deactivation. Templates are soft-deleted (status set to cancelled)
//! so historical instances keep a resolvable origin.

use tracing::warn;
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::{
    TemplateDeletionReceipt, TemplateDependencyReport, TemplatePayload, TemplateUpdate, Tour,
    TourStatus,
};
use crate::repository::{
    BookingDependencyReader, InstanceStore, Repository, ScheduleStore, TemplateStore,
};
use crate::validation::validate_template_payload;

pub struct TemplateManager<R> {
    repository: R,
}

impl<R: Repository> TemplateManager<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Creates a reusable activity template. Templates never carry a
    /// date or time slot; those belong to generated instances.
    pub async fn create_template(&self, payload: TemplatePayload) -> Result<Tour, CoreError> {
        let draft = validate_template_payload(&payload).map_err(CoreError::Validation)?;
        let template = Tour::new_template(&draft);
        self.repository.insert_template(&template).await
    }

    /// Active templates for an operator, newest first.
    pub async fn list_templates(&self, operator_id: Uuid) -> Result<Vec<Tour>, CoreError> {
        self.repository.find_templates_for_operator(operator_id).await
    }

    pub async fn get_template(
        &self,
        template_id: Uuid,
        operator_id: Uuid,
    ) -> Result<Tour, CoreError> {
        self.repository
            .find_template(template_id, operator_id)
            .await?
            .ok_or(CoreError::TemplateNotFound(template_id))
    }

    pub async fn update_template(
        &self,
        template_id: Uuid,
        operator_id: Uuid,
        update: TemplateUpdate,
    ) -> Result<Tour, CoreError> {
        self.repository
            .update_template(template_id, operator_id, update)
            .await
    }

    /// Everything that would be affected by removing this template:
    /// the schedules expanding it, the instances generated from it,
    /// and the active bookings against those instances.
    pub async fn template_dependencies(
        &self,
        template_id: Uuid,
    ) -> Result<TemplateDependencyReport, CoreError> {
        let schedules = self
            .repository
            .find_schedules_for_template(template_id)
            .await?;
        let instances = self
            .repository
            .find_instances_for_template(template_id)
            .await?;
        let instance_ids: Vec<Uuid> = instances.iter().map(|t| t.id).collect();
        let bookings = self.repository.find_active_bookings(&instance_ids).await?;
        Ok(TemplateDependencyReport::assemble(
            schedules, &instances, bookings,
        ))
    }

    /// Soft-deletes a template.
    ///
    /// Active bookings are a hard block. Dependent schedules and
    /// instances require `force`, which cascades their deletion
    /// (instances first, best-effort, then schedules) before the
    /// template's status flips to cancelled.
    pub async fn deactivate_template(
        &self,
        template_id: Uuid,
        operator_id: Uuid,
        force: bool,
    ) -> Result<TemplateDeletionReceipt, CoreError> {
        let report = self.template_dependencies(template_id).await?;
        if !report.can_delete {
            return Err(CoreError::TemplateHasActiveBookings(Box::new(report)));
        }
        if report.schedules.count > 0 && !force {
            return Err(CoreError::TemplateHasDependencies(Box::new(report)));
        }

        // Ownership re-verified immediately before the destructive
        // steps; the dependency check is not an ownership check.
        self.repository
            .find_template(template_id, operator_id)
            .await?
            .ok_or(CoreError::TemplateNotFound(template_id))?;

        let mut deleted_instances = 0;
        let mut deleted_schedules = 0;
        if force && report.has_impact {
            deleted_instances = match self
                .repository
                .delete_instances_for_template(template_id)
                .await
            {
                Ok(count) => count,
                Err(err) => {
                    warn!(%template_id, error = %err, "could not delete all generated instances");
                    0
                }
            };
            deleted_schedules = self
                .repository
                .delete_schedules_for_template(template_id)
                .await?;
        }

        let template = self
            .repository
            .set_template_status(template_id, operator_id, TourStatus::Cancelled)
            .await?;

        Ok(TemplateDeletionReceipt {
            template_id: template.id,
            deleted_schedules,
            deleted_instances,
        })
    }
}
