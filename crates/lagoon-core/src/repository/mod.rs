use crate::db::DbPool;
use crate::error::CoreError;
use crate::models::{
    BookingDependency, Operator, Schedule, ScheduleDraft, TemplateUpdate, Tour, TourStatus,
};
use async_trait::async_trait;
use chrono::NaiveTime;
use uuid::Uuid;

// Re-export domain modules
pub mod bookings;
pub mod instances;
pub mod operators;
pub mod schedules;
pub mod templates;

// Traits are defined in this module and implemented in respective domain modules

/// Read access to operator accounts.
#[async_trait]
pub trait OperatorStore {
    async fn find_operator(&self, id: Uuid) -> Result<Option<Operator>, CoreError>;
}

/// Template rows in the `tours` table.
#[async_trait]
pub trait TemplateStore {
    async fn insert_template(&self, template: &Tour) -> Result<Tour, CoreError>;
    async fn find_template(&self, id: Uuid, operator_id: Uuid) -> Result<Option<Tour>, CoreError>;
    async fn find_templates_for_operator(&self, operator_id: Uuid) -> Result<Vec<Tour>, CoreError>;
    async fn update_template(
        &self,
        id: Uuid,
        operator_id: Uuid,
        data: TemplateUpdate,
    ) -> Result<Tour, CoreError>;
    async fn set_template_status(
        &self,
        id: Uuid,
        operator_id: Uuid,
        status: TourStatus,
    ) -> Result<Tour, CoreError>;
}

/// Recurrence rules.
#[async_trait]
pub trait ScheduleStore {
    async fn insert_schedule(&self, draft: &ScheduleDraft) -> Result<Schedule, CoreError>;
    async fn find_schedule(&self, id: Uuid) -> Result<Option<Schedule>, CoreError>;
    async fn find_schedule_for_operator(
        &self,
        id: Uuid,
        operator_id: Uuid,
    ) -> Result<Option<Schedule>, CoreError>;
    async fn find_schedules_for_operator(
        &self,
        operator_id: Uuid,
    ) -> Result<Vec<Schedule>, CoreError>;
    /// Existing rules competing for the same template and start time,
    /// oldest first, for conflict detection.
    async fn find_schedules_for_slot(
        &self,
        template_id: Uuid,
        start_time: NaiveTime,
        operator_id: Uuid,
    ) -> Result<Vec<Schedule>, CoreError>;
    async fn find_schedules_for_template(
        &self,
        template_id: Uuid,
    ) -> Result<Vec<Schedule>, CoreError>;
    async fn delete_schedule_row(&self, id: Uuid, operator_id: Uuid) -> Result<(), CoreError>;
    async fn delete_schedules_for_template(&self, template_id: Uuid) -> Result<u64, CoreError>;
}

/// Generated (scheduled) instance rows in the `tours` table.
#[async_trait]
pub trait InstanceStore {
    async fn insert_instance(&self, instance: &Tour) -> Result<Tour, CoreError>;
    async fn find_instances_for_schedule(&self, schedule_id: Uuid) -> Result<Vec<Tour>, CoreError>;
    async fn find_instances_for_template(&self, template_id: Uuid) -> Result<Vec<Tour>, CoreError>;
    async fn delete_instances_for_schedule(
        &self,
        schedule_id: Uuid,
        operator_id: Uuid,
    ) -> Result<u64, CoreError>;
    async fn delete_instances_for_template(&self, template_id: Uuid) -> Result<u64, CoreError>;
}

/// Read-only view into the booking subsystem: which active bookings
/// reference a set of tour instances. This crate never writes bookings.
#[async_trait]
pub trait BookingDependencyReader {
    async fn find_active_bookings(
        &self,
        tour_ids: &[Uuid],
    ) -> Result<Vec<BookingDependency>, CoreError>;
}

/// Main repository trait that composes all domain traits
#[async_trait]
pub trait Repository:
    OperatorStore + TemplateStore + ScheduleStore + InstanceStore + BookingDependencyReader
{
    // This trait automatically composes all domain-specific stores
}

/// SQLite implementation of the repository pattern
#[derive(Clone)]
pub struct SqliteRepository {
    pool: DbPool,
}

impl SqliteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the database pool for internal use across modules
    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }
}

impl Repository for SqliteRepository {}
