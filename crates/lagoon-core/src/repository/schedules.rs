use crate::error::CoreError;
use crate::models::{Schedule, ScheduleDraft};
use crate::repository::SqliteRepository;
use async_trait::async_trait;
use chrono::{NaiveTime, Utc};
use sqlx::types::Json;
use uuid::Uuid;

#[async_trait]
impl super::ScheduleStore for SqliteRepository {
    async fn insert_schedule(&self, draft: &ScheduleDraft) -> Result<Schedule, CoreError> {
        let schedule = Schedule {
            id: Uuid::now_v7(),
            operator_id: draft.operator_id,
            template_id: draft.template_id,
            recurrence_type: draft.recurrence_type,
            days_of_week: draft.days_of_week.clone().map(Json),
            start_time: draft.start_time,
            start_date: draft.start_date,
            end_date: draft.end_date,
            exceptions: Json(draft.exceptions.clone()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        sqlx::query(
            r#"INSERT INTO schedules (
                id, operator_id, template_id, recurrence_type, days_of_week,
                start_time, start_date, end_date, exceptions, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)"#,
        )
        .bind(schedule.id)
        .bind(schedule.operator_id)
        .bind(schedule.template_id)
        .bind(&schedule.recurrence_type)
        .bind(&schedule.days_of_week)
        .bind(schedule.start_time)
        .bind(schedule.start_date)
        .bind(schedule.end_date)
        .bind(&schedule.exceptions)
        .bind(schedule.created_at)
        .bind(schedule.updated_at)
        .execute(self.pool())
        .await?;

        Ok(schedule)
    }

    async fn find_schedule(&self, id: Uuid) -> Result<Option<Schedule>, CoreError> {
        let schedule = sqlx::query_as("SELECT * FROM schedules WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(schedule)
    }

    async fn find_schedule_for_operator(
        &self,
        id: Uuid,
        operator_id: Uuid,
    ) -> Result<Option<Schedule>, CoreError> {
        let schedule = sqlx::query_as("SELECT * FROM schedules WHERE id = $1 AND operator_id = $2")
            .bind(id)
            .bind(operator_id)
            .fetch_optional(self.pool())
            .await?;
        Ok(schedule)
    }

    async fn find_schedules_for_operator(
        &self,
        operator_id: Uuid,
    ) -> Result<Vec<Schedule>, CoreError> {
        let schedules = sqlx::query_as(
            "SELECT * FROM schedules WHERE operator_id = $1 ORDER BY created_at DESC",
        )
        .bind(operator_id)
        .fetch_all(self.pool())
        .await?;
        Ok(schedules)
    }

    async fn find_schedules_for_slot(
        &self,
        template_id: Uuid,
        start_time: NaiveTime,
        operator_id: Uuid,
    ) -> Result<Vec<Schedule>, CoreError> {
        let schedules = sqlx::query_as(
            r#"SELECT * FROM schedules
            WHERE template_id = $1 AND start_time = $2 AND operator_id = $3
            ORDER BY created_at ASC"#,
        )
        .bind(template_id)
        .bind(start_time)
        .bind(operator_id)
        .fetch_all(self.pool())
        .await?;
        Ok(schedules)
    }

    async fn find_schedules_for_template(
        &self,
        template_id: Uuid,
    ) -> Result<Vec<Schedule>, CoreError> {
        let schedules = sqlx::query_as(
            "SELECT * FROM schedules WHERE template_id = $1 ORDER BY created_at ASC",
        )
        .bind(template_id)
        .fetch_all(self.pool())
        .await?;
        Ok(schedules)
    }

    async fn delete_schedule_row(&self, id: Uuid, operator_id: Uuid) -> Result<(), CoreError> {
        let result = sqlx::query("DELETE FROM schedules WHERE id = $1 AND operator_id = $2")
            .bind(id)
            .bind(operator_id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::ScheduleNotFound(id));
        }
        Ok(())
    }

    async fn delete_schedules_for_template(&self, template_id: Uuid) -> Result<u64, CoreError> {
        let result = sqlx::query("DELETE FROM schedules WHERE template_id = $1")
            .bind(template_id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected())
    }
}
