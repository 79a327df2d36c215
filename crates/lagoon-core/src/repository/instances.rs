use crate::error::CoreError;
use crate::models::Tour;
use crate::repository::SqliteRepository;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
impl super::InstanceStore for SqliteRepository {
    async fn insert_instance(&self, instance: &Tour) -> Result<Tour, CoreError> {
        self.insert_tour_row(instance).await
    }

    async fn find_instances_for_schedule(&self, schedule_id: Uuid) -> Result<Vec<Tour>, CoreError> {
        let instances = sqlx::query_as(
            "SELECT * FROM tours WHERE parent_schedule_id = $1 ORDER BY tour_date ASC",
        )
        .bind(schedule_id)
        .fetch_all(self.pool())
        .await?;
        Ok(instances)
    }

    async fn find_instances_for_template(&self, template_id: Uuid) -> Result<Vec<Tour>, CoreError> {
        let instances = sqlx::query_as(
            r#"SELECT * FROM tours
            WHERE parent_template_id = $1 AND is_template = 0
            ORDER BY tour_date ASC"#,
        )
        .bind(template_id)
        .fetch_all(self.pool())
        .await?;
        Ok(instances)
    }

    async fn delete_instances_for_schedule(
        &self,
        schedule_id: Uuid,
        operator_id: Uuid,
    ) -> Result<u64, CoreError> {
        let result =
            sqlx::query("DELETE FROM tours WHERE parent_schedule_id = $1 AND operator_id = $2")
                .bind(schedule_id)
                .bind(operator_id)
                .execute(self.pool())
                .await?;
        Ok(result.rows_affected())
    }

    async fn delete_instances_for_template(&self, template_id: Uuid) -> Result<u64, CoreError> {
        let result =
            sqlx::query("DELETE FROM tours WHERE parent_template_id = $1 AND is_template = 0")
                .bind(template_id)
                .execute(self.pool())
                .await?;
        Ok(result.rows_affected())
    }
}
