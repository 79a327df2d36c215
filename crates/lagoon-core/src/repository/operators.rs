use crate::error::CoreError;
use crate::models::Operator;
use crate::repository::SqliteRepository;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
impl super::OperatorStore for SqliteRepository {
    async fn find_operator(&self, id: Uuid) -> Result<Option<Operator>, CoreError> {
        let operator = sqlx::query_as("SELECT * FROM operators WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(operator)
    }
}
