use crate::error::CoreError;
use crate::models::BookingDependency;
use crate::repository::SqliteRepository;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite};
use uuid::Uuid;

#[async_trait]
impl super::BookingDependencyReader for SqliteRepository {
    async fn find_active_bookings(
        &self,
        tour_ids: &[Uuid],
    ) -> Result<Vec<BookingDependency>, CoreError> {
        if tour_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            r#"SELECT id, tour_id, booking_status, customer_email, total_amount
            FROM bookings
            WHERE booking_status IN ('pending', 'confirmed') AND tour_id IN ("#,
        );
        {
            let mut ids = qb.separated(", ");
            for id in tour_ids {
                ids.push_bind(*id);
            }
        }
        qb.push(")");

        let bookings = qb
            .build_query_as::<BookingDependency>()
            .fetch_all(self.pool())
            .await?;
        Ok(bookings)
    }
}
