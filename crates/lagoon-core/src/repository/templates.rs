use crate::error::CoreError;
use crate::models::{TemplateUpdate, Tour, TourStatus};
use crate::repository::SqliteRepository;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite};
use uuid::Uuid;

impl SqliteRepository {
    /// Shared insert for the `tours` table; templates and generated
    /// instances are rows of the same shape.
    pub(crate) async fn insert_tour_row(&self, tour: &Tour) -> Result<Tour, CoreError> {
        let inserted = sqlx::query_as(
            r#"INSERT INTO tours (
                id, operator_id, tour_name, tour_type, description,
                activity_type, is_template, tour_date, time_slot, duration_hours,
                max_capacity, available_spots, original_price_adult,
                discount_price_adult, discount_price_child, meeting_point,
                location, pickup_available, equipment_included, food_included,
                drinks_included, languages, whale_regulation_compliant,
                max_whale_group_size, weather_dependent, backup_plan,
                special_notes, min_age, max_age, fitness_level, requirements,
                restrictions, auto_close_hours, status, parent_template_id,
                parent_schedule_id, is_customized, frozen_fields, overrides,
                customization_timestamp, created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15, $16, $17, $18, $19, $20,
                $21, $22, $23, $24, $25, $26, $27, $28, $29, $30,
                $31, $32, $33, $34, $35, $36, $37, $38, $39, $40,
                $41, $42
            )
            RETURNING *"#,
        )
        .bind(tour.id)
        .bind(tour.operator_id)
        .bind(&tour.tour_name)
        .bind(&tour.tour_type)
        .bind(&tour.description)
        .bind(&tour.activity_type)
        .bind(tour.is_template)
        .bind(tour.tour_date)
        .bind(tour.time_slot)
        .bind(tour.duration_hours)
        .bind(tour.max_capacity)
        .bind(tour.available_spots)
        .bind(tour.original_price_adult)
        .bind(tour.discount_price_adult)
        .bind(tour.discount_price_child)
        .bind(&tour.meeting_point)
        .bind(&tour.location)
        .bind(tour.pickup_available)
        .bind(tour.equipment_included)
        .bind(tour.food_included)
        .bind(tour.drinks_included)
        .bind(&tour.languages)
        .bind(tour.whale_regulation_compliant)
        .bind(tour.max_whale_group_size)
        .bind(tour.weather_dependent)
        .bind(&tour.backup_plan)
        .bind(&tour.special_notes)
        .bind(tour.min_age)
        .bind(tour.max_age)
        .bind(&tour.fitness_level)
        .bind(&tour.requirements)
        .bind(&tour.restrictions)
        .bind(tour.auto_close_hours)
        .bind(&tour.status)
        .bind(tour.parent_template_id)
        .bind(tour.parent_schedule_id)
        .bind(tour.is_customized)
        .bind(&tour.frozen_fields)
        .bind(&tour.overrides)
        .bind(tour.customization_timestamp)
        .bind(tour.created_at)
        .bind(tour.updated_at)
        .fetch_one(self.pool())
        .await?;

        Ok(inserted)
    }
}

#[async_trait]
impl super::TemplateStore for SqliteRepository {
    async fn insert_template(&self, template: &Tour) -> Result<Tour, CoreError> {
        self.insert_tour_row(template).await
    }

    async fn find_template(&self, id: Uuid, operator_id: Uuid) -> Result<Option<Tour>, CoreError> {
        let template = sqlx::query_as(
            "SELECT * FROM tours WHERE id = $1 AND operator_id = $2 AND is_template = 1",
        )
        .bind(id)
        .bind(operator_id)
        .fetch_optional(self.pool())
        .await?;
        Ok(template)
    }

    async fn find_templates_for_operator(&self, operator_id: Uuid) -> Result<Vec<Tour>, CoreError> {
        let templates = sqlx::query_as(
            r#"SELECT * FROM tours
            WHERE operator_id = $1 AND is_template = 1 AND status = $2
            ORDER BY created_at DESC"#,
        )
        .bind(operator_id)
        .bind(TourStatus::Active)
        .fetch_all(self.pool())
        .await?;
        Ok(templates)
    }

    async fn update_template(
        &self,
        id: Uuid,
        operator_id: Uuid,
        data: TemplateUpdate,
    ) -> Result<Tour, CoreError> {
        let existing = self.find_template(id, operator_id).await?;
        if existing.is_none() {
            return Err(CoreError::TemplateNotFound(id));
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE tours SET ");
        let mut updated = false;

        if let Some(tour_name) = &data.tour_name {
            qb.push("tour_name = ");
            qb.push_bind(tour_name);
            updated = true;
        }
        if let Some(description) = &data.description {
            if updated {
                qb.push(", ");
            }
            qb.push("description = ");
            qb.push_bind(description);
            updated = true;
        }
        if let Some(duration_hours) = &data.duration_hours {
            if updated {
                qb.push(", ");
            }
            qb.push("duration_hours = ");
            qb.push_bind(duration_hours);
            updated = true;
        }
        if let Some(max_capacity) = data.max_capacity {
            if updated {
                qb.push(", ");
            }
            qb.push("max_capacity = ");
            qb.push_bind(max_capacity);
            updated = true;
        }
        if let Some(original_price_adult) = data.original_price_adult {
            if updated {
                qb.push(", ");
            }
            qb.push("original_price_adult = ");
            qb.push_bind(original_price_adult);
            updated = true;
        }
        if let Some(discount_price_adult) = data.discount_price_adult {
            if updated {
                qb.push(", ");
            }
            qb.push("discount_price_adult = ");
            qb.push_bind(discount_price_adult);
            updated = true;
        }
        if let Some(discount_price_child) = data.discount_price_child {
            if updated {
                qb.push(", ");
            }
            qb.push("discount_price_child = ");
            qb.push_bind(discount_price_child);
            updated = true;
        }
        if let Some(meeting_point) = &data.meeting_point {
            if updated {
                qb.push(", ");
            }
            qb.push("meeting_point = ");
            qb.push_bind(meeting_point);
            updated = true;
        }
        if let Some(status) = &data.status {
            if updated {
                qb.push(", ");
            }
            qb.push("status = ");
            qb.push_bind(status);
            updated = true;
        }

        if updated {
            qb.push(", updated_at = ");
            qb.push_bind(Utc::now());
            qb.push(" WHERE id = ");
            qb.push_bind(id);
            qb.push(" AND operator_id = ");
            qb.push_bind(operator_id);
            qb.push(" AND is_template = 1");

            qb.build().execute(self.pool()).await?;
        }

        self.find_template(id, operator_id)
            .await?
            .ok_or(CoreError::TemplateNotFound(id))
    }

    async fn set_template_status(
        &self,
        id: Uuid,
        operator_id: Uuid,
        status: TourStatus,
    ) -> Result<Tour, CoreError> {
        let template = sqlx::query_as(
            r#"UPDATE tours SET status = $1, updated_at = $2
            WHERE id = $3 AND operator_id = $4 AND is_template = 1
            RETURNING *"#,
        )
        .bind(&status)
        .bind(Utc::now())
        .bind(id)
        .bind(operator_id)
        .fetch_optional(self.pool())
        .await?;

        template.ok_or(CoreError::TemplateNotFound(id))
    }
}
