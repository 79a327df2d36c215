//! # Lagoon Core Library
//!
//! Scheduling core for the Lagoon activity booking platform: operators
//! define a reusable activity template once, then expand it into many
//! dated, bookable tour instances through a recurrence rule.
//!
//! ## Features
//!
//! - **Template-Based Schedules**: once, daily, weekly and monthly
//!   recurrence with per-rule exception dates
//! - **Fixed Local Calendar**: date expansion runs in an explicit
//!   operator-local calendar, never the machine's timezone
//! - **Conflict Detection**: advisory overlap checks against existing
//!   rules on the same template and start time
//! - **Safe Deletion**: dependency-aware cascades that refuse to touch
//!   rules with active customer bookings
//! - **Repository Pattern**: async store traits over SQLite with sqlx
//!
//! ## Core Modules
//!
//! - [`db`]: Database connection and migration management
//! - [`models`]: Core data structures and transfer objects
//! - [`validation`]: Collect-all payload validation
//! - [`recurrence`]: Date sequence expansion
//! - [`conflict`]: Overlap detection between recurrence rules
//! - [`repository`]: Data access layer with Repository pattern
//! - [`scheduling`]: Schedule creation and deletion orchestration
//! - [`templates`]: Template lifecycle management
//! - [`error`]: Error types with stable machine-readable codes
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use lagoon_core::{
//!     db,
//!     models::ScheduleRequest,
//!     repository::SqliteRepository,
//!     scheduling::ScheduleManager,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), lagoon_core::error::CoreError> {
//!     let pool = db::establish_connection("lagoon.db").await?;
//!     let manager = ScheduleManager::with_defaults(SqliteRepository::new(pool));
//!
//!     // Every Monday and Wednesday morning for a quarter
//!     let request = ScheduleRequest {
//!         operator_id: Some("0194e6a0-5b7a-7c91-a8d3-2f4b6c8e0a12".to_string()),
//!         template_id: Some("0194e6a0-6c8b-7da2-b9e4-3a5c7d9f1b23".to_string()),
//!         recurrence_type: Some("weekly".to_string()),
//!         days_of_week: Some(vec![1, 3]),
//!         start_time: Some("07:30".to_string()),
//!         start_date: Some("2025-01-01".to_string()),
//!         end_date: Some("2025-03-31".to_string()),
//!         exceptions: None,
//!     };
//!
//!     let creation = manager.create_schedule(request).await?;
//!     println!(
//!         "schedule {} generated {} tours ({})",
//!         creation.schedule.id,
//!         creation.generated_instances_count,
//!         creation.instantiation_status,
//!     );
//!     Ok(())
//! }
//! ```

pub mod conflict;
pub mod db;
pub mod error;
pub mod models;
pub mod recurrence;
pub mod repository;
pub mod scheduling;
pub mod templates;
pub mod validation;
