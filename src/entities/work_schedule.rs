//! Work schedule entity - One employee's time-accounting configuration.
//!
//! Holds the expected daily hours, the working weekdays, and the day-of-month
//! bounds of the employee's accounting period. Exactly one row per employee;
//! rows are created lazily with defaults the first time an employee is seen.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Work schedule database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "work_schedules")]
pub struct Model {
    /// Unique identifier for the schedule
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Employee this schedule belongs to
    #[sea_orm(unique)]
    pub employee_id: String,
    /// Expected hours on a regular work day
    pub daily_hours: f64,
    /// Expected hours on Friday
    pub friday_hours: f64,
    /// Nominal lunch break length in hours
    pub lunch_break_hours: f64,
    /// Comma-separated weekday indices, `0` = Monday through `6` = Sunday
    pub work_days: String,
    /// First day of the accounting period (1-31)
    pub period_start_day: i32,
    /// Last day of the accounting period (0-31, `0` = last day of month)
    pub period_end_day: i32,
    /// When the schedule was last modified
    pub updated_at: DateTime,
}

/// `WorkSchedule` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
