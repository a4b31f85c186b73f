//! Monthly summary entity - Cached aggregate of one accounting period.
//!
//! Every column is derived from punches, pardons and the work schedule. Rows
//! may be deleted at any time and are rebuilt by recomputation.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Monthly summary database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "monthly_summaries")]
pub struct Model {
    /// Unique identifier for the summary row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Employee the summary belongs to
    pub employee_id: String,
    /// Period key in the form `YYYY-MM-DD/YYYY-MM-DD`
    pub period_key: String,
    /// First day of the period
    pub period_start: Date,
    /// Last day of the period
    pub period_end: Date,
    /// Punch-derived hours worked in the period
    pub worked_hours: f64,
    /// Expected hours over the whole period
    pub expected_hours: f64,
    /// Expected hours up to the day the summary was computed through
    pub expected_hours_to_date: f64,
    /// Hours credited by pardons up to that day
    pub pardoned_hours: f64,
    /// `(worked + pardoned) - expected_to_date`
    pub balance_hours: f64,
    /// Days with worked hours or a pardon
    pub days_present: i32,
    /// Work days without hours or pardon
    pub days_absent: i32,
    /// The "today" the aggregate was computed for
    pub computed_through: Date,
}

/// `MonthlySummary` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
