//! Punch event entity - A single timestamped clock action.
//!
//! Rows are append-only. `kind` is one of `clock_in`, `lunch_start`,
//! `lunch_end` or `clock_out`; `work_date` is the calendar day the punch
//! counts towards and is what the per-day state machine is keyed on.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Punch event database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "punch_events")]
pub struct Model {
    /// Unique identifier for the punch
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Employee who punched
    pub employee_id: String,
    /// Type of punch: `"clock_in"`, `"lunch_start"`, `"lunch_end"`, `"clock_out"`
    pub kind: String,
    /// When the punch happened (reference time zone)
    pub timestamp: DateTime,
    /// Calendar day of the punch
    pub work_date: Date,
    /// Optional free-form location (e.g. "office", "remote")
    pub location: Option<String>,
    /// Optional note attached by the employee
    pub note: Option<String>,
}

/// `PunchEvent` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
