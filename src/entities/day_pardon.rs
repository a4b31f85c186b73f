//! Day pardon entity - An administrative override for one calendar day.
//!
//! A pardon credits a fixed number of hours for a date and replaces whatever
//! the punches of that date would have produced. At most one pardon exists
//! per employee and date.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Day pardon database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "day_pardons")]
pub struct Model {
    /// Unique identifier for the pardon
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Employee the pardon applies to
    pub employee_id: String,
    /// Day being pardoned
    pub date: Date,
    /// Kind of pardon: `"medical"`, `"vacation"`, `"holiday"`, `"comp_time"`, `"other"`
    pub kind: String,
    /// Hours credited for the day as both worked and expected
    pub hours_credited: f64,
    /// Why the pardon was granted
    pub justification: String,
    /// Privileged actor who granted it
    pub approver_id: String,
    /// When the pardon was granted
    pub created_at: DateTime,
}

/// `DayPardon` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
