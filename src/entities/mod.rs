//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables. The engine owns no
//! relationships to an employee table; employees are plain identifiers
//! supplied by the host.

pub mod day_pardon;
pub mod monthly_summary;
pub mod punch_event;
pub mod work_schedule;

// Re-export specific types to avoid conflicts
pub use day_pardon::{Column as DayPardonColumn, Entity as DayPardon, Model as DayPardonModel};
pub use monthly_summary::{
    Column as MonthlySummaryColumn, Entity as MonthlySummary, Model as MonthlySummaryModel,
};
pub use punch_event::{
    Column as PunchEventColumn, Entity as PunchEvent, Model as PunchEventModel,
};
pub use work_schedule::{
    Column as WorkScheduleColumn, Entity as WorkSchedule, Model as WorkScheduleModel,
};
