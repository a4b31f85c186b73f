//! Database configuration module for the attendance engine.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust models.

use crate::entities::{
    DayPardon, MonthlySummary, PunchEvent, WorkSchedule, day_pardon, monthly_summary,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema, sea_query::Index};
use tracing::debug;

const DEFAULT_DATABASE_URL: &str = "sqlite://data/attendance.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable, falling
/// back to a local `SQLite` file.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    debug!(%database_url, "Connecting to database");
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates the schedule, punch, pardon and summary tables and their unique
/// indexes if they do not exist.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut schedule_table = schema.create_table_from_entity(WorkSchedule);
    let mut punch_table = schema.create_table_from_entity(PunchEvent);
    let mut pardon_table = schema.create_table_from_entity(DayPardon);
    let mut summary_table = schema.create_table_from_entity(MonthlySummary);

    for table in [
        &mut schedule_table,
        &mut punch_table,
        &mut pardon_table,
        &mut summary_table,
    ] {
        table.if_not_exists();
        db.execute(builder.build(&*table)).await?;
    }

    // One pardon per employee and day, one cached summary per employee and period
    let pardon_day_index = Index::create()
        .name("idx_day_pardons_employee_date")
        .table(DayPardon)
        .col(day_pardon::Column::EmployeeId)
        .col(day_pardon::Column::Date)
        .unique()
        .if_not_exists()
        .to_owned();
    let summary_period_index = Index::create()
        .name("idx_monthly_summaries_employee_period")
        .table(MonthlySummary)
        .col(monthly_summary::Column::EmployeeId)
        .col(monthly_summary::Column::PeriodKey)
        .unique()
        .if_not_exists()
        .to_owned();

    db.execute(builder.build(&pardon_day_index)).await?;
    db.execute(builder.build(&summary_period_index)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        DayPardonModel, MonthlySummaryModel, PunchEventModel, WorkScheduleModel,
    };
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        let _: Vec<WorkScheduleModel> = WorkSchedule::find().limit(1).all(&db).await?;
        let _: Vec<PunchEventModel> = PunchEvent::find().limit(1).all(&db).await?;
        let _: Vec<DayPardonModel> = DayPardon::find().limit(1).all(&db).await?;
        let _: Vec<MonthlySummaryModel> = MonthlySummary::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_repeatable() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }
}
