//! Monthly summary store - Cached period totals keyed by employee and period.
//!
//! Rows in `monthly_summaries` are a pure cache of [`period::aggregate`]. Any
//! mutation of punches, pardons or schedules drops the rows it could affect,
//! and the next read recomputes them. A cached row is served only while it
//! still matches what a recomputation would produce for the requested "today".

use crate::{
    config::schedule::ScheduleDefaults,
    core::{
        period::{self, PeriodTotals},
        schedule,
    },
    entities::{MonthlySummary, monthly_summary},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::{Set, TransactionTrait, prelude::*};
use tracing::{debug, info};

/// Whether a row computed through `computed_through` still answers for `today`.
///
/// Totals only depend on "today" while the period is running, so a row computed
/// after the period ended stays valid for any later day.
#[must_use]
pub fn is_fresh(summary: &monthly_summary::Model, today: NaiveDate) -> bool {
    summary.computed_through == today
        || (summary.period_end <= summary.computed_through && summary.period_end <= today)
}

fn count_column(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn apply_totals(active: &mut monthly_summary::ActiveModel, totals: &PeriodTotals) {
    active.period_start = Set(totals.period.first_day);
    active.period_end = Set(totals.period.last_day);
    active.worked_hours = Set(totals.worked_hours);
    active.expected_hours = Set(totals.expected_hours);
    active.expected_hours_to_date = Set(totals.expected_hours_to_date);
    active.pardoned_hours = Set(totals.pardoned_hours);
    active.balance_hours = Set(totals.balance_hours);
    active.days_present = Set(count_column(totals.days_present));
    active.days_absent = Set(count_column(totals.days_absent));
    active.computed_through = Set(totals.computed_through);
}

/// Looks up the cached row for an employee's period key.
pub async fn get_cached_summary<C>(
    db: &C,
    employee_id: &str,
    period_key: &str,
) -> Result<Option<monthly_summary::Model>>
where
    C: ConnectionTrait,
{
    MonthlySummary::find()
        .filter(monthly_summary::Column::EmployeeId.eq(employee_id))
        .filter(monthly_summary::Column::PeriodKey.eq(period_key))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Stores totals, replacing any row already cached for the same period.
pub async fn upsert_summary(
    db: &DatabaseConnection,
    totals: &PeriodTotals,
) -> Result<monthly_summary::Model> {
    let employee_id = &totals.period.employee_id;
    let period_key = totals.period.key();

    let txn = db.begin().await?;

    let stored = if let Some(existing) = get_cached_summary(&txn, employee_id, &period_key).await? {
        let mut active: monthly_summary::ActiveModel = existing.into();
        apply_totals(&mut active, totals);
        active.update(&txn).await?
    } else {
        let mut active = monthly_summary::ActiveModel {
            employee_id: Set(employee_id.clone()),
            period_key: Set(period_key),
            ..Default::default()
        };
        apply_totals(&mut active, totals);
        active.insert(&txn).await?
    };

    txn.commit().await?;

    Ok(stored)
}

/// Returns the summary of the period containing `reference`.
///
/// Serves the cached row when it is still fresh for `today`; otherwise, or
/// when `force_refresh` is set, recomputes from punches and pardons and
/// stores the result.
pub async fn get_period_summary(
    db: &DatabaseConnection,
    employee_id: &str,
    reference: NaiveDate,
    today: NaiveDate,
    defaults: &ScheduleDefaults,
    force_refresh: bool,
) -> Result<monthly_summary::Model> {
    let period = schedule::resolve_period(db, employee_id, reference, defaults).await?;

    if !force_refresh {
        let cached = get_cached_summary(db, employee_id, &period.key()).await?;
        if let Some(cached) = cached.filter(|row| is_fresh(row, today)) {
            debug!(employee_id, period = %cached.period_key, "Serving cached summary");
            return Ok(cached);
        }
    }

    let totals = period::compute_period_totals(db, employee_id, reference, today, defaults).await?;
    let stored = upsert_summary(db, &totals).await?;

    debug!(
        employee_id,
        period = %stored.period_key,
        computed_through = %stored.computed_through,
        force_refresh,
        "Recomputed summary"
    );

    Ok(stored)
}

/// Recomputes the current summary of every employee with a stored schedule.
pub async fn refresh_all_summaries(
    db: &DatabaseConnection,
    reference: NaiveDate,
    today: NaiveDate,
    defaults: &ScheduleDefaults,
) -> Result<Vec<monthly_summary::Model>> {
    let mut refreshed = Vec::new();

    for schedule in schedule::get_all_schedules(db).await? {
        let summary =
            get_period_summary(db, &schedule.employee_id, reference, today, defaults, true)
                .await?;
        refreshed.push(summary);
    }

    info!(employees = refreshed.len(), %reference, "Refreshed all summaries");

    Ok(refreshed)
}

/// Drops cached summaries of an employee whose period covers `date`.
///
/// Returns how many rows were removed.
pub async fn invalidate_summaries_covering<C>(
    db: &C,
    employee_id: &str,
    date: NaiveDate,
) -> Result<u64>
where
    C: ConnectionTrait,
{
    let result = MonthlySummary::delete_many()
        .filter(monthly_summary::Column::EmployeeId.eq(employee_id))
        .filter(monthly_summary::Column::PeriodStart.lte(date))
        .filter(monthly_summary::Column::PeriodEnd.gte(date))
        .exec(db)
        .await?;

    if result.rows_affected > 0 {
        debug!(employee_id, %date, dropped = result.rows_affected, "Invalidated summaries");
    }

    Ok(result.rows_affected)
}

/// Drops every cached summary of an employee.
pub async fn invalidate_employee_summaries<C>(db: &C, employee_id: &str) -> Result<u64>
where
    C: ConnectionTrait,
{
    let result = MonthlySummary::delete_many()
        .filter(monthly_summary::Column::EmployeeId.eq(employee_id))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

/// Formats a summary row for chat output.
#[must_use]
pub fn format_summary(summary: &monthly_summary::Model) -> String {
    let sign = if summary.balance_hours >= 0.0 { "+" } else { "" };

    [
        format!(
            "Period {} → {} (as of {})",
            summary.period_start.format("%Y-%m-%d"),
            summary.period_end.format("%Y-%m-%d"),
            summary.computed_through.format("%Y-%m-%d"),
        ),
        format!("  Worked: {:.2}h", summary.worked_hours),
        format!("  Pardoned: {:.2}h", summary.pardoned_hours),
        format!(
            "  Expected: {:.2}h to date / {:.2}h in period",
            summary.expected_hours_to_date, summary.expected_hours
        ),
        format!("  Balance: {sign}{:.2}h", summary.balance_hours),
        format!(
            "  Days present: {} | Days absent: {}",
            summary.days_present, summary.days_absent
        ),
    ]
    .join("\n")
}
