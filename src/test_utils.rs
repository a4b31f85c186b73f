//! Shared test utilities for `AttendanceBuddy`.
//!
//! Helpers for setting up an in-memory database, building punch and pardon
//! rows without touching storage, and recording realistic days through the
//! real ledger.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use crate::{
    core::{
        pardon::{self, GrantPardon, PardonKind},
        punch::{self, PunchKind, PunchLocks, PunchRequest},
        schedule::{ScheduleRules, WorkDays},
    },
    entities::{day_pardon, punch_event},
    errors::Result,
};
use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::DatabaseConnection;
use std::sync::atomic::{AtomicI64, Ordering};

static NEXT_ID: AtomicI64 = AtomicI64::new(1);

fn next_id() -> i64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Shorthand for a calendar date.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// Shorthand for a wall-clock time on `day`.
pub fn at(day: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    day.and_hms_opt(hour, minute, 0).expect("valid test time")
}

/// Monday-Friday, 9h days with 8h Fridays, calendar-month periods.
pub fn standard_rules(employee_id: &str) -> ScheduleRules {
    ScheduleRules {
        employee_id: employee_id.to_string(),
        daily_hours: 9.0,
        friday_hours: 8.0,
        lunch_break_hours: 1.0,
        work_days: WorkDays::WEEKDAYS,
        period_start_day: 1,
        period_end_day: 0,
    }
}

/// An unsaved punch row with a unique ID.
pub fn punch_model(
    employee_id: &str,
    kind: PunchKind,
    timestamp: NaiveDateTime,
) -> punch_event::Model {
    punch_event::Model {
        id: next_id(),
        employee_id: employee_id.to_string(),
        kind: kind.as_str().to_string(),
        timestamp,
        work_date: timestamp.date(),
        location: None,
        note: None,
    }
}

/// The four punches of a regular day, as `(hour, minute)` pairs in ledger order.
pub fn full_day_punches(
    employee_id: &str,
    day: NaiveDate,
    times: [(u32, u32); 4],
) -> Vec<punch_event::Model> {
    PunchKind::ALL
        .into_iter()
        .zip(times)
        .map(|(kind, (hour, minute))| punch_model(employee_id, kind, at(day, hour, minute)))
        .collect()
}

/// An unsaved pardon row crediting `hours`.
pub fn pardon_model(employee_id: &str, date: NaiveDate, hours: f64) -> day_pardon::Model {
    day_pardon::Model {
        id: next_id(),
        employee_id: employee_id.to_string(),
        date,
        kind: PardonKind::Medical.as_str().to_string(),
        hours_credited: hours,
        justification: "Doctor's note".to_string(),
        approver_id: "admin".to_string(),
        created_at: at(date, 9, 0),
    }
}

/// Records a regular day through the ledger.
pub async fn record_full_day(
    db: &DatabaseConnection,
    locks: &PunchLocks,
    employee_id: &str,
    day: NaiveDate,
    times: [(u32, u32); 4],
) -> Result<()> {
    for (kind, (hour, minute)) in PunchKind::ALL.into_iter().zip(times) {
        punch::record_punch(
            db,
            locks,
            PunchRequest::new(employee_id, kind, at(day, hour, minute)),
        )
        .await?;
    }
    Ok(())
}

/// Grants a medical pardon approved by `admin`.
pub async fn grant_test_pardon(
    db: &DatabaseConnection,
    employee_id: &str,
    date: NaiveDate,
    hours: f64,
) -> Result<day_pardon::Model> {
    pardon::grant_pardon(
        db,
        GrantPardon {
            employee_id: employee_id.to_string(),
            date,
            kind: PardonKind::Medical,
            hours,
            justification: "Doctor's note".to_string(),
            approver_id: "admin".to_string(),
        },
    )
    .await
}
