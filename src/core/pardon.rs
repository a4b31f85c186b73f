//! Day pardon business logic - Granting, revoking and looking up pardons.
//!
//! A pardon credits a fixed number of hours for one day and fully replaces
//! whatever the punches of that day would produce. Only privileged actors
//! manage pardons; the caller is expected to have run
//! [`crate::core::access::AccessPolicy::authorize`] first.

use crate::{
    core::summary,
    entities::{DayPardon, day_pardon},
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Serialize;
use std::{fmt, str::FromStr};
use tracing::info;

/// Upper bound for hours credited on a single day.
pub const MAX_CREDIT_HOURS: f64 = 24.0;

/// Reason a day is pardoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PardonKind {
    /// Medical certificate or sick leave
    Medical,
    /// Paid vacation day
    Vacation,
    /// Public or company holiday
    Holiday,
    /// Compensatory time off
    CompTime,
    /// Anything else; the justification explains it
    Other,
}

impl PardonKind {
    /// Every pardon kind.
    pub const ALL: [Self; 5] = [
        Self::Medical,
        Self::Vacation,
        Self::Holiday,
        Self::CompTime,
        Self::Other,
    ];

    /// Column representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Medical => "medical",
            Self::Vacation => "vacation",
            Self::Holiday => "holiday",
            Self::CompTime => "comp_time",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for PardonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PardonKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| Error::UnknownKind {
                what: "pardon kind",
                value: s.to_string(),
            })
    }
}

/// A request to pardon one day.
#[derive(Debug, Clone, PartialEq)]
pub struct GrantPardon {
    /// Employee being pardoned
    pub employee_id: String,
    /// Day being pardoned
    pub date: NaiveDate,
    /// Reason category
    pub kind: PardonKind,
    /// Hours credited as both worked and expected
    pub hours: f64,
    /// Free-form justification
    pub justification: String,
    /// Privileged actor granting it
    pub approver_id: String,
}

/// Returns the pardon for an employee's day, if any.
pub async fn get_pardon_for_day<C>(
    db: &C,
    employee_id: &str,
    date: NaiveDate,
) -> Result<Option<day_pardon::Model>>
where
    C: ConnectionTrait,
{
    DayPardon::find()
        .filter(day_pardon::Column::EmployeeId.eq(employee_id))
        .filter(day_pardon::Column::Date.eq(date))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Returns an employee's pardons between two days (inclusive), ordered by date.
pub async fn get_pardons_in_range<C>(
    db: &C,
    employee_id: &str,
    first_day: NaiveDate,
    last_day: NaiveDate,
) -> Result<Vec<day_pardon::Model>>
where
    C: ConnectionTrait,
{
    DayPardon::find()
        .filter(day_pardon::Column::EmployeeId.eq(employee_id))
        .filter(day_pardon::Column::Date.between(first_day, last_day))
        .order_by_asc(day_pardon::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Credits hours for one day, replacing that day's punch-derived hours.
///
/// # Errors
/// * [`Error::InvalidHours`] when `hours` is negative, not finite, or above a day
/// * [`Error::DuplicatePardon`] when the day is already pardoned
pub async fn grant_pardon(db: &DatabaseConnection, request: GrantPardon) -> Result<day_pardon::Model> {
    if !request.hours.is_finite() || !(0.0..=MAX_CREDIT_HOURS).contains(&request.hours) {
        return Err(Error::InvalidHours {
            hours: request.hours,
        });
    }

    let txn = db.begin().await?;

    if get_pardon_for_day(&txn, &request.employee_id, request.date)
        .await?
        .is_some()
    {
        return Err(Error::DuplicatePardon {
            employee_id: request.employee_id,
            date: request.date,
        });
    }

    let pardon = day_pardon::ActiveModel {
        employee_id: Set(request.employee_id.clone()),
        date: Set(request.date),
        kind: Set(request.kind.as_str().to_string()),
        hours_credited: Set(request.hours),
        justification: Set(request.justification.trim().to_string()),
        approver_id: Set(request.approver_id.clone()),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };
    let granted = pardon.insert(&txn).await?;

    summary::invalidate_summaries_covering(&txn, &request.employee_id, request.date).await?;

    txn.commit().await?;

    info!(
        pardon_id = granted.id,
        employee_id = %granted.employee_id,
        date = %granted.date,
        kind = %request.kind,
        hours = granted.hours_credited,
        approver_id = %granted.approver_id,
        "Granted pardon"
    );

    Ok(granted)
}

/// Removes a pardon, restoring the day's punch-derived hours.
///
/// # Errors
/// [`Error::NotFound`] when no pardon has this ID.
pub async fn revoke_pardon(db: &DatabaseConnection, pardon_id: i64) -> Result<day_pardon::Model> {
    let txn = db.begin().await?;

    let pardon = DayPardon::find_by_id(pardon_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "pardon",
            id: pardon_id.to_string(),
        })?;

    DayPardon::delete_by_id(pardon_id).exec(&txn).await?;
    summary::invalidate_summaries_covering(&txn, &pardon.employee_id, pardon.date).await?;

    txn.commit().await?;

    info!(
        pardon_id,
        employee_id = %pardon.employee_id,
        date = %pardon.date,
        "Revoked pardon"
    );

    Ok(pardon)
}
