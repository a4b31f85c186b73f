//! Punch ledger - Validates and stores clock events.
//!
//! Each employee's day runs through a small state machine:
//!
//! ```text
//! None --clock_in--> Working --lunch_start--> OnLunch --lunch_end--> Working
//!                    Working --clock_out--> Done
//! ```
//!
//! A punch that has no transition from the current state is rejected and
//! nothing is written. Recorded punches are never edited or removed.
//!
//! Submissions for the same employee and day are serialized through
//! [`PunchLocks`] and re-read the day's ledger inside a database transaction,
//! so two simultaneous `clock_in` calls cannot both succeed.

use crate::{
    core::summary,
    entities::{PunchEvent, punch_event},
    errors::{Error, Result},
};
use chrono::{Days, NaiveDate, NaiveDateTime};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Serialize;
use std::{
    collections::HashMap,
    fmt,
    str::FromStr,
    sync::{Arc, Mutex, PoisonError},
};
use tracing::{debug, info};

/// A clock action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PunchKind {
    /// Start of the working day
    ClockIn,
    /// Leaving for lunch
    LunchStart,
    /// Back from lunch
    LunchEnd,
    /// End of the working day
    ClockOut,
}

impl PunchKind {
    /// Every punch kind in the order a complete day uses them.
    pub const ALL: [Self; 4] = [Self::ClockIn, Self::LunchStart, Self::LunchEnd, Self::ClockOut];

    /// Column representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ClockIn => "clock_in",
            Self::LunchStart => "lunch_start",
            Self::LunchEnd => "lunch_end",
            Self::ClockOut => "clock_out",
        }
    }
}

impl fmt::Display for PunchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PunchKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::UnknownKind {
                what: "punch kind",
                value: s.to_string(),
            })
    }
}

/// Where an employee's day stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PunchState {
    /// Nothing recorded yet
    #[default]
    None,
    /// Clocked in, not on lunch
    Working,
    /// On lunch break
    OnLunch,
    /// Clocked out; terminal for the day
    Done,
}

impl PunchState {
    /// The state after applying `kind`, or `None` when the transition is not allowed.
    #[must_use]
    pub const fn apply(self, kind: PunchKind) -> Option<Self> {
        match (self, kind) {
            (Self::None, PunchKind::ClockIn) => Some(Self::Working),
            (Self::Working, PunchKind::LunchStart) => Some(Self::OnLunch),
            (Self::OnLunch, PunchKind::LunchEnd) => Some(Self::Working),
            (Self::Working, PunchKind::ClockOut) => Some(Self::Done),
            _ => None,
        }
    }

    /// Punches accepted from this state.
    #[must_use]
    pub fn allowed(self) -> Vec<PunchKind> {
        PunchKind::ALL
            .into_iter()
            .filter(|kind| self.apply(*kind).is_some())
            .collect()
    }
}

impl fmt::Display for PunchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "not clocked in",
            Self::Working => "working",
            Self::OnLunch => "on lunch",
            Self::Done => "clocked out",
        })
    }
}

/// Replays a day's recorded punches to find the current state.
pub fn replay(events: &[punch_event::Model]) -> Result<PunchState> {
    events.iter().try_fold(PunchState::None, |state, event| {
        let kind = event.kind.parse::<PunchKind>()?;
        state.apply(kind).ok_or_else(|| Error::InvalidTransition {
            employee_id: event.employee_id.clone(),
            date: event.work_date,
            current: state,
            attempted: kind,
        })
    })
}

/// A punch submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PunchRequest {
    /// Employee punching
    pub employee_id: String,
    /// Clock action
    pub kind: PunchKind,
    /// When it happened; its date is the work day it counts towards
    pub timestamp: NaiveDateTime,
    /// Optional location
    pub location: Option<String>,
    /// Optional note
    pub note: Option<String>,
}

impl PunchRequest {
    /// A punch with no location or note.
    #[must_use]
    pub fn new(employee_id: &str, kind: PunchKind, timestamp: NaiveDateTime) -> Self {
        Self {
            employee_id: employee_id.to_string(),
            kind,
            timestamp,
            location: None,
            note: None,
        }
    }
}

type DayKey = (String, NaiveDate);

/// Per-(employee, day) async locks serializing ledger appends.
///
/// Clones share the same registry.
#[derive(Debug, Clone, Default)]
pub struct PunchLocks {
    inner: Arc<Mutex<HashMap<DayKey, Arc<tokio::sync::Mutex<()>>>>>,
}

impl PunchLocks {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The lock guarding one employee's day.
    ///
    /// Idle locks for days before yesterday are dropped on the way.
    #[must_use]
    pub fn lock_for(&self, employee_id: &str, date: NaiveDate) -> Arc<tokio::sync::Mutex<()>> {
        let mut registry = self.inner.lock().unwrap_or_else(PoisonError::into_inner);

        let cutoff = date - Days::new(1);
        registry.retain(|(_, day), lock| *day >= cutoff || Arc::strong_count(lock) > 1);

        Arc::clone(
            registry
                .entry((employee_id.to_string(), date))
                .or_default(),
        )
    }
}

/// Returns one employee's punches for a day, oldest first.
pub async fn get_punches_for_day<C>(
    db: &C,
    employee_id: &str,
    date: NaiveDate,
) -> Result<Vec<punch_event::Model>>
where
    C: ConnectionTrait,
{
    PunchEvent::find()
        .filter(punch_event::Column::EmployeeId.eq(employee_id))
        .filter(punch_event::Column::WorkDate.eq(date))
        .order_by_asc(punch_event::Column::Timestamp)
        .order_by_asc(punch_event::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Returns one employee's punches between two days (inclusive), oldest first.
pub async fn get_punches_in_range<C>(
    db: &C,
    employee_id: &str,
    first_day: NaiveDate,
    last_day: NaiveDate,
) -> Result<Vec<punch_event::Model>>
where
    C: ConnectionTrait,
{
    PunchEvent::find()
        .filter(punch_event::Column::EmployeeId.eq(employee_id))
        .filter(punch_event::Column::WorkDate.between(first_day, last_day))
        .order_by_asc(punch_event::Column::Timestamp)
        .order_by_asc(punch_event::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Current state of an employee's day.
pub async fn get_day_state(
    db: &DatabaseConnection,
    employee_id: &str,
    date: NaiveDate,
) -> Result<PunchState> {
    let events = get_punches_for_day(db, employee_id, date).await?;
    replay(&events)
}

/// Validates a punch against the day's state machine and appends it.
///
/// # Errors
/// * [`Error::InvalidTransition`] when the punch is out of sequence
/// * [`Error::PunchOutOfOrder`] when it predates the day's last punch
///
/// In both cases the ledger is left unchanged.
pub async fn record_punch(
    db: &DatabaseConnection,
    locks: &PunchLocks,
    request: PunchRequest,
) -> Result<punch_event::Model> {
    let work_date = request.timestamp.date();
    let day_lock = locks.lock_for(&request.employee_id, work_date);
    let _guard = day_lock.lock().await;

    let txn = db.begin().await?;

    let existing = get_punches_for_day(&txn, &request.employee_id, work_date).await?;
    let current = replay(&existing)?;

    let Some(next) = current.apply(request.kind) else {
        debug!(
            employee_id = %request.employee_id,
            %work_date,
            %current,
            attempted = %request.kind,
            "Rejected punch"
        );
        return Err(Error::InvalidTransition {
            employee_id: request.employee_id,
            date: work_date,
            current,
            attempted: request.kind,
        });
    };

    if let Some(last) = existing.last() {
        if request.timestamp < last.timestamp {
            return Err(Error::PunchOutOfOrder {
                timestamp: request.timestamp,
                last_recorded: last.timestamp,
            });
        }
    }

    let punch = punch_event::ActiveModel {
        employee_id: Set(request.employee_id.clone()),
        kind: Set(request.kind.as_str().to_string()),
        timestamp: Set(request.timestamp),
        work_date: Set(work_date),
        location: Set(request.location),
        note: Set(request.note),
        ..Default::default()
    };
    let recorded = punch.insert(&txn).await?;

    summary::invalidate_summaries_covering(&txn, &request.employee_id, work_date).await?;

    txn.commit().await?;

    info!(
        employee_id = %recorded.employee_id,
        kind = %request.kind,
        timestamp = %recorded.timestamp,
        state = %next,
        "Recorded punch"
    );

    Ok(recorded)
}
