//! Work schedule business logic and accounting period resolution.
//!
//! A work schedule says how many hours an employee is expected to work on each
//! weekday and where their accounting period starts and ends within a month.
//! Periods need not line up with calendar months: a schedule running from the
//! 21st to the 20th resolves March 25th to March 21st through April 20th.
//!
//! Weekday indices follow `0` = Monday through `6` = Sunday.

use crate::{
    config::schedule::ScheduleDefaults,
    core::summary,
    entities::{WorkSchedule, work_schedule},
    errors::{Error, Result},
};
use chrono::{Datelike, Days, NaiveDate, Utc, Weekday};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Serialize;
use std::fmt;
use tracing::info;

/// Weekday index of Friday, the day with its own expected hours.
pub const FRIDAY_INDEX: u8 = 4;

/// Set of working weekdays, stored as a bitmask over `0` = Monday .. `6` = Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorkDays(u8);

impl WorkDays {
    /// Monday through Friday.
    pub const WEEKDAYS: Self = Self(0b001_1111);

    /// Builds a set from weekday indices, rejecting indices outside `0..=6`.
    pub fn from_indices(indices: &[u8]) -> Result<Self> {
        let mut mask = 0u8;
        for &index in indices {
            if index > 6 {
                return Err(Error::InvalidScheduleConfig {
                    field: "work_days",
                    value: format!("{indices:?}"),
                });
            }
            mask |= 1 << index;
        }
        Ok(Self(mask))
    }

    /// Parses the comma-separated column representation (e.g. `"0,1,2,3,4"`).
    pub fn parse(raw: &str) -> Result<Self> {
        let malformed = || Error::InvalidScheduleConfig {
            field: "work_days",
            value: raw.to_string(),
        };

        let indices = raw
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| part.parse::<u8>().map_err(|_| malformed()))
            .collect::<Result<Vec<_>>>()?;

        Self::from_indices(&indices).map_err(|_| malformed())
    }

    /// Whether the weekday is a working day.
    #[must_use]
    pub fn contains(self, weekday: Weekday) -> bool {
        let index = weekday.num_days_from_monday();
        self.0 & (1 << index) != 0
    }

    /// Weekday indices in ascending order.
    #[must_use]
    pub fn indices(self) -> Vec<u8> {
        (0..7u8).filter(|i| self.0 & (1 << i) != 0).collect()
    }
}

impl fmt::Display for WorkDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.indices().iter().map(ToString::to_string).collect();
        f.write_str(&parts.join(","))
    }
}

/// Validated, typed view of one employee's work schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleRules {
    /// Employee the rules belong to
    pub employee_id: String,
    /// Expected hours on a regular work day
    pub daily_hours: f64,
    /// Expected hours on Friday
    pub friday_hours: f64,
    /// Nominal lunch break length
    pub lunch_break_hours: f64,
    /// Working weekdays
    pub work_days: WorkDays,
    /// First day of the accounting period (1-31)
    pub period_start_day: u32,
    /// Last day of the accounting period (0-31, `0` = last day of month)
    pub period_end_day: u32,
}

impl ScheduleRules {
    /// Builds rules for an employee from configured defaults.
    pub fn from_defaults(employee_id: &str, defaults: &ScheduleDefaults) -> Result<Self> {
        let rules = Self {
            employee_id: employee_id.to_string(),
            daily_hours: defaults.daily_hours,
            friday_hours: defaults.friday_hours,
            lunch_break_hours: defaults.lunch_break_hours,
            work_days: WorkDays::from_indices(&defaults.work_days)?,
            period_start_day: defaults.period_start_day,
            period_end_day: defaults.period_end_day,
        };
        rules.validate()?;
        Ok(rules)
    }

    /// Checks hour values and period bounds.
    pub fn validate(&self) -> Result<()> {
        if !self.daily_hours.is_finite() || self.daily_hours <= 0.0 {
            return Err(Error::InvalidScheduleConfig {
                field: "daily_hours",
                value: self.daily_hours.to_string(),
            });
        }
        if !self.friday_hours.is_finite() || self.friday_hours < 0.0 {
            return Err(Error::InvalidScheduleConfig {
                field: "friday_hours",
                value: self.friday_hours.to_string(),
            });
        }
        if !self.lunch_break_hours.is_finite() || self.lunch_break_hours < 0.0 {
            return Err(Error::InvalidScheduleConfig {
                field: "lunch_break_hours",
                value: self.lunch_break_hours.to_string(),
            });
        }
        if !(1..=31).contains(&self.period_start_day) {
            return Err(Error::InvalidScheduleConfig {
                field: "period_start_day",
                value: self.period_start_day.to_string(),
            });
        }
        if self.period_end_day > 31 {
            return Err(Error::InvalidScheduleConfig {
                field: "period_end_day",
                value: self.period_end_day.to_string(),
            });
        }
        Ok(())
    }

    /// Expected hours for a weekday before any pardon is applied.
    #[must_use]
    pub fn expected_hours_on(&self, weekday: Weekday) -> f64 {
        if !self.work_days.contains(weekday) {
            0.0
        } else if weekday.num_days_from_monday() == u32::from(FRIDAY_INDEX) {
            self.friday_hours
        } else {
            self.daily_hours
        }
    }

    /// Whether the period follows calendar months exactly.
    #[must_use]
    pub const fn is_calendar_month(&self) -> bool {
        self.period_start_day == 1 && self.period_end_day == 0
    }
}

impl TryFrom<&work_schedule::Model> for ScheduleRules {
    type Error = Error;

    fn try_from(model: &work_schedule::Model) -> Result<Self> {
        let day = |field: &'static str, value: i32| {
            u32::try_from(value).map_err(|_| Error::InvalidScheduleConfig {
                field,
                value: value.to_string(),
            })
        };

        let rules = Self {
            employee_id: model.employee_id.clone(),
            daily_hours: model.daily_hours,
            friday_hours: model.friday_hours,
            lunch_break_hours: model.lunch_break_hours,
            work_days: WorkDays::parse(&model.work_days)?,
            period_start_day: day("period_start_day", model.period_start_day)?,
            period_end_day: day("period_end_day", model.period_end_day)?,
        };
        rules.validate()?;
        Ok(rules)
    }
}

/// Resolved `[first_day, last_day]` window used for aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AccountingPeriod {
    /// Employee the period was resolved for
    pub employee_id: String,
    /// First day of the period (inclusive)
    pub first_day: NaiveDate,
    /// Last day of the period (inclusive)
    pub last_day: NaiveDate,
}

impl AccountingPeriod {
    /// Whether the date falls inside the period.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first_day <= date && date <= self.last_day
    }

    /// Every day of the period in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.first_day
            .iter_days()
            .take_while(move |day| *day <= self.last_day)
    }

    /// Number of days in the period.
    #[must_use]
    pub fn len_days(&self) -> i64 {
        (self.last_day - self.first_day).num_days() + 1
    }

    /// Stable cache key, `YYYY-MM-DD/YYYY-MM-DD`.
    #[must_use]
    pub fn key(&self) -> String {
        format!(
            "{}/{}",
            self.first_day.format("%Y-%m-%d"),
            self.last_day.format("%Y-%m-%d")
        )
    }
}

const fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in the given month.
#[must_use]
pub const fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 31,
    }
}

/// Moves `(year, month)` by `delta` months.
const fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    let zero_based = year * 12 + (month as i32 - 1) + delta;
    #[allow(clippy::cast_sign_loss)]
    let month = (zero_based.rem_euclid(12) + 1) as u32;
    (zero_based.div_euclid(12), month)
}

/// Builds a date, clamping `day` into the month (31 in April becomes the 30th).
fn clamped_date(year: i32, month: u32, day: u32) -> NaiveDate {
    let day = day.clamp(1, days_in_month(year, month));
    #[allow(clippy::expect_used)] // day is clamped into the month, so the date always exists
    NaiveDate::from_ymd_opt(year, month, day).expect("clamped day is always a valid date")
}

/// The configured window whose first day falls in `(year, month)`, as
/// written, before any overlap with the previous window is removed.
fn raw_window(rules: &ScheduleRules, year: i32, month: u32) -> (NaiveDate, NaiveDate) {
    let first = clamped_date(year, month, rules.period_start_day);
    let end = rules.period_end_day;

    let (end_year, end_month) = if end == 0 || end >= rules.period_start_day {
        (year, month)
    } else {
        shift_month(year, month, 1)
    };
    let last = if end == 0 {
        clamped_date(end_year, end_month, 31)
    } else {
        clamped_date(end_year, end_month, end)
    };

    (first, last)
}

/// The window whose first day falls in `(year, month)`.
///
/// A start day clamped back into a short month can land on the day the
/// previous window ends (start 31 / end 30 puts both on April 30th); that
/// day stays with the earlier window and this one starts the day after.
fn window_starting(rules: &ScheduleRules, year: i32, month: u32) -> (NaiveDate, NaiveDate) {
    let (first, last) = raw_window(rules, year, month);
    let (prev_year, prev_month) = shift_month(year, month, -1);
    let (_, previous_last) = raw_window(rules, prev_year, prev_month);

    (first.max(previous_last + Days::new(1)), last)
}

/// Resolves the accounting period containing `reference`.
///
/// The window is picked by comparing the reference's day of month with the
/// configured start day: on or after it the window starts this month,
/// before it the window started last month.
///
/// Never fails: configurations that leave days outside every window (for
/// example start 5 / end 10) resolve a date in the gap to the gap itself.
#[must_use]
pub fn resolve(rules: &ScheduleRules, reference: NaiveDate) -> AccountingPeriod {
    let (year, month) = (reference.year(), reference.month());
    let period = |first_day, last_day| AccountingPeriod {
        employee_id: rules.employee_id.clone(),
        first_day,
        last_day,
    };

    if rules.is_calendar_month() {
        return period(clamped_date(year, month, 1), clamped_date(year, month, 31));
    }

    let current = window_starting(rules, year, month);
    let (before, after) = if reference.day() >= rules.period_start_day {
        let (next_year, next_month) = shift_month(year, month, 1);
        (current, window_starting(rules, next_year, next_month))
    } else {
        let (prev_year, prev_month) = shift_month(year, month, -1);
        (window_starting(rules, prev_year, prev_month), current)
    };

    if before.1 >= reference {
        period(before.0, before.1)
    } else if after.0 <= reference {
        // Clamped start on the last day of a short month, past the end of
        // last month's window
        period(after.0, after.1)
    } else {
        period(before.1 + Days::new(1), after.0 - Days::new(1))
    }
}

fn day_column(field: &'static str, value: u32) -> Result<i32> {
    i32::try_from(value).map_err(|_| Error::InvalidScheduleConfig {
        field,
        value: value.to_string(),
    })
}

fn apply_rules(active: &mut work_schedule::ActiveModel, rules: &ScheduleRules) -> Result<()> {
    active.daily_hours = Set(rules.daily_hours);
    active.friday_hours = Set(rules.friday_hours);
    active.lunch_break_hours = Set(rules.lunch_break_hours);
    active.work_days = Set(rules.work_days.to_string());
    active.period_start_day = Set(day_column("period_start_day", rules.period_start_day)?);
    active.period_end_day = Set(day_column("period_end_day", rules.period_end_day)?);
    active.updated_at = Set(Utc::now().naive_utc());
    Ok(())
}

/// Finds the stored schedule for an employee, if any.
pub async fn get_schedule<C>(db: &C, employee_id: &str) -> Result<Option<work_schedule::Model>>
where
    C: ConnectionTrait,
{
    WorkSchedule::find()
        .filter(work_schedule::Column::EmployeeId.eq(employee_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Returns the employee's schedule, creating it from `defaults` on first use.
pub async fn get_or_create_schedule<C>(
    db: &C,
    employee_id: &str,
    defaults: &ScheduleDefaults,
) -> Result<work_schedule::Model>
where
    C: ConnectionTrait,
{
    if let Some(existing) = get_schedule(db, employee_id).await? {
        return Ok(existing);
    }

    let rules = ScheduleRules::from_defaults(employee_id, defaults)?;
    let mut schedule = work_schedule::ActiveModel {
        employee_id: Set(employee_id.to_string()),
        ..Default::default()
    };
    apply_rules(&mut schedule, &rules)?;

    match schedule.insert(db).await {
        Ok(created) => {
            info!(employee_id, "Created default work schedule");
            Ok(created)
        }
        // Lost a creation race: the unique employee_id means another caller won
        Err(e) => get_schedule(db, employee_id).await?.ok_or(Error::Database(e)),
    }
}

/// Loads (or lazily creates) the schedule and validates it into [`ScheduleRules`].
pub async fn get_schedule_rules<C>(
    db: &C,
    employee_id: &str,
    defaults: &ScheduleDefaults,
) -> Result<ScheduleRules>
where
    C: ConnectionTrait,
{
    let schedule = get_or_create_schedule(db, employee_id, defaults).await?;
    ScheduleRules::try_from(&schedule)
}

/// Returns every stored schedule ordered by employee.
pub async fn get_all_schedules(db: &DatabaseConnection) -> Result<Vec<work_schedule::Model>> {
    WorkSchedule::find()
        .order_by_asc(work_schedule::Column::EmployeeId)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Resolves the accounting period containing `reference` for an employee.
pub async fn resolve_period(
    db: &DatabaseConnection,
    employee_id: &str,
    reference: NaiveDate,
    defaults: &ScheduleDefaults,
) -> Result<AccountingPeriod> {
    let rules = get_schedule_rules(db, employee_id, defaults).await?;
    Ok(resolve(&rules, reference))
}

/// Partial schedule change; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleUpdate {
    /// New expected hours on a regular work day
    pub daily_hours: Option<f64>,
    /// New expected hours on Friday
    pub friday_hours: Option<f64>,
    /// New nominal lunch break length
    pub lunch_break_hours: Option<f64>,
    /// New working weekday indices
    pub work_days: Option<Vec<u8>>,
    /// New first day of the accounting period
    pub period_start_day: Option<u32>,
    /// New last day of the accounting period
    pub period_end_day: Option<u32>,
}

/// Applies a validated change to an employee's schedule.
///
/// Cached summaries for the employee are dropped, since every period they
/// describe may have changed.
pub async fn update_schedule(
    db: &DatabaseConnection,
    employee_id: &str,
    update: ScheduleUpdate,
    defaults: &ScheduleDefaults,
) -> Result<work_schedule::Model> {
    let current = get_or_create_schedule(db, employee_id, defaults).await?;
    let mut rules = ScheduleRules::try_from(&current)?;

    if let Some(hours) = update.daily_hours {
        rules.daily_hours = hours;
    }
    if let Some(hours) = update.friday_hours {
        rules.friday_hours = hours;
    }
    if let Some(hours) = update.lunch_break_hours {
        rules.lunch_break_hours = hours;
    }
    if let Some(indices) = update.work_days {
        rules.work_days = WorkDays::from_indices(&indices)?;
    }
    if let Some(day) = update.period_start_day {
        rules.period_start_day = day;
    }
    if let Some(day) = update.period_end_day {
        rules.period_end_day = day;
    }
    rules.validate()?;

    let mut active: work_schedule::ActiveModel = current.into();
    apply_rules(&mut active, &rules)?;
    let updated = active.update(db).await?;

    let dropped = summary::invalidate_employee_summaries(db, employee_id).await?;
    info!(
        employee_id,
        work_days = %rules.work_days,
        period_start_day = rules.period_start_day,
        period_end_day = rules.period_end_day,
        dropped_summaries = dropped,
        "Updated work schedule"
    );

    Ok(updated)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    fn rules_with_period(start: u32, end: u32) -> ScheduleRules {
        ScheduleRules {
            period_start_day: start,
            period_end_day: end,
            ..standard_rules("emp-1")
        }
    }

    #[test]
    fn test_calendar_month_period() {
        let rules = rules_with_period(1, 0);

        for (reference, first, last) in [
            (date(2024, 3, 15), date(2024, 3, 1), date(2024, 3, 31)),
            (date(2024, 2, 1), date(2024, 2, 1), date(2024, 2, 29)),
            (date(2023, 2, 28), date(2023, 2, 1), date(2023, 2, 28)),
            (date(2024, 4, 30), date(2024, 4, 1), date(2024, 4, 30)),
            (date(2024, 12, 31), date(2024, 12, 1), date(2024, 12, 31)),
        ] {
            let period = resolve(&rules, reference);
            assert_eq!(period.first_day, first, "reference {reference}");
            assert_eq!(period.last_day, last, "reference {reference}");
        }
    }

    #[test]
    fn test_cross_month_period_after_start_day() {
        let rules = rules_with_period(21, 20);
        let period = resolve(&rules, date(2024, 3, 25));
        assert_eq!(period.first_day, date(2024, 3, 21));
        assert_eq!(period.last_day, date(2024, 4, 20));
        assert_eq!(period.employee_id, "emp-1");
    }

    #[test]
    fn test_cross_month_period_before_start_day() {
        let rules = rules_with_period(21, 20);
        let period = resolve(&rules, date(2024, 3, 10));
        assert_eq!(period.first_day, date(2024, 2, 21));
        assert_eq!(period.last_day, date(2024, 3, 20));
    }

    #[test]
    fn test_cross_month_period_on_boundaries() {
        let rules = rules_with_period(21, 20);

        let on_start = resolve(&rules, date(2024, 3, 21));
        assert_eq!(on_start.first_day, date(2024, 3, 21));

        let on_end = resolve(&rules, date(2024, 3, 20));
        assert_eq!(on_end.last_day, date(2024, 3, 20));
        assert_eq!(on_end.first_day, date(2024, 2, 21));
    }

    #[test]
    fn test_cross_year_period() {
        let rules = rules_with_period(21, 20);

        let december = resolve(&rules, date(2024, 12, 28));
        assert_eq!(december.first_day, date(2024, 12, 21));
        assert_eq!(december.last_day, date(2025, 1, 20));

        let january = resolve(&rules, date(2025, 1, 5));
        assert_eq!(january.first_day, date(2024, 12, 21));
        assert_eq!(january.last_day, date(2025, 1, 20));
    }

    #[test]
    fn test_end_day_clamped_in_short_following_month() {
        let rules = rules_with_period(31, 30);

        let period = resolve(&rules, date(2023, 1, 31));
        assert_eq!(period.first_day, date(2023, 1, 31));
        assert_eq!(period.last_day, date(2023, 2, 28));
    }

    #[test]
    fn test_start_day_clamped_in_short_month() {
        let rules = rules_with_period(31, 30);

        // The window starting March 31st ends on April 30th
        let period = resolve(&rules, date(2024, 4, 15));
        assert_eq!(period.first_day, date(2024, 3, 31));
        assert_eq!(period.last_day, date(2024, 4, 30));
    }

    #[test]
    fn test_start_day_clamped_on_reference_date() {
        let rules = rules_with_period(31, 30);

        // April 30th is day 30, before the start day, so it closes March's window
        let period = resolve(&rules, date(2024, 4, 30));
        assert_eq!(period.first_day, date(2024, 3, 31));
        assert_eq!(period.last_day, date(2024, 4, 30));

        // The clamped April start collides with that end, so April's window
        // begins on May 1st
        let next = resolve(&rules, date(2024, 5, 1));
        assert_eq!(next.first_day, date(2024, 5, 1));
        assert_eq!(next.last_day, date(2024, 5, 30));
    }

    #[test]
    fn test_clamped_start_past_previous_window() {
        let rules = rules_with_period(31, 15);

        let gap = resolve(&rules, date(2024, 4, 20));
        assert_eq!(gap.first_day, date(2024, 4, 16));
        assert_eq!(gap.last_day, date(2024, 4, 29));

        let window = resolve(&rules, date(2024, 4, 30));
        assert_eq!(window.first_day, date(2024, 4, 30));
        assert_eq!(window.last_day, date(2024, 5, 15));
    }

    #[test]
    fn test_end_of_month_with_mid_month_start() {
        let rules = rules_with_period(15, 0);

        let period = resolve(&rules, date(2024, 2, 20));
        assert_eq!(period.first_day, date(2024, 2, 15));
        assert_eq!(period.last_day, date(2024, 2, 29));
    }

    #[test]
    fn test_gap_between_windows_resolves_to_gap() {
        let rules = rules_with_period(5, 10);

        let inside = resolve(&rules, date(2024, 3, 7));
        assert_eq!(inside.first_day, date(2024, 3, 5));
        assert_eq!(inside.last_day, date(2024, 3, 10));

        let after_window = resolve(&rules, date(2024, 3, 20));
        assert_eq!(after_window.first_day, date(2024, 3, 11));
        assert_eq!(after_window.last_day, date(2024, 4, 4));

        let before_window = resolve(&rules, date(2024, 3, 2));
        assert_eq!(before_window.first_day, date(2024, 2, 11));
        assert_eq!(before_window.last_day, date(2024, 3, 4));
    }

    #[test]
    fn test_resolved_period_always_contains_reference() {
        let configs = [
            (1, 0),
            (21, 20),
            (31, 30),
            (31, 0),
            (31, 15),
            (15, 0),
            (5, 10),
            (28, 1),
            (2, 31),
        ];
        for (start, end) in configs {
            let rules = rules_with_period(start, end);
            for reference in date(2023, 12, 1).iter_days().take(800) {
                let period = resolve(&rules, reference);
                assert!(
                    period.contains(reference),
                    "start {start} end {end} reference {reference} -> {period:?}"
                );
                assert!(period.last_day >= period.first_day);
            }
        }
    }

    #[test]
    fn test_no_day_belongs_to_two_periods() {
        let configs = [(21, 20), (31, 30), (30, 29), (31, 0), (31, 15), (5, 10), (28, 1)];
        for (start, end) in configs {
            let rules = rules_with_period(start, end);
            for reference in date(2023, 12, 1).iter_days().take(800) {
                let period = resolve(&rules, reference);
                for day in [period.first_day, period.last_day] {
                    assert_eq!(
                        resolve(&rules, day),
                        period,
                        "start {start} end {end} reference {reference} day {day}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_period_days_and_key() {
        let rules = rules_with_period(21, 20);
        let period = resolve(&rules, date(2024, 3, 25));

        let days: Vec<NaiveDate> = period.days().collect();
        assert_eq!(days.len(), 31);
        assert_eq!(period.len_days(), 31);
        assert_eq!(days.first(), Some(&date(2024, 3, 21)));
        assert_eq!(days.last(), Some(&date(2024, 4, 20)));
        assert_eq!(period.key(), "2024-03-21/2024-04-20");
    }

    #[test]
    fn test_work_days_parse_and_display() {
        let days = WorkDays::parse("0,1,2,3,4").unwrap();
        assert_eq!(days, WorkDays::WEEKDAYS);
        assert!(days.contains(Weekday::Mon));
        assert!(days.contains(Weekday::Fri));
        assert!(!days.contains(Weekday::Sat));
        assert!(!days.contains(Weekday::Sun));
        assert_eq!(days.to_string(), "0,1,2,3,4");

        assert!(WorkDays::parse("").unwrap().indices().is_empty());
    }

    #[test]
    fn test_work_days_rejects_malformed() {
        assert!(matches!(
            WorkDays::parse("0,1,7"),
            Err(Error::InvalidScheduleConfig {
                field: "work_days",
                ..
            })
        ));
        assert!(matches!(
            WorkDays::parse("mon,tue"),
            Err(Error::InvalidScheduleConfig { .. })
        ));
        assert!(WorkDays::from_indices(&[9]).is_err());
    }

    #[test]
    fn test_validate_period_bounds() {
        assert!(rules_with_period(0, 0).validate().is_err());
        assert!(rules_with_period(32, 0).validate().is_err());
        assert!(rules_with_period(1, 32).validate().is_err());
        assert!(rules_with_period(31, 31).validate().is_ok());

        let zero_daily = ScheduleRules {
            daily_hours: 0.0,
            ..standard_rules("emp-1")
        };
        assert!(matches!(
            zero_daily.validate(),
            Err(Error::InvalidScheduleConfig {
                field: "daily_hours",
                ..
            })
        ));
    }

    #[test]
    fn test_expected_hours_by_weekday() {
        let rules = standard_rules("emp-1");
        assert_eq!(rules.expected_hours_on(Weekday::Mon), 9.0);
        assert_eq!(rules.expected_hours_on(Weekday::Thu), 9.0);
        assert_eq!(rules.expected_hours_on(Weekday::Fri), 8.0);
        assert_eq!(rules.expected_hours_on(Weekday::Sat), 0.0);
        assert_eq!(rules.expected_hours_on(Weekday::Sun), 0.0);
    }

    #[tokio::test]
    async fn test_get_or_create_schedule_creates_defaults_once() -> Result<()> {
        let db = setup_test_db().await?;
        let defaults = ScheduleDefaults::default();

        let created = get_or_create_schedule(&db, "emp-1", &defaults).await?;
        assert_eq!(created.daily_hours, 8.0);
        assert_eq!(created.work_days, "0,1,2,3,4");
        assert_eq!(created.period_start_day, 1);
        assert_eq!(created.period_end_day, 0);

        let again = get_or_create_schedule(&db, "emp-1", &defaults).await?;
        assert_eq!(again.id, created.id);
        assert_eq!(get_all_schedules(&db).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_resolve_period_self_heals_missing_schedule() -> Result<()> {
        let db = setup_test_db().await?;

        let period =
            resolve_period(&db, "new-hire", date(2024, 3, 10), &ScheduleDefaults::default())
                .await?;
        assert_eq!(period.first_day, date(2024, 3, 1));
        assert_eq!(period.last_day, date(2024, 3, 31));
        assert!(get_schedule(&db, "new-hire").await?.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn test_update_schedule_changes_period() -> Result<()> {
        let db = setup_test_db().await?;
        let defaults = ScheduleDefaults::default();

        let update = ScheduleUpdate {
            daily_hours: Some(9.0),
            period_start_day: Some(21),
            period_end_day: Some(20),
            ..Default::default()
        };
        let updated = update_schedule(&db, "emp-1", update, &defaults).await?;
        assert_eq!(updated.daily_hours, 9.0);
        assert_eq!(updated.friday_hours, 8.0);

        let period = resolve_period(&db, "emp-1", date(2024, 3, 25), &defaults).await?;
        assert_eq!(period.first_day, date(2024, 3, 21));
        assert_eq!(period.last_day, date(2024, 4, 20));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_schedule_rejects_invalid_values() -> Result<()> {
        let db = setup_test_db().await?;
        let defaults = ScheduleDefaults::default();

        let bad_start = ScheduleUpdate {
            period_start_day: Some(0),
            ..Default::default()
        };
        let result = update_schedule(&db, "emp-1", bad_start, &defaults).await;
        assert!(matches!(
            result,
            Err(Error::InvalidScheduleConfig {
                field: "period_start_day",
                ..
            })
        ));

        let bad_days = ScheduleUpdate {
            work_days: Some(vec![0, 8]),
            ..Default::default()
        };
        let result = update_schedule(&db, "emp-1", bad_days, &defaults).await;
        assert!(matches!(
            result,
            Err(Error::InvalidScheduleConfig {
                field: "work_days",
                ..
            })
        ));

        // Stored schedule is untouched
        let stored = get_schedule(&db, "emp-1").await?.unwrap();
        assert_eq!(stored.period_start_day, 1);
        assert_eq!(stored.work_days, "0,1,2,3,4");

        Ok(())
    }
}
