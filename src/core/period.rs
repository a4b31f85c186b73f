//! Period aggregation - Worked, expected and balance totals over an accounting period.
//!
//! [`aggregate`] is a pure fold over the daily calculator's output for every
//! day of a resolved period. Running it twice over the same punches, pardons
//! and schedule yields identical totals, which is what makes the summary
//! cache safe to throw away.

use crate::{
    config::schedule::ScheduleDefaults,
    core::{
        daily::{self, DailyHours, DayStatus},
        pardon, punch,
        schedule::{self, AccountingPeriod, ScheduleRules},
    },
    entities::{day_pardon, punch_event},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Aggregate of one accounting period, computed as of `computed_through`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodTotals {
    /// The period aggregated
    pub period: AccountingPeriod,
    /// The "today" used to decide absences and expected-to-date hours
    pub computed_through: NaiveDate,
    /// Punch-derived hours, excluding pardoned days
    pub worked_hours: f64,
    /// Expected hours over the whole period, pardon credits included
    pub expected_hours: f64,
    /// Expected hours for days up to `computed_through`
    pub expected_hours_to_date: f64,
    /// Hours credited by pardons for days up to `computed_through`
    pub pardoned_hours: f64,
    /// `(worked + pardoned) - expected_to_date`; negative when behind
    pub balance_hours: f64,
    /// Days with worked hours or a pardon
    pub days_present: u32,
    /// Work days with nothing worked and no pardon, up to `computed_through`
    pub days_absent: u32,
}

impl PeriodTotals {
    fn empty(period: &AccountingPeriod, today: NaiveDate) -> Self {
        Self {
            period: period.clone(),
            computed_through: today,
            worked_hours: 0.0,
            expected_hours: 0.0,
            expected_hours_to_date: 0.0,
            pardoned_hours: 0.0,
            balance_hours: 0.0,
            days_present: 0,
            days_absent: 0,
        }
    }

    fn add_day(mut self, day: &DailyHours) -> Self {
        let elapsed = day.date <= self.computed_through;

        self.expected_hours += day.expected_hours;
        if elapsed {
            self.expected_hours_to_date += day.expected_hours;
        }

        match day.status {
            DayStatus::Pardoned => {
                if elapsed {
                    self.pardoned_hours += day.worked_hours;
                    self.days_present += 1;
                }
            }
            DayStatus::Absent => self.days_absent += 1,
            DayStatus::Worked => {
                self.worked_hours += day.worked_hours;
                self.days_present += 1;
            }
            DayStatus::NonWorkDay | DayStatus::Upcoming => {}
        }

        self
    }

    fn finish(mut self) -> Self {
        self.balance_hours =
            (self.worked_hours + self.pardoned_hours) - self.expected_hours_to_date;
        self
    }
}

/// Calculates every day of `period` for one employee.
///
/// Punches and pardons belonging to other employees or falling outside the
/// period are ignored.
#[must_use]
pub fn daily_breakdown(
    period: &AccountingPeriod,
    rules: &ScheduleRules,
    punches: &[punch_event::Model],
    pardons: &[day_pardon::Model],
    today: NaiveDate,
) -> Vec<DailyHours> {
    let mut punches_by_day: BTreeMap<NaiveDate, Vec<&punch_event::Model>> = BTreeMap::new();
    for event in punches
        .iter()
        .filter(|p| p.employee_id == period.employee_id && period.contains(p.work_date))
    {
        punches_by_day.entry(event.work_date).or_default().push(event);
    }
    for events in punches_by_day.values_mut() {
        events.sort_by_key(|p| (p.timestamp, p.id));
    }

    let pardons_by_day: BTreeMap<NaiveDate, &day_pardon::Model> = pardons
        .iter()
        .filter(|p| p.employee_id == period.employee_id && period.contains(p.date))
        .map(|p| (p.date, p))
        .collect();

    period
        .days()
        .map(|date| {
            let day_punches = punches_by_day.get(&date).map_or(&[][..], Vec::as_slice);
            daily::calculate_day(
                date,
                day_punches,
                pardons_by_day.get(&date).copied(),
                rules,
                today,
            )
        })
        .collect()
}

/// Folds a period's days into totals.
#[must_use]
pub fn aggregate(
    period: &AccountingPeriod,
    rules: &ScheduleRules,
    punches: &[punch_event::Model],
    pardons: &[day_pardon::Model],
    today: NaiveDate,
) -> PeriodTotals {
    daily_breakdown(period, rules, punches, pardons, today)
        .iter()
        .fold(PeriodTotals::empty(period, today), PeriodTotals::add_day)
        .finish()
}

/// Resolves the period containing `reference` and aggregates it from storage.
pub async fn compute_period_totals(
    db: &DatabaseConnection,
    employee_id: &str,
    reference: NaiveDate,
    today: NaiveDate,
    defaults: &ScheduleDefaults,
) -> Result<PeriodTotals> {
    let rules = schedule::get_schedule_rules(db, employee_id, defaults).await?;
    let period = schedule::resolve(&rules, reference);

    let punches =
        punch::get_punches_in_range(db, employee_id, period.first_day, period.last_day).await?;
    let pardons =
        pardon::get_pardons_in_range(db, employee_id, period.first_day, period.last_day).await?;

    let totals = aggregate(&period, &rules, &punches, &pardons, today);
    debug!(
        employee_id,
        period = %period.key(),
        punches = punches.len(),
        pardons = pardons.len(),
        balance_hours = totals.balance_hours,
        "Aggregated period"
    );

    Ok(totals)
}
