//! Daily hour calculation.
//!
//! Turns one day's punches, or the pardon overriding them, into worked and
//! expected hours plus a status used for presence and absence counting.

use crate::{
    config::schedule::ScheduleDefaults,
    core::{pardon, punch, punch::PunchKind, schedule, schedule::ScheduleRules},
    entities::{day_pardon, punch_event},
    errors::Result,
};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use sea_orm::DatabaseConnection;
use serde::Serialize;

/// How a day counts towards presence and absence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    /// A pardon replaced the day's hours
    Pardoned,
    /// Not a working day for the schedule, or nothing expected
    NonWorkDay,
    /// Worked hours were recorded
    Worked,
    /// Hours were expected, none were worked, and the day is not in the future
    Absent,
    /// Hours are expected but the day has not arrived yet
    Upcoming,
}

/// Worked and expected hours for one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyHours {
    /// The day
    pub date: NaiveDate,
    /// Hours worked (the pardon credit on pardoned days)
    pub worked_hours: f64,
    /// Hours expected (the pardon credit on pardoned days)
    pub expected_hours: f64,
    /// Presence classification
    pub status: DayStatus,
}

impl DailyHours {
    /// Worked minus expected for the day.
    #[must_use]
    pub fn balance(&self) -> f64 {
        self.worked_hours - self.expected_hours
    }

    /// Whether the day counts as present (worked or pardoned).
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.status == DayStatus::Pardoned || self.worked_hours > 0.0
    }
}

#[allow(clippy::cast_precision_loss)] // second counts within a day are far below 2^52
fn hours_between(start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    (end - start).num_seconds() as f64 / 3600.0
}

fn first_after<'a>(
    punches: &[&'a punch_event::Model],
    kind: PunchKind,
    not_before: NaiveDateTime,
) -> Option<&'a punch_event::Model> {
    punches.iter().copied().find(|p| {
        p.timestamp >= not_before && p.kind.parse::<PunchKind>().ok() == Some(kind)
    })
}

/// Hours worked according to a day's punches.
///
/// Zero unless the day has a `clock_in` followed by a `clock_out`. A complete
/// lunch pair inside that span is subtracted. Never negative.
#[must_use]
pub fn worked_hours(punches: &[&punch_event::Model]) -> f64 {
    let Some(clock_in) = first_after(punches, PunchKind::ClockIn, NaiveDateTime::MIN) else {
        return 0.0;
    };
    let Some(clock_out) = first_after(punches, PunchKind::ClockOut, clock_in.timestamp) else {
        return 0.0;
    };

    let lunch = first_after(punches, PunchKind::LunchStart, clock_in.timestamp)
        .and_then(|start| {
            first_after(punches, PunchKind::LunchEnd, start.timestamp)
                .map(|end| hours_between(start.timestamp, end.timestamp))
        })
        .unwrap_or(0.0);

    (hours_between(clock_in.timestamp, clock_out.timestamp) - lunch).max(0.0)
}

/// Worked and expected hours for `date`.
///
/// A pardon credits its hours as both worked and expected. Days outside the
/// schedule's work days count zero for both. Otherwise expected hours come
/// from the schedule (Friday has its own value) and worked hours from the
/// punches. A work day with nothing worked is absent unless it is after `today`.
#[must_use]
pub fn calculate_day(
    date: NaiveDate,
    punches: &[&punch_event::Model],
    pardon: Option<&day_pardon::Model>,
    rules: &ScheduleRules,
    today: NaiveDate,
) -> DailyHours {
    if let Some(pardon) = pardon {
        return DailyHours {
            date,
            worked_hours: pardon.hours_credited,
            expected_hours: pardon.hours_credited,
            status: DayStatus::Pardoned,
        };
    }

    let weekday = date.weekday();
    if !rules.work_days.contains(weekday) {
        return DailyHours {
            date,
            worked_hours: 0.0,
            expected_hours: 0.0,
            status: DayStatus::NonWorkDay,
        };
    }

    let expected_hours = rules.expected_hours_on(weekday);
    let worked_hours = worked_hours(punches);

    let status = if worked_hours > 0.0 {
        DayStatus::Worked
    } else if expected_hours <= 0.0 {
        DayStatus::NonWorkDay
    } else if date > today {
        DayStatus::Upcoming
    } else {
        DayStatus::Absent
    };

    DailyHours {
        date,
        worked_hours,
        expected_hours,
        status,
    }
}

/// Loads one employee's punches and pardon for `date` and calculates the day.
pub async fn describe_day(
    db: &DatabaseConnection,
    employee_id: &str,
    date: NaiveDate,
    today: NaiveDate,
    defaults: &ScheduleDefaults,
) -> Result<DailyHours> {
    let rules = schedule::get_schedule_rules(db, employee_id, defaults).await?;
    let punches = punch::get_punches_for_day(db, employee_id, date).await?;
    let pardon = pardon::get_pardon_for_day(db, employee_id, date).await?;

    let punch_refs: Vec<&punch_event::Model> = punches.iter().collect();
    Ok(calculate_day(
        date,
        &punch_refs,
        pardon.as_ref(),
        &rules,
        today,
    ))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::punch::{PunchLocks, PunchRequest};
    use crate::test_utils::*;

    // 2024-03-04 is a Monday, 2024-03-08 a Friday, 2024-03-09 a Saturday
    const MONDAY: (i32, u32, u32) = (2024, 3, 4);
    const FRIDAY: (i32, u32, u32) = (2024, 3, 8);
    const SATURDAY: (i32, u32, u32) = (2024, 3, 9);

    fn day((y, m, d): (i32, u32, u32)) -> NaiveDate {
        date(y, m, d)
    }

    #[test]
    fn test_scenario_a_monday_full_day() {
        let monday = day(MONDAY);
        let punches = full_day_punches("emp-1", monday, [(8, 0), (12, 0), (13, 0), (18, 0)]);
        let refs: Vec<_> = punches.iter().collect();

        let hours = calculate_day(monday, &refs, None, &standard_rules("emp-1"), monday);
        assert_eq!(hours.worked_hours, 9.0);
        assert_eq!(hours.expected_hours, 9.0);
        assert_eq!(hours.balance(), 0.0);
        assert_eq!(hours.status, DayStatus::Worked);
    }

    #[test]
    fn test_scenario_b_friday_hours() {
        let friday = day(FRIDAY);
        let punches = full_day_punches("emp-1", friday, [(8, 0), (12, 0), (13, 0), (17, 0)]);
        let refs: Vec<_> = punches.iter().collect();

        let hours = calculate_day(friday, &refs, None, &standard_rules("emp-1"), friday);
        assert_eq!(hours.worked_hours, 8.0);
        assert_eq!(hours.expected_hours, 8.0);
        assert_eq!(hours.balance(), 0.0);
    }

    #[test]
    fn test_scenario_c_pardon_without_punches() {
        let monday = day(MONDAY);
        let pardon = pardon_model("emp-1", monday, 8.0);

        let hours = calculate_day(monday, &[], Some(&pardon), &standard_rules("emp-1"), monday);
        assert_eq!(hours.worked_hours, 8.0);
        assert_eq!(hours.expected_hours, 8.0);
        assert_eq!(hours.status, DayStatus::Pardoned);
        assert!(hours.is_present());
    }

    #[test]
    fn test_scenario_d_absent_work_day() {
        let monday = day(MONDAY);

        let hours = calculate_day(monday, &[], None, &standard_rules("emp-1"), day(FRIDAY));
        assert_eq!(hours.worked_hours, 0.0);
        assert_eq!(hours.expected_hours, 9.0);
        assert_eq!(hours.status, DayStatus::Absent);
        assert!(!hours.is_present());
    }

    #[test]
    fn test_pardon_overrides_punches() {
        let monday = day(MONDAY);
        let punches = full_day_punches("emp-1", monday, [(8, 0), (12, 0), (13, 0), (20, 0)]);
        let refs: Vec<_> = punches.iter().collect();
        let pardon = pardon_model("emp-1", monday, 4.0);

        let hours = calculate_day(monday, &refs, Some(&pardon), &standard_rules("emp-1"), monday);
        assert_eq!(hours.worked_hours, 4.0);
        assert_eq!(hours.expected_hours, 4.0);
        assert_eq!(hours.status, DayStatus::Pardoned);
    }

    #[test]
    fn test_non_work_day_ignores_punches_and_is_never_absent() {
        let saturday = day(SATURDAY);
        let punches = full_day_punches("emp-1", saturday, [(9, 0), (12, 0), (13, 0), (15, 0)]);
        let refs: Vec<_> = punches.iter().collect();

        let hours = calculate_day(saturday, &refs, None, &standard_rules("emp-1"), saturday);
        assert_eq!(hours.worked_hours, 0.0);
        assert_eq!(hours.expected_hours, 0.0);
        assert_eq!(hours.status, DayStatus::NonWorkDay);
    }

    #[test]
    fn test_future_work_day_is_upcoming_not_absent() {
        let friday = day(FRIDAY);
        let hours = calculate_day(friday, &[], None, &standard_rules("emp-1"), day(MONDAY));
        assert_eq!(hours.status, DayStatus::Upcoming);
        assert_eq!(hours.expected_hours, 8.0);
    }

    #[test]
    fn test_missing_clock_out_counts_zero() {
        let monday = day(MONDAY);
        let punches = vec![
            punch_model("emp-1", PunchKind::ClockIn, at(monday, 8, 0)),
            punch_model("emp-1", PunchKind::LunchStart, at(monday, 12, 0)),
        ];
        let refs: Vec<_> = punches.iter().collect();

        assert_eq!(worked_hours(&refs), 0.0);
        let hours = calculate_day(monday, &refs, None, &standard_rules("emp-1"), monday);
        assert_eq!(hours.status, DayStatus::Absent);
    }

    #[test]
    fn test_worked_hours_without_lunch() {
        let monday = day(MONDAY);
        let punches = vec![
            punch_model("emp-1", PunchKind::ClockIn, at(monday, 8, 30)),
            punch_model("emp-1", PunchKind::ClockOut, at(monday, 12, 0)),
        ];
        let refs: Vec<_> = punches.iter().collect();
        assert_eq!(worked_hours(&refs), 3.5);
    }

    #[test]
    fn test_incomplete_lunch_is_not_subtracted() {
        let monday = day(MONDAY);
        let punches = vec![
            punch_model("emp-1", PunchKind::ClockIn, at(monday, 8, 0)),
            punch_model("emp-1", PunchKind::LunchStart, at(monday, 12, 0)),
            punch_model("emp-1", PunchKind::ClockOut, at(monday, 16, 0)),
        ];
        let refs: Vec<_> = punches.iter().collect();
        assert_eq!(worked_hours(&refs), 8.0);
    }

    #[test]
    fn test_worked_hours_matches_formula() {
        let monday = day(MONDAY);
        for (clock_in, lunch_start, lunch_end, clock_out) in [
            ((7, 45), (11, 30), (12, 15), (16, 0)),
            ((9, 0), (13, 0), (14, 30), (19, 10)),
            ((6, 0), (6, 0), (6, 0), (6, 0)),
        ] {
            let punches = full_day_punches(
                "emp-1",
                monday,
                [clock_in, lunch_start, lunch_end, clock_out],
            );
            let refs: Vec<_> = punches.iter().collect();

            let minutes = |(h, m): (u32, u32)| f64::from(h * 60 + m);
            let expected = ((minutes(clock_out) - minutes(clock_in))
                - (minutes(lunch_end) - minutes(lunch_start)))
                / 60.0;
            assert!((worked_hours(&refs) - expected.max(0.0)).abs() < 1e-9);
        }
    }

    #[tokio::test]
    async fn test_describe_day_from_storage() -> Result<()> {
        let db = setup_test_db().await?;
        let locks = PunchLocks::new();
        let monday = day(MONDAY);

        record_full_day(&db, &locks, "emp-1", monday, [(8, 0), (12, 0), (13, 0), (17, 0)]).await?;
        punch::record_punch(
            &db,
            &locks,
            PunchRequest::new("emp-2", PunchKind::ClockIn, at(monday, 8, 0)),
        )
        .await?;

        let defaults = ScheduleDefaults::default();
        let worked = describe_day(&db, "emp-1", monday, monday, &defaults).await?;
        assert_eq!(worked.worked_hours, 8.0);
        assert_eq!(worked.expected_hours, 8.0);
        assert_eq!(worked.status, DayStatus::Worked);

        let unfinished = describe_day(&db, "emp-2", monday, monday, &defaults).await?;
        assert_eq!(unfinished.worked_hours, 0.0);
        assert_eq!(unfinished.status, DayStatus::Absent);

        Ok(())
    }
}
