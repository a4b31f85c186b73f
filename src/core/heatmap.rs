//! Presence heatmap - A rolling 30-day view of how much of each day was worked.
//!
//! Read-only projection of the daily calculator; nothing here is persisted.

use crate::{
    config::schedule::ScheduleDefaults,
    core::{
        daily::{DailyHours, DayStatus},
        pardon, period, punch,
        schedule::{self, AccountingPeriod, ScheduleRules},
    },
    entities::{day_pardon, punch_event},
    errors::Result,
};
use chrono::{Days, NaiveDate};
use sea_orm::DatabaseConnection;
use serde::Serialize;

/// Number of days in the heatmap window, today included.
pub const HEATMAP_WINDOW_DAYS: u64 = 30;

/// Visual category of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatmapBucket {
    /// Nothing expected
    NonWorkDay,
    /// Covered by a pardon
    Pardoned,
    /// Work day with nothing worked
    Absent,
    /// Worked below 25% of expected
    Minimal,
    /// Worked 25% to 50%
    Low,
    /// Worked 50% to 75%
    Medium,
    /// Worked 75% to 100%
    High,
    /// Worked 100% or more
    Full,
}

impl HeatmapBucket {
    /// Buckets a worked/expected ratio for a work day with some hours worked.
    #[must_use]
    pub fn for_ratio(ratio: f64) -> Self {
        if ratio >= 1.0 {
            Self::Full
        } else if ratio >= 0.75 {
            Self::High
        } else if ratio >= 0.5 {
            Self::Medium
        } else if ratio >= 0.25 {
            Self::Low
        } else {
            Self::Minimal
        }
    }

    /// Buckets one calculated day.
    #[must_use]
    pub fn for_day(day: &DailyHours) -> Self {
        match day.status {
            DayStatus::Pardoned => Self::Pardoned,
            DayStatus::NonWorkDay | DayStatus::Upcoming => Self::NonWorkDay,
            DayStatus::Absent => Self::Absent,
            DayStatus::Worked if day.expected_hours > 0.0 => {
                Self::for_ratio(day.worked_hours / day.expected_hours)
            }
            DayStatus::Worked => Self::Full,
        }
    }

    /// Single-character cell used in chat renderings.
    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::NonWorkDay => "⬜",
            Self::Pardoned => "🟦",
            Self::Absent => "🟥",
            Self::Minimal => "🟫",
            Self::Low => "🟧",
            Self::Medium => "🟨",
            Self::High => "🟩",
            Self::Full => "💚",
        }
    }
}

/// One heatmap cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapDay {
    /// The day
    pub date: NaiveDate,
    /// Hours worked (pardon credit on pardoned days)
    pub worked_hours: f64,
    /// Visual category
    pub bucket: HeatmapBucket,
}

/// The window of days ending on `today`.
#[must_use]
pub fn heatmap_window(employee_id: &str, today: NaiveDate) -> AccountingPeriod {
    AccountingPeriod {
        employee_id: employee_id.to_string(),
        first_day: today - Days::new(HEATMAP_WINDOW_DAYS - 1),
        last_day: today,
    }
}

/// Builds the 30-day series ending on `today`, oldest first.
#[must_use]
pub fn build_heatmap(
    rules: &ScheduleRules,
    punches: &[punch_event::Model],
    pardons: &[day_pardon::Model],
    today: NaiveDate,
) -> Vec<HeatmapDay> {
    let window = heatmap_window(&rules.employee_id, today);

    period::daily_breakdown(&window, rules, punches, pardons, today)
        .iter()
        .map(|day| HeatmapDay {
            date: day.date,
            worked_hours: day.worked_hours,
            bucket: HeatmapBucket::for_day(day),
        })
        .collect()
}

/// Loads the last 30 days for an employee and builds their heatmap.
pub async fn get_heatmap(
    db: &DatabaseConnection,
    employee_id: &str,
    today: NaiveDate,
    defaults: &ScheduleDefaults,
) -> Result<Vec<HeatmapDay>> {
    let rules = schedule::get_schedule_rules(db, employee_id, defaults).await?;
    let window = heatmap_window(employee_id, today);

    let punches =
        punch::get_punches_in_range(db, employee_id, window.first_day, window.last_day).await?;
    let pardons =
        pardon::get_pardons_in_range(db, employee_id, window.first_day, window.last_day).await?;

    Ok(build_heatmap(&rules, &punches, &pardons, today))
}

/// Renders the heatmap as rows of seven emoji cells.
#[must_use]
pub fn format_heatmap(days: &[HeatmapDay]) -> String {
    days.chunks(7)
        .map(|week| week.iter().map(|day| day.bucket.emoji()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
