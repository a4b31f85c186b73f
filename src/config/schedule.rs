//! Default work schedule loading from config.toml
//!
//! When an employee is seen for the first time a work schedule is created for
//! them from these defaults. The `[schedule]` table of config.toml overrides
//! any subset of the built-in values.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Defaults for lazily created work schedules
    #[serde(default)]
    pub schedule: ScheduleDefaults,
}

/// Values a new employee's work schedule starts with
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ScheduleDefaults {
    /// Expected hours Monday through Thursday
    pub daily_hours: f64,
    /// Expected hours on Friday
    pub friday_hours: f64,
    /// Nominal lunch break length
    pub lunch_break_hours: f64,
    /// Working weekdays, `0` = Monday through `6` = Sunday
    pub work_days: Vec<u8>,
    /// First day of the accounting period
    pub period_start_day: u32,
    /// Last day of the accounting period, `0` = last day of month
    pub period_end_day: u32,
}

impl Default for ScheduleDefaults {
    fn default() -> Self {
        Self {
            daily_hours: 8.0,
            friday_hours: 8.0,
            lunch_break_hours: 1.0,
            work_days: vec![0, 1, 2, 3, 4],
            period_start_day: 1,
            period_end_day: 0,
        }
    }
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A field has the wrong type
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads configuration from the default location (./config.toml)
pub fn load_default_config() -> Result<Config> {
    load_config("config.toml")
}
