//! Unified error type for the attendance engine.
//!
//! Domain failures (bad punch sequence, duplicate pardon, malformed schedule,
//! missing rows, denied privilege) carry the context a caller needs to explain
//! the problem. Infrastructure failures convert through `From`.

use crate::core::{access::Action, punch::PunchKind, punch::PunchState};
use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

/// All errors produced by the engine and its Discord front-end.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A punch was submitted from a state with no matching transition
    #[error("Cannot record {attempted} for {employee_id} on {date}: current state is {current}")]
    InvalidTransition {
        /// Employee the punch was submitted for
        employee_id: String,
        /// Work day the punch belongs to
        date: NaiveDate,
        /// State of the day before the punch
        current: PunchState,
        /// Punch that was rejected
        attempted: PunchKind,
    },

    /// A punch was earlier than the last punch already recorded that day
    #[error("Punch at {timestamp} is earlier than the last recorded punch at {last_recorded}")]
    PunchOutOfOrder {
        /// Timestamp of the rejected punch
        timestamp: NaiveDateTime,
        /// Timestamp of the latest punch in the ledger for that day
        last_recorded: NaiveDateTime,
    },

    /// A second pardon was requested for the same employee and date
    #[error("Employee {employee_id} already has a pardon on {date}")]
    DuplicatePardon {
        /// Employee the pardon was requested for
        employee_id: String,
        /// Conflicting date
        date: NaiveDate,
    },

    /// Schedule values out of range or malformed
    #[error("Invalid schedule configuration: {field} = {value}")]
    InvalidScheduleConfig {
        /// Offending field name
        field: &'static str,
        /// Offending value as supplied
        value: String,
    },

    /// Hours value outside the accepted range
    #[error("Invalid hours value: {hours}")]
    InvalidHours {
        /// Offending value
        hours: f64,
    },

    /// Unknown punch or pardon kind label
    #[error("Unknown {what}: {value}")]
    UnknownKind {
        /// Which kind of label was being parsed
        what: &'static str,
        /// The label that failed to parse
        value: String,
    },

    /// Date argument that is not `YYYY-MM-DD`
    #[error("Invalid date '{value}', expected YYYY-MM-DD")]
    InvalidDate {
        /// The text that failed to parse
        value: String,
    },

    /// Requested row does not exist
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity name (e.g. "pardon")
        entity: &'static str,
        /// Identifier that was looked up
        id: String,
    },

    /// Actor lacks the privilege for an action
    #[error("{actor} is not allowed to {action}")]
    PermissionDenied {
        /// Identifier of the actor
        actor: String,
        /// Action that was attempted
        action: Action,
    },

    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable missing or invalid
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// String formatting failure
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Serenity/Poise framework failure
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_message_names_state_and_event() {
        let err = Error::InvalidTransition {
            employee_id: "emp-1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap_or_default(),
            current: PunchState::Working,
            attempted: PunchKind::ClockIn,
        };

        let message = err.to_string();
        assert!(message.contains("clock_in"));
        assert!(message.contains("working"));
        assert!(message.contains("2024-03-04"));
    }

    #[test]
    fn test_duplicate_pardon_message() {
        let err = Error::DuplicatePardon {
            employee_id: "emp-1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap_or_default(),
        };
        assert_eq!(
            err.to_string(),
            "Employee emp-1 already has a pardon on 2024-03-04"
        );
    }
}
