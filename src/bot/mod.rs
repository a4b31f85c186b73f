//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for `AttendanceBuddy`: slash
//! commands for punching and reporting, privileged management commands,
//! autocomplete handlers, and the shared bot context. The Discord user ID of
//! the invoking member is used as the employee identifier.

/// Discord command implementations (punch, report, manage, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{
    config::schedule::ScheduleDefaults,
    core::{access::AccessPolicy, punch::PunchLocks},
    errors::{Error, Result},
};
use chrono::{NaiveDate, NaiveDateTime};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use tracing::{error, info};

/// Shared data available to all bot commands.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Serializes punches per employee and day
    pub punch_locks: PunchLocks,
    /// Schedule applied to employees seen for the first time
    pub schedule_defaults: ScheduleDefaults,
    /// Who may manage pardons and schedules
    pub access: AccessPolicy,
}

impl BotData {
    /// Creates a new `BotData` instance from its parts.
    #[must_use]
    pub const fn new(
        database: DatabaseConnection,
        punch_locks: PunchLocks,
        schedule_defaults: ScheduleDefaults,
        access: AccessPolicy,
    ) -> Self {
        Self {
            database,
            punch_locks,
            schedule_defaults,
            access,
        }
    }
}

/// Poise context used by every command.
pub type Context<'a> = poise::Context<'a, BotData, Error>;

/// The local calendar day, used as "today" for all calculations.
#[must_use]
pub fn current_day() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// The local wall-clock time a punch is stamped with.
#[must_use]
pub fn current_time() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Parses an optional `YYYY-MM-DD` argument, defaulting to `fallback`.
///
/// # Errors
/// [`Error::InvalidDate`] when the text is not a calendar date.
pub fn parse_date_arg(raw: Option<&str>, fallback: NaiveDate) -> Result<NaiveDate> {
    raw.map_or(Ok(fallback), |text| {
        NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").map_err(|_| Error::InvalidDate {
            value: text.to_string(),
        })
    })
}

/// Resolves whose data a command acts on, checking view privileges when it
/// is someone other than the invoking user.
pub fn target_employee(ctx: Context<'_>, user: Option<&serenity::User>) -> Result<String> {
    let actor = ctx.author().id.to_string();
    let Some(user) = user else {
        return Ok(actor);
    };

    let employee_id = user.id.to_string();
    ctx.data().access.authorize_view(&actor, &employee_id)?;
    Ok(employee_id)
}

/// Whether an error is the user's doing rather than a failure of the bot.
const fn is_user_error(error: &Error) -> bool {
    matches!(
        error,
        Error::InvalidTransition { .. }
            | Error::PunchOutOfOrder { .. }
            | Error::DuplicatePardon { .. }
            | Error::InvalidScheduleConfig { .. }
            | Error::InvalidHours { .. }
            | Error::InvalidDate { .. }
            | Error::UnknownKind { .. }
            | Error::NotFound { .. }
            | Error::PermissionDenied { .. }
    )
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {error}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            let reply = if is_user_error(&error) {
                format!("❌ {error}")
            } else {
                error!("Error in command `{}`: {error:?}", ctx.command().name);
                "❌ Something went wrong while handling that command.".to_string()
            };
            if let Err(e) = ctx.say(reply).await {
                error!("Failed to send error message: {e}");
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {e}");
            }
        }
    }
}

/// Builds the poise framework and runs the Discord client until it stops.
pub async fn run_bot(token: &str, data: BotData) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::ping(),
                commands::help(),
                commands::clock_in(),
                commands::lunch_start(),
                commands::lunch_end(),
                commands::clock_out(),
                commands::today(),
                commands::summary(),
                commands::heatmap(),
                commands::period(),
                commands::pardon(),
                commands::schedule(),
                commands::recompute(),
            ],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                info!(
                    commands = framework.options().commands.len(),
                    "Registered commands globally"
                );
                Ok(data)
            })
        })
        .build();

    let intents =
        serenity::GatewayIntents::non_privileged() | serenity::GatewayIntents::MESSAGE_CONTENT;

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {e}"))?;

    info!("Starting bot client");
    client.start().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::date;

    #[test]
    fn test_parse_date_arg() {
        let fallback = date(2024, 3, 6);
        assert_eq!(parse_date_arg(None, fallback).unwrap(), fallback);
        assert_eq!(
            parse_date_arg(Some(" 2024-02-29 "), fallback).unwrap(),
            date(2024, 2, 29)
        );
        assert!(matches!(
            parse_date_arg(Some("2023-02-29"), fallback),
            Err(Error::InvalidDate { .. })
        ));
        assert!(parse_date_arg(Some("yesterday"), fallback).is_err());
    }

    #[test]
    fn test_user_errors_are_reported_inline() {
        assert!(is_user_error(&Error::InvalidDate {
            value: "x".to_string()
        }));
        assert!(!is_user_error(&Error::Config {
            message: "x".to_string()
        }));
    }
}
