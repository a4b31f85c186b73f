//! Punch Discord commands - `clock_in`, `lunch_start`, `lunch_end`, `clock_out` and `today`.
//!
//! Each punch is stamped with the bot's local time and recorded for the
//! invoking user. Out-of-sequence punches are rejected by the ledger and
//! reported back through the framework error handler.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{self, BotData, Context},
        core::{daily, punch},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    async fn record(
        ctx: Context<'_>,
        kind: punch::PunchKind,
        location: Option<String>,
        note: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let employee_id = ctx.author().id.to_string();

        let mut request = punch::PunchRequest::new(&employee_id, kind, bot::current_time());
        request.location = location.filter(|l| !l.trim().is_empty());
        request.note = note.filter(|n| !n.trim().is_empty());

        let recorded = punch::record_punch(&data.database, &data.punch_locks, request).await?;
        let state = punch::get_day_state(&data.database, &employee_id, recorded.work_date).await?;

        ctx.say(format!(
            "✅ Recorded **{kind}** at {} (now {state})",
            recorded.timestamp.format("%H:%M")
        ))
        .await?;

        Ok(())
    }

    /// Starts your work day.
    #[poise::command(slash_command, prefix_command)]
    pub async fn clock_in(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Where you are working from"] location: Option<String>,
        #[description = "Optional note"] note: Option<String>,
    ) -> Result<()> {
        record(ctx, punch::PunchKind::ClockIn, location, note).await
    }

    /// Starts your lunch break.
    #[poise::command(slash_command, prefix_command)]
    pub async fn lunch_start(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Optional note"] note: Option<String>,
    ) -> Result<()> {
        record(ctx, punch::PunchKind::LunchStart, None, note).await
    }

    /// Ends your lunch break.
    #[poise::command(slash_command, prefix_command)]
    pub async fn lunch_end(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Optional note"] note: Option<String>,
    ) -> Result<()> {
        record(ctx, punch::PunchKind::LunchEnd, None, note).await
    }

    /// Ends your work day.
    #[poise::command(slash_command, prefix_command)]
    pub async fn clock_out(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Optional note"] note: Option<String>,
    ) -> Result<()> {
        record(ctx, punch::PunchKind::ClockOut, None, note).await
    }

    /// Shows the punches and hours of one day.
    #[poise::command(slash_command, prefix_command)]
    pub async fn today(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Day to show (YYYY-MM-DD), defaults to today"] date: Option<String>,
        #[description = "Employee to show (privileged)"] user: Option<serenity::User>,
    ) -> Result<()> {
        let data = ctx.data();
        let employee_id = bot::target_employee(ctx, user.as_ref())?;
        let current_day = bot::current_day();
        let day = bot::parse_date_arg(date.as_deref(), current_day)?;

        let punches = punch::get_punches_for_day(&data.database, &employee_id, day).await?;
        let state = punch::replay(&punches)?;
        let hours =
            daily::describe_day(&data.database, &employee_id, day, current_day, &data.schedule_defaults)
                .await?;

        let punch_lines = if punches.is_empty() {
            "No punches recorded".to_string()
        } else {
            punches
                .iter()
                .map(|p| {
                    let location = p
                        .location
                        .as_deref()
                        .map(|l| format!(" @ {l}"))
                        .unwrap_or_default();
                    format!("`{}` {}{location}", p.timestamp.format("%H:%M"), p.kind)
                })
                .collect::<Vec<_>>()
                .join("\n")
        };

        let allowed = state
            .allowed()
            .iter()
            .map(|kind| format!("`/{kind}`"))
            .collect::<Vec<_>>()
            .join(", ");

        let embed = serenity::CreateEmbed::default()
            .title(format!("🕒 {}", day.format("%A %Y-%m-%d")))
            .color(0x0034_98DB)
            .fields(vec![
                ("Punches".to_string(), punch_lines, false),
                ("State".to_string(), state.to_string(), true),
                (
                    "Hours".to_string(),
                    format!(
                        "{:.2}h worked / {:.2}h expected",
                        hours.worked_hours, hours.expected_hours
                    ),
                    true,
                ),
                (
                    "Next".to_string(),
                    if allowed.is_empty() {
                        "Day complete".to_string()
                    } else {
                        allowed
                    },
                    false,
                ),
            ]);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;

        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
