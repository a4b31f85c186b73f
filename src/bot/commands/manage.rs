//! Management Discord commands - `pardon`, `schedule` and `recompute`.
//!
//! Everything that changes how someone's hours are counted is restricted to
//! the privileged actors listed in `ATTENDANCE_ADMIN_IDS`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{self, BotData, handlers::autocomplete},
        core::{
            access::Action,
            pardon::{self, GrantPardon, PardonKind},
            schedule::{self, ScheduleRules, ScheduleUpdate, WorkDays},
            summary,
        },
        errors::{Error, Result},
    };
    use chrono::Datelike;
    use poise::serenity_prelude as serenity;

    fn describe_rules(rules: &ScheduleRules) -> String {
        let period_end = if rules.period_end_day == 0 {
            "last day of month".to_string()
        } else {
            format!("day {}", rules.period_end_day)
        };

        format!(
            "**Daily hours:** {:.2}h\n\
             **Friday hours:** {:.2}h\n\
             **Lunch break:** {:.2}h\n\
             **Work days:** {} (0 = Monday)\n\
             **Period:** day {} → {period_end}",
            rules.daily_hours,
            rules.friday_hours,
            rules.lunch_break_hours,
            rules.work_days,
            rules.period_start_day,
        )
    }

    /// Parent command for pardoning days.
    #[poise::command(
        slash_command,
        subcommands("pardon_grant", "pardon_revoke", "pardon_list")
    )]
    pub async fn pardon(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Pardon management command. Available subcommands:\n\
            `/pardon grant` - Credit hours for one day\n\
            `/pardon revoke` - Remove a pardon\n\
            `/pardon list` - List pardons in the current period";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Credits hours for one day of an employee.
    ///
    /// Hours default to what the employee's schedule expects that day.
    #[poise::command(slash_command, rename = "grant")]
    pub async fn pardon_grant(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Employee to pardon"] user: serenity::User,
        #[description = "Day to pardon (YYYY-MM-DD)"] date: String,
        #[description = "Reason category"]
        #[autocomplete = "autocomplete::autocomplete_pardon_kind"]
        kind: String,
        #[description = "Why the day is pardoned"] justification: String,
        #[description = "Hours to credit, defaults to the scheduled hours"] hours: Option<f64>,
    ) -> Result<()> {
        let data = ctx.data();
        let approver_id = ctx.author().id.to_string();
        data.access.authorize(&approver_id, Action::GrantPardon)?;

        let employee_id = user.id.to_string();
        let date = bot::parse_date_arg(Some(date.as_str()), bot::current_day())?;
        let kind = kind.parse::<PardonKind>()?;

        if justification.trim().is_empty() {
            ctx.say("❌ A justification is required.").await?;
            return Ok(());
        }

        let hours = match hours {
            Some(hours) => hours,
            None => schedule::get_schedule_rules(
                &data.database,
                &employee_id,
                &data.schedule_defaults,
            )
            .await?
            .expected_hours_on(date.weekday()),
        };

        let granted = pardon::grant_pardon(
            &data.database,
            GrantPardon {
                employee_id,
                date,
                kind,
                hours,
                justification,
                approver_id,
            },
        )
        .await?;

        ctx.say(format!(
            "✅ Pardon #{} granted to <@{}> on {} ({kind}, {:.2}h)",
            granted.id, granted.employee_id, granted.date, granted.hours_credited
        ))
        .await?;

        Ok(())
    }

    /// Removes a pardon by its number.
    #[poise::command(slash_command, rename = "revoke")]
    pub async fn pardon_revoke(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Pardon number shown by /pardon list"] id: i64,
    ) -> Result<()> {
        let data = ctx.data();
        data.access
            .authorize(&ctx.author().id.to_string(), Action::RevokePardon)?;

        let revoked = pardon::revoke_pardon(&data.database, id).await?;

        ctx.say(format!(
            "🗑️ Revoked pardon #{} for <@{}> on {}",
            revoked.id, revoked.employee_id, revoked.date
        ))
        .await?;

        Ok(())
    }

    /// Lists the pardons in an employee's current period.
    #[poise::command(slash_command, rename = "list")]
    pub async fn pardon_list(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Employee to show (privileged)"] user: Option<serenity::User>,
        #[description = "Any day inside the period (YYYY-MM-DD), defaults to today"]
        date: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let employee_id = bot::target_employee(ctx, user.as_ref())?;
        let reference = bot::parse_date_arg(date.as_deref(), bot::current_day())?;

        let period = schedule::resolve_period(
            &data.database,
            &employee_id,
            reference,
            &data.schedule_defaults,
        )
        .await?;
        let pardons = pardon::get_pardons_in_range(
            &data.database,
            &employee_id,
            period.first_day,
            period.last_day,
        )
        .await?;

        if pardons.is_empty() {
            ctx.say(format!(
                "No pardons for <@{employee_id}> between {} and {}.",
                period.first_day, period.last_day
            ))
            .await?;
            return Ok(());
        }

        let fields: Vec<(String, String, bool)> = pardons
            .iter()
            .map(|p| {
                (
                    format!("#{} • {} • {}", p.id, p.date, p.kind),
                    format!(
                        "{:.2}h credited by <@{}>\n{}",
                        p.hours_credited, p.approver_id, p.justification
                    ),
                    false,
                )
            })
            .take(25) // Discord embed field limit
            .collect();

        let embed = serenity::CreateEmbed::default()
            .title(format!("📝 Pardons {} → {}", period.first_day, period.last_day))
            .description(format!("<@{employee_id}>"))
            .color(0x0034_98DB)
            .fields(fields);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;

        Ok(())
    }

    /// Parent command for work schedules.
    #[poise::command(slash_command, subcommands("schedule_show", "schedule_set"))]
    pub async fn schedule(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Schedule command. Available subcommands:\n\
            `/schedule show` - Show a work schedule\n\
            `/schedule set` - Change a work schedule";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Shows an employee's work schedule.
    #[poise::command(slash_command, rename = "show")]
    pub async fn schedule_show(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Employee to show (privileged)"] user: Option<serenity::User>,
    ) -> Result<()> {
        let data = ctx.data();
        let employee_id = bot::target_employee(ctx, user.as_ref())?;

        let rules =
            schedule::get_schedule_rules(&data.database, &employee_id, &data.schedule_defaults)
                .await?;

        ctx.say(format!(
            "🗓️ Schedule for <@{employee_id}>\n{}",
            describe_rules(&rules)
        ))
        .await?;

        Ok(())
    }

    /// Changes an employee's work schedule; omitted values stay as they are.
    #[allow(clippy::too_many_arguments)]
    #[poise::command(slash_command, rename = "set")]
    pub async fn schedule_set(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Employee whose schedule changes"] user: serenity::User,
        #[description = "Expected hours Monday to Thursday"] daily_hours: Option<f64>,
        #[description = "Expected hours on Friday"] friday_hours: Option<f64>,
        #[description = "Lunch break length in hours"] lunch_break_hours: Option<f64>,
        #[description = "Working weekdays, e.g. 0,1,2,3,4 (0 = Monday)"] work_days: Option<
            String,
        >,
        #[description = "First day of the accounting period (1-31)"] period_start_day: Option<
            u32,
        >,
        #[description = "Last day of the accounting period (0 = end of month)"]
        period_end_day: Option<u32>,
    ) -> Result<()> {
        let data = ctx.data();
        data.access
            .authorize(&ctx.author().id.to_string(), Action::UpdateSchedule)?;

        let employee_id = user.id.to_string();
        let work_days = work_days
            .as_deref()
            .map(WorkDays::parse)
            .transpose()?
            .map(WorkDays::indices);

        let update = ScheduleUpdate {
            daily_hours,
            friday_hours,
            lunch_break_hours,
            work_days,
            period_start_day,
            period_end_day,
        };
        if update == ScheduleUpdate::default() {
            ctx.say("Nothing to change.").await?;
            return Ok(());
        }

        let updated =
            schedule::update_schedule(&data.database, &employee_id, update, &data.schedule_defaults)
                .await?;
        let rules = ScheduleRules::try_from(&updated)?;

        ctx.say(format!(
            "✅ Schedule updated for <@{employee_id}>\n{}",
            describe_rules(&rules)
        ))
        .await?;

        Ok(())
    }

    /// Recomputes the current period summary of every employee.
    #[poise::command(slash_command, prefix_command)]
    pub async fn recompute(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        // Keeps the reply under Discord's 2000 character message limit
        const SHOWN: usize = 5;

        let data = ctx.data();
        data.access
            .authorize(&ctx.author().id.to_string(), Action::RecomputeSummaries)?;

        ctx.defer().await?;

        let today = bot::current_day();
        let refreshed =
            summary::refresh_all_summaries(&data.database, today, today, &data.schedule_defaults)
                .await?;

        let mut details = refreshed
            .iter()
            .take(SHOWN)
            .map(|s| format!("<@{}>\n{}", s.employee_id, summary::format_summary(s)))
            .collect::<Vec<_>>()
            .join("\n\n");
        if refreshed.len() > SHOWN {
            details.push_str(&format!("\n\n…and {} more", refreshed.len() - SHOWN));
        }

        ctx.say(format!(
            "✅ Recomputed {} summar{}\n{details}",
            refreshed.len(),
            if refreshed.len() == 1 { "y" } else { "ies" }
        ))
        .await?;

        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
