//! Report Discord commands - `summary`, `heatmap` and `period`.
//!
//! Everyone can read their own reports; reading another employee's requires
//! privileges.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{self, BotData},
        core::{heatmap, schedule, summary},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    /// Shows worked, expected and balance hours for an accounting period.
    #[poise::command(slash_command, prefix_command)]
    pub async fn summary(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Any day inside the period (YYYY-MM-DD), defaults to today"]
        date: Option<String>,
        #[description = "Recompute instead of using the cached summary"] refresh: Option<bool>,
        #[description = "Employee to show (privileged)"] user: Option<serenity::User>,
    ) -> Result<()> {
        let data = ctx.data();
        let employee_id = bot::target_employee(ctx, user.as_ref())?;
        let today = bot::current_day();
        let reference = bot::parse_date_arg(date.as_deref(), today)?;

        ctx.defer().await?;

        let totals = summary::get_period_summary(
            &data.database,
            &employee_id,
            reference,
            today,
            &data.schedule_defaults,
            refresh.unwrap_or(false),
        )
        .await?;

        let (status, color) = if totals.balance_hours >= 0.0 {
            ("🟢 On track", 0x002E_CC71)
        } else {
            ("🔴 Behind", 0x00E7_4C3C)
        };

        let embed = serenity::CreateEmbed::default()
            .title(format!(
                "📊 {} → {}",
                totals.period_start.format("%Y-%m-%d"),
                totals.period_end.format("%Y-%m-%d")
            ))
            .description(format!("<@{employee_id}> as of {}", totals.computed_through))
            .color(color)
            .fields(vec![
                ("Worked".to_string(), format!("{:.2}h", totals.worked_hours), true),
                ("Pardoned".to_string(), format!("{:.2}h", totals.pardoned_hours), true),
                (
                    "Expected".to_string(),
                    format!(
                        "{:.2}h to date\n{:.2}h in period",
                        totals.expected_hours_to_date, totals.expected_hours
                    ),
                    true,
                ),
                (
                    "Balance".to_string(),
                    format!("{:+.2}h {status}", totals.balance_hours),
                    false,
                ),
                (
                    "Days".to_string(),
                    format!(
                        "{} present | {} absent",
                        totals.days_present, totals.days_absent
                    ),
                    false,
                ),
            ]);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;

        Ok(())
    }

    /// Shows a 30-day presence heatmap.
    #[poise::command(slash_command, prefix_command)]
    pub async fn heatmap(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Employee to show (privileged)"] user: Option<serenity::User>,
    ) -> Result<()> {
        let data = ctx.data();
        let employee_id = bot::target_employee(ctx, user.as_ref())?;
        let today = bot::current_day();

        let days =
            heatmap::get_heatmap(&data.database, &employee_id, today, &data.schedule_defaults)
                .await?;

        let (Some(first), Some(last)) = (days.first(), days.last()) else {
            ctx.say("No days to show.").await?;
            return Ok(());
        };
        let worked: f64 = days.iter().map(|d| d.worked_hours).sum();

        let embed = serenity::CreateEmbed::default()
            .title(format!("🗓️ {} → {}", first.date, last.date))
            .description(heatmap::format_heatmap(&days))
            .color(0x0034_98DB)
            .field("Total", format!("{worked:.2}h over 30 days"), false)
            .footer(serenity::CreateEmbedFooter::new(
                "⬜ off  🟦 pardoned  🟥 absent  🟫 <25%  🟧 <50%  🟨 <75%  🟩 <100%  💚 full",
            ));

        ctx.send(poise::CreateReply::default().embed(embed)).await?;

        Ok(())
    }

    /// Shows which accounting period a day falls in.
    #[poise::command(slash_command, prefix_command)]
    pub async fn period(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Day to resolve (YYYY-MM-DD), defaults to today"] date: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let employee_id = ctx.author().id.to_string();
        let reference = bot::parse_date_arg(date.as_deref(), bot::current_day())?;

        let period = schedule::resolve_period(
            &data.database,
            &employee_id,
            reference,
            &data.schedule_defaults,
        )
        .await?;

        ctx.say(format!(
            "📅 {reference} falls in the period **{}** → **{}** ({} days)",
            period.first_day,
            period.last_day,
            period.len_days()
        ))
        .await?;

        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
