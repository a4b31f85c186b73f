//! General Discord commands - ping and help.
//! These commands don't touch the database.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**AttendanceBuddy Help**\n\
        Here is a summary of all available commands.\n\n\
        **Punching**\n\
        • `/clock_in [location] [note]` - Starts your work day.\n\
        • `/lunch_start` / `/lunch_end` - Brackets your lunch break.\n\
        • `/clock_out` - Ends your work day.\n\
        • `/today [date] [user]` - Shows a day's punches and hours.\n\n\
        **Reports**\n\
        • `/summary [date] [refresh] [user]` - Worked, expected and balance hours for a period.\n\
        • `/heatmap [user]` - Your presence over the last 30 days.\n\
        • `/period [date]` - Which accounting period a day belongs to.\n\n\
        **Management** (privileged)\n\
        • `/pardon <grant|revoke|list>` - Credit hours for excused days.\n\
        • `/schedule <show|set>` - View or change a work schedule.\n\
        • `/recompute` - Rebuilds every employee's current summary.\n\n\
        **Utility**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
