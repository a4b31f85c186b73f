use attendance_buddy::{
    bot::{self, BotData},
    config::{self, schedule::ScheduleDefaults},
    core::{access::AccessPolicy, punch::PunchLocks},
    errors::{Error, Result},
};
use dotenvy::dotenv;
use std::env;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; variables may also come from the environment directly
    dotenv().ok();

    // 3. Schedule defaults for employees seen for the first time
    let schedule_defaults = match config::schedule::load_default_config() {
        Ok(loaded) => {
            info!(schedule = ?loaded.schedule, "Loaded schedule defaults from config.toml");
            loaded.schedule
        }
        Err(e) => {
            warn!("{e}; using built-in schedule defaults");
            ScheduleDefaults::default()
        }
    };

    // 4. Database
    let database = config::database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    config::database::create_tables(&database).await?;
    info!("Database initialized");

    // 5. Run the bot
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {e}"))
        .map_err(Error::EnvVar)?;

    let data = BotData::new(
        database,
        PunchLocks::new(),
        schedule_defaults,
        AccessPolicy::from_env(),
    );

    bot::run_bot(&token, data).await
}
