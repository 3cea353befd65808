//! nudge: a Telegram reminder bot.
//!
//! Send the bot `dd.mm.yyyy hh:mm text` and it stores the reminder; a
//! recurring scan delivers due reminders back to the chat they came from.

use clap::Parser;
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod daemon;

#[derive(Parser)]
#[command(name = "nudge")]
#[command(about = "Telegram reminder bot", long_about = None)]
struct Cli {
    /// Telegram bot token
    #[arg(long, env = "NUDGE_BOT_TOKEN")]
    bot_token: String,

    /// Bot API base URL (override for self-hosted Bot API servers)
    #[arg(long, env = "NUDGE_API_URL", default_value = nudge_telegram::DEFAULT_API_URL)]
    api_url: String,

    /// SQLite database path
    #[arg(long, env = "NUDGE_DB_PATH", default_value = "nudge.db")]
    db_path: std::path::PathBuf,

    /// Due-task scan interval in seconds
    #[arg(long, default_value = "30")]
    scan_interval: u64,

    /// Long-poll timeout in seconds for getUpdates
    #[arg(long, default_value = "30")]
    poll_timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "nudge=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    daemon::run(daemon::DaemonConfig {
        bot_token: cli.bot_token,
        api_url: cli.api_url,
        db_path: cli.db_path,
        scan_interval: std::time::Duration::from_secs(cli.scan_interval),
        poll_timeout_secs: cli.poll_timeout,
    })
    .await
}
