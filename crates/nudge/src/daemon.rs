//! Daemon wiring: collaborator construction, inbound command routing, and
//! graceful shutdown.
//!
//! Two loops share the store: a spawned scheduler task scans for due
//! reminders on a fixed cadence, while this module long-polls Telegram for
//! inbound messages and routes each one to a command. Slow deliveries never
//! block reminder creation.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use miette::{IntoDiagnostic, Result};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use nudge_scheduler::{ChatId, CreateTaskError, Dispatcher, SchedulerEngine, TaskStore};
use nudge_store::SqliteTaskStore;
use nudge_telegram::{TelegramClient, Update};

/// Reply to `/start`.
const GREETING: &str = "Hello there!\nTo create a reminder, see /notify";

/// Reply to `/notify`.
const FORMAT_HELP: &str =
    "To create a reminder, send a message in the format \"dd.mm.yyyy hh:mm your reminder text\"";

const REPLY_CREATED: &str = "Reminder created";
const REPLY_EXPIRED: &str = "Reminder is expired";
const REPLY_BAD_FORMAT: &str = "Wrong format, check /notify";
const REPLY_STORE_FAILURE: &str = "Something went wrong, please try again later";

/// How long to back off after a failed getUpdates poll.
const POLL_BACKOFF: Duration = Duration::from_secs(5);

/// Configuration for the daemon.
pub struct DaemonConfig {
    pub bot_token: String,
    pub api_url: String,
    pub db_path: PathBuf,
    pub scan_interval: Duration,
    pub poll_timeout_secs: u64,
}

/// Run the bot until ctrl-c.
pub async fn run(config: DaemonConfig) -> Result<()> {
    let store = Arc::new(SqliteTaskStore::open(&config.db_path).into_diagnostic()?);
    let telegram = Arc::new(TelegramClient::with_base_url(
        config.api_url,
        config.bot_token,
    ));

    let engine = Arc::new(
        SchedulerEngine::new(
            Arc::clone(&store) as Arc<dyn TaskStore>,
            Arc::clone(&telegram) as Arc<dyn Dispatcher>,
        )
        .with_scan_interval(config.scan_interval),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler_handle = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move { engine.run(shutdown_rx).await })
    };

    info!(db = %config.db_path.display(), "nudge daemon started");

    let mut offset: Option<i64> = None;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown requested");
                break;
            }
            updates = telegram.get_updates(offset, config.poll_timeout_secs) => {
                match updates {
                    Ok(updates) => {
                        for update in updates {
                            offset = Some(offset.unwrap_or(0).max(update.update_id + 1));
                            handle_update(&engine, &telegram, update).await;
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "failed to fetch updates, backing off");
                        tokio::time::sleep(POLL_BACKOFF).await;
                    }
                }
            }
        }
    }

    let _ = shutdown_tx.send(true);
    let _ = scheduler_handle.await;

    info!("nudge daemon stopped");
    Ok(())
}

/// Route one inbound update to the matching command and reply.
async fn handle_update(engine: &SchedulerEngine, telegram: &TelegramClient, update: Update) {
    let Some(message) = update.message else {
        return;
    };
    let Some(text) = message.text else {
        return;
    };
    let chat_id = message.chat.id;

    let reply = match text.trim() {
        "" => return,
        "/start" => GREETING,
        "/notify" => FORMAT_HELP,
        _ => create_reminder(engine, chat_id, &text).await,
    };

    if let Err(e) = telegram.send_message(chat_id, reply).await {
        error!(%chat_id, error = %e, "failed to send reply");
    }
}

/// Create a reminder out of free text and pick the reply for the outcome.
async fn create_reminder(engine: &SchedulerEngine, chat_id: ChatId, text: &str) -> &'static str {
    match engine
        .create_task(chat_id, text, Local::now().naive_local())
        .await
    {
        Ok(_) => REPLY_CREATED,
        Err(CreateTaskError::Expired) => REPLY_EXPIRED,
        Err(CreateTaskError::Format(e)) => {
            debug!(%chat_id, error = %e, "rejected reminder request");
            REPLY_BAD_FORMAT
        }
        Err(CreateTaskError::Store(e)) => {
            error!(%chat_id, error = %e, "failed to persist reminder");
            REPLY_STORE_FAILURE
        }
    }
}
