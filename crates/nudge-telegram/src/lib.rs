//! Telegram Bot API transport for nudge.
//!
//! A hand-rolled client over the HTTP API: the bot needs exactly two methods
//! (`sendMessage` and `getUpdates`), not a framework. Implements the
//! scheduler's `Dispatcher` seam for outbound reminders.

mod client;
mod error;
mod types;

pub use client::{DEFAULT_API_URL, TelegramClient};
pub use error::TelegramError;
pub use types::{Chat, Message, Update};
