//! Telegram Bot API wire types.
//!
//! Only the fields the bot reads are modeled; everything else in the payload
//! is ignored on deserialization.

use serde::Deserialize;

use nudge_scheduler::ChatId;

/// One long-poll result from `getUpdates`.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    /// Absent for non-message updates (edits, channel posts, ...).
    pub message: Option<Message>,
}

/// An inbound chat message.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub chat: Chat,
    /// Absent for stickers, photos and other non-text content.
    pub text: Option<String>,
}

/// The chat a message belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: ChatId,
}
