//! Core task types.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Store-assigned task identifier. Used only for deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub i64);

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Opaque destination handle: the chat a reminder came from and goes back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(pub i64);

impl std::fmt::Display for ChatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A reminder the engine has accepted but the store has not yet numbered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub chat_id: ChatId,
    /// When to deliver. Minute precision: seconds and below are zero.
    pub due_at: NaiveDateTime,
    pub text: String,
}

/// A persisted pending reminder.
///
/// Exists in the store from successful creation until successful deletion and
/// is never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub chat_id: ChatId,
    pub due_at: NaiveDateTime,
    pub text: String,
}

/// Drop seconds and sub-second precision from a timestamp.
///
/// Due times carry minute precision, so every comparison against the clock
/// truncates the clock the same way. A task due at 10:00 is picked up by the
/// first scan whose truncated now reaches 10:00, regardless of sub-minute
/// scan jitter.
pub fn truncate_to_minute(t: NaiveDateTime) -> NaiveDateTime {
    t.date()
        .and_hms_opt(t.hour(), t.minute(), 0)
        .expect("hour and minute taken from a valid time")
}
