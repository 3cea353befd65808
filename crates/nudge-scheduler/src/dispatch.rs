//! Dispatcher seam: delivery of a text to a destination.

use async_trait::async_trait;
use thiserror::Error;

use crate::types::ChatId;

/// A failed delivery attempt.
///
/// Transport-level failures and application-level not-ok responses both land
/// here; the scan treats them identically and retries the task on its next
/// cycle. `code` carries the application error code when the transport
/// reported one, so a permanently failing destination can be diagnosed from
/// the logs.
#[derive(Debug, Clone, Error)]
#[error("delivery failed{}: {reason}", code.as_ref().map(|c| format!(" (code {c})")).unwrap_or_default())]
pub struct DispatchError {
    pub code: Option<i64>,
    pub reason: String,
}

/// Delivers a text to a destination and reports success or failure.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn send(&self, chat_id: ChatId, text: &str) -> Result<(), DispatchError>;
}
