//! Error types for the Telegram client.

use thiserror::Error;

/// Errors that can occur when talking to the Bot API.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected envelope.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The API answered `ok: false`.
    #[error("API error {code}: {description}")]
    Api { code: i64, description: String },
}
