//! Telegram Bot API client implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use nudge_scheduler::{ChatId, DispatchError, Dispatcher};

use crate::error::TelegramError;
use crate::types::{Message, Update};

/// Production Bot API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Ceiling for the server-side long-poll wait; the request timeout below must
/// stay above it.
const MAX_POLL_TIMEOUT_SECS: u64 = 50;

/// Envelope every Bot API method wraps its result in.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    error_code: Option<i64>,
    description: Option<String>,
}

/// Client for the Telegram Bot API.
pub struct TelegramClient {
    http: Client,
    base_url: String,
    token: String,
}

impl TelegramClient {
    /// Create a client against the production Bot API.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_API_URL, token)
    }

    /// Create a client against a custom endpoint. Tests point this at a mock
    /// server; it also covers self-hosted Bot API deployments.
    pub fn with_base_url(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(MAX_POLL_TIMEOUT_SECS + 10))
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    /// Send `text` to a chat.
    pub async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
    ) -> Result<Message, TelegramError> {
        #[derive(Serialize)]
        struct SendMessageRequest<'a> {
            chat_id: i64,
            text: &'a str,
        }

        debug!(%chat_id, len = text.len(), "sending message");

        let response = self
            .http
            .post(self.method_url("sendMessage"))
            .json(&SendMessageRequest {
                chat_id: chat_id.0,
                text,
            })
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Long-poll for updates past `offset`.
    ///
    /// Blocks server-side for up to `timeout_secs` (capped at the API's
    /// ceiling). The caller advances the offset past the highest `update_id`
    /// it has processed.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TelegramError> {
        #[derive(Serialize)]
        struct GetUpdatesRequest {
            #[serde(skip_serializing_if = "Option::is_none")]
            offset: Option<i64>,
            timeout: u64,
        }

        let response = self
            .http
            .post(self.method_url("getUpdates"))
            .json(&GetUpdatesRequest {
                offset,
                timeout: timeout_secs.min(MAX_POLL_TIMEOUT_SECS),
            })
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Unwrap the `{ok, result, error_code, description}` envelope.
    ///
    /// The API reports failures both ways at once (non-2xx status and
    /// `ok: false` body); the body is authoritative, the status a fallback.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, TelegramError> {
        let status = response.status();
        let body = response.text().await?;

        let envelope: ApiResponse<T> = serde_json::from_str(&body)
            .map_err(|e| TelegramError::InvalidResponse(format!("({status}) {e}")))?;

        if !envelope.ok {
            return Err(TelegramError::Api {
                code: envelope.error_code.unwrap_or_else(|| status.as_u16() as i64),
                description: envelope
                    .description
                    .unwrap_or_else(|| "unknown error".to_string()),
            });
        }

        envelope.result.ok_or_else(|| {
            TelegramError::InvalidResponse("ok response without result".to_string())
        })
    }
}

#[async_trait]
impl Dispatcher for TelegramClient {
    async fn send(&self, chat_id: ChatId, text: &str) -> Result<(), DispatchError> {
        match self.send_message(chat_id, text).await {
            Ok(_) => Ok(()),
            Err(TelegramError::Api { code, description }) => Err(DispatchError {
                code: Some(code),
                reason: description,
            }),
            Err(other) => Err(DispatchError {
                code: None,
                reason: other.to_string(),
            }),
        }
    }
}
