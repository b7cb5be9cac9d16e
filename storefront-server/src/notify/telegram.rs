//! Telegram Bot API sink

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{NotificationSink, NotifyError, ParseMode};

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<ParseMode>,
}

/// Error body returned by the Bot API
#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    description: Option<String>,
}

pub struct TelegramSink {
    client: reqwest::Client,
    api_base: String,
    bot_token: String,
}

// The token is part of every request URL; keep it out of logs
impl std::fmt::Debug for TelegramSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramSink")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

impl TelegramSink {
    pub fn new(
        api_base: impl Into<String>,
        bot_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            bot_token: bot_token.into(),
        })
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.bot_token)
    }
}

#[async_trait]
impl NotificationSink for TelegramSink {
    async fn send(
        &self,
        chat_id: &str,
        text: &str,
        parse_mode: Option<ParseMode>,
    ) -> Result<(), NotifyError> {
        let resp = self
            .client
            .post(self.send_message_url())
            .json(&SendMessage {
                chat_id,
                text,
                parse_mode,
            })
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.without_url()))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }

        let description = resp
            .json::<ApiError>()
            .await
            .ok()
            .and_then(|body| body.description)
            .unwrap_or_else(|| "Unknown error".to_string());

        tracing::warn!(
            chat_id,
            status = status.as_u16(),
            description = %description,
            "Telegram rejected message"
        );

        Err(NotifyError::Rejected {
            status: status.as_u16(),
            description,
        })
    }
}
