//! Outbound chat notifications
//!
//! [`NotificationSink`] delivers text to a chat; [`TelegramSink`] is the
//! production implementation. [`Notifier`] knows where order and share
//! messages go and formats them through [`message`].

pub mod message;
pub mod telegram;

pub use telegram::TelegramSink;

use async_trait::async_trait;
use serde::Serialize;
use shared::models::{OrderRequest, Product};
use shared::{AppError, ErrorCode};
use std::sync::Arc;
use thiserror::Error;

/// Text markup understood by the chat backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseMode {
    #[serde(rename = "HTML")]
    Html,
    #[serde(rename = "MarkdownV2")]
    MarkdownV2,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    /// A required environment variable is not set
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("chat API rejected the message ({status}): {description}")]
    Rejected { status: u16, description: String },

    #[error("chat API request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl From<NotifyError> for AppError {
    fn from(err: NotifyError) -> Self {
        match err {
            NotifyError::NotConfigured(var) => {
                AppError::with_message(ErrorCode::ConfigError, err.to_string())
                    .with_detail("variable", var)
            }
            NotifyError::Rejected { status, .. } => {
                AppError::with_message(ErrorCode::NotificationFailed, err.to_string())
                    .with_detail("upstream_status", status)
            }
            NotifyError::Transport(ref e) if e.is_timeout() => {
                AppError::with_message(ErrorCode::TimeoutError, err.to_string())
            }
            NotifyError::Transport(_) => {
                AppError::with_message(ErrorCode::NotificationFailed, err.to_string())
            }
        }
    }
}

/// Delivers a message to one chat
///
/// Any non-success answer from the backend is an error; callers never roll
/// back persisted state because of it.
#[async_trait]
pub trait NotificationSink: Send + Sync + std::fmt::Debug {
    async fn send(
        &self,
        chat_id: &str,
        text: &str,
        parse_mode: Option<ParseMode>,
    ) -> Result<(), NotifyError>;
}

/// Routes storefront events to chats
#[derive(Debug, Clone)]
pub struct Notifier {
    /// `None` when no bot token is configured
    sink: Option<Arc<dyn NotificationSink>>,
    manager_chat_id: Option<String>,
    bot_username: Option<String>,
}

impl Notifier {
    pub fn new(
        sink: Option<Arc<dyn NotificationSink>>,
        manager_chat_id: Option<String>,
        bot_username: Option<String>,
    ) -> Self {
        Self {
            sink,
            manager_chat_id,
            bot_username,
        }
    }

    fn sink(&self) -> Result<&Arc<dyn NotificationSink>, NotifyError> {
        self.sink.as_ref().ok_or(NotifyError::NotConfigured("BOT_TOKEN"))
    }

    /// Forward an order to the manager chat
    ///
    /// `promo` is the applied code and its percentage discount, if any.
    pub async fn send_order(
        &self,
        order: &OrderRequest,
        promo: Option<(&str, f64)>,
    ) -> Result<(), NotifyError> {
        let sink = self.sink()?;
        let chat_id = self
            .manager_chat_id
            .as_deref()
            .ok_or(NotifyError::NotConfigured("MANAGER_CHAT_ID"))?;

        let text = message::format_order_message(order, promo, chrono::Utc::now());
        sink.send(chat_id, &text, Some(ParseMode::Html)).await?;

        tracing::info!(
            items = order.products.len(),
            total_price = order.total_price,
            buyer_id = ?order.user.id,
            "Order forwarded to manager"
        );
        Ok(())
    }

    /// Send a product card with a deep link back into the store
    pub async fn send_share(&self, chat_id: i64, product: &Product) -> Result<(), NotifyError> {
        let sink = self.sink()?;
        let bot_username = self
            .bot_username
            .as_deref()
            .ok_or(NotifyError::NotConfigured("BOT_USERNAME"))?;

        let text = message::format_share_message(product, bot_username);
        sink.send(&chat_id.to_string(), &text, Some(ParseMode::Html))
            .await?;

        tracing::info!(chat_id, product_id = product.id, "Product shared");
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records every message instead of sending it
    #[derive(Debug, Default)]
    pub(crate) struct RecordingSink {
        pub sent: Mutex<Vec<(String, String, Option<ParseMode>)>>,
    }

    #[async_trait]
    impl NotificationSink for RecordingSink {
        async fn send(
            &self,
            chat_id: &str,
            text: &str,
            parse_mode: Option<ParseMode>,
        ) -> Result<(), NotifyError> {
            self.sent
                .lock()
                .unwrap()
                .push((chat_id.to_string(), text.to_string(), parse_mode));
            Ok(())
        }
    }

    fn order() -> OrderRequest {
        serde_json::from_str(
            r#"{"products": [{"name": "Tee", "size": "M", "color": "white", "price": 4000}],
                "total_price": 4000, "user": {"id": 7, "first_name": "Ann"}}"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_send_order_goes_to_manager_chat() {
        let sink = Arc::new(RecordingSink::default());
        let notifier = Notifier::new(
            Some(sink.clone() as Arc<dyn NotificationSink>),
            Some("-100500".into()),
            None,
        );

        notifier.send_order(&order(), None).await.unwrap();

        let sent = sink.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "-100500");
        assert!(sent[0].1.contains("Tee"));
        assert_eq!(sent[0].2, Some(ParseMode::Html));
    }

    #[tokio::test]
    async fn test_missing_configuration() {
        let unconfigured = Notifier::new(None, Some("1".into()), Some("bot".into()));
        assert!(matches!(
            unconfigured.send_order(&order(), None).await,
            Err(NotifyError::NotConfigured("BOT_TOKEN"))
        ));

        let sink: Arc<dyn NotificationSink> = Arc::new(RecordingSink::default());
        let no_chat = Notifier::new(Some(sink.clone()), None, None);
        assert!(matches!(
            no_chat.send_order(&order(), None).await,
            Err(NotifyError::NotConfigured("MANAGER_CHAT_ID"))
        ));

        let product = crate::catalog::seed::seed_products("/p.jpg").remove(0);
        assert!(matches!(
            no_chat.send_share(1, &product).await,
            Err(NotifyError::NotConfigured("BOT_USERNAME"))
        ));
    }

    #[test]
    fn test_parse_mode_wire_names() {
        assert_eq!(serde_json::to_value(ParseMode::Html).unwrap(), "HTML");
        assert_eq!(serde_json::to_value(ParseMode::MarkdownV2).unwrap(), "MarkdownV2");
    }

    #[test]
    fn test_error_mapping() {
        let err: AppError = NotifyError::NotConfigured("BOT_TOKEN").into();
        assert_eq!(err.code, ErrorCode::ConfigError);

        let err: AppError = NotifyError::Rejected {
            status: 400,
            description: "chat not found".into(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::NotificationFailed);
        assert!(err.message.contains("chat not found"));
    }
}
