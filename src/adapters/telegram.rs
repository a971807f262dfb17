use crate::domain::ports::Notifier;
use crate::utils::error::{Result, WatchError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

const NOTIFY_TIMEOUT: Duration = Duration::from_secs(10);
const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    disable_web_page_preview: bool,
}

/// Delivers alerts through the Telegram bot API. Link previews are suppressed
/// so a burst of alerts stays readable.
pub struct TelegramNotifier {
    client: Client,
    send_url: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(token: &str, chat_id: &str) -> Result<Self> {
        Self::with_api_base(TELEGRAM_API_BASE, token, chat_id)
    }

    /// `api_base` is injectable so tests can point at a mock server.
    pub fn with_api_base(api_base: &str, token: &str, chat_id: &str) -> Result<Self> {
        let client = Client::builder().timeout(NOTIFY_TIMEOUT).build()?;

        Ok(Self {
            client,
            send_url: format!("{}/bot{}/sendMessage", api_base, token),
            chat_id: chat_id.to_string(),
        })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, text: &str) -> Result<()> {
        let payload = SendMessage {
            chat_id: &self.chat_id,
            text,
            disable_web_page_preview: true,
        };

        let response = self.client.post(&self.send_url).json(&payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WatchError::TelegramError {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!("Telegram message delivered");
        Ok(())
    }
}
