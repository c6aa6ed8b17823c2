//! Telegram Bot API delivery.
//!
//! [`TelegramNotifier`] sends a plain-text message to every configured
//! chat via `GET {api_base}/bot{token}/sendMessage`. Chats are attempted
//! one after another, each with its own timeout, and every attempt yields
//! its own [`Delivery`].

use tracing::{debug, info, warn};

use watchdog_core::TelegramConfig;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for Telegram delivery failures.
///
/// Transport errors are stored without their URL, which embeds the bot token.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    /// The request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(reqwest::Error),

    /// Telegram answered with a non-2xx status code.
    #[error("Telegram returned HTTP {0}")]
    HttpStatus(u16),
}

/// Result of one delivery attempt.
#[derive(Debug)]
pub struct Delivery {
    pub chat_id: String,
    pub result: Result<(), NotifyError>,
}

impl Delivery {
    pub fn is_delivered(&self) -> bool {
        self.result.is_ok()
    }
}

// ---------------------------------------------------------------------------
// TelegramNotifier
// ---------------------------------------------------------------------------

pub struct TelegramNotifier {
    client: reqwest::Client,
    endpoint: String,
    chat_ids: Vec<String>,
}

impl TelegramNotifier {
    /// Build a notifier, or `None` when the token or chat list is missing.
    pub fn from_config(config: &TelegramConfig) -> Result<Option<Self>, NotifyError> {
        let token = match config.token.as_deref().map(str::trim) {
            Some(token) if config.is_configured() => token,
            _ => {
                warn!("Telegram not configured (TG_TOKEN/TG_CHAT_IDS missing)");
                return Ok(None);
            }
        };

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(NotifyError::Client)?;

        Ok(Some(Self {
            client,
            endpoint: format!(
                "{}/bot{token}/sendMessage",
                config.api_base.trim_end_matches('/')
            ),
            chat_ids: config.chat_ids.clone(),
        }))
    }

    pub fn chat_ids(&self) -> &[String] {
        &self.chat_ids
    }

    /// Send `message` to every chat. Failures are logged, never propagated.
    pub async fn broadcast(&self, message: &str) -> Vec<Delivery> {
        let mut deliveries = Vec::with_capacity(self.chat_ids.len());

        for chat_id in &self.chat_ids {
            let result = self.send(chat_id, message).await;
            match &result {
                Ok(()) => debug!(%chat_id, "telegram message delivered"),
                Err(e) => warn!(%chat_id, error = %e, "Telegram send failed"),
            }
            deliveries.push(Delivery {
                chat_id: chat_id.clone(),
                result,
            });
        }

        let delivered = deliveries.iter().filter(|d| d.is_delivered()).count();
        info!(
            delivered,
            failed = deliveries.len() - delivered,
            "telegram broadcast finished"
        );
        deliveries
    }

    /// Execute a single sendMessage request and check the response status.
    async fn send(&self, chat_id: &str, message: &str) -> Result<(), NotifyError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("chat_id", chat_id), ("text", message)])
            .send()
            .await
            .map_err(|e| NotifyError::Request(e.without_url()))?;

        if !response.status().is_success() {
            return Err(NotifyError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("chat_ids", &self.chat_ids)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn config(token: Option<&str>, chat_ids: &[&str]) -> TelegramConfig {
        TelegramConfig {
            token: token.map(str::to_string),
            chat_ids: chat_ids.iter().map(|s| s.to_string()).collect(),
            ..TelegramConfig::default()
        }
    }

    #[test]
    fn missing_token_disables_notifier() {
        let notifier = TelegramNotifier::from_config(&config(None, &["1"])).unwrap();
        assert!(notifier.is_none());
    }

    #[test]
    fn missing_chats_disables_notifier() {
        let notifier = TelegramNotifier::from_config(&config(Some("abc"), &[])).unwrap();
        assert!(notifier.is_none());
    }

    #[test]
    fn endpoint_embeds_token() {
        let mut cfg = config(Some("123:ABC"), &["1", "2"]);
        cfg.api_base = "https://api.telegram.org/".to_string();
        let notifier = TelegramNotifier::from_config(&cfg).unwrap().unwrap();
        assert_eq!(
            notifier.endpoint,
            "https://api.telegram.org/bot123:ABC/sendMessage"
        );
        assert_eq!(notifier.chat_ids(), ["1", "2"]);
    }

    #[test]
    fn debug_hides_endpoint() {
        let notifier = TelegramNotifier::from_config(&config(Some("123:ABC"), &["1"]))
            .unwrap()
            .unwrap();
        assert!(!format!("{notifier:?}").contains("123:ABC"));
    }

    #[test]
    fn notify_error_display_http_status() {
        let err = NotifyError::HttpStatus(403);
        assert_eq!(err.to_string(), "Telegram returned HTTP 403");
    }
}
