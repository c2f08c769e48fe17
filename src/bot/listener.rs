use std::{pin::pin, sync::Arc, time::Duration};

use futures_util::StreamExt;
use reqwest::Url;
use teloxide::{
    prelude::*,
    update_listeners::{AsUpdateStream, Polling},
    RequestError,
};

use super::dispatcher::{dispatch_update, BotContext};

/* Listener connects the bot to Telegram's update delivery.
 * Either Telegram pushes updates to our webhook, which is registered once at
 * startup, or we pull them ourselves by long polling.
 */

const POLL_TIMEOUT_SECS: u64 = 10;

#[derive(thiserror::Error, Debug)]
pub enum WebhookError {
    #[error("Invalid webhook URL: {0}")]
    InvalidUrl(String),
    #[error("Failed to set webhook: {0}")]
    RequestError(RequestError),
}

impl From<RequestError> for WebhookError {
    fn from(request_error: RequestError) -> WebhookError {
        WebhookError::RequestError(request_error)
    }
}

/* Builds the webhook URL. The bot token is the last path segment, so only
 * Telegram and the operator know where updates are delivered.
 */
pub fn webhook_url(base_url: &str, token: &str) -> Result<Url, WebhookError> {
    let base_url = base_url.trim().trim_end_matches('/');
    format!("{base_url}/{token}")
        .parse::<Url>()
        .map_err(|err| WebhookError::InvalidUrl(err.to_string()))
}

/* Registers the webhook with Telegram.
 * Called once at startup; the caller decides whether failure is fatal.
 */
pub async fn register_webhook(bot: &Bot, url: Url) -> Result<(), WebhookError> {
    // Clear any stale registration first
    bot.delete_webhook().await?;
    bot.set_webhook(url).await?;
    Ok(())
}

/* Long polling fallback.
 * teloxide's polling listener tracks the update offset and backs off on
 * transport errors. Each update is handed to the dispatcher in order;
 * listener and handler errors are only logged.
 */
pub async fn run_polling(bot: Bot, ctx: Arc<BotContext>) {
    log::info!("Polling for updates...");
    let mut listener = Polling::builder(bot)
        .timeout(Duration::from_secs(POLL_TIMEOUT_SECS))
        .build();
    let mut updates = pin!(listener.as_stream());

    while let Some(result) = updates.next().await {
        match result {
            Ok(update) => {
                if let Err(err) = dispatch_update(&ctx, update).await {
                    log::error!("Failed to handle polled update: {err}");
                }
            }
            Err(err) => log::warn!("An error from the update listener: {err}"),
        }
    }

    log::info!("Polling stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webhook_url() {
        let url = webhook_url("https://paws.onrender.com", "123:abc").unwrap();
        assert_eq!(url.as_str(), "https://paws.onrender.com/123:abc");
    }

    #[test]
    fn test_webhook_url_trailing_slash() {
        let url = webhook_url("https://paws.onrender.com/ ", "123:abc").unwrap();
        assert_eq!(url.as_str(), "https://paws.onrender.com/123:abc");
    }

    #[test]
    fn test_webhook_url_with_base_path() {
        let url = webhook_url("https://example.com/bots/", "T").unwrap();
        assert_eq!(url.as_str(), "https://example.com/bots/T");
    }

    #[test]
    fn test_webhook_url_invalid_base() {
        assert!(matches!(
            webhook_url("not a url", "123:abc"),
            Err(WebhookError::InvalidUrl(_))
        ));
    }
}
