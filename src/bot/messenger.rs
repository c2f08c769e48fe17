use async_trait::async_trait;
use teloxide::{
    payloads::SendMessageSetters,
    prelude::*,
    types::{ChatId, ParseMode},
    RequestError,
};

/* Messenger is the outbound side of the bot.
 * Handlers never talk to Telegram directly, only through this trait, so the
 * conversation can run against any delivery channel.
 */
#[async_trait]
pub trait Messenger: Send + Sync {
    // Sends a Markdown-formatted message to a chat.
    async fn send_markdown(&self, chat_id: ChatId, text: String) -> Result<(), RequestError>;
}

#[async_trait]
impl Messenger for Bot {
    async fn send_markdown(&self, chat_id: ChatId, text: String) -> Result<(), RequestError> {
        self.send_message(chat_id, text)
            .parse_mode(ParseMode::Markdown)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
pub mod testing {
    use std::sync::Mutex;

    use teloxide::ApiError;

    use super::*;

    /* Records every message instead of sending it.
     * Chats listed in `failing` reject delivery as if the bot were blocked.
     */
    #[derive(Default)]
    pub struct RecordingMessenger {
        sent: Mutex<Vec<(ChatId, String)>>,
        failing: Vec<ChatId>,
    }

    impl RecordingMessenger {
        pub fn failing_for(chat_id: ChatId) -> RecordingMessenger {
            RecordingMessenger {
                sent: Mutex::new(Vec::new()),
                failing: vec![chat_id],
            }
        }

        pub fn sent(&self) -> Vec<(ChatId, String)> {
            self.sent.lock().unwrap().clone()
        }

        pub fn sent_to(&self, chat_id: ChatId) -> Vec<String> {
            self.sent()
                .into_iter()
                .filter(|(id, _)| *id == chat_id)
                .map(|(_, text)| text)
                .collect()
        }

        pub fn clear(&self) {
            self.sent.lock().unwrap().clear();
        }
    }

    #[async_trait]
    impl Messenger for RecordingMessenger {
        async fn send_markdown(&self, chat_id: ChatId, text: String) -> Result<(), RequestError> {
            if self.failing.contains(&chat_id) {
                return Err(RequestError::Api(ApiError::BotBlocked));
            }
            self.sent.lock().unwrap().push((chat_id, text));
            Ok(())
        }
    }
}
