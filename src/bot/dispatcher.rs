use std::{sync::Arc, time::Duration as StdDuration};

use chrono::Duration;
use teloxide::{
    prelude::*,
    types::{ChatId, Update, UpdateKind},
    utils::command::BotCommands,
    RequestError,
};

use super::{
    config::BotConfig,
    handler::{
        action_start, action_withdraw, action_withdraw_address, action_withdraw_amount,
        invalid_state,
    },
    listener::{register_webhook, run_polling, webhook_url, WebhookError},
    messenger::Messenger,
    processor::{get_state, is_spam, purge_expired, ProcessError},
    server::run_server,
    store::{Store, StoreError},
};

/* Dispatcher is the entry point for every inbound update.
 * It decides which handler an update belongs to, based on the command it
 * carries and the dialogue state of the sender.
 * Handlers return errors here; the receivers log them and carry on.
 */

/* Types */
pub type HandlerResult = Result<(), BotError>;

#[derive(thiserror::Error, Debug)]
pub enum BotError {
    #[error("Process error: {0}")]
    ProcessError(ProcessError),
    #[error("Request error: {0}")]
    RequestError(RequestError),
}

impl From<ProcessError> for BotError {
    fn from(process_error: ProcessError) -> BotError {
        BotError::ProcessError(process_error)
    }
}

impl From<StoreError> for BotError {
    fn from(store_error: StoreError) -> BotError {
        BotError::ProcessError(ProcessError::StoreError(store_error))
    }
}

impl From<RequestError> for BotError {
    fn from(request_error: RequestError) -> BotError {
        BotError::RequestError(request_error)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum RunError {
    #[error("HTTP client error: {0}")]
    ClientError(reqwest::Error),
    #[error("Request error: {0}")]
    RequestError(RequestError),
    #[error("Webhook error: {0}")]
    WebhookError(WebhookError),
    #[error("Server error: {0}")]
    ServerError(std::io::Error),
}

impl From<reqwest::Error> for RunError {
    fn from(client_error: reqwest::Error) -> RunError {
        RunError::ClientError(client_error)
    }
}

impl From<RequestError> for RunError {
    fn from(request_error: RequestError) -> RunError {
        RunError::RequestError(request_error)
    }
}

impl From<WebhookError> for RunError {
    fn from(webhook_error: WebhookError) -> RunError {
        RunError::WebhookError(webhook_error)
    }
}

impl From<std::io::Error> for RunError {
    fn from(io_error: std::io::Error) -> RunError {
        RunError::ServerError(io_error)
    }
}

/* Dialogue state of a single user.
 * Idle users have nothing pending. The amount is only carried once it has
 * been validated.
 */
#[derive(Clone, Debug, Default, PartialEq)]
pub enum State {
    #[default]
    Idle,
    AwaitingAmount,
    AwaitingAddress {
        amount: i64,
    },
}

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    #[command(description = "Start the bot.")]
    Start,
    #[command(description = "Withdraw your Paws.")]
    Withdraw,
}

/* Everything a handler needs, shared by all receivers.
 */
pub struct BotContext {
    pub store: Store,
    pub messenger: Arc<dyn Messenger>,
    pub admin_id: ChatId,
    pub bot_username: String,
    pub pending_timeout: Duration,
}

const CLIENT_CONNECT_TIMEOUT_SECS: u64 = 5;
const CLIENT_TIMEOUT_SECS: u64 = 30;
const SWEEP_INTERVAL_SECS: u64 = 60;

/* Dispatches a raw update.
 * Only text messages are handled, everything else is dropped.
 */
pub async fn dispatch_update(ctx: &BotContext, update: Update) -> HandlerResult {
    let msg = match update.kind {
        UpdateKind::Message(msg) => msg,
        _ => {
            log::debug!("Ignoring non-message update {}", update.id.0);
            return Ok(());
        }
    };

    match msg.text() {
        Some(text) => dispatch_text(ctx, msg.chat.id, text).await,
        None => {
            log::debug!("Ignoring non-text message from user {}", msg.chat.id.0);
            Ok(())
        }
    }
}

/* Dispatches one text message from a user.
 * Every message is first recorded by the spam filter. Known commands always
 * reach their handler; any other text continues the pending dialogue.
 */
pub async fn dispatch_text(ctx: &BotContext, user_id: ChatId, text: &str) -> HandlerResult {
    let repeated = is_spam(&ctx.store, user_id, text)?;

    match Command::parse(text, &ctx.bot_username) {
        Ok(Command::Start) => return action_start(ctx, user_id).await,
        Ok(Command::Withdraw) => return action_withdraw(ctx, user_id, repeated).await,
        Err(_) => (),
    }

    match get_state(&ctx.store, user_id, ctx.pending_timeout)? {
        State::Idle => invalid_state(ctx, user_id, text).await,
        State::AwaitingAmount => action_withdraw_amount(ctx, user_id, text).await,
        State::AwaitingAddress { amount } => {
            action_withdraw_address(ctx, user_id, text, amount).await
        }
    }
}

// Periodically removes dialogues that users have abandoned.
fn spawn_dialogue_sweeper(ctx: Arc<BotContext>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(StdDuration::from_secs(SWEEP_INTERVAL_SECS));
        loop {
            interval.tick().await;
            sweep_expired_dialogues(&ctx);
        }
    });
}

// One sweeper tick. Returns how many dialogues were dropped.
fn sweep_expired_dialogues(ctx: &BotContext) -> usize {
    match purge_expired(&ctx.store, ctx.pending_timeout) {
        Ok(0) => 0,
        Ok(purged) => {
            log::info!("Purged {purged} expired dialogues");
            purged
        }
        Err(err) => {
            log::error!("Failed to purge expired dialogues: {err}");
            0
        }
    }
}

/* Main run function.
 * Connects to Telegram, then serves updates over a webhook when a public URL
 * is configured, or by long polling otherwise.
 */
pub async fn run_bot(config: BotConfig) -> Result<(), RunError> {
    let client = reqwest::Client::builder()
        .connect_timeout(StdDuration::from_secs(CLIENT_CONNECT_TIMEOUT_SECS))
        .timeout(StdDuration::from_secs(CLIENT_TIMEOUT_SECS))
        .build()?;

    let mut bot = Bot::with_client(config.token.clone(), client);
    if let Some(api_url) = config.api_url.clone() {
        bot = bot.set_api_url(api_url);
    }

    let me = bot.get_me().await?;
    let bot_username = me.username().to_string();
    log::info!("Authorized as @{bot_username}");

    let ctx = Arc::new(BotContext {
        store: Store::new(),
        messenger: Arc::new(bot.clone()),
        admin_id: config.admin_id,
        bot_username,
        pending_timeout: config.pending_timeout,
    });

    spawn_dialogue_sweeper(ctx.clone());

    match &config.base_url {
        Some(base_url) => {
            let url = webhook_url(base_url, &config.token)?;
            if let Err(err) = register_webhook(&bot, url).await {
                log::error!("Webhook registration failed for {base_url}: {err}");
                return Err(err.into());
            }
            log::info!("Webhook successfully set under {base_url}");
        }
        None => {
            log::warn!("RENDER_EXTERNAL_URL is not set, falling back to long polling");
            bot.delete_webhook().await?;
            tokio::spawn(run_polling(bot.clone(), ctx.clone()));
        }
    }

    run_server(ctx, config.token, config.port).await?;
    Ok(())
}
