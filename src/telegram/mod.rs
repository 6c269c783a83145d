//! Telegram transport: teloxide dispatcher and [`Messenger`] implementation.
//!
//! Converts Telegram messages into [`InboundEvent`]s for the
//! [`MessageHandler`] and sends replies back as plain text messages and
//! documents.

use std::sync::Arc;

use async_trait::async_trait;
use teloxide::dispatching::UpdateFilterExt;
use teloxide::prelude::*;
use teloxide::types::InputFile;
use tracing::{debug, info, warn};

use crate::gateway::{GatewayError, InboundEvent, MessageHandler, Messenger};

// ---------------------------------------------------------------------------
// Shared state for handler injection
// ---------------------------------------------------------------------------

/// Shared dependencies injected into teloxide handlers via `dptree::deps!`.
#[derive(Clone)]
struct SharedState {
    handler: Arc<MessageHandler>,
    allowed_chats: Arc<Vec<i64>>,
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// [`Messenger`] backed by the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    /// Wrap a bot handle.
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

/// Parse a channel id produced by [`to_event`] back into a chat id.
///
/// # Errors
///
/// Returns an error string if the id is not an integer.
pub fn parse_chat_id(channel_id: &str) -> Result<ChatId, String> {
    channel_id
        .parse::<i64>()
        .map(ChatId)
        .map_err(|e| format!("invalid chat id {channel_id:?}: {e}"))
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn post_message(&self, channel_id: &str, text: &str) -> Result<(), GatewayError> {
        let chat_id = parse_chat_id(channel_id).map_err(GatewayError::Post)?;
        self.bot
            .send_message(chat_id, text)
            .await
            .map_err(|e| GatewayError::Post(e.to_string()))?;
        Ok(())
    }

    async fn upload_file(
        &self,
        channel_id: &str,
        bytes: Vec<u8>,
        filename: &str,
    ) -> Result<(), GatewayError> {
        let chat_id = parse_chat_id(channel_id).map_err(GatewayError::Upload)?;
        let file = InputFile::memory(bytes).file_name(filename.to_owned());
        self.bot
            .send_document(chat_id, file)
            .caption("Requested plot")
            .await
            .map_err(|e| GatewayError::Upload(e.to_string()))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Resolve the bot's `@username` mention handle.
///
/// # Errors
///
/// Returns an error if the `getMe` call fails or the bot has no username.
pub async fn bot_mention(bot: &Bot) -> anyhow::Result<String> {
    let me = bot
        .get_me()
        .await
        .map_err(|e| anyhow::anyhow!("telegram getMe failed: {e}"))?;
    let username = me
        .user
        .username
        .clone()
        .ok_or_else(|| anyhow::anyhow!("telegram bot has no username"))?;
    Ok(format!("@{username}"))
}

/// Run the Telegram bot until Ctrl+C.
///
/// # Errors
///
/// Returns an error only if the dispatcher cannot be started.
pub async fn run_telegram(
    bot: Bot,
    handler: Arc<MessageHandler>,
    allowed_chats: Vec<i64>,
) -> anyhow::Result<()> {
    let shared = SharedState {
        handler,
        allowed_chats: Arc::new(allowed_chats),
    };

    let schema = dptree::entry().branch(Update::filter_message().endpoint(handle_message));

    info!("telegram dispatcher starting");

    Dispatcher::builder(bot, schema)
        .dependencies(dptree::deps![shared])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

// ---------------------------------------------------------------------------
// Message handler
// ---------------------------------------------------------------------------

/// Convert a Telegram message into an [`InboundEvent`].
///
/// Returns `None` for messages without text or author.
pub fn to_event(msg: &Message) -> Option<InboundEvent> {
    let text = msg.text()?;
    let user = msg.from.as_ref()?;

    let sender_name = match user.username {
        Some(ref username) => format!("@{username}"),
        None => user.first_name.clone(),
    };

    Some(InboundEvent {
        text: text.to_owned(),
        channel_id: msg.chat.id.0.to_string(),
        sender_id: user.id.0.to_string(),
        sender_name,
        is_bot_message: user.is_bot,
        is_direct: msg.chat.is_private(),
    })
}

async fn handle_message(bot: Bot, msg: Message, state: SharedState) -> ResponseResult<()> {
    let chat_id = msg.chat.id.0;

    if !state.allowed_chats.is_empty() && !state.allowed_chats.contains(&chat_id) {
        warn!(chat_id, "message dropped: chat not in allowed_chats");
        return Ok(());
    }

    let Some(event) = to_event(&msg) else {
        debug!(chat_id, "non-text message, ignoring");
        return Ok(());
    };

    let messenger = TelegramMessenger::new(bot);
    state.handler.handle(&event, &messenger).await;

    Ok(())
}
