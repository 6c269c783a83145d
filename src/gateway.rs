//! Transport-independent message handling.
//!
//! A chat transport turns its updates into [`InboundEvent`]s and implements
//! [`Messenger`] for the way back. [`MessageHandler`] owns everything needed
//! to answer: the alias table, the stats provider, the chart renderer and the
//! bot identity, all injected through a [`BotContext`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::chart::PlotRenderer;
use crate::compose::{compose_topic_reply, replies, ResponseComposer};
use crate::intent::{AliasTable, IntentExtractor, IntentRecord, Topic};
use crate::stats::StatsProvider;

/// A chat message as delivered by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    /// Raw message text.
    pub text: String,
    /// Conversation the message was posted in.
    pub channel_id: String,
    /// Author identifier.
    pub sender_id: String,
    /// Author name used when greeting back.
    pub sender_name: String,
    /// The author is a bot (including this one).
    pub is_bot_message: bool,
    /// One-to-one conversation with the bot.
    pub is_direct: bool,
}

/// Errors raised by a transport while sending.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// A text message could not be posted.
    #[error("failed to post message: {0}")]
    Post(String),
    /// A file could not be uploaded.
    #[error("failed to upload file: {0}")]
    Upload(String),
}

/// Outbound half of a chat transport.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Post a text message to a channel.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Post`] if the transport rejects the message.
    async fn post_message(&self, channel_id: &str, text: &str) -> Result<(), GatewayError>;

    /// Upload a file to a channel.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Upload`] if the transport rejects the file.
    async fn upload_file(
        &self,
        channel_id: &str,
        bytes: Vec<u8>,
        filename: &str,
    ) -> Result<(), GatewayError>;

    /// Longest text [`Messenger::post_message`] accepts, in characters.
    fn max_message_chars(&self) -> usize {
        MAX_MESSAGE_CHARS
    }
}

/// Longest text a single outbound message may carry, in characters.
///
/// Matches the Telegram Bot API limit.
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// How the bot is mentioned in messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotIdentity {
    mention: String,
}

impl BotIdentity {
    /// Identity from a mention handle such as `@covidbot` (case ignored).
    pub fn new(mention: &str) -> Self {
        Self {
            mention: mention.to_lowercase(),
        }
    }

    /// Lowercased mention handle.
    pub fn mention(&self) -> &str {
        &self.mention
    }

    /// Whether lowercased `text` mentions the bot.
    ///
    /// The handle must end at a non-word character or at the end of the
    /// text, so `@covidbot_fan` does not mention `@covidbot`.
    pub fn is_mentioned_in(&self, lower: &str) -> bool {
        !self.mention_spans(lower).is_empty()
    }

    /// Lowercased `text` with every mention of the bot removed.
    ///
    /// Usernames are plain words, so a handle like `@covid_chart_bot`
    /// would otherwise read as a chart request.
    pub fn strip_mentions(&self, lower: &str) -> String {
        let mut stripped = String::with_capacity(lower.len());
        let mut cursor = 0;
        for (start, end) in self.mention_spans(lower) {
            stripped.push_str(&lower[cursor..start]);
            stripped.push(' ');
            cursor = end;
        }
        stripped.push_str(&lower[cursor..]);
        stripped
    }

    fn mention_spans(&self, lower: &str) -> Vec<(usize, usize)> {
        if self.mention.is_empty() {
            return Vec::new();
        }
        lower
            .match_indices(self.mention.as_str())
            .map(|(start, handle)| (start, start.saturating_add(handle.len())))
            .filter(|(_, end)| {
                lower[*end..]
                    .chars()
                    .next()
                    .map_or(true, |c| !(c.is_alphanumeric() || c == '_'))
            })
            .collect()
    }
}

/// Why an event is not answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Written by a bot, this one included.
    BotMessage,
    /// Group message that does not mention the bot.
    NotAddressed,
}

/// Why the bot should stay silent on this event, if it should.
///
/// Bot-authored events are dropped. Outside direct conversations the text
/// must mention the bot.
pub fn ignore_reason(event: &InboundEvent, identity: &BotIdentity) -> Option<IgnoreReason> {
    if event.is_bot_message {
        return Some(IgnoreReason::BotMessage);
    }
    if event.is_direct || identity.is_mentioned_in(&event.text.to_lowercase()) {
        None
    } else {
        Some(IgnoreReason::NotAddressed)
    }
}

/// Split `text` into messages of at most `max_chars` characters.
///
/// Breaks fall between lines; a single line longer than the limit is cut
/// into pieces. Empty text yields no messages.
pub fn split_message(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0_usize;
    let mut started = false;

    for line in text.lines() {
        for piece in split_long_line(line, max_chars) {
            let piece_chars = piece.chars().count();
            if started && current_chars.saturating_add(1).saturating_add(piece_chars) > max_chars {
                chunks.push(std::mem::take(&mut current));
                current_chars = 0;
                started = false;
            }
            if started {
                current.push('\n');
                current_chars = current_chars.saturating_add(1);
            }
            current.push_str(&piece);
            current_chars = current_chars.saturating_add(piece_chars);
            started = true;
        }
    }
    if started {
        chunks.push(current);
    }
    chunks
}

fn split_long_line(line: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars
        .chunks(max_chars)
        .map(|piece| piece.iter().collect())
        .collect()
}

/// Dependencies of a [`MessageHandler`].
pub struct BotContext {
    /// Country aliases, immutable for the process lifetime.
    pub aliases: Arc<AliasTable>,
    /// Case data source.
    pub stats: Arc<dyn StatsProvider>,
    /// Chart renderer.
    pub renderer: Arc<dyn PlotRenderer>,
    /// How users mention the bot.
    pub identity: BotIdentity,
    /// Delay before each paced reply.
    pub pause: Duration,
    /// Draw charts with a log y-axis.
    pub log_scale: bool,
}

/// Answers inbound events.
///
/// Holds no per-message state, so one instance can serve concurrent events.
pub struct MessageHandler {
    extractor: IntentExtractor,
    composer: ResponseComposer,
    renderer: Arc<dyn PlotRenderer>,
    identity: BotIdentity,
    pause: Duration,
}

impl MessageHandler {
    /// Create a handler from its dependencies.
    pub fn new(context: BotContext) -> Self {
        Self {
            extractor: IntentExtractor::new(context.aliases),
            composer: ResponseComposer::new(context.stats, context.log_scale),
            renderer: context.renderer,
            identity: context.identity,
            pause: context.pause,
        }
    }

    /// Extract the intent of a text without replying.
    ///
    /// Mentions of the bot are dropped first.
    pub fn extract(&self, text: &str) -> IntentRecord {
        let text = self.identity.strip_mentions(&text.to_lowercase());
        self.extractor.extract(&text)
    }

    /// Handle an event, dating statistics with the local date.
    ///
    /// Returns `false` when the event was not meant for the bot.
    pub async fn handle(&self, event: &InboundEvent, messenger: &dyn Messenger) -> bool {
        let today = chrono::Local::now().date_naive();
        self.handle_at(event, messenger, today).await
    }

    /// Handle an event, dating statistics with `today`.
    ///
    /// Replies go out in this order: greeting, small talk, statistics and
    /// chart, topic blocks, and finally the help text if nothing matched.
    /// A failed send is logged and the remaining replies still go out.
    pub async fn handle_at(
        &self,
        event: &InboundEvent,
        messenger: &dyn Messenger,
        today: NaiveDate,
    ) -> bool {
        if let Some(reason) = ignore_reason(event, &self.identity) {
            debug!(channel = %event.channel_id, reason = ?reason, "message ignored");
            return false;
        }

        let record = self.extract(&event.text);
        info!(
            channel = %event.channel_id,
            sender = %event.sender_id,
            countries = ?record.countries,
            status = ?record.status,
            wants_plot = record.wants_plot,
            topics = ?record.topics,
            "message processed"
        );

        let channel = event.channel_id.as_str();

        if record.greeting {
            self.send(messenger, channel, &replies::greeting(&event.sender_name))
                .await;
        }
        if record.wellbeing {
            self.send(messenger, channel, replies::WELLBEING).await;
        }

        if !record.countries.is_empty() {
            self.send(messenger, channel, replies::FETCHING).await;
            let reply = self.composer.compose_status_reply(&record, today).await;
            for part in split_message(&reply.text, messenger.max_message_chars()) {
                self.send(messenger, channel, &part).await;
            }
            if let Some(chart) = reply.chart {
                match self.renderer.render(&chart) {
                    Ok(rendered) => {
                        if let Err(e) = messenger
                            .upload_file(channel, rendered.bytes, &rendered.filename)
                            .await
                        {
                            warn!(channel, error = %e, "chart upload failed");
                        }
                    }
                    Err(e) => warn!(channel, error = %e, "chart rendering failed"),
                }
            }
        }

        for (topic, block) in compose_topic_reply(&record) {
            // The introduction answers a direct question and is not paced.
            if topic != Topic::SelfIntro {
                self.pace().await;
            }
            self.send(messenger, channel, block).await;
        }

        if record.needs_default_reply() {
            self.pace().await;
            self.send(messenger, channel, self.composer.compose_default_reply())
                .await;
        }

        true
    }

    async fn pace(&self) {
        if !self.pause.is_zero() {
            tokio::time::sleep(self.pause).await;
        }
    }

    async fn send(&self, messenger: &dyn Messenger, channel: &str, text: &str) {
        if let Err(e) = messenger.post_message(channel, text).await {
            warn!(channel, error = %e, "reply not delivered");
        }
    }
}
