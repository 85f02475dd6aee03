//! Telegram adapter (teloxide).
//!
//! Implements the `rwb-core` UpdateSource and MessagingPort over the Telegram
//! Bot API: `getUpdates` long polling and `sendMessage` with HTML parse mode.

use std::time::Duration;

use async_trait::async_trait;

use teloxide::{
    prelude::*,
    types::{Message, UpdateKind as TgUpdateKind},
    RequestError,
};

use rwb_core::{
    domain::{ChatId, UpdateId},
    errors::Error,
    messaging::{
        port::MessagingPort,
        types::{IncomingMessage, OutgoingMessage, ParseMode, Update, UpdateKind},
    },
    ports::UpdateSource,
    Result,
};

/// Extra client-side time on top of the server-side long-poll timeout.
const CLIENT_TIMEOUT_SLACK: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct TelegramClient {
    bot: Bot,
}

impl TelegramClient {
    /// The HTTP client timeout must outlast the long poll, or every idle poll fails.
    pub fn new(token: impl Into<String>, poll_timeout: Duration) -> Result<Self> {
        let client = teloxide::net::default_reqwest_settings()
            .timeout(poll_timeout + CLIENT_TIMEOUT_SLACK)
            .build()
            .map_err(|e| Error::Config(format!("telegram client build failed: {e}")))?;
        Ok(Self {
            bot: Bot::with_client(token, client),
        })
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn map_err(e: RequestError) -> Error {
        match e {
            RequestError::Api(api) => Error::Api(api.to_string()),
            RequestError::Network(e) => Error::Transport(e.to_string()),
            RequestError::InvalidJson { source, .. } => Error::Protocol(source.to_string()),
            RequestError::Io(e) => Error::Io(e),
            other => Error::Api(other.to_string()),
        }
    }
}

#[async_trait]
impl UpdateSource for TelegramClient {
    async fn fetch_updates(&self, offset: Option<i64>, timeout: Duration) -> Result<Vec<Update>> {
        let timeout_secs = u32::try_from(timeout.as_secs()).unwrap_or(u32::MAX);
        let mut req = self.bot.get_updates().timeout(timeout_secs);
        if let Some(offset) = offset {
            let offset = i32::try_from(offset)
                .map_err(|_| Error::Payload(format!("update offset {offset} out of range")))?;
            req = req.offset(offset);
        }

        let updates = req.await.map_err(Self::map_err)?;
        Ok(updates.into_iter().map(convert_update).collect())
    }
}

#[async_trait]
impl MessagingPort for TelegramClient {
    async fn send_message(&self, msg: &OutgoingMessage) -> Result<()> {
        let parse_mode = match msg.parse_mode {
            ParseMode::Html => teloxide::types::ParseMode::Html,
        };
        self.bot
            .send_message(Self::tg_chat(msg.chat_id), msg.text.clone())
            .parse_mode(parse_mode)
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }
}

pub fn convert_update(update: teloxide::types::Update) -> Update {
    let id = UpdateId(i64::from(update.id));
    let kind = match update.kind {
        TgUpdateKind::Message(msg) => UpdateKind::Message(convert_message(&msg)),
        other => UpdateKind::Unsupported {
            kind: kind_name(&other).to_string(),
        },
    };
    Update { id, kind }
}

/// Sender names win; the chat's own names cover anonymous senders.
fn convert_message(msg: &Message) -> IncomingMessage {
    let (first_name, last_name) = match msg.from() {
        Some(user) => (Some(user.first_name.clone()), user.last_name.clone()),
        None => (
            msg.chat.first_name().map(str::to_string),
            msg.chat.last_name().map(str::to_string),
        ),
    };

    IncomingMessage {
        chat_id: ChatId(msg.chat.id.0),
        first_name,
        last_name,
        text: msg.text().map(str::to_string),
    }
}

fn kind_name(kind: &TgUpdateKind) -> &'static str {
    match kind {
        TgUpdateKind::Message(_) => "message",
        TgUpdateKind::EditedMessage(_) => "edited_message",
        TgUpdateKind::ChannelPost(_) => "channel_post",
        TgUpdateKind::EditedChannelPost(_) => "edited_channel_post",
        TgUpdateKind::InlineQuery(_) => "inline_query",
        TgUpdateKind::CallbackQuery(_) => "callback_query",
        TgUpdateKind::Error(_) => "unknown",
        _ => "other",
    }
}
