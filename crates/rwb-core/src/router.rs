use std::sync::Arc;

use crate::{
    domain::ChatId,
    features::{fetch_or_apologize, Feature},
    messaging::{
        port::{send_reply, MessagingPort},
        types::OutgoingMessage,
    },
};

pub const DEFAULT_REPLY: &str = "Ура! Я скоро буду нормально работать!";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    Ruble,
    Weather,
}

/// Exact command strings. No prefix or argument matching: `/ruble ` is plain text.
pub const COMMANDS: &[(&str, Command)] = &[
    ("/ruble", Command::Ruble),
    ("/weather", Command::Weather),
];

impl Command {
    pub fn parse(text: &str) -> Option<Self> {
        COMMANDS
            .iter()
            .find(|(name, _)| *name == text)
            .map(|(_, cmd)| *cmd)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Command::Ruble => "/ruble",
            Command::Weather => "/weather",
        }
    }
}

pub struct CommandRouter {
    messenger: Arc<dyn MessagingPort>,
    rates: Arc<dyn Feature>,
    weather: Arc<dyn Feature>,
}

impl CommandRouter {
    pub fn new(
        messenger: Arc<dyn MessagingPort>,
        rates: Arc<dyn Feature>,
        weather: Arc<dyn Feature>,
    ) -> Self {
        Self {
            messenger,
            rates,
            weather,
        }
    }

    fn feature(&self, cmd: Command) -> &dyn Feature {
        match cmd {
            Command::Ruble => self.rates.as_ref(),
            Command::Weather => self.weather.as_ref(),
        }
    }

    pub async fn route(&self, chat_id: ChatId, text: &str) {
        match Command::parse(text) {
            Some(cmd) => {
                tracing::debug!(chat_id = %chat_id, command = cmd.as_str(), "routing command");
                fetch_or_apologize(self.feature(cmd), self.messenger.as_ref(), chat_id).await;
            }
            None => {
                send_reply(
                    self.messenger.as_ref(),
                    OutgoingMessage::html(chat_id, DEFAULT_REPLY),
                )
                .await;
            }
        }
    }
}
