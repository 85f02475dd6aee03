use std::sync::Arc;

use crate::{
    messaging::{
        port::{send_reply, MessagingPort},
        types::{IncomingMessage, OutgoingMessage, Update, UpdateKind},
    },
    router::CommandRouter,
};

pub const UNSUPPORTED_REPLY: &str = "Я пока не понимаю такие сообщения";

/// Classifies updates by shape and hands text to the command router.
pub struct Dispatcher {
    messenger: Arc<dyn MessagingPort>,
    router: CommandRouter,
}

impl Dispatcher {
    pub fn new(messenger: Arc<dyn MessagingPort>, router: CommandRouter) -> Self {
        Self { messenger, router }
    }

    pub async fn dispatch(&self, update: &Update) {
        match &update.kind {
            UpdateKind::Message(msg) => self.dispatch_message(msg).await,
            UpdateKind::Unsupported { kind } => {
                // Nothing to reply to; the cursor still moves past it.
                tracing::info!(
                    target: "audit",
                    update_id = update.id.0,
                    kind = %kind,
                    "Bot update skipped: unsupported update type {kind}"
                );
            }
        }
    }

    async fn dispatch_message(&self, msg: &IncomingMessage) {
        let sender = msg.display_name();

        let Some(text) = msg.text.as_deref() else {
            tracing::info!(
                target: "audit",
                sender = %sender,
                chat_id = %msg.chat_id,
                "Bot message from {sender}: unsupported message type, chatId = {}",
                msg.chat_id
            );
            send_reply(
                self.messenger.as_ref(),
                OutgoingMessage::html(msg.chat_id, UNSUPPORTED_REPLY),
            )
            .await;
            return;
        };

        tracing::info!(
            target: "audit",
            sender = %sender,
            chat_id = %msg.chat_id,
            content = %text,
            "Bot message from {sender}: \"{text}\", chatId = {}",
            msg.chat_id
        );
        self.router.route(msg.chat_id, text).await;
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        domain::{ChatId, UpdateId},
        features::{RatesFeature, WeatherFeature},
        router::DEFAULT_REPLY,
        testing::{sticker_update, text_update, RecordingMessenger, ScriptedTransport},
    };

    fn dispatcher() -> (Dispatcher, Arc<RecordingMessenger>, Arc<ScriptedTransport>) {
        let messenger = Arc::new(RecordingMessenger::default());
        let transport = Arc::new(ScriptedTransport::default());
        let rates = Arc::new(RatesFeature::new(transport.clone(), "https://quotes.test"));
        let weather = Arc::new(WeatherFeature::new(
            transport.clone(),
            "http://weather.test",
            "Moscow",
            "Москве",
            "",
        ));
        let router = CommandRouter::new(messenger.clone(), rates, weather);
        (Dispatcher::new(messenger.clone(), router), messenger, transport)
    }

    #[tokio::test]
    async fn non_text_message_gets_unsupported_reply() {
        let (d, messenger, transport) = dispatcher();
        d.dispatch(&sticker_update(1, 77)).await;

        assert_eq!(messenger.sent_to(ChatId(77)), vec![UNSUPPORTED_REPLY.to_string()]);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn plain_text_gets_default_reply() {
        let (d, messenger, _) = dispatcher();
        d.dispatch(&text_update(1, 77, "hello")).await;

        assert_eq!(messenger.sent_to(ChatId(77)), vec![DEFAULT_REPLY.to_string()]);
    }

    #[tokio::test]
    async fn command_reaches_feature_handler() {
        let (d, messenger, transport) = dispatcher();
        transport.push_ok(json!({ "main": { "temp": -3, "pressure": 1000, "humidity": 90 } }));
        d.dispatch(&text_update(1, 77, "/weather")).await;

        let sent = messenger.sent_to(ChatId(77));
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("<b>-3</b>"));
        assert!(sent[0].contains("<b>750</b> мм"));
    }

    #[tokio::test]
    async fn unsupported_update_kind_sends_nothing() {
        let (d, messenger, _) = dispatcher();
        d.dispatch(&Update {
            id: UpdateId(3),
            kind: UpdateKind::Unsupported {
                kind: "edited_message".to_string(),
            },
        })
        .await;

        assert_eq!(messenger.attempts(), 0);
    }
}
