//! In-memory fakes for the core ports.

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;

use crate::{
    domain::{ChatId, UpdateId},
    errors::Error,
    messaging::{
        port::MessagingPort,
        types::{IncomingMessage, OutgoingMessage, Update, UpdateKind},
    },
    ports::{HttpRequest, JsonTransport, UpdateSource},
    Result,
};

pub fn text_update(id: i64, chat_id: i64, text: &str) -> Update {
    Update {
        id: UpdateId(id),
        kind: UpdateKind::Message(IncomingMessage {
            chat_id: ChatId(chat_id),
            first_name: Some("Anna".to_string()),
            last_name: None,
            text: Some(text.to_string()),
        }),
    }
}

pub fn sticker_update(id: i64, chat_id: i64) -> Update {
    Update {
        id: UpdateId(id),
        kind: UpdateKind::Message(IncomingMessage {
            chat_id: ChatId(chat_id),
            first_name: None,
            last_name: Some("Ivanova".to_string()),
            text: None,
        }),
    }
}

#[derive(Default)]
pub struct RecordingMessenger {
    sent: Mutex<Vec<OutgoingMessage>>,
    attempts: AtomicUsize,
    fail: bool,
}

impl RecordingMessenger {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<OutgoingMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, chat_id: ChatId) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|m| m.chat_id == chat_id)
            .map(|m| m.text)
            .collect()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessagingPort for RecordingMessenger {
    async fn send_message(&self, msg: &OutgoingMessage) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::Api("Bad Request: chat not found".to_string()));
        }
        self.sent.lock().unwrap().push(msg.clone());
        Ok(())
    }
}

/// Replays queued responses; an exhausted script behaves like a dead socket.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<serde_json::Value>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn push_ok(&self, body: serde_json::Value) {
        self.responses.lock().unwrap().push_back(Ok(body));
    }

    pub fn push_err(&self, err: Error) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl JsonTransport for ScriptedTransport {
    async fn get_json(&self, req: &HttpRequest) -> Result<serde_json::Value> {
        self.requests.lock().unwrap().push(req.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Transport("no scripted response".to_string())))
    }
}

/// Replays queued poll results and records the offset of every poll.
#[derive(Default)]
pub struct ScriptedSource {
    batches: Mutex<VecDeque<Result<Vec<Update>>>>,
    offsets: Mutex<Vec<Option<i64>>>,
}

impl ScriptedSource {
    pub fn push_batch(&self, batch: Vec<Update>) {
        self.batches.lock().unwrap().push_back(Ok(batch));
    }

    pub fn push_err(&self, err: Error) {
        self.batches.lock().unwrap().push_back(Err(err));
    }

    pub fn offsets(&self) -> Vec<Option<i64>> {
        self.offsets.lock().unwrap().clone()
    }
}

#[async_trait]
impl UpdateSource for ScriptedSource {
    async fn fetch_updates(&self, offset: Option<i64>, _timeout: Duration) -> Result<Vec<Update>> {
        self.offsets.lock().unwrap().push(offset);
        let next = self.batches.lock().unwrap().pop_front();
        match next {
            Some(result) => result,
            None => {
                // Behave like an idle long poll so `run` doesn't spin in tests.
                tokio::time::sleep(Duration::from_millis(5)).await;
                Ok(Vec::new())
            }
        }
    }
}
