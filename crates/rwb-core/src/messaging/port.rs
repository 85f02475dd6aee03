use async_trait::async_trait;

use crate::{messaging::types::OutgoingMessage, Result};

/// Outbound side of the platform client.
///
/// Fire-and-forget from the core's point of view: a failed send is logged by the
/// caller and never retried.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    async fn send_message(&self, msg: &OutgoingMessage) -> Result<()>;
}

/// Send a reply and swallow the failure after logging it.
pub async fn send_reply(messenger: &dyn MessagingPort, msg: OutgoingMessage) {
    if let Err(e) = messenger.send_message(&msg).await {
        tracing::error!(chat_id = %msg.chat_id, error = %e, "failed to send message");
    }
}
