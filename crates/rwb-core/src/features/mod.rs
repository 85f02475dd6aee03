//! Feature handlers behind bot commands.
//!
//! Every handler goes through [`fetch_or_apologize`]: fetch one resource, format a
//! reply, and turn any failure into an apology to the same chat. Nothing bubbles
//! up to the dispatcher or the update loop.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::{
    domain::ChatId,
    errors::Error,
    formatting::escape_html,
    messaging::{
        port::{send_reply, MessagingPort},
        types::OutgoingMessage,
    },
    Result,
};

pub mod rates;
pub mod weather;

pub use rates::RatesFeature;
pub use weather::WeatherFeature;

#[async_trait]
pub trait Feature: Send + Sync {
    /// Genitive resource name used in the apology ("курса рубля", "погоды").
    fn resource_label(&self) -> &'static str;

    /// Fetch the resource and render the HTML reply.
    async fn fetch_report(&self) -> Result<String>;
}

pub async fn fetch_or_apologize(
    feature: &dyn Feature,
    messenger: &dyn MessagingPort,
    chat_id: ChatId,
) {
    let text = match feature.fetch_report().await {
        Ok(report) => report,
        Err(e) => {
            tracing::warn!(
                chat_id = %chat_id,
                resource = feature.resource_label(),
                error = %e,
                "feature fetch failed"
            );
            apology(feature.resource_label(), &e)
        }
    };
    send_reply(messenger, OutgoingMessage::html(chat_id, text)).await;
}

pub fn apology(resource_label: &str, err: &Error) -> String {
    format!(
        "Ошибка при получении {resource_label}:\n{}",
        escape_html(&err.to_string())
    )
}

/// Decode a secondary-API body; shape mismatches are payload errors, not parse errors.
pub(crate) fn decode<T: DeserializeOwned>(body: serde_json::Value) -> Result<T> {
    serde_json::from_value(body).map_err(|e| Error::Payload(e.to_string()))
}
