use crate::domain::{ChatId, UpdateId};

/// One update as delivered by the platform's polling endpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct Update {
    pub id: UpdateId,
    pub kind: UpdateKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum UpdateKind {
    /// A new message in a chat, text or not.
    Message(IncomingMessage),
    /// Any other update type (edited message, channel post, callback, ...).
    Unsupported { kind: String },
}

/// Platform-specific fields stay in the Telegram adapter.
#[derive(Clone, Debug, PartialEq)]
pub struct IncomingMessage {
    pub chat_id: ChatId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// `None` for stickers, photos, voice and every other non-text message.
    pub text: Option<String>,
}

impl IncomingMessage {
    /// `first last`, either part alone, or an empty string when both are missing.
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect();
        parts.join(" ")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseMode {
    Html,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OutgoingMessage {
    pub chat_id: ChatId,
    pub text: String,
    pub parse_mode: ParseMode,
}

impl OutgoingMessage {
    pub fn html(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            parse_mode: ParseMode::Html,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(first: Option<&str>, last: Option<&str>) -> IncomingMessage {
        IncomingMessage {
            chat_id: ChatId(1),
            first_name: first.map(str::to_string),
            last_name: last.map(str::to_string),
            text: None,
        }
    }

    #[test]
    fn display_name_composition() {
        assert_eq!(msg(Some("Anna"), None).display_name(), "Anna");
        assert_eq!(msg(None, Some("Ivanova")).display_name(), "Ivanova");
        assert_eq!(msg(None, None).display_name(), "");
        assert_eq!(msg(Some("Anna"), Some("Ivanova")).display_name(), "Anna Ivanova");
        assert_eq!(msg(Some(""), Some("Ivanova")).display_name(), "Ivanova");
    }

    #[test]
    fn replies_are_html() {
        let out = OutgoingMessage::html(ChatId(3), "<b>hi</b>");
        assert_eq!(out.parse_mode, ParseMode::Html);
        assert_eq!(out.text, "<b>hi</b>");
    }
}
