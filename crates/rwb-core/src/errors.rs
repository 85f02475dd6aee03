/// Core error type for the bot.
///
/// Adapter crates map their specific errors into this type so the update loop
/// and feature handlers can treat every failure the same way (log, then either
/// re-poll or apologize to the chat).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    /// Socket, TLS, DNS or timeout failure before a full response body arrived.
    #[error("transport error: {0}")]
    Transport(String),

    /// Response body could not be parsed in the expected format.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Well-formed platform response reporting `ok=false`.
    #[error("api error: {0}")]
    Api(String),

    /// Well-formed response that lacks the fields a reply needs.
    #[error("payload error: {0}")]
    Payload(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
