use thiserror::Error;

/// Errors raised while decoding frames or driving the client session
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("empty packet")]
    Empty,
    #[error("unknown {layer} packet type: {kind:?}")]
    UnknownPacketType { layer: &'static str, kind: char },
    #[error("binary packets are not supported")]
    BinaryUnsupported,
    #[error("malformed packet: {0}")]
    Malformed(String),
    #[error("invalid payload for `{event}`: {reason}")]
    InvalidPayload { event: &'static str, reason: String },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
