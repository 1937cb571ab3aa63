//! Engine.IO v4 text framing
//!
//! Every WebSocket text frame carries exactly one packet: a single type digit
//! followed by an optional body.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ProtocolError, Result};

/// Engine.IO protocol revision spoken by the client
pub const PROTOCOL_REVISION: u8 = 4;

/// Default mount path of a Socket.IO server
pub const DEFAULT_PATH: &str = "/socket.io/";

/// Handshake sent by the server in the `open` packet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    pub sid: String,
    #[serde(default)]
    pub upgrades: Vec<String>,
    pub ping_interval: u64,
    pub ping_timeout: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_payload: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnginePacket {
    Open(Handshake),
    Close,
    Ping(String),
    Pong(String),
    Message(String),
    Upgrade,
    Noop,
}

impl EnginePacket {
    /// Decode one text frame
    pub fn decode(frame: &str) -> Result<Self> {
        let mut chars = frame.chars();
        let kind = chars.next().ok_or(ProtocolError::Empty)?;
        let body = chars.as_str();

        match kind {
            '0' => Ok(Self::Open(serde_json::from_str(body)?)),
            '1' => Ok(Self::Close),
            '2' => Ok(Self::Ping(body.to_string())),
            '3' => Ok(Self::Pong(body.to_string())),
            '4' => Ok(Self::Message(body.to_string())),
            '5' => Ok(Self::Upgrade),
            '6' => Ok(Self::Noop),
            'b' => Err(ProtocolError::BinaryUnsupported),
            other => Err(ProtocolError::UnknownPacketType {
                layer: "engine",
                kind: other,
            }),
        }
    }
}

impl fmt::Display for EnginePacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open(handshake) => {
                let body = serde_json::to_string(handshake).map_err(|_| fmt::Error)?;
                write!(f, "0{body}")
            }
            Self::Close => f.write_str("1"),
            Self::Ping(data) => write!(f, "2{data}"),
            Self::Pong(data) => write!(f, "3{data}"),
            Self::Message(body) => write!(f, "4{body}"),
            Self::Upgrade => f.write_str("5"),
            Self::Noop => f.write_str("6"),
        }
    }
}

/// Build the WebSocket transport URL for a server origin such as
/// `wss://rig.local:5000`
pub fn websocket_url(origin: &str, path: &str) -> String {
    let origin = origin.trim_end_matches('/');
    let path = path.trim_matches('/');
    if path.is_empty() {
        format!("{origin}/?EIO={PROTOCOL_REVISION}&transport=websocket")
    } else {
        format!("{origin}/{path}/?EIO={PROTOCOL_REVISION}&transport=websocket")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_open_handshake() {
        let frame = r#"0{"sid":"lv_VI97HAXpY6yYWAAAC","upgrades":[],"pingInterval":25000,"pingTimeout":20000,"maxPayload":1000000}"#;
        let packet = EnginePacket::decode(frame).unwrap();
        match packet {
            EnginePacket::Open(h) => {
                assert_eq!(h.sid, "lv_VI97HAXpY6yYWAAAC");
                assert_eq!(h.ping_interval, 25000);
                assert_eq!(h.max_payload, Some(1_000_000));
            }
            other => panic!("expected open, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_ping_and_message() {
        assert_eq!(EnginePacket::decode("2").unwrap(), EnginePacket::Ping(String::new()));
        assert_eq!(
            EnginePacket::decode("2probe").unwrap(),
            EnginePacket::Ping("probe".to_string())
        );
        assert_eq!(
            EnginePacket::decode("42[\"x\"]").unwrap(),
            EnginePacket::Message("2[\"x\"]".to_string())
        );
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(EnginePacket::decode(""), Err(ProtocolError::Empty)));
        assert!(matches!(
            EnginePacket::decode("9"),
            Err(ProtocolError::UnknownPacketType { kind: '9', .. })
        ));
        assert!(matches!(
            EnginePacket::decode("bAAEC"),
            Err(ProtocolError::BinaryUnsupported)
        ));
        assert!(matches!(EnginePacket::decode("0{"), Err(ProtocolError::Json(_))));
    }

    #[test]
    fn test_pong_echoes_ping_data() {
        assert_eq!(EnginePacket::Pong("probe".into()).to_string(), "3probe");
        assert_eq!(EnginePacket::Pong(String::new()).to_string(), "3");
    }

    #[test]
    fn test_websocket_url() {
        assert_eq!(
            websocket_url("ws://127.0.0.1:5000", DEFAULT_PATH),
            "ws://127.0.0.1:5000/socket.io/?EIO=4&transport=websocket"
        );
        assert_eq!(
            websocket_url("wss://rig.local/", "motors"),
            "wss://rig.local/motors/?EIO=4&transport=websocket"
        );
    }
}
