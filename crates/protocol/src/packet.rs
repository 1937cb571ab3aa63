//! Socket.IO v5 packets carried inside Engine.IO `message` packets
//!
//! Layout: `<type>[/<namespace>,][<ack id>][<json>]`

use std::fmt;

use serde_json::Value;

use crate::error::{ProtocolError, Result};

pub const DEFAULT_NAMESPACE: &str = "/";

#[derive(Debug, Clone, PartialEq)]
pub enum SocketPacket {
    Connect {
        namespace: String,
        data: Option<Value>,
    },
    Disconnect {
        namespace: String,
    },
    Event {
        namespace: String,
        id: Option<u64>,
        name: String,
        args: Vec<Value>,
    },
    Ack {
        namespace: String,
        id: u64,
        args: Vec<Value>,
    },
    ConnectError {
        namespace: String,
        message: String,
    },
}

impl SocketPacket {
    /// Event on the default namespace, without an ack id
    pub fn event(name: impl Into<String>, args: Vec<Value>) -> Self {
        Self::Event {
            namespace: DEFAULT_NAMESPACE.to_string(),
            id: None,
            name: name.into(),
            args,
        }
    }

    pub fn namespace(&self) -> &str {
        match self {
            Self::Connect { namespace, .. }
            | Self::Disconnect { namespace }
            | Self::Event { namespace, .. }
            | Self::Ack { namespace, .. }
            | Self::ConnectError { namespace, .. } => namespace,
        }
    }

    pub fn decode(body: &str) -> Result<Self> {
        let mut chars = body.chars();
        let kind = chars.next().ok_or(ProtocolError::Empty)?;
        let rest = chars.as_str();
        if matches!(kind, '5' | '6') {
            return Err(ProtocolError::BinaryUnsupported);
        }

        let (namespace, rest) = split_namespace(rest);
        let (id, rest) = split_ack_id(rest)?;
        let data = if rest.is_empty() {
            None
        } else {
            Some(serde_json::from_str::<Value>(rest)?)
        };

        match kind {
            '0' => Ok(Self::Connect { namespace, data }),
            '1' => Ok(Self::Disconnect { namespace }),
            '2' => {
                let mut items = match data {
                    Some(Value::Array(items)) if !items.is_empty() => items,
                    _ => return Err(ProtocolError::Malformed("event without name".into())),
                };
                let name = match items.remove(0) {
                    Value::String(name) => name,
                    other => {
                        return Err(ProtocolError::Malformed(format!(
                            "event name is not a string: {other}"
                        )))
                    }
                };
                Ok(Self::Event {
                    namespace,
                    id,
                    name,
                    args: items,
                })
            }
            '3' => {
                let id = id.ok_or_else(|| ProtocolError::Malformed("ack without id".into()))?;
                let args = match data {
                    Some(Value::Array(items)) => items,
                    None => Vec::new(),
                    Some(_) => return Err(ProtocolError::Malformed("ack data is not an array".into())),
                };
                Ok(Self::Ack { namespace, id, args })
            }
            '4' => {
                let message = match data {
                    Some(Value::Object(map)) => map
                        .get("message")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    Some(Value::String(message)) => message,
                    _ => String::new(),
                };
                Ok(Self::ConnectError { namespace, message })
            }
            other => Err(ProtocolError::UnknownPacketType {
                layer: "socket",
                kind: other,
            }),
        }
    }
}

fn split_namespace(rest: &str) -> (String, &str) {
    if !rest.starts_with('/') {
        return (DEFAULT_NAMESPACE.to_string(), rest);
    }
    match rest.split_once(',') {
        Some((namespace, tail)) => (namespace.to_string(), tail),
        None => (rest.to_string(), ""),
    }
}

fn split_ack_id(rest: &str) -> Result<(Option<u64>, &str)> {
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return Ok((None, rest));
    }
    let id = rest[..digits]
        .parse()
        .map_err(|_| ProtocolError::Malformed(format!("ack id out of range: {}", &rest[..digits])))?;
    Ok((Some(id), &rest[digits..]))
}

fn write_namespace(f: &mut fmt::Formatter<'_>, namespace: &str) -> fmt::Result {
    if namespace == DEFAULT_NAMESPACE {
        Ok(())
    } else {
        write!(f, "{namespace},")
    }
}

impl fmt::Display for SocketPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect { namespace, data } => {
                f.write_str("0")?;
                write_namespace(f, namespace)?;
                if let Some(data) = data {
                    write!(f, "{data}")?;
                }
                Ok(())
            }
            Self::Disconnect { namespace } => {
                f.write_str("1")?;
                write_namespace(f, namespace)
            }
            Self::Event {
                namespace,
                id,
                name,
                args,
            } => {
                f.write_str("2")?;
                write_namespace(f, namespace)?;
                if let Some(id) = id {
                    write!(f, "{id}")?;
                }
                let mut items = Vec::with_capacity(args.len() + 1);
                items.push(Value::String(name.clone()));
                items.extend(args.iter().cloned());
                write!(f, "{}", Value::Array(items))
            }
            Self::Ack {
                namespace,
                id,
                args,
            } => {
                f.write_str("3")?;
                write_namespace(f, namespace)?;
                write!(f, "{id}{}", Value::Array(args.clone()))
            }
            Self::ConnectError { namespace, message } => {
                f.write_str("4")?;
                write_namespace(f, namespace)?;
                write!(f, "{}", serde_json::json!({ "message": message }))
            }
        }
    }
}
