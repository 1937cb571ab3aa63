//! Named events exchanged with the motor server

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{ProtocolError, Result};
use crate::packet::SocketPacket;

pub const MOTOR_COMMAND: &str = "motor_command";
pub const LOAD_POSITION: &str = "load_position";
pub const REQUEST_POSITIONS: &str = "request_positions";
pub const SAVED_POSITIONS: &str = "saved_positions";
pub const UPDATE: &str = "update";
pub const ERROR: &str = "error";
pub const PROFILE_SAVED: &str = "profile_saved";
pub const PROFILE_DELETED: &str = "profile_deleted";
pub const PROFILE_LIST: &str = "profile_list";

/// Command for a single motor, forwarded exactly as read from the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotorCommand {
    pub motor_id: String,
    pub value: String,
}

/// Events the page sends to the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundEvent {
    MotorCommand(MotorCommand),
    LoadPosition(String),
    RequestPositions,
}

impl OutboundEvent {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::MotorCommand(_) => MOTOR_COMMAND,
            Self::LoadPosition(_) => LOAD_POSITION,
            Self::RequestPositions => REQUEST_POSITIONS,
        }
    }

    /// Event arguments, in emit order
    pub fn args(&self) -> Vec<Value> {
        match self {
            Self::MotorCommand(cmd) => vec![json!({
                "motor_id": cmd.motor_id,
                "value": cmd.value,
            })],
            Self::LoadPosition(position) => vec![Value::String(position.clone())],
            Self::RequestPositions => Vec::new(),
        }
    }

    pub fn to_packet(&self) -> SocketPacket {
        SocketPacket::event(self.name(), self.args())
    }
}

/// Acknowledgement pushed after the server applied a command
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatusUpdate {
    pub motor_id: Value,
    pub value: Value,
    #[serde(default)]
    pub status: String,
}

/// Outcome of a profile save or delete on the server
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProfileStatus {
    pub profile_name: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Deserialize)]
struct ProfileList {
    profiles: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ServerError {
    #[serde(default)]
    message: String,
}

/// Events the server pushes to the page
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    SavedPositions(Vec<String>),
    Update(StatusUpdate),
    ServerError(String),
    ProfileSaved(ProfileStatus),
    ProfileDeleted(ProfileStatus),
    ProfileList(Vec<String>),
    Other(String),
}

impl InboundEvent {
    pub fn parse(name: &str, args: &[Value]) -> Result<Self> {
        match name {
            SAVED_POSITIONS => parse_saved_positions(args).map(Self::SavedPositions),
            UPDATE => decode_first(UPDATE, args).map(Self::Update),
            ERROR => {
                let first = first_arg(ERROR, args)?;
                match first {
                    Value::String(message) => Ok(Self::ServerError(message.clone())),
                    other => serde_json::from_value::<ServerError>(other.clone())
                        .map(|e| Self::ServerError(e.message))
                        .map_err(|e| invalid(ERROR, e.to_string())),
                }
            }
            PROFILE_SAVED => decode_first::<ProfileStatus>(PROFILE_SAVED, args).map(Self::ProfileSaved),
            PROFILE_DELETED => {
                decode_first::<ProfileStatus>(PROFILE_DELETED, args).map(Self::ProfileDeleted)
            }
            PROFILE_LIST => {
                decode_first::<ProfileList>(PROFILE_LIST, args).map(|list| Self::ProfileList(list.profiles))
            }
            other => Ok(Self::Other(other.to_string())),
        }
    }
}

/// Accept only a list made entirely of strings; anything else is rejected whole
pub fn parse_saved_positions(args: &[Value]) -> Result<Vec<String>> {
    let first = first_arg(SAVED_POSITIONS, args)?;
    let Value::Array(items) = first else {
        return Err(invalid(SAVED_POSITIONS, format!("expected a list, got {first}")));
    };

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_str()
                .map(ToString::to_string)
                .ok_or_else(|| invalid(SAVED_POSITIONS, format!("entry {i} is not a string: {item}")))
        })
        .collect()
}

fn decode_first<T: serde::de::DeserializeOwned>(event: &'static str, args: &[Value]) -> Result<T> {
    let first = first_arg(event, args)?;
    serde_json::from_value(first.clone()).map_err(|e| invalid(event, e.to_string()))
}

fn first_arg<'a>(event: &'static str, args: &'a [Value]) -> Result<&'a Value> {
    args.first().ok_or_else(|| invalid(event, "missing payload".to_string()))
}

fn invalid(event: &'static str, reason: String) -> ProtocolError {
    ProtocolError::InvalidPayload { event, reason }
}
