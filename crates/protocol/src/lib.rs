//! Wire protocol for the motor panel
//!
//! Typed event contracts plus the client half of Socket.IO (Engine.IO v4
//! framing, Socket.IO v5 packets) used between the page and the motor server.

pub mod engine;
pub mod error;
pub mod events;
pub mod packet;
pub mod session;

pub use engine::{EnginePacket, Handshake};
pub use error::{ProtocolError, Result};
pub use events::*;
pub use packet::SocketPacket;
pub use session::{ClientSession, EmitOutcome, SessionAction, SessionState};
