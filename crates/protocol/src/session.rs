//! Client side of a Socket.IO session, independent of any transport
//!
//! The transport feeds every received text frame into [`ClientSession::handle_frame`]
//! and performs the returned [`SessionAction`]s in order.

use std::collections::VecDeque;

use serde_json::Value;

use crate::engine::{EnginePacket, Handshake};
use crate::error::Result;
use crate::events::OutboundEvent;
use crate::packet::{SocketPacket, DEFAULT_NAMESPACE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Transport open, waiting for the Engine.IO handshake
    Opening,
    /// Handshake done, namespace connect requested
    Joining,
    Connected,
    Closed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    /// Write this text frame to the transport
    Send(String),
    /// Namespace joined; `sid` as assigned by the server
    Connected { sid: Option<String> },
    /// Deliver an event to registered handlers
    Dispatch { name: String, args: Vec<Value> },
    /// Namespace connect refused
    Rejected { message: String },
    Closed,
}

/// What happened to an emitted event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmitOutcome {
    Send(String),
    /// Held until the namespace connect is acknowledged
    Buffered,
    /// Session closed; the event is gone
    Dropped,
}

#[derive(Debug)]
pub struct ClientSession {
    namespace: String,
    state: SessionState,
    handshake: Option<Handshake>,
    send_buffer: VecDeque<String>,
}

impl Default for ClientSession {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

impl ClientSession {
    pub fn new(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            state: SessionState::Opening,
            handshake: None,
            send_buffer: VecDeque::new(),
        }
    }

    pub const fn state(&self) -> SessionState {
        self.state
    }

    pub const fn handshake(&self) -> Option<&Handshake> {
        self.handshake.as_ref()
    }

    pub fn buffered(&self) -> usize {
        self.send_buffer.len()
    }

    /// Process one text frame from the server
    pub fn handle_frame(&mut self, frame: &str) -> Result<Vec<SessionAction>> {
        match EnginePacket::decode(frame)? {
            EnginePacket::Open(handshake) => {
                self.handshake = Some(handshake);
                self.state = SessionState::Joining;
                let connect = SocketPacket::Connect {
                    namespace: self.namespace.clone(),
                    data: None,
                };
                Ok(vec![SessionAction::Send(
                    EnginePacket::Message(connect.to_string()).to_string(),
                )])
            }
            EnginePacket::Ping(data) => Ok(vec![SessionAction::Send(
                EnginePacket::Pong(data).to_string(),
            )]),
            EnginePacket::Close => Ok(self.close()),
            EnginePacket::Pong(_) | EnginePacket::Upgrade | EnginePacket::Noop => Ok(Vec::new()),
            EnginePacket::Message(body) => self.handle_packet(SocketPacket::decode(&body)?),
        }
    }

    fn handle_packet(&mut self, packet: SocketPacket) -> Result<Vec<SessionAction>> {
        if packet.namespace() != self.namespace {
            return Ok(Vec::new());
        }

        match packet {
            SocketPacket::Connect { data, .. } => {
                self.state = SessionState::Connected;
                let sid = data
                    .as_ref()
                    .and_then(|d| d.get("sid"))
                    .and_then(Value::as_str)
                    .map(ToString::to_string);
                let mut actions = vec![SessionAction::Connected { sid }];
                actions.extend(self.send_buffer.drain(..).map(SessionAction::Send));
                Ok(actions)
            }
            SocketPacket::Disconnect { .. } => Ok(self.close()),
            SocketPacket::Event { name, args, .. } => Ok(vec![SessionAction::Dispatch { name, args }]),
            SocketPacket::Ack { .. } => Ok(Vec::new()),
            SocketPacket::ConnectError { message, .. } => {
                self.state = SessionState::Closed;
                self.send_buffer.clear();
                Ok(vec![SessionAction::Rejected { message }])
            }
        }
    }

    /// Queue or frame an outbound event depending on the session state
    pub fn emit(&mut self, event: &OutboundEvent) -> EmitOutcome {
        let mut packet = event.to_packet();
        if let SocketPacket::Event { namespace, .. } = &mut packet {
            namespace.clone_from(&self.namespace);
        }
        let frame = EnginePacket::Message(packet.to_string()).to_string();

        match self.state {
            SessionState::Connected => EmitOutcome::Send(frame),
            SessionState::Opening | SessionState::Joining => {
                self.send_buffer.push_back(frame);
                EmitOutcome::Buffered
            }
            SessionState::Closed => EmitOutcome::Dropped,
        }
    }

    /// Transport went away underneath the session
    pub fn mark_closed(&mut self) {
        self.state = SessionState::Closed;
        self.send_buffer.clear();
    }

    fn close(&mut self) -> Vec<SessionAction> {
        self.mark_closed();
        vec![SessionAction::Closed]
    }
}
