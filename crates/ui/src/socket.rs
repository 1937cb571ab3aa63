use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use motor_panel_protocol::{ClientSession, EmitOutcome, OutboundEvent, SessionAction};
use serde_json::Value;
use tracing::{debug, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, ErrorEvent, MessageEvent, WebSocket};

use crate::channel::{Channel, EventHandler};
use crate::error::BridgeError;

/// Socket.IO channel over a browser `WebSocket`
pub struct SocketIoChannel {
    inner: Rc<Inner>,
}

struct Inner {
    ws: WebSocket,
    session: RefCell<ClientSession>,
    handlers: RefCell<HashMap<String, Vec<EventHandler>>>,
}

impl SocketIoChannel {
    pub fn connect(url: &str, namespace: &str) -> Result<Self, BridgeError> {
        let ws = WebSocket::new(url)?;
        let inner = Rc::new(Inner {
            ws: ws.clone(),
            session: RefCell::new(ClientSession::new(namespace)),
            handlers: RefCell::new(HashMap::new()),
        });

        // ON MESSAGE
        let inner_msg = Rc::clone(&inner);
        let onmessage = Closure::wrap(Box::new(move |e: MessageEvent| {
            let Some(frame) = e.data().as_string() else {
                warn!("dropping binary frame");
                return;
            };
            if let Err(e) = inner_msg.handle_frame(&frame) {
                warn!(error = %e, "bad frame from server");
            }
        }) as Box<dyn FnMut(_)>);
        ws.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
        onmessage.forget();

        // ON ERROR
        let onerror = Closure::wrap(Box::new(move |e: ErrorEvent| {
            warn!(message = %e.message(), "websocket error");
        }) as Box<dyn FnMut(_)>);
        ws.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onerror.forget();

        // ON CLOSE
        let inner_close = Rc::clone(&inner);
        let onclose = Closure::wrap(Box::new(move |e: CloseEvent| {
            warn!(code = e.code(), reason = %e.reason(), "websocket closed");
            inner_close.session.borrow_mut().mark_closed();
        }) as Box<dyn FnMut(_)>);
        ws.set_onclose(Some(onclose.as_ref().unchecked_ref()));
        onclose.forget();

        Ok(Self { inner })
    }
}

impl Inner {
    fn handle_frame(&self, frame: &str) -> Result<(), BridgeError> {
        let actions = self.session.borrow_mut().handle_frame(frame)?;
        for action in actions {
            self.perform(action);
        }
        Ok(())
    }

    fn perform(&self, action: SessionAction) {
        match action {
            SessionAction::Send(frame) => self.send(&frame),
            SessionAction::Connected { sid } => info!(sid = ?sid, "connected to motor server"),
            SessionAction::Dispatch { name, args } => self.dispatch(&name, &args),
            SessionAction::Rejected { message } => {
                warn!(%message, "server refused connection");
                let _ = self.ws.close();
            }
            SessionAction::Closed => {
                info!("server closed the session");
                let _ = self.ws.close();
            }
        }
    }

    fn send(&self, frame: &str) {
        if let Err(e) = self.ws.send_with_str(frame) {
            warn!(error = ?e, "websocket send failed");
        }
    }

    fn dispatch(&self, name: &str, args: &[Value]) {
        // Handlers are taken out while running so they may register more
        let Some(mut running) = self.handlers.borrow_mut().remove(name) else {
            debug!(event = name, "no handler");
            return;
        };
        for handler in &mut running {
            handler(args);
        }
        let mut handlers = self.handlers.borrow_mut();
        let added = handlers.remove(name).unwrap_or_default();
        running.extend(added);
        handlers.insert(name.to_string(), running);
    }
}

impl Channel for SocketIoChannel {
    fn emit(&self, event: OutboundEvent) {
        let outcome = self.inner.session.borrow_mut().emit(&event);
        match outcome {
            EmitOutcome::Send(frame) => self.inner.send(&frame),
            EmitOutcome::Buffered => debug!(event = event.name(), "buffered until connected"),
            EmitOutcome::Dropped => warn!(event = event.name(), "not connected, event dropped"),
        }
    }

    fn on(&self, event: &str, handler: EventHandler) {
        self.inner
            .handlers
            .borrow_mut()
            .entry(event.to_string())
            .or_default()
            .push(handler);
    }
}
