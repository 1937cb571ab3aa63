use motor_panel_protocol::OutboundEvent;
use serde_json::Value;

/// Callback for one named inbound event; receives the event arguments
pub type EventHandler = Box<dyn FnMut(&[Value])>;

/// Duplex real-time channel to the motor server
pub trait Channel {
    fn emit(&self, event: OutboundEvent);
    fn on(&self, event: &str, handler: EventHandler);
}
