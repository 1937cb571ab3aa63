//! Motor panel: browser bridge between the control page and the motor server
//!
//! On load the bridge connects to the server, binds every `.control` button to
//! a `motor_command`, asks for the saved positions and keeps the
//! `.saved-positions` list in sync with what the server pushes.

mod bridge;
mod channel;
mod config;
mod dom;
mod error;
mod positions;
mod socket;

pub use bridge::UiEventBridge;
pub use channel::{Channel, EventHandler};
pub use config::BridgeConfig;
pub use dom::{bind_controls, DomPositionsView};
pub use error::BridgeError;
pub use positions::{reduce, DomOp, LoadHandler, PositionsState, PositionsView};
pub use socket::SocketIoChannel;

use tracing::{error, info};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::dom::document;

/// Install panic hook and console logging
fn init_logging() {
    #[cfg(target_arch = "wasm32")]
    {
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));
        tracing_wasm::set_as_global_default();
    }
}

#[wasm_bindgen(start)]
pub fn main_js() -> Result<(), JsValue> {
    init_logging();

    let document = document()?;
    if document.ready_state() != "loading" {
        boot()?;
        return Ok(());
    }

    let onload = Closure::once(Box::new(move || {
        if let Err(e) = boot() {
            error!(error = %e, "motor panel failed to start");
        }
    }) as Box<dyn FnOnce()>);
    document.add_event_listener_with_callback("DOMContentLoaded", onload.as_ref().unchecked_ref())?;
    onload.forget();

    Ok(())
}

fn boot() -> Result<(), BridgeError> {
    let window = web_sys::window().ok_or(BridgeError::NoWindow)?;
    let document = document()?;
    let location = window.location();

    let config = BridgeConfig::from_query(&location.search().unwrap_or_default());
    let url = config.endpoint(&location.protocol()?, &location.host()?);
    info!(%url, namespace = %config.namespace, "connecting");

    let channel = std::rc::Rc::new(SocketIoChannel::connect(&url, &config.namespace)?);
    let view = DomPositionsView::locate(&document, &config.positions_selector, &config.load_label);
    let bridge = UiEventBridge::new(channel, view);

    bind_controls(&document, &config, &bridge)?;
    bridge.start();

    Ok(())
}
