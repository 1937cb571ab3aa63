use motor_panel_protocol::ProtocolError;
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("no global `window` exists")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("javascript error: {0}")]
    Js(String),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl From<JsValue> for BridgeError {
    fn from(value: JsValue) -> Self {
        let message = value
            .dyn_ref::<js_sys::Error>()
            .map(|e| String::from(e.message()))
            .or_else(|| value.as_string())
            .unwrap_or_else(|| format!("{value:?}"));
        Self::Js(message)
    }
}

impl From<BridgeError> for JsValue {
    fn from(err: BridgeError) -> Self {
        Self::from_str(&err.to_string())
    }
}
