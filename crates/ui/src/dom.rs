use std::cell::RefCell;
use std::rc::Rc;

use motor_panel_protocol::MotorCommand;
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, Document, Element, Event, EventTarget, HtmlInputElement};

use crate::bridge::UiEventBridge;
use crate::channel::Channel;
use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::positions::{DomOp, LoadHandler, PositionsView};

/// Get document helper
pub fn document() -> Result<Document, BridgeError> {
    window()
        .ok_or(BridgeError::NoWindow)?
        .document()
        .ok_or(BridgeError::NoDocument)
}

/// Saved positions rendered as `<li>label<button>Load</button></li>`
pub struct DomPositionsView {
    document: Document,
    container: Option<Element>,
    load_label: String,
    // Load listeners of the items currently on screen
    listeners: RefCell<Vec<Closure<dyn FnMut()>>>,
}

impl DomPositionsView {
    /// A missing container leaves the view inert instead of failing startup
    pub fn locate(document: &Document, selector: &str, load_label: &str) -> Self {
        let container = document.query_selector(selector).ok().flatten();
        if container.is_none() {
            warn!(selector, "saved positions container not found");
        }
        Self {
            document: document.clone(),
            container,
            load_label: load_label.to_string(),
            listeners: RefCell::new(Vec::new()),
        }
    }

    pub const fn has_container(&self) -> bool {
        self.container.is_some()
    }

    /// Number of Load listeners held for rendered items
    pub fn live_listeners(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn item(
        &self,
        label: &str,
        on_load: &LoadHandler,
    ) -> Result<(Element, Closure<dyn FnMut()>), BridgeError> {
        let li = self.document.create_element("li")?;
        li.set_text_content(Some(label));

        let button = self.document.create_element("button")?;
        button.set_text_content(Some(&self.load_label));

        let label = label.to_string();
        let on_load = Rc::clone(on_load);
        let onclick = Closure::wrap(Box::new(move || {
            on_load(&label);
        }) as Box<dyn FnMut()>);
        button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;

        li.append_child(&button)?;
        Ok((li, onclick))
    }
}

impl PositionsView for DomPositionsView {
    fn apply(&self, ops: &[DomOp], on_load: &LoadHandler) -> Result<(), BridgeError> {
        let Some(container) = &self.container else {
            return Ok(());
        };

        // Build every item first so a failure leaves the current list untouched
        let mut built = Vec::new();
        for op in ops {
            if let DomOp::Append { label } = op {
                built.push(self.item(label, on_load)?);
            }
        }
        let mut built = built.into_iter();

        for op in ops {
            match op {
                DomOp::Clear => {
                    container.set_inner_html("");
                    self.listeners.borrow_mut().clear();
                }
                DomOp::Append { .. } => {
                    if let Some((li, onclick)) = built.next() {
                        container.append_child(&li)?;
                        self.listeners.borrow_mut().push(onclick);
                    }
                }
            }
        }
        Ok(())
    }
}

/// Read the control enclosing a click target; `None` if any piece is missing
fn read_control(target: Option<EventTarget>, control_selector: &str) -> Option<MotorCommand> {
    let element = target?.dyn_into::<Element>().ok()?;
    let control = element.closest(control_selector).ok().flatten()?;
    let motor_id = control.get_attribute("data-motor-id")?;
    let input = control
        .query_selector("input")
        .ok()
        .flatten()?
        .dyn_into::<HtmlInputElement>()
        .ok()?;

    Some(MotorCommand {
        motor_id,
        value: input.value(),
    })
}

/// Attach a click listener to every control button; returns how many were bound
pub fn bind_controls<C, V>(
    document: &Document,
    config: &BridgeConfig,
    bridge: &Rc<UiEventBridge<C, V>>,
) -> Result<u32, BridgeError>
where
    C: Channel + 'static,
    V: PositionsView + 'static,
{
    let buttons = document.query_selector_all(&config.button_selector())?;

    for i in 0..buttons.length() {
        let Some(button) = buttons.item(i) else {
            continue;
        };

        let bridge = Rc::clone(bridge);
        let control_selector = config.control_selector.clone();
        let onclick = Closure::wrap(Box::new(move |e: Event| {
            bridge.handle_control_click(read_control(e.target(), &control_selector));
        }) as Box<dyn FnMut(_)>);
        button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    debug!(count = buttons.length(), "bound control buttons");
    Ok(buttons.length())
}
