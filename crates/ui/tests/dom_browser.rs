#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::rc::Rc;

use motor_panel_protocol::{MotorCommand, OutboundEvent, SAVED_POSITIONS};
use motor_panel_ui::{
    bind_controls, BridgeConfig, Channel, DomPositionsView, EventHandler, UiEventBridge,
};
use serde_json::{json, Value};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Document, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

const PAGE: &str = r#"
<div class="control" data-motor-id="3"><label>Pan</label><input value="45"><button>Set</button></div>
<div class="control"><input value="1"><button>Set</button></div>
<div class="control" data-motor-id="4"><button>Set</button></div>
<div class="saved-positions"><ul><li>stale</li></ul></div>
"#;

#[derive(Default)]
struct Recorder {
    emitted: RefCell<Vec<OutboundEvent>>,
    handlers: RefCell<Vec<(String, EventHandler)>>,
}

impl Recorder {
    fn push(&self, event: &str, args: &[Value]) {
        for (name, handler) in self.handlers.borrow_mut().iter_mut() {
            if name == event {
                handler(args);
            }
        }
    }

    fn take(&self) -> Vec<OutboundEvent> {
        std::mem::take(&mut *self.emitted.borrow_mut())
    }
}

impl Channel for Recorder {
    fn emit(&self, event: OutboundEvent) {
        self.emitted.borrow_mut().push(event);
    }

    fn on(&self, event: &str, handler: EventHandler) {
        self.handlers.borrow_mut().push((event.to_string(), handler));
    }
}

const PAGE_WITHOUT_LIST: &str = r#"
<div class="control" data-motor-id="2"><input value="500"><button>Set</button></div>
"#;

fn mount_html(html: &str) -> Document {
    let document = web_sys::window().unwrap().document().unwrap();
    document.body().unwrap().set_inner_html(html);
    document
}

fn mount() -> Document {
    mount_html(PAGE)
}

fn click(document: &Document, selector: &str, index: u32) {
    document
        .query_selector_all(selector)
        .unwrap()
        .item(index)
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap()
        .click();
}

#[wasm_bindgen_test]
fn control_buttons_emit_motor_commands() {
    let document = mount();
    let config = BridgeConfig::default();
    let channel = Rc::new(Recorder::default());
    let view = DomPositionsView::locate(&document, &config.positions_selector, &config.load_label);
    let bridge = UiEventBridge::new(Rc::clone(&channel), view);

    assert_eq!(bind_controls(&document, &config, &bridge).unwrap(), 3);

    click(&document, ".control button", 0);
    click(&document, ".control button", 1);
    click(&document, ".control button", 2);
    assert_eq!(
        channel.take(),
        vec![OutboundEvent::MotorCommand(MotorCommand {
            motor_id: "3".into(),
            value: "45".into(),
        })]
    );
}

#[wasm_bindgen_test]
fn saved_positions_replace_list_and_load() {
    let document = mount();
    let config = BridgeConfig::default();
    let channel = Rc::new(Recorder::default());
    let view = DomPositionsView::locate(&document, &config.positions_selector, &config.load_label);
    let bridge = UiEventBridge::new(Rc::clone(&channel), view);
    bridge.start();
    assert_eq!(channel.take(), vec![OutboundEvent::RequestPositions]);

    channel.push(SAVED_POSITIONS, &[json!(["home", "parked"])]);

    let items = document.query_selector_all(".saved-positions li").unwrap();
    assert_eq!(items.length(), 2);
    let first = items.item(0).unwrap();
    assert_eq!(first.first_child().unwrap().text_content().as_deref(), Some("home"));
    assert_eq!(first.text_content().as_deref(), Some("homeLoad"));

    click(&document, ".saved-positions li button", 1);
    assert_eq!(channel.take(), vec![OutboundEvent::LoadPosition("parked".into())]);
}

#[wasm_bindgen_test]
fn rerender_releases_previous_load_listeners() {
    let document = mount();
    let config = BridgeConfig::default();
    let channel = Rc::new(Recorder::default());
    let view = DomPositionsView::locate(&document, &config.positions_selector, &config.load_label);
    let bridge = UiEventBridge::new(Rc::clone(&channel), view);
    bridge.start();

    for _ in 0..5 {
        channel.push(SAVED_POSITIONS, &[json!(["home", "parked", "tilted"])]);
    }
    channel.push(SAVED_POSITIONS, &[json!(["home", "parked"])]);

    assert_eq!(bridge.view().live_listeners(), 2);
    assert_eq!(
        document.query_selector_all(".saved-positions li").unwrap().length(),
        2
    );

    channel.take();
    click(&document, ".saved-positions li button", 0);
    assert_eq!(channel.take(), vec![OutboundEvent::LoadPosition("home".into())]);
}

#[wasm_bindgen_test]
fn page_without_positions_list_still_works() {
    let document = mount_html(PAGE_WITHOUT_LIST);
    let config = BridgeConfig::default();
    let channel = Rc::new(Recorder::default());
    let view = DomPositionsView::locate(&document, &config.positions_selector, &config.load_label);
    assert!(!view.has_container());
    let bridge = UiEventBridge::new(Rc::clone(&channel), view);

    assert_eq!(bind_controls(&document, &config, &bridge).unwrap(), 1);
    bridge.start();
    assert_eq!(channel.take(), vec![OutboundEvent::RequestPositions]);

    channel.push(SAVED_POSITIONS, &[json!(["home", "parked"])]);
    assert_eq!(bridge.view().live_listeners(), 0);
    assert_eq!(document.query_selector_all("li").unwrap().length(), 0);
    assert!(channel.take().is_empty());

    click(&document, ".control button", 0);
    assert_eq!(
        channel.take(),
        vec![OutboundEvent::MotorCommand(MotorCommand {
            motor_id: "2".into(),
            value: "500".into(),
        })]
    );
}
