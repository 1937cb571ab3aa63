//! UI event bridge
//!
//! Translates control clicks into motor commands and renders the saved
//! positions list the server pushes.

use std::cell::RefCell;
use std::rc::Rc;

use motor_panel_protocol::{
    InboundEvent, MotorCommand, OutboundEvent, ERROR, PROFILE_DELETED, PROFILE_LIST,
    PROFILE_SAVED, SAVED_POSITIONS, UPDATE,
};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::channel::Channel;
use crate::positions::{reduce, LoadHandler, PositionsState, PositionsView};

/// Events the bridge subscribes to on start
const SUBSCRIBED: [&str; 6] = [
    SAVED_POSITIONS,
    UPDATE,
    ERROR,
    PROFILE_SAVED,
    PROFILE_DELETED,
    PROFILE_LIST,
];

pub struct UiEventBridge<C, V> {
    channel: Rc<C>,
    view: V,
    state: RefCell<PositionsState>,
}

impl<C, V> UiEventBridge<C, V>
where
    C: Channel + 'static,
    V: PositionsView + 'static,
{
    pub fn new(channel: Rc<C>, view: V) -> Rc<Self> {
        Rc::new(Self {
            channel,
            view,
            state: RefCell::new(PositionsState::default()),
        })
    }

    /// Subscribe to server pushes, then ask for the current positions
    pub fn start(self: &Rc<Self>) {
        for event in SUBSCRIBED {
            let bridge = Rc::clone(self);
            self.channel
                .on(event, Box::new(move |args: &[Value]| bridge.handle_inbound(event, args)));
        }
        self.request_positions();
    }

    pub fn request_positions(&self) {
        self.channel.emit(OutboundEvent::RequestPositions);
    }

    /// `None` means the click did not come from a well-formed control
    pub fn handle_control_click(&self, command: Option<MotorCommand>) {
        let Some(command) = command else {
            debug!("click outside a complete motor control, ignoring");
            return;
        };
        debug!(motor_id = %command.motor_id, value = %command.value, "motor command");
        self.channel.emit(OutboundEvent::MotorCommand(command));
    }

    pub fn handle_inbound(&self, event: &str, args: &[Value]) {
        match InboundEvent::parse(event, args) {
            Ok(InboundEvent::SavedPositions(positions)) => self.render_positions(positions),
            Ok(InboundEvent::Update(update)) => {
                info!(motor_id = %update.motor_id, value = %update.value, status = %update.status, "motor updated");
            }
            Ok(InboundEvent::ServerError(message)) => warn!(%message, "server reported an error"),
            Ok(InboundEvent::ProfileSaved(profile)) => {
                info!(profile = %profile.profile_name, status = %profile.status, "profile saved");
            }
            Ok(InboundEvent::ProfileDeleted(profile)) => {
                info!(profile = %profile.profile_name, status = %profile.status, "profile deleted");
            }
            Ok(InboundEvent::ProfileList(profiles)) => {
                info!(count = profiles.len(), profiles = ?profiles, "profiles available");
            }
            Ok(InboundEvent::Other(name)) => debug!(%name, "unhandled event"),
            Err(e) => warn!(error = %e, "ignoring malformed event"),
        }
    }

    pub fn render_positions(&self, positions: Vec<String>) {
        let (next, ops) = reduce(&self.state.borrow(), positions);

        let channel = Rc::clone(&self.channel);
        let on_load: LoadHandler = Rc::new(move |label: &str| {
            channel.emit(OutboundEvent::LoadPosition(label.to_string()));
        });

        // The view either renders everything or leaves the old list in place
        match self.view.apply(&ops, &on_load) {
            Ok(()) => *self.state.borrow_mut() = next,
            Err(e) => warn!(error = %e, "failed to render saved positions"),
        }
    }

    pub const fn view(&self) -> &V {
        &self.view
    }

    pub fn positions(&self) -> Vec<String> {
        self.state.borrow().labels().to_vec()
    }
}
