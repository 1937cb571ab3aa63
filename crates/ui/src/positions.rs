//! Saved positions list: full replace on every push

use std::rc::Rc;

use crate::error::BridgeError;

/// Labels currently shown, in server order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionsState {
    labels: Vec<String>,
}

impl PositionsState {
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

/// Mutation the view applies to the list container
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomOp {
    Clear,
    Append { label: String },
}

/// Invoked with the label captured when the item was rendered
pub type LoadHandler = Rc<dyn Fn(&str)>;

/// Renders list operations; the bridge never touches the DOM directly
pub trait PositionsView {
    fn apply(&self, ops: &[DomOp], on_load: &LoadHandler) -> Result<(), BridgeError>;
}

/// Compute the next state and the operations that bring the view there.
/// The previous render is discarded wholesale.
pub fn reduce(previous: &PositionsState, incoming: Vec<String>) -> (PositionsState, Vec<DomOp>) {
    tracing::debug!(
        previous = previous.labels.len(),
        incoming = incoming.len(),
        "replacing saved positions"
    );

    let mut ops = Vec::with_capacity(incoming.len() + 1);
    ops.push(DomOp::Clear);
    ops.extend(
        incoming
            .iter()
            .map(|label| DomOp::Append { label: label.clone() }),
    );

    (PositionsState { labels: incoming }, ops)
}
