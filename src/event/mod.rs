//! Event Dispatch.
//!
//! Node events (component, string and input payloads) and custom events
//! (measure/layout/draw) share one receiver model: a per-node list of
//! receivers and a single global receiver, composed in that order.
//!
//! Event values borrow the producer's payload. Receivers get
//! `&NodeEvent<'_>` and cannot keep it past the call.
//!
//! # Example
//!
//! ```ignore
//! use spark_node::event::{self, NODE_ON_CLICK};
//!
//! event::register_node_event(button, NODE_ON_CLICK, 1, None)?;
//! event::register_node_event_receiver(|e| {
//!     if e.target_id == 1 {
//!         println!("clicked {}", e.node);
//!     }
//! });
//! ```

pub mod custom;
mod dispatch;
pub mod input;
mod receivers;
pub mod types;

pub use custom::{
    CustomEvent, CustomEventFlags, CustomPayload, add_node_custom_event_receiver,
    dispatch_custom_event, is_custom_event_registered, register_node_custom_event, register_node_custom_event_receiver,
    remove_node_custom_event_receiver, unregister_node_custom_event,
    unregister_node_custom_event_receiver,
};
pub use dispatch::{
    NodeEventReceiver, add_node_event_receiver, dispatch_component_event, dispatch_input_event,
    dispatch_string_event, is_node_event_registered, register_node_event,
    register_node_event_receiver, remove_node_event_receiver, unregister_node_event,
    unregister_node_event_receiver,
};
pub use input::UiInputEvent;
pub use receivers::{ReceiverId, Registration};
pub use types::*;

use crate::types::NodeHandle;

/// Drop every event and custom-event registration of `node`.
pub(crate) fn forget_node(node: NodeHandle) {
    dispatch::forget_node(node);
    custom::forget_node(node);
}

/// Reset all event state (for testing).
pub fn reset_events() {
    dispatch::reset_node_events();
    custom::reset_custom_events();
}
