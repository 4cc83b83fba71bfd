//! Node event registration and dispatch.
//!
//! # API
//!
//! - `register_node_event(node, kind, target_id, user_data)` - opt a node in
//! - `unregister_node_event(node, kind)`
//! - `add_node_event_receiver(node, fn)` / `remove_node_event_receiver`
//! - `register_node_event_receiver(fn)` / `unregister_node_event_receiver`
//! - `dispatch_component_event`, `dispatch_string_event`, `dispatch_input_event`
//!
//! Dispatch order: per-node receivers in insertion order, then the global
//! receiver. Only kinds registered on the node are delivered.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::node::{self, with_node};
use crate::types::{ExternalRef, NodeHandle};

use super::input::UiInputEvent;
use super::receivers::{ReceiverId, ReceiverTable, Registration};
use super::types::{self, ComponentEventData, EventPayload, NodeEvent, NodeEventType};

/// Receiver signature. The event borrow ends when the call returns.
pub type NodeEventReceiver = dyn Fn(&NodeEvent<'_>);

thread_local! {
    static RECEIVERS: RefCell<ReceiverTable<NodeEventType, NodeEventReceiver>> =
        RefCell::new(ReceiverTable::new());
}

// =============================================================================
// Registration
// =============================================================================

/// Opt `node` into events of `kind`.
///
/// Re-registering replaces the stored `(target_id, user_data)` pair.
pub fn register_node_event(
    node: NodeHandle,
    kind: NodeEventType,
    target_id: i32,
    user_data: Option<ExternalRef>,
) -> Result<()> {
    let (node_type, builder) = with_node(node, |e| (e.node_type, e.builder))?;
    if builder {
        return Err(Error::BuilderNode);
    }
    if types::lookup_for(kind, node_type).is_none() {
        log::warn!("{kind:?} is not supported by {node_type:?} node {node}");
        return Err(Error::NotSupported { tag: kind.raw(), node_type });
    }

    let registration = Registration { target_id, user_data };
    RECEIVERS.with(|r| r.borrow_mut().register(node, kind, registration));
    log::debug!("registered {kind:?} on {node} (target {target_id})");
    Ok(())
}

/// Stop delivering `kind` for `node`. Unregistered kinds are ignored.
pub fn unregister_node_event(node: NodeHandle, kind: NodeEventType) -> Result<()> {
    let builder = with_node(node, |e| e.builder)?;
    if builder {
        return Err(Error::BuilderNode);
    }
    RECEIVERS.with(|r| r.borrow_mut().unregister(node, kind));
    Ok(())
}

pub fn is_node_event_registered(node: NodeHandle, kind: NodeEventType) -> bool {
    RECEIVERS.with(|r| r.borrow().is_registered(node, kind))
}

// =============================================================================
// Receivers
// =============================================================================

/// Add a receiver scoped to `node`. Runs before the global receiver.
pub fn add_node_event_receiver<F>(node: NodeHandle, receiver: F) -> Result<ReceiverId>
where
    F: Fn(&NodeEvent<'_>) + 'static,
{
    let builder = with_node(node, |e| e.builder)?;
    if builder {
        return Err(Error::BuilderNode);
    }
    Ok(RECEIVERS.with(|r| r.borrow_mut().add_receiver(node, Rc::new(receiver))))
}

pub fn remove_node_event_receiver(node: NodeHandle, id: ReceiverId) -> Result<()> {
    let builder = with_node(node, |e| e.builder)?;
    if builder {
        return Err(Error::BuilderNode);
    }
    if RECEIVERS.with(|r| r.borrow_mut().remove_receiver(node, id)) {
        Ok(())
    } else {
        Err(Error::param(format!("{id:?} is not registered on {node}")))
    }
}

/// Install the single global receiver, replacing any previous one.
pub fn register_node_event_receiver<F>(receiver: F)
where
    F: Fn(&NodeEvent<'_>) + 'static,
{
    RECEIVERS.with(|r| {
        let mut r = r.borrow_mut();
        if r.has_global() {
            log::debug!("replacing global node event receiver");
        }
        r.set_global(Some(Rc::new(receiver)));
    });
}

pub fn unregister_node_event_receiver() {
    RECEIVERS.with(|r| r.borrow_mut().set_global(None));
}

// =============================================================================
// Dispatch
// =============================================================================

/// Deliver one event. Returns how many receivers ran.
fn deliver(node: NodeHandle, kind: NodeEventType, payload: EventPayload<'_>) -> Result<usize> {
    let node_type = node::node_type_of(node)?;
    let Some(shape) = types::lookup_for(kind, node_type) else {
        return Err(Error::NotSupported { tag: kind.raw(), node_type });
    };
    if shape.payload != payload.kind() {
        return Err(Error::param(format!(
            "{kind:?} carries {:?} payloads, got {:?}",
            shape.payload,
            payload.kind()
        )));
    }

    let Some(targets) = RECEIVERS.with(|r| r.borrow().targets(node, kind)) else {
        log::trace!("{kind:?} on {node} dropped: not registered");
        return Ok(0);
    };

    let event = NodeEvent {
        kind,
        node,
        target_id: targets.registration.target_id,
        user_data: targets.registration.user_data,
        payload,
    };

    let mut delivered = 0;
    for receiver in &targets.per_node {
        receiver(&event);
        delivered += 1;
    }
    if let Some(global) = &targets.global {
        global(&event);
        delivered += 1;
    }
    log::trace!("{kind:?} on {node} delivered to {delivered} receiver(s)");
    Ok(delivered)
}

/// Fire a component (numeric) event on `node`.
pub fn dispatch_component_event(
    node: NodeHandle,
    kind: NodeEventType,
    data: &ComponentEventData,
) -> Result<usize> {
    deliver(node, kind, EventPayload::Component(data))
}

/// Fire a string event on `node`.
pub fn dispatch_string_event(node: NodeHandle, kind: NodeEventType, text: &str) -> Result<usize> {
    deliver(node, kind, EventPayload::String(text))
}

/// Fire an input event on `node`.
pub fn dispatch_input_event(
    node: NodeHandle,
    kind: NodeEventType,
    event: &UiInputEvent,
) -> Result<usize> {
    deliver(node, kind, EventPayload::Input(event))
}

// =============================================================================
// Cleanup
// =============================================================================

pub(crate) fn forget_node(node: NodeHandle) {
    RECEIVERS.with(|r| r.borrow_mut().forget_node(node));
}

/// Reset all node event state (for testing).
pub fn reset_node_events() {
    RECEIVERS.with(|r| r.borrow_mut().clear());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::NumberValue;
    use crate::event::types::{NODE_ON_CLICK, NODE_TEXT_INPUT_ON_CHANGE, NODE_TOUCH_EVENT};
    use crate::event::input::{PointerInfo, TouchAction};
    use crate::node::{create_builder_node, create_node, dispose_node};
    use crate::types::NodeType;
    use std::cell::Cell;

    fn setup() -> NodeHandle {
        crate::reset_all();
        create_node(NodeType::Button)
    }

    fn click() -> ComponentEventData {
        ComponentEventData::from_slice(&[NumberValue::f32(10.0), NumberValue::f32(20.0)])
    }

    #[test]
    fn test_per_node_then_global_order() {
        let node = setup();
        let order = Rc::new(RefCell::new(Vec::new()));

        register_node_event(node, NODE_ON_CLICK, 7, None).unwrap();
        let o = order.clone();
        register_node_event_receiver(move |e| o.borrow_mut().push(format!("global:{}", e.target_id)));
        let o = order.clone();
        add_node_event_receiver(node, move |_| o.borrow_mut().push("first".into())).unwrap();
        let o = order.clone();
        add_node_event_receiver(node, move |_| o.borrow_mut().push("second".into())).unwrap();

        assert_eq!(dispatch_component_event(node, NODE_ON_CLICK, &click()), Ok(3));
        assert_eq!(*order.borrow(), vec!["first", "second", "global:7"]);
    }

    #[test]
    fn test_unregistered_kind_not_delivered() {
        let node = setup();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        add_node_event_receiver(node, move |_| c.set(c.get() + 1)).unwrap();

        assert_eq!(dispatch_component_event(node, NODE_ON_CLICK, &click()), Ok(0));
        assert_eq!(count.get(), 0);

        register_node_event(node, NODE_ON_CLICK, 0, None).unwrap();
        dispatch_component_event(node, NODE_ON_CLICK, &click()).unwrap();
        assert_eq!(count.get(), 1);

        unregister_node_event(node, NODE_ON_CLICK).unwrap();
        dispatch_component_event(node, NODE_ON_CLICK, &click()).unwrap();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_reregister_replaces_target() {
        let node = setup();
        let seen = Rc::new(Cell::new(0));
        let s = seen.clone();
        register_node_event_receiver(move |e| s.set(e.target_id));

        register_node_event(node, NODE_ON_CLICK, 1, None).unwrap();
        register_node_event(node, NODE_ON_CLICK, 2, Some(ExternalRef(5))).unwrap();
        assert_eq!(dispatch_component_event(node, NODE_ON_CLICK, &click()), Ok(1));
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn test_global_last_write_wins() {
        let node = setup();
        register_node_event(node, NODE_ON_CLICK, 0, None).unwrap();
        let hits = Rc::new(Cell::new((0, 0)));

        let h = hits.clone();
        register_node_event_receiver(move |_| h.set((h.get().0 + 1, h.get().1)));
        let h = hits.clone();
        register_node_event_receiver(move |_| h.set((h.get().0, h.get().1 + 1)));
        dispatch_component_event(node, NODE_ON_CLICK, &click()).unwrap();
        assert_eq!(hits.get(), (0, 1));

        unregister_node_event_receiver();
        assert_eq!(dispatch_component_event(node, NODE_ON_CLICK, &click()), Ok(0));
    }

    #[test]
    fn test_remove_receiver() {
        let node = setup();
        register_node_event(node, NODE_ON_CLICK, 0, None).unwrap();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let id = add_node_event_receiver(node, move |_| c.set(c.get() + 1)).unwrap();

        remove_node_event_receiver(node, id).unwrap();
        assert!(matches!(remove_node_event_receiver(node, id), Err(Error::ParamInvalid(_))));
        dispatch_component_event(node, NODE_ON_CLICK, &click()).unwrap();
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_unsupported_and_builder() {
        let node = setup();
        assert_eq!(
            register_node_event(node, NODE_TEXT_INPUT_ON_CHANGE, 0, None),
            Err(Error::NotSupported {
                tag: NODE_TEXT_INPUT_ON_CHANGE.raw(),
                node_type: NodeType::Button
            })
        );

        let frozen = create_builder_node(NodeType::Button);
        assert_eq!(register_node_event(frozen, NODE_ON_CLICK, 0, None), Err(Error::BuilderNode));
        assert!(matches!(add_node_event_receiver(frozen, |_| {}), Err(Error::BuilderNode)));
    }

    #[test]
    fn test_payload_kind_checked() {
        let node = setup();
        register_node_event(node, NODE_TOUCH_EVENT, 0, None).unwrap();
        assert!(matches!(
            dispatch_string_event(node, NODE_TOUCH_EVENT, "x"),
            Err(Error::ParamInvalid(_))
        ));

        let touch = UiInputEvent::touch(0, TouchAction::Down, vec![PointerInfo::at(0, 1.0, 1.0)]);
        let x = Rc::new(Cell::new(0.0));
        let xc = x.clone();
        add_node_event_receiver(node, move |e| {
            xc.set(e.input().map_or(-1.0, |i| crate::event::input::get_x(i, 0)));
        })
        .unwrap();
        dispatch_input_event(node, NODE_TOUCH_EVENT, &touch).unwrap();
        assert_eq!(x.get(), 1.0);
    }

    #[test]
    fn test_receiver_may_reenter() {
        let node = setup();
        let other = create_node(NodeType::Button);
        register_node_event(node, NODE_ON_CLICK, 0, None).unwrap();
        register_node_event(other, NODE_ON_CLICK, 0, None).unwrap();

        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        add_node_event_receiver(other, move |_| c.set(c.get() + 1)).unwrap();
        add_node_event_receiver(node, move |_| {
            dispatch_component_event(other, NODE_ON_CLICK, &click()).unwrap();
        })
        .unwrap();

        dispatch_component_event(node, NODE_ON_CLICK, &click()).unwrap();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_dispose_drops_registrations() {
        let node = setup();
        register_node_event(node, NODE_ON_CLICK, 0, None).unwrap();
        add_node_event_receiver(node, |_| {}).unwrap();
        dispose_node(node).unwrap();
        assert!(!is_node_event_registered(node, NODE_ON_CLICK));
        assert!(matches!(
            dispatch_component_event(node, NODE_ON_CLICK, &click()),
            Err(Error::StaleHandle(_))
        ));
    }
}
