//! Custom events - measure, layout and draw callbacks for native-drawn nodes.
//!
//! Same two-path receiver model as node events. Measure and layout events
//! are only accepted on `NodeType::Custom` nodes; draw events on any node.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::node::with_node;
use crate::types::{ExternalRef, LayoutConstraint, NodeHandle, NodeType};

use super::receivers::{ReceiverId, ReceiverTable, Registration};

bitflags::bitflags! {
    /// Custom event kinds. Registration takes a set; each event carries one.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CustomEventFlags: u32 {
        const MEASURE = 1;
        const LAYOUT = 1 << 1;
        const DRAW = 1 << 2;
        const FOREGROUND_DRAW = 1 << 3;
        const OVERLAY_DRAW = 1 << 4;
    }
}

impl CustomEventFlags {
    /// Kinds only CUSTOM nodes may register.
    pub const LAYOUT_PASS: Self = Self::MEASURE.union(Self::LAYOUT);
}

/// Payload of one custom event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CustomPayload {
    /// Receiver is expected to call `set_measured_size`.
    Measure(LayoutConstraint),
    /// Position assigned by the parent; receiver lays out its children.
    Layout { x: i32, y: i32 },
    /// Drawing surface owned by the renderer.
    Draw { canvas: ExternalRef, width: i32, height: i32 },
}

#[derive(Debug, Clone, Copy)]
pub struct CustomEvent<'a> {
    pub kind: CustomEventFlags,
    pub node: NodeHandle,
    pub target_id: i32,
    pub user_data: Option<ExternalRef>,
    pub payload: &'a CustomPayload,
}

pub type CustomEventReceiver = dyn Fn(&CustomEvent<'_>);

thread_local! {
    static CUSTOM_RECEIVERS: RefCell<ReceiverTable<CustomEventFlags, CustomEventReceiver>> =
        RefCell::new(ReceiverTable::new());
}

fn check_node(node: NodeHandle, kinds: CustomEventFlags) -> Result<()> {
    let (node_type, builder) = with_node(node, |e| (e.node_type, e.builder))?;
    if builder {
        return Err(Error::BuilderNode);
    }
    if node_type != NodeType::Custom && kinds.intersects(CustomEventFlags::LAYOUT_PASS) {
        return Err(Error::NotSupported {
            tag: kinds.bits() as i32,
            node_type,
        });
    }
    Ok(())
}

/// Register each kind in `kinds` on `node`.
pub fn register_node_custom_event(
    node: NodeHandle,
    kinds: CustomEventFlags,
    target_id: i32,
    user_data: Option<ExternalRef>,
) -> Result<()> {
    if kinds.is_empty() {
        return Err(Error::param("no custom event kind given"));
    }
    check_node(node, kinds)?;
    CUSTOM_RECEIVERS.with(|r| {
        let mut r = r.borrow_mut();
        for kind in kinds.iter() {
            r.register(node, kind, Registration { target_id, user_data });
        }
    });
    log::debug!("registered custom {kinds:?} on {node}");
    Ok(())
}

pub fn unregister_node_custom_event(node: NodeHandle, kinds: CustomEventFlags) -> Result<()> {
    check_node(node, CustomEventFlags::empty())?;
    CUSTOM_RECEIVERS.with(|r| {
        let mut r = r.borrow_mut();
        for kind in kinds.iter() {
            r.unregister(node, kind);
        }
    });
    Ok(())
}

pub fn add_node_custom_event_receiver<F>(node: NodeHandle, receiver: F) -> Result<ReceiverId>
where
    F: Fn(&CustomEvent<'_>) + 'static,
{
    check_node(node, CustomEventFlags::empty())?;
    Ok(CUSTOM_RECEIVERS.with(|r| r.borrow_mut().add_receiver(node, Rc::new(receiver))))
}

pub fn remove_node_custom_event_receiver(node: NodeHandle, id: ReceiverId) -> Result<()> {
    check_node(node, CustomEventFlags::empty())?;
    if CUSTOM_RECEIVERS.with(|r| r.borrow_mut().remove_receiver(node, id)) {
        Ok(())
    } else {
        Err(Error::param(format!("{id:?} is not registered on {node}")))
    }
}

/// Install the single global custom event receiver.
pub fn register_node_custom_event_receiver<F>(receiver: F)
where
    F: Fn(&CustomEvent<'_>) + 'static,
{
    CUSTOM_RECEIVERS.with(|r| r.borrow_mut().set_global(Some(Rc::new(receiver))));
}

pub fn unregister_node_custom_event_receiver() {
    CUSTOM_RECEIVERS.with(|r| r.borrow_mut().set_global(None));
}

pub fn is_custom_event_registered(node: NodeHandle, kind: CustomEventFlags) -> bool {
    CUSTOM_RECEIVERS.with(|r| r.borrow().is_registered(node, kind))
}

/// Fire one custom event. Returns how many receivers ran (0 if unregistered).
pub fn dispatch_custom_event(
    node: NodeHandle,
    kind: CustomEventFlags,
    payload: &CustomPayload,
) -> Result<usize> {
    if kind.bits().count_ones() != 1 {
        return Err(Error::param(format!("dispatch needs exactly one kind, got {kind:?}")));
    }
    with_node(node, |_| ())?;

    let Some(targets) = CUSTOM_RECEIVERS.with(|r| r.borrow().targets(node, kind)) else {
        return Ok(0);
    };
    let event = CustomEvent {
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
    log::trace!("custom {kind:?} on {node} delivered to {delivered} receiver(s)");
    Ok(delivered)
}

pub(crate) fn forget_node(node: NodeHandle) {
    CUSTOM_RECEIVERS.with(|r| r.borrow_mut().forget_node(node));
}

/// Reset all custom event state (for testing).
pub fn reset_custom_events() {
    CUSTOM_RECEIVERS.with(|r| r.borrow_mut().clear());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{create_builder_node, create_node};
    use std::cell::Cell;

    #[test]
    fn test_builder_nodes_refuse_every_custom_event_call() {
        crate::reset_all();
        let node = create_builder_node(NodeType::Custom);

        assert_eq!(
            register_node_custom_event(node, CustomEventFlags::DRAW, 1, None),
            Err(Error::BuilderNode)
        );
        assert_eq!(
            unregister_node_custom_event(node, CustomEventFlags::DRAW),
            Err(Error::BuilderNode)
        );
        assert_eq!(add_node_custom_event_receiver(node, |_| {}).err(), Some(Error::BuilderNode));
        assert_eq!(
            remove_node_custom_event_receiver(node, ReceiverId(0)),
            Err(Error::BuilderNode)
        );
    }

    #[test]
    fn test_layout_pass_only_on_custom_nodes() {
        crate::reset_all();
        let custom = create_node(NodeType::Custom);
        let text = create_node(NodeType::Text);

        register_node_custom_event(custom, CustomEventFlags::LAYOUT_PASS, 1, None).unwrap();
        assert!(matches!(
            register_node_custom_event(text, CustomEventFlags::MEASURE, 1, None),
            Err(Error::NotSupported { .. })
        ));
        register_node_custom_event(text, CustomEventFlags::DRAW, 1, None).unwrap();

        assert!(is_custom_event_registered(custom, CustomEventFlags::MEASURE));
        assert!(is_custom_event_registered(custom, CustomEventFlags::LAYOUT));
        assert!(!is_custom_event_registered(custom, CustomEventFlags::DRAW));
    }

    #[test]
    fn test_dispatch_draw() {
        crate::reset_all();
        let node = create_node(NodeType::Stack);
        register_node_custom_event(node, CustomEventFlags::DRAW, 3, None).unwrap();

        let seen = Rc::new(Cell::new(0));
        let s = seen.clone();
        add_node_custom_event_receiver(node, move |e| {
            if let CustomPayload::Draw { width, .. } = e.payload {
                s.set(*width + e.target_id);
            }
        })
        .unwrap();

        let payload = CustomPayload::Draw { canvas: ExternalRef(1), width: 40, height: 10 };
        assert_eq!(dispatch_custom_event(node, CustomEventFlags::DRAW, &payload), Ok(1));
        assert_eq!(seen.get(), 43);

        assert!(dispatch_custom_event(node, CustomEventFlags::DRAW | CustomEventFlags::MEASURE, &payload).is_err());
        assert_eq!(dispatch_custom_event(node, CustomEventFlags::OVERLAY_DRAW, &payload), Ok(0));
    }
}
