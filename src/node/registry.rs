//! Node Registry - Generational arena of node slots.
//!
//! Manages the lifecycle of nodes:
//! - Slot allocation with a free pool for O(1) reuse
//! - Generation bump on dispose so stale handles are rejected
//! - Per-node attribute storage, user data and dirty flags
//! - Destroy callbacks run on dispose

use std::cell::RefCell;
use std::collections::HashMap;

use crate::attribute::{AttributeItem, AttributeTag};
use crate::error::{Error, Result};
use crate::types::{
    DirtyFlags, ExternalRef, IntOffset, IntSize, LengthUnit, NodeAdapterHandle, NodeHandle,
    NodeType,
};

// =============================================================================
// Node Entry
// =============================================================================

/// Everything the facade knows about one live node.
#[derive(Debug)]
pub(crate) struct NodeEntry {
    pub node_type: NodeType,
    /// Produced by the declarative frontend; read-only here.
    pub builder: bool,
    pub parent: Option<NodeHandle>,
    pub children: Vec<NodeHandle>,
    pub attributes: HashMap<AttributeTag, AttributeItem>,
    pub user_data: Option<ExternalRef>,
    pub length_unit: LengthUnit,
    pub dirty: DirtyFlags,
    pub measured: IntSize,
    pub position: IntOffset,
    pub hosted_adapter: Option<NodeAdapterHandle>,
}

impl NodeEntry {
    fn new(node_type: NodeType, builder: bool) -> Self {
        Self {
            node_type,
            builder,
            parent: None,
            children: Vec::new(),
            attributes: HashMap::new(),
            user_data: None,
            length_unit: LengthUnit::Default,
            dirty: DirtyFlags::NEED_MEASURE | DirtyFlags::NEED_LAYOUT | DirtyFlags::NEED_RENDER,
            measured: IntSize::default(),
            position: IntOffset::default(),
            hosted_adapter: None,
        }
    }
}

struct Slot {
    generation: u32,
    entry: Option<NodeEntry>,
}

// =============================================================================
// Registry State
// =============================================================================

thread_local! {
    /// Node slots, indexed by `NodeHandle::index`.
    static SLOTS: RefCell<Vec<Slot>> = const { RefCell::new(Vec::new()) };

    /// Pool of freed slot indices for reuse.
    static FREE_SLOTS: RefCell<Vec<u32>> = const { RefCell::new(Vec::new()) };

    /// Destroy callbacks registered per slot index.
    static DESTROY_CALLBACKS: RefCell<HashMap<u32, Vec<Box<dyn FnOnce(NodeHandle)>>>> =
        RefCell::new(HashMap::new());
}

// =============================================================================
// Slot Access
// =============================================================================

/// Run `f` against a live node. Stale or unknown handles are rejected.
pub(crate) fn with_node<R>(node: NodeHandle, f: impl FnOnce(&NodeEntry) -> R) -> Result<R> {
    SLOTS.with(|slots| {
        let slots = slots.borrow();
        match slots.get(node.index as usize) {
            Some(Slot { generation, entry: Some(entry) }) if *generation == node.generation => {
                Ok(f(entry))
            }
            _ => Err(Error::StaleHandle(node.to_string())),
        }
    })
}

/// Run `f` against a live node mutably.
pub(crate) fn with_node_mut<R>(node: NodeHandle, f: impl FnOnce(&mut NodeEntry) -> R) -> Result<R> {
    SLOTS.with(|slots| {
        let mut slots = slots.borrow_mut();
        match slots.get_mut(node.index as usize) {
            Some(Slot { generation, entry: Some(entry) }) if *generation == node.generation => {
                Ok(f(entry))
            }
            _ => Err(Error::StaleHandle(node.to_string())),
        }
    })
}

/// Run `f` against a live node that this API may mutate.
///
/// Generated nodes are rejected with [`Error::BuilderNode`].
pub(crate) fn with_mutable_node<R>(
    node: NodeHandle,
    f: impl FnOnce(&mut NodeEntry) -> R,
) -> Result<R> {
    with_node_mut(node, |entry| {
        if entry.builder {
            return Err(Error::BuilderNode);
        }
        Ok(f(entry))
    })?
}

/// Whether `node` refers to a live node.
pub fn is_alive(node: NodeHandle) -> bool {
    with_node(node, |_| ()).is_ok()
}

// =============================================================================
// Creation / Disposal
// =============================================================================

fn allocate(node_type: NodeType, builder: bool) -> NodeHandle {
    let reused = FREE_SLOTS.with(|free| free.borrow_mut().pop());

    let handle = SLOTS.with(|slots| {
        let mut slots = slots.borrow_mut();
        match reused {
            Some(index) => {
                let slot = &mut slots[index as usize];
                slot.entry = Some(NodeEntry::new(node_type, builder));
                NodeHandle::new(index, slot.generation)
            }
            None => {
                let index = slots.len() as u32;
                slots.push(Slot {
                    generation: 0,
                    entry: Some(NodeEntry::new(node_type, builder)),
                });
                NodeHandle::new(index, 0)
            }
        }
    });

    log::debug!("created {node_type:?} node {handle}{}", if builder { " (builder)" } else { "" });
    handle
}

/// Create a node of the given type with an empty attribute map.
pub fn create_node(node_type: NodeType) -> NodeHandle {
    allocate(node_type, false)
}

/// Create a node owned by the declarative frontend.
///
/// Structural and attribute mutation through this API is refused for such
/// nodes; reads still work.
pub fn create_builder_node(node_type: NodeType) -> NodeHandle {
    allocate(node_type, true)
}

/// Release a node.
///
/// The node is detached from its parent, its children are orphaned (not
/// disposed), an adapter it hosts is unbound, and its event, custom event,
/// and gesture registrations are dropped. Destroy callbacks run first,
/// while the node is still readable.
pub fn dispose_node(node: NodeHandle) -> Result<()> {
    with_node(node, |_| ())?;

    let callbacks = DESTROY_CALLBACKS.with(|cbs| cbs.borrow_mut().remove(&node.index));
    if let Some(callbacks) = callbacks {
        for cb in callbacks {
            cb(node);
        }
    }

    // A callback may have disposed the node already, or edited the tree.
    let Ok((parent, children, adapter)) =
        with_node(node, |e| (e.parent, e.children.clone(), e.hosted_adapter))
    else {
        return Ok(());
    };
    if parent.is_some() {
        log::warn!("disposing {node} while still attached; detaching");
    }

    if let Some(adapter) = adapter {
        crate::adapter::host_disposed(adapter, node);
    }
    crate::event::forget_node(node);
    crate::gesture::forget_node(node);

    if let Some(parent) = parent {
        // Parent may already be gone when a subtree is torn down bottom-up.
        let _ = with_node_mut(parent, |p| p.children.retain(|c| *c != node));
        crate::layout::propagate_dirty(parent, DirtyFlags::NEED_MEASURE);
    }
    for child in children {
        let _ = with_node_mut(child, |c| c.parent = None);
    }

    SLOTS.with(|slots| {
        let mut slots = slots.borrow_mut();
        let slot = &mut slots[node.index as usize];
        slot.entry = None;
        slot.generation = slot.generation.wrapping_add(1);
    });
    FREE_SLOTS.with(|free| free.borrow_mut().push(node.index));

    log::debug!("disposed node {node}");
    Ok(())
}

/// Run `callback` when `node` is disposed. Callbacks run in registration order.
pub fn on_node_destroy(node: NodeHandle, callback: impl FnOnce(NodeHandle) + 'static) -> Result<()> {
    with_node(node, |_| ())?;
    DESTROY_CALLBACKS.with(|cbs| {
        cbs.borrow_mut()
            .entry(node.index)
            .or_default()
            .push(Box::new(callback));
    });
    Ok(())
}

// =============================================================================
// Accessors
// =============================================================================

/// Whether the node was produced by the declarative frontend.
pub fn is_builder_node(node: NodeHandle) -> Result<bool> {
    with_node(node, |e| e.builder)
}

pub fn node_type_of(node: NodeHandle) -> Result<NodeType> {
    with_node(node, |e| e.node_type)
}

/// Number of live nodes.
pub fn node_count() -> usize {
    SLOTS.with(|slots| slots.borrow().iter().filter(|s| s.entry.is_some()).count())
}

/// Attach caller-owned context to a node. Never interpreted or freed here.
///
/// Generated nodes are refused like every other setter.
pub fn set_user_data(node: NodeHandle, data: Option<ExternalRef>) -> Result<()> {
    with_mutable_node(node, |e| e.user_data = data)
}

pub fn get_user_data(node: NodeHandle) -> Result<Option<ExternalRef>> {
    with_node(node, |e| e.user_data)
}

/// Select the unit the node's length slots are expressed in.
pub fn set_length_metric_unit(node: NodeHandle, unit: LengthUnit) -> Result<()> {
    let changed = with_mutable_node(node, |e| std::mem::replace(&mut e.length_unit, unit) != unit)?;
    if changed {
        crate::layout::propagate_dirty(node, DirtyFlags::NEED_MEASURE);
    }
    Ok(())
}

pub fn get_length_metric_unit(node: NodeHandle) -> Result<LengthUnit> {
    with_node(node, |e| e.length_unit)
}

/// Reset all node state (for testing).
pub fn reset_nodes() {
    SLOTS.with(|slots| slots.borrow_mut().clear());
    FREE_SLOTS.with(|free| free.borrow_mut().clear());
    DESTROY_CALLBACKS.with(|cbs| cbs.borrow_mut().clear());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn setup() {
        crate::reset_all();
    }

    #[test]
    fn test_create_and_dispose() {
        setup();

        let a = create_node(NodeType::Button);
        let b = create_node(NodeType::Column);
        assert_eq!(node_count(), 2);
        assert_eq!(node_type_of(a), Ok(NodeType::Button));
        assert_eq!(is_builder_node(b), Ok(false));

        dispose_node(a).unwrap();
        assert_eq!(node_count(), 1);
        assert!(!is_alive(a));
        assert!(matches!(node_type_of(a), Err(Error::StaleHandle(_))));
    }

    #[test]
    fn test_slot_reuse_bumps_generation() {
        setup();

        let a = create_node(NodeType::Text);
        dispose_node(a).unwrap();
        let b = create_node(NodeType::Image);

        assert_eq!(a.index(), b.index());
        assert_ne!(a, b);
        assert!(is_alive(b));
        assert!(!is_alive(a));
        assert!(dispose_node(a).is_err());
    }

    #[test]
    fn test_builder_node_refuses_mutation() {
        setup();

        let node = create_builder_node(NodeType::Row);
        assert_eq!(is_builder_node(node), Ok(true));
        assert_eq!(
            set_length_metric_unit(node, LengthUnit::Px),
            Err(Error::BuilderNode)
        );
        assert_eq!(get_length_metric_unit(node), Ok(LengthUnit::Default));
        assert_eq!(set_user_data(node, Some(ExternalRef(1))), Err(Error::BuilderNode));
        assert_eq!(get_user_data(node), Ok(None));
    }

    #[test]
    fn test_user_data() {
        setup();

        let node = create_node(NodeType::Stack);
        assert_eq!(get_user_data(node), Ok(None));
        set_user_data(node, Some(ExternalRef(42))).unwrap();
        assert_eq!(get_user_data(node), Ok(Some(ExternalRef(42))));
    }

    #[test]
    fn test_destroy_callbacks_run_once() {
        setup();

        let node = create_node(NodeType::Custom);
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        on_node_destroy(node, move |n| {
            assert!(is_alive(n));
            count_clone.set(count_clone.get() + 1);
        })
        .unwrap();

        dispose_node(node).unwrap();
        assert_eq!(count.get(), 1);

        // Slot reused: old callbacks must not fire for the new node.
        let other = create_node(NodeType::Custom);
        dispose_node(other).unwrap();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_dispose_from_own_destroy_callback() {
        setup();

        let node = create_node(NodeType::Stack);
        on_node_destroy(node, |n| {
            dispose_node(n).unwrap();
        })
        .unwrap();
        dispose_node(node).unwrap();
        assert_eq!(node_count(), 0);

        // The slot is freed once, so two new nodes get distinct handles.
        let x = create_node(NodeType::Text);
        let y = create_node(NodeType::Button);
        assert_ne!(x, y);
        assert_eq!(node_type_of(x), Ok(NodeType::Text));
        assert_eq!(node_type_of(y), Ok(NodeType::Button));
        assert_eq!(node_count(), 2);
    }
}
