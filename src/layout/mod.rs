//! Layout pass-through.
//!
//! Measure and layout requests for a node subtree. Ordinary subtrees are
//! measured with [Taffy](https://github.com/DioxusLabs/taffy) from their
//! layout attributes; CUSTOM nodes with registered measure/layout custom
//! events hand the work to their receivers, which report back through
//! [`set_measured_size`] and [`set_layout_position`].
//!
//! # Dirty flags
//!
//! Attribute writes and tree edits raise [`DirtyFlags`] on the node. Measure
//! and layout flags also propagate to every ancestor, since a child's size
//! change can move its siblings. Render flags stay local.
//!
//! # Example
//!
//! ```ignore
//! use spark_node::layout;
//! use spark_node::LayoutConstraint;
//!
//! let size = layout::measure_node(root, &LayoutConstraint::loose(720.0, 1280.0))?;
//! layout::layout_node(root, 0, 0)?;
//! ```

mod taffy_bridge;

use crate::error::{Error, Result};
use crate::event::{CustomEventFlags, CustomPayload, dispatch_custom_event, is_custom_event_registered};
use crate::node::{with_node, with_node_mut};
use crate::types::{DirtyFlags, IntOffset, IntSize, LayoutConstraint, NodeHandle, NodeType};

// =============================================================================
// Passes
// =============================================================================

/// Measure `node` under `constraint` and return its size (px).
///
/// A CUSTOM node with a registered measure event is measured by its
/// receivers; anything else is measured with its subtree by the flex engine.
pub fn measure_node(node: NodeHandle, constraint: &LayoutConstraint) -> Result<IntSize> {
    if constraint.min_width > constraint.max_width || constraint.min_height > constraint.max_height {
        return Err(Error::param(format!("inverted constraint {constraint:?}")));
    }
    let node_type = with_node(node, |e| e.node_type)?;

    if node_type == NodeType::Custom && is_custom_event_registered(node, CustomEventFlags::MEASURE) {
        dispatch_custom_event(node, CustomEventFlags::MEASURE, &CustomPayload::Measure(*constraint))?;
        return with_node_mut(node, |e| {
            e.dirty.remove(DirtyFlags::NEED_MEASURE);
            e.dirty.insert(DirtyFlags::NEED_LAYOUT);
            e.measured
        });
    }

    taffy_bridge::measure_subtree(node, constraint)
}

/// Place `node` at `(x, y)` relative to its parent.
///
/// A CUSTOM node with a registered layout event receives it so it can place
/// its own children.
pub fn layout_node(node: NodeHandle, x: i32, y: i32) -> Result<()> {
    let node_type = with_node_mut(node, |e| {
        e.position = IntOffset { x, y };
        e.node_type
    })?;

    if node_type == NodeType::Custom && is_custom_event_registered(node, CustomEventFlags::LAYOUT) {
        dispatch_custom_event(node, CustomEventFlags::LAYOUT, &CustomPayload::Layout { x, y })?;
    }

    with_node_mut(node, |e| {
        e.dirty.remove(DirtyFlags::NEED_LAYOUT);
        e.dirty.insert(DirtyFlags::NEED_RENDER);
    })
}

// =============================================================================
// Results
// =============================================================================

/// Record a measured size; used by measure receivers of CUSTOM nodes.
pub fn set_measured_size(node: NodeHandle, width: i32, height: i32) -> Result<()> {
    if width < 0 || height < 0 {
        return Err(Error::param(format!("negative size {width}x{height}")));
    }
    with_node_mut(node, |e| e.measured = IntSize { width, height })
}

pub fn get_measured_size(node: NodeHandle) -> Result<IntSize> {
    with_node(node, |e| e.measured)
}

/// Record a position relative to the parent; used by layout receivers.
pub fn set_layout_position(node: NodeHandle, x: i32, y: i32) -> Result<()> {
    with_node_mut(node, |e| e.position = IntOffset { x, y })
}

pub fn get_layout_position(node: NodeHandle) -> Result<IntOffset> {
    with_node(node, |e| e.position)
}

// =============================================================================
// Dirty Flags
// =============================================================================

/// Request another pass for `node`.
pub fn mark_dirty(node: NodeHandle, flags: DirtyFlags) -> Result<()> {
    with_node(node, |_| ())?;
    propagate_dirty(node, flags);
    Ok(())
}

pub fn get_dirty_flags(node: NodeHandle) -> Result<DirtyFlags> {
    with_node(node, |e| e.dirty)
}

/// Raise `flags` on `node`; measure/layout flags climb to the root.
///
/// Stale handles are ignored.
pub(crate) fn propagate_dirty(node: NodeHandle, flags: DirtyFlags) {
    if flags.is_empty() {
        return;
    }
    let Ok(mut parent) = with_node_mut(node, |e| {
        e.dirty |= flags;
        e.parent
    }) else {
        return;
    };

    let climbing = flags & (DirtyFlags::NEED_MEASURE | DirtyFlags::NEED_LAYOUT);
    if climbing.is_empty() {
        return;
    }
    while let Some(p) = parent {
        parent = with_node_mut(p, |e| {
            e.dirty |= climbing;
            e.parent
        })
        .ok()
        .flatten();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::{AttributeItem, set_attribute, tag};
    use crate::event::{add_node_custom_event_receiver, register_node_custom_event};
    use crate::node::{add_child, create_node};
    use std::cell::Cell;
    use std::rc::Rc;

    fn setup() {
        crate::reset_all();
    }

    fn clean(node: NodeHandle) {
        with_node_mut(node, |e| e.dirty = DirtyFlags::empty()).unwrap();
    }

    #[test]
    fn test_attribute_write_dirties_ancestors() {
        setup();
        let root = create_node(NodeType::Column);
        let mid = create_node(NodeType::Row);
        let leaf = create_node(NodeType::Stack);
        add_child(root, mid).unwrap();
        add_child(mid, leaf).unwrap();
        for n in [root, mid, leaf] {
            clean(n);
        }

        set_attribute(leaf, tag::NODE_OPACITY, &AttributeItem::f32s(&[0.5])).unwrap();
        assert_eq!(get_dirty_flags(leaf), Ok(DirtyFlags::NEED_RENDER));
        assert_eq!(get_dirty_flags(root), Ok(DirtyFlags::empty()));

        set_attribute(leaf, tag::NODE_WIDTH, &AttributeItem::f32s(&[10.0])).unwrap();
        assert!(get_dirty_flags(root).unwrap().contains(DirtyFlags::NEED_MEASURE));
        assert!(get_dirty_flags(mid).unwrap().contains(DirtyFlags::NEED_MEASURE));
    }

    #[test]
    fn test_measure_then_layout_clears_flags() {
        setup();
        let node = create_node(NodeType::Stack);
        set_attribute(node, tag::NODE_WIDTH, &AttributeItem::f32s(&[30.0])).unwrap();
        set_attribute(node, tag::NODE_HEIGHT, &AttributeItem::f32s(&[40.0])).unwrap();

        let size = measure_node(node, &LayoutConstraint::loose(100.0, 100.0)).unwrap();
        assert_eq!(size, IntSize { width: 30, height: 40 });
        assert!(!get_dirty_flags(node).unwrap().contains(DirtyFlags::NEED_MEASURE));

        layout_node(node, 5, 6).unwrap();
        assert_eq!(get_layout_position(node), Ok(IntOffset { x: 5, y: 6 }));
        assert!(!get_dirty_flags(node).unwrap().contains(DirtyFlags::NEED_LAYOUT));
    }

    #[test]
    fn test_custom_node_delegates_to_receivers() {
        setup();
        let custom = create_node(NodeType::Custom);
        register_node_custom_event(custom, CustomEventFlags::LAYOUT_PASS, 7, None).unwrap();

        let laid_out = Rc::new(Cell::new(None));
        let l = laid_out.clone();
        add_node_custom_event_receiver(custom, move |e| match *e.payload {
            CustomPayload::Measure(c) => {
                set_measured_size(e.node, (c.max_width / 2.0) as i32, 24).unwrap();
            }
            CustomPayload::Layout { x, y } => l.set(Some((x, y))),
            CustomPayload::Draw { .. } => {}
        })
        .unwrap();

        let size = measure_node(custom, &LayoutConstraint::loose(200.0, 100.0)).unwrap();
        assert_eq!(size, IntSize { width: 100, height: 24 });
        layout_node(custom, 3, 4).unwrap();
        assert_eq!(laid_out.get(), Some((3, 4)));
    }

    #[test]
    fn test_custom_child_inside_flex_subtree() {
        setup();
        let column = create_node(NodeType::Column);
        let custom = create_node(NodeType::Custom);
        register_node_custom_event(custom, CustomEventFlags::MEASURE, 1, None).unwrap();
        add_node_custom_event_receiver(custom, |e| {
            set_measured_size(e.node, 40, 15).unwrap();
        })
        .unwrap();
        add_child(column, custom).unwrap();

        let size = measure_node(column, &LayoutConstraint::loose(200.0, 200.0)).unwrap();
        assert_eq!(size.height, 15);
        assert_eq!(get_measured_size(custom).unwrap().width, 40);
    }

    #[test]
    fn test_invalid_inputs() {
        setup();
        let node = create_node(NodeType::Stack);
        let inverted = LayoutConstraint { min_width: 10.0, ..LayoutConstraint::loose(5.0, 5.0) };
        assert!(measure_node(node, &inverted).is_err());
        assert!(set_measured_size(node, -1, 0).is_err());
    }
}
