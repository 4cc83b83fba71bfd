//! Versioned function table.
//!
//! Hosts that look operations up by name get a struct of plain function
//! pointers instead of the Rust API. Entries take raw integers for node
//! types, tags and event kinds, and report failures as integer codes
//! ([`ErrorCode`](crate::ErrorCode)) or `None`.

use crate::attribute::{self, AttributeItem, AttributeTag};
use crate::error::{self, Error, to_code};
use crate::event::{self, NodeEvent, NodeEventType};
use crate::layout;
use crate::node;
use crate::types::{DirtyFlags, ExternalRef, IntOffset, IntSize, LayoutConstraint, LengthUnit, NodeHandle, NodeType};

/// Module families that can be queried. Only node tables are served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
    Node,
}

pub const NODE_API_1_NAME: &str = "ArkUI_NativeNodeAPI_1";

/// Node operations, version 1.
#[derive(Debug, Clone, Copy)]
pub struct NativeNodeApi1 {
    pub version: i32,
    pub create_node: fn(i32) -> Option<NodeHandle>,
    pub dispose_node: fn(NodeHandle),
    pub add_child: fn(NodeHandle, NodeHandle) -> i32,
    pub remove_child: fn(NodeHandle, NodeHandle) -> i32,
    pub insert_child_after: fn(NodeHandle, NodeHandle, Option<NodeHandle>) -> i32,
    pub insert_child_before: fn(NodeHandle, NodeHandle, Option<NodeHandle>) -> i32,
    pub insert_child_at: fn(NodeHandle, NodeHandle, i32) -> i32,
    pub remove_all_children: fn(NodeHandle) -> i32,
    pub set_attribute: fn(NodeHandle, i32, &AttributeItem) -> i32,
    pub get_attribute: fn(NodeHandle, i32) -> Option<AttributeItem>,
    pub reset_attribute: fn(NodeHandle, i32) -> i32,
    pub register_node_event: fn(NodeHandle, i32, i32, Option<ExternalRef>) -> i32,
    pub unregister_node_event: fn(NodeHandle, i32),
    pub register_node_event_receiver: fn(fn(&NodeEvent<'_>)),
    pub unregister_node_event_receiver: fn(),
    pub mark_dirty: fn(NodeHandle, u32),
    pub get_total_child_count: fn(NodeHandle) -> u32,
    pub get_child_at: fn(NodeHandle, i32) -> Option<NodeHandle>,
    pub get_first_child: fn(NodeHandle) -> Option<NodeHandle>,
    pub get_last_child: fn(NodeHandle) -> Option<NodeHandle>,
    pub get_previous_sibling: fn(NodeHandle) -> Option<NodeHandle>,
    pub get_next_sibling: fn(NodeHandle) -> Option<NodeHandle>,
    pub get_parent: fn(NodeHandle) -> Option<NodeHandle>,
    pub set_user_data: fn(NodeHandle, Option<ExternalRef>) -> i32,
    pub get_user_data: fn(NodeHandle) -> Option<ExternalRef>,
    pub set_length_metric_unit: fn(NodeHandle, i32) -> i32,
    pub measure_node: fn(NodeHandle, &LayoutConstraint) -> i32,
    pub layout_node: fn(NodeHandle, i32, i32) -> i32,
    pub get_measured_size: fn(NodeHandle) -> IntSize,
    pub get_layout_position: fn(NodeHandle) -> IntOffset,
}

// =============================================================================
// Entries
// =============================================================================

fn create_node(raw: i32) -> Option<NodeHandle> {
    match NodeType::from_raw(raw) {
        Some(node_type) => Some(node::create_node(node_type)),
        None => {
            log::warn!("create_node: unknown node type {raw}");
            None
        }
    }
}

fn dispose_node(n: NodeHandle) {
    if let Err(e) = node::dispose_node(n) {
        log::warn!("dispose_node({n}): {e}");
    }
}

fn add_child(p: NodeHandle, c: NodeHandle) -> i32 {
    to_code(node::add_child(p, c))
}

fn remove_child(p: NodeHandle, c: NodeHandle) -> i32 {
    to_code(node::remove_child(p, c))
}

fn insert_child_after(p: NodeHandle, c: NodeHandle, s: Option<NodeHandle>) -> i32 {
    to_code(node::insert_child_after(p, c, s))
}

fn insert_child_before(p: NodeHandle, c: NodeHandle, s: Option<NodeHandle>) -> i32 {
    to_code(node::insert_child_before(p, c, s))
}

fn insert_child_at(p: NodeHandle, c: NodeHandle, i: i32) -> i32 {
    to_code(node::insert_child_at(p, c, i))
}

fn remove_all_children(p: NodeHandle) -> i32 {
    to_code(node::remove_all_children(p))
}

fn set_attribute(n: NodeHandle, tag: i32, item: &AttributeItem) -> i32 {
    to_code(attribute::set_attribute(n, AttributeTag(tag), item))
}

fn get_attribute(n: NodeHandle, tag: i32) -> Option<AttributeItem> {
    attribute::get_attribute(n, AttributeTag(tag))
}

fn reset_attribute(n: NodeHandle, tag: i32) -> i32 {
    to_code(attribute::reset_attribute(n, AttributeTag(tag)))
}

fn register_node_event(n: NodeHandle, kind: i32, target_id: i32, user_data: Option<ExternalRef>) -> i32 {
    to_code(event::register_node_event(n, NodeEventType(kind), target_id, user_data))
}

fn unregister_node_event(n: NodeHandle, kind: i32) {
    let _ = event::unregister_node_event(n, NodeEventType(kind));
}

fn register_node_event_receiver(receiver: fn(&NodeEvent<'_>)) {
    event::register_node_event_receiver(receiver);
}

fn mark_dirty(n: NodeHandle, flags: u32) {
    let _ = layout::mark_dirty(n, DirtyFlags::from_bits_truncate(flags));
}

fn set_user_data(n: NodeHandle, data: Option<ExternalRef>) -> i32 {
    to_code(node::set_user_data(n, data))
}

fn get_user_data(n: NodeHandle) -> Option<ExternalRef> {
    node::get_user_data(n).ok().flatten()
}

fn set_length_metric_unit(n: NodeHandle, raw: i32) -> i32 {
    let result = LengthUnit::from_raw(raw)
        .ok_or_else(|| Error::param(format!("unknown length unit {raw}")))
        .and_then(|unit| node::set_length_metric_unit(n, unit));
    to_code(result)
}

fn measure_node(n: NodeHandle, constraint: &LayoutConstraint) -> i32 {
    to_code(layout::measure_node(n, constraint))
}

fn layout_node(n: NodeHandle, x: i32, y: i32) -> i32 {
    to_code(layout::layout_node(n, x, y))
}

fn get_measured_size(n: NodeHandle) -> IntSize {
    error::report(layout::get_measured_size(n), IntSize::default())
}

fn get_layout_position(n: NodeHandle) -> IntOffset {
    error::report(layout::get_layout_position(n), IntOffset::default())
}

static NODE_API_1: NativeNodeApi1 = NativeNodeApi1 {
    version: 1,
    create_node,
    dispose_node,
    add_child,
    remove_child,
    insert_child_after,
    insert_child_before,
    insert_child_at,
    remove_all_children,
    set_attribute,
    get_attribute,
    reset_attribute,
    register_node_event,
    unregister_node_event,
    register_node_event_receiver,
    unregister_node_event_receiver: event::unregister_node_event_receiver,
    mark_dirty,
    get_total_child_count: node::get_total_child_count,
    get_child_at: node::get_child_at,
    get_first_child: node::get_first_child,
    get_last_child: node::get_last_child,
    get_previous_sibling: node::get_previous_sibling,
    get_next_sibling: node::get_next_sibling,
    get_parent: node::get_parent,
    set_user_data,
    get_user_data,
    set_length_metric_unit,
    measure_node,
    layout_node,
    get_measured_size,
    get_layout_position,
};

/// Look up a function table by module kind and versioned name.
pub fn query_module_interface_by_name(kind: ModuleKind, name: &str) -> Option<&'static NativeNodeApi1> {
    match (kind, name) {
        (ModuleKind::Node, NODE_API_1_NAME) => Some(&NODE_API_1),
        _ => {
            log::debug!("no {kind:?} interface named {name:?}");
            None
        }
    }
}
