//! # spark-node
//!
//! Native node facade over an opaque UI node tree.
//!
//! Callers create nodes by type, link them into a tree, set and read their
//! properties through one untyped attribute payload, subscribe to events, and
//! bind lazy-loading adapters to list-like containers.
//!
//! ## Architecture
//!
//! Nodes are generational handles into a thread-local arena owned by the UI
//! thread. Every other area keys its own thread-local state by those
//! handles:
//!
//! ```text
//! node (registry + tree) ← attribute (shape table, codec)
//!                        ← event (node events, custom events, input)
//!                        ← adapter (index → stable key → node)
//!                        ← gesture, layout (Taffy)
//! ```
//!
//! Work from other threads enters through [`task::UiTaskHandle`].
//!
//! ## Modules
//!
//! - [`types`] - Node types, handles, geometry, dirty flags
//! - [`error`] - Error taxonomy and integer codes
//! - [`node`] - Node registry and tree manager
//! - [`attribute`] - Attribute items, shape table and codec
//! - [`event`] - Node, custom and input event dispatch
//! - [`adapter`] - Node adapter virtualization
//! - [`gesture`] - Gesture descriptors and node binding
//! - [`layout`] - Measure/layout pass-through
//! - [`task`] - UI task handoff
//! - [`api`] - Versioned function table

pub mod adapter;
pub mod api;
pub mod attribute;
pub mod config;
pub mod error;
pub mod event;
pub mod gesture;
pub mod layout;
pub mod node;
pub mod task;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use error::{Error, ErrorCode, Result, get_latest_status, to_code};

pub use config::{FacadeConfig, config, configure, convert_length_metrics_unit};

pub use node::{
    add_child, children, create_builder_node, create_node, dispose_node, get_child_at,
    get_first_child, get_last_child, get_length_metric_unit, get_next_sibling, get_parent,
    get_previous_sibling, get_total_child_count, get_user_data, insert_child_after,
    insert_child_at, insert_child_before, is_alive, is_builder_node, node_count, node_type_of,
    on_node_destroy, remove_all_children, remove_child, set_length_metric_unit, set_user_data,
};

pub use attribute::{
    AttributeItem, AttributeObject, AttributeTag, NumberValue, get_attribute, reset_attribute,
    set_attribute, try_get_attribute,
};

pub use event::{
    NodeEvent, NodeEventType, add_node_event_receiver, dispatch_component_event,
    dispatch_input_event, dispatch_string_event, register_node_event,
    register_node_event_receiver, remove_node_event_receiver, unregister_node_event,
    unregister_node_event_receiver,
};

pub use adapter::{
    AdapterEvent, AdapterEventType, create_node_adapter, dispose_node_adapter,
    register_node_adapter_event_receiver,
};

pub use layout::{layout_node, mark_dirty, measure_node};

pub use task::{UiTaskHandle, UiTaskRunner};

pub use api::{ModuleKind, NativeNodeApi1, query_module_interface_by_name};

/// Reset every thread-local registry (for testing).
#[doc(hidden)]
pub fn reset_all() {
    adapter::reset_adapters();
    gesture::reset_gestures();
    event::reset_events();
    node::reset_nodes();
    config::reset_config();
    error::reset_latest_status();
}
