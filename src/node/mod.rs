//! Node Registry & Tree Manager.
//!
//! Nodes are opaque generational handles into a thread-local arena. The tree
//! manager links them into parent/child order that the layout pass walks.
//!
//! # Example
//!
//! ```ignore
//! use spark_node::{add_child, create_node, get_child_at, NodeType};
//!
//! let column = create_node(NodeType::Column);
//! let label = create_node(NodeType::Text);
//! add_child(column, label)?;
//! assert_eq!(get_child_at(column, 0), Some(label));
//! ```

mod registry;
mod tree;

pub use registry::{
    create_builder_node, create_node, dispose_node, get_length_metric_unit, get_user_data,
    is_alive, is_builder_node, node_count, node_type_of, on_node_destroy, reset_nodes,
    set_length_metric_unit, set_user_data,
};
pub(crate) use registry::{with_mutable_node, with_node, with_node_mut};
pub use tree::{
    add_child, children, get_child_at, get_first_child, get_last_child, get_next_sibling,
    get_parent, get_previous_sibling, get_total_child_count, insert_child_after,
    insert_child_at, insert_child_before, remove_all_children, remove_child,
};
