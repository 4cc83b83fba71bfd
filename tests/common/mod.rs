//! Shared setup for integration tests.

#![allow(dead_code)]

use spark_node::{NodeHandle, NodeType, create_node};

/// Fresh registries plus a test logger. Each test runs on its own thread, so
/// the thread-local state starts empty, but the reset keeps tests honest when
/// run with `--test-threads=1`.
pub fn setup() {
    let _ = env_logger::builder().is_test(true).try_init();
    spark_node::reset_all();
}

/// `count` fresh nodes of `node_type`.
pub fn nodes(node_type: NodeType, count: usize) -> Vec<NodeHandle> {
    (0..count).map(|_| create_node(node_type)).collect()
}
