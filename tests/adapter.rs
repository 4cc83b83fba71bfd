//! Node adapter virtualization.

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use spark_node::adapter::{self, AdapterEventType};
use spark_node::attribute::tag;
use spark_node::*;

/// List bound to an adapter whose rows are Text nodes tagged with the index
/// they were created for.
fn bound_list(total: u32) -> (NodeHandle, NodeAdapterHandle, Rc<RefCell<Vec<AdapterEventType>>>) {
    common::setup();
    let list = create_node(NodeType::List);
    let handle = create_node_adapter();
    let events = Rc::new(RefCell::new(Vec::new()));
    let ev = events.clone();

    register_node_adapter_event_receiver(handle, None, move |e| {
        ev.borrow_mut().push(e.kind);
        match e.kind {
            AdapterEventType::OnAddNodeToAdapter => {
                let row = create_node(NodeType::Text);
                set_user_data(row, Some(ExternalRef(e.index as u64))).unwrap();
                e.set_item(row);
            }
            AdapterEventType::OnRemoveNodeFromAdapter => {
                if let Some(row) = e.removed_node() {
                    dispose_node(row).unwrap();
                }
            }
            _ => {}
        }
    })
    .unwrap();

    adapter::set_total_node_count(handle, total).unwrap();
    let binding = AttributeItem::object(AttributeObject::Adapter(handle));
    set_attribute(list, tag::NODE_LIST_NODE_ADAPTER, &binding).unwrap();
    set_attribute(list, tag::NODE_LIST_CACHED_COUNT, &AttributeItem::i32s(&[2])).unwrap();
    (list, handle, events)
}

fn created_for(node: NodeHandle) -> u64 {
    get_user_data(node).unwrap().unwrap().0
}

#[test]
fn only_the_window_is_materialized() {
    let (list, handle, _) = bound_list(1_000);
    adapter::set_visible_range(handle, 100, 110).unwrap();

    let items = adapter::get_all_items(handle).unwrap();
    assert_eq!(items.len(), 14);
    assert_eq!(created_for(items[0]), 98);
    assert_eq!(get_total_child_count(list), 0);
    assert!(items.iter().all(|n| get_parent(*n).is_none()));
}

#[test]
fn move_keeps_every_untouched_node() {
    let (_, handle, events) = bound_list(50);
    adapter::set_visible_range(handle, 0, 20).unwrap();
    let before: Vec<_> = (0..22).map(|i| adapter::get_item_at(handle, i).unwrap()).collect();
    events.borrow_mut().clear();

    adapter::move_item(handle, 3, 12).unwrap();

    for i in (0..3).chain(13..22) {
        assert_eq!(adapter::get_item_at(handle, i).unwrap(), before[i as usize], "index {i}");
    }
    assert_eq!(adapter::get_item_at(handle, 12).unwrap(), before[3]);
    assert!(events.borrow().is_empty());
}

#[test]
fn scrolling_evicts_and_materializes() {
    let (_, handle, events) = bound_list(100);
    adapter::set_visible_range(handle, 0, 10).unwrap();
    events.borrow_mut().clear();

    adapter::set_visible_range(handle, 5, 15).unwrap();
    let log = events.borrow();
    let removed = log.iter().filter(|k| **k == AdapterEventType::OnRemoveNodeFromAdapter).count();
    let added = log.iter().filter(|k| **k == AdapterEventType::OnAddNodeToAdapter).count();
    assert_eq!((removed, added), (3, 5));
}

#[test]
fn remove_and_insert_report_index_errors() {
    let (_, handle, _) = bound_list(10);
    assert_eq!(
        to_code(adapter::remove_item(handle, 8, 5)),
        ErrorCode::NodeIndexInvalid.raw()
    );
    adapter::insert_item(handle, 10, 5).unwrap();
    assert_eq!(adapter::get_total_node_count(handle), Ok(15));
}

#[test]
fn host_refuses_children_while_bound() {
    let (list, handle, _) = bound_list(3);
    let extra = create_node(NodeType::ListItem);
    assert_eq!(
        to_code(add_child(list, extra)),
        ErrorCode::NodeAdapterExistInHost.raw()
    );

    dispose_node_adapter(handle).unwrap();
    assert!(get_attribute(list, tag::NODE_LIST_NODE_ADAPTER).is_none());
    add_child(list, extra).unwrap();
}
