//! Versioned function table.

mod common;

use spark_node::attribute::tag;
use spark_node::*;

fn api() -> &'static NativeNodeApi1 {
    query_module_interface_by_name(ModuleKind::Node, api::NODE_API_1_NAME).unwrap()
}

#[test]
fn table_builds_a_tree() {
    common::setup();
    let api = api();
    let column = (api.create_node)(NodeType::Column.raw()).unwrap();
    let a = (api.create_node)(NodeType::Text.raw()).unwrap();
    let b = (api.create_node)(NodeType::Text.raw()).unwrap();

    assert_eq!((api.add_child)(column, b), 0);
    assert_eq!((api.insert_child_before)(column, a, Some(b)), 0);
    assert_eq!((api.get_first_child)(column), Some(a));
    assert_eq!((api.get_next_sibling)(a), Some(b));

    let height = AttributeItem::f32s(&[20.0]);
    for node in [a, b] {
        assert_eq!((api.set_attribute)(node, tag::NODE_HEIGHT.raw(), &height), 0);
    }
    let constraint = LayoutConstraint::loose(100.0, 100.0);
    assert_eq!((api.measure_node)(column, &constraint), 0);
    assert_eq!((api.get_measured_size)(column).height, 40);
    assert_eq!((api.get_layout_position)(b).y, 20);
}

#[test]
fn unknown_type_yields_none() {
    common::setup();
    assert!((api().create_node)(-5).is_none());
    assert!((api().create_node)(999).is_none());
}

#[test]
fn global_receiver_through_table() {
    common::setup();
    let api = api();
    let button = (api.create_node)(NodeType::Button.raw()).unwrap();
    assert_eq!((api.register_node_event)(button, event::NODE_ON_CLICK.raw(), 5, None), 0);

    fn receiver(e: &NodeEvent<'_>) {
        assert_eq!(e.target_id, 5);
    }
    (api.register_node_event_receiver)(receiver);

    let data = event::ComponentEventData::default();
    assert_eq!(dispatch_component_event(button, event::NODE_ON_CLICK, &data), Ok(1));
    (api.unregister_node_event_receiver)();
    assert_eq!(dispatch_component_event(button, event::NODE_ON_CLICK, &data), Ok(0));
}
