//! Virtual List Example - adapter-backed List over 1,000 rows
//!
//! This example demonstrates:
//! - Binding a node adapter to a List host
//! - Materializing only the visible window plus cached rows
//! - Scrolling, moving and removing rows without rebuilding the list
//!
//! Run with: RUST_LOG=debug cargo run --example virtual_list

use std::cell::Cell;
use std::rc::Rc;

use spark_node::adapter::{self, AdapterEventType};
use spark_node::attribute::tag;
use spark_node::{
    AttributeItem, AttributeObject, ExternalRef, LayoutConstraint, NodeType, create_node,
    create_node_adapter, dispose_node, get_attribute, get_user_data, measure_node,
    register_node_adapter_event_receiver, set_attribute, set_user_data,
};

const ROWS: u32 = 1_000;
const ROW_HEIGHT: f32 = 48.0;

fn main() -> spark_node::Result<()> {
    env_logger::init();

    println!("=== spark-node Virtual List Example ===\n");

    let list = create_node(NodeType::List);
    set_attribute(list, tag::NODE_WIDTH, &AttributeItem::f32s(&[360.0]))?;
    set_attribute(list, tag::NODE_LIST_CACHED_COUNT, &AttributeItem::i32s(&[3]))?;

    let rows = create_node_adapter();
    let live = Rc::new(Cell::new(0u32));
    let counter = live.clone();

    register_node_adapter_event_receiver(rows, None, move |e| match e.kind {
        AdapterEventType::OnAddNodeToAdapter => {
            let Ok(row) = build_row(e.index) else {
                return;
            };
            e.set_item(row);
            counter.set(counter.get() + 1);
        }
        AdapterEventType::OnRemoveNodeFromAdapter => {
            if let Some(row) = e.removed_node() {
                let _ = dispose_node(row);
                counter.set(counter.get() - 1);
            }
        }
        _ => {}
    })?;

    adapter::set_total_node_count(rows, ROWS)?;
    set_attribute(
        list,
        tag::NODE_LIST_NODE_ADAPTER,
        &AttributeItem::object(AttributeObject::Adapter(rows)),
    )?;

    // A 480px viewport shows ten rows
    for first in [0, 10, 500, 990] {
        adapter::set_visible_range(rows, first, (first + 10).min(ROWS))?;
        let items = adapter::get_all_items(rows)?;
        let head = items.first().and_then(|n| get_user_data(*n).ok().flatten());
        println!(
            "visible {first:>3}..{:<4} -> {} live rows, first row #{}",
            first + 10,
            live.get(),
            head.map_or(0, |r| r.0)
        );
    }

    println!("\nMoving row 995 to 992:");
    let moved = adapter::get_item_at(rows, 995)?;
    adapter::move_item(rows, 995, 992)?;
    println!("  same node at 992: {}", adapter::get_item_at(rows, 992)? == moved);

    println!("\nRemoving rows 990..993:");
    adapter::remove_item(rows, 990, 3)?;
    println!("  total: {}", adapter::get_total_node_count(rows)?);
    println!("  live rows: {}", live.get());

    let size = measure_node(list, &LayoutConstraint::loose(360.0, 480.0))?;
    println!("\nList measured at {}x{}", size.width, size.height);

    if let Some(binding) = get_attribute(list, tag::NODE_LIST_NODE_ADAPTER) {
        println!("Adapter binding: {:?}", binding.object);
    }

    println!("\n=== Example Complete ===");
    Ok(())
}

/// One fixed-height row carrying its original index as user data.
fn build_row(index: u32) -> spark_node::Result<spark_node::NodeHandle> {
    let row = create_node(NodeType::ListItem);
    set_attribute(row, tag::NODE_HEIGHT, &AttributeItem::f32s(&[ROW_HEIGHT]))?;
    set_user_data(row, Some(ExternalRef(index as u64)))?;

    let label = create_node(NodeType::Text);
    set_attribute(label, tag::NODE_TEXT_CONTENT, &AttributeItem::string(format!("Row {index}")))?;
    spark_node::add_child(row, label)?;
    Ok(row)
}
