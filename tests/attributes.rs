//! Attribute codec round trips and rejection paths.

mod common;

use spark_node::attribute::shape::{Arity, AttributeShape, Check, Presence, SlotKind};
use spark_node::attribute::{self, tag};
use spark_node::*;

fn host_for(shape: &AttributeShape) -> NodeHandle {
    let node_type = match shape.scope {
        Scope::Common => NodeType::Stack,
        Scope::Types(types) => types[0],
    };
    create_node(node_type)
}

/// An item that satisfies every rule of `shape`.
fn valid_item(shape: &AttributeShape) -> AttributeItem {
    let count = if shape.slots.is_empty() {
        0
    } else {
        match shape.arity {
            Arity::Exact(k) => k,
            Arity::OneOf(ks) => ks.iter().copied().max().unwrap_or(0),
            Arity::Range(lo, hi) => hi.min(lo.max(1)),
            Arity::AtLeast(k) => k.max(1),
        }
    };
    let values = (0..count).map(|i| {
        let slot = shape.slot(i).unwrap();
        match (slot.check, slot.kind) {
            (Check::Enum(_, hi), _) => NumberValue::i32(hi),
            (Check::Bool, _) => NumberValue::i32(1),
            (Check::UnitInterval, _) => NumberValue::f32(0.5),
            (_, SlotKind::I32) => NumberValue::i32(3),
            (_, SlotKind::U32) => NumberValue::u32(0xFF00_FF00),
            (_, SlotKind::F32) => NumberValue::f32(12.5),
        }
    });
    let mut item = AttributeItem::numbers(values);
    if shape.string == Presence::Required {
        item = item.with_string("value");
    }
    if shape.object == Presence::Required {
        let object = if attribute::tag::is_adapter_tag(shape.tag) {
            AttributeObject::Adapter(create_node_adapter())
        } else {
            AttributeObject::External(ExternalRef(77))
        };
        item = item.with_object(object);
    }
    item
}

#[test]
fn button_width_round_trip() {
    common::setup();
    let button = create_node(NodeType::Button);
    let width = AttributeItem::f32s(&[100.0]);

    set_attribute(button, tag::NODE_WIDTH, &width).unwrap();
    let read = get_attribute(button, tag::NODE_WIDTH).unwrap();
    assert_eq!(read.value.len(), 1);
    assert_eq!(read.f32_at(0), Some(100.0));
}

#[test]
fn reads_are_independent_copies() {
    common::setup();
    let text = create_node(NodeType::Text);
    set_attribute(text, tag::NODE_TEXT_CONTENT, &AttributeItem::string("a")).unwrap();

    let mut first = get_attribute(text, tag::NODE_TEXT_CONTENT).unwrap();
    first.string = Some("changed".into());
    let second = get_attribute(text, tag::NODE_TEXT_CONTENT).unwrap();
    assert_eq!(second.string.as_deref(), Some("a"));
}

#[test]
fn rejected_writes_report_codes() {
    common::setup();
    let image = create_node(NodeType::Image);

    let wrong_type = set_attribute(image, tag::NODE_FONT_SIZE, &AttributeItem::f32s(&[12.0]));
    assert_eq!(to_code(wrong_type), ErrorCode::AttributeOrEventNotSupported.raw());

    let wrong_arity = set_attribute(image, tag::NODE_WIDTH, &AttributeItem::f32s(&[]));
    assert_eq!(to_code(wrong_arity), ErrorCode::ParamInvalid.raw());

    let negative = set_attribute(image, tag::NODE_WIDTH, &AttributeItem::f32s(&[-4.0]));
    assert_eq!(to_code(negative), ErrorCode::ParamInvalid.raw());
    assert_eq!(get_attribute(image, tag::NODE_WIDTH), None);
}

#[test]
fn every_shape_default_is_readable() {
    common::setup();
    for shape in attribute::shape::all_shapes() {
        let Some(default) = shape.default_item() else { continue };
        let node_type = match shape.scope {
            Scope::Common => NodeType::Stack,
            Scope::Types(types) => types[0],
        };
        let node = create_node(node_type);
        assert_eq!(get_attribute(node, shape.tag), Some(default), "{}", shape.name);
    }
}

#[test]
fn typed_layer_catches_kind_mismatch() {
    common::setup();
    let typed = attribute::TypedItem {
        values: vec![attribute::TypedValue::I32(1)],
        ..Default::default()
    };
    assert!(attribute::encode(tag::NODE_OPACITY, &typed).is_err());
}

#[test]
fn length_units_convert_with_density() {
    common::setup();
    configure(FacadeConfig { density: 3.0, ..Default::default() });
    assert_eq!(convert_length_metrics_unit(10.0, LengthUnit::Vp, LengthUnit::Px), 30.0);
    assert_eq!(convert_length_metrics_unit(30.0, LengthUnit::Px, LengthUnit::Vp), 10.0);
}

#[test]
fn every_shape_round_trips_and_resets_to_default() {
    common::setup();
    for shape in attribute::shape::all_shapes() {
        let node = host_for(shape);
        let item = valid_item(shape);

        set_attribute(node, shape.tag, &item).unwrap_or_else(|e| panic!("{}: {e}", shape.name));
        assert_eq!(get_attribute(node, shape.tag), Some(item), "{}", shape.name);

        reset_attribute(node, shape.tag).unwrap();
        assert_eq!(get_attribute(node, shape.tag), shape.default_item(), "{}", shape.name);
    }
}
