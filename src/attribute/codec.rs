//! Attribute Codec - set/get/reset of per-node attribute items.
//!
//! Items are validated against the shape table before they are stored, and
//! stored as copies. Reads of an attribute that was never set (or was reset)
//! report the tag's documented default, or nothing when it has none.

use crate::adapter;
use crate::error::{Error, Result};
use crate::node::{with_mutable_node, with_node};
use crate::types::{NodeHandle, NodeType};

use super::item::{AttributeItem, AttributeObject};
use super::shape::{self, AttributeShape};
use super::tag::{self, AttributeTag};

fn shape_for(tag: AttributeTag, node_type: NodeType) -> Result<&'static AttributeShape> {
    shape::lookup_for(tag, node_type).ok_or(Error::NotSupported {
        tag: tag.raw(),
        node_type,
    })
}

/// Store a copy of `item` under `tag`, replacing any previous value.
pub fn set_attribute(node: NodeHandle, tag: AttributeTag, item: &AttributeItem) -> Result<()> {
    let node_type = with_mutable_node(node, |e| e.node_type)?;
    let shape = shape_for(tag, node_type)?;

    if let Err(msg) = shape.validate(item) {
        log::warn!("set {tag:?} on {node} rejected: {msg}");
        return Err(Error::ParamInvalid(msg));
    }

    if tag::is_adapter_tag(tag) {
        let Some(AttributeObject::Adapter(handle)) = item.object else {
            return Err(Error::param(format!("{tag:?} needs an adapter object")));
        };
        adapter::attach_to_host(handle, node)?;
    } else {
        match item.object {
            Some(AttributeObject::Adapter(_)) => {
                return Err(Error::param(format!("{tag:?} does not take an adapter")));
            }
            Some(AttributeObject::Node(other)) => with_node(other, |_| ())?,
            _ => {}
        }
    }

    with_mutable_node(node, |e| {
        e.attributes.insert(tag, item.clone());
    })?;
    crate::layout::propagate_dirty(node, shape.dirty);
    log::trace!("set {tag:?} on {node}");
    Ok(())
}

/// Stored value or documented default.
///
/// Stale handles and unsupported tags are errors; an unset attribute without
/// a default is `Ok(None)`.
pub fn try_get_attribute(node: NodeHandle, tag: AttributeTag) -> Result<Option<AttributeItem>> {
    let (node_type, stored) = with_node(node, |e| (e.node_type, e.attributes.get(&tag).cloned()))?;
    let shape = shape_for(tag, node_type)?;
    Ok(stored.or_else(|| shape.default_item()))
}

/// Stored value or documented default; `None` when neither exists or the tag
/// does not apply to this node.
pub fn get_attribute(node: NodeHandle, tag: AttributeTag) -> Option<AttributeItem> {
    try_get_attribute(node, tag).ok().flatten()
}

/// Drop the stored value so reads report the default again.
pub fn reset_attribute(node: NodeHandle, tag: AttributeTag) -> Result<()> {
    let node_type = with_mutable_node(node, |e| e.node_type)?;
    let shape = shape_for(tag, node_type)?;

    let removed = with_mutable_node(node, |e| e.attributes.remove(&tag))?;
    if tag::is_adapter_tag(tag) {
        adapter::detach_from_host(node)?;
    }
    if removed.is_some() {
        crate::layout::propagate_dirty(node, shape.dirty);
    }
    Ok(())
}

/// Raw stored value, ignoring defaults.
pub(crate) fn stored_attribute(node: NodeHandle, tag: AttributeTag) -> Option<AttributeItem> {
    with_node(node, |e| e.attributes.get(&tag).cloned()).ok().flatten()
}

/// Forget an adapter-binding attribute without touching the adapter.
pub(crate) fn clear_adapter_attribute(node: NodeHandle) {
    let _ = crate::node::with_node_mut(node, |e| {
        e.attributes.retain(|tag, _| !tag::is_adapter_tag(*tag));
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::NumberValue;
    use crate::attribute::tag::*;
    use crate::node::{create_builder_node, create_node, dispose_node};
    use crate::types::ExternalRef;

    fn setup(t: NodeType) -> NodeHandle {
        crate::reset_all();
        create_node(t)
    }

    #[test]
    fn test_button_width_round_trip() {
        let node = setup(NodeType::Button);
        let item = AttributeItem::f32s(&[100.0]);
        set_attribute(node, NODE_WIDTH, &item).unwrap();
        assert_eq!(get_attribute(node, NODE_WIDTH), Some(item));
    }

    #[test]
    fn test_overwrite_and_reset_to_default() {
        let node = setup(NodeType::Stack);
        set_attribute(node, NODE_OPACITY, &AttributeItem::f32s(&[0.25])).unwrap();
        set_attribute(node, NODE_OPACITY, &AttributeItem::f32s(&[0.5])).unwrap();
        assert_eq!(get_attribute(node, NODE_OPACITY).unwrap().f32_at(0), Some(0.5));

        reset_attribute(node, NODE_OPACITY).unwrap();
        assert_eq!(get_attribute(node, NODE_OPACITY), Some(AttributeItem::f32s(&[1.0])));
    }

    #[test]
    fn test_unset_without_default_is_none() {
        let node = setup(NodeType::Button);
        assert_eq!(get_attribute(node, NODE_WIDTH), None);
        assert_eq!(try_get_attribute(node, NODE_WIDTH), Ok(None));
        assert_eq!(get_attribute(node, NODE_BUTTON_LABEL), Some(AttributeItem::string("")));
    }

    #[test]
    fn test_unsupported_tag() {
        let node = setup(NodeType::Image);
        let err = set_attribute(node, NODE_FONT_SIZE, &AttributeItem::f32s(&[12.0]));
        assert_eq!(
            err,
            Err(Error::NotSupported { tag: NODE_FONT_SIZE.raw(), node_type: NodeType::Image })
        );
        assert_eq!(get_attribute(node, NODE_FONT_SIZE), None);
        assert!(set_attribute(node, AttributeTag(999), &AttributeItem::new()).is_err());
    }

    #[test]
    fn test_shape_mismatch_keeps_previous_value() {
        let node = setup(NodeType::Text);
        set_attribute(node, NODE_FONT_SIZE, &AttributeItem::f32s(&[20.0])).unwrap();

        let bad = AttributeItem::f32s(&[20.0, 30.0]);
        assert!(matches!(set_attribute(node, NODE_FONT_SIZE, &bad), Err(Error::ParamInvalid(_))));
        assert!(matches!(
            set_attribute(node, NODE_FONT_SIZE, &AttributeItem::f32s(&[-1.0])),
            Err(Error::ParamInvalid(_))
        ));
        assert_eq!(get_attribute(node, NODE_FONT_SIZE).unwrap().f32_at(0), Some(20.0));
    }

    #[test]
    fn test_string_and_object_payloads() {
        let node = setup(NodeType::Text);
        set_attribute(node, NODE_TEXT_CONTENT, &AttributeItem::string("hello")).unwrap();
        assert_eq!(
            get_attribute(node, NODE_TEXT_CONTENT).unwrap().string.as_deref(),
            Some("hello")
        );

        let gradient = AttributeItem::numbers([
            NumberValue::f32(45.0),
            NumberValue::i32(2),
            NumberValue::i32(1),
        ])
        .with_object(AttributeObject::External(ExternalRef(99)));
        set_attribute(node, NODE_LINEAR_GRADIENT, &gradient).unwrap();
        assert_eq!(get_attribute(node, NODE_LINEAR_GRADIENT), Some(gradient));
    }

    #[test]
    fn test_node_object_must_be_alive() {
        let group = setup(NodeType::ListItemGroup);
        let header = create_node(NodeType::Text);
        let item = AttributeItem::object(AttributeObject::Node(header));
        set_attribute(group, NODE_LIST_ITEM_GROUP_SET_HEADER, &item).unwrap();

        dispose_node(header).unwrap();
        assert!(matches!(
            set_attribute(group, NODE_LIST_ITEM_GROUP_SET_HEADER, &item),
            Err(Error::StaleHandle(_))
        ));
    }

    #[test]
    fn test_builder_node_rejects_writes_but_reads() {
        crate::reset_all();
        let node = create_builder_node(NodeType::Button);
        assert_eq!(
            set_attribute(node, NODE_WIDTH, &AttributeItem::f32s(&[1.0])),
            Err(Error::BuilderNode)
        );
        assert_eq!(reset_attribute(node, NODE_WIDTH), Err(Error::BuilderNode));
        assert_eq!(get_attribute(node, NODE_ENABLED), Some(AttributeItem::i32s(&[1])));
    }

    #[test]
    fn test_stored_copy_is_independent() {
        let node = setup(NodeType::Column);
        let mut item = AttributeItem::f32s(&[1.0, 2.0, 3.0, 4.0]);
        set_attribute(node, NODE_PADDING, &item).unwrap();
        item.value[0] = NumberValue::f32(9.0);
        assert_eq!(stored_attribute(node, NODE_PADDING).unwrap().f32_at(0), Some(1.0));
    }
}
