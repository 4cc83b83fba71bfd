//! Typed view of attribute items.
//!
//! Positional slots carry no type of their own; this layer reads the slot
//! kinds from the shape table so callers can work with `i32`/`u32`/`f32`
//! values and get a mismatch reported instead of silently reinterpreted bits.

use crate::error::{Error, Result};
use crate::types::NodeHandle;

use super::codec;
use super::item::{AttributeItem, AttributeObject, NumberValue};
use super::shape::{self, AttributeShape, SlotKind};
use super::tag::AttributeTag;

/// One numeric slot with its kind attached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypedValue {
    I32(i32),
    U32(u32),
    F32(f32),
}

impl TypedValue {
    pub fn kind(&self) -> SlotKind {
        match self {
            Self::I32(_) => SlotKind::I32,
            Self::U32(_) => SlotKind::U32,
            Self::F32(_) => SlotKind::F32,
        }
    }

    fn read(kind: SlotKind, raw: NumberValue) -> Self {
        match kind {
            SlotKind::I32 => Self::I32(raw.as_i32()),
            SlotKind::U32 => Self::U32(raw.as_u32()),
            SlotKind::F32 => Self::F32(raw.as_f32()),
        }
    }

    fn raw(self) -> NumberValue {
        match self {
            Self::I32(v) => NumberValue::i32(v),
            Self::U32(v) => NumberValue::u32(v),
            Self::F32(v) => NumberValue::f32(v),
        }
    }
}

/// An attribute item whose numeric slots carry their kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypedItem {
    pub values: Vec<TypedValue>,
    pub string: Option<String>,
    pub object: Option<AttributeObject>,
}

fn known(tag: AttributeTag) -> Result<&'static AttributeShape> {
    shape::lookup(tag).ok_or_else(|| Error::param(format!("unknown attribute tag {}", tag.raw())))
}

/// Read `item`'s slots with the kinds `tag` declares.
pub fn decode(tag: AttributeTag, item: &AttributeItem) -> Result<TypedItem> {
    let shape = known(tag)?;
    shape.validate(item).map_err(Error::ParamInvalid)?;

    let values = item
        .value
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            let slot = shape
                .slot(i)
                .ok_or_else(|| Error::param(format!("{}: no rule for slot {i}", shape.name)))?;
            Ok(TypedValue::read(slot.kind, *raw))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(TypedItem {
        values,
        string: item.string.clone(),
        object: item.object,
    })
}

/// Pack typed values into slots, rejecting any value whose kind differs from
/// what `tag` declares for that position.
pub fn encode(tag: AttributeTag, typed: &TypedItem) -> Result<AttributeItem> {
    let shape = known(tag)?;

    let mut value = Vec::with_capacity(typed.values.len());
    for (i, v) in typed.values.iter().enumerate() {
        let expected = shape.slot(i).map(|s| s.kind);
        if expected != Some(v.kind()) {
            return Err(Error::param(format!(
                "{} slot {i} is {:?}, got {:?}",
                shape.name,
                expected,
                v.kind()
            )));
        }
        value.push(v.raw());
    }

    let item = AttributeItem {
        value,
        string: typed.string.clone(),
        object: typed.object,
    };
    shape.validate(&item).map_err(Error::ParamInvalid)?;
    Ok(item)
}

/// [`encode`] then [`set_attribute`](super::set_attribute).
pub fn set_typed(node: NodeHandle, tag: AttributeTag, typed: &TypedItem) -> Result<()> {
    let item = encode(tag, typed)?;
    codec::set_attribute(node, tag, &item)
}

/// [`get_attribute`](super::get_attribute) then [`decode`].
pub fn get_typed(node: NodeHandle, tag: AttributeTag) -> Option<TypedItem> {
    let item = codec::get_attribute(node, tag)?;
    decode(tag, &item).ok()
}
