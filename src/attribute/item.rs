//! AttributeItem - the untyped payload carried by set/get attribute.
//!
//! Numeric slots are 32 raw bits each. Whether a slot is read as `i32`, `u32`
//! or `f32` is fixed by the attribute's entry in the shape table, not stored
//! in the slot.

use std::fmt;

use crate::types::{ExternalRef, NodeAdapterHandle, NodeHandle};

// =============================================================================
// NumberValue
// =============================================================================

/// One numeric slot: 32 bits interpreted per the tag's slot convention.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NumberValue(u32);

impl NumberValue {
    pub const fn i32(v: i32) -> Self {
        Self(v as u32)
    }

    pub const fn u32(v: u32) -> Self {
        Self(v)
    }

    pub const fn f32(v: f32) -> Self {
        Self(v.to_bits())
    }

    pub const fn as_i32(self) -> i32 {
        self.0 as i32
    }

    pub const fn as_u32(self) -> u32 {
        self.0
    }

    pub const fn as_f32(self) -> f32 {
        f32::from_bits(self.0)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for NumberValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

impl From<i32> for NumberValue {
    fn from(v: i32) -> Self {
        Self::i32(v)
    }
}

impl From<u32> for NumberValue {
    fn from(v: u32) -> Self {
        Self::u32(v)
    }
}

impl From<f32> for NumberValue {
    fn from(v: f32) -> Self {
        Self::f32(v)
    }
}

// =============================================================================
// AttributeObject
// =============================================================================

/// The object slot of an attribute item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeObject {
    /// Caller-owned context, never interpreted by the facade.
    External(ExternalRef),
    /// A lazy-loading adapter (adapter-binding attributes).
    Adapter(NodeAdapterHandle),
    /// Another node (content/builder attributes).
    Node(NodeHandle),
}

// =============================================================================
// AttributeItem
// =============================================================================

/// Payload for one attribute: numeric slots, optional string, optional object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeItem {
    pub value: Vec<NumberValue>,
    pub string: Option<String>,
    pub object: Option<AttributeObject>,
}

impl AttributeItem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Item with the given numeric slots.
    pub fn numbers(values: impl IntoIterator<Item = NumberValue>) -> Self {
        Self {
            value: values.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn f32s(values: &[f32]) -> Self {
        Self::numbers(values.iter().copied().map(NumberValue::f32))
    }

    pub fn i32s(values: &[i32]) -> Self {
        Self::numbers(values.iter().copied().map(NumberValue::i32))
    }

    pub fn u32s(values: &[u32]) -> Self {
        Self::numbers(values.iter().copied().map(NumberValue::u32))
    }

    /// Item carrying only a string.
    pub fn string(s: impl Into<String>) -> Self {
        Self {
            string: Some(s.into()),
            ..Self::default()
        }
    }

    /// Item carrying only an object.
    pub fn object(object: AttributeObject) -> Self {
        Self {
            object: Some(object),
            ..Self::default()
        }
    }

    pub fn with_string(mut self, s: impl Into<String>) -> Self {
        self.string = Some(s.into());
        self
    }

    pub fn with_object(mut self, object: AttributeObject) -> Self {
        self.object = Some(object);
        self
    }

    /// Number of populated numeric slots.
    pub fn size(&self) -> usize {
        self.value.len()
    }

    /// Slot `i` as f32, if present.
    pub fn f32_at(&self, i: usize) -> Option<f32> {
        self.value.get(i).map(|v| v.as_f32())
    }

    /// Slot `i` as i32, if present.
    pub fn i32_at(&self, i: usize) -> Option<i32> {
        self.value.get(i).map(|v| v.as_i32())
    }

    /// Slot `i` as u32, if present.
    pub fn u32_at(&self, i: usize) -> Option<u32> {
        self.value.get(i).map(|v| v.as_u32())
    }
}
