//! Attribute Codec.
//!
//! One untyped payload ([`AttributeItem`]) carries every attribute across the
//! API. The shape table maps each tag to the payload layout it expects, so
//! malformed items are rejected at the boundary instead of being
//! misinterpreted later.
//!
//! # API
//!
//! - `set_attribute(node, tag, &item)` - validate and store a copy
//! - `get_attribute(node, tag)` - stored value, else documented default
//! - `reset_attribute(node, tag)` - drop the stored value
//! - `decode` / `encode` / `set_typed` / `get_typed` - typed slot access
//!
//! # Example
//!
//! ```ignore
//! use spark_node::attribute::{self, AttributeItem, NODE_WIDTH};
//!
//! attribute::set_attribute(button, NODE_WIDTH, &AttributeItem::f32s(&[100.0]))?;
//! assert_eq!(attribute::get_attribute(button, NODE_WIDTH).unwrap().f32_at(0), Some(100.0));
//! ```

mod codec;
mod item;
pub mod shape;
pub mod tag;
mod typed;

pub use codec::{get_attribute, reset_attribute, set_attribute, try_get_attribute};
pub(crate) use codec::{clear_adapter_attribute, stored_attribute};
pub use item::{AttributeItem, AttributeObject, NumberValue};
pub use shape::{AttributeShape, lookup as lookup_shape};
pub use tag::*;
pub use typed::{TypedItem, TypedValue, decode, encode, get_typed, set_typed};
