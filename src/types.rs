//! Core types for spark-node.
//!
//! Handles, the closed set of node kinds, and the small enums shared by the
//! attribute codec, event dispatch and layout pass.

use std::fmt;

// =============================================================================
// Tag Space
// =============================================================================

/// Width of each node type's block in the attribute and event tag spaces.
///
/// Shared tags occupy `[0, MAX_NODE_SCOPE_NUM)`; a node type's own tags start
/// at `type * MAX_NODE_SCOPE_NUM`.
pub const MAX_NODE_SCOPE_NUM: i32 = 1000;

// =============================================================================
// Node Types
// =============================================================================

/// Node kinds understood by the facade.
///
/// Leaf widgets are numbered from 0, containers from [`MAX_NODE_SCOPE_NUM`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum NodeType {
    Custom = 0,
    Text = 1,
    Span = 2,
    ImageSpan = 3,
    Image = 4,
    Toggle = 5,
    LoadingProgress = 6,
    TextInput = 7,
    TextArea = 8,
    Button = 9,
    Progress = 10,
    Checkbox = 11,
    XComponent = 12,
    DatePicker = 13,
    TimePicker = 14,
    TextPicker = 15,
    CalendarPicker = 16,
    Slider = 17,
    Radio = 18,
    ImageAnimator = 19,
    Stack = 1000,
    Swiper = 1001,
    Scroll = 1002,
    List = 1003,
    ListItem = 1004,
    ListItemGroup = 1005,
    Column = 1006,
    Row = 1007,
    Flex = 1008,
    Refresh = 1009,
    WaterFlow = 1010,
    FlowItem = 1011,
    RelativeContainer = 1012,
    Grid = 1013,
    GridItem = 1014,
    CustomSpan = 1015,
}

impl NodeType {
    pub const ALL: [NodeType; 36] = [
        Self::Custom, Self::Text, Self::Span, Self::ImageSpan, Self::Image,
        Self::Toggle, Self::LoadingProgress, Self::TextInput, Self::TextArea,
        Self::Button, Self::Progress, Self::Checkbox, Self::XComponent,
        Self::DatePicker, Self::TimePicker, Self::TextPicker, Self::CalendarPicker,
        Self::Slider, Self::Radio, Self::ImageAnimator, Self::Stack, Self::Swiper,
        Self::Scroll, Self::List, Self::ListItem, Self::ListItemGroup, Self::Column,
        Self::Row, Self::Flex, Self::Refresh, Self::WaterFlow, Self::FlowItem,
        Self::RelativeContainer, Self::Grid, Self::GridItem, Self::CustomSpan,
    ];

    /// Decode a raw node type. Unknown values yield `None`.
    pub fn from_raw(raw: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.raw() == raw)
    }

    pub const fn raw(self) -> i32 {
        self as i32
    }

    /// First tag of this type's block in the attribute/event tag spaces.
    pub const fn scope_base(self) -> i32 {
        self.raw() * MAX_NODE_SCOPE_NUM
    }

    /// Whether nodes of this type host scrollable content.
    pub const fn is_scrollable(self) -> bool {
        matches!(self, Self::Scroll | Self::List | Self::WaterFlow | Self::Grid)
    }

    /// Whether this type can host a lazy-loading adapter.
    pub const fn can_host_adapter(self) -> bool {
        matches!(self, Self::List | Self::Swiper | Self::WaterFlow | Self::Grid)
    }
}

/// Which node types a tag applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Every node type.
    Common,
    /// Only the listed node types.
    Types(&'static [NodeType]),
}

impl Scope {
    pub fn contains(&self, node_type: NodeType) -> bool {
        match self {
            Self::Common => true,
            Self::Types(types) => types.contains(&node_type),
        }
    }
}

// =============================================================================
// Handles
// =============================================================================

/// Opaque handle to a node.
///
/// The generation makes handles of disposed nodes detectable after their slot
/// is reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl NodeHandle {
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index in the registry arena.
    pub const fn index(&self) -> u32 {
        self.index
    }
}

impl fmt::Debug for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}v{}", self.index, self.generation)
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Opaque handle to a lazy-loading node adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeAdapterHandle(pub(crate) u32);

/// Caller-owned context reference.
///
/// An id into a table the caller owns. The facade stores and hands it back but
/// never interprets or frees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExternalRef(pub u64);

// =============================================================================
// Length Units
// =============================================================================

/// Unit of the length slots of a node's attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum LengthUnit {
    /// Component default (vp).
    #[default]
    Default = -1,
    Px = 0,
    Vp = 1,
    Fp = 2,
}

impl LengthUnit {
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            -1 => Some(Self::Default),
            0 => Some(Self::Px),
            1 => Some(Self::Vp),
            2 => Some(Self::Fp),
            _ => None,
        }
    }
}

// =============================================================================
// Dirty Flags
// =============================================================================

bitflags::bitflags! {
    /// Pending work for the layout/render pipeline.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DirtyFlags: u32 {
        const NEED_MEASURE = 1;
        const NEED_LAYOUT = 1 << 1;
        const NEED_RENDER = 1 << 2;
    }
}

// =============================================================================
// Geometry
// =============================================================================

/// Integer size reported by the measure pass (px).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntSize {
    pub width: i32,
    pub height: i32,
}

/// Integer position reported by the layout pass (px, relative to parent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntOffset {
    pub x: i32,
    pub y: i32,
}

/// Constraint handed to the measure pass (px).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConstraint {
    pub min_width: f32,
    pub max_width: f32,
    pub min_height: f32,
    pub max_height: f32,
    pub percent_reference_width: f32,
    pub percent_reference_height: f32,
}

impl LayoutConstraint {
    /// Tight constraint: exactly `width` x `height`.
    pub fn tight(width: f32, height: f32) -> Self {
        Self {
            min_width: width,
            max_width: width,
            min_height: height,
            max_height: height,
            percent_reference_width: width,
            percent_reference_height: height,
        }
    }

    /// Loose constraint: anything up to `width` x `height`.
    pub fn loose(width: f32, height: f32) -> Self {
        Self {
            min_width: 0.0,
            max_width: width,
            min_height: 0.0,
            max_height: height,
            percent_reference_width: width,
            percent_reference_height: height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_type_round_trip_raw() {
        for t in NodeType::ALL {
            assert_eq!(NodeType::from_raw(t.raw()), Some(t));
        }
        assert_eq!(NodeType::from_raw(20), None);
        assert_eq!(NodeType::from_raw(-1), None);
        assert_eq!(NodeType::from_raw(1016), None);
    }

    #[test]
    fn test_scope_base() {
        assert_eq!(NodeType::Custom.scope_base(), 0);
        assert_eq!(NodeType::Button.scope_base(), 9000);
        assert_eq!(NodeType::List.scope_base(), 1_003_000);
    }

    #[test]
    fn test_scope_contains() {
        assert!(Scope::Common.contains(NodeType::Grid));
        let s = Scope::Types(&[NodeType::Text, NodeType::Span]);
        assert!(s.contains(NodeType::Span));
        assert!(!s.contains(NodeType::Button));
    }

    #[test]
    fn test_dirty_flags_combine() {
        let f = DirtyFlags::NEED_MEASURE | DirtyFlags::NEED_RENDER;
        assert!(f.contains(DirtyFlags::NEED_MEASURE));
        assert!(!f.contains(DirtyFlags::NEED_LAYOUT));
    }
}
