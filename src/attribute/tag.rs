//! Attribute tags.
//!
//! Shared tags live in `[0, 1000)`. Each node type owns the block starting at
//! `type * MAX_NODE_SCOPE_NUM`; a tag outside its owner's block would collide
//! with another type's vocabulary.

use std::fmt;

use crate::types::{MAX_NODE_SCOPE_NUM, NodeType};

/// Integer selecting which property of a node is read or written.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributeTag(pub i32);

impl AttributeTag {
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Whether the tag is in the shared block.
    pub const fn is_common(self) -> bool {
        self.0 >= 0 && self.0 < MAX_NODE_SCOPE_NUM
    }

    /// Node type whose block contains this tag (`None` for shared tags).
    pub fn owner(self) -> Option<NodeType> {
        if self.0 < MAX_NODE_SCOPE_NUM {
            return None;
        }
        NodeType::from_raw(self.0 / MAX_NODE_SCOPE_NUM)
    }
}

impl fmt::Debug for AttributeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match super::shape::lookup(*self) {
            Some(shape) => write!(f, "{}({})", shape.name, self.0),
            None => write!(f, "AttributeTag({})", self.0),
        }
    }
}

const fn scoped(t: NodeType, offset: i32) -> AttributeTag {
    AttributeTag(t.scope_base() + offset)
}

// -----------------------------------------------------------------------------
// Common
// -----------------------------------------------------------------------------

pub const NODE_WIDTH: AttributeTag = AttributeTag(0);
pub const NODE_HEIGHT: AttributeTag = AttributeTag(1);
pub const NODE_BACKGROUND_COLOR: AttributeTag = AttributeTag(2);
pub const NODE_BACKGROUND_IMAGE: AttributeTag = AttributeTag(3);
pub const NODE_PADDING: AttributeTag = AttributeTag(4);
pub const NODE_ID: AttributeTag = AttributeTag(5);
pub const NODE_ENABLED: AttributeTag = AttributeTag(6);
pub const NODE_MARGIN: AttributeTag = AttributeTag(7);
pub const NODE_TRANSLATE: AttributeTag = AttributeTag(8);
pub const NODE_SCALE: AttributeTag = AttributeTag(9);
pub const NODE_ROTATE: AttributeTag = AttributeTag(10);
pub const NODE_BRIGHTNESS: AttributeTag = AttributeTag(11);
pub const NODE_SATURATION: AttributeTag = AttributeTag(12);
pub const NODE_BLUR: AttributeTag = AttributeTag(13);
pub const NODE_LINEAR_GRADIENT: AttributeTag = AttributeTag(14);
pub const NODE_ALIGNMENT: AttributeTag = AttributeTag(15);
pub const NODE_OPACITY: AttributeTag = AttributeTag(16);
pub const NODE_BORDER_WIDTH: AttributeTag = AttributeTag(17);
pub const NODE_BORDER_RADIUS: AttributeTag = AttributeTag(18);
pub const NODE_BORDER_COLOR: AttributeTag = AttributeTag(19);
pub const NODE_BORDER_STYLE: AttributeTag = AttributeTag(20);
pub const NODE_Z_INDEX: AttributeTag = AttributeTag(21);
pub const NODE_VISIBILITY: AttributeTag = AttributeTag(22);
pub const NODE_CLIP: AttributeTag = AttributeTag(23);
pub const NODE_TRANSFORM: AttributeTag = AttributeTag(24);
pub const NODE_HIT_TEST_BEHAVIOR: AttributeTag = AttributeTag(25);
pub const NODE_POSITION: AttributeTag = AttributeTag(26);
pub const NODE_SHADOW: AttributeTag = AttributeTag(27);
pub const NODE_FOCUSABLE: AttributeTag = AttributeTag(28);
pub const NODE_DEFAULT_FOCUS: AttributeTag = AttributeTag(29);
pub const NODE_ACCESSIBILITY_TEXT: AttributeTag = AttributeTag(30);
pub const NODE_LAYOUT_WEIGHT: AttributeTag = AttributeTag(31);
pub const NODE_ASPECT_RATIO: AttributeTag = AttributeTag(32);
pub const NODE_CONSTRAINT_SIZE: AttributeTag = AttributeTag(33);
pub const NODE_FLEX_GROW: AttributeTag = AttributeTag(34);
pub const NODE_FLEX_SHRINK: AttributeTag = AttributeTag(35);
pub const NODE_FLEX_BASIS: AttributeTag = AttributeTag(36);

// -----------------------------------------------------------------------------
// Text family
// -----------------------------------------------------------------------------

pub const NODE_TEXT_CONTENT: AttributeTag = scoped(NodeType::Text, 0);
pub const NODE_FONT_COLOR: AttributeTag = scoped(NodeType::Text, 1);
pub const NODE_FONT_SIZE: AttributeTag = scoped(NodeType::Text, 2);
pub const NODE_FONT_STYLE: AttributeTag = scoped(NodeType::Text, 3);
pub const NODE_FONT_WEIGHT: AttributeTag = scoped(NodeType::Text, 4);
pub const NODE_TEXT_LINE_HEIGHT: AttributeTag = scoped(NodeType::Text, 5);
pub const NODE_TEXT_DECORATION: AttributeTag = scoped(NodeType::Text, 6);
pub const NODE_TEXT_CASE: AttributeTag = scoped(NodeType::Text, 7);
pub const NODE_TEXT_LETTER_SPACING: AttributeTag = scoped(NodeType::Text, 8);
pub const NODE_TEXT_MAX_LINES: AttributeTag = scoped(NodeType::Text, 9);
pub const NODE_TEXT_ALIGN: AttributeTag = scoped(NodeType::Text, 10);
pub const NODE_TEXT_OVERFLOW: AttributeTag = scoped(NodeType::Text, 11);

pub const NODE_SPAN_CONTENT: AttributeTag = scoped(NodeType::Span, 0);

pub const NODE_IMAGE_SPAN_SRC: AttributeTag = scoped(NodeType::ImageSpan, 0);
pub const NODE_IMAGE_SPAN_VERTICAL_ALIGNMENT: AttributeTag = scoped(NodeType::ImageSpan, 1);

// -----------------------------------------------------------------------------
// Widgets
// -----------------------------------------------------------------------------

pub const NODE_IMAGE_SRC: AttributeTag = scoped(NodeType::Image, 0);
pub const NODE_IMAGE_OBJECT_FIT: AttributeTag = scoped(NodeType::Image, 1);
pub const NODE_IMAGE_INTERPOLATION: AttributeTag = scoped(NodeType::Image, 2);
pub const NODE_IMAGE_OBJECT_REPEAT: AttributeTag = scoped(NodeType::Image, 3);
pub const NODE_IMAGE_COLOR_FILTER: AttributeTag = scoped(NodeType::Image, 4);
pub const NODE_IMAGE_AUTO_RESIZE: AttributeTag = scoped(NodeType::Image, 5);
pub const NODE_IMAGE_ALT: AttributeTag = scoped(NodeType::Image, 6);

pub const NODE_TOGGLE_SELECTED_COLOR: AttributeTag = scoped(NodeType::Toggle, 0);
pub const NODE_TOGGLE_SWITCH_POINT_COLOR: AttributeTag = scoped(NodeType::Toggle, 1);
pub const NODE_TOGGLE_VALUE: AttributeTag = scoped(NodeType::Toggle, 2);

pub const NODE_LOADING_PROGRESS_COLOR: AttributeTag = scoped(NodeType::LoadingProgress, 0);
pub const NODE_LOADING_PROGRESS_ENABLE_LOADING: AttributeTag = scoped(NodeType::LoadingProgress, 1);

pub const NODE_TEXT_INPUT_PLACEHOLDER: AttributeTag = scoped(NodeType::TextInput, 0);
pub const NODE_TEXT_INPUT_TEXT: AttributeTag = scoped(NodeType::TextInput, 1);
pub const NODE_TEXT_INPUT_CARET_COLOR: AttributeTag = scoped(NodeType::TextInput, 2);
pub const NODE_TEXT_INPUT_CARET_STYLE: AttributeTag = scoped(NodeType::TextInput, 3);
pub const NODE_TEXT_INPUT_SHOW_UNDERLINE: AttributeTag = scoped(NodeType::TextInput, 4);
pub const NODE_TEXT_INPUT_MAX_LENGTH: AttributeTag = scoped(NodeType::TextInput, 5);
pub const NODE_TEXT_INPUT_ENTER_KEY_TYPE: AttributeTag = scoped(NodeType::TextInput, 6);
pub const NODE_TEXT_INPUT_PLACEHOLDER_COLOR: AttributeTag = scoped(NodeType::TextInput, 7);

pub const NODE_TEXT_AREA_PLACEHOLDER: AttributeTag = scoped(NodeType::TextArea, 0);
pub const NODE_TEXT_AREA_TEXT: AttributeTag = scoped(NodeType::TextArea, 1);
pub const NODE_TEXT_AREA_MAX_LENGTH: AttributeTag = scoped(NodeType::TextArea, 2);
pub const NODE_TEXT_AREA_PLACEHOLDER_COLOR: AttributeTag = scoped(NodeType::TextArea, 3);

pub const NODE_BUTTON_LABEL: AttributeTag = scoped(NodeType::Button, 0);
pub const NODE_BUTTON_TYPE: AttributeTag = scoped(NodeType::Button, 1);

pub const NODE_PROGRESS_VALUE: AttributeTag = scoped(NodeType::Progress, 0);
pub const NODE_PROGRESS_TOTAL: AttributeTag = scoped(NodeType::Progress, 1);
pub const NODE_PROGRESS_COLOR: AttributeTag = scoped(NodeType::Progress, 2);
pub const NODE_PROGRESS_TYPE: AttributeTag = scoped(NodeType::Progress, 3);

pub const NODE_CHECKBOX_SELECT: AttributeTag = scoped(NodeType::Checkbox, 0);
pub const NODE_CHECKBOX_SELECT_COLOR: AttributeTag = scoped(NodeType::Checkbox, 1);
pub const NODE_CHECKBOX_UNSELECT_COLOR: AttributeTag = scoped(NodeType::Checkbox, 2);
pub const NODE_CHECKBOX_MARK: AttributeTag = scoped(NodeType::Checkbox, 3);
pub const NODE_CHECKBOX_SHAPE: AttributeTag = scoped(NodeType::Checkbox, 4);

pub const NODE_XCOMPONENT_ID: AttributeTag = scoped(NodeType::XComponent, 0);
pub const NODE_XCOMPONENT_TYPE: AttributeTag = scoped(NodeType::XComponent, 1);
pub const NODE_XCOMPONENT_SURFACE_SIZE: AttributeTag = scoped(NodeType::XComponent, 2);

pub const NODE_SLIDER_BLOCK_COLOR: AttributeTag = scoped(NodeType::Slider, 0);
pub const NODE_SLIDER_TRACK_COLOR: AttributeTag = scoped(NodeType::Slider, 1);
pub const NODE_SLIDER_SELECTED_COLOR: AttributeTag = scoped(NodeType::Slider, 2);
pub const NODE_SLIDER_SHOW_STEPS: AttributeTag = scoped(NodeType::Slider, 3);
pub const NODE_SLIDER_BLOCK_STYLE: AttributeTag = scoped(NodeType::Slider, 4);
pub const NODE_SLIDER_VALUE: AttributeTag = scoped(NodeType::Slider, 5);
pub const NODE_SLIDER_MIN_VALUE: AttributeTag = scoped(NodeType::Slider, 6);
pub const NODE_SLIDER_MAX_VALUE: AttributeTag = scoped(NodeType::Slider, 7);
pub const NODE_SLIDER_STEP: AttributeTag = scoped(NodeType::Slider, 8);
pub const NODE_SLIDER_DIRECTION: AttributeTag = scoped(NodeType::Slider, 9);
pub const NODE_SLIDER_REVERSE: AttributeTag = scoped(NodeType::Slider, 10);
pub const NODE_SLIDER_STYLE: AttributeTag = scoped(NodeType::Slider, 11);

pub const NODE_RADIO_CHECKED: AttributeTag = scoped(NodeType::Radio, 0);
pub const NODE_RADIO_STYLE: AttributeTag = scoped(NodeType::Radio, 1);
pub const NODE_RADIO_VALUE: AttributeTag = scoped(NodeType::Radio, 2);
pub const NODE_RADIO_GROUP: AttributeTag = scoped(NodeType::Radio, 3);

// -----------------------------------------------------------------------------
// Containers
// -----------------------------------------------------------------------------

pub const NODE_STACK_ALIGN_CONTENT: AttributeTag = scoped(NodeType::Stack, 0);

pub const NODE_SWIPER_LOOP: AttributeTag = scoped(NodeType::Swiper, 0);
pub const NODE_SWIPER_AUTO_PLAY: AttributeTag = scoped(NodeType::Swiper, 1);
pub const NODE_SWIPER_SHOW_INDICATOR: AttributeTag = scoped(NodeType::Swiper, 2);
pub const NODE_SWIPER_INTERVAL: AttributeTag = scoped(NodeType::Swiper, 3);
pub const NODE_SWIPER_VERTICAL: AttributeTag = scoped(NodeType::Swiper, 4);
pub const NODE_SWIPER_DURATION: AttributeTag = scoped(NodeType::Swiper, 5);
pub const NODE_SWIPER_CURVE: AttributeTag = scoped(NodeType::Swiper, 6);
pub const NODE_SWIPER_ITEM_SPACE: AttributeTag = scoped(NodeType::Swiper, 7);
pub const NODE_SWIPER_INDEX: AttributeTag = scoped(NodeType::Swiper, 8);
pub const NODE_SWIPER_DISPLAY_COUNT: AttributeTag = scoped(NodeType::Swiper, 9);
pub const NODE_SWIPER_NODE_ADAPTER: AttributeTag = scoped(NodeType::Swiper, 10);
pub const NODE_SWIPER_CACHED_COUNT: AttributeTag = scoped(NodeType::Swiper, 11);

pub const NODE_SCROLL_BAR_DISPLAY_MODE: AttributeTag = scoped(NodeType::Scroll, 0);
pub const NODE_SCROLL_BAR_WIDTH: AttributeTag = scoped(NodeType::Scroll, 1);
pub const NODE_SCROLL_BAR_COLOR: AttributeTag = scoped(NodeType::Scroll, 2);
pub const NODE_SCROLL_SCROLL_DIRECTION: AttributeTag = scoped(NodeType::Scroll, 3);
pub const NODE_SCROLL_EDGE_EFFECT: AttributeTag = scoped(NodeType::Scroll, 4);
pub const NODE_SCROLL_ENABLE_SCROLL_INTERACTION: AttributeTag = scoped(NodeType::Scroll, 5);
pub const NODE_SCROLL_FRICTION: AttributeTag = scoped(NodeType::Scroll, 6);
pub const NODE_SCROLL_NESTED_SCROLL: AttributeTag = scoped(NodeType::Scroll, 7);
pub const NODE_SCROLL_OFFSET: AttributeTag = scoped(NodeType::Scroll, 8);
pub const NODE_SCROLL_EDGE: AttributeTag = scoped(NodeType::Scroll, 9);
pub const NODE_SCROLL_ENABLE_PAGING: AttributeTag = scoped(NodeType::Scroll, 10);

pub const NODE_LIST_DIRECTION: AttributeTag = scoped(NodeType::List, 0);
pub const NODE_LIST_STICKY: AttributeTag = scoped(NodeType::List, 1);
pub const NODE_LIST_SPACE: AttributeTag = scoped(NodeType::List, 2);
pub const NODE_LIST_NODE_ADAPTER: AttributeTag = scoped(NodeType::List, 3);
pub const NODE_LIST_CACHED_COUNT: AttributeTag = scoped(NodeType::List, 4);

pub const NODE_LIST_ITEM_SWIPE_ACTION: AttributeTag = scoped(NodeType::ListItem, 0);

pub const NODE_LIST_ITEM_GROUP_SET_HEADER: AttributeTag = scoped(NodeType::ListItemGroup, 0);
pub const NODE_LIST_ITEM_GROUP_SET_FOOTER: AttributeTag = scoped(NodeType::ListItemGroup, 1);
pub const NODE_LIST_ITEM_GROUP_SET_DIVIDER: AttributeTag = scoped(NodeType::ListItemGroup, 2);

pub const NODE_COLUMN_ALIGN_ITEMS: AttributeTag = scoped(NodeType::Column, 0);
pub const NODE_COLUMN_JUSTIFY_CONTENT: AttributeTag = scoped(NodeType::Column, 1);

pub const NODE_ROW_ALIGN_ITEMS: AttributeTag = scoped(NodeType::Row, 0);
pub const NODE_ROW_JUSTIFY_CONTENT: AttributeTag = scoped(NodeType::Row, 1);

pub const NODE_FLEX_OPTION: AttributeTag = scoped(NodeType::Flex, 0);

pub const NODE_REFRESH_REFRESHING: AttributeTag = scoped(NodeType::Refresh, 0);
pub const NODE_REFRESH_CONTENT: AttributeTag = scoped(NodeType::Refresh, 1);
pub const NODE_REFRESH_PULL_DOWN_RATIO: AttributeTag = scoped(NodeType::Refresh, 2);
pub const NODE_REFRESH_OFFSET: AttributeTag = scoped(NodeType::Refresh, 3);
pub const NODE_REFRESH_PULL_TO_REFRESH: AttributeTag = scoped(NodeType::Refresh, 4);

pub const NODE_WATER_FLOW_LAYOUT_DIRECTION: AttributeTag = scoped(NodeType::WaterFlow, 0);
pub const NODE_WATER_FLOW_COLUMN_TEMPLATE: AttributeTag = scoped(NodeType::WaterFlow, 1);
pub const NODE_WATER_FLOW_ROW_TEMPLATE: AttributeTag = scoped(NodeType::WaterFlow, 2);
pub const NODE_WATER_FLOW_COLUMN_GAP: AttributeTag = scoped(NodeType::WaterFlow, 3);
pub const NODE_WATER_FLOW_ROW_GAP: AttributeTag = scoped(NodeType::WaterFlow, 4);
pub const NODE_WATER_FLOW_SECTION_OPTION: AttributeTag = scoped(NodeType::WaterFlow, 5);
pub const NODE_WATER_FLOW_NODE_ADAPTER: AttributeTag = scoped(NodeType::WaterFlow, 6);
pub const NODE_WATER_FLOW_CACHED_COUNT: AttributeTag = scoped(NodeType::WaterFlow, 7);

pub const NODE_GRID_COLUMN_TEMPLATE: AttributeTag = scoped(NodeType::Grid, 0);
pub const NODE_GRID_ROW_TEMPLATE: AttributeTag = scoped(NodeType::Grid, 1);
pub const NODE_GRID_COLUMN_GAP: AttributeTag = scoped(NodeType::Grid, 2);
pub const NODE_GRID_ROW_GAP: AttributeTag = scoped(NodeType::Grid, 3);
pub const NODE_GRID_NODE_ADAPTER: AttributeTag = scoped(NodeType::Grid, 4);
pub const NODE_GRID_CACHED_COUNT: AttributeTag = scoped(NodeType::Grid, 5);

/// Adapter-binding tag for a host type, if the type can host an adapter.
pub fn adapter_tag_for(host: NodeType) -> Option<AttributeTag> {
    match host {
        NodeType::List => Some(NODE_LIST_NODE_ADAPTER),
        NodeType::Swiper => Some(NODE_SWIPER_NODE_ADAPTER),
        NodeType::WaterFlow => Some(NODE_WATER_FLOW_NODE_ADAPTER),
        NodeType::Grid => Some(NODE_GRID_NODE_ADAPTER),
        _ => None,
    }
}

/// Cached-count tag for an adapter host type.
pub fn cached_count_tag_for(host: NodeType) -> Option<AttributeTag> {
    match host {
        NodeType::List => Some(NODE_LIST_CACHED_COUNT),
        NodeType::Swiper => Some(NODE_SWIPER_CACHED_COUNT),
        NodeType::WaterFlow => Some(NODE_WATER_FLOW_CACHED_COUNT),
        NodeType::Grid => Some(NODE_GRID_CACHED_COUNT),
        _ => None,
    }
}

/// Whether a tag binds a lazy-loading adapter.
pub fn is_adapter_tag(tag: AttributeTag) -> bool {
    matches!(
        tag,
        NODE_LIST_NODE_ADAPTER
            | NODE_SWIPER_NODE_ADAPTER
            | NODE_WATER_FLOW_NODE_ADAPTER
            | NODE_GRID_NODE_ADAPTER
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_blocks() {
        assert_eq!(NODE_TEXT_CONTENT.raw(), 1000);
        assert_eq!(NODE_BUTTON_LABEL.raw(), 9000);
        assert_eq!(NODE_STACK_ALIGN_CONTENT.raw(), 1_000_000);
        assert_eq!(NODE_LIST_NODE_ADAPTER.raw(), 1_003_003);
    }

    #[test]
    fn test_owner() {
        assert_eq!(NODE_WIDTH.owner(), None);
        assert!(NODE_WIDTH.is_common());
        assert_eq!(NODE_FONT_SIZE.owner(), Some(NodeType::Text));
        assert_eq!(NODE_GRID_ROW_GAP.owner(), Some(NodeType::Grid));
        assert_eq!(AttributeTag(25_000).owner(), None);
    }

    #[test]
    fn test_adapter_tags() {
        for host in [NodeType::List, NodeType::Swiper, NodeType::WaterFlow, NodeType::Grid] {
            let tag = adapter_tag_for(host).unwrap();
            assert!(is_adapter_tag(tag));
            assert_eq!(tag.owner(), Some(host));
            assert!(cached_count_tag_for(host).is_some());
        }
        assert!(adapter_tag_for(NodeType::Column).is_none());
        assert!(!is_adapter_tag(NODE_WIDTH));
    }
}
