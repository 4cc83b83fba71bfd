//! Node event vocabulary and the event value handed to receivers.
//!
//! Event tags share the partitioning of attribute tags: common events live in
//! `[0, 1000)`, a node type's own events start at `type * 1000`.

use std::fmt;

use crate::attribute::NumberValue;
use crate::types::{ExternalRef, NodeHandle, NodeType, Scope};

use super::input::UiInputEvent;

// =============================================================================
// Event Tags
// =============================================================================

/// Integer selecting which node event a registration refers to.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeEventType(pub i32);

impl NodeEventType {
    pub const fn raw(self) -> i32 {
        self.0
    }
}

impl fmt::Debug for NodeEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match lookup(*self) {
            Some(shape) => write!(f, "{}({})", shape.name, self.0),
            None => write!(f, "NodeEventType({})", self.0),
        }
    }
}

const fn scoped(t: NodeType, offset: i32) -> NodeEventType {
    NodeEventType(t.scope_base() + offset)
}

pub const NODE_TOUCH_EVENT: NodeEventType = NodeEventType(0);
pub const NODE_EVENT_ON_APPEAR: NodeEventType = NodeEventType(1);
pub const NODE_EVENT_ON_DISAPPEAR: NodeEventType = NodeEventType(2);
pub const NODE_EVENT_ON_AREA_CHANGE: NodeEventType = NodeEventType(3);
pub const NODE_ON_FOCUS: NodeEventType = NodeEventType(4);
pub const NODE_ON_BLUR: NodeEventType = NodeEventType(5);
pub const NODE_ON_CLICK: NodeEventType = NodeEventType(6);
pub const NODE_ON_TOUCH_INTERCEPT: NodeEventType = NodeEventType(7);
pub const NODE_EVENT_ON_VISIBLE_AREA_CHANGE: NodeEventType = NodeEventType(8);
pub const NODE_ON_HOVER: NodeEventType = NodeEventType(9);
pub const NODE_ON_MOUSE: NodeEventType = NodeEventType(10);
pub const NODE_EVENT_ON_ATTACH: NodeEventType = NodeEventType(11);
pub const NODE_EVENT_ON_DETACH: NodeEventType = NodeEventType(12);

pub const NODE_IMAGE_ON_COMPLETE: NodeEventType = scoped(NodeType::Image, 0);
pub const NODE_IMAGE_ON_ERROR: NodeEventType = scoped(NodeType::Image, 1);
pub const NODE_TOGGLE_ON_CHANGE: NodeEventType = scoped(NodeType::Toggle, 0);
pub const NODE_TEXT_INPUT_ON_CHANGE: NodeEventType = scoped(NodeType::TextInput, 0);
pub const NODE_TEXT_INPUT_ON_SUBMIT: NodeEventType = scoped(NodeType::TextInput, 1);
pub const NODE_TEXT_INPUT_ON_CUT: NodeEventType = scoped(NodeType::TextInput, 2);
pub const NODE_TEXT_INPUT_ON_PASTE: NodeEventType = scoped(NodeType::TextInput, 3);
pub const NODE_TEXT_AREA_ON_CHANGE: NodeEventType = scoped(NodeType::TextArea, 0);
pub const NODE_CHECKBOX_EVENT_ON_CHANGE: NodeEventType = scoped(NodeType::Checkbox, 0);
pub const NODE_DATE_PICKER_EVENT_ON_DATE_CHANGE: NodeEventType = scoped(NodeType::DatePicker, 0);
pub const NODE_TIME_PICKER_EVENT_ON_CHANGE: NodeEventType = scoped(NodeType::TimePicker, 0);
pub const NODE_TEXT_PICKER_EVENT_ON_CHANGE: NodeEventType = scoped(NodeType::TextPicker, 0);
pub const NODE_CALENDAR_PICKER_EVENT_ON_CHANGE: NodeEventType = scoped(NodeType::CalendarPicker, 0);
pub const NODE_SLIDER_EVENT_ON_CHANGE: NodeEventType = scoped(NodeType::Slider, 0);
pub const NODE_RADIO_EVENT_ON_CHANGE: NodeEventType = scoped(NodeType::Radio, 0);
pub const NODE_SWIPER_EVENT_ON_CHANGE: NodeEventType = scoped(NodeType::Swiper, 0);
pub const NODE_SWIPER_EVENT_ON_ANIMATION_START: NodeEventType = scoped(NodeType::Swiper, 1);
pub const NODE_SWIPER_EVENT_ON_ANIMATION_END: NodeEventType = scoped(NodeType::Swiper, 2);
pub const NODE_SCROLL_EVENT_ON_SCROLL: NodeEventType = scoped(NodeType::Scroll, 0);
pub const NODE_SCROLL_EVENT_ON_SCROLL_FRAME_BEGIN: NodeEventType = scoped(NodeType::Scroll, 1);
pub const NODE_SCROLL_EVENT_ON_SCROLL_START: NodeEventType = scoped(NodeType::Scroll, 2);
pub const NODE_SCROLL_EVENT_ON_SCROLL_STOP: NodeEventType = scoped(NodeType::Scroll, 3);
pub const NODE_SCROLL_EVENT_ON_SCROLL_EDGE: NodeEventType = scoped(NodeType::Scroll, 4);
pub const NODE_LIST_ON_SCROLL_INDEX: NodeEventType = scoped(NodeType::List, 0);
pub const NODE_REFRESH_STATE_CHANGE: NodeEventType = scoped(NodeType::Refresh, 0);
pub const NODE_REFRESH_ON_REFRESH: NodeEventType = scoped(NodeType::Refresh, 1);
pub const NODE_WATER_FLOW_ON_DID_SCROLL: NodeEventType = scoped(NodeType::WaterFlow, 0);

// =============================================================================
// Event Shapes
// =============================================================================

/// Which payload variant an event kind carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Component,
    String,
    Input,
}

#[derive(Debug, Clone, Copy)]
pub struct EventShape {
    pub kind: NodeEventType,
    pub name: &'static str,
    pub scope: Scope,
    pub payload: PayloadKind,
}

const SCROLLABLE: Scope = Scope::Types(&[NodeType::Scroll, NodeType::List, NodeType::WaterFlow, NodeType::Grid]);

macro_rules! event {
    ($kind:ident, $scope:expr, $payload:ident) => {
        EventShape {
            kind: $kind,
            name: stringify!($kind),
            scope: $scope,
            payload: PayloadKind::$payload,
        }
    };
}

const fn only(t: &'static [NodeType]) -> Scope {
    Scope::Types(t)
}

static EVENTS: &[EventShape] = &[
    event!(NODE_TOUCH_EVENT, Scope::Common, Input),
    event!(NODE_EVENT_ON_APPEAR, Scope::Common, Component),
    event!(NODE_EVENT_ON_DISAPPEAR, Scope::Common, Component),
    event!(NODE_EVENT_ON_AREA_CHANGE, Scope::Common, Component),
    event!(NODE_ON_FOCUS, Scope::Common, Component),
    event!(NODE_ON_BLUR, Scope::Common, Component),
    event!(NODE_ON_CLICK, Scope::Common, Component),
    event!(NODE_ON_TOUCH_INTERCEPT, Scope::Common, Input),
    event!(NODE_EVENT_ON_VISIBLE_AREA_CHANGE, Scope::Common, Component),
    event!(NODE_ON_HOVER, Scope::Common, Component),
    event!(NODE_ON_MOUSE, Scope::Common, Input),
    event!(NODE_EVENT_ON_ATTACH, Scope::Common, Component),
    event!(NODE_EVENT_ON_DETACH, Scope::Common, Component),
    event!(NODE_IMAGE_ON_COMPLETE, only(&[NodeType::Image]), Component),
    event!(NODE_IMAGE_ON_ERROR, only(&[NodeType::Image]), Component),
    event!(NODE_TOGGLE_ON_CHANGE, only(&[NodeType::Toggle]), Component),
    event!(NODE_TEXT_INPUT_ON_CHANGE, only(&[NodeType::TextInput]), String),
    event!(NODE_TEXT_INPUT_ON_SUBMIT, only(&[NodeType::TextInput]), Component),
    event!(NODE_TEXT_INPUT_ON_CUT, only(&[NodeType::TextInput]), String),
    event!(NODE_TEXT_INPUT_ON_PASTE, only(&[NodeType::TextInput]), String),
    event!(NODE_TEXT_AREA_ON_CHANGE, only(&[NodeType::TextArea]), String),
    event!(NODE_CHECKBOX_EVENT_ON_CHANGE, only(&[NodeType::Checkbox]), Component),
    event!(NODE_DATE_PICKER_EVENT_ON_DATE_CHANGE, only(&[NodeType::DatePicker]), Component),
    event!(NODE_TIME_PICKER_EVENT_ON_CHANGE, only(&[NodeType::TimePicker]), Component),
    event!(NODE_TEXT_PICKER_EVENT_ON_CHANGE, only(&[NodeType::TextPicker]), Component),
    event!(NODE_CALENDAR_PICKER_EVENT_ON_CHANGE, only(&[NodeType::CalendarPicker]), Component),
    event!(NODE_SLIDER_EVENT_ON_CHANGE, only(&[NodeType::Slider]), Component),
    event!(NODE_RADIO_EVENT_ON_CHANGE, only(&[NodeType::Radio]), Component),
    event!(NODE_SWIPER_EVENT_ON_CHANGE, only(&[NodeType::Swiper]), Component),
    event!(NODE_SWIPER_EVENT_ON_ANIMATION_START, only(&[NodeType::Swiper]), Component),
    event!(NODE_SWIPER_EVENT_ON_ANIMATION_END, only(&[NodeType::Swiper]), Component),
    event!(NODE_SCROLL_EVENT_ON_SCROLL, SCROLLABLE, Component),
    event!(NODE_SCROLL_EVENT_ON_SCROLL_FRAME_BEGIN, SCROLLABLE, Component),
    event!(NODE_SCROLL_EVENT_ON_SCROLL_START, SCROLLABLE, Component),
    event!(NODE_SCROLL_EVENT_ON_SCROLL_STOP, SCROLLABLE, Component),
    event!(NODE_SCROLL_EVENT_ON_SCROLL_EDGE, SCROLLABLE, Component),
    event!(NODE_LIST_ON_SCROLL_INDEX, only(&[NodeType::List]), Component),
    event!(NODE_REFRESH_STATE_CHANGE, only(&[NodeType::Refresh]), Component),
    event!(NODE_REFRESH_ON_REFRESH, only(&[NodeType::Refresh]), Component),
    event!(NODE_WATER_FLOW_ON_DID_SCROLL, only(&[NodeType::WaterFlow]), Component),
];

/// Shape registered for `kind`, if known to this build.
pub fn lookup(kind: NodeEventType) -> Option<&'static EventShape> {
    EVENTS
        .binary_search_by_key(&kind, |shape| shape.kind)
        .ok()
        .map(|i| &EVENTS[i])
}

/// Shape for `kind` if nodes of `node_type` can fire it.
pub fn lookup_for(kind: NodeEventType, node_type: NodeType) -> Option<&'static EventShape> {
    lookup(kind).filter(|shape| shape.scope.contains(node_type))
}

// =============================================================================
// Event Values
// =============================================================================

/// Slot count of a component event.
pub const COMPONENT_EVENT_SLOTS: usize = 12;

/// Fixed-size numeric payload of component events.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ComponentEventData {
    pub data: [NumberValue; COMPONENT_EVENT_SLOTS],
}

impl ComponentEventData {
    /// Payload from leading slots; the rest stay zero. Extra values are dropped.
    pub fn from_slice(values: &[NumberValue]) -> Self {
        let mut data = [NumberValue::default(); COMPONENT_EVENT_SLOTS];
        for (slot, value) in data.iter_mut().zip(values) {
            *slot = *value;
        }
        Self { data }
    }
}

/// Event payload, borrowed from the producer for the duration of dispatch.
#[derive(Debug, Clone, Copy)]
pub enum EventPayload<'a> {
    Component(&'a ComponentEventData),
    String(&'a str),
    Input(&'a UiInputEvent),
}

impl EventPayload<'_> {
    pub fn kind(&self) -> PayloadKind {
        match self {
            Self::Component(_) => PayloadKind::Component,
            Self::String(_) => PayloadKind::String,
            Self::Input(_) => PayloadKind::Input,
        }
    }
}

/// One fired event as seen by a receiver.
///
/// Everything borrowed here belongs to the producer and is gone once dispatch
/// returns. Receivers copy out what they need.
#[derive(Debug, Clone, Copy)]
pub struct NodeEvent<'a> {
    pub kind: NodeEventType,
    pub node: NodeHandle,
    /// Target id supplied when the event was registered.
    pub target_id: i32,
    /// User data supplied when the event was registered.
    pub user_data: Option<ExternalRef>,
    pub payload: EventPayload<'a>,
}

impl<'a> NodeEvent<'a> {
    pub fn component(&self) -> Option<&'a ComponentEventData> {
        match self.payload {
            EventPayload::Component(data) => Some(data),
            _ => None,
        }
    }

    pub fn string(&self) -> Option<&'a str> {
        match self.payload {
            EventPayload::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn input(&self) -> Option<&'a UiInputEvent> {
        match self.payload {
            EventPayload::Input(event) => Some(event),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_table_sorted() {
        for pair in EVENTS.windows(2) {
            assert!(pair[0].kind < pair[1].kind, "{} out of order", pair[1].name);
        }
    }

    #[test]
    fn test_event_tags_in_owner_block() {
        for shape in EVENTS {
            let owner = NodeType::from_raw(shape.kind.raw() / crate::types::MAX_NODE_SCOPE_NUM);
            match shape.scope {
                Scope::Common => assert!(shape.kind.raw() < 1000),
                Scope::Types(_) => assert!(shape.scope.contains(owner.unwrap()), "{}", shape.name),
            }
        }
    }

    #[test]
    fn test_lookup_for_scope() {
        assert!(lookup_for(NODE_ON_CLICK, NodeType::Button).is_some());
        assert!(lookup_for(NODE_TEXT_INPUT_ON_CHANGE, NodeType::TextInput).is_some());
        assert!(lookup_for(NODE_TEXT_INPUT_ON_CHANGE, NodeType::Button).is_none());
        assert!(lookup_for(NODE_SCROLL_EVENT_ON_SCROLL, NodeType::List).is_some());
        assert!(lookup(NodeEventType(999)).is_none());
        assert_eq!(format!("{:?}", NODE_ON_CLICK), "NODE_ON_CLICK(6)");
    }

    #[test]
    fn test_component_data_from_slice() {
        let data = ComponentEventData::from_slice(&[NumberValue::i32(3), NumberValue::f32(1.5)]);
        assert_eq!(data.data[0].as_i32(), 3);
        assert_eq!(data.data[1].as_f32(), 1.5);
        assert_eq!(data.data[11].bits(), 0);
    }
}
