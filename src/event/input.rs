//! UI Input Events - touch, mouse, axis and key payloads.
//!
//! Carried by input-typed node events (`NODE_TOUCH_EVENT`, `NODE_ON_MOUSE`,
//! ...). The accessor functions here use the side-channel error idiom: they
//! return a plain value (0 on failure) and record the outcome, readable with
//! [`get_latest_status`](crate::get_latest_status).
//!
//! # API
//!
//! - `get_event_type`, `get_event_time`, `get_source_type`, `get_tool_type`
//! - `get_pointer_count`, `get_pointer_id`
//! - `get_x`, `get_y`, `get_window_x`, `get_window_y`, `get_display_x`,
//!   `get_display_y`, `get_pressure`
//! - `get_touch_action`, `get_mouse_button`, `get_mouse_action`
//! - `get_axis_vertical_value`, `get_axis_horizontal_value`, `get_axis_pinch_scale`
//! - `get_key_code`, `get_key_action`, `get_modifiers`

use crate::error::{Error, Result, report};

// =============================================================================
// TYPES
// =============================================================================

/// Which variant an input event is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum InputEventType {
    Unknown = 0,
    Touch = 1,
    Axis = 2,
    Mouse = 3,
    Key = 4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum SourceType {
    #[default]
    Unknown = 0,
    Mouse = 1,
    TouchScreen = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum ToolType {
    #[default]
    Unknown = 0,
    Finger = 1,
    Pen = 2,
    Mouse = 3,
    Touchpad = 4,
    Joystick = 5,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum TouchAction {
    Cancel = 0,
    Down = 1,
    Move = 2,
    Up = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum MouseAction {
    Unknown = 0,
    Press = 1,
    Release = 2,
    Move = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum MouseButton {
    #[default]
    None = 0,
    Left = 1,
    Right = 2,
    Middle = 3,
    Back = 4,
    Forward = 5,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum KeyAction {
    Down = 0,
    Up = 1,
}

bitflags::bitflags! {
    /// Modifier keys held while the event fired.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u32 {
        const CTRL = 1;
        const SHIFT = 1 << 1;
        const ALT = 1 << 2;
        const FN = 1 << 3;
    }
}

/// One contact point (px).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerInfo {
    pub id: i32,
    /// Relative to the node that received the event.
    pub x: f32,
    pub y: f32,
    pub window_x: f32,
    pub window_y: f32,
    pub display_x: f32,
    pub display_y: f32,
    pub pressure: f32,
}

impl PointerInfo {
    /// Pointer at `(x, y)`, identical in all coordinate spaces.
    pub fn at(id: i32, x: f32, y: f32) -> Self {
        Self {
            id,
            x,
            y,
            window_x: x,
            window_y: y,
            display_x: x,
            display_y: y,
            pressure: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TouchEvent {
    pub action: TouchAction,
    pub pointers: Vec<PointerInfo>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MouseEvent {
    pub action: MouseAction,
    pub button: MouseButton,
    pub pointer: PointerInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisEvent {
    pub vertical: f64,
    pub horizontal: f64,
    pub pinch_scale: f64,
    pub pointer: PointerInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyEvent {
    pub code: i32,
    pub action: KeyAction,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputKind {
    Touch(TouchEvent),
    Mouse(MouseEvent),
    Axis(AxisEvent),
    Key(KeyEvent),
}

/// An input event as delivered in a node event payload.
#[derive(Debug, Clone, PartialEq)]
pub struct UiInputEvent {
    /// Nanoseconds since boot.
    pub time: i64,
    pub source: SourceType,
    pub tool: ToolType,
    pub modifiers: Modifiers,
    pub kind: InputKind,
}

impl UiInputEvent {
    pub fn new(time: i64, kind: InputKind) -> Self {
        let (source, tool) = match kind {
            InputKind::Touch(_) => (SourceType::TouchScreen, ToolType::Finger),
            InputKind::Mouse(_) | InputKind::Axis(_) => (SourceType::Mouse, ToolType::Mouse),
            InputKind::Key(_) => (SourceType::Unknown, ToolType::Unknown),
        };
        Self {
            time,
            source,
            tool,
            modifiers: Modifiers::empty(),
            kind,
        }
    }

    pub fn touch(time: i64, action: TouchAction, pointers: Vec<PointerInfo>) -> Self {
        Self::new(time, InputKind::Touch(TouchEvent { action, pointers }))
    }

    pub fn mouse(time: i64, action: MouseAction, button: MouseButton, pointer: PointerInfo) -> Self {
        Self::new(time, InputKind::Mouse(MouseEvent { action, button, pointer }))
    }

    pub fn axis(time: i64, vertical: f64, horizontal: f64, pointer: PointerInfo) -> Self {
        Self::new(
            time,
            InputKind::Axis(AxisEvent {
                vertical,
                horizontal,
                pinch_scale: 1.0,
                pointer,
            }),
        )
    }

    pub fn key(time: i64, code: i32, action: KeyAction) -> Self {
        Self::new(time, InputKind::Key(KeyEvent { code, action }))
    }

    pub fn event_type(&self) -> InputEventType {
        match self.kind {
            InputKind::Touch(_) => InputEventType::Touch,
            InputKind::Axis(_) => InputEventType::Axis,
            InputKind::Mouse(_) => InputEventType::Mouse,
            InputKind::Key(_) => InputEventType::Key,
        }
    }

    fn pointers(&self) -> &[PointerInfo] {
        match &self.kind {
            InputKind::Touch(t) => &t.pointers,
            InputKind::Mouse(m) => std::slice::from_ref(&m.pointer),
            InputKind::Axis(a) => std::slice::from_ref(&a.pointer),
            InputKind::Key(_) => &[],
        }
    }

    fn pointer(&self, index: u32) -> Result<&PointerInfo> {
        let pointers = self.pointers();
        pointers.get(index as usize).ok_or(Error::IndexInvalid {
            index: index as i64,
            count: pointers.len() as u32,
        })
    }
}

// =============================================================================
// ACCESSORS (side-channel status)
// =============================================================================

fn wrong_kind(expected: &str, event: &UiInputEvent) -> Error {
    Error::param(format!("expected {expected} event, got {:?}", event.event_type()))
}

pub fn get_event_type(event: &UiInputEvent) -> InputEventType {
    report(Ok(event.event_type()), InputEventType::Unknown)
}

pub fn get_event_time(event: &UiInputEvent) -> i64 {
    report(Ok(event.time), 0)
}

pub fn get_source_type(event: &UiInputEvent) -> SourceType {
    report(Ok(event.source), SourceType::Unknown)
}

pub fn get_tool_type(event: &UiInputEvent) -> ToolType {
    report(Ok(event.tool), ToolType::Unknown)
}

pub fn get_modifiers(event: &UiInputEvent) -> Modifiers {
    report(Ok(event.modifiers), Modifiers::empty())
}

/// Number of contact points. Key events report 0 with a PARAM_INVALID status.
pub fn get_pointer_count(event: &UiInputEvent) -> u32 {
    let result = match event.kind {
        InputKind::Key(_) => Err(wrong_kind("pointer", event)),
        _ => Ok(event.pointers().len() as u32),
    };
    report(result, 0)
}

pub fn get_pointer_id(event: &UiInputEvent, index: u32) -> i32 {
    report(event.pointer(index).map(|p| p.id), 0)
}

pub fn get_x(event: &UiInputEvent, index: u32) -> f32 {
    report(event.pointer(index).map(|p| p.x), 0.0)
}

pub fn get_y(event: &UiInputEvent, index: u32) -> f32 {
    report(event.pointer(index).map(|p| p.y), 0.0)
}

pub fn get_window_x(event: &UiInputEvent, index: u32) -> f32 {
    report(event.pointer(index).map(|p| p.window_x), 0.0)
}

pub fn get_window_y(event: &UiInputEvent, index: u32) -> f32 {
    report(event.pointer(index).map(|p| p.window_y), 0.0)
}

pub fn get_display_x(event: &UiInputEvent, index: u32) -> f32 {
    report(event.pointer(index).map(|p| p.display_x), 0.0)
}

pub fn get_display_y(event: &UiInputEvent, index: u32) -> f32 {
    report(event.pointer(index).map(|p| p.display_y), 0.0)
}

pub fn get_pressure(event: &UiInputEvent, index: u32) -> f32 {
    report(event.pointer(index).map(|p| p.pressure), 0.0)
}

/// Touch action, or `None` with a PARAM_INVALID status for non-touch events.
pub fn get_touch_action(event: &UiInputEvent) -> Option<TouchAction> {
    let result = match &event.kind {
        InputKind::Touch(t) => Ok(Some(t.action)),
        _ => Err(wrong_kind("touch", event)),
    };
    report(result, None)
}

pub fn get_mouse_button(event: &UiInputEvent) -> MouseButton {
    let result = match &event.kind {
        InputKind::Mouse(m) => Ok(m.button),
        _ => Err(wrong_kind("mouse", event)),
    };
    report(result, MouseButton::None)
}

pub fn get_mouse_action(event: &UiInputEvent) -> MouseAction {
    let result = match &event.kind {
        InputKind::Mouse(m) => Ok(m.action),
        _ => Err(wrong_kind("mouse", event)),
    };
    report(result, MouseAction::Unknown)
}

fn axis(event: &UiInputEvent) -> Result<&AxisEvent> {
    match &event.kind {
        InputKind::Axis(a) => Ok(a),
        _ => Err(wrong_kind("axis", event)),
    }
}

pub fn get_axis_vertical_value(event: &UiInputEvent) -> f64 {
    report(axis(event).map(|a| a.vertical), 0.0)
}

pub fn get_axis_horizontal_value(event: &UiInputEvent) -> f64 {
    report(axis(event).map(|a| a.horizontal), 0.0)
}

pub fn get_axis_pinch_scale(event: &UiInputEvent) -> f64 {
    report(axis(event).map(|a| a.pinch_scale), 0.0)
}

pub fn get_key_code(event: &UiInputEvent) -> i32 {
    let result = match &event.kind {
        InputKind::Key(k) => Ok(k.code),
        _ => Err(wrong_kind("key", event)),
    };
    report(result, 0)
}

pub fn get_key_action(event: &UiInputEvent) -> Option<KeyAction> {
    let result = match &event.kind {
        InputKind::Key(k) => Ok(Some(k.action)),
        _ => Err(wrong_kind("key", event)),
    };
    report(result, None)
}
