//! Gestures - recognizer descriptors bound to nodes.
//!
//! Recognition itself happens elsewhere. This module stores each gesture's
//! configuration (with the native parameter clamping applied at creation),
//! composes gestures into groups, binds them to nodes and routes recognizer
//! output to the gesture's event target.
//!
//! # Example
//!
//! ```ignore
//! use spark_node::gesture::{self, GestureDirection, GestureEventAction};
//!
//! let pan = gesture::create_pan_gesture(1, GestureDirection::HORIZONTAL, 5.0);
//! gesture::set_gesture_event_target(pan, GestureEventAction::UPDATE, |e| {
//!     println!("dx = {}", e.data.offset_x);
//! })?;
//! gesture::add_gesture_to_node(node, pan, GesturePriority::Normal, GestureMask::Normal)?;
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use bitflags::bitflags;

use crate::error::{Error, Result};
use crate::node::{self, with_node};
use crate::types::NodeHandle;

// =============================================================================
// Parameters
// =============================================================================

/// Direction mask for pan and swipe gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GestureDirection(pub u32);

impl GestureDirection {
    pub const NONE: Self = Self(0);
    pub const LEFT: Self = Self(1);
    pub const RIGHT: Self = Self(2);
    pub const HORIZONTAL: Self = Self(3);
    pub const UP: Self = Self(4);
    pub const DOWN: Self = Self(8);
    pub const VERTICAL: Self = Self(12);
    pub const ALL: Self = Self(15);

    const NAMED: [Self; 8] = [
        Self::NONE,
        Self::LEFT,
        Self::RIGHT,
        Self::HORIZONTAL,
        Self::UP,
        Self::DOWN,
        Self::VERTICAL,
        Self::ALL,
    ];

    /// Whether this is one of the named values. Other combinations of the bits
    /// are not accepted by the native API.
    pub fn is_named(self) -> bool {
        Self::NAMED.contains(&self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupGestureMode {
    Sequential,
    Parallel,
    Exclusive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePriority {
    Normal,
    Priority,
    Parallel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureMask {
    Normal,
    IgnoreInternal,
}

bitflags! {
    /// Recognizer phases a target wants to hear about.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct GestureEventAction: u32 {
        const ACCEPT = 0x01;
        const UPDATE = 0x02;
        const END = 0x04;
        const CANCEL = 0x08;
    }
}

const FINGERS_MIN: i32 = 1;
const FINGERS_MAX: i32 = 10;
const MULTI_FINGERS_MIN: i32 = 2;
const MULTI_FINGERS_MAX: i32 = 5;
const DEFAULT_PAN_DISTANCE: f64 = 5.0;
const DEFAULT_LONG_PRESS_MS: i32 = 500;
const DEFAULT_ROTATION_ANGLE: f64 = 1.0;
const DEFAULT_SWIPE_SPEED: f64 = 100.0;

fn clamp_fingers(fingers: i32, min: i32, max: i32) -> i32 {
    if (min..=max).contains(&fingers) { fingers } else { min }
}

/// Stored configuration of a gesture, after clamping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureConfig {
    Tap { count: i32, fingers: i32 },
    LongPress { fingers: i32, repeat: bool, duration_ms: i32 },
    Pan { fingers: i32, direction: GestureDirection, distance: f64 },
    Pinch { fingers: i32, distance: f64 },
    Rotation { fingers: i32, angle: f64 },
    Swipe { fingers: i32, directions: GestureDirection, speed: f64 },
    Group(GroupGestureMode),
}

// =============================================================================
// Events
// =============================================================================

/// Recognizer output.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureEventData {
    pub repeat: bool,
    pub velocity: f32,
    pub velocity_x: f32,
    pub velocity_y: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub angle: f32,
    pub scale: f32,
    pub center_x: f32,
    pub center_y: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct GestureEvent {
    pub gesture: GestureHandle,
    pub node: Option<NodeHandle>,
    pub action: GestureEventAction,
    pub data: GestureEventData,
}

pub type GestureTarget = dyn Fn(&GestureEvent);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GestureHandle(u32);

struct GestureState {
    config: GestureConfig,
    target: Option<(GestureEventAction, Rc<GestureTarget>)>,
    parent: Option<GestureHandle>,
    children: Vec<GestureHandle>,
    node: Option<NodeHandle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeGesture {
    pub gesture: GestureHandle,
    pub priority: GesturePriority,
    pub mask: GestureMask,
}

thread_local! {
    static GESTURES: RefCell<HashMap<u32, GestureState>> = RefCell::new(HashMap::new());
    static NODE_GESTURES: RefCell<HashMap<NodeHandle, Vec<NodeGesture>>> = RefCell::new(HashMap::new());
    static NEXT_GESTURE: RefCell<u32> = const { RefCell::new(0) };
}

fn with_gesture<R>(gesture: GestureHandle, f: impl FnOnce(&mut GestureState) -> R) -> Result<R> {
    GESTURES.with(|g| {
        g.borrow_mut()
            .get_mut(&gesture.0)
            .map(f)
            .ok_or_else(|| Error::StaleHandle(format!("{gesture:?}")))
    })
}

// =============================================================================
// Creation
// =============================================================================

fn create(config: GestureConfig) -> GestureHandle {
    let id = NEXT_GESTURE.with(|n| {
        let mut n = n.borrow_mut();
        let id = *n;
        *n += 1;
        id
    });
    GESTURES.with(|g| {
        g.borrow_mut().insert(
            id,
            GestureState {
                config,
                target: None,
                parent: None,
                children: Vec::new(),
                node: None,
            },
        )
    });
    log::debug!("created gesture {id}: {config:?}");
    GestureHandle(id)
}

pub fn create_tap_gesture(count: i32, fingers: i32) -> GestureHandle {
    create(GestureConfig::Tap {
        count: count.max(1),
        fingers: clamp_fingers(fingers, FINGERS_MIN, FINGERS_MAX),
    })
}

pub fn create_long_press_gesture(fingers: i32, repeat: bool, duration_ms: i32) -> GestureHandle {
    create(GestureConfig::LongPress {
        fingers: clamp_fingers(fingers, FINGERS_MIN, FINGERS_MAX),
        repeat,
        duration_ms: if duration_ms > 0 { duration_ms } else { DEFAULT_LONG_PRESS_MS },
    })
}

pub fn create_pan_gesture(fingers: i32, direction: GestureDirection, distance: f64) -> GestureHandle {
    create(GestureConfig::Pan {
        fingers: clamp_fingers(fingers, FINGERS_MIN, FINGERS_MAX),
        direction: if direction.is_named() { direction } else { GestureDirection::NONE },
        distance: if distance < 0.0 { DEFAULT_PAN_DISTANCE } else { distance },
    })
}

pub fn create_pinch_gesture(fingers: i32, distance: f64) -> GestureHandle {
    create(GestureConfig::Pinch {
        fingers: clamp_fingers(fingers, MULTI_FINGERS_MIN, MULTI_FINGERS_MAX),
        distance: if distance < 0.0 { DEFAULT_PAN_DISTANCE } else { distance },
    })
}

pub fn create_rotation_gesture(fingers: i32, angle: f64) -> GestureHandle {
    create(GestureConfig::Rotation {
        fingers: clamp_fingers(fingers, MULTI_FINGERS_MIN, MULTI_FINGERS_MAX),
        angle: if angle > 0.0 && angle <= 360.0 { angle } else { DEFAULT_ROTATION_ANGLE },
    })
}

pub fn create_swipe_gesture(fingers: i32, directions: GestureDirection, speed: f64) -> GestureHandle {
    create(GestureConfig::Swipe {
        fingers: clamp_fingers(fingers, FINGERS_MIN, FINGERS_MAX),
        directions: if directions.is_named() { directions } else { GestureDirection::ALL },
        speed: if speed > 0.0 { speed } else { DEFAULT_SWIPE_SPEED },
    })
}

pub fn create_group_gesture(mode: GroupGestureMode) -> GestureHandle {
    create(GestureConfig::Group(mode))
}

pub fn gesture_config(gesture: GestureHandle) -> Result<GestureConfig> {
    with_gesture(gesture, |g| g.config)
}

/// Release a gesture. It is unbound from its node and group; a group's
/// children are released from it but stay alive.
pub fn dispose_gesture(gesture: GestureHandle) -> Result<()> {
    let (parent, children, node) = with_gesture(gesture, |g| (g.parent, g.children.clone(), g.node))?;

    if let Some(parent) = parent {
        let _ = with_gesture(parent, |p| p.children.retain(|c| *c != gesture));
    }
    for child in children {
        let _ = with_gesture(child, |c| c.parent = None);
    }
    if let Some(node) = node {
        NODE_GESTURES.with(|ng| {
            if let Some(list) = ng.borrow_mut().get_mut(&node) {
                list.retain(|b| b.gesture != gesture);
            }
        });
    }

    GESTURES.with(|g| g.borrow_mut().remove(&gesture.0));
    log::debug!("disposed {gesture:?}");
    Ok(())
}

// =============================================================================
// Groups
// =============================================================================

pub fn add_child_gesture(group: GestureHandle, child: GestureHandle) -> Result<()> {
    if group == child {
        return Err(Error::param("gesture cannot contain itself"));
    }
    let is_group = with_gesture(group, |g| matches!(g.config, GestureConfig::Group(_)))?;
    if !is_group {
        return Err(Error::param(format!("{group:?} is not a group gesture")));
    }
    let (child_parent, child_node) = with_gesture(child, |c| (c.parent, c.node))?;
    if child_parent.is_some() || child_node.is_some() {
        return Err(Error::param(format!("{child:?} is already in use")));
    }

    // Reject cycles through nested groups.
    let mut cursor = Some(group);
    while let Some(g) = cursor {
        if g == child {
            return Err(Error::param("gesture group cycle"));
        }
        cursor = with_gesture(g, |s| s.parent)?;
    }

    with_gesture(child, |c| c.parent = Some(group))?;
    with_gesture(group, |g| g.children.push(child))?;
    Ok(())
}

pub fn remove_child_gesture(group: GestureHandle, child: GestureHandle) -> Result<()> {
    let parent = with_gesture(child, |c| c.parent)?;
    if parent != Some(group) {
        return Err(Error::param(format!("{child:?} is not a child of {group:?}")));
    }
    with_gesture(group, |g| g.children.retain(|c| *c != child))?;
    with_gesture(child, |c| c.parent = None)?;
    Ok(())
}

pub fn get_child_gestures(group: GestureHandle) -> Result<Vec<GestureHandle>> {
    with_gesture(group, |g| g.children.clone())
}

// =============================================================================
// Targets
// =============================================================================

/// Route recognizer output for the phases in `actions` to `target`.
pub fn set_gesture_event_target<F>(gesture: GestureHandle, actions: GestureEventAction, target: F) -> Result<()>
where
    F: Fn(&GestureEvent) + 'static,
{
    with_gesture(gesture, |g| g.target = Some((actions, Rc::new(target))))
}

/// Deliver recognizer output for `gesture`. Returns whether a target ran.
pub fn fire_gesture_event(gesture: GestureHandle, action: GestureEventAction, data: GestureEventData) -> Result<bool> {
    if action.bits().count_ones() != 1 {
        return Err(Error::param(format!("fire needs exactly one action, got {action:?}")));
    }

    let (target, mut node, mut parent) = with_gesture(gesture, |g| (g.target.clone(), g.node, g.parent))?;
    // Gestures inside a group report the node the outermost group is bound to.
    while node.is_none() {
        let Some(p) = parent else { break };
        (node, parent) = with_gesture(p, |g| (g.node, g.parent))?;
    }

    let Some((actions, target)) = target else {
        return Ok(false);
    };
    if !actions.contains(action) {
        return Ok(false);
    }

    log::trace!("gesture {gesture:?} {action:?} on {node:?}");
    target(&GestureEvent { gesture, node, action, data });
    Ok(true)
}

// =============================================================================
// Node Binding
// =============================================================================

pub fn add_gesture_to_node(
    node: NodeHandle,
    gesture: GestureHandle,
    priority: GesturePriority,
    mask: GestureMask,
) -> Result<()> {
    if node::is_builder_node(node)? {
        return Err(Error::BuilderNode);
    }
    let (parent, bound) = with_gesture(gesture, |g| (g.parent, g.node))?;
    if parent.is_some() {
        return Err(Error::param(format!("{gesture:?} belongs to a group")));
    }
    if bound.is_some() {
        return Err(Error::param(format!("{gesture:?} is already bound")));
    }

    with_gesture(gesture, |g| g.node = Some(node))?;
    NODE_GESTURES.with(|ng| {
        ng.borrow_mut().entry(node).or_default().push(NodeGesture { gesture, priority, mask });
    });
    log::debug!("bound {gesture:?} to {node}");
    Ok(())
}

pub fn remove_gesture_from_node(node: NodeHandle, gesture: GestureHandle) -> Result<()> {
    if node::is_builder_node(node)? {
        return Err(Error::BuilderNode);
    }
    let bound = with_gesture(gesture, |g| g.node)?;
    if bound != Some(node) {
        return Err(Error::param(format!("{gesture:?} is not bound to {node}")));
    }
    with_gesture(gesture, |g| g.node = None)?;
    NODE_GESTURES.with(|ng| {
        if let Some(list) = ng.borrow_mut().get_mut(&node) {
            list.retain(|b| b.gesture != gesture);
        }
    });
    Ok(())
}

/// Gestures bound to `node`, in binding order.
pub fn get_node_gestures(node: NodeHandle) -> Result<Vec<NodeGesture>> {
    with_node(node, |_| ())?;
    Ok(NODE_GESTURES.with(|ng| ng.borrow().get(&node).cloned().unwrap_or_default()))
}

/// Unbind every gesture from a disposed node. The gestures stay alive.
pub(crate) fn forget_node(node: NodeHandle) {
    let bound = NODE_GESTURES.with(|ng| ng.borrow_mut().remove(&node));
    for binding in bound.unwrap_or_default() {
        let _ = with_gesture(binding.gesture, |g| g.node = None);
    }
}

/// Reset all gesture state (for testing).
pub fn reset_gestures() {
    GESTURES.with(|g| g.borrow_mut().clear());
    NODE_GESTURES.with(|ng| ng.borrow_mut().clear());
    NEXT_GESTURE.with(|n| *n.borrow_mut() = 0);
}
