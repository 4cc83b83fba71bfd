//! Shape table - tag → expected payload layout.
//!
//! Every attribute item is checked against its tag's entry before it is
//! stored: numeric slot count, per-slot value rules, and whether a string or
//! object must, may, or must not be present. Defaults also live here, not on
//! the nodes.

use crate::types::{DirtyFlags, NodeType, Scope};

use super::item::{AttributeItem, NumberValue};
use super::tag::{self, AttributeTag};

// =============================================================================
// Shape Vocabulary
// =============================================================================

/// How a numeric slot is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    I32,
    U32,
    F32,
}

/// Value rule applied to one slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Check {
    Any,
    NonNegative,
    Positive,
    /// 0 or 1.
    Bool,
    /// Inclusive enum range.
    Enum(i32, i32),
    /// `[0.0, 1.0]`.
    UnitInterval,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub kind: SlotKind,
    pub check: Check,
}

impl Slot {
    pub const fn new(kind: SlotKind, check: Check) -> Self {
        Self { kind, check }
    }
}

/// Accepted numeric slot counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    OneOf(&'static [usize]),
    /// Inclusive.
    Range(usize, usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(&self, n: usize) -> bool {
        match *self {
            Self::Exact(k) => n == k,
            Self::OneOf(ks) => ks.contains(&n),
            Self::Range(lo, hi) => (lo..=hi).contains(&n),
            Self::AtLeast(k) => n >= k,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Forbidden,
    Optional,
    Required,
}

impl Presence {
    fn accepts(self, present: bool) -> bool {
        match self {
            Self::Forbidden => !present,
            Self::Optional => true,
            Self::Required => present,
        }
    }
}

/// Documented value reported when nothing is stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    /// No default; reads of an unset attribute report absence.
    None,
    Numbers(&'static [NumberValue]),
    Str(&'static str),
}

// =============================================================================
// AttributeShape
// =============================================================================

#[derive(Debug, Clone, Copy)]
pub struct AttributeShape {
    pub tag: AttributeTag,
    pub name: &'static str,
    pub scope: Scope,
    pub arity: Arity,
    /// Rule for slot `i`; slots past the end reuse the last rule.
    pub slots: &'static [Slot],
    pub string: Presence,
    pub object: Presence,
    pub default: DefaultValue,
    pub dirty: DirtyFlags,
}

impl AttributeShape {
    const fn numeric(
        tag: AttributeTag,
        name: &'static str,
        scope: Scope,
        arity: Arity,
        slots: &'static [Slot],
    ) -> Self {
        Self {
            tag,
            name,
            scope,
            arity,
            slots,
            string: Presence::Forbidden,
            object: Presence::Forbidden,
            default: DefaultValue::None,
            dirty: DirtyFlags::NEED_RENDER,
        }
    }

    const fn text(tag: AttributeTag, name: &'static str, scope: Scope) -> Self {
        Self {
            tag,
            name,
            scope,
            arity: Arity::Exact(0),
            slots: &[],
            string: Presence::Required,
            object: Presence::Forbidden,
            default: DefaultValue::None,
            dirty: DirtyFlags::NEED_MEASURE,
        }
    }

    const fn handle(tag: AttributeTag, name: &'static str, scope: Scope) -> Self {
        Self {
            tag,
            name,
            scope,
            arity: Arity::Exact(0),
            slots: &[],
            string: Presence::Forbidden,
            object: Presence::Required,
            default: DefaultValue::None,
            dirty: DirtyFlags::NEED_MEASURE,
        }
    }

    const fn default_numbers(mut self, values: &'static [NumberValue]) -> Self {
        self.default = DefaultValue::Numbers(values);
        self
    }

    const fn default_str(mut self, s: &'static str) -> Self {
        self.default = DefaultValue::Str(s);
        self
    }

    const fn with_string(mut self, presence: Presence) -> Self {
        self.string = presence;
        self
    }

    const fn with_object(mut self, presence: Presence) -> Self {
        self.object = presence;
        self
    }

    const fn layout(mut self) -> Self {
        self.dirty = DirtyFlags::NEED_MEASURE;
        self
    }

    /// Rule for numeric slot `i`.
    pub fn slot(&self, i: usize) -> Option<Slot> {
        self.slots.get(i).or(self.slots.last()).copied()
    }

    /// Check an item against this shape. The message names the first problem.
    pub fn validate(&self, item: &AttributeItem) -> Result<(), String> {
        if !self.arity.accepts(item.value.len()) {
            return Err(format!(
                "{} expects {:?} numeric slots, got {}",
                self.name,
                self.arity,
                item.value.len()
            ));
        }
        if !self.string.accepts(item.string.is_some()) {
            return Err(format!("{}: string is {:?}", self.name, self.string));
        }
        if !self.object.accepts(item.object.is_some()) {
            return Err(format!("{}: object is {:?}", self.name, self.object));
        }
        for (i, value) in item.value.iter().enumerate() {
            let Some(slot) = self.slot(i) else {
                return Err(format!("{}: no rule for slot {i}", self.name));
            };
            if !check_slot(slot, *value) {
                return Err(format!(
                    "{}: slot {i} ({}) fails {:?}",
                    self.name,
                    read_slot(slot.kind, *value),
                    slot.check
                ));
            }
        }
        Ok(())
    }

    /// The default as an item, if this tag documents one.
    pub fn default_item(&self) -> Option<AttributeItem> {
        match self.default {
            DefaultValue::None => None,
            DefaultValue::Numbers(values) => Some(AttributeItem::numbers(values.iter().copied())),
            DefaultValue::Str(s) => Some(AttributeItem::string(s)),
        }
    }
}

fn read_slot(kind: SlotKind, value: NumberValue) -> String {
    match kind {
        SlotKind::I32 => value.as_i32().to_string(),
        SlotKind::U32 => value.as_u32().to_string(),
        SlotKind::F32 => value.as_f32().to_string(),
    }
}

fn check_slot(slot: Slot, value: NumberValue) -> bool {
    let as_f64 = match slot.kind {
        SlotKind::I32 => value.as_i32() as f64,
        SlotKind::U32 => value.as_u32() as f64,
        SlotKind::F32 => {
            let f = value.as_f32();
            if !f.is_finite() {
                return false;
            }
            f as f64
        }
    };
    match slot.check {
        Check::Any => true,
        Check::NonNegative => as_f64 >= 0.0,
        Check::Positive => as_f64 > 0.0,
        Check::Bool => slot.kind != SlotKind::F32 && (as_f64 == 0.0 || as_f64 == 1.0),
        Check::Enum(lo, hi) => {
            slot.kind != SlotKind::F32 && as_f64 >= lo as f64 && as_f64 <= hi as f64
        }
        Check::UnitInterval => (0.0..=1.0).contains(&as_f64),
    }
}

// =============================================================================
// Slot Presets
// =============================================================================

const LEN: Slot = Slot::new(SlotKind::F32, Check::NonNegative);
const FLOAT: Slot = Slot::new(SlotKind::F32, Check::Any);
const POS_FLOAT: Slot = Slot::new(SlotKind::F32, Check::Positive);
const UNIT: Slot = Slot::new(SlotKind::F32, Check::UnitInterval);
const COLOR: Slot = Slot::new(SlotKind::U32, Check::Any);
const BOOL: Slot = Slot::new(SlotKind::I32, Check::Bool);
const INT: Slot = Slot::new(SlotKind::I32, Check::Any);
const COUNT: Slot = Slot::new(SlotKind::I32, Check::NonNegative);

const fn enum_slot(lo: i32, hi: i32) -> Slot {
    Slot::new(SlotKind::I32, Check::Enum(lo, hi))
}

const ONE_OR_FOUR: Arity = Arity::OneOf(&[1, 4]);

const F0: NumberValue = NumberValue::f32(0.0);
const F1: NumberValue = NumberValue::f32(1.0);
const I0: NumberValue = NumberValue::i32(0);
const I1: NumberValue = NumberValue::i32(1);

const fn f(v: f32) -> NumberValue {
    NumberValue::f32(v)
}

const fn i(v: i32) -> NumberValue {
    NumberValue::i32(v)
}

const fn u(v: u32) -> NumberValue {
    NumberValue::u32(v)
}

// =============================================================================
// Scopes
// =============================================================================

use NodeType as T;

const TEXT_LIKE: Scope = Scope::Types(&[T::Text, T::Span, T::TextInput, T::TextArea, T::Button]);
const SCROLLABLE: Scope = Scope::Types(&[T::Scroll, T::List, T::WaterFlow, T::Grid]);

const fn only(t: &'static [NodeType]) -> Scope {
    Scope::Types(t)
}

macro_rules! numeric {
    ($tag:ident, $scope:expr, $arity:expr, $slots:expr) => {
        AttributeShape::numeric(tag::$tag, stringify!($tag), $scope, $arity, $slots)
    };
}

macro_rules! text {
    ($tag:ident, $scope:expr) => {
        AttributeShape::text(tag::$tag, stringify!($tag), $scope)
    };
}

macro_rules! handle {
    ($tag:ident, $scope:expr) => {
        AttributeShape::handle(tag::$tag, stringify!($tag), $scope)
    };
}

// =============================================================================
// Table (sorted by tag)
// =============================================================================

const IDENTITY_4X4: [NumberValue; 16] = [
    F1, F0, F0, F0, F0, F1, F0, F0, F0, F0, F1, F0, F0, F0, F0, F1,
];

const IDENTITY_COLOR_MATRIX: [NumberValue; 20] = [
    F1, F0, F0, F0, F0, F0, F1, F0, F0, F0, F0, F0, F1, F0, F0, F0, F0, F0, F1, F0,
];

static SHAPES: &[AttributeShape] = &[
    // --- common -------------------------------------------------------------
    numeric!(NODE_WIDTH, Scope::Common, Arity::Exact(1), &[LEN]).layout(),
    numeric!(NODE_HEIGHT, Scope::Common, Arity::Exact(1), &[LEN]).layout(),
    numeric!(NODE_BACKGROUND_COLOR, Scope::Common, Arity::Exact(1), &[COLOR])
        .default_numbers(&[u(0)]),
    numeric!(NODE_BACKGROUND_IMAGE, Scope::Common, Arity::Range(0, 1), &[enum_slot(0, 3)])
        .with_string(Presence::Required),
    numeric!(NODE_PADDING, Scope::Common, ONE_OR_FOUR, &[LEN])
        .default_numbers(&[F0, F0, F0, F0])
        .layout(),
    text!(NODE_ID, Scope::Common).default_str(""),
    numeric!(NODE_ENABLED, Scope::Common, Arity::Exact(1), &[BOOL]).default_numbers(&[I1]),
    numeric!(NODE_MARGIN, Scope::Common, ONE_OR_FOUR, &[FLOAT])
        .default_numbers(&[F0, F0, F0, F0])
        .layout(),
    numeric!(NODE_TRANSLATE, Scope::Common, Arity::Exact(3), &[FLOAT]).default_numbers(&[F0, F0, F0]),
    numeric!(NODE_SCALE, Scope::Common, Arity::Exact(2), &[FLOAT]).default_numbers(&[F1, F1]),
    numeric!(NODE_ROTATE, Scope::Common, Arity::Exact(5), &[FLOAT])
        .default_numbers(&[F0, F0, F1, F0, F0]),
    numeric!(NODE_BRIGHTNESS, Scope::Common, Arity::Exact(1), &[LEN]).default_numbers(&[F1]),
    numeric!(NODE_SATURATION, Scope::Common, Arity::Exact(1), &[LEN]).default_numbers(&[F1]),
    numeric!(NODE_BLUR, Scope::Common, Arity::Exact(1), &[LEN]).default_numbers(&[F0]),
    numeric!(
        NODE_LINEAR_GRADIENT,
        Scope::Common,
        Arity::Exact(3),
        &[FLOAT, enum_slot(0, 8), BOOL]
    )
    .with_object(Presence::Required),
    numeric!(NODE_ALIGNMENT, Scope::Common, Arity::Exact(1), &[enum_slot(0, 8)]).default_numbers(&[i(4)]),
    numeric!(NODE_OPACITY, Scope::Common, Arity::Exact(1), &[UNIT]).default_numbers(&[F1]),
    numeric!(NODE_BORDER_WIDTH, Scope::Common, ONE_OR_FOUR, &[LEN])
        .default_numbers(&[F0, F0, F0, F0])
        .layout(),
    numeric!(NODE_BORDER_RADIUS, Scope::Common, ONE_OR_FOUR, &[LEN]).default_numbers(&[F0, F0, F0, F0]),
    numeric!(NODE_BORDER_COLOR, Scope::Common, ONE_OR_FOUR, &[COLOR])
        .default_numbers(&[u(0xFF00_0000), u(0xFF00_0000), u(0xFF00_0000), u(0xFF00_0000)]),
    numeric!(NODE_BORDER_STYLE, Scope::Common, ONE_OR_FOUR, &[enum_slot(0, 2)])
        .default_numbers(&[I0, I0, I0, I0]),
    numeric!(NODE_Z_INDEX, Scope::Common, Arity::Exact(1), &[INT]).default_numbers(&[I0]),
    numeric!(NODE_VISIBILITY, Scope::Common, Arity::Exact(1), &[enum_slot(0, 2)])
        .default_numbers(&[I0])
        .layout(),
    numeric!(NODE_CLIP, Scope::Common, Arity::Exact(1), &[BOOL]).default_numbers(&[I0]),
    numeric!(NODE_TRANSFORM, Scope::Common, Arity::Exact(16), &[FLOAT]).default_numbers(&IDENTITY_4X4),
    numeric!(NODE_HIT_TEST_BEHAVIOR, Scope::Common, Arity::Exact(1), &[enum_slot(0, 3)])
        .default_numbers(&[I0]),
    numeric!(NODE_POSITION, Scope::Common, Arity::Exact(2), &[FLOAT])
        .default_numbers(&[F0, F0])
        .layout(),
    numeric!(NODE_SHADOW, Scope::Common, Arity::Exact(1), &[enum_slot(0, 5)]),
    numeric!(NODE_FOCUSABLE, Scope::Common, Arity::Exact(1), &[BOOL]).default_numbers(&[I0]),
    numeric!(NODE_DEFAULT_FOCUS, Scope::Common, Arity::Exact(1), &[BOOL]).default_numbers(&[I0]),
    text!(NODE_ACCESSIBILITY_TEXT, Scope::Common),
    numeric!(NODE_LAYOUT_WEIGHT, Scope::Common, Arity::Exact(1), &[LEN])
        .default_numbers(&[F0])
        .layout(),
    numeric!(NODE_ASPECT_RATIO, Scope::Common, Arity::Exact(1), &[POS_FLOAT]).layout(),
    numeric!(NODE_CONSTRAINT_SIZE, Scope::Common, Arity::Exact(4), &[LEN]).layout(),
    numeric!(NODE_FLEX_GROW, Scope::Common, Arity::Exact(1), &[LEN])
        .default_numbers(&[F0])
        .layout(),
    numeric!(NODE_FLEX_SHRINK, Scope::Common, Arity::Exact(1), &[LEN])
        .default_numbers(&[F1])
        .layout(),
    numeric!(NODE_FLEX_BASIS, Scope::Common, Arity::Exact(1), &[LEN]).layout(),
    // --- text family --------------------------------------------------------
    text!(NODE_TEXT_CONTENT, only(&[T::Text])).default_str(""),
    numeric!(NODE_FONT_COLOR, TEXT_LIKE, Arity::Exact(1), &[COLOR]).default_numbers(&[u(0xFF18_2431)]),
    numeric!(NODE_FONT_SIZE, TEXT_LIKE, Arity::Exact(1), &[LEN])
        .default_numbers(&[f(16.0)])
        .layout(),
    numeric!(NODE_FONT_STYLE, TEXT_LIKE, Arity::Exact(1), &[enum_slot(0, 1)]).default_numbers(&[I0]),
    numeric!(NODE_FONT_WEIGHT, TEXT_LIKE, Arity::Exact(1), &[enum_slot(0, 14)])
        .default_numbers(&[i(10)])
        .layout(),
    numeric!(NODE_TEXT_LINE_HEIGHT, only(&[T::Text, T::Span, T::TextInput, T::TextArea]), Arity::Exact(1), &[LEN])
        .layout(),
    numeric!(
        NODE_TEXT_DECORATION,
        only(&[T::Text, T::Span]),
        Arity::Range(1, 3),
        &[enum_slot(0, 3), COLOR, enum_slot(0, 4)]
    )
    .default_numbers(&[I0, u(0xFF00_0000), I0]),
    numeric!(NODE_TEXT_CASE, only(&[T::Text, T::Span]), Arity::Exact(1), &[enum_slot(0, 2)])
        .default_numbers(&[I0]),
    numeric!(NODE_TEXT_LETTER_SPACING, only(&[T::Text, T::Span]), Arity::Exact(1), &[FLOAT])
        .default_numbers(&[F0])
        .layout(),
    numeric!(NODE_TEXT_MAX_LINES, only(&[T::Text, T::TextArea]), Arity::Exact(1), &[COUNT]).layout(),
    numeric!(NODE_TEXT_ALIGN, only(&[T::Text, T::TextInput, T::TextArea]), Arity::Exact(1), &[enum_slot(0, 5)])
        .default_numbers(&[I0]),
    numeric!(NODE_TEXT_OVERFLOW, only(&[T::Text]), Arity::Exact(1), &[enum_slot(0, 3)]).default_numbers(&[I0]),
    text!(NODE_SPAN_CONTENT, only(&[T::Span])).default_str(""),
    text!(NODE_IMAGE_SPAN_SRC, only(&[T::ImageSpan])),
    numeric!(NODE_IMAGE_SPAN_VERTICAL_ALIGNMENT, only(&[T::ImageSpan]), Arity::Exact(1), &[enum_slot(0, 3)])
        .default_numbers(&[I0]),
    // --- widgets ------------------------------------------------------------
    text!(NODE_IMAGE_SRC, only(&[T::Image])),
    numeric!(NODE_IMAGE_OBJECT_FIT, only(&[T::Image]), Arity::Exact(1), &[enum_slot(0, 12)])
        .default_numbers(&[I1]),
    numeric!(NODE_IMAGE_INTERPOLATION, only(&[T::Image]), Arity::Exact(1), &[enum_slot(0, 3)])
        .default_numbers(&[I0]),
    numeric!(NODE_IMAGE_OBJECT_REPEAT, only(&[T::Image]), Arity::Exact(1), &[enum_slot(0, 3)])
        .default_numbers(&[I0]),
    numeric!(NODE_IMAGE_COLOR_FILTER, only(&[T::Image]), Arity::Exact(20), &[FLOAT])
        .default_numbers(&IDENTITY_COLOR_MATRIX),
    numeric!(NODE_IMAGE_AUTO_RESIZE, only(&[T::Image]), Arity::Exact(1), &[BOOL]).default_numbers(&[I0]),
    text!(NODE_IMAGE_ALT, only(&[T::Image])),
    numeric!(NODE_TOGGLE_SELECTED_COLOR, only(&[T::Toggle]), Arity::Exact(1), &[COLOR])
        .default_numbers(&[u(0xFF00_7DFF)]),
    numeric!(NODE_TOGGLE_SWITCH_POINT_COLOR, only(&[T::Toggle]), Arity::Exact(1), &[COLOR])
        .default_numbers(&[u(0xFFFF_FFFF)]),
    numeric!(NODE_TOGGLE_VALUE, only(&[T::Toggle]), Arity::Exact(1), &[BOOL]).default_numbers(&[I0]),
    numeric!(NODE_LOADING_PROGRESS_COLOR, only(&[T::LoadingProgress]), Arity::Exact(1), &[COLOR])
        .default_numbers(&[u(0x9966_6666)]),
    numeric!(NODE_LOADING_PROGRESS_ENABLE_LOADING, only(&[T::LoadingProgress]), Arity::Exact(1), &[BOOL])
        .default_numbers(&[I1]),
    text!(NODE_TEXT_INPUT_PLACEHOLDER, only(&[T::TextInput])).default_str(""),
    text!(NODE_TEXT_INPUT_TEXT, only(&[T::TextInput])).default_str(""),
    numeric!(NODE_TEXT_INPUT_CARET_COLOR, only(&[T::TextInput]), Arity::Exact(1), &[COLOR])
        .default_numbers(&[u(0xFF00_7DFF)]),
    numeric!(NODE_TEXT_INPUT_CARET_STYLE, only(&[T::TextInput]), Arity::Exact(1), &[LEN])
        .default_numbers(&[f(2.0)]),
    numeric!(NODE_TEXT_INPUT_SHOW_UNDERLINE, only(&[T::TextInput]), Arity::Exact(1), &[BOOL])
        .default_numbers(&[I0]),
    numeric!(NODE_TEXT_INPUT_MAX_LENGTH, only(&[T::TextInput]), Arity::Exact(1), &[COUNT]),
    numeric!(NODE_TEXT_INPUT_ENTER_KEY_TYPE, only(&[T::TextInput]), Arity::Exact(1), &[enum_slot(2, 8)])
        .default_numbers(&[i(6)]),
    numeric!(NODE_TEXT_INPUT_PLACEHOLDER_COLOR, only(&[T::TextInput]), Arity::Exact(1), &[COLOR])
        .default_numbers(&[u(0x9918_2431)]),
    text!(NODE_TEXT_AREA_PLACEHOLDER, only(&[T::TextArea])).default_str(""),
    text!(NODE_TEXT_AREA_TEXT, only(&[T::TextArea])).default_str(""),
    numeric!(NODE_TEXT_AREA_MAX_LENGTH, only(&[T::TextArea]), Arity::Exact(1), &[COUNT]),
    numeric!(NODE_TEXT_AREA_PLACEHOLDER_COLOR, only(&[T::TextArea]), Arity::Exact(1), &[COLOR])
        .default_numbers(&[u(0x9918_2431)]),
    text!(NODE_BUTTON_LABEL, only(&[T::Button])).default_str(""),
    numeric!(NODE_BUTTON_TYPE, only(&[T::Button]), Arity::Exact(1), &[enum_slot(0, 2)]).default_numbers(&[I1]),
    numeric!(NODE_PROGRESS_VALUE, only(&[T::Progress]), Arity::Exact(1), &[LEN]).default_numbers(&[F0]),
    numeric!(NODE_PROGRESS_TOTAL, only(&[T::Progress]), Arity::Exact(1), &[POS_FLOAT])
        .default_numbers(&[f(100.0)]),
    numeric!(NODE_PROGRESS_COLOR, only(&[T::Progress]), Arity::Exact(1), &[COLOR])
        .default_numbers(&[u(0xFF00_7DFF)]),
    numeric!(NODE_PROGRESS_TYPE, only(&[T::Progress]), Arity::Exact(1), &[enum_slot(0, 4)])
        .default_numbers(&[I0]),
    numeric!(NODE_CHECKBOX_SELECT, only(&[T::Checkbox]), Arity::Exact(1), &[BOOL]).default_numbers(&[I0]),
    numeric!(NODE_CHECKBOX_SELECT_COLOR, only(&[T::Checkbox]), Arity::Exact(1), &[COLOR])
        .default_numbers(&[u(0xFF00_7DFF)]),
    numeric!(NODE_CHECKBOX_UNSELECT_COLOR, only(&[T::Checkbox]), Arity::Exact(1), &[COLOR])
        .default_numbers(&[u(0x3318_2431)]),
    numeric!(NODE_CHECKBOX_MARK, only(&[T::Checkbox]), Arity::Range(1, 3), &[COLOR, LEN, LEN])
        .default_numbers(&[u(0xFFFF_FFFF), f(12.0), f(2.0)]),
    numeric!(NODE_CHECKBOX_SHAPE, only(&[T::Checkbox]), Arity::Exact(1), &[enum_slot(0, 1)])
        .default_numbers(&[I0]),
    text!(NODE_XCOMPONENT_ID, only(&[T::XComponent])),
    numeric!(NODE_XCOMPONENT_TYPE, only(&[T::XComponent]), Arity::Exact(1), &[enum_slot(0, 1)])
        .default_numbers(&[I0]),
    numeric!(
        NODE_XCOMPONENT_SURFACE_SIZE,
        only(&[T::XComponent]),
        Arity::Exact(2),
        &[Slot::new(SlotKind::U32, Check::Any)]
    ),
    numeric!(NODE_SLIDER_BLOCK_COLOR, only(&[T::Slider]), Arity::Exact(1), &[COLOR])
        .default_numbers(&[u(0xFFFF_FFFF)]),
    numeric!(NODE_SLIDER_TRACK_COLOR, only(&[T::Slider]), Arity::Exact(1), &[COLOR])
        .default_numbers(&[u(0x0C18_2431)]),
    numeric!(NODE_SLIDER_SELECTED_COLOR, only(&[T::Slider]), Arity::Exact(1), &[COLOR])
        .default_numbers(&[u(0xFF00_7DFF)]),
    numeric!(NODE_SLIDER_SHOW_STEPS, only(&[T::Slider]), Arity::Exact(1), &[BOOL]).default_numbers(&[I0]),
    numeric!(NODE_SLIDER_BLOCK_STYLE, only(&[T::Slider]), Arity::Exact(1), &[enum_slot(0, 2)])
        .with_string(Presence::Optional)
        .default_numbers(&[I0]),
    numeric!(NODE_SLIDER_VALUE, only(&[T::Slider]), Arity::Exact(1), &[FLOAT]).default_numbers(&[F0]),
    numeric!(NODE_SLIDER_MIN_VALUE, only(&[T::Slider]), Arity::Exact(1), &[FLOAT]).default_numbers(&[F0]),
    numeric!(NODE_SLIDER_MAX_VALUE, only(&[T::Slider]), Arity::Exact(1), &[FLOAT])
        .default_numbers(&[f(100.0)]),
    numeric!(NODE_SLIDER_STEP, only(&[T::Slider]), Arity::Exact(1), &[POS_FLOAT]).default_numbers(&[F1]),
    numeric!(NODE_SLIDER_DIRECTION, only(&[T::Slider]), Arity::Exact(1), &[enum_slot(0, 1)])
        .default_numbers(&[I1])
        .layout(),
    numeric!(NODE_SLIDER_REVERSE, only(&[T::Slider]), Arity::Exact(1), &[BOOL]).default_numbers(&[I0]),
    numeric!(NODE_SLIDER_STYLE, only(&[T::Slider]), Arity::Exact(1), &[enum_slot(0, 2)])
        .default_numbers(&[I0]),
    numeric!(NODE_RADIO_CHECKED, only(&[T::Radio]), Arity::Exact(1), &[BOOL]).default_numbers(&[I0]),
    numeric!(NODE_RADIO_STYLE, only(&[T::Radio]), Arity::Range(1, 3), &[COLOR])
        .default_numbers(&[u(0xFF00_7DFF), u(0xFF18_2431), u(0xFFFF_FFFF)]),
    text!(NODE_RADIO_VALUE, only(&[T::Radio])),
    text!(NODE_RADIO_GROUP, only(&[T::Radio])),
    // --- containers ---------------------------------------------------------
    numeric!(NODE_STACK_ALIGN_CONTENT, only(&[T::Stack]), Arity::Exact(1), &[enum_slot(0, 8)])
        .default_numbers(&[i(4)])
        .layout(),
    numeric!(NODE_SWIPER_LOOP, only(&[T::Swiper]), Arity::Exact(1), &[BOOL]).default_numbers(&[I1]),
    numeric!(NODE_SWIPER_AUTO_PLAY, only(&[T::Swiper]), Arity::Exact(1), &[BOOL]).default_numbers(&[I0]),
    numeric!(NODE_SWIPER_SHOW_INDICATOR, only(&[T::Swiper]), Arity::Exact(1), &[BOOL])
        .default_numbers(&[I1]),
    numeric!(NODE_SWIPER_INTERVAL, only(&[T::Swiper]), Arity::Exact(1), &[LEN])
        .default_numbers(&[f(3000.0)]),
    numeric!(NODE_SWIPER_VERTICAL, only(&[T::Swiper]), Arity::Exact(1), &[BOOL])
        .default_numbers(&[I0])
        .layout(),
    numeric!(NODE_SWIPER_DURATION, only(&[T::Swiper]), Arity::Exact(1), &[LEN])
        .default_numbers(&[f(400.0)]),
    numeric!(NODE_SWIPER_CURVE, only(&[T::Swiper]), Arity::Exact(1), &[enum_slot(0, 12)])
        .default_numbers(&[I1]),
    numeric!(NODE_SWIPER_ITEM_SPACE, only(&[T::Swiper]), Arity::Exact(1), &[LEN])
        .default_numbers(&[F0])
        .layout(),
    numeric!(NODE_SWIPER_INDEX, only(&[T::Swiper]), Arity::Exact(1), &[COUNT]).default_numbers(&[I0]),
    numeric!(NODE_SWIPER_DISPLAY_COUNT, only(&[T::Swiper]), Arity::Exact(1), &[Slot::new(SlotKind::I32, Check::Positive)])
        .default_numbers(&[I1])
        .layout(),
    handle!(NODE_SWIPER_NODE_ADAPTER, only(&[T::Swiper])),
    numeric!(NODE_SWIPER_CACHED_COUNT, only(&[T::Swiper]), Arity::Exact(1), &[COUNT]).default_numbers(&[I1]),
    numeric!(NODE_SCROLL_BAR_DISPLAY_MODE, SCROLLABLE, Arity::Exact(1), &[enum_slot(0, 2)])
        .default_numbers(&[I1]),
    numeric!(NODE_SCROLL_BAR_WIDTH, SCROLLABLE, Arity::Exact(1), &[LEN]).default_numbers(&[f(4.0)]),
    numeric!(NODE_SCROLL_BAR_COLOR, SCROLLABLE, Arity::Exact(1), &[COLOR]).default_numbers(&[u(0x6618_2431)]),
    numeric!(NODE_SCROLL_SCROLL_DIRECTION, only(&[T::Scroll]), Arity::Exact(1), &[enum_slot(0, 3)])
        .default_numbers(&[I0])
        .layout(),
    numeric!(NODE_SCROLL_EDGE_EFFECT, SCROLLABLE, Arity::Range(1, 2), &[enum_slot(0, 2), BOOL])
        .default_numbers(&[I0, I1]),
    numeric!(NODE_SCROLL_ENABLE_SCROLL_INTERACTION, SCROLLABLE, Arity::Exact(1), &[BOOL])
        .default_numbers(&[I1]),
    numeric!(NODE_SCROLL_FRICTION, SCROLLABLE, Arity::Exact(1), &[POS_FLOAT]).default_numbers(&[f(0.6)]),
    numeric!(NODE_SCROLL_NESTED_SCROLL, SCROLLABLE, Arity::Exact(2), &[enum_slot(0, 3)])
        .default_numbers(&[I0, I0]),
    numeric!(
        NODE_SCROLL_OFFSET,
        SCROLLABLE,
        Arity::Range(2, 5),
        &[FLOAT, FLOAT, COUNT, enum_slot(0, 12), BOOL]
    )
    .default_numbers(&[F0, F0]),
    numeric!(NODE_SCROLL_EDGE, SCROLLABLE, Arity::Exact(1), &[enum_slot(0, 3)]),
    numeric!(NODE_SCROLL_ENABLE_PAGING, only(&[T::Scroll]), Arity::Exact(1), &[BOOL]).default_numbers(&[I0]),
    numeric!(NODE_LIST_DIRECTION, only(&[T::List]), Arity::Exact(1), &[enum_slot(0, 1)])
        .default_numbers(&[I0])
        .layout(),
    numeric!(NODE_LIST_STICKY, only(&[T::List]), Arity::Exact(1), &[enum_slot(0, 3)]).default_numbers(&[I0]),
    numeric!(NODE_LIST_SPACE, only(&[T::List]), Arity::Exact(1), &[LEN])
        .default_numbers(&[F0])
        .layout(),
    handle!(NODE_LIST_NODE_ADAPTER, only(&[T::List])),
    numeric!(NODE_LIST_CACHED_COUNT, only(&[T::List]), Arity::Exact(1), &[COUNT]).default_numbers(&[I1]),
    handle!(NODE_LIST_ITEM_SWIPE_ACTION, only(&[T::ListItem])),
    handle!(NODE_LIST_ITEM_GROUP_SET_HEADER, only(&[T::ListItemGroup])),
    handle!(NODE_LIST_ITEM_GROUP_SET_FOOTER, only(&[T::ListItemGroup])),
    numeric!(
        NODE_LIST_ITEM_GROUP_SET_DIVIDER,
        only(&[T::ListItemGroup]),
        Arity::Range(1, 4),
        &[COLOR, LEN, LEN, LEN]
    ),
    numeric!(NODE_COLUMN_ALIGN_ITEMS, only(&[T::Column]), Arity::Exact(1), &[enum_slot(0, 2)])
        .default_numbers(&[I1])
        .layout(),
    numeric!(NODE_COLUMN_JUSTIFY_CONTENT, only(&[T::Column]), Arity::Exact(1), &[enum_slot(1, 8)])
        .default_numbers(&[I1])
        .layout(),
    numeric!(NODE_ROW_ALIGN_ITEMS, only(&[T::Row]), Arity::Exact(1), &[enum_slot(0, 2)])
        .default_numbers(&[I1])
        .layout(),
    numeric!(NODE_ROW_JUSTIFY_CONTENT, only(&[T::Row]), Arity::Exact(1), &[enum_slot(1, 8)])
        .default_numbers(&[I1])
        .layout(),
    numeric!(
        NODE_FLEX_OPTION,
        only(&[T::Flex]),
        Arity::Range(1, 5),
        &[enum_slot(0, 3), enum_slot(0, 2), enum_slot(1, 8), enum_slot(0, 5), enum_slot(1, 8)]
    )
    .default_numbers(&[I0, I0, I1, I1, I1])
    .layout(),
    numeric!(NODE_REFRESH_REFRESHING, only(&[T::Refresh]), Arity::Exact(1), &[BOOL]).default_numbers(&[I0]),
    handle!(NODE_REFRESH_CONTENT, only(&[T::Refresh])),
    numeric!(NODE_REFRESH_PULL_DOWN_RATIO, only(&[T::Refresh]), Arity::Exact(1), &[UNIT]),
    numeric!(NODE_REFRESH_OFFSET, only(&[T::Refresh]), Arity::Exact(1), &[LEN]).default_numbers(&[f(64.0)]),
    numeric!(NODE_REFRESH_PULL_TO_REFRESH, only(&[T::Refresh]), Arity::Exact(1), &[BOOL])
        .default_numbers(&[I1]),
    numeric!(NODE_WATER_FLOW_LAYOUT_DIRECTION, only(&[T::WaterFlow]), Arity::Exact(1), &[enum_slot(0, 3)])
        .default_numbers(&[I0])
        .layout(),
    text!(NODE_WATER_FLOW_COLUMN_TEMPLATE, only(&[T::WaterFlow])).default_str("1fr"),
    text!(NODE_WATER_FLOW_ROW_TEMPLATE, only(&[T::WaterFlow])).default_str("1fr"),
    numeric!(NODE_WATER_FLOW_COLUMN_GAP, only(&[T::WaterFlow]), Arity::Exact(1), &[LEN])
        .default_numbers(&[F0])
        .layout(),
    numeric!(NODE_WATER_FLOW_ROW_GAP, only(&[T::WaterFlow]), Arity::Exact(1), &[LEN])
        .default_numbers(&[F0])
        .layout(),
    numeric!(NODE_WATER_FLOW_SECTION_OPTION, only(&[T::WaterFlow]), Arity::Exact(1), &[COUNT])
        .with_object(Presence::Required),
    handle!(NODE_WATER_FLOW_NODE_ADAPTER, only(&[T::WaterFlow])),
    numeric!(NODE_WATER_FLOW_CACHED_COUNT, only(&[T::WaterFlow]), Arity::Exact(1), &[COUNT])
        .default_numbers(&[I1]),
    text!(NODE_GRID_COLUMN_TEMPLATE, only(&[T::Grid])).default_str("1fr"),
    text!(NODE_GRID_ROW_TEMPLATE, only(&[T::Grid])).default_str("1fr"),
    numeric!(NODE_GRID_COLUMN_GAP, only(&[T::Grid]), Arity::Exact(1), &[LEN])
        .default_numbers(&[F0])
        .layout(),
    numeric!(NODE_GRID_ROW_GAP, only(&[T::Grid]), Arity::Exact(1), &[LEN])
        .default_numbers(&[F0])
        .layout(),
    handle!(NODE_GRID_NODE_ADAPTER, only(&[T::Grid])),
    numeric!(NODE_GRID_CACHED_COUNT, only(&[T::Grid]), Arity::Exact(1), &[COUNT]).default_numbers(&[I1]),
];

/// Shape registered for `tag`, if the tag is known to this build.
pub fn lookup(tag: AttributeTag) -> Option<&'static AttributeShape> {
    SHAPES
        .binary_search_by_key(&tag, |shape| shape.tag)
        .ok()
        .map(|i| &SHAPES[i])
}

/// Shape for `tag` if it applies to `node_type`.
pub fn lookup_for(tag: AttributeTag, node_type: NodeType) -> Option<&'static AttributeShape> {
    lookup(tag).filter(|shape| shape.scope.contains(node_type))
}

/// All known shapes, sorted by tag.
pub fn all_shapes() -> &'static [AttributeShape] {
    SHAPES
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::item::AttributeObject;
    use crate::types::ExternalRef;

    #[test]
    fn test_table_sorted_and_unique() {
        for pair in SHAPES.windows(2) {
            assert!(
                pair[0].tag < pair[1].tag,
                "{} must sort before {}",
                pair[0].name,
                pair[1].name
            );
        }
    }

    #[test]
    fn test_tags_live_in_owner_block() {
        for shape in SHAPES {
            match shape.tag.owner() {
                None => assert!(shape.tag.is_common(), "{}", shape.name),
                Some(owner) => assert!(
                    shape.scope.contains(owner),
                    "{} is outside its owner's scope",
                    shape.name
                ),
            }
        }
    }

    #[test]
    fn test_defaults_satisfy_their_shape() {
        for shape in SHAPES {
            if let Some(item) = shape.default_item() {
                assert_eq!(shape.validate(&item), Ok(()), "{}", shape.name);
            }
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(lookup(tag::NODE_WIDTH).unwrap().name, "NODE_WIDTH");
        assert_eq!(lookup(tag::NODE_GRID_CACHED_COUNT).unwrap().name, "NODE_GRID_CACHED_COUNT");
        assert!(lookup(AttributeTag(999)).is_none());
        assert!(lookup_for(tag::NODE_FONT_SIZE, NodeType::Button).is_some());
        assert!(lookup_for(tag::NODE_FONT_SIZE, NodeType::Image).is_none());
    }

    #[test]
    fn test_validate_arity() {
        let width = lookup(tag::NODE_WIDTH).unwrap();
        assert!(width.validate(&AttributeItem::f32s(&[100.0])).is_ok());
        assert!(width.validate(&AttributeItem::f32s(&[])).is_err());
        assert!(width.validate(&AttributeItem::f32s(&[1.0, 2.0])).is_err());

        let padding = lookup(tag::NODE_PADDING).unwrap();
        assert!(padding.validate(&AttributeItem::f32s(&[1.0])).is_ok());
        assert!(padding.validate(&AttributeItem::f32s(&[1.0, 2.0, 3.0, 4.0])).is_ok());
        assert!(padding.validate(&AttributeItem::f32s(&[1.0, 2.0])).is_err());
    }

    #[test]
    fn test_validate_values() {
        let width = lookup(tag::NODE_WIDTH).unwrap();
        assert!(width.validate(&AttributeItem::f32s(&[-1.0])).is_err());
        assert!(width.validate(&AttributeItem::f32s(&[f32::NAN])).is_err());

        let opacity = lookup(tag::NODE_OPACITY).unwrap();
        assert!(opacity.validate(&AttributeItem::f32s(&[0.5])).is_ok());
        assert!(opacity.validate(&AttributeItem::f32s(&[1.5])).is_err());

        let enabled = lookup(tag::NODE_ENABLED).unwrap();
        assert!(enabled.validate(&AttributeItem::i32s(&[1])).is_ok());
        assert!(enabled.validate(&AttributeItem::i32s(&[2])).is_err());

        let align = lookup(tag::NODE_ALIGNMENT).unwrap();
        assert!(align.validate(&AttributeItem::i32s(&[8])).is_ok());
        assert!(align.validate(&AttributeItem::i32s(&[9])).is_err());
    }

    #[test]
    fn test_validate_string_and_object_presence() {
        let content = lookup(tag::NODE_TEXT_CONTENT).unwrap();
        assert!(content.validate(&AttributeItem::string("hi")).is_ok());
        assert!(content.validate(&AttributeItem::new()).is_err());
        assert!(content.validate(&AttributeItem::f32s(&[1.0]).with_string("hi")).is_err());

        let width = lookup(tag::NODE_WIDTH).unwrap();
        assert!(width.validate(&AttributeItem::f32s(&[1.0]).with_string("x")).is_err());

        let gradient = lookup(tag::NODE_LINEAR_GRADIENT).unwrap();
        let stops = AttributeObject::External(ExternalRef(1));
        let item = AttributeItem::numbers([
            NumberValue::f32(90.0),
            NumberValue::i32(3),
            NumberValue::i32(0),
        ]);
        assert!(gradient.validate(&item).is_err());
        assert!(gradient.validate(&item.with_object(stops)).is_ok());
    }

    #[test]
    fn test_slot_rule_repeats_last() {
        let radio = lookup(tag::NODE_RADIO_STYLE).unwrap();
        assert_eq!(radio.slot(2), Some(COLOR));
        assert_eq!(radio.slot(7), Some(COLOR));
    }
}
