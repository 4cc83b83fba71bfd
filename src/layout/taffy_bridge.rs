//! Taffy Bridge - measure a node subtree with Taffy.
//!
//! Converts layout attributes to Taffy styles, builds a Taffy tree for the
//! subtree, runs flexbox computation and writes measured sizes and child
//! positions back to the node registry.
//!
//! CUSTOM nodes with a registered measure event become Taffy leaves whose
//! size comes from their receivers.

use taffy::{
    AlignItems as TaffyAlignItems, AvailableSpace, Dimension, Display, FlexDirection, FlexWrap,
    JustifyContent as TaffyJustifyContent, LengthPercentage, LengthPercentageAuto, NodeId,
    Position, Rect, Size, Style, TaffyTree,
};

use crate::attribute::{self, AttributeItem, AttributeTag, tag};
use crate::config;
use crate::error::{Error, Result};
use crate::event::{CustomEventFlags, CustomPayload, dispatch_custom_event, is_custom_event_registered};
use crate::node::{with_node, with_node_mut};
use crate::types::{DirtyFlags, IntOffset, IntSize, LayoutConstraint, LengthUnit, NodeHandle, NodeType};

fn engine_error(e: taffy::TaffyError) -> Error {
    Error::param(format!("layout engine: {e}"))
}

// =============================================================================
// ATTRIBUTE READING
// =============================================================================

/// Attribute reader that converts lengths from the node's unit to px.
struct Attrs {
    node: NodeHandle,
    unit: LengthUnit,
    cfg: config::FacadeConfig,
}

impl Attrs {
    fn new(node: NodeHandle) -> Result<Self> {
        let unit = with_node(node, |e| e.length_unit)?;
        Ok(Self { node, unit, cfg: config::config() })
    }

    fn get(&self, t: AttributeTag) -> Option<AttributeItem> {
        attribute::get_attribute(self.node, t)
    }

    fn px(&self, v: f32) -> f32 {
        self.cfg.convert_length(v as f64, self.unit, LengthUnit::Px) as f32
    }

    fn length(&self, t: AttributeTag) -> Option<f32> {
        self.get(t).and_then(|item| item.f32_at(0)).map(|v| self.px(v))
    }

    fn int(&self, t: AttributeTag) -> Option<i32> {
        self.get(t).and_then(|item| item.i32_at(0))
    }

    fn number(&self, t: AttributeTag) -> Option<f32> {
        self.get(t).and_then(|item| item.f32_at(0))
    }

    /// One value for all edges, or top/right/bottom/left.
    fn edges(&self, t: AttributeTag) -> Rect<f32> {
        let Some(item) = self.get(t) else {
            return Rect { top: 0.0, right: 0.0, bottom: 0.0, left: 0.0 };
        };
        let at = |i: usize| item.f32_at(i).or_else(|| item.f32_at(0)).map(|v| self.px(v)).unwrap_or(0.0);
        Rect { top: at(0), right: at(1), bottom: at(2), left: at(3) }
    }
}

// =============================================================================
// ENUM CONVERSIONS
// =============================================================================

/// Main-axis alignment (`1` start .. `6` space-evenly).
fn to_taffy_justify(v: i32) -> Option<TaffyJustifyContent> {
    Some(match v {
        2 => TaffyJustifyContent::Center,
        3 => TaffyJustifyContent::FlexEnd,
        4 => TaffyJustifyContent::SpaceBetween,
        5 => TaffyJustifyContent::SpaceAround,
        6 => TaffyJustifyContent::SpaceEvenly,
        _ => TaffyJustifyContent::FlexStart,
    })
}

/// Cross-axis alignment of Column/Row (`0` start, `1` center, `2` end).
fn to_taffy_cross(v: i32) -> Option<TaffyAlignItems> {
    Some(match v {
        0 => TaffyAlignItems::FlexStart,
        2 => TaffyAlignItems::FlexEnd,
        _ => TaffyAlignItems::Center,
    })
}

/// Item alignment of Flex (`0` auto .. `5` baseline).
fn to_taffy_item_align(v: i32) -> Option<TaffyAlignItems> {
    match v {
        1 => Some(TaffyAlignItems::FlexStart),
        2 => Some(TaffyAlignItems::Center),
        3 => Some(TaffyAlignItems::FlexEnd),
        4 => Some(TaffyAlignItems::Stretch),
        5 => Some(TaffyAlignItems::Baseline),
        _ => None,
    }
}

fn to_taffy_direction(v: i32) -> FlexDirection {
    match v {
        1 => FlexDirection::Column,
        2 => FlexDirection::RowReverse,
        3 => FlexDirection::ColumnReverse,
        _ => FlexDirection::Row,
    }
}

fn to_taffy_wrap(v: i32) -> FlexWrap {
    match v {
        1 => FlexWrap::Wrap,
        2 => FlexWrap::WrapReverse,
        _ => FlexWrap::NoWrap,
    }
}

fn length_or_auto(v: Option<f32>) -> Dimension {
    v.map(Dimension::Length).unwrap_or(Dimension::Auto)
}

// =============================================================================
// STYLE BUILDING
// =============================================================================

fn build_style(node: NodeHandle, node_type: NodeType) -> Result<Style> {
    let a = Attrs::new(node)?;

    let margin = a.edges(tag::NODE_MARGIN);
    let padding = a.edges(tag::NODE_PADDING);
    let border = a.edges(tag::NODE_BORDER_WIDTH);
    let constraint = a.get(tag::NODE_CONSTRAINT_SIZE);
    let bound = |i: usize| constraint.as_ref().and_then(|c| c.f32_at(i)).map(|v| a.px(v));

    let mut style = Style {
        display: if a.int(tag::NODE_VISIBILITY) == Some(2) { Display::None } else { Display::Flex },
        flex_direction: FlexDirection::Column,
        size: Size {
            width: length_or_auto(a.length(tag::NODE_WIDTH)),
            height: length_or_auto(a.length(tag::NODE_HEIGHT)),
        },
        min_size: Size {
            width: length_or_auto(bound(0)),
            height: length_or_auto(bound(2)),
        },
        max_size: Size {
            width: length_or_auto(bound(1)),
            height: length_or_auto(bound(3)),
        },
        aspect_ratio: a.number(tag::NODE_ASPECT_RATIO),
        margin: Rect {
            top: LengthPercentageAuto::Length(margin.top),
            right: LengthPercentageAuto::Length(margin.right),
            bottom: LengthPercentageAuto::Length(margin.bottom),
            left: LengthPercentageAuto::Length(margin.left),
        },
        padding: Rect {
            top: LengthPercentage::Length(padding.top),
            right: LengthPercentage::Length(padding.right),
            bottom: LengthPercentage::Length(padding.bottom),
            left: LengthPercentage::Length(padding.left),
        },
        border: Rect {
            top: LengthPercentage::Length(border.top),
            right: LengthPercentage::Length(border.right),
            bottom: LengthPercentage::Length(border.bottom),
            left: LengthPercentage::Length(border.left),
        },
        flex_grow: a.number(tag::NODE_FLEX_GROW).unwrap_or(0.0),
        flex_shrink: a.number(tag::NODE_FLEX_SHRINK).unwrap_or(1.0),
        flex_basis: length_or_auto(a.length(tag::NODE_FLEX_BASIS)),
        ..Default::default()
    };

    // Explicit position takes the node out of flow.
    if let Some(pos) = attribute::stored_attribute(node, tag::NODE_POSITION) {
        style.position = Position::Absolute;
        style.inset = Rect {
            left: LengthPercentageAuto::Length(pos.f32_at(0).map(|v| a.px(v)).unwrap_or(0.0)),
            top: LengthPercentageAuto::Length(pos.f32_at(1).map(|v| a.px(v)).unwrap_or(0.0)),
            right: LengthPercentageAuto::Auto,
            bottom: LengthPercentageAuto::Auto,
        };
    }

    match node_type {
        NodeType::Column => {
            style.align_items = a.int(tag::NODE_COLUMN_ALIGN_ITEMS).and_then(to_taffy_cross);
            style.justify_content = a.int(tag::NODE_COLUMN_JUSTIFY_CONTENT).and_then(to_taffy_justify);
        }
        NodeType::Row => {
            style.flex_direction = FlexDirection::Row;
            style.align_items = a.int(tag::NODE_ROW_ALIGN_ITEMS).and_then(to_taffy_cross);
            style.justify_content = a.int(tag::NODE_ROW_JUSTIFY_CONTENT).and_then(to_taffy_justify);
        }
        NodeType::Flex => {
            if let Some(option) = a.get(tag::NODE_FLEX_OPTION) {
                style.flex_direction = to_taffy_direction(option.i32_at(0).unwrap_or(0));
                style.flex_wrap = to_taffy_wrap(option.i32_at(1).unwrap_or(0));
                style.justify_content = option.i32_at(2).and_then(to_taffy_justify);
                style.align_items = option.i32_at(3).and_then(to_taffy_item_align);
            }
        }
        NodeType::List => {
            if a.int(tag::NODE_LIST_DIRECTION) == Some(1) {
                style.flex_direction = FlexDirection::Row;
            }
            let space = LengthPercentage::Length(a.length(tag::NODE_LIST_SPACE).unwrap_or(0.0));
            style.gap = Size { width: space, height: space };
        }
        _ => {}
    }

    Ok(style)
}

// =============================================================================
// TREE BUILDING
// =============================================================================

/// Children laid out under `node`: materialized adapter items when it hosts
/// an adapter, else its tree children.
fn layout_children(node: NodeHandle) -> Result<Vec<NodeHandle>> {
    let (children, adapter) = with_node(node, |e| (e.children.clone(), e.hosted_adapter))?;
    match adapter {
        Some(adapter) => crate::adapter::get_all_items(adapter),
        None => Ok(children),
    }
}

fn delegates_measure(node: NodeHandle, node_type: NodeType) -> bool {
    node_type == NodeType::Custom && is_custom_event_registered(node, CustomEventFlags::MEASURE)
}

fn build(tree: &mut TaffyTree<NodeHandle>, node: NodeHandle, out: &mut Vec<(NodeHandle, NodeId)>) -> Result<NodeId> {
    let node_type = with_node(node, |e| e.node_type)?;
    let style = build_style(node, node_type)?;

    let id = if delegates_measure(node, node_type) {
        tree.new_leaf_with_context(style, node).map_err(engine_error)?
    } else {
        let mut ids = Vec::new();
        for child in layout_children(node)? {
            ids.push(build(tree, child, out)?);
        }
        tree.new_with_children(style, &ids).map_err(engine_error)?
    };
    out.push((node, id));
    Ok(id)
}

/// Ask a CUSTOM node's receivers for its size.
fn measure_custom(node: NodeHandle, known: Size<Option<f32>>, available: Size<AvailableSpace>) -> Size<f32> {
    let max = |k: Option<f32>, a: AvailableSpace| match (k, a) {
        (Some(v), _) => v,
        (None, AvailableSpace::Definite(v)) => v,
        (None, _) => f32::INFINITY,
    };
    let max_width = max(known.width, available.width);
    let max_height = max(known.height, available.height);
    let constraint = LayoutConstraint {
        min_width: known.width.unwrap_or(0.0),
        max_width,
        min_height: known.height.unwrap_or(0.0),
        max_height,
        percent_reference_width: max_width,
        percent_reference_height: max_height,
    };

    if let Err(e) = dispatch_custom_event(node, CustomEventFlags::MEASURE, &CustomPayload::Measure(constraint)) {
        log::warn!("measure of {node} failed: {e}");
        return Size::ZERO;
    }
    let measured = with_node(node, |e| e.measured).unwrap_or_default();
    Size {
        width: known.width.unwrap_or(measured.width as f32),
        height: known.height.unwrap_or(measured.height as f32),
    }
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

fn available(max: f32) -> AvailableSpace {
    if max.is_finite() { AvailableSpace::Definite(max) } else { AvailableSpace::MaxContent }
}

/// Measure `root` and its subtree under `constraint`.
///
/// Writes the measured size of every node in the subtree and the position of
/// every node except `root` (which its parent places with `layout_node`).
pub(crate) fn measure_subtree(root: NodeHandle, constraint: &LayoutConstraint) -> Result<IntSize> {
    let mut tree: TaffyTree<NodeHandle> = TaffyTree::new();
    let mut nodes = Vec::new();
    let root_id = build(&mut tree, root, &mut nodes)?;

    let mut root_style = tree.style(root_id).map_err(engine_error)?.clone();
    if constraint.min_width > 0.0 {
        root_style.min_size.width = Dimension::Length(constraint.min_width);
    }
    if constraint.min_height > 0.0 {
        root_style.min_size.height = Dimension::Length(constraint.min_height);
    }
    if constraint.max_width.is_finite() {
        root_style.max_size.width = Dimension::Length(constraint.max_width);
    }
    if constraint.max_height.is_finite() {
        root_style.max_size.height = Dimension::Length(constraint.max_height);
    }
    tree.set_style(root_id, root_style).map_err(engine_error)?;

    let space = Size {
        width: available(constraint.max_width),
        height: available(constraint.max_height),
    };
    tree.compute_layout_with_measure(
        root_id,
        space,
        |known: Size<Option<f32>>,
         available_space: Size<AvailableSpace>,
         _id: NodeId,
         context: Option<&mut NodeHandle>,
         _style: &Style| match context {
            Some(node) => measure_custom(*node, known, available_space),
            None => Size::ZERO,
        },
    )
    .map_err(engine_error)?;

    let mut root_size = IntSize::default();
    for (node, id) in nodes {
        let layout = tree.layout(id).map_err(engine_error)?;
        let size = IntSize {
            width: layout.size.width.round() as i32,
            height: layout.size.height.round() as i32,
        };
        let location = IntOffset {
            x: layout.location.x.round() as i32,
            y: layout.location.y.round() as i32,
        };
        let is_root = node == root;
        with_node_mut(node, |e| {
            e.measured = size;
            if !is_root {
                e.position = location;
            }
            e.dirty.remove(DirtyFlags::NEED_MEASURE);
            e.dirty.insert(DirtyFlags::NEED_LAYOUT);
        })?;
        if is_root {
            root_size = size;
        }
    }

    log::trace!("measured {root}: {}x{}", root_size.width, root_size.height);
    Ok(root_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::set_attribute;
    use crate::node::{add_child, create_node};

    fn setup() {
        crate::reset_all();
    }

    fn sized(t: NodeType, w: f32, h: f32) -> NodeHandle {
        let node = create_node(t);
        set_attribute(node, tag::NODE_WIDTH, &AttributeItem::f32s(&[w])).unwrap();
        set_attribute(node, tag::NODE_HEIGHT, &AttributeItem::f32s(&[h])).unwrap();
        node
    }

    fn position(node: NodeHandle) -> IntOffset {
        with_node(node, |e| e.position).unwrap()
    }

    #[test]
    fn test_column_stacks_children() {
        setup();
        let column = create_node(NodeType::Column);
        set_attribute(column, tag::NODE_COLUMN_ALIGN_ITEMS, &AttributeItem::i32s(&[0])).unwrap();
        let a = sized(NodeType::Stack, 50.0, 10.0);
        let b = sized(NodeType::Stack, 30.0, 20.0);
        add_child(column, a).unwrap();
        add_child(column, b).unwrap();

        let size = measure_subtree(column, &LayoutConstraint::loose(200.0, 200.0)).unwrap();
        assert_eq!(size, IntSize { width: 50, height: 30 });
        assert_eq!(position(a), IntOffset { x: 0, y: 0 });
        assert_eq!(position(b), IntOffset { x: 0, y: 10 });
    }

    #[test]
    fn test_row_with_padding() {
        setup();
        let row = create_node(NodeType::Row);
        set_attribute(row, tag::NODE_PADDING, &AttributeItem::f32s(&[5.0])).unwrap();
        let a = sized(NodeType::Stack, 10.0, 10.0);
        let b = sized(NodeType::Stack, 10.0, 10.0);
        add_child(row, a).unwrap();
        add_child(row, b).unwrap();

        let size = measure_subtree(row, &LayoutConstraint::loose(200.0, 200.0)).unwrap();
        assert_eq!(size, IntSize { width: 30, height: 20 });
        assert_eq!(position(b), IntOffset { x: 15, y: 5 });
    }

    #[test]
    fn test_tight_constraint_and_flex_grow() {
        setup();
        let row = create_node(NodeType::Row);
        let fixed = sized(NodeType::Stack, 40.0, 10.0);
        let grow = create_node(NodeType::Stack);
        set_attribute(grow, tag::NODE_FLEX_GROW, &AttributeItem::f32s(&[1.0])).unwrap();
        add_child(row, fixed).unwrap();
        add_child(row, grow).unwrap();

        let size = measure_subtree(row, &LayoutConstraint::tight(100.0, 20.0)).unwrap();
        assert_eq!(size, IntSize { width: 100, height: 20 });
        assert_eq!(with_node(grow, |e| e.measured.width).unwrap(), 60);
    }

    #[test]
    fn test_density_scales_vp_lengths() {
        setup();
        config::configure(config::FacadeConfig { density: 2.0, ..Default::default() });
        let node = sized(NodeType::Stack, 10.0, 5.0);
        let size = measure_subtree(node, &LayoutConstraint::loose(100.0, 100.0)).unwrap();
        assert_eq!(size, IntSize { width: 20, height: 10 });

        crate::node::set_length_metric_unit(node, LengthUnit::Px).unwrap();
        let size = measure_subtree(node, &LayoutConstraint::loose(100.0, 100.0)).unwrap();
        assert_eq!(size, IntSize { width: 10, height: 5 });
    }

    #[test]
    fn test_hidden_child_takes_no_space() {
        setup();
        let column = create_node(NodeType::Column);
        let a = sized(NodeType::Stack, 10.0, 10.0);
        let b = sized(NodeType::Stack, 10.0, 10.0);
        set_attribute(b, tag::NODE_VISIBILITY, &AttributeItem::i32s(&[2])).unwrap();
        add_child(column, a).unwrap();
        add_child(column, b).unwrap();
        let size = measure_subtree(column, &LayoutConstraint::loose(100.0, 100.0)).unwrap();
        assert_eq!(size.height, 10);
    }
}
