//! Tree Manager - parent/child linkage over the node registry.
//!
//! A node has at most one parent and appears in its parent's children exactly
//! once. Re-parenting requires an explicit [`remove_child`] first.
//!
//! Insertion positions:
//! - [`insert_child_after`] with no sibling prepends
//! - [`insert_child_before`] with no sibling appends
//! - [`insert_child_at`] with a negative or past-the-end position appends
//!
//! A sibling that is not a child of `parent` also falls back to appending.

use crate::error::{Error, Result};
use crate::types::{DirtyFlags, NodeHandle};

use super::registry::{with_mutable_node, with_node, with_node_mut};

// =============================================================================
// Insertion
// =============================================================================

/// Where a child lands in its new parent's list.
#[derive(Debug, Clone, Copy)]
enum Position {
    Front,
    Back,
    After(NodeHandle),
    Before(NodeHandle),
    At(usize),
}

fn check_attachable(parent: NodeHandle, child: NodeHandle) -> Result<()> {
    if parent == child {
        return Err(Error::param(format!("{child} cannot be its own child")));
    }

    let (hosts_adapter, builder) = with_node(parent, |p| (p.hosted_adapter.is_some(), p.builder))?;
    if builder {
        return Err(Error::BuilderNode);
    }
    if hosts_adapter {
        return Err(Error::AdapterExistInHost);
    }

    if let Some(old) = with_node(child, |c| c.parent)? {
        return Err(Error::param(format!("{child} already has parent {old}")));
    }

    // Walk up from parent: child must not be an ancestor.
    let mut cursor = Some(parent);
    while let Some(node) = cursor {
        if node == child {
            return Err(Error::param(format!("{child} is an ancestor of {parent}")));
        }
        cursor = with_node(node, |n| n.parent)?;
    }
    Ok(())
}

fn attach(parent: NodeHandle, child: NodeHandle, position: Position) -> Result<()> {
    if let Err(err) = check_attachable(parent, child) {
        log::warn!("attach {child} to {parent} rejected: {err}");
        return Err(err);
    }

    with_mutable_node(parent, |p| {
        let len = p.children.len();
        let index = match position {
            Position::Front => 0,
            Position::Back => len,
            Position::At(i) => i.min(len),
            Position::After(sibling) => p
                .children
                .iter()
                .position(|c| *c == sibling)
                .map_or(len, |i| i + 1),
            Position::Before(sibling) => p
                .children
                .iter()
                .position(|c| *c == sibling)
                .unwrap_or(len),
        };
        p.children.insert(index, child);
    })?;
    with_node_mut(child, |c| c.parent = Some(parent))?;

    crate::layout::propagate_dirty(parent, DirtyFlags::NEED_MEASURE);
    Ok(())
}

/// Append `child` to `parent`'s children.
pub fn add_child(parent: NodeHandle, child: NodeHandle) -> Result<()> {
    attach(parent, child, Position::Back)
}

/// Insert `child` right after `sibling`, or first when `sibling` is `None`.
pub fn insert_child_after(
    parent: NodeHandle,
    child: NodeHandle,
    sibling: Option<NodeHandle>,
) -> Result<()> {
    let position = sibling.map_or(Position::Front, Position::After);
    attach(parent, child, position)
}

/// Insert `child` right before `sibling`, or last when `sibling` is `None`.
pub fn insert_child_before(
    parent: NodeHandle,
    child: NodeHandle,
    sibling: Option<NodeHandle>,
) -> Result<()> {
    let position = sibling.map_or(Position::Back, Position::Before);
    attach(parent, child, position)
}

/// Insert `child` at `position`. Negative or out-of-range positions append.
pub fn insert_child_at(parent: NodeHandle, child: NodeHandle, position: i32) -> Result<()> {
    let position = usize::try_from(position).map_or(Position::Back, Position::At);
    attach(parent, child, position)
}

// =============================================================================
// Removal
// =============================================================================

/// Detach `child` from `parent`. The child stays alive.
pub fn remove_child(parent: NodeHandle, child: NodeHandle) -> Result<()> {
    with_node(child, |_| ())?;
    with_mutable_node(parent, |p| -> Result<()> {
        let index = p
            .children
            .iter()
            .position(|c| *c == child)
            .ok_or_else(|| Error::param(format!("{child} is not a child of {parent}")))?;
        p.children.remove(index);
        Ok(())
    })??;
    with_node_mut(child, |c| c.parent = None)?;

    crate::layout::propagate_dirty(parent, DirtyFlags::NEED_MEASURE);
    Ok(())
}

/// Detach every child of `parent`.
pub fn remove_all_children(parent: NodeHandle) -> Result<()> {
    let children = with_mutable_node(parent, |p| std::mem::take(&mut p.children))?;
    for child in &children {
        let _ = with_node_mut(*child, |c| c.parent = None);
    }
    if !children.is_empty() {
        crate::layout::propagate_dirty(parent, DirtyFlags::NEED_MEASURE);
    }
    Ok(())
}

// =============================================================================
// Accessors
// =============================================================================

/// Number of children. Stale handles report 0.
pub fn get_total_child_count(node: NodeHandle) -> u32 {
    with_node(node, |n| n.children.len() as u32).unwrap_or(0)
}

pub fn get_child_at(node: NodeHandle, index: i32) -> Option<NodeHandle> {
    let index = usize::try_from(index).ok()?;
    with_node(node, |n| n.children.get(index).copied()).ok().flatten()
}

pub fn get_first_child(node: NodeHandle) -> Option<NodeHandle> {
    with_node(node, |n| n.children.first().copied()).ok().flatten()
}

pub fn get_last_child(node: NodeHandle) -> Option<NodeHandle> {
    with_node(node, |n| n.children.last().copied()).ok().flatten()
}

pub fn get_parent(node: NodeHandle) -> Option<NodeHandle> {
    with_node(node, |n| n.parent).ok().flatten()
}

fn sibling(node: NodeHandle, offset: isize) -> Option<NodeHandle> {
    let parent = get_parent(node)?;
    with_node(parent, |p| {
        let i = p.children.iter().position(|c| *c == node)?;
        let j = i.checked_add_signed(offset)?;
        p.children.get(j).copied()
    })
    .ok()
    .flatten()
}

pub fn get_previous_sibling(node: NodeHandle) -> Option<NodeHandle> {
    sibling(node, -1)
}

pub fn get_next_sibling(node: NodeHandle) -> Option<NodeHandle> {
    sibling(node, 1)
}

/// Children of `node` in order. Stale handles yield an empty list.
pub fn children(node: NodeHandle) -> Vec<NodeHandle> {
    with_node(node, |n| n.children.clone()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{create_builder_node, create_node, dispose_node};
    use crate::types::NodeType;

    fn setup() -> (NodeHandle, [NodeHandle; 3]) {
        crate::reset_all();
        let parent = create_node(NodeType::Column);
        let kids = [
            create_node(NodeType::Text),
            create_node(NodeType::Text),
            create_node(NodeType::Text),
        ];
        (parent, kids)
    }

    #[test]
    fn test_add_and_enumerate() {
        let (parent, [a, b, c]) = setup();
        add_child(parent, a).unwrap();
        add_child(parent, b).unwrap();
        add_child(parent, c).unwrap();

        assert_eq!(get_total_child_count(parent), 3);
        let listed: Vec<_> = (0..3).filter_map(|i| get_child_at(parent, i)).collect();
        assert_eq!(listed, vec![a, b, c]);
        assert_eq!(get_child_at(parent, 3), None);
        assert_eq!(get_child_at(parent, -1), None);
        assert_eq!(get_parent(b), Some(parent));
    }

    #[test]
    fn test_insert_positions() {
        let (parent, [a, b, c]) = setup();
        add_child(parent, a).unwrap();

        insert_child_after(parent, b, None).unwrap();
        assert_eq!(children(parent), vec![b, a]);

        insert_child_before(parent, c, Some(a)).unwrap();
        assert_eq!(children(parent), vec![b, c, a]);

        remove_child(parent, c).unwrap();
        insert_child_before(parent, c, None).unwrap();
        assert_eq!(children(parent), vec![b, a, c]);

        remove_child(parent, b).unwrap();
        insert_child_after(parent, b, Some(a)).unwrap();
        assert_eq!(children(parent), vec![a, b, c]);
    }

    #[test]
    fn test_insert_at_out_of_range_appends() {
        let (parent, [a, b, c]) = setup();
        add_child(parent, a).unwrap();
        insert_child_at(parent, b, -1).unwrap();
        insert_child_at(parent, c, 99).unwrap();
        assert_eq!(children(parent), vec![a, b, c]);

        remove_child(parent, c).unwrap();
        insert_child_at(parent, c, 0).unwrap();
        assert_eq!(children(parent), vec![c, a, b]);
    }

    #[test]
    fn test_siblings() {
        let (parent, [a, b, c]) = setup();
        for k in [a, b, c] {
            add_child(parent, k).unwrap();
        }
        assert_eq!(get_first_child(parent), Some(a));
        assert_eq!(get_last_child(parent), Some(c));
        assert_eq!(get_previous_sibling(a), None);
        assert_eq!(get_previous_sibling(b), Some(a));
        assert_eq!(get_next_sibling(b), Some(c));
        assert_eq!(get_next_sibling(c), None);
        assert_eq!(get_next_sibling(parent), None);
    }

    #[test]
    fn test_reparent_requires_removal() {
        let (parent, [a, _, _]) = setup();
        let other = create_node(NodeType::Row);
        add_child(parent, a).unwrap();

        assert!(matches!(add_child(other, a), Err(Error::ParamInvalid(_))));
        assert!(matches!(add_child(parent, a), Err(Error::ParamInvalid(_))));

        remove_child(parent, a).unwrap();
        add_child(other, a).unwrap();
        assert_eq!(get_parent(a), Some(other));
    }

    #[test]
    fn test_rejects_cycles_and_self() {
        let (parent, [a, _, _]) = setup();
        add_child(parent, a).unwrap();
        assert!(matches!(add_child(a, parent), Err(Error::ParamInvalid(_))));
        assert!(matches!(add_child(a, a), Err(Error::ParamInvalid(_))));
    }

    #[test]
    fn test_builder_parent_is_read_only() {
        let (_, [a, b, _]) = setup();
        let frozen = create_builder_node(NodeType::Stack);
        assert_eq!(add_child(frozen, a), Err(Error::BuilderNode));
        assert_eq!(insert_child_at(frozen, a, 0), Err(Error::BuilderNode));
        assert_eq!(remove_all_children(frozen), Err(Error::BuilderNode));

        // Generated nodes may still be mounted under native parents.
        let host = create_node(NodeType::Stack);
        add_child(host, frozen).unwrap();
        assert_eq!(remove_child(frozen, b), Err(Error::BuilderNode));
    }

    #[test]
    fn test_remove_non_child() {
        let (parent, [a, _, _]) = setup();
        assert!(matches!(remove_child(parent, a), Err(Error::ParamInvalid(_))));
    }

    #[test]
    fn test_remove_all_and_dispose_orphans() {
        let (parent, [a, b, c]) = setup();
        for k in [a, b, c] {
            add_child(parent, k).unwrap();
        }
        remove_all_children(parent).unwrap();
        assert_eq!(get_total_child_count(parent), 0);
        assert_eq!(get_parent(a), None);

        add_child(parent, a).unwrap();
        dispose_node(parent).unwrap();
        assert_eq!(get_parent(a), None);
        assert_eq!(get_total_child_count(parent), 0);
    }

    #[test]
    fn test_dispose_child_detaches() {
        let (parent, [a, b, _]) = setup();
        add_child(parent, a).unwrap();
        add_child(parent, b).unwrap();
        dispose_node(a).unwrap();
        assert_eq!(children(parent), vec![b]);
    }

    #[test]
    fn test_stale_handles() {
        let (parent, [a, _, _]) = setup();
        dispose_node(a).unwrap();
        assert!(matches!(add_child(parent, a), Err(Error::StaleHandle(_))));
        assert_eq!(get_parent(a), None);
    }
}
