//! Node Adapter - lazy materialization for virtualized containers.
//!
//! An adapter maps a linear index space `[0, total)` onto nodes produced on
//! demand by the caller's receiver. Only indices inside the host's visible
//! window (widened by the cached count on each side) are materialized.
//!
//! Each index holds a stable key; materialized nodes are stored by key. Insert,
//! remove and move rewrite only the index→key list, so every index whose key
//! did not change keeps the same node.
//!
//! Per index:
//! `Unmaterialized -> (ON_GET_NODE_ID, ON_ADD_NODE_TO_ADAPTER) -> Materialized
//!  -> (ON_REMOVE_NODE_FROM_ADAPTER) -> Unmaterialized`
//!
//! Adapter items are not tree children of the host. A host with an adapter
//! refuses `add_child`, and an adapter refuses a host that has children.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::ops::Range;
use std::rc::Rc;

use crate::attribute::{self, tag};
use crate::config;
use crate::error::{Error, Result};
use crate::node::{with_node, with_node_mut};
use crate::types::{ExternalRef, NodeAdapterHandle, NodeHandle};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum AdapterEventType {
    WillAttachToNode = 1,
    WillDetachFromNode = 2,
    OnGetNodeId = 3,
    OnAddNodeToAdapter = 4,
    OnRemoveNodeFromAdapter = 5,
}

/// Event handed to an adapter's receiver.
///
/// `ON_GET_NODE_ID` receivers may answer with [`set_node_id`](Self::set_node_id)
/// (default: the index). `ON_ADD_NODE_TO_ADAPTER` receivers answer with
/// [`set_item`](Self::set_item).
#[derive(Debug, Clone)]
pub struct AdapterEvent {
    pub kind: AdapterEventType,
    pub adapter: NodeAdapterHandle,
    pub host: Option<NodeHandle>,
    pub index: u32,
    pub user_data: Option<ExternalRef>,
    node_id: i32,
    removed: Option<NodeHandle>,
    item: Option<NodeHandle>,
}

impl AdapterEvent {
    pub fn node_id(&self) -> i32 {
        self.node_id
    }

    pub fn set_node_id(&mut self, id: i32) {
        self.node_id = id;
    }

    /// Node leaving the adapter (`ON_REMOVE_NODE_FROM_ADAPTER`).
    pub fn removed_node(&self) -> Option<NodeHandle> {
        self.removed
    }

    pub fn set_item(&mut self, node: NodeHandle) {
        self.item = Some(node);
    }
}

pub type AdapterReceiver = dyn Fn(&mut AdapterEvent);

type SlotKey = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Item {
    node: NodeHandle,
    node_id: i32,
}

/// Items released by a reload, reusable by node id.
///
/// Several items may share an id; each is handed out at most once and the
/// rest are evicted after the window is rebuilt.
#[derive(Default)]
struct RecyclePool {
    by_id: HashMap<i32, VecDeque<(u32, Item)>>,
}

impl RecyclePool {
    fn new() -> Self {
        Self::default()
    }

    fn put(&mut self, index: u32, item: Item) {
        self.by_id.entry(item.node_id).or_default().push_back((index, item));
    }

    fn take(&mut self, node_id: i32) -> Option<Item> {
        let queue = self.by_id.get_mut(&node_id)?;
        let (_, item) = queue.pop_front()?;
        if queue.is_empty() {
            self.by_id.remove(&node_id);
        }
        Some(item)
    }

    /// Everything not taken, in index order.
    fn into_leftovers(self) -> Vec<(u32, Item)> {
        let mut leftovers: Vec<(u32, Item)> = self.by_id.into_values().flatten().collect();
        leftovers.sort_by_key(|(i, _)| *i);
        leftovers
    }
}

struct AdapterState {
    host: Option<NodeHandle>,
    receiver: Option<Rc<AdapterReceiver>>,
    user_data: Option<ExternalRef>,
    /// Index → stable key. `slots.len()` is the total node count.
    slots: Vec<SlotKey>,
    /// Materialized nodes by key.
    items: HashMap<SlotKey, Item>,
    next_key: SlotKey,
    /// Visible index range reported by the host.
    visible: Option<Range<u32>>,
}

impl AdapterState {
    fn new() -> Self {
        Self {
            host: None,
            receiver: None,
            user_data: None,
            slots: Vec::new(),
            items: HashMap::new(),
            next_key: 0,
            visible: None,
        }
    }

    fn total(&self) -> u32 {
        self.slots.len() as u32
    }

    fn fresh_key(&mut self) -> SlotKey {
        let key = self.next_key;
        self.next_key += 1;
        key
    }

    /// Indices that should be materialized.
    fn window(&self, cached: u32) -> Range<u32> {
        let Some(visible) = &self.visible else {
            return 0..0;
        };
        let total = self.total();
        let end = visible.end.saturating_add(cached).min(total);
        let start = visible.start.saturating_sub(cached).min(end);
        start..end
    }

    /// Materialized items in index order.
    fn materialized(&self) -> Vec<(u32, Item)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, key)| self.items.get(key).map(|item| (i as u32, *item)))
            .collect()
    }
}

thread_local! {
    static ADAPTERS: RefCell<HashMap<u32, AdapterState>> = RefCell::new(HashMap::new());
    static NEXT_ADAPTER: RefCell<u32> = const { RefCell::new(0) };
}

// =============================================================================
// State Access
// =============================================================================

fn with_adapter<R>(adapter: NodeAdapterHandle, f: impl FnOnce(&mut AdapterState) -> R) -> Result<R> {
    ADAPTERS.with(|a| {
        let mut a = a.borrow_mut();
        a.get_mut(&adapter.0)
            .map(f)
            .ok_or_else(|| Error::StaleHandle(format!("{adapter:?}")))
    })
}

fn require_host(adapter: NodeAdapterHandle) -> Result<NodeHandle> {
    with_adapter(adapter, |s| s.host)?.ok_or(Error::AdapterNoneHost)
}

fn check_range(start: u32, count: u32, total: u32) -> Result<()> {
    match start.checked_add(count) {
        Some(end) if end <= total => Ok(()),
        _ => Err(Error::IndexInvalid { index: start as i64 + count as i64, count: total }),
    }
}

/// Cached count set on the host, else the configured default.
fn cached_count(host: Option<NodeHandle>) -> u32 {
    let Some(host) = host else {
        return 0;
    };
    let stored = crate::node::node_type_of(host)
        .ok()
        .and_then(tag::cached_count_tag_for)
        .and_then(|t| attribute::stored_attribute(host, t))
        .and_then(|item| item.i32_at(0));
    match stored {
        Some(n) => n.max(0) as u32,
        None => config::config().default_cached_count,
    }
}

// =============================================================================
// Receiver Calls
// =============================================================================

/// Run the receiver with no adapter borrow held.
fn fire(
    adapter: NodeAdapterHandle,
    kind: AdapterEventType,
    index: u32,
    node_id: i32,
    removed: Option<NodeHandle>,
) -> Option<AdapterEvent> {
    let (receiver, host, user_data) = ADAPTERS
        .with(|a| a.borrow().get(&adapter.0).map(|s| (s.receiver.clone(), s.host, s.user_data)))?;

    let mut event = AdapterEvent {
        kind,
        adapter,
        host,
        index,
        user_data,
        node_id,
        removed,
        item: None,
    };
    if let Some(receiver) = receiver {
        receiver(&mut event);
    }
    Some(event)
}

fn evict(adapter: NodeAdapterHandle, index: u32, item: Item) {
    log::trace!("{adapter:?} evicting index {index} ({})", item.node);
    fire(
        adapter,
        AdapterEventType::OnRemoveNodeFromAdapter,
        index,
        item.node_id,
        Some(item.node),
    );
}

fn materialize(adapter: NodeAdapterHandle, index: u32, key: SlotKey, pool: &mut RecyclePool) {
    let Some(event) = fire(adapter, AdapterEventType::OnGetNodeId, index, index as i32, None) else {
        return;
    };
    let node_id = event.node_id;

    let item = match pool.take(node_id) {
        Some(item) => item,
        None => {
            let Some(event) = fire(adapter, AdapterEventType::OnAddNodeToAdapter, index, node_id, None)
            else {
                return;
            };
            match event.item {
                Some(node) => Item { node, node_id },
                None => {
                    log::warn!("{adapter:?} receiver produced no node for index {index}");
                    return;
                }
            }
        }
    };

    // The receiver may have edited the adapter while it ran.
    let stored = with_adapter(adapter, |s| {
        if s.slots.contains(&key) {
            s.items.insert(key, item);
            true
        } else {
            false
        }
    })
    .unwrap_or(false);
    if !stored {
        evict(adapter, index, item);
    }
}

/// Bring materialized items in line with the current window.
fn sync_window(adapter: NodeAdapterHandle, mut pool: RecyclePool) {
    let host = with_adapter(adapter, |s| s.host).ok().flatten();
    let cached = cached_count(host);

    let plan = with_adapter(adapter, |s| {
        let window = if s.host.is_some() { s.window(cached) } else { 0..0 };
        let index_of: HashMap<SlotKey, u32> =
            s.slots.iter().enumerate().map(|(i, k)| (*k, i as u32)).collect();
        let total = s.total();

        let mut evicted = Vec::new();
        s.items.retain(|key, item| match index_of.get(key) {
            Some(i) if window.contains(i) => true,
            found => {
                evicted.push((found.copied().unwrap_or(total), *item));
                false
            }
        });
        evicted.sort_by_key(|(i, _)| *i);

        let missing: Vec<(u32, SlotKey)> = window
            .clone()
            .map(|i| (i, s.slots[i as usize]))
            .filter(|(_, key)| !s.items.contains_key(key))
            .collect();
        (evicted, missing)
    });
    let Ok((evicted, missing)) = plan else {
        return;
    };

    for (index, item) in evicted {
        evict(adapter, index, item);
    }
    for (index, key) in missing {
        materialize(adapter, index, key, &mut pool);
    }

    for (index, item) in pool.into_leftovers() {
        evict(adapter, index, item);
    }
}

// =============================================================================
// Lifecycle
// =============================================================================

pub fn create_node_adapter() -> NodeAdapterHandle {
    let id = NEXT_ADAPTER.with(|n| {
        let mut n = n.borrow_mut();
        let id = *n;
        *n += 1;
        id
    });
    ADAPTERS.with(|a| a.borrow_mut().insert(id, AdapterState::new()));
    log::debug!("created node adapter {id}");
    NodeAdapterHandle(id)
}

/// Release an adapter, unbinding it from its host first.
pub fn dispose_node_adapter(adapter: NodeAdapterHandle) -> Result<()> {
    let host = with_adapter(adapter, |s| s.host)?;
    if let Some(host) = host {
        unbind(adapter, host);
        attribute::clear_adapter_attribute(host);
    }
    ADAPTERS.with(|a| a.borrow_mut().remove(&adapter.0));
    log::debug!("disposed {adapter:?}");
    Ok(())
}

/// Install the adapter's receiver, replacing any previous one.
pub fn register_node_adapter_event_receiver<F>(
    adapter: NodeAdapterHandle,
    user_data: Option<ExternalRef>,
    receiver: F,
) -> Result<()>
where
    F: Fn(&mut AdapterEvent) + 'static,
{
    with_adapter(adapter, |s| {
        s.receiver = Some(Rc::new(receiver));
        s.user_data = user_data;
    })
}

pub fn unregister_node_adapter_event_receiver(adapter: NodeAdapterHandle) -> Result<()> {
    with_adapter(adapter, |s| {
        s.receiver = None;
        s.user_data = None;
    })
}

pub fn get_adapter_host(adapter: NodeAdapterHandle) -> Result<Option<NodeHandle>> {
    with_adapter(adapter, |s| s.host)
}

// =============================================================================
// Host Binding
// =============================================================================

/// Bind `adapter` to `host` (adapter-binding attribute set).
pub(crate) fn attach_to_host(adapter: NodeAdapterHandle, host: NodeHandle) -> Result<()> {
    let (hosted, child_count) = with_node(host, |e| (e.hosted_adapter, e.children.len()))?;
    if hosted == Some(adapter) {
        return Ok(());
    }

    let current = with_adapter(adapter, |s| s.host)?;
    if current.is_some() {
        return Err(Error::AdapterExistInHost);
    }
    if child_count > 0 {
        return Err(Error::AdapterChildNodeExist(child_count));
    }
    if let Some(previous) = hosted {
        unbind(previous, host);
    }

    with_adapter(adapter, |s| s.host = Some(host))?;
    with_node_mut(host, |e| e.hosted_adapter = Some(adapter))?;
    fire(adapter, AdapterEventType::WillAttachToNode, 0, 0, None);
    log::debug!("{adapter:?} attached to {host}");

    sync_window(adapter, RecyclePool::new());
    crate::layout::propagate_dirty(host, crate::types::DirtyFlags::NEED_MEASURE);
    Ok(())
}

/// Unbind whatever adapter `host` carries (adapter-binding attribute reset).
pub(crate) fn detach_from_host(host: NodeHandle) -> Result<()> {
    let hosted = with_node(host, |e| e.hosted_adapter)?;
    if let Some(adapter) = hosted {
        unbind(adapter, host);
        crate::layout::propagate_dirty(host, crate::types::DirtyFlags::NEED_MEASURE);
    }
    Ok(())
}

/// Host is being disposed.
pub(crate) fn host_disposed(adapter: NodeAdapterHandle, host: NodeHandle) {
    unbind(adapter, host);
}

fn unbind(adapter: NodeAdapterHandle, host: NodeHandle) {
    fire(adapter, AdapterEventType::WillDetachFromNode, 0, 0, None);

    let items = with_adapter(adapter, |s| {
        let items = s.materialized();
        s.items.clear();
        s.host = None;
        s.visible = None;
        items
    })
    .unwrap_or_default();
    for (index, item) in items {
        evict(adapter, index, item);
    }

    let _ = with_node_mut(host, |e| {
        if e.hosted_adapter == Some(adapter) {
            e.hosted_adapter = None;
        }
    });
    log::debug!("{adapter:?} detached from {host}");
}

// =============================================================================
// Index Space
// =============================================================================

/// Resize the index space. Indices past the new end are evicted.
pub fn set_total_node_count(adapter: NodeAdapterHandle, count: u32) -> Result<()> {
    let dropped = with_adapter(adapter, |s| {
        let total = s.total();
        let mut dropped = Vec::new();
        if count < total {
            for (i, key) in s.slots.drain(count as usize..).enumerate() {
                if let Some(item) = s.items.remove(&key) {
                    dropped.push((count + i as u32, item));
                }
            }
        } else {
            for _ in total..count {
                let key = s.fresh_key();
                s.slots.push(key);
            }
        }
        dropped
    })?;

    for (index, item) in dropped {
        evict(adapter, index, item);
    }
    sync_window(adapter, RecyclePool::new());
    Ok(())
}

pub fn get_total_node_count(adapter: NodeAdapterHandle) -> Result<u32> {
    with_adapter(adapter, |s| s.total())
}

/// Re-request every materialized index. Nodes whose id comes back unchanged
/// are kept without a remove/add pair.
pub fn reload_all_items(adapter: NodeAdapterHandle) -> Result<()> {
    require_host(adapter)?;
    let pool = with_adapter(adapter, |s| {
        let mut pool = RecyclePool::new();
        for (index, item) in s.materialized() {
            pool.put(index, item);
        }
        s.items.clear();
        for i in 0..s.slots.len() {
            s.slots[i] = s.fresh_key();
        }
        pool
    })?;
    sync_window(adapter, pool);
    Ok(())
}

/// Re-request `count` indices from `start`.
pub fn reload_item(adapter: NodeAdapterHandle, start: u32, count: u32) -> Result<()> {
    require_host(adapter)?;
    let pool = with_adapter(adapter, |s| {
        check_range(start, count, s.total())?;
        let mut pool = RecyclePool::new();
        for i in start..start + count {
            let old = s.slots[i as usize];
            if let Some(item) = s.items.remove(&old) {
                pool.put(i, item);
            }
            s.slots[i as usize] = s.fresh_key();
        }
        Ok(pool)
    })??;
    sync_window(adapter, pool);
    Ok(())
}

/// Remove `count` indices from `start`; later indices shift down.
pub fn remove_item(adapter: NodeAdapterHandle, start: u32, count: u32) -> Result<()> {
    require_host(adapter)?;
    let removed = with_adapter(adapter, |s| {
        check_range(start, count, s.total())?;
        let keys: Vec<SlotKey> = s.slots.drain(start as usize..(start + count) as usize).collect();
        Ok(keys
            .into_iter()
            .enumerate()
            .filter_map(|(i, key)| s.items.remove(&key).map(|item| (start + i as u32, item)))
            .collect::<Vec<_>>())
    })??;

    for (index, item) in removed {
        evict(adapter, index, item);
    }
    sync_window(adapter, RecyclePool::new());
    Ok(())
}

/// Insert `count` unmaterialized indices at `start`; later indices shift up.
pub fn insert_item(adapter: NodeAdapterHandle, start: u32, count: u32) -> Result<()> {
    require_host(adapter)?;
    with_adapter(adapter, |s| {
        if start > s.total() {
            return Err(Error::IndexInvalid { index: start as i64, count: s.total() });
        }
        let keys: Vec<SlotKey> = (0..count).map(|_| s.fresh_key()).collect();
        s.slots.splice(start as usize..start as usize, keys);
        Ok(())
    })??;
    sync_window(adapter, RecyclePool::new());
    Ok(())
}

/// Move the item at `from` to `to`. The moved item keeps its node.
pub fn move_item(adapter: NodeAdapterHandle, from: u32, to: u32) -> Result<()> {
    require_host(adapter)?;
    with_adapter(adapter, |s| {
        let total = s.total();
        for index in [from, to] {
            if index >= total {
                return Err(Error::IndexInvalid { index: index as i64, count: total });
            }
        }
        let key = s.slots.remove(from as usize);
        s.slots.insert(to as usize, key);
        Ok(())
    })??;
    sync_window(adapter, RecyclePool::new());
    Ok(())
}

/// Materialized nodes in index order.
pub fn get_all_items(adapter: NodeAdapterHandle) -> Result<Vec<NodeHandle>> {
    with_adapter(adapter, |s| s.materialized().into_iter().map(|(_, item)| item.node).collect())
}

/// Materialized node at `index`, if any.
pub fn get_item_at(adapter: NodeAdapterHandle, index: u32) -> Result<Option<NodeHandle>> {
    with_adapter(adapter, |s| {
        let total = s.total();
        let key = s
            .slots
            .get(index as usize)
            .ok_or(Error::IndexInvalid { index: index as i64, count: total })?;
        Ok(s.items.get(key).map(|item| item.node))
    })?
}

/// Report the host's visible index range `[start, end)`.
///
/// Materializes the window widened by the cached count and evicts the rest.
pub fn set_visible_range(adapter: NodeAdapterHandle, start: u32, end: u32) -> Result<()> {
    require_host(adapter)?;
    if start > end {
        return Err(Error::param(format!("visible range {start}..{end} is reversed")));
    }
    with_adapter(adapter, |s| s.visible = Some(start..end))?;
    sync_window(adapter, RecyclePool::new());
    Ok(())
}

/// Reset all adapter state (for testing).
pub fn reset_adapters() {
    ADAPTERS.with(|a| a.borrow_mut().clear());
    NEXT_ADAPTER.with(|n| *n.borrow_mut() = 0);
}
