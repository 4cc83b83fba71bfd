//! Receiver table shared by node events and custom events.
//!
//! Two independent paths, composed by the dispatcher in a fixed order:
//! - per-node receivers, many per node, run in insertion order
//! - one global receiver, last registration wins
//!
//! Both only see events whose kind was registered on the node.

use std::collections::HashMap;
use std::hash::Hash;
use std::rc::Rc;

use crate::types::{ExternalRef, NodeHandle};

/// Identifies a per-node receiver for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReceiverId(pub(crate) u64);

/// What was supplied when an event kind was registered on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    pub target_id: i32,
    pub user_data: Option<ExternalRef>,
}

/// Receivers to invoke for one fired event, cloned out of the table so no
/// borrow is held while they run.
pub(crate) struct Targets<F: ?Sized> {
    pub registration: Registration,
    pub per_node: Vec<Rc<F>>,
    pub global: Option<Rc<F>>,
}

pub(crate) struct ReceiverTable<K, F: ?Sized> {
    registrations: HashMap<(NodeHandle, K), Registration>,
    per_node: HashMap<NodeHandle, Vec<(ReceiverId, Rc<F>)>>,
    global: Option<Rc<F>>,
    next_id: u64,
}

impl<K: Copy + Eq + Hash, F: ?Sized> ReceiverTable<K, F> {
    pub fn new() -> Self {
        Self {
            registrations: HashMap::new(),
            per_node: HashMap::new(),
            global: None,
            next_id: 0,
        }
    }

    /// Register (or re-register) `kind` on `node`. Returns the previous pair.
    pub fn register(&mut self, node: NodeHandle, kind: K, registration: Registration) -> Option<Registration> {
        self.registrations.insert((node, kind), registration)
    }

    pub fn unregister(&mut self, node: NodeHandle, kind: K) -> Option<Registration> {
        self.registrations.remove(&(node, kind))
    }

    pub fn registration(&self, node: NodeHandle, kind: K) -> Option<Registration> {
        self.registrations.get(&(node, kind)).copied()
    }

    pub fn is_registered(&self, node: NodeHandle, kind: K) -> bool {
        self.registrations.contains_key(&(node, kind))
    }

    pub fn add_receiver(&mut self, node: NodeHandle, receiver: Rc<F>) -> ReceiverId {
        let id = ReceiverId(self.next_id);
        self.next_id += 1;
        self.per_node.entry(node).or_default().push((id, receiver));
        id
    }

    /// Remove one per-node receiver. Returns whether it existed.
    pub fn remove_receiver(&mut self, node: NodeHandle, id: ReceiverId) -> bool {
        let Some(list) = self.per_node.get_mut(&node) else {
            return false;
        };
        let before = list.len();
        list.retain(|(rid, _)| *rid != id);
        let removed = list.len() != before;
        if list.is_empty() {
            self.per_node.remove(&node);
        }
        removed
    }

    pub fn receiver_count(&self, node: NodeHandle) -> usize {
        self.per_node.get(&node).map_or(0, Vec::len)
    }

    pub fn set_global(&mut self, receiver: Option<Rc<F>>) {
        self.global = receiver;
    }

    pub fn has_global(&self) -> bool {
        self.global.is_some()
    }

    /// Receivers for `kind` on `node`, or `None` if the kind is not registered.
    pub fn targets(&self, node: NodeHandle, kind: K) -> Option<Targets<F>> {
        let registration = self.registration(node, kind)?;
        let per_node = self
            .per_node
            .get(&node)
            .map(|list| list.iter().map(|(_, r)| r.clone()).collect())
            .unwrap_or_default();
        Some(Targets {
            registration,
            per_node,
            global: self.global.clone(),
        })
    }

    /// Drop everything registered for `node`.
    pub fn forget_node(&mut self, node: NodeHandle) {
        self.registrations.retain(|(n, _), _| *n != node);
        self.per_node.remove(&node);
    }

    pub fn clear(&mut self) {
        self.registrations.clear();
        self.per_node.clear();
        self.global = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Table = ReceiverTable<i32, dyn Fn() -> i32>;

    fn node(i: u32) -> NodeHandle {
        NodeHandle::new(i, 0)
    }

    fn reg(target_id: i32) -> Registration {
        Registration { target_id, user_data: None }
    }

    #[test]
    fn test_register_replaces_pair() {
        let mut table = Table::new();
        assert_eq!(table.register(node(0), 6, reg(1)), None);
        assert_eq!(table.register(node(0), 6, reg(2)), Some(reg(1)));
        assert_eq!(table.registration(node(0), 6), Some(reg(2)));
        assert_eq!(table.unregister(node(0), 6), Some(reg(2)));
        assert!(!table.is_registered(node(0), 6));
    }

    #[test]
    fn test_targets_keep_insertion_order() {
        let mut table = Table::new();
        table.register(node(0), 6, reg(9));
        table.add_receiver(node(0), Rc::new(|| 1));
        let id = table.add_receiver(node(0), Rc::new(|| 2));
        table.add_receiver(node(0), Rc::new(|| 3));
        table.set_global(Some(Rc::new(|| 100)));

        let targets = table.targets(node(0), 6).unwrap();
        let seen: Vec<i32> = targets.per_node.iter().map(|r| r()).collect();
        assert_eq!(seen, vec![1, 2, 3]);
        assert_eq!(targets.global.map(|g| g()), Some(100));
        assert_eq!(targets.registration.target_id, 9);

        assert!(table.remove_receiver(node(0), id));
        assert!(!table.remove_receiver(node(0), id));
        assert_eq!(table.receiver_count(node(0)), 2);
    }

    #[test]
    fn test_unregistered_kind_has_no_targets() {
        let mut table = Table::new();
        table.add_receiver(node(0), Rc::new(|| 1));
        assert!(table.targets(node(0), 6).is_none());
    }

    #[test]
    fn test_forget_node() {
        let mut table = Table::new();
        table.register(node(0), 6, reg(1));
        table.register(node(1), 6, reg(1));
        table.add_receiver(node(0), Rc::new(|| 1));
        table.forget_node(node(0));
        assert!(!table.is_registered(node(0), 6));
        assert!(table.is_registered(node(1), 6));
        assert_eq!(table.receiver_count(node(0)), 0);
    }
}
