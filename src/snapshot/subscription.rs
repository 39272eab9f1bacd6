//! Subscriber registry and unsubscribe handles

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use super::model::Snapshot;

pub(crate) type LocalCallback = Rc<dyn Fn(&Arc<Snapshot>)>;

/// Callbacks in registration order, each under a unique id
pub(crate) struct SubscriberList<C> {
    next_id: u64,
    entries: Vec<(u64, C)>,
}

impl<C: Clone> SubscriberList<C> {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    pub(crate) fn add(&mut self, callback: C) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push((id, callback));
        id
    }

    /// Returns false when `id` was already removed
    pub(crate) fn remove(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub(crate) fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|(entry_id, _)| *entry_id == id)
    }

    /// Copy of the callbacks, so they can run without holding the list
    pub(crate) fn handles(&self) -> Vec<C> {
        self.entries.iter().map(|(_, c)| c.clone()).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Handle returned by `SnapshotStore::subscribe`.
///
/// Dropping the handle leaves the callback registered; call `unsubscribe`.
pub struct Subscription {
    id: u64,
    list: Weak<RefCell<SubscriberList<LocalCallback>>>,
}

impl Subscription {
    pub(crate) fn new(id: u64, list: Weak<RefCell<SubscriberList<LocalCallback>>>) -> Self {
        Self { id, list }
    }

    /// Deregister the callback. Further calls are no-ops.
    pub fn unsubscribe(&self) {
        if let Some(list) = self.list.upgrade() {
            if list.borrow_mut().remove(self.id) {
                log::debug!("Subscriber {} removed", self.id);
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.list
            .upgrade()
            .map_or(false, |list| list.borrow().contains(self.id))
    }
}
