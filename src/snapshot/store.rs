//! Single-threaded snapshot store with synchronous change notification
//!
//! The store is an explicit context object: the application builds one and
//! hands it to whichever layer needs it. Create and update run the projector
//! inline, store the result, then call every subscriber in registration order
//! before returning.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use super::model::{Snapshot, SnapshotId};
use super::subscription::{LocalCallback, SubscriberList, Subscription};
use super::table::SnapshotTable;
use crate::assumptions::Assumptions;
use crate::clock::{Clock, SystemClock};
use crate::error::Result;

/// In-memory cache of projected snapshots keyed by id
pub struct SnapshotStore {
    table: SnapshotTable,
    subscribers: Rc<RefCell<SubscriberList<LocalCallback>>>,
}

impl SnapshotStore {
    /// Store reading the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Store with an injected clock (fixed clocks make tests deterministic)
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            table: SnapshotTable::new(clock),
            subscribers: Rc::new(RefCell::new(SubscriberList::new())),
        }
    }

    /// Project `assumptions` under a freshly generated id
    pub fn create_snapshot(
        &mut self,
        assumptions: Assumptions,
        name: Option<&str>,
    ) -> Result<Arc<Snapshot>> {
        let snapshot = self.table.create(assumptions, name)?;
        self.notify(&snapshot);
        Ok(snapshot)
    }

    /// Recompute the snapshot under `id`, replacing it entirely.
    ///
    /// An unknown id is inserted under that id (upsert). When `name` is
    /// `None` the snapshot is named `"Base"`, as on create; nothing carries
    /// over from the replaced value except the id.
    pub fn update_snapshot(
        &mut self,
        id: &SnapshotId,
        assumptions: Assumptions,
        name: Option<&str>,
    ) -> Result<Arc<Snapshot>> {
        let snapshot = self.table.update(id, assumptions, name)?;
        self.notify(&snapshot);
        Ok(snapshot)
    }

    pub fn get_snapshot(&self, id: &SnapshotId) -> Option<Arc<Snapshot>> {
        self.table.get(id)
    }

    /// True if `id` is unknown or was computed from different assumptions
    pub fn needs_recalculation(&self, id: &SnapshotId, assumptions: &Assumptions) -> bool {
        self.table.needs_recalculation(id, assumptions)
    }

    /// Recompute only when the stored snapshot is stale, keeping its name
    pub fn refresh_snapshot(
        &mut self,
        id: &SnapshotId,
        assumptions: Assumptions,
    ) -> Result<Arc<Snapshot>> {
        match self.table.get(id) {
            Some(current) if current.matches(&assumptions) => Ok(current),
            Some(current) => self.update_snapshot(id, assumptions, Some(current.name.as_str())),
            None => self.update_snapshot(id, assumptions, None),
        }
    }

    /// Register a callback for every create and update across all ids
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Arc<Snapshot>) + 'static,
    {
        let id = self.subscribers.borrow_mut().add(Rc::new(callback));
        log::debug!("Subscriber {} registered", id);
        Subscription::new(id, Rc::downgrade(&self.subscribers))
    }

    /// Follow a single id: starts from the stored value and tracks updates
    pub fn watch(&self, id: &SnapshotId) -> SnapshotWatch {
        let latest = Rc::new(RefCell::new(self.table.get(id)));
        let target = id.clone();
        let sink = Rc::clone(&latest);
        let subscription = self.subscribe(move |snapshot| {
            if snapshot.id == target {
                *sink.borrow_mut() = Some(Arc::clone(snapshot));
            }
        });
        SnapshotWatch { latest, subscription }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// Stored ids in sorted order
    pub fn ids(&self) -> Vec<SnapshotId> {
        self.table.ids()
    }

    fn notify(&self, snapshot: &Arc<Snapshot>) {
        // Release the borrow before calling out so callbacks may unsubscribe
        let callbacks = self.subscribers.borrow().handles();
        for callback in callbacks {
            callback(snapshot);
        }
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Latest snapshot for one id, kept current by a store subscription.
///
/// Dropping the watch unsubscribes it.
pub struct SnapshotWatch {
    latest: Rc<RefCell<Option<Arc<Snapshot>>>>,
    subscription: Subscription,
}

impl SnapshotWatch {
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.latest.borrow().clone()
    }
}

impl Drop for SnapshotWatch {
    fn drop(&mut self) {
        self.subscription.unsubscribe();
    }
}
