//! Thread-safe snapshot store
//!
//! Same contract as `SnapshotStore`, for hosts that drive the store from
//! several threads. The snapshot map and the subscriber set each sit behind
//! a mutex. Callbacks run after both locks are released, so a callback may
//! call back into the store.
//!
//! Two threads updating the same id can have their notifications overtake
//! each other. Each stored snapshot carries a generation assigned under the
//! map lock; consumers keep the highest generation they have seen
//! (`Snapshot::supersedes`), which is what `SharedSnapshotWatch` does.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use super::model::{Snapshot, SnapshotId};
use super::subscription::SubscriberList;
use super::table::SnapshotTable;
use crate::assumptions::Assumptions;
use crate::clock::{Clock, SystemClock};
use crate::error::Result;

type SharedCallback = Arc<dyn Fn(&Arc<Snapshot>) + Send + Sync>;
type SharedSubscribers = Mutex<SubscriberList<SharedCallback>>;

/// A poisoned lock only means a callback panicked elsewhere; the data is intact
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Cloneable handle to a store shared between threads
#[derive(Clone)]
pub struct SharedSnapshotStore {
    table: Arc<Mutex<SnapshotTable>>,
    subscribers: Arc<SharedSubscribers>,
}

impl SharedSnapshotStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            table: Arc::new(Mutex::new(SnapshotTable::new(clock))),
            subscribers: Arc::new(Mutex::new(SubscriberList::new())),
        }
    }

    pub fn create_snapshot(
        &self,
        assumptions: Assumptions,
        name: Option<&str>,
    ) -> Result<Arc<Snapshot>> {
        let snapshot = lock(&self.table).create(assumptions, name)?;
        self.notify(&snapshot);
        Ok(snapshot)
    }

    /// Upsert semantics, see `SnapshotStore::update_snapshot`
    pub fn update_snapshot(
        &self,
        id: &SnapshotId,
        assumptions: Assumptions,
        name: Option<&str>,
    ) -> Result<Arc<Snapshot>> {
        let snapshot = lock(&self.table).update(id, assumptions, name)?;
        self.notify(&snapshot);
        Ok(snapshot)
    }

    pub fn get_snapshot(&self, id: &SnapshotId) -> Option<Arc<Snapshot>> {
        lock(&self.table).get(id)
    }

    pub fn needs_recalculation(&self, id: &SnapshotId, assumptions: &Assumptions) -> bool {
        lock(&self.table).needs_recalculation(id, assumptions)
    }

    pub fn subscribe<F>(&self, callback: F) -> SharedSubscription
    where
        F: Fn(&Arc<Snapshot>) + Send + Sync + 'static,
    {
        let id = lock(&self.subscribers).add(Arc::new(callback));
        log::debug!("Shared subscriber {} registered", id);
        SharedSubscription {
            id,
            list: Arc::downgrade(&self.subscribers),
        }
    }

    /// Follow a single id, ignoring deliveries older than the value held
    pub fn watch(&self, id: &SnapshotId) -> SharedSnapshotWatch {
        let latest: Arc<Mutex<Option<Arc<Snapshot>>>> = Arc::new(Mutex::new(None));
        let target = id.clone();
        let sink = Arc::clone(&latest);
        let subscription = self.subscribe(move |snapshot| {
            if snapshot.id == target {
                keep_newest(&sink, snapshot);
            }
        });
        // Subscribe before reading so an update landing in between is not lost
        if let Some(current) = self.get_snapshot(id) {
            keep_newest(&latest, &current);
        }
        SharedSnapshotWatch { latest, subscription }
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.subscribers).len()
    }

    pub fn len(&self) -> usize {
        lock(&self.table).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn notify(&self, snapshot: &Arc<Snapshot>) {
        let callbacks = lock(&self.subscribers).handles();
        for callback in callbacks {
            callback(snapshot);
        }
    }
}

impl Default for SharedSnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

fn keep_newest(slot: &Mutex<Option<Arc<Snapshot>>>, incoming: &Arc<Snapshot>) {
    let mut held = lock(slot);
    let stale = held.as_ref().map_or(false, |h| !incoming.supersedes(h));
    if stale {
        log::debug!(
            "Dropped generation {} of {}, already holding a newer one",
            incoming.generation,
            incoming.id
        );
    } else {
        *held = Some(Arc::clone(incoming));
    }
}

/// Latest snapshot for one id across threads. Dropping it unsubscribes.
pub struct SharedSnapshotWatch {
    latest: Arc<Mutex<Option<Arc<Snapshot>>>>,
    subscription: SharedSubscription,
}

impl SharedSnapshotWatch {
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        lock(&self.latest).clone()
    }
}

impl Drop for SharedSnapshotWatch {
    fn drop(&mut self) {
        self.subscription.unsubscribe();
    }
}

/// Handle returned by `SharedSnapshotStore::subscribe`
pub struct SharedSubscription {
    id: u64,
    list: Weak<SharedSubscribers>,
}

impl SharedSubscription {
    /// Deregister the callback. Further calls are no-ops.
    pub fn unsubscribe(&self) {
        if let Some(list) = self.list.upgrade() {
            if lock(&list).remove(self.id) {
                log::debug!("Shared subscriber {} removed", self.id);
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.list
            .upgrade()
            .map_or(false, |list| lock(&list).contains(self.id))
    }
}
