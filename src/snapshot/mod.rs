//! Named, cached projection snapshots with change detection and subscribers

mod hash;
mod model;
mod table;
mod subscription;
mod store;
mod shared;

pub use hash::AssumptionsHash;
pub use model::{CashFlowTrend, Snapshot, SnapshotId, DEFAULT_SNAPSHOT_NAME, FIRST_GENERATION};
pub use subscription::Subscription;
pub use store::{SnapshotStore, SnapshotWatch};
pub use shared::{SharedSnapshotStore, SharedSnapshotWatch, SharedSubscription};
