//! Lifeplan Engine - Multi-year household cash-flow projections with cached scenario snapshots
//!
//! This library provides:
//! - Household assumptions (rates, balances, family ages, life events)
//! - A deterministic yearly projector with summary statistics
//! - A snapshot store keyed by id with content-hash change detection
//!   and synchronous subscriber notification
//! - Batch scenario runs and side-by-side comparisons

pub mod error;
pub mod clock;
pub mod assumptions;
pub mod projection;
pub mod snapshot;
pub mod scenario;

// Re-export commonly used types
pub use error::{PlanError, Result};
pub use clock::{Clock, FixedClock, SystemClock};
pub use assumptions::{Assumptions, FamilyMember, LifeEvent, PaymentShape, Relationship};
pub use projection::{project, Series, SeriesSummary, TimeHorizon, YearRecord};
pub use snapshot::{
    AssumptionsHash, SharedSnapshotStore, Snapshot, SnapshotId, SnapshotStore, Subscription,
};
pub use scenario::{ScenarioAdjustment, ScenarioComparison, ScenarioRunner};
