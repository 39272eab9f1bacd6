//! Snapshot value types

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::hash::AssumptionsHash;
use crate::assumptions::Assumptions;
use crate::error::Result;
use crate::projection::{project, Series};

/// Display name given to snapshots created without one
pub const DEFAULT_SNAPSHOT_NAME: &str = "Base";

/// Generation of a freshly created snapshot
pub const FIRST_GENERATION: u64 = 1;

/// Opaque snapshot identifier.
///
/// Generated ids embed a UUIDv7, so they sort in creation order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SnapshotId(String);

impl SnapshotId {
    pub fn generate() -> Self {
        Self(format!("snapshot-{}", Uuid::now_v7()))
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SnapshotId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Direction of the average annual cash flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CashFlowTrend {
    Positive,
    Negative,
    Neutral,
}

/// A named, timestamped projection of one `Assumptions` value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub id: SnapshotId,
    /// Per-id version, bumped by every update under the same id. Deliveries
    /// racing on another thread can arrive out of order; the higher
    /// generation is the newer value.
    #[serde(default = "first_generation")]
    pub generation: u64,
    pub name: String,
    pub assumptions: Assumptions,
    pub assumptions_hash: AssumptionsHash,
    pub calculated_at: DateTime<Utc>,

    // Summary
    pub final_assets: i64,
    pub average_annual_cash_flow: i64,
    pub years_until_negative: Option<u32>,

    pub series: Series,
}

fn first_generation() -> u64 {
    FIRST_GENERATION
}

impl Snapshot {
    /// Project `assumptions` and wrap the result as a first generation
    pub fn compute(
        id: SnapshotId,
        name: String,
        assumptions: Assumptions,
        calculated_at: DateTime<Utc>,
        as_of_year: i32,
    ) -> Result<Self> {
        let assumptions_hash = AssumptionsHash::of(&assumptions);
        let series = project(&assumptions, as_of_year)?;
        let summary = series.summary()?;

        Ok(Self {
            id,
            generation: FIRST_GENERATION,
            name,
            assumptions,
            assumptions_hash,
            calculated_at,
            final_assets: summary.final_assets,
            average_annual_cash_flow: summary.average_annual_cash_flow,
            years_until_negative: summary.years_until_negative,
            series,
        })
    }

    pub fn trend(&self) -> CashFlowTrend {
        match self.average_annual_cash_flow {
            n if n > 0 => CashFlowTrend::Positive,
            n if n < 0 => CashFlowTrend::Negative,
            _ => CashFlowTrend::Neutral,
        }
    }

    /// True when `self` is a later version of the same id than `other`
    pub fn supersedes(&self, other: &Snapshot) -> bool {
        self.id == other.id && self.generation > other.generation
    }

    /// True when this snapshot was computed from content-equal assumptions
    pub fn matches(&self, assumptions: &Assumptions) -> bool {
        self.assumptions_hash == AssumptionsHash::of(assumptions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, FixedClock};

    fn snapshot_of(assumptions: Assumptions) -> Snapshot {
        let clock = FixedClock::at_year(2026).unwrap();
        Snapshot::compute(
            SnapshotId::generate(),
            DEFAULT_SNAPSHOT_NAME.to_string(),
            assumptions,
            clock.now(),
            clock.current_year(),
        )
        .unwrap()
    }

    #[test]
    fn test_generated_ids_are_unique_and_prefixed() {
        let a = SnapshotId::generate();
        let b = SnapshotId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("snapshot-"));
    }

    #[test]
    fn test_compute_fills_summary() {
        let snap = snapshot_of(Assumptions::default_plan());
        assert_eq!(snap.series.len(), 30);
        assert_eq!(snap.final_assets, snap.series.last().unwrap().cumulative_assets);
        assert_eq!(snap.name, "Base");
        assert!(snap.matches(&Assumptions::default_plan()));
        assert!(!snap.matches(&Assumptions::default_plan().optimistic()));
    }

    #[test]
    fn test_supersedes_compares_generation_of_same_id() {
        let first = snapshot_of(Assumptions::default_plan());
        assert_eq!(first.generation, FIRST_GENERATION);

        let second = Snapshot { generation: 2, ..first.clone() };
        assert!(second.supersedes(&first));
        assert!(!first.supersedes(&second));
        assert!(!first.supersedes(&first));

        let other = Snapshot { id: SnapshotId::from("other"), generation: 9, ..first.clone() };
        assert!(!other.supersedes(&first));
    }

    #[test]
    fn test_trend() {
        let surplus = snapshot_of(Assumptions::default_plan());
        assert_eq!(surplus.trend(), CashFlowTrend::Positive);

        let deficit = snapshot_of(Assumptions {
            base_income: 1_000_000,
            ..Assumptions::default_plan()
        });
        assert_eq!(deficit.trend(), CashFlowTrend::Negative);

        let flat = snapshot_of(Assumptions {
            plan_years: 1,
            base_income: 100,
            base_expense: 100,
            events: Vec::new(),
            ..Assumptions::default_plan()
        });
        assert_eq!(flat.trend(), CashFlowTrend::Neutral);
    }

    #[test]
    fn test_invalid_assumptions_propagate() {
        let clock = FixedClock::at_year(2026).unwrap();
        let result = Snapshot::compute(
            SnapshotId::from("x"),
            "x".to_string(),
            Assumptions { plan_years: 0, ..Assumptions::default_plan() },
            clock.now(),
            2026,
        );
        assert!(result.is_err());
    }
}
