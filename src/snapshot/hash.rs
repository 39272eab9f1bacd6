//! Content hashing of assumptions for change detection
//!
//! Only fields that change the projected numbers feed the hash. Names of
//! members, events and snapshots are cosmetic and left out, so renaming does
//! not force a recompute.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::assumptions::Assumptions;

/// Hex-encoded SHA-256 over the projection-relevant fields
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssumptionsHash(String);

impl AssumptionsHash {
    pub fn of(assumptions: &Assumptions) -> Self {
        let key = canonical_key(assumptions);
        let digest = Sha256::digest(key.as_bytes());
        Self(hex::encode(digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssumptionsHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rates are keyed by their exact bit pattern so that any change in value
/// changes the key.
fn canonical_key(a: &Assumptions) -> String {
    let events = a
        .events
        .iter()
        .map(|e| format!("{}-{}", e.year, e.amount))
        .collect::<Vec<_>>()
        .join(",");

    format!(
        "start={};years={};inflation={:016x};return={:016x};initial={};income={};expense={};events=[{}]",
        a.plan_start_year,
        a.plan_years,
        a.inflation_rate.to_bits(),
        a.investment_return.to_bits(),
        a.initial_assets,
        a.base_income,
        a.base_expense,
        events
    )
}
