//! Running state carried from one plan year to the next

use crate::assumptions::Assumptions;

/// State of the household balance sheet at a point in the projection
#[derive(Debug, Clone)]
pub struct ProjectionState {
    /// Zero-based plan year index
    pub year_index: u32,

    /// Calendar year for `year_index`
    pub year: i32,

    /// Assets carried into the current year
    pub cumulative_assets: i64,

    /// Whether any year so far was floored at zero assets
    pub clamped: bool,
}

impl ProjectionState {
    /// State before the first plan year is computed
    pub fn from_assumptions(assumptions: &Assumptions) -> Self {
        Self {
            year_index: 0,
            year: assumptions.plan_start_year,
            cumulative_assets: assumptions.initial_assets,
            clamped: false,
        }
    }

    /// Carry the year-end assets forward and step to the next calendar year
    pub fn advance_year(&mut self, year_end_assets: i64) {
        self.cumulative_assets = year_end_assets;
        self.year_index = self.year_index.saturating_add(1);
        self.year = self.year.saturating_add(1);
    }
}
