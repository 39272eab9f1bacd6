//! Scenario runner for batch projections of plan variants
//!
//! Holds one base plan, then projects named rate shifts of it. Variants are
//! independent, so batches run in parallel.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::assumptions::Assumptions;
use crate::error::{PlanError, Result};
use crate::projection::{project, Series, SeriesSummary};
use crate::snapshot::Snapshot;

/// A named shift of the base plan's rates, in percentage points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioAdjustment {
    pub name: String,
    pub investment_return_delta: f64,
    pub inflation_rate_delta: f64,
}

impl ScenarioAdjustment {
    /// The base plan unchanged
    pub fn base() -> Self {
        Self {
            name: "Base".to_string(),
            investment_return_delta: 0.0,
            inflation_rate_delta: 0.0,
        }
    }

    /// +1.0pt return, -0.5pt inflation
    pub fn optimistic() -> Self {
        Self {
            name: "Optimistic".to_string(),
            investment_return_delta: 1.0,
            inflation_rate_delta: -0.5,
        }
    }

    pub fn apply(&self, base: &Assumptions) -> Assumptions {
        base.with_rate_shift(self.investment_return_delta, self.inflation_rate_delta)
    }
}

/// Projection of one adjustment
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    pub name: String,
    pub assumptions: Assumptions,
    pub series: Series,
    pub summary: SeriesSummary,
}

/// Pre-loaded runner projecting variants of one base plan
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(Assumptions::default_plan(), 2026);
/// let outcomes =
///     runner.run_scenarios(&[ScenarioAdjustment::base(), ScenarioAdjustment::optimistic()]);
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    base_assumptions: Assumptions,
    as_of_year: i32,
}

impl ScenarioRunner {
    pub fn new(base_assumptions: Assumptions, as_of_year: i32) -> Self {
        Self {
            base_assumptions,
            as_of_year,
        }
    }

    /// Project a single adjustment of the base plan
    pub fn run(&self, adjustment: &ScenarioAdjustment) -> Result<ScenarioOutcome> {
        let assumptions = adjustment.apply(&self.base_assumptions);
        let series = project(&assumptions, self.as_of_year)?;
        let summary = series.summary()?;
        Ok(ScenarioOutcome {
            name: adjustment.name.clone(),
            assumptions,
            series,
            summary,
        })
    }

    /// Project every adjustment in parallel; results keep input order
    pub fn run_scenarios(
        &self,
        adjustments: &[ScenarioAdjustment],
    ) -> Vec<Result<ScenarioOutcome>> {
        adjustments.par_iter().map(|adj| self.run(adj)).collect()
    }

    /// Return shifts from `from` to `to` percentage points in `step` increments
    pub fn return_sweep(from: f64, to: f64, step: f64) -> Vec<ScenarioAdjustment> {
        if step <= 0.0 || !step.is_finite() || from > to {
            return Vec::new();
        }
        let count = ((to - from) / step).floor() as usize + 1;
        (0..count)
            .map(|i| {
                let delta = from + step * i as f64;
                ScenarioAdjustment {
                    name: format!("Return {:+.1}pt", delta),
                    investment_return_delta: delta,
                    inflation_rate_delta: 0.0,
                }
            })
            .collect()
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.base_assumptions
    }

    pub fn assumptions_mut(&mut self) -> &mut Assumptions {
        &mut self.base_assumptions
    }
}

/// Side-by-side summary of two snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub primary_name: String,
    pub comparison_name: String,
    /// primary minus comparison
    pub final_assets_delta: i64,
    /// primary minus comparison
    pub average_cash_flow_delta: i64,
    pub primary_years_until_negative: Option<u32>,
    pub comparison_years_until_negative: Option<u32>,
}

impl ScenarioComparison {
    pub fn between(primary: &Snapshot, comparison: &Snapshot) -> Result<Self> {
        let year = primary.assumptions.plan_end_year();
        let final_assets_delta = primary
            .final_assets
            .checked_sub(comparison.final_assets)
            .ok_or(PlanError::ArithmeticOverflow { field: "final_assets_delta", year })?;
        let average_cash_flow_delta = primary
            .average_annual_cash_flow
            .checked_sub(comparison.average_annual_cash_flow)
            .ok_or(PlanError::ArithmeticOverflow { field: "average_cash_flow_delta", year })?;

        Ok(Self {
            primary_name: primary.name.clone(),
            comparison_name: comparison.name.clone(),
            final_assets_delta,
            average_cash_flow_delta,
            primary_years_until_negative: primary.years_until_negative,
            comparison_years_until_negative: comparison.years_until_negative,
        })
    }
}
