//! Household planning assumptions: rates, balances, family and life events

mod household;
pub mod loader;

pub use household::{FamilyMember, LifeEvent, PaymentShape, Relationship};
pub use loader::{load_assumptions, load_assumptions_from_reader, load_default_assumptions};

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};

/// Longest plan the engine accepts
pub const MAX_PLAN_YEARS: u32 = 100;

/// Plan start years are four-digit calendar years
pub const MIN_PLAN_START_YEAR: i32 = 1000;
pub const MAX_PLAN_START_YEAR: i32 = 9999;

/// Complete input to a projection.
///
/// Value type: two `Assumptions` are the same plan when their contents are
/// equal. Rates are percent per year (`2.0` means 2%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assumptions {
    pub plan_start_year: i32,
    pub plan_years: u32,
    pub inflation_rate: f64,
    pub investment_return: f64,
    pub initial_assets: i64,
    pub base_income: i64,
    pub base_expense: i64,
    #[serde(default)]
    pub family_members: Vec<FamilyMember>,
    #[serde(default)]
    pub events: Vec<LifeEvent>,
}

impl Assumptions {
    /// Built-in household used when no assumptions file is supplied
    pub fn default_plan() -> Self {
        Self {
            plan_start_year: 2025,
            plan_years: 30,
            inflation_rate: 2.0,
            investment_return: 3.0,
            initial_assets: 1_000_000,
            base_income: 5_000_000,
            base_expense: 3_500_000,
            family_members: vec![
                FamilyMember::new(1, "Taro Tanaka", Relationship::Principal, 35)
                    .with_retirement_age(65),
                FamilyMember::new(2, "Hanako Tanaka", Relationship::Spouse, 33)
                    .with_retirement_age(65),
                FamilyMember::new(3, "Ichiro Tanaka", Relationship::Child, 5)
                    .with_school_start_age(6),
            ],
            events: vec![
                LifeEvent::single(1, "Home purchase", 2027, 5_000_000, "Taro Tanaka"),
                LifeEvent::single(2, "University entrance", 2038, 2_000_000, "Ichiro Tanaka"),
            ],
        }
    }

    /// Same plan with both rates shifted by the given percentage points
    pub fn with_rate_shift(&self, investment_return_delta: f64, inflation_rate_delta: f64) -> Self {
        Self {
            investment_return: self.investment_return + investment_return_delta,
            inflation_rate: self.inflation_rate + inflation_rate_delta,
            ..self.clone()
        }
    }

    /// Higher return, lower inflation: +1.0pt return, -0.5pt inflation
    pub fn optimistic(&self) -> Self {
        self.with_rate_shift(1.0, -0.5)
    }

    /// Calendar year of the last plan year, saturating for unvalidated input
    pub fn plan_end_year(&self) -> i32 {
        let span = i32::try_from(self.plan_years.saturating_sub(1)).unwrap_or(i32::MAX);
        self.plan_start_year.saturating_add(span)
    }

    /// The member whose age drives the primary age axis
    pub fn primary_member(&self) -> Option<&FamilyMember> {
        self.family_members
            .iter()
            .find(|m| m.relationship == Relationship::Principal)
    }

    /// Check structural preconditions.
    ///
    /// Negative rates and empty family lists are accepted; only plan length,
    /// a start year outside four digits, and non-finite rates are rejected.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_PLAN_START_YEAR..=MAX_PLAN_START_YEAR).contains(&self.plan_start_year) {
            return Err(PlanError::InvalidAssumptions(format!(
                "plan_start_year {} is outside {}..={}",
                self.plan_start_year, MIN_PLAN_START_YEAR, MAX_PLAN_START_YEAR
            )));
        }
        if self.plan_years == 0 {
            return Err(PlanError::InvalidAssumptions(
                "plan_years must be at least 1".to_string(),
            ));
        }
        if self.plan_years > MAX_PLAN_YEARS {
            return Err(PlanError::InvalidAssumptions(format!(
                "plan_years {} exceeds maximum of {}",
                self.plan_years, MAX_PLAN_YEARS
            )));
        }
        if !self.inflation_rate.is_finite() {
            return Err(PlanError::InvalidAssumptions(format!(
                "inflation_rate must be finite, got {}",
                self.inflation_rate
            )));
        }
        if !self.investment_return.is_finite() {
            return Err(PlanError::InvalidAssumptions(format!(
                "investment_return must be finite, got {}",
                self.investment_return
            )));
        }
        Ok(())
    }
}

impl Default for Assumptions {
    fn default() -> Self {
        Self::default_plan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_plan_is_valid() {
        let a = Assumptions::default_plan();
        assert!(a.validate().is_ok());
        assert_eq!(a.plan_end_year(), 2054);
        assert_eq!(a.primary_member().map(|m| m.current_age), Some(35));
    }

    #[test]
    fn test_zero_years_rejected() {
        let a = Assumptions { plan_years: 0, ..Assumptions::default_plan() };
        assert!(matches!(a.validate(), Err(PlanError::InvalidAssumptions(_))));
    }

    #[test]
    fn test_too_many_years_rejected() {
        let a = Assumptions { plan_years: MAX_PLAN_YEARS + 1, ..Assumptions::default_plan() };
        assert!(matches!(a.validate(), Err(PlanError::InvalidAssumptions(_))));
    }

    #[test]
    fn test_start_year_must_have_four_digits() {
        for year in [i32::MIN, -1, 0, 999, 10_000, i32::MAX] {
            let a = Assumptions { plan_start_year: year, ..Assumptions::default_plan() };
            assert!(
                matches!(a.validate(), Err(PlanError::InvalidAssumptions(_))),
                "start year {} accepted",
                year
            );
        }
        let earliest = Assumptions {
            plan_start_year: MIN_PLAN_START_YEAR,
            ..Assumptions::default_plan()
        };
        assert!(earliest.validate().is_ok());
        let latest = Assumptions {
            plan_start_year: MAX_PLAN_START_YEAR,
            plan_years: MAX_PLAN_YEARS,
            ..Assumptions::default_plan()
        };
        assert!(latest.validate().is_ok());
        assert_eq!(latest.plan_end_year(), MAX_PLAN_START_YEAR + 99);
    }

    #[test]
    fn test_plan_end_year_saturates() {
        let a = Assumptions {
            plan_start_year: i32::MAX,
            plan_years: 5,
            ..Assumptions::default_plan()
        };
        assert_eq!(a.plan_end_year(), i32::MAX);
    }

    #[test]
    fn test_non_finite_rate_rejected() {
        let a = Assumptions { inflation_rate: f64::NAN, ..Assumptions::default_plan() };
        assert!(a.validate().is_err());
        let b = Assumptions { investment_return: f64::INFINITY, ..Assumptions::default_plan() };
        assert!(b.validate().is_err());
    }

    #[test]
    fn test_negative_rates_and_empty_family_accepted() {
        let a = Assumptions {
            inflation_rate: -1.0,
            investment_return: -5.0,
            family_members: Vec::new(),
            ..Assumptions::default_plan()
        };
        assert!(a.validate().is_ok());
        assert!(a.primary_member().is_none());
    }

    #[test]
    fn test_optimistic_shift() {
        let base = Assumptions::default_plan();
        let opt = base.optimistic();
        assert_relative_eq!(opt.investment_return, 4.0);
        assert_relative_eq!(opt.inflation_rate, 1.5);
        assert_eq!(opt.events, base.events);
        assert_ne!(opt, base);
    }
}
