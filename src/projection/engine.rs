//! Core projection engine for yearly household cash-flow projections

use crate::assumptions::Assumptions;
use crate::error::{PlanError, Result};
use super::series::{MemberAge, Series, YearRecord};
use super::state::ProjectionState;

/// Annual salary growth applied to base income. Fixed inside the engine;
/// callers wanting another growth path adjust `base_income` themselves.
pub const INCOME_GROWTH_RATE: f64 = 0.02;

/// Primary age at year 0 when the household has no `self` member
pub const FALLBACK_PRIMARY_AGE: u32 = 35;

/// Configuration for a projection run
#[derive(Debug, Clone, Copy)]
pub struct ProjectionConfig {
    /// Years at or before this one are flagged as real (historical) data
    pub as_of_year: i32,
}

impl ProjectionConfig {
    pub fn as_of(year: i32) -> Self {
        Self { as_of_year: year }
    }
}

/// Main projection engine
pub struct ProjectionEngine<'a> {
    assumptions: &'a Assumptions,
    config: ProjectionConfig,
    inflation_factor: f64,
    return_factor: f64,
}

impl<'a> ProjectionEngine<'a> {
    /// Create a new projection engine with given assumptions and config
    pub fn new(assumptions: &'a Assumptions, config: ProjectionConfig) -> Self {
        Self {
            assumptions,
            config,
            inflation_factor: 1.0 + assumptions.inflation_rate / 100.0,
            return_factor: 1.0 + assumptions.investment_return / 100.0,
        }
    }

    /// Run the projection over every plan year
    pub fn project(&self) -> Result<Series> {
        self.assumptions.validate()?;

        let years = self.assumptions.plan_years as usize;
        let mut series = Series::with_capacity(self.assumptions.plan_start_year, years);
        let mut state = ProjectionState::from_assumptions(self.assumptions);

        for _ in 0..years {
            let record = self.calculate_year(&mut state)?;
            state.advance_year(record.cumulative_assets);
            series.push(record);
        }

        if state.clamped {
            log::warn!(
                "Projection {}-{} ran out of assets; balances floored at zero",
                self.assumptions.plan_start_year,
                self.assumptions.plan_end_year()
            );
        }
        log::debug!(
            "Projected {} years from {} (as of {})",
            series.len(),
            self.assumptions.plan_start_year,
            self.config.as_of_year
        );

        Ok(series)
    }

    /// Calculate a single plan year from the carried state
    fn calculate_year(&self, state: &mut ProjectionState) -> Result<YearRecord> {
        let i = state.year_index;
        let year = state.year;

        let ages = self.age_overlay(i);
        let primary_age = self
            .assumptions
            .primary_member()
            .map(|m| m.age_after(i))
            .unwrap_or(FALLBACK_PRIMARY_AGE + i);

        let income = to_currency(
            self.assumptions.base_income as f64 * (1.0 + INCOME_GROWTH_RATE).powi(i as i32),
            "income",
            year,
        )?;
        let base_expense = to_currency(
            self.assumptions.base_expense as f64 * self.inflation_factor.powi(i as i32),
            "expense",
            year,
        )?;
        let event_cost = self.event_cost(year)?;

        let expense = base_expense
            .checked_add(event_cost)
            .ok_or(PlanError::ArithmeticOverflow { field: "expense", year })?;
        let annual_cash_flow = income
            .checked_sub(expense)
            .ok_or(PlanError::ArithmeticOverflow { field: "annual_cash_flow", year })?;

        // Cash flow lands before the return is applied
        let pre_return = state
            .cumulative_assets
            .checked_add(annual_cash_flow)
            .ok_or(PlanError::ArithmeticOverflow { field: "cumulative_assets", year })?;
        let mut cumulative_assets =
            to_currency(pre_return as f64 * self.return_factor, "cumulative_assets", year)?;

        // Debt is not modelled
        if cumulative_assets < 0 {
            log::debug!("Assets floored at zero in {} (was {})", year, cumulative_assets);
            cumulative_assets = 0;
            state.clamped = true;
        }

        Ok(YearRecord {
            year,
            primary_age,
            ages,
            income,
            expense,
            event_cost,
            annual_cash_flow,
            cumulative_assets,
            is_real_data: year <= self.config.as_of_year,
        })
    }

    fn age_overlay(&self, years_elapsed: u32) -> Vec<MemberAge> {
        self.assumptions
            .family_members
            .iter()
            .map(|m| MemberAge {
                member_id: m.id,
                name: m.name.clone(),
                age: m.age_after(years_elapsed),
            })
            .collect()
    }

    /// Sum of every event booked in `year`
    fn event_cost(&self, year: i32) -> Result<i64> {
        self.assumptions
            .events
            .iter()
            .filter(|e| e.year == year)
            .try_fold(0i64, |sum, e| {
                sum.checked_add(e.amount)
                    .ok_or(PlanError::ArithmeticOverflow { field: "event_cost", year })
            })
    }
}

/// Project `assumptions`, flagging years up to `as_of_year` as real data
pub fn project(assumptions: &Assumptions, as_of_year: i32) -> Result<Series> {
    ProjectionEngine::new(assumptions, ProjectionConfig::as_of(as_of_year)).project()
}

/// Round to the nearest integer with halves going toward positive infinity
/// (2.5 -> 3, -2.5 -> -2)
pub fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Round to whole yen, rejecting values outside the `i64` range
fn to_currency(value: f64, field: &'static str, year: i32) -> Result<i64> {
    let rounded = round_half_up(value);
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
    if !rounded.is_finite() || rounded < i64::MIN as f64 || rounded >= i64::MAX as f64 {
        return Err(PlanError::ArithmeticOverflow { field, year });
    }
    Ok(rounded as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::{FamilyMember, LifeEvent, Relationship};

    fn flat_plan(years: u32) -> Assumptions {
        Assumptions {
            plan_start_year: 2025,
            plan_years: years,
            inflation_rate: 0.0,
            investment_return: 0.0,
            initial_assets: 0,
            base_income: 1000,
            base_expense: 1000,
            family_members: Vec::new(),
            events: Vec::new(),
        }
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(2.49), 2.0);
        assert_eq!(round_half_up(-2.51), -3.0);
        assert_eq!(round_half_up(1061.208), 1061.0);
    }

    #[test]
    fn test_flat_plan_growth_order() {
        let series = project(&flat_plan(3), 2000).unwrap();
        assert_eq!(series.len(), 3);

        let flows: Vec<i64> = series.iter().map(|r| r.annual_cash_flow).collect();
        assert_eq!(flows, vec![0, 20, 40]);

        // round(1000 * 1.02^i) - 1000, accumulated with a zero return
        let incomes: Vec<i64> = series.iter().map(|r| r.income).collect();
        assert_eq!(incomes, vec![1000, 1020, 1040]);
        let assets: Vec<i64> = series.iter().map(|r| r.cumulative_assets).collect();
        assert_eq!(assets, vec![0, 20, 60]);
    }

    #[test]
    fn test_cash_flow_added_before_return() {
        let plan = Assumptions {
            initial_assets: 1000,
            investment_return: 10.0,
            base_income: 1100,
            base_expense: 1000,
            ..flat_plan(1)
        };
        let series = project(&plan, 2000).unwrap();
        // (1000 + 100) * 1.1
        assert_eq!(series.records()[0].cumulative_assets, 1210);
    }

    #[test]
    fn test_years_are_contiguous() {
        let series = project(&Assumptions::default_plan(), 2026).unwrap();
        assert_eq!(series.len(), 30);
        for (i, record) in series.iter().enumerate() {
            assert_eq!(record.year, 2025 + i as i32);
        }
        for pair in series.records().windows(2) {
            assert_eq!(pair[1].year, pair[0].year + 1);
        }
    }

    #[test]
    fn test_event_cost_only_in_target_year() {
        let plan = Assumptions {
            events: vec![LifeEvent::single(1, "Home", 2027, 500_000, "Taro")],
            ..flat_plan(5)
        };
        let series = project(&plan, 2000).unwrap();
        let costs: Vec<i64> = series.iter().map(|r| r.event_cost).collect();
        assert_eq!(costs, vec![0, 0, 500_000, 0, 0]);
        assert_eq!(series.records()[2].expense, 1000 + 500_000);
    }

    #[test]
    fn test_events_in_same_year_are_summed() {
        let plan = Assumptions {
            events: vec![
                LifeEvent::single(1, "Car", 2026, 300, "Taro"),
                LifeEvent::single(2, "Bonus", 2026, -100, "Taro"),
            ],
            ..flat_plan(2)
        };
        let series = project(&plan, 2000).unwrap();
        assert_eq!(series.records()[1].event_cost, 200);
    }

    #[test]
    fn test_assets_never_negative() {
        let plan = Assumptions {
            initial_assets: 100,
            base_income: 0,
            base_expense: 1000,
            inflation_rate: 3.0,
            investment_return: -2.0,
            ..flat_plan(10)
        };
        let series = project(&plan, 2000).unwrap();
        assert!(series.iter().all(|r| r.cumulative_assets >= 0));
        assert_eq!(series.summary().unwrap().years_until_negative, Some(0));
    }

    #[test]
    fn test_inflation_applied_to_expense() {
        let plan = Assumptions { inflation_rate: 10.0, ..flat_plan(3) };
        let series = project(&plan, 2000).unwrap();
        let expenses: Vec<i64> = series.iter().map(|r| r.expense).collect();
        assert_eq!(expenses, vec![1000, 1100, 1210]);
    }

    #[test]
    fn test_real_data_flag_uses_as_of_year() {
        let series = project(&flat_plan(5), 2026).unwrap();
        let flags: Vec<bool> = series.iter().map(|r| r.is_real_data).collect();
        assert_eq!(flags, vec![true, true, false, false, false]);
    }

    #[test]
    fn test_projection_is_deterministic() {
        let plan = Assumptions::default_plan();
        let a = project(&plan, 2026).unwrap();
        let b = project(&plan, 2026).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_age_overlay_and_primary_age() {
        let plan = Assumptions {
            family_members: vec![
                FamilyMember::new(2, "Hanako", Relationship::Spouse, 33),
                FamilyMember::new(1, "Taro", Relationship::Principal, 40),
            ],
            ..flat_plan(3)
        };
        let series = project(&plan, 2000).unwrap();
        let last = &series.records()[2];
        assert_eq!(last.primary_age, 42);
        assert_eq!(last.age_of("Hanako"), Some(35));
        assert_eq!(last.ages[0].member_id, 2);
    }

    #[test]
    fn test_primary_age_fallback_without_self() {
        let plan = Assumptions {
            family_members: vec![FamilyMember::new(3, "Ichiro", Relationship::Child, 5)],
            ..flat_plan(3)
        };
        let series = project(&plan, 2000).unwrap();
        let primary: Vec<u32> = series.iter().map(|r| r.primary_age).collect();
        assert_eq!(primary, vec![35, 36, 37]);
    }

    #[test]
    fn test_zero_years_fails_fast() {
        let err = project(&flat_plan(0), 2000).unwrap_err();
        assert!(matches!(err, PlanError::InvalidAssumptions(_)));
    }

    #[test]
    fn test_out_of_range_start_year_fails_fast() {
        let plan = Assumptions { plan_start_year: i32::MAX, ..flat_plan(1) };
        let err = project(&plan, 2026).unwrap_err();
        assert!(matches!(err, PlanError::InvalidAssumptions(_)));

        let plan = Assumptions { plan_start_year: 9999, ..flat_plan(100) };
        let series = project(&plan, 2026).unwrap();
        assert_eq!(series.last().unwrap().year, 10_098);
    }

    #[test]
    fn test_overflow_reported() {
        let plan = Assumptions {
            base_income: i64::MAX,
            base_expense: 0,
            ..flat_plan(3)
        };
        let err = project(&plan, 2000).unwrap_err();
        assert!(matches!(err, PlanError::ArithmeticOverflow { field: "income", .. }));

        let plan = Assumptions {
            events: vec![
                LifeEvent::single(1, "A", 2025, i64::MAX, "Taro"),
                LifeEvent::single(2, "B", 2025, 1, "Taro"),
            ],
            ..flat_plan(1)
        };
        let err = project(&plan, 2000).unwrap_err();
        assert!(matches!(err, PlanError::ArithmeticOverflow { field: "event_cost", year: 2025 }));
    }
}
