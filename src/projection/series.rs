//! Yearly projection output and its summary statistics

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};

/// Age of one family member in a given plan year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberAge {
    pub member_id: u32,
    pub name: String,
    pub age: u32,
}

/// A single computed plan year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRecord {
    // Timing
    pub year: i32,
    pub primary_age: u32,
    pub ages: Vec<MemberAge>,

    // Flows (whole yen)
    pub income: i64,
    /// Inflated base expense plus this year's event cost
    pub expense: i64,
    pub event_cost: i64,
    pub annual_cash_flow: i64,

    /// Assets at year end after the investment return, floored at zero
    pub cumulative_assets: i64,

    /// Year is at or before the as-of year
    pub is_real_data: bool,
}

impl YearRecord {
    /// Age of the named member in this year
    pub fn age_of(&self, name: &str) -> Option<u32> {
        self.ages.iter().find(|a| a.name == name).map(|a| a.age)
    }
}

/// Display window over a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeHorizon {
    /// First 10 years
    Short,
    /// First 20 years
    Medium,
    /// Whole plan
    Long,
}

impl TimeHorizon {
    /// Maximum number of years shown, `None` for the whole plan
    pub fn max_years(self) -> Option<usize> {
        match self {
            TimeHorizon::Short => Some(10),
            TimeHorizon::Medium => Some(20),
            TimeHorizon::Long => None,
        }
    }
}

/// Ordered per-year projection output.
///
/// One record per plan year, record `i` is year `plan_start_year + i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    plan_start_year: i32,
    records: Vec<YearRecord>,
}

impl Series {
    pub(crate) fn with_capacity(plan_start_year: i32, years: usize) -> Self {
        Self {
            plan_start_year,
            records: Vec::with_capacity(years),
        }
    }

    pub(crate) fn push(&mut self, record: YearRecord) {
        debug_assert_eq!(
            i64::from(record.year),
            i64::from(self.plan_start_year) + self.records.len() as i64
        );
        self.records.push(record);
    }

    pub fn plan_start_year(&self) -> i32 {
        self.plan_start_year
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[YearRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, YearRecord> {
        self.records.iter()
    }

    pub fn get(&self, index: usize) -> Option<&YearRecord> {
        self.records.get(index)
    }

    /// Record for a calendar year, if it falls inside the plan
    pub fn for_year(&self, year: i32) -> Option<&YearRecord> {
        let offset = year.checked_sub(self.plan_start_year)?;
        usize::try_from(offset).ok().and_then(|i| self.records.get(i))
    }

    pub fn last(&self) -> Option<&YearRecord> {
        self.records.last()
    }

    /// Leading slice of the series limited to `horizon`
    pub fn within(&self, horizon: TimeHorizon) -> &[YearRecord] {
        let end = horizon
            .max_years()
            .map_or(self.records.len(), |n| n.min(self.records.len()));
        &self.records[..end]
    }

    pub fn summary(&self) -> Result<SeriesSummary> {
        SeriesSummary::from_series(self)
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a YearRecord;
    type IntoIter = std::slice::Iter<'a, YearRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Scalar summary of a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesSummary {
    /// Cumulative assets of the last year (0 for an empty series)
    pub final_assets: i64,

    /// Mean annual cash flow, rounded half up
    pub average_annual_cash_flow: i64,

    /// Offset from the plan start of the first year whose assets are at or
    /// below zero. Because assets are floored at zero this marks the first
    /// insolvent year, not the depth of the shortfall.
    pub years_until_negative: Option<u32>,
}

impl SeriesSummary {
    pub fn from_series(series: &Series) -> Result<Self> {
        let final_assets = series.last().map(|r| r.cumulative_assets).unwrap_or(0);

        let average_annual_cash_flow = if series.is_empty() {
            0
        } else {
            let mut total: i64 = 0;
            for record in series {
                total = total.checked_add(record.annual_cash_flow).ok_or(
                    PlanError::ArithmeticOverflow {
                        field: "average_annual_cash_flow",
                        year: record.year,
                    },
                )?;
            }
            let mean = total as f64 / series.len() as f64;
            super::engine::round_half_up(mean) as i64
        };

        // Records are contiguous from the plan start, so the index is the offset
        let years_until_negative = series
            .iter()
            .position(|r| r.cumulative_assets <= 0)
            .map(|i| i as u32);

        Ok(Self {
            final_assets,
            average_annual_cash_flow,
            years_until_negative,
        })
    }
}
