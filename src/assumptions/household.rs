//! Household members and one-off life events

use serde::{Deserialize, Serialize};

/// Role of a family member within the household
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    /// The plan owner; their age is the primary age axis
    #[serde(rename = "self")]
    Principal,
    Spouse,
    Child,
    Other,
}

/// A person whose age is tracked across the plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMember {
    pub id: u32,
    pub name: String,
    pub relationship: Relationship,

    /// Age in whole years at the plan start year
    pub current_age: u32,

    /// Planned retirement age (self/spouse)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retirement_age: Option<u32>,

    /// School start age (children)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school_start_age: Option<u32>,
}

impl FamilyMember {
    pub fn new(
        id: u32,
        name: impl Into<String>,
        relationship: Relationship,
        current_age: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            relationship,
            current_age,
            retirement_age: None,
            school_start_age: None,
        }
    }

    pub fn with_retirement_age(mut self, age: u32) -> Self {
        self.retirement_age = Some(age);
        self
    }

    pub fn with_school_start_age(mut self, age: u32) -> Self {
        self.school_start_age = Some(age);
        self
    }

    /// Age after `years_elapsed` plan years
    pub fn age_after(&self, years_elapsed: u32) -> u32 {
        self.current_age.saturating_add(years_elapsed)
    }
}

/// How an event's payment is spread.
///
/// Carried for presentation; the projector books the full amount in the
/// event's target year regardless of shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentShape {
    #[default]
    Single,
    Split,
    Recurring,
}

/// A one-off cost (or windfall, when negative) in a given calendar year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifeEvent {
    pub id: u32,
    pub name: String,

    /// Absolute calendar year
    pub year: i32,

    /// Whole yen; positive amounts are costs
    pub amount: i64,

    /// Name of the family member the event belongs to
    pub person: String,

    #[serde(rename = "type", default)]
    pub payment: PaymentShape,
}

impl LifeEvent {
    pub fn single(
        id: u32,
        name: impl Into<String>,
        year: i32,
        amount: i64,
        person: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            year,
            amount,
            person: person.into(),
            payment: PaymentShape::Single,
        }
    }
}
