//! JSON-based assumption loader
//!
//! Reads a household plan from a camelCase JSON document and validates it.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::Assumptions;
use crate::error::Result;

/// Default path to the assumptions document
pub const DEFAULT_ASSUMPTIONS_PATH: &str = "data/assumptions.json";

/// Load and validate assumptions from a JSON file
pub fn load_assumptions<P: AsRef<Path>>(path: P) -> Result<Assumptions> {
    let path = path.as_ref();
    log::debug!("Loading assumptions from {}", path.display());
    let file = File::open(path)?;
    load_assumptions_from_reader(BufReader::new(file))
}

/// Load assumptions from the default location
pub fn load_default_assumptions() -> Result<Assumptions> {
    load_assumptions(DEFAULT_ASSUMPTIONS_PATH)
}

/// Load and validate assumptions from any reader (e.g., string buffer, stdin)
pub fn load_assumptions_from_reader<R: Read>(reader: R) -> Result<Assumptions> {
    let assumptions: Assumptions = serde_json::from_reader(reader)?;
    assumptions.validate()?;
    Ok(assumptions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::{PaymentShape, Relationship};
    use crate::error::PlanError;

    const PLAN_JSON: &str = r#"{
        "planStartYear": 2025,
        "planYears": 5,
        "inflationRate": 2.0,
        "investmentReturn": 3.0,
        "initialAssets": 1000000,
        "baseIncome": 5000000,
        "baseExpense": 3500000,
        "familyMembers": [
            {"id": 1, "name": "Taro", "currentAge": 35, "relationship": "self", "retirementAge": 65},
            {"id": 3, "name": "Ichiro", "currentAge": 5, "relationship": "child", "schoolStartAge": 6}
        ],
        "events": [
            {"id": 1, "name": "Home", "year": 2027, "amount": 5000000, "person": "Taro", "type": "split"}
        ]
    }"#;

    #[test]
    fn test_load_default_assumptions_file() {
        let a = load_default_assumptions().expect("data/assumptions.json should load");
        assert_eq!(a, Assumptions::default_plan());
    }

    #[test]
    fn test_load_from_reader() {
        let a = load_assumptions_from_reader(PLAN_JSON.as_bytes()).expect("valid plan");
        assert_eq!(a.plan_years, 5);
        assert_eq!(a.family_members.len(), 2);
        assert_eq!(a.family_members[0].relationship, Relationship::Principal);
        assert_eq!(a.family_members[1].school_start_age, Some(6));
        assert_eq!(a.events[0].payment, PaymentShape::Split);
    }

    #[test]
    fn test_lists_are_optional() {
        let json = r#"{"planStartYear":2025,"planYears":3,"inflationRate":0,"investmentReturn":0,
            "initialAssets":0,"baseIncome":1000,"baseExpense":1000}"#;
        let a = load_assumptions_from_reader(json.as_bytes()).expect("valid plan");
        assert!(a.family_members.is_empty());
        assert!(a.events.is_empty());
    }

    #[test]
    fn test_invalid_plan_length_rejected() {
        let json = PLAN_JSON.replace("\"planYears\": 5", "\"planYears\": 0");
        let err = load_assumptions_from_reader(json.as_bytes()).unwrap_err();
        assert!(matches!(err, PlanError::InvalidAssumptions(_)));
    }

    #[test]
    fn test_malformed_json_is_json_error() {
        let err = load_assumptions_from_reader("{ not json".as_bytes()).unwrap_err();
        assert!(matches!(err, PlanError::Json(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_assumptions("does/not/exist.json").unwrap_err();
        assert!(matches!(err, PlanError::Io(_)));
    }
}
