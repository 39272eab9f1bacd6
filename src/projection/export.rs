//! CSV export of a projected series

use std::io::Write;

use serde::Serialize;

use super::series::{Series, YearRecord};
use crate::error::Result;

/// One CSV row; the per-member age overlay is left out
#[derive(Debug, Serialize)]
struct CsvRow {
    #[serde(rename = "Year")]
    year: i32,
    #[serde(rename = "PrimaryAge")]
    primary_age: u32,
    #[serde(rename = "Income")]
    income: i64,
    #[serde(rename = "Expense")]
    expense: i64,
    #[serde(rename = "EventCost")]
    event_cost: i64,
    #[serde(rename = "CashFlow")]
    annual_cash_flow: i64,
    #[serde(rename = "CumulativeAssets")]
    cumulative_assets: i64,
    #[serde(rename = "Real")]
    is_real_data: bool,
}

impl From<&YearRecord> for CsvRow {
    fn from(r: &YearRecord) -> Self {
        Self {
            year: r.year,
            primary_age: r.primary_age,
            income: r.income,
            expense: r.expense,
            event_cost: r.event_cost,
            annual_cash_flow: r.annual_cash_flow,
            cumulative_assets: r.cumulative_assets,
            is_real_data: r.is_real_data,
        }
    }
}

/// Write `records` as CSV with a header row
pub fn write_records_csv<W: Write>(records: &[YearRecord], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(CsvRow::from(record))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the whole series as CSV
pub fn write_series_csv<W: Write>(series: &Series, writer: W) -> Result<()> {
    write_records_csv(series.records(), writer)
}
