//! Process-wide totals shown on the dashboard cards.
//!
//! `total_cases` and `total_deaths` add up the cumulative counters of *every*
//! row, all dates included, so a country contributes once per reported day.
//! The cards have always shown these figures; they are kept as-is until the
//! intended definition (latest value per country) is confirmed.

use serde::Serialize;

use crate::core::{finite_or_zero, round_to};
use crate::storage::ObservationTable;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DashboardSummary {
    pub total_cases: f64,
    pub total_deaths: f64,
    /// `new_cases` of the last row in table order
    pub new_cases: f64,
    /// `new_deaths` of the last row in table order
    pub new_deaths: f64,
    /// total_deaths / total_cases in percent, three decimals
    pub mortality_rate: f64,
}

impl DashboardSummary {
    pub fn compute(table: &ObservationTable) -> Self {
        let total_cases = table.iter().filter_map(|r| r.total_cases).fold(0.0, |acc, v| acc + v);
        let total_deaths = table.iter().filter_map(|r| r.total_deaths).fold(0.0, |acc, v| acc + v);

        let last = table.last();
        let new_cases = last.and_then(|r| r.new_cases).unwrap_or(0.0);
        let new_deaths = last.and_then(|r| r.new_deaths).unwrap_or(0.0);

        Self {
            total_cases,
            total_deaths,
            new_cases,
            new_deaths,
            mortality_rate: finite_or_zero(round_to(total_deaths / total_cases * 100.0, 3)),
        }
    }
}
