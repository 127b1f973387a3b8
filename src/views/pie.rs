use chrono::NaiveDate;
use serde::Serialize;

use crate::core::{Metric, finite_or_zero, round_to};
use crate::snapshot::{SnapshotMode, SnapshotRequest, snapshot};

use super::{CHART_HEIGHT, HoverField, ViewInput};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieWedge {
    pub label: String,
    pub value: f64,
    /// Share of the pie, in percent with two decimals.
    pub percent: f64,
    /// Date of the observation the test count comes from.
    pub date: NaiveDate,
    pub color: &'static str,
}

/// Cumulative tests per selected country, as of its latest report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieView {
    pub title: &'static str,
    pub height: u32,
    pub value_label: &'static str,
    pub hover: Vec<HoverField>,
    pub wedges: Vec<PieWedge>,
}

pub fn build_pie(input: ViewInput<'_>) -> PieView {
    let rows = snapshot(
        input.table,
        &SnapshotRequest::new(input.selection.names(), input.window).mode(SnapshotMode::Tests),
    );

    let total = rows
        .iter()
        .filter_map(|r| r.observation.total_tests)
        .fold(0.0, |acc, v| acc + v);

    let wedges = rows
        .into_iter()
        .filter_map(|row| {
            let value = row.observation.total_tests?;
            Some(PieWedge {
                color: input.entity_color(&row.observation.location),
                label: row.observation.location,
                value,
                percent: finite_or_zero(round_to(value / total * 100.0, 2)),
                date: row.observation.date,
            })
        })
        .collect();

    PieView {
        title: "Pie Chart",
        height: CHART_HEIGHT,
        value_label: Metric::TotalTests.label(),
        hover: vec![
            HoverField::new("label", "European country"),
            HoverField::new("date", "Recent data available date"),
        ],
        wedges,
    }
}
