use chrono::NaiveDate;
use serde::Serialize;

use crate::core::Metric;
use crate::snapshot::{GroupKey, SnapshotMode, SnapshotRequest, snapshot};

use super::{CHART_HEIGHT, HoverField, ViewInput};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethRegion {
    pub iso_code: String,
    pub location: String,
    pub date: NaiveDate,
    pub death_rate: f64,
    pub total_deaths: f64,
    pub total_cases: f64,
    pub color: &'static str,
}

/// Latest death rate per country code, drawn on a map of Europe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethView {
    pub title: &'static str,
    pub height: u32,
    pub scope: &'static str,
    /// Renderer hint: zoom to the regions listed in `locations`.
    pub fit_bounds: &'static str,
    pub locations: Vec<String>,
    pub hover: Vec<HoverField>,
    pub regions: Vec<ChoroplethRegion>,
}

pub fn build_choropleth(input: ViewInput<'_>) -> ChoroplethView {
    let codes = input.selection.codes(input.catalog);
    let rows = snapshot(
        input.table,
        &SnapshotRequest::new(input.selection.names(), input.window)
            .codes(&codes)
            .group_by(GroupKey::Code)
            .mode(SnapshotMode::Core),
    );

    let regions: Vec<ChoroplethRegion> = rows
        .into_iter()
        .map(|row| {
            let obs = row.observation;
            ChoroplethRegion {
                color: input.code_color(&obs.iso_code),
                iso_code: obs.iso_code,
                location: obs.location,
                date: obs.date,
                death_rate: row.death_rate,
                total_deaths: obs.total_deaths.unwrap_or(0.0),
                total_cases: obs.total_cases.unwrap_or(0.0),
            }
        })
        .collect();

    ChoroplethView {
        title: "Choropleth map (Europe)",
        height: CHART_HEIGHT,
        scope: "europe",
        fit_bounds: "locations",
        locations: regions.iter().map(|r| r.iso_code.clone()).collect(),
        hover: vec![
            HoverField::new("iso_code", "ISO code"),
            HoverField::new("location", "European country"),
            HoverField::new("date", "Date"),
            HoverField::new("death_rate", "COVID-19 Death rate(%)"),
            HoverField::metric(Metric::TotalDeaths),
            HoverField::metric(Metric::TotalCases),
        ],
        regions,
    }
}
