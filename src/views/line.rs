use chrono::NaiveDate;
use serde::Serialize;

use crate::core::Metric;

use super::{CHART_HEIGHT, HoverField, ViewInput};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinePoint {
    pub date: NaiveDate,
    /// `None` renders as a gap in the line.
    pub stringency_index: Option<f64>,
    pub total_cases: Option<f64>,
    pub total_deaths: Option<f64>,
    pub new_cases: Option<f64>,
    pub new_deaths: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub name: String,
    pub color: &'static str,
    pub points: Vec<LinePoint>,
}

/// Stringency index over time, one line per selected country.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineView {
    pub title: &'static str,
    pub height: u32,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub legend_title: &'static str,
    pub hover: Vec<HoverField>,
    pub series: Vec<LineSeries>,
}

pub fn build_line(input: ViewInput<'_>) -> LineView {
    let series = input
        .selection
        .names()
        .iter()
        .filter_map(|name| {
            let points: Vec<LinePoint> = input
                .table
                .iter()
                .filter(|row| row.location == *name && input.window.contains(row.date))
                .map(|row| LinePoint {
                    date: row.date,
                    stringency_index: row.stringency_index,
                    total_cases: row.total_cases,
                    total_deaths: row.total_deaths,
                    new_cases: row.new_cases,
                    new_deaths: row.new_deaths,
                })
                .collect();

            (!points.is_empty()).then(|| LineSeries {
                name: name.clone(),
                color: input.entity_color(name),
                points,
            })
        })
        .collect();

    LineView {
        title: "Line Graphs for Multivariate Data",
        height: CHART_HEIGHT,
        x_label: "Date",
        y_label: Metric::StringencyIndex.label(),
        legend_title: "European country",
        hover: vec![
            HoverField::metric(Metric::TotalCases),
            HoverField::metric(Metric::TotalDeaths),
            HoverField::metric(Metric::NewCases),
            HoverField::metric(Metric::NewDeaths),
        ],
        series,
    }
}
