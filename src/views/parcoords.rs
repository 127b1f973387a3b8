use serde::Serialize;

use crate::core::Metric;
use crate::snapshot::{SnapshotMode, SnapshotRequest, snapshot};

use super::ViewInput;

/// One vertical axis of the plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dimension {
    pub label: &'static str,
    pub range: [f64; 2],
    pub values: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tick_values: Option<Vec<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tick_text: Option<Vec<String>>,
}

impl Dimension {
    /// Continuous axis ranged from zero to the largest value shown.
    fn continuous(label: &'static str, values: Vec<f64>) -> Self {
        let max = values.iter().copied().fold(0.0, f64::max);
        Self {
            label,
            range: [0.0, max],
            values,
            tick_values: None,
            tick_text: None,
        }
    }
}

/// Line coloring: one numeric color value per polyline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorScale {
    pub values: Vec<f64>,
    pub colorscale: &'static str,
    pub cmin: f64,
    pub cmax: f64,
    pub show_scale: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParallelCoordinatesView {
    pub title: &'static str,
    pub height: u32,
    /// Country of each polyline, aligned with every dimension's values.
    pub entities: Vec<String>,
    pub line: ColorScale,
    pub dimensions: Vec<Dimension>,
}

/// Demographics and death rate of the latest observation per selected
/// country.
///
/// The country axis maps names to their position in the current selection,
/// so its ordinal values are only comparable within one call.
pub fn build_parallel_coordinates(input: ViewInput<'_>) -> ParallelCoordinatesView {
    let names = input.selection.names();
    let rows = snapshot(
        input.table,
        &SnapshotRequest::new(names, input.window).mode(SnapshotMode::Demographics),
    );

    let lookup = input.selection.ordinal_lookup();
    let ordinals: Vec<f64> = rows
        .iter()
        .filter_map(|r| lookup.get(r.observation.location.as_str()))
        .map(|i| *i as f64)
        .collect();

    let column = |metric: Metric| -> Vec<f64> {
        rows.iter()
            .map(|r| r.observation.metric(metric).unwrap_or(0.0))
            .collect()
    };

    let n = names.len() as f64;
    let countries = Dimension {
        label: "countries",
        range: [0.0, n],
        values: ordinals.clone(),
        tick_values: Some((0..names.len()).collect()),
        tick_text: Some(names.to_vec()),
    };

    let dimensions = vec![
        countries,
        Dimension::continuous(
            Metric::HospitalBedsPerThousand.label(),
            column(Metric::HospitalBedsPerThousand),
        ),
        Dimension::continuous(Metric::MedianAge.label(), column(Metric::MedianAge)),
        Dimension::continuous(Metric::Population.label(), column(Metric::Population)),
        Dimension::continuous(Metric::LifeExpectancy.label(), column(Metric::LifeExpectancy)),
        Dimension::continuous(
            "COVID-19 Death rate",
            rows.iter().map(|r| r.death_rate).collect(),
        ),
    ];

    ParallelCoordinatesView {
        title: "Parallel Coordinates",
        height: 800,
        entities: rows.iter().map(|r| r.observation.location.clone()).collect(),
        line: ColorScale {
            values: ordinals,
            colorscale: "HSV",
            cmin: 0.0,
            cmax: n,
            show_scale: false,
        },
        dimensions,
    }
}
