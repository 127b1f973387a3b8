//! Chart view builders.
//!
//! Each builder is a pure function of the loaded table, the catalog colors,
//! the current selection and the date window. Views are rebuilt from scratch
//! on every call and are plain serializable data for a chart renderer.

pub mod choropleth;
pub mod line;
pub mod parcoords;
pub mod pie;

use serde::Serialize;

use crate::core::Metric;
use crate::selection::{DateWindow, EntitySelection};
use crate::storage::{Dataset, EntityCatalog, ObservationTable};

pub use choropleth::{ChoroplethRegion, ChoroplethView, build_choropleth};
pub use line::{LinePoint, LineSeries, LineView, build_line};
pub use parcoords::{ColorScale, Dimension, ParallelCoordinatesView, build_parallel_coordinates};
pub use pie::{PieView, PieWedge, build_pie};

/// Used when an entity has no catalog color.
pub const NEUTRAL_COLOR: &str = "#7F7F7F";

/// Default chart height in pixels.
pub const CHART_HEIGHT: u32 = 700;

/// Everything a builder reads. Borrowed, never mutated.
#[derive(Debug, Clone, Copy)]
pub struct ViewInput<'a> {
    pub table: &'a ObservationTable,
    pub catalog: &'a EntityCatalog,
    pub selection: &'a EntitySelection,
    pub window: DateWindow,
}

impl<'a> ViewInput<'a> {
    pub fn new(dataset: &'a Dataset, selection: &'a EntitySelection, window: DateWindow) -> Self {
        Self {
            table: dataset.table(),
            catalog: dataset.catalog(),
            selection,
            window,
        }
    }

    fn entity_color(&self, entity: &str) -> &'static str {
        self.catalog.entity_color(entity).unwrap_or(NEUTRAL_COLOR)
    }

    fn code_color(&self, code: &str) -> &'static str {
        self.catalog.code_color(code).unwrap_or(NEUTRAL_COLOR)
    }
}

/// A hover field: which property of a point is shown, and under which label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HoverField {
    pub field: &'static str,
    pub label: &'static str,
}

impl HoverField {
    pub const fn new(field: &'static str, label: &'static str) -> Self {
        Self { field, label }
    }

    pub fn metric(metric: Metric) -> Self {
        Self::new(metric.column(), metric.label())
    }
}

/// All four views for one selection and window.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardViews {
    pub line: LineView,
    pub parallel_coordinates: ParallelCoordinatesView,
    pub pie: PieView,
    pub choropleth: ChoroplethView,
}

pub fn build_all(input: ViewInput<'_>) -> DashboardViews {
    DashboardViews {
        line: build_line(input),
        parallel_coordinates: build_parallel_coordinates(input),
        pie: build_pie(input),
        choropleth: build_choropleth(input),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::core::types::fixtures::obs;
    use crate::storage::{Dataset, ObservationTable};

    /// Three countries over early 2021 with every column populated for
    /// Germany and France, and sparse data for Austria.
    pub fn dataset() -> Dataset {
        let mut rows = Vec::new();

        for (day, cases, deaths, tests, stringency) in [
            ("2021-01-01", 100.0, 2.0, Some(5_000.0), Some(70.0)),
            ("2021-01-05", 150.0, 3.0, None, Some(72.5)),
            ("2021-02-10", 400.0, 8.0, Some(9_000.0), Some(60.0)),
        ] {
            let mut row = obs(0, "Germany", "DEU", day, cases, deaths);
            row.new_cases = Some(10.0);
            row.new_deaths = Some(1.0);
            row.total_tests = tests;
            row.stringency_index = stringency;
            row.population = Some(83_000_000.0);
            row.hospital_beds_per_thousand = Some(8.0);
            row.median_age = Some(46.6);
            row.life_expectancy = Some(81.3);
            rows.push(row);
        }

        for (day, cases, deaths, tests) in [
            ("2021-01-02", 200.0, 10.0, Some(1_000.0)),
            ("2021-01-20", 300.0, 12.0, Some(3_000.0)),
        ] {
            let mut row = obs(0, "France", "FRA", day, cases, deaths);
            row.total_tests = tests;
            row.stringency_index = Some(65.0);
            row.population = Some(67_000_000.0);
            row.hospital_beds_per_thousand = Some(6.0);
            row.median_age = Some(42.0);
            row.life_expectancy = Some(82.7);
            rows.push(row);
        }

        rows.push(obs(0, "Austria", "AUT", "2021-01-15", 0.0, 0.0));

        Dataset::from_table(ObservationTable::from_observations(rows))
    }
}
