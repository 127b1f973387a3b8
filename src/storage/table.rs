use std::io::Read;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use crate::core::{DashError, Metric, Observation, REQUIRED_COLUMNS, Result};

/// A source row as it appears in the CSV, before region filtering.
#[derive(Debug, Deserialize)]
struct RawRecord {
    iso_code: String,
    continent: Option<String>,
    location: String,
    date: String,
    total_cases: Option<f64>,
    new_cases: Option<f64>,
    total_deaths: Option<f64>,
    new_deaths: Option<f64>,
    total_tests: Option<f64>,
    population: Option<f64>,
    hospital_beds_per_thousand: Option<f64>,
    median_age: Option<f64>,
    life_expectancy: Option<f64>,
    stringency_index: Option<f64>,
}

impl RawRecord {
    fn into_observation(self, ordinal: usize, date: NaiveDate) -> Observation {
        Observation {
            ordinal,
            location: self.location,
            iso_code: self.iso_code,
            continent: self.continent.unwrap_or_default(),
            date,
            total_cases: self.total_cases,
            total_deaths: self.total_deaths,
            new_cases: self.new_cases,
            new_deaths: self.new_deaths,
            total_tests: self.total_tests,
            population: self.population,
            hospital_beds_per_thousand: self.hospital_beds_per_thousand,
            median_age: self.median_age,
            life_expectancy: self.life_expectancy,
            stringency_index: self.stringency_index,
        }
    }
}

/// Region-filtered observations in original row order.
///
/// Immutable once built; share it behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct ObservationTable {
    rows: Vec<Observation>,
}

impl ObservationTable {
    /// Build a table from rows already in source order. Ordinals are
    /// reassigned from the position of each row.
    pub fn from_observations(rows: Vec<Observation>) -> Self {
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(ordinal, mut row)| {
                row.ordinal = ordinal;
                row
            })
            .collect();
        Self { rows }
    }

    /// Parse CSV from `reader`, keeping only rows whose continent equals
    /// `region`. With `zero_fill`, missing case/death counters become zero.
    pub fn from_csv_reader<R: Read>(
        reader: R,
        source: &str,
        region: &str,
        zero_fill: bool,
    ) -> Result<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == *column) {
                return Err(DashError::ColumnNotFound(
                    column.to_string(),
                    source.to_string(),
                ));
            }
        }

        let mut rows = Vec::new();
        let mut skipped = 0usize;

        for record in csv_reader.deserialize::<RawRecord>() {
            let record = record?;
            if record.continent.as_deref() != Some(region) {
                skipped += 1;
                continue;
            }

            let date = NaiveDate::parse_from_str(&record.date, "%Y-%m-%d").map_err(|_| {
                DashError::ParseError(format!(
                    "row for '{}' has malformed date '{}'",
                    record.location, record.date
                ))
            })?;

            let mut row = record.into_observation(rows.len(), date);
            if zero_fill {
                row.zero_fill(&Metric::CORE);
            }
            rows.push(row);
        }

        debug!(kept = rows.len(), skipped, region, "parsed observation table");
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[Observation] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &Observation> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Last row in original order.
    pub fn last(&self) -> Option<&Observation> {
        self.rows.last()
    }

    /// Earliest and latest date present in the table.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.rows.iter().map(|r| r.date).min()?;
        let last = self.rows.iter().map(|r| r.date).max()?;
        Some((first, last))
    }
}
