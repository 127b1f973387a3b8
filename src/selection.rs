//! Typed inputs coming from the interaction layer: which countries are
//! selected and which date window is shown. Normalization happens here, once,
//! so the view builders only ever see an ordered list of names and a valid
//! inclusive window.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{DashError, Result};
use crate::storage::{EntityCatalog, ObservationTable};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A selection as clients send it: one name or a list of names.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SelectionInput {
    One(String),
    Many(Vec<String>),
}

/// Ordered, de-duplicated entity names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntitySelection {
    names: Vec<String>,
}

impl EntitySelection {
    /// Keeps the first occurrence of each name; blank names are dropped.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            if seen.insert(name.to_string()) {
                out.push(name.to_string());
            }
        }
        Self { names: out }
    }

    pub fn single(name: &str) -> Self {
        Self::from_names([name])
    }

    /// Every entity of the catalog, in catalog order.
    pub fn all(catalog: &EntityCatalog) -> Self {
        Self::from_names(catalog.entities())
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Codes of the selected entities, in selection order. Names unknown to
    /// the catalog have no code and are skipped.
    pub fn codes(&self, catalog: &EntityCatalog) -> Vec<String> {
        let mut seen = HashSet::new();
        self.names
            .iter()
            .filter_map(|name| catalog.code_of(name))
            .filter(|code| seen.insert(*code))
            .map(str::to_string)
            .collect()
    }

    /// Position of each selected name. Only meaningful for this selection;
    /// a different selection yields different ordinals.
    pub fn ordinal_lookup(&self) -> HashMap<&str, usize> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect()
    }
}

impl From<SelectionInput> for EntitySelection {
    fn from(input: SelectionInput) -> Self {
        match input {
            SelectionInput::One(name) => Self::from_names(name.split(',')),
            SelectionInput::Many(names) => Self::from_names(names),
        }
    }
}

/// Raw chart controls as they arrive from a client.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChartQuery {
    /// `None` selects every country; `Some` of an empty list selects none.
    #[serde(default)]
    pub countries: Option<SelectionInput>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl ChartQuery {
    /// Build from URL query pairs. `countries` may repeat and each value may
    /// hold a comma separated list.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let mut query = Self::default();
        let mut countries: Option<Vec<String>> = None;

        for (key, value) in pairs {
            match key.as_str() {
                "countries" | "countries[]" | "country" => countries
                    .get_or_insert_with(Vec::new)
                    .extend(value.split(',').map(str::to_string)),
                "start_date" => query.start_date = Some(value.clone()),
                "end_date" => query.end_date = Some(value.clone()),
                _ => {}
            }
        }

        query.countries = countries.map(SelectionInput::Many);
        query
    }

    /// Normalize into a typed selection and a validated window.
    pub fn resolve(
        &self,
        catalog: &EntityCatalog,
        table: &ObservationTable,
    ) -> Result<(EntitySelection, DateWindow)> {
        let selection = match &self.countries {
            Some(input) => EntitySelection::from(input.clone()),
            None => EntitySelection::all(catalog),
        };
        let window =
            DateWindow::resolve(self.start_date.as_deref(), self.end_date.as_deref(), table)?;
        Ok((selection, window))
    }
}

/// Inclusive date window `[from, to]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateWindow {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self> {
        if from > to {
            return Err(DashError::InvalidWindow(format!(
                "start date {} is after end date {}",
                from, to
            )));
        }
        Ok(Self { from, to })
    }

    /// Parse both bounds from `YYYY-MM-DD` strings.
    pub fn parse(from: &str, to: &str) -> Result<Self> {
        Self::new(parse_date(from)?, parse_date(to)?)
    }

    /// Window spanning the whole table; unbounded for an empty table.
    pub fn full(table: &ObservationTable) -> Self {
        match table.date_range() {
            Some((from, to)) => Self { from, to },
            None => Self {
                from: NaiveDate::MIN,
                to: NaiveDate::MAX,
            },
        }
    }

    /// Missing bounds default to the table's first and last date.
    pub fn resolve(
        start: Option<&str>,
        end: Option<&str>,
        table: &ObservationTable,
    ) -> Result<Self> {
        let full = Self::full(table);
        let from = match start.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => parse_date(raw)?,
            None => full.from,
        };
        let to = match end.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => parse_date(raw)?,
            None => full.to,
        };
        Self::new(from, to)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| DashError::InvalidDate(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::fixtures::{date, obs};

    #[test]
    fn test_selection_dedups_and_keeps_order() {
        let selection = EntitySelection::from_names(["Italy", " Germany ", "", "Italy"]);
        assert_eq!(selection.names(), ["Italy", "Germany"]);
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn test_scalar_and_sequence_inputs_normalize_the_same() {
        let one: SelectionInput = serde_json::from_str("\"Germany\"").unwrap();
        let many: SelectionInput = serde_json::from_str("[\"Germany\"]").unwrap();
        assert_eq!(EntitySelection::from(one), EntitySelection::from(many));

        let joined = EntitySelection::from(SelectionInput::One("France,Spain".to_string()));
        assert_eq!(joined.names(), ["France", "Spain"]);
    }

    #[test]
    fn test_codes_skip_unknown_names() {
        let table = ObservationTable::from_observations(vec![
            obs(0, "Germany", "DEU", "2021-01-01", 1.0, 0.0),
            obs(0, "France", "FRA", "2021-01-01", 1.0, 0.0),
        ]);
        let catalog = EntityCatalog::from_table(&table);

        let selection = EntitySelection::from_names(["France", "Atlantis", "Germany"]);
        assert_eq!(selection.codes(&catalog), ["FRA", "DEU"]);
    }

    #[test]
    fn test_ordinal_lookup_follows_selection_order() {
        let selection = EntitySelection::from_names(["Spain", "Austria"]);
        let lookup = selection.ordinal_lookup();
        assert_eq!(lookup["Spain"], 0);
        assert_eq!(lookup["Austria"], 1);
    }

    #[test]
    fn test_window_parsing_and_validation() {
        let window = DateWindow::parse("2021-01-01", "2021-01-31").unwrap();
        assert!(window.contains(date("2021-01-01")));
        assert!(window.contains(date("2021-01-31")));
        assert!(!window.contains(date("2021-02-01")));

        assert!(matches!(
            DateWindow::parse("2021-13-01", "2021-01-31"),
            Err(DashError::InvalidDate(_))
        ));
        assert!(matches!(
            DateWindow::parse("yesterday", "2021-01-31"),
            Err(DashError::InvalidDate(_))
        ));
        assert!(matches!(
            DateWindow::parse("2021-02-01", "2021-01-31"),
            Err(DashError::InvalidWindow(_))
        ));
    }

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_query_pairs_collect_repeated_and_joined_countries() {
        let query = ChartQuery::from_pairs(&pairs(&[
            ("countries", "Germany"),
            ("countries", "France,Spain"),
            ("start_date", "2021-01-01"),
            ("unrelated", "x"),
        ]));

        assert_eq!(
            query.countries,
            Some(SelectionInput::Many(vec![
                "Germany".to_string(),
                "France".to_string(),
                "Spain".to_string(),
            ]))
        );
        assert_eq!(query.start_date.as_deref(), Some("2021-01-01"));
        assert_eq!(query.end_date, None);
    }

    #[test]
    fn test_query_resolve_distinguishes_missing_and_empty_selection() {
        let table = ObservationTable::from_observations(vec![
            obs(0, "Germany", "DEU", "2021-01-01", 1.0, 0.0),
            obs(0, "France", "FRA", "2021-01-02", 1.0, 0.0),
        ]);
        let catalog = EntityCatalog::from_table(&table);

        let (all, _) = ChartQuery::default().resolve(&catalog, &table).unwrap();
        assert_eq!(all.names(), ["Germany", "France"]);

        let empty = ChartQuery::from_pairs(&pairs(&[("countries", "")]));
        let (none, _) = empty.resolve(&catalog, &table).unwrap();
        assert!(none.is_empty());

        let bad = ChartQuery::from_pairs(&pairs(&[("end_date", "31/01/2021")]));
        assert!(matches!(
            bad.resolve(&catalog, &table),
            Err(DashError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_resolve_defaults_to_table_range() {
        let table = ObservationTable::from_observations(vec![
            obs(0, "Germany", "DEU", "2020-03-01", 1.0, 0.0),
            obs(0, "Germany", "DEU", "2021-06-30", 1.0, 0.0),
        ]);

        let window = DateWindow::resolve(None, Some("2020-12-31"), &table).unwrap();
        assert_eq!(window.from, date("2020-03-01"));
        assert_eq!(window.to, date("2020-12-31"));

        let window = DateWindow::resolve(Some(""), None, &table).unwrap();
        assert_eq!(window, DateWindow::full(&table));
    }
}
