//! Most-recent-observation-per-entity extraction.
//!
//! For every requested entity (or code) the extractor keeps the latest row
//! inside the date window whose required metrics are present. When two rows
//! of one group share the latest date, the one that comes last in the table
//! wins.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::{DashError, Metric, Observation, Result};
use crate::selection::DateWindow;
use crate::storage::ObservationTable;

/// Column used to group rows before picking the latest one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    #[default]
    Entity,
    Code,
}

impl FromStr for GroupKey {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "entity" | "location" => Ok(Self::Entity),
            "code" | "iso_code" => Ok(Self::Code),
            other => Err(DashError::InvalidParameter(format!(
                "group_by must be 'entity' or 'code', got '{}'",
                other
            ))),
        }
    }
}

/// Which metrics a row must carry to qualify, and how the output is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotMode {
    /// Cases and deaths present.
    #[default]
    Core,
    /// Cases and deaths present; demographic columns zero-filled.
    Demographics,
    /// Test count present.
    Tests,
}

impl SnapshotMode {
    const DEMOGRAPHICS: [Metric; 4] = [
        Metric::Population,
        Metric::HospitalBedsPerThousand,
        Metric::MedianAge,
        Metric::LifeExpectancy,
    ];

    pub fn required(&self) -> &'static [Metric] {
        match self {
            Self::Core | Self::Demographics => &[Metric::TotalCases, Metric::TotalDeaths],
            Self::Tests => &[Metric::TotalTests],
        }
    }
}

impl FromStr for SnapshotMode {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "core" => Ok(Self::Core),
            "demographics" => Ok(Self::Demographics),
            "tests" => Ok(Self::Tests),
            other => Err(DashError::InvalidParameter(format!(
                "mode must be one of core, demographics, tests; got '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SnapshotRequest<'a> {
    pub entities: &'a [String],
    /// Extra code filter; when grouping by code these are also the groups.
    pub codes: Option<&'a [String]>,
    pub window: DateWindow,
    pub group_by: GroupKey,
    pub mode: SnapshotMode,
}

impl<'a> SnapshotRequest<'a> {
    pub fn new(entities: &'a [String], window: DateWindow) -> Self {
        Self {
            entities,
            codes: None,
            window,
            group_by: GroupKey::Entity,
            mode: SnapshotMode::Core,
        }
    }

    pub fn codes(mut self, codes: &'a [String]) -> Self {
        self.codes = Some(codes);
        self
    }

    pub fn group_by(mut self, key: GroupKey) -> Self {
        self.group_by = key;
        self
    }

    pub fn mode(mut self, mode: SnapshotMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Latest qualifying observation of one group plus its death rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotRow {
    #[serde(flatten)]
    pub observation: Observation,
    pub death_rate: f64,
}

pub fn snapshot(table: &ObservationTable, request: &SnapshotRequest<'_>) -> Vec<SnapshotRow> {
    let entities: HashSet<&str> = request.entities.iter().map(String::as_str).collect();
    let codes: Option<HashSet<&str>> = request
        .codes
        .map(|codes| codes.iter().map(String::as_str).collect());
    let required = request.mode.required();

    let group_of = |row: &Observation| -> String {
        match request.group_by {
            GroupKey::Entity => row.location.clone(),
            GroupKey::Code => row.iso_code.clone(),
        }
    };

    let mut latest: HashMap<String, &Observation> = HashMap::new();
    // Group order for code grouping without an explicit code list.
    let mut discovered: Vec<String> = Vec::new();

    for row in table.iter() {
        if !entities.contains(row.location.as_str()) {
            continue;
        }
        if let Some(codes) = &codes
            && !codes.contains(row.iso_code.as_str())
        {
            continue;
        }
        if !request.window.contains(row.date) || !row.has_all(required) {
            continue;
        }

        let key = group_of(row);
        let replace = match latest.get(&key) {
            // Rows arrive in table order, so `>=` hands ties to the later row.
            Some(best) => row.date >= best.date,
            None => {
                discovered.push(key.clone());
                true
            }
        };
        if replace {
            latest.insert(key, row);
        }
    }

    let order: Vec<String> = match (request.group_by, request.codes) {
        (GroupKey::Entity, _) => request.entities.to_vec(),
        (GroupKey::Code, Some(codes)) => codes.to_vec(),
        (GroupKey::Code, None) => discovered,
    };

    let mut emitted = HashSet::new();
    order
        .iter()
        .filter(|key| emitted.insert(key.as_str()))
        .filter_map(|key| latest.get(key))
        .map(|row| to_snapshot_row(row, request.mode))
        .collect()
}

fn to_snapshot_row(row: &Observation, mode: SnapshotMode) -> SnapshotRow {
    let mut observation = row.clone();
    if mode == SnapshotMode::Demographics {
        observation.zero_fill(&SnapshotMode::DEMOGRAPHICS);
    }
    let death_rate = observation.death_rate();
    SnapshotRow {
        observation,
        death_rate,
    }
}
