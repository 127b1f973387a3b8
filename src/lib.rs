// ============================================================================
// covidlens: COVID-19 Europe dashboard data pipeline
// ============================================================================

pub mod aggregate;
pub mod config;
pub mod core;
pub mod facade;
pub mod selection;
pub mod snapshot;
pub mod storage;
pub mod views;
pub mod web;

// Re-export main types for convenience
pub use aggregate::DashboardSummary;
pub use config::DashboardConfig;
pub use core::{DashError, Metric, Observation, Result};
pub use facade::{CatalogView, Dashboard};
pub use selection::{ChartQuery, DateWindow, EntitySelection, SelectionInput};
pub use snapshot::{GroupKey, SnapshotMode, SnapshotRequest, SnapshotRow, snapshot};
pub use storage::{Dataset, EntityCatalog, ObservationTable};
pub use views::{DashboardViews, ViewInput, build_all};
pub use web::{AppState, build_router};
