use std::sync::Arc;

use tracing::info;

use crate::aggregate::DashboardSummary;
use crate::config::DashboardConfig;
use crate::core::Result;

use super::{DataSource, EntityCatalog, ObservationTable, source_for};

/// Everything computed once at startup: the table, its catalog and the
/// summary cards. Shared read-only for the rest of the process.
#[derive(Debug, Clone)]
pub struct Dataset {
    table: ObservationTable,
    catalog: EntityCatalog,
    summary: DashboardSummary,
}

impl Dataset {
    pub fn from_table(table: ObservationTable) -> Self {
        let catalog = EntityCatalog::from_table(&table);
        let summary = DashboardSummary::compute(&table);
        Self {
            table,
            catalog,
            summary,
        }
    }

    pub fn table(&self) -> &ObservationTable {
        &self.table
    }

    pub fn catalog(&self) -> &EntityCatalog {
        &self.catalog
    }

    pub fn summary(&self) -> &DashboardSummary {
        &self.summary
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

/// Load the dataset described by `config`.
///
/// Any failure here is meant to abort startup; nothing is retried.
pub async fn load(config: &DashboardConfig) -> Result<Dataset> {
    let source = source_for(&config.source, config.fetch_timeout);
    load_from(source.as_ref(), &config.region, config.zero_fill).await
}

pub async fn load_from(source: &dyn DataSource, region: &str, zero_fill: bool) -> Result<Dataset> {
    let bytes = source.read().await?;
    let table =
        ObservationTable::from_csv_reader(bytes.as_slice(), &source.describe(), region, zero_fill)?;
    let dataset = Dataset::from_table(table);

    info!(
        source = %source.describe(),
        region,
        rows = dataset.table().len(),
        entities = dataset.catalog().entities().len(),
        "dataset loaded"
    );
    Ok(dataset)
}
