use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::aggregate::DashboardSummary;
use crate::config::DashboardConfig;
use crate::core::Result;
use crate::selection::{ChartQuery, DateWindow, EntitySelection};
use crate::snapshot::{GroupKey, SnapshotMode, SnapshotRequest, SnapshotRow, snapshot};
use crate::storage::{Dataset, load};
use crate::views::{
    ChoroplethView, DashboardViews, LineView, ParallelCoordinatesView, PieView, ViewInput,
    build_all, build_choropleth, build_line, build_parallel_coordinates, build_pie,
};

/// One selectable country as offered to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub name: String,
    pub iso_code: Option<String>,
    pub color: Option<&'static str>,
}

/// Map color of one country code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeColor {
    pub iso_code: String,
    pub color: &'static str,
}

/// Selector options and the date range they can be filtered to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogView {
    pub entities: Vec<CatalogEntry>,
    pub code_colors: Vec<CodeColor>,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

/// Read-only entry point over a loaded dataset.
///
/// Cloning is cheap; every clone shares the same dataset. Each chart call
/// resolves the raw query first and rejects bad dates before any view is
/// built.
#[derive(Debug, Clone)]
pub struct Dashboard {
    dataset: Arc<Dataset>,
}

impl Dashboard {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self { dataset }
    }

    /// Fetch and prepare the dataset described by `config`.
    pub async fn load(config: &DashboardConfig) -> Result<Self> {
        let dataset = load(config).await?;
        Ok(Self::new(dataset.into_shared()))
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn summary(&self) -> DashboardSummary {
        *self.dataset.summary()
    }

    pub fn catalog(&self) -> CatalogView {
        let catalog = self.dataset.catalog();
        let range = self.dataset.table().date_range();

        CatalogView {
            entities: catalog
                .entities()
                .iter()
                .map(|name| CatalogEntry {
                    iso_code: catalog.code_of(name).map(str::to_string),
                    color: catalog.entity_color(name),
                    name: name.clone(),
                })
                .collect(),
            code_colors: catalog
                .code_colors()
                .into_iter()
                .map(|(iso_code, color)| CodeColor { iso_code, color })
                .collect(),
            first_date: range.map(|(from, _)| from),
            last_date: range.map(|(_, to)| to),
        }
    }

    pub fn line(&self, query: &ChartQuery) -> Result<LineView> {
        self.render(query, build_line)
    }

    pub fn parallel_coordinates(&self, query: &ChartQuery) -> Result<ParallelCoordinatesView> {
        self.render(query, build_parallel_coordinates)
    }

    pub fn pie(&self, query: &ChartQuery) -> Result<PieView> {
        self.render(query, build_pie)
    }

    pub fn choropleth(&self, query: &ChartQuery) -> Result<ChoroplethView> {
        self.render(query, build_choropleth)
    }

    /// All four views for the same selection and window.
    pub fn views(&self, query: &ChartQuery) -> Result<DashboardViews> {
        self.render(query, build_all)
    }

    /// Latest qualifying observation per selected entity or code.
    pub fn snapshot(
        &self,
        query: &ChartQuery,
        group_by: GroupKey,
        mode: SnapshotMode,
    ) -> Result<Vec<SnapshotRow>> {
        let (selection, window) = self.resolve(query)?;
        let codes = selection.codes(self.dataset.catalog());

        let mut request = SnapshotRequest::new(selection.names(), window)
            .group_by(group_by)
            .mode(mode);
        if group_by == GroupKey::Code {
            request = request.codes(&codes);
        }

        Ok(snapshot(self.dataset.table(), &request))
    }

    /// Write the summary, the catalog and every view to `dir` as pretty JSON.
    pub async fn export(&self, query: &ChartQuery, dir: &Path) -> Result<Vec<PathBuf>> {
        tokio::fs::create_dir_all(dir).await?;

        let documents = [
            ("summary.json", serde_json::to_vec_pretty(&self.summary())?),
            ("catalog.json", serde_json::to_vec_pretty(&self.catalog())?),
            ("dashboard.json", serde_json::to_vec_pretty(&self.views(query)?)?),
        ];

        let mut written = Vec::with_capacity(documents.len());
        for (name, bytes) in documents {
            let path = dir.join(name);
            tokio::fs::write(&path, bytes).await?;
            debug!(path = %path.display(), "exported");
            written.push(path);
        }

        info!(dir = %dir.display(), files = written.len(), "dashboard exported");
        Ok(written)
    }

    fn resolve(&self, query: &ChartQuery) -> Result<(EntitySelection, DateWindow)> {
        query.resolve(self.dataset.catalog(), self.dataset.table())
    }

    fn render<T>(&self, query: &ChartQuery, build: impl FnOnce(ViewInput<'_>) -> T) -> Result<T> {
        let (selection, window) = self.resolve(query)?;
        debug!(
            selected = selection.len(),
            from = %window.from,
            to = %window.to,
            "building view"
        );
        Ok(build(ViewInput::new(&self.dataset, &selection, window)))
    }
}
