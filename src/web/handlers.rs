use axum::Json;
use axum::extract::{Query, State};
use serde::Serialize;

use crate::aggregate::DashboardSummary;
use crate::facade::CatalogView;
use crate::selection::ChartQuery;
use crate::snapshot::{GroupKey, SnapshotMode, SnapshotRow};
use crate::views::{ChoroplethView, DashboardViews, LineView, ParallelCoordinatesView, PieView};

use super::{ApiResponse, AppState, Result};

/// Query strings are taken as raw pairs so `countries` can repeat.
type Pairs = Query<Vec<(String, String)>>;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub rows: usize,
    pub entities: usize,
}

pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthStatus>> {
    let dataset = state.dashboard.dataset();
    Json(ApiResponse {
        data: HealthStatus {
            status: "ok",
            rows: dataset.table().len(),
            entities: dataset.catalog().entities().len(),
        },
    })
}

pub async fn summary(State(state): State<AppState>) -> Json<ApiResponse<DashboardSummary>> {
    Json(ApiResponse {
        data: state.dashboard.summary(),
    })
}

pub async fn catalog(State(state): State<AppState>) -> Json<ApiResponse<CatalogView>> {
    Json(ApiResponse {
        data: state.dashboard.catalog(),
    })
}

pub async fn line(
    State(state): State<AppState>,
    Query(pairs): Pairs,
) -> Result<Json<ApiResponse<LineView>>> {
    let view = state.dashboard.line(&ChartQuery::from_pairs(&pairs))?;
    Ok(Json(ApiResponse { data: view }))
}

pub async fn parallel_coordinates(
    State(state): State<AppState>,
    Query(pairs): Pairs,
) -> Result<Json<ApiResponse<ParallelCoordinatesView>>> {
    let view = state
        .dashboard
        .parallel_coordinates(&ChartQuery::from_pairs(&pairs))?;
    Ok(Json(ApiResponse { data: view }))
}

pub async fn pie(
    State(state): State<AppState>,
    Query(pairs): Pairs,
) -> Result<Json<ApiResponse<PieView>>> {
    let view = state.dashboard.pie(&ChartQuery::from_pairs(&pairs))?;
    Ok(Json(ApiResponse { data: view }))
}

pub async fn choropleth(
    State(state): State<AppState>,
    Query(pairs): Pairs,
) -> Result<Json<ApiResponse<ChoroplethView>>> {
    let view = state.dashboard.choropleth(&ChartQuery::from_pairs(&pairs))?;
    Ok(Json(ApiResponse { data: view }))
}

pub async fn dashboard(
    State(state): State<AppState>,
    Query(pairs): Pairs,
) -> Result<Json<ApiResponse<DashboardViews>>> {
    let views = state.dashboard.views(&ChartQuery::from_pairs(&pairs))?;
    Ok(Json(ApiResponse { data: views }))
}

/// Same as [`dashboard`], with the controls sent as a JSON body.
pub async fn dashboard_body(
    State(state): State<AppState>,
    Json(query): Json<ChartQuery>,
) -> Result<Json<ApiResponse<DashboardViews>>> {
    let views = state.dashboard.views(&query)?;
    Ok(Json(ApiResponse { data: views }))
}

pub async fn snapshot(
    State(state): State<AppState>,
    Query(pairs): Pairs,
) -> Result<Json<ApiResponse<Vec<SnapshotRow>>>> {
    let group_by = match param(&pairs, "group_by") {
        Some(raw) => raw.parse::<GroupKey>()?,
        None => GroupKey::default(),
    };
    let mode = match param(&pairs, "mode") {
        Some(raw) => raw.parse::<SnapshotMode>()?,
        None => SnapshotMode::default(),
    };

    let rows = state
        .dashboard
        .snapshot(&ChartQuery::from_pairs(&pairs), group_by, mode)?;
    Ok(Json(ApiResponse { data: rows }))
}

/// Last non-blank value of a single-valued parameter.
fn param<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .rev()
        .find(|(key, value)| key == name && !value.trim().is_empty())
        .map(|(_, value)| value.trim())
}
