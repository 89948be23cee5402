// Copyright 2025 Logisight Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Dashboard view endpoints
//!
//! Every endpoint answers with the shared envelope. Filters arrive as
//! camelCase query parameters (see [`DashboardQuery`]) and are normalized
//! per view by the engine.

use axum::{
    extract::{Path, State},
    Json,
};
use logisight_core::{ApiResponse, View};
use logisight_query::{
    FilterOptions, KpiSnapshot, PartnerPerformanceRow, QueryError, RegionSummaryRow,
    ServiceModeRow, TrendPoint, ViewPayload, WeatherImpactRow,
};
use tracing::{debug, error};

use super::{ApiError, AppState, DashboardQuery};

type ViewResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

fn respond<T>(view: View, result: Result<T, QueryError>) -> ViewResult<T> {
    match result {
        Ok(data) => Ok(Json(ApiResponse::ok(data))),
        Err(e) => {
            error!(view = %view, error = %e, "View request failed");
            Err(e.into())
        }
    }
}

/// GET /api/deliveries
pub async fn deliveries_trend(
    State(state): State<AppState>,
    DashboardQuery(params): DashboardQuery,
) -> ViewResult<Vec<TrendPoint>> {
    respond(
        View::DeliveriesTrend,
        state.engine.deliveries_trend(&params).await,
    )
}

/// GET /api/kpi
pub async fn kpi_snapshot(
    State(state): State<AppState>,
    DashboardQuery(params): DashboardQuery,
) -> ViewResult<KpiSnapshot> {
    respond(View::KpiSnapshot, state.engine.kpi_snapshot(&params).await)
}

/// GET /api/partners
pub async fn partner_performance(
    State(state): State<AppState>,
    DashboardQuery(params): DashboardQuery,
) -> ViewResult<Vec<PartnerPerformanceRow>> {
    respond(
        View::PartnerPerformance,
        state.engine.partner_performance(&params).await,
    )
}

/// GET /api/regions
pub async fn region_summary(
    State(state): State<AppState>,
    DashboardQuery(params): DashboardQuery,
) -> ViewResult<Vec<RegionSummaryRow>> {
    respond(View::RegionSummary, state.engine.region_summary(&params).await)
}

/// GET /api/service-modes
pub async fn service_mode_breakdown(
    State(state): State<AppState>,
    DashboardQuery(params): DashboardQuery,
) -> ViewResult<Vec<ServiceModeRow>> {
    respond(
        View::ServiceModeBreakdown,
        state.engine.service_mode_breakdown(&params).await,
    )
}

/// GET /api/weather
pub async fn weather_impact(
    State(state): State<AppState>,
    DashboardQuery(params): DashboardQuery,
) -> ViewResult<Vec<WeatherImpactRow>> {
    respond(View::WeatherImpact, state.engine.weather_impact(&params).await)
}

/// GET /api/filters
pub async fn filter_options(State(state): State<AppState>) -> ViewResult<FilterOptions> {
    respond(View::FilterOptions, state.engine.filter_options().await)
}

/// GET /api/views/:view
pub async fn run_named_view(
    State(state): State<AppState>,
    Path(name): Path<String>,
    DashboardQuery(params): DashboardQuery,
) -> ViewResult<ViewPayload> {
    let view: View = name.parse().map_err(|e: logisight_core::UnknownView| {
        debug!(name = %name, "Unknown view requested");
        ApiError::NotFound(e.to_string())
    })?;
    respond(view, state.engine.run_view(view, &params).await)
}
