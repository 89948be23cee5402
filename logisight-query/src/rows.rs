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

//! Response rows, one type per view. Field names are the wire contract.

use serde::{Deserialize, Serialize};

/// One time bucket of the delivery trend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TrendPoint {
    pub date: String,
    pub total_deliveries: i64,
    pub successful_deliveries: i64,
    pub delayed_deliveries: i64,
    pub failed_deliveries: i64,
    pub avg_rating: f64,
    pub avg_delivery_time: f64,
    pub total_revenue: f64,
}

/// Raw single-row KPI aggregate; columns may be NULL on an empty match
#[derive(Debug, Clone, Default, PartialEq, sqlx::FromRow)]
pub struct KpiRow {
    pub total_deliveries: Option<i64>,
    pub success_rate: Option<f64>,
    pub avg_rating: Option<f64>,
    pub total_revenue: Option<f64>,
    pub avg_delivery_time: Option<f64>,
    pub on_time_deliveries: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KpiSnapshot {
    pub total_deliveries: i64,
    pub success_rate: f64,
    pub avg_rating: f64,
    pub total_revenue: f64,
    pub avg_delivery_time: f64,
    pub on_time_deliveries: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PartnerPerformanceRow {
    pub partner_name: String,
    pub total_deliveries: i64,
    pub success_rate: f64,
    pub on_time_rate: f64,
    pub avg_rating: f64,
    pub total_revenue: f64,
    pub cost_efficiency: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RegionSummaryRow {
    pub region_name: String,
    pub total_deliveries: i64,
    pub success_rate: f64,
    pub avg_rating: f64,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ServiceModeRow {
    pub service_mode: String,
    pub total_deliveries: i64,
    pub successful_deliveries: i64,
    pub delayed_deliveries: i64,
    pub failed_deliveries: i64,
    pub success_rate: f64,
    pub avg_delivery_time: f64,
    pub avg_rating: f64,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WeatherImpactRow {
    pub weather_condition: String,
    pub total_deliveries: i64,
    pub success_rate: f64,
    pub avg_delivery_time: f64,
    pub delayed_count: i64,
}

/// Distinct dimension labels offered as dashboard filter choices
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub partners: Vec<String>,
    pub regions: Vec<String>,
    pub service_modes: Vec<String>,
    pub weather_conditions: Vec<String>,
}

/// Payload of any view, serialized as the bare view data
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ViewPayload {
    DeliveriesTrend(Vec<TrendPoint>),
    KpiSnapshot(KpiSnapshot),
    PartnerPerformance(Vec<PartnerPerformanceRow>),
    RegionSummary(Vec<RegionSummaryRow>),
    ServiceModeBreakdown(Vec<ServiceModeRow>),
    WeatherImpact(Vec<WeatherImpactRow>),
    FilterOptions(FilterOptions),
}

impl ViewPayload {
    /// Number of rows (1 for single-record views)
    pub fn row_count(&self) -> usize {
        match self {
            ViewPayload::DeliveriesTrend(rows) => rows.len(),
            ViewPayload::PartnerPerformance(rows) => rows.len(),
            ViewPayload::RegionSummary(rows) => rows.len(),
            ViewPayload::ServiceModeBreakdown(rows) => rows.len(),
            ViewPayload::WeatherImpact(rows) => rows.len(),
            ViewPayload::KpiSnapshot(_) | ViewPayload::FilterOptions(_) => 1,
        }
    }
}
