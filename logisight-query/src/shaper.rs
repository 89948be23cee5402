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

//! Result shaping
//!
//! Grouped views pass through in query order. The KPI snapshot always
//! yields a record: no row, or a row over zero facts, becomes the all-zero
//! snapshot. Values are never re-rounded here.

use crate::rows::{KpiRow, KpiSnapshot};

impl KpiSnapshot {
    /// Canonical snapshot for a filter that matches no deliveries
    pub fn zero() -> Self {
        Self::default()
    }
}

pub fn shape_kpi(row: Option<KpiRow>) -> KpiSnapshot {
    let Some(row) = row else {
        return KpiSnapshot::zero();
    };

    match row.total_deliveries {
        None | Some(0) => KpiSnapshot::zero(),
        Some(total_deliveries) => KpiSnapshot {
            total_deliveries,
            success_rate: finite_or_zero(row.success_rate),
            avg_rating: finite_or_zero(row.avg_rating),
            total_revenue: finite_or_zero(row.total_revenue),
            avg_delivery_time: finite_or_zero(row.avg_delivery_time),
            on_time_deliveries: row.on_time_deliveries.unwrap_or(0),
        },
    }
}

fn finite_or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}
