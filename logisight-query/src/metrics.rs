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

//! Metric formulas
//!
//! Every aggregate a view can project, with its SQL expression per fact table.
//! Rates are percentages rounded to 2 decimals; money and hours are rounded
//! to 2 decimals. Nullable aggregates are coalesced so an empty single-row
//! aggregate yields zeros instead of NULL.

use logisight_core::FactTable;

use crate::dialect::{Dialect, NumericKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    TotalDeliveries,
    SuccessfulDeliveries,
    DelayedDeliveries,
    FailedDeliveries,
    SuccessRate,
    OnTimeRate,
    AvgRating,
    AvgDeliveryTime,
    TotalRevenue,
    /// Deliveries that were not delayed
    OnTimeDeliveries,
    /// Same count as `DelayedDeliveries`, named for the weather view
    DelayedCount,
    CostEfficiency,
}

impl Metric {
    /// Output column name
    pub fn column(self) -> &'static str {
        match self {
            Metric::TotalDeliveries => "total_deliveries",
            Metric::SuccessfulDeliveries => "successful_deliveries",
            Metric::DelayedDeliveries => "delayed_deliveries",
            Metric::FailedDeliveries => "failed_deliveries",
            Metric::SuccessRate => "success_rate",
            Metric::OnTimeRate => "on_time_rate",
            Metric::AvgRating => "avg_rating",
            Metric::AvgDeliveryTime => "avg_delivery_time",
            Metric::TotalRevenue => "total_revenue",
            Metric::OnTimeDeliveries => "on_time_deliveries",
            Metric::DelayedCount => "delayed_count",
            Metric::CostEfficiency => "cost_efficiency",
        }
    }

    /// SQL expression on `fact`, or `None` when the fact cannot supply it
    pub fn expression(self, fact: FactTable) -> Option<String> {
        let a = fact.alias();
        match fact {
            FactTable::Delivery => match self {
                Metric::TotalDeliveries => Some("COUNT(*)".to_string()),
                Metric::SuccessfulDeliveries => Some(count_where(&format!("{a}.is_successful = 1"))),
                Metric::DelayedDeliveries | Metric::DelayedCount => {
                    Some(count_where(&format!("{a}.is_delayed = 1")))
                }
                Metric::FailedDeliveries => Some(count_where(&format!("{a}.is_successful = 0"))),
                Metric::OnTimeDeliveries => Some(count_where(&format!("{a}.is_delayed = 0"))),
                Metric::SuccessRate => Some(format!(
                    "COALESCE(ROUND(SUM(CASE WHEN {a}.is_successful = 1 THEN 1 ELSE 0 END) * 100.0 / COUNT(*), 2), 0.0)"
                )),
                Metric::AvgRating => Some(rounded("AVG", &format!("{a}.delivery_rating"))),
                Metric::AvgDeliveryTime => {
                    Some(rounded("AVG", &format!("{a}.delivery_time_hours")))
                }
                Metric::TotalRevenue => Some(rounded("SUM", &format!("{a}.delivery_cost"))),
                Metric::OnTimeRate | Metric::CostEfficiency => None,
            },
            FactTable::PartnerPerformance => match self {
                Metric::TotalDeliveries => Some(format!("COALESCE(SUM({a}.total_deliveries), 0)")),
                Metric::SuccessRate => Some(rounded("AVG", &format!("{a}.success_rate"))),
                Metric::OnTimeRate => Some(rounded("AVG", &format!("{a}.on_time_rate"))),
                Metric::AvgRating => Some(rounded("AVG", &format!("{a}.avg_rating"))),
                Metric::TotalRevenue => Some(rounded("SUM", &format!("{a}.total_revenue"))),
                Metric::CostEfficiency => Some(rounded("AVG", &format!("{a}.cost_per_delivery"))),
                // Per-delivery flags do not exist on the pre-aggregated fact
                Metric::SuccessfulDeliveries
                | Metric::DelayedDeliveries
                | Metric::FailedDeliveries
                | Metric::AvgDeliveryTime
                | Metric::OnTimeDeliveries
                | Metric::DelayedCount => None,
            },
        }
    }

    pub fn is_available_on(self, fact: FactTable) -> bool {
        self.expression(fact).is_some()
    }

    pub fn kind(self) -> NumericKind {
        match self {
            Metric::TotalDeliveries
            | Metric::SuccessfulDeliveries
            | Metric::DelayedDeliveries
            | Metric::FailedDeliveries
            | Metric::OnTimeDeliveries
            | Metric::DelayedCount => NumericKind::Count,
            Metric::SuccessRate
            | Metric::OnTimeRate
            | Metric::AvgRating
            | Metric::AvgDeliveryTime
            | Metric::TotalRevenue
            | Metric::CostEfficiency => NumericKind::Decimal,
        }
    }

    /// `expression AS column`, typed for `dialect`
    pub fn projection(self, fact: FactTable, dialect: Dialect) -> Option<String> {
        self.expression(fact).map(|expr| {
            format!("{} AS {}", dialect.numeric(&expr, self.kind()), self.column())
        })
    }
}

fn count_where(condition: &str) -> String {
    format!("COALESCE(SUM(CASE WHEN {condition} THEN 1 ELSE 0 END), 0)")
}

fn rounded(aggregate: &str, column: &str) -> String {
    format!("COALESCE(ROUND({aggregate}({column}), 2), 0.0)")
}
