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

//! Dashboard views
//!
//! A view is one of the fixed aggregation shapes the dashboard can ask for.
//! Each view owns the set of optional filters it honours; anything else a
//! caller sends is dropped during normalization.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::schema::FilterField;

/// Returned when a view name does not match any known view
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown view: {0}")]
pub struct UnknownView(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum View {
    DeliveriesTrend,
    KpiSnapshot,
    PartnerPerformance,
    RegionSummary,
    ServiceModeBreakdown,
    WeatherImpact,
    FilterOptions,
}

impl View {
    pub const ALL: [View; 7] = [
        View::DeliveriesTrend,
        View::KpiSnapshot,
        View::PartnerPerformance,
        View::RegionSummary,
        View::ServiceModeBreakdown,
        View::WeatherImpact,
        View::FilterOptions,
    ];

    /// Stable kebab-case name used on the wire and by the CLI
    pub fn name(self) -> &'static str {
        match self {
            View::DeliveriesTrend => "deliveries-trend",
            View::KpiSnapshot => "kpi-snapshot",
            View::PartnerPerformance => "partner-performance",
            View::RegionSummary => "region-summary",
            View::ServiceModeBreakdown => "service-mode-breakdown",
            View::WeatherImpact => "weather-impact",
            View::FilterOptions => "filter-options",
        }
    }

    /// Optional dimension filters this view applies when present.
    ///
    /// Region summary accepts `region` even though it groups by region: the
    /// filter then narrows the result to that region's row.
    pub fn accepted_filters(self) -> &'static [FilterField] {
        match self {
            View::DeliveriesTrend => &[FilterField::Region],
            View::KpiSnapshot => &[FilterField::Region, FilterField::Partner],
            View::PartnerPerformance => &[FilterField::Region, FilterField::ServiceMode],
            View::RegionSummary => &[FilterField::Region],
            View::ServiceModeBreakdown => &[FilterField::Region],
            View::WeatherImpact => &[FilterField::Region],
            View::FilterOptions => &[],
        }
    }

    pub fn accepts(self, field: FilterField) -> bool {
        self.accepted_filters().contains(&field)
    }

    /// Only the delivery trend buckets by time
    pub fn uses_granularity(self) -> bool {
        matches!(self, View::DeliveriesTrend)
    }

    pub fn uses_date_range(self) -> bool {
        !matches!(self, View::FilterOptions)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for View {
    type Err = UnknownView;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        View::ALL
            .into_iter()
            .find(|view| view.name() == s)
            .ok_or_else(|| UnknownView(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_names_round_trip() {
        for view in View::ALL {
            assert_eq!(view.name().parse::<View>().unwrap(), view);
            assert_eq!(view.to_string(), view.name());
        }
    }

    #[test]
    fn test_unknown_view() {
        let err = "route-analysis".parse::<View>().unwrap_err();
        assert_eq!(err, UnknownView("route-analysis".to_string()));
        assert_eq!(err.to_string(), "Unknown view: route-analysis");
    }

    #[test]
    fn test_serde_name_matches_display() {
        let json = serde_json::to_string(&View::ServiceModeBreakdown).unwrap();
        assert_eq!(json, "\"service-mode-breakdown\"");
    }

    #[test]
    fn test_accepted_filters() {
        assert!(View::KpiSnapshot.accepts(FilterField::Partner));
        assert!(!View::KpiSnapshot.accepts(FilterField::ServiceMode));
        assert!(View::PartnerPerformance.accepts(FilterField::ServiceMode));
        assert!(View::FilterOptions.accepted_filters().is_empty());
    }

    #[test]
    fn test_granularity_only_for_trend() {
        let bucketed: Vec<View> = View::ALL
            .into_iter()
            .filter(|v| v.uses_granularity())
            .collect();
        assert_eq!(bucketed, vec![View::DeliveriesTrend]);
        assert!(!View::FilterOptions.uses_date_range());
    }
}
