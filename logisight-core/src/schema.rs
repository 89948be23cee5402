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

//! Star-schema vocabulary
//!
//! Table, alias and column identifiers of the logistics warehouse. These are
//! the only identifiers the query builder ever writes into SQL text; filter
//! values are always bound.

use serde::{Deserialize, Serialize};

/// Dimension tables joined many-to-one from a fact table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Time,
    Region,
    Partner,
    ServiceMode,
    Weather,
}

impl Dimension {
    /// Canonical join order
    pub const ALL: [Dimension; 5] = [
        Dimension::Time,
        Dimension::Region,
        Dimension::Partner,
        Dimension::ServiceMode,
        Dimension::Weather,
    ];

    pub fn table(self) -> &'static str {
        match self {
            Dimension::Time => "dim_time",
            Dimension::Region => "dim_region",
            Dimension::Partner => "dim_partner",
            Dimension::ServiceMode => "dim_service_mode",
            Dimension::Weather => "dim_weather",
        }
    }

    pub fn alias(self) -> &'static str {
        match self {
            Dimension::Time => "dt",
            Dimension::Region => "dr",
            Dimension::Partner => "dp",
            Dimension::ServiceMode => "ds",
            Dimension::Weather => "dw",
        }
    }

    /// Surrogate key, named identically on the fact and the dimension side
    pub fn key_column(self) -> &'static str {
        match self {
            Dimension::Time => "time_key",
            Dimension::Region => "region_key",
            Dimension::Partner => "partner_key",
            Dimension::ServiceMode => "service_key",
            Dimension::Weather => "weather_key",
        }
    }

    /// Human-readable column used for filtering and grouping
    pub fn label_column(self) -> &'static str {
        match self {
            Dimension::Time => "date_actual",
            Dimension::Region => "region_name",
            Dimension::Partner => "partner_name",
            Dimension::ServiceMode => "service_mode",
            Dimension::Weather => "weather_condition",
        }
    }

    /// `alias.label_column`
    pub fn qualified_label(self) -> String {
        format!("{}.{}", self.alias(), self.label_column())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactTable {
    /// One row per delivery event
    Delivery,
    /// Upstream pre-aggregated partner buckets
    PartnerPerformance,
}

impl FactTable {
    pub fn table(self) -> &'static str {
        match self {
            FactTable::Delivery => "fact_delivery",
            FactTable::PartnerPerformance => "fact_partner_performance",
        }
    }

    pub fn alias(self) -> &'static str {
        match self {
            FactTable::Delivery => "fd",
            FactTable::PartnerPerformance => "fpp",
        }
    }

    /// Dimensions this fact carries a foreign key for
    pub fn dimensions(self) -> &'static [Dimension] {
        match self {
            FactTable::Delivery => &Dimension::ALL,
            FactTable::PartnerPerformance => &[
                Dimension::Time,
                Dimension::Region,
                Dimension::Partner,
                Dimension::ServiceMode,
            ],
        }
    }

    pub fn joins(self, dimension: Dimension) -> bool {
        self.dimensions().contains(&dimension)
    }
}

/// Optional equality filters a caller may supply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterField {
    Region,
    Partner,
    ServiceMode,
}

impl FilterField {
    pub const ALL: [FilterField; 3] = [
        FilterField::Region,
        FilterField::Partner,
        FilterField::ServiceMode,
    ];

    pub fn dimension(self) -> Dimension {
        match self {
            FilterField::Region => Dimension::Region,
            FilterField::Partner => Dimension::Partner,
            FilterField::ServiceMode => Dimension::ServiceMode,
        }
    }

    /// Query-string parameter name
    pub fn param_name(self) -> &'static str {
        match self {
            FilterField::Region => "region",
            FilterField::Partner => "partner",
            FilterField::ServiceMode => "serviceMode",
        }
    }
}
