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

//! Logisight Query Engine
//!
//! Filtered aggregations over the logistics star schema. A declarative view
//! catalog says what each dashboard view groups and measures; the builder
//! derives joins and bound parameters per request; the engine executes on a
//! bounded read-only pool and shapes the rows. MySQL and SQLite warehouses
//! are both supported; see [`Dialect`].

pub mod builder;
pub mod catalog;
pub mod dialect;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod rows;
pub mod shaper;
pub mod warehouse;

#[cfg(feature = "test-fixtures")]
pub mod testing;

pub use builder::{build_query, plan_joins, BindValue, BuiltQuery, PERIOD_COLUMN};
pub use catalog::{Grouping, OrderPolicy, ViewCatalog, ViewSpec};
pub use dialect::{Dialect, NumericKind};
pub use engine::Logisight;
pub use error::{CatalogError, QueryError, QueryResult};
pub use metrics::Metric;
pub use rows::{
    FilterOptions, KpiSnapshot, PartnerPerformanceRow, RegionSummaryRow, ServiceModeRow,
    TrendPoint, ViewPayload, WeatherImpactRow,
};
pub use shaper::shape_kpi;
pub use warehouse::{MySqlParts, WarehouseConfig};
