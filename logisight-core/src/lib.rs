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

//! Logisight Core
//!
//! Domain model shared by the aggregation engine, the HTTP server and the CLI:
//! the fixed set of dashboard views, the star-schema vocabulary, filter
//! normalization and the response envelope. Nothing in here touches I/O.

pub mod envelope;
pub mod filters;
pub mod schema;
pub mod service_mode;
pub mod view;

pub use envelope::ApiResponse;
pub use filters::{
    DashboardFilters, DateRange, Granularity, RawFilterParams, DEFAULT_END_DATE,
    DEFAULT_START_DATE,
};
pub use schema::{Dimension, FactTable, FilterField};
pub use service_mode::{
    compare_service_modes, service_mode_rank, DEFAULT_SERVICE_MODE_RANK, SERVICE_MODE_PRIORITY,
};
pub use view::{UnknownView, View};
