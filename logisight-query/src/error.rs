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

use logisight_core::{Dimension, FactTable, View};
use thiserror::Error;

use crate::metrics::Metric;

/// Problems found while validating the view catalog
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("View {view}: {fact:?} has no join to {dimension:?}")]
    DimensionNotJoinable {
        view: View,
        fact: FactTable,
        dimension: Dimension,
    },

    #[error("View {view}: metric {metric:?} is not defined on {fact:?}")]
    MetricUnavailable {
        view: View,
        fact: FactTable,
        metric: Metric,
    },

    #[error("View {view}: ordering uses {metric:?}, which is not projected")]
    OrderMetricNotProjected { view: View, metric: Metric },

    #[error("View {view}: ordering does not match its grouping")]
    OrderingMismatch { view: View },

    #[error("View {0} is defined more than once")]
    DuplicateView(View),

    #[error("View {0} has no definition")]
    MissingView(View),

    #[error("View {0} is not an aggregation view")]
    NotAggregatable(View),
}

/// Errors from the aggregation engine
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Invalid view catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid warehouse configuration: {0}")]
    Config(String),

    #[error("View {0} is not an aggregation view")]
    NotAggregated(View),
}

pub type QueryResult<T> = Result<T, QueryError>;
