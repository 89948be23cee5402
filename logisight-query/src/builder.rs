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

//! Aggregation query construction
//!
//! Turns a [`ViewSpec`] plus normalized filters into one parameterized SQL
//! statement. Only catalog identifiers reach the SQL text; dates, filter
//! values and service-mode names are bound.

use std::collections::BTreeSet;

use logisight_core::{DashboardFilters, Dimension, DEFAULT_SERVICE_MODE_RANK, SERVICE_MODE_PRIORITY};

use crate::catalog::{Grouping, OrderPolicy, ViewSpec};
use crate::dialect::Dialect;
use crate::error::{CatalogError, QueryResult};

/// Output column holding the time bucket label
pub const PERIOD_COLUMN: &str = "date";

#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    Int(i64),
}

/// A ready-to-execute statement
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<BindValue>,
    /// Dimensions joined, in emission order
    pub joins: Vec<Dimension>,
}

/// Dimensions a request needs joined: time (for the date range), the group
/// dimension, and the dimension of every active filter. Returned in
/// canonical order without duplicates.
pub fn plan_joins(spec: &ViewSpec, filters: &DashboardFilters) -> Vec<Dimension> {
    let mut needed = BTreeSet::new();
    needed.insert(Dimension::Time);
    if let Some(dim) = spec.group_dimension() {
        needed.insert(dim);
    }
    for (field, _) in filters.active_filters() {
        needed.insert(field.dimension());
    }
    needed.into_iter().collect()
}

pub fn build_query(
    spec: &ViewSpec,
    filters: &DashboardFilters,
    dialect: Dialect,
) -> QueryResult<BuiltQuery> {
    let fact = spec.fact;
    let time_label = Dimension::Time.qualified_label();
    let mut params = Vec::new();

    let group_expr = match spec.grouping {
        Some(Grouping::Period) => Some((
            dialect.period_expression(filters.granularity.unwrap_or_default(), &time_label),
            PERIOD_COLUMN,
        )),
        Some(Grouping::Dimension(dim)) => Some((dim.qualified_label(), dim.label_column())),
        None => None,
    };

    let mut select = Vec::with_capacity(spec.metrics.len() + 1);
    if let Some((expr, column)) = &group_expr {
        select.push(format!("{expr} AS {}", dialect.quote_ident(column)));
    }
    for metric in spec.metrics {
        let projection = metric
            .projection(fact, dialect)
            .ok_or(CatalogError::MetricUnavailable {
                view: spec.view,
                fact,
                metric: *metric,
            })?;
        select.push(projection);
    }

    let joins = plan_joins(spec, filters);
    let mut sql = format!(
        "SELECT {} FROM {} {}",
        select.join(", "),
        fact.table(),
        fact.alias()
    );
    for dim in &joins {
        if !fact.joins(*dim) {
            return Err(CatalogError::DimensionNotJoinable {
                view: spec.view,
                fact,
                dimension: *dim,
            }
            .into());
        }
        sql.push_str(&format!(
            " JOIN {table} {alias} ON {fact_alias}.{key} = {alias}.{key}",
            table = dim.table(),
            alias = dim.alias(),
            fact_alias = fact.alias(),
            key = dim.key_column(),
        ));
    }

    sql.push_str(&format!(" WHERE {time_label} BETWEEN ? AND ?"));
    params.push(BindValue::Text(filters.date_range.start.clone()));
    params.push(BindValue::Text(filters.date_range.end.clone()));

    for (field, value) in filters.active_filters() {
        sql.push_str(&format!(" AND {} = ?", field.dimension().qualified_label()));
        params.push(BindValue::Text(value.to_string()));
    }

    if let Some((expr, _)) = &group_expr {
        sql.push_str(&format!(" GROUP BY {expr}"));
    }

    match spec.order {
        OrderPolicy::PeriodAscending => {
            sql.push_str(&format!(
                " ORDER BY {} ASC",
                dialect.quote_ident(PERIOD_COLUMN)
            ));
        }
        OrderPolicy::Descending(metric) => {
            sql.push_str(&format!(" ORDER BY {} DESC", metric.column()));
            if let Some(dim) = spec.group_dimension() {
                sql.push_str(&format!(", {} ASC", dim.qualified_label()));
            }
        }
        OrderPolicy::ServiceModeRank => {
            let label = Dimension::ServiceMode.qualified_label();
            sql.push_str(&format!(" ORDER BY CASE {label}"));
            for (name, rank) in SERVICE_MODE_PRIORITY {
                sql.push_str(" WHEN ? THEN ?");
                params.push(BindValue::Text((*name).to_string()));
                params.push(BindValue::Int(i64::from(*rank)));
            }
            sql.push_str(" ELSE ? END ASC");
            params.push(BindValue::Int(i64::from(DEFAULT_SERVICE_MODE_RANK)));
            sql.push_str(&format!(", {label} ASC"));
        }
        OrderPolicy::Unordered => {}
    }

    Ok(BuiltQuery { sql, params, joins })
}

/// Distinct, non-null labels of one dimension in ascending order
pub fn distinct_labels_sql(dimension: Dimension) -> String {
    format!(
        "SELECT DISTINCT {label} FROM {table} WHERE {label} IS NOT NULL ORDER BY {label} ASC",
        label = dimension.label_column(),
        table = dimension.table(),
    )
}
